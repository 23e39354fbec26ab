use rscr::{
    config::{CrawlConfig, MOVIES},
    extract::Extractor,
    paginate,
    record::{Category, CrawlTarget, ReviewRecord},
    scrape::Session,
    sink::{Flushed, ReviewTable},
};

struct Context {
    config: CrawlConfig,
    session: Session,
    extractor: Extractor,
}

async fn crawl_category(
    ctx: &Context,
    target: &CrawlTarget,
    category: Category,
) -> anyhow::Result<Vec<ReviewRecord>> {
    let url = target.review_url(ctx.config.base_url, category);
    tracing::info!(target: "crawl", "  - crawling {} reviews ... {url}", category.author_type());

    ctx.session.navigate(&url, ctx.config.page_settle).await?;
    let exhaustion = paginate::exhaust(&ctx.session, &ctx.config.pagination).await?;
    tracing::debug!(target: "crawl", "pagination ended: {exhaustion:?}");

    let html = ctx.session.snapshot().await?;
    Ok(ctx.extractor.extract(&html, category))
}

async fn crawl_title(ctx: &Context, target: &CrawlTarget) -> ReviewTable {
    let title = target.title;
    tracing::info!(target: "crawl", "\x1b[33mcollecting\x1b[0m reviews of {title:?} ...");

    let mut table = ReviewTable::new();
    tokio::time::sleep(ctx.config.title_delay).await;

    for &category in target.categories {
        let author_type = category.author_type();
        match crawl_category(ctx, target, category).await {
            Ok(records) if records.is_empty() => {
                tracing::warn!(target: "crawl", "\x1b[31mno {author_type} reviews found\x1b[0m for {title:?}");
            }
            Ok(records) => {
                tracing::info!(target: "crawl", "\x1b[36m{} {author_type} reviews\x1b[0m for {title:?}", records.len());
                table.accumulate(records);
            }
            Err(e) => {
                tracing::error!(target: "crawl", "\x1b[31m{title:?} {author_type} failed\x1b[0m: {e:?}");
            }
        }
    }

    tracing::info!(target: "crawl", "{} reviews collected for {title:?}", table.len());
    table
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::formatted_timed_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = CrawlConfig::default();
    std::fs::create_dir_all(&config.output_dir)?;

    let ctx = Context {
        extractor: Extractor::new()?,
        session: Session::launch(&config.browser)?,
        config,
    };

    for target in &MOVIES {
        let table = crawl_title(&ctx, target).await;
        match table.flush(&ctx.config.output_dir, &target.file_stem()) {
            Ok(Flushed::Written { path, rows }) => {
                tracing::info!(target: "sink", "\x1b[36msaved\x1b[0m {rows} reviews of {:?} to {}", target.title, path.display());
            }
            Ok(Flushed::Empty) => {
                tracing::warn!(target: "sink", "no reviews for {:?}, no file written", target.title);
            }
            Err(e) => {
                tracing::error!(target: "sink", "\x1b[31msaving {:?} failed\x1b[0m: {e:?}", target.title);
            }
        }
    }

    Ok(())
}
