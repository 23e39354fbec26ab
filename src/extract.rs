use scraper::{ElementRef, Html, Selector};

use crate::record::{Category, ReviewRecord};

/// How a container's score element is turned into a score string.
#[derive(Clone, Copy)]
enum ScoreKind {
    /// `sentiment="POSITIVE" | "NEGATIVE"` on the critic score icon.
    Sentiment,
    /// `score="<n>"` on the audience star group, rendered as `<n>/5.0`.
    Stars,
}

struct Layout {
    row: Selector,
    name: Selector,
    text: Selector,
    date: Selector,
    score: Selector,
    score_kind: ScoreKind,
}

/// Pulls review records out of a rendered review page.
pub struct Extractor {
    critics: Layout,
    audience: Layout,
}

fn sel(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("invalid selector {css:?}: {e:?}"))
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_owned())
}

impl Layout {
    fn score(&self, scope: ElementRef<'_>) -> Option<String> {
        let element = scope.select(&self.score).next()?;
        match self.score_kind {
            ScoreKind::Sentiment => match element.attr("sentiment")? {
                "POSITIVE" => Some("Fresh".to_owned()),
                "NEGATIVE" => Some("Rotten".to_owned()),
                _ => None,
            },
            ScoreKind::Stars => element.attr("score").map(|value| format!("{value}/5.0")),
        }
    }
}

impl Extractor {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            critics: Layout {
                row: sel("div.review-row")?,
                name: sel("a.display-name")?,
                text: sel("p.review-text")?,
                date: sel(r#"span[data-qa="review-date"]"#)?,
                score: sel("score-icon-critics")?,
                score_kind: ScoreKind::Sentiment,
            },
            audience: Layout {
                row: sel("div.audience-review-row")?,
                name: sel("span.audience-reviews__name")?,
                text: sel("p.audience-reviews__review")?,
                date: sel("span.audience-reviews__duration")?,
                score: sel("rating-stars-group")?,
                score_kind: ScoreKind::Stars,
            },
        })
    }

    const fn layout(&self, category: Category) -> Option<&Layout> {
        match category {
            Category::TopCritics => Some(&self.critics),
            Category::User => Some(&self.audience),
            Category::Other(_) => None,
        }
    }

    /// Extracts every review container of `category` from a page snapshot,
    /// in document order.
    ///
    /// Missing sub-elements leave the corresponding field empty; they never
    /// drop the record. A category without a known layout yields nothing.
    pub fn extract(&self, html: &str, category: Category) -> Vec<ReviewRecord> {
        let Some(layout) = self.layout(category) else {
            tracing::debug!(target: "extract", "no layout for category {:?}", category.query());
            return Vec::new();
        };
        let author_type = category.author_type();

        let document = Html::parse_document(html);
        let records = document
            .select(&layout.row)
            .map(|row| ReviewRecord {
                author_type,
                critic_name: first_text(row, &layout.name),
                review_date: first_text(row, &layout.date),
                review_text: first_text(row, &layout.text),
                score: layout.score(row),
            })
            .collect::<Vec<_>>();

        tracing::debug!(target: "extract", "{} {author_type} containers", records.len());
        records
    }
}
