use core::fmt;

use serde::Serialize;

/// Who wrote a review. Decided by the requested category, never by the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AuthorType {
    #[serde(rename = "Top Critic")]
    TopCritic,
    #[serde(rename = "Audience")]
    Audience,
}

impl AuthorType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopCritic => "Top Critic",
            Self::Audience => "Audience",
        }
    }
}

impl fmt::Display for AuthorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `type` query of a review page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    TopCritics,
    User,
    /// Any other query value. Crawled like the others but never yields records.
    Other(&'static str),
}

impl Category {
    pub const fn query(self) -> &'static str {
        match self {
            Self::TopCritics => "top_critics",
            Self::User => "user",
            Self::Other(q) => q,
        }
    }

    pub const fn author_type(self) -> AuthorType {
        match self {
            Self::TopCritics => AuthorType::TopCritic,
            _ => AuthorType::Audience,
        }
    }
}

/// One extracted review. Only `author_type` is guaranteed to be set.
///
/// Field order is the column order of the written table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReviewRecord {
    pub author_type: AuthorType,
    pub critic_name: Option<String>,
    pub review_date: Option<String>,
    pub review_text: Option<String>,
    pub score: Option<String>,
}

/// A title together with the review categories to crawl for it.
#[derive(Clone, Copy, Debug)]
pub struct CrawlTarget {
    pub title: &'static str,
    pub categories: &'static [Category],
}

impl CrawlTarget {
    /// URL path segment: lower-cased, spaces joined by `_`.
    pub fn slug(&self) -> String {
        self.title.to_lowercase().replace(' ', "_")
    }

    /// Stem of the output file name.
    ///
    /// The title is kept verbatim except for path separators and NUL, which
    /// would otherwise point the file outside the output directory. This is
    /// not kept in sync with [`Self::slug`]: titles with punctuation produce
    /// a slug that need not match the site's own.
    pub fn file_stem(&self) -> String {
        self.title.replace(['/', '\\', '\0'], "_")
    }

    pub fn review_url(&self, base: &str, category: Category) -> String {
        format!(
            "{}/m/{}/reviews?type={}",
            base.trim_end_matches('/'),
            self.slug(),
            category.query(),
        )
    }
}
