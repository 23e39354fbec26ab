use std::path::{Path, PathBuf};

use crate::record::ReviewRecord;

/// Outcome of [`ReviewTable::flush`].
#[derive(Debug, PartialEq, Eq)]
pub enum Flushed {
    Written { path: PathBuf, rows: usize },
    /// Nothing was accumulated, so no file was created.
    Empty,
}

/// Reviews collected for one title, across all of its categories.
#[derive(Debug, Default)]
pub struct ReviewTable {
    records: Vec<ReviewRecord>,
}

impl ReviewTable {
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn accumulate(&mut self, records: impl IntoIterator<Item = ReviewRecord>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn path_for(dir: &Path, stem: &str) -> PathBuf {
        dir.join(format!("{stem}_all_reviews.csv"))
    }

    /// Writes the table to `<dir>/<stem>_all_reviews.csv` with a header row.
    pub fn flush(self, dir: &Path, stem: &str) -> anyhow::Result<Flushed> {
        if self.records.is_empty() {
            return Ok(Flushed::Empty);
        }

        let path = Self::path_for(dir, stem);
        let mut writer = csv::Writer::from_path(&path)?;
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        tracing::debug!(target: "sink", "wrote {} rows to {}", self.records.len(), path.display());
        Ok(Flushed::Written {
            path,
            rows: self.records.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AuthorType;

    fn blank(author_type: AuthorType) -> ReviewRecord {
        ReviewRecord {
            author_type,
            critic_name: None,
            review_date: None,
            review_text: None,
            score: None,
        }
    }

    fn record(author_type: AuthorType, name: &str, score: Option<&str>) -> ReviewRecord {
        ReviewRecord {
            critic_name: Some(name.to_owned()),
            score: score.map(ToOwned::to_owned),
            ..blank(author_type)
        }
    }

    #[test]
    fn empty_table_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let flushed = ReviewTable::new().flush(dir.path(), "Nothing").unwrap();
        assert_eq!(flushed, Flushed::Empty);
        assert!(!ReviewTable::path_for(dir.path(), "Nothing").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn writes_header_and_rows_in_accumulation_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = ReviewTable::new();
        table.accumulate([
            record(AuthorType::TopCritic, "A", Some("Fresh")),
            record(AuthorType::TopCritic, "B", None),
        ]);
        table.accumulate(vec![record(AuthorType::Audience, "u", Some("4.5/5.0"))]);
        assert_eq!(table.len(), 3);

        let flushed = table.flush(dir.path(), "Some Movie").unwrap();
        let path = dir.path().join("Some Movie_all_reviews.csv");
        assert_eq!(
            flushed,
            Flushed::Written {
                path: path.clone(),
                rows: 3
            }
        );

        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            written,
            "author_type,critic_name,review_date,review_text,score\n\
             Top Critic,A,,,Fresh\n\
             Top Critic,B,,,\n\
             Audience,u,,,4.5/5.0\n",
        );
    }

    #[test]
    fn text_with_delimiters_is_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = ReviewTable::new();
        table.accumulate([ReviewRecord {
            review_text: Some("Loud, \"fun\"\nand long".to_owned()),
            ..blank(AuthorType::Audience)
        }]);
        table.flush(dir.path(), "Quoted").unwrap();

        let mut reader = csv::Reader::from_path(ReviewTable::path_for(dir.path(), "Quoted")).unwrap();
        let rows = reader.records().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][3], "Loud, \"fun\"\nand long");
        assert_eq!(&rows[0][0], "Audience");
    }
}
