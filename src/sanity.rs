//! Corpus-level sanity check over precomputed metadata.

use crate::errors::{Result, malformed_metadata};
use itertools::Itertools;
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Proportion of minimum-word documents required to raise a warning.
pub const DEFAULT_CUTOFF: f64 = 0.01;

/// Parsed corpus metadata: one row per document.
///
/// The table must contain an integer `words` column; every column before
/// it identifies the document.
#[derive(Debug)]
pub struct Metadata {
    id_columns: Vec<String>,
    rows: Vec<MetaRow>,
}

#[derive(Debug)]
struct MetaRow {
    id_fields: Vec<String>,
    words: u64,
}

/// Row count and total word count.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct BasicStatistics {
    pub documents: u64,
    pub total_words: u64,
}

/// The documents with the most and the fewest words.
#[derive(Debug, PartialEq, Serialize)]
pub struct ExtremeDocuments {
    pub max_document: String,
    pub max_words: u64,
    pub min_document: String,
    pub min_words: u64,
    /// Number of rows that tie for the minimum.
    pub min_count: u64,
}

/// Everything the sanity check reports.
#[derive(Debug, PartialEq, Serialize)]
pub struct SanityReport {
    pub statistics: BasicStatistics,
    pub extremes: ExtremeDocuments,
    pub cutoff: f64,
    pub warning: bool,
}

impl Metadata {
    /// Load from a CSV file.
    pub fn from_path(path: &Path) -> Result<Metadata> {
        info!("read metadata: {}", path.display());
        let file = File::open(path)
            .map_err(|e| malformed_metadata(format!("cannot open {}: {e}", path.display())))?;
        Metadata::from_reader(file)
    }

    /// Parse from any CSV source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Metadata> {
        let mut csv = csv::Reader::from_reader(reader);
        let headers = csv
            .headers()
            .map_err(|e| malformed_metadata(format!("cannot read header: {e}")))?
            .clone();
        let words_idx = headers
            .iter()
            .position(|h| h == "words")
            .ok_or_else(|| malformed_metadata("expected a 'words' column".to_owned()))?;
        let id_columns = headers.iter().take(words_idx).map(str::to_owned).collect_vec();
        let mut rows = Vec::new();
        for record in csv.records() {
            let record = record.map_err(|e| malformed_metadata(format!("bad row: {e}")))?;
            let raw = record
                .get(words_idx)
                .ok_or_else(|| malformed_metadata("row is missing the 'words' field".to_owned()))?;
            let words = raw.parse().map_err(|_| {
                malformed_metadata(format!(
                    "'words' must be a non-negative integer, got '{raw}'"
                ))
            })?;
            let id_fields = (0..words_idx)
                .map(|i| record.get(i).unwrap_or("").to_owned())
                .collect_vec();
            rows.push(MetaRow { id_fields, words });
        }
        Ok(Metadata { id_columns, rows })
    }

    /// Columns strictly before `words`.
    pub fn id_columns(&self) -> &[String] {
        &self.id_columns
    }

    /// Row count and total word count.
    pub fn basic_statistics(&self) -> BasicStatistics {
        BasicStatistics {
            documents: self.rows.len() as u64,
            total_words: self.rows.iter().map(|r| r.words).sum(),
        }
    }

    /// The first rows achieving the maximum and minimum word counts,
    /// and the size of the minimum tie.
    pub fn extreme_documents(&self) -> Result<ExtremeDocuments> {
        let mut extremes = None;
        for row in &self.rows {
            extremes = match extremes {
                None => Some((row, row)),
                Some((max, min)) => Some((
                    if row.words > max.words { row } else { max },
                    if row.words < min.words { row } else { min },
                )),
            };
        }
        let (max, min) = extremes
            .ok_or_else(|| malformed_metadata("metadata table has no rows".to_owned()))?;
        let min_count = self.rows.iter().filter(|r| r.words == min.words).count() as u64;
        Ok(ExtremeDocuments {
            max_document: self.document_id(max),
            max_words: max.words,
            min_document: self.document_id(min),
            min_words: min.words,
            min_count,
        })
    }

    /// True iff suspiciously many documents sit at the minimum word count.
    pub fn raise_warning(&self, cutoff: f64) -> Result<bool> {
        let extremes = self.extreme_documents()?;
        Ok(extremes.min_count as f64 > cutoff * self.rows.len() as f64)
    }

    /// The full report.
    pub fn check(&self, cutoff: f64) -> Result<SanityReport> {
        Ok(SanityReport {
            statistics: self.basic_statistics(),
            extremes: self.extreme_documents()?,
            cutoff,
            warning: self.raise_warning(cutoff)?,
        })
    }

    fn document_id(&self, row: &MetaRow) -> String {
        format!("{}.txt", row.id_fields.iter().join("/"))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn metadata(csv: &str) -> Metadata {
        Metadata::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn basic_statistics_counts_rows_and_words() {
        let m = metadata("path,words\na,10\nb,20\nc,30\n");
        assert_eq!(
            m.basic_statistics(),
            BasicStatistics {
                documents: 3,
                total_words: 60,
            }
        );
    }

    #[test]
    fn extremes_and_warning() {
        let m = metadata("path,words\na,0\nb,0\nc,100\n");
        let extremes = m.extreme_documents().unwrap();
        assert_eq!(extremes.max_document, "c.txt");
        assert_eq!(extremes.max_words, 100);
        assert_eq!(extremes.min_document, "a.txt");
        assert_eq!(extremes.min_words, 0);
        assert_eq!(extremes.min_count, 2);
        // 2 > 0.5 * 3
        assert!(m.raise_warning(0.5).unwrap());
        // 2 <= 0.7 * 3 is false: 2 > 2.1 fails
        assert!(!m.raise_warning(0.7).unwrap());
    }

    #[test]
    fn first_row_wins_ties() {
        let m = metadata("path,words\nfirst,5\nsecond,5\n");
        let extremes = m.extreme_documents().unwrap();
        assert_eq!(extremes.max_document, "first.txt");
        assert_eq!(extremes.min_document, "first.txt");
        assert_eq!(extremes.min_count, 2);
    }

    #[test]
    fn id_joins_all_columns_before_words() {
        let m = metadata("year,part,words,extra\n1990,intro,7,x\n");
        assert_eq!(m.id_columns(), ["year", "part"]);
        let extremes = m.extreme_documents().unwrap();
        assert_eq!(extremes.min_document, "1990/intro.txt");
    }

    #[test]
    fn missing_words_column_is_rejected() {
        let err = Metadata::from_reader("path,count\na,1\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("'words'"));
    }

    #[test]
    fn non_integer_words_is_rejected() {
        let err = Metadata::from_reader("path,words\na,many\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("many"));
        let err = Metadata::from_reader("path,words\na,-2\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("-2"));
    }

    #[test]
    fn empty_table_has_no_extremes() {
        let m = metadata("path,words\n");
        assert_eq!(m.basic_statistics().documents, 0);
        assert!(m.extreme_documents().is_err());
    }

    #[test]
    fn full_report() {
        let m = metadata("path,words\na,0\nb,0\nc,100\n");
        let report = m.check(0.5).unwrap();
        assert!(report.warning);
        assert_eq!(report.statistics.total_words, 100);
        assert_eq!(report.extremes.min_count, 2);
    }
}
