//! Query normalization: raw CSV text and CLI arguments into a validated search request.

use crate::error::{Error, Result};
use crate::vector_store::MetadataFilter;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// A validated similarity search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Query vector, exactly as long as the embedding dimensionality.
    pub vector: Vec<f32>,
    pub filter: Option<MetadataFilter>,
    pub top_k: usize,
}

/// Parse a comma-separated line of numbers.
///
/// Surrounding whitespace is ignored; an empty or non-finite token is a parse error.
pub fn parse_vector(line: &str) -> Result<Vec<f32>> {
    line.trim_end_matches(['\r', '\n'])
        .split(',')
        .enumerate()
        .map(|(position, token)| {
            let token = token.trim();
            token
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| Error::Parse {
                    position,
                    token: token.to_string(),
                })
        })
        .collect()
}

/// Parse a top-K argument, which must be a positive integer.
pub fn parse_top_k(raw: &str) -> Result<usize> {
    let raw = raw.trim();
    match raw.parse::<i64>() {
        Ok(n) if n > 0 => Ok(n as usize),
        Ok(n) => Err(Error::InvalidArgument(format!(
            "top_k must be a positive integer, got {}",
            n
        ))),
        Err(_) => Err(Error::InvalidArgument(format!(
            "top_k must be a positive integer, got '{}'",
            raw
        ))),
    }
}

/// Read the first line of a `.csv` query file, reading at most `max_bytes`.
pub fn read_query_line(path: &Path, max_bytes: usize) -> Result<String> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(Error::InvalidInput(format!(
            "File: {} does not match the .csv pattern",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(Error::InvalidInput(format!(
            "File: {} is not valid or does not exist",
            path.display()
        )));
    }

    let file = std::fs::File::open(path)?;
    let mut reader = BufReader::new(file.take(max_bytes as u64));
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line)
}

/// Turns raw query input into a [`SearchQuery`] for a fixed dimensionality.
#[derive(Debug, Clone, Copy)]
pub struct QueryNormalizer {
    dimensions: usize,
}

impl QueryNormalizer {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Check a parsed vector against the expected dimensionality.
    pub fn validate(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimensions {
            return Err(Error::Dimension {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    /// Parse, validate and assemble a query. Keywords, if any, become an `$in` filter.
    pub fn normalize(&self, line: &str, keywords: &[String], top_k: &str) -> Result<SearchQuery> {
        let vector = parse_vector(line)?;
        self.validate(&vector)?;
        let filter = MetadataFilter::any_of(keywords.iter().cloned());
        let top_k = parse_top_k(top_k)?;

        Ok(SearchQuery {
            vector,
            filter,
            top_k,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_line(n: usize) -> String {
        (0..n)
            .map(|i| format!("{:.4}", i as f32 / 1000.0))
            .collect::<Vec<_>>()
            .join(",")
    }

    #[test]
    fn test_accepts_exact_dimension() {
        let query = QueryNormalizer::new(768)
            .normalize(&csv_line(768), &[], "2")
            .unwrap();
        assert_eq!(query.vector.len(), 768);
        assert_eq!(query.top_k, 2);
        assert!(query.filter.is_none());
    }

    #[test]
    fn test_rejects_off_by_one_dimensions() {
        let normalizer = QueryNormalizer::new(768);
        for n in [767, 769] {
            let err = normalizer.normalize(&csv_line(n), &[], "2").unwrap_err();
            match err {
                Error::Dimension { expected, actual } => {
                    assert_eq!(expected, 768);
                    assert_eq!(actual, n);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_rejects_non_numeric_token() {
        let mut line = String::from("0.1,abc,0.3,");
        line.push_str(&csv_line(765));

        let err = QueryNormalizer::new(768).normalize(&line, &[], "2").unwrap_err();
        match err {
            Error::Parse { position, token } => {
                assert_eq!(position, 1);
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_trailing_comma_is_a_parse_error() {
        let err = parse_vector("0.1,0.2,").unwrap_err();
        assert!(matches!(err, Error::Parse { position: 2, .. }));
    }

    #[test]
    fn test_parse_tolerates_whitespace_and_newline() {
        assert_eq!(parse_vector(" 1.5, -2 ,3e-1\r\n").unwrap(), vec![1.5, -2.0, 0.3]);
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        assert!(matches!(parse_vector("1.0,NaN"), Err(Error::Parse { position: 1, .. })));
        assert!(matches!(parse_vector("inf"), Err(Error::Parse { position: 0, .. })));
    }

    #[test]
    fn test_keywords_build_filter() {
        let keywords = vec!["foo".to_string(), "bar".to_string()];
        let query = QueryNormalizer::new(3)
            .normalize("1,2,3", &keywords, "2")
            .unwrap();
        let filter = query.filter.unwrap();
        assert_eq!(filter.keywords(), &keywords[..]);
    }

    #[test]
    fn test_top_k_validation() {
        assert_eq!(parse_top_k("10").unwrap(), 10);
        assert_eq!(parse_top_k(" 1 ").unwrap(), 1);
        for bad in ["0", "-3", "2.5", "two", ""] {
            assert!(
                matches!(parse_top_k(bad), Err(Error::InvalidArgument(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_read_query_line_takes_first_line_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vector.csv");
        std::fs::write(&path, "1,2,3\n4,5,6\n").unwrap();

        let line = read_query_line(&path, 5_000_000).unwrap();
        assert_eq!(parse_vector(&line).unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_read_query_line_respects_byte_cap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vector.csv");
        std::fs::write(&path, "1,2,3,4,5\n").unwrap();

        assert_eq!(read_query_line(&path, 3).unwrap(), "1,2");
    }

    #[test]
    fn test_read_query_line_checks_extension_and_existence() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("vector.txt");
        std::fs::write(&txt, "1,2,3").unwrap();

        assert!(matches!(
            read_query_line(&txt, 100),
            Err(Error::InvalidInput(ref m)) if m.contains(".csv")
        ));
        assert!(matches!(
            read_query_line(&dir.path().join("missing.csv"), 100),
            Err(Error::InvalidInput(_))
        ));
    }
}
