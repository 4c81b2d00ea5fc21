use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::debug;


// `R` keeps a trailing `\r` out of `.` and lets `$` stop in front of it.
static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mR)-- *.*$").unwrap());
static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?R)'(.*)'").unwrap());

/// A single SQL statement and its 1-based position in the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub ordinal: usize,
    pub sql: String,
}

impl Query {
    pub fn new(ordinal: usize, sql: impl Into<String>) -> Self {
        Self {
            ordinal,
            sql: sql.into(),
        }
    }
}

/// Splits raw file text into statements.
///
/// Line comments are stripped first, then the first single-quoted run in the
/// whole text is rewritten to double quotes. Only that one occurrence is
/// touched: the pattern is greedy within its line, so a line holding several
/// literals has everything from its first `'` to its last `'` wrapped, and
/// later lines are left alone. Segments are split on `;` and exact empty
/// strings dropped; no trimming is done.
pub fn extract_queries(text: &str) -> Vec<Query> {
    let without_comments = LINE_COMMENT.replace_all(text, "");
    let normalized = QUOTED.replace(&without_comments, "\"${1}\"");

    normalized
        .split(';')
        .filter(|segment| !segment.is_empty())
        .enumerate()
        .map(|(index, segment)| Query::new(index + 1, segment))
        .collect()
}

pub async fn read_queries(path: &Path) -> crate::Result<Vec<Query>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| crate::GraderError::ReadQueries {
            path: path.to_path_buf(),
            source,
        })?;

    let queries = extract_queries(&text);
    debug!("Extracted {} queries from {}", queries.len(), path.display());
    Ok(queries)
}
