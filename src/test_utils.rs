#![allow(dead_code)]
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::database::SqlConnection;

type Rows = Vec<Vec<String>>;

/// In-memory stand-in for a MySQL connection.
///
/// Knows a fixed set of queries and their rows, and answers the comparison
/// statement the way MySQL would: `COUNT(*)` over each side and over their
/// duplicate-free `UNION`. Anything it does not know is a syntax error.
#[derive(Debug, Default)]
pub struct FakeConnection {
    tables: HashMap<String, Rows>,
    pub executed: Vec<String>,
    disconnects: Arc<AtomicUsize>,
}

impl FakeConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, sql: &str, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect();
        self.tables.insert(sql.trim().to_string(), rows);
        self
    }

    /// Shared counter bumped every time the connection is released.
    pub fn disconnect_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.disconnects)
    }

    fn rows_for(&self, sql: &str) -> crate::Result<&Rows> {
        self.tables.get(sql.trim()).ok_or_else(|| {
            crate::GraderError::Database(format!(
                "ERROR 1064 (42000): You have an error in your SQL syntax; check the manual \
                 that corresponds to your MySQL server version for the right syntax to use \
                 near '{}'",
                sql.trim()
            ))
        })
    }
}

fn between<'a>(haystack: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = haystack.find(start)? + start.len();
    let len = haystack[from..].find(end)?;
    Some(&haystack[from..from + len])
}

impl SqlConnection for FakeConnection {
    async fn query_scalar(&mut self, sql: &str) -> crate::Result<Option<String>> {
        self.executed.push(sql.to_string());

        let (Some(solution), Some(submission)) = (
            between(sql, "(SELECT COUNT(*) FROM ( ", " ) qExpected) AS count1"),
            between(sql, "(SELECT COUNT(*) FROM ( ", " ) qActual) AS count2")
                .and_then(|s| s.rsplit("(SELECT COUNT(*) FROM ( ").next()),
        ) else {
            return Err(crate::GraderError::Database(
                "unsupported statement".to_string(),
            ));
        };

        let expected = self.rows_for(solution)?;
        let actual = self.rows_for(submission)?;

        let width = |rows: &Rows| rows.first().map(Vec::len);
        if let (Some(a), Some(b)) = (width(expected), width(actual)) {
            if a != b {
                return Err(crate::GraderError::Database(
                    "ERROR 1222 (21000): The used SELECT statements have a different number of columns"
                        .to_string(),
                ));
            }
        }

        let count1 = expected.len();
        let count2 = actual.len();
        let count3 = expected.iter().chain(actual).collect::<BTreeSet<_>>().len();

        let verdict = if count1 == count2 && count1 == count3 {
            crate::compare::IDENTICAL
        } else {
            crate::compare::MISMATCHED
        };
        Ok(Some(verdict.to_string()))
    }

    async fn disconnect(self) -> crate::Result<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
