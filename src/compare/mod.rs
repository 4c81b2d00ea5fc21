use tracing::debug;

use crate::database::SqlConnection;

#[cfg(test)]
mod tests;

pub const IDENTICAL: &str = "identical";
pub const MISMATCHED: &str = "mis-matched";
pub const RESULTS_DO_NOT_MATCH: &str = "Query results do not match";

/// Verdict for one query position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(String),
    /// The submission file has no statement at this position.
    Missing,
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }
}

/// Builds the statement that decides equivalence in one round trip.
///
/// Both sides must have the same row count, and that count must equal the
/// row count of their `UNION`. The counts see duplicates but the `UNION`
/// collapses them, so a repeated row can stand in for a missing one:
/// `{a, b}` against `{a, a}` is reported as identical.
pub fn comparison_query(solution: &str, submission: &str) -> String {
    format!(
        "
  SELECT
    CASE WHEN count1 = count2 AND count1 = count3 THEN '{IDENTICAL}' ELSE '{MISMATCHED}' END
  FROM
  (
    SELECT
      (SELECT COUNT(*) FROM ( {solution} ) qExpected) AS count1,
      (SELECT COUNT(*) FROM ( {submission} ) qActual) AS count2,
      (SELECT COUNT(*) FROM (SELECT * FROM (
        {solution}
      ) qExpected UNION SELECT * FROM (
        {submission}
      ) qActual) AS unioned) AS count3
  )
    AS counts
  "
    )
}

pub async fn compare<C: SqlConnection>(
    conn: &mut C,
    solution: &str,
    submission: &str,
) -> Outcome {
    let sql = comparison_query(solution, submission);
    debug!("Comparison query: {}", sql);

    match conn.query_scalar(&sql).await {
        Ok(Some(value)) if value == IDENTICAL => Outcome::Passed,
        Ok(value) => {
            debug!("Comparison returned {:?}", value);
            Outcome::Failed(RESULTS_DO_NOT_MATCH.to_string())
        }
        Err(e) => {
            debug!("Comparison failed: {:?}", e);
            Outcome::Failed(e.to_string())
        }
    }
}
