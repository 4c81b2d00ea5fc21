use std::io::Write;
use tracing::{debug, info, warn};

use crate::compare::{Outcome, compare};
use crate::config::Settings;
use crate::database::{self, SqlConnection};
use crate::extract::{Query, read_queries};
use crate::report::Reporter;


/// A solution query together with whatever the submission has at the same position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPair {
    Matched { solution: Query, submission: Query },
    Missing { solution: Query },
}

impl QueryPair {
    pub fn ordinal(&self) -> usize {
        match self {
            QueryPair::Matched { solution, .. } | QueryPair::Missing { solution } => {
                solution.ordinal
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub ordinal: usize,
    pub outcome: Outcome,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    verdicts: Vec<Verdict>,
}

impl Report {
    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    pub fn passed(&self) -> usize {
        self.verdicts.iter().filter(|v| v.outcome.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.verdicts.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}

/// Pairs queries by position. The solution decides how many positions exist;
/// surplus submission statements are ignored.
pub fn pair_queries(solution: Vec<Query>, submission: Vec<Query>) -> Vec<QueryPair> {
    if submission.len() > solution.len() {
        warn!(
            "Submission has {} queries but the solution only {}, ignoring the rest",
            submission.len(),
            solution.len()
        );
    }

    let mut submission = submission.into_iter();
    solution
        .into_iter()
        .map(|solution| match submission.next() {
            Some(submission) => QueryPair::Matched {
                solution,
                submission,
            },
            None => QueryPair::Missing { solution },
        })
        .collect()
}

/// Grades every pair in order. A failing position never stops the loop; only
/// a failure to write the report does.
pub async fn grade<C, O, E>(
    conn: &mut C,
    pairs: Vec<QueryPair>,
    reporter: &mut Reporter<O, E>,
) -> crate::Result<Report>
where
    C: SqlConnection,
    O: Write,
    E: Write,
{
    let mut report = Report::default();

    for pair in pairs {
        let ordinal = pair.ordinal();
        let outcome = match pair {
            QueryPair::Matched {
                solution,
                submission,
            } => {
                debug!("Comparing query {}", ordinal);
                compare(conn, &solution.sql, &submission.sql).await
            }
            QueryPair::Missing { .. } => Outcome::Missing,
        };

        let verdict = Verdict { ordinal, outcome };
        reporter.report(&verdict)?;
        report.verdicts.push(verdict);
    }

    Ok(report)
}

/// Grades `pairs` on `conn` and releases the connection afterwards, also when
/// grading bails out with an error.
pub async fn run_with_connection<C, O, E>(
    mut conn: C,
    pairs: Vec<QueryPair>,
    reporter: &mut Reporter<O, E>,
) -> crate::Result<Report>
where
    C: SqlConnection,
    O: Write,
    E: Write,
{
    let graded = grade(&mut conn, pairs, reporter).await;

    if let Err(e) = conn.disconnect().await {
        warn!("Failed to close database connection: {}", e);
    }

    graded
}

pub async fn run<O: Write, E: Write>(
    settings: &Settings,
    reporter: &mut Reporter<O, E>,
) -> crate::Result<Report> {
    info!(
        "Grading {} against {}",
        settings.query_file.display(),
        settings.solution_file.display()
    );

    let solution = read_queries(&settings.solution_file).await?;
    let submission = read_queries(&settings.query_file).await?;
    let pairs = pair_queries(solution, submission);

    let conn = database::connect(&settings.database).await?;
    let report = run_with_connection(conn, pairs, reporter).await?;

    info!(
        "{} of {} queries passed",
        report.passed(),
        report.verdicts().len()
    );
    Ok(report)
}
