use super::*;
use crate::test_utils::FakeConnection;

const PETS: &str = "SELECT name FROM pets";

fn pets() -> FakeConnection {
    FakeConnection::new().with_query(PETS, &[&["rex"], &["tom"], &["kit"]])
}

#[test]
fn test_comparison_query_embeds_both_sides() {
    let sql = comparison_query("SELECT 1 AS a", "SELECT 2 AS a");

    assert!(sql.contains("(SELECT COUNT(*) FROM ( SELECT 1 AS a ) qExpected) AS count1"));
    assert!(sql.contains("(SELECT COUNT(*) FROM ( SELECT 2 AS a ) qActual) AS count2"));
    assert!(sql.contains("UNION SELECT * FROM ("));
    assert!(sql.contains(
        "CASE WHEN count1 = count2 AND count1 = count3 THEN 'identical' ELSE 'mis-matched' END"
    ));
    assert_eq!(sql.matches("SELECT 1 AS a").count(), 2);
    assert_eq!(sql.matches("SELECT 2 AS a").count(), 2);
}

#[tokio::test]
async fn test_same_query_passes() {
    let mut conn = FakeConnection::new().with_query("SELECT 1 AS a", &[&["1"]]);
    let outcome = compare(&mut conn, "SELECT 1 AS a", "SELECT 1 AS a").await;
    assert_eq!(outcome, Outcome::Passed);
    assert_eq!(conn.executed.len(), 1);
}

#[tokio::test]
async fn test_row_equivalent_queries_pass() {
    let mut conn = pets().with_query(
        "SELECT p.name FROM pets p ORDER BY p.name DESC",
        &[&["tom"], &["rex"], &["kit"]],
    );

    let outcome = compare(
        &mut conn,
        PETS,
        "SELECT p.name FROM pets p ORDER BY p.name DESC",
    )
    .await;
    assert_eq!(outcome, Outcome::Passed);
}

#[tokio::test]
async fn test_extra_row_fails() {
    let mut conn = pets().with_query(
        "SELECT name FROM pets UNION ALL SELECT 'bob'",
        &[&["rex"], &["tom"], &["kit"], &["bob"]],
    );

    let outcome = compare(&mut conn, PETS, "SELECT name FROM pets UNION ALL SELECT 'bob'").await;
    assert_eq!(outcome, Outcome::Failed(RESULTS_DO_NOT_MATCH.to_string()));
}

#[tokio::test]
async fn test_same_count_different_rows_fails() {
    let mut conn = pets().with_query(
        "SELECT species FROM pets",
        &[&["dog"], &["cat"], &["cat"]],
    );

    let outcome = compare(&mut conn, PETS, "SELECT species FROM pets").await;
    assert_eq!(outcome, Outcome::Failed(RESULTS_DO_NOT_MATCH.to_string()));
}

// Row counts are compared as multisets but membership only as sets, so a
// duplicate can stand in for a missing row. This is the accepted behavior.
#[tokio::test]
async fn test_duplicate_rows_are_not_distinguished() {
    let mut conn = FakeConnection::new()
        .with_query("SELECT owner FROM pets", &[&["ann"], &["bo"]])
        .with_query("SELECT owner FROM pets WHERE owner = 'ann'", &[&["ann"], &["ann"]]);

    let outcome = compare(
        &mut conn,
        "SELECT owner FROM pets",
        "SELECT owner FROM pets WHERE owner = 'ann'",
    )
    .await;
    assert_eq!(outcome, Outcome::Passed);
}

#[tokio::test]
async fn test_repeating_every_row_changes_the_count() {
    let mut conn = FakeConnection::new()
        .with_query("SELECT owner FROM pets", &[&["ann"], &["bo"]])
        .with_query(
            "SELECT owner FROM pets UNION ALL SELECT owner FROM pets",
            &[&["ann"], &["bo"], &["ann"], &["bo"]],
        );

    let outcome = compare(
        &mut conn,
        "SELECT owner FROM pets",
        "SELECT owner FROM pets UNION ALL SELECT owner FROM pets",
    )
    .await;
    assert_eq!(outcome, Outcome::Failed(RESULTS_DO_NOT_MATCH.to_string()));
}

#[tokio::test]
async fn test_syntax_error_reports_database_message() {
    let mut conn = pets();

    let outcome = compare(&mut conn, PETS, "SELEC name FROM pets").await;
    match outcome {
        Outcome::Failed(reason) => {
            assert!(reason.contains("You have an error in your SQL syntax"));
            assert!(reason.contains("SELEC name FROM pets"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_column_count_mismatch_is_database_error() {
    let mut conn = pets().with_query("SELECT name, species FROM pets", &[
        &["rex", "dog"],
        &["tom", "cat"],
        &["kit", "cat"],
    ]);

    let outcome = compare(&mut conn, PETS, "SELECT name, species FROM pets").await;
    assert!(matches!(outcome, Outcome::Failed(ref reason) if reason.contains("different number of columns")));
}

#[tokio::test]
async fn test_empty_results_are_identical() {
    let mut conn = FakeConnection::new()
        .with_query("SELECT name FROM pets WHERE 0", &[])
        .with_query("SELECT name FROM pets WHERE 1 = 2", &[]);

    let outcome = compare(
        &mut conn,
        "SELECT name FROM pets WHERE 0",
        "SELECT name FROM pets WHERE 1 = 2",
    )
    .await;
    assert_eq!(outcome, Outcome::Passed);
}

struct ScalarConnection(Option<String>);

impl SqlConnection for ScalarConnection {
    async fn query_scalar(&mut self, _sql: &str) -> crate::Result<Option<String>> {
        Ok(self.0.clone())
    }

    async fn disconnect(self) -> crate::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_only_identical_scalar_passes() {
    let mut conn = ScalarConnection(Some("identical".to_string()));
    assert!(compare(&mut conn, "a", "b").await.is_passed());

    let mut conn = ScalarConnection(Some("mis-matched".to_string()));
    assert_eq!(
        compare(&mut conn, "a", "b").await,
        Outcome::Failed(RESULTS_DO_NOT_MATCH.to_string())
    );

    let mut conn = ScalarConnection(None);
    assert_eq!(
        compare(&mut conn, "a", "b").await,
        Outcome::Failed(RESULTS_DO_NOT_MATCH.to_string())
    );
}
