use mysql_async::prelude::Queryable;
use mysql_async::{Conn, OptsBuilder};
use tracing::{debug, info};

use crate::config::DatabaseConfig;

/// The single connection a grading run owns.
///
/// Errors returned from `query_scalar` are per-statement failures; the
/// comparison turns them into outcomes instead of aborting the run.
#[allow(async_fn_in_trait)]
pub trait SqlConnection {
    /// Runs `sql` and returns the first column of the first row, if any.
    async fn query_scalar(&mut self, sql: &str) -> crate::Result<Option<String>>;

    async fn disconnect(self) -> crate::Result<()>;
}

impl SqlConnection for Conn {
    async fn query_scalar(&mut self, sql: &str) -> crate::Result<Option<String>> {
        let value: Option<Option<String>> = self
            .query_first(sql)
            .await
            .map_err(|e| crate::GraderError::Database(e.to_string()))?;
        Ok(value.flatten())
    }

    async fn disconnect(self) -> crate::Result<()> {
        Conn::disconnect(self)
            .await
            .map_err(|e| crate::GraderError::Database(e.to_string()))
    }
}

pub async fn connect(config: &DatabaseConfig) -> crate::Result<Conn> {
    info!(
        "Connecting to MySQL at {}:{} as {}",
        config.host, config.port, config.user
    );

    let opts = OptsBuilder::default()
        .ip_or_hostname(config.host.clone())
        .tcp_port(config.port)
        .user(Some(config.user.clone()))
        .pass(config.password.clone())
        .db_name(config.database.clone());

    let conn = Conn::new(opts).await.map_err(crate::GraderError::Connect)?;
    debug!("Connected, server version {:?}", conn.server_version());
    Ok(conn)
}
