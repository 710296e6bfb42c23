#![allow(dead_code)]
pub mod dns_server_mock;

pub use dns_server_mock::{MockDnsServer, MockReply};

use dnstester_infrastructure::database::create_pool;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Fresh migrated database in a temporary directory. Keep the `TempDir`
/// alive for as long as the pool is used.
pub async fn temp_pool() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("tester.db").display());
    let pool = create_pool(&url, 4).await.unwrap();
    (dir, pool)
}
