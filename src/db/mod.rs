use std::path::Path;

use log::info;
use sqlx::SqlitePool;
use sqlx::sqlite::*;

pub mod crud;
pub mod model;

pub use crud::fetch_source_uids;
pub use model::*;

pub type Database = SqlitePool;

/// 以只读方式打开数据库，整个分块读取过程只持有一个连接
pub async fn init_db(filename: impl AsRef<Path>) -> Result<Database, sqlx::Error> {
    let filename = filename.as_ref();
    info!("初始化数据库连接: {}", filename.display());

    let options = SqliteConnectOptions::new()
        .filename(filename)
        .read_only(true)
        .create_if_missing(false);

    SqlitePoolOptions::new().max_connections(1).connect_with(options).await
}
