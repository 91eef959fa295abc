use std::collections::BTreeSet;

use indicatif::ProgressBar;
use log::info;
use sqlx::{Executor, Result, Sqlite};

use super::{BlockRecord, ELIGIBLE_FILTER};
use crate::utils::pb_style;

/// 统计参与对比的 block 数量
pub async fn count_eligible<'c, E>(executor: E) -> Result<u64>
where
    E: Executor<'c, Database = Sqlite>,
{
    let sql = format!("SELECT COUNT(*) FROM blocks WHERE {ELIGIBLE_FILTER}");
    let count: i64 = sqlx::query_scalar(&sql).fetch_one(executor).await?;
    Ok(count as u64)
}

/// 按 LIMIT/OFFSET 读取一块 uid
pub async fn fetch_chunk<'c, E>(executor: E, limit: u64, offset: u64) -> Result<Vec<BlockRecord>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let sql = format!("SELECT uid FROM blocks WHERE {ELIGIBLE_FILTER} LIMIT ? OFFSET ?");
    sqlx::query_as::<_, BlockRecord>(&sql)
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(executor)
        .await
}

/// 分块读取所有参与对比的 uid
///
/// 总数只在开始时查询一次，之后按固定块大小翻页直到 offset 超过总数。
/// 翻页期间不开启事务，表被修改时结果可能有遗漏或重复。
pub async fn fetch_source_uids(db: &super::Database, chunk_size: u64) -> Result<BTreeSet<String>> {
    let chunk_size = chunk_size.max(1);
    let total = count_eligible(db).await?;
    info!("SQLite 中的 block 总数: {}", total);

    let pb = ProgressBar::new(total).with_style(pb_style());
    pb.set_message("读取 SQLite");

    let mut uids = BTreeSet::new();
    let mut offset = 0;
    while offset < total {
        let chunk = fetch_chunk(db, chunk_size, offset).await?;
        uids.extend(chunk.into_iter().map(|record| record.uid));

        offset += chunk_size;
        let fetched = offset.min(total);
        pb.set_position(fetched);
        info!("已从 SQLite 获取 {} / {} 条记录", fetched, total);
    }

    pb.finish_and_clear();
    Ok(uids)
}
