/// 合成子记录的 uid 后缀，这些记录不参与对比
pub const EXCLUDED_SUFFIX: &str = "-b0";

/// 参与对比的 block 条件：有向量，且不是合成子记录
pub(crate) const ELIGIBLE_FILTER: &str = "embedding IS NOT NULL AND uid NOT LIKE '%-b0'";

/// blocks 表中的一行
#[derive(Debug, sqlx::FromRow)]
pub struct BlockRecord {
    pub uid: String,
}
