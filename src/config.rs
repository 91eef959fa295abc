use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::*;

#[derive(Parser, Debug, Clone)]
pub struct IndexOptions {
    /// 向量数据库集群地址
    #[arg(long, env = "ZILLIZ_ENDPOINT", value_name = "URL")]
    pub endpoint: String,
    /// 向量数据库鉴权 token
    #[arg(long, env = "ZILLIZ_API_KEY", hide_env_values = true)]
    pub token: String,
    /// 集合名称
    #[arg(long, env = "ZILLIZ_COLLECTION", default_value = "sermon_blocks")]
    pub collection: String,
    /// 保存 block uid 的字段名
    #[arg(long, value_name = "FIELD", default_value = "block_uid")]
    pub uid_field: String,
    /// 集合主键字段名，用于游标翻页
    #[arg(long, value_name = "FIELD", default_value = "id")]
    pub primary_key: String,
}

impl IndexOptions {
    pub fn to_config(&self) -> IndexConfig {
        IndexConfig {
            endpoint: self.endpoint.trim_end_matches('/').to_string(),
            token: self.token.clone(),
            collection: self.collection.clone(),
            uid_field: self.uid_field.clone(),
            primary_key: self.primary_key.clone(),
        }
    }
}

/// 向量数据库连接配置，在进程启动时构造一次，显式传给客户端
#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub endpoint: String,
    pub token: String,
    pub collection: String,
    pub uid_field: String,
    pub primary_key: String,
}

#[derive(Parser, Debug, Clone)]
pub struct SourceOptions {
    /// SQLite 数据库路径
    #[arg(long, value_name = "PATH", default_value = "./sermons.db")]
    pub db: PathBuf,
    /// 从 SQLite 分块读取时每块的行数
    #[arg(long, value_name = "SIZE", default_value_t = 25000, value_parser = clap::value_parser!(u64).range(1..))]
    pub chunk_size: u64,
}

#[derive(Parser, Debug, Clone)]
pub struct ReportOptions {
    /// 对比结果输出目录
    #[arg(short, long, value_name = "DIR", default_value = "./export")]
    pub output: PathBuf,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "blocksync", version)]
pub struct Opts {
    #[command(subcommand)]
    pub subcmd: SubCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SubCommand {
    /// 从向量数据库导出所有 block uid
    Export(ExportCommand),
    /// 对比 SQLite 与导出文件
    Compare(CompareCommand),
    /// 直接对比 SQLite 与线上向量数据库
    Status(StatusCommand),
}
