use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use crate::cli::SubCommandExtend;
use crate::config::{IndexOptions, Opts};
use crate::export::{ExportFormat, ExportWriter, export_records};
use crate::milvus::MilvusClient;

#[derive(Parser, Debug, Clone)]
pub struct ExportCommand {
    #[command(flatten)]
    pub index: IndexOptions,
    /// 导出文件路径
    #[arg(long, value_name = "PATH", default_value = "./export/results.json")]
    pub export: PathBuf,
    /// 每页从向量数据库读取的记录数
    #[arg(short, long, value_name = "SIZE", default_value_t = 10000)]
    pub batch_size: usize,
    /// 查询过滤表达式，默认导出全部记录
    #[arg(long, value_name = "EXPR")]
    pub filter: Option<String>,
    /// 导出文件格式
    #[arg(long, value_enum, default_value_t = ExportFormat::Lines)]
    pub format: ExportFormat,
    /// array 格式下每隔多少页重写一次文件
    #[arg(long, value_name = "PAGES", default_value_t = 10)]
    pub snapshot_every: usize,
}

impl SubCommandExtend for ExportCommand {
    async fn run(&self, _opts: &Opts) -> Result<()> {
        let config = self.index.to_config();
        info!("连接向量数据库: {} / {}", config.endpoint, config.collection);

        let client = MilvusClient::new(config);
        let uid_field = client.config().uid_field.clone();
        let mut iterator =
            client.query_iterator(self.batch_size, self.filter.clone(), vec![uid_field])?;

        let writer = ExportWriter::create(&self.export, self.format, self.snapshot_every)?;
        let stats = export_records(&mut iterator, writer).await?;

        println!("Exported {} records to {}", stats.records, self.export.display());
        Ok(())
    }
}
