use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use crate::cli::SubCommandExtend;
use crate::config::{Opts, ReportOptions, SourceOptions};
use crate::db::{fetch_source_uids, init_db};
use crate::reconcile::{Comparison, load_export};
use crate::report::{print_summary, write_report};

#[derive(Parser, Debug, Clone)]
pub struct CompareCommand {
    #[command(flatten)]
    pub source: SourceOptions,
    #[command(flatten)]
    pub report: ReportOptions,
    /// 导出文件路径
    #[arg(long, value_name = "PATH", default_value = "./export/results.json")]
    pub export: PathBuf,
    /// 导出记录中 block uid 的字段名
    #[arg(long, value_name = "FIELD", default_value = "block_uid")]
    pub uid_field: String,
}

impl SubCommandExtend for CompareCommand {
    async fn run(&self, _opts: &Opts) -> Result<()> {
        info!("1. 从 SQLite 读取 block");
        let db = init_db(&self.source.db)
            .await
            .with_context(|| format!("无法打开数据库 {}", self.source.db.display()))?;
        let source = fetch_source_uids(&db, self.source.chunk_size).await?;
        db.close().await;

        info!("2. 读取导出文件");
        let export = load_export(&self.export, &self.uid_field)?;

        info!("3. 对比数据");
        let comparison = Comparison::compute(&source, &export);

        info!("4. 保存对比结果");
        let summary = write_report(&self.report.output, &comparison)?;

        print_summary(&summary, &self.report.output);
        Ok(())
    }
}
