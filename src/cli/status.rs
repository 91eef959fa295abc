use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::ProgressBar;
use log::info;

use crate::cli::SubCommandExtend;
use crate::config::{IndexOptions, Opts, ReportOptions, SourceOptions};
use crate::db::{fetch_source_uids, init_db};
use crate::milvus::{MAX_QUERY_LIMIT, MilvusClient, Record, RecordCursor};
use crate::reconcile::{Comparison, extract_uids};
use crate::report::{print_summary, write_report};
use crate::utils::{pb_style, write_json_pretty};

#[derive(Parser, Debug, Clone)]
pub struct StatusCommand {
    #[command(flatten)]
    pub index: IndexOptions,
    #[command(flatten)]
    pub source: SourceOptions,
    #[command(flatten)]
    pub report: ReportOptions,
    /// 每页从向量数据库读取的记录数
    #[arg(short, long, value_name = "SIZE", default_value_t = MAX_QUERY_LIMIT)]
    pub batch_size: usize,
    /// 同时把线上读取到的 uid 保存为导出文件，可直接用于 compare
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,
}

impl SubCommandExtend for StatusCommand {
    async fn run(&self, _opts: &Opts) -> Result<()> {
        info!("1. 从 SQLite 读取 block");
        let db = init_db(&self.source.db)
            .await
            .with_context(|| format!("无法打开数据库 {}", self.source.db.display()))?;
        let source = fetch_source_uids(&db, self.source.chunk_size).await?;
        db.close().await;

        info!("2. 从向量数据库读取 block");
        let client = MilvusClient::new(self.index.to_config());
        let uids = scan_uids(&client, self.batch_size).await?;
        if let Some(path) = &self.save {
            write_json_pretty(path, &uid_records(&client.config().uid_field, &uids))?;
            info!("线上 uid 已保存至 {}", path.display());
        }

        info!("3. 对比数据");
        let comparison = Comparison::compute(&source, &uids);

        info!("4. 保存对比结果");
        let summary = write_report(&self.report.output, &comparison)?;

        print_summary(&summary, &self.report.output);
        Ok(())
    }
}

/// 遍历整个集合，返回所有 uid（保留重复）
pub async fn scan_uids(client: &MilvusClient, batch_size: usize) -> Result<Vec<String>> {
    let uid_field = client.config().uid_field.clone();
    let mut iterator = client.query_iterator(batch_size, None, vec![uid_field.clone()])?;

    let pb = ProgressBar::no_length().with_style(pb_style());
    pb.set_message("读取向量数据库");

    let mut uids = vec![];
    loop {
        let page = iterator.next_page().await.context("从向量数据库读取失败")?;
        if page.is_empty() {
            iterator.close();
            break;
        }
        uids.extend(extract_uids(&page, &uid_field));
        pb.set_position(uids.len() as u64);
        info!("已从向量数据库获取 {} 个 uid", uids.len());
    }

    pb.finish_and_clear();
    Ok(uids)
}

/// 把 uid 包装成与导出文件相同的记录格式
fn uid_records(uid_field: &str, uids: &[String]) -> Vec<Record> {
    uids.iter()
        .map(|uid| {
            let mut record = Record::new();
            record.insert(uid_field.to_string(), uid.clone().into());
            record
        })
        .collect()
}
