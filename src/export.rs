use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use indicatif::ProgressBar;
use log::info;

use crate::milvus::{Record, RecordCursor};
use crate::utils::{pb_style, write_json_pretty};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// 每行一条记录，逐页追加写入
    Lines,
    /// 带缩进的 JSON 数组，定期整体重写
    Array,
}

/// 导出文件写入器
///
/// `Lines` 模式每页序列化后一次性追加写入，`Array` 模式在内存中累积，
/// 每 `snapshot_every` 页整体重写一次文件。
pub struct ExportWriter {
    path: PathBuf,
    format: ExportFormat,
    snapshot_every: usize,
    lines: Option<File>,
    records: Vec<Record>,
    pages: usize,
}

impl ExportWriter {
    /// 创建写入器并清空目标文件
    pub fn create(path: impl AsRef<Path>, format: ExportFormat, snapshot_every: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("无法创建目录 {}", parent.display()))?;
        }

        let lines = match format {
            ExportFormat::Lines => {
                let file = OpenOptions::new()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(&path)
                    .with_context(|| format!("无法创建导出文件 {}", path.display()))?;
                Some(file)
            }
            ExportFormat::Array => {
                write_json_pretty(&path, &Vec::<Record>::new())?;
                None
            }
        };

        Ok(Self { path, format, snapshot_every: snapshot_every.max(1), lines, records: vec![], pages: 0 })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 写入一页记录
    pub fn write_page(&mut self, page: Vec<Record>) -> Result<()> {
        self.pages += 1;
        match &mut self.lines {
            Some(file) => {
                let mut buf = vec![];
                for record in &page {
                    serde_json::to_writer(&mut buf, record)?;
                    buf.push(b'\n');
                }
                file.write_all(&buf)?;
                file.flush()?;
            }
            None => {
                self.records.extend(page);
                if self.pages % self.snapshot_every == 0 {
                    self.snapshot()?;
                }
            }
        }
        Ok(())
    }

    /// 完成写入，数组模式下写出最终快照
    pub fn finish(mut self) -> Result<()> {
        match self.format {
            ExportFormat::Lines => {
                if let Some(file) = self.lines.as_mut() {
                    file.sync_all()?;
                }
            }
            ExportFormat::Array => self.snapshot()?,
        }
        Ok(())
    }

    fn snapshot(&self) -> Result<()> {
        write_json_pretty(&self.path, &self.records)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportStats {
    pub pages: usize,
    pub records: usize,
}

/// 读完游标中的所有记录并写入导出文件
///
/// 读到空页时关闭游标。中途出错直接返回，已写入的页保留在文件中。
pub async fn export_records<C: RecordCursor>(cursor: &mut C, mut writer: ExportWriter) -> Result<ExportStats> {
    let pb = ProgressBar::no_length().with_style(pb_style());
    pb.set_message("导出中");

    let mut stats = ExportStats::default();
    loop {
        let page = cursor.next_page().await.context("从向量数据库读取失败")?;
        if page.is_empty() {
            cursor.close();
            break;
        }

        stats.pages += 1;
        stats.records += page.len();
        writer.write_page(page)?;

        pb.set_position(stats.records as u64);
        info!("已获取 {} 条记录", stats.records);
    }

    let path = writer.path().to_path_buf();
    writer.finish()?;
    pb.finish_and_clear();
    info!("导出完成: {} 页，{} 条记录，保存至 {}", stats.pages, stats.records, path.display());
    Ok(stats)
}
