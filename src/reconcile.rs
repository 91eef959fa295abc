use std::collections::{BTreeMap, BTreeSet};
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;

use crate::milvus::Record;

/// 从导出记录中提取 uid，保留顺序和重复
pub fn extract_uids<'a, I>(records: I, uid_field: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter_map(|record| record.get(uid_field)?.as_str().map(str::to_string))
        .collect()
}

/// 读取导出文件中的 uid 列表
///
/// 支持 JSON 数组和每行一条记录两种格式。文件不存在时视为空导出，
/// JSON 格式错误则返回错误。每行一条记录时，没有换行结尾的最后一行
/// 是导出中断时写了一半的记录，跳过。
pub fn load_export(path: impl AsRef<Path>, uid_field: &str) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("导出文件 {} 不存在，按空数据处理", path.display());
            return Ok(vec![]);
        }
        Err(e) => return Err(e).with_context(|| format!("无法读取导出文件 {}", path.display())),
    };

    let uids = if text.trim_start().starts_with('[') {
        let records: Vec<Value> = serde_json::from_str(&text)
            .with_context(|| format!("导出文件 {} 不是合法的 JSON", path.display()))?;
        extract_uids(records.iter().filter_map(Value::as_object), uid_field)
    } else {
        let lines: Vec<&str> = text.lines().collect();
        let unterminated = !text.is_empty() && !text.ends_with('\n');
        let mut records = vec![];
        for (lineno, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(line) {
                Ok(Value::Object(record)) => records.push(record),
                Ok(_) => {}
                Err(_) if unterminated && lineno + 1 == lines.len() => {
                    warn!("导出文件 {} 最后一行不完整，已跳过", path.display());
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("导出文件 {} 第 {} 行不是合法的 JSON", path.display(), lineno + 1)
                    });
                }
            }
        }
        extract_uids(&records, uid_field)
    };

    info!("导出文件中的记录总数: {}", uids.len());
    Ok(uids)
}

/// 两边数据的对比结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    /// 在 SQLite 中但不在向量数据库中
    pub missing: BTreeSet<String>,
    /// 在向量数据库中但不在 SQLite 中
    pub extra: BTreeSet<String>,
    /// 在向量数据库中出现多次的 uid 及其次数
    pub duplicates: BTreeMap<String, usize>,
    pub sqlite_count: usize,
    pub zilliz_count: usize,
    pub zilliz_unique_count: usize,
}

impl Comparison {
    pub fn compute(source: &BTreeSet<String>, export: &[String]) -> Self {
        // 先计数再去重，否则会丢失重复信息
        let mut counter: BTreeMap<&str, usize> = BTreeMap::new();
        for uid in export {
            *counter.entry(uid.as_str()).or_default() += 1;
        }

        let missing = source.iter().filter(|uid| !counter.contains_key(uid.as_str())).cloned().collect();
        let extra = counter
            .keys()
            .filter(|uid| !source.contains(**uid))
            .map(|uid| uid.to_string())
            .collect();
        let duplicates = counter
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(uid, count)| (uid.to_string(), *count))
            .collect();

        Self {
            missing,
            extra,
            duplicates,
            sqlite_count: source.len(),
            zilliz_count: export.len(),
            zilliz_unique_count: counter.len(),
        }
    }

    pub fn summary(&self) -> Summary {
        Summary {
            sqlite_total: self.sqlite_count,
            zilliz_total: self.zilliz_count,
            zilliz_unique: self.zilliz_unique_count,
            missing_count: self.missing.len(),
            extra_count: self.extra.len(),
            duplicate_count: self.duplicates.len(),
            total_duplicate_records: self.duplicates.values().sum::<usize>() - self.duplicates.len(),
        }
    }
}

/// 写入 comparison_summary.json 的汇总信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub sqlite_total: usize,
    pub zilliz_total: usize,
    pub zilliz_unique: usize,
    pub missing_count: usize,
    pub extra_count: usize,
    pub duplicate_count: usize,
    pub total_duplicate_records: usize,
}

impl Summary {
    pub fn is_synchronized(&self) -> bool {
        self.missing_count == 0 && self.duplicate_count == 0 && self.extra_count == 0
    }
}
