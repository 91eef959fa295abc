use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::reconcile::{Comparison, Summary};
use crate::utils::{thousands, write_json_pretty};

pub const MISSING_FILE: &str = "missing_in_zilliz.json";
pub const EXTRA_FILE: &str = "extra_in_zilliz.json";
pub const DUPLICATES_FILE: &str = "duplicates_in_zilliz.json";
pub const SUMMARY_FILE: &str = "comparison_summary.json";

/// 将对比结果写入输出目录，已有文件会被覆盖
pub fn write_report(output_dir: impl AsRef<Path>, comparison: &Comparison) -> Result<Summary> {
    let output_dir = output_dir.as_ref();
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("无法创建输出目录 {}", output_dir.display()))?;

    write_json_pretty(output_dir.join(MISSING_FILE), &comparison.missing)?;
    write_json_pretty(output_dir.join(EXTRA_FILE), &comparison.extra)?;
    write_json_pretty(output_dir.join(DUPLICATES_FILE), &comparison.duplicates)?;

    let summary = comparison.summary();
    write_json_pretty(output_dir.join(SUMMARY_FILE), &summary)?;
    info!("对比结果已保存至 {}", output_dir.display());

    Ok(summary)
}

/// 生成人类可读的汇总文本
pub fn format_summary(summary: &Summary, output_dir: &Path) -> String {
    let mut out = String::new();
    let rule = "=".repeat(50);
    out.push_str(&format!("\n{rule}\nCOMPARISON SUMMARY\n{rule}\n"));

    let rows = [
        ("SQLite total blocks:", summary.sqlite_total),
        ("Zilliz total records:", summary.zilliz_total),
        ("Zilliz unique records:", summary.zilliz_unique),
        ("Missing in Zilliz:", summary.missing_count),
        ("Extra in Zilliz:", summary.extra_count),
        ("Duplicate UIDs:", summary.duplicate_count),
        ("Total duplicate records:", summary.total_duplicate_records),
    ];
    for (label, value) in rows {
        out.push_str(&format!("{:<26}{}\n", label, thousands(value)));
    }
    out.push_str(&format!("\nResults saved to {}\n", output_dir.display()));

    if summary.missing_count > 0 {
        out.push_str(&format!("\n⚠️  {} blocks are missing from Zilliz!\n", summary.missing_count));
    }
    if summary.duplicate_count > 0 {
        out.push_str(&format!("\n⚠️  {} UIDs have duplicates in Zilliz!\n", summary.duplicate_count));
    }
    if summary.is_synchronized() {
        out.push_str("\n✅ Datasets are perfectly synchronized!\n");
    }
    out
}

pub fn print_summary(summary: &Summary, output_dir: &Path) {
    print!("{}", format_summary(summary, output_dir));
}
