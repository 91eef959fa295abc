use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::ProgressStyle;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

pub fn pb_style() -> ProgressStyle {
    ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
        .expect("invalid progress template")
        .progress_chars("##-")
}

/// 以 4 空格缩进序列化
pub fn to_writer_pretty<W: Write, T: Serialize + ?Sized>(writer: W, value: &T) -> Result<()> {
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
    value.serialize(&mut ser)?;
    Ok(())
}

/// 覆盖写入一个 JSON 文件
pub fn write_json_pretty<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("无法创建文件 {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// 千分位格式化
pub fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
