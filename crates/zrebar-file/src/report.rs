//! 运行结果报告
//!
//! 三种输出：
//! - JSON：便于其他工具读取
//! - `.zrb`：MessagePack + Zstd 的紧凑二进制格式，带魔数和版本头
//! - 纯文本：汇总与分组明细

use crate::error::FileError;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use zrebar_core::result::RunResult;

/// 文件魔数 "ZRBR"
const MAGIC: &[u8; 4] = b"ZRBR";

/// 当前文件格式版本
const FORMAT_VERSION: u32 = 1;

/// Zstd 压缩级别
const COMPRESSION_LEVEL: i32 = 3;

/// 文件头（16 字节）
#[derive(Debug)]
struct FileHeader {
    magic: [u8; 4],
    version: u32,
    /// 标志位（预留）
    flags: u32,
    compressed_size: u32,
}

impl FileHeader {
    fn new(compressed_size: u32) -> Self {
        Self {
            magic: *MAGIC,
            version: FORMAT_VERSION,
            flags: 0,
            compressed_size,
        }
    }

    fn write(&self, writer: &mut impl Write) -> Result<(), std::io::Error> {
        writer.write_all(&self.magic)?;
        writer.write_all(&self.version.to_le_bytes())?;
        writer.write_all(&self.flags.to_le_bytes())?;
        writer.write_all(&self.compressed_size.to_le_bytes())?;
        Ok(())
    }

    fn read(reader: &mut impl Read) -> Result<Self, FileError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;

        if &magic != MAGIC {
            return Err(FileError::InvalidFormat(
                "Invalid magic number, not a ZRebar report".to_string(),
            ));
        }

        let mut buf = [0u8; 4];

        reader.read_exact(&mut buf)?;
        let version = u32::from_le_bytes(buf);

        reader.read_exact(&mut buf)?;
        let flags = u32::from_le_bytes(buf);

        reader.read_exact(&mut buf)?;
        let compressed_size = u32::from_le_bytes(buf);

        Ok(Self {
            magic,
            version,
            flags,
            compressed_size,
        })
    }
}

/// 二进制报告的内容
#[derive(Debug, Serialize, Deserialize)]
struct ReportContent {
    generated_at: DateTime<Utc>,
    result: RunResult,
}

/// 保存为格式化的 JSON
pub fn save_json(result: &RunResult, path: &Path) -> Result<(), FileError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, result)?;
    tracing::info!("Saved JSON report to {}", path.display());
    Ok(())
}

pub fn load_json(path: &Path) -> Result<RunResult, FileError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// 保存为 `.zrb` 二进制报告
pub fn save_binary(result: &RunResult, path: &Path) -> Result<(), FileError> {
    let content = ReportContent {
        generated_at: Utc::now(),
        result: result.clone(),
    };

    let msgpack_data = rmp_serde::to_vec(&content)?;
    let compressed_data = zstd::encode_all(msgpack_data.as_slice(), COMPRESSION_LEVEL)?;
    let compressed_size = u32::try_from(compressed_data.len())
        .map_err(|_| FileError::InvalidFormat("Report too large".to_string()))?;

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    FileHeader::new(compressed_size).write(&mut writer)?;
    writer.write_all(&compressed_data)?;
    writer.flush()?;

    tracing::info!(
        "Saved {} bars in {} groups to {} ({} bytes compressed)",
        result.total_bars,
        result.groups.len(),
        path.display(),
        compressed_size
    );

    Ok(())
}

/// 读取 `.zrb` 二进制报告
pub fn load_binary(path: &Path) -> Result<RunResult, FileError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let header = FileHeader::read(&mut reader)?;
    if header.version > FORMAT_VERSION {
        return Err(FileError::UnsupportedVersion(format!(
            "File version {} is newer than supported version {}",
            header.version, FORMAT_VERSION
        )));
    }

    let mut compressed_data = vec![0u8; header.compressed_size as usize];
    reader.read_exact(&mut compressed_data)?;

    let msgpack_data = zstd::decode_all(compressed_data.as_slice())?;
    let content: ReportContent = rmp_serde::from_slice(&msgpack_data)?;

    tracing::debug!(
        "Loaded report generated at {} from {}",
        content.generated_at,
        path.display()
    );

    Ok(content.result)
}

/// 生成纯文本报告
pub fn format_report(result: &RunResult, generated_at: DateTime<Local>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ZRebar report  {}", generated_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out);
    for line in result.summary_lines() {
        let _ = writeln!(out, "{}", line);
    }

    if !result.groups.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{:<12}{:>12}{:>8}", "Axis", "Length", "Count");
        for group in &result.groups {
            let _ = writeln!(
                out,
                "{:<12}{:>12.2}{:>8}",
                group.axis.name(),
                group.length,
                group.repetition
            );
        }
    }
    out
}

/// 写出纯文本报告
pub fn write_text_report(result: &RunResult, path: &Path) -> Result<(), FileError> {
    std::fs::write(path, format_report(result, Local::now()))?;
    tracing::info!("Saved text report to {}", path.display());
    Ok(())
}
