//! 转换报告写入服务 - 业务能力层
//!
//! 只负责"写报告文件"能力：运行开始写表头，之后追加未成功的文件。

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::models::{ConversionOutcome, OutcomeStatus};

/// 报告写入服务
pub struct ReportWriter {
    report_path: PathBuf,
}

impl ReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            report_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.report_path
    }

    /// 覆盖写入报告表头
    pub async fn init(&self, source: &Path, target: &Path, format: &str) -> Result<()> {
        let header = format!(
            "{}\n文档转换日志 - {}\n源目录: {}\n目标目录: {}\n目标格式: {}\n{}\n\n",
            "=".repeat(60),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            source.display(),
            target.display(),
            format,
            "=".repeat(60)
        );
        fs::write(&self.report_path, header)
            .await
            .with_context(|| format!("无法写入报告文件: {}", self.report_path.display()))
    }

    /// 追加一条结果；成功转换的文件不写入
    pub async fn record(&self, outcome: &ConversionOutcome) -> Result<()> {
        if outcome.status == OutcomeStatus::Converted {
            return Ok(());
        }
        debug!("写入报告: {}", outcome);
        self.append(&format!("{}\n", outcome)).await
    }

    /// 追加一行文本
    pub async fn append(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.report_path)
            .await
            .with_context(|| format!("无法打开报告文件: {}", self.report_path.display()))?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
