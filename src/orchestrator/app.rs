//! 命令行前端
//!
//! 展示层的最小实现：只消费事件，不直接调用自动化端口。

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::infrastructure::SofficeLauncher;
use crate::models::{ConversionEvent, ConversionJob, RunSummary};
use crate::orchestrator::batch_processor::Orchestrator;
use crate::services::ReportWriter;
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    job: ConversionJob,
    report: ReportWriter,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(&config);

        let job = config.to_job().context("无法创建转换任务")?;

        tokio::fs::create_dir_all(&job.target_root)
            .await
            .with_context(|| format!("无法创建输出目录: {}", job.target_root.display()))?;
        let job = canonical_roots(job).await;

        let report = ReportWriter::new(&config.output_log_file);
        report
            .init(&job.source_root, &job.target_root, job.output_kind.name())
            .await?;

        Ok(Self {
            config,
            job,
            report,
        })
    }

    /// 运行转换并等待结束；Ctrl+C 会在当前文件完成后取消
    pub async fn run(&self) -> Result<RunSummary> {
        let launcher = SofficeLauncher::new(&self.config.soffice_path)
            .with_timeout(Duration::from_secs(self.config.command_timeout_secs));
        let orchestrator = Orchestrator::new(launcher);
        let cancel = orchestrator.cancellation_token();

        let mut run = orchestrator.run(self.job.clone());
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            let event = tokio::select! {
                event = run.next_event() => event,
                _ = &mut ctrl_c, if !cancel.is_cancelled() => {
                    warn!("⛔ 收到中断信号，当前文件完成后停止");
                    cancel.cancel();
                    continue;
                }
            };

            match event {
                Some(ConversionEvent::Status(line)) => {
                    info!("{}", logging::truncate_text(&line, 300));
                }
                Some(ConversionEvent::Outcome(outcome)) => {
                    if let Err(e) = self.report.record(&outcome).await {
                        warn!("⚠️ 写入报告失败: {}", e);
                    }
                }
                Some(ConversionEvent::Progress(percent)) => {
                    debug!("进度: {}%", percent);
                }
                Some(ConversionEvent::Finished) | None => break,
            }
        }

        let summary = run.wait().await?;
        if let Some(fatal) = &summary.fatal {
            self.report.append(&format!("运行中止: {}\n", fatal)).await?;
        }

        logging::print_final_stats(&summary, &self.config.output_log_file);
        Ok(summary)
    }
}

/// 源目录和目标目录统一为绝对路径，嵌套目标的排除依赖路径前缀比较
///
/// 源目录不存在时保持原样，由扫描阶段报告错误。
async fn canonical_roots(mut job: ConversionJob) -> ConversionJob {
    if let Ok(source) = tokio::fs::canonicalize(&job.source_root).await {
        job.source_root = source;
    }
    if let Ok(target) = tokio::fs::canonicalize(&job.target_root).await {
        job.target_root = target;
    }
    job
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OutputKind;
    use tempfile::TempDir;

    #[tokio::test]
    async fn roots_are_compared_in_canonical_form() {
        let dir = TempDir::new().unwrap();
        tokio::fs::create_dir_all(dir.path().join("sub/out")).await.unwrap();

        // 同一个目录的两种写法，原样比较时前缀不匹配
        let source = dir.path().join("sub/../sub");
        let target = dir.path().join("sub/out");
        assert!(!target.starts_with(&source));

        let job = canonical_roots(ConversionJob::new(&source, &target, OutputKind::Pdf)).await;
        assert!(job.target_root.starts_with(&job.source_root));
        assert!(job.source_root.is_absolute());
    }

    #[tokio::test]
    async fn missing_source_is_left_for_discovery() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("absent");
        let job = canonical_roots(ConversionJob::new(&source, dir.path(), OutputKind::Pdf)).await;
        assert_eq!(job.source_root, source);
    }
}
