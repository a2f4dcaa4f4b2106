//! 批量转换处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是转换引擎的核心，负责一次批量转换的完整生命周期。
//!
//! ## 核心功能
//!
//! 1. **会话管理**：启动唯一的自动化会话，任何退出路径上都会 quit
//! 2. **批量扫描**：扫描源目录，文件总数在此刻固定
//! 3. **串行处理**：逐个文件委托 `FileFlow`，单个失败不影响批次
//! 4. **进度统计**：每处理一个文件推进一次进度
//! 5. **事件输出**：状态行 / 结果 / 进度 / 结束信号，按顺序写入通道
//!
//! ## 设计特点
//!
//! - **单一后台任务**：整个运行在一个 tokio 任务中串行执行
//! - **不可重启**：`run` 消耗 `Orchestrator`，每次运行需新建实例
//! - **可取消**：在文件之间检查取消令牌，正在处理的文件总会完成

use std::panic::AssertUnwindSafe;

use futures::{FutureExt, Stream};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};
use crate::infrastructure::{AutomationLauncher, AutomationSession};
use crate::models::{
    resolve, ConversionEvent, ConversionJob, FileTask, OutcomeStatus, ProgressState, RunSummary,
};
use crate::services::discover;
use crate::workflow::{FileCtx, FileFlow};

/// 完成时的状态行
pub const COMPLETED_MESSAGE: &str = "转换完成!";

/// 转换编排器
pub struct Orchestrator<L> {
    launcher: L,
    cancel: CancellationToken,
}

impl<L> Orchestrator<L>
where
    L: AutomationLauncher + 'static,
{
    pub fn new(launcher: L) -> Self {
        Self {
            launcher,
            cancel: CancellationToken::new(),
        }
    }

    /// 使用外部的取消令牌
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 在后台任务中开始运行，立即返回事件接收端
    pub fn run(self, job: ConversionJob) -> ConversionRun {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Worker {
            launcher: self.launcher,
            cancel: self.cancel,
            events: tx,
        };
        let handle = tokio::spawn(worker.execute(job));
        ConversionRun { events: rx, handle }
    }
}

/// 一次正在进行的运行
pub struct ConversionRun {
    events: UnboundedReceiver<ConversionEvent>,
    handle: JoinHandle<RunSummary>,
}

impl ConversionRun {
    /// 下一个事件；`Finished` 之后返回 `None`
    pub async fn next_event(&mut self) -> Option<ConversionEvent> {
        self.events.recv().await
    }

    /// 转为事件流，后台任务继续运行直到结束
    pub fn into_stream(self) -> impl Stream<Item = ConversionEvent> {
        futures::stream::unfold(self.events, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        })
    }

    /// 消费全部事件并等待汇总
    pub async fn collect(mut self) -> AppResult<(Vec<ConversionEvent>, RunSummary)> {
        let mut events = Vec::new();
        while let Some(event) = self.events.recv().await {
            events.push(event);
        }
        let summary = self.wait().await?;
        Ok((events, summary))
    }

    /// 等待后台任务结束
    pub async fn wait(self) -> AppResult<RunSummary> {
        self.handle
            .await
            .map_err(|e| AppError::Other(format!("转换任务异常退出: {}", e)))
    }
}

/// 运行结束方式
enum Completion {
    Done,
    Cancelled { remaining: usize },
}

struct Worker<L> {
    launcher: L,
    cancel: CancellationToken,
    events: UnboundedSender<ConversionEvent>,
}

impl<L: AutomationLauncher> Worker<L> {
    fn emit(&self, event: ConversionEvent) {
        // 展示层已关闭时继续完成转换
        let _ = self.events.send(event);
    }

    fn status(&self, message: impl Into<String>) {
        self.emit(ConversionEvent::Status(message.into()));
    }

    async fn execute(self, job: ConversionJob) -> RunSummary {
        let mut summary = RunSummary::default();

        let mut session = match self.launcher.start().await {
            Ok(session) => session,
            Err(e) => {
                error!("❌ 无法启动文档应用: {}", e);
                self.status(format!("意外错误: {}", e));
                summary.fatal = Some(e.to_string());
                self.emit(ConversionEvent::Finished);
                return summary;
            }
        };

        let result = AssertUnwindSafe(self.process_all(session.as_mut(), &job, &mut summary))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(AppError::Other(panic_message(&*panic))));

        if let Err(e) = session.quit().await {
            warn!("⚠️ {}", e);
        }

        match result {
            Ok(Completion::Done) => {
                info!("✅ {}", COMPLETED_MESSAGE);
                self.status(COMPLETED_MESSAGE);
            }
            Ok(Completion::Cancelled { remaining }) => {
                warn!("⚠️ 转换已取消，{} 个文件未处理", remaining);
                self.status(format!("转换已取消，{} 个文件未处理", remaining));
            }
            Err(e) => {
                error!("❌ 意外错误: {}", e);
                self.status(format!("意外错误: {}", e));
                summary.fatal = Some(e.to_string());
            }
        }

        self.emit(ConversionEvent::Finished);
        summary
    }

    async fn process_all(
        &self,
        session: &mut dyn AutomationSession,
        job: &ConversionJob,
        summary: &mut RunSummary,
    ) -> AppResult<Completion> {
        info!("📁 正在扫描: {}", job.source_root.display());
        let tasks = exclude_target_tree(discover(&job.source_root).await?, job);

        let total = tasks.len();
        summary.total = total;
        let mut progress = ProgressState::new(total);
        info!("✓ 找到 {} 个待转换的文档，目标格式 {}", total, job.output_kind);

        if total == 0 {
            self.emit(ConversionEvent::Progress(progress.percent()));
            return Ok(Completion::Done);
        }

        let flow = FileFlow::new(resolve(job.output_kind), &job.options);
        let extension = flow.spec().extension;

        for (index, task) in tasks.into_iter().enumerate() {
            let target_path = task.target_path(&job.target_root, extension);
            let ctx = FileCtx::new(index + 1, total, task, target_path);

            if self.cancel.is_cancelled() {
                let outcome = ctx.outcome(OutcomeStatus::Cancelled);
                summary.record(&outcome);
                self.emit(ConversionEvent::Outcome(outcome));
                continue;
            }

            let prepared = flow.prepare_target(&ctx).await;

            info!(
                "{} 正在转换: {} -> {}",
                ctx,
                ctx.task.source_path.display(),
                ctx.target_path.display()
            );
            self.status(format!(
                "正在转换: {} -> {}",
                ctx.task.source_path.display(),
                ctx.target_path.display()
            ));

            let outcome = match prepared {
                Ok(()) => flow.run(session, &ctx).await,
                Err(reason) => {
                    error!("{} ❌ {}", ctx, reason);
                    ctx.outcome(OutcomeStatus::Failed(reason))
                }
            };

            if !outcome.is_converted() {
                self.status(outcome.to_string());
            }
            summary.record(&outcome);
            self.emit(ConversionEvent::Outcome(outcome));
            self.emit(ConversionEvent::Progress(progress.advance()));
        }

        if summary.cancelled > 0 {
            return Ok(Completion::Cancelled {
                remaining: summary.cancelled,
            });
        }
        Ok(Completion::Done)
    }
}

/// 目标目录位于源目录内部时，排除目标目录中的文件
fn exclude_target_tree(mut tasks: Vec<FileTask>, job: &ConversionJob) -> Vec<FileTask> {
    if job.target_root != job.source_root && job.target_root.starts_with(&job.source_root) {
        tasks.retain(|task| !task.source_path.starts_with(&job.target_root));
    }
    tasks
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        format!("转换任务崩溃: {}", msg)
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        format!("转换任务崩溃: {}", msg)
    } else {
        "转换任务崩溃".to_string()
    }
}
