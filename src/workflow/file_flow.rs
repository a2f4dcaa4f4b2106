//! 文件转换流程 - 流程层
//!
//! 核心职责：定义"一个文件"的完整转换流程
//!
//! 流程顺序：
//! 1. 源文件是否仍存在 → 否则 SourceMissing
//! 2. 目标是否已存在且不允许覆盖 → Skipped
//! 3. 单步：open → save_as → close
//! 4. 两步（TXT）：open → save_as(RTF 中间文件) → close → open 中间文件 → save_as(TXT) → close → 删除中间文件
//!
//! 所有失败都变成 `OutcomeStatus::Failed`，不会向上传播。
//! 失败时删除本次新写出的目标文件，已存在的目标不动。

use std::path::Path;

use tokio::fs;
use tracing::{debug, error, info, warn};

use crate::error::AutomationResult;
use crate::infrastructure::{AutomationSession, SaveOptions};
use crate::models::format::INTERMEDIATE_SPEC;
use crate::models::{ConversionOptions, ConversionOutcome, FormatSpec, OutcomeStatus};
use crate::workflow::file_ctx::FileCtx;

/// 文件转换流程
///
/// - 不持有会话，由调用方借出
/// - 只处理单个文件
pub struct FileFlow {
    spec: FormatSpec,
    save_options: SaveOptions,
    overwrite_files: bool,
}

impl FileFlow {
    pub fn new(spec: FormatSpec, options: &ConversionOptions) -> Self {
        Self {
            spec,
            save_options: SaveOptions {
                pdf_quality: options.pdf_quality,
                txt_encoding: options.txt_encoding,
            },
            overwrite_files: options.overwrite_files,
        }
    }

    pub fn spec(&self) -> FormatSpec {
        self.spec
    }

    /// 创建目标目录
    pub async fn prepare_target(&self, ctx: &FileCtx) -> Result<(), String> {
        let Some(parent) = ctx.target_path.parent() else {
            return Ok(());
        };
        fs::create_dir_all(parent)
            .await
            .map_err(|e| format!("无法创建目录 {}: {}", parent.display(), e))
    }

    pub async fn run(&self, session: &mut dyn AutomationSession, ctx: &FileCtx) -> ConversionOutcome {
        let source = &ctx.task.source_path;

        if !fs::try_exists(source).await.unwrap_or(false) {
            warn!("{} ⚠️ 源文件不存在: {}", ctx, source.display());
            return ctx.outcome(OutcomeStatus::SourceMissing);
        }

        let target_existed = fs::try_exists(&ctx.target_path).await.unwrap_or(false);
        if !self.overwrite_files && target_existed {
            info!("{} 目标已存在，跳过: {}", ctx, ctx.target_path.display());
            return ctx.outcome(OutcomeStatus::Skipped);
        }

        let result = if self.spec.two_stage {
            self.convert_two_stage(session, ctx).await
        } else {
            self.convert_once(session, source, &ctx.target_path, self.spec.automation_code)
                .await
                .map_err(|e| e.to_string())
        };

        match result {
            Ok(()) => {
                info!("{} ✓ 转换成功: {}", ctx, ctx.target_path.display());
                ctx.outcome(OutcomeStatus::Converted)
            }
            Err(reason) => {
                error!("{} ❌ 转换失败: {}", ctx, reason);
                // 只删除本次写出的残缺目标
                if !target_existed {
                    if let Err(cleanup) = remove_if_exists(&ctx.target_path).await {
                        warn!("{} ⚠️ {}", ctx, cleanup);
                    }
                }
                ctx.outcome(OutcomeStatus::Failed(reason))
            }
        }
    }

    /// 两步转换，无论成败都删除中间文件
    async fn convert_two_stage(
        &self,
        session: &mut dyn AutomationSession,
        ctx: &FileCtx,
    ) -> Result<(), String> {
        let intermediate = ctx.intermediate_path();
        debug!("{} 中间文件: {}", ctx, intermediate.display());

        let first = self
            .convert_once(
                session,
                &ctx.task.source_path,
                &intermediate,
                INTERMEDIATE_SPEC.automation_code,
            )
            .await;
        let converted = match first {
            Ok(()) => {
                self.convert_once(
                    session,
                    &intermediate,
                    &ctx.target_path,
                    self.spec.automation_code,
                )
                .await
            }
            Err(e) => Err(e),
        }
        .map_err(|e| e.to_string());

        let cleaned = remove_if_exists(&intermediate).await;

        match (converted, cleaned) {
            (Err(reason), Err(cleanup)) => {
                warn!("{} ⚠️ {}", ctx, cleanup);
                Err(reason)
            }
            (Err(reason), Ok(())) => Err(reason),
            (Ok(()), Err(cleanup)) => Err(cleanup),
            (Ok(()), Ok(())) => Ok(()),
        }
    }

    /// open → save_as → close；save_as 失败时仍然关闭文档
    async fn convert_once(
        &self,
        session: &mut dyn AutomationSession,
        source: &Path,
        target: &Path,
        format_code: i32,
    ) -> AutomationResult<()> {
        let doc = session.open(source).await?;
        let saved = session
            .save_as(&doc, target, format_code, &self.save_options)
            .await;
        let closed = session.close(doc).await;

        match (saved, closed) {
            (Err(e), Err(close_err)) => {
                warn!("关闭文档失败（另存为已失败）: {}", close_err);
                Err(e)
            }
            (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
            (Ok(()), Ok(())) => Ok(()),
        }
    }
}

async fn remove_if_exists(path: &Path) -> Result<(), String> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(format!("无法删除 {}: {}", path.display(), e)),
    }
}
