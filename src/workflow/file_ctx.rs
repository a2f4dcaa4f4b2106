//! 文件处理上下文
//!
//! 封装"我正在处理第几个文件、它要写到哪里"这一信息

use std::fmt::Display;
use std::path::PathBuf;

use crate::models::format::INTERMEDIATE_SPEC;
use crate::models::{ConversionOutcome, FileTask, OutcomeStatus};

/// 文件处理上下文
#[derive(Debug, Clone)]
pub struct FileCtx {
    /// 文件序号（从1开始，仅用于日志显示）
    pub index: usize,

    /// 文件总数
    pub total: usize,

    pub task: FileTask,

    /// 最终目标路径
    pub target_path: PathBuf,
}

impl FileCtx {
    pub fn new(index: usize, total: usize, task: FileTask, target_path: PathBuf) -> Self {
        Self {
            index,
            total,
            task,
            target_path,
        }
    }

    /// 两步转换的中间文件：与目标同目录，`<stem>.stage.rtf`
    pub fn intermediate_path(&self) -> PathBuf {
        self.target_path
            .with_extension(format!("stage.{}", INTERMEDIATE_SPEC.extension))
    }

    /// 用当前文件生成结果
    pub fn outcome(&self, status: OutcomeStatus) -> ConversionOutcome {
        ConversionOutcome::new(self.task.clone(), self.target_path.clone(), status)
    }
}

impl Display for FileCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文件 {}/{}]", self.index, self.total)
    }
}
