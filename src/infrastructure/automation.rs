//! 文档自动化端口 - 基础设施层
//!
//! 持有稀缺资源（外部文档应用会话），只暴露 open / save_as / close / quit 能力。
//! 会话不是线程安全的：每次运行只启动一个会话，由编排层独占。

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::AutomationResult;
use crate::models::TextEncoding;

/// 已打开文档的句柄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    /// 会话内唯一编号
    pub id: u64,
    /// 文档路径
    pub path: PathBuf,
}

impl DocumentHandle {
    pub fn new(id: u64, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            path: path.into(),
        }
    }
}

/// 另存为时附带的导出参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    pub pdf_quality: u8,
    pub txt_encoding: TextEncoding,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            pdf_quality: 90,
            txt_encoding: TextEncoding::Utf8,
        }
    }
}

/// 启动器：负责创建会话
#[async_trait]
pub trait AutomationLauncher: Send + Sync {
    /// 启动外部文档应用，失败时返回 `AutomationError::Launch`
    async fn start(&self) -> AutomationResult<Box<dyn AutomationSession>>;
}

/// 一个活动的自动化会话
///
/// 所有操作都是阻塞语义：调用方必须串行地逐个等待。
#[async_trait]
pub trait AutomationSession: Send {
    /// 打开文档
    async fn open(&mut self, path: &Path) -> AutomationResult<DocumentHandle>;

    /// 将文档按格式代码另存为 `target`
    async fn save_as(
        &mut self,
        doc: &DocumentHandle,
        target: &Path,
        format_code: i32,
        options: &SaveOptions,
    ) -> AutomationResult<()>;

    /// 关闭文档；此前的操作失败后也可以调用
    async fn close(&mut self, doc: DocumentHandle) -> AutomationResult<()>;

    /// 退出会话，每个成功启动的会话恰好调用一次
    async fn quit(self: Box<Self>) -> AutomationResult<()>;
}
