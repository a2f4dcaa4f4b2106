//! # Word Batch Convert
//!
//! 批量把目录树中的 Word 文档转换为 PDF / DOC / DOCX / RTF / TXT。
//! 实际的格式转换由外部文档应用完成，本库只负责编排调用、统计结果和管理中间文件。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（文档应用会话），只暴露 open / save_as / close / quit
//! - `SofficeLauncher` - LibreOffice 无头模式实现
//!
//! ### ② 业务能力层（Services）
//! - `discovery` - 递归扫描源目录
//! - `ReportWriter` - 写转换报告
//!
//! ### ③ 流程层（Workflow）
//! - `FileCtx` - 上下文封装（序号 + 源文件 + 目标路径）
//! - `FileFlow` - 单个文件的转换流程（单步 / 经 RTF 的两步）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量转换，管理会话、进度和事件
//! - `orchestrator/app` - 命令行前端
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, AutomationError};
pub use infrastructure::{AutomationLauncher, AutomationSession, DocumentHandle, SaveOptions};
pub use models::{
    ConversionEvent, ConversionJob, ConversionOptions, ConversionOutcome, FileTask, FormatSpec,
    OutcomeStatus, OutputKind, RunSummary, TextEncoding,
};
pub use orchestrator::{App, ConversionRun, Orchestrator};
pub use workflow::{FileCtx, FileFlow};
