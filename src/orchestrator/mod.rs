//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个转换引擎的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量转换处理器
//! - 启动并独占唯一的自动化会话，保证任何退出路径都会释放
//! - 扫描源目录，固定文件总数
//! - 串行遍历文件，委托 `workflow::FileFlow`
//! - 推进进度，输出有序事件
//!
//! ### `app` - 命令行前端
//! - 从配置生成任务
//! - 消费事件：记录日志、写报告、输出统计
//!
//! ## 层次关系
//!
//! ```text
//! app (消费事件)
//!     ↓
//! batch_processor (处理 Vec<FileTask>)
//!     ↓
//! workflow::FileFlow (处理单个文件)
//!     ↓
//! services (能力层：discovery / report)
//!     ↓
//! infrastructure (基础设施：AutomationSession)
//! ```

pub mod app;
pub mod batch_processor;

// 重新导出主要类型
pub use app::App;
pub use batch_processor::{ConversionRun, Orchestrator, COMPLETED_MESSAGE};
