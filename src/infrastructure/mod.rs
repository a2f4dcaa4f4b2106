//! 基础设施层
//!
//! 只有这一层认识外部文档应用，上层只依赖 `AutomationLauncher` / `AutomationSession`。

pub mod automation;
pub mod soffice;

pub use automation::{AutomationLauncher, AutomationSession, DocumentHandle, SaveOptions};
pub use soffice::{SofficeLauncher, SofficeSession};
