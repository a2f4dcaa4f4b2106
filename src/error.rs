use std::path::PathBuf;

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文档自动化服务错误
    #[error("自动化服务错误: {0}")]
    Automation(#[from] AutomationError),
    /// 文件扫描错误
    #[error("文件扫描错误: {0}")]
    Discovery(#[from] DiscoveryError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// 文档自动化服务错误
///
/// 每个变体对应自动化端口的一个操作，`reason` 保留底层错误文本，
/// 用于写入状态消息。
#[derive(Debug, Error)]
pub enum AutomationError {
    /// 无法启动外部文档应用
    #[error("无法启动文档应用: {reason}")]
    Launch { reason: String },
    /// 打开文档失败
    #[error("无法打开文档 {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },
    /// 另存为（格式转换）失败
    #[error("另存为 {} 失败 (格式代码 {format_code}): {reason}", target.display())]
    Save {
        target: PathBuf,
        format_code: i32,
        reason: String,
    },
    /// 关闭文档失败
    #[error("关闭文档 {} 失败: {reason}", path.display())]
    Close { path: PathBuf, reason: String },
    /// 退出会话失败
    #[error("退出文档应用失败: {reason}")]
    Quit { reason: String },
}

/// 文件扫描错误
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// 源目录不存在
    #[error("源目录不存在: {}", .0.display())]
    RootNotFound(PathBuf),
    /// 源路径不是目录
    #[error("源路径不是目录: {}", .0.display())]
    NotADirectory(PathBuf),
    /// 读取目录失败
    #[error("无法读取目录 {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 未设置源目录
    #[error("未设置源目录 (SOURCE_FOLDER 或命令行参数)")]
    MissingSourceFolder,
    /// 配置文件读取失败
    #[error("无法读取配置文件 {}: {source}", path.display())]
    SettingsReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("配置文件 {} 解析失败: {source}", path.display())]
    SettingsParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl AutomationError {
    /// 创建启动失败错误
    pub fn launch(reason: impl ToString) -> Self {
        AutomationError::Launch {
            reason: reason.to_string(),
        }
    }

    /// 创建打开失败错误
    pub fn open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        AutomationError::Open {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// 创建另存为失败错误
    pub fn save(target: impl Into<PathBuf>, format_code: i32, reason: impl ToString) -> Self {
        AutomationError::Save {
            target: target.into(),
            format_code,
            reason: reason.to_string(),
        }
    }

    /// 创建关闭失败错误
    pub fn close(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        AutomationError::Close {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

/// 自动化端口结果类型
pub type AutomationResult<T> = Result<T, AutomationError>;
