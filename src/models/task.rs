use std::fmt;
use std::path::{Path, PathBuf};

/// 待转换文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    /// 源文件绝对路径
    pub source_path: PathBuf,
    /// 相对于源目录的路径，用于在目标目录中镜像目录结构
    pub relative_path: PathBuf,
}

impl FileTask {
    pub fn new(source_path: impl Into<PathBuf>, relative_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            relative_path: relative_path.into(),
        }
    }

    /// 计算目标路径：target_root / relative_path，扩展名替换为 `extension`
    pub fn target_path(&self, target_root: &Path, extension: &str) -> PathBuf {
        target_root.join(&self.relative_path).with_extension(extension)
    }
}

/// 单个文件的处理状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// 转换成功
    Converted,
    /// 源文件在扫描后消失
    SourceMissing,
    /// 目标已存在且未开启覆盖
    Skipped,
    /// 转换失败，携带底层原因
    Failed(String),
    /// 运行被取消，未处理
    Cancelled,
}

/// 单个文件的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOutcome {
    pub file: FileTask,
    /// 目标路径
    pub target_path: PathBuf,
    pub status: OutcomeStatus,
}

impl ConversionOutcome {
    pub fn new(file: FileTask, target_path: PathBuf, status: OutcomeStatus) -> Self {
        Self {
            file,
            target_path,
            status,
        }
    }

    pub fn is_converted(&self) -> bool {
        self.status == OutcomeStatus::Converted
    }
}

impl fmt::Display for ConversionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = self.file.source_path.display();
        match &self.status {
            OutcomeStatus::Converted => {
                write!(f, "已转换: {} -> {}", source, self.target_path.display())
            }
            OutcomeStatus::SourceMissing => write!(f, "未找到: {}", source),
            OutcomeStatus::Skipped => {
                write!(f, "目标已存在，跳过: {}", self.target_path.display())
            }
            OutcomeStatus::Failed(reason) => write!(f, "转换 {} 时出错: {}", source, reason),
            OutcomeStatus::Cancelled => write!(f, "已取消: {}", source),
        }
    }
}
