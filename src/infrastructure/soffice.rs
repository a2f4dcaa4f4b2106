//! LibreOffice 无头模式适配器 - 基础设施层
//!
//! 通过 `soffice --headless --convert-to` 实现自动化端口。
//! soffice 只能输出到目录，所以先写入会话私有的暂存目录，再移动到目标路径。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{AutomationError, AutomationResult};
use crate::infrastructure::automation::{
    AutomationLauncher, AutomationSession, DocumentHandle, SaveOptions,
};
use crate::models::TextEncoding;

/// soffice 启动器
#[derive(Debug, Clone)]
pub struct SofficeLauncher {
    binary: PathBuf,
    timeout: Duration,
}

impl SofficeLauncher {
    /// 单个命令的默认超时
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl AutomationLauncher for SofficeLauncher {
    async fn start(&self) -> AutomationResult<Box<dyn AutomationSession>> {
        info!("🚀 启动文档应用: {}", self.binary.display());

        let mut cmd = Command::new(&self.binary);
        cmd.arg("--version").kill_on_drop(true);
        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| AutomationError::launch("启动超时"))?
            .map_err(AutomationError::launch)?;

        if !output.status.success() {
            return Err(AutomationError::launch(format!(
                "{} 退出码 {:?}: {}",
                self.binary.display(),
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        debug!(
            "文档应用版本: {}",
            String::from_utf8_lossy(&output.stdout).trim()
        );

        let staging = TempDir::new().map_err(AutomationError::launch)?;
        let profile = TempDir::new().map_err(AutomationError::launch)?;

        Ok(Box::new(SofficeSession {
            binary: self.binary.clone(),
            timeout: self.timeout,
            profile_url: file_url(profile.path()),
            staging,
            profile,
            open_docs: HashMap::new(),
            next_id: 1,
        }))
    }
}

/// soffice 会话
///
/// 使用独立的用户配置目录，避免与用户正在运行的实例冲突。
pub struct SofficeSession {
    binary: PathBuf,
    timeout: Duration,
    profile_url: String,
    staging: TempDir,
    profile: TempDir,
    open_docs: HashMap<u64, PathBuf>,
    next_id: u64,
}

impl SofficeSession {
    async fn convert(&self, source: &Path, filter: &str) -> Result<(), String> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--headless")
            .arg("--norestore")
            .arg(format!("-env:UserInstallation={}", self.profile_url))
            .arg("--convert-to")
            .arg(filter)
            .arg("--outdir")
            .arg(self.staging.path())
            .arg(source)
            .kill_on_drop(true);

        debug!("执行转换: {:?}", cmd.as_std());

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| format!("转换超时 ({} 秒)", self.timeout.as_secs()))?
            .map_err(|e| e.to_string())?;

        if output.status.success() {
            Ok(())
        } else {
            Err(format!(
                "退出码 {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            ))
        }
    }
}

#[async_trait]
impl AutomationSession for SofficeSession {
    async fn open(&mut self, path: &Path) -> AutomationResult<DocumentHandle> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| AutomationError::open(path, e))?;
        if !metadata.is_file() {
            return Err(AutomationError::open(path, "不是文件"));
        }

        let id = self.next_id;
        self.next_id += 1;
        self.open_docs.insert(id, path.to_path_buf());
        debug!("打开文档 #{}: {}", id, path.display());

        Ok(DocumentHandle::new(id, path))
    }

    async fn save_as(
        &mut self,
        doc: &DocumentHandle,
        target: &Path,
        format_code: i32,
        options: &SaveOptions,
    ) -> AutomationResult<()> {
        let source = self
            .open_docs
            .get(&doc.id)
            .cloned()
            .ok_or_else(|| AutomationError::save(target, format_code, "文档未打开"))?;

        let (extension, filter) = export_filter(format_code, options)
            .ok_or_else(|| AutomationError::save(target, format_code, "不支持的格式代码"))?;

        let stem = source
            .file_stem()
            .ok_or_else(|| AutomationError::save(target, format_code, "源文件名无效"))?;
        let mut file_name = stem.to_os_string();
        file_name.push(".");
        file_name.push(extension);
        let produced = self.staging.path().join(file_name);

        // 清掉同名旧产物，否则 soffice 静默失败时会被当成本次输出
        discard_staged(&produced).await;

        self.convert(&source, &filter)
            .await
            .map_err(|reason| AutomationError::save(target, format_code, reason))?;

        if !produced.exists() {
            return Err(AutomationError::save(
                target,
                format_code,
                "文档应用未生成输出文件",
            ));
        }

        deliver_staged(&produced, target)
            .await
            .map_err(|e| AutomationError::save(target, format_code, e))
    }

    async fn close(&mut self, doc: DocumentHandle) -> AutomationResult<()> {
        match self.open_docs.remove(&doc.id) {
            Some(_) => Ok(()),
            None => Err(AutomationError::close(doc.path, "文档未打开")),
        }
    }

    async fn quit(self: Box<Self>) -> AutomationResult<()> {
        let SofficeSession {
            staging,
            profile,
            open_docs,
            ..
        } = *self;

        if !open_docs.is_empty() {
            warn!("退出时仍有 {} 个文档未关闭", open_docs.len());
        }

        staging.close().map_err(|e| AutomationError::Quit {
            reason: e.to_string(),
        })?;
        profile.close().map_err(|e| AutomationError::Quit {
            reason: e.to_string(),
        })?;
        info!("✓ 文档应用已退出");
        Ok(())
    }
}

/// 把暂存产物复制到目标，无论成败都删除暂存文件
async fn deliver_staged(produced: &Path, target: &Path) -> std::io::Result<()> {
    // 暂存目录可能与目标不在同一文件系统，不能直接 rename
    let copied = tokio::fs::copy(produced, target).await;
    discard_staged(produced).await;
    copied.map(|_| ())
}

async fn discard_staged(produced: &Path) {
    match tokio::fs::remove_file(produced).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("无法清理暂存文件 {}: {}", produced.display(), e),
    }
}

/// 格式代码 → (输出扩展名, soffice 导出过滤器)
pub fn export_filter(format_code: i32, options: &SaveOptions) -> Option<(&'static str, String)> {
    let filter = match format_code {
        17 => (
            "pdf",
            format!(
                "pdf:writer_pdf_Export:{}",
                json!({ "Quality": { "type": "long", "value": options.pdf_quality.to_string() } })
            ),
        ),
        0 => ("doc", "doc:MS Word 97".to_string()),
        12 => ("docx", "docx:MS Word 2007 XML".to_string()),
        6 => ("rtf", "rtf:Rich Text Format".to_string()),
        2 => {
            let charset = match options.txt_encoding {
                TextEncoding::Utf8 => "UTF8",
                TextEncoding::Latin1 => "ISO-8859-1",
            };
            ("txt", format!("txt:Text (encoded):{}", charset))
        }
        _ => return None,
    };
    Some(filter)
}

fn file_url(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    if raw.starts_with('/') {
        format!("file://{}", raw)
    } else {
        format!("file:///{}", raw)
    }
}
