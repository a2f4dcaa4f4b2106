//! 文件扫描服务 - 业务能力层
//!
//! 递归扫描源目录，找出所有 Word 文档。
//! 顺序为目录遍历顺序（先当前目录的文件，再依次深入子目录），不排序。

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use crate::error::DiscoveryError;
use crate::models::FileTask;

/// 支持的源文件后缀（区分大小写）
pub const SOURCE_SUFFIXES: [&str; 2] = [".docx", ".doc"];

/// 文件名是否为可转换的 Word 文档
pub fn is_eligible(file_name: &str) -> bool {
    SOURCE_SUFFIXES
        .iter()
        .any(|suffix| file_name.ends_with(suffix))
}

/// 扫描源目录下所有可转换的文档
///
/// 没有匹配文件时返回空列表。源目录本身无法读取时返回错误；
/// 子目录读取失败只记录警告并跳过。
pub async fn discover(source_root: &Path) -> Result<Vec<FileTask>, DiscoveryError> {
    let metadata = fs::metadata(source_root)
        .await
        .map_err(|_| DiscoveryError::RootNotFound(source_root.to_path_buf()))?;
    if !metadata.is_dir() {
        return Err(DiscoveryError::NotADirectory(source_root.to_path_buf()));
    }

    let mut tasks = Vec::new();
    let mut pending = vec![source_root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let (files, subdirs) = match read_dir_split(&dir).await {
            Ok(split) => split,
            Err(e) if dir.as_path() == source_root => return Err(e),
            Err(e) => {
                warn!("⚠️ 跳过无法读取的目录: {}", e);
                continue;
            }
        };

        for path in files {
            let eligible = path
                .file_name()
                .map(|name| is_eligible(&name.to_string_lossy()))
                .unwrap_or(false);
            if !eligible {
                continue;
            }
            // 所有路径都由 source_root 拼接而来，strip_prefix 不会失败
            let relative = path
                .strip_prefix(source_root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.clone());
            debug!("发现文档: {}", relative.display());
            tasks.push(FileTask::new(path, relative));
        }

        // 逆序入栈，保证按读取顺序深入子目录
        pending.extend(subdirs.into_iter().rev());
    }

    Ok(tasks)
}

/// 读取一个目录，拆分为文件列表和子目录列表
///
/// 指向目录的符号链接不会被深入，指向文件的符号链接按文件处理。
async fn read_dir_split(dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>), DiscoveryError> {
    let read_err = |source| DiscoveryError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir).await.map_err(read_err)?;
    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
        let path = entry.path();
        let file_type = match entry.file_type().await {
            Ok(file_type) => file_type,
            Err(e) => {
                warn!("⚠️ 无法读取文件类型 {}: {}", path.display(), e);
                continue;
            }
        };

        if file_type.is_dir() {
            subdirs.push(path);
        } else if file_type.is_file() {
            files.push(path);
        } else if file_type.is_symlink() {
            if let Ok(target) = fs::metadata(&path).await {
                if target.is_file() {
                    files.push(path);
                }
            }
        }
    }

    Ok((files, subdirs))
}
