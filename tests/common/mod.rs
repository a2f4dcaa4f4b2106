//! 测试用的脚本化自动化服务
//!
//! 把"转换"实现为写一个文本文件，并记录每一次调用，
//! 可以按文件名让 open / save_as / close 失败、崩溃，或触发取消。

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use word_batch_convert::error::AutomationResult;
use word_batch_convert::{
    AutomationError, AutomationLauncher, AutomationSession, ConversionEvent, DocumentHandle,
    OutcomeStatus, SaveOptions,
};

/// 脚本：决定哪些调用失败
#[derive(Clone, Default)]
pub struct Script {
    pub fail_start: bool,
    /// 打开这些文件名时失败
    pub fail_open: HashSet<String>,
    /// 另存为这些目标文件名时失败
    pub fail_save: HashSet<String>,
    /// 关闭这些文件名时失败
    pub fail_close: HashSet<String>,
    /// 打开这些文件名时崩溃
    pub panic_on_open: HashSet<String>,
    /// 第一次打开文档时取消
    pub cancel_on_first_open: Option<CancellationToken>,
    /// 第一次打开文档时删除这个文件
    pub delete_on_first_open: Option<PathBuf>,
}

impl Script {
    pub fn fail_open(mut self, name: &str) -> Self {
        self.fail_open.insert(name.to_string());
        self
    }

    pub fn fail_save(mut self, name: &str) -> Self {
        self.fail_save.insert(name.to_string());
        self
    }

    pub fn fail_close(mut self, name: &str) -> Self {
        self.fail_close.insert(name.to_string());
        self
    }

    pub fn panic_on_open(mut self, name: &str) -> Self {
        self.panic_on_open.insert(name.to_string());
        self
    }
}

/// 调用记录
#[derive(Default)]
pub struct Journal {
    pub starts: AtomicUsize,
    pub quits: AtomicUsize,
    pub calls: Mutex<Vec<String>>,
}

impl Journal {
    pub fn quits(&self) -> usize {
        self.quits.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

pub struct ScriptedLauncher {
    script: Script,
    journal: Arc<Journal>,
}

impl ScriptedLauncher {
    pub fn new(script: Script) -> (Self, Arc<Journal>) {
        let journal = Arc::new(Journal::default());
        (
            Self {
                script,
                journal: journal.clone(),
            },
            journal,
        )
    }
}

#[async_trait]
impl AutomationLauncher for ScriptedLauncher {
    async fn start(&self) -> AutomationResult<Box<dyn AutomationSession>> {
        self.journal.starts.fetch_add(1, Ordering::SeqCst);
        if self.script.fail_start {
            return Err(AutomationError::launch("应用未安装"));
        }
        Ok(Box::new(ScriptedSession {
            script: self.script.clone(),
            journal: self.journal.clone(),
            next_id: 1,
            opened: 0,
        }))
    }
}

struct ScriptedSession {
    script: Script,
    journal: Arc<Journal>,
    next_id: u64,
    opened: usize,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[async_trait]
impl AutomationSession for ScriptedSession {
    async fn open(&mut self, path: &Path) -> AutomationResult<DocumentHandle> {
        let name = file_name(path);
        self.journal.push(format!("open {}", name));
        self.opened += 1;

        if self.opened == 1 {
            if let Some(token) = &self.script.cancel_on_first_open {
                token.cancel();
            }
            if let Some(victim) = &self.script.delete_on_first_open {
                let _ = std::fs::remove_file(victim);
            }
        }
        if self.script.panic_on_open.contains(&name) {
            panic!("automation crashed on {}", name);
        }
        if self.script.fail_open.contains(&name) || !path.exists() {
            return Err(AutomationError::open(path, "文档已损坏"));
        }

        let id = self.next_id;
        self.next_id += 1;
        Ok(DocumentHandle::new(id, path))
    }

    async fn save_as(
        &mut self,
        doc: &DocumentHandle,
        target: &Path,
        format_code: i32,
        _options: &SaveOptions,
    ) -> AutomationResult<()> {
        let name = file_name(target);
        self.journal
            .push(format!("save {} {}", name, format_code));

        if self.script.fail_save.contains(&name) {
            // 模拟写了一半的输出
            let _ = tokio::fs::write(target, b"partial").await;
            return Err(AutomationError::save(target, format_code, "磁盘已满"));
        }

        let content = format!("{} <- {}", format_code, doc.path.display());
        tokio::fs::write(target, content)
            .await
            .map_err(|e| AutomationError::save(target, format_code, e))
    }

    async fn close(&mut self, doc: DocumentHandle) -> AutomationResult<()> {
        let name = file_name(&doc.path);
        self.journal.push(format!("close {}", name));
        if self.script.fail_close.contains(&name) {
            return Err(AutomationError::close(&doc.path, "应用无响应"));
        }
        Ok(())
    }

    async fn quit(self: Box<Self>) -> AutomationResult<()> {
        self.journal.quits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// 在 `root` 下创建文件（自动创建父目录）
pub fn touch(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, b"word document").unwrap();
    path
}

pub fn progress_values(events: &[ConversionEvent]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            ConversionEvent::Progress(p) => Some(*p),
            _ => None,
        })
        .collect()
}

pub fn statuses(events: &[ConversionEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            ConversionEvent::Status(s) => Some(s.clone()),
            _ => None,
        })
        .collect()
}

pub fn outcome_statuses(events: &[ConversionEvent]) -> Vec<OutcomeStatus> {
    events
        .iter()
        .filter_map(|e| match e {
            ConversionEvent::Outcome(o) => Some(o.status.clone()),
            _ => None,
        })
        .collect()
}

/// 每次运行都应成立的性质
pub fn assert_run_invariants(events: &[ConversionEvent]) {
    assert_eq!(events.last(), Some(&ConversionEvent::Finished));
    assert_eq!(
        events
            .iter()
            .filter(|e| **e == ConversionEvent::Finished)
            .count(),
        1
    );
    let progress = progress_values(events);
    assert!(progress.windows(2).all(|w| w[0] <= w[1]), "{:?}", progress);
    assert!(progress.iter().all(|p| *p <= 100));
}

/// 目录树下所有指定扩展名的文件
pub fn files_with_extension(root: &Path, extension: &str) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().and_then(|e| e.to_str()) == Some(extension) {
                found.push(path);
            }
        }
    }
    found
}
