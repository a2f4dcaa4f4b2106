use crate::models::task::ConversionOutcome;

/// 转换事件，按发出顺序被展示层消费
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionEvent {
    /// 人类可读的状态行
    Status(String),
    /// 单个文件的处理结果
    Outcome(ConversionOutcome),
    /// 进度百分比（0-100，单调不减）
    Progress(u8),
    /// 结束信号，每次运行恰好一次且总是最后一个事件
    Finished,
}

/// 一次运行的汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub converted: usize,
    pub skipped: usize,
    pub missing: usize,
    pub failed: usize,
    pub cancelled: usize,
    /// 导致整个运行提前结束的错误
    pub fatal: Option<String>,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &ConversionOutcome) {
        use crate::models::task::OutcomeStatus;

        match outcome.status {
            OutcomeStatus::Converted => self.converted += 1,
            OutcomeStatus::SourceMissing => self.missing += 1,
            OutcomeStatus::Skipped => self.skipped += 1,
            OutcomeStatus::Failed(_) => self.failed += 1,
            OutcomeStatus::Cancelled => self.cancelled += 1,
        }
    }

    /// 已产生结果的文件数
    pub fn outcomes(&self) -> usize {
        self.converted + self.skipped + self.missing + self.failed + self.cancelled
    }
}
