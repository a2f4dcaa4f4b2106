/// 进度状态
///
/// `total_count` 在扫描完成时固定，`completed_count` 不会超过它。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressState {
    completed_count: usize,
    total_count: usize,
}

impl ProgressState {
    pub fn new(total_count: usize) -> Self {
        Self {
            completed_count: 0,
            total_count,
        }
    }

    pub fn completed(&self) -> usize {
        self.completed_count
    }

    pub fn total(&self) -> usize {
        self.total_count
    }

    /// 完成一个文件，返回新的百分比
    pub fn advance(&mut self) -> u8 {
        if self.completed_count < self.total_count {
            self.completed_count += 1;
        }
        self.percent()
    }

    /// 向下取整的百分比；total 为 0 时视为已全部完成
    pub fn percent(&self) -> u8 {
        if self.total_count == 0 {
            return 100;
        }
        (self.completed_count * 100 / self.total_count) as u8
    }
}
