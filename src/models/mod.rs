pub mod event;
pub mod format;
pub mod job;
pub mod progress;
pub mod task;

pub use event::{ConversionEvent, RunSummary};
pub use format::{resolve, resolve_code, FormatSpec};
pub use job::{ConversionJob, ConversionOptions, OutputKind, TextEncoding};
pub use progress::ProgressState;
pub use task::{ConversionOutcome, FileTask, OutcomeStatus};
