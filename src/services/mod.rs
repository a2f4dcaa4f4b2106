pub mod discovery;
pub mod report_writer;

pub use discovery::discover;
pub use report_writer::ReportWriter;
