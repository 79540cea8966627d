pub mod aggregation_view;
pub mod file_ingestor;
pub mod progress_presenter;
pub mod report_writer;

pub use aggregation_view::{AggregationGroup, AggregationView};
pub use file_ingestor::FileIngestor;
pub use progress_presenter::{ProgressPresenter, StatusLine};
pub use report_writer::ReportWriter;
