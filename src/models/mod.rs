pub mod loaders;
pub mod record;
pub mod session;
pub mod upload;

pub use loaders::{load_file, scan_folder};
pub use record::{ErrorRecord, OutputArtifact, ProcessResponse, RecordsResponse};
pub use session::{SessionState, WorkflowPhase};
pub use upload::{BatchKind, FileHandle, FileSource, UploadBatch};
