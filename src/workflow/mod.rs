pub mod controller;

pub use controller::{ActionOutcome, WorkflowController};
