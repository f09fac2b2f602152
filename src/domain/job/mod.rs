pub mod dto;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod registry;
pub mod runner;
pub mod segmenter;

pub use dto::{GenerateRequest, GenerateResponse, ResultFailedResponse, ResultPendingResponse, StatusResponse};
pub use error::JobError;
pub use model::{Job, JobId, JobIdPolicy, JobSnapshot, JobStatus};
pub use pipeline::Pipeline;
pub use registry::{JobRegistry, Registration, SweepReport};
pub use runner::{JobRunner, Submission};
pub use segmenter::segment;
