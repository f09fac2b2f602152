pub mod backend;
pub mod error;
pub mod format;
pub mod manager;

pub use backend::TtsBackend;
pub use error::TtsError;
pub use format::AudioFormat;
pub use manager::TtsManager;
