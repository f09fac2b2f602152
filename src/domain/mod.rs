pub mod job;
pub mod tts;
