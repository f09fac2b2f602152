pub mod audio;
pub mod config;
pub mod http;
pub mod process;
pub mod repositories;
pub mod storage;
