pub mod health;
pub mod job;
