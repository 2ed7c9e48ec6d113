pub mod config;
pub mod engine;
pub mod init;
pub mod scheduler;
pub mod storage;
