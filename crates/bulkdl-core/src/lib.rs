pub mod config;
pub mod logging;

pub mod fetch;
pub mod scheduler;
pub mod storage;
pub mod task;
pub mod url_model;
