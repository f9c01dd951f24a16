pub mod accounts;
pub mod app;
pub mod config;
pub mod error;
pub mod journal;
pub mod pagination;
pub mod screening;
pub mod storage;
pub mod support;
pub mod telemetry;
