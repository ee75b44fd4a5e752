pub mod config;
pub mod logging;

pub mod auth;
pub mod category;
pub mod checksum;
pub mod error;
pub mod history;
pub mod http;
pub mod listing;
pub mod naming;
pub mod orchestrator;
pub mod storage;
