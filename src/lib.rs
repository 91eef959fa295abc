pub mod cli;
pub mod config;
pub mod db;
pub mod export;
pub mod milvus;
pub mod reconcile;
pub mod report;
pub mod utils;

pub use config::Opts;
pub use milvus::{MilvusClient, MilvusError};
pub use reconcile::{Comparison, Summary};
