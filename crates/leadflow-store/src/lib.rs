#![deny(unsafe_code)]

pub mod config;
pub mod db;
pub mod error;
pub mod leads;
pub mod logs;
pub mod pending;

pub use db::LeadStore;
pub use error::StoreError;
pub use leads::{InsertOutcome, LeadFilter};
pub use logs::StoreStats;
