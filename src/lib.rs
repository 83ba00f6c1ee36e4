//! Memory Bank
//!
//! Keeps a project's memory bank (`.github/memory-bank/`) and its Copilot
//! instructions document in agreement. This crate holds the mutating side:
//! - Typed tool dispatch and the tool registry
//! - Instructions writer, interactive resolver and generation services
//! - JSON config storage
//! - Data models and utilities
//!
//! Read-only validation lives in `memory_bank_validation`.

pub mod commands;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use commands::{build_registry, dispatch, dispatch_json, ToolRequest};
pub use models::response::*;
pub use models::settings::{SyncConfig, SyncConfigUpdate};
pub use utils::error::{AppError, AppResult};
