//! Memory Bank Core
//!
//! Foundational types shared by every crate in the memory bank workspace.
//! This crate has no dependency on the filesystem pipeline or the CLI.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `layout` - Fixed memory-bank layout: directory names, the six core files, signature phrase
//! - `tool_trait` - Tool abstraction (`ToolDefinition`, `ToolExecutable`, `ToolRegistry`)

pub mod error;
pub mod layout;
pub mod tool_trait;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Layout ─────────────────────────────────────────────────────────────
pub use layout::{
    infer_project_root, instructions_path, is_core_file, memory_bank_dir, CORE_FILES,
    INSTRUCTIONS_FILE, MEMORY_BANK_DIR, SEMANTIC_FOLDERS, SIGNATURE_PHRASE,
};

// ── Tool Trait ─────────────────────────────────────────────────────────
pub use tool_trait::{MemoryBankTool, ToolDefinition, ToolExecutable, ToolRegistry};
