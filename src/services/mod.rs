//! Services
//!
//! The mutating half of the engine. Commands call into these; they in turn
//! read through `memory_bank_validation`.

pub mod generator;
pub mod instructions;
pub mod resolver;

pub use generator::{analyze_project, generate_memory_bank, generate_memory_bank_files};
pub use instructions::{update_instructions, WriteOutcome};
pub use resolver::{perform_interactive_sync_resolution, DecisionSource, ResolveOptions};
