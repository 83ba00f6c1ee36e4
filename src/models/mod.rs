//! Data Models
//!
//! Contains the data structures owned by the main crate. Validation wire types
//! live in `memory_bank_validation::models`.

pub mod generation;
pub mod resolution;
pub mod response;
pub mod settings;

pub use generation::*;
pub use resolution::*;
pub use response::*;
pub use settings::*;
