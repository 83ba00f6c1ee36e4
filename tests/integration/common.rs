//! Helpers for building memory-bank projects on disk.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use memory_bank_core::{instructions_path, memory_bank_dir, SIGNATURE_PHRASE};
use memory_bank_validation::{check_sync, BacktickScanner, ConflictPolicy, CopilotSync};

/// Write markdown documents under the memory bank, with enough body text to
/// count as clear.
pub fn write_bank_files(root: &Path, names: &[&str]) {
    let dir = memory_bank_dir(root);
    for name in names {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let body = format!(
            "# {}\n\n{}\n",
            name,
            "This document records project context for the assistant. ".repeat(5)
        );
        fs::write(path, body).unwrap();
    }
}

pub fn write_instructions(root: &Path, text: &str) {
    let path = instructions_path(root);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

pub fn read_instructions(root: &Path) -> String {
    fs::read_to_string(instructions_path(root)).unwrap()
}

pub fn instructions_mtime(root: &Path) -> SystemTime {
    fs::metadata(instructions_path(root))
        .unwrap()
        .modified()
        .unwrap()
}

/// A managed section carrying the signature and listing `refs`.
pub fn signed_section(refs: &[&str]) -> String {
    let mut out = format!("# Memory Bank\n\n{}.\n\n", SIGNATURE_PHRASE);
    for r in refs {
        out.push_str(&format!("- `{}`\n", r));
    }
    out
}

pub async fn sync_state(root: &Path) -> CopilotSync {
    check_sync(
        &memory_bank_dir(root),
        root,
        &ConflictPolicy::default(),
        &BacktickScanner::new(),
    )
    .await
    .unwrap()
}
