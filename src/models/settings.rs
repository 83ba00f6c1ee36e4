//! Settings Models
//!
//! Sync and generation configuration stored in config.json.

use memory_bank_validation::ConflictPolicy;
use serde::{Deserialize, Serialize};

/// Valid range for `analysis_depth`
pub const ANALYSIS_DEPTH_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

/// Application configuration stored in config.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncConfig {
    /// Conflict severity thresholds and low-impact files
    pub policy: ConflictPolicy,
    /// Group additional documents into purpose-named subfolders
    pub semantic_organization: bool,
    /// Directory levels the project analyzer descends
    pub analysis_depth: u32,
    /// Apply individually auto-resolvable fixes without confirmation
    pub auto_resolve: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            policy: ConflictPolicy::default(),
            semantic_organization: true,
            analysis_depth: 3,
            auto_resolve: false,
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfigUpdate {
    pub low_impact_files: Option<Vec<String>>,
    pub max_auto_resolvable: Option<usize>,
    pub high_severity_threshold: Option<usize>,
    pub semantic_organization: Option<bool>,
    pub analysis_depth: Option<u32>,
    pub auto_resolve: Option<bool>,
}

impl SyncConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SyncConfigUpdate) {
        if let Some(files) = update.low_impact_files {
            self.policy.low_impact_files = files;
        }
        if let Some(max) = update.max_auto_resolvable {
            self.policy.max_auto_resolvable = max;
        }
        if let Some(threshold) = update.high_severity_threshold {
            self.policy.high_severity_threshold = threshold;
        }
        if let Some(semantic) = update.semantic_organization {
            self.semantic_organization = semantic;
        }
        if let Some(depth) = update.analysis_depth {
            self.analysis_depth = depth;
        }
        if let Some(auto) = update.auto_resolve {
            self.auto_resolve = auto;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.policy.validate()?;

        if !ANALYSIS_DEPTH_RANGE.contains(&self.analysis_depth) {
            return Err(format!(
                "Invalid analysisDepth: {}. Must be between {} and {}",
                self.analysis_depth,
                ANALYSIS_DEPTH_RANGE.start(),
                ANALYSIS_DEPTH_RANGE.end()
            ));
        }

        Ok(())
    }
}
