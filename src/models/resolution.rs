//! Resolution Models
//!
//! Conversation log, recorded choices, applied actions and the final result of
//! an interactive sync resolution run. Everything here is built fresh per run.

use chrono::Utc;
use memory_bank_validation::{ConflictDetails, CopilotSync};
use serde::{Deserialize, Serialize};

fn now() -> String {
    Utc::now().to_rfc3339()
}

/// Kind of conversation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    Information,
    Question,
    Confirmation,
}

/// One entry of the append-only conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationStep {
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// ISO-8601
    pub timestamp: String,
}

impl ConversationStep {
    pub fn information(content: impl Into<String>) -> Self {
        Self {
            step_type: StepType::Information,
            content: content.into(),
            options: None,
            timestamp: now(),
        }
    }

    pub fn question(content: impl Into<String>, options: &[&str]) -> Self {
        Self {
            step_type: StepType::Question,
            content: content.into(),
            options: Some(options.iter().map(|o| o.to_string()).collect()),
            timestamp: now(),
        }
    }

    pub fn confirmation(content: impl Into<String>, options: &[&str]) -> Self {
        Self {
            step_type: StepType::Confirmation,
            content: content.into(),
            options: Some(options.iter().map(|o| o.to_string()).collect()),
            timestamp: now(),
        }
    }

    /// Options offered by this step (empty for information steps)
    pub fn option_list(&self) -> &[String] {
        self.options.as_deref().unwrap_or(&[])
    }
}

/// A selection recorded against a prior question or confirmation step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserChoice {
    /// Index into the conversation log of the step being answered
    pub step_index: usize,
    pub choice: String,
    pub timestamp: String,
}

impl UserChoice {
    pub fn new(step_index: usize, choice: impl Into<String>) -> Self {
        Self {
            step_index,
            choice: choice.into(),
            timestamp: now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Fresh managed section appended to an unsigned document
    AppendManagedSection,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AppendManagedSection => write!(f, "append_managed_section"),
        }
    }
}

/// One file edit that was actually applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionAction {
    pub action_type: ActionType,
    pub description: String,
    pub target_file: String,
}

/// Sync state recomputed after the resolver applied its actions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalState {
    pub is_in_sync: bool,
    pub memory_bank_files: Vec<String>,
    pub missing_references: Vec<String>,
    pub orphaned_references: Vec<String>,
}

impl From<&CopilotSync> for FinalState {
    fn from(sync: &CopilotSync) -> Self {
        Self {
            is_in_sync: sync.is_in_sync,
            memory_bank_files: sync.memory_bank_files.clone(),
            missing_references: sync.missing_references.clone(),
            orphaned_references: sync.orphaned_references.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// Actions applied and the recheck found no discrepancies
    Resolved,
    /// Nothing to do
    AlreadyInSync,
    /// Discrepancies remain; manual follow-up required
    Unresolved,
    /// Operator aborted before anything was applied
    Aborted,
    /// No prior conflict data to work from
    PreconditionMissing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    /// True iff the final state has no missing and no orphaned references
    pub resolved: bool,
    pub status: ResolutionStatus,
    pub message: String,
    pub actions_performed: Vec<ResolutionAction>,
    pub user_choices: Vec<UserChoice>,
    pub conversation_log: Vec<ConversationStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_state: Option<FinalState>,
}

/// What the resolver knows about the sync state before it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriorSync {
    /// Sync validation was not run, or produced nothing to act on
    NotValidated,
    InSync(FinalState),
    Conflict(ConflictDetails),
}

impl PriorSync {
    /// Build from the optional `copilotSync` block of a validation result.
    pub fn from_sync(sync: Option<&CopilotSync>) -> Self {
        match sync {
            None => Self::NotValidated,
            Some(s) if s.is_in_sync => Self::InSync(FinalState::from(s)),
            Some(s) => match &s.conflict_details {
                Some(details) => Self::Conflict(details.clone()),
                None => Self::NotValidated,
            },
        }
    }
}

impl From<Option<ConflictDetails>> for PriorSync {
    fn from(details: Option<ConflictDetails>) -> Self {
        details.map_or(Self::NotValidated, Self::Conflict)
    }
}
