//! Interactive Sync Resolver
//!
//! A small finite-state machine that walks the operator through a sync
//! conflict:
//!
//! ```text
//! Start -> Summarize -> AskStrategy -> Confirm(0..n) -> Apply -> Recheck -> End
//!                             \-- Abort ---------------------------------/
//! ```
//!
//! Every prompt goes through a [`DecisionSource`], so tests drive the machine
//! deterministically. Edits are delegated to the instructions writer and the
//! final state comes from a fresh extraction and diff.
//!
//! A signed instructions document is never edited. Confirmed changes against
//! one are listed for the operator and the run ends unresolved.

pub mod decisions;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use memory_bank_validation::{
    check_sync, extract_memory_bank_files, BacktickScanner, ConflictDetails, ConflictPolicy,
    Discrepancy, DiscrepancyKind, ReferenceScanner,
};
use tracing::{debug, info};

use crate::models::resolution::{
    ConversationStep, FinalState, PriorSync, ResolutionAction, ResolutionResult,
    ResolutionStatus, UserChoice,
};
use crate::services::instructions::{self, WriteOutcome};
use crate::utils::error::AppResult;

pub use decisions::{AutoApprove, DecisionSource, PromptDecisions, ScriptedDecisions};

pub const STRATEGY_AUTOMATIC: &str = "Resolve automatically where possible";
pub const STRATEGY_INTERACTIVE: &str = "Resolve interactively, file by file";
pub const STRATEGY_ABORT: &str = "Abort";
pub const STRATEGY_OPTIONS: [&str; 3] =
    [STRATEGY_AUTOMATIC, STRATEGY_INTERACTIVE, STRATEGY_ABORT];

pub const CONFIRM_PROCEED: &str = "Proceed";
pub const CONFIRM_SKIP: &str = "Skip";
pub const CONFIRM_STOP: &str = "Stop";
pub const CONFIRM_OPTIONS: [&str; 3] = [CONFIRM_PROCEED, CONFIRM_SKIP, CONFIRM_STOP];

/// Caller-controlled resolver settings
#[derive(Clone)]
pub struct ResolveOptions {
    /// Skip confirmation for individually auto-resolvable discrepancies
    pub auto_resolve: bool,
    pub policy: ConflictPolicy,
    /// Reference scanner used for the post-apply recheck
    pub scanner: Arc<dyn ReferenceScanner>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            auto_resolve: false,
            policy: ConflictPolicy::default(),
            scanner: Arc::new(BacktickScanner::new()),
        }
    }
}

impl fmt::Debug for ResolveOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveOptions")
            .field("auto_resolve", &self.auto_resolve)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Resolver states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    Start,
    Summarize,
    AskStrategy,
    /// Confirming the discrepancy at this index
    Confirm(usize),
    Apply,
    Recheck,
    End,
}

impl ResolverState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Summarize => "summarize",
            Self::AskStrategy => "ask_strategy",
            Self::Confirm(_) => "confirm",
            Self::Apply => "apply",
            Self::Recheck => "recheck",
            Self::End => "end",
        }
    }
}

/// Render the conflict as the opening information step.
pub fn render_summary(details: &ConflictDetails) -> String {
    let mut out = format!(
        "Sync conflict detected: {} (severity {}, {} discrepancies, {})\n",
        details.conflict_type,
        details.severity,
        details.total(),
        if details.auto_resolvable {
            "auto-resolvable"
        } else {
            "confirmation required"
        }
    );
    if !details.missing_references.is_empty() {
        out.push_str(&format!(
            "Missing references ({}): {}\n",
            details.missing_references.len(),
            details.missing_references.join(", ")
        ));
    }
    if !details.orphaned_references.is_empty() {
        out.push_str(&format!(
            "Orphaned references ({}): {}\n",
            details.orphaned_references.len(),
            details.orphaned_references.join(", ")
        ));
    }
    if !details.suggested_actions.is_empty() {
        out.push_str("Suggested actions:\n");
        for action in &details.suggested_actions {
            out.push_str(&format!("- {}\n", action));
        }
    }
    out
}

fn describe(discrepancy: &Discrepancy) -> String {
    match discrepancy.kind {
        DiscrepancyKind::Missing => format!(
            "`{}` exists in the memory bank but the instructions never reference it. \
             Add a reference?",
            discrepancy.file
        ),
        DiscrepancyKind::Orphaned => format!(
            "The instructions reference `{}`, which does not exist in the memory bank. \
             Remove the reference?",
            discrepancy.file
        ),
    }
}

fn backticked<'s>(files: impl IntoIterator<Item = &'s String>) -> String {
    files
        .into_iter()
        .map(|f| format!("`{}`", f))
        .collect::<Vec<_>>()
        .join(", ")
}

struct Resolver<'a> {
    memory_bank_dir: &'a Path,
    project_root: &'a Path,
    options: &'a ResolveOptions,
    decisions: &'a mut dyn DecisionSource,
    details: ConflictDetails,
    discrepancies: Vec<Discrepancy>,
    auto_mode: bool,
    aborted: bool,
    confirmed: Vec<Discrepancy>,
    log: Vec<ConversationStep>,
    choices: Vec<UserChoice>,
    actions: Vec<ResolutionAction>,
    final_state: Option<FinalState>,
}

impl<'a> Resolver<'a> {
    /// Append a prompt step, ask for an answer and record it.
    fn prompt(&mut self, step: ConversationStep) -> String {
        let index = self.log.len();
        let answer = self.decisions.choose(&step);
        let options = step.option_list();
        let choice = if options.iter().any(|o| *o == answer) {
            answer
        } else {
            options.last().cloned().unwrap_or_default()
        };
        self.log.push(step);
        self.choices.push(UserChoice::new(index, choice.clone()));
        choice
    }

    async fn step(&mut self, state: ResolverState) -> AppResult<ResolverState> {
        debug!(state = state.label(), "resolver transition");
        let next = match state {
            ResolverState::Start => ResolverState::Summarize,

            ResolverState::Summarize => {
                self.log
                    .push(ConversationStep::information(render_summary(&self.details)));
                ResolverState::AskStrategy
            }

            ResolverState::AskStrategy => {
                let choice = self.prompt(ConversationStep::question(
                    "How would you like to resolve these discrepancies?",
                    &STRATEGY_OPTIONS,
                ));
                match choice.as_str() {
                    STRATEGY_ABORT => {
                        self.aborted = true;
                        self.log.push(ConversationStep::information(
                            "Resolution aborted. No files were changed.",
                        ));
                        ResolverState::End
                    }
                    STRATEGY_AUTOMATIC => {
                        self.auto_mode = true;
                        ResolverState::Confirm(0)
                    }
                    _ => ResolverState::Confirm(0),
                }
            }

            ResolverState::Confirm(i) => match self.discrepancies.get(i).cloned() {
                None => ResolverState::Apply,
                Some(discrepancy) => {
                    let unprotected =
                        self.options.policy.is_item_auto_resolvable(&discrepancy.file);
                    if self.auto_mode && unprotected {
                        self.log.push(ConversationStep::information(format!(
                            "Resolving `{}` automatically: it is not a protected core file.",
                            discrepancy.file
                        )));
                        self.confirmed.push(discrepancy);
                        ResolverState::Confirm(i + 1)
                    } else {
                        let choice = self.prompt(ConversationStep::confirmation(
                            describe(&discrepancy),
                            &CONFIRM_OPTIONS,
                        ));
                        match choice.as_str() {
                            CONFIRM_PROCEED => {
                                self.confirmed.push(discrepancy);
                                ResolverState::Confirm(i + 1)
                            }
                            CONFIRM_SKIP => ResolverState::Confirm(i + 1),
                            _ => ResolverState::Apply,
                        }
                    }
                }
            },

            ResolverState::Apply => {
                self.apply().await?;
                ResolverState::Recheck
            }

            ResolverState::Recheck => {
                let sync = check_sync(
                    self.memory_bank_dir,
                    self.project_root,
                    &self.options.policy,
                    self.options.scanner.as_ref(),
                )
                .await?;
                self.final_state = Some(FinalState::from(&sync));
                ResolverState::End
            }

            ResolverState::End => ResolverState::End,
        };
        Ok(next)
    }

    fn is_confirmed(&self, discrepancy: &Discrepancy) -> bool {
        self.confirmed.contains(discrepancy)
    }

    /// What a fresh managed section may list: the bank minus missing files the
    /// operator skipped or never reached, plus orphans they chose to keep.
    fn accepted_listing(&self, bank: Vec<String>) -> Vec<String> {
        let withheld = |file: &String| {
            self.discrepancies.iter().any(|d| {
                d.kind == DiscrepancyKind::Missing && &d.file == file && !self.is_confirmed(d)
            })
        };
        let mut listing: Vec<String> = bank.into_iter().filter(|f| !withheld(f)).collect();
        listing.extend(
            self.discrepancies
                .iter()
                .filter(|d| d.kind == DiscrepancyKind::Orphaned && !self.is_confirmed(d))
                .map(|d| d.file.clone()),
        );
        listing
    }

    async fn apply(&mut self) -> AppResult<()> {
        if self.confirmed.is_empty() {
            return Ok(());
        }
        let bank: Vec<String> = extract_memory_bank_files(self.memory_bank_dir)
            .await?
            .into_iter()
            .collect();
        let listing = self.accepted_listing(bank);
        let settled: Vec<String> = self.confirmed.iter().map(|d| d.file.clone()).collect();

        match instructions::update_instructions(self.project_root, &listing).await? {
            WriteOutcome::Applied(action_type) => {
                self.actions.push(ResolutionAction {
                    action_type,
                    description: format!(
                        "Appended a managed section listing {} to settle {} ({})",
                        backticked(&listing),
                        backticked(&settled),
                        action_type
                    ),
                    target_file: memory_bank_core::INSTRUCTIONS_FILE.to_string(),
                });
            }
            WriteOutcome::Unchanged => {
                info!(
                    confirmed = settled.len(),
                    "instructions are signed; confirmed edits left for the operator"
                );
                let mut edits = Vec::with_capacity(self.confirmed.len());
                for d in &self.confirmed {
                    edits.push(match d.kind {
                        DiscrepancyKind::Missing => format!("add `{}`", d.file),
                        DiscrepancyKind::Orphaned => format!("remove `{}`", d.file),
                    });
                }
                self.log.push(ConversationStep::information(format!(
                    "The managed region of {} is signed and is never edited automatically. \
                     Make these changes by hand: {}.",
                    memory_bank_core::INSTRUCTIONS_FILE,
                    edits.join("; ")
                )));
            }
        }
        Ok(())
    }

    fn finish(mut self) -> ResolutionResult {
        if self.aborted {
            return ResolutionResult {
                resolved: false,
                status: ResolutionStatus::Aborted,
                message: "Resolution aborted by the operator".to_string(),
                actions_performed: self.actions,
                user_choices: self.choices,
                conversation_log: self.log,
                final_state: None,
            };
        }

        let remaining = self
            .final_state
            .as_ref()
            .map(|s| s.missing_references.len() + s.orphaned_references.len())
            .unwrap_or_else(|| self.details.total());
        let resolved = remaining == 0;
        let (status, message) = if resolved {
            (
                ResolutionStatus::Resolved,
                format!(
                    "Resolved {} discrepancies with {} edits",
                    self.details.total(),
                    self.actions.len()
                ),
            )
        } else {
            (
                ResolutionStatus::Unresolved,
                format!(
                    "{} discrepancies remain; manual follow-up required",
                    remaining
                ),
            )
        };
        self.log.push(ConversationStep::information(message.clone()));

        ResolutionResult {
            resolved,
            status,
            message,
            actions_performed: self.actions,
            user_choices: self.choices,
            conversation_log: self.log,
            final_state: self.final_state,
        }
    }
}

fn short_circuit(
    status: ResolutionStatus,
    message: &str,
    final_state: Option<FinalState>,
) -> ResolutionResult {
    ResolutionResult {
        resolved: status == ResolutionStatus::AlreadyInSync,
        status,
        message: message.to_string(),
        actions_performed: Vec::new(),
        user_choices: Vec::new(),
        conversation_log: vec![ConversationStep::information(message)],
        final_state,
    }
}

/// Drive a resolution run from prior sync data.
///
/// Already-in-sync input returns immediately without touching any file;
/// missing conflict data yields `PreconditionMissing` instead of guessing.
pub async fn perform_interactive_sync_resolution(
    memory_bank_dir: &Path,
    project_root: &Path,
    prior: PriorSync,
    options: &ResolveOptions,
    decisions: &mut dyn DecisionSource,
) -> AppResult<ResolutionResult> {
    let details = match prior {
        PriorSync::NotValidated => {
            return Ok(short_circuit(
                ResolutionStatus::PreconditionMissing,
                "Unable to resolve: run validation with sync checking first",
                None,
            ));
        }
        PriorSync::InSync(state) => {
            return Ok(short_circuit(
                ResolutionStatus::AlreadyInSync,
                "Instructions already reference every memory bank file",
                Some(state),
            ));
        }
        PriorSync::Conflict(details) => details,
    };

    let mut resolver = Resolver {
        memory_bank_dir,
        project_root,
        options,
        decisions,
        discrepancies: details.discrepancies(),
        details,
        auto_mode: options.auto_resolve,
        aborted: false,
        confirmed: Vec::new(),
        log: Vec::new(),
        choices: Vec::new(),
        actions: Vec::new(),
        final_state: None,
    };

    let mut state = ResolverState::Start;
    while state != ResolverState::End {
        state = resolver.step(state).await?;
    }

    let result = resolver.finish();
    info!(
        status = ?result.status,
        actions = result.actions_performed.len(),
        "sync resolution finished"
    );
    Ok(result)
}
