//! Decision Sources
//!
//! The resolver never reads input itself. Each question or confirmation step
//! is handed to a [`DecisionSource`], which answers with one of the step's
//! options.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Stderr, Stdin, Write};

use tokio::runtime::{Handle, RuntimeFlavor};

use crate::models::resolution::ConversationStep;

/// Supplies answers to question and confirmation steps.
pub trait DecisionSource: Send {
    /// Pick one of `step.options`. Answers outside the options are treated
    /// as the step's last option (abort or stop).
    fn choose(&mut self, step: &ConversationStep) -> String;
}

/// Always picks the first option: automatic strategy, proceed on every item.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

impl DecisionSource for AutoApprove {
    fn choose(&mut self, step: &ConversationStep) -> String {
        step.option_list().first().cloned().unwrap_or_default()
    }
}

/// Replays a fixed list of answers. Once exhausted it answers with the
/// step's last option.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDecisions {
    answers: VecDeque<String>,
}

impl ScriptedDecisions {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl DecisionSource for ScriptedDecisions {
    fn choose(&mut self, step: &ConversationStep) -> String {
        self.answers
            .pop_front()
            .or_else(|| step.option_list().last().cloned())
            .unwrap_or_default()
    }
}

/// Asks on a terminal: prints the step and its numbered options, reads a
/// number or an option label. End of input answers with the last option.
///
/// Reads block. On a multi-threaded runtime they run under `block_in_place`
/// so the other workers keep going; elsewhere they block the caller.
pub struct PromptDecisions<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead + Send, W: Write + Send> PromptDecisions<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, step: &ConversationStep) -> std::io::Result<Option<String>> {
        let options = step.option_list();
        writeln!(self.output, "\n{}", step.content)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, option)?;
        }

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let answer = line.trim();

            if let Ok(n) = answer.parse::<usize>() {
                if (1..=options.len()).contains(&n) {
                    return Ok(Some(options[n - 1].clone()));
                }
            }
            if let Some(option) = options.iter().find(|o| o.eq_ignore_ascii_case(answer)) {
                return Ok(Some(option.clone()));
            }
            writeln!(self.output, "Please answer 1-{}.", options.len())?;
        }
    }
}

impl PromptDecisions<BufReader<Stdin>, Stderr> {
    /// Prompt on stderr and read stdin, leaving stdout for results.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(std::io::stdin()), std::io::stderr())
    }
}

fn blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

impl<R: BufRead + Send, W: Write + Send> DecisionSource for PromptDecisions<R, W> {
    fn choose(&mut self, step: &ConversationStep) -> String {
        match blocking(|| self.ask(step)) {
            Ok(Some(answer)) => answer,
            Ok(None) | Err(_) => step.option_list().last().cloned().unwrap_or_default(),
        }
    }
}
