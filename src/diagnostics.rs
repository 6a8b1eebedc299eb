use std::collections::BTreeSet;

use indexmap::IndexMap;
use thiserror::Error;

use crate::lexer::STRING;

pub const ANSWER_PROMPT: &str = "=> ";
pub const ERROR_PROMPT: &str = "E> ";

/// Pipeline phase an error was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Lex,
    Clarify,
    Eval,
    Param,
    Apply,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Lex,
        Phase::Clarify,
        Phase::Eval,
        Phase::Param,
        Phase::Apply,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Phase::Lex => "lex",
            Phase::Clarify => "clar",
            Phase::Eval => "eval",
            Phase::Param => "param",
            Phase::Apply => "apply",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorEntry {
    /// 0-based index of the offending token/value, or -1 for the whole line.
    pub position: isize,
    pub detail: String,
}

/// Per-turn error accumulator. Phases fill independently; nothing in the
/// pipeline throws. Cleared unconditionally at the end of every turn.
#[derive(Debug, Clone)]
pub struct ErrorTable {
    phases: IndexMap<Phase, Vec<ErrorEntry>>,
}

impl ErrorTable {
    pub fn new() -> Self {
        let mut phases = IndexMap::new();
        for phase in Phase::ALL {
            phases.insert(phase, Vec::new());
        }
        Self { phases }
    }

    pub fn record(&mut self, phase: Phase, position: isize, detail: impl Into<String>) {
        self.phases.entry(phase).or_default().push(ErrorEntry {
            position,
            detail: detail.into(),
        });
    }

    pub fn entries(&self, phase: Phase) -> &[ErrorEntry] {
        self.phases.get(&phase).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn okay(&self) -> bool {
        self.phases.values().all(Vec::is_empty)
    }

    pub fn clear(&mut self) {
        for entries in self.phases.values_mut() {
            entries.clear();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Phase, &[ErrorEntry])> {
        self.phases
            .iter()
            .map(|(phase, entries)| (*phase, entries.as_slice()))
    }
}

impl Default for ErrorTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the caret line that sits under the echoed input, marking the
/// positions in `bads`. Tokens inside a `." ... "` string share the
/// position of the opening token.
pub fn indicate(line: &str, bads: &BTreeSet<isize>) -> String {
    let mut indication = String::new();
    let mut instr = false;
    let mut count: isize = 0;
    let mut sep = "";
    for token in line.split_whitespace() {
        if instr {
            if token == STRING.close {
                instr = false;
            }
        } else {
            if token == STRING.open {
                instr = true;
            }
            count += 1;
        }
        let indicator = if bads.contains(&(count - 1)) { '^' } else { ' ' };
        indication.push_str(sep);
        indication.extend(std::iter::repeat(indicator).take(token.chars().count()));
        sep = " ";
    }
    indication
}

/// Render the turn's errors, or None if the turn was clean. Only the
/// highest-precedence non-empty phase is reported:
/// Eval > Param > Apply > Lex > Clarify. Stack-relative positions have
/// `carry` subtracted before caret placement; Lex and Clarify positions are
/// already line-relative.
pub fn report(
    errors: &ErrorTable,
    line: &str,
    carry: usize,
    prompt_width: usize,
    debug: bool,
) -> Option<String> {
    let pad = " ".repeat(prompt_width.saturating_sub(ERROR_PROMPT.len()));
    let carry = carry as isize;

    let eval = errors.entries(Phase::Eval);
    if !eval.is_empty() {
        let bads: BTreeSet<isize> = eval.iter().map(|bad| bad.position - carry).collect();
        let plural = if eval.len() > 1 { "s" } else { "" };
        let mut out = String::new();
        if debug {
            out.push_str(&format!("{ERROR_PROMPT}{pad}{line}\n"));
        }
        out.push_str(&format!("{ERROR_PROMPT}{pad}{}\n", indicate(line, &bads)));
        out.push_str(&format!("{ERROR_PROMPT}word{plural} not defined"));
        return Some(out);
    }

    let param = errors.entries(Phase::Param);
    if !param.is_empty() {
        let first = &param[0];
        if first.position == -1 {
            let mut parts = first.detail.splitn(4, ' ');
            let word = parts.next().unwrap_or_default();
            let expected = parts.next().unwrap_or_default();
            let got = parts.next().unwrap_or_default();
            let stack = parts.next().unwrap_or_default();
            return Some(format!(
                "{ERROR_PROMPT}\"{word}\" expected to pop {expected}, but {got} on stack ({stack})"
            ));
        }
        let mut bads = BTreeSet::new();
        let mut word = "";
        let mut fails = String::new();
        let mut sep = "";
        for bad in param {
            bads.insert(bad.position - carry);
            let mut parts = bad.detail.splitn(2, ' ');
            word = parts.next().unwrap_or_default();
            fails.push_str(sep);
            fails.push_str(parts.next().unwrap_or_default());
            sep = " ";
        }
        let mut out = String::new();
        if debug {
            out.push_str(&format!("{ERROR_PROMPT}{pad}{line}\n"));
        }
        out.push_str(&format!("{ERROR_PROMPT}{pad}{}\n", indicate(line, &bads)));
        out.push_str(&format!(
            "{ERROR_PROMPT}\"{word}\" expected different type than: {fails}"
        ));
        return Some(out);
    }

    let apply = errors.entries(Phase::Apply);
    if !apply.is_empty() {
        let first = &apply[0];
        if first.position < 0 {
            return Some(format!("{ERROR_PROMPT}{}", first.detail));
        }
        let bads: BTreeSet<isize> = apply.iter().map(|bad| bad.position - carry).collect();
        let mut out = String::new();
        if debug {
            out.push_str(&format!("{ERROR_PROMPT}{pad}{line}\n"));
        }
        out.push_str(&format!("{ERROR_PROMPT}{pad}{}\n", indicate(line, &bads)));
        out.push_str(&format!("{ERROR_PROMPT}{}", first.detail));
        return Some(out);
    }

    let lex = errors.entries(Phase::Lex);
    if !lex.is_empty() {
        let bads: BTreeSet<isize> = lex.iter().map(|bad| bad.position).collect();
        let mut out = String::new();
        out.push_str(&format!("{ERROR_PROMPT}{pad}{}\n", indicate(line, &bads)));
        out.push_str(&format!("{ERROR_PROMPT}{}", lex[0].detail));
        return Some(out);
    }

    let clarify = errors.entries(Phase::Clarify);
    if !clarify.is_empty() {
        return Some(format!("{ERROR_PROMPT}{}", clarify[0].detail));
    }

    None
}

/// Unified error type for everything outside the turn pipeline.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("readline failed: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("file does not exist: {0}")]
    MissingFile(String),
}

pub type Result<T> = std::result::Result<T, DeckError>;
