use indexmap::IndexMap;

use crate::{
    clarifier::clarify,
    diagnostics::{report, ErrorTable},
    dictionary::Dictionary,
    evaluator::eval,
    lexer::lex,
    stdlib,
    value::{stack_line, Hist, Stack, Value},
};

/// Interpreter runtime preferences. Unknown keys read as empty.
pub struct Preferences {
    entries: IndexMap<String, String>,
}

impl Preferences {
    pub fn new() -> Self {
        let mut entries = IndexMap::new();
        entries.insert("debug".to_string(), "n".to_string());
        entries.insert("files".to_string(), String::new());
        entries.insert("prompt".to_string(), String::new());
        Self { entries }
    }

    pub fn get(&self, key: &str) -> &str {
        self.entries.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one turn: the stack as committed (or rolled back), the
/// rendered error report if any, and whether the line asked to quit.
pub struct TurnResult {
    pub stack: Vec<Value>,
    pub message: Option<String>,
    pub is_quit: bool,
}

/// The root structure of the language: dictionary, history, stack, error
/// table, rollback checkpoint, and preferences. Created once, mutated in
/// place by every turn.
pub struct Session {
    pub dictionary: Dictionary,
    pub history: Hist,
    pub stack: Stack,
    pub errors: ErrorTable,
    /// Stack size as of the last error-free turn; a failing turn is popped
    /// back down to this.
    pub carry: usize,
    pub preferences: Preferences,
}

impl Session {
    pub fn new() -> Self {
        Self::with_preferences(Preferences::new())
    }

    pub fn with_preferences(preferences: Preferences) -> Self {
        let mut dictionary = Dictionary::new();
        stdlib::install(&mut dictionary);
        Self {
            dictionary,
            history: Vec::new(),
            stack: Vec::new(),
            errors: ErrorTable::new(),
            carry: 0,
            preferences,
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "{},{},{}> ",
            self.history.len(),
            self.stack.len(),
            self.dictionary.len()
        )
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    pub fn dict_len(&self) -> usize {
        self.dictionary.len()
    }

    pub fn debug(&self) -> bool {
        self.preferences.get("debug") == "y"
    }

    /// Feed one line through the pipeline: lex, clarify, eval, report,
    /// rinse. Never fails; phase errors end up in the returned message.
    pub fn submit_line(&mut self, line: &str) -> TurnResult {
        let prompt_width = self.prompt().len();
        let debug = self.debug();

        self.history.push(line.to_string());
        if debug {
            println!("[input] {line}");
        }

        let work = lex(line, &mut self.dictionary, &mut self.errors);
        if debug {
            println!("[work]  lex : {}", stack_line(&work, true));
        }

        if work.len() == 1 {
            let sym = work[0].sym();
            if sym == "bye" || sym == "exit" {
                return TurnResult {
                    stack: self.stack.clone(),
                    message: None,
                    is_quit: true,
                };
            }
        }

        let pending = clarify(&work, &mut self.dictionary, &mut self.errors);
        if debug {
            println!("[work]  clar: {}", stack_line(&pending, true));
        }
        self.stack.extend(pending);

        eval(
            &mut self.stack,
            &mut self.dictionary,
            &self.history,
            &mut self.errors,
        );
        if debug {
            println!("[stack] eval: {}", stack_line(&self.stack, true));
            for (phase, entries) in self.errors.iter() {
                print!("[error] {}: ", phase.name());
                let mut sep = "";
                for entry in entries {
                    print!("{sep}{}@{}", entry.detail, entry.position);
                    sep = ", ";
                }
                println!();
            }
        }

        let message = report(&self.errors, line, self.carry, prompt_width, debug);
        self.rinse();

        TurnResult {
            stack: self.stack.clone(),
            message,
            is_quit: false,
        }
    }

    /// Commit or roll back the turn's stack growth, then clear the error
    /// table for the next turn.
    fn rinse(&mut self) {
        if self.errors.okay() {
            self.carry = self.stack.len();
        } else {
            self.stack.truncate(self.carry);
        }
        self.errors.clear();
    }
}
