use std::{fs, path::Path};

use rustyline::{error::ReadlineError, DefaultEditor};

use crate::{
    diagnostics::{DeckError, Result, ANSWER_PROMPT},
    session::{Preferences, Session},
    stdlib::VERSION,
};

pub struct Repl {
    session: Session,
}

impl Repl {
    pub fn new(preferences: Preferences) -> Self {
        Self {
            session: Session::with_preferences(preferences),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        if self.session.debug() {
            println!(" . - - - - - - - - - .\n . DEBUG MODE IS ON! .\n  - - - - - - - - - -");
        }

        let files = self.session.preferences.get("files").to_string();
        let had_files = !files.is_empty();
        if had_files {
            println!("{}", motd(1));
            for file in files.split_whitespace() {
                if !Path::new(file).exists() {
                    return Err(DeckError::MissingFile(file.to_string()));
                }
            }
            for file in files.split_whitespace() {
                println!(">> {file}\n");
                let source = fs::read_to_string(file)?;
                for line in source.lines() {
                    if line.is_empty() {
                        continue;
                    }
                    if !self.turn(line) {
                        return Ok(());
                    }
                }
            }
            if self.session.preferences.get("prompt") == "n" {
                return Ok(());
            }
        }

        println!("{}", motd(if had_files { 2 } else { 0 }));
        let mut editor = DefaultEditor::new()?;
        loop {
            match editor.readline(&self.session.prompt()) {
                Ok(line) => {
                    let line = line.trim_end();
                    if line.is_empty() {
                        continue;
                    }
                    editor.add_history_entry(line).ok();
                    if !self.turn(line) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    println!("{ANSWER_PROMPT}bye!\n");
                    break;
                }
                Err(err) => return Err(DeckError::from(err)),
            }
        }
        Ok(())
    }

    /// Run one turn; false means the session asked to end.
    fn turn(&mut self, line: &str) -> bool {
        let result = self.session.submit_line(line);
        if let Some(message) = result.message {
            eprintln!("{message}\n");
        }
        if result.is_quit {
            println!("{ANSWER_PROMPT}bye!\n");
            return false;
        }
        true
    }
}

fn motd(style: usize) -> String {
    if style == 1 {
        return format!(" .-----------.\n | DECK v{VERSION} |\n '-----------'\n");
    }
    let mut banner = String::from(" .----------------------------------------.\n");
    if style == 0 {
        banner.push_str(&format!(" | {:<38} |\n", format!("DECK v{VERSION}")));
        banner.push_str(&format!(" | {:<38} |\n", ""));
    }
    banner.push_str(
        " | - This is a simple FORTH interpreter.  |\n\
         \x20| - To exit, type \"bye\", \"exit\", or C-c. |\n\
         \x20| - For help, type \".help\" or \".?\".      |\n\
         \x20| - The prompt shows sizes of the        |\n\
         \x20|   history, stack, and dictionary.      |\n\
         \x20'----|--------|----------|---------------'\n\
         .-----'        |          |\n\
         | .------------'          |\n\
         v v v---------------------'\n",
    );
    banner
}
