use std::path::PathBuf;

use clap::Parser;

use deck::{DeckError, Preferences, Repl};

#[derive(Parser)]
#[command(author, version, about = "Deck, a simple FORTH interpreter")]
struct Args {
    /// Print pipeline state after each phase
    #[arg(short, long)]
    debug: bool,

    /// Keep the interactive prompt even after loading files
    #[arg(short, long)]
    prompt: bool,

    /// Evaluate these files before the prompt
    #[arg(short, long = "file", value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn main() -> Result<(), DeckError> {
    let args = Args::parse();

    let mut preferences = Preferences::new();
    if args.debug {
        preferences.set("debug", "y");
    }
    if args.prompt {
        preferences.set("prompt", "y");
    }
    if !args.files.is_empty() {
        let joined = args
            .files
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        preferences.set("files", joined);
        if preferences.get("prompt") != "y" {
            preferences.set("prompt", "n");
        }
    }

    Repl::new(preferences).run()
}
