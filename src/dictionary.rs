use std::rc::Rc;

use indexmap::IndexMap;

use crate::value::{Def, DefKind};

/// Table of defined words: every primitive installed at startup plus every
/// user definition created at runtime. One binding per name, last write
/// wins.
#[derive(Default)]
pub struct Dictionary {
    entries: IndexMap<String, Rc<Def>>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Panics if `name` is absent; callers check `has` first.
    pub fn lookup(&self, name: &str) -> Rc<Def> {
        Rc::clone(&self.entries[name])
    }

    pub fn find(&self, name: &str) -> Option<Rc<Def>> {
        self.entries.get(name).map(Rc::clone)
    }

    pub fn write(&mut self, name: impl Into<String>, def: Rc<Def>) {
        self.entries.insert(name.into(), def);
    }

    pub fn erase(&mut self, name: &str) {
        self.entries.shift_remove(name);
    }

    /// Remove every user-defined word, keeping natives and native phrases.
    pub fn reset(&mut self) {
        self.entries
            .retain(|_, def| !matches!(def.kind, DefKind::Phrase { .. }));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::from("---- native:\n");
        for (name, def) in &self.entries {
            let (lead, trail) = note_spaces(&def.note);
            match &def.kind {
                DefKind::Native { .. } => {
                    out.push_str(&format!("{name}:\t({lead}{}{trail})\tnative\n", def.note));
                }
                DefKind::NativePhrase { phrase } => {
                    out.push_str(&format!("{name}:\t({lead}{}{trail})\t{phrase}\n", def.note));
                }
                DefKind::Phrase { .. } => {}
            }
        }
        out.push_str("---- user:\n");
        for (name, def) in &self.entries {
            if let DefKind::Phrase { phrase } = &def.kind {
                let (lead, trail) = note_spaces(&def.note);
                out.push_str(&format!("{name}:\t({lead}{}{trail})\t{phrase}\n", def.note));
            }
        }
        out
    }
}

fn note_spaces(note: &str) -> (&'static str, &'static str) {
    let lead = if note.starts_with("--") { " " } else { "" };
    let trail = if note.ends_with("--") { " " } else { "" };
    (lead, trail)
}
