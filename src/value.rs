use std::{fmt, rc::Rc};

use crate::{diagnostics::ErrorTable, dictionary::Dictionary};

pub type Stack = Vec<Value>;
pub type Hist = Vec<String>;

/// Native operations are plain function pointers, so a definition never
/// captures aliases of the session state it is handed at apply time.
pub type NativeOp = fn(&mut Stack, &mut Dictionary, &[String], &mut ErrorTable);

/// The atom the lexer, clarifier, evaluator, and stack trade in.
#[derive(Clone)]
pub enum Value {
    Num { sym: String, value: f64 },
    Str(String),
    Def { sym: String, def: Rc<Def> },
    /// A word the dictionary could not resolve at lex time. Surfaces as an
    /// Eval error when the turn reaches evaluation.
    Unresolved(String),
}

impl Value {
    pub fn num(sym: impl Into<String>, value: f64) -> Self {
        Self::Num {
            sym: sym.into(),
            value,
        }
    }

    pub fn number(value: f64) -> Self {
        Self::Num {
            sym: format!("{value}"),
            value,
        }
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::Str(text.into())
    }

    pub fn def(sym: impl Into<String>, def: Rc<Def>) -> Self {
        Self::Def {
            sym: sym.into(),
            def,
        }
    }

    pub fn unresolved(sym: impl Into<String>) -> Self {
        Self::Unresolved(sym.into())
    }

    pub fn sym(&self) -> &str {
        match self {
            Value::Num { sym, .. } | Value::Def { sym, .. } => sym,
            Value::Str(text) => text,
            Value::Unresolved(sym) => sym,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Num { .. } => "num",
            Value::Str(_) => "str",
            Value::Def { .. } => "def",
            Value::Unresolved(_) => "err",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sym())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}){}", self.kind_name(), self.sym())
    }
}

/// One dictionary entry. A native carries an executable operation and its
/// signature; native phrases and user phrases carry text that is re-lexed
/// and expanded on every use.
pub struct Def {
    pub name: String,
    /// Forth-style stack-effect notation, e.g. `n1 n2 -- sum`.
    pub note: String,
    pub kind: DefKind,
}

pub enum DefKind {
    Native { params: Vec<ParamKind>, op: NativeOp },
    NativePhrase { phrase: String },
    Phrase { phrase: String },
}

impl Def {
    pub fn native(
        name: impl Into<String>,
        note: impl Into<String>,
        params: Vec<ParamKind>,
        op: NativeOp,
    ) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            note: note.into(),
            kind: DefKind::Native { params, op },
        })
    }

    pub fn native_phrase(
        name: impl Into<String>,
        note: impl Into<String>,
        phrase: impl Into<String>,
    ) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            note: note.into(),
            kind: DefKind::NativePhrase {
                phrase: phrase.into(),
            },
        })
    }

    pub fn phrase(
        name: impl Into<String>,
        note: impl Into<String>,
        phrase: impl Into<String>,
    ) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            note: note.into(),
            kind: DefKind::Phrase {
                phrase: phrase.into(),
            },
        })
    }

    pub fn is_composite(&self) -> bool {
        matches!(
            self.kind,
            DefKind::NativePhrase { .. } | DefKind::Phrase { .. }
        )
    }

    pub fn phrase_text(&self) -> Option<&str> {
        match &self.kind {
            DefKind::Native { .. } => None,
            DefKind::NativePhrase { phrase } | DefKind::Phrase { phrase } => Some(phrase),
        }
    }
}

/// Expected kind of one stack parameter, listed top of stack first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Any,
    Def,
    Num,
    Str,
}

impl ParamKind {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            ParamKind::Any => true,
            ParamKind::Def => matches!(value, Value::Def { .. }),
            ParamKind::Num => matches!(value, Value::Num { .. }),
            ParamKind::Str => matches!(value, Value::Str(_)),
        }
    }
}

pub fn stack_line(stack: &[Value], verbose: bool) -> String {
    let mut line = String::new();
    let mut sep = "";
    for value in stack {
        line.push_str(sep);
        if verbose {
            line.push_str(&format!("{value:?}"));
        } else {
            line.push_str(value.sym());
        }
        sep = " ";
    }
    line
}
