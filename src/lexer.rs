use crate::{
    diagnostics::{ErrorTable, Phase, ANSWER_PROMPT},
    dictionary::Dictionary,
    value::{Def, Value},
};

pub struct KeywordPair {
    pub open: &'static str,
    pub close: &'static str,
}

pub const COMMENT: KeywordPair = KeywordPair {
    open: "(",
    close: ")",
};
pub const DEFINE: KeywordPair = KeywordPair {
    open: ":",
    close: ";",
};
pub const STRING: KeywordPair = KeywordPair {
    open: ".\"",
    close: "\"",
};
pub const FORGET: KeywordPair = KeywordPair {
    open: "forget",
    close: "",
};

/// Split a line on whitespace and nominate each token into a Value,
/// resolving the multi-token constructs on the way:
///
/// ```text
/// ( COMMENT )
/// : DEFINITION ;
/// ." STRING "
/// forget WORD
/// ```
///
/// Definitions and forgets take effect on the dictionary immediately and
/// emit nothing. Every line must be lexically self-contained; a construct
/// still open at end of line is a Lex error.
pub fn lex(line: &str, dictionary: &mut Dictionary, errors: &mut ErrorTable) -> Vec<Value> {
    let mut values = Vec::new();
    let mut incom = false;
    let mut indef = false;
    let mut instr = false;
    let mut inforget = false;
    let mut scom = String::new();
    let mut sdef = String::new();
    let mut sstr = String::new();
    let mut sep = "";
    let mut defsym = String::new();
    let mut defcom: Option<String> = None;
    let mut count: isize = 0;

    for token in line.split_whitespace() {
        if incom {
            if token == COMMENT.close {
                incom = false;
                if indef {
                    defcom = Some(scom.clone());
                    sep = "";
                }
            } else {
                scom.push_str(sep);
                scom.push_str(token);
                sep = " ";
            }
            continue;
        }
        if indef {
            if token == DEFINE.close {
                indef = false;
                mkdef(
                    dictionary,
                    &defsym,
                    &sdef,
                    defcom.as_deref().unwrap_or(""),
                    count + 1,
                    errors,
                );
            } else if defsym.is_empty() {
                defsym = token.to_string();
            } else if token == COMMENT.open && defcom.is_none() {
                // the first comment inside a definition becomes its note
                incom = true;
                scom.clear();
                sep = "";
            } else if token == DEFINE.open {
                errors.record(Phase::Lex, count, "cannot have another definition inside");
                return Vec::new();
            } else {
                sdef.push_str(sep);
                sdef.push_str(token);
                sep = " ";
            }
            continue;
        }
        if instr {
            if token == STRING.close {
                instr = false;
                values.push(Value::string(std::mem::take(&mut sstr)));
                count += 1;
            } else if token == STRING.open {
                errors.record(Phase::Lex, count, "cannot create another string inside");
                return Vec::new();
            } else {
                sstr.push_str(sep);
                sstr.push_str(token);
                sep = " ";
            }
            continue;
        }
        if inforget {
            inforget = false;
            rmdef(dictionary, token);
            continue;
        }
        if token == COMMENT.open {
            incom = true;
            scom.clear();
            sep = "";
            continue;
        }
        if token == DEFINE.open {
            indef = true;
            defsym.clear();
            defcom = None;
            sdef.clear();
            sep = "";
            continue;
        }
        if token == STRING.open {
            instr = true;
            sstr.clear();
            sep = "";
            continue;
        }
        if token == FORGET.open {
            inforget = true;
            continue;
        }
        values.push(nominate(token, dictionary));
        count += 1;
    }

    if incom {
        errors.record(Phase::Lex, count, "unterminated comment");
    } else if indef {
        errors.record(Phase::Lex, count, "unterminated definition");
    } else if instr {
        errors.record(Phase::Lex, count, "unterminated string");
    } else if inforget {
        errors.record(Phase::Lex, count, "forget expects a word");
    }

    values
}

/// Convert a plain token into a Value: dictionary reference first, then
/// numeric literal, else an unresolved marker for the evaluator to flag.
pub fn nominate(token: &str, dictionary: &Dictionary) -> Value {
    if let Some(def) = dictionary.find(token) {
        Value::def(token, def)
    } else if let Ok(number) = token.parse::<f64>() {
        Value::num(token, number)
    } else {
        Value::unresolved(token)
    }
}

/// Write a new user word into the dictionary, replacing any previous
/// binding.
pub fn mkdef(
    dictionary: &mut Dictionary,
    name: &str,
    phrase: &str,
    note: &str,
    position: isize,
    errors: &mut ErrorTable,
) {
    if name.is_empty() {
        errors.record(Phase::Lex, position, "definition needs a name");
        return;
    }
    if name.parse::<f64>().is_ok() {
        errors.record(Phase::Lex, position, "word cannot be a number");
        return;
    }
    if name.chars().any(|c| c.is_control() || c == '^') {
        errors.record(Phase::Lex, position, "invalid character in word");
        return;
    }
    // an empty phrase is allowed; the word just does nothing
    dictionary.write(name, Def::phrase(name, note, phrase));
    println!("{ANSWER_PROMPT}compiled: {name}\n");
}

/// Remove a word. Forgetting something that was never defined is only
/// worth a notice, not an error.
pub fn rmdef(dictionary: &mut Dictionary, word: &str) {
    if !dictionary.has(word) {
        println!("\"{word}\" not forgotten as it was never defined\n");
        return;
    }
    dictionary.erase(word);
    println!("\"{word}\" forgotten from the dictionary\n");
}
