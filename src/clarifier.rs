use crate::{
    diagnostics::{ErrorTable, Phase},
    dictionary::Dictionary,
    lexer,
    value::Value,
};

/// Expansion depth at which a phrase is declared self-referential.
pub const MAX_EXPANSION_DEPTH: usize = 64;

/// Replace every reference to a composite word (native phrase or user
/// phrase) with its expansion, depth-first and left to right, by re-lexing
/// the phrase text against the dictionary. The result contains only
/// literals, unresolved markers, and references to native definitions.
///
/// Needs the dictionary mutably because phrase text may itself contain
/// `forget`.
pub fn clarify(input: &[Value], dictionary: &mut Dictionary, errors: &mut ErrorTable) -> Vec<Value> {
    let mut output = Vec::new();
    expand(input, dictionary, errors, 0, &mut output);
    output
}

fn expand(
    input: &[Value],
    dictionary: &mut Dictionary,
    errors: &mut ErrorTable,
    depth: usize,
    output: &mut Vec<Value>,
) {
    for value in input {
        match value {
            Value::Def { sym, def } if def.is_composite() => {
                if depth >= MAX_EXPANSION_DEPTH {
                    errors.record(Phase::Clarify, -1, format!("recursive definition: {sym}"));
                    continue;
                }
                let phrase = def.phrase_text().unwrap_or_default().to_string();
                let lexed = lexer::lex(&phrase, dictionary, errors);
                expand(&lexed, dictionary, errors, depth + 1, output);
            }
            other => output.push(other.clone()),
        }
    }
}
