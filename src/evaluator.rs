use crate::{
    diagnostics::{ErrorTable, Phase},
    dictionary::Dictionary,
    value::{stack_line, DefKind, ParamKind, Stack, Value},
};

/// Walk the working stack (persistent values with the clarified pending
/// values appended) left to right, rebuilding it in place. Literals stay;
/// native words have their signature checked and are applied; unresolved
/// words become Eval errors. Errors accumulate, the walk never
/// short-circuits.
pub fn eval(
    stack: &mut Stack,
    dictionary: &mut Dictionary,
    history: &[String],
    errors: &mut ErrorTable,
) {
    let working = std::mem::take(stack);
    for (position, value) in working.into_iter().enumerate() {
        match value {
            Value::Def { sym, .. } => {
                // resolve by name at evaluation time; a word forgotten
                // since nomination is an error here
                match dictionary.find(&sym) {
                    Some(def) => match &def.kind {
                        DefKind::Native { params, op } => {
                            if check_param(&def.name, params, stack, errors) {
                                op(stack, dictionary, history, errors);
                            }
                        }
                        DefKind::NativePhrase { .. } | DefKind::Phrase { .. } => {
                            errors.record(Phase::Eval, position as isize, sym);
                        }
                    },
                    None => errors.record(Phase::Eval, position as isize, sym),
                }
            }
            Value::Unresolved(sym) => {
                errors.record(Phase::Eval, position as isize, sym);
            }
            literal => stack.push(literal),
        }
    }
}

/// Check a native's declared signature against the current stack. Params
/// are listed top of stack first; `Any` matches every kind. On failure the
/// native must not run and the stack stays untouched.
pub fn check_param(
    word: &str,
    params: &[ParamKind],
    stack: &Stack,
    errors: &mut ErrorTable,
) -> bool {
    if stack.len() < params.len() {
        errors.record(
            Phase::Param,
            -1,
            format!(
                "{word} {} {} {}",
                params.len(),
                stack.len(),
                stack_line(stack, false)
            ),
        );
        return false;
    }

    let mut ok = true;
    for (count, param) in params.iter().enumerate() {
        if *param == ParamKind::Any {
            continue;
        }
        let value = &stack[stack.len() - 1 - count];
        if !param.matches(value) {
            errors.record(
                Phase::Param,
                count as isize,
                format!("{word} {}({})", value.kind_name(), value.sym()),
            );
            ok = false;
        }
    }
    ok
}
