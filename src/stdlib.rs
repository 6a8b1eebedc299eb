use crate::{
    diagnostics::{ErrorTable, Phase, ANSWER_PROMPT},
    dictionary::Dictionary,
    value::{stack_line, Def, DefKind, ParamKind, Stack, Value},
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Populate a fresh dictionary with the builtin vocabulary. Signatures list
/// expected kinds top of stack first; the evaluator checks them before the
/// operation runs.
pub fn install(dictionary: &mut Dictionary) {
    use ParamKind::{Any, Num};

    // quit markers; the session recognises a lone `bye`/`exit` before
    // evaluation, so applying them does nothing
    dictionary.write("bye", Def::native("bye", "--", vec![], quit_noop));
    dictionary.write("exit", Def::native("exit", "--", vec![], quit_noop));

    // arithmetic
    dictionary.write("+", Def::native("+", "n1 n2 -- sum", vec![Num, Num], math_add));
    dictionary.write("-", Def::native("-", "n1 n2 -- diff", vec![Num, Num], math_sub));
    dictionary.write("*", Def::native("*", "n1 n2 -- prod", vec![Num, Num], math_mul));
    dictionary.write("/", Def::native("/", "n1 n2 -- quot", vec![Num, Num], math_div));
    dictionary.write("mod", Def::native("mod", "u1 u2 -- u-rem", vec![Num, Num], math_mod));
    dictionary.write(
        "/mod",
        Def::native("/mod", "u1 u2 -- u-rem u-quot", vec![Num, Num], math_divmod),
    );

    // stack shuffles
    dictionary.write("drop", Def::native("drop", "n --", vec![Any], stack_drop));
    dictionary.write("dup", Def::native("dup", "n -- n n", vec![Any], stack_dup));
    dictionary.write(
        "swap",
        Def::native("swap", "n1 n2 -- n2 n1", vec![Any, Any], stack_swap),
    );
    dictionary.write(
        "over",
        Def::native("over", "n1 n2 -- n1 n2 n1", vec![Any, Any], stack_over),
    );
    dictionary.write(
        "rot",
        Def::native("rot", "n1 n2 n3 -- n2 n3 n1", vec![Any, Any, Any], stack_rot),
    );
    dictionary.write(
        "2drop",
        Def::native("2drop", "d --", vec![Any, Any], stack_two_drop),
    );
    dictionary.write(
        "2dup",
        Def::native("2dup", "d -- d d", vec![Any, Any], stack_two_dup),
    );
    dictionary.write(
        "2over",
        Def::native("2over", "d1 d2 -- d1 d2 d1", vec![Any, Any, Any, Any], stack_two_over),
    );
    dictionary.write(
        "2swap",
        Def::native("2swap", "d1 d2 -- d2 d1", vec![Any, Any, Any, Any], stack_two_swap),
    );

    // output
    dictionary.write(".", Def::native(".", "n --", vec![], io_print));
    dictionary.write("emit", Def::native("emit", "c --", vec![Num], io_emit));
    dictionary.write("cr", Def::native("cr", "--", vec![], io_cr));
    dictionary.write("space", Def::native("space", "--", vec![], io_space));
    dictionary.write("spaces", Def::native("spaces", "n --", vec![Num], io_spaces));

    // introspection and housekeeping
    dictionary.write("empty", Def::native("empty", "--", vec![], meta_empty));
    dictionary.write(".stack", Def::native(".stack", "--", vec![], meta_stack));
    dictionary.write(
        ".dictionary",
        Def::native(".dictionary", "--", vec![], meta_dictionary),
    );
    dictionary.write(".history", Def::native(".history", "--", vec![], meta_history));
    dictionary.write(".help", Def::native(".help", "--", vec![], meta_help));
    dictionary.write(".s", Def::native_phrase(".s", "--", ".stack"));
    dictionary.write(".d", Def::native_phrase(".d", "--", ".dictionary"));
    dictionary.write(".h", Def::native_phrase(".h", "--", ".history"));
    dictionary.write(".?", Def::native_phrase(".?", "--", ".help"));
    dictionary.write(
        ".version",
        Def::native_phrase(".version", "--", format!(".\" deck version {VERSION} \" .")),
    );
    dictionary.write(".v", Def::native_phrase(".v", "--", ".version"));

    // constants, 15-digit precision
    dictionary.write("PHI", Def::native_phrase("PHI", "--", "1.618033988749894"));
    dictionary.write("PI", Def::native_phrase("PI", "--", "3.141592653589793"));
}

fn pop_num(stack: &mut Stack) -> Option<f64> {
    match stack.pop() {
        Some(Value::Num { value, .. }) => Some(value),
        _ => None,
    }
}

fn quit_noop(_: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {}

fn math_add(stack: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    let (Some(b), Some(a)) = (pop_num(stack), pop_num(stack)) else {
        return;
    };
    stack.push(Value::number(a + b));
}

fn math_sub(stack: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    let (Some(b), Some(a)) = (pop_num(stack), pop_num(stack)) else {
        return;
    };
    stack.push(Value::number(a - b));
}

fn math_mul(stack: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    let (Some(b), Some(a)) = (pop_num(stack), pop_num(stack)) else {
        return;
    };
    stack.push(Value::number(a * b));
}

fn math_div(stack: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    let (Some(b), Some(a)) = (pop_num(stack), pop_num(stack)) else {
        return;
    };
    // IEEE semantics: dividing by zero yields an infinity or NaN
    stack.push(Value::number(a / b));
}

fn math_mod(stack: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    let (Some(b), Some(a)) = (pop_num(stack), pop_num(stack)) else {
        return;
    };
    stack.push(Value::number(a % b));
}

fn math_divmod(stack: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    let (Some(b), Some(a)) = (pop_num(stack), pop_num(stack)) else {
        return;
    };
    stack.push(Value::number(a % b));
    stack.push(Value::number(a / b));
}

fn stack_drop(stack: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    stack.pop();
}

fn stack_dup(stack: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    let Some(top) = stack.last().cloned() else {
        return;
    };
    stack.push(top);
}

fn stack_swap(stack: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    let (Some(b), Some(a)) = (stack.pop(), stack.pop()) else {
        return;
    };
    stack.push(b);
    stack.push(a);
}

fn stack_over(stack: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    let (Some(b), Some(a)) = (stack.pop(), stack.pop()) else {
        return;
    };
    stack.push(a.clone());
    stack.push(b);
    stack.push(a);
}

fn stack_rot(stack: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    let (Some(c), Some(b), Some(a)) = (stack.pop(), stack.pop(), stack.pop()) else {
        return;
    };
    stack.push(b);
    stack.push(c);
    stack.push(a);
}

fn stack_two_drop(stack: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    stack.pop();
    stack.pop();
}

fn stack_two_dup(stack: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    let (Some(b), Some(a)) = (stack.pop(), stack.pop()) else {
        return;
    };
    stack.push(a.clone());
    stack.push(b.clone());
    stack.push(a);
    stack.push(b);
}

fn stack_two_over(stack: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    let (Some(d), Some(c), Some(b), Some(a)) =
        (stack.pop(), stack.pop(), stack.pop(), stack.pop())
    else {
        return;
    };
    stack.push(a.clone());
    stack.push(b.clone());
    stack.push(c);
    stack.push(d);
    stack.push(a);
    stack.push(b);
}

fn stack_two_swap(stack: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    let (Some(d), Some(c), Some(b), Some(a)) =
        (stack.pop(), stack.pop(), stack.pop(), stack.pop())
    else {
        return;
    };
    stack.push(c);
    stack.push(d);
    stack.push(a);
    stack.push(b);
}

fn io_print(stack: &mut Stack, _: &mut Dictionary, _: &[String], errors: &mut ErrorTable) {
    let Some(value) = stack.pop() else {
        errors.record(Phase::Apply, -1, "stack empty");
        return;
    };
    let text = match &value {
        Value::Num { sym, .. } => sym.clone(),
        Value::Str(text) => format!("\"{text}\""),
        // native and phrase references never rest on the stack; kept for
        // completeness
        Value::Def { sym, def } => match def.kind {
            DefKind::Native { .. } => format!("function: {sym}"),
            DefKind::Phrase { .. } => format!("phrase: {sym}"),
            DefKind::NativePhrase { .. } => sym.clone(),
        },
        Value::Unresolved(_) => {
            errors.record(
                Phase::Apply,
                stack.len() as isize,
                "word type not recognised",
            );
            return;
        }
    };
    println!("{ANSWER_PROMPT}{text}\n");
}

fn io_emit(stack: &mut Stack, _: &mut Dictionary, _: &[String], errors: &mut ErrorTable) {
    let Some(number) = pop_num(stack) else {
        return;
    };
    let code = number as i64;
    if !(32..=126).contains(&code) {
        errors.record(Phase::Apply, stack.len() as isize, "character not emittable");
        return;
    }
    print!("{}", code as u8 as char);
}

fn io_cr(_: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    println!();
}

fn io_space(_: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    print!(" ");
}

fn io_spaces(stack: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    let Some(number) = pop_num(stack) else {
        return;
    };
    print!("{}", " ".repeat(number.max(0.0) as usize));
}

fn meta_empty(_: &mut Stack, dictionary: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    dictionary.reset();
}

fn meta_stack(stack: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    if stack.is_empty() {
        println!("stack empty");
    } else {
        println!("stack: {}", stack_line(stack, false));
    }
}

fn meta_dictionary(_: &mut Stack, dictionary: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    println!("{}", dictionary.render());
}

fn meta_history(_: &mut Stack, _: &mut Dictionary, history: &[String], _: &mut ErrorTable) {
    for (count, line) in history.iter().enumerate() {
        println!("{}: {line}", count + 1);
    }
}

fn meta_help(_: &mut Stack, _: &mut Dictionary, _: &[String], _: &mut ErrorTable) {
    println!(
        ".stack      : print contents of the stack\n\
         .dictionary : print all entries in the dictionary\n\
         .history    : print entire input history\n\
         .version    : print Deck version"
    );
}
