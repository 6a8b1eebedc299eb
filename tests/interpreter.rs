use deck::{
    clarifier,
    diagnostics::ErrorTable,
    dictionary::Dictionary,
    lexer, stdlib,
    session::Session,
    value::Value,
};

fn submit(session: &mut Session, line: &str) -> deck::TurnResult {
    session.submit_line(line)
}

fn clean(session: &mut Session, line: &str) -> deck::TurnResult {
    let result = session.submit_line(line);
    assert!(
        result.message.is_none(),
        "expected clean turn for {line:?}, got: {:?}",
        result.message
    );
    result
}

fn top_num(stack: &[Value]) -> f64 {
    match stack.last() {
        Some(Value::Num { value, .. }) => *value,
        other => panic!("expected Num on top of stack, found {other:?}"),
    }
}

fn nums(stack: &[Value]) -> Vec<f64> {
    stack
        .iter()
        .map(|value| match value {
            Value::Num { value, .. } => *value,
            other => panic!("expected all-Num stack, found {other:?}"),
        })
        .collect()
}

#[test]
fn adds_two_numbers() {
    let mut session = Session::new();
    let result = clean(&mut session, "1.5 2.25 +");
    assert_eq!(top_num(&result.stack), 3.75);
    assert_eq!(result.stack.len(), 1);
}

#[test]
fn subtraction_uses_forth_operand_order() {
    let mut session = Session::new();
    let result = clean(&mut session, "10 4 -");
    assert_eq!(top_num(&result.stack), 6.0);
}

#[test]
fn divmod_pushes_remainder_then_quotient() {
    let mut session = Session::new();
    let result = clean(&mut session, "7 2 /mod");
    assert_eq!(nums(&result.stack), vec![1.0, 3.5]);
}

#[test]
fn division_by_zero_follows_ieee_doubles() {
    let mut session = Session::new();
    let result = clean(&mut session, "1 0 /");
    assert_eq!(top_num(&result.stack), f64::INFINITY);
}

#[test]
fn dup_duplicates_the_top_item() {
    let mut session = Session::new();
    clean(&mut session, "3");
    let result = clean(&mut session, "dup");
    assert_eq!(nums(&result.stack), vec![3.0, 3.0]);
}

#[test]
fn dup_on_empty_stack_is_a_param_error() {
    let mut session = Session::new();
    let result = submit(&mut session, "dup");
    let message = result.message.expect("dup on empty stack should report");
    assert!(
        message.contains("\"dup\" expected to pop 1, but 0 on stack"),
        "{message}"
    );
    assert!(result.stack.is_empty());
}

#[test]
fn defining_and_using_a_phrase() {
    let mut session = Session::new();
    clean(&mut session, ": SQ dup * ;");
    let result = clean(&mut session, "3 SQ");
    assert_eq!(nums(&result.stack), vec![9.0]);
}

#[test]
fn redefinition_replaces_the_phrase() {
    let mut session = Session::new();
    clean(&mut session, ": SQ dup * ;");
    clean(&mut session, ": SQ 0 ;");
    let result = clean(&mut session, "5 SQ");
    assert_eq!(top_num(&result.stack), 0.0);
}

#[test]
fn phrases_expand_depth_first() {
    let mut session = Session::new();
    clean(&mut session, ": FOUR 2 2 + ;");
    clean(&mut session, ": EIGHT FOUR FOUR + ;");
    let result = clean(&mut session, "EIGHT");
    assert_eq!(nums(&result.stack), vec![8.0]);
}

#[test]
fn forgotten_word_is_an_eval_error_and_rolls_back() {
    let mut session = Session::new();
    clean(&mut session, ": SQ dup * ;");
    clean(&mut session, "2 2 +");
    clean(&mut session, "forget SQ");
    let result = submit(&mut session, "3 SQ");
    let message = result.message.expect("forgotten word should report");
    assert!(message.contains("word not defined"), "{message}");
    assert_eq!(nums(&result.stack), vec![4.0]);
}

#[test]
fn forgetting_a_native_makes_it_unknown() {
    let mut session = Session::new();
    clean(&mut session, "forget +");
    let result = submit(&mut session, "1 2 +");
    let message = result.message.expect("+ should be unknown after forget");
    assert!(message.contains("word not defined"), "{message}");
    assert!(result.stack.is_empty());
}

#[test]
fn forgetting_an_undefined_word_is_not_an_error() {
    let mut session = Session::new();
    clean(&mut session, "forget NOPE");
}

#[test]
fn a_failing_turn_never_moves_carry() {
    let mut session = Session::new();
    clean(&mut session, "1 2");
    assert_eq!(session.carry, 2);
    let result = submit(&mut session, "3 4 frobnicate");
    assert!(result.message.is_some());
    assert_eq!(session.carry, 2);
    assert_eq!(nums(&result.stack), vec![1.0, 2.0]);
}

#[test]
fn eval_errors_outrank_param_errors() {
    let mut session = Session::new();
    // the unknown word is an Eval error, and `+` with only one number left
    // also records a Param error; only the Eval report may surface
    let result = submit(&mut session, "1 frobnicate +");
    let message = result.message.expect("unknown word should report");
    assert!(message.contains("word not defined"), "{message}");
    assert!(message.contains('^'), "{message}");
    assert!(!message.contains("expected to pop"), "{message}");
}

#[test]
fn type_mismatch_is_a_param_error() {
    let mut session = Session::new();
    let result = submit(&mut session, ".\" foo \" 1 +");
    let message = result.message.expect("adding a string should report");
    assert!(
        message.contains("\"+\" expected different type than: str(foo)"),
        "{message}"
    );
    assert!(result.stack.is_empty());
}

#[test]
fn string_literal_lands_as_one_value() {
    let mut session = Session::new();
    let result = clean(&mut session, ".\" hello stack world \"");
    match result.stack.last() {
        Some(Value::Str(text)) => assert_eq!(text, "hello stack world"),
        other => panic!("expected Str on stack, found {other:?}"),
    }
    let result = clean(&mut session, ".");
    assert!(result.stack.is_empty());
}

#[test]
fn print_on_empty_stack_is_an_apply_error() {
    let mut session = Session::new();
    let result = submit(&mut session, ".");
    let message = result.message.expect("printing nothing should report");
    assert!(message.contains("stack empty"), "{message}");
}

#[test]
fn emit_rejects_unprintable_codes() {
    let mut session = Session::new();
    let result = submit(&mut session, "7 emit");
    let message = result.message.expect("BEL should not be emittable");
    assert!(message.contains("character not emittable"), "{message}");
    assert!(result.stack.is_empty());
}

#[test]
fn nested_definition_is_a_lex_error() {
    let mut session = Session::new();
    let result = submit(&mut session, ": OUTER : INNER ; ;");
    let message = result.message.expect("nested definition should report");
    assert!(
        message.contains("cannot have another definition inside"),
        "{message}"
    );
    assert!(!session.dictionary.has("OUTER"));
}

#[test]
fn nested_string_is_a_lex_error() {
    let mut session = Session::new();
    let result = submit(&mut session, ".\" one .\" two \"");
    let message = result.message.expect("nested string should report");
    assert!(
        message.contains("cannot create another string inside"),
        "{message}"
    );
}

#[test]
fn unterminated_constructs_are_lex_errors() {
    let mut session = Session::new();
    let result = submit(&mut session, ".\" dangling");
    let message = result.message.expect("open string should report");
    assert!(message.contains("unterminated string"), "{message}");

    let result = submit(&mut session, ": SQ dup *");
    let message = result.message.expect("open definition should report");
    assert!(message.contains("unterminated definition"), "{message}");
    assert!(!session.dictionary.has("SQ"));

    let result = submit(&mut session, "1 2 ( no close");
    let message = result.message.expect("open comment should report");
    assert!(message.contains("unterminated comment"), "{message}");
    assert!(result.stack.is_empty(), "lex errors roll the turn back");
}

#[test]
fn numeric_definition_name_is_rejected() {
    let mut session = Session::new();
    let result = submit(&mut session, ": 5 dup ;");
    let message = result.message.expect("numeric name should report");
    assert!(message.contains("word cannot be a number"), "{message}");
}

#[test]
fn comments_are_discarded() {
    let mut session = Session::new();
    let result = clean(&mut session, "1 ( this is noise ) 2 +");
    assert_eq!(nums(&result.stack), vec![3.0]);
}

#[test]
fn definition_comment_becomes_the_note() {
    let mut session = Session::new();
    clean(&mut session, ": SQ ( n -- n*n ) dup * ;");
    let def = session.dictionary.find("SQ").expect("SQ should be defined");
    assert_eq!(def.note, "n -- n*n");
    let result = clean(&mut session, "3 SQ");
    assert_eq!(nums(&result.stack), vec![9.0]);
}

#[test]
fn recursive_definition_is_a_clarify_error() {
    let mut session = Session::new();
    clean(&mut session, ": LOOPY LOOPY ;");
    let result = submit(&mut session, "LOOPY");
    let message = result.message.expect("self-reference should report");
    assert!(message.contains("recursive definition: LOOPY"), "{message}");
    assert!(result.stack.is_empty());
}

#[test]
fn mutually_recursive_definitions_terminate() {
    let mut session = Session::new();
    clean(&mut session, ": PING PONG ;");
    clean(&mut session, ": PONG PING ;");
    let result = submit(&mut session, "PING");
    let message = result.message.expect("mutual recursion should report");
    assert!(message.contains("recursive definition"), "{message}");
}

#[test]
fn clarify_is_idempotent_on_literal_sequences() {
    let mut dictionary = Dictionary::new();
    stdlib::install(&mut dictionary);
    let mut errors = ErrorTable::new();

    let lexed = lexer::lex("1 2 + .\" done \"", &mut dictionary, &mut errors);
    let once = clarifier::clarify(&lexed, &mut dictionary, &mut errors);
    let twice = clarifier::clarify(&once, &mut dictionary, &mut errors);

    assert!(errors.okay());
    assert_eq!(once.len(), lexed.len());
    assert_eq!(
        once.iter().map(Value::sym).collect::<Vec<_>>(),
        twice.iter().map(Value::sym).collect::<Vec<_>>()
    );
}

#[test]
fn empty_clears_user_words_and_keeps_natives() {
    let mut session = Session::new();
    clean(&mut session, ": SQ dup * ;");
    clean(&mut session, "empty");
    assert!(!session.dictionary.has("SQ"));
    assert!(session.dictionary.has("+"));
    assert!(session.dictionary.has(".d"));
    let result = submit(&mut session, "3 SQ");
    assert!(result.message.is_some());
}

#[test]
fn bare_bye_and_exit_quit() {
    let mut session = Session::new();
    assert!(submit(&mut session, "bye").is_quit);
    assert!(submit(&mut session, "exit").is_quit);
}

#[test]
fn bye_among_other_words_does_not_quit() {
    let mut session = Session::new();
    let result = submit(&mut session, "1 bye");
    assert!(!result.is_quit);
    assert_eq!(nums(&result.stack), vec![1.0]);
}

#[test]
fn native_phrase_aliases_expand() {
    let mut session = Session::new();
    clean(&mut session, "3");
    let result = clean(&mut session, ".s");
    assert_eq!(nums(&result.stack), vec![3.0]);
    let result = clean(&mut session, ".version");
    assert_eq!(nums(&result.stack), vec![3.0]);
}

#[test]
fn constants_push_their_value() {
    let mut session = Session::new();
    let result = clean(&mut session, "PI");
    assert!((top_num(&result.stack) - std::f64::consts::PI).abs() < 1e-12);
}

#[test]
fn prompt_reports_history_stack_and_dictionary_sizes() {
    let mut session = Session::new();
    let dict_len = session.dict_len();
    assert_eq!(session.prompt(), format!("0,0,{dict_len}> "));
    clean(&mut session, "1 2");
    assert_eq!(session.prompt(), format!("1,2,{dict_len}> "));
    clean(&mut session, ": SQ dup * ;");
    assert_eq!(session.prompt(), format!("2,2,{}> ", dict_len + 1));
}

#[test]
fn history_records_every_line_including_failures() {
    let mut session = Session::new();
    clean(&mut session, "1 2 +");
    submit(&mut session, "frobnicate");
    assert_eq!(session.history_len(), 2);
    assert_eq!(session.history[1], "frobnicate");
}
