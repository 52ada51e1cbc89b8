//! Token application and scope dispatch.
//!
//! Execution model: literal tokens push themselves; a word-reference token
//! looks its name up and dispatches on the scope modifier. Vectors are data
//! until `run` (or a scope modifier) realizes them as code.
//!
//! The top-level token loop snapshots the stack and dictionary before each
//! token and restores both when the token fails, so partial effects of
//! earlier tokens survive while the failing token itself has none. Nested
//! execution (user-word bodies, `run`, scope application) does not snapshot;
//! a nested failure rolls back the whole enclosing token.

use std::mem;

use log::debug;

use crate::dictionary::Binding;
use crate::error::EvalError;
use crate::interpreter::Interpreter;
use crate::tokenizer::{self, Step, Token};
use crate::value::{Scope, Value};

pub(crate) fn execute_source(interp: &mut Interpreter, source: &str) -> Result<(), EvalError> {
    match execute_inner(interp, source) {
        Ok(()) => Ok(()),
        Err(err) => {
            let description = err.to_string();
            interp.write_line(&description);
            Err(err)
        }
    }
}

fn execute_inner(interp: &mut Interpreter, source: &str) -> Result<(), EvalError> {
    let tokens = tokenizer::tokenize(source, &interp.dictionary)?;
    debug!("applying {} tokens", tokens.len());
    interp.depth = 0;

    // Consume the guard separators here: what remains is pure step
    // segments, so nothing downstream ever sees a `:` again.
    let mut segments: Vec<Vec<Step>> = Vec::new();
    let mut current: Vec<Step> = Vec::new();
    for token in tokens {
        match token {
            Token::Step(step) => current.push(step),
            Token::Guard => segments.push(mem::take(&mut current)),
        }
    }
    if segments.is_empty() {
        return run_steps(interp, &current);
    }
    segments.push(current);
    run_guarded(interp, &segments)
}

fn run_steps(interp: &mut Interpreter, steps: &[Step]) -> Result<(), EvalError> {
    for step in steps {
        let saved_stack = interp.stack.clone();
        let saved_dict = interp.dictionary.clone();
        if let Err(err) = apply_step(interp, step) {
            interp.stack = saved_stack;
            interp.dictionary = saved_dict;
            return Err(err);
        }
    }
    Ok(())
}

fn apply_step(interp: &mut Interpreter, step: &Step) -> Result<(), EvalError> {
    match step {
        Step::Push(value) => {
            interp.push(value.clone());
            Ok(())
        }
        Step::Call(scope, name) => apply_word(interp, *scope, name),
    }
}

/// Guard-clause form: `cond : body :` pairs with a trailing default.
///
/// Each condition runs on a speculative copy of the stack, restored
/// afterward whether or not it matched; the first condition leaving
/// `Bool(true)` on top selects its body, which runs on the real stack.
/// Condition errors propagate rather than falling through.
fn run_guarded(interp: &mut Interpreter, segments: &[Vec<Step>]) -> Result<(), EvalError> {
    if segments.len() % 2 == 0 {
        return Err(EvalError::Syntax(
            "ill-formed guard clause: expected 'cond : body :' pairs with a trailing default"
                .to_string(),
        ));
    }

    let default = &segments[segments.len() - 1];
    for pair in segments[..segments.len() - 1].chunks(2) {
        let (cond, body) = (&pair[0], &pair[1]);

        let saved_stack = interp.stack.clone();
        if let Err(err) = run_steps(interp, cond) {
            interp.stack = saved_stack;
            return Err(err);
        }
        let matched = matches!(interp.stack.last(), Some(Value::Bool(true)));
        interp.stack = saved_stack;

        if matched {
            return run_steps(interp, body);
        }
    }
    run_steps(interp, default)
}

pub(crate) fn apply_word(
    interp: &mut Interpreter,
    scope: Scope,
    name: &str,
) -> Result<(), EvalError> {
    match scope {
        Scope::Local => call_local(interp, name),
        Scope::Map => apply_map(interp, name),
        Scope::Reduce => apply_reduce(interp, name),
        Scope::Global => apply_global(interp, name),
    }
}

fn call_local(interp: &mut Interpreter, name: &str) -> Result<(), EvalError> {
    let binding = interp
        .dictionary
        .lookup(name)
        .cloned()
        .ok_or_else(|| EvalError::UnknownWord(name.to_string()))?;
    match binding {
        Binding::Builtin(op) => op(interp),
        Binding::User(word) => run_quotation(interp, &word.body),
    }
}

/// Execute a vector body: literals push themselves, embedded word
/// references execute. Counts one level against the recursion limit.
pub(crate) fn run_quotation(interp: &mut Interpreter, body: &[Value]) -> Result<(), EvalError> {
    if interp.depth >= interp.limits.max_recursion_depth {
        return Err(EvalError::Limit("recursion too deep".to_string()));
    }
    interp.depth += 1;
    let result = run_body(interp, body);
    interp.depth -= 1;
    result
}

fn run_body(interp: &mut Interpreter, body: &[Value]) -> Result<(), EvalError> {
    for item in body {
        match item {
            Value::Word(scope, name) => apply_word(interp, *scope, name)?,
            other => interp.push(other.clone()),
        }
    }
    Ok(())
}

// Exactly one value left on the working stack, or None.
fn single_result(stack: &mut Vec<Value>) -> Option<Value> {
    if stack.len() == 1 {
        stack.pop()
    } else {
        None
    }
}

/// `@name`: apply per element, re-collect results in order.
///
/// A vector on top gives the plain unary map (working stack `[element]`).
/// A non-vector on top is a shared right-hand operand with the vector
/// beneath it (working stack `[element, operand]`), the broadcasting form
/// `[1 2 3] 2 @mul`.
fn apply_map(interp: &mut Interpreter, name: &str) -> Result<(), EvalError> {
    let context = format!("@{}", name);
    let (vector, operand) = match interp.pop(&context)? {
        Value::Vector(v) => (v, None),
        other => (interp.pop_vector(&context)?, Some(other)),
    };

    let saved_stack = mem::take(&mut interp.stack);
    let mut results = Vec::with_capacity(vector.len());
    for element in vector {
        interp.stack.clear();
        interp.stack.push(element);
        if let Some(op) = &operand {
            interp.stack.push(op.clone());
        }
        if let Err(err) = call_local(interp, name) {
            interp.stack = saved_stack;
            return Err(err);
        }
        match single_result(&mut interp.stack) {
            Some(value) => results.push(value),
            None => {
                interp.stack = saved_stack;
                return Err(EvalError::Arity(format!(
                    "{} must produce exactly one value per element",
                    context
                )));
            }
        }
    }
    interp.stack = saved_stack;
    interp.push(Value::Vector(results));
    Ok(())
}

/// `*name`: left fold, seeded with the first element; the word must be
/// binary (consume two, produce one).
fn apply_reduce(interp: &mut Interpreter, name: &str) -> Result<(), EvalError> {
    let context = format!("*{}", name);
    let vector = interp.pop_vector(&context)?;
    let mut elements = vector.into_iter();
    let mut seed = match elements.next() {
        Some(first) => first,
        None => {
            return Err(EvalError::Domain(format!(
                "{} cannot reduce an empty vector",
                context
            )));
        }
    };

    let saved_stack = mem::take(&mut interp.stack);
    for element in elements {
        interp.stack.clear();
        interp.stack.push(seed);
        interp.stack.push(element);
        if let Err(err) = call_local(interp, name) {
            interp.stack = saved_stack;
            return Err(err);
        }
        seed = match single_result(&mut interp.stack) {
            Some(value) => value,
            None => {
                interp.stack = saved_stack;
                return Err(EvalError::Arity(format!(
                    "{} requires a binary word producing one value",
                    context
                )));
            }
        };
    }
    interp.stack = saved_stack;
    interp.push(seed);
    Ok(())
}

/// `#name`: gather the whole stack into one vector and apply the word to it.
fn apply_global(interp: &mut Interpreter, name: &str) -> Result<(), EvalError> {
    let gathered: Vec<Value> = interp.stack.drain(..).collect();
    interp.push(Value::Vector(gathered));
    call_local(interp, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> Interpreter {
        let mut interp = Interpreter::new();
        interp.execute(source).unwrap();
        interp
    }

    #[test]
    fn test_literals_push_themselves() {
        let interp = run("1 'a' true nil [1 2]");
        assert_eq!(
            interp.stack_snapshot(),
            vec!["1", "'a'", "true", "nil", "[1 2]"]
        );
    }

    #[test]
    fn test_vectors_are_not_executed_on_push() {
        let interp = run("[1 2 add]");
        assert_eq!(interp.stack_snapshot(), vec!["[1 2 add]"]);
    }

    #[test]
    fn test_unknown_word_in_stale_body() {
        // A body captured before its word was removed still holds the
        // reference; executing it is the UnknownWord path.
        let mut interp = Interpreter::new();
        interp.execute("[dup mul] 'sq' def").unwrap();
        interp.execute("[sq]").unwrap();
        interp.execute("'sq' undef").unwrap();
        let err = interp.execute("run").unwrap_err();
        assert!(matches!(err, EvalError::UnknownWord(name) if name == "sq"));
    }

    #[test]
    fn test_map_unary_and_broadcast() {
        let interp = run("[1 2 3] 2 @mul");
        assert_eq!(interp.stack_snapshot(), vec!["[2 4 6]"]);

        let interp = run("[[1 2] [3 4 5]] @length");
        assert_eq!(interp.stack_snapshot(), vec!["[2 3]"]);
    }

    #[test]
    fn test_map_arity_enforced() {
        let mut interp = Interpreter::new();
        let err = interp.execute("[1 2] @dup").unwrap_err();
        assert!(matches!(err, EvalError::Arity(_)));
        // Rolled back: the vector is still there.
        assert_eq!(interp.stack_snapshot(), vec!["[1 2]"]);
    }

    #[test]
    fn test_reduce() {
        let interp = run("[1 2 3 4 5] *add");
        assert_eq!(interp.stack_snapshot(), vec!["15"]);

        let mut interp = Interpreter::new();
        let err = interp.execute("[] *add").unwrap_err();
        assert!(matches!(err, EvalError::Domain(_)));
    }

    #[test]
    fn test_global_applies_to_whole_stack() {
        let interp = run("1 2 3 #length");
        assert_eq!(interp.stack_snapshot(), vec!["3"]);

        let interp = run("1 2 3 #unpack");
        assert_eq!(interp.stack_snapshot(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_guard_clauses() {
        // Conditions run on a speculative copy of the stack, so the tested
        // value is staged by an earlier call.
        let mut interp = Interpreter::new();
        interp.execute("10").unwrap();
        interp.execute("dup 5 gt : 100 : 0").unwrap();
        assert_eq!(interp.stack_snapshot(), vec!["10", "100"]);

        let mut interp = Interpreter::new();
        interp.execute("1").unwrap();
        interp.execute("dup 5 gt : 100 : 0").unwrap();
        assert_eq!(interp.stack_snapshot(), vec!["1", "0"]);

        // First matching clause wins; later clauses and default are skipped.
        let mut interp = Interpreter::new();
        interp.execute("7").unwrap();
        interp
            .execute("dup 5 gt : 'big' : dup 0 gt : 'pos' : 'other'")
            .unwrap();
        assert_eq!(interp.stack_snapshot(), vec!["7", "'big'"]);
    }

    #[test]
    fn test_guard_condition_effects_are_discarded() {
        // The 99 pushed while testing the condition does not survive.
        let mut interp = Interpreter::new();
        interp.execute("99 true : 1 : 2").unwrap();
        assert_eq!(interp.stack_snapshot(), vec!["1"]);
    }

    #[test]
    fn test_guard_missing_separator() {
        let mut interp = Interpreter::new();
        let err = interp.execute("true : 1").unwrap_err();
        assert!(matches!(err, EvalError::Syntax(_)));
    }

    #[test]
    fn test_guard_condition_errors_propagate() {
        let mut interp = Interpreter::new();
        let err = interp.execute("1 0 div : 1 : 2").unwrap_err();
        assert!(matches!(err, EvalError::Domain(_)));
        // Speculative stack discarded.
        assert!(interp.stack_snapshot().is_empty());
    }

    #[test]
    fn test_recursion_limit() {
        let mut interp = Interpreter::new();
        // 'loop' calls itself forever once defined in two steps.
        interp.execute("[] 'loop' def").unwrap();
        interp.execute("[loop] 'loop' def").unwrap();
        let err = interp.execute("loop").unwrap_err();
        assert!(matches!(err, EvalError::Limit(_)));
    }

    #[test]
    fn test_rollback_keeps_earlier_tokens() {
        let mut interp = Interpreter::new();
        let err = interp.execute("1 2 3 add add add").unwrap_err();
        assert!(matches!(err, EvalError::Arity(_)));
        // 1 2 3 pushed, two adds applied; the third add rolled back.
        assert_eq!(interp.stack_snapshot(), vec!["6"]);
    }
}
