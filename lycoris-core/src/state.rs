//! Persistence of the user dictionary.
//!
//! Snapshots capture the *source form* of user words (canonical body text),
//! not internal structures, so blobs stay forward-compatible with evaluator
//! changes. Built-ins and the stack are never persisted.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::interpreter::Interpreter;
use crate::tokenizer::{self, Step, Token};
use crate::value::Value;

#[derive(Debug, Serialize, Deserialize)]
struct SavedWord {
    name: String,
    body: String,
    color: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct SavedState {
    words: Vec<SavedWord>,
}

/// Outcome of [`Interpreter::load_state`]: how many entries were installed
/// and which were skipped, with the reason for each.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub installed: usize,
    pub skipped: Vec<(String, EvalError)>,
}

pub(crate) fn save(interp: &Interpreter) -> String {
    let state = SavedState {
        words: interp
            .dictionary
            .user_entries()
            .map(|(name, word)| SavedWord {
                name: name.to_string(),
                body: word.source.clone(),
                color: word.color.clone(),
            })
            .collect(),
    };
    serde_json::to_string(&state).unwrap_or_else(|_| String::from(r#"{"words":[]}"#))
}

// Entries install in saved order, so a body may only reference words saved
// before it (or built-ins); anything else fails to tokenize and is skipped.
pub(crate) fn load(interp: &mut Interpreter, blob: &str) -> Result<LoadReport, EvalError> {
    let state: SavedState =
        serde_json::from_str(blob).map_err(|e| EvalError::CorruptState(e.to_string()))?;

    let mut report = LoadReport::default();
    for entry in state.words {
        let outcome = parse_body(interp, &entry.body).and_then(|body| {
            interp
                .dictionary
                .define(&entry.name, body, entry.body.clone(), entry.color.clone())
        });
        match outcome {
            Ok(()) => report.installed += 1,
            Err(cause) => {
                let err = EvalError::CorruptState(format!("word '{}': {}", entry.name, cause));
                warn!("skipping dictionary entry: {}", err);
                report.skipped.push((entry.name, err));
            }
        }
    }
    Ok(report)
}

// A stored body must re-tokenize to exactly one vector literal.
fn parse_body(interp: &Interpreter, source: &str) -> Result<Vec<Value>, EvalError> {
    let mut tokens = tokenizer::tokenize(source, &interp.dictionary)?;
    match (tokens.pop(), tokens.is_empty()) {
        (Some(Token::Step(Step::Push(Value::Vector(body)))), true) => Ok(body),
        _ => Err(EvalError::CorruptState(
            "body is not a single vector".to_string(),
        )),
    }
}
