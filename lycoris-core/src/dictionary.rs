//! The word dictionary: a byte-keyed trie for longest-match tokenization
//! plus the name → binding table.
//!
//! Built-ins are seeded once at startup and can be neither removed nor
//! shadowed. User entries keep their insertion order for serialization and
//! display; redefining a user word replaces its binding in place.

use std::collections::HashMap;

use log::debug;

use crate::error::EvalError;
use crate::interpreter::Interpreter;
use crate::value::Value;

/// An engine-provided operation bound to a built-in word.
pub type PrimitiveFn = fn(&mut Interpreter) -> Result<(), EvalError>;

/// A user definition: the body vector plus the source text shown in
/// listings and snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct UserWord {
    pub body: Vec<Value>,
    pub source: String,
    pub color: String,
}

#[derive(Debug, Clone)]
pub enum Binding {
    Builtin(PrimitiveFn),
    User(UserWord),
}

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: HashMap<u8, TrieNode>,
    terminal: bool,
}

#[derive(Debug, Clone)]
pub struct Dictionary {
    root: TrieNode,
    bindings: HashMap<String, Binding>,
    user_order: Vec<String>,
}

impl Dictionary {
    pub fn new() -> Self {
        Dictionary {
            root: TrieNode::default(),
            bindings: HashMap::new(),
            user_order: Vec::new(),
        }
    }

    pub(crate) fn insert_builtin(&mut self, name: &str, op: PrimitiveFn) {
        self.bindings.insert(name.to_string(), Binding::Builtin(op));
        self.insert_key(name);
    }

    /// Install or replace a user entry.
    pub fn define(
        &mut self,
        name: &str,
        body: Vec<Value>,
        source: String,
        color: String,
    ) -> Result<(), EvalError> {
        validate_name(name)?;
        if matches!(self.bindings.get(name), Some(Binding::Builtin(_))) {
            return Err(EvalError::NameConflict(name.to_string()));
        }
        let word = UserWord { body, source, color };
        if self.bindings.insert(name.to_string(), Binding::User(word)).is_none() {
            self.user_order.push(name.to_string());
        }
        self.insert_key(name);
        debug!("defined word '{}'", name);
        Ok(())
    }

    /// Remove a user entry.
    pub fn undefine(&mut self, name: &str) -> Result<(), EvalError> {
        match self.bindings.get(name) {
            Some(Binding::Builtin(_)) => Err(EvalError::ProtectedBuiltin(name.to_string())),
            Some(Binding::User(_)) => {
                self.bindings.remove(name);
                self.user_order.retain(|n| n != name);
                self.remove_key(name);
                debug!("removed word '{}'", name);
                Ok(())
            }
            None => Err(EvalError::NotFound(name.to_string())),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        matches!(self.bindings.get(name), Some(Binding::Builtin(_)))
    }

    /// Longest non-empty prefix of `text` that is a dictionary key, as a
    /// byte length. Terminals only sit at the end of complete names, so the
    /// returned length always falls on a character boundary.
    pub fn longest_prefix(&self, text: &str) -> Option<usize> {
        let mut node = &self.root;
        let mut longest = None;
        for (i, byte) in text.bytes().enumerate() {
            match node.children.get(&byte) {
                Some(next) => {
                    node = next;
                    if node.terminal {
                        longest = Some(i + 1);
                    }
                }
                None => break,
            }
        }
        longest
    }

    /// User entries in insertion order.
    pub fn user_entries(&self) -> impl Iterator<Item = (&str, &UserWord)> {
        self.user_order.iter().filter_map(|name| {
            match self.bindings.get(name) {
                Some(Binding::User(word)) => Some((name.as_str(), word)),
                _ => None,
            }
        })
    }

    /// Built-in names, alphabetically.
    pub fn builtin_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .bindings
            .iter()
            .filter(|(_, binding)| matches!(binding, Binding::Builtin(_)))
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    fn insert_key(&mut self, name: &str) {
        let mut node = &mut self.root;
        for byte in name.bytes() {
            node = node.children.entry(byte).or_default();
        }
        node.terminal = true;
    }

    // Unsets the terminal flag; interior nodes are left in place.
    fn remove_key(&mut self, name: &str) {
        let mut node = &mut self.root;
        for byte in name.bytes() {
            match node.children.get_mut(&byte) {
                Some(next) => node = next,
                None => return,
            }
        }
        node.terminal = false;
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

/// A word name must not be empty, must not collide with literal syntax,
/// and must survive re-tokenization as a single word.
pub fn validate_name(name: &str) -> Result<(), EvalError> {
    if name.is_empty() {
        return Err(EvalError::InvalidName("name is empty".to_string()));
    }
    if matches!(name, "true" | "false" | "nil") {
        return Err(EvalError::InvalidName(format!(
            "'{}' is a reserved literal",
            name
        )));
    }
    let mut bytes = name.bytes();
    let first = bytes.next().unwrap_or(0);
    if first.is_ascii_digit() {
        return Err(EvalError::InvalidName(format!(
            "'{}' collides with number syntax",
            name
        )));
    }
    if matches!(first, b'-' | b'+') && name.as_bytes().get(1).is_some_and(u8::is_ascii_digit) {
        return Err(EvalError::InvalidName(format!(
            "'{}' collides with number syntax",
            name
        )));
    }
    if name
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '[' | ']' | '\'' | '#' | '@' | '*' | ':'))
    {
        return Err(EvalError::InvalidName(format!(
            "'{}' contains reserved characters",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut Interpreter) -> Result<(), EvalError> {
        Ok(())
    }

    #[test]
    fn test_longest_prefix() {
        let mut dict = Dictionary::new();
        dict.insert_builtin("add", noop);
        dict.insert_builtin("addall", noop);

        assert_eq!(dict.longest_prefix("addallx"), Some(6));
        assert_eq!(dict.longest_prefix("addx"), Some(3));
        assert_eq!(dict.longest_prefix("ad"), None);
        assert_eq!(dict.longest_prefix(""), None);
    }

    #[test]
    fn test_define_rules() {
        let mut dict = Dictionary::new();
        dict.insert_builtin("add", noop);

        let err = dict
            .define("add", vec![], "[]".to_string(), "green".to_string())
            .unwrap_err();
        assert!(matches!(err, EvalError::NameConflict(_)));

        dict.define("sq", vec![], "[]".to_string(), "green".to_string())
            .unwrap();
        assert!(matches!(dict.lookup("sq"), Some(Binding::User(_))));
        assert_eq!(dict.longest_prefix("sq"), Some(2));
    }

    #[test]
    fn test_redefine_keeps_order() {
        let mut dict = Dictionary::new();
        dict.define("a", vec![], "[]".to_string(), "green".to_string())
            .unwrap();
        dict.define("b", vec![], "[]".to_string(), "green".to_string())
            .unwrap();
        dict.define("a", vec![Value::Nil], "[nil]".to_string(), "green".to_string())
            .unwrap();

        let names: Vec<&str> = dict.user_entries().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);

        match dict.lookup("a") {
            Some(Binding::User(word)) => assert_eq!(word.source, "[nil]"),
            other => panic!("expected user binding, got {:?}", other),
        }
    }

    #[test]
    fn test_undefine() {
        let mut dict = Dictionary::new();
        dict.insert_builtin("add", noop);
        dict.define("sq", vec![], "[]".to_string(), "green".to_string())
            .unwrap();

        assert!(matches!(
            dict.undefine("add"),
            Err(EvalError::ProtectedBuiltin(_))
        ));
        assert!(matches!(dict.undefine("nope"), Err(EvalError::NotFound(_))));

        dict.undefine("sq").unwrap();
        assert!(dict.lookup("sq").is_none());
        assert_eq!(dict.longest_prefix("sq"), None);
        // "add" still resolves after removing the longer neighbor's flag.
        assert_eq!(dict.longest_prefix("add"), Some(3));
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("square").is_ok());
        assert!(validate_name("x2").is_ok());
        assert!(matches!(validate_name(""), Err(EvalError::InvalidName(_))));
        assert!(matches!(validate_name("nil"), Err(EvalError::InvalidName(_))));
        assert!(matches!(validate_name("3x"), Err(EvalError::InvalidName(_))));
        assert!(matches!(validate_name("-2"), Err(EvalError::InvalidName(_))));
        assert!(matches!(validate_name("a b"), Err(EvalError::InvalidName(_))));
        assert!(matches!(validate_name("a:b"), Err(EvalError::InvalidName(_))));
        assert!(matches!(validate_name("@x"), Err(EvalError::InvalidName(_))));
    }
}
