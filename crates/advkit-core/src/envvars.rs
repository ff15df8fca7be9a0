//! Environment snapshot and macro expansion.
//!
//! User-supplied parameters may reference variables as `${NAME}` or
//! `$NAME`. Expansion replaces known variables and leaves unknown tokens
//! verbatim, so a typo surfaces in the emitted script rather than
//! silently vanishing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An immutable-by-convention set of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVars(BTreeMap<String, String>);

impl EnvVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment.
    pub fn from_process_env() -> Self {
        Self(std::env::vars().collect())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Derive a new set with `other`'s variables layered on top. Used to
    /// apply pipeline-injected build variables over the host environment.
    #[must_use]
    pub fn overlay(&self, other: &Self) -> Self {
        let mut merged = self.0.clone();
        merged.extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self(merged)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Expand `${NAME}` and `$NAME` references against this set.
    /// Unknown variables are left verbatim.
    pub fn expand(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut chars = input.char_indices().peekable();

        while let Some((_, c)) = chars.next() {
            if c != '$' {
                out.push(c);
                continue;
            }
            match chars.peek() {
                Some(&(_, '{')) => {
                    chars.next();
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, n) in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        name.push(n);
                    }
                    match (closed, self.get(&name)) {
                        (true, Some(value)) => out.push_str(value),
                        (true, None) => {
                            out.push_str("${");
                            out.push_str(&name);
                            out.push('}');
                        }
                        (false, _) => {
                            // Unterminated token, keep as typed
                            out.push_str("${");
                            out.push_str(&name);
                        }
                    }
                }
                Some(&(_, n)) if n.is_ascii_alphabetic() || n == '_' => {
                    let mut name = String::new();
                    while let Some(&(_, n)) = chars.peek() {
                        if n.is_ascii_alphanumeric() || n == '_' {
                            name.push(n);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    match self.get(&name) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push('$');
                            out.push_str(&name);
                        }
                    }
                }
                _ => out.push('$'),
            }
        }
        out
    }

    /// Names of every `${NAME}`/`$NAME` token present in `input`.
    pub fn macro_names(input: &str) -> Vec<String> {
        let mut names = Vec::new();
        let mut chars = input.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '$' {
                continue;
            }
            match chars.peek() {
                Some('{') => {
                    chars.next();
                    let mut name = String::new();
                    for n in chars.by_ref() {
                        if n == '}' {
                            names.push(std::mem::take(&mut name));
                            break;
                        }
                        name.push(n);
                    }
                }
                Some(&n) if n.is_ascii_alphabetic() || n == '_' => {
                    let mut name = String::new();
                    while let Some(&n) = chars.peek() {
                        if n.is_ascii_alphanumeric() || n == '_' {
                            name.push(n);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    names.push(name);
                }
                _ => {}
            }
        }
        names
    }
}

impl FromIterator<(String, String)> for EnvVars {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
