//! Literal parameter-set syntax
//!
//! Splits one declared literal into per-parameter tokens.

use serde::{Deserialize, Serialize};

use super::ConfigurationError;

/// How a literal is split into tokens
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSyntax {
    /// Characters separating tokens inside one literal
    #[serde(default = "default_delimiters")]
    pub delimiters: String,

    /// Character that makes the next character literal
    #[serde(default = "default_escape")]
    pub escape: Option<char>,

    /// Strip surrounding whitespace from each token
    #[serde(default = "default_trim")]
    pub trim: bool,
}

fn default_delimiters() -> String {
    ",".to_string()
}

fn default_escape() -> Option<char> {
    Some('\\')
}

fn default_trim() -> bool {
    true
}

impl Default for ParamSyntax {
    fn default() -> Self {
        Self {
            delimiters: default_delimiters(),
            escape: default_escape(),
            trim: default_trim(),
        }
    }
}

impl ParamSyntax {
    pub fn new(delimiters: impl Into<String>) -> Self {
        Self {
            delimiters: delimiters.into(),
            ..Self::default()
        }
    }

    /// Comma or pipe, as accepted by most parameterized-test tools
    pub fn comma_or_pipe() -> Self {
        Self::new(",|")
    }

    pub fn with_escape(mut self, escape: Option<char>) -> Self {
        self.escape = escape;
        self
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.delimiters.is_empty() {
            return Err(ConfigurationError::InvalidSyntax(
                "at least one delimiter is required".to_string(),
            ));
        }
        if let Some(escape) = self.escape {
            if self.delimiters.contains(escape) {
                return Err(ConfigurationError::InvalidSyntax(format!(
                    "escape character {escape:?} is also a delimiter"
                )));
            }
        }
        Ok(())
    }

    fn is_delimiter(&self, c: char) -> bool {
        self.delimiters.contains(c)
    }

    /// Split a literal into tokens.
    ///
    /// An empty literal yields a single empty token; callers decide whether
    /// that means "no arguments" for a zero-arity method. Escaped characters
    /// survive trimming.
    pub fn split(&self, literal: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        // (char, escaped)
        let mut current: Vec<(char, bool)> = Vec::new();
        let mut chars = literal.chars();

        while let Some(c) = chars.next() {
            if Some(c) == self.escape {
                // trailing escape is kept as-is
                match chars.next() {
                    Some(next) => current.push((next, true)),
                    None => current.push((c, false)),
                }
            } else if self.is_delimiter(c) {
                tokens.push(self.finish_token(&std::mem::take(&mut current)));
            } else {
                current.push((c, false));
            }
        }
        tokens.push(self.finish_token(&current));

        tokens
    }

    fn finish_token(&self, token: &[(char, bool)]) -> String {
        let mut token = token;
        if self.trim {
            let trimmable = |&(c, escaped): &(char, bool)| !escaped && c.is_whitespace();
            let start = token
                .iter()
                .position(|p| !trimmable(p))
                .unwrap_or(token.len());
            let end = token
                .iter()
                .rposition(|p| !trimmable(p))
                .map_or(start, |i| i + 1);
            token = &token[start..end];
        }
        token.iter().map(|&(c, _)| c).collect()
    }
}
