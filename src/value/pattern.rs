//! Line patterns and line formats
//!
//! Both use `{name}` placeholders, with `{{` and `}}` for literal braces.
//!
//! ## Pattern Matching
//! `"{key}: {value}"` compiles to an anchored regex where every field is a
//! lazy capture:
//! ```text
//!   (?si)^(?P<key>.+?):\ (?P<value>.+?)$
//! ```
//! The whole line has to match. `{}` is an anonymous field that must match
//! something but is not captured. Literal text matches case-insensitively;
//! captured fields keep the case of the input.

use std::collections::HashMap;

use regex_lite::Regex;

use crate::error::{CliError, Result};

/// Tokens shared by patterns and formats
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Field(Option<String>),
}

fn tokenize(template: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => {
                            return Err(CliError::Pattern(format!(
                                "unclosed '{{' in '{}'",
                                template
                            )))
                        }
                    }
                }

                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }

                if name.is_empty() {
                    tokens.push(Token::Field(None));
                } else if is_identifier(&name) {
                    tokens.push(Token::Field(Some(name)));
                } else {
                    return Err(CliError::Pattern(format!(
                        "invalid field name '{}' in '{}'",
                        name, template
                    )));
                }
            }
            '}' => {
                return Err(CliError::Pattern(format!(
                    "single '}}' in '{}'",
                    template
                )))
            }
            c => literal.push(c),
        }
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }

    Ok(tokens)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line)
}

// =============================================================================
// LinePattern
// =============================================================================

/// Compiled input pattern for `put --line`
#[derive(Debug, Clone)]
pub struct LinePattern {
    source: String,
    regex: Regex,
    fields: Vec<String>,
}

/// Named fields captured from one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    fields: HashMap<String, String>,
}

impl LineMatch {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

impl LinePattern {
    /// Compile a pattern such as `"{key}: {value}"`
    pub fn compile(pattern: &str) -> Result<Self> {
        let tokens = tokenize(pattern)?;
        let mut expr = String::from("(?si)^");
        let mut fields = Vec::new();

        for token in tokens {
            match token {
                Token::Literal(text) => expr.push_str(&regex_lite::escape(&text)),
                Token::Field(None) => expr.push_str("(?:.+?)"),
                Token::Field(Some(name)) => {
                    if fields.contains(&name) {
                        return Err(CliError::Pattern(format!(
                            "field '{}' appears more than once in '{}'",
                            name, pattern
                        )));
                    }
                    expr.push_str(&format!("(?P<{}>.+?)", name));
                    fields.push(name);
                }
            }
        }
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|e| CliError::Pattern(e.to_string()))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
            fields,
        })
    }

    /// Whether the pattern captures a field with this name
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    /// Match one input line, ignoring its line ending
    pub fn parse(&self, line: &str) -> Option<LineMatch> {
        let captures = self.regex.captures(strip_line_ending(line))?;
        let fields = self
            .fields
            .iter()
            .filter_map(|name| {
                captures
                    .name(name)
                    .map(|m| (name.clone(), m.as_str().to_string()))
            })
            .collect();

        Some(LineMatch { fields })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

// =============================================================================
// LineFormat
// =============================================================================

/// Output format for received samples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFormat {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Key,
    Value,
}

impl LineFormat {
    /// Parse a format; only `{key}` and `{value}` are allowed
    pub fn parse(format: &str) -> Result<Self> {
        let segments = tokenize(format)?
            .into_iter()
            .map(|token| match token {
                Token::Literal(text) => Ok(Segment::Literal(text)),
                Token::Field(Some(name)) if name == "key" => Ok(Segment::Key),
                Token::Field(Some(name)) if name == "value" => Ok(Segment::Value),
                Token::Field(name) => Err(CliError::Pattern(format!(
                    "unknown field '{{{}}}' in '{}', expected {{key}} or {{value}}",
                    name.unwrap_or_default(),
                    format
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { segments })
    }

    /// Render one sample; trailing whitespace is dropped
    pub fn render(&self, key: &str, value: &str) -> String {
        let mut line = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => line.push_str(text),
                Segment::Key => line.push_str(key),
                Segment::Value => line.push_str(value),
            }
        }
        line.truncate(line.trim_end().len());
        line
    }
}

impl Default for LineFormat {
    fn default() -> Self {
        Self {
            segments: vec![Segment::Value],
        }
    }
}
