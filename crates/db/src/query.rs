//! Restricted query dialect of the transactional store
//!
//! A query is a conjunction of selectors separated by whitespace or `AND`:
//!
//! ```text
//! TEXT:budget TYPE:"cm:content" AND @cm:name:report*
//! ```
//!
//! | Selector | Matches |
//! |----------|---------|
//! | `TEXT:v` or bare `v` | full text contains `v` (case-insensitive) |
//! | `TYPE:v` | node type equals `v` |
//! | `PARENT:v` | primary parent equals `v` |
//! | `@prefix:name:v` or `name:v` | property value equals `v` (case-insensitive) |
//!
//! A trailing `*` turns a value into a prefix match. Anything richer
//! (disjunction, negation, grouping, fuzzy or range terms, CMIS selects and
//! joins) is a model error so the caller can route the query elsewhere.

use crate::store::Node;
use tessera_core::{EntityRef, Error, Result};

/// A value to match, lowercased
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    value: String,
    prefix: bool,
}

impl Pattern {
    fn parse(raw: &str) -> Result<Self> {
        let (value, prefix) = match raw.strip_suffix('*') {
            Some(stem) => (stem, true),
            None => (raw, false),
        };
        if value.contains('*') || value.contains('?') {
            return Err(Error::query_model(format!(
                "embedded wildcards are not supported: {}",
                raw
            )));
        }
        if value.is_empty() {
            return Err(Error::query_model("empty match value"));
        }
        Ok(Pattern {
            value: value.to_lowercase(),
            prefix,
        })
    }

    fn matches_value(&self, candidate: &str) -> bool {
        let candidate = candidate.to_lowercase();
        if self.prefix {
            candidate.starts_with(&self.value)
        } else {
            candidate == self.value
        }
    }

    fn matches_text(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        if self.prefix {
            text.split_whitespace().any(|word| word.starts_with(&self.value))
        } else {
            text.contains(&self.value)
        }
    }
}

/// One selector of a conjunction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// Full-text match
    Text(Pattern),
    /// Exact node type
    Type(String),
    /// Exact primary parent
    Parent(EntityRef),
    /// Property value match
    Property {
        /// Property name
        name: String,
        /// Value to match
        pattern: Pattern,
    },
}

impl Term {
    fn matches(&self, node: &Node) -> bool {
        match self {
            Term::Text(pattern) => pattern.matches_text(&node.text),
            Term::Type(node_type) => node.node_type == *node_type,
            Term::Parent(parent) => node.parent.as_ref() == Some(parent),
            Term::Property { name, pattern } => node
                .properties
                .get(name)
                .map(|value| pattern.matches_value(&value.to_string()))
                .unwrap_or(false),
        }
    }
}

/// Parsed query in the store's dialect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbQuery {
    terms: Vec<Term>,
}

impl DbQuery {
    /// Parse `query`, failing with `QueryModel` on anything outside the dialect
    pub fn parse(query: &str) -> Result<Self> {
        let tokens = tokenize(query)?;
        if tokens
            .first()
            .map(|t| t.raw.eq_ignore_ascii_case("select"))
            .unwrap_or(false)
        {
            return Err(Error::query_model("CMIS selects are not supported"));
        }

        let mut terms = Vec::with_capacity(tokens.len());
        for token in tokens {
            if !token.quoted {
                match token.raw.as_str() {
                    "AND" | "&&" => continue,
                    "OR" | "||" => return Err(Error::query_model("disjunction is not supported")),
                    "NOT" => return Err(Error::query_model("negation is not supported")),
                    other if other.eq_ignore_ascii_case("join") => {
                        return Err(Error::query_model("joins are not supported"))
                    }
                    _ => {}
                }
            }
            terms.push(parse_term(&token)?);
        }

        if terms.is_empty() {
            return Err(Error::query_model("empty query"));
        }
        Ok(DbQuery { terms })
    }

    /// Selectors in query order
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Whether `node` satisfies every selector
    pub fn matches(&self, node: &Node) -> bool {
        self.terms.iter().all(|term| term.matches(node))
    }
}

#[derive(Debug)]
struct Token {
    /// Text with quotes removed
    raw: String,
    /// Whether any part was quoted
    quoted: bool,
    /// Byte offset of the field separator, if outside quotes
    colon: Option<usize>,
    /// Byte offset of a second field separator (for `@prefix:name:value`)
    second_colon: Option<usize>,
}

fn tokenize(query: &str) -> Result<Vec<Token>> {
    let mut tokens = vec![];
    let mut current: Option<Token> = None;
    let mut in_quotes = false;

    for c in query.chars() {
        if in_quotes {
            if c == '"' {
                in_quotes = false;
            } else if let Some(token) = current.as_mut() {
                token.raw.push(c);
            }
            continue;
        }
        match c {
            c if c.is_whitespace() => tokens.extend(current.take()),
            '"' => {
                in_quotes = true;
                current.get_or_insert_with(empty_token).quoted = true;
            }
            '(' | ')' => return Err(Error::query_model("grouping is not supported")),
            '~' | '^' => {
                return Err(Error::query_model("fuzzy and boosted terms are not supported"))
            }
            '[' | ']' | '{' | '}' => return Err(Error::query_model("ranges are not supported")),
            '-' | '!' if current.is_none() => {
                return Err(Error::query_model("negation is not supported"))
            }
            '+' if current.is_none() => {}
            ':' => {
                let token = current.get_or_insert_with(empty_token);
                if token.colon.is_none() {
                    token.colon = Some(token.raw.len());
                } else if token.second_colon.is_none() {
                    token.second_colon = Some(token.raw.len());
                }
                token.raw.push(c);
            }
            c => current.get_or_insert_with(empty_token).raw.push(c),
        }
    }

    if in_quotes {
        return Err(Error::query_model("unterminated quote"));
    }
    tokens.extend(current);
    Ok(tokens)
}

fn empty_token() -> Token {
    Token {
        raw: String::new(),
        quoted: false,
        colon: None,
        second_colon: None,
    }
}

fn parse_term(token: &Token) -> Result<Term> {
    let Some(colon) = token.colon else {
        return Ok(Term::Text(Pattern::parse(&token.raw)?));
    };

    if token.raw.starts_with('@') {
        // @prefix:name:value
        let split = token.second_colon.ok_or_else(|| {
            Error::query_model(format!("property term without a value: {}", token.raw))
        })?;
        return Ok(Term::Property {
            name: token.raw[1..split].to_string(),
            pattern: Pattern::parse(&token.raw[split + 1..])?,
        });
    }

    let field = &token.raw[..colon];
    let value = &token.raw[colon + 1..];
    match field.to_ascii_uppercase().as_str() {
        "TEXT" => Ok(Term::Text(Pattern::parse(value)?)),
        "TYPE" => Ok(Term::Type(value.to_string())),
        "PARENT" => Ok(Term::Parent(EntityRef::new(value))),
        _ if field.is_empty() => Err(Error::query_model(format!(
            "term without a field: {}",
            token.raw
        ))),
        _ => Ok(Term::Property {
            name: field.to_string(),
            pattern: Pattern::parse(value)?,
        }),
    }
}
