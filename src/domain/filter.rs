//! Tag filter expressions
//!
//! A filter is an ordered chain of tags joined by connectors:
//! `tag₁ ⊕₁ tag₂ ⊕₂ tag₃ …` where each ⊕ is AND or OR.
//!
//! ## Evaluation
//!
//! Expressions are folded strictly left to right with no precedence:
//! `A OR B AND C` means `(A OR B) AND C`, never `A OR (B AND C)`.
//!
//! ## Editing
//!
//! Expressions are edited one tag at a time ([`FilterExpression::toggle_tag`])
//! or one connector at a time ([`FilterExpression::toggle_connector`]).
//! After every edit there is exactly one connector fewer than there are tags
//! (or none when empty).

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::card::Card;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Connector index {index} out of range (expression has {len} connectors)")]
    OutOfRange { index: usize, len: usize },

    #[error("Invalid filter expression: {0}")]
    Parse(String),
}

/// Binary operator between two consecutive tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Connector {
    #[default]
    And,
    Or,
}

impl Connector {
    /// Returns the other connector
    pub fn flipped(self) -> Self {
        match self {
            Connector::And => Connector::Or,
            Connector::Or => Connector::And,
        }
    }

    /// Combines the accumulated result with the next term
    pub fn apply(self, acc: bool, term: bool) -> bool {
        match self {
            Connector::And => acc && term,
            Connector::Or => acc || term,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }

    fn from_keyword(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("and") {
            Some(Connector::And)
        } else if word.eq_ignore_ascii_case("or") {
            Some(Connector::Or)
        } else {
            None
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered tags and the connectors between them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterExpression {
    tags: Vec<String>,
    connectors: Vec<Connector>,
}

impl FilterExpression {
    /// Creates an empty expression (matches every card)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true if the tag is part of the expression
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Adds the tag if absent, removes it if present.
    ///
    /// A new tag is appended and joined to its predecessor with `AND`.
    /// Removing a tag drops one connector:
    /// - first tag: the connector after it
    /// - last tag: the connector before it
    /// - interior tag: the connector after it, so the one before it now
    ///   joins the former neighbours
    pub fn toggle_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();

        let Some(index) = self.tags.iter().position(|t| *t == tag) else {
            if !self.tags.is_empty() {
                self.connectors.push(Connector::And);
            }
            self.tags.push(tag);
            return;
        };

        self.tags.remove(index);

        if self.connectors.is_empty() {
            return;
        }

        if index == 0 {
            self.connectors.remove(0);
        } else if index == self.connectors.len() {
            self.connectors.pop();
        } else {
            self.connectors.remove(index);
        }
    }

    /// Flips the connector at `index` between AND and OR
    pub fn toggle_connector(&mut self, index: usize) -> Result<(), FilterError> {
        let len = self.connectors.len();
        let connector = self
            .connectors
            .get_mut(index)
            .ok_or(FilterError::OutOfRange { index, len })?;
        *connector = connector.flipped();
        Ok(())
    }

    /// Evaluates the expression against one card by left fold
    pub fn matches(&self, card: &Card) -> bool {
        let mut tags = self.tags.iter();
        let Some(first) = tags.next() else {
            return true;
        };

        self.connectors
            .iter()
            .zip(tags)
            .fold(card.has_tag(first), |acc, (connector, tag)| {
                connector.apply(acc, card.has_tag(tag))
            })
    }

    /// Returns the cards matching the expression, in input order
    pub fn evaluate(&self, cards: &[Card]) -> Vec<Card> {
        if self.is_empty() {
            return cards.to_vec();
        }
        cards.iter().filter(|c| self.matches(c)).cloned().collect()
    }

    /// Parses the textual form, e.g. `verbs OR nouns AND "past tense"`.
    ///
    /// Keywords are case-insensitive. Tags containing whitespace, or equal
    /// to a keyword, must be double-quoted. The expression is assembled
    /// through [`toggle_tag`](Self::toggle_tag) and
    /// [`toggle_connector`](Self::toggle_connector).
    pub fn parse(input: &str) -> Result<Self, FilterError> {
        let mut expr = Self::new();
        let mut staged: Vec<Connector> = Vec::new();
        let mut expect_tag = true;

        for token in tokenize(input)? {
            match (expect_tag, token) {
                (true, Token::Tag(tag)) => {
                    if expr.contains(&tag) {
                        return Err(FilterError::Parse(format!(
                            "tag '{}' appears more than once",
                            tag
                        )));
                    }
                    expr.toggle_tag(tag);
                    expect_tag = false;
                }
                (true, Token::Connector(c)) => {
                    return Err(FilterError::Parse(format!("expected a tag before '{}'", c)));
                }
                (false, Token::Connector(c)) => {
                    staged.push(c);
                    expect_tag = true;
                }
                (false, Token::Tag(tag)) => {
                    return Err(FilterError::Parse(format!("missing AND/OR before '{}'", tag)));
                }
            }
        }

        if expect_tag && !expr.is_empty() {
            return Err(FilterError::Parse("expression ends with a connector".to_string()));
        }

        // New tags are joined with AND; flip the ones written as OR
        for (index, connector) in staged.into_iter().enumerate() {
            if connector == Connector::Or {
                expr.toggle_connector(index)?;
            }
        }

        Ok(expr)
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.tags.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", self.connectors[i - 1])?;
            }
            write_tag(f, tag)?;
        }
        Ok(())
    }
}

fn write_tag(f: &mut fmt::Formatter<'_>, tag: &str) -> fmt::Result {
    let needs_quotes = tag.is_empty()
        || tag.chars().any(|c| c.is_whitespace() || c == '"')
        || Connector::from_keyword(tag).is_some();

    if !needs_quotes {
        return f.write_str(tag);
    }

    f.write_str("\"")?;
    for c in tag.chars() {
        if c == '"' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{}", c)?;
    }
    f.write_str("\"")
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Tag(String),
    Connector(Connector),
}

fn tokenize(input: &str) -> Result<Vec<Token>, FilterError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '"' {
            chars.next();
            let mut tag = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some(escaped) => tag.push(escaped),
                        None => return Err(FilterError::Parse("unterminated quote".to_string())),
                    },
                    Some(other) => tag.push(other),
                    None => return Err(FilterError::Parse("unterminated quote".to_string())),
                }
            }
            tokens.push(Token::Tag(tag));
            continue;
        }

        let mut word = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() || c == '"' {
                break;
            }
            word.push(c);
            chars.next();
        }

        match Connector::from_keyword(&word) {
            Some(connector) => tokens.push(Token::Connector(connector)),
            None => tokens.push(Token::Tag(word)),
        }
    }

    Ok(tokens)
}
