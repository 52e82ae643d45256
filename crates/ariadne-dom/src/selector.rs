//! Selectors
//!
//! The subset of CSS selectors the widget markup conventions need: compound
//! selectors made of a tag, ids, classes and attribute tests, grouped with
//! commas. Combinators are not supported; ancestry is expressed with
//! [`DomTree::closest`](crate::DomTree::closest) instead.

use std::iter::Peekable;
use std::str::Chars;

use crate::{DomError, DomResult, ElementData};

/// Attribute test
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrMatch {
    /// `[name]`
    Exists,
    /// `[name="v"]`
    Equals(String),
    /// `[name~="v"]` whitespace-separated word
    Includes(String),
    /// `[name^="v"]`
    Prefix(String),
    /// `[name$="v"]`
    Suffix(String),
    /// `[name*="v"]`
    Substring(String),
}

impl AttrMatch {
    fn test(&self, value: &str) -> bool {
        match self {
            Self::Exists => true,
            Self::Equals(v) => value == v,
            Self::Includes(v) => value.split_whitespace().any(|w| w == v),
            Self::Prefix(v) => value.starts_with(v.as_str()),
            Self::Suffix(v) => value.ends_with(v.as_str()),
            Self::Substring(v) => value.contains(v.as_str()),
        }
    }
}

/// Simple selector for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    Attr { name: String, test: AttrMatch },
}

impl SimpleSelector {
    pub fn matches(&self, elem: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => elem.tag == *tag,
            Self::Id(id) => elem.id() == Some(id.as_str()),
            Self::Class(class) => elem.has_class(class),
            Self::Attr { name, test } => elem.get_attr(name).is_some_and(|v| test.test(v)),
        }
    }
}

/// All parts must match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector(pub Vec<SimpleSelector>);

impl CompoundSelector {
    pub fn matches(&self, elem: &ElementData) -> bool {
        self.0.iter().all(|s| s.matches(elem))
    }
}

/// Selector list, any compound may match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector(pub Vec<CompoundSelector>);

impl Selector {
    /// Parse a selector list such as `.chip[role="checkbox"], button`
    pub fn parse(source: &str) -> DomResult<Self> {
        let invalid = || DomError::InvalidSelector(source.to_string());
        let mut list = Vec::new();
        for part in source.split(',') {
            let compound = parse_compound(part.trim()).ok_or_else(invalid)?;
            list.push(compound);
        }
        Ok(Self(list))
    }

    pub fn matches(&self, elem: &ElementData) -> bool {
        self.0.iter().any(|c| c.matches(elem))
    }
}

impl std::str::FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    (!ident.is_empty()).then_some(ident)
}

fn parse_compound(part: &str) -> Option<CompoundSelector> {
    if part.is_empty() || part.contains(char::is_whitespace) {
        return None;
    }
    let mut chars = part.chars().peekable();
    let mut parts = Vec::new();

    match chars.peek() {
        Some('*') => {
            chars.next();
            parts.push(SimpleSelector::Universal);
        }
        Some(c) if is_ident_char(*c) => {
            parts.push(SimpleSelector::Tag(take_ident(&mut chars)?.to_ascii_lowercase()));
        }
        _ => {}
    }

    while let Some(c) = chars.next() {
        match c {
            '#' => parts.push(SimpleSelector::Id(take_ident(&mut chars)?)),
            '.' => parts.push(SimpleSelector::Class(take_ident(&mut chars)?)),
            '[' => parts.push(parse_attr(&mut chars)?),
            _ => return None,
        }
    }

    (!parts.is_empty()).then_some(CompoundSelector(parts))
}

fn parse_attr(chars: &mut Peekable<Chars<'_>>) -> Option<SimpleSelector> {
    let name = take_ident(chars)?.to_ascii_lowercase();
    let op = match chars.next()? {
        ']' => {
            return Some(SimpleSelector::Attr { name, test: AttrMatch::Exists });
        }
        '=' => '=',
        op @ ('~' | '^' | '$' | '*') => {
            if chars.next()? != '=' {
                return None;
            }
            op
        }
        _ => return None,
    };

    let value = match chars.peek() {
        Some(&quote) if quote == '"' || quote == '\'' => {
            chars.next();
            let mut value = String::new();
            loop {
                match chars.next()? {
                    c if c == quote => break,
                    c => value.push(c),
                }
            }
            value
        }
        _ => take_ident(chars)?,
    };

    if chars.next()? != ']' {
        return None;
    }

    let test = match op {
        '=' => AttrMatch::Equals(value),
        '~' => AttrMatch::Includes(value),
        '^' => AttrMatch::Prefix(value),
        '$' => AttrMatch::Suffix(value),
        _ => AttrMatch::Substring(value),
    };
    Some(SimpleSelector::Attr { name, test })
}
