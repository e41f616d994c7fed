//! Typed AST for adblock filter rules.
//!
//! Every node carries optional `start`/`end` byte offsets into the source
//! text. Offsets are populated by the parser and preserved exactly by the
//! binary round-trip: a node whose offsets were never tracked serializes
//! without them and deserializes with them absent, not zeroed.

mod comment;
mod cosmetic;
mod network;

pub use comment::{
    Agent, AgentRule, CommentMarker, CommentNode, CommentRule, ConfigRule, Hint, HintRule,
    MetadataRule, PreProcessorParams, PreProcessorRule,
};
pub use cosmetic::{
    CosmeticBody, CosmeticRule, CosmeticSeparator, CssInjectionBody, ElementHidingBody,
    HtmlFilteringBody, ScriptletBody,
};
pub use network::{HostRule, NetworkRule};

use serde::{Deserialize, Serialize};

/// Adblock syntax dialect a rule belongs to.
///
/// `Common` is the universal default and is never written to the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Syntax {
    /// Understood by every adblocker
    #[default]
    Common = 0,
    /// AdGuard
    AdGuard = 1,
    /// uBlock Origin
    UblockOrigin = 2,
    /// Adblock Plus
    AdblockPlus = 3,
}

impl Syntax {
    /// Convert to a u8 value for binary serialization.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Convert from a u8 value.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Syntax::Common),
            1 => Some(Syntax::AdGuard),
            2 => Some(Syntax::UblockOrigin),
            3 => Some(Syntax::AdblockPlus),
            _ => None,
        }
    }
}

/// A plain string value with optional source offsets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Value {
    pub value: String,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

impl Value {
    /// Create a value without source offsets.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            start: None,
            end: None,
        }
    }

    /// Create a value with source offsets.
    pub fn with_span(value: impl Into<String>, start: u32, end: u32) -> Self {
        Self {
            value: value.into(),
            start: Some(start),
            end: Some(end),
        }
    }
}

/// A single rule modifier, e.g. `third-party` or `domain=example.org`.
///
/// `exception` marks a `~`-negated modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub name: Value,
    pub value: Option<Value>,
    pub exception: bool,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// An ordered list of modifiers (the `$...` part of a network rule).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModifierList {
    pub children: Vec<Modifier>,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// An ordered list of values, e.g. scriptlet call arguments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParameterList {
    pub children: Vec<Value>,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// What a [`ListItem`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListItemKind {
    Domain,
    App,
    Method,
    StealthOption,
}

/// A single entry of a domain/app/method list, with `~` negation support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub kind: ListItemKind,
    pub exception: bool,
    pub value: String,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

impl ListItem {
    /// Create a non-negated domain item without offsets.
    pub fn domain(value: impl Into<String>) -> Self {
        Self {
            kind: ListItemKind::Domain,
            exception: false,
            value: value.into(),
            start: None,
            end: None,
        }
    }
}

/// Separator character used between domain-list entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum DomainListSeparator {
    #[default]
    Comma = 0,
    Pipe = 1,
}

impl DomainListSeparator {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(DomainListSeparator::Comma),
            1 => Some(DomainListSeparator::Pipe),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            DomainListSeparator::Comma => ',',
            DomainListSeparator::Pipe => '|',
        }
    }
}

/// The domain restriction list of a cosmetic rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DomainList {
    pub separator: DomainListSeparator,
    pub children: Vec<ListItem>,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// Hostnames on the right-hand side of a hosts-file rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HostnameList {
    pub children: Vec<Value>,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// A blank line in a filter list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmptyRule {
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// The error attached to an [`InvalidRule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidRuleError {
    pub name: String,
    pub message: String,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// A rule that failed to parse, kept with its raw text and error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidRule {
    pub raw: String,
    pub error: InvalidRuleError,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// Any single filter-list rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleNode {
    Empty(EmptyRule),
    Invalid(InvalidRule),
    Comment(CommentNode),
    Network(NetworkRule),
    Host(HostRule),
    Cosmetic(CosmeticRule),
}

impl RuleNode {
    /// Syntax dialect of the rule. `Common` for kinds that have no dialect.
    pub fn syntax(&self) -> Syntax {
        match self {
            RuleNode::Network(r) => r.syntax,
            RuleNode::Cosmetic(r) => r.syntax,
            _ => Syntax::Common,
        }
    }
}

/// An ordered collection of rules, as parsed from one filter-list file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterList {
    pub children: Vec<RuleNode>,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_roundtrip() {
        for syntax in [
            Syntax::Common,
            Syntax::AdGuard,
            Syntax::UblockOrigin,
            Syntax::AdblockPlus,
        ] {
            assert_eq!(Syntax::from_u8(syntax.as_u8()), Some(syntax));
        }
        assert_eq!(Syntax::from_u8(4), None);
    }

    #[test]
    fn test_value_constructors() {
        let v = Value::new("example.org");
        assert_eq!(v.value, "example.org");
        assert!(v.start.is_none());

        let v = Value::with_span("example.org", 5, 16);
        assert_eq!(v.start, Some(5));
        assert_eq!(v.end, Some(16));
    }

    #[test]
    fn test_domain_list_separator() {
        assert_eq!(DomainListSeparator::Comma.as_char(), ',');
        assert_eq!(DomainListSeparator::Pipe.as_char(), '|');
        assert_eq!(
            DomainListSeparator::from_u8(1),
            Some(DomainListSeparator::Pipe)
        );
        assert_eq!(DomainListSeparator::from_u8(2), None);
    }
}
