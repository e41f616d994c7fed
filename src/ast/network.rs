//! Network and host rule nodes.

use serde::{Deserialize, Serialize};

use super::{HostnameList, ModifierList, Syntax, Value};

/// A basic (network) rule, e.g. `||example.org^$important`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRule {
    pub syntax: Syntax,
    /// `@@` exception prefix
    pub exception: bool,
    pub pattern: Value,
    pub modifiers: Option<ModifierList>,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// A hosts-file style rule, e.g. `127.0.0.1 example.org example.net`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRule {
    pub ip: Value,
    pub hostnames: HostnameList,
    /// Trailing `# comment` on the same line
    pub comment: Option<Value>,
    pub start: Option<u32>,
    pub end: Option<u32>,
}
