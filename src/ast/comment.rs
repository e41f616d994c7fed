//! Comment rule nodes.

use serde::{Deserialize, Serialize};

use super::{ParameterList, Value};

/// Character that introduced a comment line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CommentMarker {
    /// `!` (adblock style)
    #[default]
    Exclamation = 0,
    /// `#` (hosts-file style)
    Hash = 1,
}

impl CommentMarker {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(CommentMarker::Exclamation),
            1 => Some(CommentMarker::Hash),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            CommentMarker::Exclamation => '!',
            CommentMarker::Hash => '#',
        }
    }
}

/// A plain comment line, e.g. `! this is a comment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRule {
    pub marker: CommentMarker,
    pub text: Value,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// One adblocker name/version pair inside an agent comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub adblock: Value,
    pub version: Option<Value>,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// An agent comment, e.g. `[Adblock Plus 2.0; AdGuard]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgentRule {
    pub children: Vec<Agent>,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// One hint inside a hint comment, e.g. `PLATFORM(windows, mac)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub name: Value,
    pub params: Option<ParameterList>,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// An AdGuard hint comment, e.g. `!+ NOT_OPTIMIZED PLATFORM(windows)`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HintRule {
    pub children: Vec<Hint>,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// Parameters of a pre-processor directive.
///
/// `!#if (condition)` keeps its condition as a raw value; directives with a
/// parenthesized argument list, such as `!#safari_cb_affinity(general)`,
/// keep a parsed parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreProcessorParams {
    Raw(Value),
    List(ParameterList),
}

/// A pre-processor comment, e.g. `!#if (adguard)` or `!#include url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreProcessorRule {
    pub name: Value,
    pub params: Option<PreProcessorParams>,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// A metadata comment, e.g. `! Title: AdGuard Base filter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRule {
    pub marker: CommentMarker,
    pub header: Value,
    pub value: Value,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// An inline linter-configuration comment, e.g. `! aglint-disable rule`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRule {
    pub marker: CommentMarker,
    pub command: Value,
    pub params: Option<Value>,
    pub comment: Option<Value>,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// Any comment rule variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentNode {
    Simple(CommentRule),
    Agent(AgentRule),
    Hint(HintRule),
    PreProcessor(PreProcessorRule),
    Metadata(MetadataRule),
    Config(ConfigRule),
}
