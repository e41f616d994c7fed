//! Rule-level dispatch: serialize any rule by category, deserialize any
//! rule by peeking its leading type tag.
//!
//! The dispatcher peeks; the concrete deserializer then consumes and
//! re-asserts the same byte, so a dispatcher/deserializer disagreement
//! surfaces as an immediate tag mismatch.

use crate::ast::{EmptyRule, InvalidRule, InvalidRuleError, RuleNode};
use crate::error::{Error, Result};

use super::buffer::{InputByteBuffer, OutputByteBuffer};
use super::comment::{deserialize_comment, serialize_comment};
use super::cosmetic::{deserialize_cosmetic_rule, serialize_cosmetic_rule};
use super::network::{
    deserialize_host_rule, deserialize_network_rule, serialize_host_rule, serialize_network_rule,
};
use super::type_tag::{BinaryTypeTag, NULL};

#[repr(u8)]
enum EmptyRuleProp {
    Start = 1,
    End = 2,
}

pub fn serialize_empty_rule(node: &EmptyRule, buf: &mut OutputByteBuffer) {
    buf.write_u8(BinaryTypeTag::EmptyRule.as_u8());

    if let Some(start) = node.start {
        buf.write_u8(EmptyRuleProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(EmptyRuleProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
}

pub fn deserialize_empty_rule(buf: &mut InputByteBuffer<'_>) -> Result<EmptyRule> {
    buf.assert_u8(BinaryTypeTag::EmptyRule.as_u8(), "EmptyRule")?;

    let mut node = EmptyRule::default();
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == EmptyRuleProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == EmptyRuleProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "EmptyRule",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

#[repr(u8)]
enum InvalidRuleErrorProp {
    Name = 1,
    Message = 2,
    Start = 3,
    End = 4,
}

pub fn serialize_invalid_rule_error(node: &InvalidRuleError, buf: &mut OutputByteBuffer) {
    buf.write_u8(BinaryTypeTag::InvalidRuleError.as_u8());

    buf.write_u8(InvalidRuleErrorProp::Name as u8);
    buf.write_string(&node.name);

    buf.write_u8(InvalidRuleErrorProp::Message as u8);
    buf.write_string(&node.message);

    if let Some(start) = node.start {
        buf.write_u8(InvalidRuleErrorProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(InvalidRuleErrorProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
}

pub fn deserialize_invalid_rule_error(buf: &mut InputByteBuffer<'_>) -> Result<InvalidRuleError> {
    buf.assert_u8(BinaryTypeTag::InvalidRuleError.as_u8(), "InvalidRuleError")?;

    let mut node = InvalidRuleError {
        name: String::new(),
        message: String::new(),
        start: None,
        end: None,
    };
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == InvalidRuleErrorProp::Name as u8 => {
                node.name = buf.read_string()?;
            }
            t if t == InvalidRuleErrorProp::Message as u8 => {
                node.message = buf.read_string()?;
            }
            t if t == InvalidRuleErrorProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == InvalidRuleErrorProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "InvalidRuleError",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

#[repr(u8)]
enum InvalidRuleProp {
    Raw = 1,
    Error = 2,
    Start = 3,
    End = 4,
}

pub fn serialize_invalid_rule(node: &InvalidRule, buf: &mut OutputByteBuffer) {
    buf.write_u8(BinaryTypeTag::InvalidRule.as_u8());

    buf.write_u8(InvalidRuleProp::Raw as u8);
    buf.write_string(&node.raw);

    buf.write_u8(InvalidRuleProp::Error as u8);
    serialize_invalid_rule_error(&node.error, buf);

    if let Some(start) = node.start {
        buf.write_u8(InvalidRuleProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(InvalidRuleProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
}

pub fn deserialize_invalid_rule(buf: &mut InputByteBuffer<'_>) -> Result<InvalidRule> {
    buf.assert_u8(BinaryTypeTag::InvalidRule.as_u8(), "InvalidRule")?;

    let mut node = InvalidRule {
        raw: String::new(),
        error: InvalidRuleError {
            name: String::new(),
            message: String::new(),
            start: None,
            end: None,
        },
        start: None,
        end: None,
    };
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == InvalidRuleProp::Raw as u8 => {
                node.raw = buf.read_string()?;
            }
            t if t == InvalidRuleProp::Error as u8 => {
                node.error = deserialize_invalid_rule_error(buf)?;
            }
            t if t == InvalidRuleProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == InvalidRuleProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "InvalidRule",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

/// Serialize any rule node by dispatching on its category.
pub fn serialize_rule(node: &RuleNode, buf: &mut OutputByteBuffer) -> Result<()> {
    match node {
        RuleNode::Empty(rule) => {
            serialize_empty_rule(rule, buf);
            Ok(())
        }
        RuleNode::Invalid(rule) => {
            serialize_invalid_rule(rule, buf);
            Ok(())
        }
        RuleNode::Comment(rule) => serialize_comment(rule, buf),
        RuleNode::Network(rule) => serialize_network_rule(rule, buf),
        RuleNode::Host(rule) => serialize_host_rule(rule, buf),
        RuleNode::Cosmetic(rule) => serialize_cosmetic_rule(rule, buf),
    }
}

/// Deserialize any rule node by peeking the leading type tag.
pub fn deserialize_rule(buf: &mut InputByteBuffer<'_>) -> Result<RuleNode> {
    let tag = buf.peek_u8()?;
    match BinaryTypeTag::from_u8(tag) {
        Some(BinaryTypeTag::EmptyRule) => Ok(RuleNode::Empty(deserialize_empty_rule(buf)?)),
        Some(BinaryTypeTag::InvalidRule) => Ok(RuleNode::Invalid(deserialize_invalid_rule(buf)?)),
        Some(
            BinaryTypeTag::CommentRule
            | BinaryTypeTag::AgentRule
            | BinaryTypeTag::HintRule
            | BinaryTypeTag::PreProcessorRule
            | BinaryTypeTag::MetadataRule
            | BinaryTypeTag::ConfigRule,
        ) => Ok(RuleNode::Comment(deserialize_comment(buf)?)),
        Some(BinaryTypeTag::NetworkRule) => Ok(RuleNode::Network(deserialize_network_rule(buf)?)),
        Some(BinaryTypeTag::HostRule) => Ok(RuleNode::Host(deserialize_host_rule(buf)?)),
        Some(
            BinaryTypeTag::ElementHidingRule
            | BinaryTypeTag::CssInjectionRule
            | BinaryTypeTag::AdgScriptletRule
            | BinaryTypeTag::UboScriptletRule
            | BinaryTypeTag::AbpSnippetRule
            | BinaryTypeTag::HtmlFilteringRule
            | BinaryTypeTag::JsInjectionRule,
        ) => Ok(RuleNode::Cosmetic(deserialize_cosmetic_rule(buf)?)),
        _ => Err(Error::UnknownTypeTag(tag)),
    }
}
