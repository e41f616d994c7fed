//! Serializers/deserializers for comment rule variants.

use crate::ast::{
    Agent, AgentRule, CommentMarker, CommentNode, CommentRule, ConfigRule, Hint, HintRule,
    MetadataRule, PreProcessorParams, PreProcessorRule,
};
use crate::error::{Error, Result};

use super::buffer::{InputByteBuffer, OutputByteBuffer};
use super::check_capacity;
use super::lists::{deserialize_parameter_list, serialize_parameter_list};
use super::maps::{HINT_NAMES, METADATA_HEADERS, PLATFORM_NAMES, PREPROCESSOR_NAMES};
use super::type_tag::{BinaryTypeTag, NULL};
use super::value::{deserialize_value, serialize_value};

#[repr(u8)]
enum CommentRuleProp {
    Marker = 1,
    Text = 2,
    Start = 3,
    End = 4,
}

pub fn serialize_comment_rule(node: &CommentRule, buf: &mut OutputByteBuffer) {
    buf.write_u8(BinaryTypeTag::CommentRule.as_u8());

    if node.marker != CommentMarker::default() {
        buf.write_u8(CommentRuleProp::Marker as u8);
        buf.write_u8(node.marker.as_u8());
    }
    buf.write_u8(CommentRuleProp::Text as u8);
    serialize_value(&node.text, buf, None);

    if let Some(start) = node.start {
        buf.write_u8(CommentRuleProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(CommentRuleProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
}

pub fn deserialize_comment_rule(buf: &mut InputByteBuffer<'_>) -> Result<CommentRule> {
    buf.assert_u8(BinaryTypeTag::CommentRule.as_u8(), "CommentRule")?;

    let mut node = CommentRule {
        marker: CommentMarker::default(),
        text: Default::default(),
        start: None,
        end: None,
    };
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == CommentRuleProp::Marker as u8 => {
                let raw = buf.read_u8()?;
                node.marker =
                    CommentMarker::from_u8(raw).ok_or(Error::UnknownPropertyTag {
                        node_kind: "CommentRule marker",
                        tag: raw,
                    })?;
            }
            t if t == CommentRuleProp::Text as u8 => {
                node.text = deserialize_value(buf, None)?;
            }
            t if t == CommentRuleProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == CommentRuleProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "CommentRule",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

#[repr(u8)]
enum AgentProp {
    Adblock = 1,
    Version = 2,
    Start = 3,
    End = 4,
}

pub fn serialize_agent(node: &Agent, buf: &mut OutputByteBuffer) {
    buf.write_u8(BinaryTypeTag::Agent.as_u8());

    buf.write_u8(AgentProp::Adblock as u8);
    serialize_value(&node.adblock, buf, None);

    if let Some(version) = &node.version {
        buf.write_u8(AgentProp::Version as u8);
        serialize_value(version, buf, None);
    }
    if let Some(start) = node.start {
        buf.write_u8(AgentProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(AgentProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
}

pub fn deserialize_agent(buf: &mut InputByteBuffer<'_>) -> Result<Agent> {
    buf.assert_u8(BinaryTypeTag::Agent.as_u8(), "Agent")?;

    let mut node = Agent {
        adblock: Default::default(),
        version: None,
        start: None,
        end: None,
    };
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == AgentProp::Adblock as u8 => {
                node.adblock = deserialize_value(buf, None)?;
            }
            t if t == AgentProp::Version as u8 => {
                node.version = Some(deserialize_value(buf, None)?);
            }
            t if t == AgentProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == AgentProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "Agent",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

#[repr(u8)]
enum AgentRuleProp {
    Children = 1,
    Start = 2,
    End = 3,
}

/// Agent comments hold a handful of adblocker names; a u8 prefix is plenty.
pub const AGENT_RULE_LIMIT: usize = u8::MAX as usize;

pub fn serialize_agent_rule(node: &AgentRule, buf: &mut OutputByteBuffer) -> Result<()> {
    buf.write_u8(BinaryTypeTag::AgentRule.as_u8());

    if !node.children.is_empty() {
        check_capacity("AgentRule", node.children.len(), AGENT_RULE_LIMIT)?;
        buf.write_u8(AgentRuleProp::Children as u8);
        buf.write_u8(node.children.len() as u8);
        for child in &node.children {
            serialize_agent(child, buf);
        }
    }
    if let Some(start) = node.start {
        buf.write_u8(AgentRuleProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(AgentRuleProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
    Ok(())
}

pub fn deserialize_agent_rule(buf: &mut InputByteBuffer<'_>) -> Result<AgentRule> {
    buf.assert_u8(BinaryTypeTag::AgentRule.as_u8(), "AgentRule")?;

    let mut node = AgentRule::default();
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == AgentRuleProp::Children as u8 => {
                let count = buf.read_u8()? as usize;
                let mut children = Vec::with_capacity(count);
                for _ in 0..count {
                    children.push(deserialize_agent(buf)?);
                }
                node.children = children;
            }
            t if t == AgentRuleProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == AgentRuleProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "AgentRule",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

#[repr(u8)]
enum HintProp {
    Name = 1,
    Params = 2,
    Start = 3,
    End = 4,
}

pub fn serialize_hint(node: &Hint, buf: &mut OutputByteBuffer) -> Result<()> {
    buf.write_u8(BinaryTypeTag::Hint.as_u8());

    buf.write_u8(HintProp::Name as u8);
    serialize_value(&node.name, buf, Some(&HINT_NAMES));

    if let Some(params) = &node.params {
        buf.write_u8(HintProp::Params as u8);
        serialize_parameter_list(params, buf, Some(&PLATFORM_NAMES))?;
    }
    if let Some(start) = node.start {
        buf.write_u8(HintProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(HintProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
    Ok(())
}

pub fn deserialize_hint(buf: &mut InputByteBuffer<'_>) -> Result<Hint> {
    buf.assert_u8(BinaryTypeTag::Hint.as_u8(), "Hint")?;

    let mut node = Hint {
        name: Default::default(),
        params: None,
        start: None,
        end: None,
    };
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == HintProp::Name as u8 => {
                node.name = deserialize_value(buf, Some(&HINT_NAMES))?;
            }
            t if t == HintProp::Params as u8 => {
                node.params = Some(deserialize_parameter_list(buf, Some(&PLATFORM_NAMES))?);
            }
            t if t == HintProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == HintProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "Hint",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

#[repr(u8)]
enum HintRuleProp {
    Children = 1,
    Start = 2,
    End = 3,
}

/// Hint comments hold a handful of hints; a u8 prefix is plenty.
pub const HINT_RULE_LIMIT: usize = u8::MAX as usize;

pub fn serialize_hint_rule(node: &HintRule, buf: &mut OutputByteBuffer) -> Result<()> {
    buf.write_u8(BinaryTypeTag::HintRule.as_u8());

    if !node.children.is_empty() {
        check_capacity("HintRule", node.children.len(), HINT_RULE_LIMIT)?;
        buf.write_u8(HintRuleProp::Children as u8);
        buf.write_u8(node.children.len() as u8);
        for child in &node.children {
            serialize_hint(child, buf)?;
        }
    }
    if let Some(start) = node.start {
        buf.write_u8(HintRuleProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(HintRuleProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
    Ok(())
}

pub fn deserialize_hint_rule(buf: &mut InputByteBuffer<'_>) -> Result<HintRule> {
    buf.assert_u8(BinaryTypeTag::HintRule.as_u8(), "HintRule")?;

    let mut node = HintRule::default();
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == HintRuleProp::Children as u8 => {
                let count = buf.read_u8()? as usize;
                let mut children = Vec::with_capacity(count);
                for _ in 0..count {
                    children.push(deserialize_hint(buf)?);
                }
                node.children = children;
            }
            t if t == HintRuleProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == HintRuleProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "HintRule",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

#[repr(u8)]
enum PreProcessorProp {
    Name = 1,
    RawParams = 2,
    ListParams = 3,
    Start = 4,
    End = 5,
}

pub fn serialize_pre_processor_rule(
    node: &PreProcessorRule,
    buf: &mut OutputByteBuffer,
) -> Result<()> {
    buf.write_u8(BinaryTypeTag::PreProcessorRule.as_u8());

    buf.write_u8(PreProcessorProp::Name as u8);
    serialize_value(&node.name, buf, Some(&PREPROCESSOR_NAMES));

    match &node.params {
        Some(PreProcessorParams::Raw(value)) => {
            buf.write_u8(PreProcessorProp::RawParams as u8);
            serialize_value(value, buf, None);
        }
        Some(PreProcessorParams::List(list)) => {
            buf.write_u8(PreProcessorProp::ListParams as u8);
            serialize_parameter_list(list, buf, None)?;
        }
        None => {}
    }
    if let Some(start) = node.start {
        buf.write_u8(PreProcessorProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(PreProcessorProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
    Ok(())
}

pub fn deserialize_pre_processor_rule(buf: &mut InputByteBuffer<'_>) -> Result<PreProcessorRule> {
    buf.assert_u8(BinaryTypeTag::PreProcessorRule.as_u8(), "PreProcessorRule")?;

    let mut node = PreProcessorRule {
        name: Default::default(),
        params: None,
        start: None,
        end: None,
    };
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == PreProcessorProp::Name as u8 => {
                node.name = deserialize_value(buf, Some(&PREPROCESSOR_NAMES))?;
            }
            t if t == PreProcessorProp::RawParams as u8 => {
                node.params = Some(PreProcessorParams::Raw(deserialize_value(buf, None)?));
            }
            t if t == PreProcessorProp::ListParams as u8 => {
                node.params = Some(PreProcessorParams::List(deserialize_parameter_list(
                    buf, None,
                )?));
            }
            t if t == PreProcessorProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == PreProcessorProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "PreProcessorRule",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

#[repr(u8)]
enum MetadataProp {
    Marker = 1,
    Header = 2,
    Value = 3,
    Start = 4,
    End = 5,
}

pub fn serialize_metadata_rule(node: &MetadataRule, buf: &mut OutputByteBuffer) {
    buf.write_u8(BinaryTypeTag::MetadataRule.as_u8());

    if node.marker != CommentMarker::default() {
        buf.write_u8(MetadataProp::Marker as u8);
        buf.write_u8(node.marker.as_u8());
    }
    buf.write_u8(MetadataProp::Header as u8);
    serialize_value(&node.header, buf, Some(&METADATA_HEADERS));

    buf.write_u8(MetadataProp::Value as u8);
    serialize_value(&node.value, buf, None);

    if let Some(start) = node.start {
        buf.write_u8(MetadataProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(MetadataProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
}

pub fn deserialize_metadata_rule(buf: &mut InputByteBuffer<'_>) -> Result<MetadataRule> {
    buf.assert_u8(BinaryTypeTag::MetadataRule.as_u8(), "MetadataRule")?;

    let mut node = MetadataRule {
        marker: CommentMarker::default(),
        header: Default::default(),
        value: Default::default(),
        start: None,
        end: None,
    };
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == MetadataProp::Marker as u8 => {
                let raw = buf.read_u8()?;
                node.marker =
                    CommentMarker::from_u8(raw).ok_or(Error::UnknownPropertyTag {
                        node_kind: "MetadataRule marker",
                        tag: raw,
                    })?;
            }
            t if t == MetadataProp::Header as u8 => {
                node.header = deserialize_value(buf, Some(&METADATA_HEADERS))?;
            }
            t if t == MetadataProp::Value as u8 => {
                node.value = deserialize_value(buf, None)?;
            }
            t if t == MetadataProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == MetadataProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "MetadataRule",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

#[repr(u8)]
enum ConfigProp {
    Command = 1,
    Params = 2,
    Comment = 3,
    Marker = 4,
    Start = 5,
    End = 6,
}

pub fn serialize_config_rule(node: &ConfigRule, buf: &mut OutputByteBuffer) {
    buf.write_u8(BinaryTypeTag::ConfigRule.as_u8());

    if node.marker != CommentMarker::default() {
        buf.write_u8(ConfigProp::Marker as u8);
        buf.write_u8(node.marker.as_u8());
    }

    buf.write_u8(ConfigProp::Command as u8);
    serialize_value(&node.command, buf, None);

    if let Some(params) = &node.params {
        buf.write_u8(ConfigProp::Params as u8);
        serialize_value(params, buf, None);
    }
    if let Some(comment) = &node.comment {
        buf.write_u8(ConfigProp::Comment as u8);
        serialize_value(comment, buf, None);
    }
    if let Some(start) = node.start {
        buf.write_u8(ConfigProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(ConfigProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
}

pub fn deserialize_config_rule(buf: &mut InputByteBuffer<'_>) -> Result<ConfigRule> {
    buf.assert_u8(BinaryTypeTag::ConfigRule.as_u8(), "ConfigRule")?;

    let mut node = ConfigRule {
        marker: CommentMarker::default(),
        command: Default::default(),
        params: None,
        comment: None,
        start: None,
        end: None,
    };
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == ConfigProp::Marker as u8 => {
                let raw = buf.read_u8()?;
                node.marker = CommentMarker::from_u8(raw).ok_or(Error::UnknownPropertyTag {
                    node_kind: "ConfigRule marker",
                    tag: raw,
                })?;
            }
            t if t == ConfigProp::Command as u8 => {
                node.command = deserialize_value(buf, None)?;
            }
            t if t == ConfigProp::Params as u8 => {
                node.params = Some(deserialize_value(buf, None)?);
            }
            t if t == ConfigProp::Comment as u8 => {
                node.comment = Some(deserialize_value(buf, None)?);
            }
            t if t == ConfigProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == ConfigProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "ConfigRule",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

/// Serialize any comment rule variant.
pub fn serialize_comment(node: &CommentNode, buf: &mut OutputByteBuffer) -> Result<()> {
    match node {
        CommentNode::Simple(rule) => serialize_comment_rule(rule, buf),
        CommentNode::Agent(rule) => serialize_agent_rule(rule, buf)?,
        CommentNode::Hint(rule) => serialize_hint_rule(rule, buf)?,
        CommentNode::PreProcessor(rule) => serialize_pre_processor_rule(rule, buf)?,
        CommentNode::Metadata(rule) => serialize_metadata_rule(rule, buf),
        CommentNode::Config(rule) => serialize_config_rule(rule, buf),
    }
    Ok(())
}

/// Deserialize any comment rule variant by peeking the leading type tag.
pub fn deserialize_comment(buf: &mut InputByteBuffer<'_>) -> Result<CommentNode> {
    let tag = buf.peek_u8()?;
    match BinaryTypeTag::from_u8(tag) {
        Some(BinaryTypeTag::CommentRule) => {
            Ok(CommentNode::Simple(deserialize_comment_rule(buf)?))
        }
        Some(BinaryTypeTag::AgentRule) => Ok(CommentNode::Agent(deserialize_agent_rule(buf)?)),
        Some(BinaryTypeTag::HintRule) => Ok(CommentNode::Hint(deserialize_hint_rule(buf)?)),
        Some(BinaryTypeTag::PreProcessorRule) => {
            Ok(CommentNode::PreProcessor(deserialize_pre_processor_rule(buf)?))
        }
        Some(BinaryTypeTag::MetadataRule) => {
            Ok(CommentNode::Metadata(deserialize_metadata_rule(buf)?))
        }
        Some(BinaryTypeTag::ConfigRule) => Ok(CommentNode::Config(deserialize_config_rule(buf)?)),
        _ => Err(Error::UnknownTypeTag(tag)),
    }
}
