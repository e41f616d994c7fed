//! Serializers/deserializers for network and host rules.

use crate::ast::{HostRule, NetworkRule, Syntax};
use crate::error::{Error, Result};

use super::buffer::{InputByteBuffer, OutputByteBuffer};
use super::lists::{
    deserialize_hostname_list, deserialize_modifier_list, serialize_hostname_list,
    serialize_modifier_list,
};
use super::type_tag::{BinaryTypeTag, NULL};
use super::value::{deserialize_value, serialize_value};

#[repr(u8)]
enum NetworkRuleProp {
    Exception = 1,
    Pattern = 2,
    Modifiers = 3,
    Syntax = 4,
    Start = 5,
    End = 6,
}

pub fn serialize_network_rule(node: &NetworkRule, buf: &mut OutputByteBuffer) -> Result<()> {
    buf.write_u8(BinaryTypeTag::NetworkRule.as_u8());

    if node.exception {
        buf.write_u8(NetworkRuleProp::Exception as u8);
    }
    buf.write_u8(NetworkRuleProp::Pattern as u8);
    serialize_value(&node.pattern, buf, None);

    if let Some(modifiers) = &node.modifiers {
        buf.write_u8(NetworkRuleProp::Modifiers as u8);
        serialize_modifier_list(modifiers, buf)?;
    }
    if node.syntax != Syntax::Common {
        buf.write_u8(NetworkRuleProp::Syntax as u8);
        buf.write_u8(node.syntax.as_u8());
    }
    if let Some(start) = node.start {
        buf.write_u8(NetworkRuleProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(NetworkRuleProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
    Ok(())
}

pub fn deserialize_network_rule(buf: &mut InputByteBuffer<'_>) -> Result<NetworkRule> {
    buf.assert_u8(BinaryTypeTag::NetworkRule.as_u8(), "NetworkRule")?;

    let mut node = NetworkRule {
        syntax: Syntax::Common,
        exception: false,
        pattern: Default::default(),
        modifiers: None,
        start: None,
        end: None,
    };
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == NetworkRuleProp::Exception as u8 => {
                node.exception = true;
            }
            t if t == NetworkRuleProp::Pattern as u8 => {
                node.pattern = deserialize_value(buf, None)?;
            }
            t if t == NetworkRuleProp::Modifiers as u8 => {
                node.modifiers = Some(deserialize_modifier_list(buf)?);
            }
            t if t == NetworkRuleProp::Syntax as u8 => {
                let raw = buf.read_u8()?;
                node.syntax = Syntax::from_u8(raw).ok_or(Error::UnknownPropertyTag {
                    node_kind: "NetworkRule syntax",
                    tag: raw,
                })?;
            }
            t if t == NetworkRuleProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == NetworkRuleProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "NetworkRule",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

#[repr(u8)]
enum HostRuleProp {
    Ip = 1,
    Hostnames = 2,
    Comment = 3,
    Start = 4,
    End = 5,
}

pub fn serialize_host_rule(node: &HostRule, buf: &mut OutputByteBuffer) -> Result<()> {
    buf.write_u8(BinaryTypeTag::HostRule.as_u8());

    buf.write_u8(HostRuleProp::Ip as u8);
    serialize_value(&node.ip, buf, None);

    buf.write_u8(HostRuleProp::Hostnames as u8);
    serialize_hostname_list(&node.hostnames, buf)?;

    if let Some(comment) = &node.comment {
        buf.write_u8(HostRuleProp::Comment as u8);
        serialize_value(comment, buf, None);
    }
    if let Some(start) = node.start {
        buf.write_u8(HostRuleProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(HostRuleProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
    Ok(())
}

pub fn deserialize_host_rule(buf: &mut InputByteBuffer<'_>) -> Result<HostRule> {
    buf.assert_u8(BinaryTypeTag::HostRule.as_u8(), "HostRule")?;

    let mut node = HostRule {
        ip: Default::default(),
        hostnames: Default::default(),
        comment: None,
        start: None,
        end: None,
    };
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == HostRuleProp::Ip as u8 => {
                node.ip = deserialize_value(buf, None)?;
            }
            t if t == HostRuleProp::Hostnames as u8 => {
                node.hostnames = deserialize_hostname_list(buf)?;
            }
            t if t == HostRuleProp::Comment as u8 => {
                node.comment = Some(deserialize_value(buf, None)?);
            }
            t if t == HostRuleProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == HostRuleProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "HostRule",
                    tag,
                })
            }
        }
    }

    Ok(node)
}
