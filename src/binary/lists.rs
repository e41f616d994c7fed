//! Serializers/deserializers for list-shaped nodes: modifiers, parameters,
//! domain lists, and hostname lists.
//!
//! Children arrays are written only when non-empty, behind a `Children`
//! property tag and a count prefix. Absence of the tag deserializes to an
//! empty collection, never to an undefined one.

use crate::ast::{
    DomainList, DomainListSeparator, HostnameList, ListItem, ListItemKind, Modifier, ModifierList,
    ParameterList,
};
use crate::error::{Error, Result};

use super::buffer::{InputByteBuffer, OutputByteBuffer};
use super::check_capacity;
use super::maps::{FrequencyDict, MODIFIER_NAMES};
use super::type_tag::{BinaryTypeTag, NULL};
use super::value::{deserialize_value, serialize_value};

#[repr(u8)]
enum ModifierProp {
    Name = 1,
    Value = 2,
    Exception = 3,
    Start = 4,
    End = 5,
}

/// Serialize a single modifier. The name goes through the shared modifier
/// name dictionary.
pub fn serialize_modifier(node: &Modifier, buf: &mut OutputByteBuffer) {
    buf.write_u8(BinaryTypeTag::Modifier.as_u8());

    buf.write_u8(ModifierProp::Name as u8);
    serialize_value(&node.name, buf, Some(&MODIFIER_NAMES));

    if let Some(value) = &node.value {
        buf.write_u8(ModifierProp::Value as u8);
        serialize_value(value, buf, None);
    }
    if node.exception {
        buf.write_u8(ModifierProp::Exception as u8);
    }
    if let Some(start) = node.start {
        buf.write_u8(ModifierProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(ModifierProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
}

pub fn deserialize_modifier(buf: &mut InputByteBuffer<'_>) -> Result<Modifier> {
    buf.assert_u8(BinaryTypeTag::Modifier.as_u8(), "Modifier")?;

    let mut node = Modifier {
        name: Default::default(),
        value: None,
        exception: false,
        start: None,
        end: None,
    };
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == ModifierProp::Name as u8 => {
                node.name = deserialize_value(buf, Some(&MODIFIER_NAMES))?;
            }
            t if t == ModifierProp::Value as u8 => {
                node.value = Some(deserialize_value(buf, None)?);
            }
            t if t == ModifierProp::Exception as u8 => {
                node.exception = true;
            }
            t if t == ModifierProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == ModifierProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "Modifier",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

#[repr(u8)]
enum ModifierListProp {
    Children = 1,
    Start = 2,
    End = 3,
}

/// Maximum modifier count representable by the u16 children prefix.
pub const MODIFIER_LIST_LIMIT: usize = u16::MAX as usize;

pub fn serialize_modifier_list(node: &ModifierList, buf: &mut OutputByteBuffer) -> Result<()> {
    buf.write_u8(BinaryTypeTag::ModifierList.as_u8());

    if !node.children.is_empty() {
        check_capacity("ModifierList", node.children.len(), MODIFIER_LIST_LIMIT)?;
        buf.write_u8(ModifierListProp::Children as u8);
        buf.write_u16(node.children.len() as u16);
        for child in &node.children {
            serialize_modifier(child, buf);
        }
    }
    if let Some(start) = node.start {
        buf.write_u8(ModifierListProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(ModifierListProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
    Ok(())
}

pub fn deserialize_modifier_list(buf: &mut InputByteBuffer<'_>) -> Result<ModifierList> {
    buf.assert_u8(BinaryTypeTag::ModifierList.as_u8(), "ModifierList")?;

    let mut node = ModifierList::default();
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == ModifierListProp::Children as u8 => {
                let count = buf.read_u16()? as usize;
                let mut children = Vec::with_capacity(count);
                for _ in 0..count {
                    children.push(deserialize_modifier(buf)?);
                }
                node.children = children;
            }
            t if t == ModifierListProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == ModifierListProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "ModifierList",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

#[repr(u8)]
enum ParameterListProp {
    Children = 1,
    Start = 2,
    End = 3,
}

/// Maximum parameter count representable by the u16 children prefix.
pub const PARAMETER_LIST_LIMIT: usize = u16::MAX as usize;

/// Serialize a parameter list. `dict` applies to each child value, which
/// lets scriptlet calls compress their well-known names and arguments.
pub fn serialize_parameter_list(
    node: &ParameterList,
    buf: &mut OutputByteBuffer,
    dict: Option<&FrequencyDict>,
) -> Result<()> {
    buf.write_u8(BinaryTypeTag::ParameterList.as_u8());

    if !node.children.is_empty() {
        check_capacity("ParameterList", node.children.len(), PARAMETER_LIST_LIMIT)?;
        buf.write_u8(ParameterListProp::Children as u8);
        buf.write_u16(node.children.len() as u16);
        for child in &node.children {
            serialize_value(child, buf, dict);
        }
    }
    if let Some(start) = node.start {
        buf.write_u8(ParameterListProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(ParameterListProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
    Ok(())
}

pub fn deserialize_parameter_list(
    buf: &mut InputByteBuffer<'_>,
    dict: Option<&FrequencyDict>,
) -> Result<ParameterList> {
    buf.assert_u8(BinaryTypeTag::ParameterList.as_u8(), "ParameterList")?;

    let mut node = ParameterList::default();
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == ParameterListProp::Children as u8 => {
                let count = buf.read_u16()? as usize;
                let mut children = Vec::with_capacity(count);
                for _ in 0..count {
                    children.push(deserialize_value(buf, dict)?);
                }
                node.children = children;
            }
            t if t == ParameterListProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == ParameterListProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "ParameterList",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

#[repr(u8)]
enum ListItemProp {
    Value = 1,
    Exception = 2,
    Start = 3,
    End = 4,
}

fn list_item_tag(kind: ListItemKind) -> BinaryTypeTag {
    match kind {
        ListItemKind::Domain => BinaryTypeTag::DomainListItem,
        ListItemKind::App => BinaryTypeTag::AppListItem,
        ListItemKind::Method => BinaryTypeTag::MethodListItem,
        ListItemKind::StealthOption => BinaryTypeTag::StealthOptionListItem,
    }
}

pub fn serialize_list_item(node: &ListItem, buf: &mut OutputByteBuffer) {
    buf.write_u8(list_item_tag(node.kind).as_u8());

    buf.write_u8(ListItemProp::Value as u8);
    buf.write_string(&node.value);

    if node.exception {
        buf.write_u8(ListItemProp::Exception as u8);
    }
    if let Some(start) = node.start {
        buf.write_u8(ListItemProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(ListItemProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
}

pub fn deserialize_list_item(buf: &mut InputByteBuffer<'_>) -> Result<ListItem> {
    let kind = match BinaryTypeTag::from_u8(buf.read_u8()?) {
        Some(BinaryTypeTag::DomainListItem) => ListItemKind::Domain,
        Some(BinaryTypeTag::AppListItem) => ListItemKind::App,
        Some(BinaryTypeTag::MethodListItem) => ListItemKind::Method,
        Some(BinaryTypeTag::StealthOptionListItem) => ListItemKind::StealthOption,
        Some(other) => {
            return Err(Error::TypeTagMismatch {
                node_kind: "ListItem",
                expected: BinaryTypeTag::DomainListItem.as_u8(),
                actual: other.as_u8(),
            })
        }
        None => {
            return Err(Error::TypeTagMismatch {
                node_kind: "ListItem",
                expected: BinaryTypeTag::DomainListItem.as_u8(),
                actual: 0,
            })
        }
    };

    let mut node = ListItem {
        kind,
        exception: false,
        value: String::new(),
        start: None,
        end: None,
    };
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == ListItemProp::Value as u8 => {
                node.value = buf.read_string()?;
            }
            t if t == ListItemProp::Exception as u8 => {
                node.exception = true;
            }
            t if t == ListItemProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == ListItemProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "ListItem",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

#[repr(u8)]
enum DomainListProp {
    Separator = 1,
    Children = 2,
    Start = 3,
    End = 4,
}

/// Maximum domain count representable by the u16 children prefix.
pub const DOMAIN_LIST_LIMIT: usize = u16::MAX as usize;

pub fn serialize_domain_list(node: &DomainList, buf: &mut OutputByteBuffer) -> Result<()> {
    buf.write_u8(BinaryTypeTag::DomainList.as_u8());

    if node.separator != DomainListSeparator::default() {
        buf.write_u8(DomainListProp::Separator as u8);
        buf.write_u8(node.separator.as_u8());
    }
    if !node.children.is_empty() {
        check_capacity("DomainList", node.children.len(), DOMAIN_LIST_LIMIT)?;
        buf.write_u8(DomainListProp::Children as u8);
        buf.write_u16(node.children.len() as u16);
        for child in &node.children {
            serialize_list_item(child, buf);
        }
    }
    if let Some(start) = node.start {
        buf.write_u8(DomainListProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(DomainListProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
    Ok(())
}

pub fn deserialize_domain_list(buf: &mut InputByteBuffer<'_>) -> Result<DomainList> {
    buf.assert_u8(BinaryTypeTag::DomainList.as_u8(), "DomainList")?;

    let mut node = DomainList::default();
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == DomainListProp::Separator as u8 => {
                let raw = buf.read_u8()?;
                node.separator = DomainListSeparator::from_u8(raw).ok_or(
                    Error::UnknownPropertyTag {
                        node_kind: "DomainList separator",
                        tag: raw,
                    },
                )?;
            }
            t if t == DomainListProp::Children as u8 => {
                let count = buf.read_u16()? as usize;
                let mut children = Vec::with_capacity(count);
                for _ in 0..count {
                    children.push(deserialize_list_item(buf)?);
                }
                node.children = children;
            }
            t if t == DomainListProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == DomainListProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "DomainList",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

#[repr(u8)]
enum HostnameListProp {
    Children = 1,
    Start = 2,
    End = 3,
}

/// Maximum hostname count representable by the u16 children prefix.
pub const HOSTNAME_LIST_LIMIT: usize = u16::MAX as usize;

pub fn serialize_hostname_list(node: &HostnameList, buf: &mut OutputByteBuffer) -> Result<()> {
    buf.write_u8(BinaryTypeTag::HostnameList.as_u8());

    if !node.children.is_empty() {
        check_capacity("HostnameList", node.children.len(), HOSTNAME_LIST_LIMIT)?;
        buf.write_u8(HostnameListProp::Children as u8);
        buf.write_u16(node.children.len() as u16);
        for child in &node.children {
            serialize_value(child, buf, None);
        }
    }
    if let Some(start) = node.start {
        buf.write_u8(HostnameListProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(HostnameListProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
    Ok(())
}

pub fn deserialize_hostname_list(buf: &mut InputByteBuffer<'_>) -> Result<HostnameList> {
    buf.assert_u8(BinaryTypeTag::HostnameList.as_u8(), "HostnameList")?;

    let mut node = HostnameList::default();
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == HostnameListProp::Children as u8 => {
                let count = buf.read_u16()? as usize;
                let mut children = Vec::with_capacity(count);
                for _ in 0..count {
                    children.push(deserialize_value(buf, None)?);
                }
                node.children = children;
            }
            t if t == HostnameListProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == HostnameListProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "HostnameList",
                    tag,
                })
            }
        }
    }

    Ok(node)
}
