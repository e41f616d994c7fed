//! Serializer/deserializer for whole filter lists.
//!
//! Filter lists can hold tens of thousands of rules, so their children
//! count uses a u32 prefix and [`jump_to_children`] lets a consumer scan
//! straight to the rule stream without materializing the wrapper node.

use crate::ast::FilterList;
use crate::error::{Error, Result};

use super::buffer::{InputByteBuffer, OutputByteBuffer};
use super::check_capacity;
use super::rule::{deserialize_rule, serialize_rule};
use super::type_tag::{BinaryTypeTag, NULL};

#[repr(u8)]
enum FilterListProp {
    Children = 1,
    Start = 2,
    End = 3,
}

/// Maximum rule count representable by the u32 children prefix.
pub const FILTER_LIST_LIMIT: usize = u32::MAX as usize;

pub fn serialize_filter_list(node: &FilterList, buf: &mut OutputByteBuffer) -> Result<()> {
    buf.write_u8(BinaryTypeTag::FilterList.as_u8());

    if let Some(start) = node.start {
        buf.write_u8(FilterListProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(FilterListProp::End as u8);
        buf.write_u32(end);
    }
    if !node.children.is_empty() {
        check_capacity("FilterList", node.children.len(), FILTER_LIST_LIMIT)?;
        buf.write_u8(FilterListProp::Children as u8);
        buf.write_u32(node.children.len() as u32);
        for child in &node.children {
            serialize_rule(child, buf)?;
        }
    }

    buf.write_u8(NULL);
    Ok(())
}

pub fn deserialize_filter_list(buf: &mut InputByteBuffer<'_>) -> Result<FilterList> {
    buf.assert_u8(BinaryTypeTag::FilterList.as_u8(), "FilterList")?;

    let mut node = FilterList::default();
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == FilterListProp::Children as u8 => {
                let count = buf.read_u32()? as usize;
                let mut children = Vec::with_capacity(count.min(1 << 16));
                for _ in 0..count {
                    children.push(deserialize_rule(buf)?);
                }
                node.children = children;
            }
            t if t == FilterListProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == FilterListProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "FilterList",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

/// Walk the top-level property tags of an encoded filter list until the
/// Children tag, skipping Start/End payloads, and return the child count
/// with the cursor positioned at the first child.
///
/// Returns 0 if the list has no Children tag (an empty list). The caller
/// then reads each rule with [`deserialize_rule`] on the same buffer.
pub fn jump_to_children(buf: &mut InputByteBuffer<'_>) -> Result<u32> {
    buf.assert_u8(BinaryTypeTag::FilterList.as_u8(), "FilterList")?;

    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => return Ok(0),
            t if t == FilterListProp::Children as u8 => {
                return buf.read_u32();
            }
            t if t == FilterListProp::Start as u8 || t == FilterListProp::End as u8 => {
                buf.read_u32()?;
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "FilterList",
                    tag,
                })
            }
        }
    }
}
