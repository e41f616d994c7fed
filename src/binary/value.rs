//! Serializer/deserializer for [`Value`] nodes.

use crate::ast::Value;
use crate::error::{Error, Result};

use super::buffer::{InputByteBuffer, OutputByteBuffer};
use super::maps::FrequencyDict;
use super::type_tag::{BinaryTypeTag, NULL};

/// Property tags for `Value` nodes.
#[repr(u8)]
enum ValueProp {
    /// Length-prefixed literal string
    Literal = 1,
    /// Single-byte index into a frequency dictionary
    Frequent = 2,
    Start = 3,
    End = 4,
}

/// Serialize a `Value` node.
///
/// When `dict` is given and contains the value, the string collapses to a
/// two-byte (tag, index) pair instead of the length-prefixed literal form.
pub fn serialize_value(node: &Value, buf: &mut OutputByteBuffer, dict: Option<&FrequencyDict>) {
    buf.write_u8(BinaryTypeTag::Value.as_u8());

    match dict.and_then(|d| d.index_of(&node.value)) {
        Some(index) => {
            buf.write_u8(ValueProp::Frequent as u8);
            buf.write_u8(index);
        }
        None => {
            buf.write_u8(ValueProp::Literal as u8);
            buf.write_string(&node.value);
        }
    }

    if let Some(start) = node.start {
        buf.write_u8(ValueProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(ValueProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
}

/// Deserialize a `Value` node.
///
/// A frequency index unknown to `dict` resolves to the empty string rather
/// than failing: the blob may have been produced by a writer with a larger
/// dictionary, and dictionaries only ever grow. Unknown property tags stay
/// fatal.
pub fn deserialize_value(
    buf: &mut InputByteBuffer<'_>,
    dict: Option<&FrequencyDict>,
) -> Result<Value> {
    buf.assert_u8(BinaryTypeTag::Value.as_u8(), "Value")?;

    let mut node = Value::default();
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == ValueProp::Literal as u8 => {
                node.value = buf.read_string()?;
            }
            t if t == ValueProp::Frequent as u8 => {
                let index = buf.read_u8()?;
                node.value = dict
                    .and_then(|d| d.value_of(index))
                    .unwrap_or_default()
                    .to_string();
            }
            t if t == ValueProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == ValueProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "Value",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::maps::MODIFIER_NAMES;

    #[test]
    fn test_value_roundtrip_with_offsets() {
        let node = Value::with_span("example.org", 5, 16);
        let mut buf = OutputByteBuffer::new();
        serialize_value(&node, &mut buf, None);

        let bytes = buf.into_bytes();
        let mut input = InputByteBuffer::new(&bytes);
        let decoded = deserialize_value(&mut input, None).unwrap();
        assert_eq!(decoded, node);
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn test_value_roundtrip_without_offsets() {
        let node = Value::new("||example.org^");
        let mut buf = OutputByteBuffer::new();
        serialize_value(&node, &mut buf, None);

        let bytes = buf.into_bytes();
        let mut input = InputByteBuffer::new(&bytes);
        let decoded = deserialize_value(&mut input, None).unwrap();
        assert_eq!(decoded.value, "||example.org^");
        assert!(decoded.start.is_none());
        assert!(decoded.end.is_none());
    }

    #[test]
    fn test_frequent_value_is_two_bytes() {
        let node = Value::new("third-party");
        let mut buf = OutputByteBuffer::new();
        serialize_value(&node, &mut buf, Some(&MODIFIER_NAMES));

        // type tag + (Frequent tag, index) + NULL
        let bytes = buf.into_bytes();
        assert_eq!(bytes.len(), 4);

        let mut input = InputByteBuffer::new(&bytes);
        let decoded = deserialize_value(&mut input, Some(&MODIFIER_NAMES)).unwrap();
        assert_eq!(decoded.value, "third-party");
    }

    #[test]
    fn test_unknown_frequency_index_degrades() {
        let mut buf = OutputByteBuffer::new();
        buf.write_u8(BinaryTypeTag::Value.as_u8());
        buf.write_u8(ValueProp::Frequent as u8);
        buf.write_u8(0xFA); // not present in any dictionary
        buf.write_u8(NULL);

        let bytes = buf.into_bytes();
        let mut input = InputByteBuffer::new(&bytes);
        let decoded = deserialize_value(&mut input, Some(&MODIFIER_NAMES)).unwrap();
        assert_eq!(decoded.value, "");
    }

    #[test]
    fn test_unknown_property_tag_is_fatal() {
        let mut buf = OutputByteBuffer::new();
        buf.write_u8(BinaryTypeTag::Value.as_u8());
        buf.write_u8(0xFE);

        let bytes = buf.into_bytes();
        let mut input = InputByteBuffer::new(&bytes);
        let err = deserialize_value(&mut input, None).unwrap_err();
        match err {
            Error::UnknownPropertyTag { node_kind, tag } => {
                assert_eq!(node_kind, "Value");
                assert_eq!(tag, 0xFE);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
