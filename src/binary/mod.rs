//! Compact binary serialization for the filter-rule AST.
//!
//! Filter lists are large and are loaded in resource-constrained runtimes,
//! so the encoding optimizes for decode speed and size: a single type-tag
//! byte per node, (tag, value) property pairs terminated by a NULL byte,
//! and frequency dictionaries that collapse recurring strings to one-byte
//! indices.
//!
//! # Node encoding
//!
//! ```text
//! +-----------+---------------------+-----+---------------------+------+
//! | type: u8  | prop tag | payload  | ... | prop tag | payload  | 0x00 |
//! +-----------+---------------------+-----+---------------------+------+
//! ```
//!
//! Property tags are local to a node kind; the type tag has already
//! disambiguated which table applies. Optional fields that are absent are
//! simply not written, and `start`/`end` offsets round-trip their
//! presence exactly. Children arrays are written behind a count prefix
//! sized per node kind (u8 for agent/hint lists, u16 for modifier and
//! domain lists, u32 for the top-level rule collection); exceeding the
//! prefix width is a hard error, never a silent truncation.
//!
//! The (de)serializers are pure, synchronous tree-walks. The only shared
//! state is the read-only tag and frequency tables, so independent calls
//! may run concurrently as long as each uses its own buffer.

mod buffer;
mod comment;
mod cosmetic;
mod filter_list;
mod format;
mod lists;
mod maps;
mod network;
mod rule;
mod type_tag;
mod value;

#[cfg(test)]
mod tests;

pub use buffer::{InputByteBuffer, OutputByteBuffer};
pub use comment::{deserialize_comment, serialize_comment};
pub use cosmetic::serialize_cosmetic_rule;
pub use filter_list::{
    deserialize_filter_list, jump_to_children, serialize_filter_list, FILTER_LIST_LIMIT,
};
pub use format::{
    open_filter_list, read_filter_list_file, read_header, write_filter_list_file, FileHeader,
    FormatFlags, FORMAT_VERSION, HEADER_SIZE, MAGIC,
};
pub use lists::{
    deserialize_domain_list, deserialize_hostname_list, deserialize_list_item,
    deserialize_modifier, deserialize_modifier_list, deserialize_parameter_list,
    serialize_domain_list, serialize_hostname_list, serialize_list_item, serialize_modifier,
    serialize_modifier_list, serialize_parameter_list, DOMAIN_LIST_LIMIT, HOSTNAME_LIST_LIMIT,
    MODIFIER_LIST_LIMIT, PARAMETER_LIST_LIMIT,
};
pub use maps::{
    FrequencyDict, ABP_SNIPPET_NAMES, ADG_SCRIPTLET_NAMES, HINT_NAMES, METADATA_HEADERS,
    MODIFIER_NAMES, PLATFORM_NAMES, PREPROCESSOR_NAMES, UBO_SCRIPTLET_NAMES,
};
pub use rule::{deserialize_rule, serialize_rule};
pub use type_tag::{BinaryTypeTag, NULL};
pub use value::{deserialize_value, serialize_value};

use crate::error::{Error, Result};

/// Fail fast when a children collection exceeds its count-prefix width.
pub(crate) fn check_capacity(node_kind: &'static str, count: usize, limit: usize) -> Result<()> {
    if count > limit {
        return Err(Error::CapacityExceeded {
            node_kind,
            count,
            limit,
        });
    }
    Ok(())
}
