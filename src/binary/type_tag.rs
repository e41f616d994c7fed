//! Binary node type tags.
//!
//! Every serialized node begins with exactly one of these bytes; it tells
//! a reader how to interpret the property stream that follows. 0x00 is
//! reserved as the property-stream terminator ([`NULL`]) and is never a
//! valid type tag. Values are a wire-compatibility contract: never reuse
//! or renumber an existing tag.

/// Property-stream terminator byte, reserved across all node kinds.
pub const NULL: u8 = 0x00;

/// Type tag identifying a node's concrete kind in the binary format.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryTypeTag {
    FilterList = 0x01,
    EmptyRule = 0x02,
    InvalidRule = 0x03,
    InvalidRuleError = 0x04,
    CommentRule = 0x05,
    AgentRule = 0x06,
    Agent = 0x07,
    HintRule = 0x08,
    Hint = 0x09,
    PreProcessorRule = 0x0A,
    MetadataRule = 0x0B,
    ConfigRule = 0x0C,
    NetworkRule = 0x0D,
    HostRule = 0x0E,
    ElementHidingRule = 0x0F,
    CssInjectionRule = 0x10,
    AdgScriptletRule = 0x11,
    UboScriptletRule = 0x12,
    AbpSnippetRule = 0x13,
    HtmlFilteringRule = 0x14,
    JsInjectionRule = 0x15,
    Value = 0x16,
    ModifierList = 0x17,
    Modifier = 0x18,
    ParameterList = 0x19,
    DomainList = 0x1A,
    HostnameList = 0x1B,
    DomainListItem = 0x1C,
    AppListItem = 0x1D,
    MethodListItem = 0x1E,
    StealthOptionListItem = 0x1F,
    ElementHidingBody = 0x20,
    CssInjectionBody = 0x21,
    ScriptletBody = 0x22,
    HtmlFilteringBody = 0x23,
}

impl BinaryTypeTag {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::FilterList),
            0x02 => Some(Self::EmptyRule),
            0x03 => Some(Self::InvalidRule),
            0x04 => Some(Self::InvalidRuleError),
            0x05 => Some(Self::CommentRule),
            0x06 => Some(Self::AgentRule),
            0x07 => Some(Self::Agent),
            0x08 => Some(Self::HintRule),
            0x09 => Some(Self::Hint),
            0x0A => Some(Self::PreProcessorRule),
            0x0B => Some(Self::MetadataRule),
            0x0C => Some(Self::ConfigRule),
            0x0D => Some(Self::NetworkRule),
            0x0E => Some(Self::HostRule),
            0x0F => Some(Self::ElementHidingRule),
            0x10 => Some(Self::CssInjectionRule),
            0x11 => Some(Self::AdgScriptletRule),
            0x12 => Some(Self::UboScriptletRule),
            0x13 => Some(Self::AbpSnippetRule),
            0x14 => Some(Self::HtmlFilteringRule),
            0x15 => Some(Self::JsInjectionRule),
            0x16 => Some(Self::Value),
            0x17 => Some(Self::ModifierList),
            0x18 => Some(Self::Modifier),
            0x19 => Some(Self::ParameterList),
            0x1A => Some(Self::DomainList),
            0x1B => Some(Self::HostnameList),
            0x1C => Some(Self::DomainListItem),
            0x1D => Some(Self::AppListItem),
            0x1E => Some(Self::MethodListItem),
            0x1F => Some(Self::StealthOptionListItem),
            0x20 => Some(Self::ElementHidingBody),
            0x21 => Some(Self::CssInjectionBody),
            0x22 => Some(Self::ScriptletBody),
            0x23 => Some(Self::HtmlFilteringBody),
            _ => None,
        }
    }

    /// Human-readable node-kind name for error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::FilterList => "FilterList",
            Self::EmptyRule => "EmptyRule",
            Self::InvalidRule => "InvalidRule",
            Self::InvalidRuleError => "InvalidRuleError",
            Self::CommentRule => "CommentRule",
            Self::AgentRule => "AgentRule",
            Self::Agent => "Agent",
            Self::HintRule => "HintRule",
            Self::Hint => "Hint",
            Self::PreProcessorRule => "PreProcessorRule",
            Self::MetadataRule => "MetadataRule",
            Self::ConfigRule => "ConfigRule",
            Self::NetworkRule => "NetworkRule",
            Self::HostRule => "HostRule",
            Self::ElementHidingRule => "ElementHidingRule",
            Self::CssInjectionRule => "CssInjectionRule",
            Self::AdgScriptletRule => "AdgScriptletRule",
            Self::UboScriptletRule => "UboScriptletRule",
            Self::AbpSnippetRule => "AbpSnippetRule",
            Self::HtmlFilteringRule => "HtmlFilteringRule",
            Self::JsInjectionRule => "JsInjectionRule",
            Self::Value => "Value",
            Self::ModifierList => "ModifierList",
            Self::Modifier => "Modifier",
            Self::ParameterList => "ParameterList",
            Self::DomainList => "DomainList",
            Self::HostnameList => "HostnameList",
            Self::DomainListItem => "DomainListItem",
            Self::AppListItem => "AppListItem",
            Self::MethodListItem => "MethodListItem",
            Self::StealthOptionListItem => "StealthOptionListItem",
            Self::ElementHidingBody => "ElementHidingBody",
            Self::CssInjectionBody => "CssInjectionBody",
            Self::ScriptletBody => "ScriptletBody",
            Self::HtmlFilteringBody => "HtmlFilteringBody",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [BinaryTypeTag; 35] = [
        BinaryTypeTag::FilterList,
        BinaryTypeTag::EmptyRule,
        BinaryTypeTag::InvalidRule,
        BinaryTypeTag::InvalidRuleError,
        BinaryTypeTag::CommentRule,
        BinaryTypeTag::AgentRule,
        BinaryTypeTag::Agent,
        BinaryTypeTag::HintRule,
        BinaryTypeTag::Hint,
        BinaryTypeTag::PreProcessorRule,
        BinaryTypeTag::MetadataRule,
        BinaryTypeTag::ConfigRule,
        BinaryTypeTag::NetworkRule,
        BinaryTypeTag::HostRule,
        BinaryTypeTag::ElementHidingRule,
        BinaryTypeTag::CssInjectionRule,
        BinaryTypeTag::AdgScriptletRule,
        BinaryTypeTag::UboScriptletRule,
        BinaryTypeTag::AbpSnippetRule,
        BinaryTypeTag::HtmlFilteringRule,
        BinaryTypeTag::JsInjectionRule,
        BinaryTypeTag::Value,
        BinaryTypeTag::ModifierList,
        BinaryTypeTag::Modifier,
        BinaryTypeTag::ParameterList,
        BinaryTypeTag::DomainList,
        BinaryTypeTag::HostnameList,
        BinaryTypeTag::DomainListItem,
        BinaryTypeTag::AppListItem,
        BinaryTypeTag::MethodListItem,
        BinaryTypeTag::StealthOptionListItem,
        BinaryTypeTag::ElementHidingBody,
        BinaryTypeTag::CssInjectionBody,
        BinaryTypeTag::ScriptletBody,
        BinaryTypeTag::HtmlFilteringBody,
    ];

    #[test]
    fn test_tag_uniqueness() {
        let mut seen = std::collections::HashSet::new();
        for tag in ALL {
            assert!(seen.insert(tag.as_u8()), "duplicate tag: {:?}", tag);
            assert_ne!(tag.as_u8(), NULL, "NULL reused as type tag");
        }
    }

    #[test]
    fn test_tag_roundtrip() {
        for tag in ALL {
            assert_eq!(BinaryTypeTag::from_u8(tag.as_u8()), Some(tag));
        }
        assert_eq!(BinaryTypeTag::from_u8(NULL), None);
        assert_eq!(BinaryTypeTag::from_u8(0xFF), None);
    }
}
