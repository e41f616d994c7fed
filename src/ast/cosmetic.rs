//! Cosmetic rule nodes.

use serde::{Deserialize, Serialize};

use super::{DomainList, ModifierList, ParameterList, Syntax, Value};

/// Separator marker between the domain list and the body of a cosmetic rule.
///
/// The marker decides both the body kind and whether the rule is an
/// exception. The numeric values are part of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum CosmeticSeparator {
    /// `##`
    ElementHiding = 0,
    /// `#@#`
    ElementHidingException = 1,
    /// `#?#`
    ExtendedElementHiding = 2,
    /// `#@?#`
    ExtendedElementHidingException = 3,
    /// `#$#`
    CssInjection = 4,
    /// `#@$#`
    CssInjectionException = 5,
    /// `#$?#`
    ExtendedCssInjection = 6,
    /// `#@$?#`
    ExtendedCssInjectionException = 7,
    /// `#%#`
    JsInjection = 8,
    /// `#@%#`
    JsInjectionException = 9,
    /// `$$`
    HtmlFiltering = 10,
    /// `$@$`
    HtmlFilteringException = 11,
}

impl CosmeticSeparator {
    /// All separators, longest markers first so that prefix markers
    /// (`##` vs `#@#`) never shadow longer ones while scanning.
    pub const ALL: [CosmeticSeparator; 12] = [
        CosmeticSeparator::ExtendedCssInjectionException,
        CosmeticSeparator::ExtendedElementHidingException,
        CosmeticSeparator::CssInjectionException,
        CosmeticSeparator::JsInjectionException,
        CosmeticSeparator::ExtendedCssInjection,
        CosmeticSeparator::ExtendedElementHiding,
        CosmeticSeparator::ElementHidingException,
        CosmeticSeparator::CssInjection,
        CosmeticSeparator::JsInjection,
        CosmeticSeparator::ElementHiding,
        CosmeticSeparator::HtmlFilteringException,
        CosmeticSeparator::HtmlFiltering,
    ];

    /// The marker string as it appears in rule text.
    pub fn as_str(self) -> &'static str {
        match self {
            CosmeticSeparator::ElementHiding => "##",
            CosmeticSeparator::ElementHidingException => "#@#",
            CosmeticSeparator::ExtendedElementHiding => "#?#",
            CosmeticSeparator::ExtendedElementHidingException => "#@?#",
            CosmeticSeparator::CssInjection => "#$#",
            CosmeticSeparator::CssInjectionException => "#@$#",
            CosmeticSeparator::ExtendedCssInjection => "#$?#",
            CosmeticSeparator::ExtendedCssInjectionException => "#@$?#",
            CosmeticSeparator::JsInjection => "#%#",
            CosmeticSeparator::JsInjectionException => "#@%#",
            CosmeticSeparator::HtmlFiltering => "$$",
            CosmeticSeparator::HtmlFilteringException => "$@$",
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(CosmeticSeparator::ElementHiding),
            1 => Some(CosmeticSeparator::ElementHidingException),
            2 => Some(CosmeticSeparator::ExtendedElementHiding),
            3 => Some(CosmeticSeparator::ExtendedElementHidingException),
            4 => Some(CosmeticSeparator::CssInjection),
            5 => Some(CosmeticSeparator::CssInjectionException),
            6 => Some(CosmeticSeparator::ExtendedCssInjection),
            7 => Some(CosmeticSeparator::ExtendedCssInjectionException),
            8 => Some(CosmeticSeparator::JsInjection),
            9 => Some(CosmeticSeparator::JsInjectionException),
            10 => Some(CosmeticSeparator::HtmlFiltering),
            11 => Some(CosmeticSeparator::HtmlFilteringException),
            _ => None,
        }
    }

    /// Whether the marker carries the `@` exception modifier.
    pub fn is_exception(self) -> bool {
        matches!(
            self,
            CosmeticSeparator::ElementHidingException
                | CosmeticSeparator::ExtendedElementHidingException
                | CosmeticSeparator::CssInjectionException
                | CosmeticSeparator::ExtendedCssInjectionException
                | CosmeticSeparator::JsInjectionException
                | CosmeticSeparator::HtmlFilteringException
        )
    }
}

/// Body of an element hiding rule: a CSS selector list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHidingBody {
    pub selector_list: Value,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// Body of a CSS injection rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssInjectionBody {
    pub selector_list: Value,
    pub declaration_list: Option<Value>,
    pub media_query_list: Option<Value>,
    pub remove: bool,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// Body of a scriptlet injection rule: one call per parameter list.
///
/// AdGuard and uBlock Origin syntaxes allow at most one call; Adblock Plus
/// snippet filters allow several, separated by `;`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScriptletBody {
    pub children: Vec<ParameterList>,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// Body of an HTML filtering rule (`$$` syntax).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlFilteringBody {
    pub body: Value,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// The body of a cosmetic rule, one variant per body kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CosmeticBody {
    ElementHiding(ElementHidingBody),
    CssInjection(CssInjectionBody),
    Scriptlet(ScriptletBody),
    HtmlFiltering(HtmlFilteringBody),
    JsInjection(Value),
}

/// A cosmetic rule: domain list, separator, and a typed body.
///
/// For scriptlet bodies the syntax dialect is carried by the binary type
/// tag, and `Common` has no tag of its own: a `Common`-syntax scriptlet
/// (never produced by the parser, only constructible by hand) serializes
/// under the AdGuard tag and deserializes with `syntax` normalized to
/// [`Syntax::AdGuard`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmeticRule {
    pub syntax: Syntax,
    pub exception: bool,
    pub separator: CosmeticSeparator,
    pub modifiers: Option<ModifierList>,
    pub domains: DomainList,
    pub body: CosmeticBody,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_roundtrip() {
        for sep in CosmeticSeparator::ALL {
            assert_eq!(CosmeticSeparator::from_u8(sep.as_u8()), Some(sep));
        }
        assert_eq!(CosmeticSeparator::from_u8(12), None);
    }

    #[test]
    fn test_separator_exception() {
        assert!(!CosmeticSeparator::ElementHiding.is_exception());
        assert!(CosmeticSeparator::ElementHidingException.is_exception());
        assert!(CosmeticSeparator::HtmlFilteringException.is_exception());
    }

    #[test]
    fn test_all_ordered_longest_first() {
        // Scanning relies on longer markers being tried before their prefixes.
        let mut seen_len = usize::MAX;
        for sep in CosmeticSeparator::ALL.iter().take(10) {
            assert!(sep.as_str().len() <= seen_len);
            seen_len = sep.as_str().len();
        }
    }
}
