//! Serializers/deserializers for cosmetic rules and their bodies.
//!
//! The rule's leading type tag encodes the body kind, and for scriptlet
//! injection also the syntax dialect (AdGuard single call, uBlock single
//! call, Adblock Plus snippet sequence).

use crate::ast::{
    CosmeticBody, CosmeticRule, CosmeticSeparator, CssInjectionBody, ElementHidingBody,
    HtmlFilteringBody, ScriptletBody, Syntax,
};
use crate::error::{Error, Result};

use super::buffer::{InputByteBuffer, OutputByteBuffer};
use super::check_capacity;
use super::lists::{
    deserialize_domain_list, deserialize_modifier_list, deserialize_parameter_list,
    serialize_domain_list, serialize_modifier_list, serialize_parameter_list,
};
use super::maps::{
    FrequencyDict, ABP_SNIPPET_NAMES, ADG_SCRIPTLET_NAMES, UBO_SCRIPTLET_NAMES,
};
use super::type_tag::{BinaryTypeTag, NULL};
use super::value::{deserialize_value, serialize_value};

#[repr(u8)]
enum ElementHidingBodyProp {
    SelectorList = 1,
    Start = 2,
    End = 3,
}

fn serialize_element_hiding_body(node: &ElementHidingBody, buf: &mut OutputByteBuffer) {
    buf.write_u8(BinaryTypeTag::ElementHidingBody.as_u8());

    buf.write_u8(ElementHidingBodyProp::SelectorList as u8);
    serialize_value(&node.selector_list, buf, None);

    if let Some(start) = node.start {
        buf.write_u8(ElementHidingBodyProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(ElementHidingBodyProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
}

fn deserialize_element_hiding_body(buf: &mut InputByteBuffer<'_>) -> Result<ElementHidingBody> {
    buf.assert_u8(BinaryTypeTag::ElementHidingBody.as_u8(), "ElementHidingBody")?;

    let mut node = ElementHidingBody {
        selector_list: Default::default(),
        start: None,
        end: None,
    };
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == ElementHidingBodyProp::SelectorList as u8 => {
                node.selector_list = deserialize_value(buf, None)?;
            }
            t if t == ElementHidingBodyProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == ElementHidingBodyProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "ElementHidingBody",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

#[repr(u8)]
enum CssInjectionBodyProp {
    SelectorList = 1,
    DeclarationList = 2,
    MediaQueryList = 3,
    Remove = 4,
    Start = 5,
    End = 6,
}

fn serialize_css_injection_body(node: &CssInjectionBody, buf: &mut OutputByteBuffer) {
    buf.write_u8(BinaryTypeTag::CssInjectionBody.as_u8());

    buf.write_u8(CssInjectionBodyProp::SelectorList as u8);
    serialize_value(&node.selector_list, buf, None);

    if let Some(declarations) = &node.declaration_list {
        buf.write_u8(CssInjectionBodyProp::DeclarationList as u8);
        serialize_value(declarations, buf, None);
    }
    if let Some(media) = &node.media_query_list {
        buf.write_u8(CssInjectionBodyProp::MediaQueryList as u8);
        serialize_value(media, buf, None);
    }
    if node.remove {
        buf.write_u8(CssInjectionBodyProp::Remove as u8);
    }
    if let Some(start) = node.start {
        buf.write_u8(CssInjectionBodyProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(CssInjectionBodyProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
}

fn deserialize_css_injection_body(buf: &mut InputByteBuffer<'_>) -> Result<CssInjectionBody> {
    buf.assert_u8(BinaryTypeTag::CssInjectionBody.as_u8(), "CssInjectionBody")?;

    let mut node = CssInjectionBody {
        selector_list: Default::default(),
        declaration_list: None,
        media_query_list: None,
        remove: false,
        start: None,
        end: None,
    };
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == CssInjectionBodyProp::SelectorList as u8 => {
                node.selector_list = deserialize_value(buf, None)?;
            }
            t if t == CssInjectionBodyProp::DeclarationList as u8 => {
                node.declaration_list = Some(deserialize_value(buf, None)?);
            }
            t if t == CssInjectionBodyProp::MediaQueryList as u8 => {
                node.media_query_list = Some(deserialize_value(buf, None)?);
            }
            t if t == CssInjectionBodyProp::Remove as u8 => {
                node.remove = true;
            }
            t if t == CssInjectionBodyProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == CssInjectionBodyProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "CssInjectionBody",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

#[repr(u8)]
enum ScriptletBodyProp {
    Children = 1,
    Start = 2,
    End = 3,
}

/// Maximum scriptlet call count representable by the u8 children prefix.
pub const SCRIPTLET_BODY_LIMIT: usize = u8::MAX as usize;

fn serialize_scriptlet_body(
    node: &ScriptletBody,
    buf: &mut OutputByteBuffer,
    dict: &'static FrequencyDict,
) -> Result<()> {
    buf.write_u8(BinaryTypeTag::ScriptletBody.as_u8());

    if !node.children.is_empty() {
        check_capacity("ScriptletBody", node.children.len(), SCRIPTLET_BODY_LIMIT)?;
        buf.write_u8(ScriptletBodyProp::Children as u8);
        buf.write_u8(node.children.len() as u8);
        for child in &node.children {
            serialize_parameter_list(child, buf, Some(dict))?;
        }
    }
    if let Some(start) = node.start {
        buf.write_u8(ScriptletBodyProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(ScriptletBodyProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
    Ok(())
}

fn deserialize_scriptlet_body(
    buf: &mut InputByteBuffer<'_>,
    dict: &'static FrequencyDict,
) -> Result<ScriptletBody> {
    buf.assert_u8(BinaryTypeTag::ScriptletBody.as_u8(), "ScriptletBody")?;

    let mut node = ScriptletBody::default();
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == ScriptletBodyProp::Children as u8 => {
                let count = buf.read_u8()? as usize;
                let mut children = Vec::with_capacity(count);
                for _ in 0..count {
                    children.push(deserialize_parameter_list(buf, Some(dict))?);
                }
                node.children = children;
            }
            t if t == ScriptletBodyProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == ScriptletBodyProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "ScriptletBody",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

#[repr(u8)]
enum HtmlFilteringBodyProp {
    Body = 1,
    Start = 2,
    End = 3,
}

fn serialize_html_filtering_body(node: &HtmlFilteringBody, buf: &mut OutputByteBuffer) {
    buf.write_u8(BinaryTypeTag::HtmlFilteringBody.as_u8());

    buf.write_u8(HtmlFilteringBodyProp::Body as u8);
    serialize_value(&node.body, buf, None);

    if let Some(start) = node.start {
        buf.write_u8(HtmlFilteringBodyProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(HtmlFilteringBodyProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
}

fn deserialize_html_filtering_body(buf: &mut InputByteBuffer<'_>) -> Result<HtmlFilteringBody> {
    buf.assert_u8(BinaryTypeTag::HtmlFilteringBody.as_u8(), "HtmlFilteringBody")?;

    let mut node = HtmlFilteringBody {
        body: Default::default(),
        start: None,
        end: None,
    };
    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == HtmlFilteringBodyProp::Body as u8 => {
                node.body = deserialize_value(buf, None)?;
            }
            t if t == HtmlFilteringBodyProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == HtmlFilteringBodyProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "HtmlFilteringBody",
                    tag,
                })
            }
        }
    }

    Ok(node)
}

#[repr(u8)]
enum CosmeticRuleProp {
    Exception = 1,
    Separator = 2,
    Modifiers = 3,
    Domains = 4,
    Body = 5,
    Syntax = 6,
    Start = 7,
    End = 8,
}

/// Pick the rule type tag for a cosmetic rule. Scriptlet rules fold the
/// syntax dialect into the tag.
fn cosmetic_rule_tag(node: &CosmeticRule) -> BinaryTypeTag {
    match &node.body {
        CosmeticBody::ElementHiding(_) => BinaryTypeTag::ElementHidingRule,
        CosmeticBody::CssInjection(_) => BinaryTypeTag::CssInjectionRule,
        CosmeticBody::Scriptlet(_) => match node.syntax {
            Syntax::UblockOrigin => BinaryTypeTag::UboScriptletRule,
            Syntax::AdblockPlus => BinaryTypeTag::AbpSnippetRule,
            _ => BinaryTypeTag::AdgScriptletRule,
        },
        CosmeticBody::HtmlFiltering(_) => BinaryTypeTag::HtmlFilteringRule,
        CosmeticBody::JsInjection(_) => BinaryTypeTag::JsInjectionRule,
    }
}

fn scriptlet_dict(syntax: Syntax) -> &'static FrequencyDict {
    match syntax {
        Syntax::UblockOrigin => &UBO_SCRIPTLET_NAMES,
        Syntax::AdblockPlus => &ABP_SNIPPET_NAMES,
        _ => &ADG_SCRIPTLET_NAMES,
    }
}

pub fn serialize_cosmetic_rule(node: &CosmeticRule, buf: &mut OutputByteBuffer) -> Result<()> {
    // Single-call syntaxes reject multiple scriptlet calls before any
    // bytes for the rule are written.
    if let CosmeticBody::Scriptlet(body) = &node.body {
        if body.children.len() > 1
            && !matches!(node.syntax, Syntax::AdblockPlus)
        {
            return Err(Error::MultipleScriptletCalls {
                syntax: match node.syntax {
                    Syntax::UblockOrigin => "uBlock Origin",
                    _ => "AdGuard",
                },
            });
        }
    }

    buf.write_u8(cosmetic_rule_tag(node).as_u8());

    if node.exception {
        buf.write_u8(CosmeticRuleProp::Exception as u8);
    }
    buf.write_u8(CosmeticRuleProp::Separator as u8);
    buf.write_u8(node.separator.as_u8());

    if let Some(modifiers) = &node.modifiers {
        buf.write_u8(CosmeticRuleProp::Modifiers as u8);
        serialize_modifier_list(modifiers, buf)?;
    }

    buf.write_u8(CosmeticRuleProp::Domains as u8);
    serialize_domain_list(&node.domains, buf)?;

    buf.write_u8(CosmeticRuleProp::Body as u8);
    match &node.body {
        CosmeticBody::ElementHiding(body) => serialize_element_hiding_body(body, buf),
        CosmeticBody::CssInjection(body) => serialize_css_injection_body(body, buf),
        CosmeticBody::Scriptlet(body) => {
            serialize_scriptlet_body(body, buf, scriptlet_dict(node.syntax))?
        }
        CosmeticBody::HtmlFiltering(body) => serialize_html_filtering_body(body, buf),
        CosmeticBody::JsInjection(body) => serialize_value(body, buf, None),
    }

    if node.syntax != Syntax::Common {
        buf.write_u8(CosmeticRuleProp::Syntax as u8);
        buf.write_u8(node.syntax.as_u8());
    }
    if let Some(start) = node.start {
        buf.write_u8(CosmeticRuleProp::Start as u8);
        buf.write_u32(start);
    }
    if let Some(end) = node.end {
        buf.write_u8(CosmeticRuleProp::End as u8);
        buf.write_u32(end);
    }

    buf.write_u8(NULL);
    Ok(())
}

pub fn deserialize_cosmetic_rule(buf: &mut InputByteBuffer<'_>) -> Result<CosmeticRule> {
    let raw = buf.read_u8()?;
    let rule_tag =
        BinaryTypeTag::from_u8(raw).ok_or(Error::UnknownTypeTag(raw))?;

    // The type tag implies the body kind and, for scriptlets, the dialect.
    // The dialect may still be refined by an explicit Syntax property.
    let default_syntax = match rule_tag {
        BinaryTypeTag::AdgScriptletRule => Syntax::AdGuard,
        BinaryTypeTag::UboScriptletRule => Syntax::UblockOrigin,
        BinaryTypeTag::AbpSnippetRule => Syntax::AdblockPlus,
        BinaryTypeTag::ElementHidingRule
        | BinaryTypeTag::CssInjectionRule
        | BinaryTypeTag::HtmlFilteringRule
        | BinaryTypeTag::JsInjectionRule => Syntax::Common,
        other => {
            return Err(Error::TypeTagMismatch {
                node_kind: "CosmeticRule",
                expected: BinaryTypeTag::ElementHidingRule.as_u8(),
                actual: other.as_u8(),
            })
        }
    };

    let mut node = CosmeticRule {
        syntax: default_syntax,
        exception: false,
        separator: CosmeticSeparator::ElementHiding,
        modifiers: None,
        domains: Default::default(),
        body: CosmeticBody::ElementHiding(ElementHidingBody {
            selector_list: Default::default(),
            start: None,
            end: None,
        }),
        start: None,
        end: None,
    };

    loop {
        let tag = buf.read_u8()?;
        match tag {
            NULL => break,
            t if t == CosmeticRuleProp::Exception as u8 => {
                node.exception = true;
            }
            t if t == CosmeticRuleProp::Separator as u8 => {
                let raw = buf.read_u8()?;
                node.separator = CosmeticSeparator::from_u8(raw).ok_or(
                    Error::UnknownPropertyTag {
                        node_kind: "CosmeticRule separator",
                        tag: raw,
                    },
                )?;
            }
            t if t == CosmeticRuleProp::Modifiers as u8 => {
                node.modifiers = Some(deserialize_modifier_list(buf)?);
            }
            t if t == CosmeticRuleProp::Domains as u8 => {
                node.domains = deserialize_domain_list(buf)?;
            }
            t if t == CosmeticRuleProp::Body as u8 => {
                node.body = match rule_tag {
                    BinaryTypeTag::ElementHidingRule => {
                        CosmeticBody::ElementHiding(deserialize_element_hiding_body(buf)?)
                    }
                    BinaryTypeTag::CssInjectionRule => {
                        CosmeticBody::CssInjection(deserialize_css_injection_body(buf)?)
                    }
                    BinaryTypeTag::AdgScriptletRule
                    | BinaryTypeTag::UboScriptletRule
                    | BinaryTypeTag::AbpSnippetRule => CosmeticBody::Scriptlet(
                        deserialize_scriptlet_body(buf, scriptlet_dict(default_syntax))?,
                    ),
                    BinaryTypeTag::HtmlFilteringRule => {
                        CosmeticBody::HtmlFiltering(deserialize_html_filtering_body(buf)?)
                    }
                    BinaryTypeTag::JsInjectionRule => {
                        CosmeticBody::JsInjection(deserialize_value(buf, None)?)
                    }
                    _ => unreachable!("rule tag validated above"),
                };
            }
            t if t == CosmeticRuleProp::Syntax as u8 => {
                let raw = buf.read_u8()?;
                node.syntax = Syntax::from_u8(raw).ok_or(Error::UnknownPropertyTag {
                    node_kind: "CosmeticRule syntax",
                    tag: raw,
                })?;
            }
            t if t == CosmeticRuleProp::Start as u8 => {
                node.start = Some(buf.read_u32()?);
            }
            t if t == CosmeticRuleProp::End as u8 => {
                node.end = Some(buf.read_u32()?);
            }
            _ => {
                return Err(Error::UnknownPropertyTag {
                    node_kind: "CosmeticRule",
                    tag,
                })
            }
        }
    }

    Ok(node)
}
