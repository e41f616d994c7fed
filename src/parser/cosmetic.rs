//! Cosmetic rule parsing: element hiding, CSS injection, scriptlets,
//! HTML filtering, and JS injection, recognized by their separator marker.

use crate::ast::{
    CosmeticBody, CosmeticRule, CosmeticSeparator, CssInjectionBody, DomainList,
    DomainListSeparator, ElementHidingBody, HtmlFilteringBody, ListItem, ListItemKind,
    ParameterList, ScriptletBody, Syntax, Value,
};
use crate::error::{Error, Result};

use super::network::parse_modifier_list;
use super::{parse_parameter_list, token_spans};

const UBO_SCRIPTLET_OPEN: &str = "+js(";
const ADG_SCRIPTLET_OPEN: &str = "//scriptlet(";

/// Find the leftmost cosmetic separator in a line. Markers are tried
/// longest-first at every position so `#@#` wins over `##`.
///
/// The scan is byte-wise: every marker is pure ASCII, so a match position
/// is always a char boundary even when the line holds multi-byte UTF-8
/// (Cyrillic/CJK domains and selectors).
pub(crate) fn find_cosmetic_separator(line: &str) -> Option<(usize, CosmeticSeparator)> {
    let bytes = line.as_bytes();
    for idx in 0..bytes.len() {
        let rest = &bytes[idx..];
        for sep in CosmeticSeparator::ALL {
            if rest.starts_with(sep.as_str().as_bytes()) {
                return Some((idx, sep));
            }
        }
    }
    None
}

pub(crate) fn parse_cosmetic_rule(line: &str, offset: u32) -> Result<CosmeticRule> {
    let (sep_idx, separator) = find_cosmetic_separator(line)
        .ok_or_else(|| Error::Parse("missing cosmetic rule separator".to_string()))?;

    let before = &line[..sep_idx];
    let body = &line[sep_idx + separator.as_str().len()..];
    let body_offset = offset + (sep_idx + separator.as_str().len()) as u32;
    let end = offset + line.len() as u32;

    if body.is_empty() {
        return Err(Error::Parse("empty cosmetic rule body".to_string()));
    }

    // AdGuard extension: a `[$modifiers]` prefix before the domain list.
    let (modifiers, domains_part, domains_offset) = match before.strip_prefix("[$") {
        Some(rest) => {
            let close = rest
                .find(']')
                .ok_or_else(|| Error::Parse("unclosed cosmetic rule modifier list".to_string()))?;
            let list = parse_modifier_list(&rest[..close], offset + 2)?;
            (
                Some(list),
                &rest[close + 1..],
                offset + (close + 3) as u32,
            )
        }
        None => (None, before, offset),
    };

    let domains = parse_domain_list(domains_part, domains_offset)?;
    let (syntax, cosmetic_body) = parse_body(separator, body, body_offset, end)?;

    // The `[$...]` modifier prefix only exists in AdGuard syntax.
    let syntax = if modifiers.is_some() && syntax == Syntax::Common {
        Syntax::AdGuard
    } else {
        syntax
    };

    Ok(CosmeticRule {
        syntax,
        exception: separator.is_exception(),
        separator,
        modifiers,
        domains,
        body: cosmetic_body,
        start: Some(offset),
        end: Some(end),
    })
}

fn parse_body(
    separator: CosmeticSeparator,
    body: &str,
    body_offset: u32,
    end: u32,
) -> Result<(Syntax, CosmeticBody)> {
    use CosmeticSeparator::*;

    match separator {
        ElementHiding | ElementHidingException | ExtendedElementHiding
        | ExtendedElementHidingException => {
            if let Some(inner) = body
                .strip_prefix(UBO_SCRIPTLET_OPEN)
                .and_then(|s| s.strip_suffix(')'))
            {
                let params = parse_parameter_list(
                    inner,
                    body_offset + UBO_SCRIPTLET_OPEN.len() as u32,
                    ',',
                );
                return Ok((
                    Syntax::UblockOrigin,
                    CosmeticBody::Scriptlet(ScriptletBody {
                        children: vec![params],
                        start: Some(body_offset),
                        end: Some(end),
                    }),
                ));
            }
            Ok((
                Syntax::Common,
                CosmeticBody::ElementHiding(ElementHidingBody {
                    selector_list: Value::with_span(body, body_offset, end),
                    start: Some(body_offset),
                    end: Some(end),
                }),
            ))
        }

        CssInjection | CssInjectionException if !body.contains('{') => {
            // `#$#` without a declaration block is an Adblock Plus snippet
            // filter; each `;`-separated call is a parameter list.
            let children = body
                .split(';')
                .map(|call| {
                    let trimmed = call.trim();
                    if trimmed.is_empty() {
                        return Err(Error::Parse("empty snippet call".to_string()));
                    }
                    Ok(whitespace_parameter_list(call, body_offset))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok((
                Syntax::AdblockPlus,
                CosmeticBody::Scriptlet(ScriptletBody {
                    children,
                    start: Some(body_offset),
                    end: Some(end),
                }),
            ))
        }

        CssInjection | CssInjectionException | ExtendedCssInjection
        | ExtendedCssInjectionException => {
            let css = parse_css_injection(body, body_offset, end)?;
            Ok((Syntax::AdGuard, CosmeticBody::CssInjection(css)))
        }

        JsInjection | JsInjectionException => {
            if let Some(inner) = body
                .strip_prefix(ADG_SCRIPTLET_OPEN)
                .and_then(|s| s.strip_suffix(')'))
            {
                let params = parse_scriptlet_params(
                    inner,
                    body_offset + ADG_SCRIPTLET_OPEN.len() as u32,
                );
                return Ok((
                    Syntax::AdGuard,
                    CosmeticBody::Scriptlet(ScriptletBody {
                        children: vec![params],
                        start: Some(body_offset),
                        end: Some(end),
                    }),
                ));
            }
            Ok((
                Syntax::AdGuard,
                CosmeticBody::JsInjection(Value::with_span(body, body_offset, end)),
            ))
        }

        HtmlFiltering | HtmlFilteringException => Ok((
            Syntax::AdGuard,
            CosmeticBody::HtmlFiltering(HtmlFilteringBody {
                body: Value::with_span(body, body_offset, end),
                start: Some(body_offset),
                end: Some(end),
            }),
        )),
    }
}

/// `selector { declarations }`, optionally wrapped in `@media <query> { .. }`.
///
/// A declaration block consisting solely of `remove: true` becomes the
/// `remove` flag instead of a declaration list.
fn parse_css_injection(body: &str, body_offset: u32, end: u32) -> Result<CssInjectionBody> {
    let (media_query_list, inner, inner_offset) = match body.trim_start().strip_prefix("@media") {
        Some(_) => {
            let open = body
                .find('{')
                .ok_or_else(|| Error::Parse("missing media query block".to_string()))?;
            let close = body
                .rfind('}')
                .ok_or_else(|| Error::Parse("unclosed media query block".to_string()))?;
            let media_start = body.find("@media").unwrap_or(0) + "@media".len();
            let query = body[media_start..open].trim();
            (
                Some(Value::new(query)),
                &body[open + 1..close],
                body_offset + open as u32 + 1,
            )
        }
        None => (None, body, body_offset),
    };

    let open = inner
        .find('{')
        .ok_or_else(|| Error::Parse("missing CSS declaration block".to_string()))?;
    let close = inner
        .rfind('}')
        .filter(|&c| c > open)
        .ok_or_else(|| Error::Parse("unclosed CSS declaration block".to_string()))?;

    let selector = inner[..open].trim();
    if selector.is_empty() {
        return Err(Error::Parse("empty CSS injection selector".to_string()));
    }
    let selector_start =
        inner_offset + (inner[..open].len() - inner[..open].trim_start().len()) as u32;

    let declarations = inner[open + 1..close].trim();
    let remove = declarations
        .replace(char::is_whitespace, "")
        .trim_end_matches(';')
        == "remove:true";

    Ok(CssInjectionBody {
        selector_list: Value::with_span(
            selector,
            selector_start,
            selector_start + selector.len() as u32,
        ),
        declaration_list: if remove || declarations.is_empty() {
            None
        } else {
            Some(Value::new(declarations))
        },
        media_query_list,
        remove,
        start: Some(body_offset),
        end: Some(end),
    })
}

/// Comma-separated domain list: `example.org,~sub.example.org`.
fn parse_domain_list(part: &str, part_offset: u32) -> Result<DomainList> {
    let mut children = Vec::new();

    if !part.is_empty() {
        let mut cursor = 0usize;
        for piece in part.split(',') {
            let trimmed = piece.trim();
            if trimmed.is_empty() {
                return Err(Error::Parse("empty domain in domain list".to_string()));
            }
            let lead = piece.len() - piece.trim_start().len();
            let start = part_offset + (cursor + lead) as u32;
            let end = start + trimmed.len() as u32;

            let (exception, value) = match trimmed.strip_prefix('~') {
                Some(rest) => (true, rest),
                None => (false, trimmed),
            };
            if value.is_empty() {
                return Err(Error::Parse("empty negated domain".to_string()));
            }

            children.push(ListItem {
                kind: ListItemKind::Domain,
                exception,
                value: value.to_string(),
                start: Some(start),
                end: Some(end),
            });
            cursor += piece.len() + 1;
        }
    }

    Ok(DomainList {
        separator: DomainListSeparator::Comma,
        children,
        start: if part.is_empty() { None } else { Some(part_offset) },
        end: if part.is_empty() {
            None
        } else {
            Some(part_offset + part.len() as u32)
        },
    })
}

/// AdGuard scriptlet arguments: comma separated, each usually quoted.
/// Quotes are stripped here and re-added by the generator.
fn parse_scriptlet_params(inner: &str, inner_offset: u32) -> ParameterList {
    if inner.trim().is_empty() {
        return ParameterList {
            children: Vec::new(),
            start: Some(inner_offset),
            end: Some(inner_offset + inner.len() as u32),
        };
    }

    let mut list = parse_parameter_list(inner, inner_offset, ',');
    for value in &mut list.children {
        let unquoted = unquote(&value.value);
        if unquoted.len() != value.value.len() {
            value.value = unquoted.to_string();
            value.start = value.start.map(|s| s + 1);
            value.end = value.end.map(|e| e - 1);
        }
    }
    list
}

/// Whitespace-separated parameter list for Adblock Plus snippet calls.
fn whitespace_parameter_list(call: &str, call_offset: u32) -> ParameterList {
    let tokens = token_spans(call);
    let children: Vec<Value> = tokens
        .iter()
        .map(|(text, start)| {
            Value::with_span(*text, call_offset + start, call_offset + start + text.len() as u32)
        })
        .collect();
    let start = children.first().and_then(|v| v.start);
    let end = children.last().and_then(|v| v.end);
    ParameterList {
        children,
        start,
        end,
    }
}

fn unquote(s: &str) -> &str {
    if s.len() >= 2
        && ((s.starts_with('\'') && s.ends_with('\'')) || (s.starts_with('"') && s.ends_with('"')))
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_separator_prefers_longest() {
        let (idx, sep) = find_cosmetic_separator("example.org#@?#.ad").unwrap();
        assert_eq!(idx, 11);
        assert_eq!(sep, CosmeticSeparator::ExtendedElementHidingException);
    }

    #[test]
    fn test_element_hiding() {
        let rule = parse_cosmetic_rule("example.org##.banner", 0).unwrap();
        assert_eq!(rule.syntax, Syntax::Common);
        assert!(!rule.exception);
        assert_eq!(rule.domains.children.len(), 1);
        let CosmeticBody::ElementHiding(body) = &rule.body else {
            panic!("expected element hiding body");
        };
        assert_eq!(body.selector_list.value, ".banner");
        assert_eq!(body.selector_list.start, Some(13));
        assert_eq!(body.selector_list.end, Some(20));
    }

    #[test]
    fn test_non_ascii_domains_and_selector() {
        // Multi-byte UTF-8 on both sides of the separator; offsets stay
        // byte-based.
        let line = "пример.рф##.реклама";
        let rule = parse_cosmetic_rule(line, 0).unwrap();
        assert_eq!(rule.domains.children[0].value, "пример.рф");
        let CosmeticBody::ElementHiding(body) = &rule.body else {
            panic!("expected element hiding body");
        };
        assert_eq!(body.selector_list.value, ".реклама");
        assert_eq!(body.selector_list.start, Some("пример.рф##".len() as u32));
        assert_eq!(body.selector_list.end, Some(line.len() as u32));
    }

    #[test]
    fn test_generic_rule_has_empty_domains() {
        let rule = parse_cosmetic_rule("##.banner", 0).unwrap();
        assert!(rule.domains.children.is_empty());
        assert_eq!(rule.domains.start, None);
    }

    #[test]
    fn test_css_injection_with_declarations() {
        let rule = parse_cosmetic_rule("example.org#$#body { padding-top: 0; }", 0).unwrap();
        assert_eq!(rule.syntax, Syntax::AdGuard);
        let CosmeticBody::CssInjection(css) = &rule.body else {
            panic!("expected css injection body");
        };
        assert_eq!(css.selector_list.value, "body");
        assert_eq!(css.declaration_list.as_ref().unwrap().value, "padding-top: 0;");
        assert!(!css.remove);
    }

    #[test]
    fn test_css_injection_remove() {
        let rule = parse_cosmetic_rule("example.org#$?#.ad:has(> img) { remove: true; }", 0)
            .unwrap();
        let CosmeticBody::CssInjection(css) = &rule.body else {
            panic!("expected css injection body");
        };
        assert!(css.remove);
        assert!(css.declaration_list.is_none());
    }

    #[test]
    fn test_css_injection_media_query() {
        let rule = parse_cosmetic_rule(
            "example.org#$#@media (max-width: 768px) { body { padding: 0; } }",
            0,
        )
        .unwrap();
        let CosmeticBody::CssInjection(css) = &rule.body else {
            panic!("expected css injection body");
        };
        assert_eq!(
            css.media_query_list.as_ref().unwrap().value,
            "(max-width: 768px)"
        );
        assert_eq!(css.selector_list.value, "body");
    }

    #[test]
    fn test_abp_snippet_multiple_calls() {
        let rule =
            parse_cosmetic_rule("example.org#$#abort-on-property-read adblock; hide-if-contains ad", 0)
                .unwrap();
        assert_eq!(rule.syntax, Syntax::AdblockPlus);
        let CosmeticBody::Scriptlet(body) = &rule.body else {
            panic!("expected scriptlet body");
        };
        assert_eq!(body.children.len(), 2);
        assert_eq!(body.children[0].children[0].value, "abort-on-property-read");
        assert_eq!(body.children[1].children[1].value, "ad");
    }

    #[test]
    fn test_adg_scriptlet_quotes_stripped() {
        let rule = parse_cosmetic_rule(
            "example.org#%#//scriptlet('set-constant', 'adBlock', 'false')",
            0,
        )
        .unwrap();
        assert_eq!(rule.syntax, Syntax::AdGuard);
        let CosmeticBody::Scriptlet(body) = &rule.body else {
            panic!("expected scriptlet body");
        };
        let params = &body.children[0];
        assert_eq!(params.children.len(), 3);
        assert_eq!(params.children[0].value, "set-constant");
        assert_eq!(params.children[1].value, "adBlock");
    }

    #[test]
    fn test_js_injection_without_scriptlet() {
        let rule = parse_cosmetic_rule("example.org#%#window.adsLoaded = true;", 0).unwrap();
        let CosmeticBody::JsInjection(value) = &rule.body else {
            panic!("expected js injection body");
        };
        assert_eq!(value.value, "window.adsLoaded = true;");
    }

    #[test]
    fn test_html_filtering() {
        let rule = parse_cosmetic_rule("example.org$$script[data-ad]", 0).unwrap();
        assert_eq!(rule.syntax, Syntax::AdGuard);
        assert!(!rule.exception);
        let CosmeticBody::HtmlFiltering(body) = &rule.body else {
            panic!("expected html filtering body");
        };
        assert_eq!(body.body.value, "script[data-ad]");
    }

    #[test]
    fn test_modifier_prefix() {
        let rule = parse_cosmetic_rule("[$path=/page]example.org##.ad", 0).unwrap();
        assert_eq!(rule.syntax, Syntax::AdGuard);
        let modifiers = rule.modifiers.as_ref().unwrap();
        assert_eq!(modifiers.children[0].name.value, "path");
        assert_eq!(modifiers.children[0].value.as_ref().unwrap().value, "/page");
        assert_eq!(rule.domains.children[0].value, "example.org");
    }

    #[test]
    fn test_exception_separator() {
        let rule = parse_cosmetic_rule("example.org#@#.ad", 0).unwrap();
        assert!(rule.exception);
        assert_eq!(rule.separator, CosmeticSeparator::ElementHidingException);
    }
}
