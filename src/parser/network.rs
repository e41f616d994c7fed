//! Basic (network) rule parsing: `@@||example.org^$third-party,domain=a.com`.

use crate::ast::{Modifier, ModifierList, NetworkRule, Syntax, Value};
use crate::error::{Error, Result};

/// Parse a network rule. This is the fallback category, so nearly any
/// non-empty line is accepted; only an empty pattern or a dangling `$`
/// separator is rejected.
pub(crate) fn parse_network_rule(line: &str, offset: u32) -> Result<NetworkRule> {
    let (exception, body, body_offset) = match line.strip_prefix("@@") {
        Some(rest) => (true, rest, offset + 2),
        None => (false, line, offset),
    };

    if body.is_empty() {
        return Err(Error::Parse("empty network rule pattern".to_string()));
    }

    let (pattern, modifiers_part) = split_modifiers(body)?;
    let pattern_node = Value::with_span(
        pattern,
        body_offset,
        body_offset + pattern.len() as u32,
    );

    let modifiers = match modifiers_part {
        Some(part) => {
            let part_offset = body_offset + pattern.len() as u32 + 1;
            Some(parse_modifier_list(part, part_offset)?)
        }
        None => None,
    };

    Ok(NetworkRule {
        syntax: Syntax::Common,
        exception,
        pattern: pattern_node,
        modifiers,
        start: Some(offset),
        end: Some(offset + line.len() as u32),
    })
}

/// Split a rule body at the modifier separator `$`.
///
/// A `$` preceded by `\` is part of the pattern, and a fully regex-shaped
/// body (`/.../`) is never split at all since `$` is a regex anchor.
fn split_modifiers(body: &str) -> Result<(&str, Option<&str>)> {
    if body.len() > 1 && body.starts_with('/') && body.ends_with('/') {
        return Ok((body, None));
    }

    let bytes = body.as_bytes();
    let sep = (0..bytes.len())
        .rev()
        .find(|&i| bytes[i] == b'$' && (i == 0 || bytes[i - 1] != b'\\'));

    match sep {
        Some(i) if i + 1 == body.len() => {
            Err(Error::Parse("empty modifier list after '$'".to_string()))
        }
        Some(0) => Err(Error::Parse("empty network rule pattern".to_string())),
        Some(i) => Ok((&body[..i], Some(&body[i + 1..]))),
        None => Ok((body, None)),
    }
}

/// Parse a comma-separated modifier list, e.g. `~third-party,domain=a.com`.
pub(crate) fn parse_modifier_list(part: &str, part_offset: u32) -> Result<ModifierList> {
    let mut children = Vec::new();
    let mut cursor = 0usize;

    for piece in part.split(',') {
        let trimmed = piece.trim();
        if trimmed.is_empty() {
            return Err(Error::Parse("empty modifier".to_string()));
        }
        let lead = piece.len() - piece.trim_start().len();
        let start = part_offset + (cursor + lead) as u32;
        let end = start + trimmed.len() as u32;

        let (exception, rest, rest_start) = match trimmed.strip_prefix('~') {
            Some(rest) => (true, rest, start + 1),
            None => (false, trimmed, start),
        };
        if rest.is_empty() {
            return Err(Error::Parse("empty modifier name".to_string()));
        }

        let (name, value) = match rest.split_once('=') {
            Some((name, value)) => {
                let value_start = rest_start + name.len() as u32 + 1;
                (
                    Value::with_span(name, rest_start, rest_start + name.len() as u32),
                    Some(Value::with_span(value, value_start, end)),
                )
            }
            None => (Value::with_span(rest, rest_start, end), None),
        };

        children.push(Modifier {
            name,
            value,
            exception,
            start: Some(start),
            end: Some(end),
        });
        cursor += piece.len() + 1;
    }

    Ok(ModifierList {
        children,
        start: Some(part_offset),
        end: Some(part_offset + part.len() as u32),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_pattern() {
        let rule = parse_network_rule("||example.org^", 0).unwrap();
        assert_eq!(rule.pattern.value, "||example.org^");
        assert!(rule.modifiers.is_none());
        assert!(!rule.exception);
    }

    #[test]
    fn test_exception_rule() {
        let rule = parse_network_rule("@@||example.org^$elemhide", 0).unwrap();
        assert!(rule.exception);
        assert_eq!(rule.pattern.value, "||example.org^");
        assert_eq!(rule.pattern.start, Some(2));
        let modifiers = rule.modifiers.unwrap();
        assert_eq!(modifiers.children[0].name.value, "elemhide");
    }

    #[test]
    fn test_modifier_with_value_and_negation() {
        let rule = parse_network_rule("||example.org^$domain=a.com|b.com,~third-party", 0).unwrap();
        let modifiers = rule.modifiers.unwrap();
        assert_eq!(modifiers.children.len(), 2);
        assert_eq!(modifiers.children[0].name.value, "domain");
        assert_eq!(
            modifiers.children[0].value.as_ref().unwrap().value,
            "a.com|b.com"
        );
        assert!(modifiers.children[1].exception);
        assert_eq!(modifiers.children[1].name.value, "third-party");
    }

    #[test]
    fn test_regex_pattern_keeps_dollar() {
        let rule = parse_network_rule("/banner\\d+$/", 0).unwrap();
        assert_eq!(rule.pattern.value, "/banner\\d+$/");
        assert!(rule.modifiers.is_none());
    }

    #[test]
    fn test_escaped_dollar_stays_in_pattern() {
        let rule = parse_network_rule("||example.org/page\\$ad$script", 0).unwrap();
        assert_eq!(rule.pattern.value, "||example.org/page\\$ad");
        let modifiers = rule.modifiers.unwrap();
        assert_eq!(modifiers.children[0].name.value, "script");
    }

    #[test]
    fn test_dangling_separator_is_error() {
        assert!(parse_network_rule("||example.org^$", 0).is_err());
    }
}
