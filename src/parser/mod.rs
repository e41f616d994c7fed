//! Line-oriented filter-list text parser.
//!
//! The parser recognizes rule categories by cheap prefix/marker checks, in
//! the order a filter list makes them unambiguous: empty lines, agent
//! comments, hint comments, pre-processor comments, metadata and plain
//! comments, hosts-file rules, cosmetic rules (by separator scan), and
//! finally network rules as the fallback category.
//!
//! Every produced node carries `start`/`end` byte offsets into the source
//! text, which the binary layer round-trips exactly.

mod cosmetic;
mod network;

use std::net::IpAddr;

use crate::ast::{
    Agent, AgentRule, CommentMarker, CommentNode, CommentRule, ConfigRule, EmptyRule, FilterList,
    Hint, HintRule, HostRule, HostnameList, InvalidRule, InvalidRuleError, MetadataRule,
    ParameterList, PreProcessorParams, PreProcessorRule, RuleNode, Value,
};
use crate::binary::METADATA_HEADERS;
use crate::error::{Error, Result};

pub(crate) use cosmetic::parse_cosmetic_rule;
pub(crate) use network::parse_network_rule;

use cosmetic::find_cosmetic_separator;

/// Filter-list text parser.
pub struct FilterListParser;

impl FilterListParser {
    /// Parse a whole filter list, converting unparsable lines into
    /// [`InvalidRule`] nodes instead of failing the list.
    pub fn parse(text: &str) -> FilterList {
        let mut children = Vec::new();
        let mut offset = 0u32;

        for line in text.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            children.push(parse_rule_tolerant(line, offset));
            offset += line.len() as u32 + 1;
        }

        // A trailing newline produces a phantom empty line, not a rule.
        if text.ends_with('\n') {
            children.pop();
        }

        log::debug!("parsed {} rules from {} bytes", children.len(), text.len());

        FilterList {
            children,
            start: Some(0),
            end: Some(text.len() as u32),
        }
    }
}

/// Parse one line into a rule node, or an error for unparsable input.
pub fn parse_rule(line: &str, offset: u32) -> Result<RuleNode> {
    let end = offset + line.len() as u32;

    if line.trim().is_empty() {
        return Ok(RuleNode::Empty(EmptyRule {
            start: Some(offset),
            end: Some(end),
        }));
    }

    if line.starts_with('[') && line.ends_with(']') && !line.starts_with("[$") {
        return parse_agent_rule(line, offset).map(|r| RuleNode::Comment(CommentNode::Agent(r)));
    }

    if let Some(rest) = line.strip_prefix("!+") {
        return parse_hint_rule(rest, offset + 2, offset, end)
            .map(|r| RuleNode::Comment(CommentNode::Hint(r)));
    }

    if let Some(rest) = line.strip_prefix("!#") {
        return parse_pre_processor_rule(rest, offset + 2, offset, end)
            .map(|r| RuleNode::Comment(CommentNode::PreProcessor(r)));
    }

    if let Some(comment) = parse_comment_like(line, offset)? {
        return Ok(RuleNode::Comment(comment));
    }

    if let Some(host) = parse_host_rule(line, offset) {
        return Ok(RuleNode::Host(host));
    }

    if find_cosmetic_separator(line).is_some() {
        return parse_cosmetic_rule(line, offset).map(RuleNode::Cosmetic);
    }

    parse_network_rule(line, offset).map(RuleNode::Network)
}

/// Parse one line, downgrading parse failures to an [`InvalidRule`].
pub fn parse_rule_tolerant(line: &str, offset: u32) -> RuleNode {
    match parse_rule(line, offset) {
        Ok(rule) => rule,
        Err(err) => {
            log::warn!("invalid rule at offset {offset}: {err}");
            RuleNode::Invalid(InvalidRule {
                raw: line.to_string(),
                error: InvalidRuleError {
                    name: "ParseError".to_string(),
                    message: err.to_string(),
                    start: Some(offset),
                    end: Some(offset + line.len() as u32),
                },
                start: Some(offset),
                end: Some(offset + line.len() as u32),
            })
        }
    }
}

/// `[Adblock Plus 2.0; AdGuard]`
fn parse_agent_rule(line: &str, offset: u32) -> Result<AgentRule> {
    let inner = &line[1..line.len() - 1];
    let mut children = Vec::new();
    let mut cursor = offset + 1;

    for part in inner.split(';') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            return Err(Error::Parse("empty agent entry".to_string()));
        }
        let part_start = cursor + (part.len() - part.trim_start().len()) as u32;
        let part_end = part_start + trimmed.len() as u32;

        // The version is the last whitespace-separated token when it
        // begins with a digit; everything before it is the adblock name.
        let (adblock, version) = match trimmed.rsplit_once(' ') {
            Some((name, last))
                if last.chars().next().is_some_and(|c| c.is_ascii_digit()) =>
            {
                let version_start = part_end - last.len() as u32;
                (
                    Value::with_span(name.trim_end(), part_start, part_start + name.trim_end().len() as u32),
                    Some(Value::with_span(last, version_start, part_end)),
                )
            }
            _ => (Value::with_span(trimmed, part_start, part_end), None),
        };

        children.push(Agent {
            adblock,
            version,
            start: Some(part_start),
            end: Some(part_end),
        });
        cursor += part.len() as u32 + 1;
    }

    Ok(AgentRule {
        children,
        start: Some(offset),
        end: Some(offset + line.len() as u32),
    })
}

/// `!+ NOT_OPTIMIZED PLATFORM(windows, mac)` (the `!+` is already stripped)
fn parse_hint_rule(rest: &str, rest_offset: u32, start: u32, end: u32) -> Result<HintRule> {
    let mut children = Vec::new();
    let mut pos = 0usize;
    let bytes = rest.as_bytes();

    while pos < rest.len() {
        // Skip whitespace between hints.
        while pos < rest.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= rest.len() {
            break;
        }

        let name_start = pos;
        while pos < rest.len() && !bytes[pos].is_ascii_whitespace() && bytes[pos] != b'(' {
            pos += 1;
        }
        let name = &rest[name_start..pos];
        if name.is_empty() {
            return Err(Error::Parse("empty hint name".to_string()));
        }
        let name_node = Value::with_span(
            name,
            rest_offset + name_start as u32,
            rest_offset + pos as u32,
        );

        let mut params = None;
        let mut hint_end = pos;
        if pos < rest.len() && bytes[pos] == b'(' {
            let close = rest[pos..]
                .find(')')
                .ok_or_else(|| Error::Parse(format!("unclosed hint parameter list: {name}")))?;
            let inner = &rest[pos + 1..pos + close];
            params = Some(parse_parameter_list(
                inner,
                rest_offset + pos as u32 + 1,
                ',',
            ));
            pos += close + 1;
            hint_end = pos;
        }

        children.push(Hint {
            name: name_node,
            params,
            start: Some(rest_offset + name_start as u32),
            end: Some(rest_offset + hint_end as u32),
        });
    }

    if children.is_empty() {
        return Err(Error::Parse("hint comment without hints".to_string()));
    }

    Ok(HintRule {
        children,
        start: Some(start),
        end: Some(end),
    })
}

/// `!#if (adguard)`, `!#include url`, `!#endif`, `!#safari_cb_affinity(general)`
fn parse_pre_processor_rule(
    rest: &str,
    rest_offset: u32,
    start: u32,
    end: u32,
) -> Result<PreProcessorRule> {
    let name_len = rest
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(rest.len());
    let name = &rest[..name_len];
    if name.is_empty() {
        return Err(Error::Parse("empty pre-processor directive".to_string()));
    }
    let name_node = Value::with_span(name, rest_offset, rest_offset + name_len as u32);

    let after = &rest[name_len..];
    let params = if after.starts_with('(') && after.ends_with(')') {
        let inner = &after[1..after.len() - 1];
        Some(PreProcessorParams::List(parse_parameter_list(
            inner,
            rest_offset + name_len as u32 + 1,
            ',',
        )))
    } else {
        let trimmed = after.trim_start();
        if trimmed.is_empty() {
            None
        } else {
            let value_start = rest_offset + (rest.len() - trimmed.len()) as u32;
            Some(PreProcessorParams::Raw(Value::with_span(
                trimmed,
                value_start,
                rest_offset + rest.len() as u32,
            )))
        }
    };

    Ok(PreProcessorRule {
        name: name_node,
        params,
        start: Some(start),
        end: Some(end),
    })
}

/// Metadata, linter-config, and plain comments, all introduced by `!` or
/// `#`. Returns `Ok(None)` when the line is not comment-like at all.
fn parse_comment_like(line: &str, offset: u32) -> Result<Option<CommentNode>> {
    let marker = match line.chars().next() {
        Some('!') => CommentMarker::Exclamation,
        // `#` only counts as a comment when it cannot open a cosmetic
        // separator (`##`, `#@#`, `#?#`, `#$#`, `#%#`).
        Some('#')
            if !matches!(
                line.as_bytes().get(1),
                Some(b'#' | b'@' | b'?' | b'$' | b'%')
            ) =>
        {
            CommentMarker::Hash
        }
        _ => return Ok(None),
    };

    let end = offset + line.len() as u32;
    let text = &line[1..];

    // Linter config: `! aglint-disable rule1 -- reason`
    let trimmed = text.trim_start();
    if trimmed.starts_with("aglint") {
        let body_start = offset + 1 + (text.len() - trimmed.len()) as u32;
        let (body, comment) = match trimmed.split_once(" -- ") {
            Some((body, comment)) => (body, Some(comment)),
            None => (trimmed, None),
        };
        let (command, params) = match body.split_once(' ') {
            Some((cmd, rest)) => (cmd, Some(rest.trim())),
            None => (body, None),
        };

        let command_node =
            Value::with_span(command, body_start, body_start + command.len() as u32);
        let params_node = params.filter(|p| !p.is_empty()).map(|p| Value::new(p));
        let comment_node = comment.map(|c| Value::new(c.trim()));

        return Ok(Some(CommentNode::Config(ConfigRule {
            marker,
            command: command_node,
            params: params_node,
            comment: comment_node,
            start: Some(offset),
            end: Some(end),
        })));
    }

    // Metadata: `! Title: AdGuard Base filter`, known headers only.
    if let Some((raw_header, raw_value)) = text.split_once(':') {
        let header = raw_header.trim();
        let known = METADATA_HEADERS.index_of(header).is_some()
            || METADATA_HEADERS
                .index_of(&capitalize(header))
                .is_some();
        if known {
            let header_start = offset + 1 + (raw_header.len() - raw_header.trim_start().len()) as u32;
            let value = raw_value.trim();
            let value_lead = raw_value.len() - raw_value.trim_start().len();
            let value_start = offset + (2 + raw_header.len() + value_lead) as u32;

            return Ok(Some(CommentNode::Metadata(MetadataRule {
                marker,
                header: Value::with_span(header, header_start, header_start + header.len() as u32),
                value: Value::with_span(value, value_start, value_start + value.len() as u32),
                start: Some(offset),
                end: Some(end),
            })));
        }
    }

    Ok(Some(CommentNode::Simple(CommentRule {
        marker,
        text: Value::with_span(text, offset + 1, end),
        start: Some(offset),
        end: Some(end),
    })))
}

/// `127.0.0.1 example.org example.net # comment`
///
/// Returns `None` when the first token is not an IP address; the line
/// then falls through to the network-rule parser.
fn parse_host_rule(line: &str, offset: u32) -> Option<HostRule> {
    let (before_comment, comment) = match line.find('#') {
        Some(idx) => (&line[..idx], Some(line[idx + 1..].trim())),
        None => (line, None),
    };

    let mut tokens = token_spans(before_comment);
    if tokens.is_empty() {
        return None;
    }
    let (ip_text, ip_start) = tokens.remove(0);
    ip_text.parse::<IpAddr>().ok()?;
    if tokens.is_empty() {
        return None;
    }

    let hostnames = HostnameList {
        children: tokens
            .iter()
            .map(|(text, start)| {
                Value::with_span(*text, offset + *start, offset + start + text.len() as u32)
            })
            .collect(),
        start: tokens.first().map(|(_, s)| offset + s),
        end: tokens
            .last()
            .map(|(text, start)| offset + start + text.len() as u32),
    };

    Some(HostRule {
        ip: Value::with_span(ip_text, offset + ip_start, offset + ip_start + ip_text.len() as u32),
        hostnames,
        comment: comment.filter(|c| !c.is_empty()).map(Value::new),
        start: Some(offset),
        end: Some(offset + line.len() as u32),
    })
}

/// Split on a separator character, producing a parameter list whose
/// values are trimmed but keep their source offsets.
pub(crate) fn parse_parameter_list(inner: &str, inner_offset: u32, sep: char) -> ParameterList {
    let mut children = Vec::new();
    let mut cursor = 0usize;

    for part in inner.split(sep) {
        let trimmed = part.trim();
        let lead = part.len() - part.trim_start().len();
        let start = inner_offset + (cursor + lead) as u32;
        children.push(Value::with_span(
            trimmed,
            start,
            start + trimmed.len() as u32,
        ));
        cursor += part.len() + sep.len_utf8();
    }

    ParameterList {
        children,
        start: Some(inner_offset),
        end: Some(inner_offset + inner.len() as u32),
    }
}

/// Whitespace-separated tokens with their byte positions.
fn token_spans(text: &str) -> Vec<(&str, u32)> {
    let mut out = Vec::new();
    let mut pos = 0usize;
    for token in text.split_whitespace() {
        // split_whitespace discards positions; recover them by searching
        // forward from the previous token.
        let idx = text[pos..].find(token).map(|i| pos + i).unwrap_or(pos);
        out.push((token, idx as u32));
        pos = idx + token.len();
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
