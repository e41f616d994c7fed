//! Rule text generation, the inverse of the parser.
//!
//! Output is canonical: one space after comment markers, `, ` between
//! quoted scriptlet arguments, `; ` between agent entries. Parsing the
//! generated text yields a structurally identical tree.

use std::fmt::Write;

use crate::ast::{
    Agent, CommentNode, CosmeticBody, CosmeticRule, CssInjectionBody, DomainList, FilterList,
    Hint, HostRule, ModifierList, NetworkRule, ParameterList, PreProcessorParams, RuleNode,
    ScriptletBody, Syntax,
};

/// Generate the text of a whole filter list, one rule per line.
pub fn generate_filter_list(list: &FilterList) -> String {
    let mut out = String::new();
    for (i, rule) in list.children.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&generate_rule(rule));
    }
    out
}

/// Generate the text of a single rule.
pub fn generate_rule(rule: &RuleNode) -> String {
    match rule {
        RuleNode::Empty(_) => String::new(),
        RuleNode::Invalid(invalid) => invalid.raw.clone(),
        RuleNode::Comment(comment) => generate_comment(comment),
        RuleNode::Network(network) => generate_network_rule(network),
        RuleNode::Host(host) => generate_host_rule(host),
        RuleNode::Cosmetic(cosmetic) => generate_cosmetic_rule(cosmetic),
    }
}

fn generate_comment(comment: &CommentNode) -> String {
    match comment {
        CommentNode::Simple(c) => format!("{}{}", c.marker.as_char(), c.text.value),
        CommentNode::Metadata(m) => format!(
            "{} {}: {}",
            m.marker.as_char(),
            m.header.value,
            m.value.value
        ),
        CommentNode::Agent(agent) => {
            let entries: Vec<String> = agent.children.iter().map(generate_agent).collect();
            format!("[{}]", entries.join("; "))
        }
        CommentNode::Hint(hint) => {
            let hints: Vec<String> = hint.children.iter().map(generate_hint).collect();
            format!("!+ {}", hints.join(" "))
        }
        CommentNode::PreProcessor(pp) => {
            let mut out = format!("!#{}", pp.name.value);
            match &pp.params {
                Some(PreProcessorParams::Raw(value)) => {
                    write!(out, " {}", value.value).ok();
                }
                Some(PreProcessorParams::List(list)) => {
                    write!(out, "({})", join_params(list, ", ")).ok();
                }
                None => {}
            }
            out
        }
        CommentNode::Config(cfg) => {
            let mut out = format!("{} {}", cfg.marker.as_char(), cfg.command.value);
            if let Some(params) = &cfg.params {
                write!(out, " {}", params.value).ok();
            }
            if let Some(comment) = &cfg.comment {
                write!(out, " -- {}", comment.value).ok();
            }
            out
        }
    }
}

fn generate_agent(agent: &Agent) -> String {
    match &agent.version {
        Some(version) => format!("{} {}", agent.adblock.value, version.value),
        None => agent.adblock.value.clone(),
    }
}

fn generate_hint(hint: &Hint) -> String {
    match &hint.params {
        Some(params) => format!("{}({})", hint.name.value, join_params(params, ", ")),
        None => hint.name.value.clone(),
    }
}

fn generate_network_rule(rule: &NetworkRule) -> String {
    let mut out = String::new();
    if rule.exception {
        out.push_str("@@");
    }
    out.push_str(&rule.pattern.value);
    if let Some(modifiers) = &rule.modifiers {
        out.push('$');
        out.push_str(&generate_modifier_list(modifiers));
    }
    out
}

fn generate_modifier_list(list: &ModifierList) -> String {
    let parts: Vec<String> = list
        .children
        .iter()
        .map(|m| {
            let mut part = String::new();
            if m.exception {
                part.push('~');
            }
            part.push_str(&m.name.value);
            if let Some(value) = &m.value {
                part.push('=');
                part.push_str(&value.value);
            }
            part
        })
        .collect();
    parts.join(",")
}

fn generate_host_rule(rule: &HostRule) -> String {
    let mut out = rule.ip.value.clone();
    for hostname in &rule.hostnames.children {
        out.push(' ');
        out.push_str(&hostname.value);
    }
    if let Some(comment) = &rule.comment {
        write!(out, " # {}", comment.value).ok();
    }
    out
}

fn generate_cosmetic_rule(rule: &CosmeticRule) -> String {
    let mut out = String::new();
    if let Some(modifiers) = &rule.modifiers {
        write!(out, "[${}]", generate_modifier_list(modifiers)).ok();
    }
    out.push_str(&generate_domain_list(&rule.domains));
    out.push_str(rule.separator.as_str());
    out.push_str(&generate_cosmetic_body(rule));
    out
}

fn generate_domain_list(list: &DomainList) -> String {
    let parts: Vec<String> = list
        .children
        .iter()
        .map(|item| {
            if item.exception {
                format!("~{}", item.value)
            } else {
                item.value.clone()
            }
        })
        .collect();
    parts.join(&list.separator.as_char().to_string())
}

fn generate_cosmetic_body(rule: &CosmeticRule) -> String {
    match &rule.body {
        CosmeticBody::ElementHiding(body) => body.selector_list.value.clone(),
        CosmeticBody::CssInjection(body) => generate_css_injection(body),
        CosmeticBody::Scriptlet(body) => generate_scriptlet(body, rule.syntax),
        CosmeticBody::HtmlFiltering(body) => body.body.value.clone(),
        CosmeticBody::JsInjection(value) => value.value.clone(),
    }
}

fn generate_css_injection(body: &CssInjectionBody) -> String {
    let declarations = if body.remove {
        "remove: true;".to_string()
    } else {
        body.declaration_list
            .as_ref()
            .map(|d| d.value.clone())
            .unwrap_or_default()
    };
    let inner = format!("{} {{ {} }}", body.selector_list.value, declarations);
    match &body.media_query_list {
        Some(query) => format!("@media {} {{ {} }}", query.value, inner),
        None => inner,
    }
}

fn generate_scriptlet(body: &ScriptletBody, syntax: Syntax) -> String {
    match syntax {
        Syntax::UblockOrigin => {
            let params = body.children.first().map(|p| join_params(p, ", ")).unwrap_or_default();
            format!("+js({params})")
        }
        Syntax::AdblockPlus => {
            let calls: Vec<String> = body
                .children
                .iter()
                .map(|p| join_params(p, " "))
                .collect();
            calls.join("; ")
        }
        // AdGuard scriptlet arguments are quoted on output.
        Syntax::AdGuard | Syntax::Common => {
            let params: Vec<String> = body
                .children
                .first()
                .map(|p| p.children.iter().map(|v| format!("'{}'", v.value)).collect())
                .unwrap_or_default();
            format!("//scriptlet({})", params.join(", "))
        }
    }
}

fn join_params(list: &ParameterList, sep: &str) -> String {
    let parts: Vec<&str> = list.children.iter().map(|v| v.value.as_str()).collect();
    parts.join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_rule, FilterListParser};

    fn roundtrip(line: &str) {
        let rule = parse_rule(line, 0).unwrap();
        assert_eq!(generate_rule(&rule), line, "rule text changed: {line}");
    }

    #[test]
    fn test_roundtrip_comments() {
        roundtrip("! just a comment");
        roundtrip("! Title: AdGuard Base filter");
        roundtrip("[Adblock Plus 2.0; AdGuard]");
        roundtrip("!+ NOT_OPTIMIZED PLATFORM(windows, mac)");
        roundtrip("!#if (adguard)");
        roundtrip("!#endif");
        roundtrip("!#safari_cb_affinity(general)");
        roundtrip("! aglint-disable some-rule -- reason");
    }

    #[test]
    fn test_roundtrip_network_rules() {
        roundtrip("||example.org^");
        roundtrip("@@||example.org^$elemhide");
        roundtrip("||example.org^$domain=a.com|b.com,~third-party");
        roundtrip("/banner\\d+$/");
    }

    #[test]
    fn test_roundtrip_host_rules() {
        roundtrip("127.0.0.1 example.org example.net");
        roundtrip("0.0.0.0 ads.example.com # blocked");
    }

    #[test]
    fn test_roundtrip_cosmetic_rules() {
        roundtrip("example.org##.banner");
        roundtrip("example.org,~sub.example.org#@#.ad");
        roundtrip("##div[data-ad]");
        roundtrip("example.org#$#body { padding-top: 0; }");
        roundtrip("example.org#$?#.ad:has(> img) { remove: true; }");
        roundtrip("example.org#%#//scriptlet('set-constant', 'adBlock', 'false')");
        roundtrip("example.org##+js(set-constant.js, adBlock, false)");
        roundtrip("example.org#$#abort-on-property-read adblock; hide-if-contains ad");
        roundtrip("example.org$$script[data-ad]");
        roundtrip("[$path=/page]example.org##.ad");
    }

    #[test]
    fn test_empty_and_invalid_rules() {
        let list = FilterListParser::parse("||example.org^\n\n[;]");
        let text = generate_filter_list(&list);
        assert_eq!(text, "||example.org^\n\n[;]");
    }
}
