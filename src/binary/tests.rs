//! Cross-cutting serialization tests: whole-rule round trips through the
//! public entry points, capacity limits, and wire-level edge cases that
//! the per-module tests do not cover.

use super::*;
use crate::ast::{
    FilterList, Modifier, ModifierList, RuleNode, Value,
};
use crate::parser::{parse_rule, FilterListParser};

fn roundtrip_rule(line: &str) -> RuleNode {
    let rule = parse_rule(line, 0).unwrap();
    let mut buf = OutputByteBuffer::new();
    serialize_rule(&rule, &mut buf).unwrap();
    let mut input = InputByteBuffer::new(buf.as_slice());
    let decoded = deserialize_rule(&mut input).unwrap();
    assert_eq!(decoded, rule, "tree changed across encoding: {line}");
    assert_eq!(input.remaining(), 0, "trailing bytes after {line}");
    decoded
}

#[test]
fn test_roundtrip_every_rule_kind() {
    for line in [
        "",
        "! plain comment",
        "# hosts comment",
        "! Title: Test List",
        "! Expires: 4 days",
        "[Adblock Plus 2.0; AdGuard]",
        "!+ NOT_OPTIMIZED PLATFORM(windows, mac)",
        "!#if (adguard_app_windows)",
        "!#include https://example.org/subfilter.txt",
        "!#endif",
        "!#safari_cb_affinity(general,privacy)",
        "! aglint-disable rule -- handled elsewhere",
        "||example.org^",
        "@@||example.org^$elemhide,~third-party",
        "||example.org/banner$script,domain=a.com|~b.com",
        "/banner\\d+$/",
        "127.0.0.1 example.org example.net",
        "0.0.0.0 ads.example.com # comment",
        "example.org##.banner",
        "example.org,~sub.example.org#@#.ad",
        "##div[data-ad]",
        "example.org#?#.banner:has(> .ad)",
        "example.org#$#body { padding-top: 0; }",
        "example.org#$?#.ad { remove: true; }",
        "example.org#%#//scriptlet('set-constant', 'adBlock', 'false')",
        "example.org#%#window.ads = false;",
        "example.org#@%#window.ads = false;",
        "example.org##+js(set-constant.js, adBlock, false)",
        "example.org#$#abort-on-property-read adblock; hide-if-contains ad",
        "example.org$$script[data-ad]",
        "example.org$@$script[data-ad]",
        "[$path=/page]example.org##.ad",
        "||пример.рф^$third-party",
        "пример.рф##.реклама",
        "例子.网站#%#//scriptlet('set-constant', '广告', 'false')",
    ] {
        roundtrip_rule(line);
    }
}

#[test]
fn test_roundtrip_invalid_rule_node() {
    let rule = crate::parser::parse_rule_tolerant("[;]", 7);
    let mut buf = OutputByteBuffer::new();
    serialize_rule(&rule, &mut buf).unwrap();
    let mut input = InputByteBuffer::new(buf.as_slice());
    assert_eq!(deserialize_rule(&mut input).unwrap(), rule);
}

#[test]
fn test_roundtrip_whole_filter_list() {
    let text = "\
! Title: Test List\n\
[Adblock Plus 2.0]\n\
||example.org^$important\n\
example.org##.banner\n\
\n\
127.0.0.1 tracker.example.net";
    let list = FilterListParser::parse(text);

    let mut buf = OutputByteBuffer::new();
    serialize_filter_list(&list, &mut buf).unwrap();
    let mut input = InputByteBuffer::new(buf.as_slice());
    let decoded = deserialize_filter_list(&mut input).unwrap();

    assert_eq!(decoded, list);
    assert_eq!(decoded.children.len(), 6);
}

#[test]
fn test_modifier_list_capacity_overflow() {
    let oversized = ModifierList {
        children: vec![
            Modifier {
                name: Value::new("script"),
                value: None,
                exception: false,
                start: None,
                end: None,
            };
            MODIFIER_LIST_LIMIT + 1
        ],
        start: None,
        end: None,
    };

    let mut buf = OutputByteBuffer::new();
    let err = serialize_modifier_list(&oversized, &mut buf).unwrap_err();
    match err {
        crate::Error::CapacityExceeded {
            node_kind,
            count,
            limit,
        } => {
            assert_eq!(node_kind, "ModifierList");
            assert_eq!(count, 65_536);
            assert_eq!(limit, 65_535);
        }
        other => panic!("expected CapacityExceeded, got {other:?}"),
    }
}

#[test]
fn test_unknown_property_tag_is_fatal() {
    // A NetworkRule whose first property tag is unassigned.
    let bytes = [BinaryTypeTag::NetworkRule.as_u8(), 0xFE];
    let mut input = InputByteBuffer::new(&bytes);
    let err = deserialize_rule(&mut input).unwrap_err();
    match err {
        crate::Error::UnknownPropertyTag { node_kind, tag } => {
            assert_eq!(node_kind, "NetworkRule");
            assert_eq!(tag, 0xFE);
        }
        other => panic!("expected UnknownPropertyTag, got {other:?}"),
    }
}

#[test]
fn test_unknown_type_tag_is_fatal() {
    let bytes = [0xEE, NULL];
    let mut input = InputByteBuffer::new(&bytes);
    assert!(matches!(
        deserialize_rule(&mut input),
        Err(crate::Error::UnknownTypeTag(0xEE))
    ));
}

#[test]
fn test_frequent_modifier_name_shrinks_encoding() {
    let frequent = Modifier {
        name: Value::new("third-party"),
        value: None,
        exception: false,
        start: None,
        end: None,
    };
    let rare = Modifier {
        name: Value::new("not-a-known-modifier"),
        ..frequent.clone()
    };

    let mut buf_frequent = OutputByteBuffer::new();
    serialize_modifier(&frequent, &mut buf_frequent);
    let mut buf_rare = OutputByteBuffer::new();
    serialize_modifier(&rare, &mut buf_rare);

    // Dictionary hit: type + prop + (value type + frequent tag + index +
    // NULL) + NULL = 7 bytes regardless of the name length.
    assert_eq!(buf_frequent.len(), 7);
    assert!(buf_rare.len() > buf_frequent.len());

    let mut input = InputByteBuffer::new(buf_frequent.as_slice());
    assert_eq!(deserialize_modifier(&mut input).unwrap(), frequent);
}

#[test]
fn test_unknown_frequency_index_degrades_to_empty_name() {
    // Hand-assembled Modifier whose name uses a frequency index far past
    // the current dictionary. Readers keep the node, with an empty name.
    let mut buf = OutputByteBuffer::new();
    buf.write_u8(BinaryTypeTag::Modifier.as_u8());
    buf.write_u8(1); // name property
    buf.write_u8(BinaryTypeTag::Value.as_u8());
    buf.write_u8(2); // frequent form
    buf.write_u8(0xFF);
    buf.write_u8(NULL);
    buf.write_u8(NULL);

    let mut input = InputByteBuffer::new(buf.as_slice());
    let modifier = deserialize_modifier(&mut input).unwrap();
    assert_eq!(modifier.name.value, "");
}

#[test]
fn test_empty_children_and_absent_children_decode_alike() {
    // Empty children are simply not written; decoding yields the same
    // node as one that never had a Children tag.
    let empty = ModifierList::default();
    let mut buf = OutputByteBuffer::new();
    serialize_modifier_list(&empty, &mut buf).unwrap();
    assert_eq!(buf.as_slice(), &[BinaryTypeTag::ModifierList.as_u8(), NULL]);

    let mut input = InputByteBuffer::new(buf.as_slice());
    let decoded = deserialize_modifier_list(&mut input).unwrap();
    assert!(decoded.children.is_empty());
    assert_eq!(decoded, empty);
}

#[test]
fn test_offset_presence_roundtrips_exactly() {
    let with_span = Value::with_span("example.org", 5, 16);
    let without = Value::new("example.org");

    for value in [with_span, without] {
        let mut buf = OutputByteBuffer::new();
        serialize_value(&value, &mut buf, None);
        let mut input = InputByteBuffer::new(buf.as_slice());
        assert_eq!(deserialize_value(&mut input, None).unwrap(), value);
    }
}

#[test]
fn test_jump_to_children_skips_offsets() {
    let list = FilterListParser::parse("||example.org^\n! note\nexample.org##.ad");
    let mut buf = OutputByteBuffer::new();
    serialize_filter_list(&list, &mut buf).unwrap();

    let mut input = InputByteBuffer::new(buf.as_slice());
    let count = jump_to_children(&mut input).unwrap();
    assert_eq!(count, 3);

    // The cursor now sits on the first child; rules stream out in order.
    let first = deserialize_rule(&mut input).unwrap();
    assert_eq!(first, list.children[0]);
    let second = deserialize_rule(&mut input).unwrap();
    assert_eq!(second, list.children[1]);
}

#[test]
fn test_jump_to_children_on_empty_list() {
    let list = FilterList {
        children: Vec::new(),
        start: Some(0),
        end: Some(0),
    };
    let mut buf = OutputByteBuffer::new();
    serialize_filter_list(&list, &mut buf).unwrap();

    let mut input = InputByteBuffer::new(buf.as_slice());
    assert_eq!(jump_to_children(&mut input).unwrap(), 0);
}

#[test]
fn test_multiple_scriptlet_calls_rejected_before_writing() {
    use crate::ast::{
        CosmeticBody, CosmeticRule, CosmeticSeparator, ParameterList, ScriptletBody, Syntax,
    };

    let two_calls = |syntax| CosmeticRule {
        syntax,
        exception: false,
        separator: CosmeticSeparator::ElementHiding,
        modifiers: None,
        domains: Default::default(),
        body: CosmeticBody::Scriptlet(ScriptletBody {
            children: vec![
                ParameterList {
                    children: vec![Value::new("set-constant"), Value::new("ads")],
                    start: None,
                    end: None,
                },
                ParameterList {
                    children: vec![Value::new("abort-on-property-read")],
                    start: None,
                    end: None,
                },
            ],
            start: None,
            end: None,
        }),
        start: None,
        end: None,
    };

    for (syntax, expected_name) in [
        (Syntax::AdGuard, "AdGuard"),
        (Syntax::UblockOrigin, "uBlock Origin"),
    ] {
        let mut buf = OutputByteBuffer::new();
        let err = serialize_cosmetic_rule(&two_calls(syntax), &mut buf).unwrap_err();
        match err {
            crate::Error::MultipleScriptletCalls { syntax } => {
                assert_eq!(syntax, expected_name);
            }
            other => panic!("expected MultipleScriptletCalls, got {other:?}"),
        }
        // Rejection happens before any bytes for the rule are written.
        assert!(buf.is_empty());
    }

    // Adblock Plus snippets allow several calls.
    let mut buf = OutputByteBuffer::new();
    serialize_cosmetic_rule(&two_calls(crate::ast::Syntax::AdblockPlus), &mut buf).unwrap();
    assert!(!buf.is_empty());
}

#[test]
fn test_common_syntax_scriptlet_normalizes_to_adguard() {
    use crate::ast::{
        CosmeticBody, CosmeticRule, CosmeticSeparator, ParameterList, ScriptletBody, Syntax,
    };

    // A hand-built Common-syntax scriptlet serializes under the AdGuard
    // tag, so it decodes with the syntax normalized to AdGuard. Every
    // other field round-trips unchanged.
    let rule = CosmeticRule {
        syntax: Syntax::Common,
        exception: false,
        separator: CosmeticSeparator::JsInjection,
        modifiers: None,
        domains: Default::default(),
        body: CosmeticBody::Scriptlet(ScriptletBody {
            children: vec![ParameterList {
                children: vec![Value::new("set-constant"), Value::new("ads")],
                start: None,
                end: None,
            }],
            start: None,
            end: None,
        }),
        start: None,
        end: None,
    };

    let mut buf = OutputByteBuffer::new();
    serialize_cosmetic_rule(&rule, &mut buf).unwrap();
    let mut input = InputByteBuffer::new(buf.as_slice());
    let decoded = deserialize_rule(&mut input).unwrap();

    let RuleNode::Cosmetic(decoded) = decoded else {
        panic!("expected cosmetic rule");
    };
    assert_eq!(decoded.syntax, Syntax::AdGuard);
    assert_eq!(
        CosmeticRule {
            syntax: Syntax::AdGuard,
            ..rule
        },
        decoded
    );
}

#[test]
fn test_scriptlet_syntax_survives_common_tag_folding() {
    // The scriptlet dialect lives in the type tag, so a decoded rule
    // always reports a concrete syntax.
    let adg = roundtrip_rule("example.org#%#//scriptlet('prevent-setTimeout')");
    let ubo = roundtrip_rule("example.org##+js(no-setTimeout-if.js)");
    let abp = roundtrip_rule("example.org#$#abort-on-property-read adblock");

    for (rule, expected) in [
        (adg, crate::ast::Syntax::AdGuard),
        (ubo, crate::ast::Syntax::UblockOrigin),
        (abp, crate::ast::Syntax::AdblockPlus),
    ] {
        let RuleNode::Cosmetic(cosmetic) = rule else {
            panic!("expected cosmetic rule");
        };
        assert_eq!(cosmetic.syntax, expected);
    }
}
