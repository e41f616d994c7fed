//! End-to-end tests: text -> tree -> binary file -> tree -> text.

use std::io::Write;

use fltree::ast::{RuleNode, Value};
use fltree::binary::{
    read_filter_list_file, read_header, write_filter_list_file, FormatFlags, FORMAT_VERSION,
    HEADER_SIZE,
};
use fltree::parser::FilterListParser;
use fltree::{generate_filter_list, open_filter_list, Error};

const SAMPLE_LIST: &str = "\
! Title: Integration Sample
! Version: 1.0.4
[Adblock Plus 2.0; AdGuard]
!+ NOT_OPTIMIZED PLATFORM(windows, mac)
||example.org^$important
@@||cdn.example.org^$domain=example.org,~third-party
127.0.0.1 tracker.example.net
example.org##.ad-banner
example.org,~shop.example.org#@#.sponsored
example.org#$#body { padding-top: 0; }
example.org#%#//scriptlet('set-constant', 'adBlock', 'false')
example.org##+js(set-constant.js, adBlock, false)
example.org$$script[data-ad]
!#if (adguard)
||ads.example.org^
!#endif";

#[test]
fn test_full_pipeline_roundtrip() {
    let list = FilterListParser::parse(SAMPLE_LIST);
    assert!(
        !list
            .children
            .iter()
            .any(|r| matches!(r, RuleNode::Invalid(_))),
        "sample list should parse cleanly"
    );

    let data = write_filter_list_file(&list).unwrap();
    let decoded = read_filter_list_file(&data).unwrap();

    assert_eq!(decoded, list);
    assert_eq!(generate_filter_list(&decoded), SAMPLE_LIST);
}

#[test]
fn test_header_describes_payload() {
    let list = FilterListParser::parse(SAMPLE_LIST);
    let data = write_filter_list_file(&list).unwrap();

    let header = read_header(&data).unwrap();
    assert_eq!(header.version, FORMAT_VERSION);
    assert!(header.format_flags().contains(FormatFlags::HAS_CHECKSUM));
    assert_eq!(header.rule_count as usize, list.children.len());
    assert!(data.len() > HEADER_SIZE);
}

#[test]
fn test_open_from_mmap() {
    let list = FilterListParser::parse(SAMPLE_LIST);
    let data = write_filter_list_file(&list).unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&data).unwrap();
    file.flush().unwrap();

    let decoded = open_filter_list(file.path()).unwrap();
    assert_eq!(decoded, list);
}

#[test]
fn test_corrupted_payload_is_rejected() {
    let list = FilterListParser::parse("||example.org^");
    let mut data = write_filter_list_file(&list).unwrap();
    let last = data.len() - 1;
    data[last] ^= 0xFF;

    assert!(matches!(
        read_filter_list_file(&data),
        Err(Error::ChecksumMismatch)
    ));
}

#[test]
fn test_byte_exact_network_rule_roundtrip() {
    let text = "||example.org^$important";
    let list = FilterListParser::parse(text);
    let data = write_filter_list_file(&list).unwrap();
    let decoded = read_filter_list_file(&data).unwrap();
    assert_eq!(generate_filter_list(&decoded), text);

    let RuleNode::Network(ref rule) = decoded.children[0] else {
        panic!("expected network rule");
    };
    assert_eq!(rule.pattern.value, "||example.org^");
    assert_eq!(rule.pattern.start, Some(0));
    assert_eq!(rule.pattern.end, Some(14));
}

#[test]
fn test_spans_survive_binary_form() {
    // "abc  ||example.org^" style offsets: the value keeps the exact span
    // it was parsed with, including across serialization.
    let text = "! x\n||example.org^";
    let list = FilterListParser::parse(text);
    let data = write_filter_list_file(&list).unwrap();
    let decoded = read_filter_list_file(&data).unwrap();

    let RuleNode::Network(ref rule) = decoded.children[1] else {
        panic!("expected network rule");
    };
    assert_eq!(
        rule.pattern,
        Value::with_span("||example.org^", 4, 18)
    );
}

#[test]
fn test_invalid_lines_survive_the_pipeline() {
    let text = "||example.org^\n[;]\nexample.org##.ad";
    let list = FilterListParser::parse(text);

    let data = write_filter_list_file(&list).unwrap();
    let decoded = read_filter_list_file(&data).unwrap();

    let RuleNode::Invalid(ref invalid) = decoded.children[1] else {
        panic!("expected invalid rule to survive");
    };
    assert_eq!(invalid.raw, "[;]");

    // Generation restores the exact original line.
    assert_eq!(generate_filter_list(&decoded), text);
}

#[test]
fn test_large_list_roundtrip() {
    let mut text = String::from("! Title: Big\n");
    for i in 0..5_000 {
        text.push_str(&format!("||example{i}.org^$script\n"));
        text.push_str(&format!("example{i}.org##.ad-{i}\n"));
    }
    let list = FilterListParser::parse(&text);
    assert_eq!(list.children.len(), 10_001);

    let data = write_filter_list_file(&list).unwrap();
    let decoded = read_filter_list_file(&data).unwrap();
    assert_eq!(decoded.children.len(), list.children.len());
    assert_eq!(decoded, list);
}
