//! FLTree - adblock filter-list parsing and compact binary storage.
//!
//! This crate parses adblock filter lists (AdGuard, uBlock Origin, and
//! Adblock Plus flavors) into a typed rule tree and serializes that tree
//! to a compact, versioned binary format suitable for shipping to
//! resource-constrained runtimes.
//!
//! # Features
//!
//! - **Full rule taxonomy**: network rules, hosts-file rules, cosmetic
//!   rules (element hiding, CSS injection, scriptlets, HTML filtering,
//!   JS injection), and the whole comment family (metadata, agents,
//!   hints, pre-processor directives)
//! - **Tag-based binary encoding**: one type-tag byte per node, NULL
//!   terminated property lists, forward-compatible frequency dictionaries
//! - **Exact source spans**: rule text offsets round-trip through the
//!   binary form byte for byte
//! - **Checksummed file envelope**: magic, version, flags, and SHA-256
//!   payload checksum ahead of the rule tree
//! - **Memory-mapped loading**: large compiled lists open without reading
//!   the whole file up front
//!
//! # Quick Start
//!
//! ```
//! use fltree::parser::FilterListParser;
//! use fltree::{binary, generator};
//!
//! let text = "||example.org^$important\nexample.org##.ad";
//! let list = FilterListParser::parse(text);
//!
//! // Compile to the binary file format and back.
//! let bytes = binary::write_filter_list_file(&list)?;
//! let decoded = binary::read_filter_list_file(&bytes)?;
//!
//! assert_eq!(generator::generate_filter_list(&decoded), text);
//! # Ok::<(), fltree::Error>(())
//! ```
//!
//! # Error Handling
//!
//! The whole-list parser never fails: lines it cannot understand become
//! `InvalidRule` nodes that keep the raw text. Deserialization is strict
//! about structure (unknown type or property tags are fatal) but lenient
//! about dictionary growth: a frequency index from a newer writer decodes
//! as an empty string instead of an error.

mod error;

pub mod ast;
pub mod binary;
pub mod generator;
pub mod parser;

// Re-export core types
pub use error::{Error, Result};

// Re-export the rule tree root types
pub use ast::{FilterList, RuleNode, Syntax};

// Re-export the high-level text and binary entry points
pub use binary::{open_filter_list, read_filter_list_file, write_filter_list_file};
pub use generator::{generate_filter_list, generate_rule};
pub use parser::{parse_rule, parse_rule_tolerant, FilterListParser};
