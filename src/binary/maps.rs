//! Frequency dictionaries for common string values.
//!
//! Filter lists repeat a small vocabulary of strings thousands of times:
//! modifier names, hint names, platform identifiers, metadata headers,
//! scriptlet names. Each vocabulary gets a dictionary mapping those
//! strings to single-byte indices, so a serialized value can collapse to
//! two bytes (tag + index) instead of a length-prefixed literal.
//!
//! Indices are 1-based and append-only: extending a dictionary must only
//! push new entries at the end, never renumber existing ones, or old
//! binary blobs stop decoding correctly.

use ahash::AHashMap;
use once_cell::sync::OnceCell;

/// A string-to-byte dictionary with a lazily built inverse.
///
/// Both directions are built once on first use and cached for the process
/// lifetime; many processes only serialize or only deserialize, so neither
/// map is built eagerly.
pub struct FrequencyDict {
    entries: &'static [&'static str],
    forward: OnceCell<AHashMap<&'static str, u8>>,
    inverse: OnceCell<AHashMap<u8, &'static str>>,
}

impl FrequencyDict {
    /// Create a dictionary over a static entry list.
    ///
    /// Panics later, on first use, if the list holds more than 255 entries.
    pub const fn new(entries: &'static [&'static str]) -> Self {
        Self {
            entries,
            forward: OnceCell::new(),
            inverse: OnceCell::new(),
        }
    }

    /// Look up the 1-based index of a known value.
    pub fn index_of(&self, value: &str) -> Option<u8> {
        let forward = self.forward.get_or_init(|| {
            assert!(self.entries.len() <= u8::MAX as usize);
            self.entries
                .iter()
                .enumerate()
                .map(|(i, v)| (*v, (i + 1) as u8))
                .collect()
        });
        forward.get(value).copied()
    }

    /// Look up the value for a 1-based index.
    pub fn value_of(&self, index: u8) -> Option<&'static str> {
        let inverse = self.inverse.get_or_init(|| {
            self.entries
                .iter()
                .enumerate()
                .map(|(i, v)| ((i + 1) as u8, *v))
                .collect()
        });
        inverse.get(&index).copied()
    }

    /// Number of entries in the dictionary.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// AdGuard hint names (`!+ NAME(...)`).
pub static HINT_NAMES: FrequencyDict = FrequencyDict::new(&[
    "NOT_OPTIMIZED",
    "PLATFORM",
    "NOT_PLATFORM",
    "NOT_VALIDATE",
]);

/// Platform identifiers used as hint parameters.
pub static PLATFORM_NAMES: FrequencyDict = FrequencyDict::new(&[
    "windows",
    "mac",
    "android",
    "ios",
    "ext_chromium",
    "ext_ff",
    "ext_edge",
    "ext_opera",
    "ext_safari",
    "ext_android_cb",
    "ext_ublock",
]);

/// Network rule modifier names.
pub static MODIFIER_NAMES: FrequencyDict = FrequencyDict::new(&[
    "app",
    "badfilter",
    "cname",
    "content",
    "cookie",
    "csp",
    "denyallow",
    "document",
    "domain",
    "elemhide",
    "empty",
    "extension",
    "first-party",
    "font",
    "generichide",
    "genericblock",
    "header",
    "hls",
    "image",
    "important",
    "inline-font",
    "inline-script",
    "jsinject",
    "jsonprune",
    "match-case",
    "media",
    "method",
    "mp4",
    "network",
    "object",
    "other",
    "permissions",
    "ping",
    "popunder",
    "popup",
    "redirect",
    "redirect-rule",
    "referrerpolicy",
    "removeheader",
    "removeparam",
    "script",
    "specifichide",
    "stealth",
    "stylesheet",
    "subdocument",
    "third-party",
    "to",
    "urlblock",
    "websocket",
    "webrtc",
    "xmlhttprequest",
]);

/// Known filter-list metadata headers (`! Header: value`).
pub static METADATA_HEADERS: FrequencyDict = FrequencyDict::new(&[
    "Checksum",
    "Description",
    "Expires",
    "Homepage",
    "Last modified",
    "Last Modified",
    "Licence",
    "License",
    "Title",
    "TimeUpdated",
    "Version",
    "Diff-Path",
]);

/// Pre-processor directive names (`!#name`).
pub static PREPROCESSOR_NAMES: FrequencyDict = FrequencyDict::new(&[
    "if",
    "else",
    "endif",
    "include",
    "safari_cb_affinity",
]);

/// Common AdGuard scriptlet names (`//scriptlet('name', ...)`).
pub static ADG_SCRIPTLET_NAMES: FrequencyDict = FrequencyDict::new(&[
    "abort-current-inline-script",
    "abort-on-property-read",
    "abort-on-property-write",
    "abort-on-stack-trace",
    "adjust-setInterval",
    "adjust-setTimeout",
    "json-prune",
    "log-addEventListener",
    "nowebrtc",
    "prevent-addEventListener",
    "prevent-adfly",
    "prevent-fetch",
    "prevent-setInterval",
    "prevent-setTimeout",
    "prevent-window-open",
    "prevent-xhr",
    "remove-attr",
    "remove-class",
    "set-constant",
    "set-cookie",
    "set-local-storage-item",
    "set-session-storage-item",
]);

/// Common uBlock Origin scriptlet names (`##+js(name, ...)`).
pub static UBO_SCRIPTLET_NAMES: FrequencyDict = FrequencyDict::new(&[
    "abort-current-script.js",
    "abort-on-property-read.js",
    "abort-on-property-write.js",
    "addEventListener-defuser.js",
    "json-prune.js",
    "nano-setInterval-booster.js",
    "nano-setTimeout-booster.js",
    "no-fetch-if.js",
    "no-setInterval-if.js",
    "no-setTimeout-if.js",
    "no-xhr-if.js",
    "remove-attr.js",
    "remove-class.js",
    "set-constant.js",
    "window.open-defuser.js",
]);

/// Common Adblock Plus snippet names (`#$#name ...`).
pub static ABP_SNIPPET_NAMES: FrequencyDict = FrequencyDict::new(&[
    "abort-current-inline-script",
    "abort-on-property-read",
    "abort-on-property-write",
    "hide-if-contains",
    "hide-if-contains-and-matches-style",
    "hide-if-contains-visible-text",
    "hide-if-has-and-matches-style",
    "hide-if-matches-xpath",
    "hide-if-shadow-contains",
    "json-prune",
    "log",
    "prevent-listener",
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_value_inverse() {
        let idx = MODIFIER_NAMES.index_of("third-party").unwrap();
        assert_eq!(MODIFIER_NAMES.value_of(idx), Some("third-party"));
    }

    #[test]
    fn test_indices_are_one_based() {
        // Index 0 would collide with the NULL terminator convention.
        assert_eq!(HINT_NAMES.index_of("NOT_OPTIMIZED"), Some(1));
        assert_eq!(HINT_NAMES.value_of(0), None);
    }

    #[test]
    fn test_unknown_value() {
        assert_eq!(MODIFIER_NAMES.index_of("no-such-modifier"), None);
        assert_eq!(MODIFIER_NAMES.value_of(250), None);
    }

    #[test]
    fn test_all_dicts_fit_a_byte() {
        for dict in [
            &HINT_NAMES,
            &PLATFORM_NAMES,
            &MODIFIER_NAMES,
            &METADATA_HEADERS,
            &PREPROCESSOR_NAMES,
            &ADG_SCRIPTLET_NAMES,
            &UBO_SCRIPTLET_NAMES,
            &ABP_SNIPPET_NAMES,
        ] {
            assert!(dict.len() <= u8::MAX as usize);
        }
    }

    #[test]
    fn test_no_duplicate_entries() {
        for dict in [
            &HINT_NAMES,
            &PLATFORM_NAMES,
            &MODIFIER_NAMES,
            &METADATA_HEADERS,
            &PREPROCESSOR_NAMES,
            &ADG_SCRIPTLET_NAMES,
            &UBO_SCRIPTLET_NAMES,
            &ABP_SNIPPET_NAMES,
        ] {
            let mut seen = std::collections::HashSet::new();
            for entry in dict.entries {
                assert!(seen.insert(*entry), "duplicate dictionary entry: {entry}");
            }
        }
    }
}
