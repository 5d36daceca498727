use mettagen_atom::{escape_text, NodeRecord, PropertyMap, PropertyValue};
use mettagen_writer::{EdgeTypeIndex, MettaSerializer};
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Count `(`/`)` occurrences that are not preceded by the escape character.
fn unescaped_specials(s: &str) -> usize {
    let mut count = 0;
    let mut escaped = false;
    for c in s.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '(' | ')' => count += 1,
            _ => {}
        }
    }
    count
}

/// Inverse of the escape step (underscoring is lossy and stays).
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn property_key() -> impl Strategy<Value = String> {
    // Keep keys atom-safe; escaping applies to values, not keys.
    proptest::string::string_regex("[a-z][a-z0-9_]{0,8}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn escaped_text_has_no_spaces(s in ".*") {
        prop_assert!(!escape_text(&s).contains(' '));
    }

    #[test]
    fn escaped_text_has_no_unescaped_structure(s in ".*") {
        prop_assert_eq!(unescaped_specials(&escape_text(&s)), 0);
    }

    #[test]
    fn escaping_roundtrips_modulo_underscoring(s in ".*") {
        prop_assert_eq!(unescape(&escape_text(&s)), s.replace(' ', "_"));
    }

    #[test]
    fn one_line_per_nonempty_scalar_property(
        entries in proptest::collection::btree_map(property_key(), ".{0,12}", 0..6)
    ) {
        let nonempty = entries.values().filter(|v| !v.is_empty()).count();
        let properties: PropertyMap = entries
            .into_iter()
            .map(|(k, v)| (k, PropertyValue::text(&v)))
            .collect();
        let record = NodeRecord {
            id: "X1".to_string(),
            label: "gene".to_string(),
            properties,
        };
        let serializer = MettaSerializer::new(EdgeTypeIndex::default(), BTreeSet::new());
        let lines = serializer.serialize_node(&record);
        prop_assert_eq!(lines.len(), 1 + nonempty);
        prop_assert_eq!(lines[0].as_str(), "(gene X1)");
    }
}
