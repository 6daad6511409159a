//! Property tests for the escape tables, cursor nesting and the JSON copy
//! path, plus searches and limits of the stream window.

use proptest::prelude::*;
use serde_json::{Map, Value as JsonValue};
use streamtok::{
    copy_json, json, xml, Error, JsonBuffer, JsonDeserializer, JsonReader, JsonTokenizer,
    ReaderOptions, Scope, StreamTokenizer, XmlDeserializer, XmlReader,
};

fn json_document() -> impl Strategy<Value = JsonValue> {
    let leaf = prop_oneof![
        Just(JsonValue::Null),
        any::<bool>().prop_map(JsonValue::Bool),
        any::<i64>().prop_map(JsonValue::from),
        "[a-zA-Z0-9 \"\\\\\t\r\n/é€]{0,12}".prop_map(JsonValue::String),
    ];
    let tree = leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(JsonValue::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..6)
                .prop_map(|m| JsonValue::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
    .boxed();
    // copying starts at a scope, so the root is always a container
    prop_oneof![
        prop::collection::vec(tree.clone(), 0..4).prop_map(JsonValue::Array),
        prop::collection::btree_map("[a-z]{1,6}", tree, 0..4)
            .prop_map(|m| JsonValue::Object(m.into_iter().collect::<Map<_, _>>())),
    ]
}

/// Objects with short names and values that can be far longer than a small
/// stream window.
fn wide_object() -> impl Strategy<Value = Map<String, JsonValue>> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(JsonValue::from),
        any::<bool>().prop_map(JsonValue::Bool),
        "[a-z ]{0,300}".prop_map(JsonValue::String),
    ];
    let value = leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(JsonValue::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| JsonValue::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    });
    prop::collection::btree_map("[a-z]{1,6}", value, 1..6)
        .prop_map(|m| m.into_iter().collect::<Map<_, _>>())
}

fn nested_document(kinds: &[Scope]) -> String {
    let mut text = String::new();
    for kind in kinds {
        text.push_str(match kind {
            Scope::Object => "{\"k\":",
            Scope::Array => "[",
        });
    }
    text.push('1');
    for kind in kinds.iter().rev() {
        text.push(kind.close_char());
    }
    text
}

fn scope_kind() -> impl Strategy<Value = Scope> {
    prop_oneof![Just(Scope::Object), Just(Scope::Array)]
}

proptest! {
    #[test]
    fn prop_json_escape_idempotent(s in any::<String>()) {
        let encoded = json::encode_value(&s);
        prop_assert_eq!(json::decode_value(&encoded), s.as_str());
    }

    #[test]
    fn prop_json_escape_idempotent_with_slash(s in "[ -~\t\r\n\u{08}\u{0c}]{0,40}") {
        let encoded = json::encode_value_and_slash(&s, true);
        prop_assert!(!encoded.contains(|c: char| c == '\n' || c == '\t'));
        prop_assert_eq!(json::decode_value(&encoded), s.as_str());
    }

    #[test]
    fn prop_xml_escape_idempotent(s in any::<String>()) {
        let encoded = xml::encode_value(&s);
        prop_assert!(!encoded.contains('<'));
        prop_assert_eq!(xml::decode_value(&encoded), s.as_str());
    }

    #[test]
    fn prop_nesting_balance(kinds in prop::collection::vec(scope_kind(), 1..12)) {
        let text = nested_document(&kinds);
        let mut json = JsonTokenizer::new(&text);
        for kind in &kinds {
            if json.nest_scope() == Some(Scope::Object) {
                prop_assert!(json.find_item("k").unwrap());
            }
            let entered = match kind {
                Scope::Object => json.enter_object().unwrap(),
                Scope::Array => json.enter_array().unwrap(),
            };
            prop_assert!(entered);
        }
        prop_assert_eq!(json.nest_level(), kinds.len());

        let wrong = match json.nest_scope() {
            Some(Scope::Object) => json.leave_array().unwrap(),
            _ => json.leave_object().unwrap(),
        };
        prop_assert!(!wrong);
        prop_assert_eq!(json.nest_level(), kinds.len());

        for kind in kinds.iter().rev() {
            let left = match kind {
                Scope::Object => json.leave_object().unwrap(),
                Scope::Array => json.leave_array().unwrap(),
            };
            prop_assert!(left);
        }
        prop_assert_eq!(json.nest_level(), 0);
        prop_assert_eq!(json.leave_either().unwrap(), None);
        prop_assert_eq!(json.nest_level(), 0);
    }

    #[test]
    fn prop_copy_json_matches_serde_json(doc in json_document()) {
        let text = serde_json::to_string(&doc).unwrap();

        let mut reader = JsonTokenizer::new(&text);
        let mut out = JsonBuffer::default();
        copy_json(&mut reader, &mut out).unwrap();
        prop_assert_eq!(&out.to_json(), &text);

        let mut stream = JsonReader::with_options(text.as_bytes(), ReaderOptions::new().with_buffer_size(16));
        let mut out = JsonBuffer::default();
        copy_json(&mut stream, &mut out).unwrap();
        prop_assert_eq!(&out.to_json(), &text);
    }

    #[test]
    fn prop_find_last_item_through_small_window(fields in wide_object()) {
        let last = fields.keys().max().cloned().unwrap();
        let text = serde_json::to_string(&JsonValue::Object(fields)).unwrap();

        let mut tokenizer = JsonTokenizer::new(&text);
        tokenizer.enter_object().unwrap();
        prop_assert!(tokenizer.find_item(&last).unwrap());
        let expected = tokenizer.value().unwrap();

        let mut reader = JsonReader::with_options(text.as_bytes(), ReaderOptions::new().with_buffer_size(16));
        reader.enter_object().unwrap();
        prop_assert!(reader.find_item(&last).unwrap());
        prop_assert_eq!(reader.value().unwrap(), expected);
    }

    #[test]
    fn prop_json_names_beyond_window_fail(len in 1usize..120, window in 16usize..64) {
        let name = "n".repeat(len);
        let text = format!(r#"{{"{name}":1}}"#);
        let mut json = JsonReader::with_options(text.as_bytes(), ReaderOptions::new().with_buffer_size(window));
        json.enter_object().unwrap();
        let found = json.find_item(&name);
        if len + 4 <= window {
            prop_assert!(found.unwrap());
            prop_assert_eq!(json.value_i32().unwrap(), Some(1));
        } else if len >= window {
            let capacity_error = matches!(found, Err(Error::CapacityExceeded { capacity, .. }) if capacity == window);
            prop_assert!(capacity_error);
        }
    }

    #[test]
    fn prop_xml_tag_names_beyond_window_fail(len in 1usize..120, window in 16usize..64) {
        let name = "t".repeat(len);
        let text = format!("<{name}>{}</{name}>", "v".repeat(200));
        let mut xml = XmlReader::with_options(text.as_bytes(), ReaderOptions::new().with_buffer_size(window));
        let found = xml.find_tag(&name);
        if len + 4 <= window {
            prop_assert!(found.unwrap());
            prop_assert_eq!(xml.element_value().unwrap().map(|v| v.len()), Some(200));
        } else if len >= window {
            let capacity_error = matches!(found, Err(Error::CapacityExceeded { capacity, .. }) if capacity == window);
            prop_assert!(capacity_error);
        }
    }
}
