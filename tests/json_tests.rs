use std::io::Read;

use streamtok::{
    Error, JsonBuffer, JsonDeserializer, JsonReader, JsonSerializer, JsonTokenizer, JsonWriter,
    ReaderOptions, Scope, StreamTokenizer, Value, WriterOptions,
};

/// Hands out a few bytes per read call.
struct Trickle<'a> {
    data: &'a [u8],
    chunk: usize,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.chunk.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

fn small_stream(text: &str) -> JsonReader<Trickle<'_>> {
    JsonReader::with_options(
        Trickle {
            data: text.as_bytes(),
            chunk: 3,
        },
        ReaderOptions::new().with_buffer_size(16),
    )
}

fn walk_bare_document(json: &mut dyn JsonDeserializer) {
    assert!(json.enter_object().unwrap());
    assert!(json.find_item_next().unwrap());
    assert_eq!(json.name(), Some("x"));
    assert!(json.enter_array().unwrap());
    assert_eq!(json.value_i32().unwrap(), Some(1));
    assert_eq!(json.value_i32().unwrap(), Some(2));
    assert!(json.leave_array().unwrap());
    assert!(json.find_item("y").unwrap());
    assert_eq!(json.value_i32().unwrap(), Some(3));
    assert!(!json.find_item_next().unwrap());
    assert!(json.leave_object().unwrap());
    assert_eq!(json.nest_level(), 0);
}

#[test]
fn test_bare_names_walk() {
    let text = "{ x : [1,2], y : 3 }";
    walk_bare_document(&mut JsonTokenizer::new(text));
    walk_bare_document(&mut small_stream(text));
}

const ORDER: &str = r#"{
    "id": "A-17",
    "customer": {"name": "Joe \"JJ\" Smith", "vip": true, "notes": null},
    "lines": [
        {"sku": "k1", "qty": 2, "price": 9.5},
        {"sku": "k2", "qty": 1, "price": 120.25}
    ],
    "placed": "2011-07-18T01:09:18Z",
    "total": 139.25
}"#;

fn read_order(json: &mut dyn JsonDeserializer) -> (String, Vec<(String, i64)>, f64) {
    json.enter_object().unwrap();
    assert!(json.find_item("id").unwrap());
    let id = json.value_string().unwrap().unwrap();

    assert!(json.find_item("customer").unwrap());
    assert!(json.enter_object().unwrap());
    assert!(json.find_item("notes").unwrap());
    assert_eq!(json.value_scalar().unwrap(), Some(Value::Null));
    assert!(json.leave_object().unwrap());

    assert!(json.find_item("lines").unwrap());
    assert!(json.enter_array().unwrap());
    let mut lines = Vec::new();
    while json.enter_object().unwrap() {
        let idx = json.find_item_in(&["sku", "qty"]).unwrap();
        assert_eq!(idx, Some(0));
        let sku = json.value().unwrap().unwrap();
        assert!(json.find_item("qty").unwrap());
        let qty = json.value_i64().unwrap().unwrap();
        lines.push((sku, qty));
        assert!(json.leave_object().unwrap());
    }
    assert!(json.leave_array().unwrap());

    assert!(json.find_item("placed").unwrap());
    let placed = json.value_date().unwrap().unwrap();
    assert_eq!(placed.timestamp(), 1_310_951_358);
    assert!(json.find_item("total").unwrap());
    let total = json.value_f64().unwrap().unwrap();
    (id, lines, total)
}

#[test]
fn test_string_and_stream_readers_agree() {
    let expected = (
        "A-17".to_string(),
        vec![("k1".to_string(), 2), ("k2".to_string(), 1)],
        139.25,
    );
    assert_eq!(read_order(&mut JsonTokenizer::new(ORDER)), expected);
    assert_eq!(read_order(&mut small_stream(ORDER)), expected);
    assert_eq!(read_order(&mut JsonReader::new(ORDER.as_bytes())), expected);
}

#[test]
fn test_find_item_skips_nested_names() {
    let mut json = JsonTokenizer::new(r#"{"a":{"target":1},"b":[{"target":2}],"target":3}"#);
    json.enter_object().unwrap();
    assert!(json.find_item("target").unwrap());
    assert_eq!(json.value_i32().unwrap(), Some(3));
}

#[test]
fn test_tokenizer_reset_rereads() {
    let mut json = JsonTokenizer::new(r#"{"k":"v"}"#);
    json.enter_object().unwrap();
    assert!(json.find_item("k").unwrap());
    assert_eq!(json.value().unwrap().as_deref(), Some("v"));
    assert!(!json.find_item("k").unwrap());
    json.reset();
    assert_eq!(json.nest_level(), 0);
    json.enter_object().unwrap();
    assert!(json.find_item("k").unwrap());
}

#[test]
fn test_strict_mode_carries_names() {
    let options = ReaderOptions::new().with_throw_if_not_found(true);
    let mut json = JsonTokenizer::with_options(r#"{"a":1}"#, options);
    json.enter_object().unwrap();
    match json.find_item_in(&["b", "c"]) {
        Err(Error::NotFound { names }) => assert_eq!(names, ["b", "c"]),
        other => panic!("expected a not-found error, got {other:?}"),
    }

    json.set_throw_if_not_found(false);
    assert!(!json.is_throw_if_not_found());
    assert_eq!(json.find_item_in(&["b"]).unwrap(), None);
}

#[test]
fn test_typed_getter_failures() {
    let mut json = JsonTokenizer::new(r#"{"n":"12x","d":"someday","big":123456789012345678901234567890,"nil":null}"#);
    json.enter_object().unwrap();
    json.find_item("n").unwrap();
    assert!(matches!(json.value_i32(), Err(Error::InvalidNumber { .. })));
    json.find_item("d").unwrap();
    assert!(matches!(json.value_date(), Err(Error::InvalidDate { .. })));
    json.find_item("big").unwrap();
    assert_eq!(
        json.value_big_int().unwrap().map(|b| b.to_string()).as_deref(),
        Some("123456789012345678901234567890")
    );
    json.find_item("nil").unwrap();
    assert_eq!(json.value_f64().unwrap(), None);
}

#[test]
fn test_unmatched_leave_keeps_depth() {
    let mut json = JsonTokenizer::new(r#"{"a":[1,2]}"#);
    assert!(json.enter_object().unwrap());
    assert!(!json.leave_array().unwrap());
    assert_eq!(json.nest_scope(), Some(Scope::Object));
    assert_eq!(json.leave_either().unwrap(), Some(Scope::Object));
    assert_eq!(json.leave_either().unwrap(), None);
    assert_eq!(json.nest_level(), 0);
}

#[test]
fn test_long_names_exceed_small_window() {
    let name = "n".repeat(40);
    let text = format!(r#"{{"{name}":1}}"#);
    let mut json = small_stream(&text);
    json.enter_object().unwrap();
    assert!(matches!(
        json.find_item(&name),
        Err(Error::CapacityExceeded { capacity: 16, .. })
    ));

    let mut roomy = JsonReader::with_options(text.as_bytes(), ReaderOptions::new().with_buffer_size(64));
    roomy.enter_object().unwrap();
    assert!(roomy.find_item(&name).unwrap());
}

#[test]
fn test_long_values_stream_through_small_window() {
    let long = "v".repeat(1000);
    let text = format!(r#"{{"k":"{long}","after":true}}"#);
    let mut json = small_stream(&text);
    json.enter_object().unwrap();
    json.find_item("k").unwrap();
    assert_eq!(json.value().unwrap(), Some(long));
    assert!(json.find_item("after").unwrap());
}

fn write_likes(w: &mut impl JsonSerializer) {
    w.open_object(None).unwrap();
    w.add_item("cd", "1234").unwrap();
    w.add_item("name", "Joe Smith").unwrap();
    w.open_object(Some("likes")).unwrap();
    w.add_item("count", 0).unwrap();
    w.open_array(Some("data")).unwrap();
    w.close_level().unwrap();
    w.close_level().unwrap();
    w.close_level().unwrap();
}

#[test]
fn test_writer_separators_across_closes() {
    let expected = r#"[{"cd":"1234","name":"Joe Smith","likes":{"count":0,"data":[]}},{"cd":"1234","name":"Joe Smith","likes":{"count":0,"data":[]}}]"#;

    let mut buffer = JsonBuffer::default();
    buffer.open_array(None).unwrap();
    write_likes(&mut buffer);
    write_likes(&mut buffer);
    buffer.close_all().unwrap();
    assert_eq!(buffer.to_json(), expected);

    let mut out = Vec::new();
    let mut stream = JsonWriter::new(&mut out);
    stream.open_array(None).unwrap();
    write_likes(&mut stream);
    write_likes(&mut stream);
    stream.close_all().unwrap();
    stream.flush().unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn test_writer_options_toggle() {
    let mut w = JsonBuffer::with_options(
        streamtok::ByteBuffer::new(),
        WriterOptions::new().with_escape_slash(true),
    );
    assert!(!w.is_line_wrapping());
    w.open_object(None).unwrap();
    w.add_item("url", "a/b").unwrap();
    w.add_array(Some("n"), [Some(1), None]).unwrap();
    w.close_all().unwrap();
    assert_eq!(w.to_json(), r#"{"url":"a\/b","n":[1,null]}"#);
}

#[test]
fn test_writer_rejects_misplaced_values() {
    let mut w = JsonBuffer::default();
    w.open_object(None).unwrap();
    assert!(matches!(w.add_element(1), Err(Error::InvalidState(_))));
    w.close_level().unwrap();
    assert!(matches!(w.close_level(), Err(Error::InvalidState(_))));
}
