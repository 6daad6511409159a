use streamtok::{
    copy_json, json_to_xml, json_to_xml_stream, reformat_json, Error, JsonBuffer, JsonReader,
    JsonTokenizer, JsonXmlTransformer, ReaderOptions, WriterOptions, XmlBuffer, XmlDeserializer,
    XmlTokenizer,
};

const LIST: &str = r#"{"list":[{"x":1,"y":2},{"x":3,"y":4}]}"#;

#[test]
fn test_list_in_both_modes() {
    assert_eq!(
        json_to_xml(LIST, true).unwrap(),
        r#"<list><array x="1" y="2"/><array x="3" y="4"/></list>"#
    );
    assert_eq!(
        json_to_xml(LIST, false).unwrap(),
        "<list><array><x>1</x><y>2</y></array><array><x>3</x><y>4</y></array></list>"
    );
}

#[test]
fn test_stream_transform_matches_string_transform() {
    let json = r#"{"catalog":{"name":"Tools & more","items":[{"id":1,"tags":["a","b"]},{"id":2,"tags":[]}],"open":true,"owner":null}}"#;
    for use_attributes in [false, true] {
        let expected = json_to_xml(json, use_attributes).unwrap();
        let out = json_to_xml_stream(
            json.as_bytes(),
            Vec::new(),
            ReaderOptions::new().with_buffer_size(16),
            use_attributes,
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }
}

#[test]
fn test_catalog_with_tags() {
    let json = r#"{"catalog":{"name":"Tools & more","items":[{"id":1,"tags":["a","b"]},{"id":2,"tags":[]}],"open":true,"owner":null}}"#;
    assert_eq!(
        json_to_xml(json, false).unwrap(),
        "<catalog><name>Tools &amp; more</name><items><array><id>1</id><tags><array>a</array><array>b</array></tags></array><array><id>2</id><tags/></array></items><open>true</open><owner/></catalog>"
    );
    assert_eq!(
        json_to_xml(json, true).unwrap(),
        r#"<catalog name="Tools &amp; more"><items><array id="1"><tags><array>a</array><array>b</array></tags></array><array id="2"><tags/></array></items><open>true</open><owner/></catalog>"#
    );
}

#[test]
fn test_transform_output_is_searchable() {
    let json = r#"{"people":[{"name":"Ann","age":31},{"name":"Bo","age":4}]}"#;
    let xml = json_to_xml(json, true).unwrap();
    let mut reader = XmlTokenizer::new(&xml);
    let mut ages = Vec::new();
    while reader.find_tag("array").unwrap() {
        let name = reader.attribute_value("name").unwrap().unwrap_or_default();
        let age = reader.attribute_value("age").unwrap().unwrap_or_default();
        ages.push(format!("{name}={age}"));
    }
    assert_eq!(ages, ["Ann=31", "Bo=4"]);
}

#[test]
fn test_transformer_from_config() {
    let transformer: JsonXmlTransformer =
        serde_json::from_str(r#"{"use_attributes":true,"array_tag":"row"}"#).unwrap();
    assert_eq!(
        transformer,
        JsonXmlTransformer::new().with_attributes(true).with_array_tag("row")
    );
    let defaults: JsonXmlTransformer = serde_json::from_str("{}").unwrap();
    assert_eq!(defaults, JsonXmlTransformer::default());

    let mut json = JsonTokenizer::new(r#"[{"a":1},{"a":2}]"#);
    let mut xml = XmlBuffer::default();
    transformer.transform(&mut json, &mut xml).unwrap();
    assert_eq!(xml.to_xml(), r#"<row a="1"/><row a="2"/>"#);
}

#[test]
fn test_stream_transform_reports_long_names() {
    let json = format!(r#"{{"{}":1}}"#, "k".repeat(64));
    let err = json_to_xml_stream(
        json.as_bytes(),
        Vec::new(),
        ReaderOptions::new().with_buffer_size(16),
        false,
    )
    .unwrap_err();
    assert!(matches!(err, Error::CapacityExceeded { capacity: 16, .. }));
}

#[test]
fn test_reformat_matches_serde_json() {
    let json = r#"{ "id" : 12, "tags" : [ "x" , "yé" ], "nested" : { "ok" : false, "none" : null },
        "ratio" : 0.5, "empty" : { } }"#;
    let canonical = serde_json::to_string(&serde_json::from_str::<serde_json::Value>(json).unwrap()).unwrap();
    let compact = reformat_json(json, WriterOptions::default()).unwrap();
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&compact).unwrap(),
        serde_json::from_str::<serde_json::Value>(&canonical).unwrap()
    );
    assert_eq!(
        compact,
        "{\"id\":12,\"tags\":[\"x\",\"y\u{e9}\"],\"nested\":{\"ok\":false,\"none\":null},\"ratio\":0.5,\"empty\":{}}"
    );
}

#[test]
fn test_pretty_output_reads_back() {
    let pretty = reformat_json(LIST, WriterOptions::pretty()).unwrap();
    assert!(pretty.contains('\n'));
    assert_eq!(reformat_json(&pretty, WriterOptions::default()).unwrap(), LIST);
}

#[test]
fn test_copy_between_streams() {
    let input = r#"[{"a":"line\nbreak"},[1,[2,[3]]],"tail"]"#;
    let mut json = JsonReader::with_options(input.as_bytes(), ReaderOptions::new().with_buffer_size(16));
    let mut out = JsonBuffer::default();
    copy_json(&mut json, &mut out).unwrap();
    assert_eq!(out.to_json(), input);
}
