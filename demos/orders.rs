//! Writes a small order document in both formats, then reads fields back
//! from each without building a tree.
//!
//! Run with: cargo run --example orders

use std::error::Error;

use streamtok::{
    JsonBuffer, JsonDeserializer, JsonSerializer, JsonTokenizer, StreamTokenizer, WriterOptions,
    XmlBuffer, XmlDeserializer, XmlSerializer, XmlTokenizer,
};

fn main() -> Result<(), Box<dyn Error>> {
    let mut json = JsonBuffer::default();
    json.set_line_wrapping(true);
    json.open_object(None)?;
    json.add_item("id", "A-17")?;
    json.open_array(Some("lines"))?;
    for (sku, qty) in [("k1", 2), ("k2", 1)] {
        json.open_object(None)?;
        json.add_item("sku", sku)?;
        json.add_item("qty", qty)?;
        json.close_level()?;
    }
    json.close_all()?;
    let json_text = json.to_json();
    println!("JSON:\n{}\n", json_text);

    let mut reader = JsonTokenizer::new(&json_text);
    reader.enter_object()?;
    reader.find_item("lines")?;
    reader.enter_array()?;
    let mut total = 0;
    while reader.enter_object()? {
        if reader.find_item("qty")? {
            total += reader.value_i32()?.unwrap_or_default();
        }
        reader.leave_object()?;
    }
    println!("total quantity: {}\n", total);

    let mut xml = XmlBuffer::with_options(streamtok::ByteBuffer::new(), WriterOptions::pretty());
    xml.add_xml_declaration(None, Some("UTF-8"))?;
    xml.open_tag_with("order", &[("id", "A-17")])?;
    xml.add_tag_with("line", Some("bolts & nuts"), &[("qty", "2")])?;
    xml.add_tag_cdata("note", Some("<handle with care>"))?;
    xml.close_tag("order")?;
    let xml_text = xml.to_xml();
    println!("XML:\n{}", xml_text);

    let mut reader = XmlTokenizer::new(&xml_text);
    reader.find_tag("line")?;
    let qty = reader.attribute_value("qty")?;
    let line = reader.element_value()?;
    let note = reader.find_element_value("note")?;
    println!("line {:?} x{:?}, note {:?}", line, qty, note);
    Ok(())
}
