//! Streams JSON from stdin to XML on stdout.
//!
//! Run with: echo '{"list":[{"x":1},{"x":2}]}' | cargo run --example transcode -- --attributes

use std::error::Error;
use std::io;

use streamtok::ReaderOptions;

fn main() -> Result<(), Box<dyn Error>> {
    let use_attributes = std::env::args().any(|arg| arg == "--attributes");
    let stdout = io::stdout().lock();
    let mut stdout = streamtok::json_to_xml_stream(
        io::stdin().lock(),
        stdout,
        ReaderOptions::new().with_buffer_size(4096),
        use_attributes,
    )?;
    io::Write::write_all(&mut stdout, b"\n")?;
    Ok(())
}
