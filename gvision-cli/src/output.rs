use std::io::Write;

use anyhow::Result;
use gvision_client::AnnotateImageResponse;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

const INDENT: &[u8] = b" ";

/// Renders the per-image results as a JSON array indented by one space.
pub fn render_responses(responses: &[AnnotateImageResponse]) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    responses.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

/// Writes the rendered results followed by a newline. Nothing is written if
/// rendering fails.
pub fn write_responses<W: Write>(responses: &[AnnotateImageResponse], out: &mut W) -> Result<()> {
    let body = render_responses(responses)?;
    writeln!(out, "{body}")?;
    out.flush()?;
    Ok(())
}
