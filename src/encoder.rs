// In: src/encoder.rs

//! Renders row records as JSON text.

use std::io::Write;

use crate::config::OutputEncoding;
use crate::error::RowsError;
use crate::types::RowRecord;

/// Encodes `rows` into a `String` with the chosen encoding.
pub fn encode_rows(rows: &[RowRecord], encoding: OutputEncoding) -> Result<String, RowsError> {
    let text = match encoding {
        OutputEncoding::PrettyJson => serde_json::to_string_pretty(rows)?,
        OutputEncoding::CompactJson => serde_json::to_string(rows)?,
        OutputEncoding::JsonLines => {
            let mut text = String::new();
            for row in rows {
                text.push_str(&serde_json::to_string(row)?);
                text.push('\n');
            }
            text
        }
    };
    Ok(text)
}

/// Streams `rows` into `writer` with the chosen encoding.
pub fn write_rows<W: Write>(
    mut writer: W,
    rows: &[RowRecord],
    encoding: OutputEncoding,
) -> Result<(), RowsError> {
    match encoding {
        OutputEncoding::PrettyJson => serde_json::to_writer_pretty(&mut writer, rows)?,
        OutputEncoding::CompactJson => serde_json::to_writer(&mut writer, rows)?,
        OutputEncoding::JsonLines => {
            for row in rows {
                serde_json::to_writer(&mut writer, row)?;
                writer.write_all(b"\n")?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}
