//! I/O utilities for reading the client mapping CSV.
//!
//! Input files are always comma-delimited with double-quote quoting. Rows are
//! read flexibly so that short rows reach the mapping loader, which decides
//! how to report them. Fields are read as raw bytes and decoded with the
//! requested encoding, defaulting to UTF-8. Each field is decoded on its own,
//! so byte-order-mark sniffing is disabled.

use std::{fs, io::Read, path::Path};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

pub const CSV_DELIMITER: u8 = b',';
pub const CSV_QUOTE: u8 = b'"';

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn open_csv_reader<R>(reader: R, has_headers: bool) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(has_headers)
        .delimiter(CSV_DELIMITER)
        .quote(CSV_QUOTE)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

/// Reads the whole input file; the handle is closed before parsing starts.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Opening input file {path:?}"))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}
