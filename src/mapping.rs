use std::path::Path;

use anyhow::{Context, Result, anyhow};
use encoding_rs::Encoding;
use log::{debug, info};

use crate::io_utils;

/// A desired client name paired with the MAC address that identifies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientMapping {
    pub client_name: String,
    pub mac: String,
}

impl ClientMapping {
    pub fn new(client_name: impl Into<String>, mac: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            mac: mac.into(),
        }
    }
}

/// Loads every mapping from `path`, skipping the header row.
///
/// The whole file is read before returning. A row with fewer than two
/// columns fails the load; nothing is returned for the rows before it.
pub fn load_mappings(path: &Path, encoding: &'static Encoding) -> Result<Vec<ClientMapping>> {
    let data = io_utils::read_input(path)?;
    let mappings = read_mappings(&data, encoding)
        .with_context(|| format!("Loading client mappings from {path:?}"))?;
    info!("Read {} row(s) from input CSV", mappings.len());
    Ok(mappings)
}

/// Parses mappings from raw CSV bytes. Errors name the file line the
/// offending row starts on.
pub fn read_mappings(data: &[u8], encoding: &'static Encoding) -> Result<Vec<ClientMapping>> {
    let mut reader = io_utils::open_csv_reader(data, true);
    let mut record = csv::ByteRecord::new();
    let mut mappings = Vec::new();
    loop {
        let more = reader
            .read_byte_record(&mut record)
            .with_context(|| format!("Reading CSV near line {}", reader.position().line()))?;
        if !more {
            break;
        }
        let line = record_line(data, &record);
        let decoded = io_utils::decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {line}"))?;
        let mapping = mapping_from_row(decoded).with_context(|| format!("Row {line}"))?;
        debug!("Row {line}: '{}' -> {}", mapping.client_name, mapping.mac);
        mappings.push(mapping);
    }
    Ok(mappings)
}

/// The reader stamps a record with the offset where it began looking, which
/// is before any blank lines it skipped; step past those to the first byte.
fn record_line(data: &[u8], record: &csv::ByteRecord) -> u64 {
    let offset = record
        .position()
        .map_or(0, |pos| pos.byte() as usize)
        .min(data.len());
    let start = data[offset..]
        .iter()
        .position(|&byte| !matches!(byte, b'\r' | b'\n'))
        .map_or(data.len(), |skipped| offset + skipped);
    1 + data[..start].iter().filter(|&&byte| byte == b'\n').count() as u64
}

fn mapping_from_row(row: Vec<String>) -> Result<ClientMapping> {
    let found = row.len();
    let mut fields = row.into_iter();
    match (fields.next(), fields.next()) {
        (Some(client_name), Some(mac)) => Ok(ClientMapping { client_name, mac }),
        _ => Err(anyhow!(
            "Expected client name and MAC address columns but found {found} column(s)"
        )),
    }
}
