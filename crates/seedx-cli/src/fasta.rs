//! Minimal FASTA reader, just enough to drive the CLI's fixtures from
//! a `.fa` file.

use std::path::Path;

/// Parse `>header` / sequence-line records, concatenating wrapped
/// sequence lines and uppercasing residues.
pub fn read_fasta(path: &Path) -> seedx_error::Result<Vec<(String, Vec<u8>)>> {
    let text = std::fs::read_to_string(path)?;
    let mut records = Vec::new();
    let mut current_name: Option<String> = None;
    let mut current_seq: Vec<u8> = Vec::new();

    for line in text.lines() {
        let line = line.trim_end();
        if let Some(header) = line.strip_prefix('>') {
            if let Some(name) = current_name.take() {
                records.push((name, std::mem::take(&mut current_seq)));
            }
            current_name = Some(header.split_whitespace().next().unwrap_or(header).to_string());
        } else if !line.is_empty() {
            current_seq.extend(line.trim().bytes().map(|b| b.to_ascii_uppercase()));
        }
    }
    if let Some(name) = current_name {
        records.push((name, current_seq));
    }

    if records.is_empty() {
        return Err(seedx_error::Error::invalid_input(format!(
            "no FASTA records found in {}",
            path.display()
        )));
    }
    Ok(records)
}
