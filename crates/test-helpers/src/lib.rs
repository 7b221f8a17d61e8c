//! Shared fixtures for simprov tests.
//!
//! Records produced by [`test_record`] are deterministic in their sequence
//! number, so a test can rebuild the record it expects a card to carry.

use simprov_types::{IdentityRecord, NetworkParameters, SequenceNumber};
use std::fmt::Write;

/// ICCID assigned to record `n` by [`test_record`].
pub fn test_iccid(n: u64) -> String {
    format!("8988211{:012}", n)
}

/// IMSI assigned to record `n` by [`test_record`].
pub fn test_imsi(n: u64) -> String {
    format!("00101{:010}", n)
}

/// Ki (hex) assigned to record `n` by [`test_record`].
pub fn test_ki(n: u64) -> String {
    format!("{:032x}", 0xa5a5_0000_0000_0000_0000_0000_0000_0000u128 | n as u128)
}

/// Deterministic identity record for sequence number `n`.
pub fn test_record(n: u64) -> IdentityRecord {
    IdentityRecord::parse(&n.to_string(), &test_iccid(n), &test_imsi(n), &test_ki(n))
        .expect("fixture record is valid")
}

/// Records `1..=count`.
pub fn test_records(count: u64) -> Vec<IdentityRecord> {
    (1..=count).map(test_record).collect()
}

/// Network parameters used across tests.
pub fn test_network() -> NetworkParameters {
    NetworkParameters::new("Test Network", "+15551234567", 1, 1)
}

/// Render records as a parameter source (CSV, no header).
pub fn csv_rows(records: &[IdentityRecord]) -> String {
    let mut out = String::new();
    for record in records {
        writeln!(
            out,
            "{},{},{},{}",
            record.sequence_number.get(),
            record.iccid,
            record.imsi,
            record.ki
        )
        .expect("writing to a String cannot fail");
    }
    out
}

/// State file contents resuming at `next` with [`test_network`].
pub fn state_file_text(next: SequenceNumber) -> String {
    let network = test_network();
    format!(
        "next_write_number = {}\n\n[network]\nname = \"{}\"\nsmsp = \"{}\"\nmcc = {}\nmnc = {}\n",
        next.get(),
        network.name,
        network.smsp,
        network.mcc,
        network.mnc
    )
}
