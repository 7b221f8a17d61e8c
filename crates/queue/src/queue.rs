//! The parameter queue.

use crate::QueueError;
use simprov_types::{IdentityRecord, SequenceNumber};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

const FIELDS_PER_ROW: usize = 4;

/// All identity records of a batch, read-only after load.
#[derive(Debug, Clone, Default)]
pub struct ParameterQueue {
    records: BTreeMap<SequenceNumber, IdentityRecord>,
}

impl ParameterQueue {
    /// Load the queue from a parameter source file.
    pub fn load_path(path: impl AsRef<Path>) -> Result<Self, QueueError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| QueueError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let queue = Self::load(file)?;
        info!(
            path = %path.display(),
            records = queue.len(),
            first = ?queue.first_sequence().map(|s| s.get()),
            last = ?queue.last_sequence().map(|s| s.get()),
            "Loaded parameter queue"
        );
        Ok(queue)
    }

    /// Load the queue from CSV rows of `sequence_number,iccid,imsi,ki`.
    ///
    /// The load is all-or-nothing: the first malformed or duplicate row
    /// fails the whole load.
    pub fn load(source: impl Read) -> Result<Self, QueueError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        let mut records = BTreeMap::new();
        let mut defined_on: HashMap<SequenceNumber, u64> = HashMap::new();

        for row in reader.records() {
            let row = row.map_err(|e| QueueError::MalformedRecord {
                line: e.position().map_or(0, |p| p.line()),
                reason: e.to_string(),
            })?;
            let line = row.position().map_or(0, |p| p.line());

            // Blank line
            if row.len() == 1 && row[0].is_empty() {
                continue;
            }

            if row.len() != FIELDS_PER_ROW {
                return Err(QueueError::MalformedRecord {
                    line,
                    reason: format!("expected {} fields, found {}", FIELDS_PER_ROW, row.len()),
                });
            }

            let record = IdentityRecord::parse(&row[0], &row[1], &row[2], &row[3])
                .map_err(|e| QueueError::MalformedRecord {
                    line,
                    reason: e.to_string(),
                })?;

            let sequence_number = record.sequence_number;
            match records.entry(sequence_number) {
                Entry::Occupied(_) => {
                    return Err(QueueError::DuplicateKey {
                        sequence_number,
                        line,
                        first_line: defined_on.get(&sequence_number).copied().unwrap_or(0),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(record);
                    defined_on.insert(sequence_number, line);
                }
            }
        }

        debug!(records = records.len(), "Parsed parameter source");
        Ok(Self { records })
    }

    /// Build a queue from already-parsed records.
    ///
    /// Fails with [`QueueError::DuplicateKey`] if two records share a
    /// sequence number (line numbers are the 1-based record positions).
    pub fn from_records(
        records: impl IntoIterator<Item = IdentityRecord>,
    ) -> Result<Self, QueueError> {
        let mut map = BTreeMap::new();
        let mut positions: HashMap<SequenceNumber, u64> = HashMap::new();
        for (index, record) in records.into_iter().enumerate() {
            let position = index as u64 + 1;
            let sequence_number = record.sequence_number;
            if let Some(&first_line) = positions.get(&sequence_number) {
                return Err(QueueError::DuplicateKey {
                    sequence_number,
                    line: position,
                    first_line,
                });
            }
            positions.insert(sequence_number, position);
            map.insert(sequence_number, record);
        }
        Ok(Self { records: map })
    }

    /// Get the record for a sequence number.
    pub fn get(&self, sequence_number: SequenceNumber) -> Result<&IdentityRecord, QueueError> {
        self.records
            .get(&sequence_number)
            .ok_or(QueueError::ExhaustedQueue {
                requested: sequence_number,
                available: self.records.len(),
            })
    }

    /// Lowest sequence number in the queue.
    pub fn first_sequence(&self) -> Option<SequenceNumber> {
        self.records.keys().next().copied()
    }

    /// Highest sequence number in the queue.
    pub fn last_sequence(&self) -> Option<SequenceNumber> {
        self.records.keys().next_back().copied()
    }

    /// Number of records at or after `from`.
    pub fn remaining_from(&self, from: SequenceNumber) -> usize {
        self.records.range(from..).count()
    }

    /// Iterate records in sequence order.
    pub fn iter(&self) -> impl Iterator<Item = &IdentityRecord> {
        self.records.values()
    }

    /// Get the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simprov_test_helpers::{csv_rows, test_record};
    use std::io::Write;
    use tracing_test::traced_test;

    #[test]
    fn test_load_and_get() {
        let source = csv_rows(&[test_record(1), test_record(2), test_record(3)]);
        let queue = ParameterQueue::load(source.as_bytes()).unwrap();

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.get(SequenceNumber(2)).unwrap(), &test_record(2));
        assert_eq!(queue.first_sequence(), Some(SequenceNumber(1)));
        assert_eq!(queue.last_sequence(), Some(SequenceNumber(3)));
        assert_eq!(queue.remaining_from(SequenceNumber(2)), 2);
    }

    #[test]
    fn test_load_ignores_row_order_and_whitespace() {
        let source = format!(
            "{}\n\n  {}  \n",
            csv_rows(&[test_record(2)]).trim_end(),
            csv_rows(&[test_record(1)]).trim_end().replace(',', " , ")
        );
        let queue = ParameterQueue::load(source.as_bytes()).unwrap();

        let order: Vec<u64> = queue.iter().map(|r| r.sequence_number.get()).collect();
        assert_eq!(order, vec![1, 2]);
    }

    #[test]
    fn test_get_past_end_is_exhausted() {
        let queue = ParameterQueue::load(csv_rows(&[test_record(1)]).as_bytes()).unwrap();

        match queue.get(SequenceNumber(2)) {
            Err(QueueError::ExhaustedQueue {
                requested,
                available,
            }) => {
                assert_eq!(requested, SequenceNumber(2));
                assert_eq!(available, 1);
            }
            other => panic!("expected ExhaustedQueue, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_sequence_number_fails_whole_load() {
        let mut source = csv_rows(&[test_record(1), test_record(2)]);
        source.push_str(&csv_rows(&[test_record(1)]));

        match ParameterQueue::load(source.as_bytes()) {
            Err(QueueError::DuplicateKey {
                sequence_number,
                line,
                first_line,
            }) => {
                assert_eq!(sequence_number, SequenceNumber(1));
                assert_eq!(line, 3);
                assert_eq!(first_line, 1);
            }
            other => panic!("expected DuplicateKey, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_field_count_is_malformed() {
        let source = "1,8988211000000000018,001010000000001\n";
        match ParameterQueue::load(source.as_bytes()) {
            Err(QueueError::MalformedRecord { line, reason }) => {
                assert_eq!(line, 1);
                assert!(reason.contains("expected 4 fields, found 3"), "{}", reason);
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_field_is_malformed_with_line() {
        let mut source = csv_rows(&[test_record(1)]);
        source.push_str("x,8988211000000000026,001010000000002,000102030405060708090a0b0c0d0e0f\n");

        let err = ParameterQueue::load(source.as_bytes()).unwrap_err();
        assert!(matches!(err, QueueError::MalformedRecord { line: 2, .. }));
        assert!(err.to_string().contains("sequence number"));
    }

    #[test]
    fn test_from_records_rejects_duplicates() {
        let err =
            ParameterQueue::from_records([test_record(4), test_record(5), test_record(4)])
                .unwrap_err();
        assert!(matches!(
            err,
            QueueError::DuplicateKey {
                line: 3,
                first_line: 1,
                ..
            }
        ));
    }

    #[traced_test]
    #[test]
    fn test_load_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(csv_rows(&[test_record(1), test_record(2)]).as_bytes())
            .unwrap();

        let queue = ParameterQueue::load_path(file.path()).unwrap();
        assert_eq!(queue.len(), 2);
        assert!(logs_contain("Loaded parameter queue"));

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            ParameterQueue::load_path(&missing),
            Err(QueueError::Io { .. })
        ));
    }
}
