//! Full runs of the front end with the emulated reader.

use simprov_controller::{ControllerConfig, Notice};
use simprov_core::{CardTypeSelection, RegistryError};
use simprov_runner::{execute, NetworkOverride, ReaderSelection, RunConfig, RunnerError};
use simprov_store::{CursorStore, ProgressStore};
use simprov_test_helpers::{csv_rows, test_network, test_records};
use simprov_types::SequenceNumber;
use tempfile::TempDir;

fn workspace(records: u64) -> (TempDir, RunConfig) {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("records.csv");
    std::fs::write(&csv, csv_rows(&test_records(records))).unwrap();
    let config = RunConfig::new(dir.path().join("state.toml"), csv)
        .with_reader(ReaderSelection::Emulated { cards: 2 })
        .with_network(NetworkOverride::from_parameters(&test_network()));
    (dir, config)
}

#[test]
fn test_emulated_batch_records_progress_and_network() {
    let (_dir, config) = workspace(5);

    let mut notices = Vec::new();
    let summary = execute(&config, |n| notices.push(n.to_string())).unwrap();

    assert_eq!(summary.committed, vec![SequenceNumber(1), SequenceNumber(2)]);
    assert!(notices.iter().any(|n| n.starts_with("Generated card parameters :")));
    assert_eq!(notices.iter().filter(|n| n.starts_with("Card written !")).count(), 2);

    let store = ProgressStore::load(&config.state_path).unwrap();
    assert_eq!(store.next_write_number(), SequenceNumber(3));
    assert_eq!(store.state().network, Some(test_network()));
}

#[test]
fn test_second_run_resumes_without_network_flags() {
    let (_dir, config) = workspace(5);
    execute(&config, |_| {}).unwrap();

    let resumed = config.clone().with_network(NetworkOverride::default());
    let summary = execute(&resumed, |_| {}).unwrap();
    assert_eq!(summary.committed, vec![SequenceNumber(3), SequenceNumber(4)]);
}

#[test]
fn test_conflicting_network_flag_rejected_before_programming() {
    let (_dir, config) = workspace(5);
    execute(&config, |_| {}).unwrap();

    let mut network = NetworkOverride::from_parameters(&test_network());
    network.mcc = Some(999);
    let conflicting = config.clone().with_network(network);

    let mut notices: Vec<Notice> = Vec::new();
    let err = execute(&conflicting, |n| notices.push(n.clone())).unwrap_err();
    assert!(matches!(err, RunnerError::NetworkMismatch { flag: "--mcc", .. }));
    assert!(notices.is_empty());
    assert_eq!(
        ProgressStore::load(&config.state_path).unwrap().next_write_number(),
        SequenceNumber(3)
    );
}

#[test]
fn test_fresh_state_without_network_flags_fails() {
    let (_dir, config) = workspace(1);
    let config = config.with_network(NetworkOverride::default());

    let err = execute(&config, |_| {}).unwrap_err();
    assert!(matches!(err, RunnerError::MissingNetwork { .. }));
    assert!(!config.state_path.exists());
}

#[test]
fn test_unknown_card_type_checked_first() {
    let (_dir, config) = workspace(1);
    let mut config = config.with_controller(
        ControllerConfig::default().with_card_type(CardTypeSelection::Named("nope".to_string())),
    );
    config.csv_path = config.csv_path.with_file_name("missing.csv");

    let err = execute(&config, |_| {}).unwrap_err();
    assert!(matches!(err, RunnerError::CardType(RegistryError::UnknownCardType { .. })));
}

#[test]
fn test_hardware_reader_unsupported() {
    let (_dir, config) = workspace(1);
    let config = config.with_reader(ReaderSelection::Pcsc { index: 0 });

    let err = execute(&config, |_| {}).unwrap_err();
    assert!(matches!(err, RunnerError::UnsupportedReader(_)));
    assert!(!config.state_path.exists());
}

#[test]
fn test_malformed_csv_is_fatal() {
    let (_dir, config) = workspace(1);
    std::fs::write(&config.csv_path, "1,not-an-iccid,001010000000001,00\n").unwrap();

    let err = execute(&config, |_| {}).unwrap_err();
    assert!(matches!(err, RunnerError::Queue(_)));
}
