//! End-to-end checks for the labtest drivers through the library API

use labtest::btest::{render_summary, render_total};
use labtest::{LabConfig, QtestSession};
use std::fs::File;
use std::io::{BufReader, Write};
use tempfile::NamedTempFile;

#[test]
fn test_config_file_overrides_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[btest]\ntrials = 25\nfunctions = [\"bitCount\"]").unwrap();
    writeln!(file, "[qtest]\nbuffer_size = 4").unwrap();

    let config = LabConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.btest.trials, 25);
    assert_eq!(config.btest.seed, 0x15213);
    assert_eq!(config.btest.functions, vec!["bitCount".to_string()]);
    assert_eq!(config.qtest.buffer_size, 4);
}

#[test]
fn test_config_file_with_bad_puzzle() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[btest]\nfunctions = [\"noSuchPuzzle\"]").unwrap();

    let err = LabConfig::load(Some(file.path())).unwrap_err();
    assert!(err.contains("noSuchPuzzle"));
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = LabConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(err.contains("Failed to read config"));
}

#[test]
fn test_qtest_script_from_file() {
    let mut script = NamedTempFile::new().unwrap();
    write!(
        script,
        "# FIFO then LIFO\nnew\nit dolphin\nit bear\nih gerbil\nsize 3\n\
         rh gerbil\nreverse\nrh bear\nrh dolphin\nsize 0\nfree\n"
    )
    .unwrap();

    let file = File::open(script.path()).unwrap();
    let mut session = QtestSession::new(1024, Vec::new());
    let outcome = session.run(BufReader::new(file)).unwrap();
    let output = String::from_utf8(session.into_output()).unwrap();

    assert!(outcome.passed(), "{}", output);
    assert_eq!(outcome.commands, 11);
    assert!(output.contains("q = [gerbil dolphin bear]"));
    assert!(output.contains("q = [bear dolphin]"));
}

#[test]
fn test_qtest_small_buffer_from_config() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[qtest]\nbuffer_size = 4").unwrap();
    let config = LabConfig::load(Some(file.path())).unwrap();

    let mut session = QtestSession::new(config.qtest.buffer_size, Vec::new());
    let outcome = session.run("new\nit meerkat\nrh mee\n".as_bytes()).unwrap();
    assert!(outcome.passed());
}

#[test]
fn test_btest_with_config_selection() {
    let config = LabConfig::default_config().unwrap();
    let mut options = config.btest.check_options();
    options.trials = 100;

    let summary = lab_bits::check_all(&["getByte".to_string()], &options).unwrap();
    assert_eq!(render_total(&summary), "Total points: 2/2");
    assert!(render_summary(&summary).contains(" 2\t2\t0\tgetByte\n"));
}
