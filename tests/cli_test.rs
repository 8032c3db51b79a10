//! CLI parsing, document loading and error mapping.

use std::fs;

use clap::Parser;
use rstest::rstest;
use tempfile::TempDir;

use nodegraph::cli::args::ConfigCommands;
use nodegraph::cli::commands::{execute_command, find_node, load_document};
use nodegraph::cli::{Cli, CliError, Commands};
use nodegraph::exitcode;

const DOC: &str = r#"{
  "Tags": ["root"],
  "Children": [
    {"Tags": ["server"], "Data": {"port": 80}},
    {"Tags": ["client"], "Children": [{"Tags": ["server", "mirror"]}]}
  ]
}"#;

fn write_doc(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("doc.json");
    fs::write(&path, content).unwrap();
    path
}

// ============================================================
// Argument parsing
// ============================================================

#[test]
fn given_find_args_when_parsing_then_tags_collected() {
    let cli = Cli::try_parse_from(["nodegraph", "-dd", "find", "doc.json", "-t", "a", "--tag", "b", "--deep"])
        .unwrap();
    assert_eq!(cli.debug, 2);
    match cli.command {
        Some(Commands::Find { tags, deep, .. }) => {
            assert_eq!(tags, vec!["a", "b"]);
            assert!(deep);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn given_find_without_tags_when_parsing_then_rejected() {
    assert!(Cli::try_parse_from(["nodegraph", "find", "doc.json"]).is_err());
}

#[test]
fn given_pretty_and_compact_when_parsing_then_conflict() {
    assert!(Cli::try_parse_from(["nodegraph", "fmt", "doc.json", "--pretty", "--compact"]).is_err());
}

#[test]
fn given_config_show_when_parsing_then_subcommand() {
    let cli = Cli::try_parse_from(["nodegraph", "config", "show"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Config {
            command: ConfigCommands::Show
        })
    ));
}

// ============================================================
// Documents
// ============================================================

#[test]
fn given_document_file_when_loading_then_tree_built() {
    let dir = TempDir::new().unwrap();
    let root = load_document(&write_doc(&dir, DOC)).unwrap();

    assert_eq!(root.tags(), vec!["root"]);
    assert_eq!(root.len(), 2);
    assert_eq!(root.child(1).unwrap().len(), 1);
}

#[rstest]
#[case(false, vec![0])]
#[case(true, vec![0])]
fn given_document_when_finding_server_then_first_match(#[case] deep: bool, #[case] path: Vec<usize>) {
    let dir = TempDir::new().unwrap();
    let root = load_document(&write_doc(&dir, DOC)).unwrap();

    let hit = find_node(&root, &["server".to_string()], deep).unwrap();
    assert_eq!(hit.index_path(), path);
}

#[test]
fn given_document_when_finding_nested_tags_then_deep_only() {
    let dir = TempDir::new().unwrap();
    let root = load_document(&write_doc(&dir, DOC)).unwrap();
    let tags = vec!["server".to_string(), "mirror".to_string()];

    let err = find_node(&root, &tags, false).unwrap_err();
    assert_eq!(err.exit_code(), exitcode::NOMATCH);

    let hit = find_node(&root, &tags, true).unwrap();
    assert_eq!(hit.index_path(), vec![1, 0]);
    assert_eq!(hit.depth(), 1);
}

// ============================================================
// Error mapping
// ============================================================

#[test]
fn given_missing_file_when_loading_then_noinput() {
    let dir = TempDir::new().unwrap();
    let err = load_document(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, CliError::Input { .. }));
    assert_eq!(err.exit_code(), exitcode::NOINPUT);
}

#[test]
fn given_malformed_file_when_loading_then_dataerr() {
    let dir = TempDir::new().unwrap();
    let err = load_document(&write_doc(&dir, r#"{"Tags": [1]}"#)).unwrap_err();
    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_missing_config_when_executing_then_config_error() {
    let dir = TempDir::new().unwrap();
    let doc = write_doc(&dir, DOC);
    let config = dir.path().join("absent.toml");
    let cli = Cli::try_parse_from([
        "nodegraph",
        "--config",
        config.to_str().unwrap(),
        "fmt",
        doc.to_str().unwrap(),
    ])
    .unwrap();

    let err = execute_command(&cli).unwrap_err();
    assert_eq!(err.exit_code(), exitcode::CONFIG);
}

#[test]
fn given_valid_document_when_formatting_then_ok() {
    let dir = TempDir::new().unwrap();
    let doc = write_doc(&dir, DOC);
    let cli = Cli::try_parse_from(["nodegraph", "fmt", "--compact", doc.to_str().unwrap()]).unwrap();

    execute_command(&cli).unwrap();
}
