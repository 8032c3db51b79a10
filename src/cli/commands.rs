//! Command dispatch

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::Node;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Show {
            file,
            no_tags,
            no_data,
        }) => show(&load_settings(cli)?, file, *no_tags, *no_data),
        Some(Commands::Find { file, tags, deep }) => find(&load_settings(cli)?, file, tags, *deep),
        Some(Commands::Fmt {
            file,
            pretty,
            compact,
        }) => fmt(&load_settings(cli)?, file, *pretty, *compact),
        Some(Commands::Config { command }) => config(&load_settings(cli)?, command),
        Some(Commands::Completion { shell }) => {
            print_completions(*shell);
            Ok(())
        }
        None => Ok(()),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "effective settings");
    Ok(settings)
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

/// Reads the document at `path`; `-` reads stdin.
fn read_source(path: &Path) -> CliResult<String> {
    let input_err = |source| CliError::Input {
        path: path.to_path_buf(),
        source,
    };
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map_err(input_err)?;
        Ok(buf)
    } else {
        fs::read_to_string(path).map_err(input_err)
    }
}

pub fn load_document(path: &Path) -> CliResult<Node> {
    let source = read_source(path)?;
    Ok(Node::from_json(&source)?)
}

fn encode(node: &Node, pretty: bool) -> CliResult<String> {
    let json = if pretty {
        node.to_json_pretty()?
    } else {
        node.to_json()?
    };
    Ok(json)
}

#[instrument(skip(settings))]
fn show(settings: &Settings, file: &Path, no_tags: bool, no_data: bool) -> CliResult<()> {
    let root = load_document(file)?;
    let mut options = settings.render_options();
    options.show_tags &= !no_tags;
    options.show_data &= !no_data;
    output::info(root.to_tree_string_with(&options).to_string().trim_end());
    Ok(())
}

/// First node carrying all `tags`, searched per `deep`.
pub fn find_node(root: &Node, tags: &[String], deep: bool) -> CliResult<Node> {
    if tags.iter().any(String::is_empty) {
        return Err(CliError::InvalidArgs("tags must not be empty".into()));
    }
    let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
    let hit = if deep {
        root.child_by_tag_deep(&tags)
    } else {
        root.child_by_tag(&tags)
    };
    hit.ok_or_else(|| CliError::NoMatch(tags.iter().join(", ")))
}

#[instrument(skip(settings))]
fn find(settings: &Settings, file: &Path, tags: &[String], deep: bool) -> CliResult<()> {
    let root = load_document(file)?;
    let hit = find_node(&root, tags, deep || settings.search.deep)?;
    output::header(&format!("/{}", hit.index_path().iter().join("/")));
    output::detail(&format!("depth: {}", hit.depth()));
    output::info(&encode(&hit, settings.output.pretty)?);
    Ok(())
}

#[instrument(skip(settings))]
fn fmt(settings: &Settings, file: &Path, pretty: bool, compact: bool) -> CliResult<()> {
    let root = load_document(file)?;
    let pretty = if pretty {
        true
    } else if compact {
        false
    } else {
        settings.output.pretty
    };
    output::info(&encode(&root, pretty)?);
    Ok(())
}

fn config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(settings.to_toml()?.trim_end()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no config directory available"),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Node {
        Node::from_json(
            r#"{"Tags":["root"],"Children":[
                {"Tags":["a"],"Children":[{"Tags":["a1","leaf"]}]},
                {"Tags":["b","leaf"]}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn shallow_find_only_sees_top_level() {
        let root = doc();
        let hit = find_node(&root, &["leaf".to_string()], false).unwrap();
        assert_eq!(hit.index_path(), vec![1]);
        assert!(matches!(
            find_node(&root, &["a1".to_string()], false),
            Err(CliError::NoMatch(_))
        ));
    }

    #[test]
    fn deep_find_prefers_pre_order() {
        let root = doc();
        let hit = find_node(&root, &["leaf".to_string()], true).unwrap();
        assert_eq!(hit.index_path(), vec![0, 0]);
        assert_eq!(hit.depth(), 1);
    }

    #[test]
    fn empty_tag_is_a_usage_error() {
        let err = find_node(&doc(), &[String::new()], true).unwrap_err();
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
    }
}
