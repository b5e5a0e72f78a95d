//! `foundry` -- drive a universe manager session from a line-oriented script.
//!
//! Each non-empty line is one event. Lines starting with `#` are comments.
//!
//! ```text
//! navigate <route>            tab <tab>
//! select <name>               create <name>
//! add <sym>...                remove <sym>...
//! paste <text, \n for newline>
//! save    delete    confirm    cancel
//! editor-tab add|remove|manual
//! show
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use foundry_session::prelude::*;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "foundry")]
#[command(about = "Curate named symbol universes from a script of UI events", long_about = None)]
struct Cli {
    /// Session configuration file (YAML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Storage document path, overriding the configuration
    #[arg(short, long, value_name = "FILE")]
    storage: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset (e.g. "debug")
    #[arg(short, long, value_name = "FILTER")]
    log: Option<String>,

    /// Read the script from this file instead of stdin
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Script commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum ScriptCommand {
    Dispatch(Event),
    Show,
}

/// Parse one script line. `Ok(None)` for blank lines and comments.
fn parse_line(line: &str) -> anyhow::Result<Option<ScriptCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let words = || rest.split_whitespace().map(str::to_owned).collect::<Vec<_>>();
    let argument = |what: &str| -> anyhow::Result<String> {
        if rest.is_empty() {
            bail!("`{verb}` needs {what}");
        }
        Ok(rest.to_owned())
    };

    let event = match verb {
        "navigate" => Event::Navigate(argument("a route")?),
        "tab" => Event::SelectTab(argument("a tab id")?),
        "select" => Event::Select(argument("a universe name")?),
        "create" => Event::Create(rest.to_owned()),
        "add" => Event::StageAdditions(words()),
        "remove" => Event::StageRemovals(words()),
        "paste" => Event::SetManualText(rest.replace("\\n", "\n")),
        "editor-tab" => Event::SelectEditorTab(argument("add, remove or manual")?.parse()?),
        "save" => Event::SaveChanges,
        "delete" => Event::OpenDelete,
        "confirm" => Event::ConfirmDelete,
        "cancel" => Event::CancelDelete,
        "show" => return Ok(Some(ScriptCommand::Show)),
        other => bail!("unknown command `{other}`"),
    };
    Ok(Some(ScriptCommand::Dispatch(event)))
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

fn run_script<S, R, W>(session: &mut Session<S>, input: R, out: &mut W) -> anyhow::Result<()>
where
    S: Storage,
    R: BufRead,
    W: Write,
{
    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("reading script line {line_no}"))?;
        let command = parse_line(&line).with_context(|| format!("script line {line_no}"))?;
        match command {
            None => {}
            Some(ScriptCommand::Show) => show(session, out)?,
            Some(ScriptCommand::Dispatch(event)) => {
                let opens_dialog = event == Event::OpenDelete;
                let report = session.dispatch(event);
                if let Some(PersistOutcome::Persisted { .. }) = report.persist {
                    if let Some(status) = session.status() {
                        writeln!(out, "{status}")?;
                    }
                }
                if opens_dialog {
                    if let Some(prompt) = session.delete_prompt() {
                        writeln!(out, "{prompt}")?;
                    }
                }
            }
        }
    }
    Ok(())
}

fn show<S: Storage, W: Write>(session: &Session<S>, out: &mut W) -> anyhow::Result<()> {
    session.snapshot().verify().context("snapshot integrity check")?;
    let snapshot = serde_json::to_string_pretty(session.snapshot()).context("encoding snapshot")?;
    writeln!(out, "{snapshot}")?;

    if let Some(selector) = session.selector_view() {
        writeln!(out, "universes: {}", selector.options.join(", "))?;
        writeln!(out, "selected: {}", selector.selected.as_deref().unwrap_or("-"))?;
    }
    if let Some(editor) = session.editor_view() {
        writeln!(out, "{}", editor.title)?;
        writeln!(out, "{}", editor.count_label)?;
        match editor.tab {
            EditorTab::Add => writeln!(out, "add: {}", editor.add_candidates.join(", "))?,
            EditorTab::Remove => writeln!(out, "remove: {}", editor.remove_candidates.join(", "))?,
            EditorTab::Manual => writeln!(out, "{MANUAL_FORMAT_HINT}")?,
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SessionConfig::from_yaml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(storage) = cli.storage {
        config.storage_path = storage;
    }
    if let Some(filter) = cli.log {
        config.log_filter = filter;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with_writer(io::stderr)
        .init();

    let storage = YamlFileStorage::new(config.storage_path.clone());
    let mut session = Session::open(config, storage, Box::new(StaticCatalog::default()));

    let input: Box<dyn BufRead> = match &cli.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening script {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_script(&mut session, input, &mut out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
