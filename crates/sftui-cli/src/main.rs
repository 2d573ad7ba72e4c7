// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;

use anyhow::{Result, bail};
use config::Config;
use sftui_app::{AppState, SessionInfo, TemplateRepository};
use sftui_store::{FileConfigStore, SilverfinConfig, TemplateDirectory};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    reject_cli_args(env::args().skip(1))?;

    let config_path = Config::default_path();
    let config_label = config_path
        .as_ref()
        .map_or_else(|_| "<unresolved>".to_owned(), |path| path.display().to_string());
    let (config, config_note) = Config::load_or_default(config_path);
    let mut notes: Vec<String> = config_note.into_iter().collect();

    match logging::init(&config) {
        Ok(log_path) => info!(
            config = %config_label,
            log = %log_path.display(),
            "sftui starting"
        ),
        Err(error) => notes.push(format!("Logging disabled: {error:#}")),
    }

    let templates_root = config.templates_root();
    let templates = match TemplateDirectory::new(&templates_root).load_templates() {
        Ok(templates) => templates,
        Err(error) => {
            notes.push(format!("Error loading templates: {error:#}"));
            Vec::new()
        }
    };
    let repo = match sftui_store::repo_name(&templates_root) {
        Ok(repo) => repo,
        Err(error) => {
            warn!(error = %format!("{error:#}"), "cannot resolve repository name");
            String::new()
        }
    };

    let (mut store, session, session_notes) = open_session(config.silverfin_config_path(), repo);
    notes.extend(session_notes);

    info!(
        templates = templates.len(),
        root = %templates_root.display(),
        silverfin = %store.silverfin().path().display(),
        "loaded workspace"
    );
    let mut state = AppState::new(templates, session);
    if !notes.is_empty() {
        for note in &notes {
            warn!(%note, "startup degraded");
        }
        state.set_status(notes.join("; "));
    }

    sftui_tui::run_app(&mut state, &mut store)
}

/// An unresolvable credentials path degrades to an empty session instead of
/// aborting startup.
fn open_session(
    silverfin_path: Result<PathBuf>,
    repo: String,
) -> (FileConfigStore, SessionInfo, Vec<String>) {
    match silverfin_path {
        Ok(path) => {
            let store = FileConfigStore::new(SilverfinConfig::new(path, repo));
            let (session, note) = store.load_session_or_default();
            (store, session, note.into_iter().collect())
        }
        Err(error) => {
            warn!(error = %format!("{error:#}"), "cannot locate Silverfin config");
            (
                FileConfigStore::new(SilverfinConfig::new(PathBuf::new(), repo)),
                SessionInfo::default(),
                vec![format!("Error locating Silverfin config: {error:#}")],
            )
        }
    }
}

fn reject_cli_args<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if let Some(arg) = args.into_iter().next() {
        bail!(
            "unexpected argument {:?}; sftui takes no arguments (run it from the template repository)",
            arg.as_ref()
        );
    }
    Ok(())
}
