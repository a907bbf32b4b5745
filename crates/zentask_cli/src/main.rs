//! `zentask` binary entry point.
//!
//! Resolves configuration, starts logging, opens the task store and runs a
//! single command or the `watch` loop. Errors reach the user through
//! `anyhow` with their full context chain.

mod cli;
mod commands;
mod config;
mod output;
mod runtime;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use zentask_core::db::open_data_dir;
use zentask_core::{init_logging, AlarmScanner, SqliteTaskRepository, SystemClock, TaskStore};

use cli::{Cli, Command};
use config::{AppConfig, WatchConfig};
use runtime::LoopEvent;
use terminal::{FileMotivation, TerminalCelebration, TerminalNotifier};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli)?;

    // Logs are diagnostics only; a broken log dir must not block the user.
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    let conn = open_data_dir(&config.data_dir).with_context(|| {
        format!(
            "failed to open task database in {}",
            config.data_dir.display()
        )
    })?;
    let repo = SqliteTaskRepository::try_new(&conn)?;
    let mut store = TaskStore::load(repo, SystemClock)
        .context("stored tasks could not be read; refusing to overwrite them")?
        .with_celebration(TerminalCelebration);

    match cli.command {
        Command::Action(action) => {
            let rendered = commands::apply(&mut store, &action)?;
            print!("{}", with_newline(rendered));
        }

        Command::Watch {
            scan_interval_secs,
            quiet,
            motivation_file,
        } => {
            let motivation_file =
                motivation_file.unwrap_or_else(|| config.default_motivation_file());
            let watch = WatchConfig::new(scan_interval_secs, quiet, motivation_file)?;
            let scanner = AlarmScanner::new(TerminalNotifier::new(watch.quiet));
            let motivation = FileMotivation::new(&watch.motivation_file);

            eprintln!(
                "Watching {} task(s); scanning every {}s. Type commands, or `quit`.",
                store.len(),
                watch.scan_interval.as_secs()
            );
            let summary = runtime::run_watch(
                &mut store,
                &scanner,
                &motivation,
                watch.scan_interval,
                |event| match event {
                    LoopEvent::Motivation(motivation) => {
                        print!("{}", output::format_motivation(&motivation));
                    }
                    LoopEvent::Fired(report) => {
                        if report.delivered < report.fired.len() {
                            warn!(
                                "event=watch_fire module=cli status=suppressed fired={} delivered={}",
                                report.fired.len(),
                                report.delivered
                            );
                        }
                    }
                    LoopEvent::Action(Ok(rendered)) => print!("{}", with_newline(rendered)),
                    LoopEvent::Action(Err(err)) => eprintln!("error: {err}"),
                },
            )
            .context("failed to start watch runtime")?;
            eprintln!(
                "Stopped after {} scan(s), {} reminder(s).",
                summary.ticks, summary.fired
            );
        }
    }

    Ok(())
}

fn with_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
