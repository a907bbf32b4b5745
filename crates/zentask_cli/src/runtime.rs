//! The `watch` event loop.
//!
//! One logical thread owns the store. Each `select!` branch (scan tick,
//! input line, motivation result, shutdown) runs to completion before the
//! next is polled, so scans never overlap each other or a user action.

use std::time::Duration;

use log::{info, warn};
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use zentask_core::alarm::{AlarmScanner, ScanReport};
use zentask_core::motivation::{fetch_motivation_or_fallback, Motivation, MotivationSource};
use zentask_core::ports::Notifier;
use zentask_core::{Clock, TaskRepository, TaskStore};

use clap::Parser;

use crate::cli::{Action, InputLine};
use crate::commands::{apply, ActionError};

const INPUT_QUEUE_DEPTH: usize = 16;

/// A parsed line from the interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Action(Action),
    Quit,
}

/// Something the loop wants the user to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopEvent {
    Motivation(Motivation),
    Fired(ScanReport),
    Action(Result<String, ActionError>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub ticks: usize,
    pub fired: usize,
    pub actions: usize,
}

/// Parses one input line; `Ok(None)` for blank lines.
pub fn parse_input_line(line: &str) -> Result<Option<Input>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if matches!(trimmed, "quit" | "exit" | "q") {
        return Ok(Some(Input::Quit));
    }

    let words = shlex::split(trimmed).ok_or_else(|| "unbalanced quotes".to_string())?;
    InputLine::try_parse_from(words)
        .map(|line| Some(Input::Action(line.action)))
        .map_err(|err| err.render().to_string())
}

/// Runs scans and input actions until `cancel` fires or `Quit` arrives.
///
/// The motivation fetch starts with the loop and is reported once when it
/// resolves; it never delays ticks or actions.
pub async fn run_loop<R, C, N, M>(
    store: &mut TaskStore<R, C>,
    scanner: &AlarmScanner<N>,
    motivation: &M,
    inputs: &mut mpsc::Receiver<Input>,
    cancel: &CancellationToken,
    scan_interval: Duration,
    mut report: impl FnMut(LoopEvent),
) -> LoopSummary
where
    R: TaskRepository,
    C: Clock,
    N: Notifier,
    M: MotivationSource,
{
    let mut ticker = tokio::time::interval(scan_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let motivation_fetch = fetch_motivation_or_fallback(motivation, store.pending_count());
    tokio::pin!(motivation_fetch);
    let mut motivation_pending = true;
    let mut inputs_open = true;
    let mut summary = LoopSummary::default();

    info!(
        "event=watch_start module=runtime status=ok scan_interval_ms={} tasks={}",
        scan_interval.as_millis(),
        store.len()
    );

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => break,

            motivation = &mut motivation_fetch, if motivation_pending => {
                motivation_pending = false;
                report(LoopEvent::Motivation(motivation));
            }

            _ = ticker.tick() => {
                summary.ticks += 1;
                let scan = scanner.tick(store);
                if !scan.is_idle() {
                    summary.fired += scan.fired.len();
                    report(LoopEvent::Fired(scan));
                }
            }

            input = inputs.recv(), if inputs_open => match input {
                Some(Input::Action(action)) => {
                    summary.actions += 1;
                    report(LoopEvent::Action(apply(store, &action)));
                }
                Some(Input::Quit) => break,
                None => {
                    // Input closed (e.g. stdin redirected); keep scanning.
                    inputs_open = false;
                }
            },
        }
    }

    info!(
        "event=watch_stop module=runtime status=ok ticks={} fired={} actions={}",
        summary.ticks, summary.fired, summary.actions
    );
    summary
}

/// Reads stdin lines into `tx` until EOF or `quit`.
async fn forward_stdin(tx: mpsc::Sender<Input>) {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                warn!("event=stdin_read module=runtime status=error error={err}");
                break;
            }
        };
        match parse_input_line(&line) {
            Ok(Some(input)) => {
                let quit = input == Input::Quit;
                if tx.send(input).await.is_err() || quit {
                    break;
                }
            }
            Ok(None) => {}
            Err(message) => eprintln!("{message}"),
        }
    }
}

/// Blocks the current thread running the watch loop on a single-threaded
/// runtime until Ctrl-C, `quit`, or an I/O failure of the runtime itself.
pub fn run_watch<R, C, N, M>(
    store: &mut TaskStore<R, C>,
    scanner: &AlarmScanner<N>,
    motivation: &M,
    scan_interval: Duration,
    mut report: impl FnMut(LoopEvent),
) -> std::io::Result<LoopSummary>
where
    R: TaskRepository,
    C: Clock,
    N: Notifier,
    M: MotivationSource,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let permission = scanner.ensure_permission();
    info!("event=watch_permission module=runtime status=ok permission={permission}");

    let summary = runtime.block_on(async {
        let cancel = CancellationToken::new();
        let (tx, mut rx) = mpsc::channel(INPUT_QUEUE_DEPTH);

        tokio::spawn(forward_stdin(tx));
        let on_signal = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_signal.cancel();
            }
        });

        run_loop(
            store,
            scanner,
            motivation,
            &mut rx,
            &cancel,
            scan_interval,
            &mut report,
        )
        .await
    });

    // A pending stdin read would otherwise block runtime drop.
    runtime.shutdown_background();
    Ok(summary)
}
