//! Block panel entrypoint: a terminal host for the reusable block edit panel.
mod host;
mod session;

use anyhow::Result;
use clap::Parser;
use core_config::{Config, load_from};
use core_events::{
    CHANNEL_SEND_FAILURES, CommandEvent, DelayedEventSource, EVENT_CHANNEL_CAP, Event, InputEvent,
    KEYPRESS_REPEAT, KEYPRESS_TOTAL, spawn_source,
};
use core_panel::Labels;
use core_render::Writer;
use core_terminal::{CrosstermBackend, DEFAULT_TITLE, TerminalBackend, TerminalGuard};
use host::BlockEditor;
use session::{Flow, Session};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "block-panel.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "block-panel", version, about = "Reusable block edit panel")]
struct Args {
    /// Configuration file path (overrides discovery of `block-panel.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Initial block title (overrides `[block] title`).
    #[arg(long = "title")]
    pub title: Option<String>,
    /// Start with the Edit button disabled.
    #[arg(long = "locked")]
    pub locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    CtrlC,
    QuitKey,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::CtrlC => "ctrl_c",
            ShutdownReason::QuitKey => "quit_key",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum LoopControl {
    Continue,
    Break(ShutdownReason),
}

fn configure_logging(default_filter: &str) -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE_NAME);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global tracing subscriber already installed; drop guard so writer shuts down.
        Err(_err) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn labels_from(config: &Config) -> Labels {
    let labels = &config.file.labels;
    Labels {
        edit: labels.edit.clone(),
        save: labels.save.clone(),
        name: labels.name.clone(),
    }
}

struct PanelRuntime<'a> {
    session: Session,
    save_delay: Duration,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    input_task: Option<tokio::task::JoinHandle<()>>,
    input_shutdown: Option<core_input::AsyncInputShutdown>,
    save_tasks: Vec<tokio::task::JoinHandle<()>>,
    terminal: TerminalGuard<'a, CrosstermBackend>,
}

impl PanelRuntime<'_> {
    async fn run(&mut self) -> Result<()> {
        self.paint()?;

        let loop_span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter_loop = loop_span.enter();

        let mut reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            let control = match event {
                Event::Input(InputEvent::CtrlC) => LoopControl::Break(ShutdownReason::CtrlC),
                Event::Input(InputEvent::Key(key)) => match self.session.handle_key(key) {
                    Flow::Continue => LoopControl::Continue,
                    Flow::ScheduleSave => {
                        self.schedule_save();
                        LoopControl::Continue
                    }
                    Flow::Quit => LoopControl::Break(ShutdownReason::QuitKey),
                },
                Event::Input(InputEvent::Resize(w, _h)) => {
                    self.session.resize(w);
                    self.terminal.backend().clear()?;
                    LoopControl::Continue
                }
                Event::Command(CommandEvent::SaveCompleted) => {
                    self.session.complete_save();
                    LoopControl::Continue
                }
            };
            match control {
                LoopControl::Continue => self.paint()?,
                LoopControl::Break(r) => {
                    reason = r;
                    break;
                }
            }
        }

        self.rx.close();
        self.finalize_shutdown(reason).await;
        Ok(())
    }

    fn paint(&self) -> Result<()> {
        Writer::from_frame(&self.session.frame(), 0).flush()
    }

    fn schedule_save(&mut self) {
        let Some(tx) = self.tx.as_ref() else {
            warn!(target: "runtime", "save_not_scheduled_sender_closed");
            return;
        };
        let src = DelayedEventSource::new(
            self.save_delay,
            Event::Command(CommandEvent::SaveCompleted),
        );
        self.save_tasks.retain(|h| !h.is_finished());
        self.save_tasks.push(spawn_source(Box::new(src), tx));
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        info!(target: "runtime.shutdown", reason = %reason, stage = "begin", "shutdown_stage");
        drop(self.tx.take());

        // A pending save cannot be delivered any more.
        for handle in self.save_tasks.drain(..) {
            handle.abort();
        }

        if let Some(shutdown) = self.input_shutdown.take() {
            trace!(target: "runtime.shutdown", reason = reason.as_str(), "input_task_shutdown_signal");
            shutdown.signal();
        }
        if let Some(handle) = self.input_task.take() {
            match tokio::time::timeout(Duration::from_millis(200), handle).await {
                Ok(Ok(())) => trace!(target: "runtime.shutdown", "input_task_joined"),
                Ok(Err(err)) if err.is_cancelled() => {
                    trace!(target: "runtime.shutdown", "input_task_cancelled")
                }
                Ok(Err(err)) => error!(target: "runtime.shutdown", ?err, "input_task_join_failed"),
                Err(_) => warn!(target: "runtime.shutdown", "input_task_timeout"),
            }
        }
        info!(
            target: "runtime.shutdown",
            reason = %reason,
            stage = "complete",
            keypress_total = KEYPRESS_TOTAL.load(Ordering::Relaxed),
            keypress_repeat = KEYPRESS_REPEAT.load(Ordering::Relaxed),
            send_failures = CHANNEL_SEND_FAILURES.load(Ordering::Relaxed),
            "shutdown_stage"
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    // Loaded before the subscriber exists so `[log] filter` can apply.
    let config = load_from(args.config.clone())?;
    let _log_guard = configure_logging(&config.file.log.filter);
    install_panic_hook();
    config.outcome.report();

    let title = args.title.clone().unwrap_or_else(|| config.file.block.title.clone());
    let locked = args.locked || config.file.block.edit_disabled;
    let config_path = config.source.as_ref().map(|p| p.display().to_string());
    info!(
        target: "runtime.startup",
        config = config_path.as_deref(),
        title_len = title.len(),
        locked,
        save_delay_ms = config.file.save.delay_ms,
        "startup"
    );

    let mut backend = CrosstermBackend::new();
    backend.set_title(DEFAULT_TITLE)?;
    let (width, _rows) = backend.size()?;
    let terminal = backend.enter_guard()?;

    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx.clone());

    let mut runtime = PanelRuntime {
        session: Session::new(labels_from(&config), BlockEditor::new(title, locked), width),
        save_delay: Duration::from_millis(config.file.save.delay_ms),
        rx,
        tx: Some(tx),
        input_task: Some(input_task),
        input_shutdown: Some(input_shutdown),
        save_tasks: Vec::new(),
        terminal,
    };
    let result = runtime.run().await;
    drop(runtime);
    if let Err(err) = &result {
        error!(target: "runtime", error = %err, "runtime_error");
    }
    result
}
