//! Core event types and channel helpers for the block panel host.
//!
//! Scope: terminal input normalized into `KeyEvent`s, host commands, and the
//! async sources that feed the single bounded event channel.

use std::fmt;
use std::sync::atomic::AtomicU64;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

// -------------------------------------------------------------------------------------------------
// Channel Policy
// -------------------------------------------------------------------------------------------------
// One bounded mpsc channel carries every event to the host loop. The input task is the main
// producer; delayed sources (simulated save latency) are short-lived secondary producers. Producers
// await `send` so a slow consumer applies backpressure instead of dropping keystrokes.
// -------------------------------------------------------------------------------------------------
pub const EVENT_CHANNEL_CAP: usize = 1024;

// Relaxed atomic counters, inspected in tests and logged at shutdown.
pub static CHANNEL_SEND_FAILURES: AtomicU64 = AtomicU64::new(0);
pub static KEYPRESS_TOTAL: AtomicU64 = AtomicU64::new(0);
pub static KEYPRESS_REPEAT: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STARTS: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_SIGNAL: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_CHANNEL: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_STREAM: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_ERROR: AtomicU64 = AtomicU64::new(0);

/// Top-level event enum consumed by the host loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Input(InputEvent),
    Command(CommandEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandEvent {
    /// The simulated persistence round-trip for the block title finished.
    SaveCompleted,
}

/// Normalized input events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
    /// Ctrl-C surfaced distinctly so the host can always quit.
    CtrlC,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Unmodified key.
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    pub fn is_escape(&self) -> bool {
        matches!(self.code, KeyCode::Esc)
    }
}

/// KeyCode enumerates normalized logical key representations consumed by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Left,
    Right,
    Home,
    End,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}

// -------------------------------------------------------------------------------------------------
// Async Event Sources
// -------------------------------------------------------------------------------------------------

/// Trait implemented by any async event producer. Implementors hold their configuration and
/// spawn one background task that pushes `Event`s into the shared channel, stopping when
/// `tx.send(..).await` fails (consumer dropped).
pub trait AsyncEventSource: Send + 'static {
    /// Stable identifier used for logging.
    fn name(&self) -> &'static str;
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

/// Emits one event after a fixed delay, then exits.
pub struct DelayedEventSource {
    delay: Duration,
    event: Event,
}

impl DelayedEventSource {
    pub fn new(delay: Duration, event: Event) -> Self {
        Self { delay, event }
    }
}

impl AsyncEventSource for DelayedEventSource {
    fn name(&self) -> &'static str {
        "delayed"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let Self { delay, event } = *self;
        tracing::debug!(target: "runtime.events", delay_ms = delay.as_millis() as u64, "delayed_source_armed");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(event).await.is_err() {
                CHANNEL_SEND_FAILURES.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            }
        })
    }
}

/// Spawn a boxed source, logging its name under the runtime target.
pub fn spawn_source(src: Box<dyn AsyncEventSource>, tx: &Sender<Event>) -> JoinHandle<()> {
    let name = src.name();
    tracing::info!(target: "runtime.events", source = name, "spawning event source");
    src.spawn(tx.clone())
}
