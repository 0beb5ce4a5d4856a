use crate::key_token::{KeyPressParts, is_ctrl_c, map_key_event};
use core_events::{
    ASYNC_INPUT_STARTS, ASYNC_INPUT_STOP_CHANNEL, ASYNC_INPUT_STOP_ERROR, ASYNC_INPUT_STOP_SIGNAL,
    ASYNC_INPUT_STOP_STREAM, CHANNEL_SEND_FAILURES, Event, InputEvent, KEYPRESS_REPEAT,
    KEYPRESS_TOTAL, KeyCode,
};
use crossterm::event::{Event as CEvent, EventStream, KeyEvent as CKeyEvent};
use std::io;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::StreamExt;
use tracing::{info, trace, warn};

#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Debug)]
struct ShutdownListener {
    notify: Arc<Notify>,
}

impl ShutdownListener {
    fn new_pair() -> (AsyncInputShutdown, Self) {
        let notify = Arc::new(Notify::new());
        (
            AsyncInputShutdown {
                notify: notify.clone(),
            },
            ShutdownListener { notify },
        )
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Spawn a Tokio task forwarding `EventStream` input into the host channel.
pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let (shutdown, listener) = ShutdownListener::new_pair();
    let handle = task::spawn(async move {
        let span = tracing::debug_span!(target: "input.thread", "input_async_task");
        let _enter = span.enter();
        AsyncEventStreamTask::new(sender, EventStream::new(), listener)
            .run()
            .await;
    });
    (handle, shutdown)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }

    fn counter(&self) -> &'static std::sync::atomic::AtomicU64 {
        match self {
            ExitReason::ShutdownSignal => &ASYNC_INPUT_STOP_SIGNAL,
            ExitReason::ChannelClosed => &ASYNC_INPUT_STOP_CHANNEL,
            ExitReason::StreamEnded => &ASYNC_INPUT_STOP_STREAM,
            ExitReason::StreamError => &ASYNC_INPUT_STOP_ERROR,
        }
    }
}

struct AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    sender: Sender<Event>,
    stream: S,
    shutdown: ShutdownListener,
    stream_error: Option<io::ErrorKind>,
}

impl<S> AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    fn new(sender: Sender<Event>, stream: S, shutdown: ShutdownListener) -> Self {
        Self {
            sender,
            stream,
            shutdown,
            stream_error: None,
        }
    }

    async fn run(mut self) {
        info!(target: "input.thread", "async_input_task_started");
        ASYNC_INPUT_STARTS.fetch_add(1, Ordering::Relaxed);
        let reason = loop {
            let maybe_result = tokio::select! {
                biased;
                _ = self.shutdown.wait() => break ExitReason::ShutdownSignal,
                result = self.stream.next() => result,
            };
            let Some(result) = maybe_result else {
                break ExitReason::StreamEnded;
            };
            let sent = match result {
                Ok(CEvent::Key(key)) => self.handle_key_event(key).await,
                Ok(CEvent::Resize(w, h)) => {
                    trace!(target: "input.event", w, h, "resize");
                    self.send_event(Event::Input(InputEvent::Resize(w, h))).await
                }
                Ok(_) => true,
                Err(err) => {
                    self.stream_error = Some(err.kind());
                    break ExitReason::StreamError;
                }
            };
            if !sent {
                break ExitReason::ChannelClosed;
            }
        };

        reason.counter().fetch_add(1, Ordering::Relaxed);
        if let Some(kind) = self.stream_error {
            warn!(target: "input.thread", error_kind = ?kind, "async_input_task_stream_error");
        }
        info!(target: "input.thread", reason = reason.as_str(), "async_input_task_stopped");
    }

    async fn handle_key_event(&mut self, key: CKeyEvent) -> bool {
        if is_ctrl_c(&key) {
            return self.send_event(Event::Input(InputEvent::CtrlC)).await;
        }
        match map_key_event(&key) {
            Some(parts) => self.emit_keypress(parts).await,
            None => true,
        }
    }

    async fn emit_keypress(&mut self, parts: KeyPressParts) -> bool {
        let KeyPressParts { key, repeat } = parts;
        // Characters are user content and never logged.
        trace!(
            target: "input.event",
            kind = "keypress",
            repeat,
            mods = ?key.mods,
            key_kind = key_kind_label(key.code)
        );
        let sent = self.send_event(Event::Input(InputEvent::Key(key))).await;
        if sent {
            KEYPRESS_TOTAL.fetch_add(1, Ordering::Relaxed);
            if repeat {
                KEYPRESS_REPEAT.fetch_add(1, Ordering::Relaxed);
            }
        }
        sent
    }

    async fn send_event(&mut self, event: Event) -> bool {
        if self.sender.send(event).await.is_ok() {
            return true;
        }
        CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
        false
    }
}

fn key_kind_label(code: KeyCode) -> &'static str {
    match code {
        KeyCode::Char(_) => "char",
        KeyCode::Enter => "enter",
        KeyCode::Esc => "esc",
        KeyCode::Backspace | KeyCode::Delete => "delete",
        KeyCode::Tab | KeyCode::BackTab => "tab",
        KeyCode::Left | KeyCode::Right | KeyCode::Home | KeyCode::End => "motion",
    }
}
