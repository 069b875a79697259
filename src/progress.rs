//! Progress reporting for long-running refreshes
//!
//! A refresh starts one handle from a `ProgressSink` and closes it exactly
//! once. `ProgressGuard` owns the handle and closes it on drop, so early
//! returns and unwinding panics still complete the progress UI.

use crossbeam::channel::Sender;

use crate::ui::{ProgressEvent, Spinner};

/// An in-flight progress indicator
pub trait ProgressHandle: Send {
    /// Update the status line
    fn report(&mut self, _message: &str) {}

    /// Complete the indicator; consumes the handle
    fn close(self: Box<Self>);
}

/// Factory for progress handles
pub trait ProgressSink: Send + Sync {
    fn start(&self, label: &str) -> Box<dyn ProgressHandle>;
}

/// Closes the wrapped handle exactly once
pub struct ProgressGuard {
    handle: Option<Box<dyn ProgressHandle>>,
}

impl ProgressGuard {
    pub fn start(sink: &dyn ProgressSink, label: &str) -> Self {
        Self {
            handle: Some(sink.start(label)),
        }
    }

    /// A guard without a handle; reports and close are no-ops
    pub fn detached() -> Self {
        Self { handle: None }
    }

    pub fn report(&mut self, message: &str) {
        if let Some(handle) = self.handle.as_mut() {
            handle.report(message);
        }
    }

    pub fn close(mut self) {
        self.close_inner();
    }

    fn close_inner(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.close();
        }
    }
}

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        self.close_inner();
    }
}

/// Discards all progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

struct NoHandle;

impl ProgressHandle for NoHandle {
    fn close(self: Box<Self>) {}
}

impl ProgressSink for NoProgress {
    fn start(&self, _label: &str) -> Box<dyn ProgressHandle> {
        Box::new(NoHandle)
    }
}

/// Forwards progress as `ProgressEvent`s over a channel
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    tx: Sender<ProgressEvent>,
}

impl ChannelProgress {
    pub fn new(tx: Sender<ProgressEvent>) -> Self {
        Self { tx }
    }
}

struct ChannelHandle {
    label: String,
    tx: Sender<ProgressEvent>,
}

impl ProgressHandle for ChannelHandle {
    fn report(&mut self, message: &str) {
        // A dropped receiver just means nobody is watching
        self.tx
            .send(ProgressEvent::Message {
                label: self.label.clone(),
                message: message.to_string(),
            })
            .ok();
    }

    fn close(self: Box<Self>) {
        self.tx.send(ProgressEvent::Finished { label: self.label }).ok();
    }
}

impl ProgressSink for ChannelProgress {
    fn start(&self, label: &str) -> Box<dyn ProgressHandle> {
        self.tx
            .send(ProgressEvent::Started {
                label: label.to_string(),
            })
            .ok();
        Box::new(ChannelHandle {
            label: label.to_string(),
            tx: self.tx.clone(),
        })
    }
}

/// Terminal spinner, hidden when stdout is not a terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinnerProgress;

struct SpinnerHandle {
    label: String,
    spinner: Spinner,
}

impl ProgressHandle for SpinnerHandle {
    fn report(&mut self, message: &str) {
        self.spinner.set_message(&format!("{}: {}", self.label, message));
    }

    fn close(self: Box<Self>) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressSink for SpinnerProgress {
    fn start(&self, label: &str) -> Box<dyn ProgressHandle> {
        Box::new(SpinnerHandle {
            label: label.to_string(),
            spinner: Spinner::new(label),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_closes_on_drop() {
        let (tx, rx) = crossbeam::channel::unbounded();
        let sink = ChannelProgress::new(tx);

        {
            let mut guard = ProgressGuard::start(&sink, "Indexing");
            guard.report("pkg");
        }

        let events: Vec<ProgressEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                ProgressEvent::Started { label: "Indexing".into() },
                ProgressEvent::Message { label: "Indexing".into(), message: "pkg".into() },
                ProgressEvent::Finished { label: "Indexing".into() },
            ]
        );
    }

    #[test]
    fn test_explicit_close_happens_once() {
        let (tx, rx) = crossbeam::channel::unbounded();
        let sink = ChannelProgress::new(tx);

        ProgressGuard::start(&sink, "Indexing").close();

        let finished = rx
            .try_iter()
            .filter(|e| matches!(e, ProgressEvent::Finished { .. }))
            .count();
        assert_eq!(finished, 1);
    }
}
