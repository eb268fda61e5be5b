use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receiver for progress of long-running pixel work.
///
/// Implementations must not block. `is_cancelled` is polled at every report.
pub trait ProgressSink {
    /// Announce the operation that is about to run.
    fn start(&mut self, _message: &str) {}

    /// Fraction done, 0.0..=1.0.
    fn report(&mut self, fraction: f64);

    fn is_cancelled(&self) -> bool {
        false
    }
}

impl<P: ProgressSink + ?Sized> ProgressSink for &mut P {
    fn start(&mut self, message: &str) {
        (**self).start(message)
    }

    fn report(&mut self, fraction: f64) {
        (**self).report(fraction)
    }

    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _fraction: f64) {}
}

/// Logs progress through `tracing`, once per 10%.
#[derive(Debug, Default)]
pub struct TracingProgress {
    message: String,
    last_decile: Option<u32>,
}

impl TracingProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressSink for TracingProgress {
    fn start(&mut self, message: &str) {
        self.message = message.to_string();
        self.last_decile = None;
        tracing::info!("{}", message);
    }

    fn report(&mut self, fraction: f64) {
        let decile = (fraction.clamp(0.0, 1.0) * 10.0).floor() as u32;
        if self.last_decile == Some(decile) {
            return;
        }
        self.last_decile = Some(decile);
        tracing::debug!(
            task = %self.message,
            percent = decile * 10,
            "Progress"
        );
    }
}

/// Shared cancellation flag.
#[derive(Debug, Default, Clone)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Wraps a sink and reports cancellation from a [`CancelToken`].
#[derive(Debug)]
pub struct Cancellable<P> {
    inner: P,
    token: CancelToken,
}

impl<P: ProgressSink> Cancellable<P> {
    pub fn new(inner: P, token: CancelToken) -> Self {
        Self { inner, token }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: ProgressSink> ProgressSink for Cancellable<P> {
    fn start(&mut self, message: &str) {
        self.inner.start(message)
    }

    fn report(&mut self, fraction: f64) {
        self.inner.report(fraction)
    }

    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.inner.is_cancelled()
    }
}
