//! Timed writers and the per-surface driver that keeps them exclusive.
//!
//! [`reveal`] is the bare primitive: it spawns a task that steps a
//! [`RevealState`] on a fixed interval and appends each commit to the
//! surface. Two bare reveals on one surface interleave. [`SurfaceDriver`]
//! owns a surface and at most one active writer, cancelling the previous
//! writer whenever a new one starts.

use std::sync::Arc;
use std::time::Duration;

use chatwidget_core::DisplaySurface;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Interval};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::loader::LoaderState;
use crate::state::{RevealState, Tick};

/// Default delay between two reveal steps.
pub const DEFAULT_REVEAL_TICK: Duration = Duration::from_millis(20);

/// Default delay between two loader frames.
pub const DEFAULT_LOADER_TICK: Duration = Duration::from_millis(300);

/// A surface shared between the driver and its writer task.
pub type SharedSurface<S> = Arc<Mutex<S>>;

/// Tick intervals for the timed writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub reveal_tick: Duration,
    pub loader_tick: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            reveal_tick: DEFAULT_REVEAL_TICK,
            loader_tick: DEFAULT_LOADER_TICK,
        }
    }
}

/// How a reveal ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    Completed,
    Cancelled,
}

/// Handle to a running reveal. Dropping it leaves the reveal running.
#[derive(Debug)]
pub struct RevealHandle {
    token: CancellationToken,
    task: JoinHandle<RevealOutcome>,
}

impl RevealHandle {
    /// Stops the reveal before its next step.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits until the reveal has written everything or was cancelled.
    pub async fn finished(self) -> RevealOutcome {
        self.task.await.unwrap_or(RevealOutcome::Cancelled)
    }
}

/// Starts revealing `markup` into `surface`, one character per `tick`.
///
/// Nothing is cleared first; the caller hands over a fresh surface.
pub fn reveal<S>(markup: impl Into<String>, surface: SharedSurface<S>, tick: Duration) -> RevealHandle
where
    S: DisplaySurface + 'static,
{
    let token = CancellationToken::new();
    let task = tokio::spawn(run_reveal(
        RevealState::new(markup),
        surface,
        tick,
        token.clone(),
    ));
    RevealHandle { token, task }
}

fn ticker(period: Duration) -> Interval {
    // The first tick is due one period after start, like a browser interval.
    time::interval_at(time::Instant::now() + period, period)
}

async fn run_reveal<S: DisplaySurface>(
    mut state: RevealState,
    surface: SharedSurface<S>,
    tick: Duration,
    token: CancellationToken,
) -> RevealOutcome {
    let mut interval = ticker(tick);
    debug!(len = state.markup().len(), tick_ms = tick.as_millis() as u64, "Reveal started");

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!(committed = state.committed().len(), "Reveal cancelled");
                return RevealOutcome::Cancelled;
            }
            _ = interval.tick() => {}
        }

        let mut surface = surface.lock().await;
        // A newer writer may have taken over while we waited for the lock.
        if token.is_cancelled() {
            return RevealOutcome::Cancelled;
        }
        match state.step() {
            Tick::Commit(chunk) => surface.append_markup(&chunk),
            Tick::Buffered => {}
            Tick::Done => {
                debug!(committed = state.committed().len(), "Reveal completed");
                return RevealOutcome::Completed;
            }
        }
    }
}

async fn run_loader<S: DisplaySurface>(
    surface: SharedSurface<S>,
    tick: Duration,
    token: CancellationToken,
) {
    let mut loader = LoaderState::new();
    let mut interval = ticker(tick);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => return,
            _ = interval.tick() => {}
        }

        let mut surface = surface.lock().await;
        if token.is_cancelled() {
            return;
        }
        surface.set_text(&loader.next_frame());
    }
}

/// Owns one display surface and guarantees a single active timed writer.
pub struct SurfaceDriver<S: DisplaySurface + 'static> {
    surface: SharedSurface<S>,
    timing: Timing,
    active: Option<CancellationToken>,
}

impl<S: DisplaySurface + 'static> SurfaceDriver<S> {
    pub fn new(surface: S, timing: Timing) -> Self {
        Self::with_shared(Arc::new(Mutex::new(surface)), timing)
    }

    pub fn with_shared(surface: SharedSurface<S>, timing: Timing) -> Self {
        Self {
            surface,
            timing,
            active: None,
        }
    }

    pub fn surface(&self) -> SharedSurface<S> {
        Arc::clone(&self.surface)
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Cancels the active writer, if any.
    pub fn stop(&mut self) {
        if let Some(token) = self.active.take() {
            token.cancel();
        }
    }

    /// Replaces the content with the loader and animates it until the next
    /// writer starts.
    pub async fn start_loader(&mut self) {
        self.stop();
        self.surface.lock().await.set_text("");

        let token = CancellationToken::new();
        tokio::spawn(run_loader(
            Arc::clone(&self.surface),
            self.timing.loader_tick,
            token.clone(),
        ));
        self.active = Some(token);
    }

    /// Cancels whatever was writing and starts revealing `markup`.
    pub fn reveal(&mut self, markup: impl Into<String>) -> RevealHandle {
        self.stop();
        let handle = reveal(markup, Arc::clone(&self.surface), self.timing.reveal_tick);
        self.active = Some(handle.token.clone());
        handle
    }

    /// Cancels the active writer and empties the surface.
    pub async fn clear(&mut self) {
        self.stop();
        self.surface.lock().await.clear();
    }

    /// Cancels the active writer and shows static text.
    pub async fn show_text(&mut self, text: &str) {
        self.stop();
        self.surface.lock().await.set_text(text);
    }
}

impl<S: DisplaySurface + 'static> Drop for SurfaceDriver<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatwidget_core::MarkupBuffer;

    fn fast() -> Timing {
        Timing {
            reveal_tick: Duration::from_millis(20),
            loader_tick: Duration::from_millis(300),
        }
    }

    async fn content(surface: &SharedSurface<MarkupBuffer>) -> String {
        surface.lock().await.content().to_string()
    }

    #[tokio::test(start_paused = true)]
    async fn reveal_writes_full_markup() {
        let markup = chatwidget_markdown::render("# Hi\n\nSome **bold** text");
        let surface = Arc::new(Mutex::new(MarkupBuffer::new()));

        let outcome = reveal(markup.clone(), Arc::clone(&surface), DEFAULT_REVEAL_TICK)
            .finished()
            .await;

        assert_eq!(outcome, RevealOutcome::Completed);
        assert_eq!(content(&surface).await, markup);
        let guard = surface.lock().await;
        assert!(guard.commits().contains(&"<strong>".to_string()));
        assert!(guard.commits().iter().all(|c| c.chars().count() == 1 || c.ends_with('>')));
    }

    #[tokio::test(start_paused = true)]
    async fn reveal_steps_once_per_tick() {
        let surface = Arc::new(Mutex::new(MarkupBuffer::new()));
        let _handle = reveal("abcdef", Arc::clone(&surface), Duration::from_millis(20));

        time::sleep(Duration::from_millis(70)).await;
        assert_eq!(content(&surface).await, "abc");
    }

    #[tokio::test(start_paused = true)]
    async fn reveal_appends_to_existing_content() {
        let mut buf = MarkupBuffer::new();
        buf.append_markup("> ");
        let surface = Arc::new(Mutex::new(buf));

        reveal("<p>x</p>", Arc::clone(&surface), DEFAULT_REVEAL_TICK)
            .finished()
            .await;
        assert_eq!(content(&surface).await, "> <p>x</p>");
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_reveal_stops_writing() {
        let surface = Arc::new(Mutex::new(MarkupBuffer::new()));
        let handle = reveal("abcdef", Arc::clone(&surface), Duration::from_millis(20));

        time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
        assert_eq!(handle.finished().await, RevealOutcome::Cancelled);

        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(content(&surface).await, "ab");
    }

    #[tokio::test(start_paused = true)]
    async fn unguarded_reveals_interleave() {
        let surface = Arc::new(Mutex::new(MarkupBuffer::new()));
        let first = reveal("aaaa", Arc::clone(&surface), Duration::from_millis(20));
        let second = reveal("bbbb", Arc::clone(&surface), Duration::from_millis(20));
        first.finished().await;
        second.finished().await;

        let text = content(&surface).await;
        assert_eq!(text.len(), 8);
        assert_ne!(text, "aaaabbbb");
    }

    #[tokio::test(start_paused = true)]
    async fn last_reveal_wins_on_driver() {
        let mut driver = SurfaceDriver::new(MarkupBuffer::new(), fast());
        let first = driver.reveal("<p>first reply</p>");
        time::sleep(Duration::from_millis(130)).await;

        let second = driver.reveal("<p>second</p>");
        assert_eq!(first.finished().await, RevealOutcome::Cancelled);
        assert_eq!(second.finished().await, RevealOutcome::Completed);

        time::sleep(Duration::from_secs(1)).await;
        let text = content(&driver.surface()).await;
        assert!(text.ends_with("<p>second</p>"));
        let leftover = text.strip_suffix("<p>second</p>").unwrap_or_default();
        assert!("<p>first reply</p>".starts_with(leftover));
        assert!(leftover.len() < "<p>first reply</p>".len());
    }

    #[tokio::test(start_paused = true)]
    async fn loader_cycles_dots() {
        let mut driver = SurfaceDriver::new(MarkupBuffer::new(), fast());
        driver.start_loader().await;
        let surface = driver.surface();

        time::sleep(Duration::from_millis(310)).await;
        let mut seen = vec![content(&surface).await];
        for _ in 0..4 {
            time::sleep(Duration::from_millis(300)).await;
            seen.push(content(&surface).await);
        }
        assert_eq!(seen, [".", "..", "...", "", "."]);
    }

    #[tokio::test(start_paused = true)]
    async fn reveal_cancels_loader() {
        let mut driver = SurfaceDriver::new(MarkupBuffer::new(), fast());
        driver.start_loader().await;
        time::sleep(Duration::from_millis(650)).await;
        assert_eq!(content(&driver.surface()).await, "..");

        driver.clear().await;
        driver.reveal("<em>ok</em>").finished().await;
        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(content(&driver.surface()).await, "<em>ok</em>");
    }

    #[tokio::test(start_paused = true)]
    async fn show_text_replaces_active_writer() {
        let mut driver = SurfaceDriver::new(MarkupBuffer::new(), fast());
        let handle = driver.reveal("<p>long reply</p>");
        driver.show_text("Something went wrong").await;
        assert_eq!(handle.finished().await, RevealOutcome::Cancelled);
        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(content(&driver.surface()).await, "Something went wrong");
    }
}
