//! Debounced search with per-generation cancellation.
//!
//! Input text is fed through [`DebouncedSearch::push`]. A search fires only
//! after the input has been quiet for the debounce window; each keystroke
//! restarts the window. Every fired search is a new generation with its own
//! [`CancellationToken`]. Firing a newer generation cancels the older one, and
//! a cancelled generation never publishes its result. A runner may also signal
//! a context change (a new session, say), which re-runs the last text.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Default quiet period before a search fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Work performed for one fired search.
#[async_trait]
pub trait SearchRunner: Send + Sync + 'static {
    /// Value published for a completed search.
    type Output: Send + Sync + 'static;

    /// Run the search for `text`. Implementations may observe `cancel` to stop
    /// early; the driver also drops the future when the token fires.
    async fn run(&self, text: String, cancel: CancellationToken) -> Self::Output;

    /// Resolves when something other than the text changes what a search
    /// would return; the driver then re-runs the last fired text. Never
    /// resolves unless overridden.
    async fn context_changed(&self) {
        std::future::pending::<()>().await;
    }
}

/// Result of one completed, non-superseded search.
#[derive(Debug)]
pub struct SearchResult<T> {
    /// Monotonic generation, starting at 1.
    pub generation: u64,
    /// Text the search ran for.
    pub text: String,
    /// Runner output.
    pub output: T,
}

/// Latest published result, shared between subscribers.
pub type ResultSlot<T> = Option<Arc<SearchResult<T>>>;

/// Handle to a running debounced search driver.
///
/// Dropping the handle cancels in-flight work and stops the driver.
pub struct DebouncedSearch<T> {
    input: mpsc::UnboundedSender<String>,
    results: watch::Receiver<ResultSlot<T>>,
    shutdown: CancellationToken,
    driver: JoinHandle<()>,
}

impl<T> DebouncedSearch<T>
where
    T: Send + Sync + 'static,
{
    /// Spawn a driver for `runner` on the current tokio runtime.
    pub fn spawn<R>(runner: Arc<R>, debounce: Duration) -> Self
    where
        R: SearchRunner<Output = T>,
    {
        let (input, inbox) = mpsc::unbounded_channel();
        let (publisher, results) = watch::channel(None);
        let shutdown = CancellationToken::new();
        let driver = tokio::spawn(drive(
            runner,
            debounce,
            inbox,
            Arc::new(publisher),
            shutdown.clone(),
        ));
        Self {
            input,
            results,
            shutdown,
            driver,
        }
    }

    /// Record new search text, restarting the debounce window.
    pub fn push(&self, text: impl Into<String>) {
        if self.input.send(text.into()).is_err() {
            warn!("search driver stopped; input dropped");
        }
    }

    /// Most recently published result.
    pub fn latest(&self) -> ResultSlot<T> {
        self.results.borrow().clone()
    }

    /// Receiver notified whenever a result is published.
    pub fn subscribe(&self) -> watch::Receiver<ResultSlot<T>> {
        self.results.clone()
    }

    /// Wait for the next published result. Returns `None` once the driver
    /// has stopped.
    pub async fn next_result(&mut self) -> ResultSlot<T> {
        self.results.changed().await.ok()?;
        self.results.borrow_and_update().clone()
    }
}

impl<T> Drop for DebouncedSearch<T> {
    fn drop(&mut self) {
        self.shutdown.cancel();
        self.driver.abort();
    }
}

async fn drive<R>(
    runner: Arc<R>,
    debounce: Duration,
    mut inbox: mpsc::UnboundedReceiver<String>,
    publisher: Arc<watch::Sender<ResultSlot<R::Output>>>,
    shutdown: CancellationToken,
) where
    R: SearchRunner,
{
    let mut generations = Generations {
        runner: Arc::clone(&runner),
        publisher,
        shutdown: shutdown.clone(),
        generation: 0,
        in_flight: None,
        last_text: None,
    };
    let mut pending: Option<String> = None;

    loop {
        tokio::select! {
            () = shutdown.cancelled() => break,
            received = inbox.recv() => match received {
                Some(text) => pending = Some(text),
                None => break,
            },
            () = sleep(debounce), if pending.is_some() => {
                if let Some(text) = pending.take() {
                    generations.fire(text);
                }
            }
            () = runner.context_changed() => {
                // Pending input will run against the new context anyway.
                if let (None, Some(text)) = (&pending, generations.last_text.clone()) {
                    debug!(%text, "search context changed");
                    generations.fire(text);
                }
            }
        }
    }

    generations.cancel_in_flight();
}

/// Bookkeeping for fired searches.
struct Generations<R: SearchRunner> {
    runner: Arc<R>,
    publisher: Arc<watch::Sender<ResultSlot<R::Output>>>,
    shutdown: CancellationToken,
    generation: u64,
    in_flight: Option<CancellationToken>,
    last_text: Option<String>,
}

impl<R: SearchRunner> Generations<R> {
    fn fire(&mut self, text: String) {
        self.generation += 1;
        let generation = self.generation;
        let token = self.shutdown.child_token();
        if let Some(previous) = self.in_flight.replace(token.clone()) {
            previous.cancel();
        }
        debug!(generation, %text, "search fired");
        self.last_text = Some(text.clone());
        tokio::spawn(run_generation(
            Arc::clone(&self.runner),
            Arc::clone(&self.publisher),
            generation,
            text,
            token,
        ));
    }

    fn cancel_in_flight(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}

async fn run_generation<R>(
    runner: Arc<R>,
    publisher: Arc<watch::Sender<ResultSlot<R::Output>>>,
    generation: u64,
    text: String,
    token: CancellationToken,
) where
    R: SearchRunner,
{
    let output = tokio::select! {
        () = token.cancelled() => {
            debug!(generation, "search superseded before completion");
            return;
        }
        output = runner.run(text.clone(), token.clone()) => output,
    };

    let result = Arc::new(SearchResult {
        generation,
        text,
        output,
    });
    let published = publisher.send_if_modified(|slot| {
        let newer_published = slot.as_ref().is_some_and(|r| r.generation > generation);
        if token.is_cancelled() || newer_published {
            return false;
        }
        *slot = Some(result);
        true
    });
    if !published {
        debug!(generation, "search result discarded");
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// Records each run and takes `delay` to answer.
    struct Recorder {
        delay: Duration,
        runs: Mutex<Vec<String>>,
        context: Notify,
    }

    impl Recorder {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                delay,
                runs: Mutex::new(Vec::new()),
                context: Notify::new(),
            })
        }

        fn runs(&self) -> Vec<String> {
            self.runs.lock().expect("runs lock").clone()
        }
    }

    #[async_trait]
    impl SearchRunner for Recorder {
        type Output = usize;

        async fn run(&self, text: String, _cancel: CancellationToken) -> usize {
            self.runs.lock().expect("runs lock").push(text.clone());
            sleep(self.delay).await;
            text.len()
        }

        async fn context_changed(&self) {
            self.context.notified().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn keystrokes_within_the_window_fire_once() {
        let recorder = Recorder::new(Duration::ZERO);
        let mut search = DebouncedSearch::spawn(Arc::clone(&recorder), DEFAULT_DEBOUNCE);

        for text in ["r", "ru", "rus", "rust"] {
            search.push(text);
            sleep(Duration::from_millis(100)).await;
        }
        let result = search.next_result().await.expect("result");

        assert_eq!(recorder.runs(), ["rust"]);
        assert_eq!(result.generation, 1);
        assert_eq!(result.text, "rust");
        assert_eq!(result.output, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_fires_before_the_window_elapses() {
        let recorder = Recorder::new(Duration::ZERO);
        let search = DebouncedSearch::spawn(Arc::clone(&recorder), DEFAULT_DEBOUNCE);

        search.push("rust");
        sleep(Duration::from_millis(299)).await;
        assert!(recorder.runs().is_empty());
        assert!(search.latest().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_searches_never_publish() {
        let recorder = Recorder::new(Duration::from_secs(2));
        let mut search = DebouncedSearch::spawn(Arc::clone(&recorder), DEFAULT_DEBOUNCE);

        search.push("slow");
        sleep(Duration::from_millis(400)).await;
        search.push("fresh");
        let result = search.next_result().await.expect("result");

        assert_eq!(recorder.runs(), ["slow", "fresh"]);
        assert_eq!(result.generation, 2);
        assert_eq!(result.text, "fresh");

        sleep(Duration::from_secs(5)).await;
        assert_eq!(search.latest().map(|r| r.generation), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn separate_pauses_fire_separate_generations() {
        let recorder = Recorder::new(Duration::ZERO);
        let mut search = DebouncedSearch::spawn(Arc::clone(&recorder), DEFAULT_DEBOUNCE);

        search.push("go");
        let first = search.next_result().await.expect("first");
        search.push("rust");
        let second = search.next_result().await.expect("second");

        assert_eq!((first.generation, second.generation), (1, 2));
        assert_eq!(recorder.runs(), ["go", "rust"]);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_cancels_pending_work() {
        let recorder = Recorder::new(Duration::ZERO);
        let search = DebouncedSearch::spawn(Arc::clone(&recorder), DEFAULT_DEBOUNCE);
        let mut receiver = search.subscribe();

        search.push("rust");
        drop(search);
        sleep(Duration::from_secs(1)).await;

        assert!(recorder.runs().is_empty());
        assert!(receiver.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn context_change_reruns_the_last_text() {
        let recorder = Recorder::new(Duration::ZERO);
        let mut search = DebouncedSearch::spawn(Arc::clone(&recorder), DEFAULT_DEBOUNCE);

        search.push("rust");
        let first = search.next_result().await.expect("first");
        recorder.context.notify_one();
        let second = search.next_result().await.expect("second");

        assert_eq!((first.generation, second.generation), (1, 2));
        assert_eq!(second.text, "rust");
        assert_eq!(recorder.runs(), ["rust", "rust"]);
    }

    #[tokio::test(start_paused = true)]
    async fn context_change_before_any_search_fires_nothing() {
        let recorder = Recorder::new(Duration::ZERO);
        let search = DebouncedSearch::spawn(Arc::clone(&recorder), DEFAULT_DEBOUNCE);

        recorder.context.notify_one();
        sleep(Duration::from_secs(1)).await;

        assert!(recorder.runs().is_empty());
        assert!(search.latest().is_none());
    }
}
