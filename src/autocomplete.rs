//! Address autocomplete controller.
//!
//! One task owns all widget state. Keystrokes and selections arrive through an
//! [`AutocompleteHandle`], debounce expiry is a sleep inside the same loop, and
//! search calls run on spawned tasks that report back with their session id.
//! Every transition therefore happens on the controller task, one event at a
//! time, and the state is published to subscribers as a [`Snapshot`].

use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{sleep_until, Instant},
};

use crate::{
    client::{Search, SearchError},
    debounce::Debouncer,
    models::{AddressSuggestion, SearchConfig},
    options::OptionList,
    session::{QuerySessions, SessionId},
};

/// True when `text` is long enough (trimmed, in characters) to search for.
pub fn is_searchable(text: &str, min_chars: usize) -> bool {
    text.trim().chars().count() >= min_chars
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub debounce: Duration,
    pub min_chars: usize,
    pub page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for Settings {
    fn from(cfg: &SearchConfig) -> Self {
        Self {
            debounce: Duration::from_millis(cfg.debounce_ms),
            min_chars: cfg.min_chars,
            page_size: cfg.page_size,
        }
    }
}

/// Observable widget state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub input_text: String,
    pub selected: Option<AddressSuggestion>,
    pub options: OptionList,
    pub loading: bool,
    /// Message of the last failed search. Cleared by the next successful
    /// search or when the input drops below the minimum length.
    pub error: Option<String>,
}

#[derive(Debug, Error)]
#[error("autocomplete controller has stopped")]
pub struct Stopped;

#[derive(Debug)]
enum Event {
    Input(String),
    Select(Option<AddressSuggestion>),
    Shutdown,
}

#[derive(Debug)]
struct Completion {
    id: SessionId,
    result: Result<Vec<AddressSuggestion>, SearchError>,
}

/// Cloneable front end to a running controller. The controller tears down
/// (cancelling any pending work) once every handle is dropped.
#[derive(Debug, Clone)]
pub struct AutocompleteHandle {
    events: mpsc::UnboundedSender<Event>,
    state: watch::Receiver<Snapshot>,
}

impl AutocompleteHandle {
    /// Replace the input text.
    pub fn set_input(&self, text: impl Into<String>) -> Result<(), Stopped> {
        self.send(Event::Input(text.into()))
    }

    /// Change the selected value. `None` clears the selection.
    pub fn select(&self, value: Option<AddressSuggestion>) -> Result<(), Stopped> {
        self.send(Event::Select(value))
    }

    /// Stop the controller and cancel pending work.
    pub fn shutdown(&self) {
        // Already stopped is fine.
        let _ = self.send(Event::Shutdown);
    }

    /// Current state.
    pub fn snapshot(&self) -> Snapshot {
        self.state.borrow().clone()
    }

    /// Receiver that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.state.clone()
    }

    fn send(&self, ev: Event) -> Result<(), Stopped> {
        self.events.send(ev).map_err(|_| Stopped)
    }
}

/// Start a controller on the current tokio runtime.
pub fn spawn<S: Search>(client: Arc<S>, settings: Settings) -> (AutocompleteHandle, JoinHandle<()>) {
    let (ctl, handle) = Autocomplete::new(client, settings);
    (handle, tokio::spawn(ctl.run()))
}

pub struct Autocomplete<S: Search> {
    client: Arc<S>,
    settings: Settings,
    state: Snapshot,

    debouncer: Debouncer,
    sessions: QuerySessions,

    events: mpsc::UnboundedReceiver<Event>,
    done_tx: mpsc::UnboundedSender<Completion>,
    done_rx: mpsc::UnboundedReceiver<Completion>,
    publish: watch::Sender<Snapshot>,
}

impl<S: Search> Autocomplete<S> {
    pub fn new(client: Arc<S>, settings: Settings) -> (Self, AutocompleteHandle) {
        let (ev_tx, ev_rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        let (publish, state) = watch::channel(Snapshot::default());

        let ctl = Self {
            client,
            settings,
            state: Snapshot::default(),
            debouncer: Debouncer::new(settings.debounce),
            sessions: QuerySessions::new(),
            events: ev_rx,
            done_tx,
            done_rx,
            publish,
        };

        let handle = AutocompleteHandle {
            events: ev_tx,
            state,
        };

        (ctl, handle)
    }

    /// Process events until shutdown or until every handle is dropped.
    pub async fn run(mut self) {
        loop {
            let deadline = self.debouncer.deadline();

            tokio::select! {
                ev = self.events.recv() => match ev {
                    Some(Event::Input(text)) => self.on_input(text),
                    Some(Event::Select(value)) => self.on_select(value),
                    Some(Event::Shutdown) | None => break,
                },

                Some(done) = self.done_rx.recv() => self.on_complete(done),

                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.on_debounce();
                }
            }

            self.publish();
        }

        self.teardown();
        self.publish();
    }

    fn on_input(&mut self, text: String) {
        self.state.input_text = text;
        self.evaluate();
    }

    fn on_select(&mut self, value: Option<AddressSuggestion>) {
        if let Some(v) = &value {
            self.state.options.prepend(v.clone());
        }
        self.state.selected = value;

        // Results still in flight were requested for the old selection.
        self.evaluate();
    }

    /// Re-evaluate the current input: cancel what is in flight, then either
    /// collapse the options (input too short) or restart the quiet period.
    fn evaluate(&mut self) {
        self.cancel_active();

        if !is_searchable(&self.state.input_text, self.settings.min_chars) {
            self.debouncer.cancel();
            self.state.options = OptionList::selection_only(self.state.selected.as_ref());
            self.state.error = None;
            return;
        }

        self.debouncer
            .schedule(self.state.input_text.clone(), Instant::now());
    }

    fn on_debounce(&mut self) {
        if let Some(query) = self.debouncer.take_ready(Instant::now()) {
            self.start_search(query);
        }
    }

    fn start_search(&mut self, query: String) {
        let (id, token) = self.sessions.begin();
        self.state.loading = true;
        log::debug!("search {}: {:?}", id, query);

        let client = Arc::clone(&self.client);
        let done = self.done_tx.clone();
        let page_size = self.settings.page_size;

        tokio::spawn(async move {
            let result = client.search(&query, page_size, token).await;

            // The receiver is gone only if the controller has stopped.
            let _ = done.send(Completion { id, result });
        });
    }

    fn on_complete(&mut self, done: Completion) {
        if !self.sessions.finish(done.id) {
            log::debug!("search {}: discarding superseded result", done.id);
            return;
        }
        self.state.loading = false;

        match done.result {
            Ok(found) => {
                log::debug!("search {}: {} results", done.id, found.len());
                self.state.options = OptionList::merge(self.state.selected.as_ref(), found);
                self.state.error = None;
            }

            Err(e) if e.is_cancelled() => {
                log::debug!("search {}: cancelled", done.id);
            }

            Err(e) => {
                log::warn!("address search failed: {}", e);
                self.state.options = OptionList::selection_only(self.state.selected.as_ref());
                self.state.error = Some(e.to_string());
            }
        }
    }

    fn cancel_active(&mut self) {
        if let Some(id) = self.sessions.cancel_active() {
            log::debug!("search {}: cancelled", id);
        }
        self.state.loading = false;
    }

    fn teardown(&mut self) {
        self.debouncer.cancel();
        self.cancel_active();
    }

    fn publish(&self) {
        self.publish.send_if_modified(|cur| {
            if *cur == self.state {
                return false;
            }
            *cur = self.state.clone();
            true
        });
    }
}
