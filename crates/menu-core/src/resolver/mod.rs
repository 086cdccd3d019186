//! URL-driven menu identifier resolution.
//!
//! The resolver reads one query parameter, normalizes it, checks it against
//! the known set and publishes the result. It never performs network I/O;
//! whoever loads menus follows its published identifier.

mod known;
mod ports;
mod state;


pub use known::KnownIdentifierSet;
pub use ports::{HistoryPort, MemoryHistory, NavigationEvent, UrlProvider};
pub use state::UrlSyncState;

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use url::Url;

use crate::url_model::{get_query_param, normalize, remove_query_param, set_query_param, Identifier};

/// How `navigate_to` records the change in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Overwrite the current entry instead of adding one.
    pub replace_history: bool,
}

impl Default for NavigateOptions {
    fn default() -> Self {
        Self {
            replace_history: true,
        }
    }
}

impl NavigateOptions {
    pub fn push() -> Self {
        Self {
            replace_history: false,
        }
    }
}

pub struct IdentifierResolver {
    location: Arc<dyn UrlProvider>,
    history: Arc<dyn HistoryPort>,
    known: KnownIdentifierSet,
    param: String,
    state: watch::Sender<UrlSyncState>,
}

impl IdentifierResolver {
    /// Builds the resolver and performs the initial sync against the current
    /// URL (including the one-time normalization rewrite).
    pub fn new(
        location: Arc<dyn UrlProvider>,
        history: Arc<dyn HistoryPort>,
        known: KnownIdentifierSet,
        param: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(UrlSyncState::default());
        let resolver = Self {
            location,
            history,
            known,
            param: param.into(),
            state,
        };
        resolver.refresh();
        resolver
    }

    /// Convenience for the common case where one object provides both ports.
    pub fn with_history<H>(history: Arc<H>, known: KnownIdentifierSet, param: impl Into<String>) -> Self
    where
        H: UrlProvider + HistoryPort + 'static,
    {
        Self::new(history.clone(), history, known, param)
    }

    pub fn current_identifier(&self) -> Option<Identifier> {
        self.state.borrow().identifier()
    }

    pub fn is_missing(&self) -> bool {
        self.state.borrow().is_missing()
    }

    pub fn is_invalid(&self) -> bool {
        self.state.borrow().is_invalid()
    }

    pub fn state(&self) -> UrlSyncState {
        self.state.borrow().clone()
    }

    pub fn known(&self) -> &KnownIdentifierSet {
        &self.known
    }

    pub fn subscribe(&self) -> watch::Receiver<UrlSyncState> {
        self.state.subscribe()
    }

    /// Recompute state from the current URL.
    ///
    /// If the parameter is present but not in normal form, the URL is
    /// rewritten with a history *replace* so back navigation is unaffected.
    pub fn refresh(&self) -> UrlSyncState {
        let url = self.location.current_url();
        let param = get_query_param(&url, &self.param);
        let next = UrlSyncState::derive(param.as_deref(), &self.known);

        if let Some(param) = param {
            if !next.normalized.is_empty() && next.normalized != param {
                let mut corrected = url;
                set_query_param(&mut corrected, &self.param, &next.normalized);
                tracing::debug!(from = %param, to = %next.normalized, "normalizing menu parameter");
                self.history.replace(&corrected);
            }
        }

        if next.is_invalid() {
            tracing::info!(raw = %next.raw, "menu parameter not in known set");
        }
        self.publish(&next);
        next
    }

    /// Point the URL at `candidate` (normalized) without reloading.
    /// A candidate that normalizes to nothing removes the parameter.
    pub fn navigate_to(&self, candidate: &str, opts: NavigateOptions) -> UrlSyncState {
        let normalized = normalize(candidate);
        let mut url = self.location.current_url();
        if normalized.is_empty() {
            remove_query_param(&mut url, &self.param);
        } else {
            set_query_param(&mut url, &self.param, &normalized);
        }

        if opts.replace_history {
            self.history.replace(&url);
        } else {
            self.history.push(&url);
        }

        let param = (!normalized.is_empty()).then_some(normalized.as_str());
        let next = UrlSyncState::derive(param, &self.known);
        self.publish(&next);
        next
    }

    /// Subscribers are woken only when the derived state actually changes.
    fn publish(&self, next: &UrlSyncState) {
        self.state.send_if_modified(|current| {
            if current == next {
                return false;
            }
            *current = next.clone();
            true
        });
    }

    /// Re-run `refresh` on every back/forward event until the returned guard
    /// is dropped. The listener holds only a weak reference to the resolver.
    pub fn listen(self: &Arc<Self>, mut events: broadcast::Receiver<NavigationEvent>) -> NavigationListener {
        let resolver = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        let Some(resolver) = resolver.upgrade() else {
                            break;
                        };
                        resolver.refresh();
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        NavigationListener { handle }
    }
}

/// Unregisters the navigation listener when dropped.
#[derive(Debug)]
pub struct NavigationListener {
    handle: JoinHandle<()>,
}

impl Drop for NavigationListener {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Build the page URL for `id` under `base`, as a shareable link.
pub fn menu_page_url(base: &Url, param: &str, id: &Identifier) -> Url {
    let mut url = base.clone();
    set_query_param(&mut url, param, id.as_str());
    url
}
