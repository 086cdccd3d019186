//! Menu loader: fetch, validate and publish one menu document at a time.
//!
//! Every `load` supersedes the previous one. The previous transfer is asked
//! to abort, and whatever it eventually returns is dropped without touching
//! the published state. Only the most recent request is ever observable.
//!
//! `load` must be called from within a Tokio runtime; the transfer itself runs
//! on the blocking pool.

mod state;

#[cfg(test)]
mod tests;

pub use state::{LoadError, LoadState};

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use url::Url;

use crate::control::{Attempt, AttemptControl};
use crate::fetch::{FetchError, MenuFetcher};
use crate::listener::LoadListener;
use crate::menu::{parse_menu_document, MenuResource};
use crate::url_model::{menu_resource_url, Identifier, IdentifierError};

/// Handle to a load started by `MenuLoader::load`.
///
/// Dropping it does not cancel anything; it only lets callers await the
/// point where the attempt settled (or was discarded).
#[must_use = "await `wait()` to observe when the load settles"]
#[derive(Debug)]
pub struct PendingLoad {
    handle: Option<JoinHandle<()>>,
}

impl PendingLoad {
    fn settled() -> Self {
        Self { handle: None }
    }

    /// True if the load settled synchronously (no network access happened).
    pub fn is_settled(&self) -> bool {
        self.handle.is_none()
    }

    pub async fn wait(self) {
        if let Some(handle) = self.handle {
            if let Err(e) = handle.await {
                tracing::warn!("menu load task ended abnormally: {e}");
            }
        }
    }
}

struct Inner {
    fetcher: Arc<dyn MenuFetcher>,
    base: Url,
    control: AttemptControl,
    state: watch::Sender<LoadState>,
    last_requested: Mutex<Option<String>>,
    listeners: Mutex<Vec<Arc<dyn LoadListener>>>,
}

/// Owns one `LoadState`. Dropping the loader cancels the outstanding request.
pub struct MenuLoader {
    inner: Arc<Inner>,
}

impl MenuLoader {
    /// `base` is the deployment base; documents are read from `<base>menus/<id>.json`.
    pub fn new(fetcher: Arc<dyn MenuFetcher>, base: Url) -> Self {
        let (state, _) = watch::channel(LoadState::Idle);
        Self {
            inner: Arc::new(Inner {
                fetcher,
                base,
                control: AttemptControl::new(),
                state,
                last_requested: Mutex::new(None),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Register a listener notified after each successful load.
    /// Listeners run while the result is being applied and must not call
    /// back into the loader.
    pub fn add_listener(&self, listener: Arc<dyn LoadListener>) {
        self.inner.listeners.lock().unwrap().push(listener);
    }

    /// Start loading `id`, superseding any load still in flight.
    ///
    /// An empty or malformed identifier fails immediately without network
    /// access. Otherwise the state becomes `Loading` before this returns.
    pub fn load(&self, id: &str) -> PendingLoad {
        let raw = id.trim();
        *self.inner.last_requested.lock().unwrap() = Some(raw.to_string());

        let attempt = self.inner.control.begin();

        let id = match Identifier::parse(raw) {
            Ok(id) => id,
            Err(e) => {
                let err = match e {
                    IdentifierError::Empty => LoadError::MissingIdentifier,
                    IdentifierError::NotSlug(s) => LoadError::InvalidIdentifier(s),
                };
                tracing::debug!("menu load rejected before fetch: {err}");
                self.inner.publish(&attempt, LoadState::Failed(err));
                return PendingLoad::settled();
            }
        };

        let url = match menu_resource_url(&self.inner.base, id.as_str()) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(menu_id = %id, "cannot build menu URL: {e}");
                self.inner
                    .publish(&attempt, LoadState::Failed(LoadError::InvalidIdentifier(id.into())));
                return PendingLoad::settled();
            }
        };

        self.inner
            .publish(&attempt, LoadState::Loading { id: id.clone() });

        let inner = Arc::clone(&self.inner);
        PendingLoad {
            handle: Some(tokio::spawn(inner.run(attempt, id, url))),
        }
    }

    /// Supersede any load in flight and settle on `err` without network access.
    /// Used when the caller already knows the menu cannot be shown.
    pub fn reject(&self, err: LoadError) {
        let attempt = self.inner.control.begin();
        tracing::debug!("menu load rejected: {err}");
        self.inner.publish(&attempt, LoadState::Failed(err));
    }

    /// Load the most recently requested identifier again.
    pub fn reload(&self) -> PendingLoad {
        let last = self.last_requested().unwrap_or_default();
        self.load(&last)
    }

    /// Abort the outstanding request. A `Loading` state falls back to `Idle`;
    /// settled states are kept.
    pub fn cancel(&self) {
        let state = &self.inner.state;
        self.inner.control.cancel_and(|| {
            state.send_if_modified(|s| {
                if s.is_loading() {
                    *s = LoadState::Idle;
                    true
                } else {
                    false
                }
            });
        });
    }

    pub fn state(&self) -> LoadState {
        self.inner.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading()
    }

    pub fn is_failed(&self) -> bool {
        self.inner.state.borrow().is_failed()
    }

    pub fn menu(&self) -> Option<Arc<MenuResource>> {
        self.inner.state.borrow().menu().cloned()
    }

    pub fn error(&self) -> Option<LoadError> {
        self.inner.state.borrow().error().cloned()
    }

    pub fn last_requested(&self) -> Option<String> {
        self.inner.last_requested.lock().unwrap().clone()
    }

    /// Receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.inner.state.subscribe()
    }
}

impl Drop for MenuLoader {
    fn drop(&mut self) {
        self.inner.control.cancel();
    }
}

impl Inner {
    /// Publish `next` if `attempt` is still live. Listeners are notified for
    /// `Loaded` under the same guard, so a superseded menu never reaches them.
    fn publish(&self, attempt: &Attempt, next: LoadState) -> bool {
        self.control.apply_if_current(attempt, || {
            if let LoadState::Loaded { id, menu } = &next {
                let listeners = self.listeners.lock().unwrap().clone();
                for listener in listeners {
                    listener.menu_loaded(id, menu);
                }
            }
            self.state.send_replace(next);
        })
    }

    async fn run(self: Arc<Self>, attempt: Attempt, id: Identifier, url: Url) {
        let fetcher = Arc::clone(&self.fetcher);
        let token = attempt.token.clone();
        let target = url.to_string();
        let fetched = tokio::task::spawn_blocking(move || fetcher.get(&target, &token))
            .await
            .unwrap_or_else(|e| Err(FetchError::Transport(format!("fetch task failed: {e}"))));

        let next = match fetched {
            Err(FetchError::Cancelled) => {
                tracing::debug!(menu_id = %id, "menu request cancelled");
                return;
            }
            Err(FetchError::Transport(reason)) => {
                tracing::warn!(menu_id = %id, %url, "menu request failed: {reason}");
                LoadState::Failed(LoadError::Unreachable { id, reason })
            }
            Ok(resp) if !resp.is_success() => {
                tracing::info!(menu_id = %id, status = resp.status, "menu not found");
                LoadState::Failed(LoadError::NotFound {
                    id,
                    status: resp.status,
                })
            }
            Ok(resp) => match parse_menu_document(&resp.body) {
                Ok(menu) => {
                    tracing::debug!(menu_id = %id, items = menu.item_count(), "menu loaded");
                    LoadState::Loaded {
                        id,
                        menu: Arc::new(menu),
                    }
                }
                Err(e) => {
                    tracing::warn!(menu_id = %id, "menu document rejected: {e}");
                    LoadState::Failed(LoadError::MalformedDocument {
                        id,
                        reason: e.to_string(),
                    })
                }
            },
        };

        if !self.publish(&attempt, next) {
            tracing::debug!(seq = attempt.seq, "discarding superseded menu result");
        }
    }
}
