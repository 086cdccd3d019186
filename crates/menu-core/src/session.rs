//! Ties a resolver to a loader: whenever the resolved identifier changes,
//! the loader is asked for the new menu. Unknown menus are rejected without
//! a request.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::loader::{LoadError, MenuLoader};
use crate::resolver::{IdentifierResolver, NavigationEvent, NavigationListener, UrlSyncState};

/// A mounted menu page. Dropping it unregisters the navigation listener,
/// stops following the resolver and cancels any load in flight.
pub struct MenuSession {
    resolver: Arc<IdentifierResolver>,
    loader: Arc<MenuLoader>,
    _navigation: NavigationListener,
    follow: JoinHandle<()>,
}

/// What the loader should show for one resolver state.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    /// A known identifier, or `""` when the URL names no menu.
    Menu(String),
    /// The URL names a menu outside the known set (raw value).
    Unknown(String),
}

impl Target {
    fn of(state: &UrlSyncState) -> Self {
        if state.is_invalid() {
            return Target::Unknown(state.raw.clone());
        }
        Target::Menu(state.identifier().map(String::from).unwrap_or_default())
    }

    fn apply(&self, loader: &MenuLoader) {
        match self {
            Target::Menu(id) => drop(loader.load(id)),
            Target::Unknown(raw) => loader.reject(LoadError::InvalidIdentifier(raw.clone())),
        }
    }
}

impl MenuSession {
    /// Mount: load the currently resolved menu and follow later changes.
    /// An unresolved URL yields `MissingIdentifier`; an unknown menu yields
    /// `InvalidIdentifier` without network access.
    pub fn start(
        resolver: Arc<IdentifierResolver>,
        loader: MenuLoader,
        pops: broadcast::Receiver<NavigationEvent>,
    ) -> Self {
        let loader = Arc::new(loader);
        let navigation = resolver.listen(pops);

        let mut states = resolver.subscribe();
        let mut current = Target::of(&states.borrow_and_update());
        current.apply(&loader);

        let follower = Arc::clone(&loader);
        let follow = tokio::spawn(async move {
            while states.changed().await.is_ok() {
                let next = Target::of(&states.borrow_and_update());
                if next == current {
                    continue;
                }
                tracing::debug!(from = ?current, to = ?next, "menu identifier changed");
                current = next;
                current.apply(&follower);
            }
        });

        Self {
            resolver,
            loader,
            _navigation: navigation,
            follow,
        }
    }

    pub fn resolver(&self) -> &IdentifierResolver {
        &self.resolver
    }

    pub fn loader(&self) -> &MenuLoader {
        &self.loader
    }
}

impl Drop for MenuSession {
    fn drop(&mut self) {
        self.follow.abort();
        self.loader.cancel();
    }
}
