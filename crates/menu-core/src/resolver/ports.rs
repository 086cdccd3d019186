//! Ports standing in for the browser location and history APIs.

use std::sync::Mutex;

use tokio::sync::broadcast;
use url::Url;

/// Source of the page's current URL.
pub trait UrlProvider: Send + Sync {
    fn current_url(&self) -> Url;
}

/// History mutation without page reload.
pub trait HistoryPort: Send + Sync {
    /// Add a new entry (back navigation returns to the previous one).
    fn push(&self, url: &Url);
    /// Overwrite the current entry in place.
    fn replace(&self, url: &Url);
}

/// A back/forward navigation landed on `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub url: Url,
}

#[derive(Debug)]
struct Stack {
    entries: Vec<Url>,
    index: usize,
}

/// In-memory session history implementing both ports.
///
/// `back`/`forward` move the cursor and broadcast a `NavigationEvent`, like a
/// browser `popstate`. `push`/`replace` never broadcast.
#[derive(Debug)]
pub struct MemoryHistory {
    stack: Mutex<Stack>,
    pops: broadcast::Sender<NavigationEvent>,
}

impl MemoryHistory {
    pub fn new(initial: Url) -> Self {
        let (pops, _) = broadcast::channel(16);
        Self {
            stack: Mutex::new(Stack {
                entries: vec![initial],
                index: 0,
            }),
            pops,
        }
    }

    /// Receiver for back/forward events.
    pub fn pop_events(&self) -> broadcast::Receiver<NavigationEvent> {
        self.pops.subscribe()
    }

    /// Number of entries; never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.stack.lock().unwrap().entries.len()
    }

    pub fn entries(&self) -> Vec<Url> {
        self.stack.lock().unwrap().entries.clone()
    }

    pub fn back(&self) -> Option<Url> {
        self.go(-1)
    }

    pub fn forward(&self) -> Option<Url> {
        self.go(1)
    }

    fn go(&self, delta: isize) -> Option<Url> {
        let url = {
            let mut stack = self.stack.lock().unwrap();
            let target = stack.index.checked_add_signed(delta)?;
            if target >= stack.entries.len() {
                return None;
            }
            stack.index = target;
            stack.entries[target].clone()
        };
        let _ = self.pops.send(NavigationEvent { url: url.clone() });
        Some(url)
    }
}

impl UrlProvider for MemoryHistory {
    fn current_url(&self) -> Url {
        let stack = self.stack.lock().unwrap();
        stack.entries[stack.index].clone()
    }
}

impl HistoryPort for MemoryHistory {
    fn push(&self, url: &Url) {
        let mut stack = self.stack.lock().unwrap();
        let keep = stack.index + 1;
        stack.entries.truncate(keep);
        stack.entries.push(url.clone());
        stack.index = keep;
    }

    fn replace(&self, url: &Url) {
        let mut stack = self.stack.lock().unwrap();
        let index = stack.index;
        stack.entries[index] = url.clone();
    }
}
