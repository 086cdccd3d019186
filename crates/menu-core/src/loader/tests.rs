//! Loader state machine and supersession tests against a scripted fetcher.

use super::*;
use crate::control::AbortToken;
use crate::fetch::FetchResponse;
use crate::listener::{DocumentTitle, TitleListener};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::time::Duration;

const CAFE: &str = r#"{"restaurant":{"name":"Café Central"},"menus":[]}"#;
const LOUNGE: &str = r#"{"restaurant":{"name":"G Lounge"},"menus":[]}"#;

enum Reply {
    Status(u32, &'static str),
    Transport(&'static str),
}

struct Route {
    reply: Reply,
    /// Blocks the transfer until the test sends on the paired sender.
    gate: Option<mpsc::Receiver<()>>,
    /// If false the transfer ignores its abort token (a slow transport).
    honor_abort: bool,
}

#[derive(Default)]
struct ScriptedFetcher {
    routes: Mutex<HashMap<String, Route>>,
    calls: Mutex<Vec<String>>,
    cancelled: AtomicUsize,
}

impl ScriptedFetcher {
    fn reply(&self, id: &str, status: u32, body: &'static str) {
        self.insert(id, Reply::Status(status, body), None, false);
    }

    /// Route whose reply is held back until the returned sender fires.
    fn gated(&self, id: &str, status: u32, body: &'static str, honor_abort: bool) -> mpsc::Sender<()> {
        let (tx, rx) = mpsc::channel();
        self.insert(id, Reply::Status(status, body), Some(rx), honor_abort);
        tx
    }

    fn insert(&self, id: &str, reply: Reply, gate: Option<mpsc::Receiver<()>>, honor_abort: bool) {
        self.routes.lock().unwrap().insert(
            format!("menus/{id}.json"),
            Route {
                reply,
                gate,
                honor_abort,
            },
        );
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl MenuFetcher for ScriptedFetcher {
    fn get(&self, url: &str, abort: &AbortToken) -> Result<FetchResponse, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());

        let (gate, honor_abort) = {
            let mut routes = self.routes.lock().unwrap();
            match routes.iter_mut().find(|(suffix, _)| url.ends_with(suffix.as_str())) {
                Some((_, route)) => (route.gate.take(), route.honor_abort),
                None => (None, false),
            }
        };

        if let Some(gate) = gate {
            loop {
                if honor_abort && abort.is_aborted() {
                    self.cancelled.fetch_add(1, Ordering::SeqCst);
                    return Err(FetchError::Cancelled);
                }
                match gate.recv_timeout(Duration::from_millis(5)) {
                    Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    Err(mpsc::RecvTimeoutError::Timeout) => continue,
                }
            }
        }

        let routes = self.routes.lock().unwrap();
        match routes.iter().find(|(suffix, _)| url.ends_with(suffix.as_str())) {
            Some((_, route)) => match &route.reply {
                Reply::Status(status, body) => Ok(FetchResponse {
                    status: *status,
                    body: body.as_bytes().to_vec(),
                }),
                Reply::Transport(msg) => Err(FetchError::Transport(msg.to_string())),
            },
            None => Ok(FetchResponse {
                status: 404,
                body: Vec::new(),
            }),
        }
    }
}

fn loader(fetcher: &Arc<ScriptedFetcher>) -> MenuLoader {
    let base = Url::parse("https://example.com/lightweight-menu/").unwrap();
    MenuLoader::new(Arc::clone(fetcher) as Arc<dyn MenuFetcher>, base)
}

fn id(s: &str) -> Identifier {
    Identifier::parse(s).unwrap()
}

#[tokio::test]
async fn starts_idle() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let loader = loader(&fetcher);
    assert_eq!(loader.state(), LoadState::Idle);
    assert!(!loader.is_loading());
    assert!(!loader.is_failed());
}

#[tokio::test]
async fn empty_id_fails_without_network() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let loader = loader(&fetcher);
    let pending = loader.load("");
    assert!(pending.is_settled());
    pending.wait().await;
    assert_eq!(loader.state(), LoadState::Failed(LoadError::MissingIdentifier));
    assert!(loader.is_failed());

    loader.load("   ").wait().await;
    assert_eq!(loader.error(), Some(LoadError::MissingIdentifier));
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test]
async fn non_slug_id_fails_without_network() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let loader = loader(&fetcher);
    loader.load("../secrets").wait().await;
    assert_eq!(
        loader.error(),
        Some(LoadError::InvalidIdentifier("../secrets".to_string()))
    );
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test]
async fn successful_load_publishes_menu_and_title() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    fetcher.reply("cafe-central", 200, CAFE);
    let loader = loader(&fetcher);
    let title = DocumentTitle::new("Menu");
    loader.add_listener(Arc::new(TitleListener::new(title.clone(), "Menu")));

    loader.load("cafe-central").wait().await;

    match loader.state() {
        LoadState::Loaded { id: loaded, menu } => {
            assert_eq!(loaded, id("cafe-central"));
            assert_eq!(menu.display_name(), "Café Central");
        }
        other => panic!("expected Loaded, got {other:?}"),
    }
    assert!(title.get().contains("Café Central"));
    assert_eq!(
        fetcher.calls.lock().unwrap().as_slice(),
        ["https://example.com/lightweight-menu/menus/cafe-central.json"]
    );
}

#[tokio::test]
async fn http_404_is_not_found() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let loader = loader(&fetcher);
    let title = DocumentTitle::new("Before");
    loader.add_listener(Arc::new(TitleListener::new(title.clone(), "Menu")));

    loader.load("missing").wait().await;
    assert_eq!(
        loader.error(),
        Some(LoadError::NotFound {
            id: id("missing"),
            status: 404
        })
    );
    assert_eq!(title.get(), "Before");
}

#[tokio::test]
async fn empty_object_is_malformed() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    fetcher.reply("empty", 200, "{}");
    fetcher.reply("html", 200, "<html></html>");
    let loader = loader(&fetcher);

    loader.load("empty").wait().await;
    assert!(matches!(
        loader.error(),
        Some(LoadError::MalformedDocument { .. })
    ));

    loader.load("html").wait().await;
    assert!(matches!(
        loader.error(),
        Some(LoadError::MalformedDocument { .. })
    ));
}

#[tokio::test]
async fn transport_failure_is_unreachable() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    fetcher.insert("down", Reply::Transport("could not resolve host"), None, false);
    let loader = loader(&fetcher);
    loader.load("down").wait().await;
    match loader.error() {
        Some(LoadError::Unreachable { id: failed, reason }) => {
            assert_eq!(failed, id("down"));
            assert!(reason.contains("resolve"));
        }
        other => panic!("expected Unreachable, got {other:?}"),
    }
}

#[tokio::test]
async fn loading_clears_previous_menu() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    fetcher.reply("cafe-central", 200, CAFE);
    let release = fetcher.gated("g-lounge", 200, LOUNGE, false);
    let loader = loader(&fetcher);

    loader.load("cafe-central").wait().await;
    assert!(loader.menu().is_some());

    let pending = loader.load("g-lounge");
    assert_eq!(loader.state(), LoadState::Loading { id: id("g-lounge") });
    assert!(loader.menu().is_none());
    assert!(loader.is_loading());

    release.send(()).unwrap();
    pending.wait().await;
    assert_eq!(loader.menu().unwrap().display_name(), "G Lounge");
}

#[tokio::test]
async fn late_response_of_superseded_load_is_discarded() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let release_first = fetcher.gated("cafe-central", 200, CAFE, false);
    fetcher.reply("g-lounge", 200, LOUNGE);
    let loader = loader(&fetcher);
    let title = DocumentTitle::new("Menu");
    loader.add_listener(Arc::new(TitleListener::new(title.clone(), "Menu")));

    let first = loader.load("cafe-central");
    let second = loader.load("g-lounge");
    second.wait().await;
    assert_eq!(loader.menu().unwrap().display_name(), "G Lounge");

    // The first response arrives after the second one settled.
    release_first.send(()).unwrap();
    first.wait().await;

    assert_eq!(fetcher.call_count(), 2);
    match loader.state() {
        LoadState::Loaded { id: loaded, .. } => assert_eq!(loaded, id("g-lounge")),
        other => panic!("expected g-lounge, got {other:?}"),
    }
    assert_eq!(title.get(), "G Lounge | Menu");
}

#[tokio::test]
async fn late_failure_of_superseded_load_is_not_surfaced() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let release_first = fetcher.gated("broken", 500, "", false);
    fetcher.reply("g-lounge", 200, LOUNGE);
    let loader = loader(&fetcher);

    let first = loader.load("broken");
    loader.load("g-lounge").wait().await;
    release_first.send(()).unwrap();
    first.wait().await;

    assert!(!loader.is_failed());
    assert_eq!(loader.menu().unwrap().display_name(), "G Lounge");
}

#[tokio::test]
async fn supersede_raises_abort_token() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let _never = fetcher.gated("slow", 200, CAFE, true);
    fetcher.reply("g-lounge", 200, LOUNGE);
    let loader = loader(&fetcher);

    let first = loader.load("slow");
    loader.load("g-lounge").wait().await;
    first.wait().await;

    assert_eq!(fetcher.cancelled.load(Ordering::SeqCst), 1);
    assert_eq!(loader.menu().unwrap().display_name(), "G Lounge");
}

#[tokio::test]
async fn empty_load_supersedes_pending_request() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let release = fetcher.gated("cafe-central", 200, CAFE, false);
    let loader = loader(&fetcher);

    let first = loader.load("cafe-central");
    loader.load("").wait().await;
    release.send(()).unwrap();
    first.wait().await;

    assert_eq!(loader.error(), Some(LoadError::MissingIdentifier));
}

#[tokio::test]
async fn reject_supersedes_pending_request_without_network() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let release = fetcher.gated("cafe-central", 200, CAFE, true);
    let loader = loader(&fetcher);

    let first = loader.load("cafe-central");
    loader.reject(LoadError::InvalidIdentifier("nowhere".to_string()));
    let _ = release.send(());
    first.wait().await;

    assert_eq!(
        loader.error(),
        Some(LoadError::InvalidIdentifier("nowhere".to_string()))
    );
    assert_eq!(
        loader.error().unwrap().user_message(),
        "This menu doesn't exist."
    );
    assert_eq!(fetcher.call_count(), 1);
    assert!(loader.menu().is_none());
}

#[tokio::test]
async fn reload_refetches_last_identifier() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    fetcher.reply("cafe-central", 200, CAFE);
    let loader = loader(&fetcher);

    loader.load(" cafe-central ").wait().await;
    assert_eq!(loader.last_requested().as_deref(), Some("cafe-central"));
    loader.reload().wait().await;

    assert_eq!(fetcher.call_count(), 2);
    assert!(loader.menu().is_some());
}

#[tokio::test]
async fn reload_without_history_is_missing() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let loader = loader(&fetcher);
    loader.reload().wait().await;
    assert_eq!(loader.error(), Some(LoadError::MissingIdentifier));
}

#[tokio::test]
async fn cancel_returns_to_idle_and_drops_result() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let release = fetcher.gated("cafe-central", 200, CAFE, false);
    let loader = loader(&fetcher);

    let pending = loader.load("cafe-central");
    loader.cancel();
    assert_eq!(loader.state(), LoadState::Idle);

    release.send(()).unwrap();
    pending.wait().await;
    assert_eq!(loader.state(), LoadState::Idle);
}

#[tokio::test]
async fn drop_cancels_outstanding_request() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let release = fetcher.gated("cafe-central", 200, CAFE, false);
    let loader = loader(&fetcher);
    let title = DocumentTitle::new("Menu");
    loader.add_listener(Arc::new(TitleListener::new(title.clone(), "Menu")));
    let rx = loader.subscribe();

    let pending = loader.load("cafe-central");
    drop(loader);
    release.send(()).unwrap();
    pending.wait().await;

    assert!(rx.borrow().is_loading());
    assert_eq!(title.get(), "Menu");
}

#[tokio::test]
async fn subscribers_see_transitions() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let release = fetcher.gated("cafe-central", 200, CAFE, false);
    let loader = loader(&fetcher);
    let mut rx = loader.subscribe();

    let pending = loader.load("cafe-central");
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_loading());

    release.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("state change")
        .unwrap();
    assert!(rx.borrow().menu().is_some());
    pending.wait().await;
}
