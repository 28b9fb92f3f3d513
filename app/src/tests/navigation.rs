use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use quran_client::{QuranError, StaticTransport, Transport};
use tokio::sync::Notify;

use super::{RecordingSink, fixture_transport, test_context, test_controller};
use crate::controller::{AppController, ControllerError};
use crate::events::{Intent, View};

/// Holds the first request for `path` until the gate is opened.
struct GatedTransport {
    inner: StaticTransport,
    path: &'static str,
    gate: Arc<Notify>,
    held: AtomicBool,
}

#[async_trait]
impl Transport for GatedTransport {
    async fn get(&self, path: &str) -> Result<String, QuranError> {
        if path == self.path && !self.held.swap(true, Ordering::SeqCst) {
            self.gate.notified().await;
        }
        self.inner.get(path).await
    }
}

#[tokio::test]
async fn test_superseded_navigation_is_stale() {
    let gate = Arc::new(Notify::new());
    let transport = GatedTransport {
        inner: fixture_transport(),
        path: "/surat/1",
        gate: gate.clone(),
        held: AtomicBool::new(false),
    };
    let ctx = test_context(Arc::new(transport));
    let controller = AppController::new(ctx, Arc::new(RecordingSink::default()));

    let older = controller.dispatch(Intent::NavigateToChapter(1));
    let newer = async {
        let view = controller.dispatch(Intent::NavigateToChapter(1)).await;
        gate.notify_one();
        view
    };
    let (older, newer) = tokio::join!(older, newer);

    assert!(matches!(newer.unwrap(), View::Chapter(_)));
    assert!(matches!(older.unwrap(), View::Stale { chapter: 1 }));
    assert_eq!(controller.open_chapter().await, Some(1));
}

#[tokio::test]
async fn test_navigation_records_history() {
    let (controller, _) = test_controller();
    let db = controller.context().db().clone();

    controller
        .dispatch(Intent::NavigateToChapter(1))
        .await
        .unwrap();
    controller
        .dispatch(Intent::NavigateToChapter(1))
        .await
        .unwrap();

    let history = db.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].chapter, 1);
    assert_eq!(history[0].name_latin, "Al-Fatihah");
}

#[tokio::test]
async fn test_navigation_shows_bookmark_state_and_commentary() {
    let (controller, _) = test_controller();
    controller
        .dispatch(Intent::ToggleChapterBookmark(1))
        .await
        .unwrap();
    controller
        .dispatch(Intent::ToggleVerseBookmark {
            chapter: 1,
            verse: 3,
        })
        .await
        .unwrap();

    let View::Chapter(page) = controller
        .dispatch(Intent::NavigateToChapter(1))
        .await
        .unwrap()
    else {
        panic!("expected chapter view");
    };
    assert!(page.chapter_bookmarked);
    assert_eq!(page.bookmarked_verses, vec![3]);
    assert!(page.view.commentary_for(1).is_some());
    assert_eq!(page.view.verses_without_commentary(), vec![7]);
}

#[tokio::test]
async fn test_invalid_chapter_rejected_before_io() {
    let transport = Arc::new(fixture_transport());
    let ctx = test_context(transport.clone());
    let controller = AppController::new(ctx, Arc::new(RecordingSink::default()));

    for id in [0, 115] {
        let err = controller
            .dispatch(Intent::NavigateToChapter(id))
            .await
            .unwrap_err();
        assert!(matches!(err, ControllerError::Quran(QuranError::Validation(_))));
    }
    assert_eq!(transport.total_hits(), 0);
    assert!(controller.context().db().history().is_empty());
}

#[tokio::test]
async fn test_remote_failure_leaves_state_untouched() {
    let (controller, _) = test_controller();
    controller
        .dispatch(Intent::NavigateToChapter(1))
        .await
        .unwrap();

    let err = controller
        .dispatch(Intent::NavigateToChapter(114))
        .await
        .unwrap_err();
    assert!(matches!(err, ControllerError::Quran(ref e) if e.is_remote()));
    assert_eq!(controller.open_chapter().await, Some(1));
    assert_eq!(controller.context().db().history().len(), 1);
}
