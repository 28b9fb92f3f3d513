use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use quran_client::{ClientOptions, QuranApiClient, StaticTransport, Transport};
use reader_store::Database;

use crate::app::ReaderContext;
use crate::audio::{AudioError, AudioSink};
use crate::config::AppConfig;
use crate::controller::AppController;

const SURAT_LIST: &str = include_str!("../../../crates/quran-client/fixtures/surat.json");
const SURAT_1: &str = include_str!("../../../crates/quran-client/fixtures/surat_1.json");
const TAFSIR_1: &str = include_str!("../../../crates/quran-client/fixtures/tafsir_1.json");
const NOT_FOUND: &str = include_str!("../../../crates/quran-client/fixtures/not_found.json");

fn fixture_transport() -> StaticTransport {
    StaticTransport::new()
        .with_route("/surat", SURAT_LIST)
        .with_route("/surat/1", SURAT_1)
        .with_route("/tafsir/1", TAFSIR_1)
        .with_route("/surat/114", NOT_FOUND)
}

/// Audio sink that records what it was asked to do.
#[derive(Default)]
struct RecordingSink {
    calls: Mutex<Vec<String>>,
}

impl RecordingSink {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl AudioSink for RecordingSink {
    fn play(&self, url: &str) -> Result<(), AudioError> {
        self.calls.lock().unwrap().push(format!("play {url}"));
        Ok(())
    }

    fn stop(&self) {
        self.calls.lock().unwrap().push("stop".into());
    }
}

fn test_context(transport: Arc<dyn Transport>) -> ReaderContext {
    let db = Database::open_in_memory().expect("Failed to create test DB");
    let client = QuranApiClient::with_transport(transport, &ClientOptions::default());
    ReaderContext::with_client(db, client, AppConfig::default(), PathBuf::from("."))
}

fn test_controller() -> (AppController, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let ctx = test_context(Arc::new(fixture_transport()));
    (AppController::new(ctx, sink.clone()), sink)
}

mod navigation;
