//! Verse audio playback: a single active handle over a pluggable sink.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use quran_client::Reciter;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Playback failed: {0}")]
    Playback(String),
}

/// Output device for recitation audio.
pub trait AudioSink: Send + Sync {
    fn play(&self, url: &str) -> Result<(), AudioError>;
    fn stop(&self);
}

/// Sink that only logs. Used by the headless binary.
#[derive(Debug, Default)]
pub struct NullAudioSink;

impl AudioSink for NullAudioSink {
    fn play(&self, url: &str) -> Result<(), AudioError> {
        tracing::info!(url, "Audio playback requested");
        Ok(())
    }

    fn stop(&self) {
        tracing::debug!("Audio playback stopped");
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackHandle {
    pub id: u64,
    pub chapter: u16,
    pub verse: u16,
    pub reciter: Reciter,
    pub url: String,
    pub started_at: DateTime<Utc>,
}

/// Owns at most one playback at a time.
pub struct AudioPlayer {
    sink: Arc<dyn AudioSink>,
    current: Option<PlaybackHandle>,
    next_id: u64,
}

impl AudioPlayer {
    pub fn new(sink: Arc<dyn AudioSink>) -> Self {
        Self {
            sink,
            current: None,
            next_id: 1,
        }
    }

    /// Start playing `url`, stopping whatever is playing first.
    pub fn play(
        &mut self,
        chapter: u16,
        verse: u16,
        reciter: Reciter,
        url: String,
    ) -> Result<PlaybackHandle, AudioError> {
        self.stop();
        self.sink.play(&url)?;

        let handle = PlaybackHandle {
            id: self.next_id,
            chapter,
            verse,
            reciter,
            url,
            started_at: Utc::now(),
        };
        self.next_id += 1;
        self.current = Some(handle.clone());
        Ok(handle)
    }

    /// Stop the active playback, returning its handle.
    pub fn stop(&mut self) -> Option<PlaybackHandle> {
        let handle = self.current.take()?;
        self.sink.stop();
        Some(handle)
    }

    pub fn current(&self) -> Option<&PlaybackHandle> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl AudioSink for Recorder {
        fn play(&self, url: &str) -> Result<(), AudioError> {
            if self.fail {
                return Err(AudioError::Playback("device busy".into()));
            }
            self.calls.lock().unwrap().push(format!("play {url}"));
            Ok(())
        }

        fn stop(&self) {
            self.calls.lock().unwrap().push("stop".into());
        }
    }

    #[test]
    fn test_new_playback_stops_previous() {
        let sink = Arc::new(Recorder::default());
        let mut player = AudioPlayer::new(sink.clone());

        let first = player.play(1, 1, Reciter::default(), "a.mp3".into()).unwrap();
        let second = player.play(1, 2, Reciter::default(), "b.mp3".into()).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(player.current(), Some(&second));

        let calls = sink.calls.lock().unwrap().clone();
        assert_eq!(calls, ["play a.mp3", "stop", "play b.mp3"]);
    }

    #[test]
    fn test_stop_without_playback_is_noop() {
        let sink = Arc::new(Recorder::default());
        let mut player = AudioPlayer::new(sink.clone());
        assert!(player.stop().is_none());
        assert!(sink.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_failed_play_leaves_nothing_active() {
        let sink = Arc::new(Recorder {
            fail: true,
            ..Default::default()
        });
        let mut player = AudioPlayer::new(sink);
        assert!(player.play(1, 1, Reciter::default(), "a.mp3".into()).is_err());
        assert!(player.current().is_none());
    }
}
