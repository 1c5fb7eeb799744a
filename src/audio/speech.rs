use std::thread;
use std::time::{Duration, Instant};

pub const SPEECH_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Text-to-speech as seen by the game loop: requests are fire-and-forget and
/// progress is only ever observed by polling [`SpeechService::is_speaking`].
pub trait SpeechService {
    fn speak(&self, text: &str);
    fn is_speaking(&self) -> bool;
    fn stop(&self);
    /// Stops any speech and refuses further requests.
    fn shutdown(&self);
}

/// Used when speech is disabled or no backend is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSpeech;

impl SpeechService for SilentSpeech {
    fn speak(&self, _text: &str) {}

    fn is_speaking(&self) -> bool {
        false
    }

    fn stop(&self) {}

    fn shutdown(&self) {}
}

/// Blocks until speech has finished or `timeout` has passed. Returns `true`
/// if speech finished in time.
pub fn wait_for_speech(service: &dyn SpeechService, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while service.is_speaking() {
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(SPEECH_POLL_INTERVAL);
    }
    true
}
