mod command_speech;
mod speech;

pub use command_speech::CommandSpeech;
pub use speech::{wait_for_speech, SilentSpeech, SpeechService, SPEECH_POLL_INTERVAL};

#[cfg(test)]
pub(crate) mod tests {
    pub(crate) use super::speech::tests::FakeSpeech;
}
