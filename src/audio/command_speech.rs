use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use log::{trace, warn};

use super::speech::{SpeechService, SPEECH_POLL_INTERVAL};

#[derive(Debug, Default)]
struct Shared {
    child: Mutex<Option<Child>>,
    speaking: AtomicBool,
    /// Bumped on every new utterance and on stop, so a stale watcher
    /// thread never clears the flag of a newer one.
    generation: AtomicU64,
    shut_down: AtomicBool,
}

impl Shared {
    fn child(&self) -> MutexGuard<'_, Option<Child>> {
        self.child.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Speaks by running the platform's command-line synthesizer, one process
/// per utterance, watched from a detached thread.
#[derive(Debug)]
pub struct CommandSpeech {
    program: String,
    args: Vec<String>,
    render: fn(&str) -> String,
    shared: Arc<Shared>,
}

impl CommandSpeech {
    /// `text` is appended as the last argument of each invocation.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            render: str::to_string,
            shared: Arc::new(Shared::default()),
        }
    }

    /// Replaces the plain text argument with `render(text)`.
    pub fn with_text_format(mut self, render: fn(&str) -> String) -> Self {
        self.render = render;
        self
    }

    /// Mandarin voice on the synthesizer of the running OS.
    pub fn for_platform() -> Self {
        Self::for_os(std::env::consts::OS)
    }

    pub fn for_os(os: &str) -> Self {
        match os {
            "macos" => Self::new("say", vec!["-v".to_string(), "Tingting".to_string()]),
            "windows" => Self::new("powershell", vec!["-Command".to_string()])
                .with_text_format(powershell_script),
            _ => Self::new(
                "espeak",
                ["-v", "zh", "-s", "150"].map(String::from).to_vec(),
            ),
        }
    }

    fn command_line(&self, text: &str) -> Vec<String> {
        let mut args = self.args.clone();
        args.push((self.render)(text));
        args
    }

    fn watch(shared: Arc<Shared>, generation: u64) {
        thread::spawn(move || loop {
            thread::sleep(SPEECH_POLL_INTERVAL);
            let mut guard = shared.child();
            if shared.generation.load(Ordering::SeqCst) != generation {
                break;
            }
            let finished = match guard.as_mut() {
                Some(child) => match child.try_wait() {
                    Ok(Some(status)) => {
                        trace!(target: "speech", "Speech finished: {}", status);
                        true
                    }
                    Ok(None) => false,
                    Err(err) => {
                        warn!(target: "speech", "Lost track of speech process: {}", err);
                        true
                    }
                },
                None => true,
            };
            if finished {
                *guard = None;
                shared.speaking.store(false, Ordering::SeqCst);
                break;
            }
        });
    }
}

impl SpeechService for CommandSpeech {
    fn speak(&self, text: &str) {
        if self.shared.shut_down.load(Ordering::SeqCst) {
            return;
        }
        if self.is_speaking() {
            self.stop();
        }

        let spawned = Command::new(&self.program)
            .args(self.command_line(text))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(child) => {
                let generation = {
                    let mut guard = self.shared.child();
                    let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
                    *guard = Some(child);
                    self.shared.speaking.store(true, Ordering::SeqCst);
                    generation
                };
                trace!(target: "speech", "Speaking: {}", text);
                Self::watch(Arc::clone(&self.shared), generation);
            }
            Err(err) => {
                warn!(target: "speech", "Could not run {}: {}", self.program, err);
                self.shared.speaking.store(false, Ordering::SeqCst);
            }
        }
    }

    fn is_speaking(&self) -> bool {
        self.shared.speaking.load(Ordering::SeqCst)
    }

    fn stop(&self) {
        let mut guard = self.shared.child();
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(mut child) = guard.take() {
            if let Err(err) = child.kill() {
                trace!(target: "speech", "Speech process already gone: {}", err);
            }
            let _ = child.wait();
        }
        self.shared.speaking.store(false, Ordering::SeqCst);
    }

    fn shutdown(&self) {
        self.shared.shut_down.store(true, Ordering::SeqCst);
        self.stop();
    }
}

/// System.Speech one-liner; double quotes are doubled for the string literal.
fn powershell_script(text: &str) -> String {
    format!(
        "Add-Type -AssemblyName System.Speech; \
         (New-Object System.Speech.Synthesis.SpeechSynthesizer).Speak(\"{}\")",
        text.replace('"', "\"\"")
    )
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        self.stop();
    }
}
