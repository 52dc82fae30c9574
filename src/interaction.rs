use anyhow::Result;
use tracing::{info, warn};

use crate::input::{InputChannel, ListenOutcome};
use crate::pipeline;
use crate::registry::SubsystemRegistry;
use crate::turn::{Utterance, UtteranceOrigin};

/// A lower-cased utterance containing any of these ends the session.
/// Substring containment, so embedded words ("don't stop me") also match;
/// that is the inherited behavior, left as-is.
pub const TERMINATION_VOCABULARY: [&str; 4] = ["goodbye", "exit", "quit", "stop"];

pub const FAREWELL: &str = "Goodbye! See you next time.";

pub fn is_termination(text: &str) -> bool {
    let lowered = text.to_lowercase();
    TERMINATION_VOCABULARY
        .iter()
        .any(|word| lowered.contains(word))
}

#[derive(Debug)]
enum LoopState {
    Listening,
    Dispatching(Utterance),
    Speaking(String),
    Terminated,
}

/// Speak if a voice is present; a failure is logged and the turn goes on
/// text-only.
pub async fn speak_best_effort(registry: &mut SubsystemRegistry, text: &str) {
    if let Some(voice) = registry.voice.as_mut() {
        if let Err(e) = voice.speak(text).await {
            warn!("voice output failed: {e:#}");
        }
    }
}

/// The outer control loop. One utterance is fully dispatched, persisted, and
/// spoken before the next is acquired; the only bounded wait is capture.
pub struct InteractionLoop {
    state: LoopState,
}

impl InteractionLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Listening,
        }
    }

    pub async fn run(
        &mut self,
        registry: &mut SubsystemRegistry,
        input: &mut dyn InputChannel,
    ) -> Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, LoopState::Listening);
            self.state = match state {
                LoopState::Listening => match input.next().await {
                    ListenOutcome::Heard(utterance) => {
                        if utterance.origin == UtteranceOrigin::Microphone {
                            println!("you> {}", utterance.text);
                        }
                        LoopState::Dispatching(utterance)
                    }
                    ListenOutcome::Failed(e) => {
                        warn!("capture failed: {e}");
                        LoopState::Listening
                    }
                    ListenOutcome::Closed => {
                        info!("input channel closed");
                        LoopState::Terminated
                    }
                },
                LoopState::Dispatching(utterance) => {
                    if is_termination(&utterance.text) {
                        println!("assistant> {FAREWELL}");
                        speak_best_effort(registry, FAREWELL).await;
                        LoopState::Terminated
                    } else {
                        let record = pipeline::process(registry, &utterance).await;
                        LoopState::Speaking(record.reply)
                    }
                }
                LoopState::Speaking(reply) => {
                    println!("assistant> {reply}");
                    speak_best_effort(registry, &reply).await;
                    LoopState::Listening
                }
                LoopState::Terminated => return Ok(()),
            };
        }
    }
}

impl Default for InteractionLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::is_termination;

    #[test]
    fn termination_matches_vocabulary_case_insensitively() {
        assert!(is_termination("Goodbye, I'm done"));
        assert!(is_termination("EXIT"));
        assert!(is_termination("please quit now"));
        assert!(is_termination("stop"));
    }

    #[test]
    fn termination_ignores_ordinary_utterances() {
        assert!(!is_termination("What is the weather"));
        assert!(!is_termination(""));
        assert!(!is_termination("tell me about rust"));
    }

    #[test]
    fn termination_matches_embedded_words() {
        // Inherited substring behavior: "stop" inside another phrase still
        // terminates.
        assert!(is_termination("don't stop me now"));
        assert!(is_termination("the bus stopped"));
    }
}
