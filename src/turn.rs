use chrono::{DateTime, Utc};

use crate::subsystems::memory::MemoryEntry;

/// Where an utterance came from. Microphone turns are echoed back to the
/// console so the user can verify recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtteranceOrigin {
    Microphone,
    Console,
}

/// One captured user utterance. Created per loop iteration, dropped once the
/// turn completes.
#[derive(Debug, Clone)]
pub struct Utterance {
    pub text: String,
    pub origin: UtteranceOrigin,
    pub captured_at: DateTime<Utc>,
}

impl Utterance {
    pub fn heard(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: UtteranceOrigin::Microphone,
            captured_at: Utc::now(),
        }
    }

    pub fn typed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: UtteranceOrigin::Console,
            captured_at: Utc::now(),
        }
    }
}

/// Result of one dispatch through the pipeline. The reply is what the loop
/// emits; `entry` is what was offered to memory (stored or not).
#[derive(Debug, Clone)]
pub struct TurnRecord {
    pub utterance: Utterance,
    pub reply: String,
    pub ok: bool,
    pub entry: Option<MemoryEntry>,
}

/// First `max` characters of `s`, on char boundaries. Truncation limit is in
/// characters, not bytes, so multibyte input cannot split a codepoint.
pub fn prefix(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
