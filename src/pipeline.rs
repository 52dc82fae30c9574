use chrono::Utc;
use tracing::{debug, error};

use crate::registry::SubsystemRegistry;
use crate::subsystems::memory::{EntryMetadata, MemoryEntry};
use crate::subsystems::reasoner::Reasoner;
use crate::turn::{prefix, TurnRecord, Utterance};

pub const NOT_READY_REPLY: &str = "System not ready.";
pub const EMPTY_REPLY: &str = "[No output]";
pub const ERROR_REPLY: &str = "Error processing message.";

pub const MEMORY_CATEGORY: &str = "conversation";
pub const MEMORY_IMPORTANCE: f32 = 0.7;
const SUMMARY_PREFIX_CHARS: usize = 50;

/// Outcome of one reasoner invocation. The pipeline branches on this rather
/// than letting the error cross into loop control flow.
enum ThinkOutcome {
    Replied(String),
    Empty,
    Failed,
}

async fn invoke_reasoner(reasoner: &dyn Reasoner, text: &str) -> ThinkOutcome {
    match reasoner.think(text).await {
        Ok(result) => match result.response {
            Some(reply) => ThinkOutcome::Replied(reply),
            None => ThinkOutcome::Empty,
        },
        Err(e) => {
            error!("error during message processing: {e:#}");
            ThinkOutcome::Failed
        }
    }
}

fn summarize(utterance: &Utterance, reply: &str) -> MemoryEntry {
    MemoryEntry {
        category: MEMORY_CATEGORY.to_string(),
        content: format!(
            "{} -> {}",
            prefix(&utterance.text, SUMMARY_PREFIX_CHARS),
            prefix(reply, SUMMARY_PREFIX_CHARS)
        ),
        importance: MEMORY_IMPORTANCE,
        metadata: EntryMetadata {
            timestamp: Utc::now().to_rfc3339(),
        },
    }
}

/// Dispatch one utterance. Exactly one reply comes back per call; memory
/// persistence is best-effort and invisible to the caller.
pub async fn process(registry: &mut SubsystemRegistry, utterance: &Utterance) -> TurnRecord {
    let Some(reasoner) = registry.reasoner.as_deref() else {
        return TurnRecord {
            utterance: utterance.clone(),
            reply: NOT_READY_REPLY.to_string(),
            ok: false,
            entry: None,
        };
    };

    let reply = match invoke_reasoner(reasoner, &utterance.text).await {
        ThinkOutcome::Replied(reply) => reply,
        ThinkOutcome::Empty => EMPTY_REPLY.to_string(),
        ThinkOutcome::Failed => {
            return TurnRecord {
                utterance: utterance.clone(),
                reply: ERROR_REPLY.to_string(),
                ok: false,
                entry: None,
            };
        }
    };

    let entry = summarize(utterance, &reply);
    if let Some(memory) = registry.memory.as_mut() {
        if let Err(e) = memory.store(entry.clone()) {
            debug!("memory store failed: {e}");
        }
    }

    TurnRecord {
        utterance: utterance.clone(),
        reply,
        ok: true,
        entry: Some(entry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turn::Utterance;

    #[test]
    fn summary_combines_truncated_prefixes() {
        let utterance = Utterance::typed("a".repeat(80));
        let reply = "b".repeat(80);
        let entry = summarize(&utterance, &reply);

        assert_eq!(entry.category, MEMORY_CATEGORY);
        assert_eq!(entry.importance, MEMORY_IMPORTANCE);
        assert_eq!(entry.content, format!("{} -> {}", "a".repeat(50), "b".repeat(50)));
        assert!(!entry.metadata.timestamp.is_empty());
    }

    #[test]
    fn summary_keeps_short_texts_whole() {
        let utterance = Utterance::typed("What is the weather");
        let entry = summarize(&utterance, "It is sunny");
        assert_eq!(entry.content, "What is the weather -> It is sunny");
    }
}
