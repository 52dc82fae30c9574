#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use parley::input::{InputChannel, ListenOutcome};
use parley::subsystems::knowledge::KnowledgeLookup;
use parley::subsystems::memory::{MemoryEntry, MemoryError, MemoryStore};
use parley::subsystems::reasoner::{Reasoner, ThinkResult};
use parley::subsystems::voice::VoiceOutput;

#[derive(Clone, Copy)]
pub enum ReasonerScript {
    Reply(&'static str),
    NoText,
    Fail,
}

pub struct ScriptedReasoner {
    script: ReasonerScript,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedReasoner {
    pub fn new(script: ReasonerScript) -> (Self, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                script,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl Reasoner for ScriptedReasoner {
    async fn think(&self, text: &str) -> Result<ThinkResult> {
        self.calls.lock().unwrap().push(text.to_string());
        match self.script {
            ReasonerScript::Reply(reply) => Ok(ThinkResult {
                response: Some(reply.to_string()),
            }),
            ReasonerScript::NoText => Ok(ThinkResult { response: None }),
            ReasonerScript::Fail => Err(anyhow!("reasoner exploded")),
        }
    }
}

pub struct RecordingMemory {
    pub entries: Arc<Mutex<Vec<MemoryEntry>>>,
    pub saves: Arc<AtomicUsize>,
    fail_store: bool,
    fail_save: bool,
}

impl RecordingMemory {
    pub fn new() -> (Self, Arc<Mutex<Vec<MemoryEntry>>>) {
        Self::with_failures(false, false)
    }

    pub fn with_failures(
        fail_store: bool,
        fail_save: bool,
    ) -> (Self, Arc<Mutex<Vec<MemoryEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                entries: entries.clone(),
                saves: Arc::new(AtomicUsize::new(0)),
                fail_store,
                fail_save,
            },
            entries,
        )
    }
}

impl MemoryStore for RecordingMemory {
    fn store(&mut self, entry: MemoryEntry) -> Result<(), MemoryError> {
        if self.fail_store {
            return Err(MemoryError::Serialization("store rejected".to_string()));
        }
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }

    fn save(&mut self) -> Result<(), MemoryError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_save {
            return Err(MemoryError::Serialization("save rejected".to_string()));
        }
        Ok(())
    }
}

pub struct RecordingVoice {
    pub spoken: Arc<Mutex<Vec<String>>>,
    pub stops: Arc<AtomicUsize>,
    fail_speak: bool,
    fail_stop: bool,
}

impl RecordingVoice {
    pub fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        Self::with_failures(false, false)
    }

    pub fn with_failures(fail_speak: bool, fail_stop: bool) -> (Self, Arc<Mutex<Vec<String>>>) {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                spoken: spoken.clone(),
                stops: Arc::new(AtomicUsize::new(0)),
                fail_speak,
                fail_stop,
            },
            spoken,
        )
    }
}

#[async_trait]
impl VoiceOutput for RecordingVoice {
    async fn speak(&mut self, text: &str) -> Result<()> {
        if self.fail_speak {
            return Err(anyhow!("speaker offline"));
        }
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        if self.fail_stop {
            return Err(anyhow!("speaker refused to stop"));
        }
        Ok(())
    }
}

pub struct StubKnowledge;

#[async_trait]
impl KnowledgeLookup for StubKnowledge {
    async fn lookup(&self, _query: &str) -> Result<String> {
        Ok("stub answer".to_string())
    }
}

/// Plays back a fixed sequence of listen outcomes, then reports the channel
/// closed.
pub struct ScriptedInput {
    outcomes: VecDeque<ListenOutcome>,
    pub closes: Arc<AtomicUsize>,
}

impl ScriptedInput {
    pub fn new(outcomes: Vec<ListenOutcome>) -> Self {
        Self {
            outcomes: outcomes.into(),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait(?Send)]
impl InputChannel for ScriptedInput {
    async fn next(&mut self) -> ListenOutcome {
        self.outcomes.pop_front().unwrap_or(ListenOutcome::Closed)
    }

    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
