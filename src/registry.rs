use crate::subsystems::knowledge::KnowledgeLookup;
use crate::subsystems::memory::MemoryStore;
use crate::subsystems::reasoner::Reasoner;
use crate::subsystems::voice::VoiceOutput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubsystemRole {
    Reasoner,
    Memory,
    Knowledge,
    Voice,
}

impl SubsystemRole {
    pub const ALL: [SubsystemRole; 4] = [
        SubsystemRole::Reasoner,
        SubsystemRole::Memory,
        SubsystemRole::Knowledge,
        SubsystemRole::Voice,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SubsystemRole::Reasoner => "reasoner",
            SubsystemRole::Memory => "memory",
            SubsystemRole::Knowledge => "knowledge",
            SubsystemRole::Voice => "voice",
        }
    }
}

/// Live handles for every subsystem role. A failed construction leaves its
/// slot None; absence is a queryable state, not an error. Populated once by
/// the initializer, then read for the rest of the process.
#[derive(Default)]
pub struct SubsystemRegistry {
    pub reasoner: Option<Box<dyn Reasoner>>,
    pub memory: Option<Box<dyn MemoryStore>>,
    pub knowledge: Option<Box<dyn KnowledgeLookup>>,
    pub voice: Option<Box<dyn VoiceOutput>>,
}

impl SubsystemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_present(&self, role: SubsystemRole) -> bool {
        match role {
            SubsystemRole::Reasoner => self.reasoner.is_some(),
            SubsystemRole::Memory => self.memory.is_some(),
            SubsystemRole::Knowledge => self.knowledge.is_some(),
            SubsystemRole::Voice => self.voice.is_some(),
        }
    }

    pub fn absent_roles(&self) -> Vec<SubsystemRole> {
        SubsystemRole::ALL
            .into_iter()
            .filter(|role| !self.is_present(*role))
            .collect()
    }
}
