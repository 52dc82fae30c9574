use anyhow::Result;
use tracing::{info, warn};

use crate::config::AssistantConfig;
use crate::registry::{SubsystemRegistry, SubsystemRole};
use crate::subsystems::knowledge::{HttpKnowledgeClient, KnowledgeLookup};
use crate::subsystems::memory::{FileMemoryStore, MemoryStore};
use crate::subsystems::reasoner::{HttpReasoner, Reasoner};
use crate::subsystems::voice::{SystemVoice, VoiceOutput};

type Factory<T> = Box<dyn FnOnce() -> Result<Box<T>>>;

/// One fallible constructor per subsystem role. Tests inject failing
/// factories; production wiring comes from `from_config`.
pub struct SubsystemFactories {
    pub reasoner: Factory<dyn Reasoner>,
    pub memory: Factory<dyn MemoryStore>,
    pub knowledge: Factory<dyn KnowledgeLookup>,
    pub voice: Factory<dyn VoiceOutput>,
}

impl SubsystemFactories {
    pub fn from_config(config: &AssistantConfig) -> Self {
        let reasoner_url = config.reasoner_url.clone();
        let store_path = config.memory_store_path.clone();
        let memory_dir = config.memory_dir.clone();
        let knowledge_url = config.knowledge_url.clone();
        let knowledge_key = config.knowledge_api_key.clone();
        let voice = config.voice.clone();

        Self {
            reasoner: Box::new(move || {
                Ok(Box::new(HttpReasoner::new(reasoner_url)) as Box<dyn Reasoner>)
            }),
            memory: Box::new(move || {
                let store = FileMemoryStore::open(store_path, memory_dir)?;
                Ok(Box::new(store) as Box<dyn MemoryStore>)
            }),
            knowledge: Box::new(move || {
                let client = HttpKnowledgeClient::new(knowledge_url, knowledge_key)?;
                Ok(Box::new(client) as Box<dyn KnowledgeLookup>)
            }),
            voice: Box::new(move || {
                Ok(Box::new(SystemVoice::new(voice)) as Box<dyn VoiceOutput>)
            }),
        }
    }
}

fn attempt<T: ?Sized>(role: SubsystemRole, factory: Factory<T>) -> Option<Box<T>> {
    match factory() {
        Ok(handle) => {
            info!("{} subsystem ready", role.name());
            Some(handle)
        }
        Err(e) => {
            warn!("{} subsystem unavailable: {e:#}", role.name());
            None
        }
    }
}

/// Construct every subsystem in isolation. A failure in one never prevents
/// the others from being attempted; the assistant starts in degraded mode
/// with whatever came up.
pub fn initialize(factories: SubsystemFactories, config: &AssistantConfig) -> SubsystemRegistry {
    if config.enable_vision {
        warn!("vision requested but no vision engine is wired in this build; continuing without");
    } else {
        info!("vision disabled by configuration");
    }

    let registry = SubsystemRegistry {
        reasoner: attempt(SubsystemRole::Reasoner, factories.reasoner),
        memory: attempt(SubsystemRole::Memory, factories.memory),
        knowledge: attempt(SubsystemRole::Knowledge, factories.knowledge),
        voice: attempt(SubsystemRole::Voice, factories.voice),
    };

    let absent = registry.absent_roles();
    if absent.is_empty() {
        info!("all subsystems online");
    } else {
        let names: Vec<&str> = absent.iter().map(|r| r.name()).collect();
        warn!("running degraded; absent subsystems: {}", names.join(", "));
    }

    registry
}
