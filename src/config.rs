use std::env;
use std::path::PathBuf;

/// Runtime configuration, resolved once at boot from the environment.
/// Every field has a default so the assistant starts with nothing set.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Operating-mode tag, surfaced in the boot banner.
    pub mode: String,
    /// Whether optional vision subsystems should be constructed at all.
    pub enable_vision: bool,
    /// Preferred input device index. None = host default.
    pub mic_index: Option<usize>,
    pub reasoner_url: String,
    pub transcriber_url: String,
    pub knowledge_url: String,
    /// Knowledge lookups are keyed; no key means the role stays absent.
    pub knowledge_api_key: Option<String>,
    /// Voice name handed to the speech binary. None = system default.
    pub voice: Option<String>,
    /// Snapshot file flushed by MemoryStore::save.
    pub memory_store_path: PathBuf,
    /// Directory receiving the append-only conversation log.
    pub memory_dir: PathBuf,
}

impl AssistantConfig {
    pub fn from_env() -> Self {
        Self {
            mode: env::var("PARLEY_MODE").unwrap_or_else(|_| "standard".to_string()),
            enable_vision: env::var("PARLEY_VISION")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            mic_index: env::var("PARLEY_MIC_INDEX").ok().and_then(|v| v.parse().ok()),
            reasoner_url: env::var("PARLEY_REASONER_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            transcriber_url: env::var("PARLEY_STT_URL")
                .unwrap_or_else(|_| "http://localhost:8081".to_string()),
            knowledge_url: env::var("PARLEY_KNOWLEDGE_URL")
                .unwrap_or_else(|_| "https://api.perplexity.ai".to_string()),
            knowledge_api_key: env::var("PARLEY_KNOWLEDGE_KEY").ok(),
            voice: env::var("PARLEY_VOICE").ok(),
            memory_store_path: env::var("PARLEY_MEMORY_STORE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./memory/memory_store.json")),
            memory_dir: env::var("PARLEY_MEMORY_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./conversation_memory")),
        }
    }
}
