use tracing::{error, info};

use crate::input::InputChannel;
use crate::registry::SubsystemRegistry;

/// Flush and stop every stateful subsystem still present. Each attempt is
/// isolated: a failure is logged and the next attempt still runs. Never
/// returns an error.
pub async fn run(registry: &mut SubsystemRegistry, input: Option<&mut dyn InputChannel>) {
    info!("shutting down assistant services...");

    if let Some(memory) = registry.memory.as_mut() {
        match memory.save() {
            Ok(()) => info!("memory flushed"),
            Err(e) => error!("error saving memory on shutdown: {e}"),
        }
    }

    if let Some(voice) = registry.voice.as_mut() {
        if let Err(e) = voice.stop().await {
            error!("error stopping voice output: {e:#}");
        }
    }

    if let Some(input) = input {
        input.close();
    }

    info!("assistant stopped cleanly");
}
