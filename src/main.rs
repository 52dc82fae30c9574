use tracing_subscriber::{EnvFilter, FmtSubscriber};

use parley::audio;
use parley::bootstrap::{self, SubsystemFactories};
use parley::config::AssistantConfig;
use parley::input::{ConsoleInput, InputChannel, MicrophoneInput};
use parley::interaction::{self, InteractionLoop};
use parley::shutdown;
use parley::subsystems::transcribe::HttpTranscriber;

const GREETING: &str = "Hello, I'm online and ready to assist you.";

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let config = AssistantConfig::from_env();
    tracing::info!("assistant booting, mode: {}", config.mode);
    tracing::info!(
        "vision: {}",
        if config.enable_vision { "enabled" } else { "disabled" }
    );

    let factories = SubsystemFactories::from_config(&config);
    let mut registry = bootstrap::initialize(factories, &config);

    println!("assistant> {GREETING}");
    interaction::speak_best_effort(&mut registry, GREETING).await;

    let devices = audio::list_input_devices();
    if !devices.is_empty() {
        tracing::info!("available microphones: {devices:?}");
    }

    let transcriber = Box::new(HttpTranscriber::new(config.transcriber_url.clone()));
    let mut input: Box<dyn InputChannel> =
        match MicrophoneInput::open(config.mic_index, transcriber) {
            Ok(mic) => {
                println!("speech mode active; say 'goodbye' to exit");
                Box::new(mic)
            }
            Err(e) => {
                tracing::warn!("microphone unavailable ({e}); switching to text input");
                println!("text mode active; type 'goodbye' to exit");
                Box::new(ConsoleInput::new())
            }
        };

    let mut interaction = InteractionLoop::new();
    if let Err(e) = interaction.run(&mut registry, input.as_mut()).await {
        tracing::error!("fatal error in interaction loop: {e:?}");
    }

    shutdown::run(&mut registry, Some(input.as_mut())).await;
}
