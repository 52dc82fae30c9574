use std::io::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use ringbuf::traits::Split;
use ringbuf::{HeapCons, HeapRb};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;

use crate::audio::{AudioCapture, CaptureError, PhraseCollector};
use crate::subsystems::transcribe::Transcriber;
use crate::turn::Utterance;

/// Overall wait for speech to begin.
pub const LISTEN_TIMEOUT: Duration = Duration::from_secs(15);
/// Cutoff once speech has started.
pub const MAX_PHRASE_DURATION: Duration = Duration::from_secs(40);

const RING_CAPACITY: usize = 16384;

#[derive(Debug)]
pub enum ListenOutcome {
    Heard(Utterance),
    /// Capture or recognition failed; the loop logs and listens again.
    Failed(CaptureError),
    /// The channel can produce no further utterances.
    Closed,
}

/// Source of one utterance per call. The microphone channel bounds its wait;
/// the console channel blocks until a line arrives.
#[async_trait(?Send)]
pub trait InputChannel {
    async fn next(&mut self) -> ListenOutcome;
    /// Release any capture resources. Called once at shutdown.
    fn close(&mut self) {}
}

/// Fallback channel: one line of stdin per utterance.
pub struct ConsoleInput {
    lines: Lines<BufReader<Stdin>>,
}

impl ConsoleInput {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for ConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl InputChannel for ConsoleInput {
    async fn next(&mut self) -> ListenOutcome {
        loop {
            print!("you> ");
            let _ = std::io::stdout().flush();

            match self.lines.next_line().await {
                Ok(Some(line)) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    return ListenOutcome::Heard(Utterance::typed(trimmed));
                }
                Ok(None) => return ListenOutcome::Closed,
                Err(e) => return ListenOutcome::Failed(CaptureError::Stream(e.to_string())),
            }
        }
    }
}

/// Microphone channel: bounded phrase capture, then transcription.
pub struct MicrophoneInput {
    capture: Option<AudioCapture>,
    collector: PhraseCollector<HeapCons<f32>>,
    transcriber: Box<dyn Transcriber>,
}

impl MicrophoneInput {
    pub fn open(
        device_index: Option<usize>,
        transcriber: Box<dyn Transcriber>,
    ) -> Result<Self, CaptureError> {
        let rb = HeapRb::<f32>::new(RING_CAPACITY);
        let (producer, consumer) = rb.split();

        let capture = AudioCapture::new(producer, device_index)?;
        let collector = PhraseCollector::new(consumer, capture.sample_rate);
        info!("microphone ready at {}Hz", capture.sample_rate);

        Ok(Self {
            capture: Some(capture),
            collector,
            transcriber,
        })
    }
}

#[async_trait(?Send)]
impl InputChannel for MicrophoneInput {
    async fn next(&mut self) -> ListenOutcome {
        if self.capture.is_none() {
            return ListenOutcome::Closed;
        }

        info!("listening...");
        let samples = match self
            .collector
            .collect(LISTEN_TIMEOUT, MAX_PHRASE_DURATION)
            .await
        {
            Ok(samples) => samples,
            Err(e) => return ListenOutcome::Failed(e),
        };

        let rate = self.collector.sample_rate();
        match self.transcriber.transcribe(&samples, rate).await {
            Ok(text) if text.trim().is_empty() => {
                ListenOutcome::Failed(CaptureError::Recognition("empty transcription".into()))
            }
            Ok(text) => ListenOutcome::Heard(Utterance::heard(text.trim())),
            Err(e) => ListenOutcome::Failed(CaptureError::Recognition(e.to_string())),
        }
    }

    fn close(&mut self) {
        // Dropping the capture tears down the cpal stream.
        self.capture = None;
    }
}
