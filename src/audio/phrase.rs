use std::time::{Duration, Instant};

use ringbuf::traits::Consumer;
use tracing::debug;
use webrtc_vad::{SampleRate, Vad, VadMode};

use super::capture::CaptureError;

const FRAME_MS: usize = 30;
// Debounce: 90ms of speech to trigger start, 600ms of silence to end.
const MIN_SPEECH_FRAMES: usize = 3;
const MIN_SILENCE_FRAMES: usize = 20;

fn vad_rate(sample_rate: u32) -> Result<SampleRate, CaptureError> {
    match sample_rate {
        8000 => Ok(SampleRate::Rate8kHz),
        16000 => Ok(SampleRate::Rate16kHz),
        32000 => Ok(SampleRate::Rate32kHz),
        48000 => Ok(SampleRate::Rate48kHz),
        other => Err(CaptureError::UnsupportedRate(other)),
    }
}

/// Pulls one phrase out of the capture ring buffer per call. The wait for
/// speech onset is bounded by the listen timeout; once speech starts, the
/// phrase is cut at the max duration or after sustained silence.
pub struct PhraseCollector<C>
where
    C: Consumer<Item = f32>,
{
    consumer: C,
    sample_rate: u32,
}

impl<C> PhraseCollector<C>
where
    C: Consumer<Item = f32>,
{
    pub fn new(consumer: C, sample_rate: u32) -> Self {
        Self {
            consumer,
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub async fn collect(
        &mut self,
        listen_timeout: Duration,
        max_phrase: Duration,
    ) -> Result<Vec<f32>, CaptureError> {
        let rate = vad_rate(self.sample_rate)?;
        let mut vad = Vad::new_with_rate(rate);
        vad.set_mode(VadMode::Aggressive);

        let frame_size = (self.sample_rate as usize * FRAME_MS) / 1000;
        let mut frame_f32: Vec<f32> = vec![0.0; frame_size];
        let mut frame_i16: Vec<i16> = vec![0; frame_size];

        // Drop whatever accumulated while we were not listening.
        self.consumer.clear();

        let started = Instant::now();
        let mut speech_started: Option<Instant> = None;
        let mut consecutive_speech = 0usize;
        let mut consecutive_silence = 0usize;
        // Frames seen just before the start trigger fires; the onset would be
        // clipped from the phrase without them.
        let mut onset: Vec<Vec<f32>> = Vec::new();
        let mut collected: Vec<f32> = Vec::new();

        loop {
            match speech_started {
                None => {
                    if started.elapsed() > listen_timeout {
                        return Err(CaptureError::ListenTimeout);
                    }
                }
                Some(at) => {
                    if at.elapsed() > max_phrase {
                        debug!("max phrase duration reached, cutting capture");
                        break;
                    }
                }
            }

            if self.consumer.occupied_len() < frame_size {
                tokio::time::sleep(Duration::from_millis(10)).await;
                continue;
            }

            self.consumer.pop_slice(&mut frame_f32);
            for (dst, &sample) in frame_i16.iter_mut().zip(frame_f32.iter()) {
                *dst = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            }

            let is_speech = match vad.is_voice_segment(&frame_i16) {
                Ok(res) => res,
                Err(e) => {
                    debug!("vad error: {e:?}");
                    false
                }
            };

            if is_speech {
                consecutive_silence = 0;
                consecutive_speech += 1;
            } else {
                consecutive_speech = 0;
                consecutive_silence += 1;
            }

            if speech_started.is_some() {
                collected.extend_from_slice(&frame_f32);
                if consecutive_silence >= MIN_SILENCE_FRAMES {
                    debug!("speech end detected");
                    break;
                }
            } else {
                onset.push(frame_f32.clone());
                if onset.len() > MIN_SPEECH_FRAMES {
                    onset.remove(0);
                }
                if consecutive_speech >= MIN_SPEECH_FRAMES {
                    debug!("speech start detected");
                    speech_started = Some(Instant::now());
                    for frame in onset.drain(..) {
                        collected.extend_from_slice(&frame);
                    }
                }
            }
        }

        Ok(collected)
    }
}
