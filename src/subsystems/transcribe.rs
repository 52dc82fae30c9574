use std::io::Cursor;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Speech recognition over captured samples. Failure is a CaptureFailure from
/// the loop's point of view: log and re-listen.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, samples: &[f32], sample_rate: u32) -> Result<String>;
}

#[derive(Deserialize)]
struct TranscribeResponse {
    text: String,
}

/// Ships a mono 16-bit WAV to a local transcription server.
pub struct HttpTranscriber {
    client: Client,
    base_url: String,
}

impl HttpTranscriber {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            base_url,
        }
    }
}

fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        writer.write_sample((clamped * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;

    Ok(cursor.into_inner())
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, samples: &[f32], sample_rate: u32) -> Result<String> {
        let wav = encode_wav(samples, sample_rate)?;

        let response = self
            .client
            .post(format!("{}/transcribe", self.base_url))
            .header(reqwest::header::CONTENT_TYPE, "audio/wav")
            .body(wav)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("transcription server error: {}", response.status()));
        }

        let body: TranscribeResponse = response.json().await?;
        Ok(body.text.trim().to_string())
    }
}
