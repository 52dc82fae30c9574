use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::traits::Producer;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device available")]
    NoDevice,
    #[error("input device index {0} is out of range")]
    DeviceIndex(usize),
    #[error("audio stream error: {0}")]
    Stream(String),
    #[error("unsupported sample rate: {0}")]
    UnsupportedRate(u32),
    #[error("no speech detected within the listen window")]
    ListenTimeout,
    #[error("speech recognition failed: {0}")]
    Recognition(String),
}

/// Names of every input device the host exposes, in selection-index order.
pub fn list_input_devices() -> Vec<String> {
    let host = cpal::default_host();
    match host.input_devices() {
        Ok(devices) => devices
            .map(|d| d.name().unwrap_or_else(|_| "<unknown>".to_string()))
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn select_device(index: Option<usize>) -> Result<cpal::Device, CaptureError> {
    let host = cpal::default_host();
    match index {
        Some(i) => host
            .input_devices()
            .map_err(|e| CaptureError::Stream(e.to_string()))?
            .nth(i)
            .ok_or(CaptureError::DeviceIndex(i)),
        None => host.default_input_device().ok_or(CaptureError::NoDevice),
    }
}

/// Owns the cpal input stream feeding the phrase collector's ring buffer.
/// The stream dies with this struct.
pub struct AudioCapture {
    _stream: cpal::Stream,
    pub sample_rate: u32,
}

impl AudioCapture {
    pub fn new<P>(mut producer: P, device_index: Option<usize>) -> Result<Self, CaptureError>
    where
        P: Producer<Item = f32> + Send + 'static,
    {
        let device = select_device(device_index)?;
        info!("audio input device: {}", device.name().unwrap_or_default());

        // VAD only accepts these rates, 16k preferred for efficiency.
        let target_rates = [16000, 32000, 48000, 8000];
        let mut selected_config = None;
        let mut selected_rate = 0;

        for &rate in &target_rates {
            let configs = device
                .supported_input_configs()
                .map_err(|e| CaptureError::Stream(e.to_string()))?;
            for config_range in configs {
                if config_range.min_sample_rate().0 <= rate
                    && config_range.max_sample_rate().0 >= rate
                {
                    selected_config = Some(config_range.with_sample_rate(cpal::SampleRate(rate)));
                    selected_rate = rate;
                    break;
                }
            }
            if selected_config.is_some() {
                break;
            }
        }

        let config = match selected_config {
            Some(c) => c,
            None => {
                let def = device
                    .default_input_config()
                    .map_err(|e| CaptureError::Stream(e.to_string()))?;
                let rate = def.sample_rate().0;
                if !target_rates.contains(&rate) {
                    return Err(CaptureError::UnsupportedRate(rate));
                }
                selected_rate = rate;
                def
            }
        };

        info!(
            "audio config selected: rate={}Hz channels={}",
            selected_rate,
            config.channels()
        );

        let err_fn = |err| error!("audio stream error: {err}");

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => device
                .build_input_stream(
                    &config.into(),
                    move |data: &[f32], _: &_| {
                        // Lossy on overrun: push_slice drops what does not fit.
                        producer.push_slice(data);
                    },
                    err_fn,
                    None,
                )
                .map_err(|e| CaptureError::Stream(e.to_string()))?,
            cpal::SampleFormat::I16 => device
                .build_input_stream(
                    &config.into(),
                    move |data: &[i16], _: &_| {
                        for &sample in data {
                            let _ = producer.try_push(sample as f32 / i16::MAX as f32);
                        }
                    },
                    err_fn,
                    None,
                )
                .map_err(|e| CaptureError::Stream(e.to_string()))?,
            other => {
                return Err(CaptureError::Stream(format!(
                    "unsupported sample format: {other:?}"
                )))
            }
        };

        stream
            .play()
            .map_err(|e| CaptureError::Stream(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            sample_rate: selected_rate,
        })
    }
}
