pub mod capture;
pub mod phrase;

pub use capture::{list_input_devices, AudioCapture, CaptureError};
pub use phrase::PhraseCollector;
