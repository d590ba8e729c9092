//! Audio decoding.

mod decode;

pub use decode::{DecodedAudio, decode_audio_file, probe_duration};
