//! Audio decoding using symphonia.

use crate::error::{Error, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{CODEC_TYPE_NULL, CodecParameters, DecoderOptions};
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::trace;

/// Decoded audio data.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Audio samples as mono f32 in range [-1.0, 1.0].
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Duration in seconds.
    pub duration_secs: f64,
}

impl DecodedAudio {
    /// Samples covering `[start, end]` seconds, clamped to the decoded range.
    ///
    /// Returns `None` when the clamped range is empty.
    pub fn slice(&self, start: f64, end: f64) -> Option<&[f32]> {
        let first = self.sample_index(start);
        let last = self.sample_index(end);
        (last > first).then(|| &self.samples[first..last])
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn sample_index(&self, seconds: f64) -> usize {
        let index = (seconds.max(0.0) * f64::from(self.sample_rate)).round() as usize;
        index.min(self.samples.len())
    }
}

/// Decode an audio file to mono f32 samples.
///
/// Supports WAV, FLAC, MP3, and AAC formats. Errors raised after the
/// container opened satisfy [`Error::is_decode_error`].
pub fn decode_audio_file(path: &Path) -> Result<DecodedAudio> {
    let OpenedTrack {
        mut format,
        codec_params,
        track_id,
        sample_rate,
    } = open_track(path)?;
    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| Error::AudioDecode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(Error::AudioDecode {
                    path: path.to_path_buf(),
                    source: Box::new(e),
                });
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder.decode(&packet).map_err(|e| Error::AudioDecode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        append_samples(&decoded, &mut samples);
    }

    #[allow(clippy::cast_precision_loss)]
    let duration_secs = samples.len() as f64 / f64::from(sample_rate);

    Ok(DecodedAudio {
        samples,
        sample_rate,
        duration_secs,
    })
}

/// Duration of an audio file in seconds, read from the container header.
///
/// Falls back to a full decode when the container does not declare a frame
/// count.
pub fn probe_duration(path: &Path) -> Result<f64> {
    let opened = open_track(path)?;
    match opened.codec_params.n_frames {
        #[allow(clippy::cast_precision_loss)]
        Some(frames) => Ok(frames as f64 / f64::from(opened.sample_rate)),
        None => decode_audio_file(path).map(|audio| audio.duration_secs),
    }
}

struct OpenedTrack {
    format: Box<dyn FormatReader>,
    codec_params: CodecParameters,
    track_id: u32,
    sample_rate: u32,
}

/// Probe the container and select the first decodable audio track.
fn open_track(path: &Path) -> Result<OpenedTrack> {
    let file = File::open(path).map_err(|e| Error::AudioOpen {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::AudioOpen {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::NoAudioTracks {
            path: path.to_path_buf(),
        })?;

    let sample_rate = track
        .codec_params
        .sample_rate
        .filter(|&rate| rate > 0)
        .ok_or_else(|| Error::AudioDecode {
            path: path.to_path_buf(),
            source: "missing sample rate".into(),
        })?;
    let codec_params = track.codec_params.clone();
    let track_id = track.id;

    Ok(OpenedTrack {
        format,
        codec_params,
        track_id,
        sample_rate,
    })
}

/// Append decoded samples to the output buffer, averaging channels to mono.
fn append_samples(buffer: &AudioBufferRef, output: &mut Vec<f32>) {
    const I16_NORM: f32 = 32768.0;
    const I32_NORM: f32 = 2_147_483_648.0;

    match buffer {
        AudioBufferRef::F32(buf) => {
            mix_down(output, buf.spec().channels.count(), buf.frames(), |ch, i| {
                buf.chan(ch)[i]
            });
        }
        #[allow(clippy::cast_possible_truncation)]
        AudioBufferRef::F64(buf) => {
            mix_down(output, buf.spec().channels.count(), buf.frames(), |ch, i| {
                buf.chan(ch)[i] as f32
            });
        }
        AudioBufferRef::S16(buf) => {
            mix_down(output, buf.spec().channels.count(), buf.frames(), |ch, i| {
                f32::from(buf.chan(ch)[i]) / I16_NORM
            });
        }
        #[allow(clippy::cast_precision_loss)]
        AudioBufferRef::S32(buf) => {
            mix_down(output, buf.spec().channels.count(), buf.frames(), |ch, i| {
                buf.chan(ch)[i] as f32 / I32_NORM
            });
        }
        AudioBufferRef::U8(buf) => {
            mix_down(output, buf.spec().channels.count(), buf.frames(), |ch, i| {
                (f32::from(buf.chan(ch)[i]) - 128.0) / 128.0
            });
        }
        _ => trace!("Skipping packet with unsupported sample format"),
    }
}

fn mix_down(
    output: &mut Vec<f32>,
    channels: usize,
    frames: usize,
    sample: impl Fn(usize, usize) -> f32,
) {
    let channels = channels.max(1);
    #[allow(clippy::cast_precision_loss)]
    let scale = 1.0 / channels as f32;

    output.reserve(frames);
    for i in 0..frames {
        let sum: f32 = (0..channels).map(|ch| sample(ch, i)).sum();
        output.push(sum * scale);
    }
}
