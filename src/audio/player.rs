//! Audio decoding and playback output.
//!
//! Decoding is a black box: rodio's decoder turns the raw file bytes into
//! interleaved f32 samples, from which the clip duration and the waveform
//! peaks are derived. Playback creates one seekable handle (a sink on the
//! output stream) per play gesture; the handle must be stopped before a new
//! one is created.

use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use rodio::buffer::SamplesBuffer;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::Cursor;
use std::time::Duration;

/// A fully decoded audio clip.
///
/// Samples are interleaved f32 in [-1, 1].
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    samples: Vec<f32>,
    channels: u16,
    sample_rate: u32,
}

impl DecodedAudio {
    /// Decodes raw file bytes into samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the container or codec is unsupported, or the
    /// file decodes to no samples.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let decoder = Decoder::new(Cursor::new(bytes.to_vec()))
            .map_err(|e| anyhow!("unsupported or corrupt audio data: {e}"))?;
        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        let samples: Vec<f32> = decoder.convert_samples().collect();

        if samples.is_empty() {
            return Err(anyhow!("audio decoded to zero samples"));
        }

        Ok(Self {
            samples,
            channels,
            sample_rate,
        })
    }

    /// Builds a clip directly from samples (tests and tools).
    pub fn from_samples(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Self {
        Self {
            samples,
            channels,
            sample_rate,
        }
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of sample frames (one per channel set).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    /// Clip duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.frames() as f64 / self.sample_rate.max(1) as f64
    }

    /// Computes per-column (min, max) peak pairs over a time range.
    ///
    /// Each column covers an equal slice of `[start, end)` seconds. Columns
    /// past the end of the clip come back as silence. Columns are
    /// independent, so they are computed in parallel.
    pub fn peaks_range(&self, start: f64, end: f64, columns: usize) -> Vec<(f32, f32)> {
        if columns == 0 || end <= start {
            return Vec::new();
        }

        let channels = self.channels.max(1) as usize;
        let frames = self.frames();
        let seconds_per_column = (end - start) / columns as f64;

        (0..columns)
            .into_par_iter()
            .map(|col| {
                let t0 = start + col as f64 * seconds_per_column;
                let t1 = t0 + seconds_per_column;
                let f0 = ((t0 * self.sample_rate as f64) as usize).min(frames);
                let f1 = ((t1 * self.sample_rate as f64).ceil() as usize).min(frames);
                if f0 >= f1 {
                    return (0.0, 0.0);
                }

                let mut min = f32::MAX;
                let mut max = f32::MIN;
                for sample in &self.samples[f0 * channels..f1 * channels] {
                    min = min.min(*sample);
                    max = max.max(*sample);
                }
                (min, max)
            })
            .collect()
    }

    /// Peak pairs over the whole clip.
    pub fn peaks(&self, columns: usize) -> Vec<(f32, f32)> {
        self.peaks_range(0.0, self.duration_seconds(), columns)
    }
}

/// The audio output device, kept alive for the whole session.
pub struct AudioOutput {
    /// Output stream (must be kept alive for the sink to keep playing).
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl AudioOutput {
    /// Opens the default output device.
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default().context("Failed to open audio output")?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }

    /// Starts playing a clip from an offset in seconds and returns the
    /// handle controlling that playback.
    pub fn play_from(&self, audio: &DecodedAudio, offset: f64) -> Result<PlaybackHandle> {
        let sink = Sink::try_new(&self.handle).context("Failed to create playback sink")?;
        let source = SamplesBuffer::new(
            audio.channels(),
            audio.sample_rate(),
            audio.samples.clone(),
        )
        .skip_duration(Duration::from_secs_f64(offset.max(0.0)));
        sink.append(source);
        Ok(PlaybackHandle { sink })
    }
}

/// Handle to one in-flight playback.
///
/// Dropping the handle also stops the audio; `stop` is idempotent and never
/// fails (stopping an already-stopped sink is a no-op).
pub struct PlaybackHandle {
    sink: Sink,
}

impl PlaybackHandle {
    pub fn stop(&self) {
        self.sink.stop();
    }
}
