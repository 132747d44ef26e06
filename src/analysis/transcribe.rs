//! Transcription service client.
//!
//! The transcription service is an external collaborator: it receives the
//! raw audio bytes (base64-encoded, with a MIME type) and returns a JSON
//! object with the musical key, scale, tempo, and the note events. This
//! module owns the wire schema, the upload guards, and the HTTP client.
//!
//! # Limitations
//!
//! - Uploads are limited to 50 MB and rejected before any encoding or
//!   network traffic
//! - No retries: every failure is terminal for that upload attempt

use base64::{engine::general_purpose::STANDARD as base64, Engine};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Maximum accepted upload size in bytes (50 MB).
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Environment variable holding the transcription API key.
pub const API_KEY_ENV: &str = "ROLLSCRIBE_API_KEY";

/// Environment variable overriding the transcription endpoint.
pub const ENDPOINT_ENV: &str = "ROLLSCRIBE_ENDPOINT";

/// Default transcription endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://transcribe.rollscribe.app/v1/transcribe";

/// Errors that can occur during transcription.
#[derive(Debug, Error)]
pub enum TranscribeError {
    /// The audio exceeds the upload limit. Raised before any processing.
    #[error("audio is {size} bytes; the upload limit is {MAX_UPLOAD_BYTES} bytes (50 MB)")]
    TooLarge { size: u64 },

    /// No API key is configured. Raised before any network traffic.
    #[error("transcription API key is not set (export {API_KEY_ENV})")]
    MissingApiKey,

    /// The request itself failed (connection, HTTP status, body read).
    #[error("transcription request failed: {0}")]
    Http(String),

    /// The service responded but the body did not match the schema.
    /// A missing or malformed note array lands here.
    #[error("invalid transcription response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// Rejects payloads over the upload limit.
pub fn ensure_upload_size(size: u64) -> Result<(), TranscribeError> {
    if size > MAX_UPLOAD_BYTES {
        Err(TranscribeError::TooLarge { size })
    } else {
        Ok(())
    }
}

/// Guesses the MIME type for an audio file from its extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        Some("m4a") => "audio/mp4",
        _ => "application/octet-stream",
    }
}

/// One note event as reported by the service.
///
/// Field names follow the service's JSON schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteEvent {
    /// MIDI pitch number. Clamped into 21-108 on receipt.
    pub midi: i64,
    /// Start time in seconds.
    pub start_time: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// Intensity 0.0-1.0.
    pub velocity: f64,
}

/// The service's response object.
///
/// `key`, `scale`, and `bpm` fall back to literals when omitted; a missing
/// or type-invalid `notes` array fails deserialization outright.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionResponse {
    #[serde(default = "default_key")]
    pub key: String,
    #[serde(default = "default_scale")]
    pub scale: String,
    #[serde(default = "default_bpm")]
    pub bpm: f64,
    pub notes: Vec<NoteEvent>,
}

fn default_key() -> String {
    super::DEFAULT_KEY.to_string()
}

fn default_scale() -> String {
    super::DEFAULT_SCALE.to_string()
}

fn default_bpm() -> f64 {
    super::DEFAULT_BPM
}

/// Parses a raw response body against the wire schema.
pub fn parse_response(body: &str) -> Result<TranscriptionResponse, TranscribeError> {
    Ok(serde_json::from_str(body)?)
}

/// The request body sent to the service.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TranscriptionRequest {
    /// Base64-encoded audio bytes.
    audio: String,
    mime_type: String,
}

/// Abstraction over the transcription call, so the load flow can be
/// exercised in tests without a network.
pub trait Transcriber {
    /// Transcribes raw audio bytes into note events.
    fn transcribe(&self, audio: &[u8], mime: &str)
        -> Result<TranscriptionResponse, TranscribeError>;
}

/// HTTP client for the real transcription service.
pub struct HttpTranscriber {
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTranscriber {
    /// Creates a client from the environment.
    ///
    /// `endpoint` overrides both [`ENDPOINT_ENV`] and the built-in default.
    /// A missing API key is not an error here; it surfaces as
    /// [`TranscribeError::MissingApiKey`] on the first call.
    pub fn from_env(endpoint: Option<String>) -> Self {
        let endpoint = endpoint
            .or_else(|| std::env::var(ENDPOINT_ENV).ok())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Self {
            endpoint,
            api_key: std::env::var(API_KEY_ENV).ok(),
        }
    }

    /// Creates a client with explicit settings.
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

impl Transcriber for HttpTranscriber {
    fn transcribe(
        &self,
        audio: &[u8],
        mime: &str,
    ) -> Result<TranscriptionResponse, TranscribeError> {
        // Guards run before any encoding or network traffic
        ensure_upload_size(audio.len() as u64)?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TranscribeError::MissingApiKey)?;

        let request = TranscriptionRequest {
            audio: base64.encode(audio),
            mime_type: mime.to_string(),
        };

        let mut response = ureq::post(&self.endpoint)
            .header("x-api-key", api_key)
            .send_json(&request)
            .map_err(|e| TranscribeError::Http(e.to_string()))?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TranscribeError::Http(e.to_string()))?;

        parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisResult;

    #[test]
    fn test_parse_full_response() {
        let body = r#"{
            "key": "F#",
            "scale": "minor",
            "bpm": 96.5,
            "notes": [
                {"midi": 60, "startTime": 5.0, "duration": 2.0, "velocity": 0.8}
            ]
        }"#;
        let response = parse_response(body).unwrap();
        assert_eq!(response.key, "F#");
        assert_eq!(response.scale, "minor");
        assert_eq!(response.bpm, 96.5);
        assert_eq!(response.notes.len(), 1);
        assert_eq!(response.notes[0].midi, 60);
        assert_eq!(response.notes[0].start_time, 5.0);
    }

    #[test]
    fn test_missing_metadata_uses_fallbacks() {
        let body = r#"{"notes": []}"#;
        let response = parse_response(body).unwrap();
        assert_eq!(response.key, "C");
        assert_eq!(response.scale, "major");
        assert_eq!(response.bpm, 120.0);
    }

    #[test]
    fn test_missing_notes_is_hard_failure() {
        let body = r#"{"key": "C", "scale": "major", "bpm": 120}"#;
        assert!(matches!(
            parse_response(body),
            Err(TranscribeError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_malformed_notes_is_hard_failure() {
        let body = r#"{"notes": "three of them"}"#;
        assert!(matches!(
            parse_response(body),
            Err(TranscribeError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_upload_size_guard() {
        assert!(ensure_upload_size(MAX_UPLOAD_BYTES).is_ok());
        assert!(matches!(
            ensure_upload_size(MAX_UPLOAD_BYTES + 1),
            Err(TranscribeError::TooLarge { .. })
        ));
        // 60 MB is over the limit
        assert!(ensure_upload_size(60 * 1024 * 1024).is_err());
    }

    #[test]
    fn test_oversize_rejected_before_credential_check() {
        // No API key configured, but the size guard fires first
        let client = HttpTranscriber::new("http://localhost:0", None);
        let oversized = vec![0u8; (MAX_UPLOAD_BYTES + 1) as usize];
        assert!(matches!(
            client.transcribe(&oversized, "audio/wav"),
            Err(TranscribeError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_missing_api_key_is_immediate() {
        let client = HttpTranscriber::new("http://localhost:0", None);
        assert!(matches!(
            client.transcribe(&[0u8; 16], "audio/wav"),
            Err(TranscribeError::MissingApiKey)
        ));
    }

    #[test]
    fn test_response_values_clamped_on_receipt() {
        let body = r#"{
            "bpm": -4,
            "notes": [
                {"midi": 300, "startTime": -2.0, "duration": 1.0, "velocity": 1.5},
                {"midi": 60, "startTime": 0.0, "duration": 0.0, "velocity": 0.5}
            ]
        }"#;
        let analysis = AnalysisResult::from_response(parse_response(body).unwrap());
        assert_eq!(analysis.bpm, 120.0);
        // The zero-duration note is dropped
        assert_eq!(analysis.notes().len(), 1);
        let note = &analysis.notes()[0];
        assert_eq!(note.pitch, 108);
        assert_eq!(note.start_time, 0.0);
        assert_eq!(note.intensity, 1.0);
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("a.wav")), "audio/wav");
        assert_eq!(mime_for_path(Path::new("a.MP3")), "audio/mpeg");
        assert_eq!(mime_for_path(Path::new("a.xyz")), "application/octet-stream");
    }
}
