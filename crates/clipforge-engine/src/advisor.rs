//! Timestamp suggestion: external AI-backed candidate start offsets with a
//! deterministic fallback.
//!
//! Advisory only. The orchestrator tolerates fewer suggestions than clips
//! by padding from the uniform distribution, so `suggest` never fails.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Provider of suggested clip start offsets.
#[async_trait]
pub trait TimestampAdvisor: Send + Sync {
    /// Suggest up to `count` start offsets, each strictly before
    /// `duration - clip_length`. Infallible: implementations fall back to a
    /// deterministic distribution rather than erroring.
    async fn suggest(&self, duration: f64, clip_length: f64, count: usize) -> Vec<f64>;
}

/// Deterministic fallback offsets: `(i+1) * floor(duration / (count+2))`.
pub fn fallback_offsets(duration: f64, count: usize) -> Vec<f64> {
    let stride = (duration / (count as f64 + 2.0)).floor();
    (0..count).map(|i| (i as f64 + 1.0) * stride).collect()
}

/// Drop candidates too close to end-of-file and trim to `count`.
fn sanitize_offsets(offsets: Vec<f64>, duration: f64, clip_length: f64, count: usize) -> Vec<f64> {
    offsets
        .into_iter()
        .filter(|&o| o >= 0.0 && o < duration - clip_length)
        .take(count)
        .collect()
}

#[derive(Debug, Error)]
enum AdvisorError {
    #[error("Suggestion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed suggestion response: {0}")]
    Malformed(String),
}

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

/// AI-backed advisor using the Gemini API.
pub struct GeminiAdvisor {
    api_key: String,
    model: String,
    client: Client,
}

impl GeminiAdvisor {
    /// Create from environment. Returns `None` when `GEMINI_API_KEY` is
    /// unset, so callers can wire the fallback advisor instead.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok()?;
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Some(Self {
            api_key,
            model,
            client: Client::new(),
        })
    }

    fn build_prompt(duration: f64, count: usize) -> String {
        format!(
            "You are a viral video strategist. The video is {:.0} seconds long. \
             Suggest {} start timestamps (in seconds) for short clips that would \
             have the best chance of going viral. \
             Return ONLY a comma-separated list of numbers. Example: 10, 45, 120",
            duration, count
        )
    }

    async fn request_offsets(&self, duration: f64, count: usize) -> Result<Vec<f64>, AdvisorError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_API_BASE, self.model, self.api_key
        );

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Self::build_prompt(duration, count),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<GeminiResponse>()
            .await?;

        let text = response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| AdvisorError::Malformed("empty candidate list".to_string()))?;

        let offsets = parse_offsets(text);
        if offsets.is_empty() {
            return Err(AdvisorError::Malformed(format!(
                "no numeric offsets in: {}",
                text.trim()
            )));
        }

        Ok(offsets)
    }
}

#[async_trait]
impl TimestampAdvisor for GeminiAdvisor {
    async fn suggest(&self, duration: f64, clip_length: f64, count: usize) -> Vec<f64> {
        match self.request_offsets(duration, count).await {
            Ok(offsets) => {
                debug!("Advisor returned {} candidate offsets", offsets.len());
                sanitize_offsets(offsets, duration, clip_length, count)
            }
            Err(e) => {
                warn!("Suggestion request failed, using fallback offsets: {}", e);
                sanitize_offsets(fallback_offsets(duration, count), duration, clip_length, count)
            }
        }
    }
}

/// Deterministic-only advisor for environments without an API key.
pub struct FallbackAdvisor;

#[async_trait]
impl TimestampAdvisor for FallbackAdvisor {
    async fn suggest(&self, duration: f64, clip_length: f64, count: usize) -> Vec<f64> {
        sanitize_offsets(fallback_offsets(duration, count), duration, clip_length, count)
    }
}

/// Parse a comma-separated list of numbers, ignoring junk entries.
fn parse_offsets(text: &str) -> Vec<f64> {
    text.split(',')
        .filter_map(|n| n.trim().parse::<f64>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_offsets_formula() {
        // floor(600 / 12) = 50: offsets are 50, 100, ..., 500
        let offsets = fallback_offsets(600.0, 10);
        assert_eq!(offsets.len(), 10);
        assert!((offsets[0] - 50.0).abs() < 1e-9);
        assert!((offsets[9] - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_is_deterministic() {
        assert_eq!(fallback_offsets(754.3, 10), fallback_offsets(754.3, 10));
    }

    #[test]
    fn test_sanitize_filters_and_trims() {
        let offsets = vec![10.0, 550.0, 590.0, -5.0, 20.0, 30.0];
        let clean = sanitize_offsets(offsets, 600.0, 15.0, 3);

        // 590 (>= 600 - 15) and -5 are dropped; trimmed to 3
        assert_eq!(clean, vec![10.0, 550.0, 20.0]);
    }

    #[test]
    fn test_parse_offsets_ignores_junk() {
        assert_eq!(parse_offsets("10, 45.5, abc, 120"), vec![10.0, 45.5, 120.0]);
        assert!(parse_offsets("no numbers here").is_empty());
    }

    #[tokio::test]
    async fn test_fallback_advisor_bounded() {
        let offsets = FallbackAdvisor.suggest(600.0, 15.0, 10).await;
        assert!(offsets.len() <= 10);
        for o in offsets {
            assert!(o < 600.0 - 15.0);
        }
    }

    #[tokio::test]
    async fn test_fallback_advisor_short_source() {
        // Nothing survives the end-of-file filter: still no failure.
        let offsets = FallbackAdvisor.suggest(16.0, 15.0, 10).await;
        assert!(offsets.len() <= 10);
    }
}
