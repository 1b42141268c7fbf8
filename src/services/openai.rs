use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::models::{MatchFactor, SentimentAnalysis};

/// Explanation returned when the language model is unavailable
pub const FALLBACK_EXPLANATION: &str =
    "This course matches your preferences based on our analysis.";

/// Errors that can occur when calling the completion service
#[derive(Debug, Error)]
pub enum OpenAiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Context handed to the explanation prompt for one recommendation
#[derive(Debug)]
pub struct ExplanationContext<'a> {
    pub course_name: &'a str,
    pub difficulty_rating: Option<f64>,
    pub vibe_tags: &'a [String],
    pub handicap: Option<f64>,
    pub playing_style: Option<&'a str>,
    pub group_size: usize,
    pub score: f64,
    pub weather_condition: &'a str,
    pub factors: &'a [MatchFactor],
}

/// OpenAI-compatible chat completion client
///
/// Serves both review sentiment extraction and recommendation explanations.
/// Both are enrichments: every public entry point degrades to a documented
/// default instead of propagating service failures.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl OpenAiClient {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            model,
            client,
        }
    }

    /// Raw chat completion call; returns the first choice's content
    pub async fn complete(
        &self,
        system: &str,
        prompt: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String, OpenAiError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": prompt}
            ],
            "temperature": temperature,
            "max_tokens": max_tokens,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OpenAiError::ApiError(format!(
                "Completion request failed: {}",
                response.status()
            )));
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMessage,
        }

        #[derive(Deserialize)]
        struct ChoiceMessage {
            content: String,
        }

        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|e| OpenAiError::InvalidResponse(format!("Failed to parse completion: {}", e)))?;

        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| OpenAiError::InvalidResponse("Empty choices array".into()))
    }

    /// Analyze sentiment and extract features from a course review
    ///
    /// Any service or parse failure yields the neutral analysis; review
    /// submission never blocks on the language model.
    pub async fn analyze_review_sentiment(&self, review_text: &str) -> SentimentAnalysis {
        let prompt = format!(
            "Analyze this golf course review and provide:\n\
             1. A sentiment score (-1.0 to 1.0)\n\
             2. Key features mentioned (condition, difficulty, service, etc.)\n\
             3. Vibe tags (scenic, challenging, social, competitive)\n\n\
             Review: {}\n\n\
             Respond with a single JSON object with keys sentiment_score, features, vibe_tags.",
            review_text
        );

        let content = match self
            .complete("You are a golf course review analyst.", &prompt, 0.3, 300)
            .await
        {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Sentiment analysis failed: {}", e);
                return SentimentAnalysis::default();
            }
        };

        match parse_sentiment_payload(&content) {
            Some(analysis) => analysis,
            None => {
                tracing::warn!("Unparseable sentiment payload, using neutral defaults");
                SentimentAnalysis::default()
            }
        }
    }

    /// Generate a short natural-language explanation for a recommendation
    ///
    /// Advisory text only; failures yield the fixed fallback sentence.
    pub async fn generate_explanation(&self, ctx: &ExplanationContext<'_>) -> String {
        let factors = if ctx.factors.is_empty() {
            "none in particular".to_string()
        } else {
            ctx.factors
                .iter()
                .map(|f| f.label())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let prompt = format!(
            "Generate a brief, natural explanation for why this golf course was recommended.\n\n\
             Course details:\n\
             - Name: {}\n\
             - Difficulty: {}/10\n\
             - Vibe tags: {}\n\n\
             Player details:\n\
             - Handicap: {}\n\
             - Preferred style: {}\n\
             - Group size: {}\n\n\
             Match score: {:.2}\n\
             Contributing factors: {}\n\
             Weather: {}\n\n\
             Keep it conversational but concise (2-3 sentences).",
            ctx.course_name,
            ctx.difficulty_rating
                .map_or_else(|| "unrated".to_string(), |d| format!("{:.1}", d)),
            ctx.vibe_tags.join(", "),
            ctx.handicap
                .map_or_else(|| "unknown".to_string(), |h| format!("{:.1}", h)),
            ctx.playing_style.unwrap_or("none"),
            ctx.group_size,
            ctx.score,
            factors,
            ctx.weather_condition,
        );

        match self
            .complete(
                "You are a knowledgeable golf course recommender.",
                &prompt,
                0.7,
                150,
            )
            .await
        {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                tracing::warn!("Explanation generation failed: {}", e);
                FALLBACK_EXPLANATION.to_string()
            }
        }
    }
}

/// Parse the model's sentiment JSON, tolerating a Markdown code fence
fn parse_sentiment_payload(content: &str) -> Option<SentimentAnalysis> {
    let trimmed = strip_code_fence(content.trim());
    let analysis: SentimentAnalysis = serde_json::from_str(trimmed).ok()?;

    Some(SentimentAnalysis {
        sentiment_score: analysis.sentiment_score.clamp(-1.0, 1.0),
        ..analysis
    })
}

fn strip_code_fence(content: &str) -> &str {
    let without_open = content
        .strip_prefix("```json")
        .or_else(|| content.strip_prefix("```"))
        .unwrap_or(content);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}
