//! Abstract translation.
//!
//! The detail view can translate a paper's abstract with one of two methods:
//!
//! - SiliconFlow, an OpenAI-compatible chat-completions API. The request is
//!   a single user message asking for a fluent translation into the target
//!   language; the first choice of the response is the translation.
//! - Youdao, through a keyless public GET endpoint that returns the
//!   translation under `data.target.text`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::TranslationConfig;
use crate::utils::{HttpClient, HttpSettings};

/// SiliconFlow chat-completions endpoint
pub const SILICONFLOW_API_URL: &str = "https://api.siliconflow.cn/v1/chat/completions";

/// Keyless Youdao translation endpoint
pub const YOUDAO_API_URL: &str = "https://60s.viki.moe/v2/fanyi";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "deepseek-ai/DeepSeek-V3";

/// Longest input sent to the model, in characters
pub const MAX_INPUT_CHARS: usize = 6000;

/// Models offered in the picker: (display name, model id)
pub const MODELS: &[(&str, &str)] = &[
    ("DeepSeek-V3", "deepseek-ai/DeepSeek-V3"),
    ("DeepSeek-R1", "deepseek-ai/DeepSeek-R1"),
    ("Kimi", "moonshotai/Kimi-K2-Instruct"),
];

/// Resolve a model display name or id to a model id
pub fn resolve_model(name_or_id: &str) -> Option<&'static str> {
    MODELS
        .iter()
        .find(|(name, id)| name.eq_ignore_ascii_case(name_or_id) || *id == name_or_id)
        .map(|(_, id)| *id)
}

/// Translation target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetLanguage {
    SimplifiedChinese,
    TraditionalChinese,
    Japanese,
}

impl TargetLanguage {
    /// Parse a user-facing label. Unknown labels fall back to Simplified Chinese.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "traditional chinese" | "chinese (traditional)" | "zh-tw" | "zh-hant" | "zh-cht" => {
                TargetLanguage::TraditionalChinese
            }
            "japanese" | "ja" | "jp" => TargetLanguage::Japanese,
            _ => TargetLanguage::SimplifiedChinese,
        }
    }

    /// Language name used in the prompt
    pub fn prompt_name(&self) -> &'static str {
        match self {
            TargetLanguage::SimplifiedChinese => "Simplified Chinese",
            TargetLanguage::TraditionalChinese => "Traditional Chinese",
            TargetLanguage::Japanese => "Japanese",
        }
    }

    /// Language code understood by the Youdao endpoint
    pub fn youdao_code(&self) -> &'static str {
        match self {
            TargetLanguage::SimplifiedChinese => "zh-CHS",
            TargetLanguage::TraditionalChinese => "zh-CHT",
            TargetLanguage::Japanese => "ja",
        }
    }
}

/// Translation backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationMethod {
    /// Chat-completions model; needs an API key
    #[default]
    SiliconFlow,
    /// Youdao; no API key
    Youdao,
}

impl TranslationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationMethod::SiliconFlow => "siliconflow",
            TranslationMethod::Youdao => "youdao",
        }
    }
}

impl fmt::Display for TranslationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranslationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "siliconflow" | "silicon-flow" | "llm" => Ok(TranslationMethod::SiliconFlow),
            "youdao" => Ok(TranslationMethod::Youdao),
            other => Err(format!(
                "unknown translation method '{}' (expected siliconflow or youdao)",
                other
            )),
        }
    }
}

/// Errors that can occur while translating
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// No API key in the configuration or environment
    #[error("Translation API key is not set (configure translation.api_key or SILICONFLOW_API_KEY)")]
    MissingApiKey,

    /// The request did not complete in time
    #[error("Translation request timed out")]
    Timeout,

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// The service reported an error
    #[error("Translation API error: {0}")]
    Api(String),

    /// The response did not contain a translation
    #[error("Unexpected translation response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for TranslateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TranslateError::Timeout
        } else {
            TranslateError::Network(err.to_string())
        }
    }
}

/// A finished translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub text: String,
    pub model: String,
    pub target: TargetLanguage,
    /// The input was cut to [`MAX_INPUT_CHARS`] before sending
    pub truncated: bool,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Option<Vec<ChatChoice>>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YoudaoResponse {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<YoudaoData>,
}

#[derive(Debug, Deserialize)]
struct YoudaoData {
    #[serde(default)]
    target: Option<YoudaoText>,
}

#[derive(Debug, Deserialize)]
struct YoudaoText {
    text: String,
}

/// Cut `text` to at most `max_chars` characters on a char boundary
fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    }
}

/// Build the single user prompt sent to the model
pub fn build_prompt(text: &str, target: TargetLanguage) -> String {
    format!(
        "Translate the following into professional, fluent, natural {}:\n\n{}",
        target.prompt_name(),
        text
    )
}

/// Name reported as the model of Youdao translations
const YOUDAO_MODEL: &str = "Youdao";

/// Translation client for either [`TranslationMethod`]
#[derive(Debug, Clone)]
pub struct Translator {
    client: Arc<HttpClient>,
    method: TranslationMethod,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl Translator {
    /// Create a translator from the `[translation]` configuration section
    pub fn from_config(config: &TranslationConfig) -> Result<Self, TranslateError> {
        let settings = HttpSettings {
            timeout: config.timeout(),
            ..Default::default()
        };
        let client = Arc::new(HttpClient::with_settings(&settings)?);
        Ok(match config.method {
            TranslationMethod::SiliconFlow => Self::with_client(
                client,
                config.api_url.clone(),
                config.resolved_api_key(),
                resolve_model(&config.model)
                    .map(str::to_string)
                    .unwrap_or_else(|| config.model.clone()),
            ),
            TranslationMethod::Youdao => Self::youdao_with_client(client, YOUDAO_API_URL),
        })
    }

    /// Create a chat-completions translator with a custom HTTP client and endpoint
    pub fn with_client(
        client: Arc<HttpClient>,
        api_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            method: TranslationMethod::SiliconFlow,
            api_url: api_url.into(),
            api_key,
            model: model.into(),
        }
    }

    /// Create a Youdao translator with a custom HTTP client and endpoint
    pub fn youdao_with_client(client: Arc<HttpClient>, api_url: impl Into<String>) -> Self {
        Self {
            client,
            method: TranslationMethod::Youdao,
            api_url: api_url.into(),
            api_key: None,
            model: YOUDAO_MODEL.to_string(),
        }
    }

    pub fn method(&self) -> TranslationMethod {
        self.method
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Translate `text` into `target`
    pub async fn translate(
        &self,
        text: &str,
        target: TargetLanguage,
    ) -> Result<Translation, TranslateError> {
        match self.method {
            TranslationMethod::SiliconFlow => self.translate_chat(text, target).await,
            TranslationMethod::Youdao => self.translate_youdao(text, target).await,
        }
    }

    async fn translate_chat(
        &self,
        text: &str,
        target: TargetLanguage,
    ) -> Result<Translation, TranslateError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(TranslateError::MissingApiKey)?;

        let (input, truncated) = truncate_chars(text, MAX_INPUT_CHARS);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: build_prompt(input, target),
            }],
            temperature: 0.3,
            max_tokens: 2048,
            stream: false,
        };

        tracing::debug!(model = %self.model, chars = input.chars().count(), truncated, "Requesting translation");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let parsed: Option<ChatResponse> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let message = parsed
                .and_then(|r| r.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("HTTP {}: {}", status.as_u16(), body.trim()));
            tracing::warn!(status = status.as_u16(), "Translation request failed");
            return Err(TranslateError::Api(message));
        }

        let parsed = parsed.ok_or_else(|| TranslateError::Malformed(body.clone()))?;

        if let Some(choice) = parsed.choices.and_then(|c| c.into_iter().next()) {
            return Ok(Translation {
                text: choice.message.content,
                model: self.model.clone(),
                target,
                truncated,
            });
        }

        match parsed.error {
            Some(error) => Err(TranslateError::Api(
                error.message.unwrap_or_else(|| "unknown error".to_string()),
            )),
            None => Err(TranslateError::Malformed(body)),
        }
    }

    async fn translate_youdao(
        &self,
        text: &str,
        target: TargetLanguage,
    ) -> Result<Translation, TranslateError> {
        let (input, truncated) = truncate_chars(text, MAX_INPUT_CHARS);
        let url = format!(
            "{}?text={}&to={}",
            self.api_url,
            urlencoding::encode(input),
            target.youdao_code()
        );

        tracing::debug!(to = target.youdao_code(), chars = input.chars().count(), truncated, "Requesting Youdao translation");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed: Option<YoudaoResponse> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let message = parsed
                .and_then(|r| r.message)
                .unwrap_or_else(|| format!("HTTP {}: {}", status.as_u16(), body.trim()));
            tracing::warn!(status = status.as_u16(), "Youdao translation request failed");
            return Err(TranslateError::Api(message));
        }

        let parsed = parsed.ok_or_else(|| TranslateError::Malformed(body.clone()))?;

        if let Some(translated) = parsed.data.and_then(|d| d.target) {
            return Ok(Translation {
                text: translated.text,
                model: self.model.clone(),
                target,
                truncated,
            });
        }

        // A non-200 code in the envelope carries the reason in `message`
        match (parsed.code, parsed.message) {
            (Some(code), Some(message)) if code != 200 => Err(TranslateError::Api(message)),
            _ => Err(TranslateError::Malformed(body)),
        }
    }
}
