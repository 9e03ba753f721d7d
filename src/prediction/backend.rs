//! Reference HTTP backend.
//!
//! ```text
//! EditorState ──► EditRegion (lines around cursor, marker inserted)
//!                      │
//!                      ▼
//!              render_prompt(template)
//!                      │
//!                      ▼
//!    POST <base_url>/completions ◄── raced against CancellationToken
//!                      │
//!                      ▼
//!   output.content[0].text ─► extract_intent ─► clean_prediction
//!                      │
//!                      ▼
//!                 Prediction
//! ```

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::predictor::{EditRegion, EditorState, Prediction, Predictor};
use super::prompt::{PromptContext, expects_edit_markers, render_prompt};
use super::response::{clean_prediction, extract_intent, parse_completion_body};
use crate::config::BackendSettings;
use crate::error::{PredictionError, PredictionResult};
use crate::text::insert_cursor_marker;

const LOG_TARGET: &str = "ghost_edit::backend";

/// Upper bound for a single completion request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Predictor backed by an HTTP completion endpoint.
pub struct HttpPredictor {
    client: reqwest::Client,
    endpoint: Url,
    settings: BackendSettings,
}

impl HttpPredictor {
    pub fn new(settings: BackendSettings) -> PredictionResult<Self> {
        if !expects_edit_markers(&settings.prompt_template) {
            log::warn!(
                target: LOG_TARGET,
                "Prompt template has no edit markers; responses will be used verbatim"
            );
        }

        let endpoint = completions_endpoint(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            settings,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn api_key(&self) -> Option<String> {
        let name = self.settings.api_key_env.as_deref()?;
        match std::env::var(name) {
            Ok(key) if !key.is_empty() => Some(key),
            _ => {
                log::warn!(
                    target: LOG_TARGET,
                    "API key variable {} is unset; sending request without credentials",
                    name
                );
                None
            }
        }
    }

    async fn request_completion(&self, prompt: &str) -> PredictionResult<String> {
        let body = serde_json::to_vec(&CompletionRequest {
            model: &self.settings.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        })?;

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(key) = self.api_key() {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(PredictionError::status(
                status.as_u16(),
                String::from_utf8_lossy(&bytes),
            ));
        }

        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|e| PredictionError::malformed(format!("invalid JSON body: {}", e)))?;
        parse_completion_body(&body)
    }
}

impl Predictor for HttpPredictor {
    async fn predict(
        &self,
        state: &EditorState,
        cancel: &CancellationToken,
    ) -> PredictionResult<Prediction> {
        let region = EditRegion::around_cursor(state, self.settings.context_lines);
        let document = insert_cursor_marker(&state.text, state.selection.from());
        let prompt = render_prompt(
            &self.settings.prompt_template,
            PromptContext {
                region: &region.text,
                document: &document,
            },
        );

        log::debug!(
            target: LOG_TARGET,
            "Requesting prediction for version {} (region {}..{})",
            state.version,
            region.from,
            region.to
        );

        let raw = tokio::select! {
            _ = cancel.cancelled() => {
                log::debug!(target: LOG_TARGET, "Request for version {} cancelled", state.version);
                return Err(PredictionError::Cancelled);
            }
            result = self.request_completion(&prompt) => result?,
        };

        let (intent, payload) = extract_intent(&raw);
        Ok(Prediction {
            old_text: region.text,
            new_text: clean_prediction(&payload),
            from: region.from,
            to: region.to,
            version: state.version,
            intent,
        })
    }
}

/// `<base_url>/completions`, keeping any path prefix of the base.
fn completions_endpoint(base_url: &Url) -> PredictionResult<Url> {
    let mut endpoint = base_url.clone();
    endpoint
        .path_segments_mut()
        .map_err(|_| PredictionError::config(format!("base_url '{}' cannot be a base", base_url)))?
        .pop_if_empty()
        .push("completions");
    Ok(endpoint)
}
