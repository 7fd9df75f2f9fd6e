use async_trait::async_trait;
use futures_util::StreamExt;
use memchr::memchr;
use tracing::debug;

use crate::api::{build_messages, ChatRequest, ChatResponse};
use crate::core::completion::{CompletionError, CompletionService};
use crate::core::config::Settings;
use crate::utils::url::construct_api_url;

#[derive(Debug, PartialEq, Eq)]
enum SseEvent {
    Chunk(String),
    Done,
    Error(String),
    Ignore,
}

fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

fn parse_data_payload(payload: &str) -> SseEvent {
    if payload == "[DONE]" {
        return SseEvent::Done;
    }

    if payload.trim().is_empty() {
        return SseEvent::Ignore;
    }

    let value = match serde_json::from_str::<serde_json::Value>(payload) {
        Ok(value) => value,
        Err(_) => return SseEvent::Error(summarize_api_error(payload)),
    };

    if value.get("error").is_some() {
        return SseEvent::Error(extract_error_summary(&value).unwrap_or_else(|| value.to_string()));
    }

    match serde_json::from_value::<ChatResponse>(value) {
        Ok(response) => response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .map(SseEvent::Chunk)
            .unwrap_or(SseEvent::Ignore),
        Err(e) => {
            debug!("ignoring unrecognized stream payload: {e}");
            SseEvent::Ignore
        }
    }
}

fn process_sse_line(line: &str) -> SseEvent {
    extract_data_payload(line)
        .map(parse_data_payload)
        .unwrap_or(SseEvent::Ignore)
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
}

/// Collapse an error body into a single loggable line.
fn summarize_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&json_value) {
            return summary;
        }
        return json_value.to_string();
    }

    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Accumulates a server-sent event body into one answer.
#[derive(Default)]
struct AnswerAccumulator {
    buffer: Vec<u8>,
    answer: String,
    finished: bool,
}

impl AnswerAccumulator {
    /// Feed raw body bytes. Returns `Ok(true)` once the stream signalled completion.
    fn feed(&mut self, bytes: &[u8]) -> Result<bool, CompletionError> {
        self.buffer.extend_from_slice(bytes);

        while let Some(newline_pos) = memchr(b'\n', &self.buffer) {
            let event = match std::str::from_utf8(&self.buffer[..newline_pos]) {
                Ok(line) => process_sse_line(line.trim()),
                Err(e) => {
                    debug!("skipping invalid UTF-8 line in stream: {e}");
                    SseEvent::Ignore
                }
            };
            self.buffer.drain(..=newline_pos);

            match event {
                SseEvent::Chunk(content) => self.answer.push_str(&content),
                SseEvent::Done => {
                    self.finished = true;
                    return Ok(true);
                }
                SseEvent::Error(message) => {
                    return Err(CompletionError::Api {
                        status: None,
                        message,
                    })
                }
                SseEvent::Ignore => {}
            }
        }

        Ok(false)
    }

    /// Flush a trailing line without newline and produce the final answer.
    fn finish(mut self) -> Result<String, CompletionError> {
        if !self.finished && !self.buffer.is_empty() {
            self.buffer.push(b'\n');
            self.feed(&[])?;
        }

        let answer = self.answer.trim().to_string();
        if answer.is_empty() {
            Err(CompletionError::EmptyAnswer)
        } else {
            Ok(answer)
        }
    }
}

/// Completion service backed by an OpenAI-compatible `chat/completions` endpoint.
///
/// The response is requested as a stream and accumulated; callers only see the
/// settled answer.
#[derive(Clone)]
pub struct ChatCompletionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    system_prompt: String,
}

impl ChatCompletionClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            system_prompt: system_prompt.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, CompletionError> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| CompletionError::MissingApiKey {
                env_var: settings.api_key_env.clone(),
            })?;

        Ok(Self::new(
            settings.base_url.clone(),
            api_key,
            settings.model.clone(),
            settings.system_prompt.clone(),
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CompletionService for ChatCompletionClient {
    async fn generate(&self, prompt: &str, context: Option<&str>) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: build_messages(&self.system_prompt, prompt, context),
            stream: true,
        };

        let chat_url = construct_api_url(&self.base_url, "chat/completions");
        debug!(url = %chat_url, model = %self.model, follow_up = context.is_some(), "sending completion request");

        let response = self
            .client
            .post(chat_url)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(CompletionError::Api {
                status: Some(status.as_u16()),
                message: summarize_api_error(&error_text),
            });
        }

        let mut stream = response.bytes_stream();
        let mut accumulator = AnswerAccumulator::default();
        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|e| CompletionError::Stream(e.to_string()))?;
            if accumulator.feed(&bytes)? {
                break;
            }
        }

        accumulator.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_sse_line_handles_spacing_variants() {
        assert_eq!(
            process_sse_line(r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#),
            SseEvent::Chunk("Hello".into())
        );
        assert_eq!(
            process_sse_line(r#"data:{"choices":[{"delta":{"content":"World"}}]}"#),
            SseEvent::Chunk("World".into())
        );
        assert_eq!(process_sse_line("data: [DONE]"), SseEvent::Done);
        assert_eq!(process_sse_line("data:[DONE]"), SseEvent::Done);
        assert_eq!(process_sse_line(": keep-alive"), SseEvent::Ignore);
    }

    #[test]
    fn chunks_without_choices_are_ignored() {
        assert_eq!(
            process_sse_line(r#"data: {"id":"x","usage":{"total_tokens":9}}"#),
            SseEvent::Ignore
        );
        assert_eq!(
            process_sse_line("data: not json"),
            SseEvent::Error("not json".into())
        );
    }

    #[test]
    fn role_only_delta_is_ignored() {
        assert_eq!(
            process_sse_line(r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#),
            SseEvent::Ignore
        );
    }

    #[test]
    fn accumulator_joins_chunks_split_across_reads() {
        let mut acc = AnswerAccumulator::default();
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Clean \"}}]}\n",
            "\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"the counter.\"}}]}\n",
            "data: [DONE]\n",
        );
        let (first, second) = body.as_bytes().split_at(30);

        assert!(!acc.feed(first).expect("first half"));
        assert!(acc.feed(second).expect("second half"));
        assert_eq!(acc.finish().expect("answer"), "Clean the counter.");
    }

    #[test]
    fn accumulator_flushes_unterminated_last_line() {
        let mut acc = AnswerAccumulator::default();
        acc.feed(br#"data: {"choices":[{"delta":{"content":"Done"}}]}"#)
            .expect("feed");
        assert_eq!(acc.finish().expect("answer"), "Done");
    }

    #[test]
    fn accumulator_surfaces_error_payloads() {
        let mut acc = AnswerAccumulator::default();
        let err = acc
            .feed(b"data: {\"error\":{\"message\":\"internal   server error\"}}\n")
            .expect_err("error payload");
        match err {
            CompletionError::Api { status, message } => {
                assert_eq!(status, None);
                assert_eq!(message, "internal server error");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn empty_stream_is_an_empty_answer() {
        let mut acc = AnswerAccumulator::default();
        acc.feed(b"data: [DONE]\n").expect("feed");
        assert!(matches!(acc.finish(), Err(CompletionError::EmptyAnswer)));
    }

    #[test]
    fn summarize_api_error_variants() {
        assert_eq!(
            summarize_api_error(r#"{"error":{"message":"model overloaded","type":"x"}}"#),
            "model overloaded"
        );
        assert_eq!(summarize_api_error(r#"{"error":"quota"}"#), "quota");
        assert_eq!(
            summarize_api_error(r#"{"status":"failed"}"#),
            r#"{"status":"failed"}"#
        );
        assert_eq!(summarize_api_error("  bad\n gateway "), "bad gateway");
        assert_eq!(summarize_api_error(""), "<empty>");
    }
}
