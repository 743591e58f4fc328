use std::sync::Mutex;

use async_trait::async_trait;

use crate::{types::UpstreamError, CompletionRequest, Config, Llm, LlmConfig};

/// Completion returned for the Go graph used across tests.
pub const GO_GRAPH: &str = r#"{"topic":"Go","nodes":[{"id":"node_1","title":"Basics","description":"d","level":"beginner","estimatedHours":40},{"id":"node_2","title":"Concurrency","description":"d2","level":"intermediate","estimatedHours":60}],"edges":[{"from":"node_1","to":"node_2"}]}"#;

#[derive(Debug)]
pub struct TestApp;
impl Config for TestApp {
	const TEMPERATURE: f32 = 0.2;
	const MAX_COMPLETION_TOKENS: u32 = 1_000;

	type Llm = TestLlm;
}

#[derive(Debug, Clone)]
pub enum Reply {
	Text(String),
	Fail,
}

/// A prompt the [`TestLlm`] received, with the settings it was sent with.
#[derive(Debug, Clone)]
pub struct Call {
	pub prompt: String,
	pub config: LlmConfig,
	pub temperature: f32,
	pub max_tokens: u32,
}

/// Answers every prompt with the same scripted [`Reply`] and remembers what it was asked.
#[derive(Debug)]
pub struct TestLlm {
	reply: Reply,
	calls: Mutex<Vec<Call>>,
}

impl TestLlm {
	pub fn replying(text: impl Into<String>) -> Self {
		Self::new(Reply::Text(text.into()))
	}

	pub fn failing() -> Self {
		Self::new(Reply::Fail)
	}

	fn new(reply: Reply) -> Self {
		Self { reply, calls: Mutex::new(Vec::new()) }
	}

	pub fn calls(&self) -> Vec<Call> {
		self.calls.lock().unwrap().clone()
	}
}

#[async_trait]
impl Llm for TestLlm {
	async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, UpstreamError> {
		self.calls.lock().unwrap().push(Call {
			prompt: request.prompt.to_string(),
			config: request.config.clone(),
			temperature: request.temperature,
			max_tokens: request.max_tokens,
		});

		match &self.reply {
			Reply::Text(text) if text.trim().is_empty() => Err(UpstreamError::EmptyCompletion),
			Reply::Text(text) => Ok(text.clone()),
			Reply::Fail => Err(UpstreamError::Provider(
				"connection refused by https://internal.example:8443".to_string(),
			)),
		}
	}
}
