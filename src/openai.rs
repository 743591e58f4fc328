//! [`Llm`] implementation for OpenAI-compatible chat completion APIs.

use std::{borrow::Cow, fmt::Debug};

use async_openai::{
	config::OpenAIConfig,
	types::{
		ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
		CreateChatCompletionRequestArgs,
	},
	Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoff;
use tracing::{debug, error, instrument, trace};

use crate::{types::UpstreamError, CompletionRequest, Llm, LlmConfig};

/// Talks to OpenAI, or to any server speaking its API when an endpoint is configured.
///
/// One client, and with it one connection pool, is kept for the process defaults the value was
/// built with. Requests overriding the endpoint or the credential get a client of their own so
/// their settings never leak into other requests.
#[derive(Clone)]
pub struct OpenAiLlm {
	client: Client<OpenAIConfig>,
	endpoint: Option<String>,
	credential: Option<String>,
}

impl OpenAiLlm {
	/// Builds the client for the process defaults, usually the [`LlmConfig`] also handed to
	/// [`crate::Loom::new`].
	pub fn new(defaults: &LlmConfig) -> Self {
		Self {
			client: Self::client(defaults),
			endpoint: defaults.endpoint.clone(),
			credential: defaults.credential.clone(),
		}
	}

	fn client(config: &LlmConfig) -> Client<OpenAIConfig> {
		let mut openai_config = OpenAIConfig::new()
			.with_api_key(config.credential.clone().unwrap_or_default());
		if let Some(endpoint) = &config.endpoint {
			openai_config = openai_config.with_api_base(endpoint);
		}

		// async-openai retries rate limited calls on its own, a zero budget turns that off.
		let no_retries =
			ExponentialBackoff { max_elapsed_time: Some(Default::default()), ..Default::default() };

		Client::with_config(openai_config).with_backoff(no_retries)
	}

	fn client_for(&self, config: &LlmConfig) -> Cow<'_, Client<OpenAIConfig>> {
		if config.endpoint == self.endpoint && config.credential == self.credential {
			Cow::Borrowed(&self.client)
		} else {
			trace!("Building a dedicated client for {:?}", config.endpoint);
			Cow::Owned(Self::client(config))
		}
	}
}

impl Debug for OpenAiLlm {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("OpenAiLlm")
			.field("endpoint", &self.endpoint)
			.field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
			.finish()
	}
}

#[async_trait]
impl Llm for OpenAiLlm {
	#[instrument(skip(self, request), fields(model = %request.config.model))]
	async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, UpstreamError> {
		let message: ChatCompletionRequestMessage =
			ChatCompletionRequestUserMessageArgs::default().content(request.prompt).build()?.into();

		let chat_request = CreateChatCompletionRequestArgs::default()
			.model(request.config.model.as_str())
			.messages(vec![message])
			.temperature(request.temperature)
			.max_tokens(request.max_tokens)
			.build()?;

		let client = self.client_for(request.config);
		let chat = client.chat();
		let call = chat.create(chat_request);

		let response = match request.config.timeout {
			Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
				error!("OpenAI did not respond within {:?}", limit);
				UpstreamError::TimedOut(limit)
			})?,
			None => call.await,
		}
		.map_err(|e| {
			error!("Failed to prompt OpenAI: {}", e);
			UpstreamError::from(e)
		})?;

		debug!(usage = ?response.usage, "Received chat completion");

		response
			.choices
			.into_iter()
			.next()
			.and_then(|choice| choice.message.content)
			.filter(|content| !content.trim().is_empty())
			.ok_or(UpstreamError::EmptyCompletion)
	}
}

#[cfg(test)]
mod tests {
	use std::{
		sync::{
			atomic::{AtomicUsize, Ordering},
			Arc, Mutex,
		},
		time::Duration,
	};

	use axum::{
		extract::State,
		http::{HeaderMap, StatusCode},
		routing::post,
		Json, Router,
	};
	use serde_json::{json, Value};
	use tokio::net::TcpListener;

	use super::*;
	use crate::LlmOverrides;

	/// A chat completion endpoint answering every call with the same status and body.
	#[derive(Clone)]
	struct Upstream {
		status: StatusCode,
		body: Value,
		delay: Duration,
		hits: Arc<AtomicUsize>,
		authorizations: Arc<Mutex<Vec<String>>>,
	}

	impl Upstream {
		fn answering(status: StatusCode, body: Value) -> Self {
			Self {
				status,
				body,
				delay: Duration::ZERO,
				hits: Arc::default(),
				authorizations: Arc::default(),
			}
		}

		fn completing(content: Value) -> Self {
			Self::answering(
				StatusCode::OK,
				json!({
					"id": "chatcmpl-1",
					"object": "chat.completion",
					"created": 1_700_000_000,
					"model": "stub-model",
					"choices": [{
						"index": 0,
						"message": { "role": "assistant", "content": content },
						"finish_reason": "stop"
					}]
				}),
			)
		}

		fn delayed(mut self, delay: Duration) -> Self {
			self.delay = delay;
			self
		}

		/// Serves on an ephemeral port and returns the API base to configure.
		async fn start(&self) -> String {
			let router =
				Router::new().route("/v1/chat/completions", post(answer)).with_state(self.clone());
			let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
			let addr = listener.local_addr().unwrap();
			tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
			format!("http://{addr}/v1")
		}

		fn hits(&self) -> usize {
			self.hits.load(Ordering::SeqCst)
		}

		fn authorizations(&self) -> Vec<String> {
			self.authorizations.lock().unwrap().clone()
		}
	}

	async fn answer(State(upstream): State<Upstream>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
		upstream.hits.fetch_add(1, Ordering::SeqCst);
		if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
			upstream.authorizations.lock().unwrap().push(auth.to_string());
		}
		tokio::time::sleep(upstream.delay).await;
		(upstream.status, Json(upstream.body.clone()))
	}

	async fn complete(llm: &OpenAiLlm, config: &LlmConfig) -> Result<String, UpstreamError> {
		llm.complete(CompletionRequest {
			prompt: "Generate a roadmap for Rust",
			config,
			temperature: 0.7,
			max_tokens: 256,
		})
		.await
	}

	#[tokio::test]
	async fn returns_completion_from_configured_endpoint() {
		let upstream = Upstream::completing(json!("{\"topic\":\"Rust\"}"));
		let config = LlmConfig::new("stub-model")
			.with_endpoint(upstream.start().await)
			.with_credential("sk-test");
		let llm = OpenAiLlm::new(&config);

		let completion = complete(&llm, &config).await.unwrap();

		assert_eq!(completion, "{\"topic\":\"Rust\"}");
		assert_eq!(upstream.hits(), 1);
		assert_eq!(upstream.authorizations(), vec!["Bearer sk-test".to_string()]);
	}

	#[tokio::test]
	async fn rate_limited_call_is_not_retried() {
		let upstream = Upstream::answering(
			StatusCode::TOO_MANY_REQUESTS,
			json!({
				"error": {
					"message": "Rate limit reached",
					"type": "requests",
					"param": null,
					"code": "rate_limit_exceeded"
				}
			}),
		);
		let config = LlmConfig::new("stub-model").with_endpoint(upstream.start().await);
		let llm = OpenAiLlm::new(&config);

		let err = complete(&llm, &config).await.unwrap_err();

		assert!(matches!(err, UpstreamError::OpenAI(_)), "{err:?}");
		assert_eq!(upstream.hits(), 1);
	}

	#[tokio::test]
	async fn missing_or_blank_content_is_empty_completion() {
		for content in [Value::Null, json!("   \n")] {
			let upstream = Upstream::completing(content);
			let config = LlmConfig::new("stub-model").with_endpoint(upstream.start().await);
			let llm = OpenAiLlm::new(&config);

			let err = complete(&llm, &config).await.unwrap_err();
			assert!(matches!(err, UpstreamError::EmptyCompletion), "{err:?}");
		}
	}

	#[tokio::test]
	async fn slow_endpoint_times_out() {
		let upstream = Upstream::completing(json!("{}")).delayed(Duration::from_secs(5));
		let config = LlmConfig::new("stub-model")
			.with_endpoint(upstream.start().await)
			.with_timeout(Duration::from_millis(50));
		let llm = OpenAiLlm::new(&config);

		let err = complete(&llm, &config).await.unwrap_err();

		assert!(matches!(err, UpstreamError::TimedOut(limit) if limit == Duration::from_millis(50)));
	}

	#[tokio::test]
	async fn endpoint_override_is_called_without_the_process_key() {
		let process = Upstream::completing(json!("{}"));
		let requested = Upstream::completing(json!("{}"));
		let defaults = LlmConfig::new("stub-model")
			.with_endpoint(process.start().await)
			.with_credential("sk-server");
		let llm = OpenAiLlm::new(&defaults);

		let config = defaults.with_overrides(&LlmOverrides {
			endpoint: Some(requested.start().await),
			..Default::default()
		});
		complete(&llm, &config).await.unwrap();

		assert_eq!(process.hits(), 0);
		assert_eq!(requested.hits(), 1);
		assert!(requested.authorizations().iter().all(|auth| !auth.contains("sk-server")));
	}

	#[test]
	fn reuses_the_default_client() {
		let defaults = LlmConfig::new("gpt-4o-mini").with_credential("sk-server");
		let llm = OpenAiLlm::new(&defaults);

		let same = defaults.with_overrides(&LlmOverrides {
			model: Some("gpt-4o".into()),
			..Default::default()
		});
		let other = defaults.with_overrides(&LlmOverrides {
			credential: Some("sk-request".into()),
			..Default::default()
		});

		assert!(matches!(llm.client_for(&same), Cow::Borrowed(_)));
		assert!(matches!(llm.client_for(&other), Cow::Owned(_)));
		assert!(!format!("{:?}", llm).contains("sk-server"));
	}
}
