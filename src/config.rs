use std::{fmt::Debug, time::Duration};

/// Model used when neither the process nor the request names one.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// How to reach the LLM.
///
/// One value is built at process start from the command line and environment and handed to
/// [`crate::Loom::new`]. Requests may override parts of it through [`LlmOverrides`], which never
/// mutates the process-wide value.
#[derive(Clone, PartialEq, Eq)]
pub struct LlmConfig {
	/// Model identifier, e.g. `gpt-4o-mini`.
	pub model: String,
	/// Alternate API base such as `http://localhost:11434/v1`. `None` uses the provider default.
	pub endpoint: Option<String>,
	/// API key. Some self-hosted endpoints accept none.
	pub credential: Option<String>,
	/// Upper bound for a single completion call. `None` waits as long as the provider does.
	pub timeout: Option<Duration>,
}

impl Default for LlmConfig {
	fn default() -> Self {
		Self { model: DEFAULT_MODEL.to_string(), endpoint: None, credential: None, timeout: None }
	}
}

/// Per-request replacements for fields of [`LlmConfig`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LlmOverrides {
	pub model: Option<String>,
	pub endpoint: Option<String>,
	pub credential: Option<String>,
}

impl LlmConfig {
	pub fn new(model: impl Into<String>) -> Self {
		Self { model: model.into(), ..Default::default() }
	}

	pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.endpoint = Some(endpoint.into());
		self
	}

	pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
		self.credential = Some(credential.into());
		self
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);
		self
	}

	/// The configuration a single request runs with: every override that is set wins, every
	/// other field falls back to `self`.
	///
	/// The process credential is only ever sent to the process endpoint. A request naming its own
	/// endpoint runs with its own credential or none at all.
	pub fn with_overrides(&self, overrides: &LlmOverrides) -> Self {
		let (endpoint, credential) = match &overrides.endpoint {
			Some(endpoint) => (Some(endpoint.clone()), overrides.credential.clone()),
			None => (
				self.endpoint.clone(),
				overrides.credential.clone().or_else(|| self.credential.clone()),
			),
		};

		Self {
			model: overrides.model.clone().unwrap_or_else(|| self.model.clone()),
			endpoint,
			credential,
			timeout: self.timeout,
		}
	}
}

fn redact(credential: &Option<String>) -> Option<&'static str> {
	credential.as_ref().map(|_| "<redacted>")
}

impl Debug for LlmConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LlmConfig")
			.field("model", &self.model)
			.field("endpoint", &self.endpoint)
			.field("credential", &redact(&self.credential))
			.field("timeout", &self.timeout)
			.finish()
	}
}

impl Debug for LlmOverrides {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LlmOverrides")
			.field("model", &self.model)
			.field("endpoint", &self.endpoint)
			.field("credential", &redact(&self.credential))
			.finish()
	}
}
