//! Isolates the JSON payload inside a raw completion.
//!
//! Models are told to answer with JSON only, but they regularly wrap it in markdown fences or
//! greet the user first. [`extract_json`] finds the slice worth handing to a JSON parser, it
//! never parses anything itself.

use tracing::trace;

use crate::types::ExtractionError;

const FENCE: &str = "```";

/// Returns the JSON-shaped slice of `raw`.
///
/// In order of preference:
/// 1. the content of the first fenced code block that looks like JSON;
/// 2. the whole (trimmed) text when it already is a JSON object or array;
/// 3. everything from the first `{` up to the last `}`.
pub fn extract_json(raw: &str) -> Result<&str, ExtractionError> {
	if let Some(fenced) = fenced_blocks(raw).find(|block| looks_like_json(block)) {
		trace!("Extracted JSON from fenced block");
		return Ok(fenced)
	}

	let trimmed = raw.trim();
	if looks_like_json(trimmed) {
		trace!("Completion is bare JSON");
		return Ok(trimmed)
	}

	match (raw.find('{'), raw.rfind('}')) {
		(Some(start), Some(end)) if start < end => {
			trace!("Extracted JSON between bytes {} and {}", start, end);
			Ok(&raw[start..=end])
		},
		_ => Err(ExtractionError::NoJson),
	}
}

fn looks_like_json(candidate: &str) -> bool {
	(candidate.starts_with('{') && candidate.ends_with('}')) ||
		(candidate.starts_with('[') && candidate.ends_with(']'))
}

/// Iterates over the trimmed contents of every closed fenced block in `raw`.
///
/// The optional language tag right after the opening fence is skipped.
fn fenced_blocks(raw: &str) -> impl Iterator<Item = &str> {
	let mut rest = raw;
	std::iter::from_fn(move || {
		let open = rest.find(FENCE)?;
		let after_open = &rest[open + FENCE.len()..];
		let tag_len = after_open
			.find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
			.unwrap_or(after_open.len());
		let body = &after_open[tag_len..];
		let close = body.find(FENCE)?;
		rest = &body[close + FENCE.len()..];
		Some(body[..close].trim())
	})
}
