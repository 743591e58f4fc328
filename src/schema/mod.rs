//! Strict validation of LLM-produced JSON.
//!
//! Completions are parsed into an untyped [`Value`] first, then walked by a [`Validator`] that
//! either builds the typed structure or collects every [`Violation`] it ran into. Nothing is ever
//! coerced: a number sent as a string is a violation, not a number.

use std::fmt::Display;

use serde_json::{Map, Value};

use crate::types::SchemaError;

pub mod graph;
pub mod phases;

pub use graph::{Edge, Level, Node, RoadmapGraph};
pub use phases::{
	Assessment, ChallengeLevel, Community, CommunityKind, Milestone, Phase, Project, Resource,
	ResourceKind, RoadmapPhases, TimeBreakdown, TroubleshootingTip,
};

/// A structure that can be validated out of an untyped JSON value.
pub trait Schema: Sized {
	/// Validates `candidate`, returning the typed structure or every violation found.
	fn validate(candidate: &Value) -> Result<Self, SchemaError>;
}

/// Closed set of string values accepted for a field.
pub trait Enumerated: Sized {
	/// Accepted spellings, compared exactly.
	const ALLOWED: &'static [&'static str];

	fn from_name(name: &str) -> Option<Self>;
}

/// A single reason a candidate was rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
	/// Location of the offending value, e.g. `nodes[2].level`. Empty for the root.
	pub path: String,
	pub kind: ViolationKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
	Missing,
	WrongType { expected: &'static str, found: &'static str },
	NotInSet { value: String, allowed: &'static [&'static str] },
	NotPositive(f64),
	Empty,
	BadFormat { expected: &'static str },
	DuplicateId(String),
	UnknownNode(String),
}

impl Display for Violation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let path = if self.path.is_empty() { "<root>" } else { self.path.as_str() };
		match &self.kind {
			ViolationKind::Missing => write!(f, "{}: required field is missing", path),
			ViolationKind::WrongType { expected, found } =>
				write!(f, "{}: expected {}, found {}", path, expected, found),
			ViolationKind::NotInSet { value, allowed } =>
				write!(f, "{}: \"{}\" is not one of {}", path, value, allowed.join(", ")),
			ViolationKind::NotPositive(n) => write!(f, "{}: {} is not a positive number", path, n),
			ViolationKind::Empty => write!(f, "{}: must not be empty", path),
			ViolationKind::BadFormat { expected } => write!(f, "{}: expected {}", path, expected),
			ViolationKind::DuplicateId(id) => write!(f, "{}: duplicate id \"{}\"", path, id),
			ViolationKind::UnknownNode(id) => write!(f, "{}: unknown node id \"{}\"", path, id),
		}
	}
}

/// Name of the JSON type of `value`, as used in violation messages.
fn type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

pub(crate) fn join(path: &str, key: &str) -> String {
	if path.is_empty() {
		key.to_string()
	} else {
		format!("{path}.{key}")
	}
}

pub(crate) fn index(path: &str, i: usize) -> String {
	format!("{path}[{i}]")
}

/// Walks a candidate value and accumulates violations.
///
/// Every accessor returns `None` when the field is unusable, after recording why. Callers build
/// their typed value with `?` on those options, so one bad field never hides the others: all
/// accessors run before anything is combined.
#[derive(Debug, Default)]
pub(crate) struct Validator {
	violations: Vec<Violation>,
}

impl Validator {
	pub fn violation(&mut self, path: impl Into<String>, kind: ViolationKind) {
		self.violations.push(Violation { path: path.into(), kind });
	}

	pub fn object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Map<String, Value>> {
		match value {
			Value::Object(obj) => Some(obj),
			other => {
				self.violation(path, ViolationKind::WrongType {
					expected: "object",
					found: type_name(other),
				});
				None
			},
		}
	}

	fn field<'v>(
		&mut self,
		obj: &'v Map<String, Value>,
		key: &str,
		path: &str,
	) -> Option<&'v Value> {
		let value = obj.get(key);
		if value.is_none() {
			self.violation(join(path, key), ViolationKind::Missing);
		}
		value
	}

	pub fn string(&mut self, obj: &Map<String, Value>, key: &str, path: &str) -> Option<String> {
		match self.field(obj, key, path)? {
			Value::String(s) => Some(s.clone()),
			other => {
				self.violation(join(path, key), ViolationKind::WrongType {
					expected: "string",
					found: type_name(other),
				});
				None
			},
		}
	}

	/// A string that must contain something other than whitespace.
	pub fn non_empty_string(
		&mut self,
		obj: &Map<String, Value>,
		key: &str,
		path: &str,
	) -> Option<String> {
		let s = self.string(obj, key, path)?;
		if s.trim().is_empty() {
			self.violation(join(path, key), ViolationKind::Empty);
			return None
		}
		Some(s)
	}

	pub fn positive_number(
		&mut self,
		obj: &Map<String, Value>,
		key: &str,
		path: &str,
	) -> Option<f64> {
		let n = match self.field(obj, key, path)? {
			Value::Number(n) => n.as_f64()?,
			other => {
				self.violation(join(path, key), ViolationKind::WrongType {
					expected: "number",
					found: type_name(other),
				});
				return None
			},
		};
		if n <= 0.0 {
			self.violation(join(path, key), ViolationKind::NotPositive(n));
			return None
		}
		Some(n)
	}

	pub fn enumerated<E: Enumerated>(
		&mut self,
		obj: &Map<String, Value>,
		key: &str,
		path: &str,
	) -> Option<E> {
		let name = self.string(obj, key, path)?;
		let value = E::from_name(&name);
		if value.is_none() {
			self.violation(join(path, key), ViolationKind::NotInSet {
				value: name,
				allowed: E::ALLOWED,
			});
		}
		value
	}

	/// An absolute `http(s)` URL.
	pub fn url(&mut self, obj: &Map<String, Value>, key: &str, path: &str) -> Option<String> {
		let url = self.string(obj, key, path)?;
		if !(url.starts_with("https://") || url.starts_with("http://")) {
			self.violation(join(path, key), ViolationKind::BadFormat {
				expected: "an absolute http(s) URL",
			});
			return None
		}
		Some(url)
	}

	pub fn array<'v>(
		&mut self,
		obj: &'v Map<String, Value>,
		key: &str,
		path: &str,
	) -> Option<&'v [Value]> {
		match self.field(obj, key, path)? {
			Value::Array(items) => Some(items.as_slice()),
			other => {
				self.violation(join(path, key), ViolationKind::WrongType {
					expected: "array",
					found: type_name(other),
				});
				None
			},
		}
	}

	/// Validates every item of the array at `key` with `check`.
	///
	/// All items are checked even after a failure so that each one reports its violations.
	pub fn each<T>(
		&mut self,
		obj: &Map<String, Value>,
		key: &str,
		path: &str,
		mut check: impl FnMut(&mut Self, &Value, &str) -> Option<T>,
	) -> Option<Vec<T>> {
		let items = self.array(obj, key, path)?;
		let base = join(path, key);
		let mut checked = Vec::with_capacity(items.len());
		let mut complete = true;
		for (i, item) in items.iter().enumerate() {
			match check(self, item, &index(&base, i)) {
				Some(value) => checked.push(value),
				None => complete = false,
			}
		}
		complete.then_some(checked)
	}

	/// Like [`Validator::each`] for an array of objects.
	pub fn each_object<T>(
		&mut self,
		obj: &Map<String, Value>,
		key: &str,
		path: &str,
		mut check: impl FnMut(&mut Self, &Map<String, Value>, &str) -> Option<T>,
	) -> Option<Vec<T>> {
		self.each(obj, key, path, |v, item, path| {
			let obj = v.object(item, path)?;
			check(v, obj, path)
		})
	}

	pub fn strings(&mut self, obj: &Map<String, Value>, key: &str, path: &str) -> Option<Vec<String>> {
		self.each(obj, key, path, |v, item, path| match item {
			Value::String(s) => Some(s.clone()),
			other => {
				v.violation(path, ViolationKind::WrongType {
					expected: "string",
					found: type_name(other),
				});
				None
			},
		})
	}

	/// Nested object at `key`, handed to `check`.
	pub fn nested<T>(
		&mut self,
		obj: &Map<String, Value>,
		key: &str,
		path: &str,
		check: impl FnOnce(&mut Self, &Map<String, Value>, &str) -> Option<T>,
	) -> Option<T> {
		let value = self.field(obj, key, path)?;
		let path = join(path, key);
		let nested = self.object(value, &path)?;
		check(self, nested, &path)
	}

	/// Turns the walk into a result.
	///
	/// Any recorded violation wins over a built value.
	pub fn finish<T>(self, value: Option<T>) -> Result<T, SchemaError> {
		match value {
			Some(value) if self.violations.is_empty() => Ok(value),
			_ => Err(SchemaError { violations: self.violations }),
		}
	}
}
