//! Error types shared by the backend client and the page flows.

use thiserror::Error;

/// Failure of a single backend operation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AppError {
	/// Transport failure, non-success status, or an undecodable response envelope.
	#[error("request to {endpoint} failed: {reason}")]
	Request { endpoint: String, reason: String },
	/// A response field was present but did not decode into its expected shape.
	#[error("could not decode `{field}`: {reason}")]
	Parse { field: String, reason: String },
}

impl AppError {
	pub fn request(endpoint: impl Into<String>, reason: impl ToString) -> Self {
		Self::Request {
			endpoint: endpoint.into(),
			reason: reason.to_string(),
		}
	}

	pub fn parse(field: impl Into<String>, reason: impl ToString) -> Self {
		Self::Parse {
			field: field.into(),
			reason: reason.to_string(),
		}
	}
}

/// The hosting page did not provide what the app needs to boot.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
	#[error("no course id was provided by the hosting page")]
	MissingCourseId,
}
