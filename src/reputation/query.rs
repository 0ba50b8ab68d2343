//! Reputation Query Validation
//!
//! Turns raw query parameters into a `ReputationQuery`, rejecting malformed
//! or unrecognized requests before anything reaches the store.

use serde::Serialize;
use std::collections::HashMap;

use crate::error::ReputeError;
use crate::reputation::reputon::ReputonFormat;

/// Reporter key of the aggregate record shared by all reporters
pub const GLOBAL_REPORTER: &str = "0";

/// Application context of an assertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Application {
    #[serde(rename = "email-id")]
    EmailId,
}

impl Application {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmailId => "email-id",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ReputeError> {
        if value.eq_ignore_ascii_case(Self::EmailId.as_str()) {
            Ok(Self::EmailId)
        } else {
            Err(ReputeError::UnrecognizedApplication)
        }
    }
}

/// Claim being rated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Assertion {
    #[serde(rename = "spam")]
    Spam,
}

impl Assertion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spam => "spam",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ReputeError> {
        if value.eq_ignore_ascii_case(Self::Spam.as_str()) {
            Ok(Self::Spam)
        } else {
            Err(ReputeError::UnrecognizedAssertion)
        }
    }
}

/// A fully validated reputation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReputationQuery {
    pub application: Application,
    pub assertion: Assertion,
    /// Asking entity, echoed back as the rater. Not checked against any list.
    pub service: String,
    /// Entity being rated
    pub subject: String,
    /// Party whose rate limit is requested
    pub reporter: String,
    pub format: ReputonFormat,
}

impl ReputationQuery {
    /// Validate raw parameters. Checks run in a fixed order and the first
    /// failure wins.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, ReputeError> {
        let (Some(application), Some(assertion), Some(service), Some(subject)) = (
            params.get("application"),
            params.get("assertion"),
            params.get("service"),
            params.get("subject"),
        ) else {
            return Err(ReputeError::MalformedRequest);
        };

        let application = Application::parse(application)?;
        let assertion = Assertion::parse(assertion)?;

        let reporter = params
            .get("reporter")
            .cloned()
            .unwrap_or_else(|| GLOBAL_REPORTER.to_string());

        let format = match params.get("format") {
            Some(format) => ReputonFormat::parse(format)?,
            None => ReputonFormat::default(),
        };

        Ok(Self {
            application,
            assertion,
            service: service.clone(),
            subject: subject.clone(),
            reporter,
            format,
        })
    }
}
