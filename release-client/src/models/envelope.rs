//! The uniform `{ok, error?, result?}` wrapper every RelEase endpoint returns.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A structured soft failure: a stable machine reason plus optional prose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub reason: String,
    #[serde(
        default,
        deserialize_with = "lenient_detail",
        skip_serializing_if = "Option::is_none"
    )]
    pub detail: Option<String>,
}

impl Failure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// The `error` object as it appears on the wire, where nothing is guaranteed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFailure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_detail",
        skip_serializing_if = "Option::is_none"
    )]
    pub detail: Option<String>,
}

/// Loosely typed response body.
///
/// Non-2xx responses may carry a structured `error`, only a top-level
/// `detail`, or nothing parseable at all, so every field is optional here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RawFailure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(
        default,
        deserialize_with = "lenient_detail",
        skip_serializing_if = "Option::is_none"
    )]
    pub detail: Option<String>,
}

impl ResponseBody {
    pub fn reason(&self) -> Option<&str> {
        self.error.as_ref().and_then(|e| e.reason.as_deref())
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error.as_ref().and_then(|e| e.detail.as_deref())
    }
}

/// An `ok:false` envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftFailure {
    pub error: Failure,
    /// Top-level `detail`, when the server sent one alongside `error`.
    pub detail: Option<String>,
}

impl From<&SoftFailure> for ResponseBody {
    fn from(failure: &SoftFailure) -> Self {
        ResponseBody {
            ok: Some(false),
            error: Some(RawFailure {
                reason: Some(failure.error.reason.clone()),
                detail: failure.error.detail.clone(),
            }),
            result: None,
            detail: failure.detail.clone(),
        }
    }
}

/// A validated envelope.
///
/// `Ok` always carries a result and never an error; `NotOk` always carries a
/// reason. Bodies that break either rule never become an `Envelope`.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Ok(T),
    NotOk(SoftFailure),
}

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("envelope has no `ok` flag")]
    MissingOk,

    #[error("`ok:true` envelope carries an error")]
    OkWithError,

    #[error("`ok:true` envelope has no result")]
    MissingResult,

    #[error("`ok:false` envelope has no error reason")]
    MissingReason,

    #[error("body is not a JSON object: {0}")]
    Body(#[source] serde_json::Error),

    #[error("result does not match the expected shape: {0}")]
    Result(#[source] serde_json::Error),
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Validate a decoded body and deserialize its result.
    pub fn from_body(body: ResponseBody) -> Result<Self, EnvelopeError> {
        match body.ok {
            Some(true) => {
                if body.error.is_some() {
                    return Err(EnvelopeError::OkWithError);
                }
                let result = match body.result {
                    Some(result) if !result.is_null() => {
                        serde_json::from_value(result).map_err(EnvelopeError::Result)?
                    }
                    // Acknowledgements carry no result; they read as an empty object.
                    _ => serde_json::from_value(Value::Object(Map::new()))
                        .map_err(|_| EnvelopeError::MissingResult)?,
                };
                Ok(Envelope::Ok(result))
            }
            Some(false) => {
                let error = body.error.unwrap_or_default();
                let reason = error.reason.ok_or(EnvelopeError::MissingReason)?;
                Ok(Envelope::NotOk(SoftFailure {
                    error: Failure {
                        reason,
                        detail: error.detail,
                    },
                    detail: body.detail,
                }))
            }
            None => Err(EnvelopeError::MissingOk),
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        let body: ResponseBody = serde_json::from_slice(bytes).map_err(EnvelopeError::Body)?;
        Self::from_body(body)
    }
}

impl<T> Envelope<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Envelope::Ok(_))
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            Envelope::Ok(result) => Some(result),
            Envelope::NotOk(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&SoftFailure> {
        match self {
            Envelope::Ok(_) => None,
            Envelope::NotOk(failure) => Some(failure),
        }
    }
}

/// `detail` is documented as a string but validation failures put a list of
/// field errors there. Anything that is not a string is not presentable.
fn lenient_detail<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(detail)) => Some(detail),
        _ => None,
    })
}
