//! Scan results as delivered by a QR scanning capability.
//!
//! Scanner integrations disagree on where the decoded text lives: most put it
//! under `value`, some under `data`. A batch holds whatever was decoded in one
//! camera frame and may be empty, a single object, or `null`.
//!
//! ```text
//! [{"value":"A","format":"QR_CODE"}]
//! {"data":"é"}
//! null
//! ```

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed scan batch: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, ProtocolError>;

/// One decoded code. Fields other than the payload are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ScanResult {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            value: Some(Value::String(text.into())),
            data: None,
        }
    }

    /// Decoded text, read from `value` and falling back to `data`.
    pub fn payload(&self) -> Option<Cow<'_, str>> {
        self.value
            .as_ref()
            .and_then(payload_text)
            .or_else(|| self.data.as_ref().and_then(payload_text))
    }
}

/// Strings and numbers count as payloads; empty strings, `null` and
/// structured values do not.
fn payload_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(text) if !text.is_empty() => Some(Cow::Borrowed(text.as_str())),
        Value::Number(number) => Some(Cow::Owned(number.to_string())),
        _ => None,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BatchRepr {
    Many(Vec<ScanResult>),
    One(ScanResult),
    Nothing(()),
}

/// Everything decoded from a single camera frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BatchRepr")]
pub struct ScanBatch(pub Vec<ScanResult>);

impl From<BatchRepr> for ScanBatch {
    fn from(repr: BatchRepr) -> Self {
        match repr {
            BatchRepr::Many(results) => Self(results),
            BatchRepr::One(result) => Self(vec![result]),
            BatchRepr::Nothing(()) => Self::default(),
        }
    }
}

impl ScanBatch {
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// A batch holding a single plain-text payload.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self(vec![ScanResult::from_text(text)])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// First non-empty payload in the batch, if any.
    pub fn first_payload(&self) -> Option<Cow<'_, str>> {
        let payload = self.0.iter().find_map(ScanResult::payload);
        if payload.is_none() {
            log::trace!("no payload in batch of {} results", self.0.len());
        }
        payload
    }
}

impl From<Vec<ScanResult>> for ScanBatch {
    fn from(results: Vec<ScanResult>) -> Self {
        Self(results)
    }
}
