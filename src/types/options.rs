//! Generation tuning options.
//!
//! Well-known knobs get named, typed fields; everything else goes through a
//! bounded extension map so new server-side parameters can be passed without
//! a crate release. Extension keys are validated at construction instead of
//! being left implicit.

use crate::{Error, ErrorContext};
use serde::Serialize;
use std::collections::BTreeMap;

/// Typed options bag sent as the request `options` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_last_n: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,

    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

/// Keys covered by typed fields; the extension map must not shadow them.
const RESERVED_KEYS: &[&str] = &[
    "temperature",
    "repeat_last_n",
    "num_predict",
    "top_k",
    "top_p",
    "seed",
    "stop",
];

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sampling temperature.
    pub fn temperature(mut self, t: f64) -> Self {
        self.temperature = Some(t);
        self
    }

    /// Repetition lookback window.
    pub fn repeat_last_n(mut self, n: i32) -> Self {
        self.repeat_last_n = Some(n);
        self
    }

    /// Maximum number of tokens to generate.
    pub fn num_predict(mut self, n: i32) -> Self {
        self.num_predict = Some(n);
        self
    }

    pub fn top_k(mut self, k: u32) -> Self {
        self.top_k = Some(k);
        self
    }

    pub fn top_p(mut self, p: f64) -> Self {
        self.top_p = Some(p);
        self
    }

    pub fn seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Stop sequences.
    pub fn stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Add a server-specific tuning knob not covered by a typed field.
    ///
    /// Fails with a validation error when the key shadows a typed field, so
    /// a value cannot silently diverge from its typed twin.
    pub fn extra(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> crate::Result<Self> {
        let key = key.into();
        if RESERVED_KEYS.contains(&key.as_str()) {
            return Err(Error::validation_with_context(
                format!("option key {:?} shadows a typed field", key),
                ErrorContext::new()
                    .with_field_path("options")
                    .with_details("set it through the typed setter instead")
                    .with_source("request_builder"),
            ));
        }
        self.extra.insert(key, value.into());
        Ok(self)
    }

    /// True when no option has been set; the wire body omits `options` then.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unset_fields_are_omitted_from_the_wire() {
        let opts = GenerateOptions::new().temperature(0.0).repeat_last_n(2);
        let wire = serde_json::to_value(&opts).unwrap();
        assert_eq!(wire, json!({"temperature": 0.0, "repeat_last_n": 2}));
    }

    #[test]
    fn extension_entries_are_flattened() {
        let opts = GenerateOptions::new()
            .temperature(0.7)
            .extra("mirostat", 2)
            .unwrap();
        let wire = serde_json::to_value(&opts).unwrap();
        assert_eq!(wire, json!({"temperature": 0.7, "mirostat": 2}));
    }

    #[test]
    fn reserved_extension_key_is_rejected() {
        let err = GenerateOptions::new().extra("temperature", 0.5).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn default_bag_is_empty() {
        assert!(GenerateOptions::new().is_empty());
        assert!(!GenerateOptions::new().seed(7).is_empty());
    }
}
