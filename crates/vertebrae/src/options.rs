//! Transport-wide defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default delay before an unmatched request completes with a 404.
pub const DEFAULT_NOT_FOUND_DELAY: Duration = Duration::from_millis(100);

/// Delays applied by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayOptions {
    /// Delay before an unmatched request completes with a 404.
    #[serde(rename = "404", with = "millis")]
    pub not_found: Duration,
}

impl Default for DelayOptions {
    fn default() -> Self {
        Self {
            not_found: DEFAULT_NOT_FOUND_DELAY,
        }
    }
}

/// Options shared by every request sent through a transport.
///
/// The serialized form mirrors the classic plugin options, with delays in
/// milliseconds:
///
/// ```
/// use std::time::Duration;
/// use vertebrae::MockOptions;
///
/// let options = MockOptions::from_json(r#"{"delay": {"404": 250}}"#).unwrap();
/// assert_eq!(options.delay.not_found, Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockOptions {
    /// Dispatcher delays.
    pub delay: DelayOptions,
}

impl MockOptions {
    /// Parses options from JSON. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MockError::Options`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the delay before an unmatched request completes.
    #[must_use]
    pub const fn not_found_delay(mut self, delay: Duration) -> Self {
        self.delay.not_found = delay;
        self
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_not_found_delay() {
        assert_eq!(
            MockOptions::default().delay.not_found,
            Duration::from_millis(100)
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options = MockOptions::from_json("{}").unwrap();
        assert_eq!(options, MockOptions::default());

        let options = MockOptions::from_json(r#"{"delay": {}}"#).unwrap();
        assert_eq!(options.delay.not_found, DEFAULT_NOT_FOUND_DELAY);
    }

    #[test]
    fn test_negative_delay_is_rejected() {
        assert!(MockOptions::from_json(r#"{"delay": {"404": -5}}"#).is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let options = MockOptions::default().not_found_delay(Duration::from_millis(20));
        let json = serde_json::to_value(options).unwrap();
        assert_eq!(json, serde_json::json!({"delay": {"404": 20}}));
    }
}
