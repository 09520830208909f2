use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactRequest {
    pub text: Option<String>,
    /// Any non-numeric value falls back to the default target. Fractions are
    /// rounded to the nearest whole token.
    pub target_tokens: Option<Value>,
}

impl CompactRequest {
    pub fn target_tokens(&self, default: u32) -> u32 {
        self.target_tokens
            .as_ref()
            .and_then(Value::as_f64)
            .filter(|n| n.is_finite())
            .map(f64::round)
            .filter(|n| *n >= 1.0)
            // `as` saturates at u32::MAX.
            .map(|n| n as u32)
            .unwrap_or(default)
    }
}
