use serde::{Deserialize, Serialize};

/// A field value as delivered by upstream sources: a JSON number or a
/// numeric-looking string such as `"101.25"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    pub fn parse(&self) -> Result<f64, String> {
        match self {
            RawNumber::Number(value) => Ok(*value),
            RawNumber::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err("empty value".to_string());
                }
                trimmed
                    .parse::<f64>()
                    .map_err(|err| format!("not a number: {err}"))
            }
        }
    }

    pub fn display(&self) -> String {
        match self {
            RawNumber::Number(value) => value.to_string(),
            RawNumber::Text(text) => text.clone(),
        }
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        RawNumber::Number(value)
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        RawNumber::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    #[serde(alias = "Date")]
    pub date: String,
    #[serde(alias = "Open")]
    pub open: RawNumber,
    #[serde(alias = "High")]
    pub high: RawNumber,
    #[serde(alias = "Low")]
    pub low: RawNumber,
    #[serde(alias = "Close")]
    pub close: RawNumber,
    #[serde(alias = "Volume")]
    pub volume: RawNumber,
}

impl RawBar {
    pub fn new(
        date: impl Into<String>,
        open: impl Into<RawNumber>,
        high: impl Into<RawNumber>,
        low: impl Into<RawNumber>,
        close: impl Into<RawNumber>,
        volume: impl Into<RawNumber>,
    ) -> Self {
        Self {
            date: date.into(),
            open: open.into(),
            high: high.into(),
            low: low.into(),
            close: close.into(),
            volume: volume.into(),
        }
    }
}
