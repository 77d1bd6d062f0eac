use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceLine {
    LowestLow,
    FirstPeak,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LevelKind {
    Gann { degrees: u16 },
    Fibonacci { ratio: f64 },
    Reference { line: ReferenceLine },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub kind: LevelKind,
    pub price: f64,
    pub color: String,
    pub label: String,
}

impl Level {
    pub fn new(kind: LevelKind, price: f64, color: &str, label: impl Into<String>) -> Self {
        Self {
            kind,
            price,
            color: color.to_string(),
            label: label.into(),
        }
    }
}
