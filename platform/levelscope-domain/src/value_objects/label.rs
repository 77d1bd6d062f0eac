use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelPlacement {
    pub text: String,
    pub price: f64,
    /// Final vertical pixel position, after collision push-down.
    pub y: f64,
    pub color: String,
}
