use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    #[error("series is empty: no bars to derive levels from")]
    EmptySeries,

    #[error("malformed bar at index {index}: field `{field}` = {value:?}: {reason}")]
    MalformedBar {
        index: usize,
        field: &'static str,
        value: String,
        reason: String,
    },

    /// The low→peak leg has no upward extent. Generators recover from this;
    /// it never fails an analysis.
    #[error("degenerate range: peak {peak} is not above low {low}")]
    DegenerateRange { low: f64, peak: f64 },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl LevelError {
    pub(crate) fn malformed(
        index: usize,
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedBar {
            index,
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
