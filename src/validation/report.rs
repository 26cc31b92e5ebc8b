use serde::Serialize;

/// Outcome of validating a whole payload.
///
/// Every violated rule is collected; callers are expected to surface the
/// complete list rather than the first entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    #[must_use]
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Converts the report into a `Result`, handing back the error list on failure.
    pub fn into_result(self) -> Result<(), Vec<String>> {
        if self.is_valid {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Outcome of re-validating a single field during a partial update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCheck {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FieldCheck {
    #[must_use]
    pub const fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
        }
    }
}

/// Accumulates rule violations in the order they are found.
#[derive(Debug, Default)]
pub(crate) struct ErrorCollector {
    errors: Vec<String>,
}

impl ErrorCollector {
    pub(crate) fn push(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    pub(crate) fn finish(self) -> ValidationReport {
        ValidationReport::from_errors(self.errors)
    }
}
