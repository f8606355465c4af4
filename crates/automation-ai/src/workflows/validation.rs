use serde::Serialize;

/// Request-level validation failure carrying the offending field where one exists.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("expected exactly {expected} factor scores, got {actual}")]
    FactorCount { expected: usize, actual: usize },
    #[error("{field} is required")]
    Missing { field: String },
    #[error("{field} {reason}")]
    Invalid { field: String, reason: String },
    #[error("processes[{index}]: {source}")]
    BulkEntry {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },
    #[error("malformed request body: {0}")]
    Malformed(String),
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing {
            field: field.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn field(&self) -> Option<String> {
        match self {
            Self::OutOfRange { field, .. } | Self::Missing { field } | Self::Invalid { field, .. } => {
                Some(field.clone())
            }
            Self::FactorCount { .. } => Some("factors".to_string()),
            Self::BulkEntry { index, source } => Some(match source.field() {
                Some(inner) => format!("processes[{index}].{inner}"),
                None => format!("processes[{index}]"),
            }),
            Self::Malformed(_) => None,
        }
    }

    pub fn body(&self) -> ValidationErrorBody {
        ValidationErrorBody {
            error: self.to_string(),
            field: self.field(),
        }
    }
}

/// JSON payload returned to callers for rejected requests.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorBody {
    pub error: String,
    pub field: Option<String>,
}

/// Trim an optional free-text value, dropping it when blank.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Require a non-blank, bounded text value.
pub(crate) fn required_text(
    field: &str,
    value: Option<String>,
    max_chars: usize,
) -> Result<String, ValidationError> {
    let value = normalize_optional(value).ok_or_else(|| ValidationError::missing(field))?;
    if value.chars().count() > max_chars {
        return Err(ValidationError::invalid(
            field,
            format!("must be at most {max_chars} characters"),
        ));
    }
    Ok(value)
}

/// Optional text, trimmed and bounded. Blank values become `None`.
pub(crate) fn optional_text(
    field: &str,
    value: Option<String>,
    max_chars: usize,
) -> Result<Option<String>, ValidationError> {
    match normalize_optional(value) {
        Some(text) if text.chars().count() > max_chars => Err(ValidationError::invalid(
            field,
            format!("must be at most {max_chars} characters"),
        )),
        other => Ok(other),
    }
}

/// Accept an optional non-negative amount with at most two decimal places and
/// `max_digits` digits overall, returned in hundredths.
pub(crate) fn hundredths(
    field: &str,
    value: Option<f64>,
    max_digits: u32,
) -> Result<Option<i64>, ValidationError> {
    let Some(amount) = value else {
        return Ok(None);
    };
    if !amount.is_finite() || amount < 0.0 {
        return Err(ValidationError::invalid(field, "must be a non-negative number"));
    }
    let scaled = amount * 100.0;
    let rounded = scaled.round();
    // Decimal inputs such as 0.1 land a few ulps off the integer after scaling.
    if (scaled - rounded).abs() > scaled.max(1.0) * f64::EPSILON * 8.0 {
        return Err(ValidationError::invalid(
            field,
            "must have at most 2 decimal places",
        ));
    }
    if rounded >= 10_f64.powi(max_digits as i32) {
        return Err(ValidationError::invalid(
            field,
            format!("must have at most {max_digits} digits"),
        ));
    }
    Ok(Some(rounded as i64))
}
