use thiserror::Error;

/// Recoverable outcomes returned by the stores and calculators.
///
/// None of these are fatal; the host decides how to present them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NutritionError {
    #[error("{kind} '{key}' not found")]
    NotFound { kind: &'static str, key: String },

    #[error("{kind} '{key}' already exists")]
    AlreadyExists { kind: &'static str, key: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Wrong password for '{login}'")]
    WrongPassword { login: String },

    #[error("Targets unavailable for '{login}': body parameters are unfilled or implausible")]
    Unavailable { login: String },
}

impl NutritionError {
    pub(crate) fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub(crate) fn already_exists(kind: &'static str, key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            key: key.into(),
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T, E = NutritionError> = std::result::Result<T, E>;
