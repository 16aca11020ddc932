//! Result type aliases and the service result pattern

use crate::error::{PswError, ValidationErrors};

/// Standard Result type for PSW operations
pub type PswResult<T> = Result<T, PswError>;

/// Outcome of an operation that can partially succeed, such as applying a
/// batch of assistant suggestions to a project.
#[derive(Debug)]
pub struct ServiceResult<T> {
    success: bool,
    result: Option<T>,
    errors: ValidationErrors,
}

impl<T> ServiceResult<T> {
    /// Create a successful result
    pub fn success(result: T) -> Self {
        Self {
            success: true,
            result: Some(result),
            errors: ValidationErrors::new(),
        }
    }

    /// Create a failed result with errors
    pub fn failure(errors: ValidationErrors) -> Self {
        Self {
            success: false,
            result: None,
            errors,
        }
    }

    /// Successful value that still carries non-fatal errors
    pub fn partial(result: T, errors: ValidationErrors) -> Self {
        Self {
            success: errors.is_empty(),
            result: Some(result),
            errors,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_failure(&self) -> bool {
        !self.success
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Convert to standard Result
    pub fn into_result(self) -> PswResult<T> {
        if self.success {
            self.result.ok_or_else(|| {
                PswError::Internal("ServiceResult success but no result value".into())
            })
        } else {
            Err(PswError::Validation(self.errors))
        }
    }
}

impl<T> From<PswResult<T>> for ServiceResult<T> {
    fn from(result: PswResult<T>) -> Self {
        match result {
            Ok(value) => ServiceResult::success(value),
            Err(PswError::Validation(errors)) => ServiceResult::failure(errors),
            Err(e) => {
                let mut errors = ValidationErrors::new();
                errors.add_base(e.to_string());
                ServiceResult::failure(errors)
            }
        }
    }
}
