//! Reconciliation error types.

use thiserror::Error;

/// Errors that can occur during balance reconciliation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// A monetary input was negative. Negative figures would corrupt the
    /// clamp logic in reversal, so they are rejected up front.
    #[error("{field} cannot be negative")]
    NegativeAmount {
        /// Name of the offending input field (wire name).
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_amount_display() {
        let err = ReconcileError::NegativeAmount {
            field: "memberCut",
        };
        assert_eq!(err.to_string(), "memberCut cannot be negative");
    }
}
