use thiserror::Error;

#[derive(Debug, Error)]
pub enum RentalAnalysisError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_names_field() {
        let err = RentalAnalysisError::InvalidInput {
            field: "loan_term_years".into(),
            reason: "Loan term cannot exceed 50 years".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid input: loan_term_years — Loan term cannot exceed 50 years"
        );
        match err {
            RentalAnalysisError::InvalidInput { field, .. } => assert_eq!(field, "loan_term_years"),
        }
    }
}
