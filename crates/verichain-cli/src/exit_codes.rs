//! Exit codes of the `verichain` command.
//!
//! Client failures exit with `ClientError::exit_code()`: 1 for bad input,
//! configuration or local file errors, 3 when the backend does not know the
//! document, 4 for other backend errors, 5 for network failures and 6 for
//! timeouts. The constants below cover the remaining outcomes.

pub const EXIT_SUCCESS: i32 = 0;
pub const INTERNAL_ERROR: i32 = 2; // Unexpected failure; clap usage errors also exit 2
pub const NOT_AUTHENTIC: i32 = 3; // `verify` verdict was "Not Found"

#[cfg(test)]
mod tests {
    use super::*;
    use verichain_client::ClientError;

    #[test]
    fn test_not_authentic_matches_not_found() {
        let err = ClientError::NotFound {
            resource: "hash x".to_string(),
        };
        assert_eq!(NOT_AUTHENTIC, err.exit_code());
        assert_ne!(INTERNAL_ERROR, err.exit_code());
    }
}
