//! Error contract shared by every job-board API port.

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while calling the job-board API.
    pub enum ApiError {
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "job board transport failed: {message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } =>
            "job board request timed out: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "job board response decode failed: {message}",
        /// The session is missing or expired.
        Unauthorized { message: String } =>
            "not signed in: {message}",
        /// The addressed resource does not exist.
        NotFound { message: String } =>
            "not found: {message}",
        /// The server refused the request.
        Rejected { status: u16, message: String } =>
            "{message}",
        /// The adapter refused to build the request.
        InvalidRequest { message: String } =>
            "job board request invalid: {message}",
    }
}

impl ApiError {
    /// Whether this failure is a transient network or parse problem, as
    /// opposed to an answer from the server.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::Decode { .. }
        )
    }

    /// Message suitable for a user-facing notice, falling back to `fallback`
    /// for transient failures whose detail is only useful in logs.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Unauthorized { .. } => "Please sign in to continue".to_owned(),
            Self::NotFound { .. } => "The requested item no longer exists".to_owned(),
            Self::Transport { .. }
            | Self::Timeout { .. }
            | Self::Decode { .. }
            | Self::InvalidRequest { .. } => fallback.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ApiError::transport("connection reset"), true)]
    #[case(ApiError::timeout("30s"), true)]
    #[case(ApiError::decode("eof"), true)]
    #[case(ApiError::rejected(409_u16, "already applied"), false)]
    #[case(ApiError::unauthorized("401"), false)]
    fn classifies_transient_failures(#[case] error: ApiError, #[case] transient: bool) {
        assert_eq!(error.is_transient(), transient);
    }

    #[test]
    fn rejected_errors_surface_the_server_message() {
        let error = ApiError::rejected(400_u16, "Maximum of 3 active applications");
        assert_eq!(
            error.user_message("Could not apply"),
            "Maximum of 3 active applications"
        );
        assert_eq!(error.to_string(), "Maximum of 3 active applications");
    }

    #[test]
    fn transient_errors_use_the_fallback() {
        let error = ApiError::transport("dns failure");
        assert_eq!(error.user_message("Could not apply"), "Could not apply");
    }
}
