use std::fmt;

use thiserror::Error;

/// Failure reported by a `SocialApi` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    Network(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("{0}")]
    Rejected(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("response contained no data")]
    MissingData,
}

impl ApiError {
    /// Build a status error, preferring the message the server sent.
    pub fn status(status: u16, server_message: Option<String>) -> Self {
        let message = server_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("API error: {status}"));
        ApiError::Status { status, message }
    }

    /// Human-readable message, or `fallback` when the error carries none.
    pub fn message_or(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}

/// User actions a feed can fail on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Like,
    Unlike,
    CreateComment,
    DeleteComment,
}

impl Action {
    fn fallback(self) -> &'static str {
        match self {
            Action::Like => "Failed to like post",
            Action::Unlike => "Failed to unlike post",
            Action::CreateComment => "Failed to submit comment",
            Action::DeleteComment => "Failed to delete comment",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Like => "like",
            Action::Unlike => "unlike",
            Action::CreateComment => "create comment",
            Action::DeleteComment => "delete comment",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// The base list or one of the enrichment fetches failed.
    #[error("{0}")]
    Fetch(String),
    #[error("{message}")]
    Action { action: Action, message: String },
}

impl FeedError {
    pub fn fetch(err: &ApiError) -> Self {
        FeedError::Fetch(err.message_or("Failed to fetch posts"))
    }

    pub fn action(action: Action, err: &ApiError) -> Self {
        FeedError::Action {
            action,
            message: err.message_or(action.fallback()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Email and password are required.")]
    MissingCredentials,
    #[error("Login failed. Please check your credentials.")]
    Rejected(#[source] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_prefers_server_message() {
        let err = ApiError::status(401, Some("Unauthorized".to_string()));
        assert_eq!(err.to_string(), "Unauthorized");

        let err = ApiError::status(500, Some("  ".to_string()));
        assert_eq!(err.to_string(), "API error: 500");
    }

    #[test]
    fn action_error_falls_back_per_action() {
        let err = FeedError::action(Action::Unlike, &ApiError::Network(String::new()));
        assert_eq!(err.to_string(), "Failed to unlike post");

        let err = FeedError::action(Action::Like, &ApiError::Rejected("Already liked".into()));
        assert_eq!(err.to_string(), "Already liked");

        let err = FeedError::fetch(&ApiError::Rejected(String::new()));
        assert_eq!(err.to_string(), "Failed to fetch posts");
    }
}
