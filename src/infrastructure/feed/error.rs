//! Activity feed error types.

use thiserror::Error;

use super::constants::{CLOSE_NORMAL, CLOSE_TOKEN_EXPIRED};

/// Errors produced by the activity feed channel and its supervisor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// The channel could not be opened at all.
    #[error("Feed connection failed: {message}")]
    ConnectionFailed {
        /// Underlying failure description
        message: String,
    },

    /// The peer closed the channel.
    #[error("Feed closed with code {code}: {reason}")]
    Closed {
        /// Close code reported by the peer
        code: u16,
        /// Close reason, possibly empty
        reason: String,
    },

    /// A transport-level error on an established channel.
    #[error("Feed transport error: {message}")]
    Transport {
        /// Underlying failure description
        message: String,
    },

    /// An inbound frame could not be decoded.
    #[error("Feed decode error: {message}")]
    Decode {
        /// Underlying failure description
        message: String,
    },

    /// An operation did not complete in time.
    #[error("Feed operation timed out: {operation}")]
    Timeout {
        /// Operation that timed out
        operation: String,
    },

    /// The feed is not running.
    #[error("Feed is not connected")]
    NotConnected,

    /// The feed is already running.
    #[error("Feed is already connected")]
    AlreadyConnected,

    /// No stored credential to authenticate the channel with.
    #[error("No credential available for the feed")]
    NoCredential,
}

impl FeedError {
    /// Creates a connection failure error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            message: message.into(),
        }
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Returns the close code if this error carries one.
    #[must_use]
    pub const fn close_code(&self) -> Option<u16> {
        match self {
            Self::Closed { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Classifies the closure this error represents.
    #[must_use]
    pub const fn close_class(&self) -> CloseClass {
        match self.close_code() {
            Some(CLOSE_NORMAL) => CloseClass::Normal,
            Some(CLOSE_TOKEN_EXPIRED) => CloseClass::TokenExpired,
            _ => CloseClass::Abnormal,
        }
    }
}

/// Interpretation of a channel closure for the reconnect supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseClass {
    /// Deliberate closure; stay disconnected.
    Normal,
    /// Access token rejected; refresh and reconnect once.
    TokenExpired,
    /// Anything else; schedule a backoff reconnect.
    Abnormal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_closure_is_classified() {
        let err = FeedError::Closed {
            code: 1000,
            reason: String::new(),
        };
        assert_eq!(err.close_class(), CloseClass::Normal);
        assert_eq!(err.close_code(), Some(1000));
    }

    #[test]
    fn token_expiry_closure_is_classified() {
        let err = FeedError::Closed {
            code: 4002,
            reason: "token expired".to_string(),
        };
        assert_eq!(err.close_class(), CloseClass::TokenExpired);
    }

    #[test]
    fn transport_errors_are_abnormal() {
        assert_eq!(
            FeedError::transport("reset by peer").close_class(),
            CloseClass::Abnormal
        );
        assert_eq!(
            FeedError::Closed {
                code: 1006,
                reason: String::new()
            }
            .close_class(),
            CloseClass::Abnormal
        );
    }
}
