//! Error types for the MailStub client.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur during MailStub operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The POST to `/api/messages` did not complete successfully.
    ///
    /// Raised when the server answered with a non-success status, when no
    /// response was received at all, or when a success response carried a
    /// body that could not be decoded. `detail` is the server's `message`
    /// field when one was present; otherwise one of the stable fallbacks
    /// `"HTTP <status>"` (status received) or `"Network Error"` (no
    /// response).
    #[error("Failed to send email: {detail}")]
    Send {
        /// Human-readable failure detail.
        detail: String,
        /// HTTP status, when a response was received.
        status: Option<StatusCode>,
    },

    /// An error outside the transport exchange itself, such as request
    /// construction. Passed through unchanged.
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

impl Error {
    /// The HTTP status attached to a send failure, when the server responded.
    ///
    /// `None` for failures where no response was received and for
    /// [`Error::Request`].
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Send { status, .. } => *status,
            Error::Request(_) => None,
        }
    }
}
