//! Request and response models for the MailStub API.

use serde::{Deserialize, Serialize};

/// The email fields submitted with a [`send`](crate::Client::send) call.
///
/// All fields are required, free-form strings. The client performs no local
/// validation; empty strings or malformed addresses are forwarded to the
/// server as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendEmailOptions {
    /// Sender email address.
    pub sender: String,
    /// Receiver email address.
    pub receiver: String,
    /// Email subject line.
    pub subject: String,
    /// Email body, plain text or HTML.
    pub body: String,
}

/// The message record MailStub creates for each sent test email.
///
/// Every field is server-assigned and returned to the caller untouched;
/// timestamps stay as the ISO-8601 strings the server produced.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message ID.
    pub id: String,
    /// ID of the project the message was filed under.
    pub project_id: String,
    /// ID of the user owning the project.
    pub user_id: String,
    /// Sender email address.
    pub sender: String,
    /// Receiver email address.
    pub receiver: String,
    /// Email subject line.
    pub subject: String,
    /// Email body.
    pub body: String,
    /// Whether the message has been read in the MailStub UI.
    pub read: bool,
    /// Creation timestamp (ISO-8601).
    pub created_at: String,
    /// Last-update timestamp (ISO-8601).
    pub updated_at: String,
}

/// Successful response body of `POST /api/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SendEmailResponse {
    /// The created message record.
    pub message: Message,
}
