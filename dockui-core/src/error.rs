use std::fmt;

use crate::panel::PanelId;

/// Failure reported by the container-engine client.
///
/// Always recoverable from the UI's point of view: the message is shown on
/// the focused panel and the dashboard keeps running.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientError {
    /// Engine could not be reached
    Connection { message: String },
    /// Resource does not exist (any more)
    NotFound { id: String },
    /// Engine rejected or failed an operation
    Operation { op: String, message: String },
    /// Local file access around import/export/load
    Io { path: String, message: String },
}

impl ClientError {
    pub fn operation(op: impl Into<String>, message: impl fmt::Display) -> Self {
        ClientError::Operation {
            op: op.into(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Connection { message } => {
                write!(f, "cannot reach container engine: {}", message)
            }
            ClientError::NotFound { id } => write!(f, "no such resource: {}", id),
            ClientError::Operation { op, message } => write!(f, "{} failed: {}", op, message),
            ClientError::Io { path, message } => write!(f, "{}: {}", path, message),
        }
    }
}

impl std::error::Error for ClientError {}

/// Errors raised by the panel engine.
///
/// `UnknownPanel`, `DuplicateIdentifier` and `OverlayBusy` indicate wiring
/// mistakes; the rest come from user input or the client and are shown as
/// transient messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiError {
    UnknownPanel {
        id: PanelId,
    },
    DuplicateIdentifier {
        id: PanelId,
    },
    OverlayBusy,
    /// An overlay was requested before any panel held focus
    NoFocus,
    InvalidPosition {
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    },
    MissingField {
        field: String,
    },
    Client(ClientError),
}

impl UiError {
    /// Errors caused by the user or the engine rather than by a broken
    /// invariant inside the dashboard.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            UiError::Client(_) | UiError::MissingField { .. } | UiError::InvalidPosition { .. }
        )
    }
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiError::UnknownPanel { id } => write!(f, "unknown panel: {}", id),
            UiError::DuplicateIdentifier { id } => write!(f, "panel already registered: {}", id),
            UiError::OverlayBusy => write!(f, "another dialog is already open"),
            UiError::NoFocus => write!(f, "no panel has focus"),
            UiError::InvalidPosition {
                left,
                top,
                right,
                bottom,
            } => write!(
                f,
                "invalid panel position ({}, {})-({}, {})",
                left, top, right, bottom
            ),
            UiError::MissingField { field } => write!(f, "please input {}", field),
            UiError::Client(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for UiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UiError::Client(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ClientError> for UiError {
    fn from(e: ClientError) -> Self {
        UiError::Client(e)
    }
}
