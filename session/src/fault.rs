//! Backend errors and their user-facing translation.
//!
//! ERROR HANDLING
//! ==============
//! Adapters report every failure as a [`BackendError`] carrying the backend's
//! error code. Identity operations translate those into an [`AuthFault`]
//! (stored in state for display and returned to the caller). Profile
//! operations surface the [`BackendError`] untranslated as
//! [`SessionError::Adapter`].

#[cfg(test)]
#[path = "fault_test.rs"]
mod fault_test;

use std::fmt;

/// Shown when the backend gives neither a known code nor a message.
pub const GENERIC_FAULT_MESSAGE: &str = "Ocorreu um erro durante a autenticação";

/// Namespace prefix used by the identity backend's error codes.
const AUTH_CODE_PREFIX: &str = "auth/";

/// Raw error reported by an identity or profile adapter.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct BackendError {
    /// Backend error code, e.g. `"auth/weak-password"`.
    pub code: String,
    /// Backend's own (untranslated) message.
    pub message: String,
}

impl BackendError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code: code.into(), message: message.into() }
    }
}

/// Known identity backend error codes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FaultCode {
    InvalidEmail,
    UserDisabled,
    UserNotFound,
    InvalidCredential,
    EmailAlreadyInUse,
    OperationNotAllowed,
    WeakPassword,
    TooManyRequests,
    PopupClosedByUser,
    PopupBlocked,
    NetworkRequestFailed,
    /// Any code outside the vocabulary above, kept verbatim.
    Other(String),
}

impl FaultCode {
    /// Every code with a dedicated message.
    pub const KNOWN: [Self; 11] = [
        Self::InvalidEmail,
        Self::UserDisabled,
        Self::UserNotFound,
        Self::InvalidCredential,
        Self::EmailAlreadyInUse,
        Self::OperationNotAllowed,
        Self::WeakPassword,
        Self::TooManyRequests,
        Self::PopupClosedByUser,
        Self::PopupBlocked,
        Self::NetworkRequestFailed,
    ];

    /// Parse a backend code, with or without the `auth/` prefix.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let bare = trimmed.strip_prefix(AUTH_CODE_PREFIX).unwrap_or(trimmed);
        match bare {
            "invalid-email" => Self::InvalidEmail,
            "user-disabled" => Self::UserDisabled,
            "user-not-found" => Self::UserNotFound,
            "invalid-credential" => Self::InvalidCredential,
            "email-already-in-use" => Self::EmailAlreadyInUse,
            "operation-not-allowed" => Self::OperationNotAllowed,
            "weak-password" => Self::WeakPassword,
            "too-many-requests" => Self::TooManyRequests,
            "popup-closed-by-user" => Self::PopupClosedByUser,
            "popup-blocked" => Self::PopupBlocked,
            "network-request-failed" => Self::NetworkRequestFailed,
            _ => Self::Other(trimmed.to_owned()),
        }
    }

    /// Code without namespace, as the backend documents it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::InvalidEmail => "invalid-email",
            Self::UserDisabled => "user-disabled",
            Self::UserNotFound => "user-not-found",
            Self::InvalidCredential => "invalid-credential",
            Self::EmailAlreadyInUse => "email-already-in-use",
            Self::OperationNotAllowed => "operation-not-allowed",
            Self::WeakPassword => "weak-password",
            Self::TooManyRequests => "too-many-requests",
            Self::PopupClosedByUser => "popup-closed-by-user",
            Self::PopupBlocked => "popup-blocked",
            Self::NetworkRequestFailed => "network-request-failed",
            Self::Other(raw) => raw,
        }
    }

    /// Dedicated user-facing message, or `None` for [`FaultCode::Other`].
    #[must_use]
    pub fn display_message(&self) -> Option<&'static str> {
        let message = match self {
            Self::InvalidEmail => "O e-mail fornecido é inválido",
            Self::UserDisabled => "Esta conta foi desativada",
            Self::UserNotFound => "Nenhuma conta encontrada com este e-mail",
            Self::InvalidCredential => "Senha incorreta",
            Self::EmailAlreadyInUse => "Este e-mail já está em uso por outra conta",
            Self::OperationNotAllowed => "Operação não permitida",
            Self::WeakPassword => "A senha é muito fraca (mínimo de 6 caracteres)",
            Self::TooManyRequests => "Muitas tentativas. Tente novamente mais tarde",
            Self::PopupClosedByUser => "Login com Google cancelado",
            Self::PopupBlocked => "O navegador bloqueou a janela de login",
            Self::NetworkRequestFailed => "Falha de conexão. Verifique sua internet",
            Self::Other(_) => return None,
        };
        Some(message)
    }
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translated authentication error kept in state until acknowledged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{display_message}")]
pub struct AuthFault {
    pub code: FaultCode,
    /// Backend's untranslated message.
    pub raw_message: String,
    /// Message shown to the user.
    pub display_message: String,
}

/// Translate a backend error into the fault shown to the user.
///
/// Known codes get their dedicated message; anything else falls back to the
/// backend's raw message, or [`GENERIC_FAULT_MESSAGE`] when that is empty.
#[must_use]
pub fn map_to_friendly_fault(error: &BackendError) -> AuthFault {
    let code = FaultCode::parse(&error.code);
    let display_message = match code.display_message() {
        Some(message) => message.to_owned(),
        None if error.message.trim().is_empty() => GENERIC_FAULT_MESSAGE.to_owned(),
        None => error.message.clone(),
    };
    AuthFault { code, raw_message: error.message.clone(), display_message }
}

/// Failure returned by [`crate::SessionController`] operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// User-correctable authentication failure; also stored in state.
    #[error(transparent)]
    Fault(#[from] AuthFault),
    /// A profile operation was attempted without a signed-in session.
    #[error("no signed-in session")]
    NotAuthenticated,
    /// Opaque profile store failure, passed through untranslated.
    #[error("profile store failure: {0}")]
    Adapter(#[from] BackendError),
}

impl SessionError {
    /// The stored fault, when this error is user-correctable.
    #[must_use]
    pub fn fault(&self) -> Option<&AuthFault> {
        match self {
            Self::Fault(fault) => Some(fault),
            Self::NotAuthenticated | Self::Adapter(_) => None,
        }
    }
}
