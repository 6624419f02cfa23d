//! Error types for the store and the callable surface.

use thiserror::Error;

/// failures inside a `DocumentStore`
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("corrupt document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// errors returned to callers; messages are shown as-is in the app
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Usuário não autenticado")]
    Unauthenticated,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    FailedPrecondition(String),

    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: Option<StoreError>,
    },
}

impl ApiError {
    /// stable code for clients
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated => "unauthenticated",
            ApiError::NotFound(_) => "not-found",
            ApiError::InvalidArgument(_) => "invalid-argument",
            ApiError::AlreadyExists(_) => "already-exists",
            ApiError::FailedPrecondition(_) => "failed-precondition",
            ApiError::Internal { .. } => "internal",
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        ApiError::InvalidArgument(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::Internal {
            message: msg.into(),
            source: None,
        }
    }

    pub fn user_not_found() -> Self {
        ApiError::not_found("Usuário não encontrado")
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal {
            message: "Erro interno ao acessar os dados".to_string(),
            source: Some(err),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
