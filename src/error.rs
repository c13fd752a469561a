// src/error.rs
use axum::{http::StatusCode, response::Html, response::IntoResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("database migration error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("environment variable error: {0}")]
    EnvVarError(#[from] std::env::VarError),

    // Falha no hash/verificação bcrypt
    #[error("password processing error")]
    PasswordHashingError,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("session error: {0}")]
    SessionError(String),

    // Falha de transporte ao chamar um serviço externo (DNS, timeout, TLS...)
    #[error("could not reach the classroom service")]
    UpstreamTransport(#[from] reqwest::Error),

    // O serviço externo respondeu não-2xx; `message` é o texto que ele devolveu
    #[error("{message}")]
    UpstreamRejected { status: u16, message: String },

    // Parâmetro de rota/query inválido (validado antes de qualquer chamada externa)
    #[error("{0}")]
    Validation(String),

    #[error("template rendering failed")]
    Template(#[from] askama::Error),

    #[error("unexpected internal error")]
    InternalServerError,

    #[error("not authorized")]
    Unauthorized,
}

impl AppError {
    /// Texto seguro para mostrar ao utilizador no painel de erro.
    /// Nunca expõe detalhes internos (SQL, paths, stack).
    pub fn user_message(&self) -> String {
        match self {
            AppError::UpstreamRejected { message, .. } => message.clone(),
            AppError::UpstreamTransport(_) => {
                "Could not reach the classroom service. Please try again shortly.".to_string()
            }
            AppError::Validation(msg) => msg.clone(),
            AppError::Unauthorized => "You are not allowed to view this page.".to_string(),
            _ => "Something went wrong while loading this profile.".to_string(),
        }
    }

    /// Status HTTP correspondente (usado quando o handler renderiza o painel de erro).
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UpstreamRejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::UpstreamTransport(_) => StatusCode::BAD_GATEWAY,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Como converter AppError numa resposta HTTP (fallback para middlewares e
// handlers que não renderizam o painel de erro completo)
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Loga o erro detalhado no servidor
        tracing::error!("Erro processado: {:?}", self);

        let status = self.status_code();
        let user_message = self.user_message();

        (status, Html(format!(r#"
            <!DOCTYPE html><html><head><title>Error</title><style>body{{font-family:sans-serif;}}</style></head>
            <body><h1>Error {status_code}</h1><p>{message}</p><a href="javascript:history.back()">Back</a></body></html>
         "#, status_code = status.as_u16(), message = user_message))).into_response()
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_upstream_surfaces_its_own_message_and_status() {
        let err = AppError::UpstreamRejected {
            status: 404,
            message: "Student not found in this course".to_string(),
        };
        assert_eq!(err.user_message(), "Student not found in this course");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_errors_keep_their_text_and_map_to_bad_request() {
        let err = AppError::Validation("No student selected.".to_string());
        assert_eq!(err.user_message(), "No student selected.");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_details_never_leak_into_the_user_message() {
        let err = AppError::SqlxError(sqlx::Error::PoolClosed);
        assert_eq!(
            err.user_message(),
            "Something went wrong while loading this profile."
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
