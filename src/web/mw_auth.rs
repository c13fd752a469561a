// src/web/mw_auth.rs
use crate::{
    error::AppError,
    models::user::Account,
    services::user_service,
    state::AppState,
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

// Chave da sessão onde fica o ID da conta autenticada
pub const SESSION_ACCOUNT_KEY: &str = "account_id";

// Middleware que exige login. Carrega a conta inteira uma única vez por
// pedido e deixa-a nas extensões, para os handlers não repetirem a busca.
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match session.get::<String>(SESSION_ACCOUNT_KEY).await {
        Ok(Some(account_id)) => {
            match user_service::find_account_by_id(&state.db_pool, &account_id).await? {
                Some(account) => {
                    tracing::debug!(
                        "Autenticação MW: conta '{}' ({}) autenticada. Prosseguindo...",
                        account.id,
                        account.role()
                    );
                    request.extensions_mut().insert(CurrentAccount(account));
                    Ok(next.run(request).await)
                }
                None => {
                    // A sessão aponta para uma conta que já não existe
                    tracing::warn!(
                        "Autenticação MW: conta '{}' da sessão não existe mais. Encerrando sessão.",
                        account_id
                    );
                    session.delete().await.map_err(|e| {
                        AppError::SessionError(format!("Falha ao apagar sessão: {}", e))
                    })?;
                    Ok(Redirect::to("/login").into_response())
                }
            }
        }
        Ok(None) => {
            // Não há conta na sessão -> não está logado
            tracing::debug!("Autenticação MW: não autenticado. Redirecionando para /login");
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) => {
            // Erro ao tentar ler a sessão (ex: problema na DB)
            tracing::error!("Autenticação MW: erro ao ler sessão: {:?}", e);
            Err(AppError::SessionError(format!("Erro ao verificar sessão: {}", e)))
        }
    }
}

// Conta autenticada, guardada nas extensões da requisição pelo middleware
#[derive(Clone, Debug)]
pub struct CurrentAccount(pub Account);
