// src/web/auth_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::LoginForm,
    services::{auth_service, user_service},
    state::AppState,
    templates::LoginPage,
    web::mw_auth::SESSION_ACCOUNT_KEY,
};
use askama::Template; // Trait Template para render()
use axum::{
    extract::{Form, State},
    response::{Html, IntoResponse, Redirect},
};
use tower_sessions::Session;

// GET /login (verifica sessão e renderiza explicitamente)
pub async fn show_login_form(session: Session) -> impl IntoResponse {
    // Verifica se já existe uma conta na sessão
    if session
        .get::<String>(SESSION_ACCOUNT_KEY)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        tracing::debug!("GET /login: já logado, redirecionando para /dashboard");
        return Redirect::to("/dashboard").into_response();
    }

    // Se não está logado, renderiza a página de login
    let template = LoginPage { error: None };
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Falha ao renderizar template de login: {}", e);
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Erro ao carregar a página.",
            )
                .into_response()
        }
    }
}

// Renderiza o login de novo com a mensagem de erro genérica
fn login_with_error() -> AppResult<axum::response::Response> {
    let template = LoginPage {
        error: Some("Invalid ID or password.".to_string()),
    };
    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar template de login com erro: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

// POST /login (processamento do formulário)
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<impl IntoResponse> {
    tracing::info!("Tentativa de login para ID: {}", form.id);

    // 1. Procura a conta pelo ID (username do formulário)
    match user_service::find_account_by_id(&state.db_pool, &form.id).await {
        Ok(Some(account)) => {
            tracing::debug!("Conta {} encontrada, verificando senha...", form.id);
            // 2. Verifica a senha contra o hash guardado
            match auth_service::verify_password(&form.password, &account.password_hash).await {
                Ok(true) => {
                    // 3. Autentica a sessão
                    session.cycle_id().await // Gera novo ID de sessão (segurança)
                        .map_err(|e| AppError::SessionError(format!("Falha ao rodar ID: {}", e)))?;
                    session
                        .insert(SESSION_ACCOUNT_KEY, &account.id)
                        .await
                        .map_err(|e| {
                            AppError::SessionError(format!("Falha ao inserir na sessão: {}", e))
                        })?;

                    tracing::info!("✅ Login bem-sucedido para: {}", account.id);
                    // 4. Segue para o painel
                    Ok(Redirect::to("/dashboard").into_response())
                }
                Ok(false) => {
                    tracing::warn!("Senha incorreta para ID: {}", form.id);
                    login_with_error()
                }
                Err(e) => {
                    tracing::error!("Erro ao verificar senha para {}: {:?}", form.id, e);
                    Err(e)
                }
            }
        }
        Ok(None) => {
            tracing::warn!("Conta não encontrada: {}", form.id);
            // Mesma mensagem genérica; não revela se o ID existe
            login_with_error()
        }
        Err(e) => {
            tracing::error!("Erro ao buscar conta {}: {:?}", form.id, e);
            Err(e)
        }
    }
}

// GET /logout
pub async fn handle_logout(session: Session) -> AppResult<Redirect> {
    let account_id: Option<String> = session.get(SESSION_ACCOUNT_KEY).await.ok().flatten();

    // Apaga todos os dados da sessão atual
    session
        .delete()
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao apagar sessão: {}", e)))?;

    if let Some(id) = account_id {
        tracing::info!("🚪 Conta '{}' desligada.", id);
    } else {
        tracing::info!("🚪 Sessão anónima desligada.");
    }

    Ok(Redirect::to("/login"))
}
