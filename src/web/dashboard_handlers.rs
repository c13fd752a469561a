// src/web/dashboard_handlers.rs
use crate::{
    error::{AppError, AppResult},
    templates::DashboardPage,
    web::mw_auth::CurrentAccount,
};
use askama::Template;
use axum::{
    extract::{Extension, Query},
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;

fn render_dashboard(template: DashboardPage) -> AppResult<axum::response::Response> {
    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar template DashboardPage: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

// GET /dashboard (protegido pelo middleware)
//
// Alunos com perfil vinculado vão direto para o próprio perfil; admins
// veem o formulário de procura; alunos sem vínculo veem um aviso.
pub async fn dashboard_handler(
    Extension(current): Extension<CurrentAccount>,
) -> AppResult<impl IntoResponse> {
    let account = current.0;
    tracing::debug!("GET /dashboard: acesso para {}", account.id);

    if account.role().is_admin() {
        return render_dashboard(DashboardPage {
            account_name: account.name,
            show_lookup: true,
            notice: None,
        });
    }

    match &account.student_id {
        Some(student_id) if !student_id.trim().is_empty() => {
            let target = format!(
                "/dashboard/student/{}",
                urlencoding::encode(student_id.trim())
            );
            tracing::debug!("Conta '{}' tem perfil vinculado; indo para {}", account.id, target);
            Ok(Redirect::to(&target).into_response())
        }
        _ => render_dashboard(DashboardPage {
            account_name: account.name,
            show_lookup: false,
            notice: Some(
                "Your account is not linked to a student profile yet. \
                 Ask an administrator to link it."
                    .to_string(),
            ),
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub identifier: Option<String>,
}

// GET /dashboard/lookup?identifier=<id-ou-email-ou-nome>
//
// Só traduz o formulário de procura num redirect para a página de perfil;
// a validação de existência acontece lá, contra o serviço da turma.
pub async fn lookup_handler(
    Extension(current): Extension<CurrentAccount>,
    Query(query): Query<LookupQuery>,
) -> AppResult<impl IntoResponse> {
    let account = current.0;
    if !account.role().is_admin() {
        tracing::warn!("Conta '{}' tentou usar a procura sem ser admin.", account.id);
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let identifier = query.identifier.unwrap_or_default();
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return render_dashboard(DashboardPage {
            account_name: account.name,
            show_lookup: true,
            notice: Some("Enter a student ID, email, or name to look up.".to_string()),
        });
    }

    let target = format!("/dashboard/student/{}", urlencoding::encode(identifier));
    tracing::debug!("Procura de '{}' -> {}", account.id, target);
    Ok(Redirect::to(&target).into_response())
}
