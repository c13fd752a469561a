// src/web/profile_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::Viewer,
    services::profile_service::{self, ProfileData},
    state::AppState,
    templates::ErrorPage,
    web::mw_auth::CurrentAccount,
};
use askama::Template;
use axum::{
    extract::{Extension, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use uuid::Uuid;

/// Conteúdo do painel de erro: a mensagem segura do erro e a ação de fuga
/// adequada a quem está a ver (admins voltam ao dashboard, o resto vai
/// para o login).
fn error_page_for(err: &AppError, viewer: &Viewer) -> ErrorPage {
    let (escape_href, escape_label) = if viewer.is_admin() {
        ("/dashboard", "Back to Dashboard")
    } else {
        ("/login", "Go to Login")
    };
    ErrorPage {
        message: err.user_message(),
        escape_href,
        escape_label,
    }
}

fn render_error_page(err: &AppError, viewer: &Viewer) -> Response {
    tracing::error!("Erro ao montar perfil: {:?}", err);
    let template = error_page_for(err, viewer);
    match template.render() {
        Ok(html) => (err.status_code(), Html(html)).into_response(),
        Err(render_err) => {
            tracing::error!("Falha ao renderizar template ErrorPage: {}", render_err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erro ao carregar a página.",
            )
                .into_response()
        }
    }
}

/// Busca tudo o que a página precisa. A identidade resolve primeiro; as
/// três buscas seguintes correm em paralelo. Falha em trabalhos ou na
/// turma aborta; falha no feed de presença degrada para lista vazia.
async fn load_profile_data(state: &AppState, identifier: &str) -> AppResult<ProfileData> {
    let fetch_id = Uuid::new_v4();
    tracing::debug!("📡 Montando perfil para '{}' [{}]", identifier, fetch_id);

    let lookup = state.classroom.lookup_student(identifier).await?;

    let (assignments_res, course_res, attendance_res) = tokio::join!(
        state.classroom.list_assignments(),
        state.classroom.course_info(),
        state.attendance.fetch_records(),
    );

    let assignments = assignments_res?;
    let course = course_res?;
    let attendance = match attendance_res {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(
                "Feed de presença indisponível ({}); seguindo sem presença. [{}]",
                e,
                fetch_id
            );
            Vec::new()
        }
    };

    tracing::debug!(
        "Perfil '{}' montado: {} trabalhos, {} entregas, {} linhas de presença [{}]",
        lookup.resolved_id(),
        assignments.len(),
        lookup.submissions.len(),
        attendance.len(),
        fetch_id
    );

    Ok(ProfileData {
        lookup,
        assignments,
        course,
        attendance,
    })
}

/// Caminho comum das duas rotas de perfil. Todo o estado vive neste
/// pedido; um pedido novo recomeça do zero, por isso uma resposta tardia
/// de um pedido antigo nunca sobrescreve a de um mais recente.
async fn render_profile(state: &AppState, viewer: &Viewer, student_id: &str) -> Response {
    let identifier = student_id.trim();
    if identifier.is_empty() {
        return render_error_page(
            &AppError::Validation("No student selected. Check the link and try again.".to_string()),
            viewer,
        );
    }

    let data = match load_profile_data(state, identifier).await {
        Ok(data) => data,
        Err(e) => return render_error_page(&e, viewer),
    };

    let page = profile_service::build_profile_page(&data, viewer, chrono::Local::now());
    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Falha ao renderizar template StudentProfilePage: {}", e);
            render_error_page(&AppError::Template(e), viewer)
        }
    }
}

// GET /dashboard/student/{student_id} (protegido pelo middleware)
pub async fn private_profile_handler(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(student_id): Path<String>,
) -> Response {
    let viewer = Viewer::from_account(&current.0);
    render_profile(&state, &viewer, &student_id).await
}

// GET /student/{student_id} (vista pública partilhável)
pub async fn public_profile_handler(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Response {
    render_profile(&state, &Viewer::Public, &student_id).await
}

#[derive(Debug, Deserialize)]
pub struct PhotoQuery {
    pub url: Option<String>,
}

// GET /photo-proxy?url=<original-codificada>
//
// As fotos vêm de outro domínio e falham no browser por referrer/CORS;
// o proxy busca os bytes do lado do servidor. Só http(s) é aceite.
pub async fn photo_proxy_handler(
    State(state): State<AppState>,
    Query(query): Query<PhotoQuery>,
) -> Response {
    let raw = match query.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url,
        _ => return (StatusCode::BAD_REQUEST, "missing url").into_response(),
    };

    let parsed = match reqwest::Url::parse(raw) {
        Ok(url) => url,
        Err(_) => return (StatusCode::BAD_REQUEST, "invalid url").into_response(),
    };
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return (StatusCode::BAD_REQUEST, "unsupported scheme").into_response();
    }
    // A rota é pública, só hosts autorizados por PHOTO_ALLOWED_HOSTS passam
    let host = match parsed.host_str() {
        Some(host) => host,
        None => return (StatusCode::BAD_REQUEST, "invalid url").into_response(),
    };
    if !state.classroom.photo_host_allowed(host) {
        tracing::warn!("Proxy de foto recusou host fora da lista: {}", host);
        return (StatusCode::FORBIDDEN, "host not allowed").into_response();
    }

    match state.classroom.fetch_photo(parsed.as_str()).await {
        Ok((content_type, bytes)) => {
            let content_type = content_type
                .and_then(|ct| header::HeaderValue::from_str(&ct).ok())
                .unwrap_or(header::HeaderValue::from_static("application/octet-stream"));
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type),
                    (
                        header::CACHE_CONTROL,
                        header::HeaderValue::from_static("public, max-age=3600"),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            // A página cai para as iniciais quando a imagem falha
            tracing::warn!("Proxy de foto falhou para '{}': {}", raw, e);
            (StatusCode::BAD_GATEWAY, "photo unavailable").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;

    fn admin() -> Viewer {
        Viewer::SignedIn {
            name: "Staff".to_string(),
            role: Role::Admin,
            student_id: None,
        }
    }

    #[test]
    fn error_panel_carries_the_upstream_message_and_no_metric_cards() {
        let err = AppError::UpstreamRejected {
            status: 502,
            message: "Could not fetch assignments".to_string(),
        };
        let html = error_page_for(&err, &admin()).render().unwrap();
        assert!(html.contains("Could not fetch assignments"));
        assert!(!html.contains(r#"class="metric-card""#));
    }

    #[test]
    fn escape_action_depends_on_who_is_viewing() {
        let err = AppError::Validation("No student selected.".to_string());

        let admin_html = error_page_for(&err, &admin()).render().unwrap();
        assert!(admin_html.contains(r#"href="/dashboard""#));
        assert!(admin_html.contains("Back to Dashboard"));

        let public_html = error_page_for(&err, &Viewer::Public).render().unwrap();
        assert!(public_html.contains(r#"href="/login""#));
        assert!(public_html.contains("Go to Login"));

        let student = Viewer::SignedIn {
            name: "Jane".to_string(),
            role: Role::Student,
            student_id: Some("st-1".to_string()),
        };
        let student_html = error_page_for(&err, &student).render().unwrap();
        assert!(student_html.contains(r#"href="/login""#));
    }
}
