// src/web/routes.rs
use crate::{
    state::AppState,
    web::{auth_handlers, dashboard_handlers, mw_auth, profile_handlers},
};
use axum::{
    middleware,
    routing::get,
    Router,
};

pub fn create_router(app_state: AppState) -> Router {
    // --- Rotas Públicas ---
    let public_routes = Router::new()
        .route(
            "/login",
            get(auth_handlers::show_login_form).post(auth_handlers::handle_login),
        )
        .route("/logout", get(auth_handlers::handle_logout))
        .route("/", get(|| async { axum::response::Redirect::permanent("/login") }))
        // Vista partilhável do perfil: sem e-mail e sem controlos privados
        .route(
            "/student/{student_id}",
            get(profile_handlers::public_profile_handler),
        )
        .route("/photo-proxy", get(profile_handlers::photo_proxy_handler))
        .route("/healthz", get(|| async { "ok" }));

    // --- Rotas Autenticadas ---
    // Exigem login; o middleware carrega a conta para as extensões
    let authenticated_routes = Router::new()
        .route("/dashboard", get(dashboard_handlers::dashboard_handler))
        .route("/dashboard/lookup", get(dashboard_handlers::lookup_handler))
        .route(
            "/dashboard/student/{student_id}",
            get(profile_handlers::private_profile_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_auth::require_auth,
        ));

    // --- Router Final ---
    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .with_state(app_state)
}
