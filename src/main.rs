// src/main.rs

// --- Declaração dos Módulos ---
mod db;
mod error;
mod models;
mod services;
mod state;
mod templates;
mod web;

// --- Imports ---
use crate::{
    services::{attendance_service::AttendanceClient, classroom_service::ClassroomClient},
    state::AppState,
};
use axum::serve;
use std::{env, net::SocketAddr};
use time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_cookies::{CookieManagerLayer, Key};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, ExpiredDeletion, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuração do Logging (Tracing) ---
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                env::var("RUST_LOG")
                    .unwrap_or_else(|_| {
                        "painel_aluno=debug,tower_http=info,sqlx=warn,tower_sessions=info".into()
                    })
                    .into()
            }),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("🚀 Iniciando o painel do aluno...");

    // --- Configuração da Base de Dados ---
    let db_pool = match db::create_db_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("❌ Falha crítica ao inicializar a base de dados: {}", e);
            return Err(anyhow::anyhow!("Falha ao conectar/migrar DB: {}", e));
        }
    };

    // --- Configuração das Sessões ---
    let session_store = SqliteStore::new(db_pool.clone())
        .with_table_name("sessions")
        .map_err(|e| anyhow::anyhow!("Falha ao criar session store: {}", e))?;
    session_store
        .migrate()
        .await
        .map_err(|e| anyhow::anyhow!("Falha ao migrar tabela de sessões: {}", e))?;

    // Clone o store para a task de limpeza
    let session_store_clone = session_store.clone();
    tokio::spawn(async move {
        if let Err(e) = session_store_clone
            .continuously_delete_expired(tokio::time::Duration::from_secs(60 * 60))
            .await
        {
            tracing::error!("Erro na task de limpeza de sessões: {:?}", e);
        }
    });
    tracing::info!("🧹 Tarefa de limpeza de sessões iniciada.");

    let secret_key_string = env::var("SESSION_SECRET")
        .map_err(|e| anyhow::anyhow!("!!! Variável de ambiente SESSION_SECRET não definida: {}", e))?;
    let key = signing_key(&secret_key_string)?;

    // Cria a camada de sessão (cookie assinado com a chave do ambiente)
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)))
        .with_signed(key);

    tracing::info!("🔑 Camada de sessão configurada.");

    // --- Conta de administração inicial (opcional, via ambiente) ---
    services::user_service::ensure_bootstrap_admin(&db_pool)
        .await
        .map_err(|e| anyhow::anyhow!("Falha ao criar conta de administração inicial: {}", e))?;

    // --- Clientes dos serviços externos ---
    let classroom = ClassroomClient::from_env().map_err(|e| {
        anyhow::anyhow!(
            "Falha ao configurar cliente da turma (CLASSROOM_API_BASE / CLASSROOM_COURSE_ID): {}",
            e
        )
    })?;
    let attendance = AttendanceClient::from_env().map_err(|e| {
        anyhow::anyhow!(
            "Falha ao configurar cliente de presença (ATTENDANCE_FEED_URL): {}",
            e
        )
    })?;
    tracing::info!("📡 Clientes dos serviços externos configurados.");

    // --- Criação do Estado da Aplicação ---
    let app_state = AppState {
        db_pool,
        classroom,
        attendance,
    };

    // --- Configuração do Endereço e Listener ---
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()
        .map_err(|e| anyhow::anyhow!("BIND_ADDR inválido: {}", e))?;
    tracing::info!("📡 Servidor escutando em http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("❌ Falha ao iniciar listener em {}: {}", addr, e);
            return Err(e.into());
        }
    };

    // --- Criação do Router e Aplicação das Camadas (Middlewares) ---
    tracing::info!("🛠️ Construindo router e aplicando middlewares...");
    let app = web::routes::create_router(app_state.clone()).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CookieManagerLayer::new())
            .layer(session_layer),
    );
    tracing::info!("✅ Router e middlewares configurados.");

    // --- Início do Servidor ---
    tracing::info!("👂 Servidor pronto para aceitar conexões...");
    if let Err(e) = serve(listener, app.into_make_service()).await {
        tracing::error!("❌ Erro fatal no servidor: {}", e);
        return Err(e.into());
    }

    Ok(())
}

// Converte o segredo do ambiente na chave que assina os cookies de sessão.
// Segredos com menos de 64 bytes são recusados na inicialização.
fn signing_key(secret: &str) -> anyhow::Result<Key> {
    Key::try_from(secret.as_bytes()).map_err(|e| {
        anyhow::anyhow!(
            "SESSION_SECRET demasiado curta para assinar cookies (mínimo 64 bytes): {}",
            e
        )
    })
}
