// src/state.rs
use crate::services::{attendance_service::AttendanceClient, classroom_service::ClassroomClient};
use sqlx::SqlitePool;

// Estado partilhado da aplicação: pool local (contas + sessões) e os
// clientes HTTP dos serviços externos. Tudo barato de clonar.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub classroom: ClassroomClient,
    pub attendance: AttendanceClient,
}

// Permite extrair o pool da DB diretamente
impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.db_pool.clone()
    }
}

// Permite extrair o cliente da turma diretamente
impl axum::extract::FromRef<AppState> for ClassroomClient {
    fn from_ref(state: &AppState) -> ClassroomClient {
        state.classroom.clone()
    }
}

impl axum::extract::FromRef<AppState> for AttendanceClient {
    fn from_ref(state: &AppState) -> AttendanceClient {
        state.attendance.clone()
    }
}
