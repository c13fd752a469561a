// src/services/user_service.rs
use crate::{
    error::AppResult,
    models::user::{Account, Role},
};
use sqlx::SqlitePool;

/// Busca uma conta na base de dados pelo seu ID.
pub async fn find_account_by_id(
    db_pool: &SqlitePool,
    account_id: &str,
) -> AppResult<Option<Account>> {
    tracing::debug!("Buscando conta por ID: {}", account_id);
    let account = sqlx::query_as::<_, Account>(
        r#"
        SELECT id, password_hash, name, role, student_id, created_at, updated_at
        FROM accounts
        WHERE id = ?1
        "#,
    )
    .bind(account_id)
    .fetch_optional(db_pool)
    .await?;

    if account.is_some() {
        tracing::debug!("Conta '{}' encontrada.", account_id);
    } else {
        tracing::debug!("Conta '{}' não encontrada.", account_id);
    }
    Ok(account)
}

/// Garante que existe pelo menos uma conta de administração.
///
/// Lê BOOTSTRAP_ADMIN_ID e BOOTSTRAP_ADMIN_PASSWORD do ambiente; se ambas
/// estiverem definidas e a conta ainda não existir, cria-a com a role
/// super-admin. Sem as variáveis, não faz nada.
pub async fn ensure_bootstrap_admin(db_pool: &SqlitePool) -> AppResult<()> {
    let (id, raw_password) = match (
        std::env::var("BOOTSTRAP_ADMIN_ID"),
        std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
    ) {
        (Ok(id), Ok(pw)) if !id.trim().is_empty() && !pw.is_empty() => (id.trim().to_string(), pw),
        _ => {
            tracing::debug!("Bootstrap de admin não configurado; nada a fazer.");
            return Ok(());
        }
    };

    if find_account_by_id(db_pool, &id).await?.is_some() {
        tracing::debug!("Conta de bootstrap '{}' já existe.", id);
        return Ok(());
    }

    tracing::info!("Criando conta de administração inicial: {}", id);
    let password_hash = crate::services::auth_service::hash_password(&raw_password).await?;
    let name = std::env::var("BOOTSTRAP_ADMIN_NAME").unwrap_or_else(|_| id.clone());

    sqlx::query(
        r#"
        INSERT INTO accounts (id, password_hash, name, role)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&id)
    .bind(&password_hash)
    .bind(&name)
    .bind(Role::SuperAdmin.as_str())
    .execute(db_pool)
    .await?;

    tracing::info!("✅ Conta de administração '{}' criada.", id);
    Ok(())
}
