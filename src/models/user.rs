// src/models/user.rs
use chrono::NaiveDateTime;
use serde::Deserialize;
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Papel de quem está a ver a página. Conjunto fechado: qualquer valor fora
/// destes três é rejeitado no parse (não há papéis "extra" configuráveis).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    SuperAdmin,
    Admin,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super-admin",
            Role::Admin => "admin",
            Role::Student => "student",
        }
    }

    /// Admins (e super-admins) ganham o atalho "voltar ao dashboard".
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "super-admin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "student" => Ok(Role::Student),
            other => Err(format!("papel desconhecido: '{other}'")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Representa uma conta local lida da tabela 'accounts'
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    // Liga a conta ao perfil do aluno na turma (só contas de aluno)
    pub student_id: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Account {
    /// Converte a coluna `role` no enum fechado. Um valor corrompido na DB
    /// cai para o papel de menor privilégio, com aviso no log.
    pub fn role(&self) -> Role {
        Role::from_str(&self.role).unwrap_or_else(|e| {
            tracing::warn!("Conta '{}' com papel inválido ({e}); a tratar como student", self.id);
            Role::Student
        })
    }
}

/// Quem está a ver o perfil. É passado explicitamente à camada de
/// apresentação; a montagem da página nunca consulta sessão nem DB.
#[derive(Debug, Clone)]
pub enum Viewer {
    /// Acesso via link partilhado, sem sessão (modo público)
    Public,
    /// Sessão autenticada
    SignedIn {
        name: String,
        role: Role,
        /// Perfil de aluno associado à conta, se existir
        student_id: Option<String>,
    },
}

impl Viewer {
    pub fn from_account(account: &Account) -> Self {
        Viewer::SignedIn {
            name: account.name.clone(),
            role: account.role(),
            student_id: account.student_id.clone(),
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Viewer::Public)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Viewer::SignedIn { role, .. } if role.is_admin())
    }

    pub fn is_student(&self) -> bool {
        matches!(self, Viewer::SignedIn { role: Role::Student, .. })
    }
}

// Struct para dados do formulário de login
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(rename = "username")] // Mapeia do HTML 'username'
    pub id: String,               // Para o campo 'id' da conta
    pub password: String,
}
