// src/models/student.rs
use serde::Deserialize;

use crate::models::coursework::Submission;

/// Perfil do aluno tal como a API da turma o devolve.
/// Todos os campos além do id podem faltar; a página degrada em vez de falhar.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub family_name: String,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

impl StudentProfile {
    /// Nome para exibição: nome completo, ou os nomes parciais, ou o email.
    pub fn display_name(&self) -> String {
        if !self.full_name.trim().is_empty() {
            return self.full_name.trim().to_string();
        }
        let joined = format!("{} {}", self.given_name.trim(), self.family_name.trim());
        if !joined.trim().is_empty() {
            return joined.trim().to_string();
        }
        self.email.clone().unwrap_or_else(|| self.id.clone())
    }

    /// Iniciais para o mosaico de fallback quando não há foto (ou ela falha).
    pub fn initials(&self) -> String {
        let mut initials: String = self
            .display_name()
            .split_whitespace()
            .filter_map(|token| token.chars().next())
            .take(2)
            .flat_map(|c| c.to_uppercase())
            .collect();
        if initials.is_empty() {
            initials.push('?');
        }
        initials
    }
}

/// Métricas pré-agregadas pelo servidor. Campo a campo: presente e não-zero
/// ganha do recálculo local; ausente ou zero cai para o recálculo.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_assignments: Option<u32>,
    pub completed_submissions: Option<u32>,
    pub completion_rate: Option<f64>,
    pub average_grade: Option<f64>,
    pub late_submissions: Option<u32>,
}

/// Diagnóstico devolvido pelo lookup (como é que o identificador casou).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupMetadata {
    pub matched_by: Option<String>,
}

/// Resposta do endpoint de lookup: identidade + entregas cruas do aluno,
/// mais o sumário analítico quando o servidor o calcula.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentLookup {
    pub student: StudentProfile,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub submissions: Vec<Submission>,
    pub analytics: Option<AnalyticsSummary>,
    pub metadata: Option<LookupMetadata>,
}

impl StudentLookup {
    /// Id efetivo do aluno: o campo dedicado, ou o id do próprio perfil.
    pub fn resolved_id(&self) -> &str {
        if self.student_id.is_empty() {
            &self.student.id
        } else {
            &self.student_id
        }
    }
}

/// Metadados do curso (cabeçalho da página).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub section: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_full_name() {
        let student = StudentProfile {
            full_name: "Jane Doe".into(),
            given_name: "Janet".into(),
            ..Default::default()
        };
        assert_eq!(student.display_name(), "Jane Doe");
    }

    #[test]
    fn display_name_falls_back_to_name_parts_then_email() {
        let parts = StudentProfile {
            given_name: "Jane".into(),
            family_name: "Doe".into(),
            ..Default::default()
        };
        assert_eq!(parts.display_name(), "Jane Doe");

        let email_only = StudentProfile {
            email: Some("jane@school.test".into()),
            ..Default::default()
        };
        assert_eq!(email_only.display_name(), "jane@school.test");
    }

    #[test]
    fn initials_take_first_two_tokens() {
        let student = StudentProfile {
            full_name: "jane quinn doe".into(),
            ..Default::default()
        };
        assert_eq!(student.initials(), "JQ");
    }

    #[test]
    fn initials_never_come_back_empty() {
        let student = StudentProfile::default();
        assert_eq!(student.initials(), "?");
    }

    #[test]
    fn lookup_parses_the_upstream_envelope() {
        let raw = r#"{
            "student": {"id": "s-1", "fullName": "Jane Doe", "email": "jane@school.test"},
            "studentId": "s-1",
            "submissions": [],
            "analytics": {"totalAssignments": 5, "completedSubmissions": 3},
            "metadata": {"matchedBy": "email"}
        }"#;
        let lookup: StudentLookup = serde_json::from_str(raw).unwrap();
        assert_eq!(lookup.resolved_id(), "s-1");
        assert_eq!(lookup.analytics.as_ref().unwrap().total_assignments, Some(5));
        assert_eq!(lookup.metadata.unwrap().matched_by.as_deref(), Some("email"));
    }

    #[test]
    fn lookup_tolerates_missing_optional_sections() {
        let raw = r#"{"student": {"id": "s-2"}}"#;
        let lookup: StudentLookup = serde_json::from_str(raw).unwrap();
        assert_eq!(lookup.resolved_id(), "s-2");
        assert!(lookup.submissions.is_empty());
        assert!(lookup.analytics.is_none());
    }
}
