// src/services/attendance_service.rs
use crate::{
    error::{AppError, AppResult},
    models::attendance::{AttendanceFeed, AttendanceRecord},
};
use std::time::Duration;

/// Cliente do feed externo de presença (planilha publicada via API).
/// URL e credencial vêm sempre do ambiente, nunca do código.
#[derive(Debug, Clone)]
pub struct AttendanceClient {
    http: reqwest::Client,
    feed_url: String,
    api_key: Option<String>,
}

impl AttendanceClient {
    /// Lê ATTENDANCE_FEED_URL (obrigatória) e ATTENDANCE_FEED_KEY (opcional).
    pub fn from_env() -> AppResult<Self> {
        let feed_url = std::env::var("ATTENDANCE_FEED_URL")?;
        let api_key = std::env::var("ATTENDANCE_FEED_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            feed_url: feed_url.trim().to_string(),
            api_key,
        })
    }

    /// Busca todas as linhas do feed. Quem chama decide se a falha é fatal
    /// (aqui não é: a página degrada para "sem presença").
    pub async fn fetch_records(&self) -> AppResult<Vec<AttendanceRecord>> {
        tracing::debug!("📡 GET {}", self.feed_url);
        let mut request = self.http.get(&self.feed_url);
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamRejected {
                status: status.as_u16(),
                message: format!("Attendance feed returned HTTP {}", status.as_u16()),
            });
        }
        let feed: AttendanceFeed = response.json().await?;
        tracing::debug!("Feed de presença devolveu {} linhas.", feed.data.len());
        Ok(feed.data)
    }
}

/// Quão forte foi o cruzamento de nomes que escolheu a linha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchConfidence {
    Exact,
    Contains,
    TokenOverlap,
}

/// Resultado do cruzamento: a linha escolhida, a força do critério que a
/// escolheu e se havia mais do que uma candidata (empate resolvido pela
/// ordem do feed).
#[derive(Debug, Clone)]
pub struct AttendanceMatch {
    pub record: AttendanceRecord,
    pub confidence: MatchConfidence,
    pub ambiguous: bool,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn contains_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Aplica os critérios em ordem de força a um par de nomes já normalizados.
fn classify_pair(student: &str, record: &str) -> Option<MatchConfidence> {
    if record.is_empty() {
        return None;
    }
    if student == record {
        return Some(MatchConfidence::Exact);
    }
    if contains_either(student, record) {
        return Some(MatchConfidence::Contains);
    }
    let student_tokens: Vec<&str> = student.split_whitespace().collect();
    let record_tokens: Vec<&str> = record.split_whitespace().collect();
    if student_tokens.len() >= 2 && record_tokens.len() >= 2 {
        let first_ok = contains_either(student_tokens[0], record_tokens[0]);
        let last_ok = contains_either(
            student_tokens[student_tokens.len() - 1],
            record_tokens[record_tokens.len() - 1],
        );
        if first_ok && last_ok {
            return Some(MatchConfidence::TokenOverlap);
        }
    }
    None
}

/// Procura a linha de presença do aluno por heurística de nome.
///
/// O feed não tem IDs, só nomes livres, por isso o cruzamento é melhor
/// esforço: a primeira linha que satisfaz qualquer critério ganha, e
/// `ambiguous` sinaliza quando mais de uma satisfazia.
pub fn match_attendance(
    student_name: &str,
    records: &[AttendanceRecord],
) -> Option<AttendanceMatch> {
    let needle = normalize(student_name);
    if needle.is_empty() {
        return None;
    }

    let mut chosen: Option<(usize, MatchConfidence)> = None;
    let mut satisfying = 0usize;
    for (idx, record) in records.iter().enumerate() {
        if let Some(confidence) = classify_pair(&needle, &normalize(&record.name)) {
            satisfying += 1;
            if chosen.is_none() {
                chosen = Some((idx, confidence));
            }
        }
    }

    chosen.map(|(idx, confidence)| AttendanceMatch {
        record: records[idx].clone(),
        confidence,
        ambiguous: satisfying > 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, pct: f64) -> AttendanceRecord {
        AttendanceRecord {
            name: name.to_string(),
            attendance_percentage: pct,
            total_points: 40.0,
        }
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        let feed = vec![record("jane doe", 95.0)];
        let m = match_attendance("Jane Doe", &feed).unwrap();
        assert_eq!(m.confidence, MatchConfidence::Exact);
        assert!(!m.ambiguous);
        assert_eq!(m.record.attendance_percentage, 95.0);
    }

    #[test]
    fn substring_match_works_in_either_direction() {
        let feed = vec![record("Doe", 80.0)];
        let m = match_attendance("Jane Doe", &feed).unwrap();
        assert_eq!(m.confidence, MatchConfidence::Contains);

        let feed = vec![record("Jane Doe Santos", 70.0)];
        let m = match_attendance("Jane Doe", &feed).unwrap();
        assert_eq!(m.confidence, MatchConfidence::Contains);
    }

    #[test]
    fn token_rule_requires_first_and_last_to_agree() {
        let feed = vec![record("Jane Smith", 60.0)];
        assert!(match_attendance("Jane Q. Doe", &feed).is_none());

        let feed = vec![record("Jane M. Doe", 60.0)];
        let m = match_attendance("Jane Q. Doe", &feed).unwrap();
        assert_eq!(m.confidence, MatchConfidence::TokenOverlap);
    }

    #[test]
    fn empty_feed_or_blank_name_yields_no_match() {
        assert!(match_attendance("A B", &[]).is_none());
        assert!(match_attendance("   ", &[record("A B", 50.0)]).is_none());
        assert!(match_attendance("", &[record("A B", 50.0)]).is_none());
    }

    #[test]
    fn first_satisfying_record_wins_and_ties_are_flagged() {
        let feed = vec![
            record("Maria Silva", 10.0),
            record("jane doe", 20.0),
            record("Jane Doe", 30.0),
        ];
        let m = match_attendance("Jane Doe", &feed).unwrap();
        assert_eq!(m.record.attendance_percentage, 20.0);
        assert!(m.ambiguous);
    }

    #[test]
    fn blank_record_names_never_match() {
        let feed = vec![record("", 99.0), record("   ", 98.0)];
        assert!(match_attendance("Jane Doe", &feed).is_none());
    }
}
