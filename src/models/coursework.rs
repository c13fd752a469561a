// src/models/coursework.rs
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::Deserialize;

/// Data de entrega tal como a API envia (mês 1-based, sem timezone).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DueDate {
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub month: u32,
    #[serde(default)]
    pub day: u32,
}

/// Hora de entrega (opcional; meia-noite quando ausente).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DueTime {
    #[serde(default)]
    pub hours: u32,
    #[serde(default)]
    pub minutes: u32,
}

/// Um trabalho da turma. Imutável depois de obtido.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub due_date: Option<DueDate>,
    pub due_time: Option<DueTime>,
    pub max_points: Option<f64>,
}

impl Assignment {
    /// Constrói o instante de entrega em hora local. Sem data, ou com uma
    /// data de calendário impossível, não há instante.
    pub fn due_instant(&self) -> Option<DateTime<Local>> {
        let date = self.due_date?;
        let time = self.due_time.unwrap_or_default();
        let naive: NaiveDateTime = NaiveDate::from_ymd_opt(date.year, date.month, date.day)?
            .and_hms_opt(time.hours, time.minutes, 0)?;
        Local.from_local_datetime(&naive).single()
    }

    /// Entrega já passou? Estritamente antes de `now`; sem data nunca passa.
    pub fn is_overdue_at(&self, now: DateTime<Local>) -> bool {
        match self.due_instant() {
            Some(due) => due < now,
            None => false,
        }
    }

    /// Texto da data de entrega para a linha do trabalho.
    pub fn format_due_date(&self) -> String {
        let date = match self.due_date {
            Some(d) => d,
            None => return "No due date".to_string(),
        };
        let naive = match NaiveDate::from_ymd_opt(date.year, date.month, date.day) {
            Some(n) => n,
            None => return "No due date".to_string(),
        };
        match self.due_time {
            Some(t) if t.hours < 24 && t.minutes < 60 => format!(
                "{} · {:02}:{:02}",
                naive.format("%b %-d, %Y"),
                t.hours,
                t.minutes
            ),
            _ => naive.format("%b %-d, %Y").to_string(),
        }
    }
}

/// Estado de uma entrega, espelhando o vocabulário da API da turma.
/// Estados futuros/desconhecidos caem em `Unknown` em vez de quebrar o parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionState {
    #[default]
    New,
    Created,
    TurnedIn,
    Returned,
    ReclaimedBySubmitter,
    #[serde(other)]
    Unknown,
}

impl SubmissionState {
    /// "Concluída" = o aluno entregou, com ou sem nota.
    pub fn is_completed(&self) -> bool {
        matches!(self, SubmissionState::TurnedIn | SubmissionState::Returned)
    }
}

/// Entrega de um aluno para um trabalho.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub course_work_id: String,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub state: SubmissionState,
    pub assigned_grade: Option<f64>,
    pub late: Option<bool>,
    pub creation_time: Option<String>,
    pub update_time: Option<String>,
}

impl Submission {
    /// Fonte única de verdade para atraso: a flag vinda do servidor.
    pub fn is_late(&self) -> bool {
        self.late == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, 0).single().unwrap()
    }

    fn due(y: i32, mo: u32, d: u32) -> Assignment {
        Assignment {
            id: "a-1".into(),
            title: "Essay".into(),
            due_date: Some(DueDate { year: y, month: mo, day: d }),
            ..Default::default()
        }
    }

    #[test]
    fn no_due_date_is_never_overdue() {
        let assignment = Assignment { title: "Open task".into(), ..Default::default() };
        assert!(!assignment.is_overdue_at(local(2099, 12, 31, 23, 59)));
        assert_eq!(assignment.format_due_date(), "No due date");
    }

    #[test]
    fn past_due_date_is_overdue() {
        assert!(due(2026, 3, 4).is_overdue_at(local(2026, 3, 5, 8, 0)));
    }

    #[test]
    fn due_today_compares_against_the_due_time() {
        let mut assignment = due(2026, 3, 5);
        assignment.due_time = Some(DueTime { hours: 10, minutes: 0 });
        assert!(assignment.is_overdue_at(local(2026, 3, 5, 11, 0)));
        assert!(!assignment.is_overdue_at(local(2026, 3, 5, 9, 0)));
        // Instante exato ainda não conta como atrasado
        assert!(!assignment.is_overdue_at(local(2026, 3, 5, 10, 0)));
    }

    #[test]
    fn missing_due_time_defaults_to_midnight() {
        let assignment = due(2026, 3, 5);
        assert!(assignment.is_overdue_at(local(2026, 3, 5, 0, 1)));
        assert!(!assignment.is_overdue_at(local(2026, 3, 4, 23, 59)));
    }

    #[test]
    fn impossible_calendar_dates_are_ignored() {
        let assignment = due(2026, 13, 40);
        assert!(assignment.due_instant().is_none());
        assert!(!assignment.is_overdue_at(local(2099, 1, 1, 0, 0)));
        assert_eq!(assignment.format_due_date(), "No due date");
    }

    #[test]
    fn due_date_formats_as_short_text() {
        assert_eq!(due(2026, 3, 5).format_due_date(), "Mar 5, 2026");

        let mut timed = due(2026, 11, 30);
        timed.due_time = Some(DueTime { hours: 23, minutes: 59 });
        assert_eq!(timed.format_due_date(), "Nov 30, 2026 · 23:59");
    }

    #[test]
    fn submission_states_parse_from_the_wire_vocabulary() {
        let turned_in: SubmissionState = serde_json::from_str("\"TURNED_IN\"").unwrap();
        assert_eq!(turned_in, SubmissionState::TurnedIn);
        assert!(turned_in.is_completed());

        let surprise: SubmissionState = serde_json::from_str("\"DRAFT_V2\"").unwrap();
        assert_eq!(surprise, SubmissionState::Unknown);
        assert!(!surprise.is_completed());
    }

    #[test]
    fn lateness_comes_only_from_the_flag() {
        let flagged = Submission { late: Some(true), ..Default::default() };
        let unflagged = Submission { late: Some(false), ..Default::default() };
        let silent = Submission::default();
        assert!(flagged.is_late());
        assert!(!unflagged.is_late());
        assert!(!silent.is_late());
    }
}
