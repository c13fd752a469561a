// src/services/profile_service.rs
//
// Montagem da página de perfil: função pura dos dados obtidos para as
// structs de template. Nenhum I/O acontece aqui.
use crate::{
    models::{
        attendance::AttendanceRecord,
        coursework::{Assignment, Submission, SubmissionState},
        student::{CourseInfo, StudentLookup},
        user::Viewer,
    },
    services::{
        attendance_service::{self, AttendanceMatch},
        metrics_service,
    },
    templates::{AssignmentRow, AttendanceView, Insight, ProgressRow, StudentProfilePage},
};
use chrono::{DateTime, Local};
use std::collections::HashMap;

/// Tudo o que a página precisa, já obtido dos serviços externos.
/// O estado é deste pedido e morre com ele; um novo pedido recomeça do zero.
#[derive(Debug, Clone)]
pub struct ProfileData {
    pub lookup: StudentLookup,
    pub assignments: Vec<Assignment>,
    pub course: CourseInfo,
    pub attendance: Vec<AttendanceRecord>,
}

/// Classificação visual de uma linha de trabalho.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowStatus {
    pub label: &'static str,
    pub css: &'static str,
    pub awaiting_grade: bool,
    pub overdue_flag: bool,
}

/// Decide o selo de estado de um trabalho, em ordem de prioridade:
/// sem entrega, entregue, devolvido com nota, e o resto como "em curso"
/// com estilo neutro (em curso não é um erro).
pub fn classify_status(
    assignment: &Assignment,
    submission: Option<&Submission>,
    now: DateTime<Local>,
) -> RowStatus {
    let overdue = assignment.is_overdue_at(now);
    match submission {
        None => RowStatus {
            label: "Not Submitted",
            css: "status-muted",
            awaiting_grade: false,
            overdue_flag: overdue,
        },
        Some(s) => match s.state {
            SubmissionState::TurnedIn => RowStatus {
                label: "Submitted",
                css: if overdue { "status-warning" } else { "status-success" },
                awaiting_grade: s.assigned_grade.is_none(),
                overdue_flag: false,
            },
            SubmissionState::Returned => RowStatus {
                label: "Graded",
                css: if overdue { "status-warning" } else { "status-success" },
                awaiting_grade: false,
                overdue_flag: false,
            },
            _ => RowStatus {
                label: "In Progress",
                css: "status-pending",
                awaiting_grade: false,
                overdue_flag: false,
            },
        },
    }
}

fn format_points(points: f64) -> String {
    if (points - points.trunc()).abs() < 1e-9 {
        format!("{}", points.trunc() as i64)
    } else {
        format!("{points}")
    }
}

fn grade_label(submission: Option<&Submission>, assignment: &Assignment) -> Option<String> {
    let grade = submission.and_then(|s| s.assigned_grade)?;
    match assignment.max_points {
        Some(max) => Some(format!("{} / {}", format_points(grade), format_points(max))),
        None => Some(format_points(grade)),
    }
}

/// Nome usado no cruzamento com o feed de presença. Só nomes de verdade;
/// e-mail e ID nunca entram na heurística.
fn name_for_matching(lookup: &StudentLookup) -> String {
    let full = lookup.student.full_name.trim();
    if !full.is_empty() {
        return full.to_string();
    }
    format!(
        "{} {}",
        lookup.student.given_name.trim(),
        lookup.student.family_name.trim()
    )
    .trim()
    .to_string()
}

fn photo_proxy_url(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    // Fotos do serviço da turma chegam muitas vezes sem esquema ("//host/...")
    let absolute = if raw.starts_with("//") {
        format!("https:{raw}")
    } else {
        raw.to_string()
    };
    Some(format!("/photo-proxy?url={}", urlencoding::encode(&absolute)))
}

fn clamp_percent(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    (value.round() as u32).min(100)
}

/// Monta a página inteira a partir dos dados do pedido.
///
/// A lista de linhas é guiada pelos trabalhos: cada trabalho junta-se a no
/// máximo uma entrega; entregas órfãs (sem trabalho correspondente) são
/// ignoradas em silêncio.
pub fn build_profile_page(
    data: &ProfileData,
    viewer: &Viewer,
    now: DateTime<Local>,
) -> StudentProfilePage {
    let lookup = &data.lookup;
    let metrics =
        metrics_service::resolve_metrics(lookup.analytics.as_ref(), &lookup.submissions, &data.assignments);

    // Junção entrega -> trabalho (a primeira entrega de cada trabalho ganha)
    let mut by_assignment: HashMap<&str, &Submission> = HashMap::new();
    for submission in &lookup.submissions {
        by_assignment
            .entry(submission.course_work_id.as_str())
            .or_insert(submission);
    }

    let rows: Vec<AssignmentRow> = data
        .assignments
        .iter()
        .map(|assignment| {
            let submission = by_assignment.get(assignment.id.as_str()).copied();
            let status = classify_status(assignment, submission, now);
            AssignmentRow {
                title: assignment.title.clone(),
                due_label: assignment.format_due_date(),
                status_label: status.label,
                status_css: status.css,
                awaiting_grade: status.awaiting_grade,
                overdue_flag: status.overdue_flag,
                grade_label: grade_label(submission, assignment),
            }
        })
        .collect();

    // Presença: sem linha correspondente, o cartão mostra 0% e o resto
    // da UI de presença fica oculto (ausente não é o mesmo que zero)
    let matched: Option<AttendanceMatch> =
        attendance_service::match_attendance(&name_for_matching(lookup), &data.attendance);
    if let Some(m) = &matched {
        if m.ambiguous {
            tracing::warn!(
                "Cruzamento de presença ambíguo para '{}'; usando a primeira linha do feed.",
                name_for_matching(lookup)
            );
        }
    }
    let attendance = matched.as_ref().map(|m| AttendanceView {
        percent: clamp_percent(m.record.attendance_percentage),
        total_points: m.record.total_points,
    });
    let attendance_card_percent = attendance.as_ref().map(|a| a.percent).unwrap_or(0);

    let mut progress_rows = vec![ProgressRow {
        label: "Completion",
        percent: metrics.completion_rate,
    }];
    if metrics.average_grade > 0 {
        progress_rows.push(ProgressRow {
            label: "Average Grade",
            percent: metrics.average_grade.min(100),
        });
    }
    if let Some(a) = &attendance {
        progress_rows.push(ProgressRow {
            label: "Attendance",
            percent: a.percent,
        });
    }

    let mut insights = vec![Insight {
        text: format!(
            "Completed {} of {} assignments ({}%)",
            metrics.completed_submissions, metrics.total_assignments, metrics.completion_rate
        ),
        tone: "info",
    }];
    if metrics.average_grade > 0 {
        insights.push(Insight {
            text: format!("Average grade: {}", metrics.average_grade),
            tone: "good",
        });
    }
    if metrics.late_submissions > 0 {
        let text = if metrics.late_submissions == 1 {
            "1 late submission".to_string()
        } else {
            format!("{} late submissions", metrics.late_submissions)
        };
        insights.push(Insight { text, tone: "warn" });
    }
    if let Some(a) = &attendance {
        insights.push(Insight {
            text: format!("Attendance: {}%", a.percent),
            tone: "info",
        });
    }

    let is_public = viewer.is_public();
    let student_email = if is_public {
        None
    } else {
        lookup.student.email.clone().filter(|e| !e.trim().is_empty())
    };

    StudentProfilePage {
        course_name: data.course.name.clone(),
        course_section: data.course.section.clone(),
        student_name: lookup.student.display_name(),
        student_email,
        photo_proxy_url: photo_proxy_url(lookup.student.photo_url.as_deref()),
        initials: lookup.student.initials(),
        student_id: lookup.resolved_id().to_string(),
        average_grade_label: metrics.average_grade_label(),
        metrics,
        attendance,
        attendance_card_percent,
        progress_rows,
        insights,
        rows,
        show_share: viewer.is_student(),
        show_dashboard_link: viewer.is_admin(),
        is_public,
    }
}
