// src/services/metrics_service.rs
use crate::models::{
    coursework::{Assignment, Submission},
    student::AnalyticsSummary,
};

/// Números finais dos cartões de métricas. Tudo inteiro e já arredondado;
/// `completion_rate` vive em [0, 100] e também serve de largura da barra.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMetrics {
    pub total_assignments: u32,
    pub completed_submissions: u32,
    pub completion_rate: u32,
    pub average_grade: u32,
    pub late_submissions: u32,
}

impl DisplayMetrics {
    /// Nota média para exibição: sem nenhuma nota lançada, "N/A".
    pub fn average_grade_label(&self) -> String {
        if self.average_grade == 0 {
            "N/A".to_string()
        } else {
            self.average_grade.to_string()
        }
    }
}

fn round_rate(rate: f64) -> u32 {
    if !rate.is_finite() || rate <= 0.0 {
        return 0;
    }
    (rate.round() as u32).min(100)
}

fn prefer_count(server: Option<u32>, computed: u32) -> u32 {
    match server {
        Some(value) if value > 0 => value,
        _ => computed,
    }
}

/// Resolve as métricas de exibição: campo a campo, o valor pré-agregado do
/// servidor ganha quando presente e diferente de zero; caso contrário o
/// valor é recalculado a partir das listas cruas. Função pura, nunca falha.
pub fn resolve_metrics(
    analytics: Option<&AnalyticsSummary>,
    submissions: &[Submission],
    assignments: &[Assignment],
) -> DisplayMetrics {
    let computed_total = assignments.len() as u32;
    let computed_completed = submissions
        .iter()
        .filter(|s| s.state.is_completed())
        .count() as u32;
    let computed_late = submissions.iter().filter(|s| s.is_late()).count() as u32;

    let total_assignments = prefer_count(analytics.and_then(|a| a.total_assignments), computed_total);
    let completed_submissions = prefer_count(
        analytics.and_then(|a| a.completed_submissions),
        computed_completed,
    );
    let late_submissions = prefer_count(analytics.and_then(|a| a.late_submissions), computed_late);

    let completion_rate = match analytics.and_then(|a| a.completion_rate) {
        Some(rate) if rate > 0.0 => round_rate(rate),
        _ => {
            if total_assignments == 0 {
                0
            } else {
                round_rate(100.0 * f64::from(completed_submissions) / f64::from(total_assignments))
            }
        }
    };

    let average_grade = match analytics.and_then(|a| a.average_grade) {
        Some(grade) if grade > 0.0 => grade.round() as u32,
        _ => {
            let graded: Vec<f64> = submissions.iter().filter_map(|s| s.assigned_grade).collect();
            if graded.is_empty() {
                0
            } else {
                let mean = graded.iter().sum::<f64>() / graded.len() as f64;
                mean.round() as u32
            }
        }
    };

    DisplayMetrics {
        total_assignments,
        completed_submissions,
        completion_rate,
        average_grade,
        late_submissions,
    }
}
