// src/templates.rs
use askama::Template; // Trait necessário para Askama
use crate::services::metrics_service::DisplayMetrics;

// Struct para o template `login.html` (ficheiro externo em templates/)
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    // Campo opcional para passar uma mensagem de erro para o template
    pub error: Option<String>,
}

// Página inicial autenticada: saudação + formulário de procura (admins)
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub account_name: String,
    pub show_lookup: bool,
    pub notice: Option<String>,
}

// Uma linha da lista de trabalhos, já classificada
#[derive(Debug, Clone)]
pub struct AssignmentRow {
    pub title: String,
    pub due_label: String,
    pub status_label: &'static str,
    pub status_css: &'static str,
    pub awaiting_grade: bool,
    pub overdue_flag: bool,
    pub grade_label: Option<String>,
}

// Uma barra do painel de progresso
#[derive(Debug, Clone)]
pub struct ProgressRow {
    pub label: &'static str,
    pub percent: u32,
}

// Um item da lista de insights, com o tom visual correspondente
#[derive(Debug, Clone)]
pub struct Insight {
    pub text: String,
    pub tone: &'static str,
}

// Dados de presença quando o cruzamento de nomes encontrou uma linha
#[derive(Debug, Clone)]
pub struct AttendanceView {
    pub percent: u32,
    pub total_points: f64,
}

#[derive(Template)]
#[template(path = "student_profile.html")]
pub struct StudentProfilePage {
    pub course_name: String,
    pub course_section: String,
    pub student_name: String,
    // None em modo público (o e-mail é suprimido, não vazio)
    pub student_email: Option<String>,
    pub photo_proxy_url: Option<String>,
    pub initials: String,
    pub student_id: String,
    pub metrics: DisplayMetrics,
    pub average_grade_label: String,
    pub attendance: Option<AttendanceView>,
    // O cartão de presença mostra sempre um número; sem dados, 0
    pub attendance_card_percent: u32,
    pub progress_rows: Vec<ProgressRow>,
    pub insights: Vec<Insight>,
    pub rows: Vec<AssignmentRow>,
    pub show_share: bool,
    pub show_dashboard_link: bool,
    pub is_public: bool,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub message: String,
    // Ação de fuga depende de quem está a ver (dashboard vs login)
    pub escape_href: &'static str,
    pub escape_label: &'static str,
}
