// src/services/classroom_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        coursework::Assignment,
        student::{CourseInfo, StudentLookup},
    },
};
use serde::Deserialize;
use std::time::Duration;

/// Cliente da API da turma. Barato de clonar (o reqwest::Client interno
/// já partilha a pool de conexões).
#[derive(Debug, Clone)]
pub struct ClassroomClient {
    http: reqwest::Client,
    base_url: String,
    course_id: String,
    // Hosts que o proxy de fotos pode buscar (vazio recusa todos)
    photo_hosts: Vec<String>,
}

/// Corpo que a API devolve em respostas não-2xx: `{ "message": "..." }`.
#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ClassroomClient {
    /// Lê CLASSROOM_API_BASE, CLASSROOM_COURSE_ID e a lista opcional
    /// PHOTO_ALLOWED_HOSTS (separada por vírgulas) do ambiente.
    pub fn from_env() -> AppResult<Self> {
        let base_url = std::env::var("CLASSROOM_API_BASE")?;
        let course_id = std::env::var("CLASSROOM_COURSE_ID")?;
        let photo_hosts = std::env::var("PHOTO_ALLOWED_HOSTS")
            .unwrap_or_default()
            .split(',')
            .map(|host| host.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|host| !host.is_empty())
            .collect();
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            course_id: course_id.trim().to_string(),
            photo_hosts,
        })
    }

    fn lookup_url(&self, identifier: &str) -> String {
        format!(
            "{}/courses/{}/student-lookup?identifier={}",
            self.base_url,
            self.course_id,
            urlencoding::encode(identifier)
        )
    }

    /// GET + parse do JSON. Uma resposta não-2xx vira UpstreamRejected com a
    /// mensagem que o serviço devolveu (ou um texto genérico com o status).
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> AppResult<T> {
        tracing::debug!("📡 GET {}", url);
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let fallback = format!("Classroom service returned HTTP {}", status.as_u16());
            let message = match response.json::<UpstreamErrorBody>().await {
                Ok(body) => body.message.unwrap_or(fallback),
                Err(_) => fallback,
            };
            tracing::warn!("Resposta não-2xx da API da turma ({}): {}", status, message);
            return Err(AppError::UpstreamRejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }

    /// Procura um aluno da turma por ID, e-mail ou nome.
    pub async fn lookup_student(&self, identifier: &str) -> AppResult<StudentLookup> {
        let url = self.lookup_url(identifier);
        self.get_json(&url).await
    }

    /// Lista de trabalhos publicados da turma.
    pub async fn list_assignments(&self) -> AppResult<Vec<Assignment>> {
        let url = format!("{}/courses/{}/assignments", self.base_url, self.course_id);
        self.get_json(&url).await
    }

    /// Nome e secção da turma, para o cabeçalho da página.
    pub async fn course_info(&self) -> AppResult<CourseInfo> {
        let url = format!("{}/courses/{}", self.base_url, self.course_id);
        self.get_json(&url).await
    }

    /// O proxy de fotos só pode buscar hosts desta lista: host exato ou
    /// subdomínio de uma entrada. Lista vazia recusa tudo.
    pub fn photo_host_allowed(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.photo_hosts
            .iter()
            .any(|allowed| host == *allowed || host.ends_with(&format!(".{allowed}")))
    }

    /// Busca os bytes de uma foto para servir através do proxy local.
    /// Devolve o content-type reportado (se houver) e o corpo.
    pub async fn fetch_photo(&self, url: &str) -> AppResult<(Option<String>, Vec<u8>)> {
        tracing::debug!("📡 Proxy de foto: {}", url);
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamRejected {
                status: status.as_u16(),
                message: format!("Photo host returned HTTP {}", status.as_u16()),
            });
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let bytes = response.bytes().await?.to_vec();
        Ok((content_type, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ClassroomClient {
        ClassroomClient {
            http: reqwest::Client::new(),
            base_url: base.to_string(),
            course_id: "123456".to_string(),
            photo_hosts: Vec::new(),
        }
    }

    #[test]
    fn lookup_url_percent_encodes_the_identifier() {
        let c = client("https://api.example.test");
        assert_eq!(
            c.lookup_url("jane.doe@school.org"),
            "https://api.example.test/courses/123456/student-lookup?identifier=jane.doe%40school.org"
        );
        assert_eq!(
            c.lookup_url("Jane Doe"),
            "https://api.example.test/courses/123456/student-lookup?identifier=Jane%20Doe"
        );
    }

    #[test]
    fn photo_hosts_match_exact_or_subdomain_entries() {
        let mut c = client("https://api.example.test");
        c.photo_hosts = vec!["googleusercontent.com".to_string()];
        assert!(c.photo_host_allowed("googleusercontent.com"));
        assert!(c.photo_host_allowed("lh3.googleusercontent.com"));
        assert!(c.photo_host_allowed("LH3.GoogleUserContent.com"));
        assert!(!c.photo_host_allowed("metadata.internal"));
        assert!(!c.photo_host_allowed("notgoogleusercontent.com"));
    }

    #[test]
    fn an_empty_allowlist_refuses_every_host() {
        let c = client("https://api.example.test");
        assert!(!c.photo_host_allowed("localhost"));
        assert!(!c.photo_host_allowed("169.254.169.254"));
    }
}
