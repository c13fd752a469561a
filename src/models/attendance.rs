// src/models/attendance.rs
use serde::Deserialize;

/// Uma linha do feed externo de presença. O feed só conhece nomes,
/// por isso o cruzamento com o aluno é feito por heurística de nome.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub attendance_percentage: f64,
    #[serde(default)]
    pub total_points: f64,
}

/// Envelope do feed: `{ "data": [ ... ] }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceFeed {
    #[serde(default)]
    pub data: Vec<AttendanceRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_envelope_parses_with_camel_case_fields() {
        let body = r#"{
            "data": [
                { "name": "Jane Doe", "attendancePercentage": 92.5, "totalPoints": 37.0 },
                { "name": "John Roe", "attendancePercentage": 40, "totalPoints": 16 }
            ]
        }"#;
        let feed: AttendanceFeed = serde_json::from_str(body).unwrap();
        assert_eq!(feed.data.len(), 2);
        assert_eq!(feed.data[0].name, "Jane Doe");
        assert!((feed.data[0].attendance_percentage - 92.5).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let feed: AttendanceFeed = serde_json::from_str(r#"{ "data": [ {} ] }"#).unwrap();
        assert_eq!(feed.data[0].name, "");
        assert_eq!(feed.data[0].attendance_percentage, 0.0);
    }
}
