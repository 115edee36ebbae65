//! Wire models for the campus backend.
//!
//! Field names follow the backend exactly; the Spanish identifiers
//! (`usuario`, `id_materia`, ...) are part of the wire contract, so no serde
//! renames are applied.

use serde::{Deserialize, Serialize};

/// Credentials sent to `POST /api/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub usuario: String,
    pub password: String,
}

/// Successful login response: a bearer token plus the identity claims the
/// backend decoded into it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: String,
    pub payload: SessionClaims,
}

/// Identity payload associated with a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub usuario: String,
    pub id_carrera: String,
}

/// A course the student may subscribe to for notifications.
///
/// `anotado` mirrors the broker-side subscription set and is only flipped
/// after an acknowledged subscribe/unsubscribe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subject {
    pub id_materia: String,
    pub nombre_materia: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horarios: Option<Schedule>,
    #[serde(default)]
    pub anotado: bool,
}

/// Weekly lecture slot for a subject.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Schedule {
    pub dia: String,
    pub hora: String,
}

/// Envelope returned by `GET /api/materias`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubjectList {
    #[serde(default)]
    pub materias: Vec<Subject>,
}

/// Body for `POST /mqtt/subscribe` and `POST /mqtt/unsubscribe`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicRequest {
    pub id_materia: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_decodes() {
        let body = r#"{"token":"tok1","payload":{"usuario":"ana.alumno","id_carrera":"car_ing_sis"}}"#;
        let res: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(res.token, "tok1");
        assert_eq!(res.payload.usuario, "ana.alumno");
        assert_eq!(res.payload.id_carrera, "car_ing_sis");
    }

    #[test]
    fn subject_without_schedule_decodes() {
        let body = r#"{"id_materia":"mat_bd2","nombre_materia":"Bases de Datos II","anotado":false}"#;
        let subject: Subject = serde_json::from_str(body).unwrap();
        assert_eq!(subject.id_materia, "mat_bd2");
        assert!(subject.horarios.is_none());
        assert!(!subject.anotado);
    }

    #[test]
    fn subject_with_schedule_decodes() {
        let body = r#"{"id_materia":"mat_so","nombre_materia":"Sistemas Operativos","horarios":{"dia":"martes","hora":"18:00"},"anotado":true}"#;
        let subject: Subject = serde_json::from_str(body).unwrap();
        let schedule = subject.horarios.unwrap();
        assert_eq!(schedule.dia, "martes");
        assert_eq!(schedule.hora, "18:00");
        assert!(subject.anotado);
    }

    #[test]
    fn subject_list_tolerates_missing_field() {
        let list: SubjectList = serde_json::from_str("{}").unwrap();
        assert!(list.materias.is_empty());
    }
}
