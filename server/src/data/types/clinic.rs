//! Row types for clinic resources
//!
//! Field order matches `Resource::columns()` for each resource.

use serde::{Deserialize, Serialize};

/// Appointment row (`turnos`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AppointmentRow {
    pub id: i64,
    /// ISO date (YYYY-MM-DD)
    pub fecha: String,
    pub hora: Option<String>,
    pub paciente_id: i64,
    pub doctor_id: i64,
    pub obra_social_id: Option<i64>,
    pub estado: String,
}

/// Medical-history entry row (`historial_medico`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MedicalHistoryRow {
    pub id: i64,
    pub paciente_id: i64,
    pub doctor_id: i64,
    pub fecha: String,
    pub diagnostico: Option<String>,
    pub observaciones: Option<String>,
}

/// Person row (`personas`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PersonRow {
    pub id: i64,
    pub dni: String,
    pub nombre: String,
    pub apellido: String,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
}

/// Reference person row (`personas_referencia`): a patient's contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReferencePersonRow {
    pub id: i64,
    pub paciente_id: i64,
    pub dni: Option<String>,
    pub nombre: String,
    pub apellido: String,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub relacion: Option<String>,
}
