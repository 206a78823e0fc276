//! Clinic resources and their filter specifications
//!
//! Each searchable resource owns one static [`FilterSpec`]. Rule order is
//! part of the contract: callers rely on it for fragment and parameter
//! positions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::filters::{FieldRule, FilterSpec, FilterSpecError};
use crate::data::sql::RelatedLookup;

/// Prescriptions linked to a medical-history entry
pub const PRESCRIPTIONS: RelatedLookup = RelatedLookup {
    table: "recetas",
    join_key: "historial_id",
    column: "medicamento",
};

pub static APPOINTMENTS: FilterSpec = FilterSpec::new(
    "appointments",
    &[
        FieldRule::exact("fecha", "fecha"),
        FieldRule::exact("paciente_id", "paciente_id"),
        FieldRule::exact("doctor_id", "doctor_id"),
        FieldRule::exact("obra_social_id", "obra_social_id"),
        FieldRule::exact("estado", "estado"),
        FieldRule::range_from("date_from", "fecha"),
        FieldRule::range_to("date_to", "fecha"),
    ],
);

pub static MEDICAL_HISTORY: FilterSpec = FilterSpec::new(
    "medical-history",
    &[
        FieldRule::exact("paciente_id", "paciente_id"),
        FieldRule::exact("doctor_id", "doctor_id"),
        FieldRule::exact("fecha", "fecha"),
        FieldRule::range_from("date_from", "fecha"),
        FieldRule::range_to("date_to", "fecha"),
        FieldRule::contains("diagnostico", "diagnostico"),
        FieldRule::subquery_contains("medicamento", "id", PRESCRIPTIONS),
    ],
);

pub static PERSONS: FilterSpec = FilterSpec::new(
    "persons",
    &[
        FieldRule::exact("dni", "dni"),
        FieldRule::contains("nombre", "nombre"),
        FieldRule::contains("apellido", "apellido"),
        FieldRule::contains("direccion", "direccion"),
        FieldRule::contains("telefono", "telefono"),
    ],
);

pub static REFERENCE_PERSONS: FilterSpec = FilterSpec::new(
    "reference-persons",
    &[
        FieldRule::exact("paciente_id", "paciente_id"),
        FieldRule::exact("dni", "dni"),
        FieldRule::contains("nombre", "nombre"),
        FieldRule::contains("apellido", "apellido"),
        FieldRule::contains("telefono", "telefono"),
        FieldRule::contains("direccion", "direccion"),
        FieldRule::contains("relacion", "relacion"),
    ],
);

/// Searchable clinic resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Appointments,
    MedicalHistory,
    Persons,
    ReferencePersons,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Appointments,
        Resource::MedicalHistory,
        Resource::Persons,
        Resource::ReferencePersons,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Resource::Appointments => "appointments",
            Resource::MedicalHistory => "medical-history",
            Resource::Persons => "persons",
            Resource::ReferencePersons => "reference-persons",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            Resource::Appointments => "turnos",
            Resource::MedicalHistory => "historial_medico",
            Resource::Persons => "personas",
            Resource::ReferencePersons => "personas_referencia",
        }
    }

    /// Selected columns, matching the row type for the resource
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Resource::Appointments => &[
                "id",
                "fecha",
                "hora",
                "paciente_id",
                "doctor_id",
                "obra_social_id",
                "estado",
            ],
            Resource::MedicalHistory => &[
                "id",
                "paciente_id",
                "doctor_id",
                "fecha",
                "diagnostico",
                "observaciones",
            ],
            Resource::Persons => &["id", "dni", "nombre", "apellido", "direccion", "telefono"],
            Resource::ReferencePersons => &[
                "id",
                "paciente_id",
                "dni",
                "nombre",
                "apellido",
                "telefono",
                "direccion",
                "relacion",
            ],
        }
    }

    /// Default ORDER BY expression for search results
    pub fn order_by(&self) -> &'static str {
        match self {
            Resource::Appointments => "fecha DESC, hora DESC, id DESC",
            Resource::MedicalHistory => "fecha DESC, id DESC",
            Resource::Persons | Resource::ReferencePersons => "apellido ASC, nombre ASC, id ASC",
        }
    }

    pub fn filter_spec(&self) -> &'static FilterSpec {
        match self {
            Resource::Appointments => &APPOINTMENTS,
            Resource::MedicalHistory => &MEDICAL_HISTORY,
            Resource::Persons => &PERSONS,
            Resource::ReferencePersons => &REFERENCE_PERSONS,
        }
    }

    /// Validate every resource's filter spec
    pub fn validate_all() -> Result<(), FilterSpecError> {
        for resource in Self::ALL {
            resource.filter_spec().validate()?;
        }
        tracing::debug!(count = Self::ALL.len(), "Filter specs validated");
        Ok(())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "appointments" | "turnos" => Ok(Resource::Appointments),
            "medical-history" | "historial" => Ok(Resource::MedicalHistory),
            "persons" | "personas" => Ok(Resource::Persons),
            "reference-persons" | "personas-referencia" => Ok(Resource::ReferencePersons),
            _ => Err(format!(
                "Invalid resource '{}'. Valid options: appointments, medical-history, \
                 persons, reference-persons",
                s
            )),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
