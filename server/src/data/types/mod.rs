//! Shared data types for database backends

mod clinic;

pub use clinic::{AppointmentRow, MedicalHistoryRow, PersonRow, ReferencePersonRow};
