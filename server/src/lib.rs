//! Clinic backend search core
//!
//! Compiles caller search criteria for clinic resources (appointments,
//! medical history, persons, reference persons) into parameterized SQL and
//! runs it against the embedded database.

mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
