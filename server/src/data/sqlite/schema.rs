//! SQLite schema definitions
//!
//! Initial schema for the clinic tables. Later changes live in `migrations`.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Initial schema SQL (version 1)
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

-- =============================================================================
-- 1. Persons (patients and doctors share the same identity table)
-- =============================================================================
CREATE TABLE IF NOT EXISTS personas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    dni TEXT NOT NULL UNIQUE,
    nombre TEXT NOT NULL,
    apellido TEXT NOT NULL,
    direccion TEXT,
    telefono TEXT
);

-- =============================================================================
-- 2. Reference persons (patient contacts)
-- =============================================================================
CREATE TABLE IF NOT EXISTS personas_referencia (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    paciente_id INTEGER NOT NULL REFERENCES personas(id) ON DELETE CASCADE,
    dni TEXT,
    nombre TEXT NOT NULL,
    apellido TEXT NOT NULL,
    telefono TEXT,
    direccion TEXT,
    relacion TEXT
);

-- =============================================================================
-- 3. Appointments
-- =============================================================================
CREATE TABLE IF NOT EXISTS turnos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    fecha TEXT NOT NULL,
    hora TEXT,
    paciente_id INTEGER NOT NULL REFERENCES personas(id),
    doctor_id INTEGER NOT NULL REFERENCES personas(id),
    obra_social_id INTEGER,
    estado TEXT NOT NULL DEFAULT 'pendiente'
);

-- =============================================================================
-- 4. Medical history and prescriptions
-- =============================================================================
CREATE TABLE IF NOT EXISTS historial_medico (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    paciente_id INTEGER NOT NULL REFERENCES personas(id),
    doctor_id INTEGER NOT NULL REFERENCES personas(id),
    fecha TEXT NOT NULL,
    diagnostico TEXT,
    observaciones TEXT
);

CREATE TABLE IF NOT EXISTS recetas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    historial_id INTEGER NOT NULL REFERENCES historial_medico(id) ON DELETE CASCADE,
    medicamento TEXT NOT NULL,
    dosis TEXT
);
"#;

/// Version 2: indexes on the columns search filters hit most
pub const MIGRATION_V2: &str = r#"
CREATE INDEX IF NOT EXISTS idx_turnos_fecha ON turnos(fecha);
CREATE INDEX IF NOT EXISTS idx_turnos_doctor ON turnos(doctor_id, fecha);
CREATE INDEX IF NOT EXISTS idx_historial_paciente ON historial_medico(paciente_id, fecha);
CREATE INDEX IF NOT EXISTS idx_recetas_historial ON recetas(historial_id);
CREATE INDEX IF NOT EXISTS idx_referencia_paciente ON personas_referencia(paciente_id)
"#;
