//! Query filter system
//!
//! Compiles partially-populated search criteria into parameterized SQL
//! predicates. Each resource declares a static [`FilterSpec`]; one compiler
//! handles all of them.
//!
//! ## Usage
//!
//! ```
//! use clinica_server::data::filters::{compile, Criteria, FieldRule, FilterSpec};
//!
//! static PEOPLE: FilterSpec = FilterSpec::new(
//!     "people",
//!     &[FieldRule::exact("dni", "dni"), FieldRule::contains("nombre", "nombre")],
//! );
//!
//! let criteria = Criteria::new().with("nombre", "Ana");
//! let compiled = compile(&PEOPLE, &criteria);
//! assert_eq!(compiled.predicate(), "1=1 AND nombre LIKE ?");
//! ```

mod compiler;
mod criteria;
mod spec;

pub use compiler::{BindValue, CompileOptions, CompiledQuery, FilterCompiler, PresenceRule, compile};
pub use criteria::{Criteria, CriteriaValue};
pub use spec::{FieldRule, FilterOp, FilterSpec, FilterSpecError};
