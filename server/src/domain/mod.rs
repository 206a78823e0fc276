//! Domain logic for the clinic backend
//!
//! - `resources` - Searchable resources and their filter specifications

pub mod resources;

pub use resources::Resource;
