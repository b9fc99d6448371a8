//! EMSA Monitor Core Library
//!
//! Shared functionality for the EMSA monitor components:
//! - Container and alert data model for the EMSA REST API
//! - Response envelope normalization
//! - Fill-level band classification and fleet metrics
//! - Container form state machine with client-side validation
//! - Deterministic CSV / report rendering

pub mod envelope;
pub mod form;
pub mod metrics;
pub mod model;
pub mod report;
pub mod settings;
pub mod tracing_init;

pub use envelope::NormalizationError;
pub use metrics::{Banda, ResumenFlota};
pub use model::{Alerta, Contenedor, Estado};
