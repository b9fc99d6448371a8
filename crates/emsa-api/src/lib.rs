//! EMSA REST API integration.
//!
//! Provides a reqwest-based client for the EMSA backend (containers, alerts,
//! auth), the process-wide session store, and the generic resource poller
//! that drives every timed refresh in the UI.

mod client;
pub mod poller;
pub mod session;


pub use client::{ApiClient, ApiConfig, ApiError};
pub use poller::{Instantanea, ResourcePoller};
pub use session::{Session, SessionStore};
