//! TUI rendering components.

mod alertas;
mod contenedores;
mod dashboard;
mod form_overlay;
mod login;
mod mapa;
mod render;
mod reportes;
pub mod theme;

pub use render::draw;
