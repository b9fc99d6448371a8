//! Application state and types.

pub mod state;

pub use state::{
    App, AppMode, CENTRO_COCHABAMBA, CampoFormulario, CampoLogin, Confirmacion, FormularioActivo,
    LoginForm, ObjetivoEliminar, Vista,
};
