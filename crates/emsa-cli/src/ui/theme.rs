//! Shared color mapping.
//!
//! Every view (tables, gauges, map markers, charts) colors fill levels
//! through [`color_banda`] so band colors cannot drift apart.

use ratatui::style::Color;

use emsa_core::metrics::Banda;
use emsa_core::model::{Estado, Severidad};

/// Band color: green below warning, yellow in the warning band, red at or
/// above critical.
pub const fn color_banda(banda: Banda) -> Color {
    match banda {
        Banda::Normal => Color::Green,
        Banda::Advertencia => Color::Yellow,
        Banda::Critico => Color::Red,
    }
}

/// Convenience for coloring straight from a fill percentage.
pub const fn color_nivel(nivel: u8) -> Color {
    color_banda(Banda::of(nivel))
}

pub const fn color_estado(estado: Estado) -> Color {
    match estado {
        Estado::Activo => Color::Green,
        Estado::Mantenimiento => Color::Yellow,
        Estado::Inactivo => Color::DarkGray,
        Estado::Desconocido => Color::Gray,
    }
}

pub const fn color_severidad(severidad: Severidad) -> Color {
    match severidad {
        Severidad::Alta => Color::Red,
        Severidad::Media => Color::Yellow,
        Severidad::Baja => Color::Blue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_colors_follow_thresholds() {
        assert_eq!(color_nivel(59), Color::Green);
        assert_eq!(color_nivel(60), Color::Yellow);
        assert_eq!(color_nivel(79), Color::Yellow);
        assert_eq!(color_nivel(80), Color::Red);
    }
}
