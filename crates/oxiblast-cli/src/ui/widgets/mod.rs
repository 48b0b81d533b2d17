use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    board_display::*, cell_display::*, key_binding_display::*, session_display::*,
    session_stats_display::*, tray_display::*,
};

mod board_display;
mod cell_display;
mod key_binding_display;
mod session_display;
mod session_stats_display;
mod tray_display;

mod color {
    use oxiblast_engine::{Hsl, ShapeColor};
    use ratatui::style::Color;

    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    pub fn shape(color: ShapeColor) -> Color {
        let (r, g, b) = hsl_to_rgb(color.hsl());
        Color::Rgb(r, g, b)
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn hsl_to_rgb(hsl: Hsl) -> (u8, u8, u8) {
        let s = f64::from(hsl.saturation) / 100.0;
        let l = f64::from(hsl.lightness) / 100.0;
        let h = f64::from(hsl.hue % 360) / 60.0;

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u8 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        (channel(r), channel(g), channel(b))
    }
}

pub mod style {
    use oxiblast_engine::ShapeColor;
    use ratatui::style::{Color, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = bg_only(color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);
    pub const HINT: Style = fg_bg(color::YELLOW, color::BLACK);
    pub const PREVIEW: Style = fg_bg(color::GREEN, color::BLACK);
    pub const PREVIEW_BLOCKED: Style = fg_bg(color::RED, color::BLACK);

    pub fn shape(shape_color: ShapeColor) -> Style {
        bg_only(color::shape(shape_color))
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
