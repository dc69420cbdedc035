use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{mat_display::*, status_display::*, tower_display::*};

mod mat_display;
mod status_display;
mod tower_display;

mod color {
    use ratatui::style::Color;

    pub const RICE: Color = Color::Rgb(250, 250, 240);
    pub const SALMON: Color = Color::Rgb(250, 128, 114);
    pub const WOOD: Color = Color::Rgb(170, 120, 70);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const ORANGE: Color = Color::Rgb(255, 127, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const SUSHI: Style = fg_bg(color::SALMON, color::RICE);
    pub const CHOPSTICK: Style = fg_bg(color::WOOD, color::BLACK);
    pub const PLATE: Style = fg_bg(color::GRAY, color::BLACK);
    pub const CAT: Style = fg_bg(color::ORANGE, color::BLACK);
    pub const DANGER: Style = fg_bg(color::RED, color::BLACK);
    pub const MAT: Style = fg_bg(color::BLACK, color::RICE);
    pub const GAME_OVER: Style = fg_bg(color::WHITE, color::RED);

    pub fn health(value: f64) -> Style {
        let fg = if value > 0.5 {
            color::GREEN
        } else if value > 0.2 {
            color::YELLOW
        } else {
            color::RED
        };
        fg_bg(fg, color::BLACK)
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
