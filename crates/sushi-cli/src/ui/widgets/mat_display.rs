use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Widget},
};
use sushi_engine::ScoreBoard;

use crate::ui::widgets::style;

/// Popup drawn over the tower: the title mat, or the game over banner.
#[derive(Debug, Clone, Copy)]
pub enum MatDisplay {
    Title(ScoreBoard),
    GameOver { score: usize },
}

impl MatDisplay {
    fn lines(self) -> (Vec<Line<'static>>, Style) {
        match self {
            MatDisplay::Title(scores) => (
                vec![
                    Line::from("SUSHI NEKO"),
                    Line::from(""),
                    Line::from(format!("HIGH SCORE {:>5}", scores.high_score)),
                    Line::from(format!("LAST SCORE {:>5}", scores.last_score)),
                    Line::from(""),
                    Line::from("[Space] PLAY"),
                ],
                style::MAT,
            ),
            MatDisplay::GameOver { score } => (
                vec![
                    Line::from("GAME OVER!!"),
                    Line::from(format!("SCORE {score}")),
                    Line::from("[Space] RETRY"),
                ],
                style::GAME_OVER,
            ),
        }
    }
}

impl Widget for MatDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (lines, style) = self.lines();
        let height = u16::try_from(lines.len()).unwrap_or(u16::MAX) + 2;
        let block = Block::new().style(style);
        let area = area.centered(Constraint::Length(area.width), Constraint::Length(height));
        let inner = block.inner(area);
        Clear.render(area, buf);
        block.render(area, buf);
        Text::from(lines)
            .style(style)
            .centered()
            .render(inner.centered_vertically(Constraint::Length(height - 2)), buf);
    }
}
