use std::{iter, time::Duration};

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

const WIDTH: u16 = 20;

/// Values shown next to the tower.
#[derive(Debug, Clone, Copy, Default)]
pub struct Status {
    pub score: usize,
    /// Fraction of a full bar; negative once depleted.
    pub health: f64,
    pub elapsed: Duration,
    pub high_score: usize,
    pub last_score: usize,
}

pub struct StatusDisplay<'a> {
    status: Status,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatusDisplay<'a> {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&Status) -> String),
    HealthBar,
    LabelValue(&'static str, &'static dyn Fn(&Status) -> String),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|status| status.score.to_string()),
    Row::FullLabel("HEALTH:"),
    Row::HealthBar,
    Row::FullLabel("TIME:"),
    Row::FullValue(&|status| {
        let dur = status.elapsed;
        format!(
            "{:0}:{:0>2}.{:0>2}",
            dur.as_secs() / 60,
            dur.as_secs() % 60,
            dur.subsec_millis() / 10
        )
    }),
    Row::Empty,
    Row::LabelValue("HIGH:", &|status| status.high_score.to_string()),
    Row::LabelValue("LAST:", &|status| status.last_score.to_string()),
];

/// Renders `value` (clamped to 0..=1) as a bar `width` cells wide.
fn health_bar(value: f64, width: u16) -> String {
    let filled = (value.clamp(0.0, 1.0) * f64::from(width)).round();
    (0..width)
        .map(|i| if f64::from(i) < filled { '█' } else { '░' })
        .collect()
}

impl Widget for StatusDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(&self.status), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::HealthBar => {
                    let health = self.status.health;
                    Line::styled(health_bar(health, area.width), style::health(health))
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(&self.status), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
