use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use sushi_engine::{Piece, Side};

use crate::ui::widgets::style;

/// Width of the space on each side of the tower.
const LANE_WIDTH: u16 = 9;
const TRUNK_WIDTH: u16 = 6;

const SUSHI: &str = "▄▄▄▄▄▄";
const CHOPSTICK: &str = "═══════";
const CAT: &str = "=^.^=";
const PLATE: &str = "▔";

#[derive(Debug, Clone, Copy)]
struct Flight {
    piece: Piece,
    struck_from: Side,
    distance: u16,
}

/// Tower of sushi pieces with the cat standing next to its base.
///
/// Pieces are given front first; the front piece is drawn at the bottom.
#[derive(Debug)]
pub struct TowerDisplay<'a> {
    pieces: Vec<Piece>,
    character_side: Side,
    game_over: bool,
    lifted: bool,
    flights: Vec<Flight>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> TowerDisplay<'a> {
    pub fn new<I>(pieces: I) -> Self
    where
        I: IntoIterator<Item = Piece>,
    {
        Self {
            pieces: pieces.into_iter().collect(),
            character_side: Side::Left,
            game_over: false,
            lifted: false,
            flights: vec![],
            block: None,
        }
    }

    pub fn character_side(self, character_side: Side) -> Self {
        Self {
            character_side,
            ..self
        }
    }

    /// Draws the tower and the cat in red.
    pub fn game_over(self, game_over: bool) -> Self {
        Self { game_over, ..self }
    }

    /// Draws the tower one row higher, while it is dropping.
    pub fn lifted(self, lifted: bool) -> Self {
        Self { lifted, ..self }
    }

    /// Adds a piece flying away from `struck_from`, `distance` cells from
    /// the tower.
    pub fn flight(mut self, piece: Piece, struck_from: Side, distance: u16) -> Self {
        self.flights.push(Flight {
            piece,
            struck_from,
            distance,
        });
        self
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        LANE_WIDTH * 2 + TRUNK_WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    fn piece_style(&self, base: Style) -> Style {
        if self.game_over { style::DANGER } else { base }
    }
}

impl Widget for TowerDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &TowerDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        if area.height < 2 {
            return;
        }

        let canvas = Canvas { area };
        let left = i32::from(area.x);
        let trunk = left + i32::from(LANE_WIDTH);
        let right = trunk + i32::from(TRUNK_WIDTH);
        let plate_y = i32::from(area.bottom()) - 1;
        let base_y = plate_y - 1;

        for x in area.left()..area.right() {
            canvas.put(buf, i32::from(x), plate_y, PLATE, style::PLATE);
        }

        let lift = i32::from(self.lifted);
        for (row, piece) in (0..).zip(&self.pieces) {
            let y = base_y - row - lift;
            if y < i32::from(area.y) {
                break;
            }
            draw_piece(canvas, buf, *piece, trunk, y, |base| self.piece_style(base));
        }

        for flight in &self.flights {
            let offset = i32::from(flight.distance);
            let x = match flight.struck_from {
                Side::Left => trunk + offset,
                Side::Right => trunk - offset,
                Side::None => trunk,
            };
            draw_piece(canvas, buf, flight.piece, x, base_y, |base| base);
        }

        let cat_x = match self.character_side {
            Side::Right => right + 2,
            Side::Left | Side::None => left + 2,
        };
        let cat_style = if self.game_over {
            style::DANGER
        } else {
            style::CAT
        };
        canvas.put(buf, cat_x, base_y, CAT, cat_style);
    }
}

fn draw_piece(
    canvas: Canvas,
    buf: &mut Buffer,
    piece: Piece,
    x: i32,
    y: i32,
    style_of: impl Fn(Style) -> Style,
) {
    canvas.put(buf, x, y, SUSHI, style_of(style::SUSHI));
    let chopstick_width = i32::try_from(CHOPSTICK.chars().count()).unwrap_or(0);
    match piece.side() {
        Side::Left => canvas.put(
            buf,
            x - chopstick_width,
            y,
            CHOPSTICK,
            style_of(style::CHOPSTICK),
        ),
        Side::Right => canvas.put(
            buf,
            x + i32::from(TRUNK_WIDTH),
            y,
            CHOPSTICK,
            style_of(style::CHOPSTICK),
        ),
        Side::None => {}
    }
}

/// Clips drawing to an area, with coordinates that may lie outside it.
#[derive(Debug, Clone, Copy)]
struct Canvas {
    area: Rect,
}

impl Canvas {
    fn put(self, buf: &mut Buffer, x: i32, y: i32, text: &str, style: Style) {
        let Ok(y) = u16::try_from(y) else {
            return;
        };
        if y < self.area.top() || y >= self.area.bottom() {
            return;
        }
        for (dx, ch) in (0..).zip(text.chars()) {
            let Ok(x) = u16::try_from(x + dx) else {
                continue;
            };
            if x < self.area.left() || x >= self.area.right() {
                continue;
            }
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(ch).set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(display: &TowerDisplay<'_>, height: u16) -> Buffer {
        let area = Rect::new(0, 0, display.width(), height);
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        buf
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_owned())
            .collect()
    }

    #[test]
    fn test_front_piece_at_bottom() {
        let display = TowerDisplay::new([
            Piece::new(Side::None),
            Piece::new(Side::Right),
            Piece::new(Side::Left),
        ]);
        let buf = render(&display, 5);
        assert_eq!(row(&buf, 4), "▔".repeat(24));
        assert_eq!(row(&buf, 3), "  =^.^=  ▄▄▄▄▄▄         ");
        assert_eq!(row(&buf, 2), "         ▄▄▄▄▄▄═══════  ");
        assert_eq!(row(&buf, 1), "  ═══════▄▄▄▄▄▄         ");
        assert_eq!(row(&buf, 0), " ".repeat(24));
    }

    #[test]
    fn test_character_on_right_and_lifted_tower() {
        let display = TowerDisplay::new([Piece::new(Side::None)])
            .character_side(Side::Right)
            .lifted(true);
        let buf = render(&display, 4);
        assert_eq!(row(&buf, 2), "                 =^.^=  ");
        assert_eq!(row(&buf, 1), "         ▄▄▄▄▄▄         ");
    }

    #[test]
    fn test_flight_is_clipped() {
        let display =
            TowerDisplay::new(Vec::<Piece>::new()).flight(Piece::new(Side::None), Side::Left, 8);
        let buf = render(&display, 2);
        assert_eq!(row(&buf, 0), "  =^.^=          ▄▄▄▄▄▄ ");

        let display = TowerDisplay::new(Vec::<Piece>::new())
            .character_side(Side::Right)
            .flight(Piece::new(Side::None), Side::Right, 12);
        let buf = render(&display, 2);
        assert_eq!(row(&buf, 0), "▄▄▄              =^.^=  ");
    }

    #[test]
    fn test_tall_tower_is_cut_at_the_top() {
        let display = TowerDisplay::new(vec![Piece::new(Side::None); 10]);
        let buf = render(&display, 3);
        assert_eq!(row(&buf, 0), "         ▄▄▄▄▄▄         ");
    }
}
