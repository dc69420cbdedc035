use std::time::Duration;

use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    style::{Color, Style},
    text::{Line, Text},
    widgets::Block,
};
use sushi_engine::{
    EmptyTowerError, EventLog, GameSession, ScoreStore, SessionConfig, SessionState, Side,
};

use crate::{
    command::play::scene::Scene,
    tui::{App, RenderMode, Tui},
    ui::widgets::{MatDisplay, Status, StatusDisplay, TowerDisplay, style},
};

const TOWER_HEIGHT: u16 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Strike(Side),
    Play,
    Quit,
}

impl Action {
    fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Left | KeyCode::Char('a') => Some(Action::Strike(Side::Left)),
            KeyCode::Right | KeyCode::Char('d') => Some(Action::Strike(Side::Right)),
            KeyCode::Char(' ') | KeyCode::Enter => Some(Action::Play),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct PlayApp<S> {
    session: GameSession<S, EventLog>,
    scene: Scene,
    fps: f64,
    /// Strikes received since the last frame.
    strikes: Vec<Side>,
    is_exiting: bool,
    error: Option<EmptyTowerError>,
}

impl<S> PlayApp<S>
where
    S: ScoreStore,
{
    pub fn new(config: SessionConfig, store: S, fps: f64) -> Self {
        let mut app = Self {
            session: GameSession::new(config, store, EventLog::new()),
            scene: Scene::default(),
            fps,
            strikes: vec![],
            is_exiting: false,
            error: None,
        };
        app.sync_scene();
        app
    }

    /// Returns the error that stopped the game, if any.
    pub fn finish(self) -> Result<(), EmptyTowerError> {
        self.error.map_or(Ok(()), Err)
    }

    fn sync_scene(&mut self) {
        for event in self.session.presenter_mut().drain() {
            self.scene.apply(event);
        }
    }

    /// Applies the strikes received since the last frame.
    fn resolve_strikes(&mut self) {
        if let Err(err) = self.session.strike_all(self.strikes.drain(..)) {
            self.error = Some(err);
            self.is_exiting = true;
        }
    }

    fn status(&self) -> Status {
        let scores = self.scene.scores();
        Status {
            score: self.scene.score(),
            health: self.scene.health(),
            elapsed: self.session.run_stats().elapsed(),
            high_score: scores.high_score,
            last_score: scores.last_score,
        }
    }

    fn help_text(&self) -> &'static str {
        match self.session.state() {
            SessionState::Title => "Controls: Space (Play) | q (Quit)",
            SessionState::Ready | SessionState::Playing => {
                "Controls: ← / a (Strike left) | → / d (Strike right) | q (Quit)"
            }
            SessionState::GameOver => "Controls: Space (Retry) | q (Quit)",
        }
    }
}

impl<S> App for PlayApp<S>
where
    S: ScoreStore,
{
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(self.fps);
        tui.set_render_mode(RenderMode::Interval(Duration::from_secs_f64(1.0 / self.fps)));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        let Some(key) = event.as_key_press_event() else {
            return;
        };
        match Action::from_key(key.code) {
            Some(Action::Strike(side)) => self.strikes.push(side),
            Some(Action::Play) => {
                // taps made before Play belong to the state they were made in
                self.resolve_strikes();
                self.session.press_play();
                self.sync_scene();
            }
            Some(Action::Quit) => self.is_exiting = true,
            None => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let border_style = match self.session.state() {
            SessionState::GameOver => style::DANGER,
            _ => style::DEFAULT,
        };

        let mut tower = TowerDisplay::new(self.session.tower().pieces())
            .character_side(self.session.character_side())
            .game_over(self.scene.is_game_over())
            .lifted(self.scene.is_dropping())
            .block(Block::bordered().border_style(border_style).style(style::DEFAULT));
        for flight in self.scene.flights() {
            tower = tower.flight(flight.piece, flight.struck_from, flight.distance());
        }
        let status = StatusDisplay::new(self.status()).block(
            Block::bordered()
                .title(Line::from("STATUS").centered())
                .border_style(border_style)
                .style(style::DEFAULT),
        );

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(TOWER_HEIGHT), Constraint::Length(1)])
                .areas(frame.area());
        let [tower_area, status_area] = Layout::horizontal([
            Constraint::Length(tower.width()),
            Constraint::Length(status.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(main_area);
        let [status_area] =
            Layout::vertical([Constraint::Length(status.height())]).areas(status_area);

        frame.render_widget(&tower, tower_area);
        frame.render_widget(status, status_area);

        let popup = if self.scene.is_mat_visible() {
            Some(MatDisplay::Title(self.scene.scores()))
        } else if self.scene.is_game_over() {
            Some(MatDisplay::GameOver {
                score: self.scene.score(),
            })
        } else {
            None
        };
        if let Some(popup) = popup {
            frame.render_widget(popup, tower_area);
        }

        let help_text = Text::from(self.help_text())
            .style(Style::default().fg(Color::DarkGray))
            .centered();
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, _tui: &mut Tui, dt: Duration) {
        self.resolve_strikes();
        self.session.tick(dt);
        self.sync_scene();
        self.scene.advance();
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyEventKind, KeyModifiers};
    use sushi_engine::{MemoryScoreStore, RestartState, ScoreBoard, ScoreKey, TowerSeed};

    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn app(scores: ScoreBoard) -> PlayApp<MemoryScoreStore> {
        let config = SessionConfig {
            seed: Some(TowerSeed::from_bytes([3; 16])),
            ..SessionConfig::default()
        };
        PlayApp::new(config, MemoryScoreStore::with_scores(scores), 60.0)
    }

    fn press(app: &mut PlayApp<MemoryScoreStore>, tui: &mut Tui, code: KeyCode) {
        app.handle_event(tui, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn test_title_shows_loaded_scores() {
        let scores = ScoreBoard {
            high_score: 12,
            last_score: 4,
        };
        let app = app(scores);
        assert!(app.scene.is_mat_visible());
        assert_eq!(app.status().high_score, 12);
        assert_eq!(app.status().last_score, 4);
    }

    #[test]
    fn test_play_and_strike() {
        let mut tui = Tui::new();
        let mut app = app(ScoreBoard::default());

        press(&mut app, &mut tui, KeyCode::Char(' '));
        assert_eq!(app.session.state(), SessionState::Ready);
        assert!(!app.scene.is_mat_visible());

        // the opening piece never threatens
        press(&mut app, &mut tui, KeyCode::Left);
        app.update(&mut tui, FRAME);
        assert_eq!(app.session.state(), SessionState::Playing);
        assert_eq!(app.scene.score(), 1);
        assert_eq!(app.scene.flights().len(), 1);
        assert!(app.scene.is_dropping());
        assert_eq!(app.session.run_stats().ticks(), 1);
    }

    #[test]
    fn test_strike_into_chopstick_ends_run() {
        let mut tui = Tui::new();
        let mut app = app(ScoreBoard::default());
        press(&mut app, &mut tui, KeyCode::Enter);

        // the second piece of every tower threatens the right side
        press(&mut app, &mut tui, KeyCode::Char('a'));
        press(&mut app, &mut tui, KeyCode::Char('d'));
        press(&mut app, &mut tui, KeyCode::Char('d'));
        app.update(&mut tui, FRAME);

        assert_eq!(app.session.state(), SessionState::GameOver);
        assert!(app.scene.is_game_over());
        assert_eq!(app.session.store().get(ScoreKey::LastScore), Some(1));
        assert_eq!(app.session.store().get(ScoreKey::HighScore), Some(1));

        press(&mut app, &mut tui, KeyCode::Char(' '));
        assert_eq!(app.session.state(), SessionState::Title);
        assert!(!app.scene.is_game_over());
        assert!(app.scene.is_mat_visible());
        assert_eq!(app.scene.scores().last_score, 1);
    }

    #[test]
    fn test_tap_before_retry_does_not_start_next_run() {
        let mut tui = Tui::new();
        let config = SessionConfig {
            seed: Some(TowerSeed::from_bytes([3; 16])),
            restart_state: RestartState::Ready,
            ..SessionConfig::default()
        };
        let mut app = PlayApp::new(config, MemoryScoreStore::new(), 60.0);
        press(&mut app, &mut tui, KeyCode::Char(' '));
        assert_eq!(app.session.state(), SessionState::Ready);

        // the opening piece is hit, the right-side piece behind it collides
        press(&mut app, &mut tui, KeyCode::Right);
        press(&mut app, &mut tui, KeyCode::Right);
        app.update(&mut tui, FRAME);
        assert_eq!(app.session.state(), SessionState::GameOver);

        // a tap and a retry within the same frame
        press(&mut app, &mut tui, KeyCode::Left);
        press(&mut app, &mut tui, KeyCode::Char(' '));
        assert_eq!(app.session.state(), SessionState::Ready);
        app.update(&mut tui, FRAME);

        assert_eq!(app.session.state(), SessionState::Ready);
        assert_eq!(app.scene.score(), 0);
        assert_eq!(app.session.run_stats().strikes(), 0);
        assert!(!app.should_exit());
    }

    #[test]
    fn test_tap_on_title_then_play_stays_ready() {
        let mut tui = Tui::new();
        let mut app = app(ScoreBoard::default());
        press(&mut app, &mut tui, KeyCode::Left);
        press(&mut app, &mut tui, KeyCode::Enter);
        app.update(&mut tui, FRAME);

        assert_eq!(app.session.state(), SessionState::Ready);
        assert_eq!(app.scene.score(), 0);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut tui = Tui::new();
        let mut app = app(ScoreBoard::default());
        let release = KeyEvent::new_with_kind(
            KeyCode::Char(' '),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        app.handle_event(&mut tui, Event::Key(release));
        assert_eq!(app.session.state(), SessionState::Title);

        press(&mut app, &mut tui, KeyCode::Char('q'));
        assert!(app.should_exit());
        assert!(app.finish().is_ok());
    }
}
