use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::cell::{CellContent, Position};
use crate::lifecycle::GameState;
use crate::observer::{GameView, Stats};

/// Terminal columns used per field cell, keeping cells roughly square.
const CELL_WIDTH: u16 = 2;

const GLYPH_SNAKE: &str = "██";
const GLYPH_FOOD: &str = "◆ ";
const GLYPH_EMPTY: &str = " ·";

/// Holds the stats seen when the game ended so the game-over screen stops
/// its clock there.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinalStats {
    latched: Option<Stats>,
}

impl FinalStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stats to display for `game`.
    pub fn observe(&mut self, game: &GameView<'_>) -> Stats {
        if game.state() != GameState::Ended {
            self.latched = None;
            return game.stats();
        }

        *self.latched.get_or_insert(game.stats())
    }
}

/// Renders the full game frame from an observer view, showing `stats`.
pub fn render(frame: &mut Frame<'_>, game: &GameView<'_>, stats: Stats) {
    let [play_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

    let field_area = centered_field(play_area, game.field().dimension());
    let block = Block::bordered()
        .title(" torus snake ")
        .border_style(Style::new().fg(Color::DarkGray));
    let inner = block.inner(field_area);
    frame.render_widget(block, field_area);

    render_cells(frame, inner, game);
    render_status(frame, status_area, game, stats);

    match game.state() {
        GameState::Setup => render_start_popup(frame, play_area),
        GameState::Ended => render_game_over_popup(frame, play_area, stats),
        GameState::Started => {}
    }
}

fn render_cells(frame: &mut Frame<'_>, inner: Rect, game: &GameView<'_>) {
    let field = game.field();
    let head = game.snake().head().map(|id| field.cell(id).position());

    let buffer = frame.buffer_mut();
    for cell in field.cells() {
        let Some((x, y)) = logical_to_terminal(inner, cell.position()) else {
            continue;
        };

        let (glyph, style) = match cell.content() {
            CellContent::Snake if Some(cell.position()) == head => (
                GLYPH_SNAKE,
                Style::new()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD),
            ),
            CellContent::Snake => (GLYPH_SNAKE, Style::new().fg(Color::Green)),
            CellContent::Food => (GLYPH_FOOD, Style::new().fg(Color::Red)),
            CellContent::Empty => (GLYPH_EMPTY, Style::new().fg(Color::DarkGray)),
        };
        buffer.set_string(x, y, glyph, style);
    }
}

fn render_status(frame: &mut Frame<'_>, area: Rect, game: &GameView<'_>, stats: Stats) {
    let line = format!(
        "length {}  time {}  {}  heading {}",
        stats.length,
        format_elapsed(stats.time),
        game.state().label(),
        game.current_direction(),
    );

    frame.render_widget(
        Paragraph::new(Line::from(line))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray)),
        area,
    );
}

fn render_start_popup(frame: &mut Frame<'_>, area: Rect) {
    let popup = centered_popup(area, 80, 40);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("SNAKE"),
        Line::from(""),
        Line::from("[Enter]/[Space] Start"),
        Line::from("[Q]/[Esc] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" start ")),
        popup,
    );
}

fn render_game_over_popup(frame: &mut Frame<'_>, area: Rect, stats: Stats) {
    let popup = centered_popup(area, 80, 50);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("GAME OVER"),
        Line::from(""),
        Line::from(format!("Length: {}", stats.length)),
        Line::from(format!("Time: {}", format_elapsed(stats.time))),
        Line::from(""),
        Line::from("[Q]/[Esc] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

fn format_elapsed(time: Duration) -> String {
    let seconds = time.as_secs();
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Returns the bordered field rectangle centered in `area`, clipped to fit.
fn centered_field(area: Rect, dimension: u16) -> Rect {
    let width = dimension
        .saturating_mul(CELL_WIDTH)
        .saturating_add(2)
        .min(area.width);
    let height = dimension.saturating_add(2).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}

fn logical_to_terminal(inner: Rect, position: Position) -> Option<(u16, u16)> {
    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use super::{FinalStats, GLYPH_FOOD, GLYPH_SNAKE, format_elapsed, logical_to_terminal, render};
    use crate::cell::Position;
    use crate::config::GameConfig;
    use crate::engine::GameEngine;
    use crate::field::Field;
    use crate::input::Direction;
    use crate::lifecycle::GameState;
    use crate::observer::{GameView, Stats};
    use crate::snake::Snake;

    fn screen_text(engine: &GameEngine) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).expect("test terminal");
        terminal
            .draw(|frame| {
                let view = engine.view();
                render(frame, &view, view.stats());
            })
            .expect("draw should succeed");

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn started_game_draws_snake_food_and_status() {
        let mut engine = GameEngine::with_seed(GameConfig::new(200, 8), 5).expect("valid config");
        engine.start().expect("start should succeed");

        let text = screen_text(&engine);

        assert!(text.contains("length 1"));
        assert!(text.contains("started"));
        assert_eq!(text.matches(GLYPH_SNAKE).count(), 1);
        assert_eq!(text.matches(GLYPH_FOOD.trim_end()).count(), 3);
    }

    #[test]
    fn setup_screen_shows_start_prompt() {
        let engine = GameEngine::with_seed(GameConfig::new(200, 8), 5).expect("valid config");

        let text = screen_text(&engine);

        assert!(text.contains("Start"));
        assert!(text.contains("setup"));
    }

    #[test]
    fn cells_outside_the_inner_area_are_skipped() {
        let inner = Rect::new(1, 1, 6, 3);

        assert_eq!(logical_to_terminal(inner, Position { x: 0, y: 0 }), Some((1, 1)));
        assert_eq!(logical_to_terminal(inner, Position { x: 2, y: 2 }), Some((5, 3)));
        assert_eq!(logical_to_terminal(inner, Position { x: 3, y: 0 }), None);
        assert_eq!(logical_to_terminal(inner, Position { x: 0, y: 3 }), None);
    }

    fn view<'a>(field: &'a Field, snake: &'a Snake, state: GameState, secs: u64) -> GameView<'a> {
        GameView {
            field,
            snake,
            state,
            stats: Stats {
                length: 4,
                time: Duration::from_secs(secs),
            },
            direction: Direction::Up,
        }
    }

    #[test]
    fn game_over_clock_stops_at_the_first_ended_frame() {
        let field = Field::new(5);
        let snake = Snake::new();
        let mut latch = FinalStats::new();

        let running = latch.observe(&view(&field, &snake, GameState::Started, 3));
        assert_eq!(running.time, Duration::from_secs(3));

        let ended = latch.observe(&view(&field, &snake, GameState::Ended, 7));
        assert_eq!(ended.time, Duration::from_secs(7));

        let later = latch.observe(&view(&field, &snake, GameState::Ended, 95));
        assert_eq!(later.time, Duration::from_secs(7));
        assert_eq!(later.length, 4);
    }

    #[test]
    fn elapsed_time_is_minutes_and_seconds() {
        assert_eq!(format_elapsed(Duration::from_millis(999)), "0:00");
        assert_eq!(format_elapsed(Duration::from_secs(75)), "1:15");
    }
}
