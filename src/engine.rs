use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cell::{CellContent, Position};
use crate::config::{DEFAULT_DIRECTION, GameConfig, INITIAL_FOOD_COUNT};
use crate::error::{GameError, Result};
use crate::field::{CellId, Field};
use crate::input::Direction;
use crate::lifecycle::{GameState, LifecycleEvent};
use crate::observer::{GameView, Observer, ObserverId, ObserverRegistry, Stats};
use crate::snake::Snake;
use crate::ticker::{IntervalTimer, TickSource};

/// What one movement tick did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    /// The snake advanced onto an empty cell.
    Moved,
    /// The snake ate food and grew by one.
    Ate,
    /// The snake ran into itself and the game ended.
    Collided,
}

/// Owns the field, the snake and the lifecycle of one game.
pub struct GameEngine<T: TickSource = IntervalTimer> {
    config: GameConfig,
    field: Field,
    snake: Snake,
    state: GameState,
    direction: Direction,
    ticker: T,
    rng: StdRng,
    observers: ObserverRegistry,
    started_at: Option<Instant>,
}

impl GameEngine<IntervalTimer> {
    /// Creates a game in [`GameState::Setup`] with an entropy-seeded RNG.
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_ticker(config, IntervalTimer::new(), StdRng::from_entropy())
    }

    /// Creates a deterministic game for tests and reproducible runs.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_ticker(config, IntervalTimer::new(), StdRng::seed_from_u64(seed))
    }
}

impl<T: TickSource> GameEngine<T> {
    /// Creates a game driven by an arbitrary tick source.
    pub fn with_ticker(config: GameConfig, ticker: T, rng: StdRng) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            field: Field::new(config.field_dim),
            snake: Snake::new(),
            state: GameState::Setup,
            direction: DEFAULT_DIRECTION,
            ticker,
            rng,
            observers: ObserverRegistry::new(),
            started_at: None,
        })
    }

    /// Spawns the snake and the initial food, then arms the ticker.
    pub fn start(&mut self) -> Result<()> {
        self.start_at(Instant::now())
    }

    /// Like [`GameEngine::start`] with an explicit start instant.
    pub fn start_at(&mut self, now: Instant) -> Result<()> {
        let next = self.state.transition(LifecycleEvent::Start)?;

        self.spawn_snake()?;
        let placed = self.spawn_food(INITIAL_FOOD_COUNT);

        self.state = next;
        self.started_at = Some(now);
        self.ticker.arm(self.config.tick_interval(), now);

        tracing::debug!(
            dimension = self.field.dimension(),
            speed_ms = self.config.speed,
            food = placed,
            "game started"
        );
        self.notify_at(now);
        Ok(())
    }

    /// Runs one movement tick now.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        self.tick_at(Instant::now())
    }

    /// Runs one movement tick, reporting stats to observers as of `now`.
    ///
    /// Fails with [`GameError::InvalidTransition`] unless the game is started.
    pub fn tick_at(&mut self, now: Instant) -> Result<TickOutcome> {
        self.state.transition(LifecycleEvent::Tick)?;

        let next = self.next_head_position().ok_or(GameError::MissingHead)?;
        let cell = self
            .field
            .cell_id(next)
            .ok_or(GameError::OutOfBounds(next))?;

        let outcome = match self.field.cell(cell).content() {
            CellContent::Snake => {
                self.end(now)?;
                return Ok(TickOutcome::Collided);
            }
            CellContent::Empty => {
                self.snake.move_to(&mut self.field, cell);
                TickOutcome::Moved
            }
            CellContent::Food => {
                self.snake.eat_in(&mut self.field, cell);
                self.spawn_food(1);
                TickOutcome::Ate
            }
        };

        tracing::trace!(?outcome, x = next.x, y = next.y, "tick");
        self.notify_at(now);
        Ok(outcome)
    }

    /// Runs every tick the tick source reports as due at `now`.
    ///
    /// Stops early once the game ends. Returns the number of ticks run.
    pub fn pump(&mut self, now: Instant) -> Result<u32> {
        let due = self.ticker.due_ticks(now);

        let mut ran = 0;
        for _ in 0..due {
            if self.state != GameState::Started {
                break;
            }
            self.tick_at(now)?;
            ran += 1;
        }

        Ok(ran)
    }

    /// Overwrites the direction read by the next tick.
    ///
    /// Reversing into the snake's neck is allowed and ends the game on the
    /// next tick.
    pub fn set_current_direction(&mut self, direction: Direction) {
        tracing::trace!(%direction, "direction changed");
        self.direction = direction;
    }

    #[must_use]
    pub fn current_direction(&self) -> Direction {
        self.direction
    }

    /// Registers an observer; it is called after every state change.
    pub fn add_observer(&mut self, observer: impl Observer + 'static) -> ObserverId {
        self.observers.add(Box::new(observer))
    }

    /// Unregisters an observer. Returns false if it was not registered.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id).is_some()
    }

    /// Publishes the current state to all observers.
    pub fn refresh(&mut self) {
        self.notify_at(Instant::now());
    }

    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> GameConfig {
        self.config
    }

    #[must_use]
    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }

    #[must_use]
    pub fn stats(&self) -> Stats {
        self.stats_at(Instant::now())
    }

    /// Length and time elapsed between the start and `now`.
    #[must_use]
    pub fn stats_at(&self, now: Instant) -> Stats {
        let time = self
            .started_at
            .map_or(Duration::ZERO, |started_at| {
                now.saturating_duration_since(started_at)
            });

        Stats {
            length: self.snake.len(),
            time,
        }
    }

    /// Read-only snapshot of the engine as observers see it.
    #[must_use]
    pub fn view(&self) -> GameView<'_> {
        GameView {
            field: &self.field,
            snake: &self.snake,
            state: self.state,
            stats: self.stats(),
            direction: self.direction,
        }
    }

    fn end(&mut self, now: Instant) -> Result<()> {
        self.state = self.state.transition(LifecycleEvent::Collide)?;
        self.ticker.cancel();

        let stats = self.stats_at(now);
        tracing::info!(
            length = stats.length,
            elapsed_ms = u64::try_from(stats.time.as_millis()).unwrap_or(u64::MAX),
            "game over"
        );
        self.notify_at(now);
        Ok(())
    }

    fn next_head_position(&self) -> Option<Position> {
        let head = self.snake.head_position(&self.field)?;
        let (dx, dy) = self.direction.delta();

        let next = Position {
            x: head.x + dx,
            y: head.y + dy,
        };
        Some(next.wrapped(self.field.dimension()))
    }

    fn spawn_snake(&mut self) -> Result<()> {
        let cell = self.random_empty_cell().ok_or(GameError::NoFreeCell {
            dimension: self.field.dimension(),
        })?;
        self.snake.spawn(&mut self.field, cell);
        Ok(())
    }

    /// Places up to `count` food items on empty cells and returns how many fit.
    fn spawn_food(&mut self, count: usize) -> usize {
        for placed in 0..count {
            let Some(cell) = self.random_empty_cell() else {
                tracing::warn!(
                    requested = count,
                    placed,
                    "no empty cell left for food"
                );
                return placed;
            };
            self.field.cell_mut(cell).put_food();
        }
        count
    }

    fn random_empty_cell(&mut self) -> Option<CellId> {
        let candidates: Vec<CellId> = self.field.empty_cells().collect();
        if candidates.is_empty() {
            return None;
        }

        let index = self.rng.gen_range(0..candidates.len());
        Some(candidates[index])
    }

    fn notify_at(&mut self, now: Instant) {
        if self.observers.is_empty() {
            return;
        }

        let view = GameView {
            field: &self.field,
            snake: &self.snake,
            state: self.state,
            stats: self.stats_at(now),
            direction: self.direction,
        };
        self.observers.notify(&view);
    }
}

impl<T: TickSource + std::fmt::Debug> std::fmt::Debug for GameEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("direction", &self.direction)
            .field("snake_len", &self.snake.len())
            .field("ticker", &self.ticker)
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}
