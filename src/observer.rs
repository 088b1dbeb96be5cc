//! Publishing engine state to external listeners such as a renderer.

use std::error::Error;
use std::time::Duration;

use crate::field::Field;
use crate::input::Direction;
use crate::lifecycle::GameState;
use crate::snake::Snake;

/// Error an observer may report from [`Observer::update`].
pub type ObserverError = Box<dyn Error + Send + Sync>;

/// Snapshot of progress reported by [`GameView::stats`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Stats {
    /// Current snake body length.
    pub length: usize,
    /// Time since the game started. Keeps counting after it ends.
    pub time: Duration,
}

/// Read-only view of the engine handed to observers.
#[derive(Debug, Clone, Copy)]
pub struct GameView<'a> {
    pub(crate) field: &'a Field,
    pub(crate) snake: &'a Snake,
    pub(crate) state: GameState,
    pub(crate) stats: Stats,
    pub(crate) direction: Direction,
}

impl<'a> GameView<'a> {
    #[must_use]
    pub fn field(&self) -> &'a Field {
        self.field
    }

    #[must_use]
    pub fn snake(&self) -> &'a Snake {
        self.snake
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn stats(&self) -> Stats {
        self.stats
    }

    #[must_use]
    pub fn current_direction(&self) -> Direction {
        self.direction
    }
}

/// Listener notified after every state-affecting engine operation.
///
/// Observers receive a shared view and cannot mutate the engine.
pub trait Observer {
    fn update(&mut self, game: &GameView<'_>) -> Result<(), ObserverError>;
}

/// Identifies a registered observer for later removal.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct ObserverId(u64);

/// Ordered set of observers with failure isolation.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<(ObserverId, Box<dyn Observer>)>,
    next_id: u64,
}

impl ObserverRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer` after all existing ones.
    pub fn add(&mut self, observer: Box<dyn Observer>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Unregisters and returns the observer, or `None` if `id` is unknown.
    pub fn remove(&mut self, id: ObserverId) -> Option<Box<dyn Observer>> {
        let index = self
            .observers
            .iter()
            .position(|(registered, _)| *registered == id)?;
        Some(self.observers.remove(index).1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Calls every observer in registration order.
    ///
    /// A failing observer is logged and skipped. Returns the number of
    /// failures.
    pub fn notify(&mut self, view: &GameView<'_>) -> usize {
        let mut failures = 0;
        for (id, observer) in &mut self.observers {
            if let Err(error) = observer.update(view) {
                failures += 1;
                tracing::warn!(observer = id.0, %error, "observer update failed");
            }
        }
        failures
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::{GameView, Observer, ObserverError, ObserverRegistry, Stats};
    use crate::field::Field;
    use crate::input::Direction;
    use crate::lifecycle::GameState;
    use crate::snake::Snake;

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Observer for Recorder {
        fn update(&mut self, _game: &GameView<'_>) -> Result<(), ObserverError> {
            self.log.borrow_mut().push(self.name);
            Ok(())
        }
    }

    struct Failing;

    impl Observer for Failing {
        fn update(&mut self, _game: &GameView<'_>) -> Result<(), ObserverError> {
            Err("renderer went away".into())
        }
    }

    fn with_view(check: impl FnOnce(&GameView<'_>)) {
        let field = Field::new(5);
        let snake = Snake::new();
        let view = GameView {
            field: &field,
            snake: &snake,
            state: GameState::Setup,
            stats: Stats {
                length: 0,
                time: Duration::ZERO,
            },
            direction: Direction::Left,
        };
        check(&view);
    }

    fn recorder(name: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> Box<Recorder> {
        Box::new(Recorder {
            name,
            log: Rc::clone(log),
        })
    }

    #[test]
    fn observers_are_notified_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ObserverRegistry::new();
        registry.add(recorder("first", &log));
        registry.add(recorder("second", &log));

        with_view(|view| {
            assert_eq!(registry.notify(view), 0);
        });

        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn failing_observer_does_not_stop_the_others() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ObserverRegistry::new();
        registry.add(recorder("before", &log));
        registry.add(Box::new(Failing));
        registry.add(recorder("after", &log));

        with_view(|view| {
            assert_eq!(registry.notify(view), 1);
        });

        assert_eq!(*log.borrow(), vec!["before", "after"]);
    }

    #[test]
    fn removed_observer_is_no_longer_called() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ObserverRegistry::new();
        let first = registry.add(recorder("first", &log));
        registry.add(recorder("second", &log));

        assert!(registry.remove(first).is_some());
        assert!(registry.remove(first).is_none());
        assert_eq!(registry.len(), 1);

        with_view(|view| {
            registry.notify(view);
        });

        assert_eq!(*log.borrow(), vec!["second"]);
    }
}
