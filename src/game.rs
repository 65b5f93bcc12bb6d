use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::{
    DEFAULT_STEP_INTERVAL_MS, GridSize, POINTS_PER_FOOD, POINTS_PER_SPEED_UP,
    next_step_interval_ms,
};
use crate::food::spawn_position;
use crate::input::{Direction, direction_change_is_valid};
use crate::snake::{Position, Snake};
use crate::timer::{IntervalTimer, TimerHandle, TimerHost};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Idle,
    Running,
    GameOver,
}

/// Why the last game ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
    /// The snake covers every cell, leaving nowhere to place food.
    BoardFilled,
}

/// Result of one engine operation, telling the host what to redraw.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StepOutcome {
    /// Nothing changed: the game is not running or has no direction yet.
    Skipped,
    /// The snake advanced one cell without eating.
    Moved,
    /// The snake ate food and grew by one cell.
    Ate {
        score: u32,
        /// Set when this meal sped the game up.
        new_interval_ms: Option<u64>,
    },
    /// The game ended; the final state stays readable for rendering.
    GameOver { reason: DeathReason, score: u32 },
}

/// Owns all mutable game state and the step timer handle.
///
/// State changes only through [`GameEngine::start`],
/// [`GameEngine::handle_direction_input`] and [`GameEngine::step`].
#[derive(Debug)]
pub struct GameEngine<T: TimerHost = IntervalTimer> {
    snake: Snake,
    direction: Option<Direction>,
    next_direction: Option<Direction>,
    food: Option<Position>,
    score: u32,
    interval_ms: u64,
    tick_count: u64,
    status: GameStatus,
    death_reason: Option<DeathReason>,
    bounds: GridSize,
    rng: StdRng,
    timer: T,
    timer_handle: Option<TimerHandle>,
}

impl<T: TimerHost> GameEngine<T> {
    /// Creates an idle engine with entropy-seeded food placement.
    #[must_use]
    pub fn new(bounds: GridSize, timer: T) -> Self {
        Self::with_rng(bounds, timer, StdRng::from_entropy())
    }

    /// Creates an idle engine whose food placement is reproducible.
    #[must_use]
    pub fn with_seed(bounds: GridSize, timer: T, seed: u64) -> Self {
        Self::with_rng(bounds, timer, StdRng::seed_from_u64(seed))
    }

    fn with_rng(bounds: GridSize, timer: T, rng: StdRng) -> Self {
        debug_assert!(bounds.width > 0 && bounds.height > 0);

        Self {
            snake: Snake::new(center_of(bounds)),
            direction: None,
            next_direction: None,
            food: None,
            score: 0,
            interval_ms: DEFAULT_STEP_INTERVAL_MS,
            tick_count: 0,
            status: GameStatus::Idle,
            death_reason: None,
            bounds,
            rng,
            timer,
            timer_handle: None,
        }
    }

    /// Resets every piece of state and starts the step timer.
    ///
    /// Valid from any status; a running game is restarted from scratch.
    pub fn start(&mut self) {
        self.snake = Snake::new(center_of(self.bounds));
        self.direction = Some(Direction::Right);
        self.next_direction = None;
        self.food = spawn_position(&mut self.rng, self.bounds, &self.snake);
        self.score = 0;
        self.interval_ms = DEFAULT_STEP_INTERVAL_MS;
        self.tick_count = 0;
        self.death_reason = None;
        self.status = GameStatus::Running;
        self.reschedule();

        info!(
            width = self.bounds.width,
            height = self.bounds.height,
            interval_ms = self.interval_ms,
            "game started"
        );
    }

    /// Buffers a direction for the next step.
    ///
    /// Ignored outside [`GameStatus::Running`] and for a direct reversal of
    /// the current direction. Returns whether the input was buffered.
    pub fn handle_direction_input(&mut self, requested: Direction) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }

        if self
            .direction
            .is_some_and(|current| !direction_change_is_valid(current, requested))
        {
            return false;
        }

        self.next_direction = Some(requested);
        true
    }

    /// Advances the simulation by one tick.
    pub fn step(&mut self) -> StepOutcome {
        if self.status != GameStatus::Running {
            return StepOutcome::Skipped;
        }

        if let Some(next) = self.next_direction.take() {
            self.direction = Some(next);
        }
        let Some(direction) = self.direction else {
            return StepOutcome::Skipped;
        };

        self.tick_count += 1;
        let head = self.snake.head().stepped(direction);

        if let Some(reason) = self.check_collision(head) {
            return self.finish(reason);
        }

        self.snake.push_head(head);

        if self.food != Some(head) {
            self.snake.pop_tail();
            return StepOutcome::Moved;
        }

        self.score += POINTS_PER_FOOD;
        self.food = spawn_position(&mut self.rng, self.bounds, &self.snake);

        let new_interval_ms = if self.score % POINTS_PER_SPEED_UP == 0 {
            self.speed_up()
        } else {
            None
        };

        if self.food.is_none() {
            return self.finish(DeathReason::BoardFilled);
        }

        StepOutcome::Ate {
            score: self.score,
            new_interval_ms,
        }
    }

    /// Returns the collision `cell` would cause against walls or the current body.
    #[must_use]
    pub fn check_collision(&self, cell: Position) -> Option<DeathReason> {
        if !cell.is_within_bounds(self.bounds) {
            return Some(DeathReason::WallCollision);
        }

        if self.snake.occupies(cell) {
            return Some(DeathReason::SelfCollision);
        }

        None
    }

    fn speed_up(&mut self) -> Option<u64> {
        let next = next_step_interval_ms(self.interval_ms);
        if next == self.interval_ms {
            return None;
        }

        self.interval_ms = next;
        self.reschedule();
        debug!(score = self.score, interval_ms = next, "speed increased");

        Some(next)
    }

    fn finish(&mut self, reason: DeathReason) -> StepOutcome {
        self.stop_timer();
        self.status = GameStatus::GameOver;
        self.death_reason = Some(reason);

        info!(
            score = self.score,
            length = self.snake.len(),
            ticks = self.tick_count,
            ?reason,
            "game over"
        );

        StepOutcome::GameOver {
            reason,
            score: self.score,
        }
    }

    fn reschedule(&mut self) {
        self.stop_timer();
        self.timer_handle = Some(self.timer.schedule(Duration::from_millis(self.interval_ms)));
    }

    fn stop_timer(&mut self) {
        if let Some(handle) = self.timer_handle.take() {
            self.timer.cancel(handle);
        }
    }

    /// Replaces the snake body; used to pin scenarios in tests.
    pub fn place_snake(&mut self, snake: Snake) {
        self.snake = snake;
    }

    /// Moves the food to `position`; used to pin scenarios in tests.
    pub fn place_food(&mut self, position: Position) {
        self.food = Some(position);
    }

    /// Overrides the active direction and clears the buffer; used to pin scenarios in tests.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = Some(direction);
        self.next_direction = None;
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> Option<Position> {
        self.food
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Returns the current step interval in milliseconds.
    #[must_use]
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    #[must_use]
    pub fn next_direction(&self) -> Option<Direction> {
        self.next_direction
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    #[must_use]
    pub fn death_reason(&self) -> Option<DeathReason> {
        self.death_reason
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    #[must_use]
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Gives the host loop access to the timer so it can poll for firings.
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}

fn center_of(bounds: GridSize) -> Position {
    Position {
        x: i32::from(bounds.width / 2),
        y: i32::from(bounds.height / 2),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::GridSize;
    use crate::input::Direction;
    use crate::snake::{Position, Snake};
    use crate::timer::ManualTimer;

    use super::{DeathReason, GameEngine, GameStatus, StepOutcome};

    fn engine(width: u16, height: u16, seed: u64) -> GameEngine<ManualTimer> {
        GameEngine::with_seed(GridSize { width, height }, ManualTimer::new(), seed)
    }

    #[test]
    fn new_engine_is_idle_and_ignores_steps() {
        let mut engine = engine(10, 10, 1);

        assert_eq!(engine.status(), GameStatus::Idle);
        assert_eq!(engine.step(), StepOutcome::Skipped);
        assert!(!engine.handle_direction_input(Direction::Up));
        assert!(!engine.timer().is_active());
    }

    #[test]
    fn start_resets_state_and_schedules_timer() {
        let mut engine = engine(30, 30, 2);
        engine.start();

        assert_eq!(engine.status(), GameStatus::Running);
        assert_eq!(engine.snake().len(), 1);
        assert_eq!(engine.snake().head(), Position::new(15, 15));
        assert_eq!(engine.direction(), Some(Direction::Right));
        assert_eq!(engine.next_direction(), None);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.interval_ms(), 150);
        assert_eq!(engine.timer().interval(), Some(Duration::from_millis(150)));

        let food = engine.food().expect("food placed on start");
        assert!(!engine.snake().occupies(food));
    }

    #[test]
    fn snake_grows_after_eating_food() {
        let mut engine = engine(10, 10, 1);
        engine.start();
        engine.place_snake(Snake::new(Position::new(1, 1)));
        engine.place_food(Position::new(2, 1));

        let outcome = engine.step();

        assert_eq!(
            outcome,
            StepOutcome::Ate {
                score: 10,
                new_interval_ms: None,
            }
        );
        assert_eq!(engine.snake().len(), 2);
        assert_eq!(engine.snake().head(), Position::new(2, 1));
        assert_eq!(engine.snake().tail(), Position::new(1, 1));
    }

    #[test]
    fn snake_collision_with_wall_sets_game_over() {
        let mut engine = engine(4, 4, 2);
        engine.start();
        engine.place_snake(Snake::new(Position::new(3, 1)));
        engine.place_food(Position::new(0, 0));

        let outcome = engine.step();

        assert_eq!(
            outcome,
            StepOutcome::GameOver {
                reason: DeathReason::WallCollision,
                score: 0,
            }
        );
        assert_eq!(engine.status(), GameStatus::GameOver);
        assert!(!engine.is_running());
        assert!(!engine.timer().is_active());
        assert_eq!(engine.snake().head(), Position::new(3, 1));
    }

    #[test]
    fn snake_collision_with_self_sets_game_over() {
        let mut engine = engine(6, 6, 3);
        engine.start();
        engine.place_snake(Snake::from_segments(vec![
            Position::new(2, 2),
            Position::new(1, 2),
            Position::new(1, 3),
            Position::new(2, 3),
            Position::new(3, 3),
            Position::new(3, 2),
        ]));
        engine.place_food(Position::new(5, 5));
        engine.set_direction(Direction::Down);

        engine.step();

        assert_eq!(engine.status(), GameStatus::GameOver);
        assert_eq!(engine.death_reason(), Some(DeathReason::SelfCollision));
    }

    #[test]
    fn moving_into_current_tail_is_a_collision() {
        let mut engine = engine(6, 6, 4);
        engine.start();
        engine.place_snake(Snake::from_segments(vec![
            Position::new(2, 2),
            Position::new(2, 3),
            Position::new(3, 3),
            Position::new(3, 2),
        ]));
        engine.place_food(Position::new(0, 0));
        engine.set_direction(Direction::Right);

        engine.step();

        assert_eq!(engine.death_reason(), Some(DeathReason::SelfCollision));
    }

    #[test]
    fn reverse_input_is_rejected() {
        let mut engine = engine(10, 10, 5);
        engine.start();

        assert!(!engine.handle_direction_input(Direction::Left));
        assert_eq!(engine.next_direction(), None);

        assert!(engine.handle_direction_input(Direction::Up));
        assert!(!engine.handle_direction_input(Direction::Left));
        assert_eq!(engine.next_direction(), Some(Direction::Up));
    }

    #[test]
    fn last_valid_input_before_a_tick_wins() {
        let mut engine = engine(10, 10, 6);
        engine.start();
        engine.place_food(Position::new(0, 0));

        engine.handle_direction_input(Direction::Up);
        engine.handle_direction_input(Direction::Down);
        engine.step();

        assert_eq!(engine.direction(), Some(Direction::Down));
        assert_eq!(engine.snake().head(), Position::new(5, 6));
    }

    #[test]
    fn speed_increases_every_hundred_points() {
        let mut engine = engine(30, 30, 7);
        engine.start();
        engine.place_snake(Snake::new(Position::new(0, 0)));

        for x in 1..=10 {
            engine.place_food(Position::new(x, 0));
            engine.step();
        }

        assert_eq!(engine.score(), 100);
        assert_eq!(engine.interval_ms(), 140);
        assert_eq!(engine.timer().interval(), Some(Duration::from_millis(140)));
        assert_eq!(engine.timer().overlap_count(), 0);
    }

    #[test]
    fn full_board_ends_the_game() {
        let mut engine = engine(2, 1, 8);
        engine.start();
        engine.place_snake(Snake::new(Position::new(0, 0)));
        engine.place_food(Position::new(1, 0));

        let outcome = engine.step();

        assert_eq!(
            outcome,
            StepOutcome::GameOver {
                reason: DeathReason::BoardFilled,
                score: 10,
            }
        );
        assert_eq!(engine.snake().len(), 2);
        assert_eq!(engine.food(), None);
        assert!(!engine.timer().is_active());
    }

    #[test]
    fn restart_after_game_over_resets_everything() {
        let mut engine = engine(4, 4, 9);
        engine.start();
        engine.place_snake(Snake::new(Position::new(3, 3)));
        engine.step();
        assert_eq!(engine.status(), GameStatus::GameOver);

        engine.start();

        assert_eq!(engine.status(), GameStatus::Running);
        assert_eq!(engine.death_reason(), None);
        assert_eq!(engine.tick_count(), 0);
        assert_eq!(engine.snake().head(), Position::new(2, 2));
        assert!(engine.timer().is_active());
        assert_eq!(engine.timer().overlap_count(), 0);
    }

    #[test]
    fn restart_while_running_replaces_timer() {
        let mut engine = engine(10, 10, 10);
        engine.start();
        engine.start();

        assert_eq!(engine.timer().schedule_count(), 2);
        assert_eq!(engine.timer().cancel_count(), 1);
        assert_eq!(engine.timer().overlap_count(), 0);
    }
}
