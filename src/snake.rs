use std::collections::VecDeque;

use crate::config::GridSize;
use crate::input::Direction;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns the neighbouring cell one step towards `direction`.
    ///
    /// The result may lie outside the grid; callers check bounds.
    #[must_use]
    pub fn stepped(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Ordered snake body, head first.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    /// Creates a one-cell snake at `start`.
    #[must_use]
    pub fn new(start: Position) -> Self {
        let mut body = VecDeque::new();
        body.push_front(start);

        Self { body }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");

        Self {
            body: VecDeque::from(segments),
        }
    }

    /// Places a new head in front of the current one.
    pub fn push_head(&mut self, head: Position) {
        self.body.push_front(head);
    }

    /// Drops the tail segment, never shrinking below one cell.
    pub fn pop_tail(&mut self) -> Option<Position> {
        if self.body.len() <= 1 {
            return None;
        }
        self.body.pop_back()
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns the current tail position.
    #[must_use]
    pub fn tail(&self) -> Position {
        *self
            .body
            .back()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GridSize;
    use crate::input::Direction;

    use super::{Position, Snake};

    #[test]
    fn bounds_check_covers_all_edges() {
        let bounds = GridSize {
            width: 10,
            height: 8,
        };

        assert!(Position::new(0, 0).is_within_bounds(bounds));
        assert!(Position::new(9, 7).is_within_bounds(bounds));
        assert!(!Position::new(-1, 3).is_within_bounds(bounds));
        assert!(!Position::new(10, 3).is_within_bounds(bounds));
        assert!(!Position::new(4, -1).is_within_bounds(bounds));
        assert!(!Position::new(4, 8).is_within_bounds(bounds));
    }

    #[test]
    fn stepping_moves_one_cell() {
        let origin = Position::new(5, 5);

        assert_eq!(origin.stepped(Direction::Up), Position::new(5, 4));
        assert_eq!(origin.stepped(Direction::Down), Position::new(5, 6));
        assert_eq!(origin.stepped(Direction::Left), Position::new(4, 5));
        assert_eq!(origin.stepped(Direction::Right), Position::new(6, 5));
    }

    #[test]
    fn push_then_pop_keeps_length() {
        let mut snake = Snake::from_segments(vec![Position::new(2, 2), Position::new(1, 2)]);

        snake.push_head(Position::new(3, 2));
        let dropped = snake.pop_tail();

        assert_eq!(dropped, Some(Position::new(1, 2)));
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.head(), Position::new(3, 2));
        assert_eq!(snake.tail(), Position::new(2, 2));
    }

    #[test]
    fn pop_tail_never_empties_the_body() {
        let mut snake = Snake::new(Position::new(1, 1));

        assert_eq!(snake.pop_tail(), None);
        assert_eq!(snake.len(), 1);
        assert!(!snake.is_empty());
    }

    #[test]
    fn segments_iterate_head_first() {
        let snake = Snake::from_segments(vec![
            Position::new(3, 1),
            Position::new(2, 1),
            Position::new(1, 1),
        ]);

        let xs: Vec<i32> = snake.segments().map(|segment| segment.x).collect();
        assert_eq!(xs, vec![3, 2, 1]);
        assert!(snake.occupies(Position::new(2, 1)));
        assert!(!snake.occupies(Position::new(4, 1)));
    }
}
