use rand::Rng;

use crate::config::{FOOD_SAMPLE_ATTEMPTS, GridSize};
use crate::snake::{Position, Snake};

/// Picks a uniformly random cell that the snake does not occupy.
///
/// Samples random cells first. On a crowded board where sampling keeps
/// hitting the snake, falls back to choosing among the enumerated free cells,
/// which keeps the distribution uniform. Returns `None` only when the snake
/// covers every cell.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
) -> Option<Position> {
    if bounds.width == 0 || bounds.height == 0 || snake.len() >= bounds.total_cells() {
        return None;
    }

    for _ in 0..FOOD_SAMPLE_ATTEMPTS {
        let candidate = Position {
            x: rng.gen_range(0..i32::from(bounds.width)),
            y: rng.gen_range(0..i32::from(bounds.height)),
        };
        if !snake.occupies(candidate) {
            return Some(candidate);
        }
    }

    let candidates = free_cells(bounds, snake);
    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}

fn free_cells(bounds: GridSize, snake: &Snake) -> Vec<Position> {
    let mut candidates = Vec::new();

    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let position = Position { x, y };
            if !snake.occupies(position) {
                candidates.push(position);
            }
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::config::GridSize;

    use super::spawn_position;
    use crate::snake::{Position, Snake};

    #[test]
    fn food_spawn_never_overlaps_snake() {
        let mut rng = StdRng::seed_from_u64(7);
        let bounds = GridSize {
            width: 8,
            height: 6,
        };
        let snake = Snake::from_segments(vec![
            Position { x: 0, y: 0 },
            Position { x: 1, y: 0 },
            Position { x: 2, y: 0 },
        ]);

        for _ in 0..100 {
            let food = spawn_position(&mut rng, bounds, &snake).expect("board has free cells");
            assert!(!snake.occupies(food));
            assert!(food.is_within_bounds(bounds));
        }
    }

    #[test]
    fn single_free_cell_is_always_found() {
        let mut rng = StdRng::seed_from_u64(11);
        let bounds = GridSize {
            width: 2,
            height: 2,
        };
        let snake = Snake::from_segments(vec![
            Position { x: 0, y: 0 },
            Position { x: 1, y: 0 },
            Position { x: 1, y: 1 },
        ]);

        for _ in 0..20 {
            assert_eq!(
                spawn_position(&mut rng, bounds, &snake),
                Some(Position { x: 0, y: 1 })
            );
        }
    }

    #[test]
    fn full_board_has_no_food_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let bounds = GridSize {
            width: 2,
            height: 1,
        };
        let snake = Snake::from_segments(vec![Position { x: 0, y: 0 }, Position { x: 1, y: 0 }]);

        assert_eq!(spawn_position(&mut rng, bounds, &snake), None);
    }

    #[test]
    fn same_seed_places_food_identically() {
        let bounds = GridSize {
            width: 30,
            height: 30,
        };
        let snake = Snake::new(Position { x: 15, y: 15 });

        let first = spawn_position(&mut StdRng::seed_from_u64(99), bounds, &snake);
        let second = spawn_position(&mut StdRng::seed_from_u64(99), bounds, &snake);

        assert_eq!(first, second);
    }
}
