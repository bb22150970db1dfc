//! Grid queries consumed by the interface and the AI driver.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use crate::state::{Direction, MapDimensions, Position};

/// Black-box path query.
///
/// Returns the tile sequence from `start` to `end`, both endpoints included,
/// never entering a tile in `avoid`. An empty vector means unreachable.
/// `start == end` yields `[start]`.
pub trait Pathfinder: fmt::Debug {
    fn path(
        &self,
        map: MapDimensions,
        start: Position,
        end: Position,
        avoid: &[Position],
    ) -> Vec<Position>;
}

impl<P: Pathfinder + ?Sized> Pathfinder for Box<P> {
    fn path(
        &self,
        map: MapDimensions,
        start: Position,
        end: Position,
        avoid: &[Position],
    ) -> Vec<Position> {
        (**self).path(map, start, end, avoid)
    }
}

/// Obstacle-free map: breadth-first search bounded only by the map edges and
/// the avoided tiles.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenField;

impl Pathfinder for OpenField {
    fn path(
        &self,
        map: MapDimensions,
        start: Position,
        end: Position,
        avoid: &[Position],
    ) -> Vec<Position> {
        if !map.contains(start) || !map.contains(end) {
            return Vec::new();
        }
        if start == end {
            return vec![start];
        }
        let blocked: HashSet<Position> = avoid.iter().copied().collect();
        if blocked.contains(&end) {
            return Vec::new();
        }

        let mut came_from: HashMap<Position, Position> = HashMap::new();
        let mut frontier = VecDeque::from([start]);
        came_from.insert(start, start);

        while let Some(current) = frontier.pop_front() {
            if current == end {
                break;
            }
            for direction in Direction::ALL {
                let next = current.step(direction);
                if !map.contains(next) || blocked.contains(&next) || came_from.contains_key(&next) {
                    continue;
                }
                came_from.insert(next, current);
                frontier.push_back(next);
            }
        }

        if !came_from.contains_key(&end) {
            return Vec::new();
        }
        let mut path = vec![end];
        let mut current = end;
        while current != start {
            let Some(&previous) = came_from.get(&current) else {
                return Vec::new();
            };
            path.push(previous);
            current = previous;
        }
        path.reverse();
        path
    }
}

/// Number of steps a path walks (tiles minus the starting one).
pub fn path_cost(path: &[Position]) -> usize {
    path.len().saturating_sub(1)
}
