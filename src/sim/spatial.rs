//! Uniform-grid broad phase for circle collisions.
//!
//! The grid is cleared and refilled every frame. Each shape goes into every
//! cell its bounding box touches, so two overlapping circles always share at
//! least one cell and a per-cell pairwise test finds every contact.

use std::collections::HashSet;

use glam::Vec2;

use super::actor::ActorId;
use super::kinematics::Field;
use crate::consts::GRID_CELL_FACTOR;

/// Per-frame collision circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleShape {
    pub center: Vec2,
    pub radius: f32,
}

impl CircleShape {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Strict overlap: tangent circles do not collide
    #[inline]
    pub fn overlaps(&self, other: &CircleShape) -> bool {
        self.center.distance(other.center) < self.radius + other.radius
    }

    fn min(&self) -> Vec2 {
        self.center - Vec2::splat(self.radius)
    }

    fn max(&self) -> Vec2 {
        self.center + Vec2::splat(self.radius)
    }
}

#[derive(Debug, Clone, Copy)]
struct GridEntry {
    id: ActorId,
    shape: CircleShape,
}

/// Uniform grid over a rectangular region.
///
/// Shapes outside the region are clamped into the border cells, which keeps
/// actors in the wrap margin collidable.
#[derive(Debug)]
pub struct CollisionGrid {
    origin: Vec2,
    cell_size: Vec2,
    cols: usize,
    rows: usize,
    /// Row-major cells holding indices into `entries`
    cells: Vec<Vec<usize>>,
    entries: Vec<GridEntry>,
}

impl CollisionGrid {
    pub fn new(xmin: f32, xmax: f32, ymin: f32, ymax: f32, cell_width: f32, cell_height: f32) -> Self {
        let cols = ((xmax - xmin) / cell_width).ceil().max(1.0) as usize;
        let rows = ((ymax - ymin) / cell_height).ceil().max(1.0) as usize;
        Self {
            origin: Vec2::new(xmin, ymin),
            cell_size: Vec2::new(cell_width, cell_height),
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
            entries: Vec::new(),
        }
    }

    /// Grid covering the whole field, sized for the largest collision radius
    pub fn for_field(field: &Field, max_radius: f32) -> Self {
        let cell = max_radius * GRID_CELL_FACTOR;
        Self::new(0.0, field.width, 0.0, field.height, cell, cell)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of shapes inserted since the last clear
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every shape (call at the start of each frame)
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.entries.clear();
    }

    /// Cell column/row containing a point, clamped to the grid
    #[inline]
    pub fn cell_of(&self, point: Vec2) -> (usize, usize) {
        let local = (point - self.origin) / self.cell_size;
        let col = (local.x.floor().max(0.0) as usize).min(self.cols - 1);
        let row = (local.y.floor().max(0.0) as usize).min(self.rows - 1);
        (col, row)
    }

    /// Insert a shape into every cell its bounding box overlaps
    pub fn insert(&mut self, id: ActorId, shape: CircleShape) {
        let index = self.entries.len();
        self.entries.push(GridEntry { id, shape });

        let (c0, r0) = self.cell_of(shape.min());
        let (c1, r1) = self.cell_of(shape.max());
        for row in r0..=r1 {
            for col in c0..=c1 {
                self.cells[row * self.cols + col].push(index);
            }
        }
    }

    /// Number of shapes touching a cell
    pub fn cell_count(&self, col: usize, row: usize) -> usize {
        self.cells.get(row * self.cols + col).map(Vec::len).unwrap_or(0)
    }

    /// All overlapping pairs, each unordered pair reported once.
    ///
    /// Pairs come out in cell order, lower id first.
    pub fn iter_all_collisions(&self) -> Vec<(ActorId, ActorId)> {
        let mut tested: HashSet<(ActorId, ActorId)> = HashSet::new();
        let mut pairs = Vec::new();

        for cell in self.cells.iter().filter(|c| c.len() > 1) {
            for (i, &a) in cell.iter().enumerate() {
                for &b in &cell[i + 1..] {
                    let (ea, eb) = (&self.entries[a], &self.entries[b]);
                    if ea.id == eb.id {
                        continue;
                    }
                    let key = if ea.id < eb.id {
                        (ea.id, eb.id)
                    } else {
                        (eb.id, ea.id)
                    };
                    if !tested.insert(key) {
                        continue;
                    }
                    if ea.shape.overlaps(&eb.shape) {
                        pairs.push(key);
                    }
                }
            }
        }

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid() -> CollisionGrid {
        CollisionGrid::for_field(&Field::new(1200.0, 700.0), 40.0)
    }

    #[test]
    fn test_grid_dimensions() {
        let g = grid();
        // 50 unit cells
        assert_eq!(g.cols(), 24);
        assert_eq!(g.rows(), 14);
        assert_eq!(g.cell_of(Vec2::new(0.0, 0.0)), (0, 0));
        assert_eq!(g.cell_of(Vec2::new(75.0, 120.0)), (1, 2));
        // Outside points clamp to the border
        assert_eq!(g.cell_of(Vec2::new(-60.0, 900.0)), (0, 13));
        assert_eq!(g.cell_of(Vec2::new(5000.0, -1.0)), (23, 0));
    }

    #[test]
    fn test_insert_spans_cells() {
        let mut g = grid();
        // Radius 40 around (100, 100) covers x 60..140, y 60..140 -> cells 1..=2
        g.insert(ActorId(1), CircleShape::new(Vec2::new(100.0, 100.0), 40.0));
        assert_eq!(g.len(), 1);
        assert_eq!(g.cell_count(1, 1), 1);
        assert_eq!(g.cell_count(2, 2), 1);
        assert_eq!(g.cell_count(0, 0), 0);
        assert_eq!(g.cell_count(3, 3), 0);
    }

    #[test]
    fn test_overlapping_pair_reported_once() {
        let mut g = grid();
        // Both circles span several shared cells
        g.insert(ActorId(1), CircleShape::new(Vec2::new(100.0, 100.0), 40.0));
        g.insert(ActorId(2), CircleShape::new(Vec2::new(150.0, 110.0), 40.0));

        let pairs = g.iter_all_collisions();
        assert_eq!(pairs, vec![(ActorId(1), ActorId(2))]);
    }

    #[test]
    fn test_pair_across_cell_boundary() {
        let mut g = grid();
        // Centers 75 apart, in non-adjacent center cells (0 and 2 would be
        // missed by a center-only grid)
        g.insert(ActorId(7), CircleShape::new(Vec2::new(40.0, 300.0), 40.0));
        g.insert(ActorId(3), CircleShape::new(Vec2::new(115.0, 300.0), 40.0));

        let pairs = g.iter_all_collisions();
        assert_eq!(pairs, vec![(ActorId(3), ActorId(7))]);
    }

    #[test]
    fn test_tangent_circles_do_not_collide() {
        let a = CircleShape::new(Vec2::new(100.0, 100.0), 10.0);
        let b = CircleShape::new(Vec2::new(130.0, 100.0), 20.0);
        assert!(!a.overlaps(&b));

        let mut g = grid();
        g.insert(ActorId(1), a);
        g.insert(ActorId(2), b);
        assert!(g.iter_all_collisions().is_empty());

        // Nudge closer: now they overlap
        let c = CircleShape::new(Vec2::new(129.99, 100.0), 20.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_no_self_pairs() {
        let mut g = grid();
        g.insert(ActorId(1), CircleShape::new(Vec2::new(300.0, 300.0), 40.0));
        assert!(g.iter_all_collisions().is_empty());
    }

    #[test]
    fn test_cluster_reports_every_pair() {
        let mut g = grid();
        g.insert(ActorId(1), CircleShape::new(Vec2::new(300.0, 300.0), 40.0));
        g.insert(ActorId(2), CircleShape::new(Vec2::new(310.0, 300.0), 10.0));
        g.insert(ActorId(3), CircleShape::new(Vec2::new(300.0, 310.0), 10.0));

        let mut pairs = g.iter_all_collisions();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                (ActorId(1), ActorId(2)),
                (ActorId(1), ActorId(3)),
                (ActorId(2), ActorId(3)),
            ]
        );
    }

    #[test]
    fn test_clear_empties_grid() {
        let mut g = grid();
        g.insert(ActorId(1), CircleShape::new(Vec2::new(300.0, 300.0), 40.0));
        g.insert(ActorId(2), CircleShape::new(Vec2::new(310.0, 300.0), 40.0));
        g.clear();
        assert!(g.is_empty());
        assert!(g.iter_all_collisions().is_empty());
        assert_eq!(g.cell_count(6, 6), 0);
    }

    #[test]
    fn test_shapes_in_wrap_margin_still_collide() {
        let mut g = grid();
        g.insert(ActorId(1), CircleShape::new(Vec2::new(-30.0, 400.0), 40.0));
        g.insert(ActorId(2), CircleShape::new(Vec2::new(-10.0, 410.0), 10.0));
        assert_eq!(g.iter_all_collisions(), vec![(ActorId(1), ActorId(2))]);
    }

    fn circle() -> impl Strategy<Value = (f32, f32, f32)> {
        (0.0f32..1200.0, 0.0f32..700.0, prop_oneof![Just(10.0f32), Just(20.0f32), Just(40.0f32)])
    }

    proptest! {
        #[test]
        fn prop_grid_matches_brute_force(circles in prop::collection::vec(circle(), 0..40)) {
            let mut g = grid();
            let shapes: Vec<CircleShape> = circles
                .iter()
                .map(|&(x, y, r)| CircleShape::new(Vec2::new(x, y), r))
                .collect();
            for (i, shape) in shapes.iter().enumerate() {
                g.insert(ActorId(i as u32), *shape);
            }

            let mut expected = Vec::new();
            for i in 0..shapes.len() {
                for j in i + 1..shapes.len() {
                    if shapes[i].overlaps(&shapes[j]) {
                        expected.push((ActorId(i as u32), ActorId(j as u32)));
                    }
                }
            }

            let mut pairs = g.iter_all_collisions();
            let reported = pairs.len();
            pairs.sort();
            pairs.dedup();
            prop_assert_eq!(reported, pairs.len());
            prop_assert_eq!(pairs, expected);
        }
    }
}
