//! Voxel traversal along a segment (Amanatides–Woo DDA).
//!
//! Enumerates every cell of a uniform grid that the segment `v0 → v1`
//! passes through, in order, starting with the cell containing `v0` and
//! ending with the cell containing `v1`. Used by grid broad phases to
//! visit only the cells a ray or moving point can touch.

use glam::{IVec3, Vec3};

/// Upper bound on the cells a single traversal yields.
pub const MAX_CELLS: u32 = 1 << 20;

/// Iterator over grid cells crossed by a segment.
#[derive(Debug, Clone)]
pub struct VoxelTraverser {
    cell: IVec3,
    end: IVec3,
    step: IVec3,
    t_max: Vec3,
    t_delta: Vec3,
    /// Cells still allowed to be yielded; bounds the walk even when
    /// rounding keeps the end cell from being hit exactly. Never above
    /// [`MAX_CELLS`].
    remaining: u32,
}

impl VoxelTraverser {
    /// Creates a traverser for segment `v0 → v1` on a grid of `grid_size`.
    pub fn new(v0: Vec3, v1: Vec3, grid_size: f32) -> Self {
        let grid_size = grid_size.max(1e-6);
        let inv = 1.0 / grid_size;
        let v = v1 - v0;

        let cell = (v0 * inv).floor().as_ivec3();
        let end = (v1 * inv).floor().as_ivec3();
        let step = IVec3::new(sign(v.x), sign(v.y), sign(v.z));

        let mut t_max = Vec3::new(
            initial_t_max(v.x, v0.x, step.x, grid_size, inv),
            initial_t_max(v.y, v0.y, step.y, grid_size, inv),
            initial_t_max(v.z, v0.z, step.z, grid_size, inv),
        );
        let mut t_delta = Vec3::new(
            (grid_size / v.x).abs(),
            (grid_size / v.y).abs(),
            (grid_size / v.z).abs(),
        );

        // Axes that start and end in the same slab never advance.
        for axis in 0..3 {
            if cell[axis] == end[axis] {
                t_delta[axis] = 0.0;
                t_max[axis] = f32::MAX;
            }
        }

        // Cells come from saturating float casts, so the span is taken in
        // i64 to stay clear of i32 overflow.
        let span: i64 = (0..3)
            .map(|axis| (i64::from(end[axis]) - i64::from(cell[axis])).abs())
            .sum();
        let remaining = span.saturating_add(1).min(i64::from(MAX_CELLS)) as u32;

        Self {
            cell,
            end,
            step,
            t_max,
            t_delta,
            remaining,
        }
    }

    fn reached(&self) -> bool {
        (0..3).all(|axis| self.end[axis] * self.step[axis] <= self.cell[axis] * self.step[axis])
    }

    fn advance(&mut self, axis: usize) {
        self.cell[axis] = self.cell[axis].saturating_add(self.step[axis]);
        self.t_max[axis] += self.t_delta[axis];
    }
}

impl Iterator for VoxelTraverser {
    type Item = IVec3;

    fn next(&mut self) -> Option<IVec3> {
        if self.remaining == 0 {
            return None;
        }

        let current = self.cell;
        if self.reached() {
            self.remaining = 0;
            return Some(current);
        }
        self.remaining -= 1;

        let t = self.t_max;
        if t.x < t.y {
            if t.x < t.z {
                self.advance(0);
            } else {
                self.advance(2);
            }
        } else if t.y < t.z {
            self.advance(1);
        } else {
            self.advance(2);
        }

        Some(current)
    }
}

fn sign(x: f32) -> i32 {
    if x < 0.0 {
        -1
    } else if x > 0.0 {
        1
    } else {
        0
    }
}

/// Parametric distance from `v0` to the first cell boundary on one axis.
fn initial_t_max(v: f32, v0: f32, step: i32, grid_size: f32, inv: f32) -> f32 {
    if v == 0.0 {
        return f32::MAX;
    }
    let bound = if step < 0 {
        (v0 * inv).floor() * grid_size
    } else {
        ((v0 * inv).floor() + 1.0) * grid_size
    };
    ((bound - v0) / v).abs()
}
