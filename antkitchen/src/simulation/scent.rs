use macroquad::math::{IVec3, Vec3};
use macroquad::rand;

use super::{LURE_AMOUNT, LURE_RADIUS, MAX_SCENT};

/// Cubic grid of scent intensities shared by every ant.
///
/// The field is a blackboard: ants read and write it one after another inside
/// a tick, so an ant sees the deposits of every ant updated before it in the
/// same tick. Coordinates outside `[0, size)` on any axis read as zero and
/// swallow writes.
#[derive(Clone)]
pub struct ScentField {
    size: usize,
    data: Vec<f32>,
}

impl ScentField {
    /// Creates a field with every cell at zero.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            data: vec![0.0; size * size * size],
        }
    }

    /// Creates a field seeded with random noise in `[0, noise)`, quantized to
    /// hundredths of `noise`.
    pub fn seeded(size: usize, noise: f32) -> Self {
        let mut field = Self::new(size);
        if noise > 0.0 {
            for cell in &mut field.data {
                *cell = rand::gen_range(0u32, 100) as f32 / 100.0 * noise;
            }
        }
        field
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    fn index(&self, cell: IVec3) -> Option<usize> {
        let size = self.size as i32;
        if cell.x < 0 || cell.y < 0 || cell.z < 0 {
            return None;
        }
        if cell.x >= size || cell.y >= size || cell.z >= size {
            return None;
        }
        let (x, y, z) = (cell.x as usize, cell.y as usize, cell.z as usize);
        Some((z * self.size + y) * self.size + x)
    }

    pub fn scent_at(&self, cell: IVec3) -> f32 {
        self.index(cell).map_or(0.0, |i| self.data[i])
    }

    /// Stores `value` at `cell`. Out-of-range writes are dropped.
    pub fn set_scent(&mut self, cell: IVec3, value: f32) {
        if let Some(i) = self.index(cell) {
            self.data[i] = value;
        }
    }

    /// Adds `amount` to `cell`, saturating at [`MAX_SCENT`]. Returns the new
    /// intensity (zero for out-of-range cells).
    pub fn deposit(&mut self, cell: IVec3, amount: f32) -> f32 {
        let scent = (self.scent_at(cell) + amount).min(MAX_SCENT);
        self.set_scent(cell, scent);
        self.scent_at(cell)
    }

    /// Grid cell containing a world position: `round(coord + size / 2)` per
    /// axis, ties rounding away from zero.
    pub fn grid_position(&self, pos: Vec3) -> IVec3 {
        (pos + Vec3::splat(self.half() as f32)).round().as_ivec3()
    }

    /// World position of a grid cell's center: `cell - size / 2` per axis.
    pub fn real_position(&self, cell: IVec3) -> Vec3 {
        (cell - IVec3::splat(self.half())).as_vec3()
    }

    fn half(&self) -> i32 {
        (self.size / 2) as i32
    }

    /// Adds [`LURE_AMOUNT`] to every cell of the cube around `pos`.
    pub fn lure(&mut self, pos: Vec3) {
        self.add_around(pos, LURE_AMOUNT);
    }

    /// Subtracts [`LURE_AMOUNT`] from every cell of the cube around `pos`.
    pub fn repel(&mut self, pos: Vec3) {
        self.add_around(pos, -LURE_AMOUNT);
    }

    // Unclamped: a lure can exceed MAX_SCENT and a repel can go negative.
    fn add_around(&mut self, pos: Vec3, amount: f32) {
        let center = self.grid_position(pos);
        for z in center.z - LURE_RADIUS..=center.z + LURE_RADIUS {
            for y in center.y - LURE_RADIUS..=center.y + LURE_RADIUS {
                for x in center.x - LURE_RADIUS..=center.x + LURE_RADIUS {
                    let cell = IVec3::new(x, y, z);
                    self.set_scent(cell, self.scent_at(cell) + amount);
                }
            }
        }
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Sum of all intensities.
    pub fn total(&self) -> f64 {
        self.data.iter().map(|&s| s as f64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_read() {
        let mut field = ScentField::new(100);
        let cell = IVec3::new(3, 97, 42);
        field.set_scent(cell, 0.75);
        assert_eq!(field.scent_at(cell), 0.75);
        assert_eq!(field.scent_at(IVec3::new(3, 97, 43)), 0.0);
    }

    #[test]
    fn test_out_of_range_reads_zero_and_ignores_writes() {
        let mut field = ScentField::new(100);
        field.fill(0.3);
        for cell in [
            IVec3::new(100, 0, 0),
            IVec3::new(0, 100, 0),
            IVec3::new(0, 0, 100),
            IVec3::new(-1, 5, 5),
            IVec3::new(5, -1, 5),
            IVec3::new(5, 5, -1),
        ] {
            field.set_scent(cell, 9.0);
            assert_eq!(field.scent_at(cell), 0.0, "cell {cell} must read as zero");
        }
        assert!(
            (field.total() - 0.3 * 1_000_000.0).abs() < 1.0,
            "out-of-range writes must not land in other cells"
        );
    }

    #[test]
    fn test_grid_round_trip() {
        let field = ScentField::new(100);
        for cell in [IVec3::ZERO, IVec3::new(50, 50, 50), IVec3::new(99, 0, 17)] {
            assert_eq!(field.grid_position(field.real_position(cell)), cell);
        }
        assert_eq!(field.real_position(IVec3::new(50, 51, 49)), Vec3::new(0.0, 1.0, -1.0));
    }

    #[test]
    fn test_grid_position_ties_round_away_from_zero() {
        let field = ScentField::new(100);
        assert_eq!(field.grid_position(Vec3::new(0.5, 1.5, -0.4)), IVec3::new(51, 52, 50));
        assert_eq!(field.grid_position(Vec3::new(0.49, -0.5, 0.0)), IVec3::new(50, 50, 50));
    }

    #[test]
    fn test_deposit_saturates() {
        let mut field = ScentField::new(10);
        let cell = IVec3::new(1, 2, 3);
        field.set_scent(cell, 0.9);
        assert_eq!(field.deposit(cell, 0.2), MAX_SCENT);
        assert_eq!(field.deposit(IVec3::new(-3, 0, 0), 0.2), 0.0);
    }

    #[test]
    fn test_seeded_noise_range() {
        let field = ScentField::seeded(20, 0.5);
        assert!(field.data.iter().all(|&s| (0.0..0.5).contains(&s)));
    }

    #[test]
    fn test_lure_and_repel_cube() {
        let mut field = ScentField::new(100);
        field.lure(Vec3::ZERO);
        assert_eq!(field.scent_at(IVec3::new(50, 50, 50)), LURE_AMOUNT);
        assert_eq!(field.scent_at(IVec3::new(55, 45, 55)), LURE_AMOUNT);
        assert_eq!(field.scent_at(IVec3::new(56, 50, 50)), 0.0);
        assert!((field.total() - 11.0_f64.powi(3) * LURE_AMOUNT as f64).abs() < 1e-2);

        field.repel(Vec3::ZERO);
        field.repel(Vec3::ZERO);
        assert_eq!(field.scent_at(IVec3::new(50, 50, 50)), -LURE_AMOUNT);
    }

    #[test]
    fn test_lure_at_edge_is_clipped() {
        let mut field = ScentField::new(100);
        field.lure(Vec3::new(-50.0, -50.0, -50.0));
        assert_eq!(field.scent_at(IVec3::ZERO), LURE_AMOUNT);
        assert!((field.total() - 6.0_f64.powi(3) * LURE_AMOUNT as f64).abs() < 1e-2);
    }
}
