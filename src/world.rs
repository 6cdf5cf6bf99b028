use crate::config::{ConfigError, DiamondNeighbors, Scale, TerrainSettings};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Square grid of elevations, side `2^iterations + 1`, indexed `[x][y]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightfield {
    heightmap: Vec<Vec<f32>>,
}

impl Heightfield {
    /// Builds the terrain described by `settings`, seeding a ChaCha stream from
    /// `settings.seed` or from OS entropy.
    pub fn generate(settings: &TerrainSettings) -> Result<Self, ConfigError> {
        let mut rng = match settings.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let heightfield = Self::generate_with(settings, &mut rng)?;

        let (min, max) = heightfield.range();
        log::info!(
            "Generated {size}x{size} heightfield (seed {:?}), elevations {min:.3}..{max:.3}",
            settings.seed,
            size = heightfield.size(),
        );
        Ok(heightfield)
    }

    pub fn generate_with<R: Rng>(settings: &TerrainSettings, rng: &mut R) -> Result<Self, ConfigError> {
        settings.validate()?;
        let size = (1usize << settings.iterations) + 1;
        let mut heightmap = vec![vec![0.0; size]; size];
        let last = size - 1;
        for (x, y) in [(0, 0), (last, 0), (last, last), (0, last)] {
            heightmap[x][y] = settings.corner_height;
        }

        let mut generator = DiamondSquare {
            heightmap,
            rng,
            smoothing: settings.smoothing_factor,
            neighbors: settings.diamond_neighbors,
        };
        let half = size / 2;
        generator.square(half, half, half, settings.initial_factor * settings.smoothing_factor);

        Ok(Self { heightmap: generator.heightmap })
    }

    pub fn size(&self) -> usize {
        self.heightmap.len()
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.heightmap[x][y]
    }

    pub fn range(&self) -> (f32, f32) {
        self.heightmap
            .iter()
            .flatten()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| (lo.min(h), hi.max(h)))
    }

    /// Terrain elevation (unscaled) under the world-space point `(x, y)`.
    ///
    /// Takes the lower of two edge interpolations from the cell's base corner,
    /// one toward the x neighbour and one toward the y neighbour. Returns `None`
    /// ("no floor") outside `[0, (N-1)*scale.x) x [0, (N-1)*scale.y)`.
    pub fn height_at(&self, x: f32, y: f32, scale: Scale) -> Option<f32> {
        let x_coord = x / scale.x;
        let y_coord = y / scale.y;
        let limit = (self.size() - 1) as f32;

        if !(x_coord >= 0.0 && x_coord < limit && y_coord >= 0.0 && y_coord < limit) {
            return None;
        }

        let x_low = x_coord as usize;
        let y_low = y_coord as usize;
        let base = self.heightmap[x_low][y_low];
        let x_height = self.heightmap[x_low + 1][y_low];
        let y_height = self.heightmap[x_low][y_low + 1];

        let tx = x_coord - x_low as f32;
        let ty = y_coord - y_low as f32;
        Some((tx * x_height + (1.0 - tx) * base).min(ty * y_height + (1.0 - ty) * base))
    }
}

/// Uniform draw in `[min, max)`; yields `min` when the range is empty.
pub fn uniform<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    rng.r#gen::<f32>() * (max - min) + min
}

struct DiamondSquare<'a, R> {
    heightmap: Vec<Vec<f32>>,
    rng: &'a mut R,
    smoothing: f32,
    neighbors: DiamondNeighbors,
}

impl<R: Rng> DiamondSquare<'_, R> {
    fn square(&mut self, x: usize, y: usize, size: usize, factor: f32) {
        if size < 1 {
            return;
        }

        let top_left = self.heightmap[x - size][y - size];
        let top_right = self.heightmap[x + size][y - size];
        let bottom_right = self.heightmap[x + size][y + size];
        let bottom_left = self.heightmap[x - size][y + size];
        self.heightmap[x][y] = (top_left + top_right + bottom_right + bottom_left) / 4.0
            + uniform(&mut *self.rng, -factor, factor);

        self.diamond(x - size, y, size, factor);
        self.diamond(x, y - size, size, factor);
        self.diamond(x + size, y, size, factor);
        self.diamond(x, y + size, size, factor);

        let half = size / 2;
        let child = factor * self.smoothing;
        self.square(x - half, y - half, half, child);
        self.square(x + half, y - half, half, child);
        self.square(x - half, y + half, half, child);
        self.square(x + half, y + half, half, child);
    }

    fn diamond(&mut self, x: usize, y: usize, size: usize, factor: f32) {
        let span = self.heightmap.len() - 1;
        let wrap = |coord: isize| -> usize {
            if coord < 0 {
                (coord + span as isize) as usize
            } else if coord > span as isize {
                (coord - span as isize) as usize
            } else {
                coord as usize
            }
        };

        let (xi, yi, si) = (x as isize, y as isize, size as isize);
        let left = wrap(xi - si);
        let top = wrap(yi - si);
        let right = wrap(xi + si);
        let bottom = wrap(yi + si);

        let top_value = self.heightmap[x][top];
        let bottom_value = self.heightmap[x][bottom];
        let left_value = self.heightmap[left][y];
        let right_value = match self.neighbors {
            DiamondNeighbors::Legacy => left_value,
            DiamondNeighbors::FourNeighbor => self.heightmap[right][y],
        };

        self.heightmap[x][y] = (top_value + right_value + bottom_value + left_value) / 4.0
            + uniform(&mut *self.rng, -factor, factor);
    }
}

#[cfg(test)]
impl Heightfield {
    pub fn flat(size: usize, height: f32) -> Self {
        Self { heightmap: vec![vec![height; size]; size] }
    }

    pub fn set(&mut self, x: usize, y: usize, height: f32) {
        self.heightmap[x][y] = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    // Every cell holds `x * 10 + y` so each read is identifiable.
    fn labelled_grid(size: usize) -> Vec<Vec<f32>> {
        (0..size)
            .map(|x| (0..size).map(|y| (x * 10 + y) as f32).collect())
            .collect()
    }

    fn diamond_at(neighbors: DiamondNeighbors, x: usize, y: usize, size: usize) -> f32 {
        let mut rng = StepRng::new(1 << 31, 0);
        let mut generator = DiamondSquare {
            heightmap: labelled_grid(9),
            rng: &mut rng,
            smoothing: 0.5,
            neighbors,
        };
        generator.diamond(x, y, size, 0.0);
        generator.heightmap[x][y]
    }

    fn seeded(iterations: u32, seed: u64) -> TerrainSettings {
        TerrainSettings { iterations, seed: Some(seed), ..Default::default() }
    }

    #[test]
    fn side_is_power_of_two_plus_one() {
        for iterations in 1..=6 {
            let heightfield = Heightfield::generate(&seeded(iterations, 7)).unwrap();
            assert_eq!(heightfield.size(), (1 << iterations) + 1);
        }
    }

    #[test]
    fn corners_keep_configured_height() {
        let settings = TerrainSettings { corner_height: 0.75, ..seeded(5, 99) };
        let heightfield = Heightfield::generate(&settings).unwrap();
        let last = heightfield.size() - 1;
        for (x, y) in [(0, 0), (last, 0), (last, last), (0, last)] {
            assert_eq!(heightfield.get(x, y), 0.75);
        }
    }

    #[test]
    fn same_seed_same_terrain() {
        let a = Heightfield::generate(&seeded(4, 1234)).unwrap();
        let b = Heightfield::generate(&seeded(4, 1234)).unwrap();
        assert_eq!(a, b);

        let c = Heightfield::generate(&seeded(4, 4321)).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn four_neighbor_mode_changes_terrain() {
        let legacy = Heightfield::generate(&seeded(4, 55)).unwrap();
        let settings = TerrainSettings {
            diamond_neighbors: DiamondNeighbors::FourNeighbor,
            ..seeded(4, 55)
        };
        let corrected = Heightfield::generate(&settings).unwrap();
        assert_ne!(legacy, corrected);
    }

    #[test]
    fn legacy_diamond_counts_wrapped_left_twice() {
        // (0, 4) size 2: top (0,2)=2, bottom (0,6)=6, left wraps to (6,4)=64.
        assert_eq!(diamond_at(DiamondNeighbors::Legacy, 0, 4, 2), (2.0 + 6.0 + 2.0 * 64.0) / 4.0);
        // (4, 0) size 2: top wraps to (4,6)=46, bottom (4,2)=42, left (2,0)=20.
        assert_eq!(diamond_at(DiamondNeighbors::Legacy, 4, 0, 2), (46.0 + 42.0 + 2.0 * 20.0) / 4.0);
    }

    #[test]
    fn four_neighbor_diamond_reads_every_side() {
        // Right of (0, 4) is (2,4)=24.
        assert_eq!(
            diamond_at(DiamondNeighbors::FourNeighbor, 0, 4, 2),
            (2.0 + 24.0 + 6.0 + 64.0) / 4.0
        );
        // Right of (4, 0) is (6,0)=60; the top still wraps.
        assert_eq!(
            diamond_at(DiamondNeighbors::FourNeighbor, 4, 0, 2),
            (46.0 + 60.0 + 42.0 + 20.0) / 4.0
        );
        // Right of the far edge (8, 4) wraps to (2,4)=24.
        assert_eq!(
            diamond_at(DiamondNeighbors::FourNeighbor, 8, 4, 2),
            (82.0 + 24.0 + 86.0 + 64.0) / 4.0
        );
    }

    #[test]
    fn zero_iterations_is_a_config_error() {
        let settings = TerrainSettings { iterations: 0, ..Default::default() };
        assert_eq!(Heightfield::generate(&settings), Err(ConfigError::TooFewIterations(0)));
    }

    #[test]
    fn single_iteration_fills_every_cell() {
        let settings = TerrainSettings { initial_factor: 0.0, corner_height: 1.0, ..seeded(1, 0) };
        let heightfield = Heightfield::generate(&settings).unwrap();
        assert_eq!(heightfield.size(), 3);
        for x in 0..3 {
            for y in 0..3 {
                assert_eq!(heightfield.get(x, y), 1.0);
            }
        }
    }

    #[test]
    fn uniform_stays_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..1000 {
            let v = uniform(&mut rng, -0.5, 0.5);
            assert!((-0.5..0.5).contains(&v));
        }
        assert_eq!(uniform(&mut rng, 2.0, 2.0), 2.0);
    }

    #[test]
    fn height_at_takes_lower_edge() {
        let mut heightfield = Heightfield::flat(3, 0.0);
        heightfield.set(1, 0, 1.0);
        heightfield.set(0, 1, -1.0);
        let scale = Scale { x: 1.0, y: 1.0, z: 1.0 };

        // x edge: 0.5 * 1.0 = 0.5, y edge: 0.5 * -1.0 = -0.5
        assert_eq!(heightfield.height_at(0.5, 0.5, scale), Some(-0.5));
        assert_eq!(heightfield.height_at(0.0, 0.0, scale), Some(0.0));
    }

    #[test]
    fn height_at_uses_scaled_coordinates() {
        let mut heightfield = Heightfield::flat(3, 0.0);
        heightfield.set(1, 1, 2.0);
        heightfield.set(2, 1, 2.0);
        heightfield.set(1, 2, 2.0);
        let scale = Scale { x: 4.0, y: 4.0, z: 20.0 };
        assert_eq!(heightfield.height_at(4.0, 4.0, scale), Some(2.0));
    }

    #[test]
    fn height_outside_footprint_is_none() {
        let heightfield = Heightfield::flat(17, 0.0);
        let scale = Scale::default();
        let edge = 16.0 * scale.x;
        assert_eq!(heightfield.height_at(-0.01, 1.0, scale), None);
        assert_eq!(heightfield.height_at(1.0, -0.01, scale), None);
        assert_eq!(heightfield.height_at(edge, 1.0, scale), None);
        assert_eq!(heightfield.height_at(1.0, edge, scale), None);
        assert!(heightfield.height_at(edge - 0.01, edge - 0.01, scale).is_some());
    }
}
