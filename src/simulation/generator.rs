//! Random gap courses for batch simulation
//!
//! Every course is a runway along +X, a gap, and a landing platform that may
//! sit higher, lower or shifted sideways.

use bevy::math::{DVec3, IVec3};
use rand::prelude::*;

use crate::constants::{COURSE_MAX_Y, COURSE_MIN_Y};
use crate::terrain::{Voxel, VoxelGrid};

use super::courses::CourseData;

/// Shape of one generated course
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapLayout {
    pub runway: i32,
    pub width: i32,
    pub gap: i32,
    pub height_delta: i32,
    pub shift: i32,
}

impl GapLayout {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            runway: rng.gen_range(3..=9),
            width: rng.gen_range(1..=3),
            gap: rng.gen_range(1..=4),
            height_delta: *[-2, -1, 0, 0, 1].choose(rng).unwrap_or(&0),
            shift: rng.gen_range(0..=1),
        }
    }

    pub fn build(&self, name: String) -> CourseData {
        let mut grid = VoxelGrid::new(COURSE_MIN_Y, COURSE_MAX_Y);
        grid.fill(
            IVec3::new(1 - self.runway, 0, 0),
            IVec3::new(0, 0, self.width - 1),
            Some(Voxel::Solid),
        );
        let landing_x = self.gap + 1;
        grid.fill(
            IVec3::new(landing_x, self.height_delta, self.shift),
            IVec3::new(landing_x + 2, self.height_delta, self.shift + self.width - 1),
            Some(Voxel::Solid),
        );

        let spawn_x = (1 - self.runway) as f64 / 2.0 + 0.5;
        CourseData {
            name,
            spawn: DVec3::new(spawn_x.min(0.5), 1.0, 0.5),
            yaw: -90.0,
            target: IVec3::new(landing_x, self.height_delta, self.shift),
            expected: None,
            grid,
        }
    }
}

/// `count` courses from one seed; the same seed always yields the same set
pub fn generate_courses(seed: u64, count: u32) -> Vec<CourseData> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| GapLayout::random(&mut rng).build(format!("random-{}-{}", seed, i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::is_standable;

    #[test]
    fn test_same_seed_same_courses() {
        let a = generate_courses(42, 8);
        let b = generate_courses(42, 8);
        assert_eq!(a.len(), 8);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.name, y.name);
            assert_eq!(x.target, y.target);
            assert_eq!(x.grid.len(), y.grid.len());
        }
    }

    #[test]
    fn test_layout_geometry() {
        let layout = GapLayout {
            runway: 5,
            width: 2,
            gap: 3,
            height_delta: -1,
            shift: 1,
        };
        let course = layout.build("t".to_string());
        assert_eq!(course.grid.len(), 5 * 2 + 3 * 2);
        assert_eq!(course.target, IVec3::new(4, -1, 1));
        assert!(is_standable(&course.grid, IVec3::new(0, 1, 0)));
        assert!(is_standable(&course.grid, IVec3::new(-4, 1, 1)));
        assert!(is_standable(&course.grid, IVec3::new(6, 0, 2)));
        assert!(!is_standable(&course.grid, IVec3::new(1, 1, 0)));
        assert_eq!(course.spawn, DVec3::new(-1.5, 1.0, 0.5));
    }

    #[test]
    fn test_random_layouts_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let layout = GapLayout::random(&mut rng);
            assert!((1..=4).contains(&layout.gap));
            assert!((-2..=1).contains(&layout.height_delta));
            let course = layout.build(String::new());
            assert!(is_standable(&course.grid, IVec3::new(0, 1, 0)));
        }
    }
}
