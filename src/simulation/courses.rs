//! Course database - text format for voxel test courses
//!
//! ```text
//! course: Two gap
//! spawn: -2.5 1 0.5
//! yaw: -90
//! target: 3 0 0
//! expect: MomentumRun, Leap
//! origin: -8 -1
//! layer: 0
//! | #########..####
//! | #########..####
//! ```
//!
//! `origin` is the X/Z of the first glyph of the first row; each row after it
//! is one step in +Z. Glyphs: `#` solid, `H` climbable, `.` or space empty.
//! Lines starting with `#` are comments; glyph rows start with `|`.

use std::fs;

use bevy::log::{info, warn};
use bevy::math::{DVec3, IVec3};

use crate::constants::{COURSE_MAX_Y, COURSE_MIN_Y};
use crate::planning::Step;
use crate::terrain::{Cell, Point, Voxel, VoxelGrid};

/// Path to the bundled course file
pub const COURSES_FILE: &str = "config/courses.txt";

#[derive(Debug, Clone)]
pub struct CourseData {
    pub name: String,
    pub spawn: Point,
    pub yaw: f32,
    /// Block the user points at
    pub target: Cell,
    /// Sequence the planner should produce, when known
    pub expected: Option<Vec<Step>>,
    pub grid: VoxelGrid,
}

#[derive(Debug, Default)]
pub struct CourseDatabase {
    pub courses: Vec<CourseData>,
}

/// Course under construction while parsing
struct Draft {
    name: String,
    spawn: Option<Point>,
    yaw: f32,
    target: Option<Cell>,
    expected: Option<Vec<Step>>,
    grid: VoxelGrid,
    origin: (i32, i32),
    layer: i32,
    row: i32,
}

impl Draft {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            spawn: None,
            yaw: 0.0,
            target: None,
            expected: None,
            grid: VoxelGrid::new(COURSE_MIN_Y, COURSE_MAX_Y),
            origin: (0, 0),
            layer: 0,
            row: 0,
        }
    }

    fn finish(self) -> Result<CourseData, String> {
        let spawn = self
            .spawn
            .ok_or_else(|| format!("Course '{}' has no spawn", self.name))?;
        let target = self
            .target
            .ok_or_else(|| format!("Course '{}' has no target", self.name))?;
        Ok(CourseData {
            name: self.name,
            spawn,
            yaw: self.yaw,
            target,
            expected: self.expected,
            grid: self.grid,
        })
    }
}

fn parse_numbers<T: std::str::FromStr>(text: &str, count: usize) -> Option<Vec<T>> {
    let values: Vec<T> = text
        .split_whitespace()
        .map(|v| v.parse().ok())
        .collect::<Option<Vec<T>>>()?;
    (values.len() == count).then_some(values)
}

impl CourseDatabase {
    /// Load courses from file, falling back to the built-in set on error
    pub fn load_from_file(path: &str) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to load courses from {}: {}, using defaults", path, e);
                return Self::default_courses();
            }
        };
        match Self::parse(&content) {
            Ok(db) if !db.is_empty() => {
                info!("Loaded {} courses from {}", db.len(), path);
                db
            }
            Ok(_) => {
                warn!("No courses in {}, using defaults", path);
                Self::default_courses()
            }
            Err(e) => {
                warn!("{} ({}), using defaults", e, path);
                Self::default_courses()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        let mut courses = Vec::new();
        let mut current: Option<Draft> = None;

        for (index, raw) in content.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = raw.trim();

            if let Some(glyphs) = trimmed.strip_prefix('|') {
                let draft = current
                    .as_mut()
                    .ok_or_else(|| format!("Line {}: glyph row outside a course", line_no))?;
                let glyphs = glyphs.strip_prefix(' ').unwrap_or(glyphs);
                for (column, glyph) in glyphs.chars().enumerate() {
                    let voxel = Voxel::from_glyph(glyph)
                        .ok_or_else(|| format!("Line {}: unknown glyph '{}'", line_no, glyph))?;
                    if voxel.is_some() {
                        let cell = IVec3::new(
                            draft.origin.0 + column as i32,
                            draft.layer,
                            draft.origin.1 + draft.row,
                        );
                        draft.grid.set(cell, voxel);
                    }
                }
                draft.row += 1;
                continue;
            }

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some(name) = trimmed.strip_prefix("course:") {
                if let Some(draft) = current.take() {
                    courses.push(draft.finish()?);
                }
                current = Some(Draft::new(name.trim()));
                continue;
            }

            let draft = current
                .as_mut()
                .ok_or_else(|| format!("Line {}: '{}' outside a course", line_no, trimmed))?;
            let bad = || format!("Line {}: malformed '{}'", line_no, trimmed);

            if let Some(v) = trimmed.strip_prefix("spawn:") {
                let p = parse_numbers::<f64>(v, 3).ok_or_else(bad)?;
                draft.spawn = Some(DVec3::new(p[0], p[1], p[2]));
            } else if let Some(v) = trimmed.strip_prefix("yaw:") {
                draft.yaw = v.trim().parse().map_err(|_| bad())?;
            } else if let Some(v) = trimmed.strip_prefix("target:") {
                let c = parse_numbers::<i32>(v, 3).ok_or_else(bad)?;
                draft.target = Some(IVec3::new(c[0], c[1], c[2]));
            } else if let Some(v) = trimmed.strip_prefix("expect:") {
                let steps = v
                    .split(',')
                    .map(|s| s.parse::<Step>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| format!("Line {}: {}", line_no, e))?;
                draft.expected = Some(steps);
            } else if let Some(v) = trimmed.strip_prefix("origin:") {
                let o = parse_numbers::<i32>(v, 2).ok_or_else(bad)?;
                draft.origin = (o[0], o[1]);
                draft.row = 0;
            } else if let Some(v) = trimmed.strip_prefix("layer:") {
                draft.layer = v.trim().parse().map_err(|_| bad())?;
                draft.row = 0;
            } else {
                return Err(format!("Line {}: unknown key '{}'", line_no, trimmed));
            }
        }

        if let Some(draft) = current.take() {
            courses.push(draft.finish()?);
        }
        Ok(Self { courses })
    }

    /// A single two-wide gap, used when no course file is available
    pub fn default_courses() -> Self {
        let mut grid = VoxelGrid::new(COURSE_MIN_Y, COURSE_MAX_Y);
        grid.fill(IVec3::new(-8, 0, -1), IVec3::new(0, 0, 1), Some(Voxel::Solid));
        grid.fill(IVec3::new(3, 0, -1), IVec3::new(6, 0, 1), Some(Voxel::Solid));
        Self {
            courses: vec![CourseData {
                name: "Two gap".to_string(),
                spawn: DVec3::new(-2.5, 1.0, 0.5),
                yaw: -90.0,
                target: IVec3::new(3, 0, 0),
                expected: Some(vec![Step::MomentumRun, Step::Leap]),
                grid,
            }],
        }
    }

    pub fn get(&self, index: usize) -> Option<&CourseData> {
        self.courses.get(index)
    }

    /// Case-insensitive lookup by name
    pub fn find(&self, name: &str) -> Option<&CourseData> {
        self.courses
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
