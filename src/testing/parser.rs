//! TOML scenario file parsing

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::planning::Step;
use crate::terrain::Voxel;

/// Complete scenario definition from a TOML file
#[derive(Debug, Deserialize)]
pub struct TestDefinition {
    pub name: String,
    pub description: Option<String>,
    pub setup: TestSetup,
    #[serde(default)]
    pub expect: TestExpectations,
}

/// Where the avatar starts and what it is asked to jump to.
/// Terrain comes from a named course, inline blocks, or both (blocks are
/// applied on top of the course).
#[derive(Debug, Default, Deserialize)]
pub struct TestSetup {
    pub course: Option<String>,
    pub courses_file: Option<String>,
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
    pub spawn: Option<[f64; 3]>,
    pub yaw: Option<f32>,
    pub target: Option<[i32; 3]>,
    pub max_ticks: Option<u32>,
    /// Partial `JumpTuning` overrides
    pub tuning: Option<toml::Table>,
}

/// A filled box of voxels; `kind` omitted clears the box
#[derive(Debug, Clone, Deserialize)]
pub struct BlockDef {
    pub from: [i32; 3],
    pub to: Option<[i32; 3]>,
    pub kind: Option<Voxel>,
}

/// Expected scenario outcomes
#[derive(Debug, Default, Deserialize)]
pub struct TestExpectations {
    /// Run outcome label (`landed`, `missed`, `analysis_failed`, ...)
    pub outcome: Option<String>,
    /// Substring of the analysis or planning error message
    pub error: Option<String>,
    pub sequence: Option<Vec<Step>>,
    /// Landing cell chosen by the analysis
    pub landing: Option<[i32; 3]>,
    pub launch: Option<[i32; 3]>,
    /// Upper bound on ticks until the sequence ends
    pub max_ticks: Option<u32>,
    /// Ordered subsequence of logged events
    #[serde(default)]
    pub events: Vec<ExpectedEvent>,
}

/// Expected event in sequence
#[derive(Debug, Deserialize)]
pub struct ExpectedEvent {
    pub event: String,
    pub tick_min: Option<u64>,
    pub tick_max: Option<u64>,
}

/// Parse a scenario file from path
pub fn parse_test_file(path: &Path) -> Result<TestDefinition, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}
