#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use parallelism_ir::Module;
use parallelism_sched::{BlockSchedule, FunctionReport, ScheduleEntry};

/// Discover all .pir files in the samples/ directory, sorted by name
pub fn discover_samples() -> Vec<PathBuf> {
    let samples_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("samples");

    let mut samples: Vec<PathBuf> = fs::read_dir(&samples_dir)
        .expect("Failed to read samples directory")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("pir"))
        .collect();
    samples.sort();
    samples
}

/// Load and parse a sample by file stem
pub fn load_sample(name: &str) -> Module {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("samples")
        .join(format!("{}.pir", name));
    parse_file(&path)
}

/// Load and parse a test fixture from tests/fixtures/
pub fn load_fixture(name: &str) -> Module {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    parse_file(&path)
}

pub fn parse_file(path: &Path) -> Module {
    let source = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    parallelism_parser::parse(&source)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e))
}

/// Schedule of a block that is expected to have been analyzed successfully
pub fn scheduled<'a>(function: &'a FunctionReport, label: &str) -> &'a BlockSchedule {
    function
        .block(label)
        .and_then(|b| b.schedule())
        .unwrap_or_else(|| panic!("Expected block {} of {} to be scheduled", label, function.name))
}

/// Entry whose instruction text starts with `%name =`
pub fn entry_for<'a>(schedule: &'a BlockSchedule, name: &str) -> &'a ScheduleEntry {
    let prefix = format!("%{} =", name);
    schedule
        .entries
        .iter()
        .find(|e| e.text.starts_with(&prefix))
        .unwrap_or_else(|| panic!("Expected entry for %{}", name))
}

/// Assert the (asap, alap, mobility) triple of `%name`
pub fn assert_cycles(schedule: &BlockSchedule, name: &str, asap: i64, alap: i64) {
    let entry = entry_for(schedule, name);
    assert_eq!(
        (entry.asap, entry.alap, entry.mobility),
        (asap, alap, alap - asap),
        "cycles of %{}",
        name
    );
}
