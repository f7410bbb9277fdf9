//! End-to-end tests: parse samples, schedule every block, export graphs.

mod common;

use std::fs;

use parallelism_sched::{analyze_module, render_dot, render_text, AnalysisSettings, EXTERNAL_CYCLE};
use tempfile::tempdir;

use common::{assert_cycles, entry_for, load_fixture, load_sample, scheduled};

#[test]
fn e2e_all_samples_schedule() {
    for sample_path in common::discover_samples() {
        let module = common::parse_file(&sample_path);
        let report = analyze_module(&module, &AnalysisSettings::default());
        assert!(
            !report.has_failures(),
            "{} had blocks that failed to schedule:\n{}",
            sample_path.display(),
            render_text(&report)
        );

        for function in &report.functions {
            for block in &function.blocks {
                let schedule = block.schedule().unwrap();
                for entry in &schedule.entries {
                    assert!(entry.asap >= 0, "{}: {}", sample_path.display(), entry.text);
                    assert!(entry.alap >= entry.asap, "{}: {}", sample_path.display(), entry.text);
                    assert!(entry.alap <= schedule.greatest_cycle);
                }
                assert_eq!(schedule.graph.nodes.len(), schedule.entries.len());
            }
        }
    }
}

#[test]
fn e2e_chain() {
    let module = load_sample("chain");
    let report = analyze_module(&module, &AnalysisSettings::default());
    let entry = scheduled(report.function("chain").unwrap(), "entry");

    assert_cycles(entry, "a", 0, 0);
    assert_cycles(entry, "b", 1, 1);
    assert_eq!(entry.greatest_cycle, 1);
}

#[test]
fn e2e_diamond() {
    let module = load_sample("diamond");
    let report = analyze_module(&module, &AnalysisSettings::default());
    let entry = scheduled(report.function("diamond").unwrap(), "entry");

    assert_cycles(entry, "a", 0, 0);
    assert_cycles(entry, "b", 0, 0);
    assert_cycles(entry, "c", 1, 1);
    assert_eq!(
        render_dot(&entry.graph_name(), &entry.graph),
        "digraph \"diamond.entry\" {\n    \"add1\";\n    \"sub2\";\n    \"add3\";\n    \"add1\" -> \"add3\";\n    \"sub2\" -> \"add3\";\n}\n"
    );
}

#[test]
fn e2e_dot_product_width() {
    let module = load_sample("dot_product");
    let report = analyze_module(&module, &AnalysisSettings::default());
    let entry = scheduled(report.function("dot4").unwrap(), "entry");

    // Markers are not scheduled
    assert_eq!(entry.metrics.instructions, 15);
    assert_eq!(entry.metrics.critical_path, 4);
    assert_eq!(entry.metrics.width_per_cycle, vec![8, 4, 2, 1]);
    assert_eq!(entry.metrics.max_width, 8);
    assert!((entry.metrics.ilp - 3.75).abs() < 1e-9);
    assert_eq!(entry.metrics.critical_instructions, 15);
    assert_cycles(entry, "sum", 3, 3);
}

#[test]
fn e2e_cross_block_values() {
    let module = load_sample("branches");
    let report = analyze_module(&module, &AnalysisSettings::default());
    let clamp = report.function("clamp").unwrap();

    let entry = scheduled(clamp, "entry");
    assert_cycles(entry, "below", 0, 1);
    assert_cycles(entry, "scaled", 0, 0);
    assert_cycles(entry, "offset", 1, 1);

    // %offset comes from the entry block: available before `check` starts
    let check = scheduled(clamp, "check");
    assert_cycles(check, "above", 0, 0);
    assert_cycles(check, "mid", 0, 0);
    assert!(check.graph.edges.is_empty());
    assert_eq!(check.entries[0].label, "icmp.gt1");

    let done = scheduled(clamp, "done");
    assert_cycles(done, "out", 0, 0);
    assert_ne!(entry_for(done, "out").asap, EXTERNAL_CYCLE);

    let empty = scheduled(report.function("empty").unwrap(), "entry");
    assert!(empty.entries.is_empty());
    assert_eq!(empty.metrics.critical_path, 0);
}

#[test]
fn e2e_cycle_is_isolated_to_its_block() {
    let module = load_fixture("counting_loop.pir");
    let report = analyze_module(&module, &AnalysisSettings::default());
    let count = report.function("count").unwrap();

    let failed: Vec<_> = count.failed_blocks().map(|b| b.label.as_str()).collect();
    assert_eq!(failed, vec!["body"]);

    let exit = scheduled(count, "exit");
    assert_eq!(exit.entries.len(), 1);
    assert_eq!(exit.entries[0].label, "mul1");
    assert_cycles(exit, "r", 0, 0);

    let text = render_text(&report);
    assert!(text.contains("failed [E-SCHED-001]"), "{}", text);
    assert!(text.contains("%i -> %next -> %i"), "{}", text);
}

#[test]
fn e2e_repeated_runs_are_identical() {
    let module = load_sample("branches");
    let settings = AnalysisSettings::default();
    let first = serde_json::to_string(&analyze_module(&module, &settings)).unwrap();
    let second = serde_json::to_string(&analyze_module(&module, &settings)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn e2e_export_layout_and_idempotence() {
    let dir = tempdir().unwrap();
    let module = load_sample("branches");
    let settings = AnalysisSettings {
        graph_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    };

    let report = analyze_module(&module, &settings);
    assert_eq!(report.export_failures(), 0);

    let clamp_dir = dir.path().join("clamp");
    let mut files: Vec<_> = fs::read_dir(&clamp_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    files.sort();
    assert_eq!(files, vec!["bb0.dot", "bb1.dot", "bb2.dot", "bb3.dot", "bb4.dot"]);
    assert!(dir.path().join("empty").join("bb0.dot").exists());

    let before = fs::read(clamp_dir.join("bb0.dot")).unwrap();
    analyze_module(&module, &settings);
    let after = fs::read(clamp_dir.join("bb0.dot")).unwrap();
    assert_eq!(before, after);

    let text = String::from_utf8(before).unwrap();
    assert!(text.contains("    \"mul2\" -> \"add3\";\n"), "{}", text);
}

#[test]
fn e2e_json_report_shape() {
    let module = load_sample("chain");
    let report = analyze_module(&module, &AnalysisSettings::default());
    let value = serde_json::to_value(&report).unwrap();

    let block = &value["functions"][0]["blocks"][0];
    assert_eq!(block["label"], "entry");
    assert_eq!(block["outcome"]["status"], "scheduled");
    let entries = block["outcome"]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1]["label"], "mul2");
    assert_eq!(entries[1]["asap"], 1);
    assert_eq!(entries[1]["mobility"], 0);
}
