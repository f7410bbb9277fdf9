//! Block-level parallelism figures derived from a finished schedule

use serde::Serialize;

use crate::context::Cycle;
use crate::ScheduleEntry;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockMetrics {
    /// Schedulable instructions
    pub instructions: usize,
    /// Cycles needed with unlimited issue width
    pub critical_path: usize,
    /// Average instructions per cycle along the critical path
    pub ilp: f64,
    /// Instructions issued in each ASAP cycle
    pub width_per_cycle: Vec<usize>,
    pub max_width: usize,
    /// Instructions with zero mobility
    pub critical_instructions: usize,
}

impl BlockMetrics {
    pub fn compute(entries: &[ScheduleEntry], greatest_cycle: Cycle) -> Self {
        if entries.is_empty() {
            return Self {
                instructions: 0,
                critical_path: 0,
                ilp: 0.0,
                width_per_cycle: Vec::new(),
                max_width: 0,
                critical_instructions: 0,
            };
        }

        let critical_path = (greatest_cycle + 1) as usize;
        let mut width_per_cycle = vec![0; critical_path];
        for entry in entries {
            width_per_cycle[entry.asap as usize] += 1;
        }

        Self {
            instructions: entries.len(),
            critical_path,
            ilp: entries.len() as f64 / critical_path as f64,
            max_width: width_per_cycle.iter().copied().max().unwrap_or(0),
            width_per_cycle,
            critical_instructions: entries.iter().filter(|e| e.mobility == 0).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parallelism_ir::InstId;

    fn entry(id: u32, asap: Cycle, alap: Cycle) -> ScheduleEntry {
        ScheduleEntry {
            inst: InstId(id),
            label: format!("add{}", id + 1),
            text: String::new(),
            asap,
            alap,
            mobility: alap - asap,
        }
    }

    #[test]
    fn test_diamond() {
        // a, b at 0 feeding c at 1
        let entries = vec![entry(0, 0, 0), entry(1, 0, 0), entry(2, 1, 1)];
        let metrics = BlockMetrics::compute(&entries, 1);
        assert_eq!(metrics.instructions, 3);
        assert_eq!(metrics.critical_path, 2);
        assert_eq!(metrics.width_per_cycle, vec![2, 1]);
        assert_eq!(metrics.max_width, 2);
        assert!((metrics.ilp - 1.5).abs() < f64::EPSILON);
        assert_eq!(metrics.critical_instructions, 3);
    }

    #[test]
    fn test_slack_is_not_critical() {
        let entries = vec![entry(0, 0, 0), entry(1, 1, 1), entry(2, 0, 1)];
        let metrics = BlockMetrics::compute(&entries, 1);
        assert_eq!(metrics.critical_instructions, 2);
    }

    #[test]
    fn test_empty() {
        let metrics = BlockMetrics::compute(&[], 0);
        assert_eq!(metrics.critical_path, 0);
        assert_eq!(metrics.ilp, 0.0);
        assert!(metrics.width_per_cycle.is_empty());
    }
}
