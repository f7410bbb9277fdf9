//! Mobility: ALAP minus ASAP

use parallelism_ir::InstId;
use thiserror::Error;

use crate::context::{Cycle, CycleMap};

/// Why the two cycle maps could not be combined
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MobilityError {
    #[error("no ASAP cycle recorded")]
    MissingAsap(InstId),
    #[error("no ALAP cycle recorded")]
    MissingAlap(InstId),
    #[error("ALAP cycle {alap} precedes ASAP cycle {asap}")]
    Negative { inst: InstId, asap: Cycle, alap: Cycle },
}

impl MobilityError {
    pub fn inst(&self) -> InstId {
        match self {
            MobilityError::MissingAsap(inst) => *inst,
            MobilityError::MissingAlap(inst) => *inst,
            MobilityError::Negative { inst, .. } => *inst,
        }
    }
}

/// Mobility of each instruction in `order`
pub fn mobility(
    asap: &CycleMap,
    alap: &CycleMap,
    order: &[InstId],
) -> Result<Vec<(InstId, Cycle)>, MobilityError> {
    order
        .iter()
        .map(|&inst| {
            let early = *asap.get(&inst).ok_or(MobilityError::MissingAsap(inst))?;
            let late = *alap.get(&inst).ok_or(MobilityError::MissingAlap(inst))?;
            if late < early {
                return Err(MobilityError::Negative {
                    inst,
                    asap: early,
                    alap: late,
                });
            }
            Ok((inst, late - early))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(u32, Cycle)]) -> CycleMap {
        entries.iter().map(|&(i, c)| (InstId(i), c)).collect()
    }

    #[test]
    fn test_difference_in_order() {
        let asap = map(&[(0, 0), (1, 0), (2, 1)]);
        let alap = map(&[(0, 0), (1, 3), (2, 1)]);
        let order = [InstId(2), InstId(1), InstId(0)];
        let result = mobility(&asap, &alap, &order).unwrap();
        assert_eq!(result, vec![(InstId(2), 0), (InstId(1), 3), (InstId(0), 0)]);
    }

    #[test]
    fn test_missing_alap_entry() {
        let asap = map(&[(0, 0), (1, 1)]);
        let alap = map(&[(0, 0)]);
        let err = mobility(&asap, &alap, &[InstId(0), InstId(1)]).unwrap_err();
        assert_eq!(err, MobilityError::MissingAlap(InstId(1)));
        assert_eq!(err.inst(), InstId(1));
    }

    #[test]
    fn test_negative_is_rejected() {
        let asap = map(&[(0, 2)]);
        let alap = map(&[(0, 1)]);
        let err = mobility(&asap, &alap, &[InstId(0)]).unwrap_err();
        assert!(matches!(err, MobilityError::Negative { asap: 2, alap: 1, .. }));
    }

    #[test]
    fn test_empty_block() {
        let empty = CycleMap::new();
        assert!(mobility(&empty, &empty, &[]).unwrap().is_empty());
    }
}
