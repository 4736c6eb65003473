use std::collections::HashMap;

use crate::features::reports::models::ViolationType;

/// Fine, in rupees, charged for each violation type
#[derive(Debug, Clone)]
pub struct FineSchedule {
    fines: HashMap<ViolationType, i64>,
}

impl FineSchedule {
    pub fn new(fines: HashMap<ViolationType, i64>) -> Self {
        let mut schedule = Self::default();
        for (violation, fine) in fines {
            schedule = schedule.with_fine(violation, fine);
        }
        schedule
    }

    /// Override the fine for one violation type. Negative fines clamp to 0.
    pub fn with_fine(mut self, violation: ViolationType, fine: i64) -> Self {
        self.fines.insert(violation, fine.max(0));
        self
    }

    pub fn fine_for(&self, violation: ViolationType) -> i64 {
        self.fines
            .get(&violation)
            .copied()
            .unwrap_or_else(|| default_fine(violation))
    }

    /// Every violation type with its fine, in catalogue order
    pub fn entries(&self) -> Vec<(ViolationType, i64)> {
        ViolationType::ALL
            .iter()
            .map(|v| (*v, self.fine_for(*v)))
            .collect()
    }
}

impl Default for FineSchedule {
    fn default() -> Self {
        Self {
            fines: ViolationType::ALL
                .iter()
                .map(|v| (*v, default_fine(*v)))
                .collect(),
        }
    }
}

fn default_fine(violation: ViolationType) -> i64 {
    match violation {
        ViolationType::NoHelmet => 500,
        ViolationType::SignalJump => 1_000,
        ViolationType::WrongSide => 1_500,
        ViolationType::Overspeeding => 2_000,
        ViolationType::DrunkDriving => 10_000,
        ViolationType::Other => 500,
    }
}
