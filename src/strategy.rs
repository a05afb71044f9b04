use std::fmt;
use std::sync::Arc;

use clap::ValueEnum;
use serde::Serialize;

use crate::{BasicLock, DualFlagLock, GatedLock, PriorityLock, SingleFlagLock};

/// Selects one of the [`PriorityLock`] implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ValueEnum)]
pub enum Strategy {
    Basic,
    GatedTwoLock,
    SingleFlagPreemptive,
    DualFlagPreemptive,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Basic,
        Strategy::GatedTwoLock,
        Strategy::SingleFlagPreemptive,
        Strategy::DualFlagPreemptive,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Basic => "Basic",
            Strategy::GatedTwoLock => "GatedTwoLock",
            Strategy::SingleFlagPreemptive => "SingleFlagPreemptive",
            Strategy::DualFlagPreemptive => "DualFlagPreemptive",
        }
    }

    /// Builds a fresh, unlocked instance.
    pub fn build(self) -> Arc<dyn PriorityLock> {
        match self {
            Strategy::Basic => Arc::new(BasicLock::new()),
            Strategy::GatedTwoLock => Arc::new(GatedLock::new()),
            Strategy::SingleFlagPreemptive => Arc::new(SingleFlagLock::new()),
            Strategy::DualFlagPreemptive => Arc::new(DualFlagLock::new()),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_locks_are_usable() {
        for strategy in Strategy::ALL {
            let lock = strategy.build();
            lock.lock_low();
            lock.unlock_low();
            lock.lock_high();
            lock.unlock_high();
        }
    }

    #[test]
    fn parses_cli_names() {
        assert_eq!(
            Strategy::from_str("single-flag-preemptive", false),
            Ok(Strategy::SingleFlagPreemptive)
        );
        assert_eq!(
            Strategy::from_str("gated-two-lock", false),
            Ok(Strategy::GatedTwoLock)
        );
    }
}
