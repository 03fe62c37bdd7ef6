use serde::{Deserialize, Serialize};

/// Pending-picking counters shown on the control dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardCounters {
    /// Every picking still in draft, confirmed or assigned.
    pub pending_total: usize,
    /// Moves leaving the main warehouse (`PR`) into a stock location.
    pub main_internal: usize,
    /// Moves arriving at branch B1.
    pub branch_inbound: usize,
}
