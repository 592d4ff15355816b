use super::ReclaimStep;

/// Fallback for platforms without a reclamation technique
pub struct NoopStep;

impl ReclaimStep for NoopStep {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn supported(&self) -> bool {
        false
    }

    fn reclaim_step(&mut self) -> bool {
        false
    }
}
