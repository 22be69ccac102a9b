// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Recovery Gate
// ─────────────────────────────────────────────────────────────────────
//! Cooldown after a decision: one real-world event (a blink, a
//! motor-imagery trial) spans several evidence windows and must not
//! produce several decisions.

/// Counts down evidence updates to drop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryGate {
    ignore_count: usize,
}

impl RecoveryGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if the current update must be dropped. Consumes one slot.
    pub fn should_ignore(&mut self) -> bool {
        if self.ignore_count > 0 {
            self.ignore_count -= 1;
            true
        } else {
            false
        }
    }

    /// Drop the next `n` updates.
    pub fn arm(&mut self, n: usize) {
        self.ignore_count = n;
    }

    pub fn clear(&mut self) {
        self.ignore_count = 0;
    }

    pub fn remaining(&self) -> usize {
        self.ignore_count
    }

    pub fn is_armed(&self) -> bool {
        self.ignore_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_gate_passes() {
        let mut gate = RecoveryGate::new();
        assert!(!gate.should_ignore());
        assert!(!gate.is_armed());
    }

    #[test]
    fn test_arm_drops_exactly_n() {
        let mut gate = RecoveryGate::new();
        gate.arm(3);
        assert!(gate.should_ignore());
        assert!(gate.should_ignore());
        assert_eq!(gate.remaining(), 1);
        assert!(gate.should_ignore());
        assert!(!gate.should_ignore());
    }

    #[test]
    fn test_arm_zero_and_clear() {
        let mut gate = RecoveryGate::new();
        gate.arm(0);
        assert!(!gate.should_ignore());
        gate.arm(5);
        gate.clear();
        assert_eq!(gate.remaining(), 0);
        assert!(!gate.should_ignore());
    }

    #[test]
    fn test_rearm_overwrites() {
        let mut gate = RecoveryGate::new();
        gate.arm(5);
        gate.arm(1);
        assert!(gate.should_ignore());
        assert!(!gate.should_ignore());
    }
}
