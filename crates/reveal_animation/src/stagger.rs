//! Per-element stagger delays
//!
//! `delay(i) = base + i × step`. With a non-zero step the delays strictly
//! increase in element order.

use serde::{Deserialize, Serialize};

/// Stagger timing for one group
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stagger {
    /// Delay before the first element starts (ms)
    pub base_ms: u32,
    /// Delay between consecutive elements (ms)
    pub step_ms: u32,
}

impl Stagger {
    pub const fn new(base_ms: u32, step_ms: u32) -> Self {
        Self { base_ms, step_ms }
    }

    /// Calculate delay for a specific element index
    pub fn delay_for_index(&self, index: usize) -> u32 {
        let step = u32::try_from(index)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.step_ms);
        self.base_ms.saturating_add(step)
    }

    /// Delays for a group of `total` elements, in element order
    pub fn delays(&self, total: usize) -> Vec<u32> {
        (0..total).map(|i| self.delay_for_index(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_and_card_delays() {
        assert_eq!(Stagger::new(100, 100).delays(3), vec![100, 200, 300]);
        assert_eq!(Stagger::new(0, 150).delays(2), vec![0, 150]);
    }

    #[test]
    fn test_forward_is_strictly_increasing() {
        let stagger = Stagger::new(20, 1);
        let delays = stagger.delays(64);
        assert!(delays.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(serde_json::from_str::<Stagger>(r#"{ "base_ms": 0, "step_ms": 10 }"#).is_ok());
        assert!(serde_json::from_str::<Stagger>(
            r#"{ "base_ms": 0, "step_ms": 10, "direction": "reverse" }"#
        )
        .is_err());
    }

    #[test]
    fn test_empty_group() {
        assert!(Stagger::new(0, 100).delays(0).is_empty());
    }
}
