use serde::{Deserialize, Serialize};

/// Gains closer than this are treated as equal.
///
/// Summing and subtracting hyperedge costs leaves rounding residue (a move
/// that changes nothing can report a gain near `1e-17`), which must not
/// count as an improvement.
pub const GAIN_TOLERANCE: f64 = 1e-9;

/// Candidate move of every pin of a hyperedge into one block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HyperedgeGain {
    /// Hyperedge whose pins move.
    pub hyperedge: usize,
    /// Target block; `None` for the "stay put" baseline.
    pub target: Option<usize>,
    /// Decrease in partition cost the move causes.
    pub gain: f64,
    /// Tie-break key: summed vertex weight norm of the hyperedge's pins.
    pub vertex_weight_sum: f64,
}

impl HyperedgeGain {
    /// The zero-gain "no move" candidate every real move has to beat.
    pub fn baseline(hyperedge: usize, vertex_weight_sum: f64) -> Self {
        Self {
            hyperedge,
            target: None,
            gain: 0.0,
            vertex_weight_sum,
        }
    }

    /// Whether this candidate should replace `other` as the best so far.
    ///
    /// Higher gain wins; gains within [`GAIN_TOLERANCE`] of each other tie,
    /// and on a tie the lighter hyperedge wins. Equal candidates do not
    /// replace each other, so the first one found stays.
    pub fn is_better(&self, other: &Self) -> bool {
        let diff = self.gain - other.gain;
        if diff.abs() <= GAIN_TOLERANCE {
            return self.vertex_weight_sum < other.vertex_weight_sum;
        }
        diff > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::{HyperedgeGain, GAIN_TOLERANCE};

    fn candidate(target: usize, gain: f64, key: f64) -> HyperedgeGain {
        HyperedgeGain {
            hyperedge: 0,
            target: Some(target),
            gain,
            vertex_weight_sum: key,
        }
    }

    #[test]
    fn zero_gain_never_beats_baseline() {
        let baseline = HyperedgeGain::baseline(0, 3.0);
        assert!(!candidate(1, 0.0, 3.0).is_better(&baseline));
        assert!(!candidate(1, -1.0, 0.0).is_better(&baseline));
        assert!(candidate(1, 0.5, 3.0).is_better(&baseline));
    }

    #[test]
    fn equal_gain_prefers_lighter_then_first() {
        let heavy = candidate(0, 2.0, 5.0);
        let light = candidate(1, 2.0, 4.0);
        assert!(light.is_better(&heavy));
        assert!(!heavy.is_better(&light));
        assert!(!candidate(2, 2.0, 4.0).is_better(&light));
    }

    #[test]
    fn rounding_residue_is_not_a_gain() {
        let baseline = HyperedgeGain::baseline(0, 3.0);
        let residue = (0.1 + 0.2) - 0.3;
        assert!(residue > 0.0);
        assert!(!candidate(1, residue, 3.0).is_better(&baseline));
        assert!(!candidate(1, GAIN_TOLERANCE, 3.0).is_better(&baseline));
        assert!(candidate(1, 2.0 * GAIN_TOLERANCE, 3.0).is_better(&baseline));

        let first = candidate(0, 1.0, 3.0);
        assert!(!candidate(1, 1.0 + residue, 3.0).is_better(&first));
    }
}
