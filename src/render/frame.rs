use std::fmt;
use std::ops::AddAssign;

/// Steps of one world frame, in the only order they may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FramePhase {
    ClearTarget,
    SetupGlobalUniforms,
    GatherCandidates,
    Order,
    DrawOpaquePass,
    TransientBatchPass,
    SelectionOverlayPass,
    DebugOverlayPass,
    FrameDone,
}

impl FramePhase {
    pub fn next(self) -> Option<Self> {
        use FramePhase::*;
        match self {
            ClearTarget => Some(SetupGlobalUniforms),
            SetupGlobalUniforms => Some(GatherCandidates),
            GatherCandidates => Some(Order),
            Order => Some(DrawOpaquePass),
            DrawOpaquePass => Some(TransientBatchPass),
            TransientBatchPass => Some(SelectionOverlayPass),
            SelectionOverlayPass => Some(DebugOverlayPass),
            DebugOverlayPass => Some(FrameDone),
            FrameDone => None,
        }
    }
}

/// Per-frame counters. Purely informational; nothing here steers the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Occupied slots gathered this frame.
    pub candidates: usize,
    pub drawn: usize,
    /// Rejected by the behind-the-camera test.
    pub occluded: usize,
    /// Skipped because lighting has not finished.
    pub unlighted: usize,
    /// Lighted but the mesh cache had nothing yet.
    pub pending: usize,
    /// No longer loaded by the time it was drawn.
    pub vanished: usize,
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} chunks: {} drawn, {} occluded, {} unlit, {} pending, {} vanished",
            self.candidates, self.drawn, self.occluded, self.unlighted, self.pending, self.vanished
        )
    }
}

impl AddAssign for FrameStats {
    fn add_assign(&mut self, other: Self) {
        self.candidates += other.candidates;
        self.drawn += other.drawn;
        self.occluded += other.occluded;
        self.unlighted += other.unlighted;
        self.pending += other.pending;
        self.vanished += other.vanished;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases_only_move_forward() {
        let mut phase = FramePhase::ClearTarget;
        let mut visited = vec![phase];
        while let Some(next) = phase.next() {
            assert!(next > phase);
            visited.push(next);
            phase = next;
        }
        assert_eq!(visited.len(), 9);
        assert_eq!(phase, FramePhase::FrameDone);
    }

    #[test]
    fn test_stats_accumulate() {
        let mut total = FrameStats::default();
        let frame = FrameStats {
            candidates: 4,
            drawn: 2,
            occluded: 1,
            unlighted: 1,
            ..FrameStats::default()
        };
        total += frame;
        total += frame;
        assert_eq!(total.candidates, 8);
        assert_eq!(total.drawn, 4);
        assert_eq!(total.pending, 0);
    }
}
