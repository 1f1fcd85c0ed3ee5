use crate::space::SPACE_COUNT;

/// Locally queued, unconfirmed moves layered over authoritative state.
///
/// Purely additive bookkeeping: the per-space counters adjust how many
/// checkers the registry materializes, nothing here validates legality.
/// The overlay is a view, not a ledger; it is replaced by whatever premove
/// set the next authoritative snapshot reports.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PremoveOverlay {
    arriving: [i32; SPACE_COUNT],
    leaving: [i32; SPACE_COUNT],
    moves: Vec<(usize, usize)>,
}

impl PremoveOverlay {
    pub fn from_pairs(pairs: &[(usize, usize)]) -> Self {
        let mut overlay = Self::default();
        for &(from, to) in pairs {
            overlay.add(from, to);
        }
        overlay
    }

    pub fn add(&mut self, from: usize, to: usize) {
        self.leaving[from] += 1;
        self.arriving[to] += 1;
        self.moves.push((from, to));
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Net count of speculative checkers at a space: arriving minus leaving.
    pub fn net(&self, space: usize) -> i32 {
        self.arriving[space] - self.leaving[space]
    }

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}
