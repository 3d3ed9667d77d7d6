use crate::player::PlayerId;
use crate::state::Street;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum HistoryVerb {
    Ante,
    SmallBlind,
    BigBlind,
    Fold,
    Check,
    Call,
    Bet,
    RaiseTo,
    AllIn,
    /// Community cards dealt for a new street.
    Deal,
    Win,
    Split,
}

impl HistoryVerb {
    pub fn label(self) -> &'static str {
        match self {
            HistoryVerb::Ante => "Ante",
            HistoryVerb::SmallBlind => "SB",
            HistoryVerb::BigBlind => "BB",
            HistoryVerb::Fold => "Fold",
            HistoryVerb::Check => "Check",
            HistoryVerb::Call => "Call",
            HistoryVerb::Bet => "Bet",
            HistoryVerb::RaiseTo => "Raise to",
            HistoryVerb::AllIn => "All-in",
            HistoryVerb::Deal => "Deal",
            HistoryVerb::Win => "Win",
            HistoryVerb::Split => "Split",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct HistoryEntry {
    /// `None` for table events such as dealing a street.
    pub player: Option<PlayerId>,
    pub verb: HistoryVerb,
    pub amount: Option<u64>,
    pub street: Street,
}

/// Ordered log of everything that happened in one hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandHistory {
    entries: Vec<HistoryEntry>,
}

impl HandHistory {
    pub(crate) fn record(
        &mut self,
        player: Option<PlayerId>,
        verb: HistoryVerb,
        amount: Option<u64>,
        street: Street,
    ) {
        self.entries.push(HistoryEntry { player, verb, amount, street });
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The last `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> &[HistoryEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// A page of `n` entries ending `offset` entries before the newest.
    /// The offset is clamped so a full page is returned whenever possible.
    pub fn recent_offset(&self, n: usize, offset: usize) -> &[HistoryEntry] {
        let len = self.entries.len();
        if n == 0 || len == 0 {
            return &[];
        }
        let offset = offset.min(len.saturating_sub(n));
        let end = len - offset;
        let start = end.saturating_sub(n);
        &self.entries[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(n: u64) -> HandHistory {
        let mut h = HandHistory::default();
        for i in 0..n {
            h.record(Some(PlayerId(0)), HistoryVerb::Call, Some(i), Street::Preflop);
        }
        h
    }

    fn amounts(entries: &[HistoryEntry]) -> Vec<u64> {
        entries.iter().filter_map(|e| e.amount).collect()
    }

    #[test]
    fn recent_returns_tail_in_order() {
        let h = history(5);
        assert_eq!(amounts(h.recent(2)), vec![3, 4]);
        assert_eq!(amounts(h.recent(10)), vec![0, 1, 2, 3, 4]);
        assert!(h.recent(0).is_empty());
    }

    #[test]
    fn recent_offset_pages_backwards_and_clamps() {
        let h = history(6);
        assert_eq!(amounts(h.recent_offset(2, 0)), vec![4, 5]);
        assert_eq!(amounts(h.recent_offset(2, 2)), vec![2, 3]);
        assert_eq!(amounts(h.recent_offset(4, 10)), vec![0, 1, 2, 3]);
        assert!(HandHistory::default().recent_offset(3, 0).is_empty());
    }
}
