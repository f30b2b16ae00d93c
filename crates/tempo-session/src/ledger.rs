//! The append-only move ledger.

use tempo_core::errors::SessionError;
use tempo_core::events::MoveRecord;

/// Ordered, append-only sequence of confirmed moves.
///
/// Invariant: `records[i].index == i` for all `i` — no gaps, no
/// duplicates. The index guard in [`MoveLedger::append`] is what enforces
/// a total order on moves despite network reordering or duplicate
/// delivery: a record whose index is not exactly the next slot is
/// rejected, never merged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveLedger {
    records: Vec<MoveRecord>,
}

impl MoveLedger {
    /// An empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from an authoritative snapshot.
    ///
    /// The snapshot must already satisfy the gapless-index invariant;
    /// a violating record fails the whole seed so a corrupt snapshot is
    /// never half-applied.
    pub fn from_records(records: Vec<MoveRecord>) -> Result<Self, SessionError> {
        let mut ledger = Self::new();
        for record in records {
            ledger.append(record)?;
        }
        Ok(ledger)
    }

    /// Append a record at the next index.
    ///
    /// Fails with [`SessionError::OutOfOrderMove`] — leaving the ledger
    /// untouched — when `record.index` is not exactly [`Self::next_index`].
    pub fn append(&mut self, record: MoveRecord) -> Result<(), SessionError> {
        let expected = self.next_index();
        if record.index != expected {
            return Err(SessionError::OutOfOrderMove {
                expected,
                got: record.index,
            });
        }
        self.records.push(record);
        Ok(())
    }

    /// The index the next appended record must carry.
    #[must_use]
    pub fn next_index(&self) -> u32 {
        self.records.len() as u32
    }

    /// Number of confirmed moves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no moves have been confirmed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent record, if any.
    #[must_use]
    pub fn last(&self) -> Option<&MoveRecord> {
        self.records.last()
    }

    /// The record at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&MoveRecord> {
        self.records.get(index)
    }

    /// All records in ledger order.
    #[must_use]
    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;
    use tempo_core::ids::UserId;

    fn record(index: u32, uci: &str) -> MoveRecord {
        MoveRecord {
            uci: uci.into(),
            san: String::new(),
            fen: String::new(),
            index,
            actor: UserId::from("u-1"),
            ts: chrono::Utc::now(),
        }
    }

    #[test]
    fn append_in_order() {
        let mut ledger = MoveLedger::new();
        ledger.append(record(0, "e2e4")).unwrap();
        ledger.append(record(1, "e7e5")).unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.last().unwrap().uci, "e7e5");
        assert_eq!(ledger.next_index(), 2);
    }

    #[test]
    fn duplicate_index_rejected_without_mutation() {
        let mut ledger = MoveLedger::new();
        ledger.append(record(0, "e2e4")).unwrap();
        let before = ledger.clone();

        let err = ledger.append(record(0, "e2e4")).unwrap_err();
        assert_matches!(err, SessionError::OutOfOrderMove { expected: 1, got: 0 });
        assert_eq!(ledger, before);
    }

    #[test]
    fn gap_rejected_without_mutation() {
        let mut ledger = MoveLedger::new();
        ledger.append(record(0, "e2e4")).unwrap();
        let before = ledger.clone();

        let err = ledger.append(record(5, "g1f3")).unwrap_err();
        assert_matches!(err, SessionError::OutOfOrderMove { expected: 1, got: 5 });
        assert_eq!(ledger, before);
    }

    #[test]
    fn from_records_accepts_gapless_snapshot() {
        let ledger =
            MoveLedger::from_records(vec![record(0, "e2e4"), record(1, "e7e5")]).unwrap();
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn from_records_rejects_corrupt_snapshot() {
        let result = MoveLedger::from_records(vec![record(0, "e2e4"), record(3, "e7e5")]);
        assert_matches!(result, Err(SessionError::OutOfOrderMove { expected: 1, got: 3 }));
    }

    #[test]
    fn get_by_index() {
        let ledger =
            MoveLedger::from_records(vec![record(0, "e2e4"), record(1, "e7e5")]).unwrap();
        assert_eq!(ledger.get(0).unwrap().uci, "e2e4");
        assert!(ledger.get(2).is_none());
    }

    proptest! {
        /// For all gapless sequences, every append succeeds, the length
        /// equals the number of applied moves, and indices match slots.
        #[test]
        fn gapless_sequences_always_accepted(n in 0usize..64) {
            let mut ledger = MoveLedger::new();
            for i in 0..n {
                ledger.append(record(i as u32, "e2e4")).unwrap();
            }
            prop_assert_eq!(ledger.len(), n);
            for (slot, rec) in ledger.records().iter().enumerate() {
                prop_assert_eq!(rec.index as usize, slot);
            }
        }

        /// Any index other than the next slot is rejected and leaves the
        /// ledger byte-identical.
        #[test]
        fn wrong_index_never_mutates(len in 0u32..16, got in 0u32..64) {
            let mut ledger = MoveLedger::new();
            for i in 0..len {
                ledger.append(record(i, "e2e4")).unwrap();
            }
            prop_assume!(got != len);
            let before = ledger.clone();
            prop_assert!(ledger.append(record(got, "e2e4")).is_err());
            prop_assert_eq!(ledger, before);
        }
    }
}
