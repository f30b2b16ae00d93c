//! Replay cursor, position reconstruction, PGN export, and autoplay.
//!
//! The replay engine reads the move ledger but never writes it. A cursor
//! of `None` means "live": track the ledger tip. Any `Some(index)` freezes
//! the displayed position at that historical index regardless of further
//! ledger growth, until the cursor is cleared.
//!
//! Positions are rebuilt by full replay from the starting position on
//! every call. This is an intentional simplicity/correctness trade-off:
//! no per-index cache means no cache to invalidate while the ledger is
//! still growing concurrently with replay.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tempo_board::notation::{self, PgnTags};
use tempo_board::{BoardPosition, UciMove};
use tempo_core::errors::SessionError;
use tracing::{debug, warn};

use crate::ledger::MoveLedger;

/// Read-only view into the move ledger with autoplay.
#[derive(Debug)]
pub struct Replay {
    cursor: Arc<Mutex<Option<usize>>>,
    playing: Arc<AtomicBool>,
    playback: Option<tokio::task::JoinHandle<()>>,
}

impl Replay {
    /// A live (cursor-cleared) replay view.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cursor: Arc::new(Mutex::new(None)),
            playing: Arc::new(AtomicBool::new(false)),
            playback: None,
        }
    }

    /// The frozen index, or `None` when tracking the live tip.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        *self.cursor.lock()
    }

    /// Freeze the view at `index`, clamped to `[0, ledger_len - 1]`.
    /// No-op on an empty ledger.
    pub fn set_cursor(&self, index: usize, ledger_len: usize) {
        if ledger_len == 0 {
            return;
        }
        *self.cursor.lock() = Some(index.min(ledger_len - 1));
    }

    /// Step the cursor by `delta`, clamped to `[0, ledger_len - 1]`.
    ///
    /// Stepping from live starts at the tip, so `step(-1)` walks one move
    /// back from the current position.
    pub fn step(&self, delta: i32, ledger_len: usize) {
        if ledger_len == 0 {
            return;
        }
        let last = ledger_len - 1;
        let mut cursor = self.cursor.lock();
        let current = cursor.unwrap_or(last) as i64;
        let next = (current + i64::from(delta)).clamp(0, last as i64);
        *cursor = Some(next as usize);
    }

    /// Clear the cursor and track the live tip again.
    pub fn live(&self) {
        *self.cursor.lock() = None;
    }

    /// The index currently displayed: the cursor, or the ledger tip.
    /// `None` for an empty ledger in live mode.
    #[must_use]
    pub fn displayed_index(&self, ledger_len: usize) -> Option<usize> {
        self.cursor().or_else(|| ledger_len.checked_sub(1))
    }

    /// Rebuild the position after `ledger[index]` by replaying records
    /// `[0..=index]` from the starting position.
    ///
    /// An `index` at or past the tip replays the whole ledger, matching
    /// the cursor clamping. O(index) per call by design. A record the
    /// engine rejects yields [`SessionError::ReplayDesync`].
    pub fn position_at(ledger: &MoveLedger, index: usize) -> Result<BoardPosition, SessionError> {
        let mut position = BoardPosition::new();
        for record in ledger.records().iter().take(index + 1) {
            let mv = UciMove::new(&record.uci).map_err(|e| SessionError::ReplayDesync {
                index: record.index,
                reason: e.to_string(),
            })?;
            let _ = position
                .apply_uci(&mv)
                .map_err(|e| SessionError::ReplayDesync {
                    index: record.index,
                    reason: e.to_string(),
                })?;
        }
        Ok(position)
    }

    /// The position for the current view: frozen at the cursor, or the
    /// live tip. The starting position for an empty ledger.
    pub fn displayed_position(&self, ledger: &MoveLedger) -> Result<BoardPosition, SessionError> {
        match self.displayed_index(ledger.len()) {
            Some(index) => Self::position_at(ledger, index),
            None => Ok(BoardPosition::new()),
        }
    }

    /// Export the full ledger as a PGN game.
    ///
    /// Replays every record through the engine and emits its SAN. A
    /// record the engine now rejects (ledger corruption) is skipped —
    /// logged and counted, never fatal — to maximize salvageable history.
    #[must_use]
    pub fn export_pgn(ledger: &MoveLedger, tags: &PgnTags) -> String {
        let mut position = BoardPosition::new();
        let mut sans = Vec::with_capacity(ledger.len());
        for record in ledger.records() {
            let applied = UciMove::new(&record.uci)
                .and_then(|mv| position.apply_uci(&mv));
            match applied {
                Ok(applied) => sans.push(applied.san),
                Err(err) => {
                    warn!(index = record.index, uci = %record.uci, %err, "skipping unreplayable record in export");
                    metrics::counter!("replay_desync_skips_total").increment(1);
                }
            }
        }
        notation::write_game(tags, &sans)
    }

    /// Whether a playback walk is currently running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }

    /// Start an autoplay walk from index 0 to `ledger_len - 1`, stepping
    /// every `interval`.
    ///
    /// At most one playback timer is live at a time: any in-flight walk
    /// is cancelled first. Reaching the end clears the playing flag and
    /// leaves the cursor on the last index.
    pub fn start_playback(&mut self, ledger_len: usize, interval: Duration) {
        self.stop_playback();
        if ledger_len == 0 {
            return;
        }

        *self.cursor.lock() = Some(0);
        self.playing.store(true, Ordering::Relaxed);
        debug!(len = ledger_len, ?interval, "starting replay playback");

        let cursor = Arc::clone(&self.cursor);
        let playing = Arc::clone(&self.playing);
        self.playback = Some(tokio::spawn(async move {
            for index in 1..ledger_len {
                tokio::time::sleep(interval).await;
                *cursor.lock() = Some(index);
            }
            playing.store(false, Ordering::Relaxed);
        }));
    }

    /// Stop any in-flight playback walk. The cursor stays where the walk
    /// left it.
    pub fn stop_playback(&mut self) {
        if let Some(handle) = self.playback.take() {
            handle.abort();
        }
        self.playing.store(false, Ordering::Relaxed);
    }
}

impl Default for Replay {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Replay {
    fn drop(&mut self) {
        // Component teardown must clear any pending timer.
        if let Some(handle) = self.playback.take() {
            handle.abort();
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
