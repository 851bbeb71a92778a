use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state_encoding::Fingerprint;
use crate::game::COLS;

/// One learned value per column.
pub type ValueRow = [f64; COLS];

/// Sparse fingerprint → action-value table.
///
/// Rows are created on first touch with independent uniform `[0, 1)` draws
/// and are never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueStore {
    rows: HashMap<Fingerprint, ValueRow>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the row for `fp`, materializing it first if this position has
    /// never been seen.
    pub fn lookup<R: Rng>(&mut self, fp: &Fingerprint, rng: &mut R) -> &ValueRow {
        self.row_mut(fp, rng)
    }

    /// Overwrite one slot of the row for `fp`. Other slots are untouched.
    pub fn update<R: Rng>(
        &mut self,
        fp: &Fingerprint,
        column: usize,
        value: f64,
        rng: &mut R,
    ) {
        self.row_mut(fp, rng)[column] = value;
    }

    /// Read a row without materializing it.
    pub fn get(&self, fp: &Fingerprint) -> Option<&ValueRow> {
        self.rows.get(fp)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn row_mut<R: Rng>(&mut self, fp: &Fingerprint, rng: &mut R) -> &mut ValueRow {
        self.rows
            .entry(fp.clone())
            .or_insert_with(|| fresh_row(rng))
    }
}

/// Initial values for a newly seen position.
fn fresh_row<R: Rng>(rng: &mut R) -> ValueRow {
    std::array::from_fn(|_| rng.random::<f64>())
}
