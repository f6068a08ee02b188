//! Selection of coin cells

use log::warn;

use crate::layout::LayoutCell;
use crate::random::RandomStream;

/// Result of coin selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinPlacement {
    /// Indices into the layout cell list, in final assignment order
    pub cells: Vec<usize>,
    /// Coin count that was asked for
    pub requested: usize,
}

impl CoinPlacement {
    pub fn is_underfilled(&self) -> bool {
        self.cells.len() < self.requested
    }
}

/// Choose `requested` coin cells.
///
/// The far corner `(rows - 1, cols - 1)` is always chosen. The rest come
/// from a shuffled list of cells outside row 0 and column 0. When there are
/// not enough candidates the placement holds fewer coins than requested and
/// a warning is logged.
pub fn place_coins(
    cells: &[LayoutCell],
    rows: usize,
    cols: usize,
    requested: usize,
    random: &mut RandomStream,
) -> CoinPlacement {
    let mut chosen = Vec::with_capacity(requested);
    let mut candidates = Vec::new();
    for (index, cell) in cells.iter().enumerate() {
        if cell.row == rows - 1 && cell.column == cols - 1 {
            chosen.push(index);
        } else if cell.row != 0 && cell.column != 0 {
            candidates.push(index);
        }
    }

    random.shuffle(&mut candidates);
    let extra = requested.saturating_sub(chosen.len()).min(candidates.len());
    chosen.extend_from_slice(&candidates[..extra]);

    if chosen.len() < requested {
        warn!(
            "only {} of {} requested coins fit in a {}x{} maze",
            chosen.len(),
            requested,
            rows,
            cols
        );
    }

    // Decouples assignment order from selection order; the set is unchanged.
    random.shuffle(&mut chosen);

    CoinPlacement {
        cells: chosen,
        requested,
    }
}
