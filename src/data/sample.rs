use std::borrow::Cow;

use log::debug;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use super::model::Table;
use crate::error::{VizError, VizResult};

/// Fixed seed so repeated samples of the same table pick the same rows.
pub const SAMPLE_SEED: u64 = 42;

/// Reduce `table` to at most `max_rows` rows.
///
/// Tables that already fit are returned as-is (borrowed). Larger ones get
/// exactly `max_rows` distinct rows drawn with [`SAMPLE_SEED`]; the result
/// order is the draw order, identical on every call.
pub fn sample(table: &Table, max_rows: usize) -> VizResult<Cow<'_, Table>> {
    if max_rows == 0 {
        return Err(VizError::InvalidBound { max_rows });
    }
    if table.row_count() <= max_rows {
        return Ok(Cow::Borrowed(table));
    }

    let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
    let rows = index::sample(&mut rng, table.row_count(), max_rows).into_vec();
    debug!("Sampled {max_rows} of {} rows", table.row_count());

    Ok(Cow::Owned(table.take_rows(&rows)))
}
