//! Bucket-aligned join of two sorted streams.
//!
//! The join drives off the coarser ("outer") stream and aggregates the
//! finer ("inner") stream into the outer elements' buckets: exactly one
//! output row per outer element, in outer order, with a zero-valued
//! aggregate when no inner element shares the bucket.
//!
//! A single cursor advances monotonically over the inner stream for the
//! whole call, so each inner element is consumed by at most one outer
//! bucket and the inner stream is scanned once. One consequence is kept
//! as documented behavior rather than corrected: when two outer elements
//! share a bucket, the matching inner run is attributed entirely to the
//! first of them and the second receives a zero aggregate.

use chrono::NaiveDateTime;

use crate::error::AppError;
use crate::time::{GridWidth, Timestamped, bucket, minute_floor};

/// One output row of a join: the driving outer record, its bucket, and
/// the aggregate folded from the matching inner records.
#[derive(Debug, Clone)]
pub struct JoinRow<O, A> {
    pub outer: O,
    pub bucket: NaiveDateTime,
    pub aggregate: A,
}

/// Join `inner` onto `outer` by bucket equality on the given grid.
///
/// Both inputs must be sorted ascending by timestamp; a violation is a
/// precondition failure because the single-pass cursor cannot produce a
/// correct result from unsorted input.
pub fn join_by_bucket<O, I, A, F>(
    outer: &[O],
    inner: &[I],
    grid: GridWidth,
    mut fold: F,
) -> Result<Vec<JoinRow<O, A>>, AppError>
where
    O: Timestamped + Clone,
    I: Timestamped,
    A: Default,
    F: FnMut(&mut A, &I),
{
    ensure_sorted(outer, "outer")?;
    ensure_sorted(inner, "inner")?;

    let mut rows = Vec::with_capacity(outer.len());
    let mut cursor = 0usize;

    for o in outer {
        let snapped = bucket(o.timestamp(), grid);
        let key = minute_floor(snapped);

        // Skip inner elements whose bucket has already been passed. Inner
        // elements ahead of this bucket are left for later outer elements.
        while cursor < inner.len()
            && minute_floor(bucket(inner[cursor].timestamp(), grid)) < key
        {
            cursor += 1;
        }

        let mut aggregate = A::default();
        while cursor < inner.len()
            && minute_floor(bucket(inner[cursor].timestamp(), grid)) == key
        {
            fold(&mut aggregate, &inner[cursor]);
            cursor += 1;
        }

        rows.push(JoinRow {
            outer: o.clone(),
            bucket: snapped,
            aggregate,
        });
    }

    Ok(rows)
}

fn ensure_sorted<T: Timestamped>(records: &[T], which: &str) -> Result<(), AppError> {
    for pair in records.windows(2) {
        if pair[1].timestamp() < pair[0].timestamp() {
            return Err(AppError::new(
                4,
                format!("{which} stream is not sorted by timestamp; cannot join."),
            ));
        }
    }
    Ok(())
}
