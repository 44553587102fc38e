//! Batch partitioning for bulk inserts.

use std::ops::Range;

use super::SeedError;

/// Split `total` items into contiguous ranges of at most `chunk_size`
/// elements. The last range may be shorter; the ranges cover `0..total`
/// exactly once with no gaps and no overlaps.
pub fn chunk_ranges(total: u64, chunk_size: u64) -> Result<Vec<Range<u64>>, SeedError> {
    if chunk_size == 0 {
        return Err(SeedError::InvalidArgument(
            "chunk size must be at least 1".to_string(),
        ));
    }

    let mut ranges = Vec::with_capacity(total.div_ceil(chunk_size) as usize);
    let mut start = 0;
    while start < total {
        let end = (start + chunk_size).min(total);
        ranges.push(start..end);
        start = end;
    }
    Ok(ranges)
}

/// Split `total` items into exactly `pieces` contiguous ranges whose lengths
/// differ by at most one. The first `total % pieces` ranges carry the extra
/// element. Ranges may be empty when `total < pieces`.
pub fn split_even(total: u64, pieces: u64) -> Result<Vec<Range<u64>>, SeedError> {
    if pieces == 0 {
        return Err(SeedError::InvalidArgument(
            "piece count must be at least 1".to_string(),
        ));
    }

    let base = total / pieces;
    let remainder = total % pieces;

    let mut ranges = Vec::with_capacity(pieces as usize);
    let mut start = 0;
    for i in 0..pieces {
        let len = base + u64::from(i < remainder);
        ranges.push(start..start + len);
        start += len;
    }
    Ok(ranges)
}
