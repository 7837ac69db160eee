//! Freeze window evaluation.
//!
//! Pure computation over an ordered sequence of hourly readings. The
//! order the forecast source returned defines temporal adjacency, so
//! callers must pass periods through unsorted.

use crate::api::HourlyPeriod;

/// Length of the longest contiguous run of hours at or below the
/// threshold. The comparison is inclusive: a reading exactly at the
/// threshold counts as freezing.
///
/// Single linear scan, O(n) time, O(1) space. Returns 0 for an empty
/// sequence; the result never exceeds the input length.
pub fn longest_freeze_hours(periods: &[HourlyPeriod], threshold_f: f64) -> u32 {
    let mut longest = 0u32;
    let mut current = 0u32;

    for period in periods {
        if period.temperature <= threshold_f {
            current += 1;
            if current > longest {
                longest = current;
            }
        } else {
            current = 0;
        }
    }

    longest
}
