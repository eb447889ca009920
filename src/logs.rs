//! Log batch deduplication for poll-based log streaming.
//!
//! Service log lines start with an ISO-8601 timestamp, so lexicographic
//! order is time order and overlap between consecutive polls can be
//! trimmed by string comparison alone.

/// Returns the entries of `new_log_records` that were not already seen in
/// `prev_log_records`, sorted.
///
/// The previous batch is walked backwards only until it precedes the
/// earliest new record, so the cost is bounded by the overlap.
pub fn new_logs_only(prev_log_records: &[String], new_log_records: Vec<String>) -> Vec<String> {
    let mut new_sorted = new_log_records;
    new_sorted.sort();
    let Some(first_new) = new_sorted.first().cloned() else {
        return new_sorted;
    };

    for prev in prev_log_records.iter().rev() {
        if *prev < first_new {
            break;
        }
        if let Some(position) = new_sorted.iter().position(|record| record == prev) {
            new_sorted.remove(position);
        }
    }
    new_sorted
}

/// Strips the leading timestamp token from a log line when timestamps are
/// not wanted.
pub fn filter_log_timestamp(log: &str, include_timestamps: bool) -> &str {
    if include_timestamps {
        log
    } else {
        log.split_once(' ').map_or(log, |(_, rest)| rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(records: &[&str]) -> Vec<String> {
        records.iter().map(|r| (*r).to_owned()).collect()
    }

    #[test]
    fn overlapping_batches_keep_only_new_records() {
        let prev = batch(&["T1", "T2", "T3"]);
        let new = batch(&["T2", "T3", "T4"]);
        assert_eq!(new_logs_only(&prev, new), batch(&["T4"]));
    }

    #[test]
    fn unsorted_new_batch_comes_back_sorted() {
        let prev = batch(&[
            "2024-10-22T01:12:29.873896187Z Count: 1",
            "2024-10-22T01:12:30.873896187Z Count: 2",
        ]);
        let new = batch(&[
            "2024-10-22T01:12:31.873896187Z Count: 3",
            "2024-10-22T01:12:30.873896187Z Count: 2",
        ]);
        assert_eq!(
            new_logs_only(&prev, new),
            batch(&["2024-10-22T01:12:31.873896187Z Count: 3"])
        );
    }

    #[test]
    fn disjoint_batches_pass_through() {
        let prev = batch(&["T1", "T2"]);
        let new = batch(&["T3", "T4"]);
        assert_eq!(new_logs_only(&prev, new), batch(&["T3", "T4"]));
    }

    #[test]
    fn fully_duplicated_batch_yields_nothing() {
        let prev = batch(&["T1", "T2"]);
        let new = batch(&["T1", "T2"]);
        assert!(new_logs_only(&prev, new).is_empty());
    }

    #[test]
    fn empty_batches() {
        assert!(new_logs_only(&[], Vec::new()).is_empty());
        assert_eq!(new_logs_only(&[], batch(&["T1"])), batch(&["T1"]));
        assert!(new_logs_only(&batch(&["T1"]), Vec::new()).is_empty());
    }

    #[test]
    fn timestamp_filtering() {
        let line = "2024-10-22T01:12:29Z Count: 1";
        assert_eq!(filter_log_timestamp(line, true), line);
        assert_eq!(filter_log_timestamp(line, false), "Count: 1");
        assert_eq!(filter_log_timestamp("no-space-line", false), "no-space-line");
    }
}
