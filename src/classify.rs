//! Error-string classification.
//!
//! Each predicate takes a snapshot and returns the matching subset, order
//! preserved. Predicates are independent and not mutually exclusive: a
//! torrent may land in zero, one, or several subsets.

use crate::torrent::TorrentRecord;

/// Exact tracker message for a torrent the tracker no longer knows
pub const UNREGISTERED: &str = "Unregistered torrent";

/// Full Transmission message for content gone missing on disk
pub const MISSING_DATA_FULL: &str = "No data found! Ensure your drives are connected or use \"Set Location\". To re-download, remove the torrent and re-add it.";

/// Shorter prefix some Transmission versions report for the same condition
pub const MISSING_DATA_PREFIX: &str = "No data found";

/// Prefixes of transient local I/O failures worth a restart
pub const IO_ERROR_PREFIX: &str = "Input/output error";
pub const RESUME_FILE_PREFIX: &str = "Unable to save resume file";

/// Tracker message for a rejected passkey
pub const INVALID_PASSKEY: &str = "Invalid passkey";

/// Torrents the tracker reports as unregistered.
pub fn unregistered(snapshot: &[TorrentRecord]) -> Vec<TorrentRecord> {
    snapshot
        .iter()
        .filter(|t| t.error_string == UNREGISTERED)
        .cloned()
        .collect()
}

/// Torrents whose downloaded data is no longer where the daemon expects it.
pub fn missing_data(snapshot: &[TorrentRecord]) -> Vec<TorrentRecord> {
    snapshot
        .iter()
        .filter(|t| {
            t.error_string == MISSING_DATA_FULL || t.error_string.starts_with(MISSING_DATA_PREFIX)
        })
        .cloned()
        .collect()
}

/// Torrents with transient local I/O errors, usually cleared by a restart.
pub fn transient_io(snapshot: &[TorrentRecord]) -> Vec<TorrentRecord> {
    snapshot
        .iter()
        .filter(|t| {
            t.error_string.starts_with(IO_ERROR_PREFIX)
                || t.error_string.starts_with(RESUME_FILE_PREFIX)
        })
        .cloned()
        .collect()
}

/// Torrents whose error string is anything other than the passkey rejection.
///
/// The comparison is inverted (`!=` rather than `==`), so this matches every
/// torrent except an actual passkey failure. Kept as-is pending a decision on
/// the intended semantics; see DESIGN.md before pointing a destructive action
/// at this subset.
pub fn invalid_passkey(snapshot: &[TorrentRecord]) -> Vec<TorrentRecord> {
    snapshot
        .iter()
        .filter(|t| t.error_string != INVALID_PASSKEY)
        .cloned()
        .collect()
}

/// Torrents the daemon reports any error on.
pub fn with_errors(snapshot: &[TorrentRecord]) -> Vec<TorrentRecord> {
    snapshot.iter().filter(|t| t.has_error()).cloned().collect()
}

/// Torrents that actually downloaded something, past the given completion
/// threshold. Used to keep never-started torrents out of destructive passes.
pub fn with_data(snapshot: &[TorrentRecord], threshold: f64) -> Vec<TorrentRecord> {
    snapshot
        .iter()
        .filter(|t| t.percent_done > threshold)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use transmission_rpc::types::ErrorType;

    fn record(id: i64, error: ErrorType, error_string: &str) -> TorrentRecord {
        TorrentRecord {
            id,
            name: format!("torrent-{id}"),
            error,
            error_string: error_string.to_string(),
            percent_done: 0.5,
            magnet_link: None,
        }
    }

    fn mixed_snapshot() -> Vec<TorrentRecord> {
        vec![
            record(1, ErrorType::Ok, ""),
            record(2, ErrorType::TrackerError, UNREGISTERED),
            record(3, ErrorType::LocalError, MISSING_DATA_FULL),
            record(4, ErrorType::LocalError, "Input/output error: /data/t4"),
            record(5, ErrorType::LocalError, "Unable to save resume file: disk full"),
            record(6, ErrorType::TrackerError, INVALID_PASSKEY),
            record(7, ErrorType::LocalError, "No data found"),
        ]
    }

    #[test]
    fn test_unregistered_exact_match_only() {
        let snapshot = mixed_snapshot();
        let subset = unregistered(&snapshot);
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].id, 2);

        // Prefix of the literal is not enough
        let near = vec![record(8, ErrorType::TrackerError, "Unregistered torrent!")];
        assert!(unregistered(&near).is_empty());
    }

    #[test]
    fn test_missing_data_exact_and_prefix() {
        let snapshot = mixed_snapshot();
        let subset = missing_data(&snapshot);
        assert_eq!(subset.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3, 7]);
    }

    #[test]
    fn test_transient_io_both_prefixes() {
        let snapshot = mixed_snapshot();
        let subset = transient_io(&snapshot);
        assert_eq!(subset.iter().map(|t| t.id).collect::<Vec<_>>(), vec![4, 5]);
    }

    #[test]
    fn test_invalid_passkey_is_inverted() {
        let snapshot = mixed_snapshot();
        let subset = invalid_passkey(&snapshot);
        // Everything except the one torrent that actually says "Invalid passkey"
        assert_eq!(subset.len(), snapshot.len() - 1);
        assert!(subset.iter().all(|t| t.id != 6));
    }

    #[test]
    fn test_with_errors() {
        let snapshot = mixed_snapshot();
        let subset = with_errors(&snapshot);
        assert_eq!(subset.len(), 6);
        assert!(subset.iter().all(|t| t.id != 1));
    }

    #[test]
    fn test_with_data_strict_threshold() {
        let mut snapshot = mixed_snapshot();
        snapshot[0].percent_done = 0.0;
        snapshot[1].percent_done = 0.02;

        let subset = with_data(&snapshot, 0.02);
        // Strictly greater than the threshold
        assert!(subset.iter().all(|t| t.id != 1 && t.id != 2));
        assert_eq!(subset.len(), 5);
    }

    #[test]
    fn test_predicates_are_idempotent() {
        let snapshot = mixed_snapshot();

        let once = transient_io(&snapshot);
        let twice = transient_io(&once);
        assert_eq!(once, twice);

        let once = unregistered(&snapshot);
        let twice = unregistered(&once);
        assert_eq!(once, twice);

        let once = missing_data(&snapshot);
        let twice = missing_data(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_subsets_preserve_order_and_membership() {
        let snapshot = mixed_snapshot();
        for subset in [
            unregistered(&snapshot),
            missing_data(&snapshot),
            transient_io(&snapshot),
            invalid_passkey(&snapshot),
            with_errors(&snapshot),
        ] {
            // Every subset member comes from the input
            assert!(subset.iter().all(|t| snapshot.contains(t)));
            // Order is the input order
            let positions: Vec<_> = subset
                .iter()
                .map(|t| snapshot.iter().position(|s| s.id == t.id).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_empty_snapshot() {
        let empty: Vec<TorrentRecord> = Vec::new();
        assert!(unregistered(&empty).is_empty());
        assert!(missing_data(&empty).is_empty());
        assert!(transient_io(&empty).is_empty());
        assert!(invalid_passkey(&empty).is_empty());
        assert!(with_errors(&empty).is_empty());
        assert!(with_data(&empty, 0.02).is_empty());
    }
}
