//! Scripted engine for tests.
//!
//! MockEngine serves a queue of snapshots (one per fetch, repeating the last)
//! and records every call so tests can assert, for example, that dry-run
//! issues no mutating calls at all.

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::engine::client::{EngineClient, EngineError};
use crate::torrent::TorrentRecord;

/// One recorded engine call.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Fetch { ids: Option<Vec<i64>> },
    Start { id: i64, force: bool },
    Remove { id: i64, delete_local_data: bool },
    AddPaused { magnet_link: String },
}

impl EngineCall {
    /// Returns true for calls that mutate daemon state
    pub fn is_mutation(&self) -> bool {
        !matches!(self, EngineCall::Fetch { .. })
    }
}

/// Scripted in-memory engine.
pub struct MockEngine {
    snapshots: VecDeque<Vec<TorrentRecord>>,
    fetch_errors: VecDeque<EngineError>,
    fail_actions: bool,
    pub calls: Vec<EngineCall>,
}

impl MockEngine {
    /// Create an engine serving the given snapshots in order.
    ///
    /// The final snapshot is served repeatedly once the queue runs dry; an
    /// empty script serves empty snapshots forever.
    pub fn new(snapshots: Vec<Vec<TorrentRecord>>) -> Self {
        Self {
            snapshots: snapshots.into(),
            fetch_errors: VecDeque::new(),
            fail_actions: false,
            calls: Vec::new(),
        }
    }

    /// Queue an error to be returned by the next fetch, ahead of snapshots.
    pub fn fail_next_fetch(&mut self, err: EngineError) {
        self.fetch_errors.push_back(err);
    }

    /// Make every start/remove/add call fail with a daemon rejection.
    pub fn with_failing_actions(mut self) -> Self {
        self.fail_actions = true;
        self
    }

    /// Number of recorded calls that would mutate daemon state
    pub fn mutation_calls(&self) -> usize {
        self.calls.iter().filter(|c| c.is_mutation()).count()
    }

    fn next_snapshot(&mut self) -> Vec<TorrentRecord> {
        if self.snapshots.len() > 1 {
            self.snapshots.pop_front().unwrap_or_default()
        } else {
            self.snapshots.front().cloned().unwrap_or_default()
        }
    }

    fn action_result(&self) -> Result<(), EngineError> {
        if self.fail_actions {
            Err(EngineError::Daemon("result: failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EngineClient for MockEngine {
    async fn fetch(&mut self, ids: Option<Vec<i64>>) -> Result<Vec<TorrentRecord>, EngineError> {
        self.calls.push(EngineCall::Fetch { ids: ids.clone() });

        if let Some(err) = self.fetch_errors.pop_front() {
            return Err(err);
        }

        let snapshot = self.next_snapshot();
        Ok(match ids {
            Some(ids) => snapshot
                .into_iter()
                .filter(|t| ids.contains(&t.id))
                .collect(),
            None => snapshot,
        })
    }

    async fn start(&mut self, id: i64, force: bool) -> Result<(), EngineError> {
        self.calls.push(EngineCall::Start { id, force });
        self.action_result()
    }

    async fn remove(&mut self, id: i64, delete_local_data: bool) -> Result<(), EngineError> {
        self.calls.push(EngineCall::Remove {
            id,
            delete_local_data,
        });
        self.action_result()
    }

    async fn add_paused(&mut self, magnet_link: &str) -> Result<(), EngineError> {
        self.calls.push(EngineCall::AddPaused {
            magnet_link: magnet_link.to_string(),
        });
        self.action_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transmission_rpc::types::ErrorType;

    fn record(id: i64, name: &str) -> TorrentRecord {
        TorrentRecord {
            id,
            name: name.to_string(),
            error: ErrorType::LocalError,
            error_string: "Input/output error".to_string(),
            percent_done: 0.5,
            magnet_link: None,
        }
    }

    #[tokio::test]
    async fn test_snapshots_advance_then_repeat() {
        let mut engine = MockEngine::new(vec![vec![record(1, "a")], vec![]]);

        assert_eq!(engine.fetch(None).await.unwrap().len(), 1);
        assert_eq!(engine.fetch(None).await.unwrap().len(), 0);
        // Last snapshot repeats
        assert_eq!(engine.fetch(None).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_fetch_filters_by_ids() {
        let mut engine = MockEngine::new(vec![vec![record(1, "a"), record(2, "b")]]);

        let got = engine.fetch(Some(vec![2])).await.unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, 2);
    }

    #[tokio::test]
    async fn test_fetch_error_takes_precedence() {
        let mut engine = MockEngine::new(vec![vec![record(1, "a")]]);
        engine.fail_next_fetch(EngineError::ConnectionRefused);

        assert!(engine.fetch(None).await.is_err());
        assert_eq!(engine.fetch(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_call_log_and_mutation_count() {
        let mut engine = MockEngine::new(vec![]);
        engine.fetch(None).await.unwrap();
        engine.start(3, true).await.unwrap();
        engine.remove(3, false).await.unwrap();
        engine.add_paused("magnet:?xt=x").await.unwrap();

        assert_eq!(engine.calls.len(), 4);
        assert_eq!(engine.mutation_calls(), 3);
        assert_eq!(engine.calls[1], EngineCall::Start { id: 3, force: true });
    }

    #[tokio::test]
    async fn test_failing_actions_still_recorded() {
        let mut engine = MockEngine::new(vec![]).with_failing_actions();

        assert!(engine.start(1, false).await.is_err());
        assert_eq!(engine.mutation_calls(), 1);
    }
}
