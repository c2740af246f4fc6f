//! Background robot loading
//!
//! Parsing runs off the UI thread and delivers its completion over a
//! channel, tagged with the session token that requested it. There is no
//! cancellation of in-flight work; the controller drops completions whose
//! token is no longer current.

use std::sync::mpsc::{channel, Receiver, Sender};

use viewer_core::{load_robot_from_str, LoadError, LoadOptions, LoadedRobot, SessionToken};

use crate::app_state::UrdfSource;

/// Completion of one load session.
pub struct LoadComplete {
    pub token: SessionToken,
    pub result: Result<LoadedRobot, LoadError>,
}

/// Hands load work to a background thread and collects completions.
pub struct LoadWorker {
    tx: Sender<LoadComplete>,
    rx: Receiver<LoadComplete>,
}

impl LoadWorker {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self { tx, rx }
    }

    /// Start parsing the source for the given session.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn spawn(&self, source: UrdfSource, token: SessionToken) {
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let result = parse_source(&source);
            // The receiver is gone only when the app is shutting down
            let _ = tx.send(LoadComplete { token, result });
        });
    }

    /// No threads on wasm: parse inline. The completion still flows through
    /// the channel so the freshness check is identical on both targets.
    #[cfg(target_arch = "wasm32")]
    pub fn spawn(&self, source: UrdfSource, token: SessionToken) {
        let result = parse_source(&source);
        let _ = self.tx.send(LoadComplete { token, result });
    }

    /// Take the next completion, if one has arrived.
    pub fn poll(&self) -> Option<LoadComplete> {
        self.rx.try_recv().ok()
    }
}

impl Default for LoadWorker {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_source(source: &UrdfSource) -> Result<LoadedRobot, LoadError> {
    tracing::debug!(source = %source.name, bytes = source.bytes.len(), "parsing robot description");
    let xml = std::str::from_utf8(&source.bytes)
        .map_err(|e| LoadError::Parse(format!("source is not valid UTF-8: {e}")))?;
    load_robot_from_str(
        xml,
        &LoadOptions {
            base_dir: source.base_dir.clone(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use viewer_core::LoadSession;

    const MINIMAL_URDF: &[u8] = br#"
        <robot name="minimal">
          <link name="base_link">
            <visual><geometry><box size="1 1 1"/></geometry></visual>
          </link>
        </robot>
    "#;

    fn source(bytes: &[u8]) -> UrdfSource {
        UrdfSource {
            name: "test.urdf".into(),
            bytes: Arc::new(bytes.to_vec()),
            base_dir: None,
        }
    }

    fn wait_for(worker: &LoadWorker) -> LoadComplete {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(complete) = worker.poll() {
                return complete;
            }
            assert!(Instant::now() < deadline, "load never completed");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_completion_carries_token_and_model() {
        let worker = LoadWorker::new();
        let mut session = LoadSession::new();
        let token = session.begin();

        worker.spawn(source(MINIMAL_URDF), token);

        let complete = wait_for(&worker);
        assert_eq!(complete.token, token);
        let loaded = complete.result.unwrap();
        assert_eq!(loaded.link_names, vec!["base_link"]);
    }

    #[test]
    fn test_superseded_completion_detected_as_stale() {
        let worker = LoadWorker::new();
        let mut session = LoadSession::new();

        let stale_token = session.begin();
        worker.spawn(source(MINIMAL_URDF), stale_token);
        // A second request supersedes the first before it settles
        let fresh_token = session.begin();
        worker.spawn(source(MINIMAL_URDF), fresh_token);

        let mut applied = 0;
        for _ in 0..2 {
            let complete = wait_for(&worker);
            if session.is_current(complete.token) {
                applied += 1;
                assert_eq!(complete.token, fresh_token);
            }
        }
        // Exactly one of the two completions may be applied
        assert_eq!(applied, 1);
    }

    #[test]
    fn test_parse_failure_is_reported() {
        let worker = LoadWorker::new();
        let mut session = LoadSession::new();
        let token = session.begin();

        worker.spawn(source(b"not a robot"), token);

        let complete = wait_for(&worker);
        assert!(matches!(complete.result, Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let result = parse_source(&source(&[0xff, 0xfe, 0x00]));
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }
}
