//! Shared application state

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;

use viewer_core::{LoadError, LoadSession, SessionToken};
use viewer_renderer::{MissPolicy, Selection};

/// The selected robot description, held as an opaque blob: a display name,
/// the raw bytes, and (when it came from a file) the directory for
/// resolving relative mesh references. Resolved only at load time.
#[derive(Debug, Clone)]
pub struct UrdfSource {
    pub name: String,
    pub bytes: Arc<Vec<u8>>,
    pub base_dir: Option<std::path::PathBuf>,
}

/// Events emitted upward to the hosting UI.
#[derive(Debug, Clone)]
pub enum ViewerEvent {
    JointNamesChanged(Vec<String>),
    LinkNamesChanged(Vec<String>),
    LinkSelected(Option<String>),
    LoadFailed(LoadError),
}

/// Application state shared between the panels and the viewer controller.
pub struct AppState {
    pub source: Option<UrdfSource>,
    pub session: LoadSession,
    /// Raised by the Load button. The session token, not this flag, decides
    /// whether a reload actually happens; the flag may legitimately repeat.
    pub load_requested: bool,

    /// Requested camera direction name; empty means no preset.
    pub camera_direction: String,
    /// Requested geometry substitution name; empty means none.
    pub geometry_override: String,

    pub link_names: Vec<String>,
    pub joint_names: Vec<String>,
    pub joint_values: HashMap<String, f32>,
    pub joint_ranges: HashMap<String, (f32, f32)>,

    pub selection: Option<Selection>,
    pub miss_policy: MissPolicy,

    /// Last load failure, shown in the control panel.
    pub load_error: Option<String>,

    events: VecDeque<ViewerEvent>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            source: None,
            session: LoadSession::new(),
            load_requested: false,
            camera_direction: String::new(),
            geometry_override: String::new(),
            link_names: Vec::new(),
            joint_names: Vec::new(),
            joint_values: HashMap::new(),
            joint_ranges: HashMap::new(),
            selection: None,
            miss_policy: MissPolicy::default(),
            load_error: None,
            events: VecDeque::new(),
        }
    }

    /// Raise a load request and issue the token correlating its completion.
    pub fn request_load(&mut self) -> SessionToken {
        self.load_requested = true;
        self.load_error = None;
        self.session.begin()
    }

    pub fn emit(&mut self, event: ViewerEvent) {
        self.events.push_back(event);
    }

    pub fn next_event(&mut self) -> Option<ViewerEvent> {
        self.events.pop_front()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub type SharedAppState = Arc<Mutex<AppState>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_load_issues_fresh_token() {
        let mut state = AppState::new();
        let a = state.request_load();
        let b = state.request_load();
        assert!(state.load_requested);
        assert!(b > a);
        assert!(state.session.is_current(b));
        assert!(!state.session.is_current(a));
    }

    #[test]
    fn test_events_drain_in_order() {
        let mut state = AppState::new();
        state.emit(ViewerEvent::LinkNamesChanged(vec!["base_link".into()]));
        state.emit(ViewerEvent::JointNamesChanged(vec![]));

        assert!(matches!(state.next_event(), Some(ViewerEvent::LinkNamesChanged(_))));
        assert!(matches!(state.next_event(), Some(ViewerEvent::JointNamesChanged(_))));
        assert!(state.next_event().is_none());
    }
}
