//! Per-screen request state (idle/loading/loaded/failed).
//!
//! One explicit enum per screen instead of separate loading, error and
//! result flags that can disagree with each other.

/// Request state for a screen that submits one query at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScreenState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    /// Holds the user-facing banner message.
    Failed(String),
}

impl<T> ScreenState<T> {
    /// True if a new submission can be started.
    pub fn can_submit(&self) -> bool {
        !self.is_loading()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ScreenState::Loading)
    }

    /// Enter `Loading`. Previous results and errors are discarded.
    pub fn begin(&mut self) {
        *self = ScreenState::Loading;
    }

    /// Leave `Loading` with the outcome of the request.
    pub fn finish<E>(&mut self, outcome: Result<T, E>, failure_message: &str) {
        *self = match outcome {
            Ok(value) => ScreenState::Loaded(value),
            Err(_) => ScreenState::Failed(failure_message.to_string()),
        };
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ScreenState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ScreenState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_allows_submit() {
        let s: ScreenState<u8> = ScreenState::Idle;
        assert!(s.can_submit());
        assert!(!s.is_loading());
    }

    #[test]
    fn loading_blocks_submit() {
        let mut s: ScreenState<u8> = ScreenState::Idle;
        s.begin();
        assert!(s.is_loading());
        assert!(!s.can_submit());
    }

    #[test]
    fn finish_ok_transitions_to_loaded() {
        let mut s: ScreenState<u8> = ScreenState::Loading;
        s.finish::<()>(Ok(7), "failed");
        assert_eq!(s, ScreenState::Loaded(7));
        assert_eq!(s.data(), Some(&7));
        assert!(s.can_submit());
    }

    #[test]
    fn finish_err_transitions_to_failed() {
        let mut s: ScreenState<u8> = ScreenState::Loading;
        s.finish(Err("boom"), "Failed to fetch. Please try again.");
        assert!(!s.is_loading());
        assert_eq!(s.error(), Some("Failed to fetch. Please try again."));
        assert_eq!(s.data(), None);
    }

    #[test]
    fn begin_discards_previous_result() {
        let mut s = ScreenState::Loaded(3u8);
        s.begin();
        assert_eq!(s.data(), None);
        assert_eq!(s.error(), None);
    }
}
