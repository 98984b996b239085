//! State Store
//!
//! Where a [`Dashboard`](crate::dashboard::Dashboard) keeps its view state.

use super::{Action, ViewState};

/// Owner of a [`ViewState`] that only changes through the reducer.
///
/// A plain `ViewState` is its own store. Reactive hosts implement this over
/// their signal so each action is observed as soon as it is applied.
pub trait StateStore {
    /// Run the reducer on `action`
    fn dispatch(&mut self, action: Action);

    /// Read the current state
    fn read<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R;
}

impl StateStore for ViewState {
    fn dispatch(&mut self, action: Action) {
        self.apply(action);
    }

    fn read<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        f(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_state_is_its_own_store() {
        let mut state = ViewState::new();
        StateStore::dispatch(&mut state, Action::HealthChecked("ok".to_string()));
        assert_eq!(state.read(|s| s.health.clone()), "ok");
    }
}
