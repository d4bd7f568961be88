//! Shared init / reinit / dispose bookkeeping for the demo controllers.

use bevy::prelude::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DemoLifecycle {
    #[default]
    Uninitialized,
    Running,
    Disposed,
}

impl DemoLifecycle {
    pub fn is_running(&self) -> bool {
        *self == DemoLifecycle::Running
    }

    /// Move to `Running`. Returns false if already running, in which case
    /// the caller must not run its setup again.
    pub fn init(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        *self = DemoLifecycle::Running;
        true
    }

    /// Move to `Disposed`. Returns true only when teardown work is needed.
    pub fn dispose(&mut self) -> bool {
        let was_running = self.is_running();
        if *self != DemoLifecycle::Uninitialized {
            *self = DemoLifecycle::Disposed;
        }
        was_running
    }
}

/// Ask the active demo to tear down and start over.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct ReinitializeDemo;

/// Remove every emoji from the fountain.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct ClearFountain;

/// True once the primary window has a drawable area.
pub fn window_ready(window: &Window) -> bool {
    window.width() > 0.0 && window.height() > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_runs_once_until_disposed() {
        let mut lifecycle = DemoLifecycle::default();

        assert!(lifecycle.init());
        assert!(!lifecycle.init());
        assert!(lifecycle.dispose());
        assert_eq!(lifecycle, DemoLifecycle::Disposed);
        assert!(lifecycle.init());
    }

    #[test]
    fn dispose_is_idempotent_and_safe_before_init() {
        let mut lifecycle = DemoLifecycle::default();

        assert!(!lifecycle.dispose());
        assert_eq!(lifecycle, DemoLifecycle::Uninitialized);

        lifecycle.init();
        assert!(lifecycle.dispose());
        assert!(!lifecycle.dispose());
    }
}
