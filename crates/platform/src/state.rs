//! Render-loop lifecycle, kept free of windowing types so it can be tested.

use winit::event::{ElementState, WindowEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Uninitialized,
    Running,
    Closed,
}

/// The only distinctions the loop cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopEvent {
    Close,
    KeyPressed,
    Other,
}

impl LoopEvent {
    pub fn classify(event: &WindowEvent) -> Self {
        match event {
            WindowEvent::CloseRequested => LoopEvent::Close,
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                LoopEvent::KeyPressed
            }
            _ => LoopEvent::Other,
        }
    }
}

impl LoopState {
    /// Window and GPU are up.
    pub fn started(self) -> Self {
        match self {
            LoopState::Uninitialized => LoopState::Running,
            other => other,
        }
    }

    /// Initialization failed; nothing to render, nothing to release.
    pub fn failed(self) -> Self {
        match self {
            LoopState::Uninitialized => LoopState::Closed,
            other => other,
        }
    }

    /// Only a close request leaves `Running`.
    pub fn on_event(self, event: LoopEvent) -> Self {
        match (self, event) {
            (LoopState::Running, LoopEvent::Close) => LoopState::Closed,
            (state, _) => state,
        }
    }

    pub fn is_running(self) -> bool {
        self == LoopState::Running
    }
}
