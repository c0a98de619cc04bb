//! Host event queue
//!
//! The host pushes notifications into a single [`EventQueue`]; the workbench
//! drains it synchronously on the main thread (`SceneWorkbench::pump`).
//! There is no subscription list, so a handler can never be registered twice.
//!
//! Key principles:
//! - One inbound channel, delivered in the order events were sent
//! - Each event names the recomputation it requires ([`HostEvent::refreshes_load_state`])
//! - Clearing the queue drops stale events across a reload

use crate::transition::ModeTransition;

/// Notifications fired by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A scene was opened in edit mode
    SceneOpened {
        /// Scene path
        path: String,
    },
    /// A scene was closed in edit mode
    SceneClosed {
        /// Scene path
        path: String,
    },
    /// A scene finished loading in play mode
    SceneLoaded {
        /// Scene path
        path: String,
    },
    /// A scene is being unloaded this tick; `slot` is its load-order index
    SceneUnloading {
        /// Load-order index of the scene going away
        slot: usize,
    },
    /// A scene finished unloading in play mode
    SceneUnloaded {
        /// Scene path
        path: String,
    },
    /// The host is switching modes
    ModeChanged(ModeTransition),
    /// Assets were imported, moved or deleted
    AssetsChanged,
    /// The build configuration changed
    BuildSettingsChanged,
}

impl HostEvent {
    /// Whether the event can change the set of open scenes
    pub fn refreshes_load_state(&self) -> bool {
        matches!(
            self,
            Self::SceneOpened { .. }
                | Self::SceneClosed { .. }
                | Self::SceneLoaded { .. }
                | Self::SceneUnloading { .. }
                | Self::SceneUnloaded { .. }
        )
    }
}

/// FIFO queue of host events
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    immediate_queue: Vec<HostEvent>,
}

impl EventQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for the next dispatch
    pub fn send(&mut self, event: HostEvent) {
        self.immediate_queue.push(event);
    }

    /// Remove and return every pending event, oldest first
    pub fn drain(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.immediate_queue)
    }

    /// Append every event from another queue
    pub fn extend(&mut self, mut other: Self) {
        self.immediate_queue.append(&mut other.immediate_queue);
    }

    /// Drop all queued events (useful across a reload)
    pub fn clear(&mut self) {
        self.immediate_queue.clear();
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.immediate_queue.len()
    }

    /// Whether no events are pending
    pub fn is_empty(&self) -> bool {
        self.immediate_queue.is_empty()
    }

    /// Pending events, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &HostEvent> {
        self.immediate_queue.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_order() {
        let mut queue = EventQueue::new();
        queue.send(HostEvent::AssetsChanged);
        queue.send(HostEvent::ModeChanged(ModeTransition::ExitingEditMode));

        let events = queue.drain();
        assert_eq!(events[0], HostEvent::AssetsChanged);
        assert_eq!(events[1], HostEvent::ModeChanged(ModeTransition::ExitingEditMode));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_extend_and_clear() {
        let mut first = EventQueue::new();
        first.send(HostEvent::AssetsChanged);
        let mut second = EventQueue::new();
        second.send(HostEvent::BuildSettingsChanged);

        first.extend(second);
        assert_eq!(first.len(), 2);

        first.clear();
        assert!(first.is_empty());
    }

    #[test]
    fn test_load_state_events() {
        assert!(HostEvent::SceneUnloading { slot: 0 }.refreshes_load_state());
        assert!(HostEvent::SceneOpened { path: "Menu".to_string() }.refreshes_load_state());
        assert!(!HostEvent::AssetsChanged.refreshes_load_state());
        assert!(!HostEvent::ModeChanged(ModeTransition::ExitingPlayMode).refreshes_load_state());
    }
}
