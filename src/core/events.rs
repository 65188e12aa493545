//! Timer events in both directions between the host and the autosplitter

use serde::{Deserialize, Serialize};

/// Something the host timer did, reported back to the autosplitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    Started,
    Split,
    UndoSplit,
    Reset,
}

/// An action the autosplitter asks the host timer to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitterAction {
    Start,
    Split,
    Reset,
}

/// Handle returned by [`EventHandler::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Callback type for splitter actions
pub type ActionCallback = Box<dyn FnMut(SplitterAction) + Send>;

/// Event handler that can have multiple listeners
pub struct EventHandler {
    callbacks: Vec<(ListenerId, ActionCallback)>,
    next_id: u64,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
            next_id: 0,
        }
    }

    /// Add a listener for splitter actions
    pub fn subscribe(&mut self, callback: ActionCallback) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, callback));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(listener, _)| *listener != id);
        self.callbacks.len() != before
    }

    /// Deliver an action to all listeners, in registration order
    pub fn emit(&mut self, action: SplitterAction) {
        for (_, callback) in self.callbacks.iter_mut() {
            callback(action);
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
