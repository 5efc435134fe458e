//! Pointer interactions reported by the host UI
//!
//! A panel subscribes when it mounts and drops its subscription when it
//! unmounts; nothing keeps listening after the panel is gone.

use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::domain::block::FieldKey;

/// Default number of buffered pointer events per listener
pub const DEFAULT_BUS_CAPACITY: usize = 64;

/// What a pointer press landed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    Field(FieldKey),
    Popup,
    FunctionPicker,
    Outside,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerEvent {
    pub target: PointerTarget,
}

/// Host-side broadcaster of pointer events
#[derive(Debug, Clone)]
pub struct InteractionBus {
    sender: broadcast::Sender<PointerEvent>,
}

impl InteractionBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Broadcast a pointer press, returning how many panels received it
    pub fn publish(&self, target: PointerTarget) -> usize {
        self.sender.send(PointerEvent { target }).unwrap_or(0)
    }

    pub fn subscribe(&self) -> PointerSubscription {
        PointerSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of live subscriptions
    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for InteractionBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

/// A panel's registration on the bus; dropping it deregisters
#[derive(Debug)]
pub struct PointerSubscription {
    receiver: broadcast::Receiver<PointerEvent>,
}

impl PointerSubscription {
    /// Take every pending event.
    ///
    /// Events lost to lag are reported as a single outside press.
    pub fn drain(&mut self) -> Vec<PointerTarget> {
        let mut targets = Vec::new();

        loop {
            match self.receiver.try_recv() {
                Ok(event) => targets.push(event.target),
                Err(TryRecvError::Lagged(_)) => targets.push(PointerTarget::Outside),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }

        targets
    }
}
