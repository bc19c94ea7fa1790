//=========================================================================
// Scene Lifecycle Events
//=========================================================================
//
// Events the director dispatches as scenes move through their lifecycle,
// and the dispatch targets that receive them.
//
// Ordering per scene:
//   sceneenter → scenestart → (scenepause ⇄ sceneresume) → scenestop → sceneleave
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::stage::NodeId;

//=== SceneEventKind ======================================================

/// Lifecycle stage a scene event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneEventKind {
    Enter,
    Start,
    Pause,
    Resume,
    Stop,
    Leave,
}

impl SceneEventKind {
    /// Event name as observed by the rest of the engine.
    pub fn name(self) -> &'static str {
        match self {
            SceneEventKind::Enter => "sceneenter",
            SceneEventKind::Start => "scenestart",
            SceneEventKind::Pause => "scenepause",
            SceneEventKind::Resume => "sceneresume",
            SceneEventKind::Stop => "scenestop",
            SceneEventKind::Leave => "sceneleave",
        }
    }
}

impl fmt::Display for SceneEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//=== SceneEvent ==========================================================

/// A lifecycle event for one scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneEvent {
    pub kind: SceneEventKind,

    /// Registered id of the scene, or its name when played directly.
    pub scene: String,

    /// The scene's world node.
    pub node: NodeId,
}

impl SceneEvent {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

//=== EventDispatch =======================================================

/// Fire-and-forget sink for scene lifecycle events.
pub trait EventDispatch {
    fn dispatch(&mut self, event: SceneEvent);
}

/// Records events in order.
impl EventDispatch for Vec<SceneEvent> {
    fn dispatch(&mut self, event: SceneEvent) {
        self.push(event);
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDispatcher;

impl EventDispatch for NullDispatcher {
    fn dispatch(&mut self, _event: SceneEvent) {}
}

//=== ChannelDispatcher ===================================================

/// Fans scene events out to any number of channel subscribers.
///
/// Subscribers whose receiver was dropped are pruned on the next
/// dispatch. A full subscriber misses the event and a warning is logged.
#[derive(Debug)]
pub struct ChannelDispatcher {
    subscribers: Vec<Sender<SceneEvent>>,
    capacity: usize,
}

impl ChannelDispatcher {
    /// Creates a dispatcher whose subscriber channels hold `capacity` events.
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: Vec::new(),
            capacity,
        }
    }

    /// Opens a new subscription.
    pub fn subscribe(&mut self) -> Receiver<SceneEvent> {
        let (sender, receiver) = bounded(self.capacity);
        self.subscribers.push(sender);
        receiver
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl EventDispatch for ChannelDispatcher {
    fn dispatch(&mut self, event: SceneEvent) {
        self.subscribers
            .retain(|subscriber| match subscriber.try_send(event.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(dropped)) => {
                    warn!("Subscriber queue full, dropping {} for '{}'", dropped.kind, dropped.scene);
                    true
                }
                Err(TrySendError::Disconnected(_)) => false,
            });
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: SceneEventKind) -> SceneEvent {
        SceneEvent {
            kind,
            scene: "title".into(),
            node: NodeId(1),
        }
    }

    #[test]
    fn event_names() {
        assert_eq!(SceneEventKind::Enter.name(), "sceneenter");
        assert_eq!(SceneEventKind::Leave.name(), "sceneleave");
        assert_eq!(event(SceneEventKind::Stop).name(), "scenestop");
    }

    #[test]
    fn vec_records_in_order() {
        let mut log: Vec<SceneEvent> = Vec::new();
        log.dispatch(event(SceneEventKind::Enter));
        log.dispatch(event(SceneEventKind::Start));
        let kinds: Vec<_> = log.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, [SceneEventKind::Enter, SceneEventKind::Start]);
    }

    #[test]
    fn channel_fans_out() {
        let mut dispatcher = ChannelDispatcher::new(8);
        let first = dispatcher.subscribe();
        let second = dispatcher.subscribe();

        dispatcher.dispatch(event(SceneEventKind::Enter));

        assert_eq!(first.try_recv().unwrap().kind, SceneEventKind::Enter);
        assert_eq!(second.try_recv().unwrap().kind, SceneEventKind::Enter);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut dispatcher = ChannelDispatcher::new(8);
        let kept = dispatcher.subscribe();
        drop(dispatcher.subscribe());
        assert_eq!(dispatcher.subscriber_count(), 2);

        dispatcher.dispatch(event(SceneEventKind::Start));
        assert_eq!(dispatcher.subscriber_count(), 1);
        assert!(kept.try_recv().is_ok());
    }

    #[test]
    fn full_subscriber_is_kept() {
        let mut dispatcher = ChannelDispatcher::new(1);
        let receiver = dispatcher.subscribe();
        dispatcher.dispatch(event(SceneEventKind::Enter));
        dispatcher.dispatch(event(SceneEventKind::Start));

        assert_eq!(dispatcher.subscriber_count(), 1);
        assert_eq!(receiver.try_recv().unwrap().kind, SceneEventKind::Enter);
        assert!(receiver.try_recv().is_err());
    }
}
