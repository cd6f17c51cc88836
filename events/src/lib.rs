//! Process-wide notification bus.
//!
//! Topic-keyed publish/subscribe so UI components learn about external state
//! changes without the core depending on any view layer. The bus is created
//! once at process start and passed explicitly (`Arc<EventBus>`) to whatever
//! publishes or subscribes; there is no hidden global.
//!
//! Listeners are invoked inline on the publishing task in subscription
//! order; keep handlers fast.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::RwLock;
use tcr_types::{DomainName, DomainStage};

/// Topic name for domain stage changes.
pub const STAGE_CHANGED: &str = "stageChanged";

/// Events published on the bus.
#[derive(Clone, Debug, Serialize)]
pub enum RegistryEvent {
    /// A domain's resolved stage differs from the previously known one.
    StageChanged {
        domain: DomainName,
        old_stage: DomainStage,
        new_stage: DomainStage,
    },
}

impl RegistryEvent {
    /// The topic this event is published under.
    pub fn topic(&self) -> &'static str {
        match self {
            RegistryEvent::StageChanged { .. } => STAGE_CHANGED,
        }
    }
}

type Listener = Box<dyn Fn(&RegistryEvent) + Send + Sync>;

/// Topic-keyed fan-out event bus.
///
/// Multiple subscribers per topic; delivery order is publish order; a
/// publish with no subscribers is a no-op, never an error.
pub struct EventBus {
    topics: RwLock<HashMap<&'static str, Vec<Listener>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribe a listener to a topic.
    pub fn subscribe(&self, topic: &'static str, listener: Listener) {
        let mut topics = self.topics.write().expect("event bus poisoned");
        topics.entry(topic).or_default().push(listener);
    }

    /// Publish an event to its topic's subscribers.
    pub fn publish(&self, event: &RegistryEvent) {
        let topics = self.topics.read().expect("event bus poisoned");
        if let Some(listeners) = topics.get(event.topic()) {
            for listener in listeners {
                listener(event);
            }
        }
    }

    /// Number of subscribers on a topic.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        let topics = self.topics.read().expect("event bus poisoned");
        topics.get(topic).map(|l| l.len()).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
