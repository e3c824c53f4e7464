//! Shared harness for integration tests: a resolver wired to recording
//! messenger and stats sinks.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use cardroom::{
    ActionResolver, EngineConfig, GameEvent, Messenger, Recipient, SessionManager, StatsStore,
    StatsUpdate,
};

#[derive(Default)]
pub struct RecordingMessenger {
    events: Mutex<Vec<(Recipient, GameEvent)>>,
}

impl RecordingMessenger {
    pub fn events(&self) -> Vec<(Recipient, GameEvent)> {
        self.events.lock().clone()
    }

    pub fn count(&self, predicate: impl Fn(&GameEvent) -> bool) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|(_, event)| predicate(event))
            .count()
    }

    pub fn saw(&self, predicate: impl Fn(&GameEvent) -> bool) -> bool {
        self.count(predicate) > 0
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn notify(&self, recipient: Recipient, event: &GameEvent) {
        self.events.lock().push((recipient, event.clone()));
    }
}

#[derive(Default)]
pub struct RecordingStats {
    updates: Mutex<Vec<StatsUpdate>>,
}

impl RecordingStats {
    pub fn updates(&self) -> Vec<StatsUpdate> {
        self.updates.lock().clone()
    }
}

#[async_trait]
impl StatsStore for RecordingStats {
    async fn record(&self, update: StatsUpdate) {
        self.updates.lock().push(update);
    }
}

pub struct Harness {
    pub resolver: Arc<ActionResolver>,
    pub messenger: Arc<RecordingMessenger>,
    pub stats: Arc<RecordingStats>,
}

pub fn harness(config: EngineConfig) -> Harness {
    let messenger = Arc::new(RecordingMessenger::default());
    let stats = Arc::new(RecordingStats::default());
    let resolver = ActionResolver::new(
        SessionManager::new(config),
        messenger.clone(),
        stats.clone(),
    );
    Harness {
        resolver,
        messenger,
        stats,
    }
}
