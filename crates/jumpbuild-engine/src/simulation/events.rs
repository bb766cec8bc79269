use crossbeam_channel::{Receiver, Sender};

/// Notifications published by a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    ScoreChanged(u32),
    LivesChanged(i32),
    LevelWon,
    /// Lives ran out; the session has stopped.
    GameOver,
}

/// Fan-out of session events to any number of subscribers.
/// Subscribers that dropped their receiver are forgotten on the next publish.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<SessionEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn publish(&mut self, event: SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_receives_events() {
        let mut bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();
        bus.publish(SessionEvent::ScoreChanged(1));
        bus.publish(SessionEvent::LevelWon);
        assert_eq!(a.try_iter().collect::<Vec<_>>(), vec![SessionEvent::ScoreChanged(1), SessionEvent::LevelWon]);
        assert_eq!(b.try_iter().count(), 2);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut bus = EventBus::new();
        let keep = bus.subscribe();
        drop(bus.subscribe());
        bus.publish(SessionEvent::GameOver);
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(keep.recv().unwrap(), SessionEvent::GameOver);
    }
}
