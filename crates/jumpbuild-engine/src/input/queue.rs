use crossbeam_channel::{Receiver, Sender};

use crate::input::keys::{ActiveKeys, Key};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown { key: Key },
    KeyUp { key: Key },
    /// The window lost focus; nothing is held any more.
    FocusLost,
}

/// Key events in flight from the input layer to the frame loop.
///
/// Any thread may send through an [`InputSender`]; the frame loop folds
/// whatever arrived into the [`ActiveKeys`] set before each frame.
#[derive(Debug)]
pub struct InputQueue {
    tx: Sender<InputEvent>,
    rx: Receiver<InputEvent>,
}

/// Cloneable writing end of an [`InputQueue`].
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: Sender<InputEvent>,
}

impl InputSender {
    pub fn send(&self, event: InputEvent) {
        // The queue owns a receiver, so the channel is never disconnected
        // while it exists.
        let _ = self.tx.send(event);
    }

    pub fn key_down(&self, key: Key) {
        self.send(InputEvent::KeyDown { key });
    }

    pub fn key_up(&self, key: Key) {
        self.send(InputEvent::KeyUp { key });
    }
}

impl InputQueue {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> InputSender {
        InputSender { tx: self.tx.clone() }
    }

    pub fn push(&self, event: InputEvent) {
        let _ = self.tx.send(event);
    }

    /// Fold every pending event into `keys`, in arrival order. Returns how
    /// many were applied.
    pub fn apply_to(&self, keys: &ActiveKeys) -> usize {
        let mut applied = 0;
        for event in self.rx.try_iter() {
            match event {
                InputEvent::KeyDown { key } => keys.press(key),
                InputEvent::KeyUp { key } => keys.release(key),
                InputEvent::FocusLost => keys.clear(),
            }
            applied += 1;
        }
        applied
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
