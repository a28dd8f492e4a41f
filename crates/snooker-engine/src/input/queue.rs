/// Raw input the session understands. Positions are canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A press began at (x, y).
    PointerDown { x: f32, y: f32 },
    /// A press ended at (x, y).
    PointerUp { x: f32, y: f32 },
    /// The cursor moved to (x, y).
    PointerMove { x: f32, y: f32 },
    /// A full click (press and release) at (x, y).
    Click { x: f32, y: f32 },
    /// A key was pressed. Browser `keyCode` values.
    KeyDown { key_code: u32 },
}

/// Menu choices reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSignal {
    Standard,
    RandomReds,
    AllRandom,
    ExtremeInstructions,
    Confirm,
}

pub const KEY_ENTER: u32 = 13;
pub const KEY_1: u32 = 49;
pub const KEY_2: u32 = 50;
pub const KEY_3: u32 = 51;
pub const KEY_4: u32 = 52;

impl MenuSignal {
    pub fn from_key_code(key_code: u32) -> Option<Self> {
        match key_code {
            KEY_1 => Some(MenuSignal::Standard),
            KEY_2 => Some(MenuSignal::RandomReds),
            KEY_3 => Some(MenuSignal::AllRandom),
            KEY_4 => Some(MenuSignal::ExtremeInstructions),
            KEY_ENTER => Some(MenuSignal::Confirm),
            _ => None,
        }
    }
}

/// A queue of input events.
/// The host pushes events as they happen; the session drains them once per tick.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        q.push(InputEvent::KeyDown { key_code: KEY_1 });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events[1], InputEvent::KeyDown { key_code: 49 });
        assert!(q.is_empty());
    }

    #[test]
    fn menu_keys() {
        assert_eq!(MenuSignal::from_key_code(49), Some(MenuSignal::Standard));
        assert_eq!(MenuSignal::from_key_code(50), Some(MenuSignal::RandomReds));
        assert_eq!(MenuSignal::from_key_code(51), Some(MenuSignal::AllRandom));
        assert_eq!(MenuSignal::from_key_code(52), Some(MenuSignal::ExtremeInstructions));
        assert_eq!(MenuSignal::from_key_code(13), Some(MenuSignal::Confirm));
        assert_eq!(MenuSignal::from_key_code(32), None);
    }
}
