//! Translated input events and the global publication ring.
//!
//! Grounded on `original_source/.../OS/HID.h`'s `InputEvent`/`MouseInfo`/
//! `KeyInfo` (a tagged union there; a Rust enum here) and
//! `INPUT_EVENT_BUFFER_MAX = 64`. Spec §5's shared-resource policy: "the
//! event ring has a reader/writer lock; writers (OS callback) take write,
//! `poll` takes write to drain." Overflow wraps — the oldest event is
//! dropped rather than blocking the producer.

use parking_lot::RwLock;

use crate::input::key::KeyboardKey;

pub const RING_CAPACITY: usize = 64;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KeyInfo {
    pub scan_code: KeyboardKey,
    pub utf16: u16,
    pub pressed: bool,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MouseInfo {
    pub move_offset: (f32, f32),
    pub mouse_pos: (f32, f32),
    pub wheel_move: i16,
    pub left_pressed: bool,
    pub left_released: bool,
    pub right_pressed: bool,
    pub right_released: bool,
    pub middle_pressed: bool,
    pub middle_released: bool,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent {
    Keyboard(KeyInfo),
    Mouse(MouseInfo),
}

struct RingState {
    slots: [Option<InputEvent>; RING_CAPACITY],
    head: usize,
    len: usize,
}

/// A fixed-capacity ring buffer of translated events. Producers
/// (`push_event`, called from the OS callback) and the consumer (`drain`,
/// called once per frame by `update_input`) both take the write lock since
/// either may mutate `head`/`len` — the source's single writer-lock
/// discipline collapsed into one `RwLock` since Rust has no separate
/// "OS-thread write, main-thread drain-write" distinction to model.
pub struct EventRing {
    state: RwLock<RingState>,
}

impl EventRing {
    pub fn new() -> EventRing {
        EventRing {
            state: RwLock::new(RingState {
                slots: [None; RING_CAPACITY],
                head: 0,
                len: 0,
            }),
        }
    }

    /// Pushes one event. If the ring is full, the oldest event is overwritten
    /// (wrap-around drop) — the producer never blocks.
    pub fn push_event(&self, event: InputEvent) {
        let mut state = self.state.write();
        let tail = (state.head + state.len) % RING_CAPACITY;
        state.slots[tail] = Some(event);
        if state.len < RING_CAPACITY {
            state.len += 1;
        } else {
            state.head = (state.head + 1) % RING_CAPACITY;
        }
    }

    /// Drains every pending event in publication order, leaving the ring
    /// empty for the next frame.
    pub fn drain(&self) -> Vec<InputEvent> {
        let mut state = self.state.write();
        let mut events = Vec::with_capacity(state.len);
        for i in 0..state.len {
            let index = (state.head + i) % RING_CAPACITY;
            if let Some(event) = state.slots[index].take() {
                events.push(event);
            }
        }
        state.head = 0;
        state.len = 0;
        events
    }

    pub fn len(&self) -> usize {
        self.state.read().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventRing {
    fn default() -> Self {
        EventRing::new()
    }
}
