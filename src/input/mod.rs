//! Input routing & channels (spec component C5): OS-translated events land
//! in a global ring, `update_input` fans them out to every subscribed
//! channel's actions. Grounded on `original_source/.../Engine/InputSystem.hpp`
//! and `OS/HID.h`.

pub mod channel;
pub mod event;
pub mod json;
pub mod key;

pub use channel::{ActionType, BindingType, InputAction, InputActionCreateInfo, InputChannel, InputSource, ValueType};
pub use event::{EventRing, InputEvent, KeyInfo, MouseInfo};
pub use key::KeyboardKey;

use std::collections::HashMap;

/// Owns the event ring and every channel created against it. `max_actions`
/// is recorded for parity with the source's arena-sized
/// `InitInputSystem(arena, max_actions)`, even though channels here grow a
/// plain `HashMap` rather than bump-allocating from a passed-in arena.
pub struct InputSystem {
    ring: EventRing,
    channels: HashMap<String, InputChannel>,
    max_actions: u32,
}

impl InputSystem {
    pub fn init_input_system(max_actions: u32) -> InputSystem {
        InputSystem {
            ring: EventRing::new(),
            channels: HashMap::new(),
            max_actions,
        }
    }

    /// The OS layer's translation callback calls this per raw event; never
    /// blocks, per spec §4.5.
    pub fn poll_os_events(&self, events: impl IntoIterator<Item = InputEvent>) {
        for event in events {
            self.ring.push_event(event);
        }
    }

    pub fn create_channel(&mut self, name: impl Into<String>) -> &mut InputChannel {
        self.channels.entry(name.into()).or_default()
    }

    pub fn channel(&self, name: &str) -> Option<&InputChannel> {
        self.channels.get(name)
    }

    /// Drains the event ring and applies the frame's events to every
    /// subscribed channel.
    pub fn update_input(&mut self) {
        let events = self.ring.drain();
        for channel in self.channels.values_mut() {
            channel.update(&events);
        }
    }

    pub fn max_actions(&self) -> u32 {
        self.max_actions
    }
}
