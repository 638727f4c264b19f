//! Input channels and actions: named, subscribable tables of bindings
//! evaluated against a frame's events.
//!
//! Grounded on `original_source/.../Engine/InputSystem.hpp`'s
//! `InputActionCreateInfo` (`value_type`/`action_type`/`binding_type`/
//! `source`/`input_keys`) and `UpdateInput`'s per-channel, per-action
//! evaluation pass. `composite_up_down_right_left` evaluates to
//! `(right_held - left_held, up_held - down_held)` per spec §4.5.

use smallvec::SmallVec;

use crate::input::event::{InputEvent, KeyInfo};
use crate::input::key::KeyboardKey;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ValueType {
    Bool,
    Float,
    Float2,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActionType {
    Value,
    Button,
    Direct,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BindingType {
    Binding,
    /// `keys[0] = up, keys[1] = down, keys[2] = right, keys[3] = left`.
    CompositeUpDownRightLeft,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InputSource {
    Keyboard,
    Mouse,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CachedValue {
    pub bool_value: bool,
    pub float_value: f32,
    pub float2_value: (f32, f32),
    pressed_this_frame: bool,
    released_this_frame: bool,
}

pub struct InputActionCreateInfo {
    pub value_type: ValueType,
    pub action_type: ActionType,
    pub binding_type: BindingType,
    pub source: InputSource,
    /// Up to 4 keys, matching the source's `FixedArray<InputKey, 4>`.
    pub keys: SmallVec<[KeyboardKey; 4]>,
}

pub struct InputAction {
    pub name: String,
    pub value_type: ValueType,
    pub action_type: ActionType,
    pub binding_type: BindingType,
    pub source: InputSource,
    pub keys: SmallVec<[KeyboardKey; 4]>,
    cached: CachedValue,
    held: SmallVec<[bool; 4]>,
}

impl InputAction {
    fn new(name: String, create_info: InputActionCreateInfo) -> InputAction {
        let held_len = create_info.keys.len();
        InputAction {
            name,
            value_type: create_info.value_type,
            action_type: create_info.action_type,
            binding_type: create_info.binding_type,
            source: create_info.source,
            keys: create_info.keys,
            cached: CachedValue::default(),
            held: SmallVec::from_elem(false, held_len),
        }
    }

    fn key_index(&self, key: KeyboardKey) -> Option<usize> {
        self.keys.iter().position(|&k| k == key)
    }

    /// Applies one event to this action's held-key state and recomputes its
    /// cached value. Only keyboard-sourced actions respond to keyboard
    /// events (and likewise for mouse), matching the source's per-action
    /// `source` filter.
    fn apply_event(&mut self, event: &InputEvent) {
        let key_info: &KeyInfo = match (self.source, event) {
            (InputSource::Keyboard, InputEvent::Keyboard(info)) => info,
            _ => return,
        };

        if let Some(index) = self.key_index(key_info.scan_code) {
            let was_held = self.held[index];
            self.held[index] = key_info.pressed;
            if key_info.pressed && !was_held {
                self.cached.pressed_this_frame = true;
            }
            if !key_info.pressed && was_held {
                self.cached.released_this_frame = true;
            }
        }

        self.recompute_cached_value();
    }

    fn recompute_cached_value(&mut self) {
        match self.binding_type {
            BindingType::Binding => {
                let held = self.held.first().copied().unwrap_or(false);
                self.cached.bool_value = held;
                self.cached.float_value = if held { 1.0 } else { 0.0 };
            }
            BindingType::CompositeUpDownRightLeft => {
                let up = self.held.first().copied().unwrap_or(false) as i32 as f32;
                let down = self.held.get(1).copied().unwrap_or(false) as i32 as f32;
                let right = self.held.get(2).copied().unwrap_or(false) as i32 as f32;
                let left = self.held.get(3).copied().unwrap_or(false) as i32 as f32;
                self.cached.float2_value = (right - left, up - down);
            }
        }
    }

    fn begin_frame(&mut self) {
        self.cached.pressed_this_frame = false;
        self.cached.released_this_frame = false;
    }

    pub fn is_pressed(&self) -> bool {
        self.cached.pressed_this_frame
    }

    pub fn is_held(&self) -> bool {
        self.held.iter().any(|&h| h)
    }

    pub fn is_released(&self) -> bool {
        self.cached.released_this_frame
    }

    pub fn get_float(&self) -> f32 {
        if self.value_type == ValueType::Float {
            self.cached.float_value
        } else {
            0.0
        }
    }

    pub fn get_float2(&self) -> (f32, f32) {
        if self.value_type == ValueType::Float2 {
            self.cached.float2_value
        } else {
            (0.0, 0.0)
        }
    }
}

/// A named table of actions, subscribed to the event stream.
#[derive(Default)]
pub struct InputChannel {
    actions: Vec<InputAction>,
}

impl InputChannel {
    pub fn new() -> InputChannel {
        InputChannel::default()
    }

    pub fn create_action(&mut self, name: impl Into<String>, create_info: InputActionCreateInfo) -> usize {
        let index = self.actions.len();
        self.actions.push(InputAction::new(name.into(), create_info));
        index
    }

    pub fn find_action(&self, name: &str) -> Option<usize> {
        self.actions.iter().position(|a| a.name == name)
    }

    pub fn action(&self, index: usize) -> &InputAction {
        &self.actions[index]
    }

    /// Applies one frame's drained events to every action in this channel.
    pub fn update(&mut self, events: &[InputEvent]) {
        for action in &mut self.actions {
            action.begin_frame();
            for event in events {
                action.apply_event(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(key: KeyboardKey) -> InputActionCreateInfo {
        InputActionCreateInfo {
            value_type: ValueType::Bool,
            action_type: ActionType::Button,
            binding_type: BindingType::Binding,
            source: InputSource::Keyboard,
            keys: SmallVec::from_elem(key, 1),
        }
    }

    fn key_event(key: KeyboardKey, pressed: bool) -> InputEvent {
        InputEvent::Keyboard(KeyInfo {
            scan_code: key,
            utf16: 0,
            pressed,
        })
    }

    #[test]
    fn binding_action_reports_pressed_and_held() {
        let mut channel = InputChannel::new();
        let action = channel.create_action("jump", binding(KeyboardKey::SpaceBar));
        channel.update(&[key_event(KeyboardKey::SpaceBar, true)]);
        assert!(channel.action(action).is_pressed());
        assert!(channel.action(action).is_held());

        channel.update(&[]);
        assert!(!channel.action(action).is_pressed());
        assert!(channel.action(action).is_held());

        channel.update(&[key_event(KeyboardKey::SpaceBar, false)]);
        assert!(channel.action(action).is_released());
        assert!(!channel.action(action).is_held());
    }

    #[test]
    fn composite_axis_combines_four_keys() {
        let mut channel = InputChannel::new();
        let create_info = InputActionCreateInfo {
            value_type: ValueType::Float2,
            action_type: ActionType::Value,
            binding_type: BindingType::CompositeUpDownRightLeft,
            source: InputSource::Keyboard,
            keys: SmallVec::from_vec(vec![
                KeyboardKey::W,
                KeyboardKey::S,
                KeyboardKey::D,
                KeyboardKey::A,
            ]),
        };
        let action = channel.create_action("move", create_info);
        channel.update(&[key_event(KeyboardKey::W, true), key_event(KeyboardKey::D, true)]);
        assert_eq!(channel.action(action).get_float2(), (1.0, 1.0));
    }

    #[test]
    fn float_query_on_bool_action_returns_zero() {
        let mut channel = InputChannel::new();
        let action = channel.create_action("jump", binding(KeyboardKey::SpaceBar));
        channel.update(&[key_event(KeyboardKey::SpaceBar, true)]);
        assert_eq!(channel.action(action).get_float(), 0.0);
    }
}
