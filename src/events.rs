use std::collections::VecDeque;

/// A discrete, already debounced user input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputEvent {
    /// Move to the next pattern
    Next,

    /// Accept the selected pattern
    Confirm,

    /// Nothing happened this iteration
    #[default]
    None,
}

/// Something the caller polls once per loop iteration for the next [`InputEvent`].
pub trait InputSource {
    fn poll(&mut self) -> InputEvent;
}

/// Replays a fixed list of events, then reports [`InputEvent::None`] forever.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    events: VecDeque<InputEvent>,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.events.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputEvent {
        self.events.pop_front().unwrap_or_default()
    }
}
