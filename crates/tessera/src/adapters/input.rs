//! Input polling.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tessera_shared::Vec2;

/// Edge state of one button for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// Went down this frame
    pub just_pressed: bool,
    /// Is down
    pub held: bool,
    /// Went up this frame
    pub just_released: bool,
}

impl ButtonState {
    /// Not touched.
    pub const IDLE: Self = Self {
        just_pressed: false,
        held: false,
        just_released: false,
    };

    /// Press edge. The button also counts as held.
    pub const PRESSED: Self = Self {
        just_pressed: true,
        held: true,
        just_released: false,
    };

    /// Down since an earlier frame.
    pub const HELD: Self = Self {
        just_pressed: false,
        held: true,
        just_released: false,
    };

    /// Release edge.
    pub const RELEASED: Self = Self {
        just_pressed: false,
        held: false,
        just_released: true,
    };
}

/// Everything the input systems need from one poll.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputFrame {
    /// Cursor in world space
    pub cursor: Vec2,
    /// Left button
    pub left: ButtonState,
    /// Right button
    pub right: ButtonState,
}

impl InputFrame {
    /// No buttons touched, cursor at `cursor`.
    #[must_use]
    pub const fn idle(cursor: Vec2) -> Self {
        Self {
            cursor,
            left: ButtonState::IDLE,
            right: ButtonState::IDLE,
        }
    }
}

/// Platform input polled once per frame.
pub trait InputSource {
    /// Returns the state for the current frame.
    fn poll(&mut self) -> InputFrame;
}

#[derive(Debug, Default)]
struct ScriptState {
    frames: VecDeque<InputFrame>,
    cursor: Vec2,
}

/// Queue-backed [`InputSource`].
///
/// Each poll pops one frame. An empty queue yields an idle frame at the
/// last cursor position.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    state: Rc<RefCell<ScriptState>>,
}

/// Handle that feeds a [`ScriptedInput`] after it was moved into a system.
#[derive(Clone, Debug)]
pub struct InputScript {
    state: Rc<RefCell<ScriptState>>,
}

impl ScriptedInput {
    /// Creates an empty source and a handle to script it.
    #[must_use]
    pub fn new() -> (Self, InputScript) {
        let source = Self::default();
        let script = InputScript {
            state: Rc::clone(&source.state),
        };
        (source, script)
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputFrame {
        let mut state = self.state.borrow_mut();
        match state.frames.pop_front() {
            Some(frame) => {
                state.cursor = frame.cursor;
                frame
            }
            None => InputFrame::idle(state.cursor),
        }
    }
}

impl InputScript {
    /// Queues a raw frame.
    pub fn push(&self, frame: InputFrame) {
        self.state.borrow_mut().frames.push_back(frame);
    }

    /// Queues `count` idle frames at the last queued cursor position.
    pub fn wait(&self, count: usize) {
        let mut state = self.state.borrow_mut();
        let cursor = state.frames.back().map_or(state.cursor, |frame| frame.cursor);
        state.frames.extend(std::iter::repeat(InputFrame::idle(cursor)).take(count));
    }

    /// Queues a left press at `position`.
    pub fn press_left(&self, position: Vec2) {
        self.push(InputFrame {
            cursor: position,
            left: ButtonState::PRESSED,
            right: ButtonState::IDLE,
        });
    }

    /// Queues a left release at `position`.
    pub fn release_left(&self, position: Vec2) {
        self.push(InputFrame {
            cursor: position,
            left: ButtonState::RELEASED,
            right: ButtonState::IDLE,
        });
    }

    /// Queues a left press followed by a release on the next frame.
    pub fn click_left(&self, position: Vec2) {
        self.press_left(position);
        self.release_left(position);
    }

    /// Queues a right press followed by a release on the next frame.
    pub fn click_right(&self, position: Vec2) {
        self.push(InputFrame {
            cursor: position,
            left: ButtonState::IDLE,
            right: ButtonState::PRESSED,
        });
        self.push(InputFrame {
            cursor: position,
            left: ButtonState::IDLE,
            right: ButtonState::RELEASED,
        });
    }

    /// Frames not yet polled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.state.borrow().frames.len()
    }
}
