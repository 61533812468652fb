/// Keyboard state tracker.
///
/// Tracks which keys are currently held down, enabling:
///   - Continuous running and climbing while a key is held
///   - Held jump for the variable-height cut
///   - Edge-triggered jump, cast and menu keys (initial press only)
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::FrameInput;

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

// ── Key bindings ──

pub const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
pub const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
pub const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
pub const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
pub const KEYS_JUMP: &[KeyCode] = &[KeyCode::Char(' '), KeyCode::Char('k'), KeyCode::Char('K')];
pub const KEYS_CAST: &[KeyCode] = &[
    KeyCode::Char('j'), KeyCode::Char('J'),
    KeyCode::Char('x'), KeyCode::Char('X'),
];
pub const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter];
pub const KEYS_NEXT_SPELL: &[KeyCode] = &[KeyCode::Tab, KeyCode::Char('l'), KeyCode::Char('L')];
pub const KEY_PAUSE: KeyCode = KeyCode::F(1);
pub const KEY_RESTART: KeyCode = KeyCode::F(2);
pub const KEY_DEBUG: KeyCode = KeyCode::F(3);
pub const KEY_QUIT: KeyCode = KeyCode::Esc;

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that transitioned from "not held" → "held" during the
    /// most recent drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    pub raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.handle_key(key);
            }
        }

        // Expire keys that have timed out (fallback for terminals without Release)
        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        self.raw_events.push(key);
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            // Without enhancement, rely on timeout-based expiry instead
            KeyEventKind::Release => {}
            _ => {
                let was_held = self.is_held(key.code);
                self.last_active.insert(key.code, Instant::now());
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    /// Is this key currently held down?
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.last_active
            .get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    /// Keyboard half of the tick's intents.
    pub fn frame_input(&self) -> FrameInput {
        FrameInput {
            left: self.any_held(KEYS_LEFT),
            right: self.any_held(KEYS_RIGHT),
            up: self.any_held(KEYS_UP),
            down: self.any_held(KEYS_DOWN),
            jump_held: self.any_held(KEYS_JUMP),
            jump_pressed: self.any_pressed(KEYS_JUMP),
            cast_pressed: self.any_pressed(KEYS_CAST),
        }
    }
}

/// Merge keyboard and gamepad intents: either device may drive any action.
pub fn merge(a: FrameInput, b: FrameInput) -> FrameInput {
    FrameInput {
        left: a.left || b.left,
        right: a.right || b.right,
        up: a.up || b.up,
        down: a.down || b.down,
        jump_held: a.jump_held || b.jump_held,
        jump_pressed: a.jump_pressed || b.jump_pressed,
        cast_pressed: a.cast_pressed || b.cast_pressed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: &mut InputState, code: KeyCode) {
        input.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn first_press_is_fresh_and_held() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::Char(' '));
        let f = input.frame_input();
        assert!(f.jump_pressed);
        assert!(f.jump_held);
        assert!(!f.cast_pressed);
    }

    #[test]
    fn key_repeat_is_not_a_fresh_press() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::Char('j'));
        input.fresh_presses.clear();
        press(&mut input, KeyCode::Char('j'));
        assert!(!input.frame_input().cast_pressed);
    }

    #[test]
    fn release_is_honored_only_with_enhancement() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::Left);
        let mut release = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;

        input.handle_key(release);
        assert!(input.frame_input().left, "release ignored without enhancement");

        input.honor_release = true;
        input.handle_key(release);
        assert!(!input.frame_input().left);
    }

    #[test]
    fn wasd_moves() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::Char('d'));
        press(&mut input, KeyCode::Char('s'));
        let f = input.frame_input();
        assert!(f.right && f.down);
        assert!(!f.left && !f.up);
    }

    #[test]
    fn ctrl_c_is_detected() {
        let mut input = InputState::new();
        input.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(input.ctrl_c_pressed());
    }

    #[test]
    fn merge_ors_every_field() {
        let a = FrameInput { left: true, jump_pressed: true, ..FrameInput::default() };
        let b = FrameInput { cast_pressed: true, jump_held: true, ..FrameInput::default() };
        let m = merge(a, b);
        assert!(m.left && m.jump_pressed && m.cast_pressed && m.jump_held);
        assert!(!m.right);
    }
}
