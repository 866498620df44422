//! Keyboard shortcuts resolved against an abstract input source.
//!
//! The front end implements [`InputState`] over whatever event system it
//! uses; the keymap turns the current key state into at most one [`Cmd`].

use crate::editing::commands::{Cmd, DEFAULT_PAGE_LINES, Motion};
use crate::editing::ParagraphStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable key, lowercase for letters
    Char(char),
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    Delete,
    Enter,
    Tab,
    Ctrl,
    Shift,
    Alt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        shift: false,
        alt: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        ctrl: false,
        shift: true,
        alt: false,
    };
    pub const CTRL_SHIFT: Modifiers = Modifiers {
        ctrl: true,
        shift: true,
        alt: false,
    };

    /// Modifier keys currently held
    pub fn held(input: &dyn InputState) -> Self {
        Self {
            ctrl: input.is_down(Key::Ctrl),
            shift: input.is_down(Key::Shift),
            alt: input.is_down(Key::Alt),
        }
    }
}

/// A key plus the exact modifiers that must be held with it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl Chord {
    pub const fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub const fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub const fn ctrl(key: Key) -> Self {
        Self::new(key, Modifiers::CTRL)
    }
}

/// Key state for one frame of input
pub trait InputState {
    /// Held down right now
    fn is_down(&self, key: Key) -> bool;
    /// Went down this frame
    fn is_pressed(&self, key: Key) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Keymap {
    bindings: Vec<(Chord, Cmd)>,
}

impl Default for Keymap {
    fn default() -> Self {
        let mut keymap = Self::empty();

        keymap.bind(Chord::ctrl(Key::Char('z')), Cmd::Undo);
        keymap.bind(Chord::ctrl(Key::Char('y')), Cmd::Redo);
        keymap.bind(Chord::ctrl(Key::Char('a')), Cmd::SelectAll);
        keymap.bind(Chord::ctrl(Key::Char('b')), Cmd::ToggleBold);
        keymap.bind(Chord::ctrl(Key::Char('i')), Cmd::ToggleItalic);
        keymap.bind(Chord::ctrl(Key::Char('u')), Cmd::ToggleUnderline);
        keymap.bind(Chord::ctrl(Key::Char(']')), Cmd::IncreaseFontSize);
        keymap.bind(Chord::ctrl(Key::Char('[')), Cmd::DecreaseFontSize);

        keymap.bind(Chord::plain(Key::Backspace), Cmd::Backspace);
        keymap.bind(Chord::plain(Key::Delete), Cmd::Delete);
        keymap.bind(Chord::plain(Key::Enter), Cmd::NewLine);

        let motions = [
            (Key::Left, Modifiers::NONE, Motion::Left),
            (Key::Right, Modifiers::NONE, Motion::Right),
            (Key::Up, Modifiers::NONE, Motion::Up),
            (Key::Down, Modifiers::NONE, Motion::Down),
            (Key::Left, Modifiers::CTRL, Motion::WordLeft),
            (Key::Right, Modifiers::CTRL, Motion::WordRight),
            (Key::Home, Modifiers::NONE, Motion::LineStart),
            (Key::End, Modifiers::NONE, Motion::LineEnd),
            (Key::Home, Modifiers::CTRL, Motion::DocumentStart),
            (Key::End, Modifiers::CTRL, Motion::DocumentEnd),
            (Key::PageUp, Modifiers::NONE, Motion::PageUp(DEFAULT_PAGE_LINES)),
            (Key::PageDown, Modifiers::NONE, Motion::PageDown(DEFAULT_PAGE_LINES)),
        ];
        for (key, modifiers, motion) in motions {
            keymap.bind(
                Chord::new(key, modifiers),
                Cmd::Move {
                    motion,
                    extend: false,
                },
            );
            let extended = Modifiers {
                shift: true,
                ..modifiers
            };
            keymap.bind(
                Chord::new(key, extended),
                Cmd::Move {
                    motion,
                    extend: true,
                },
            );
        }

        keymap.bind(
            Chord::ctrl(Key::Char('0')),
            Cmd::SetParagraphStyle(ParagraphStyle::Normal),
        );
        for (digit, level) in ('1'..='6').zip(1u8..) {
            if let Some(style) = ParagraphStyle::heading(level) {
                keymap.bind(Chord::ctrl(Key::Char(digit)), Cmd::SetParagraphStyle(style));
            }
        }

        keymap
    }
}

impl Keymap {
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Bind `chord` to `cmd`, replacing any existing binding of the chord
    pub fn bind(&mut self, chord: Chord, cmd: Cmd) {
        self.bindings.retain(|(bound, _)| *bound != chord);
        self.bindings.push((chord, cmd));
    }

    pub fn unbind(&mut self, chord: Chord) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|(bound, _)| *bound != chord);
        self.bindings.len() != before
    }

    pub fn get(&self, chord: Chord) -> Option<&Cmd> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == chord)
            .map(|(_, cmd)| cmd)
    }

    /// First binding whose key was pressed this frame with exactly its modifiers held
    pub fn resolve(&self, input: &dyn InputState) -> Option<Cmd> {
        let held = Modifiers::held(input);
        self.bindings
            .iter()
            .find(|(chord, _)| chord.modifiers == held && input.is_pressed(chord.key))
            .map(|(_, cmd)| cmd.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Default)]
    struct FakeInput {
        down: HashSet<Key>,
        pressed: HashSet<Key>,
    }

    impl FakeInput {
        fn press(modifiers: &[Key], key: Key) -> Self {
            let mut input = Self::default();
            input.down.extend(modifiers.iter().copied());
            input.down.insert(key);
            input.pressed.insert(key);
            input
        }
    }

    impl InputState for FakeInput {
        fn is_down(&self, key: Key) -> bool {
            self.down.contains(&key)
        }

        fn is_pressed(&self, key: Key) -> bool {
            self.pressed.contains(&key)
        }
    }

    #[test]
    fn test_ctrl_shortcuts() {
        let keymap = Keymap::default();

        let undo = FakeInput::press(&[Key::Ctrl], Key::Char('z'));
        assert_eq!(keymap.resolve(&undo), Some(Cmd::Undo));

        let heading = FakeInput::press(&[Key::Ctrl], Key::Char('3'));
        assert_eq!(
            keymap.resolve(&heading),
            Some(Cmd::SetParagraphStyle(ParagraphStyle::Heading3))
        );
    }

    #[test]
    fn test_modifiers_must_match_exactly() {
        let keymap = Keymap::default();

        let plain_z = FakeInput::press(&[], Key::Char('z'));
        assert_eq!(keymap.resolve(&plain_z), None);

        let ctrl_shift_z = FakeInput::press(&[Key::Ctrl, Key::Shift], Key::Char('z'));
        assert_eq!(keymap.resolve(&ctrl_shift_z), None);
    }

    #[test]
    fn test_shift_extends_motions() {
        let keymap = Keymap::default();

        let select_word = FakeInput::press(&[Key::Ctrl, Key::Shift], Key::Right);
        assert_eq!(
            keymap.resolve(&select_word),
            Some(Cmd::Move {
                motion: Motion::WordRight,
                extend: true
            })
        );

        let home = FakeInput::press(&[], Key::Home);
        assert_eq!(
            keymap.resolve(&home),
            Some(Cmd::Move {
                motion: Motion::LineStart,
                extend: false
            })
        );
    }

    #[test]
    fn test_bind_replaces_existing_chord() {
        let mut keymap = Keymap::default();
        let chord = Chord::ctrl(Key::Char('b'));

        keymap.bind(chord, Cmd::ToggleStrikethrough);

        assert_eq!(keymap.get(chord), Some(&Cmd::ToggleStrikethrough));
        let input = FakeInput::press(&[Key::Ctrl], Key::Char('b'));
        assert_eq!(keymap.resolve(&input), Some(Cmd::ToggleStrikethrough));
        assert!(keymap.unbind(chord));
        assert_eq!(keymap.resolve(&input), None);
    }

    #[test]
    fn test_held_key_without_press_does_nothing() {
        let keymap = Keymap::default();
        let mut input = FakeInput::default();
        input.down.insert(Key::Backspace);
        assert_eq!(keymap.resolve(&input), None);
    }
}
