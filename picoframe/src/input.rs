use bit_field::BitField;

use crate::platform;

bitflags::bitflags! {
    /// Live button register. Bit `n` is set while the button on GPIO `n` is held.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct ButtonState: u32 {
        const Y     = 1 << 16;
        const X     = 1 << 17;
        const A     = 1 << 18;
        const B     = 1 << 19;
        const DOWN  = 1 << 20;
        const RIGHT = 1 << 21;
        const LEFT  = 1 << 22;
        const UP    = 1 << 23;
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Button {
    Up = 23,
    Down = 20,
    Left = 22,
    Right = 21,
    A = 18,
    B = 19,
    X = 17,
    Y = 16,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::A,
        Button::B,
        Button::X,
        Button::Y,
    ];

    #[inline(always)]
    pub const fn id(self) -> u32 {
        self as u32
    }

    #[inline(always)]
    pub const fn mask(self) -> ButtonState {
        ButtonState::from_bits_retain(1 << self.id())
    }

    #[inline]
    pub fn pressed(self) -> bool {
        button(self.id())
    }

    /// Button by name, as used on the command line (`up`, `a`, ...).
    pub fn from_name(name: &str) -> Option<Button> {
        Button::ALL.into_iter().find(|b| b.name().eq_ignore_ascii_case(name))
    }

    pub const fn name(self) -> &'static str {
        match self {
            Button::Up => "up",
            Button::Down => "down",
            Button::Left => "left",
            Button::Right => "right",
            Button::A => "a",
            Button::B => "b",
            Button::X => "x",
            Button::Y => "y",
        }
    }
}

impl ButtonState {
    #[inline]
    pub fn is_pressed(&self, id: u32) -> bool {
        id < u32::BIT_LENGTH as u32 && self.bits().get_bit(id as usize)
    }
}

/// Whether button `id` is held right now. Unknown ids read as released.
///
/// No debouncing or latching: every call during one press returns `true`.
#[inline]
pub fn button(id: u32) -> bool {
    platform::get().buttons().is_pressed(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_match_named_flags() {
        assert_eq!(Button::Up.mask(), ButtonState::UP);
        assert_eq!(Button::Y.mask(), ButtonState::Y);
        let all = Button::ALL.iter().fold(ButtonState::empty(), |s, b| s | b.mask());
        assert_eq!(all, ButtonState::all());
    }

    #[test]
    fn state_reads_by_id() {
        let state = ButtonState::A | ButtonState::LEFT;
        assert!(state.is_pressed(18));
        assert!(state.is_pressed(22));
        assert!(!state.is_pressed(19));
        assert!(!state.is_pressed(32));
        assert!(!state.is_pressed(u32::MAX));
    }

    #[test]
    fn names_round_trip() {
        for b in Button::ALL {
            assert_eq!(Button::from_name(b.name()), Some(b));
        }
        assert_eq!(Button::from_name("START"), None);
        assert_eq!(Button::from_name("A"), Some(Button::A));
    }
}
