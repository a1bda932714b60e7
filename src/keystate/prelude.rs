//! For ease and shorthand when writing keymap layers
pub use super::CustomAction::*;
pub use super::KeyShorthand::*;
pub use super::Keyboard::*;

use super::{Consumer, Keyboard};
use paste::paste;

pub const NOP: Keyboard = NoEventIndicated;
pub const ___: Keyboard = NoEventIndicated;

macro_rules! digit_aliases {
    ( $( $n:literal ),* ) => {
        paste! {
            $( pub const [<K $n>]: Keyboard = Keyboard::[<Keyboard $n>]; )*
        }
    };
}
digit_aliases!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9);

pub const LSFT: Keyboard = LeftShift;
pub const LCTL: Keyboard = LeftControl;
pub const LALT: Keyboard = LeftAlt;
pub const LGUI: Keyboard = LeftGUI;
pub const RSFT: Keyboard = RightShift;
pub const RCTL: Keyboard = RightControl;
pub const RALT: Keyboard = RightAlt;
pub const RGUI: Keyboard = RightGUI;

// Consumer-page transport and volume keys; aliased because globbing both
// usage pages at once would collide.
pub const MPLY: Consumer = Consumer::PlayPause;
pub const MSTP: Consumer = Consumer::Stop;
pub const MPRV: Consumer = Consumer::ScanPreviousTrack;
pub const MNXT: Consumer = Consumer::ScanNextTrack;
pub const MUTE: Consumer = Consumer::Mute;
pub const VOLU: Consumer = Consumer::VolumeIncrement;
pub const VOLD: Consumer = Consumer::VolumeDecrement;
