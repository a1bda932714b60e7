//! The seven-layer keymap for the 36-key split board.
//!
//! Each half is 3 rows of 5 columns plus 3 thumb keys; positions are indexed
//! row-major over the 10-column rows, thumbs last (left cluster then right).
//!
//! The layer set started from the Miryoku arrangement and was trimmed down
//! for a trackball-equipped right half.

use crate::keystate::prelude::*;
use crate::keystate::{Keymap, KeymapConfig, Layer};
use crate::light::{self, Hsv};

pub const ROWS: usize = 3;
pub const COLS: usize = 10;
pub const THUMBS: usize = 6;
pub const SIZE: usize = ROWS * COLS + THUMBS;
pub const LAYERS: usize = 7;

pub const BASE: Layer = 0;
pub const FUNCTION: Layer = 1;
pub const NAVIGATION: Layer = 2;
pub const MEDIA: Layer = 3;
pub const POINTER: Layer = 4;
pub const NUMERAL: Layer = 5;
pub const SYMBOLS: Layer = 6;

pub type KeymapT = Keymap<SIZE, LAYERS>;

/// Which half of the split a key sits on; the modifier highlight only paints
/// the half the held key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    Left,
    Right,
}

pub fn side_of(index: usize) -> Side {
    if index < ROWS * COLS {
        if index % COLS < COLS / 2 {
            Side::Left
        } else {
            Side::Right
        }
    } else if index < ROWS * COLS + THUMBS / 2 {
        Side::Left
    } else {
        Side::Right
    }
}

/// Layer → solid colour. The base layer is deliberately unlit.
pub fn layer_color(layer: Layer) -> Hsv {
    match layer {
        FUNCTION => light::BLUE,
        NAVIGATION => light::GREEN,
        MEDIA => light::YELLOW,
        POINTER => light::CYAN,
        NUMERAL => light::ORANGE,
        SYMBOLS => light::MAGENTA,
        _ => light::OFF,
    }
}

// For alignment with `vi]:EasyAlign <C-r>4<CR>*,
#[rustfmt::skip]
pub fn keymap(config: KeymapConfig) -> KeymapT {
    Keymap::new([
        [ // Base: QWERTY with GACS home-row mods; Z and / reach the pointer
          // layer, the thumbs are layer-taps.
            Kb(Q),            Kb(W),            Kb(E),            Kb(R),            Kb(T),
            Kb(Y),            Kb(U),            Kb(I),            Kb(O),            Kb(P),
            MT(LGUI, A),      MT(LALT, S),      MT(LCTL, D),      MT(LSFT, F),      Kb(G),
            Kb(H),            MT(RSFT, J),      MT(RCTL, K),      MT(LALT, L),      MT(RGUI, Apostrophe),
            LT(POINTER, Z),   Kb(X),            Kb(C),            Kb(V),            Kb(B),
            Kb(N),            Kb(M),            Kb(Comma),        Kb(Dot),          LT(POINTER, ForwardSlash),
            LT(NUMERAL, DeleteBackspace), LT(NAVIGATION, Space), LT(FUNCTION, Tab),
            LT(MEDIA, Escape), LT(NUMERAL, DeleteForward), LT(SYMBOLS, ReturnEnter),
        ],
        [ // Function: F-keys mirroring the numerals, system keys on the inner
          // column, GACS on the left home row.
            Kb(___),          Kb(___),          Kb(___),          Kb(___),          Kb(___),
            Kb(PrintScreen),  Kb(F7),           Kb(F8),           Kb(F9),           Kb(F12),
            Kb(LGUI),         Kb(LALT),         Kb(LCTL),         Kb(LSFT),         Kb(___),
            Kb(ScrollLock),   Kb(F4),           Kb(F5),           Kb(F6),           Kb(F11),
            Kb(___),          Kb(___),          Kb(___),          Kb(___),          Kb(___),
            Kb(Pause),        Kb(F1),           Kb(F2),           Kb(F3),           Kb(F10),
            Kb(Space),        Kb(DeleteBackspace), Kb(___),
            Kb(ReturnEnter),  Kb(DeleteForward), Cs(MPLY),
        ],
        [ // Navigation: cursor on the right home row, page movement below,
          // thumbs duplicated from base for mid-edit auto-repeat.
            Kb(___),          Kb(___),          Kb(___),          Kb(___),          Kb(___),
            Kb(___),          Kb(___),          Kb(___),          Kb(___),          Kb(___),
            Kb(LGUI),         Kb(LALT),         Kb(LCTL),         Kb(LSFT),         Kb(___),
            Kb(LeftArrow),    Kb(DownArrow),    Kb(UpArrow),      Kb(RightArrow),   Kb(CapsLock),
            Kb(___),          Kb(___),          Kb(___),          Kb(___),          Kb(___),
            Kb(Home),         Kb(PageDown),     Kb(PageUp),       Kb(End),          Kb(Insert),
            Kb(___),          Kb(DeleteBackspace), Kb(Tab),
            Kb(ReturnEnter),  Kb(DeleteForward), Kb(___),
        ],
        [ // Media: symmetrical so either hand can drive it.
            Kb(___),          Cu(RgbPrevMode),  Cu(RgbToggle),    Cu(RgbNextMode),  Kb(___),
            Kb(___),          Cu(RgbPrevMode),  Cu(RgbToggle),    Cu(RgbNextMode),  Kb(___),
            Cs(MPRV),         Cs(VOLD),         Cs(MUTE),         Cs(VOLU),         Cs(MNXT),
            Cs(MPRV),         Cs(VOLD),         Cs(MUTE),         Cs(VOLU),         Cs(MNXT),
            Kb(___),          Kb(___),          Kb(___),          Cu(FactoryReset), Cu(Bootloader),
            Cu(Bootloader),   Cu(FactoryReset), Kb(___),          Kb(___),          Kb(___),
            Cs(MPLY),         Cs(MSTP),         Cs(MSTP),
            Cs(MSTP),         Cs(MPLY),         Cs(MPLY),
        ],
        [ // Pointer: mouse buttons on the thumbs, CPI stepping and the
          // momentary precision/drag-scroll modes.
            Cu(Bootloader),   Cu(FactoryReset), Kb(___),          Cu(CpiIncrease),  Cu(CpiDecrease),
            Cu(CpiDecrease),  Cu(CpiIncrease),  Kb(___),          Cu(FactoryReset), Cu(Bootloader),
            Kb(LGUI),         Kb(LALT),         Kb(LCTL),         Kb(LSFT),         Kb(___),
            Kb(___),          Kb(LSFT),         Kb(LCTL),         Kb(LALT),         Kb(LGUI),
            Kb(___),          Cu(DragScroll),   Cu(Sniping),      Kb(___),          Kb(___),
            Kb(___),          Kb(___),          Cu(Sniping),      Cu(DragScroll),   Kb(___),
            Cu(MouseButton(2)), Cu(MouseButton(1)), Cu(MouseButton(3)),
            Cu(MouseButton(3)), Cu(MouseButton(1)), Kb(___),
        ],
        [ // Numeral: numpad arrangement with the leftover symbols around it.
            Kb(LeftBrace),    Kb(K7),           Kb(K8),           Kb(K9),           Kb(RightBrace),
            Kb(___),          Kb(___),          Kb(___),          Kb(___),          Kb(___),
            Kb(Semicolon),    Kb(K4),           Kb(K5),           Kb(K6),           Kb(Equal),
            Kb(___),          Kb(LSFT),         Kb(LCTL),         Kb(LALT),         Kb(LGUI),
            Kb(Grave),        Kb(K1),           Kb(K2),           Kb(K3),           Kb(Backslash),
            Kb(___),          Kb(___),          Kb(___),          Kb(___),          Kb(___),
            Kb(Dot),          Kb(K0),           Kb(Minus),
            Kb(ReturnEnter),  Kb(___),          Cs(MPLY),
        ],
        [ // Symbols: the shifted counterparts of the numeral layer, same
          // positions to keep chording flat.
            Sh(LeftBrace),    Sh(K7),           Sh(K8),           Sh(K9),           Sh(RightBrace),
            Kb(___),          Kb(___),          Kb(___),          Kb(___),          Kb(___),
            Sh(Semicolon),    Sh(K4),           Sh(K5),           Sh(K6),           Sh(Equal),
            Kb(___),          Kb(LSFT),         Kb(LCTL),         Kb(LALT),         Kb(LGUI),
            Sh(Grave),        Sh(K1),           Sh(K2),           Sh(K3),           Sh(Backslash),
            Kb(___),          Kb(___),          Kb(___),          Kb(___),          Kb(___),
            Sh(K9),           Sh(K0),           Sh(Minus),
            Kb(___),          Kb(DeleteForward), Cs(MPLY),
        ],
    ], config)
}
