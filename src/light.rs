//! Colour types, the RGB-matrix seam and the highlight controller.
//!
//! The animation engine itself lives in the embedding firmware; this module
//! only decides *what* to show. [`Highlight`] owns the save/restore dance
//! around transient modifier highlighting, which used to be a pair of global
//! flags in earlier firmware.

use rgb::RGB8;

use crate::keystate::{Keyboard, Layer};
use crate::layout::{self, Side};

/// HSV triple with all channels in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    /// Wire-order conversion for drivers that take raw RGB.
    pub fn to_rgb(self) -> RGB8 {
        if self.s == 0 {
            return RGB8::new(self.v, self.v, self.v);
        }
        let region = self.h / 43;
        let remainder = (self.h - region * 43) as u16 * 6;
        let v = self.v as u16;
        let s = self.s as u16;
        let p = (v * (255 - s) >> 8) as u8;
        let q = (v * (255 - ((s * remainder) >> 8)) >> 8) as u8;
        let t = (v * (255 - ((s * (255 - remainder)) >> 8)) >> 8) as u8;
        match region {
            0 => RGB8::new(self.v, t, p),
            1 => RGB8::new(q, self.v, p),
            2 => RGB8::new(p, self.v, t),
            3 => RGB8::new(p, q, self.v),
            4 => RGB8::new(t, p, self.v),
            _ => RGB8::new(self.v, p, q),
        }
    }
}

pub const OFF: Hsv = Hsv::new(0, 0, 0);
pub const PINK: Hsv = Hsv::new(234, 128, 255);
pub const GREEN: Hsv = Hsv::new(85, 255, 255);
pub const BLUE: Hsv = Hsv::new(170, 255, 255);
pub const YELLOW: Hsv = Hsv::new(43, 255, 255);
pub const CYAN: Hsv = Hsv::new(128, 255, 255);
pub const ORANGE: Hsv = Hsv::new(21, 255, 255);
pub const MAGENTA: Hsv = Hsv::new(213, 255, 255);

/// Animation-mode id owned by the embedding firmware. The controller never
/// interprets it beyond carrying it through a save/restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RgbMode(pub u8);

/// Snapshot of the matrix taken before a highlight, to put back afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RgbState {
    pub mode: RgbMode,
    pub color: Hsv,
}

/// Which LEDs a solid fill covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedSpan {
    All,
    Left,
    Right,
}

impl From<Side> for LedSpan {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => LedSpan::Left,
            Side::Right => LedSpan::Right,
        }
    }
}

/// The framework-owned matrix setters this crate drives.
pub trait RgbMatrix {
    type Error;

    fn state(&self) -> RgbState;
    fn restore(&mut self, state: RgbState) -> Result<(), Self::Error>;
    /// Switch to the solid-colour mode and paint `span`.
    fn set_solid(&mut self, span: LedSpan, color: Hsv) -> Result<(), Self::Error>;
    fn toggle(&mut self) -> Result<(), Self::Error>;
    fn next_mode(&mut self) -> Result<(), Self::Error>;
    fn prev_mode(&mut self) -> Result<(), Self::Error>;
}

/// Colour a held home-row modifier paints its half with.
pub fn modifier_color(modifier: Keyboard) -> Option<Hsv> {
    match modifier {
        Keyboard::LeftGUI | Keyboard::RightGUI => Some(PINK),
        Keyboard::LeftAlt | Keyboard::RightAlt => Some(GREEN),
        Keyboard::LeftControl | Keyboard::RightControl => Some(BLUE),
        Keyboard::LeftShift | Keyboard::RightShift => Some(YELLOW),
        _ => None,
    }
}

/// Modifier-highlight state.
///
/// The matrix snapshot is captured once per highlight episode and put back
/// exactly once; overlapping holds ride on the first snapshot.
#[derive(Debug, Default)]
pub struct Highlight {
    saved: Option<RgbState>,
    active: bool,
}

impl Highlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a modifier currently owns the LEDs; layer colours stand back
    /// while this is set.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// A home-row modifier resolved to a hold: paint its half.
    pub fn mod_hold<R: RgbMatrix>(
        &mut self,
        matrix: &mut R,
        side: Side,
        modifier: Keyboard,
    ) -> Result<(), R::Error> {
        let Some(color) = modifier_color(modifier) else {
            return Ok(());
        };
        if self.saved.is_none() {
            self.saved = Some(matrix.state());
        }
        self.active = true;
        matrix.set_solid(side.into(), color)
    }

    /// A home-row modifier was released: put the saved state back and re-apply
    /// the active layer's colour.
    pub fn mod_release<R: RgbMatrix>(
        &mut self,
        matrix: &mut R,
        active_layer: Layer,
    ) -> Result<(), R::Error> {
        self.active = false;
        if let Some(saved) = self.saved.take() {
            matrix.restore(saved)?;
        }
        matrix.set_solid(LedSpan::All, layout::layer_color(active_layer))
    }

    /// The layer stack changed; show the new layer's colour unless a modifier
    /// highlight owns the LEDs.
    pub fn layer_changed<R: RgbMatrix>(
        &mut self,
        matrix: &mut R,
        layer: Layer,
    ) -> Result<(), R::Error> {
        if self.active {
            return Ok(());
        }
        matrix.set_solid(LedSpan::All, layout::layer_color(layer))
    }

    /// A layer-tap key went down or up: preview the target layer's colour on
    /// press, fall back to the active layer's on release.
    pub fn layer_tap<R: RgbMatrix>(
        &mut self,
        matrix: &mut R,
        layer: Layer,
        pressed: bool,
        active_layer: Layer,
    ) -> Result<(), R::Error> {
        if self.active {
            return Ok(());
        }
        let shown = if pressed { layer } else { active_layer };
        matrix.set_solid(LedSpan::All, layout::layer_color(shown))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use super::*;
    use crate::layout::{FUNCTION, NAVIGATION, SYMBOLS};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Restore(RgbState),
        Solid(LedSpan, Hsv),
    }

    struct FakeMatrix {
        state: RgbState,
        calls: Vec<Call>,
    }

    impl FakeMatrix {
        fn new() -> Self {
            Self {
                state: RgbState {
                    mode: RgbMode(7),
                    color: Hsv::new(12, 34, 56),
                },
                calls: Vec::new(),
            }
        }
    }

    impl RgbMatrix for FakeMatrix {
        type Error = ();

        fn state(&self) -> RgbState {
            self.state
        }

        fn restore(&mut self, state: RgbState) -> Result<(), ()> {
            self.state = state;
            self.calls.push(Call::Restore(state));
            Ok(())
        }

        fn set_solid(&mut self, span: LedSpan, color: Hsv) -> Result<(), ()> {
            self.state = RgbState {
                mode: RgbMode(0),
                color,
            };
            self.calls.push(Call::Solid(span, color));
            Ok(())
        }

        fn toggle(&mut self) -> Result<(), ()> {
            Ok(())
        }

        fn next_mode(&mut self) -> Result<(), ()> {
            Ok(())
        }

        fn prev_mode(&mut self) -> Result<(), ()> {
            Ok(())
        }
    }

    #[test]
    fn hold_paints_half_and_release_restores() {
        let mut matrix = FakeMatrix::new();
        let saved = matrix.state;
        let mut highlight = Highlight::new();

        highlight
            .mod_hold(&mut matrix, Side::Left, Keyboard::LeftShift)
            .unwrap();
        assert!(highlight.is_active());
        assert_eq!(matrix.calls, [Call::Solid(LedSpan::Left, YELLOW)]);

        highlight.mod_release(&mut matrix, 0).unwrap();
        assert!(!highlight.is_active());
        assert_eq!(
            matrix.calls[1..],
            [Call::Restore(saved), Call::Solid(LedSpan::All, OFF)]
        );
    }

    #[test]
    fn snapshot_taken_once_and_restored_once() {
        let mut matrix = FakeMatrix::new();
        let saved = matrix.state;
        let mut highlight = Highlight::new();

        highlight
            .mod_hold(&mut matrix, Side::Left, Keyboard::LeftGUI)
            .unwrap();
        // Second hold must not re-snapshot the already-highlighted matrix.
        highlight
            .mod_hold(&mut matrix, Side::Right, Keyboard::RightControl)
            .unwrap();
        assert_eq!(
            matrix.calls,
            [
                Call::Solid(LedSpan::Left, PINK),
                Call::Solid(LedSpan::Right, BLUE)
            ]
        );

        highlight.mod_release(&mut matrix, FUNCTION).unwrap();
        assert_eq!(matrix.calls[2], Call::Restore(saved));

        // A release with nothing saved only re-applies the layer colour.
        matrix.calls.clear();
        highlight.mod_release(&mut matrix, FUNCTION).unwrap();
        assert_eq!(matrix.calls, [Call::Solid(LedSpan::All, BLUE)]);
    }

    #[test]
    fn right_hand_alt_paints_right_green() {
        let mut matrix = FakeMatrix::new();
        let mut highlight = Highlight::new();

        // The L key holds left Alt but sits on the right half.
        highlight
            .mod_hold(&mut matrix, Side::Right, Keyboard::LeftAlt)
            .unwrap();
        assert_eq!(matrix.calls, [Call::Solid(LedSpan::Right, GREEN)]);
    }

    #[test]
    fn layer_color_deferred_while_highlighted() {
        let mut matrix = FakeMatrix::new();
        let mut highlight = Highlight::new();

        highlight.layer_changed(&mut matrix, SYMBOLS).unwrap();
        assert_eq!(matrix.calls, [Call::Solid(LedSpan::All, MAGENTA)]);

        highlight
            .mod_hold(&mut matrix, Side::Left, Keyboard::LeftControl)
            .unwrap();
        matrix.calls.clear();
        highlight.layer_changed(&mut matrix, NAVIGATION).unwrap();
        assert_eq!(matrix.calls, []);
    }

    #[test]
    fn layer_tap_previews_target_layer() {
        let mut matrix = FakeMatrix::new();
        let mut highlight = Highlight::new();

        highlight
            .layer_tap(&mut matrix, NAVIGATION, true, 0)
            .unwrap();
        highlight
            .layer_tap(&mut matrix, NAVIGATION, false, 0)
            .unwrap();
        assert_eq!(
            matrix.calls,
            [
                Call::Solid(LedSpan::All, GREEN),
                Call::Solid(LedSpan::All, OFF)
            ]
        );
    }

    #[test]
    fn non_modifier_hold_is_ignored() {
        let mut matrix = FakeMatrix::new();
        let mut highlight = Highlight::new();

        highlight
            .mod_hold(&mut matrix, Side::Left, Keyboard::A)
            .unwrap();
        assert!(!highlight.is_active());
        assert_eq!(matrix.calls, []);
    }

    #[test]
    fn hsv_conversion_endpoints() {
        assert_eq!(Hsv::new(0, 255, 255).to_rgb(), RGB8::new(255, 0, 0));
        assert_eq!(Hsv::new(0, 0, 128).to_rgb(), RGB8::new(128, 128, 128));
        assert_eq!(OFF.to_rgb(), RGB8::new(0, 0, 0));
    }
}
