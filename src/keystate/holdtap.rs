use super::Duration;
use super::Instant;
use super::Keyboard;
use super::Keyish;

/// Timing for the hold/tap decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HoldTapConfig {
    /// Time a press must outlive before it resolves to the hold binding
    pub hold_timeout: Duration,
    /// Time the tap binding is reported after release (it can only be
    /// reported after release, since only then is the press known not to be a
    /// hold)
    pub tap_release: Duration,
}

/// Raised when a press resolves to its hold binding, and when that hold ends.
/// The lighting layer keys its modifier highlight off these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HoldEdge {
    Started,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unpressed<H> {
    hold: H,
    tap: Keyboard,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wait<H> {
    hold: H,
    tap: Keyboard,
    hold_deadline: Instant,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hold<H> {
    hold: H,
    tap: Keyboard,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tap<H> {
    hold: H,
    tap: Keyboard,
    release_deadline: Instant,
}

impl<H: Copy> Unpressed<H> {
    fn press(&self, hold_deadline: Instant) -> Wait<H> {
        Wait {
            hold: self.hold,
            tap: self.tap,
            hold_deadline,
        }
    }
}

impl<H: Copy> Wait<H> {
    fn to_hold(&self) -> Hold<H> {
        Hold {
            hold: self.hold,
            tap: self.tap,
        }
    }

    fn to_tap(&self, release_deadline: Instant) -> Tap<H> {
        Tap {
            hold: self.hold,
            tap: self.tap,
            release_deadline,
        }
    }
}

impl<H: Copy> Hold<H> {
    fn release(&self) -> Unpressed<H> {
        Unpressed {
            hold: self.hold,
            tap: self.tap,
        }
    }
}

impl<H: Copy> Tap<H> {
    fn repress(&self, hold_deadline: Instant) -> Wait<H> {
        Wait {
            hold: self.hold,
            tap: self.tap,
            hold_deadline,
        }
    }

    fn expire(&self) -> Unpressed<H> {
        Unpressed {
            hold: self.hold,
            tap: self.tap,
        }
    }
}

/// The hold/tap decision machine behind home-row mods and layer-taps.
///
/// Generic over the hold payload: a modifier keycode for a home-row mod, a
/// layer index for a layer-tap. The tap side is always a keyboard-page usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldTapState<H> {
    Unpressed(Unpressed<H>),
    Wait(Wait<H>),
    Hold(Hold<H>),
    Tap(Tap<H>),
}

impl<H> Keyish for HoldTapState<H> {
    fn is_finished(&self) -> bool {
        matches!(self, HoldTapState::Unpressed(_))
    }
}

impl<H: Copy> HoldTapState<H> {
    pub fn new(hold: H, tap: Keyboard) -> Self {
        Self::Unpressed(Unpressed { hold, tap })
    }

    /// Advance the machine one scan. Returns the hold edge crossed this scan,
    /// if any; each engagement yields exactly one `Started`/`Ended` pair.
    pub fn transition(
        &mut self,
        pressed: bool,
        now: Instant,
        config: &HoldTapConfig,
    ) -> Option<HoldEdge> {
        match &self {
            Self::Unpressed(state) if pressed => {
                *self = Self::Wait(state.press(now + config.hold_timeout));
                None
            }
            Self::Unpressed(_state) => None,

            Self::Wait(state) if pressed && state.hold_deadline <= now => {
                *self = Self::Hold(state.to_hold());
                Some(HoldEdge::Started)
            }
            Self::Wait(state) if !pressed => {
                *self = Self::Tap(state.to_tap(now + config.tap_release));
                None
            }
            Self::Wait(_state) => None,

            Self::Hold(state) if !pressed => {
                *self = Self::Unpressed(state.release());
                Some(HoldEdge::Ended)
            }
            Self::Hold(_state) => None,

            // A re-press during the report window restarts the decision.
            Self::Tap(state) if pressed => {
                *self = Self::Wait(state.repress(now + config.hold_timeout));
                None
            }
            Self::Tap(state) if state.release_deadline <= now => {
                *self = Self::Unpressed(state.expire());
                None
            }
            Self::Tap(_state) => None,
        }
    }

    /// The hold binding while the machine is in `Hold`.
    pub fn held(&self) -> Option<H> {
        match self {
            Self::Hold(state) => Some(state.hold),
            _ => None,
        }
    }

    /// The tap binding while it is being reported.
    pub fn tapped(&self) -> Option<Keyboard> {
        match self {
            Self::Tap(state) => Some(state.tap),
            _ => None,
        }
    }

    /// The configured hold binding, regardless of state.
    pub fn hold_binding(&self) -> H {
        match self {
            Self::Unpressed(state) => state.hold,
            Self::Wait(state) => state.hold,
            Self::Hold(state) => state.hold,
            Self::Tap(state) => state.hold,
        }
    }
}
