//! Per-key state machines and the scan-to-report pipeline.

use heapless::Vec;
pub use usbd_human_interface_device::page::{Consumer, Keyboard};

pub mod button;
pub mod holdtap;
/// Shorthand for `use keystate::prelude::*` when writing keymap layers
pub mod prelude;

use button::ButtonState;
use holdtap::{HoldEdge, HoldTapConfig, HoldTapState};

/// Something which is like a key (button, layer-tap, home-row mod etc)
trait Keyish {
    /// Whether this key is back at rest and may re-latch onto the current
    /// layer (or the MCU go to sleep, if all keys are finished)
    fn is_finished(&self) -> bool;
}

pub type Layer = u8;
pub type Duration = u64;
pub type Instant = u64;

/// Actions the keymap consumes itself instead of turning into HID usages.
/// These surface as [`Event::Custom`] edges; default key processing is
/// skipped for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CustomAction {
    CpiIncrease,
    CpiDecrease,
    /// Momentary low-CPI precision mode
    Sniping,
    /// Momentary ball-is-wheel mode
    DragScroll,
    RgbToggle,
    RgbNextMode,
    RgbPrevMode,
    MouseButton(u8),
    Bootloader,
    FactoryReset,
}

/// Behaviour events surfaced alongside the HID report, one per state edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A home-row mod resolved to its modifier
    ModHold { index: usize, modifier: Keyboard },
    ModRelease { index: usize, modifier: Keyboard },
    /// A layer-tap engaged (`pressed`) or released its layer
    LayerTap { layer: Layer, pressed: bool },
    Custom { action: CustomAction, pressed: bool },
}

/// Shorthand for writing keymap layers; see [`prelude`].
#[derive(Debug, Clone, Copy)]
pub enum KeyShorthand {
    /// Keyboard-page usage
    Kb(Keyboard),
    /// Keyboard-page usage reported together with LeftShift
    Sh(Keyboard),
    /// Consumer-page usage
    Cs(Consumer),
    /// Crate-level action, reported as an [`Event::Custom`] edge
    Cu(CustomAction),
    /// Home-row mod: hold for the modifier, tap for the letter
    MT(Keyboard, Keyboard),
    /// Layer-tap: hold for the layer, tap for the key
    LT(Layer, Keyboard),
}

/// Actual keys containing key-state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Button(ButtonState<Keyboard>),
    Shifted(ButtonState<Keyboard>),
    Consumer(ButtonState<Consumer>),
    Custom(ButtonState<CustomAction>),
    HomeRowMod(HoldTapState<Keyboard>),
    LayerTap(HoldTapState<Layer>),
}

impl Key {
    fn new(key: KeyShorthand) -> Self {
        match key {
            KeyShorthand::Kb(code) => Key::Button(ButtonState::new(code)),
            KeyShorthand::Sh(code) => Key::Shifted(ButtonState::new(code)),
            KeyShorthand::Cs(code) => Key::Consumer(ButtonState::new(code)),
            KeyShorthand::Cu(action) => Key::Custom(ButtonState::new(action)),
            KeyShorthand::MT(modifier, tap) => Key::HomeRowMod(HoldTapState::new(modifier, tap)),
            KeyShorthand::LT(layer, tap) => Key::LayerTap(HoldTapState::new(layer, tap)),
        }
    }
}

impl Keyish for Key {
    fn is_finished(&self) -> bool {
        match self {
            Key::Button(button) => button.is_finished(),
            Key::Shifted(button) => button.is_finished(),
            Key::Consumer(button) => button.is_finished(),
            Key::Custom(button) => button.is_finished(),
            Key::HomeRowMod(hold_tap) => hold_tap.is_finished(),
            Key::LayerTap(hold_tap) => hold_tap.is_finished(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Keys<const LAYERS: usize> {
    current: Layer,
    layers: [Key; LAYERS],
}

/// Hold/tap timing, split by binding kind: home-row mods want a deliberately
/// long threshold, layer-taps the usual tapping term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeymapConfig {
    pub mod_tap: HoldTapConfig,
    pub layer_tap: HoldTapConfig,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            mod_tap: HoldTapConfig {
                hold_timeout: 1000,
                tap_release: 50,
            },
            layer_tap: HoldTapConfig {
                hold_timeout: 200,
                tap_release: 50,
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct KeymapFlags {
    /// More keys held than fit the report buffer; extras were dropped
    pub rollover: bool,
    /// More behaviour events this scan than fit the event buffer
    pub event_overflow: bool,
}

#[derive(Debug)]
pub struct Keymap<const SIZE: usize, const LAYERS: usize> {
    config: KeymapConfig,
    layers: Vec<Layer, LAYERS>,
    keys: [Keys<LAYERS>; SIZE],
    pub flags: KeymapFlags,
}

impl<const SIZE: usize, const LAYERS: usize> Keymap<SIZE, LAYERS> {
    pub fn new(keymap: [[KeyShorthand; SIZE]; LAYERS], config: KeymapConfig) -> Self {
        let keys: [Keys<LAYERS>; SIZE] = core::array::from_fn(|key| Keys {
            current: 0,
            layers: core::array::from_fn(|layer| Key::new(keymap[layer][key])),
        });
        Keymap {
            config,
            keys,
            layers: Default::default(),
            flags: Default::default(),
        }
    }

    /// Top of the layer stack, or the base layer.
    pub fn active_layer(&self) -> Layer {
        self.layers.last().copied().unwrap_or(0)
    }

    pub fn layer_on(&mut self, layer: Layer) {
        Self::activate(&mut self.layers, layer);
    }

    pub fn layer_off(&mut self, layer: Layer) {
        Self::deactivate(&mut self.layers, layer);
    }

    /// Push `layer` on top, deduplicating a previous activation.
    fn activate(layers: &mut Vec<Layer, LAYERS>, layer: Layer) {
        Self::deactivate(layers, layer);
        layers.push(layer).ok();
    }

    fn deactivate(layers: &mut Vec<Layer, LAYERS>, layer: Layer) {
        if let Some(position) = layers.iter().position(|l| *l == layer) {
            layers.remove(position);
        }
    }

    /// One scan pass: advance every key against the debounced `presses`,
    /// pushing held keyboard/consumer usages and raising behaviour [`Event`]s
    /// on state edges.
    ///
    /// A key resolves against the layer it started on and re-latches onto the
    /// top of the layer stack only once it returns to rest.
    pub fn process<const ROLLOVER: usize, const MEDIA: usize, const EVENTS: usize>(
        &mut self,
        presses: &[bool; SIZE],
        keys: &mut Vec<Keyboard, ROLLOVER>,
        consumer: &mut Vec<Consumer, MEDIA>,
        events: &mut Vec<Event, EVENTS>,
        now: Instant,
    ) {
        for (index, (key, pressed)) in self.keys.iter_mut().zip(presses).enumerate() {
            if key.layers[key.current as usize].is_finished() {
                key.current = self.layers.last().copied().unwrap_or(0);
            }
            match &mut key.layers[key.current as usize] {
                Key::Button(state) => {
                    state.transition(*pressed);
                    if let Some(code) = state.current() {
                        if keys.push(code).is_err() {
                            self.flags.rollover = true;
                        }
                    }
                }
                Key::Shifted(state) => {
                    state.transition(*pressed);
                    if let Some(code) = state.current() {
                        if !keys.contains(&Keyboard::LeftShift)
                            && keys.push(Keyboard::LeftShift).is_err()
                        {
                            self.flags.rollover = true;
                        }
                        if keys.push(code).is_err() {
                            self.flags.rollover = true;
                        }
                    }
                }
                Key::Consumer(state) => {
                    state.transition(*pressed);
                    if let Some(code) = state.current() {
                        if consumer.push(code).is_err() {
                            self.flags.rollover = true;
                        }
                    }
                }
                Key::Custom(state) => {
                    let before = state.current();
                    state.transition(*pressed);
                    let after = state.current();
                    let edge = match (before, after) {
                        (None, Some(action)) => Some(Event::Custom {
                            action,
                            pressed: true,
                        }),
                        (Some(action), None) => Some(Event::Custom {
                            action,
                            pressed: false,
                        }),
                        _ => None,
                    };
                    if let Some(event) = edge {
                        if events.push(event).is_err() {
                            self.flags.event_overflow = true;
                        }
                    }
                }
                Key::HomeRowMod(state) => {
                    let edge = state.transition(*pressed, now, &self.config.mod_tap);
                    let modifier = state.hold_binding();
                    let event = match edge {
                        Some(HoldEdge::Started) => Some(Event::ModHold { index, modifier }),
                        Some(HoldEdge::Ended) => Some(Event::ModRelease { index, modifier }),
                        None => None,
                    };
                    if let Some(event) = event {
                        if events.push(event).is_err() {
                            self.flags.event_overflow = true;
                        }
                    }
                    if let Some(code) = state.held().or_else(|| state.tapped()) {
                        if keys.push(code).is_err() {
                            self.flags.rollover = true;
                        }
                    }
                }
                Key::LayerTap(state) => {
                    let edge = state.transition(*pressed, now, &self.config.layer_tap);
                    let layer = state.hold_binding();
                    match edge {
                        Some(HoldEdge::Started) => {
                            Self::activate(&mut self.layers, layer);
                            if events.push(Event::LayerTap {
                                layer,
                                pressed: true,
                            })
                            .is_err()
                            {
                                self.flags.event_overflow = true;
                            }
                        }
                        Some(HoldEdge::Ended) => {
                            Self::deactivate(&mut self.layers, layer);
                            if events.push(Event::LayerTap {
                                layer,
                                pressed: false,
                            })
                            .is_err()
                            {
                                self.flags.event_overflow = true;
                            }
                        }
                        None => (),
                    }
                    if let Some(code) = state.tapped() {
                        if keys.push(code).is_err() {
                            self.flags.rollover = true;
                        }
                    }
                }
            }
        }
    }
}
