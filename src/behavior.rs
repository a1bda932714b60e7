//! The per-scan behaviour context.
//!
//! One [`Behavior`] value, owned by the firmware loop, carries what earlier
//! firmware kept in process-wide globals: the modifier-highlight state, the
//! auto pointer-layer timer and the momentary sniping/drag-scroll holds. The
//! loop calls [`Behavior::handle_events`] with the events out of
//! [`Keymap::process`], [`Behavior::on_motion`] with each sensor report, and
//! [`Behavior::poll`] once per scan.

use crate::keystate::{CustomAction, Event, Instant, Keymap, Layer};
use crate::layout::{self, POINTER};
use crate::light::{self, Highlight, LedSpan, RgbMatrix};
use crate::pointer::{AutoPointerLayer, CpiControl, MotionData, Trackball};

/// Either driver can fail; everything in here propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<R, P> {
    Rgb(R),
    Pointer(P),
}

pub struct Behavior {
    pub highlight: Highlight,
    pub cpi: CpiControl,
    pub auto_pointer: AutoPointerLayer,
    last_layer: Layer,
    sniping_held: bool,
}

impl Behavior {
    pub fn new(cpi: CpiControl, auto_pointer: AutoPointerLayer) -> Self {
        Self {
            highlight: Highlight::new(),
            cpi,
            auto_pointer,
            last_layer: layout::BASE,
            sniping_held: false,
        }
    }

    /// Route one scan's behaviour events to the drivers.
    pub fn handle_events<R, T, const SIZE: usize, const LAYERS: usize>(
        &mut self,
        keymap: &Keymap<SIZE, LAYERS>,
        matrix: &mut R,
        ball: &mut T,
        events: &[Event],
    ) -> Result<(), Error<R::Error, T::Error>>
    where
        R: RgbMatrix,
        T: Trackball,
    {
        for event in events {
            match *event {
                Event::ModHold { index, modifier } => self
                    .highlight
                    .mod_hold(matrix, layout::side_of(index), modifier)
                    .map_err(Error::Rgb)?,
                Event::ModRelease { .. } => self
                    .highlight
                    .mod_release(matrix, keymap.active_layer())
                    .map_err(Error::Rgb)?,
                Event::LayerTap { layer, pressed } => self
                    .highlight
                    .layer_tap(matrix, layer, pressed, keymap.active_layer())
                    .map_err(Error::Rgb)?,
                Event::Custom { action, pressed } => {
                    self.handle_custom(matrix, ball, action, pressed)?
                }
            }
        }
        Ok(())
    }

    fn handle_custom<R, T>(
        &mut self,
        matrix: &mut R,
        ball: &mut T,
        action: CustomAction,
        pressed: bool,
    ) -> Result<(), Error<R::Error, T::Error>>
    where
        R: RgbMatrix,
        T: Trackball,
    {
        match action {
            CustomAction::CpiIncrease if pressed => {
                self.cpi.increase(ball).map_err(Error::Pointer)?
            }
            CustomAction::CpiDecrease if pressed => {
                self.cpi.decrease(ball).map_err(Error::Pointer)?
            }
            CustomAction::Sniping => {
                self.sniping_held = pressed;
                ball.set_sniping(self.sniping_held || self.last_layer == POINTER)
                    .map_err(Error::Pointer)?
            }
            CustomAction::DragScroll => ball.set_drag_scroll(pressed).map_err(Error::Pointer)?,
            CustomAction::RgbToggle if pressed => matrix.toggle().map_err(Error::Rgb)?,
            CustomAction::RgbNextMode if pressed => matrix.next_mode().map_err(Error::Rgb)?,
            CustomAction::RgbPrevMode if pressed => matrix.prev_mode().map_err(Error::Rgb)?,
            // Mouse buttons go into the firmware's pointer report; bootloader
            // and factory reset are boot-path concerns. All are handled by
            // the embedding firmware.
            _ => (),
        }
        Ok(())
    }

    /// Feed one trackball report; big enough motion engages the pointer layer
    /// and floods the matrix green until the layer times back out.
    pub fn on_motion<R, const SIZE: usize, const LAYERS: usize>(
        &mut self,
        keymap: &mut Keymap<SIZE, LAYERS>,
        matrix: &mut R,
        motion: MotionData,
        now: Instant,
    ) -> Result<(), R::Error>
    where
        R: RgbMatrix,
    {
        if self.auto_pointer.on_motion(motion, now) {
            keymap.layer_on(POINTER);
            matrix.set_solid(LedSpan::All, light::GREEN)?;
        }
        Ok(())
    }

    /// Once per scan: time out the auto pointer layer and react to layer
    /// changes with the layer colour and auto-sniping.
    pub fn poll<R, T, const SIZE: usize, const LAYERS: usize>(
        &mut self,
        keymap: &mut Keymap<SIZE, LAYERS>,
        matrix: &mut R,
        ball: &mut T,
        now: Instant,
    ) -> Result<(), Error<R::Error, T::Error>>
    where
        R: RgbMatrix,
        T: Trackball,
    {
        if self.auto_pointer.expired(now) {
            keymap.layer_off(POINTER);
        }

        let layer = keymap.active_layer();
        if layer != self.last_layer {
            #[cfg(feature = "defmt")]
            defmt::debug!("layer {} -> {}", self.last_layer, layer);
            self.last_layer = layer;
            ball.set_sniping(self.sniping_held || layer == POINTER)
                .map_err(Error::Pointer)?;
            // While the auto layer is engaged the green flood stands; the
            // layer colour returns when it times out.
            if !self.auto_pointer.is_engaged() {
                self.highlight
                    .layer_changed(matrix, layer)
                    .map_err(Error::Rgb)?;
            }
        }
        Ok(())
    }
}

impl Default for Behavior {
    fn default() -> Self {
        Self::new(CpiControl::default(), AutoPointerLayer::default())
    }
}
