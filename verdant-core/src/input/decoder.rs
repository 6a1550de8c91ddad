//! Rotary encoder decoding
//!
//! The encoder has two quadrature lines (data and clock) and an
//! active-low push-button. Each edge notification samples the lines
//! and is reduced to at most one [`DecodedEvent`].
//!
//! A detent of the encoder walks the lines through `11 -> 10 -> 00 ->
//! 01 -> 11` (one direction) or the reverse. Only the last step of the
//! walk back into the rest position is reported, which makes the
//! decoder immune to contact bounce in the middle of a detent.

use super::event::DecodedEvent;

/// Transition code reported as one clockwise detent
pub const CLOCKWISE_TRANSITION: u8 = 0b1110;

/// Transition code reported as one counter-clockwise detent
pub const COUNTER_CLOCKWISE_TRANSITION: u8 = 0b1101;

/// Sampled level of both quadrature lines, packed as `(dt << 1) | clk`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinState(u8);

impl PinState {
    /// Both lines high (the encoder's rest position)
    pub const REST: Self = Self(0b11);

    /// Pack the two line levels
    pub const fn new(dt: bool, clk: bool) -> Self {
        Self(((dt as u8) << 1) | clk as u8)
    }

    /// Build from a raw 2-bit value; upper bits are ignored
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b11)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// Previous and current [`PinState`], packed as `(previous << 2) | current`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition(u8);

impl Transition {
    pub const fn new(previous: PinState, current: PinState) -> Self {
        Self((previous.0 << 2) | current.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Map the transition to a rotation, if it is one of the two
    /// recognised codes
    pub fn rotation(self) -> Option<DecodedEvent> {
        match self.0 {
            CLOCKWISE_TRANSITION => Some(DecodedEvent::RotateClockwise),
            COUNTER_CLOCKWISE_TRANSITION => Some(DecodedEvent::RotateCounterClockwise),
            _ => None,
        }
    }
}

/// Which quadrature line raised the edge notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QuadratureLine {
    Data,
    Clock,
}

/// Quadrature half of the decoder
#[derive(Debug, Clone)]
pub struct QuadratureDecoder {
    last_status: PinState,
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl QuadratureDecoder {
    /// Create a decoder assuming the encoder rests with both lines high
    pub const fn new() -> Self {
        Self::with_initial(PinState::REST)
    }

    /// Create a decoder seeded with a sampled initial level
    pub const fn with_initial(initial: PinState) -> Self {
        Self {
            last_status: initial,
        }
    }

    /// Feed a freshly sampled level
    ///
    /// Returns a rotation event only for the two recognised transitions.
    /// A level identical to the previous one yields nothing. The sample
    /// is always recorded, whether or not anything was emitted.
    pub fn update(&mut self, sample: PinState) -> Option<DecodedEvent> {
        if sample == self.last_status {
            return None;
        }

        let transition = Transition::new(self.last_status, sample);
        self.last_status = sample;
        transition.rotation()
    }

    pub fn last_status(&self) -> PinState {
        self.last_status
    }
}

/// Push-button half of the decoder
///
/// The switch pulls the line low when pressed, so a high level is
/// "released".
#[derive(Debug, Clone)]
pub struct ButtonDecoder {
    last_level: bool,
}

impl Default for ButtonDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonDecoder {
    /// Create a decoder assuming the button starts released
    pub const fn new() -> Self {
        Self::with_initial(true)
    }

    /// Create a decoder seeded with a sampled initial level
    pub const fn with_initial(level_high: bool) -> Self {
        Self {
            last_level: level_high,
        }
    }

    /// Feed a freshly sampled level; duplicates are discarded
    pub fn update(&mut self, level_high: bool) -> Option<DecodedEvent> {
        if level_high == self.last_level {
            return None;
        }

        self.last_level = level_high;
        if level_high {
            Some(DecodedEvent::ButtonRelease)
        } else {
            Some(DecodedEvent::ButtonPress)
        }
    }

    pub fn is_pressed(&self) -> bool {
        !self.last_level
    }
}

/// Complete encoder decoder: quadrature lines plus push-button
///
/// Holds no pins itself; the caller samples the lines on each edge
/// and hands the levels in. Nothing here blocks or allocates, so it is
/// safe to drive from an edge handler.
#[derive(Debug, Clone, Default)]
pub struct RotaryDecoder {
    quadrature: QuadratureDecoder,
    button: ButtonDecoder,
}

impl RotaryDecoder {
    pub const fn new() -> Self {
        Self {
            quadrature: QuadratureDecoder::new(),
            button: ButtonDecoder::new(),
        }
    }

    /// Seed the decoder with the levels sampled at start-up
    pub const fn with_initial(lines: PinState, button_high: bool) -> Self {
        Self {
            quadrature: QuadratureDecoder::with_initial(lines),
            button: ButtonDecoder::with_initial(button_high),
        }
    }

    /// Edge on either quadrature line
    ///
    /// Both lines are sampled regardless of which one fired, so `_line`
    /// only matters for tracing.
    pub fn on_pin_change(
        &mut self,
        _line: QuadratureLine,
        dt: bool,
        clk: bool,
    ) -> Option<DecodedEvent> {
        self.quadrature.update(PinState::new(dt, clk))
    }

    /// Edge on the button line
    pub fn on_button_change(&mut self, level_high: bool) -> Option<DecodedEvent> {
        self.button.update(level_high)
    }

    pub fn last_status(&self) -> PinState {
        self.quadrature.last_status()
    }

    pub fn is_button_pressed(&self) -> bool {
        self.button.is_pressed()
    }
}
