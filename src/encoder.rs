//! Rotary encoder tuning.
//!
//! The encoder's A output drives an edge interrupt; the handler samples B and
//! calls [`EncoderCounter::on_edge`]. The main loop hands the counter to
//! [`Tuner::poll`], which turns position changes into frequency updates.
//!
//! ```ignore
//! static ENCODER: EncoderCounter = EncoderCounter::new();
//!
//! #[interrupt]
//! fn EXTI0() {
//!     ENCODER.on_edge(encoder_b.is_high().unwrap());
//! }
//!
//! let mut tuner = Tuner::new(1_000_000, FrequencyRange::ENCODER);
//! dds.set_frequency(tuner.frequency())?;
//! loop {
//!     tuner.poll(&ENCODER, &mut dds)?;
//!     if button.poll(&mut delay)? {
//!         tuner.next_step();
//!     }
//! }
//! ```

use core::cell::Cell;

use critical_section::Mutex;
use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::config::FrequencyRange;
use crate::device::{mode, Ad9850};

/// Step sizes cycled by the step button, in Hz.
pub const DEFAULT_STEPS_HZ: [u32; 5] = [100, 1_000, 10_000, 100_000, 1_000_000];

/// Index into [`DEFAULT_STEPS_HZ`] the selector starts at (10 kHz).
pub const DEFAULT_STEP_INDEX: usize = 2;

/// Debounce time of the step button, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u16 = 10;

/// Encoder position, shared between the edge interrupt and the main loop.
pub struct EncoderCounter {
    position: Mutex<Cell<i32>>,
}

impl EncoderCounter {
    pub const fn new() -> Self {
        Self { position: Mutex::new(Cell::new(0)) }
    }

    /// Record one detent. `b_high` is the level of the B channel at the A edge:
    /// high counts up, low counts down.
    pub fn on_edge(&self, b_high: bool) {
        critical_section::with(|cs| {
            let position = self.position.borrow(cs);
            let step = if b_high { 1 } else { -1 };
            position.set(position.get().wrapping_add(step));
        });
    }

    pub fn position(&self) -> i32 {
        critical_section::with(|cs| self.position.borrow(cs).get())
    }
}

impl Default for EncoderCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Cycles through a fixed table of tuning steps.
#[derive(Clone, Copy, Debug)]
pub struct StepSelector {
    steps: &'static [u32],
    index: usize,
}

impl StepSelector {
    /// An empty `steps` table falls back to [`DEFAULT_STEPS_HZ`].
    pub const fn new(steps: &'static [u32], index: usize) -> Self {
        let steps: &'static [u32] = if steps.is_empty() { &DEFAULT_STEPS_HZ } else { steps };
        let index = if index < steps.len() { index } else { 0 };
        Self { steps, index }
    }

    pub const fn current(&self) -> u32 {
        self.steps[self.index]
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    /// Move to the next step, wrapping to the first. Returns the new step.
    pub fn advance(&mut self) -> u32 {
        self.index = (self.index + 1) % self.steps.len();
        self.current()
    }
}

impl Default for StepSelector {
    fn default() -> Self {
        Self::new(&DEFAULT_STEPS_HZ, DEFAULT_STEP_INDEX)
    }
}

/// Debounced push button that selects the next tuning step.
///
/// Active high. Reports each press once; it re-arms when released.
pub struct StepButton<P> {
    pin: P,
    debounce_ms: u16,
    latched: bool,
}

impl<P: InputPin> StepButton<P> {
    pub fn new(pin: P) -> Self {
        Self::with_debounce(pin, DEFAULT_DEBOUNCE_MS)
    }

    pub fn with_debounce(pin: P, debounce_ms: u16) -> Self {
        Self { pin, debounce_ms, latched: false }
    }

    /// Returns `true` once per press that is still down after the debounce time.
    pub fn poll<D: DelayMs<u16>>(&mut self, delay: &mut D) -> Result<bool, P::Error> {
        if !self.pin.is_high()? {
            self.latched = false;
            return Ok(false);
        }
        if self.latched {
            return Ok(false);
        }
        delay.delay_ms(self.debounce_ms);
        if self.pin.is_high()? {
            self.latched = true;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn release(self) -> P {
        self.pin
    }
}

/// Encoder-driven frequency state.
#[derive(Clone, Copy, Debug)]
pub struct Tuner {
    frequency_hz: u32,
    range: FrequencyRange,
    steps: StepSelector,
    last_position: i32,
}

impl Tuner {
    /// `initial_hz` is clamped into `range`.
    pub fn new(initial_hz: u32, range: FrequencyRange) -> Self {
        Self::with_steps(initial_hz, range, StepSelector::default())
    }

    pub fn with_steps(initial_hz: u32, range: FrequencyRange, steps: StepSelector) -> Self {
        Self {
            frequency_hz: range.clamp(i64::from(initial_hz)),
            range,
            steps,
            last_position: 0,
        }
    }

    pub fn frequency(&self) -> u32 {
        self.frequency_hz
    }

    pub fn step(&self) -> u32 {
        self.steps.current()
    }

    pub fn next_step(&mut self) -> u32 {
        let step = self.steps.advance();
        debug!("tuner: step {=u32} Hz", step);
        step
    }

    /// Fold a new encoder position into the frequency.
    ///
    /// Returns the new (clamped) frequency, or `None` if the position is unchanged.
    pub fn apply(&mut self, position: i32) -> Option<u32> {
        if position == self.last_position {
            return None;
        }
        let detents = i64::from(position.wrapping_sub(self.last_position));
        self.last_position = position;

        let target = i64::from(self.frequency_hz) + detents * i64::from(self.steps.current());
        self.frequency_hz = self.range.clamp(target);
        Some(self.frequency_hz)
    }

    /// Read `counter` and push any change to the chip.
    ///
    /// Issues at most one [`set_frequency`](Ad9850::set_frequency) per call.
    pub fn poll<Reset, Data, FqUd, WClk, Delay, E>(
        &mut self,
        counter: &EncoderCounter,
        dds: &mut Ad9850<mode::Serial, Reset, Data, FqUd, WClk, Delay>,
    ) -> Result<Option<u32>, E>
    where
        Reset: OutputPin<Error = E>,
        Data: OutputPin<Error = E>,
        FqUd: OutputPin<Error = E>,
        WClk: OutputPin<Error = E>,
        Delay: DelayUs<u16> + DelayMs<u16>,
    {
        match self.apply(counter.position()) {
            Some(hz) => {
                dds.set_frequency(hz)?;
                Ok(Some(hz))
            }
            None => Ok(None),
        }
    }
}
