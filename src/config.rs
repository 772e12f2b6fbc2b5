//! Driver configuration: reference clock, pin timing and frequency limits.

use core::num::NonZeroU32;

use crate::tuning::DEFAULT_REF_CLOCK_HZ;

/// Settle and hold times used while bit-banging the chip.
///
/// The AD9850 needs only a few nanoseconds of setup/hold time, so the defaults
/// are generous for any MCU. Tighten them if your host is slow enough that the
/// instructions alone meet the datasheet minimums.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Delay after each DATA / W_CLK transition, in microseconds.
    pub settle_us: u16,
    /// Time FQ_UD is held high when committing an update, in microseconds.
    pub strobe_hold_us: u16,
    /// Hold time of each RESET level, in milliseconds.
    pub reset_hold_ms: u16,
}

impl Timing {
    /// 1 µs settle, 1 µs strobe hold, 20 ms reset hold.
    pub const fn new() -> Self {
        Self { settle_us: 1, strobe_hold_us: 1, reset_hold_ms: 20 }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new()
    }
}

/// Static configuration of an [`Ad9850`](crate::Ad9850).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    ref_clock_hz: NonZeroU32,
    /// Pin timing.
    pub timing: Timing,
}

impl Config {
    /// 125 MHz reference clock, default timing.
    pub const fn new() -> Self {
        Self {
            ref_clock_hz: match NonZeroU32::new(DEFAULT_REF_CLOCK_HZ) {
                Some(hz) => hz,
                None => unreachable!(),
            },
            timing: Timing::new(),
        }
    }

    /// Use this if your board's oscillator is **not** 125 MHz.
    pub const fn with_ref_clock(mut self, ref_clock_hz: NonZeroU32) -> Self {
        self.ref_clock_hz = ref_clock_hz;
        self
    }

    /// Override the settle and hold times.
    pub const fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Frequency of the oscillator feeding the chip, in Hz.
    pub const fn ref_clock_hz(&self) -> u32 {
        self.ref_clock_hz.get()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Inclusive range of frequencies a front-end accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrequencyRange {
    pub min_hz: u32,
    pub max_hz: u32,
}

impl FrequencyRange {
    /// Range accepted by the serial console.
    pub const SERIAL: Self = Self::new(1, 40_000_000);

    /// Range the encoder tuner clamps to.
    pub const ENCODER: Self = Self::new(100, 30_000_000);

    /// `min_hz` and `max_hz` are swapped if given in the wrong order.
    pub const fn new(min_hz: u32, max_hz: u32) -> Self {
        if min_hz <= max_hz {
            Self { min_hz, max_hz }
        } else {
            Self { min_hz: max_hz, max_hz: min_hz }
        }
    }

    pub const fn contains(&self, hz: u32) -> bool {
        hz >= self.min_hz && hz <= self.max_hz
    }

    pub fn clamp(&self, hz: i64) -> u32 {
        hz.clamp(i64::from(self.min_hz), i64::from(self.max_hz)) as u32
    }
}
