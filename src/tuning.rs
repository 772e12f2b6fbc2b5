//! Tuning word arithmetic.
//!
//! The AD9850 phase accumulator is 32 bits wide and wraps at exactly $2^{32}$.
//! For a reference clock $f_{ref}$ the output frequency for tuning word $tw$ is
//! $f = \frac{tw \cdot f_{ref}}{2^{32}}$.

/// Default frequency of the oscillator connected to the AD9850.
pub const DEFAULT_REF_CLOCK_HZ: u32 = 125_000_000;

/// Modulus of the phase accumulator.
pub const PHASE_ACCUMULATOR_MODULUS: u64 = 1 << 32;

/// Fifth byte of every update: normal operation, no power-down, phase 0.
pub const CONTROL_BYTE: u8 = 0x00;

/// Number of bytes clocked into the chip per update.
pub const FRAME_LEN: usize = 5;

/// Turns a frequency (Hz) into the phase increment the chip expects.
///
/// The result is `floor(frequency_hz * 2^32 / ref_clock_hz)`, truncated to 32
/// bits. A request at or above the reference clock aliases, so
/// `compute_tuning_word(f_ref, f_ref)` is `0`.
///
/// ```
/// use ad9850_vfo::tuning::compute_tuning_word;
///
/// assert_eq!(34_359_738, compute_tuning_word(1_000_000, 125_000_000));
/// assert_eq!(0, compute_tuning_word(0, 125_000_000));
/// ```
///
/// # Panics
///
/// Panics if `ref_clock_hz` is zero. [`Config`](crate::config::Config) stores a
/// non-zero clock, so the driver never hits this.
pub fn compute_tuning_word(frequency_hz: u32, ref_clock_hz: u32) -> u32 {
    (u64::from(frequency_hz) * PHASE_ACCUMULATOR_MODULUS / u64::from(ref_clock_hz)) as u32
}

/// Frequency (Hz, truncated) produced by `tuning_word` at the given reference clock.
///
/// ```
/// use ad9850_vfo::tuning::tuning_word_to_frequency;
///
/// assert_eq!(999_999, tuning_word_to_frequency(34_359_738, 125_000_000));
/// ```
pub fn tuning_word_to_frequency(tuning_word: u32, ref_clock_hz: u32) -> u32 {
    ((u64::from(tuning_word) * u64::from(ref_clock_hz)) >> 32) as u32
}

/// The 40-bit register image in wire order.
///
/// Tuning word bytes come first, least significant byte first, followed by
/// [`CONTROL_BYTE`].
pub fn update_frame(tuning_word: u32) -> [u8; FRAME_LEN] {
    let [b0, b1, b2, b3] = tuning_word.to_le_bytes();
    [b0, b1, b2, b3, CONTROL_BYTE]
}
