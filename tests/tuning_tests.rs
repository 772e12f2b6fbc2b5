//! Tuning word arithmetic against the chip's numeric contract.

use ad9850_vfo::tuning::{
    compute_tuning_word, tuning_word_to_frequency, update_frame, CONTROL_BYTE, DEFAULT_REF_CLOCK_HZ,
};

const REF: u32 = DEFAULT_REF_CLOCK_HZ;

#[test]
fn test_zero_frequency_is_zero_word() {
    assert_eq!(0, compute_tuning_word(0, REF));
}

#[test]
fn test_one_megahertz() {
    assert_eq!(34_359_738, compute_tuning_word(1_000_000, REF));
}

#[test]
fn test_upper_console_limit() {
    assert_eq!(1_374_389_534, compute_tuning_word(40_000_000, REF));
}

#[test]
fn test_reference_clock_wraps_to_zero() {
    // 2^32 truncated to 32 bits
    assert_eq!(0, compute_tuning_word(REF, REF));
    assert_eq!(compute_tuning_word(1_000, REF), compute_tuning_word(REF + 1_000, REF));
}

#[test]
fn test_uses_full_power_of_two_scale() {
    // a 2^32 - 1 scale would land one below, at 0x7FFF_FFFF
    assert_eq!(0x8000_0000, compute_tuning_word(REF / 2, REF));
}

#[test]
fn test_monotonic_over_usable_range() {
    let mut last = 0;
    for f in (1..=40_000_000u32).step_by(997) {
        let tw = compute_tuning_word(f, REF);
        assert!(tw >= last, "tuning word decreased at {} Hz", f);
        last = tw;
    }
}

#[test]
fn test_top_of_range_dense_monotonic() {
    let mut last = compute_tuning_word(39_900_000, REF);
    for f in 39_900_000..=40_000_000u32 {
        let tw = compute_tuning_word(f, REF);
        assert!(tw >= last);
        last = tw;
    }
}

#[test]
fn test_low_range_dense_monotonic() {
    let mut last = 0;
    for f in 0..=200_000u32 {
        let tw = compute_tuning_word(f, REF);
        assert!(tw >= last);
        last = tw;
    }
}

#[test]
fn test_round_trip_within_one_hertz() {
    for f in (1..=40_000_000u32).step_by(7_919).chain([1, 2, 3, 1_000, 1_000_000, 40_000_000]) {
        let back = tuning_word_to_frequency(compute_tuning_word(f, REF), REF);
        assert!(f.abs_diff(back) <= 1, "{} Hz came back as {} Hz", f, back);
    }
}

#[test]
fn test_other_reference_clock() {
    assert_eq!(0x4000_0000, compute_tuning_word(25_000_000, 100_000_000));
    assert_eq!(25_000_000, tuning_word_to_frequency(0x4000_0000, 100_000_000));
}

#[test]
fn test_frame_layout() {
    let tw = compute_tuning_word(1_000_000, REF);
    let frame = update_frame(tw);
    assert_eq!((tw & 0xFF) as u8, frame[0]);
    assert_eq!((tw >> 24) as u8, frame[3]);
    assert_eq!(CONTROL_BYTE, frame[4]);
    assert_eq!(0x00, CONTROL_BYTE);
}
