use core::marker::PhantomData;

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::digital::v2::{OutputPin, PinState};

use crate::config::Config;
use crate::tuning;

/// Represents a connection to a AD9850 device.
///
/// See [crate level documentation](crate), or check the [`new`](Ad9850::new) method for an entry point.
pub struct Ad9850<Mode, Reset, Data, FqUd, WClk, Delay> {
    config: Config,
    reset: Reset,
    data: Data,
    fq_ud: FqUd,
    w_clk: WClk,
    delay: Delay,
    marker: PhantomData<Mode>,
}

impl<Reset, Data, FqUd, WClk, Delay, E> Ad9850<mode::Init, Reset, Data, FqUd, WClk, Delay>
where
    Reset: OutputPin<Error = E>,
    Data: OutputPin<Error = E>,
    FqUd: OutputPin<Error = E>,
    WClk: OutputPin<Error = E>,
    Delay: DelayUs<u16> + DelayMs<u16>,
{
    /// Construct a new Ad9850 instance, in inital mode.
    ///
    /// This call does not communicate with the device yet. You need to call `into_serial_mode` to initiate a reset before you can send any data.
    ///
    /// The four pin parameters correspond to the digital pins connected to the AD9850:
    ///
    /// | Signal | AD9850 Pin |
    /// |--------|------------|
    /// | reset  |     22     |
    /// | data   |     25     |
    /// | fq_ud  |      7     |
    /// | w_clk  |      8     |
    ///
    /// `delay` provides the settle and hold times listed in [`Timing`](crate::config::Timing).
    ///
    /// NOTE: the "data" pin is labeled "D7" in the AD9850 datasheet. Breakout boards usually expose it twice:
    ///   once as D7 on the parallel interface, and again as DATA. Don't ground D7 when using serial mode.
    pub fn new(reset: Reset, data: Data, fq_ud: FqUd, w_clk: WClk, delay: Delay) -> Self {
        Self::new_with_config(reset, data, fq_ud, w_clk, delay, Config::default())
    }

    /// Same as [`new`](Ad9850::new), but with a custom reference clock or timing.
    pub fn new_with_config(reset: Reset, data: Data, fq_ud: FqUd, w_clk: WClk, delay: Delay, config: Config) -> Self {
        Self { config, reset, data, fq_ud, w_clk, delay, marker: PhantomData }
    }

    /// Reset the ad9850 device into serial mode.
    ///
    /// Must happen once before the first update: without it the tuning word
    /// latched at power-on is undefined.
    ///
    /// Returns an error, if any of the `set_low` / `set_high` calls on one of the pins fail.
    pub fn into_serial_mode(mut self) -> Result<Ad9850<mode::Serial, Reset, Data, FqUd, WClk, Delay>, E> {
        self.reset_sequence()?;
        info!("ad9850: reset, serial mode");
        Ok(self.into_mode())
    }

    /// Skip the reset and assume the chip is already in serial mode.
    ///
    /// Only valid when the board straps the chip into serial mode and you accept
    /// whatever tuning word the chip woke up with until the first
    /// [`set_frequency`](Ad9850::set_frequency). Prefer [`into_serial_mode`](Ad9850::into_serial_mode).
    pub fn assume_serial_mode(self) -> Ad9850<mode::Serial, Reset, Data, FqUd, WClk, Delay> {
        warn!("ad9850: reset skipped, relying on power-on state");
        self.into_mode()
    }
}

impl<Mode, Reset, Data, FqUd, WClk, Delay, E> Ad9850<Mode, Reset, Data, FqUd, WClk, Delay>
where
    Reset: OutputPin<Error = E>,
    Data: OutputPin<Error = E>,
    FqUd: OutputPin<Error = E>,
    WClk: OutputPin<Error = E>,
    Delay: DelayUs<u16> + DelayMs<u16>,
{
    /// Reference clock and timing this instance was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Give back the pins and the delay provider.
    pub fn release(self) -> (Reset, Data, FqUd, WClk, Delay) {
        (self.reset, self.data, self.fq_ud, self.w_clk, self.delay)
    }

    fn into_mode<M>(self) -> Ad9850<M, Reset, Data, FqUd, WClk, Delay> {
        Ad9850 {
            config: self.config,
            reset: self.reset,
            data: self.data,
            fq_ud: self.fq_ud,
            w_clk: self.w_clk,
            delay: self.delay,
            marker: PhantomData,
        }
    }

    fn reset_sequence(&mut self) -> Result<(), E> {
        let hold_ms = self.config.timing.reset_hold_ms;

        // RESET pulse resets the registers & mode to default
        self.reset.set_low()?;
        self.delay.delay_ms(hold_ms);
        self.reset.set_high()?;
        self.delay.delay_ms(hold_ms);
        self.reset.set_low()?;

        // single W_CLK pulse followed by FQ_UD pulse switches to serial input mode
        self.pulse_w_clk()?;
        self.pulse_fq_ud()
    }

    fn settle(&mut self) {
        self.delay.delay_us(self.config.timing.settle_us);
    }

    fn pulse_w_clk(&mut self) -> Result<(), E> {
        self.w_clk.set_high()?;
        self.settle();
        self.w_clk.set_low()?;
        self.settle();
        Ok(())
    }

    fn pulse_fq_ud(&mut self) -> Result<(), E> {
        self.fq_ud.set_high()?;
        self.delay.delay_us(self.config.timing.strobe_hold_us);
        self.fq_ud.set_low()
    }
}

impl<Reset, Data, FqUd, WClk, Delay, E> Ad9850<mode::Serial, Reset, Data, FqUd, WClk, Delay>
where
    Reset: OutputPin<Error = E>,
    Data: OutputPin<Error = E>,
    FqUd: OutputPin<Error = E>,
    WClk: OutputPin<Error = E>,
    Delay: DelayUs<u16> + DelayMs<u16>,
{
    /// Set output frequency to the given value (in Hz).
    ///
    /// Computes the tuning word for the configured reference clock, sends it
    /// with [`update`](Ad9850::update) and returns it.
    ///
    /// The chip accepts anything up to half the reference clock; keeping the
    /// value in a sane range is up to the caller.
    pub fn set_frequency(&mut self, frequency_hz: u32) -> Result<u32, E> {
        let tuning_word = tuning::compute_tuning_word(frequency_hz, self.config.ref_clock_hz());
        self.update(tuning_word)?;
        debug!("ad9850: {=u32} Hz, tuning word {=u32:#x}", frequency_hz, tuning_word);
        Ok(tuning_word)
    }

    /// Update device register with the given tuning word.
    ///
    /// This is a low-level interface. See [`set_frequency`](Ad9850::set_frequency) for a high-level wrapper.
    ///
    /// The Ad9850 register is 40-bit wide: the 32 bit tuning word, LSB first,
    /// followed by the control byte (always [`CONTROL_BYTE`](tuning::CONTROL_BYTE)).
    /// All five bytes are clocked in, then a pulse on FQ_UD commits them.
    /// If this is interrupted halfway the chip holds a partial word; the next
    /// complete update brings it back in sync.
    pub fn update(&mut self, tuning_word: u32) -> Result<(), E> {
        self.fq_ud.set_low()?;
        self.w_clk.set_low()?;
        for byte in tuning::update_frame(tuning_word) {
            self.send_byte(byte)?;
        }
        self.pulse_fq_ud()
    }

    /// Shift out one byte on DATA, at rising edge of W_CLK (LSB first).
    pub fn send_byte(&mut self, value: u8) -> Result<(), E> {
        trace!("ad9850: byte {=u8:#04x}", value);
        for i in 0..8 {
            self.data.set_state(PinState::from((value >> i) & 1 == 1))?;
            self.settle();
            self.pulse_w_clk()?;
        }
        Ok(())
    }

    /// Reset the chip again and re-enter serial mode.
    ///
    /// The output stays at 0 Hz until the next update.
    pub fn reset(&mut self) -> Result<(), E> {
        self.reset_sequence()?;
        info!("ad9850: reset");
        Ok(())
    }
}

/// Marker types for different modes.
///
/// These types are used for the `Mode` type parameter of [`Ad9850`].
pub mod mode {
    /// Initial mode. No communication has happened.
    pub struct Init;
    /// Serial mode. Device is reset and put into the proper mode. Updates can happen.
    pub struct Serial;
}
