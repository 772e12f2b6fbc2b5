//! Line-oriented serial tuning console.
//!
//! One command per line: the frequency in Hz as a decimal number. Replies and
//! the startup banner are fixed texts, terminated by `\r\n`. The UART itself
//! is expected to run at 9600 baud, 8N1.

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::digital::v2::OutputPin;
use embedded_hal::serial::Write;

use crate::config::FrequencyRange;
use crate::device::{mode, Ad9850};
use crate::error::Error;
use crate::mailbox::Line;

pub const BANNER: &str = "AD9850 pronto. Envie frequencia em Hz (ex: 1000000)\r\n";
pub const OUT_OF_RANGE: &str = "Erro: freq fora do intervalo (1-40000000 Hz)\r\n";

/// Frequencies the console accepts. [`OUT_OF_RANGE`] quotes these bounds.
pub const RANGE: FrequencyRange = FrequencyRange::SERIAL;

/// Read the leading decimal digits of `input`.
///
/// Parsing stops at the first non-digit; no digits at all gives `0`.
/// Values beyond `u32::MAX` saturate.
///
/// ```
/// use ad9850_vfo::console::parse_frequency;
///
/// assert_eq!(7_100_000, parse_frequency(b"7100000Hz"));
/// assert_eq!(0, parse_frequency(b"abc"));
/// ```
pub fn parse_frequency(input: &[u8]) -> u32 {
    input
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0u32, |acc, b| acc.saturating_mul(10).saturating_add(u32::from(b - b'0')))
}

/// Outcome of one command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// The chip was updated.
    Set { frequency_hz: u32, tuning_word: u32 },
    /// The request was refused and the chip left alone.
    OutOfRange,
}

pub struct Console<S> {
    serial: S,
}

impl<S, SE> Console<S>
where
    S: Write<u8, Error = SE>,
{
    pub fn new(serial: S) -> Self {
        Self { serial }
    }

    pub fn write_banner(&mut self) -> Result<(), SE> {
        self.write_bytes(BANNER.as_bytes())
    }

    /// Execute one command line against `dds` and write the reply.
    pub fn handle_line<Reset, Data, FqUd, WClk, Delay, PE, const N: usize>(
        &mut self,
        dds: &mut Ad9850<mode::Serial, Reset, Data, FqUd, WClk, Delay>,
        line: &Line<N>,
    ) -> Result<Reply, Error<PE, SE>>
    where
        Reset: OutputPin<Error = PE>,
        Data: OutputPin<Error = PE>,
        FqUd: OutputPin<Error = PE>,
        WClk: OutputPin<Error = PE>,
        Delay: DelayUs<u16> + DelayMs<u16>,
    {
        let frequency_hz = parse_frequency(line.as_bytes());
        if line.overflowed() || !RANGE.contains(frequency_hz) {
            debug!("console: refused {=u32} Hz", frequency_hz);
            self.write_bytes(OUT_OF_RANGE.as_bytes()).map_err(Error::Serial)?;
            return Ok(Reply::OutOfRange);
        }

        let tuning_word = dds.set_frequency(frequency_hz).map_err(Error::Pin)?;
        self.write_bytes(b"Freq set: ").map_err(Error::Serial)?;
        self.write_bytes(line.as_bytes()).map_err(Error::Serial)?;
        self.write_bytes(b" Hz\r\n").map_err(Error::Serial)?;
        Ok(Reply::Set { frequency_hz, tuning_word })
    }

    pub fn release(self) -> S {
        self.serial
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), SE> {
        for &b in bytes {
            nb::block!(self.serial.write(b))?;
        }
        nb::block!(self.serial.flush())
    }
}
