//! Recording doubles for pins, delay and serial port.
//!
//! Every pin write and delay lands in one shared event log, so tests can check
//! the exact order of operations on the wire.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::digital::v2::{InputPin, OutputPin};
use embedded_hal::serial;

use ad9850_vfo::{mode, Ad9850, Config};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Reset,
    Data,
    FqUd,
    WClk,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Pin(Signal, bool),
    DelayUs(u16),
    DelayMs(u16),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

pub struct MockPin {
    signal: Signal,
    log: Log,
}

impl OutputPin for MockPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Pin(self.signal, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Pin(self.signal, true));
        Ok(())
    }
}

pub struct MockDelay {
    log: Log,
}

impl DelayUs<u16> for MockDelay {
    fn delay_us(&mut self, us: u16) {
        self.log.borrow_mut().push(Event::DelayUs(us));
    }
}

impl DelayMs<u16> for MockDelay {
    fn delay_ms(&mut self, ms: u16) {
        self.log.borrow_mut().push(Event::DelayMs(ms));
    }
}

pub type MockDds<M> = Ad9850<M, MockPin, MockPin, MockPin, MockPin, MockDelay>;

pub fn mock_device(config: Config) -> (MockDds<mode::Init>, Log) {
    let log = Log::default();
    let pin = |signal| MockPin { signal, log: log.clone() };
    let dds = Ad9850::new_with_config(
        pin(Signal::Reset),
        pin(Signal::Data),
        pin(Signal::FqUd),
        pin(Signal::WClk),
        MockDelay { log: log.clone() },
        config,
    );
    (dds, log)
}

/// A device past its reset, with an empty log.
pub fn ready_device() -> (MockDds<mode::Serial>, Log) {
    let (dds, log) = mock_device(Config::default());
    let dds = dds.into_serial_mode().unwrap();
    log.borrow_mut().clear();
    (dds, log)
}

/// Bits sampled from DATA at each rising W_CLK edge, in order.
pub fn clocked_bits(log: &[Event]) -> Vec<bool> {
    let mut data = false;
    let mut clk = false;
    let mut bits = Vec::new();
    for event in log {
        match *event {
            Event::Pin(Signal::Data, level) => data = level,
            Event::Pin(Signal::WClk, level) => {
                if level && !clk {
                    bits.push(data);
                }
                clk = level;
            }
            _ => {}
        }
    }
    bits
}

/// Clocked bits grouped into bytes, LSB first.
pub fn clocked_bytes(log: &[Event]) -> Vec<u8> {
    clocked_bits(log)
        .chunks(8)
        .map(|bits| bits.iter().enumerate().fold(0u8, |b, (i, &bit)| b | (u8::from(bit) << i)))
        .collect()
}

pub fn rising_edges(log: &[Event], signal: Signal) -> usize {
    let mut level = false;
    let mut count = 0;
    for event in log {
        if let Event::Pin(s, l) = *event {
            if s == signal {
                if l && !level {
                    count += 1;
                }
                level = l;
            }
        }
    }
    count
}

pub fn pin_events(log: &[Event], signal: Signal) -> Vec<bool> {
    log.iter()
        .filter_map(|e| match *e {
            Event::Pin(s, level) if s == signal => Some(level),
            _ => None,
        })
        .collect()
}

/// Serial port that records writes and replays queued input.
#[derive(Default)]
pub struct MockSerial {
    pub written: Vec<u8>,
    pub input: VecDeque<u8>,
}

impl MockSerial {
    pub fn with_input(input: &[u8]) -> Self {
        Self { written: Vec::new(), input: input.iter().copied().collect() }
    }

    pub fn written_str(&self) -> &str {
        std::str::from_utf8(&self.written).unwrap()
    }
}

impl serial::Write<u8> for MockSerial {
    type Error = Infallible;

    fn write(&mut self, word: u8) -> nb::Result<(), Self::Error> {
        self.written.push(word);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        Ok(())
    }
}

impl serial::Read<u8> for MockSerial {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        self.input.pop_front().ok_or(nb::Error::WouldBlock)
    }
}

/// Input pin replaying a fixed sequence of levels, then holding the last one.
pub struct ScriptedInput {
    levels: RefCell<VecDeque<bool>>,
    last: RefCell<bool>,
}

impl ScriptedInput {
    pub fn new(levels: &[bool]) -> Self {
        Self { levels: RefCell::new(levels.iter().copied().collect()), last: RefCell::new(false) }
    }

    fn next(&self) -> bool {
        if let Some(level) = self.levels.borrow_mut().pop_front() {
            *self.last.borrow_mut() = level;
        }
        *self.last.borrow()
    }
}

impl InputPin for ScriptedInput {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.next())
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(!self.next())
    }
}

/// Output pin that always fails.
pub struct BrokenPin;

#[derive(Debug, PartialEq, Eq)]
pub struct PinFault;

impl OutputPin for BrokenPin {
    type Error = PinFault;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(PinFault)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(PinFault)
    }
}

/// Delay that does nothing.
pub struct NoDelay;

impl DelayUs<u16> for NoDelay {
    fn delay_us(&mut self, _us: u16) {}
}

impl DelayMs<u16> for NoDelay {
    fn delay_ms(&mut self, _ms: u16) {}
}
