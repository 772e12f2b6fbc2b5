//! Single-slot line mailbox between a receive interrupt and the main loop.
//!
//! The producer feeds bytes with [`LineMailbox::push`] until a `\r` or `\n`
//! completes the line. The consumer picks it up with [`LineMailbox::take`].
//! Until then the slot is full and further bytes are dropped.

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::serial::Read;
use heapless::Vec;

/// What happens to a line longer than the mailbox capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OverflowPolicy {
    /// Keep the first `N` bytes and deliver them as an ordinary line.
    Truncate,
    /// Deliver the line marked [`overflowed`](Line::overflowed) so the consumer can refuse it.
    Reject,
}

/// A completed line, without its terminator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line<const N: usize> {
    bytes: Vec<u8, N>,
    overflowed: bool,
}

impl<const N: usize> Line<N> {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// `true` if bytes were lost and the mailbox policy is [`OverflowPolicy::Reject`].
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }
}

struct Slot<const N: usize> {
    bytes: Vec<u8, N>,
    overflowed: bool,
    ready: bool,
    dropped: u32,
}

pub struct LineMailbox<const N: usize> {
    policy: OverflowPolicy,
    slot: Mutex<RefCell<Slot<N>>>,
}

impl<const N: usize> LineMailbox<N> {
    pub const fn new(policy: OverflowPolicy) -> Self {
        Self {
            policy,
            slot: Mutex::new(RefCell::new(Slot {
                bytes: Vec::new(),
                overflowed: false,
                ready: false,
                dropped: 0,
            })),
        }
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Producer side. Safe to call from an interrupt handler.
    ///
    /// Returns `true` when `byte` completed a line.
    pub fn push(&self, byte: u8) -> bool {
        critical_section::with(|cs| {
            let mut slot = self.slot.borrow_ref_mut(cs);
            if slot.ready {
                // second half of "\r\n" is not lost data
                if matches!(byte, b'\r' | b'\n') {
                    return false;
                }
                slot.dropped = slot.dropped.saturating_add(1);
                return false;
            }
            match byte {
                b'\r' | b'\n' => {
                    // "\r\n" and blank lines don't produce empty commands
                    if slot.bytes.is_empty() && !slot.overflowed {
                        return false;
                    }
                    slot.ready = true;
                    true
                }
                _ => {
                    if slot.bytes.push(byte).is_err() {
                        slot.overflowed = true;
                        slot.dropped = slot.dropped.saturating_add(1);
                    }
                    false
                }
            }
        })
    }

    /// Consumer side. Drains the slot if a complete line is waiting.
    pub fn take(&self) -> Option<Line<N>> {
        critical_section::with(|cs| {
            let mut slot = self.slot.borrow_ref_mut(cs);
            if !slot.ready {
                return None;
            }
            let bytes = core::mem::take(&mut slot.bytes);
            let overflowed = slot.overflowed && self.policy == OverflowPolicy::Reject;
            slot.overflowed = false;
            slot.ready = false;
            Some(Line { bytes, overflowed })
        })
    }

    pub fn is_ready(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow_ref(cs).ready)
    }

    /// Bytes dropped so far, either because the slot was full or the line too long.
    pub fn dropped(&self) -> u32 {
        critical_section::with(|cs| self.slot.borrow_ref(cs).dropped)
    }
}

/// Move everything `reader` has buffered into `mailbox`.
///
/// For setups that poll the UART instead of using a receive interrupt.
pub fn pump<R, const N: usize>(reader: &mut R, mailbox: &LineMailbox<N>) -> Result<(), R::Error>
where
    R: Read<u8>,
{
    loop {
        match reader.read() {
            Ok(byte) => {
                mailbox.push(byte);
            }
            Err(nb::Error::WouldBlock) => return Ok(()),
            Err(nb::Error::Other(e)) => return Err(e),
        }
    }
}
