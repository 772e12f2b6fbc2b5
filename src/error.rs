/// Failure of an operation that touches both the DDS pins and a serial port.
///
/// Driver-only operations return the pins' own error type instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<PinE, SerialE> {
    /// Setting one of the DDS output pins failed.
    Pin(PinE),
    /// Writing to the serial port failed.
    Serial(SerialE),
}
