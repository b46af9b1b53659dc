/// Errors from accessory detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Error<E> {
    /// An I2C transaction with the MUIC failed
    I2c(E),
    /// The stored mode did not allow a decision; the state was reset to `Unknown`
    Classification,
}
