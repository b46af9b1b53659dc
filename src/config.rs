/// Board variant options for accessory detection
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Config {
    /// An MHL transmitter is fitted and handles ID code `0000` with VBUS present
    pub mhl_supported: bool,
    /// Route the UART ID code to the modem USB path instead of the AP UART when VBUS is present
    pub remap_uart_id_to_cp_usb: bool,
    /// Treat anything with VBUS as a wall adapter, ignoring the ID pin
    pub force_fast_charge: bool,
}
