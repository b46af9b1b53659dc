//! Accessory classification results and the state shared with the charging side.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
/// The accessory the MUIC believes is attached
pub enum MuicMode {
    /// Not classified yet, or the last classification failed
    #[default]
    Unknown,
    /// Nothing attached
    None,
    /// Non-LG travel adapter
    NaTa,
    /// LG travel adapter
    LgTa,
    /// 1A travel adapter
    Ta1A,
    /// Charger that could not be identified
    InvalidChg,
    /// UART cable routed to the application processor
    ApUart,
    /// UART cable routed to the modem
    CpUart,
    /// USB host routed to the application processor
    ApUsb,
    /// USB routed to the modem
    CpUsb,
    /// MHL transmitter
    Mhl,
    /// USB On-The-Go device
    Otg,
}

impl MuicMode {
    /// Is an accessory with a known signal path attached?
    ///
    /// Detection following one of these modes always starts by turning OTG power off.
    pub fn is_attached(self) -> bool {
        matches!(
            self,
            MuicMode::NaTa
                | MuicMode::Ta1A
                | MuicMode::InvalidChg
                | MuicMode::LgTa
                | MuicMode::ApUart
                | MuicMode::CpUart
                | MuicMode::ApUsb
                | MuicMode::CpUsb
        )
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
/// How the charger should treat the attached accessory
pub enum ChargingMode {
    /// No charging source
    None,
    /// Factory cable: charge without current negotiation
    Factory,
    /// Wall adapter
    LgTa,
    /// USB host, limited current
    Usb,
    /// Not known yet
    #[default]
    Unknown,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
/// A classification result. Both halves always change together.
pub struct Status {
    /// Attached accessory
    pub mode: MuicMode,
    /// Charging classification of `mode`
    pub charging: ChargingMode,
}

impl Status {
    /// Nothing known, the state after power-up or any failure
    pub const UNKNOWN: Status = Status::new(MuicMode::Unknown, ChargingMode::Unknown);
    /// Nothing attached
    pub const NONE: Status = Status::new(MuicMode::None, ChargingMode::None);

    /// Create a new `Status`
    pub const fn new(mode: MuicMode, charging: ChargingMode) -> Self {
        Status { mode, charging }
    }

    /// Does this status call for re-arming the chip?
    pub fn needs_rearm(self) -> bool {
        matches!(self.mode, MuicMode::Unknown | MuicMode::None)
    }
}

/// Classifier state shared between the detection task and its readers.
///
/// The driver is the only writer. Everyone else observes the latest committed [`Status`]
/// through the accessors, which never see a mode from one cycle paired with the charging
/// mode of another.
///
/// ```ignore
/// static MUIC_STATE: MuicState<CriticalSectionRawMutex> = MuicState::new();
/// ```
pub struct MuicState<M: RawMutex> {
    inner: Mutex<M, Cell<Status>>,
}

impl<M: RawMutex> MuicState<M> {
    /// Create a new state holder at `Unknown`/`Unknown`
    pub const fn new() -> Self {
        MuicState {
            inner: Mutex::new(Cell::new(Status::UNKNOWN)),
        }
    }

    /// The last committed classification
    pub fn status(&self) -> Status {
        self.inner.lock(|s| s.get())
    }

    /// The attached accessory
    pub fn mode(&self) -> MuicMode {
        self.status().mode
    }

    /// The charging classification
    pub fn charging_mode(&self) -> ChargingMode {
        self.status().charging
    }

    pub(crate) fn commit(&self, status: Status) {
        self.inner.lock(|s| s.set(status))
    }
}

impl<M: RawMutex> Default for MuicState<M> {
    fn default() -> Self {
        Self::new()
    }
}
