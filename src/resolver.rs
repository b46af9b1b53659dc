//! Accessory decision table.
//!
//! The resolver only decides; [`crate::Muic`] applies the decision to the hardware.

use crate::regs::{ComparatorStatus, IdCode, InterruptStatus};
use crate::{ChargingMode, Config, MuicMode, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
/// Signal routing selected for an accessory
pub enum Route {
    /// Leave switches as they are
    Unchanged,
    /// UART to the application processor
    ApUart,
    /// UART to the modem
    CpUart,
    /// USB to the application processor
    ApUsb,
    /// USB to the modem
    CpUsb,
    /// Data lines open, charge pump on
    Charger,
    /// Charger settings with interrupts re-armed, then USB to the AP with OTG power on
    ChargerUsbOtg,
    /// Let the MHL transmitter take over detection
    MhlDetect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
/// A final classification with the routing it needs
pub struct Outcome {
    /// New classifier state
    pub status: Status,
    /// Switch configuration to apply
    pub route: Route,
}

impl Outcome {
    const fn new(mode: MuicMode, charging: ChargingMode, route: Route) -> Self {
        Outcome {
            status: Status::new(mode, charging),
            route,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
/// Result of looking at INT_STAT
pub enum Resolution {
    /// INT_STAT was conclusive
    Done(Outcome),
    /// VBUS is present but neither the ID code nor CHGDET say what is attached.
    /// The C1 comparator has to be probed and fed to [`resolve_comparator`].
    NeedsComparator,
}

/// Classify an INT_STAT snapshot.
pub fn resolve(int_stat: InterruptStatus, config: &Config) -> Resolution {
    use Resolution::Done;

    let id = int_stat.idno();

    if config.force_fast_charge {
        return if int_stat.vbus() {
            Done(Outcome::new(MuicMode::LgTa, ChargingMode::LgTa, Route::Charger))
        } else {
            Done(Outcome::new(MuicMode::None, ChargingMode::None, Route::Unchanged))
        };
    }

    if !int_stat.vbus() {
        return Done(match id {
            IdCode::UART => Outcome::new(MuicMode::ApUart, ChargingMode::None, Route::ApUart),
            IdCode::CP_UART => Outcome::new(MuicMode::CpUart, ChargingMode::None, Route::CpUart),
            _ => Outcome::new(MuicMode::None, ChargingMode::None, Route::Unchanged),
        });
    }

    if id.is_factory() {
        Done(Outcome::new(MuicMode::CpUsb, ChargingMode::Factory, Route::CpUsb))
    } else if id == IdCode::UART {
        if config.remap_uart_id_to_cp_usb {
            Done(Outcome::new(MuicMode::CpUsb, ChargingMode::Factory, Route::CpUsb))
        } else {
            Done(Outcome::new(MuicMode::ApUart, ChargingMode::Factory, Route::ApUart))
        }
    } else if id == IdCode::CP_UART {
        Done(Outcome::new(MuicMode::CpUart, ChargingMode::Factory, Route::CpUart))
    } else if id == IdCode::MHL && config.mhl_supported {
        Done(Outcome::new(MuicMode::Mhl, ChargingMode::Usb, Route::MhlDetect))
    } else if int_stat.chgdet() {
        Done(Outcome::new(MuicMode::LgTa, ChargingMode::LgTa, Route::Charger))
    } else {
        Resolution::NeedsComparator
    }
}

/// Classify a VBUS-powered accessory from the C1 comparator.
///
/// Some chargers without an ID resistor look like a USB host until D- is probed.
pub fn resolve_comparator(status: ComparatorStatus) -> Outcome {
    if status.c1comp() {
        Outcome::new(MuicMode::ApUsb, ChargingMode::LgTa, Route::ChargerUsbOtg)
    } else {
        Outcome::new(MuicMode::ApUsb, ChargingMode::Usb, Route::ApUsb)
    }
}
