//! Board wiring around the MUIC.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
/// Position of the DP3T switch in front of the MUIC UART pins
pub enum Dp3t {
    /// Not connected
    Nc,
    /// Application processor UART
    ApUart,
    /// Modem UART
    CpUart,
    /// Modem USB
    CpUsb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
/// Position of the USIF switch on the modem UART lines
pub enum Usif {
    /// Modem UART to the application processor
    Ap,
    /// Modem UART to the DP3T switch
    Dp3t,
}

/// Everything the MUIC driver controls that is not a MUIC register.
///
/// All methods are commands towards a target configuration and must be idempotent.
pub trait Board {
    /// Set the DP3T analog switch
    fn set_dp3t(&mut self, target: Dp3t);

    /// Set the USIF analog switch
    fn set_usif(&mut self, target: Usif);

    /// Turn USB OTG host power on or off
    fn set_otg(&mut self, enable: bool);

    /// Drive the modem VBUS enable line
    fn set_vbus_en(&mut self, high: bool);

    /// Tell the charging side what has been detected
    fn report_cable_type(&mut self, mode: crate::ChargingMode);

    /// Hand the connector to the MHL transmitter for its own detection
    fn mhl_start_detect(&mut self) {}

    /// Power the MHL transmitter up or down
    fn mhl_power(&mut self, _on: bool) {}
}

impl<T: Board + ?Sized> Board for &mut T {
    fn set_dp3t(&mut self, target: Dp3t) {
        T::set_dp3t(self, target)
    }

    fn set_usif(&mut self, target: Usif) {
        T::set_usif(self, target)
    }

    fn set_otg(&mut self, enable: bool) {
        T::set_otg(self, enable)
    }

    fn set_vbus_en(&mut self, high: bool) {
        T::set_vbus_en(self, high)
    }

    fn report_cable_type(&mut self, mode: crate::ChargingMode) {
        T::report_cable_type(self, mode)
    }

    fn mhl_start_detect(&mut self) {
        T::mhl_start_detect(self)
    }

    fn mhl_power(&mut self, on: bool) {
        T::mhl_power(self, on)
    }
}
