//! MAX14526 register map and register images.

use modular_bitfield::{bitfield, specifiers::B1, specifiers::B5, BitfieldSpecifier};

/// 7-bit I2C address of the MAX14526.
pub(crate) const ADDR: u8 = 0x44;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub(crate) struct Reg(pub u8);

impl Reg {
    pub const DEVICE_ID: Reg = Reg(0x00);
    pub const CONTROL_1: Reg = Reg(0x01);
    pub const CONTROL_2: Reg = Reg(0x02);
    pub const SW_CONTROL: Reg = Reg(0x03);
    pub const INT_STAT: Reg = Reg(0x04);
    pub const STATUS: Reg = Reg(0x05);

    pub const fn to_u8(self) -> u8 {
        self.0
    }
}

/// CONTROL_1 bits
#[allow(dead_code)]
pub(crate) mod control_1 {
    pub const ID_2P2: u8 = 0x40;
    pub const ID_620: u8 = 0x20;
    pub const ID_200: u8 = 0x10;
    pub const VLDO: u8 = 0x08;
    pub const SEMREN: u8 = 0x04;
    pub const ADC_EN: u8 = 0x02;
    pub const CP_EN: u8 = 0x01;

    /// 200k pull-up and ADC, used while waiting for an accessory
    pub const DETECT: u8 = ID_200 | ADC_EN;
    /// 200k pull-up, ADC and charge pump, used once a path is connected
    pub const CONNECTED: u8 = ID_200 | ADC_EN | CP_EN;
}

/// CONTROL_2 bits
#[allow(dead_code)]
pub(crate) mod control_2 {
    pub const INTPOL: u8 = 0x80;
    pub const INT_EN: u8 = 0x40;
    pub const MIC_LP: u8 = 0x20;
    pub const CP_AUD: u8 = 0x10;
    pub const CHG_TYPE: u8 = 0x02;
    pub const USB_DET_DIS: u8 = 0x01;
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, BitfieldSpecifier)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[bits = 4]
#[allow(missing_docs)]
/// Resistance code read from the ID pin (IDNO)
pub enum IdCode {
    /// ID shorted to ground
    #[default]
    Id0000,
    Id0001,
    Id0010,
    Id0011,
    Id0100,
    Id0101,
    Id0110,
    Id0111,
    Id1000,
    Id1001,
    Id1010,
    /// ID pin open
    Id1011,
    Id1100,
    Id1101,
    Id1110,
    Id1111,
}

impl IdCode {
    /// MHL transmitter
    pub const MHL: IdCode = IdCode::Id0000;
    /// AP UART cable
    pub const UART: IdCode = IdCode::Id0010;
    /// CP UART cable
    pub const CP_UART: IdCode = IdCode::Id0100;
    /// Factory USB cable, first variant
    pub const FACTORY_A: IdCode = IdCode::Id1001;
    /// Factory USB cable, second variant
    pub const FACTORY_B: IdCode = IdCode::Id1010;
    /// Nothing on the ID pin
    pub const DETACHED: IdCode = IdCode::Id1011;

    /// Is this one of the factory USB cable codes?
    pub fn is_factory(self) -> bool {
        self == Self::FACTORY_A || self == Self::FACTORY_B
    }
}

#[bitfield(bits = 8)]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, BitfieldSpecifier)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
/// Contents of the INT_STAT register
pub struct InterruptStatus {
    #[bits = 4]
    pub idno: IdCode,
    pub vbus: bool,
    pub sendend: bool,
    pub mr_comp: bool,
    pub chgdet: bool,
}

#[bitfield(bits = 8)]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, BitfieldSpecifier)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
/// Contents of the STATUS register
pub struct ComparatorStatus {
    pub c1comp: bool,
    #[skip]
    __: B5,
    pub chport: bool,
    pub dcport: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BitfieldSpecifier)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[bits = 3]
#[allow(dead_code)]
pub(crate) enum Comn1 {
    Dn1 = 0,
    U1 = 1,
    Aud1 = 2,
    C1Comp = 3,
    Hz = 7,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BitfieldSpecifier)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[bits = 3]
#[allow(dead_code)]
pub(crate) enum Comp2 {
    Dp2 = 0,
    U2 = 1,
    Aud2 = 2,
    Hz = 7,
}

#[bitfield(bits = 8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub(crate) struct SwControl {
    #[bits = 3]
    comn1: Comn1,
    #[bits = 3]
    comp2: Comp2,
    mic_on: bool,
    #[skip]
    __: B1,
}

impl SwControl {
    fn route(comp2: Comp2, comn1: Comn1) -> u8 {
        SwControl::new()
            .with_comp2(comp2)
            .with_comn1(comn1)
            .into_bytes()[0]
    }

    /// Both switches open
    pub fn open() -> u8 {
        Self::route(Comp2::Hz, Comn1::Hz)
    }

    /// D+/D- to the USB pair
    pub fn usb() -> u8 {
        Self::route(Comp2::Dp2, Comn1::Dn1)
    }

    /// D+/D- to the UART pair
    pub fn uart() -> u8 {
        Self::route(Comp2::U2, Comn1::U1)
    }

    /// D- to the C1 comparator, D+ open
    pub fn c1comp_probe() -> u8 {
        Self::route(Comp2::Hz, Comn1::C1Comp)
    }
}
