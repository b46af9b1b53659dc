//! ADC of the MAX8907C PMIC: battery voltage, battery thermistor and AUX2.
//!
//! The ADC answers on its own I2C address; the internal reference it needs is switched on
//! through the power block.

use embedded_hal_async::i2c::I2c;

const POWER_ADDR: u8 = 0x3c;
const ADC_ADDR: u8 = 0x47;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
struct Reg(pub u8);

impl Reg {
    // power block
    pub const RESET_CNFG: Reg = Reg(0x0f);
    pub const CHG_STAT: Reg = Reg(0x82);

    // ADC block
    pub const TSC_CNFG1: Reg = Reg(0x05);
    pub const ADC_RES_CNFG1: Reg = Reg(0x06);
    pub const ADC_AVG_CNFG1: Reg = Reg(0x07);
    pub const ADC_ACQ_CNFG1: Reg = Reg(0x08);
    pub const ADC_SCHED: Reg = Reg(0x10);
    pub const VMBATT_MSB: Reg = Reg(0x54);
    pub const VMBATT_LSB: Reg = Reg(0x55);
    pub const THM_MSB: Reg = Reg(0x58);
    pub const THM_LSB: Reg = Reg(0x59);
    pub const AUX2_MSB: Reg = Reg(0x64);
    pub const AUX2_LSB: Reg = Reg(0x65);

    pub const fn to_u8(self) -> u8 {
        self.0
    }
}

const INT_REF_EN: u8 = 0x01;
/// Internal reference on, touch screen off
const TSC_REF_ON: u8 = 0x12;
const VCHG_OK: u8 = 0x80;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
enum Channel {
    Vmbatt,
    Thm,
    Aux2,
}

impl Channel {
    /// Writing to this register starts a single conversion with the reference on
    fn command(self) -> Reg {
        match self {
            Channel::Vmbatt => Reg(0x2a),
            Channel::Thm => Reg(0x3a),
            Channel::Aux2 => Reg(0x8a),
        }
    }

    fn result(self) -> (Reg, Reg) {
        match self {
            Channel::Vmbatt => (Reg::VMBATT_MSB, Reg::VMBATT_LSB),
            Channel::Thm => (Reg::THM_MSB, Reg::THM_LSB),
            Channel::Aux2 => (Reg::AUX2_MSB, Reg::AUX2_LSB),
        }
    }
}

/// The ADC of a MAX8907C PMIC
pub struct Max8907cAdc<D> {
    i2c_dev: D,
}

impl<D: I2c> Max8907cAdc<D> {
    /// Create a new `Max8907cAdc`
    pub fn new(i2c_dev: D) -> Self {
        Max8907cAdc { i2c_dev }
    }

    /// Configure resolution, averaging and acquisition time for single conversions.
    pub async fn init(&mut self) -> Result<(), D::Error> {
        self.modify_reg(ADC_ADDR, Reg::ADC_RES_CNFG1, |x| x & !0x40).await?;
        self.modify_reg(ADC_ADDR, Reg::ADC_AVG_CNFG1, |x| x | 0x40).await?;
        self.modify_reg(ADC_ADDR, Reg::ADC_ACQ_CNFG1, |x| x | 0x20).await?;
        self.modify_reg(ADC_ADDR, Reg::ADC_SCHED, |x| (x & !0x03) | 0x01)
            .await
    }

    /// AUX2 input in millivolts, 0 to 2500 mV
    pub async fn read_aux2_mv(&mut self) -> Result<u16, D::Error> {
        let code = self.convert(Channel::Aux2).await?;
        Ok((u32::from(code) * 2500 / 0xfff) as u16)
    }

    /// Main battery voltage in millivolts
    pub async fn read_battery_mv(&mut self) -> Result<u16, D::Error> {
        // 8.192 V full scale over 12 bits
        let code = self.convert(Channel::Vmbatt).await?;
        Ok(code * 2)
    }

    /// Raw 12-bit battery thermistor reading
    pub async fn read_battery_temp_raw(&mut self) -> Result<u16, D::Error> {
        self.convert(Channel::Thm).await
    }

    /// Raw 12-bit AUX2 reading, used for headset hook detection
    pub async fn read_hook_adc(&mut self) -> Result<u16, D::Error> {
        self.convert(Channel::Aux2).await
    }

    /// Is a valid charger voltage present?
    pub async fn charger_ok(&mut self) -> Result<bool, D::Error> {
        let stat = self.read_reg(POWER_ADDR, Reg::CHG_STAT).await?;
        Ok(stat & VCHG_OK != 0)
    }

    async fn convert(&mut self, channel: Channel) -> Result<u16, D::Error> {
        self.modify_reg(POWER_ADDR, Reg::RESET_CNFG, |x| x | INT_REF_EN)
            .await?;
        self.write_reg(ADC_ADDR, Reg::TSC_CNFG1, TSC_REF_ON).await?;
        self.write_reg(ADC_ADDR, channel.command(), 0x00).await?;

        let code = self.read_result(channel).await;
        self.modify_reg(POWER_ADDR, Reg::RESET_CNFG, |x| x & !INT_REF_EN)
            .await?;
        let code = code?;
        trace!("MAX8907C: {} = {=u16}", channel, code);
        Ok(code)
    }

    async fn read_result(&mut self, channel: Channel) -> Result<u16, D::Error> {
        let (msb_reg, lsb_reg) = channel.result();
        let msb = self.read_reg(ADC_ADDR, msb_reg).await?;
        let lsb = self.read_reg(ADC_ADDR, lsb_reg).await?;
        Ok((u16::from(msb) << 4) | (u16::from(lsb) >> 4))
    }

    async fn read_reg(&mut self, addr: u8, reg: Reg) -> Result<u8, D::Error> {
        let mut val = 0u8;
        self.i2c_dev
            .write_read(
                addr,
                core::slice::from_ref(&reg.to_u8()),
                core::slice::from_mut(&mut val),
            )
            .await?;
        Ok(val)
    }

    async fn write_reg(&mut self, addr: u8, reg: Reg, val: u8) -> Result<(), D::Error> {
        let buf = [reg.to_u8(), val];
        self.i2c_dev.write(addr, &buf).await
    }

    async fn modify_reg<F: FnOnce(u8) -> u8>(
        &mut self,
        addr: u8,
        reg: Reg,
        func: F,
    ) -> Result<(), D::Error> {
        let val = self.read_reg(addr, reg).await?;
        let val = func(val);
        self.write_reg(addr, reg, val).await
    }
}
