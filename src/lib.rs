#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

//! An embedded async driver for the MAX14526 micro-USB interface controller (MUIC).
//!
//! The MUIC senses what is plugged into the micro-USB connector from the ID pin resistance
//! and VBUS, and routes the D+/D- lines accordingly. [`Muic`] runs the accessory detection
//! state machine on every falling edge of the MUIC interrupt line and publishes the result
//! through a shared [`MuicState`].
//!
//! The [`adc`] module drives the ADC of the MAX8907C PMIC found next to it.

mod fmt;

pub mod adc;
mod board;
mod config;
mod error;
mod mode;
mod regs;
pub mod resolver;
#[cfg(test)]
mod testing;

use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;
use embedded_hal_async::i2c::I2c;

pub use board::{Board, Dp3t, Usif};
pub use config::Config;
pub use error::Error;
pub use mode::{ChargingMode, MuicMode, MuicState, Status};
pub use regs::{ComparatorStatus, IdCode, InterruptStatus};

use regs::{control_1, control_2, Reg, SwControl, ADDR};
use resolver::{Resolution, Route};

/// Settle time between an INT_N edge and valid INT_STAT/STATUS contents
const DEBOUNCE_MS: u32 = 250;
/// Settle time of the C1 comparator after switching D- to it
const COMPARATOR_SETTLE_MS: u32 = 2;

/// A MAX14526 MUIC
pub struct Muic<'s, D, B, M: RawMutex> {
    i2c_dev: D,
    board: B,
    state: &'s MuicState<M>,
    config: Config,
}

impl<'s, D: I2c, B: Board, M: RawMutex> Muic<'s, D, B, M> {
    /// Create a new `Muic`.
    ///
    /// The driver becomes the only writer of `state`.
    pub fn new(i2c_dev: D, board: B, state: &'s MuicState<M>, config: Config) -> Self {
        Muic {
            i2c_dev,
            board,
            state,
            config,
        }
    }

    /// The shared classifier state
    pub fn state(&self) -> &'s MuicState<M> {
        self.state
    }

    /// Get the device ID.
    pub async fn device_id(&mut self) -> Result<u8, D::Error> {
        self.read_reg(Reg::DEVICE_ID).await
    }

    /// Read INT_STAT. This releases the INT_N line.
    pub async fn irq_status(&mut self) -> Result<InterruptStatus, D::Error> {
        self.read_reg(Reg::INT_STAT)
            .await
            .map(|x| InterruptStatus::from_bytes([x]))
    }

    /// Read the STATUS register
    pub async fn comparator_status(&mut self) -> Result<ComparatorStatus, D::Error> {
        self.read_reg(Reg::STATUS)
            .await
            .map(|x| ComparatorStatus::from_bytes([x]))
    }

    /// Prepare the MUIC for accessory detection.
    ///
    /// Enables the 200k ID pull-up, the ID ADC and the interrupt output. With `reset` the
    /// analog switches are opened first.
    pub async fn init(&mut self, reset: bool) -> Result<(), D::Error> {
        debug!("MUIC: init (reset = {})", reset);

        if reset {
            self.write_reg(Reg::SW_CONTROL, SwControl::open()).await?;
        }
        self.write_reg(Reg::CONTROL_1, control_1::DETECT).await?;
        self.write_reg(Reg::CONTROL_2, control_2::INT_EN).await?;

        self.board.set_dp3t(Dp3t::Nc);
        self.board.set_usif(Usif::Ap);
        Ok(())
    }

    /// Classify the attached accessory and route the connector for it.
    ///
    /// Must run in a context that may sleep for 250 ms and more, never in the interrupt
    /// handler itself. The result is published through [`Muic::state`]; the return value only
    /// tells whether the cycle completed. On an I2C error the state is `Unknown` afterwards;
    /// if INT_STAT could be read, the chip is also re-armed before returning.
    /// [`Error::Classification`] means the stored mode allowed no decision; the state was
    /// reset and the next interrupt starts over.
    pub async fn detect_accessory<T: DelayNs>(
        &mut self,
        upon_irq: bool,
        mut delay: T,
    ) -> Result<(), Error<D::Error>> {
        // TODO: check on hardware whether boot-time detection without an edge needs the full debounce.
        if !upon_irq {
            debug!("MUIC: detection without interrupt");
        }
        delay.delay_ms(DEBOUNCE_MS).await;

        let int_stat = match self.irq_status().await {
            Ok(int_stat) => int_stat,
            Err(err) => {
                warn!("MUIC: INT_STAT read failed");
                self.commit(Status::UNKNOWN);
                self.board.set_vbus_en(false);
                return Err(Error::I2c(err));
            }
        };
        debug!("MUIC: INT_STAT = {=u8:#x}", int_stat.into_bytes()[0]);

        match self.detect(int_stat, &mut delay).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::Classification),
            Err(err) => {
                warn!("MUIC: I2C error during detection, re-arming");
                self.commit(Status::UNKNOWN);
                // report the cycle error, not the re-arm error
                if self.init(true).await.is_err() {
                    warn!("MUIC: re-arm failed");
                }
                self.board.set_vbus_en(false);
                Err(Error::I2c(err))
            }
        }
    }

    /// Run detection once at start-up and then on every falling edge of `irq`.
    ///
    /// Failed detection cycles are logged and left to the next edge. Only an error from the
    /// interrupt pin ends the loop.
    pub async fn run<P: Wait, T: DelayNs>(
        &mut self,
        irq: &mut P,
        mut delay: T,
    ) -> Result<Infallible, P::Error> {
        let mut upon_irq = false;
        loop {
            match self.detect_accessory(upon_irq, &mut delay).await {
                Ok(()) => {}
                Err(Error::I2c(_)) => warn!("MUIC: I2C error during detection"),
                Err(Error::Classification) => warn!("MUIC: failed to detect an accessory"),
            }
            irq.wait_for_falling_edge().await?;
            upon_irq = true;
        }
    }

    async fn detect<T: DelayNs>(
        &mut self,
        int_stat: InterruptStatus,
        delay: &mut T,
    ) -> Result<bool, D::Error> {
        let previous = self.state.status();
        let next = match previous.mode {
            MuicMode::Unknown | MuicMode::None => Some(self.set_muic_mode(int_stat, delay).await?),
            mode if mode.is_attached() => {
                self.board.set_otg(false);
                if !int_stat.vbus() && int_stat.idno() == IdCode::DETACHED {
                    info!("MUIC: accessory unplugged");
                    Some(Status::NONE)
                } else {
                    Some(self.set_muic_mode(int_stat, delay).await?)
                }
            }
            MuicMode::Mhl if self.config.mhl_supported => {
                if int_stat.vbus() {
                    Some(previous)
                } else {
                    self.board.mhl_power(false);
                    Some(Status::NONE)
                }
            }
            _ => None,
        };

        let status = match next {
            Some(status) => status,
            None => {
                warn!("MUIC: no transition from {}", previous.mode);
                Status::UNKNOWN
            }
        };
        self.commit(status);

        if status.needs_rearm() {
            self.init(true).await?;
            self.board.set_vbus_en(false);
        }
        Ok(next.is_some())
    }

    async fn set_muic_mode<T: DelayNs>(
        &mut self,
        int_stat: InterruptStatus,
        delay: &mut T,
    ) -> Result<Status, D::Error> {
        if self.config.force_fast_charge && int_stat.vbus() {
            info!("MUIC: forcing fast charge mode");
        }

        let outcome = match resolver::resolve(int_stat, &self.config) {
            Resolution::Done(outcome) => outcome,
            Resolution::NeedsComparator => {
                self.write_reg(Reg::SW_CONTROL, SwControl::c1comp_probe())
                    .await?;
                delay.delay_ms(COMPARATOR_SETTLE_MS).await;
                let status = self.comparator_status().await?;
                resolver::resolve_comparator(status)
            }
        };

        self.apply_route(outcome.route).await?;
        Ok(outcome.status)
    }

    async fn apply_route(&mut self, route: Route) -> Result<(), D::Error> {
        trace!("MUIC: route {}", route);

        match route {
            Route::Unchanged => Ok(()),
            Route::ApUart => self.connect(Usif::Ap, Dp3t::ApUart, SwControl::uart()).await,
            Route::CpUart => self.connect(Usif::Dp3t, Dp3t::CpUart, SwControl::uart()).await,
            Route::ApUsb => self.connect(Usif::Ap, Dp3t::CpUart, SwControl::usb()).await,
            Route::CpUsb => self.connect(Usif::Ap, Dp3t::CpUsb, SwControl::uart()).await,
            Route::Charger => self.open_for_charger(false).await,
            Route::ChargerUsbOtg => {
                self.open_for_charger(true).await?;
                self.connect(Usif::Ap, Dp3t::CpUart, SwControl::usb()).await?;
                self.board.set_otg(true);
                Ok(())
            }
            Route::MhlDetect => {
                self.board.mhl_start_detect();
                Ok(())
            }
        }
    }

    /// SW_CONTROL must be written before CONTROL_1, or the charge pump raises a second interrupt.
    async fn connect(&mut self, usif: Usif, dp3t: Dp3t, sw_control: u8) -> Result<(), D::Error> {
        self.board.set_usif(usif);
        self.board.set_dp3t(dp3t);
        self.write_reg(Reg::SW_CONTROL, sw_control).await?;
        self.write_reg(Reg::CONTROL_1, control_1::CONNECTED).await
    }

    async fn open_for_charger(&mut self, rearm_irq: bool) -> Result<(), D::Error> {
        self.write_reg(Reg::SW_CONTROL, SwControl::open()).await?;
        self.write_reg(Reg::CONTROL_1, control_1::CONNECTED).await?;
        if rearm_irq {
            self.write_reg(Reg::CONTROL_2, control_2::INT_EN).await?;
        }
        Ok(())
    }

    fn commit(&mut self, status: Status) {
        debug!("MUIC: {}", status);
        self.state.commit(status);
        self.board.report_cable_type(status.charging);
    }

    async fn read_reg(&mut self, reg: Reg) -> Result<u8, D::Error> {
        let mut val = 0u8;
        self.i2c_dev
            .write_read(
                ADDR,
                core::slice::from_ref(&reg.to_u8()),
                core::slice::from_mut(&mut val),
            )
            .await?;
        Ok(val)
    }

    async fn write_reg(&mut self, reg: Reg, val: u8) -> Result<(), D::Error> {
        let buf = [reg.to_u8(), val];
        self.i2c_dev.write(ADDR, &buf).await
    }
}
