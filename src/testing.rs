//! Recording fakes shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use embedded_hal::digital::ErrorKind as PinErrorKind;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;
use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, Operation, SevenBitAddress};

use crate::board::{Board, Dp3t, Usif};
use crate::ChargingMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Delay(u32),
    Read(u8, u8),
    Write(u8, u8, u8),
    Dp3t(Dp3t),
    Usif(Usif),
    Otg(bool),
    VbusEn(bool),
    Report(ChargingMode),
    MhlDetect,
    MhlPower(bool),
}

#[derive(Clone, Default)]
pub struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn take(&self) -> Vec<Event> {
        core::mem::take(&mut *self.0.borrow_mut())
    }

    pub fn position(&self, event: Event) -> Option<usize> {
        self.0.borrow().iter().position(|e| *e == event)
    }
}

/// An I2C bus with scripted register contents. Clones share registers and failures.
#[derive(Clone)]
pub struct FakeI2c {
    log: Log,
    regs: Rc<RefCell<HashMap<(u8, u8), u8>>>,
    fail_read: Rc<Cell<Option<(u8, u8)>>>,
    fail_write: Rc<Cell<Option<(u8, u8)>>>,
    pointer: HashMap<u8, u8>,
}

impl FakeI2c {
    pub fn new(log: &Log) -> Self {
        FakeI2c {
            log: log.clone(),
            regs: Rc::default(),
            fail_read: Rc::default(),
            fail_write: Rc::default(),
            pointer: HashMap::new(),
        }
    }

    pub fn set(&self, addr: u8, reg: u8, val: u8) {
        self.regs.borrow_mut().insert((addr, reg), val);
    }

    pub fn fail_read(&self, addr: u8, reg: u8) {
        self.fail_read.set(Some((addr, reg)));
    }

    /// Fail the next write to `reg`; later writes to it go through.
    pub fn fail_write(&self, addr: u8, reg: u8) {
        self.fail_write.set(Some((addr, reg)));
    }
}

impl ErrorType for FakeI2c {
    type Error = ErrorKind;
}

impl I2c<SevenBitAddress> for FakeI2c {
    async fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    let Some((&reg, rest)) = bytes.split_first() else {
                        continue;
                    };
                    self.pointer.insert(address, reg);
                    for (i, &val) in rest.iter().enumerate() {
                        let reg = reg + i as u8;
                        if self.fail_write.get() == Some((address, reg)) {
                            self.fail_write.set(None);
                            return Err(ErrorKind::Other);
                        }
                        self.log.push(Event::Write(address, reg, val));
                    }
                }
                Operation::Read(buf) => {
                    let reg = self.pointer.get(&address).copied().unwrap_or(0);
                    if self.fail_read.get() == Some((address, reg)) {
                        return Err(ErrorKind::Other);
                    }
                    for (i, byte) in buf.iter_mut().enumerate() {
                        let reg = reg + i as u8;
                        self.log.push(Event::Read(address, reg));
                        *byte = self.regs.borrow().get(&(address, reg)).copied().unwrap_or(0);
                    }
                }
            }
        }
        Ok(())
    }
}

pub struct FakeDelay {
    log: Log,
}

impl FakeDelay {
    pub fn new(log: &Log) -> Self {
        FakeDelay { log: log.clone() }
    }
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::Delay(ns / 1_000_000));
    }

    async fn delay_us(&mut self, us: u32) {
        self.log.push(Event::Delay(us / 1_000));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.log.push(Event::Delay(ms));
    }
}

pub struct FakeBoard {
    log: Log,
}

impl FakeBoard {
    pub fn new(log: &Log) -> Self {
        FakeBoard { log: log.clone() }
    }
}

impl Board for FakeBoard {
    fn set_dp3t(&mut self, target: Dp3t) {
        self.log.push(Event::Dp3t(target));
    }

    fn set_usif(&mut self, target: Usif) {
        self.log.push(Event::Usif(target));
    }

    fn set_otg(&mut self, enable: bool) {
        self.log.push(Event::Otg(enable));
    }

    fn set_vbus_en(&mut self, high: bool) {
        self.log.push(Event::VbusEn(high));
    }

    fn report_cable_type(&mut self, mode: ChargingMode) {
        self.log.push(Event::Report(mode));
    }

    fn mhl_start_detect(&mut self) {
        self.log.push(Event::MhlDetect);
    }

    fn mhl_power(&mut self, on: bool) {
        self.log.push(Event::MhlPower(on));
    }
}

/// An interrupt line that delivers a fixed number of falling edges and then fails
pub struct FakeIrq {
    edges: u32,
}

impl FakeIrq {
    pub fn new(edges: u32) -> Self {
        FakeIrq { edges }
    }

    fn edge(&mut self) -> Result<(), PinErrorKind> {
        if self.edges == 0 {
            return Err(PinErrorKind::Other);
        }
        self.edges -= 1;
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for FakeIrq {
    type Error = PinErrorKind;
}

impl Wait for FakeIrq {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        self.edge()
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        self.edge()
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        self.edge()
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        self.edge()
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        self.edge()
    }
}
