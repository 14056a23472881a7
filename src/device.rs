//! SX127x register bus
//!
//! This module layers the SX127x SPI access protocol on top of an
//! [`embedded_hal::spi::SpiDevice`]. Every access starts with one address byte whose MSB
//! selects the direction (1 = write, 0 = read), followed by one or more data bytes. Multi-byte
//! accesses auto-increment the address, except at the FIFO port where the chip advances
//! RegFifoAddrPtr instead.
//!
//! The SPI device lives behind a [`critical_section::Mutex`], so a `&Device` can be shared
//! between thread and interrupt context. [`Device::lock`] hands out a [`Bus`] for sequences of
//! transactions that must not be interleaved with other accesses.
//!
//! # Example
//! ```no_run
//! use sx127x::{registers::SyncWord, Device};
//! # fn demo<SPI: embedded_hal::spi::SpiDevice>(spi: SPI) -> Result<(), sx127x::Error> {
//! let device = Device::new(spi);
//!
//! // Typed access
//! let sync: SyncWord = device.read_register()?;
//!
//! // Raw access
//! device.write_byte(0x39, sync.value)?;
//! # Ok(())
//! # }
//! ```

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::spi::{Operation, SpiDevice};
use regiface::{ByteArray, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use crate::Error;

const WRITE_FLAG: u8 = 0x80;
const ADDRESS_MASK: u8 = 0x7F;

/// Register bus of one SX127x chip.
pub struct Device<SPI> {
    spi: Mutex<RefCell<SPI>>,
}

impl<SPI> Device<SPI> {
    /// Creates a new Device instance wrapping the provided SPI device.
    pub fn new(spi: SPI) -> Self {
        Self {
            spi: Mutex::new(RefCell::new(spi)),
        }
    }

    /// Releases the underlying SPI device.
    pub fn release(self) -> SPI {
        self.spi.into_inner().into_inner()
    }
}

impl<SPI> Device<SPI>
where
    SPI: SpiDevice,
{
    /// Runs `f` with exclusive access to the bus.
    ///
    /// No other register access, from any context, can happen until `f` returns. Keep `f`
    /// short: interrupts are disabled for its whole duration on single-core targets.
    pub fn lock<T>(&self, f: impl FnOnce(&mut Bus<'_, SPI>) -> Result<T, Error>) -> Result<T, Error> {
        critical_section::with(|cs| {
            let mut spi = self.spi.borrow_ref_mut(cs);
            f(&mut Bus { spi: &mut *spi })
        })
    }

    /// Reads a register value from the device.
    ///
    /// # Errors
    /// * [`Error::TransportFailure`] - SPI communication failed
    /// * [`Error::InvalidParameter`] - the register holds an undefined bit pattern
    pub fn read_register<R>(&self) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8>,
        <R as FromByteArray>::Error: Into<Error>,
    {
        self.lock(|bus| bus.read_register())
    }

    /// Writes a value to a device register.
    ///
    /// # Errors
    /// * [`Error::TransportFailure`] - SPI communication failed
    /// * [`Error::InvalidParameter`] - a field of `register` is out of range
    pub fn write_register<R>(&self, register: R) -> Result<(), Error>
    where
        R: WritableRegister<IdType = u8>,
        <R as ToByteArray>::Error: Into<Error>,
    {
        self.lock(|bus| bus.write_register(register))
    }

    /// Reads a register, applies `f` and writes the result back as one locked sequence.
    ///
    /// Nothing is written if `f` fails. Returns the value written.
    pub fn modify_register<R>(&self, f: impl FnOnce(R) -> Result<R, Error>) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8> + WritableRegister<IdType = u8> + Copy,
        <R as FromByteArray>::Error: Into<Error>,
        <R as ToByteArray>::Error: Into<Error>,
    {
        self.lock(|bus| bus.modify_register(f))
    }

    /// Reads the byte at `address`.
    pub fn read_byte(&self, address: u8) -> Result<u8, Error> {
        let mut value = [0];
        self.read_burst(address, &mut value)?;
        Ok(value[0])
    }

    /// Writes `value` to `address`.
    pub fn write_byte(&self, address: u8, value: u8) -> Result<(), Error> {
        self.write_burst(address, &[value])
    }

    /// Reads `bytes.len()` bytes starting at `address`.
    pub fn read_burst(&self, address: u8, bytes: &mut [u8]) -> Result<(), Error> {
        self.lock(|bus| bus.read_burst(address, bytes))
    }

    /// Writes `bytes` starting at `address`.
    pub fn write_burst(&self, address: u8, bytes: &[u8]) -> Result<(), Error> {
        self.lock(|bus| bus.write_burst(address, bytes))
    }
}

/// Exclusive access to the bus, obtained through [`Device::lock`].
pub struct Bus<'a, SPI> {
    spi: &'a mut SPI,
}

impl<SPI> Bus<'_, SPI>
where
    SPI: SpiDevice,
{
    /// Reads `bytes.len()` bytes starting at `address` in one transaction.
    pub fn read_burst(&mut self, address: u8, bytes: &mut [u8]) -> Result<(), Error> {
        self.spi
            .transaction(&mut [
                Operation::Write(&[address & ADDRESS_MASK]),
                Operation::Read(bytes),
            ])
            .map_err(|_| Error::TransportFailure)
    }

    /// Writes `bytes` starting at `address` in one transaction.
    pub fn write_burst(&mut self, address: u8, bytes: &[u8]) -> Result<(), Error> {
        self.spi
            .transaction(&mut [
                Operation::Write(&[address | WRITE_FLAG]),
                Operation::Write(bytes),
            ])
            .map_err(|_| Error::TransportFailure)
    }

    /// Reads a register value.
    pub fn read_register<R>(&mut self) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8>,
        <R as FromByteArray>::Error: Into<Error>,
    {
        let mut raw_value = <R as FromByteArray>::Array::new();
        self.read_burst(R::id(), raw_value.as_mut())?;
        R::from_bytes(raw_value).map_err(Into::into)
    }

    /// Writes a register value.
    pub fn write_register<R>(&mut self, register: R) -> Result<(), Error>
    where
        R: WritableRegister<IdType = u8>,
        <R as ToByteArray>::Error: Into<Error>,
    {
        let raw_value = register.to_bytes().map_err(Into::into)?;
        self.write_burst(R::id(), raw_value.as_ref())
    }

    /// Reads a register, applies `f` and writes the result back.
    pub fn modify_register<R>(&mut self, f: impl FnOnce(R) -> Result<R, Error>) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8> + WritableRegister<IdType = u8> + Copy,
        <R as FromByteArray>::Error: Into<Error>,
        <R as ToByteArray>::Error: Into<Error>,
    {
        let updated = f(self.read_register()?)?;
        self.write_register(updated)?;
        Ok(updated)
    }
}
