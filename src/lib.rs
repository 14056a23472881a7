#![cfg_attr(not(test), no_std)]
//! SX127x LoRa Radio Driver
//!
//! This crate provides a type-safe control-plane driver for the Semtech SX1276/77/78/79 LoRa
//! transceivers. It packs radio parameters into the chip's registers, drives the operating
//! mode state machine and dispatches the DIO interrupt lines to application callbacks.
//!
//! # Features
//! - Frequency range: 137-1020 MHz, 61 Hz resolution
//! - LoRa: SF6-12, BW 7.8-500 kHz, CR 4/5-4/8
//! - Output power: 0 to +15 dBm on RFO, +2 to +17 dBm (+18 to +20 dBm high power) on PA_BOOST
//! - 256-byte FIFO shared between TX and RX
//! - Four programmable interrupt lines (DIO0..DIO3)
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`device`]: register bus
//!   - SX127x single and burst access protocol over an `embedded_hal` SPI device
//!   - Critical-section lock shared by thread and interrupt context
//!
//! - [`registers`]: register definitions for direct hardware access
//!   - [`registers::Field`]: bit-field descriptors every register is built from
//!
//! - [`params`]: conversions between physical units and register values
//! - [`mode`]: operating modes, modem families and valid transitions
//! - [`irq`]: interrupt flags, DIO routing and the [`Events`] callback trait
//! - [`radio`]: the [`Sx127x`] driver
//!
//! # Usage
//! Configuration follows a specific sequence:
//!
//! 1. Create an [`Sx127x`] with your SPI device, optionally pulse the reset line
//! 2. Call [`Sx127x::init`], which leaves the chip in LoRa standby
//! 3. Route the completion interrupt with [`Sx127x::set_dio_mapping`]
//! 4. Load a payload and enter TX, or enter RXCONT/RXSINGLE
//! 5. Call [`Sx127x::handle_interrupt`] on each rising DIO edge, or run [`Sx127x::listen`]
//!
//! # Important Notes
//! - The modem family can only be switched in Sleep
//! - Modulation settings should only be changed in Sleep or Standby
//! - SF6 requires implicit header mode
//! - +20 dBm operation needs OCP of at least 120 mA and a duty cycle of 1% or less
//! - Run [`Sx127x::calibrate_image`] after moving the carrier by more than a few MHz
//!
//! # Example
//! ```no_run
//! use embedded_hal::spi::SpiDevice;
//! use sx127x::{registers::DioMapping, Config, Dio, Error, Events, Mode, Sx127x};
//!
//! struct Done(bool);
//!
//! impl Events for Done {
//!     fn on_tx_done(&mut self) {
//!         self.0 = true;
//!     }
//! }
//!
//! fn send<SPI: SpiDevice>(radio: &Sx127x<SPI>) -> Result<(), Error> {
//!     radio.init(&Config::default())?;
//!     radio.write_payload(b"ping")?;
//!     radio.set_dio_mapping(DioMapping::TX)?;
//!     radio.set_mode(Mode::TX)?;
//!
//!     // later, from the DIO0 edge handler
//!     let mut done = Done(false);
//!     radio.handle_interrupt(Dio::Dio0, &mut done)?;
//!     Ok(())
//! }
//! ```

// This must go first so the logging macros are visible to every other module.
mod fmt;

pub mod config;
pub mod device;
mod error;
pub mod irq;
pub mod mode;
pub mod params;
pub mod radio;
pub mod registers;

pub use config::Config;
pub use device::Device;
pub use error::Error;
pub use irq::{Dio, Events, IrqFlags};
pub use mode::{Mode, ModemFamily, OperatingMode, MODE_READY_DELAY_US};
pub use params::{
    Bandwidth, CodingRate, LnaGain, PaRamp, PaSelect, PllBandwidth, SpreadingFactor, TempThreshold,
};
pub use radio::Sx127x;
