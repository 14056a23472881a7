//! High-level LoRa driver
//!
//! [`Sx127x`] owns the register bus and the little state the chip cannot report reliably:
//! the last mode requested and the DIO mapping in force. Everything else is read live from the
//! chip on every getter.
//!
//! The API is split by concern:
//! - this module: lifecycle, operating mode and DIO mapping
//! - [`rf`]: carrier frequency, power amplifier, LNA, AGC, PLL and oscillator
//! - [`calibration`]: image and RSSI calibration of the receive chain
//! - [`modem`]: modulation and packet format
//! - [`fifo`]: FIFO addressing and payload transfer
//! - [`status`]: interrupt flags, dispatch and link statistics

use core::cell::Cell;

use critical_section::Mutex;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::config::Config;
use crate::device::Device;
use crate::irq::IrqFlags;
use crate::mode::{Mode, OperatingMode};
use crate::params::needs_low_data_rate_optimize;
use crate::registers::{DioMapping, DioMapping2, OpMode, Version, SX1276_VERSION};
use crate::Error;

pub mod calibration;
pub mod fifo;
pub mod modem;
pub mod rf;
pub mod status;

/// Time the reset line is held low, then the time the chip needs after release (ms)
pub const RESET_DELAY_MS: u32 = 10;

/// SX1276/77/78/79 LoRa driver.
///
/// All methods take `&self`: every register transaction runs inside a critical section, so one
/// instance can be shared between application code and the interrupt handler calling
/// [`Sx127x::handle_interrupt`]. Reconfiguring the modem while a reception or transmission is
/// in flight is allowed by the bus but aborts or corrupts the operation.
///
/// # Example
/// ```no_run
/// use sx127x::{Config, Mode, Sx127x};
/// # fn demo<SPI: embedded_hal::spi::SpiDevice>(spi: SPI) -> Result<(), sx127x::Error> {
/// let radio = Sx127x::new(spi);
/// radio.init(&Config::default())?;
///
/// radio.write_payload(b"hello")?;
/// radio.set_dio_mapping(sx127x::registers::DioMapping::TX)?;
/// radio.set_mode(Mode::TX)?;
/// # Ok(())
/// # }
/// ```
pub struct Sx127x<SPI> {
    device: Device<SPI>,
    mode: Mutex<Cell<Mode>>,
    dio_mapping: Mutex<Cell<DioMapping>>,
}

impl<SPI> Sx127x<SPI> {
    /// Wraps an SPI device connected to a chip in its power-on state.
    pub fn new(spi: SPI) -> Self {
        Self {
            device: Device::new(spi),
            mode: Mutex::new(Cell::new(Mode::FSK_STANDBY)),
            dio_mapping: Mutex::new(Cell::new(DioMapping::default())),
        }
    }

    /// Releases the underlying SPI device.
    pub fn release(self) -> SPI {
        self.device.release()
    }

    /// Register bus, for raw access to registers the driver does not model.
    pub fn device(&self) -> &Device<SPI> {
        &self.device
    }

    /// Last mode set through [`Sx127x::set_mode`] or read by [`Sx127x::get_mode`].
    pub fn tracked_mode(&self) -> Mode {
        critical_section::with(|cs| self.mode.borrow(cs).get())
    }

    /// Last DIO mapping written or read.
    pub fn tracked_dio_mapping(&self) -> DioMapping {
        critical_section::with(|cs| self.dio_mapping.borrow(cs).get())
    }

    fn track_mode(&self, mode: Mode) {
        critical_section::with(|cs| self.mode.borrow(cs).set(mode));
    }

    fn track_dio_mapping(&self, mapping: DioMapping) {
        critical_section::with(|cs| self.dio_mapping.borrow(cs).set(mapping));
    }
}

impl<SPI> Sx127x<SPI>
where
    SPI: SpiDevice,
{
    /// Pulses the reset line and forgets the tracked state.
    ///
    /// The line is driven low for [`RESET_DELAY_MS`], released, and the chip is given another
    /// [`RESET_DELAY_MS`] to start. Afterwards every register holds its power-on value.
    ///
    /// # Errors
    /// * [`Error::PinFailure`] - the reset pin could not be driven
    pub fn reset<P, D>(&self, pin: &mut P, delay: &mut D) -> Result<(), Error>
    where
        P: OutputPin,
        D: DelayNs,
    {
        pin.set_low().map_err(|_| Error::PinFailure)?;
        delay.delay_ms(RESET_DELAY_MS);
        pin.set_high().map_err(|_| Error::PinFailure)?;
        delay.delay_ms(RESET_DELAY_MS);

        self.track_mode(Mode::FSK_STANDBY);
        self.track_dio_mapping(DioMapping::default());
        debug!("reset complete");
        Ok(())
    }

    /// Raw silicon version (RegVersion).
    pub fn version(&self) -> Result<u8, Error> {
        Ok(self.device.read_register::<Version>()?.value)
    }

    /// Brings the chip from any state to a configured LoRa standby.
    ///
    /// The sequence is: check the silicon version, sleep within the current family, switch to
    /// LoRa sleep, apply `config`, reset the DIO mapping and enter standby. LowDataRateOptimize
    /// is derived from the spreading factor and bandwidth.
    ///
    /// # Errors
    /// * [`Error::UnsupportedChip`] - RegVersion is not 0x12
    /// * [`Error::InvalidParameter`] - a configuration value is out of range
    pub fn init(&self, config: &Config) -> Result<(), Error> {
        let version = self.version()?;
        if version != SX1276_VERSION {
            warn!("unsupported chip version {=u8:#x}", version);
            return Err(Error::UnsupportedChip(version));
        }

        let current = self.get_mode()?;
        self.set_mode(Mode {
            family: current.family,
            operating: OperatingMode::Sleep,
        })?;
        self.set_mode(Mode::SLEEP)?;
        self.set_low_frequency_mode(config.low_frequency_mode)?;

        self.set_frequency(config.frequency_hz)?;
        self.set_output_power(config.pa_select, config.output_power_dbm)?;
        self.set_ocp(config.ocp_milliamps)?;
        self.set_lna_boost_hf(config.lna_boost_hf)?;
        self.set_agc_auto(config.agc_auto)?;

        self.set_bandwidth(config.bandwidth)?;
        self.set_coding_rate(config.coding_rate)?;
        self.set_implicit_header(config.implicit_header)?;
        self.set_spreading_factor(config.spreading_factor)?;
        self.set_low_data_rate_optimize(needs_low_data_rate_optimize(
            config.spreading_factor,
            config.bandwidth,
        ))?;
        self.set_rx_crc(config.rx_crc)?;
        self.set_preamble_length(config.preamble_length)?;
        self.set_sync_word(config.sync_word)?;
        self.set_max_payload_length(config.max_payload_length)?;
        self.set_fifo_base_addresses(config.fifo_tx_base, config.fifo_rx_base)?;

        self.set_dio_mapping(DioMapping::default())?;
        self.set_mode(Mode::STANDBY)?;
        info!("initialized at {=u32} Hz", config.frequency_hz);
        Ok(())
    }

    /// Requests an operating mode.
    ///
    /// RegOpMode is updated in place: AccessSharedReg, LowFrequencyModeOn and the FSK
    /// modulation bits are kept. The chip does not acknowledge the change; it completes within
    /// [`crate::mode::MODE_READY_DELAY_US`].
    ///
    /// Arming Tx, RxContinuous, RxSingle or Cad while no DIO line signals the operation's
    /// completion is allowed, but the interrupt dispatcher will never see it finish.
    ///
    /// # Errors
    /// * [`Error::InvalidModeTransition`] - `mode` is LoRa-only but requested in FSK/OOK, or
    ///   changes the modem family outside of Sleep. Nothing is written.
    pub fn set_mode(&self, mode: Mode) -> Result<(), Error> {
        let previous = self.device.lock(|bus| {
            let mut previous = None;
            bus.modify_register(|op: OpMode| {
                op.mode.validate_transition(mode)?;
                previous = Some(op.mode);
                Ok(OpMode { mode, ..op })
            })?;
            Ok(previous)
        })?;
        self.track_mode(mode);

        if mode.is_armed_operation() {
            let completion = completion_flag(mode.operating);
            if !self.tracked_dio_mapping().routes(completion) {
                warn!(
                    "{} armed but no DIO line signals {=u8:#x}",
                    mode,
                    completion.bits()
                );
            }
        }
        debug!("mode {} -> {}", previous, mode);
        Ok(())
    }

    /// Reads the current mode from the chip and refreshes the tracked value.
    pub fn get_mode(&self) -> Result<Mode, Error> {
        let mode = self.device.read_register::<OpMode>()?.mode;
        self.track_mode(mode);
        Ok(mode)
    }

    /// Selects the low-frequency (bands 2/3, below 525 MHz) register page.
    pub fn set_low_frequency_mode(&self, enabled: bool) -> Result<(), Error> {
        self.device
            .modify_register(|op: OpMode| {
                Ok(OpMode {
                    low_frequency_mode_on: enabled,
                    ..op
                })
            })
            .map(|_| ())
    }

    /// True if the low-frequency register page is selected.
    pub fn get_low_frequency_mode(&self) -> Result<bool, Error> {
        Ok(self.device.read_register::<OpMode>()?.low_frequency_mode_on)
    }

    /// Writes RegDioMapping1 and tracks the mapping for interrupt dispatch.
    ///
    /// The register and the tracked copy change inside one critical section.
    pub fn set_dio_mapping(&self, mapping: DioMapping) -> Result<(), Error> {
        self.device.lock(|bus| {
            bus.write_register(mapping)?;
            self.track_dio_mapping(mapping);
            Ok(())
        })?;
        debug!("dio mapping {}", mapping);
        Ok(())
    }

    /// Reads RegDioMapping1 and refreshes the tracked mapping.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - a line holds the undefined code 11
    pub fn get_dio_mapping(&self) -> Result<DioMapping, Error> {
        self.device.lock(|bus| {
            let mapping = bus.read_register::<DioMapping>()?;
            self.track_dio_mapping(mapping);
            Ok(mapping)
        })
    }

    /// Writes RegDioMapping2. DIO4 and DIO5 carry status signals and are not dispatched.
    pub fn set_dio_mapping2(&self, mapping: DioMapping2) -> Result<(), Error> {
        self.device
            .modify_register(|current: DioMapping2| {
                Ok(DioMapping2 {
                    retained: current.retained,
                    ..mapping
                })
            })
            .map(|_| ())
    }

    /// Reads RegDioMapping2.
    pub fn get_dio_mapping2(&self) -> Result<DioMapping2, Error> {
        self.device.read_register()
    }
}

/// Interrupt raised when an operation started by entering `operating` completes
fn completion_flag(operating: OperatingMode) -> IrqFlags {
    match operating {
        OperatingMode::Tx => IrqFlags::TX_DONE,
        OperatingMode::Cad => IrqFlags::CAD_DONE,
        _ => IrqFlags::RX_DONE,
    }
}
