//! Receive chain calibration
//!
//! RegImageCal lives on the FSK/OOK register page, so calibrating from LoRa means leaving the
//! LoRa modem through Sleep and coming back the same way.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

use super::Sx127x;
use crate::mode::{Mode, ModemFamily, OperatingMode, MODE_READY_DELAY_US};
use crate::registers::ImageCal;
use crate::Error;

/// Interval between two reads of ImageCalRunning (ms)
pub const IMAGE_CAL_POLL_MS: u32 = 1;

/// Reads of ImageCalRunning before giving up. A calibration takes about 10 ms.
pub const IMAGE_CAL_MAX_POLLS: u32 = 20;

impl<SPI> Sx127x<SPI>
where
    SPI: SpiDevice,
{
    /// Runs the image and RSSI calibration of the receive chain, then restores the mode.
    ///
    /// The chip is taken to FSK standby (through Sleep when the LoRa modem is selected),
    /// ImageCalStart is set and ImageCalRunning is polled every [`IMAGE_CAL_POLL_MS`]. The
    /// mode in force before the call is restored even when calibration fails. Calibrate again
    /// after changing the carrier frequency by more than a few MHz.
    ///
    /// # Errors
    /// * [`Error::CalibrationTimeout`] - ImageCalRunning still set after
    ///   [`IMAGE_CAL_MAX_POLLS`] reads
    /// * [`Error::TransportFailure`] - a register access failed
    pub fn calibrate_image<D: DelayNs>(&self, delay: &mut D) -> Result<(), Error> {
        let current = self.get_mode()?;

        self.set_mode(Mode {
            family: current.family,
            operating: OperatingMode::Sleep,
        })?;
        if current.family == ModemFamily::LoRa {
            self.set_mode(Mode::FSK_SLEEP)?;
        }
        self.set_mode(Mode::FSK_STANDBY)?;
        delay.delay_us(MODE_READY_DELAY_US);

        let calibrated = self.run_image_calibration(delay);
        let restored = self.restore_mode(current);
        calibrated?;
        restored?;
        info!("image calibration done");
        Ok(())
    }

    fn run_image_calibration<D: DelayNs>(&self, delay: &mut D) -> Result<(), Error> {
        self.device
            .modify_register(|cal: ImageCal| Ok(ImageCal { start: true, ..cal }))?;

        for _ in 0..IMAGE_CAL_MAX_POLLS {
            delay.delay_ms(IMAGE_CAL_POLL_MS);
            if !self.device.read_register::<ImageCal>()?.running {
                return Ok(());
            }
        }
        warn!("image calibration still running after {=u32} polls", IMAGE_CAL_MAX_POLLS);
        Err(Error::CalibrationTimeout)
    }

    /// Returns from FSK standby to `mode`.
    fn restore_mode(&self, mode: Mode) -> Result<(), Error> {
        if mode.family == ModemFamily::LoRa {
            self.set_mode(Mode::FSK_SLEEP)?;
            self.set_mode(Mode::SLEEP)?;
        }
        if mode != self.tracked_mode() {
            self.set_mode(mode)?;
        }
        Ok(())
    }
}
