//! Modulation and packet format settings
//!
//! Transmitter and receiver must agree on every setting in this module. Change them in Sleep
//! or Standby only.

use embedded_hal::spi::SpiDevice;

use super::Sx127x;
use crate::params::{Bandwidth, CodingRate, SpreadingFactor, PREAMBLE_MIN};
use crate::params::{SYMBOL_TIMEOUT_MAX, SYMBOL_TIMEOUT_MIN};
use crate::registers::{
    DetectOptimize, DetectionThreshold, HopPeriod, InvertIq, MaxPayloadLength, ModemConfig1,
    ModemConfig2, ModemConfig3, PayloadLength, PpmCorrection, PreambleLength, SyncWord,
    DETECTION_OPTIMIZE_SF6, DETECTION_OPTIMIZE_SF7_TO_SF12, DETECTION_THRESHOLD_SF6,
    DETECTION_THRESHOLD_SF7_TO_SF12,
};
use crate::Error;

impl<SPI> Sx127x<SPI>
where
    SPI: SpiDevice,
{
    /// Sets the signal bandwidth.
    pub fn set_bandwidth(&self, bandwidth: Bandwidth) -> Result<(), Error> {
        self.device
            .modify_register(|config: ModemConfig1| Ok(ModemConfig1 { bandwidth, ..config }))
            .map(|_| ())
    }

    /// Signal bandwidth.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - RegModemConfig1 holds an undefined bandwidth code
    pub fn get_bandwidth(&self) -> Result<Bandwidth, Error> {
        Ok(self.device.read_register::<ModemConfig1>()?.bandwidth)
    }

    /// Sets the error coding rate.
    pub fn set_coding_rate(&self, coding_rate: CodingRate) -> Result<(), Error> {
        self.device
            .modify_register(|config: ModemConfig1| {
                Ok(ModemConfig1 {
                    coding_rate,
                    ..config
                })
            })
            .map(|_| ())
    }

    /// Error coding rate.
    pub fn get_coding_rate(&self) -> Result<CodingRate, Error> {
        Ok(self.device.read_register::<ModemConfig1>()?.coding_rate)
    }

    /// Selects implicit (headerless) or explicit header mode.
    pub fn set_implicit_header(&self, implicit: bool) -> Result<(), Error> {
        self.device
            .modify_register(|config: ModemConfig1| {
                Ok(ModemConfig1 {
                    implicit_header: implicit,
                    ..config
                })
            })
            .map(|_| ())
    }

    /// True in implicit header mode.
    pub fn get_implicit_header(&self) -> Result<bool, Error> {
        Ok(self.device.read_register::<ModemConfig1>()?.implicit_header)
    }

    /// Sets the spreading factor together with the matching detection settings.
    ///
    /// SF6 writes the dedicated DetectionOptimize/DetectionThreshold values and only works in
    /// implicit header mode; SF7 to SF12 restore the standard values.
    pub fn set_spreading_factor(&self, spreading_factor: SpreadingFactor) -> Result<(), Error> {
        let (optimize, threshold) = if spreading_factor == SpreadingFactor::Sf6 {
            (DETECTION_OPTIMIZE_SF6, DETECTION_THRESHOLD_SF6)
        } else {
            (DETECTION_OPTIMIZE_SF7_TO_SF12, DETECTION_THRESHOLD_SF7_TO_SF12)
        };
        self.device.lock(|bus| {
            let config1: ModemConfig1 = bus.read_register()?;
            if spreading_factor == SpreadingFactor::Sf6 && !config1.implicit_header {
                warn!("SF6 selected in explicit header mode");
            }
            bus.modify_register(|config: ModemConfig2| {
                Ok(ModemConfig2 {
                    spreading_factor,
                    ..config
                })
            })?;
            bus.modify_register(|detect: DetectOptimize| Ok(DetectOptimize { optimize, ..detect }))?;
            bus.write_register(DetectionThreshold { value: threshold })
        })
    }

    /// Spreading factor.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - RegModemConfig2 holds an undefined spreading factor
    pub fn get_spreading_factor(&self) -> Result<SpreadingFactor, Error> {
        Ok(self.device.read_register::<ModemConfig2>()?.spreading_factor)
    }

    /// Enables payload CRC generation (TX) and checking (RX).
    pub fn set_rx_crc(&self, enabled: bool) -> Result<(), Error> {
        self.device
            .modify_register(|config: ModemConfig2| {
                Ok(ModemConfig2 {
                    rx_crc_on: enabled,
                    ..config
                })
            })
            .map(|_| ())
    }

    /// True if the payload CRC is enabled.
    pub fn get_rx_crc(&self) -> Result<bool, Error> {
        Ok(self.device.read_register::<ModemConfig2>()?.rx_crc_on)
    }

    /// Sets the single reception timeout.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - `symbols` outside 4..=1023; nothing is written
    pub fn set_symbol_timeout(&self, symbols: u16) -> Result<(), Error> {
        if !(SYMBOL_TIMEOUT_MIN..=SYMBOL_TIMEOUT_MAX).contains(&symbols) {
            return Err(Error::InvalidParameter);
        }
        self.device
            .modify_register(|config: ModemConfig2| {
                Ok(ModemConfig2 {
                    symbol_timeout: symbols,
                    ..config
                })
            })
            .map(|_| ())
    }

    /// Single reception timeout (symbols).
    pub fn get_symbol_timeout(&self) -> Result<u16, Error> {
        Ok(self.device.read_register::<ModemConfig2>()?.symbol_timeout)
    }

    /// Enables LowDataRateOptimize, mandatory for symbols longer than 16 ms.
    ///
    /// See [`crate::params::needs_low_data_rate_optimize`].
    pub fn set_low_data_rate_optimize(&self, enabled: bool) -> Result<(), Error> {
        self.device
            .modify_register(|config: ModemConfig3| {
                Ok(ModemConfig3 {
                    low_data_rate_optimize: enabled,
                    ..config
                })
            })
            .map(|_| ())
    }

    /// True if LowDataRateOptimize is on.
    pub fn get_low_data_rate_optimize(&self) -> Result<bool, Error> {
        Ok(self.device.read_register::<ModemConfig3>()?.low_data_rate_optimize)
    }

    /// Sets the preamble length. Both registers are written in one burst.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - fewer than 6 symbols; nothing is written
    pub fn set_preamble_length(&self, symbols: u16) -> Result<(), Error> {
        if symbols < PREAMBLE_MIN {
            return Err(Error::InvalidParameter);
        }
        self.device.write_register(PreambleLength { value: symbols })
    }

    /// Preamble length (symbols).
    pub fn get_preamble_length(&self) -> Result<u16, Error> {
        Ok(self.device.read_register::<PreambleLength>()?.value)
    }

    /// Sets the payload length used in implicit header mode.
    ///
    /// [`Sx127x::write_payload`] overwrites it with the length of every payload it writes.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - `length` is 0
    pub fn set_payload_length(&self, length: u8) -> Result<(), Error> {
        if length == 0 {
            return Err(Error::InvalidParameter);
        }
        self.device.write_register(PayloadLength { value: length })
    }

    /// Payload length register.
    pub fn get_payload_length(&self) -> Result<u8, Error> {
        Ok(self.device.read_register::<PayloadLength>()?.value)
    }

    /// Sets the longest payload accepted.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - `length` is 0
    pub fn set_max_payload_length(&self, length: u8) -> Result<(), Error> {
        if length == 0 {
            return Err(Error::InvalidParameter);
        }
        self.device.write_register(MaxPayloadLength { value: length })
    }

    /// Longest payload accepted.
    pub fn get_max_payload_length(&self) -> Result<u8, Error> {
        Ok(self.device.read_register::<MaxPayloadLength>()?.value)
    }

    /// Sets the LoRa sync word.
    pub fn set_sync_word(&self, sync_word: u8) -> Result<(), Error> {
        self.device.write_register(SyncWord { value: sync_word })
    }

    /// LoRa sync word.
    pub fn get_sync_word(&self) -> Result<u8, Error> {
        Ok(self.device.read_register::<SyncWord>()?.value)
    }

    /// Inverts the I and Q signals.
    pub fn set_invert_iq(&self, inverted: bool) -> Result<(), Error> {
        self.device
            .modify_register(|iq: InvertIq| Ok(InvertIq { inverted, ..iq }))
            .map(|_| ())
    }

    /// True if IQ is inverted.
    pub fn get_invert_iq(&self) -> Result<bool, Error> {
        Ok(self.device.read_register::<InvertIq>()?.inverted)
    }

    /// Sets the frequency hopping period in symbols, 0 disables hopping.
    pub fn set_hop_period(&self, symbols: u8) -> Result<(), Error> {
        self.device.write_register(HopPeriod { value: symbols })
    }

    /// Frequency hopping period (symbols).
    pub fn get_hop_period(&self) -> Result<u8, Error> {
        Ok(self.device.read_register::<HopPeriod>()?.value)
    }

    /// Sets the data rate offset compensation.
    pub fn set_ppm_correction(&self, correction: u8) -> Result<(), Error> {
        self.device.write_register(PpmCorrection { value: correction })
    }

    /// Data rate offset compensation.
    pub fn get_ppm_correction(&self) -> Result<u8, Error> {
        Ok(self.device.read_register::<PpmCorrection>()?.value)
    }
}
