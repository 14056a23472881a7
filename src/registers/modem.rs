//! LoRa modem configuration registers
//!
//! This module contains registers controlling the LoRa modulation and packet format:
//! - Bandwidth, coding rate and spreading factor
//! - Header mode, payload CRC and payload lengths
//! - Preamble length and symbol timeout
//! - Sync word, IQ inversion and SF6 detection settings

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use super::Field;
use crate::params::{Bandwidth, CodingRate, SpreadingFactor};
use crate::Error;

/// Bw (RegModemConfig1 bits 7:4)
pub const BANDWIDTH: Field = Field::new(0x1D, 4, 4);
/// CodingRate (RegModemConfig1 bits 3:1)
pub const CODING_RATE: Field = Field::new(0x1D, 1, 3);
/// ImplicitHeaderModeOn (RegModemConfig1 bit 0)
pub const IMPLICIT_HEADER_MODE_ON: Field = Field::new(0x1D, 0, 1);
/// SpreadingFactor (RegModemConfig2 bits 7:4)
pub const SPREADING_FACTOR: Field = Field::new(0x1E, 4, 4);
/// TxContinuousMode (RegModemConfig2 bit 3)
pub const TX_CONTINUOUS_MODE: Field = Field::new(0x1E, 3, 1);
/// RxPayloadCrcOn (RegModemConfig2 bit 2)
pub const RX_PAYLOAD_CRC_ON: Field = Field::new(0x1E, 2, 1);
/// SymbTimeout bits 9:8 (RegModemConfig2 bits 1:0)
pub const SYMB_TIMEOUT_MSB: Field = Field::new(0x1E, 0, 2);
/// LowDataRateOptimize (RegModemConfig3 bit 3)
pub const LOW_DATA_RATE_OPTIMIZE: Field = Field::new(0x26, 3, 1);
/// AgcAutoOn (RegModemConfig3 bit 2)
pub const AGC_AUTO_ON: Field = Field::new(0x26, 2, 1);
/// DetectionOptimize (RegDetectOptimize bits 2:0)
pub const DETECTION_OPTIMIZE: Field = Field::new(0x31, 0, 3);
/// InvertIQ (RegInvertIQ bit 6)
pub const INVERT_IQ: Field = Field::new(0x33, 6, 1);

/// DetectionOptimize value for SF6
pub const DETECTION_OPTIMIZE_SF6: u8 = 0x05;
/// DetectionOptimize value for SF7 to SF12
pub const DETECTION_OPTIMIZE_SF7_TO_SF12: u8 = 0x03;
/// DetectionThreshold value for SF6
pub const DETECTION_THRESHOLD_SF6: u8 = 0x0C;
/// DetectionThreshold value for SF7 to SF12
pub const DETECTION_THRESHOLD_SF7_TO_SF12: u8 = 0x0A;

/// Modem configuration 1 register (address: 0x1D)
#[register(0x1Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModemConfig1 {
    /// Signal bandwidth
    pub bandwidth: Bandwidth,
    /// Error coding rate
    pub coding_rate: CodingRate,
    /// Implicit header mode: no header, payload length fixed by [`PayloadLength`]
    pub implicit_header: bool,
}

impl Default for ModemConfig1 {
    /// Reset value 0x72
    fn default() -> Self {
        Self {
            bandwidth: Bandwidth::Khz125,
            coding_rate: CodingRate::Cr4_5,
            implicit_header: false,
        }
    }
}

impl FromByteArray for ModemConfig1 {
    type Error = Error;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let raw = bytes[0];
        Ok(Self {
            bandwidth: Bandwidth::from_bits(BANDWIDTH.extract(raw))?,
            coding_rate: CodingRate::from_bits(CODING_RATE.extract(raw))?,
            implicit_header: IMPLICIT_HEADER_MODE_ON.is_set(raw),
        })
    }
}

impl ToByteArray for ModemConfig1 {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut raw = BANDWIDTH.insert(0, self.bandwidth.bits())?;
        raw = CODING_RATE.insert(raw, self.coding_rate.bits())?;
        Ok([IMPLICIT_HEADER_MODE_ON.insert_flag(raw, self.implicit_header)])
    }
}

/// Modem configuration 2 and symbol timeout LSB registers (addresses: 0x1E..=0x1F)
///
/// The 10-bit RX symbol timeout straddles both registers, so they are accessed together.
///
/// # Important Notes
/// - SF6 requires implicit header mode and the SF6 detection settings
/// - The symbol timeout only applies to single reception
#[register(0x1Eu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModemConfig2 {
    /// Spreading factor
    pub spreading_factor: SpreadingFactor,
    /// Send the FIFO content repeatedly (spectral analysis only)
    pub tx_continuous: bool,
    /// Generate and check the payload CRC
    pub rx_crc_on: bool,
    /// Single reception timeout in symbols, 10 bits
    pub symbol_timeout: u16,
}

impl Default for ModemConfig2 {
    /// Reset values 0x70, 0x64
    fn default() -> Self {
        Self {
            spreading_factor: SpreadingFactor::Sf7,
            tx_continuous: false,
            rx_crc_on: false,
            symbol_timeout: 0x64,
        }
    }
}

impl FromByteArray for ModemConfig2 {
    type Error = Error;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let [raw, lsb] = bytes;
        Ok(Self {
            spreading_factor: SpreadingFactor::from_bits(SPREADING_FACTOR.extract(raw))?,
            tx_continuous: TX_CONTINUOUS_MODE.is_set(raw),
            rx_crc_on: RX_PAYLOAD_CRC_ON.is_set(raw),
            symbol_timeout: u16::from_be_bytes([SYMB_TIMEOUT_MSB.extract(raw), lsb]),
        })
    }
}

impl ToByteArray for ModemConfig2 {
    type Error = Error;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let [msb, lsb] = self.symbol_timeout.to_be_bytes();
        let mut raw = SPREADING_FACTOR.insert(0, self.spreading_factor.bits())?;
        raw = TX_CONTINUOUS_MODE.insert_flag(raw, self.tx_continuous);
        raw = RX_PAYLOAD_CRC_ON.insert_flag(raw, self.rx_crc_on);
        raw = SYMB_TIMEOUT_MSB.insert(raw, msb)?;
        Ok([raw, lsb])
    }
}

/// Modem configuration 3 register (address: 0x26)
#[register(0x26u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModemConfig3 {
    /// Mandatory when the symbol length exceeds 16 ms
    pub low_data_rate_optimize: bool,
    /// LNA gain set by the AGC loop instead of [`super::Lna`]
    pub agc_auto_on: bool,
    /// Reserved bits, written back unchanged
    pub retained: u8,
}

impl FromByteArray for ModemConfig3 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let raw = bytes[0];
        Ok(Self {
            low_data_rate_optimize: LOW_DATA_RATE_OPTIMIZE.is_set(raw),
            agc_auto_on: AGC_AUTO_ON.is_set(raw),
            retained: raw & !(LOW_DATA_RATE_OPTIMIZE.mask() | AGC_AUTO_ON.mask()),
        })
    }
}

impl ToByteArray for ModemConfig3 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut raw = self.retained & !(LOW_DATA_RATE_OPTIMIZE.mask() | AGC_AUTO_ON.mask());
        raw = LOW_DATA_RATE_OPTIMIZE.insert_flag(raw, self.low_data_rate_optimize);
        Ok([AGC_AUTO_ON.insert_flag(raw, self.agc_auto_on)])
    }
}

/// LoRa detection optimize register (address: 0x31)
///
/// Use [`DETECTION_OPTIMIZE_SF6`] for SF6, [`DETECTION_OPTIMIZE_SF7_TO_SF12`] otherwise.
#[register(0x31u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DetectOptimize {
    /// 3-bit detection setting
    pub optimize: u8,
    /// Reserved bits 7:3, written back unchanged
    pub retained: u8,
}

impl FromByteArray for DetectOptimize {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            optimize: DETECTION_OPTIMIZE.extract(bytes[0]),
            retained: bytes[0] & !DETECTION_OPTIMIZE.mask(),
        })
    }
}

impl ToByteArray for DetectOptimize {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let raw = self.retained & !DETECTION_OPTIMIZE.mask();
        Ok([DETECTION_OPTIMIZE.insert(raw, self.optimize)?])
    }
}

/// Invert IQ register (address: 0x33)
///
/// Inverting the I and Q signals lets nodes ignore each other's uplinks.
#[register(0x33u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvertIq {
    /// IQ inverted
    pub inverted: bool,
    /// Remaining bits, written back unchanged
    pub retained: u8,
}

impl FromByteArray for InvertIq {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            inverted: INVERT_IQ.is_set(bytes[0]),
            retained: bytes[0] & !INVERT_IQ.mask(),
        })
    }
}

impl ToByteArray for InvertIq {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([INVERT_IQ.insert_flag(self.retained, self.inverted)])
    }
}

value_register!(
    /// Preamble length registers (addresses: 0x20..=0x21)
    ///
    /// Programmed length in symbols; the modem adds 4.25 symbols.
    PreambleLength,
    0x20u8,
    u16
);

value_register!(
    /// Payload length register (address: 0x22)
    ///
    /// Must be set in implicit header mode and before transmitting.
    PayloadLength,
    0x22u8,
    u8
);

value_register!(
    /// Maximum payload length register (address: 0x23)
    ///
    /// Packets longer than this raise a CRC error in reception.
    MaxPayloadLength,
    0x23u8,
    u8
);

value_register!(
    /// Frequency hopping period register (address: 0x24)
    ///
    /// Symbol periods between hops, 0 disables hopping.
    HopPeriod,
    0x24u8,
    u8
);

value_register!(
    /// PPM correction register (address: 0x27)
    ///
    /// Data rate offset compensation, derived from the measured frequency error.
    PpmCorrection,
    0x27u8,
    u8
);

value_register!(
    /// LoRa detection threshold register (address: 0x37)
    DetectionThreshold,
    0x37u8,
    u8
);

value_register!(
    /// LoRa sync word register (address: 0x39)
    ///
    /// 0x34 is reserved for LoRaWAN networks.
    SyncWord,
    0x39u8,
    u8
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modem_config_reset_values() {
        assert_eq!(ModemConfig1::from_bytes([0x72]), Ok(ModemConfig1::default()));
        assert_eq!(
            ModemConfig2::from_bytes([0x70, 0x64]),
            Ok(ModemConfig2::default())
        );
    }

    #[test]
    fn modem_config1_rejects_undefined_patterns() {
        // bandwidth code 10
        assert_eq!(ModemConfig1::from_bytes([0xA2]), Err(Error::InvalidParameter));
        // coding rate code 0
        assert_eq!(ModemConfig1::from_bytes([0x70]), Err(Error::InvalidParameter));
    }

    #[test]
    fn symbol_timeout_straddles_registers() {
        let config = ModemConfig2 {
            spreading_factor: SpreadingFactor::Sf12,
            tx_continuous: false,
            rx_crc_on: true,
            symbol_timeout: 1023,
        };
        assert_eq!(config.to_bytes(), Ok([0xC7, 0xFF]));
        assert_eq!(ModemConfig2::from_bytes([0xC7, 0xFF]), Ok(config));

        let too_long = ModemConfig2 {
            symbol_timeout: 1024,
            ..config
        };
        assert_eq!(too_long.to_bytes(), Err(Error::InvalidParameter));
    }

    #[test]
    fn preamble_is_big_endian() {
        assert_eq!(PreambleLength { value: 0x0108 }.to_bytes(), Ok([0x01, 0x08]));
    }

    #[test]
    fn invert_iq_keeps_reserved_bits() {
        let iq = InvertIq::from_bytes([0x27]).unwrap();
        assert!(!iq.inverted);
        let inverted = InvertIq {
            inverted: true,
            ..iq
        };
        assert_eq!(inverted.to_bytes(), Ok([0x67]));
    }
}
