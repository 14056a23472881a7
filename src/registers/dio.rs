//! Digital IO mapping registers
//!
//! RegDioMapping1 selects, for each of DIO0..DIO3, which LoRa interrupt the line signals.
//! The meaning of a 2-bit code depends on the line:
//!
//! | Line | 00        | 01                | 10              |
//! |------|-----------|-------------------|-----------------|
//! | DIO0 | RxDone    | TxDone            | CadDone         |
//! | DIO1 | RxTimeout | FhssChangeChannel | CadDetected     |
//! | DIO2 | FhssChangeChannel (any code)                    |||
//! | DIO3 | CadDone   | ValidHeader       | PayloadCrcError |
//!
//! Code 11 is undefined on every line.
//!
//! RegDioMapping2 does the same for DIO4 and DIO5, which signal status rather than
//! interrupts in LoRa mode:
//!
//! | Line | 00          | 01, 10  |
//! |------|-------------|---------|
//! | DIO4 | CadDetected | PllLock |
//! | DIO5 | ModeReady   | ClkOut  |

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use super::Field;
use crate::Error;

/// DIO0 mapping (RegDioMapping1 bits 7:6)
pub const DIO0_MAPPING: Field = Field::new(0x40, 6, 2);
/// DIO1 mapping (RegDioMapping1 bits 5:4)
pub const DIO1_MAPPING: Field = Field::new(0x40, 4, 2);
/// DIO2 mapping (RegDioMapping1 bits 3:2)
pub const DIO2_MAPPING: Field = Field::new(0x40, 2, 2);
/// DIO3 mapping (RegDioMapping1 bits 1:0)
pub const DIO3_MAPPING: Field = Field::new(0x40, 0, 2);
/// DIO4 mapping (RegDioMapping2 bits 7:6)
pub const DIO4_MAPPING: Field = Field::new(0x41, 6, 2);
/// DIO5 mapping (RegDioMapping2 bits 5:4)
pub const DIO5_MAPPING: Field = Field::new(0x41, 4, 2);
/// MapPreambleDetect (RegDioMapping2 bit 0): FSK interrupt on DIO4, 0 = Rssi, 1 = PreambleDetect
pub const MAP_PREAMBLE_DETECT: Field = Field::new(0x41, 0, 1);

const DIO_MAPPING2_RESERVED: u8 = 0x0E;

/// Event signaled on DIO0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dio0Function {
    /// Packet received (also covers PayloadCrcError)
    #[default]
    RxDone = 0,
    /// Packet transmitted
    TxDone = 1,
    /// Channel activity detection finished
    CadDone = 2,
}

/// Event signaled on DIO1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dio1Function {
    /// Single reception timed out
    #[default]
    RxTimeout = 0,
    /// Frequency hopping channel change
    FhssChangeChannel = 1,
    /// Channel activity detected
    CadDetected = 2,
}

/// Event signaled on DIO2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dio2Function {
    /// Frequency hopping channel change, for codes 00, 01 and 10
    #[default]
    FhssChangeChannel = 0,
}

/// Event signaled on DIO3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dio3Function {
    /// Channel activity detection finished
    #[default]
    CadDone = 0,
    /// Valid header received
    ValidHeader = 1,
    /// Payload CRC failed
    PayloadCrcError = 2,
}

/// Signal on DIO4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dio4Function {
    /// Channel activity detected
    #[default]
    CadDetected = 0,
    /// Synthesizer locked, for codes 01 and 10
    PllLock = 1,
}

/// Signal on DIO5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dio5Function {
    /// Mode switch finished
    #[default]
    ModeReady = 0,
    /// Clock output, for codes 01 and 10
    ClkOut = 1,
}

/// DIO mapping register (address: 0x40)
///
/// The driver keeps the last mapping it wrote so that mode transitions can check that the
/// completion event of an armed operation reaches a line.
///
/// # Important Notes
/// - Only meaningful while the LoRa modem is selected
/// - Reset value 0x00 maps RxDone, RxTimeout, FhssChangeChannel and CadDone
#[register(0x40u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DioMapping {
    /// DIO0 function
    pub dio0: Dio0Function,
    /// DIO1 function
    pub dio1: Dio1Function,
    /// DIO2 function
    pub dio2: Dio2Function,
    /// DIO3 function
    pub dio3: Dio3Function,
}

impl DioMapping {
    /// Reception: RxDone on DIO0, RxTimeout on DIO1, ValidHeader on DIO3
    pub const RX: Self = Self {
        dio0: Dio0Function::RxDone,
        dio1: Dio1Function::RxTimeout,
        dio2: Dio2Function::FhssChangeChannel,
        dio3: Dio3Function::ValidHeader,
    };

    /// Transmission: TxDone on DIO0
    pub const TX: Self = Self {
        dio0: Dio0Function::TxDone,
        dio1: Dio1Function::RxTimeout,
        dio2: Dio2Function::FhssChangeChannel,
        dio3: Dio3Function::ValidHeader,
    };

    /// Channel activity detection: CadDone on DIO0, CadDetected on DIO1
    pub const CAD: Self = Self {
        dio0: Dio0Function::CadDone,
        dio1: Dio1Function::CadDetected,
        dio2: Dio2Function::FhssChangeChannel,
        dio3: Dio3Function::ValidHeader,
    };
}

impl FromByteArray for DioMapping {
    type Error = Error;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let raw = bytes[0];
        Ok(Self {
            dio0: match DIO0_MAPPING.extract(raw) {
                0 => Dio0Function::RxDone,
                1 => Dio0Function::TxDone,
                2 => Dio0Function::CadDone,
                _ => return Err(Error::InvalidParameter),
            },
            dio1: match DIO1_MAPPING.extract(raw) {
                0 => Dio1Function::RxTimeout,
                1 => Dio1Function::FhssChangeChannel,
                2 => Dio1Function::CadDetected,
                _ => return Err(Error::InvalidParameter),
            },
            dio2: match DIO2_MAPPING.extract(raw) {
                0..=2 => Dio2Function::FhssChangeChannel,
                _ => return Err(Error::InvalidParameter),
            },
            dio3: match DIO3_MAPPING.extract(raw) {
                0 => Dio3Function::CadDone,
                1 => Dio3Function::ValidHeader,
                2 => Dio3Function::PayloadCrcError,
                _ => return Err(Error::InvalidParameter),
            },
        })
    }
}

impl ToByteArray for DioMapping {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut raw = DIO0_MAPPING.insert(0, self.dio0 as u8)?;
        raw = DIO1_MAPPING.insert(raw, self.dio1 as u8)?;
        raw = DIO2_MAPPING.insert(raw, self.dio2 as u8)?;
        raw = DIO3_MAPPING.insert(raw, self.dio3 as u8)?;
        Ok([raw])
    }
}

/// DIO mapping register 2 (address: 0x41)
///
/// DIO4 and DIO5 are not serviced by the interrupt dispatcher.
#[register(0x41u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DioMapping2 {
    /// DIO4 function
    pub dio4: Dio4Function,
    /// DIO5 function
    pub dio5: Dio5Function,
    /// FSK/OOK only: DIO4 signals PreambleDetect instead of Rssi
    pub map_preamble_detect: bool,
    /// Reserved bits 3:1, written back unchanged
    pub retained: u8,
}

impl FromByteArray for DioMapping2 {
    type Error = Error;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let raw = bytes[0];
        Ok(Self {
            dio4: match DIO4_MAPPING.extract(raw) {
                0 => Dio4Function::CadDetected,
                1 | 2 => Dio4Function::PllLock,
                _ => return Err(Error::InvalidParameter),
            },
            dio5: match DIO5_MAPPING.extract(raw) {
                0 => Dio5Function::ModeReady,
                1 | 2 => Dio5Function::ClkOut,
                _ => return Err(Error::InvalidParameter),
            },
            map_preamble_detect: MAP_PREAMBLE_DETECT.is_set(raw),
            retained: raw & DIO_MAPPING2_RESERVED,
        })
    }
}

impl ToByteArray for DioMapping2 {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let reserved = self.retained & DIO_MAPPING2_RESERVED;
        let mut raw = DIO4_MAPPING.insert(reserved, self.dio4 as u8)?;
        raw = DIO5_MAPPING.insert(raw, self.dio5 as u8)?;
        Ok([MAP_PREAMBLE_DETECT.insert_flag(raw, self.map_preamble_detect)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transmit_mapping_bits() {
        // DIO0 = 01, DIO3 = 01
        assert_eq!(DioMapping::TX.to_bytes(), Ok([0x41]));
        assert_eq!(DioMapping::from_bytes([0x41]), Ok(DioMapping::TX));
    }

    #[test]
    fn reset_value_is_default() {
        assert_eq!(DioMapping::from_bytes([0x00]), Ok(DioMapping::default()));
    }

    #[test]
    fn undefined_code_rejected() {
        assert_eq!(DioMapping::from_bytes([0xC0]), Err(Error::InvalidParameter));
        assert_eq!(DioMapping::from_bytes([0x03]), Err(Error::InvalidParameter));
    }

    #[test]
    fn second_mapping_aliases_and_reserved_bits() {
        let mapping = DioMapping2::from_bytes([0x85]).unwrap();
        assert_eq!(mapping.dio4, Dio4Function::PllLock);
        assert_eq!(mapping.dio5, Dio5Function::ModeReady);
        assert!(mapping.map_preamble_detect);
        assert_eq!(mapping.retained, 0x04);
        // the alias code 10 is written back as 01
        assert_eq!(mapping.to_bytes(), Ok([0x45]));
        assert_eq!(DioMapping2::from_bytes([0xC0]), Err(Error::InvalidParameter));
        assert_eq!(DioMapping2::from_bytes([0x30]), Err(Error::InvalidParameter));
    }
}
