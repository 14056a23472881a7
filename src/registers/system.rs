//! System-related registers
//!
//! This module contains registers for chip-level configuration including:
//! - Operating mode and modem family selection
//! - Silicon revision
//! - Reference oscillator input
//! - Image and RSSI calibration

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use super::Field;
use crate::mode::{Mode, ModemFamily, OperatingMode};
use crate::params::TempThreshold;
use crate::Error;

/// LongRangeMode (RegOpMode bit 7): 0 = FSK/OOK, 1 = LoRa
pub const LONG_RANGE_MODE: Field = Field::new(0x01, 7, 1);
/// AccessSharedReg and reserved bits in LoRa, ModulationType in FSK (RegOpMode bits 6:4)
pub const OP_MODE_RETAINED: Field = Field::new(0x01, 4, 3);
/// LowFrequencyModeOn (RegOpMode bit 3): access the low-frequency register page
pub const LOW_FREQUENCY_MODE_ON: Field = Field::new(0x01, 3, 1);
/// Mode (RegOpMode bits 2:0)
pub const MODE: Field = Field::new(0x01, 0, 3);
/// TcxoInputOn (RegTcxo bit 4)
pub const TCXO_INPUT_ON: Field = Field::new(0x4B, 4, 1);
/// AutoImageCalOn (RegImageCal bit 7)
pub const AUTO_IMAGE_CAL_ON: Field = Field::new(0x3B, 7, 1);
/// ImageCalStart (RegImageCal bit 6)
pub const IMAGE_CAL_START: Field = Field::new(0x3B, 6, 1);
/// ImageCalRunning (RegImageCal bit 5), read-only
pub const IMAGE_CAL_RUNNING: Field = Field::new(0x3B, 5, 1);
/// TempChange (RegImageCal bit 3), read-only
pub const TEMP_CHANGE: Field = Field::new(0x3B, 3, 1);
/// TempThreshold (RegImageCal bits 2:1)
pub const TEMP_THRESHOLD: Field = Field::new(0x3B, 1, 2);
/// TempMonitorOff (RegImageCal bit 0)
pub const TEMP_MONITOR_OFF: Field = Field::new(0x3B, 0, 1);

/// Silicon revision of every production SX1276/77/78/79 part
pub const SX1276_VERSION: u8 = 0x12;

/// Operating mode register (address: 0x01)
///
/// # Important Notes
/// - `family` can only change while the chip is in Sleep
/// - Bits 6:4 mean different things per family and are written back unchanged
#[register(0x01u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OpMode {
    /// Family and operating mode
    pub mode: Mode,
    /// Access the low-frequency (band 2/3) register page
    pub low_frequency_mode_on: bool,
    /// Raw bits 6:4
    pub retained: u8,
}

impl Default for OpMode {
    /// Power-on value 0x09: FSK standby with low-frequency mode on
    fn default() -> Self {
        Self {
            mode: Mode::FSK_STANDBY,
            low_frequency_mode_on: true,
            retained: 0,
        }
    }
}

impl FromByteArray for OpMode {
    type Error = Error;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let raw = bytes[0];
        let family = if LONG_RANGE_MODE.is_set(raw) {
            ModemFamily::LoRa
        } else {
            ModemFamily::FskOok
        };
        Ok(Self {
            mode: Mode {
                family,
                operating: OperatingMode::from_bits(MODE.extract(raw), family)?,
            },
            low_frequency_mode_on: LOW_FREQUENCY_MODE_ON.is_set(raw),
            retained: OP_MODE_RETAINED.extract(raw),
        })
    }
}

impl ToByteArray for OpMode {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut raw = LONG_RANGE_MODE.insert_flag(0, self.mode.family == ModemFamily::LoRa);
        raw = OP_MODE_RETAINED.insert(raw, self.retained)?;
        raw = LOW_FREQUENCY_MODE_ON.insert_flag(raw, self.low_frequency_mode_on);
        raw = MODE.insert(raw, self.mode.operating.bits())?;
        Ok([raw])
    }
}

/// Silicon version register (address: 0x42)
///
/// Bits 7:4 hold the full revision number, bits 3:0 the metal mask revision.
#[register(0x42u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Version {
    /// Raw revision byte
    pub value: u8,
}

impl FromByteArray for Version {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

/// TCXO register (address: 0x4B)
///
/// Selects an external TCXO on XTA instead of a crystal across XTA/XTB.
#[register(0x4Bu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tcxo {
    /// External clipped sine TCXO on XTA
    pub tcxo_input_on: bool,
    /// Reserved bits, written back unchanged
    pub retained: u8,
}

impl Default for Tcxo {
    /// Reset value 0x09: crystal oscillator
    fn default() -> Self {
        Self {
            tcxo_input_on: false,
            retained: 0x09,
        }
    }
}

impl FromByteArray for Tcxo {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            tcxo_input_on: TCXO_INPUT_ON.is_set(bytes[0]),
            retained: bytes[0] & !TCXO_INPUT_ON.mask(),
        })
    }
}

impl ToByteArray for Tcxo {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let raw = self.retained & !TCXO_INPUT_ON.mask();
        Ok([TCXO_INPUT_ON.insert_flag(raw, self.tcxo_input_on)])
    }
}

/// Image calibration register (address: 0x3B, FSK/OOK page)
///
/// # Important Notes
/// - Only reachable while the FSK/OOK modem is selected; the LoRa page holds RegInvertIQ2 here
/// - Calibration runs in FSK standby and takes about 10 ms
/// - `running` and `temp_change` are status bits, never written
#[register(0x3Bu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImageCal {
    /// Recalibrate automatically when the temperature drifts past `temp_threshold`
    pub auto_image_cal_on: bool,
    /// Starts a calibration when written set
    pub start: bool,
    /// Calibration in progress
    pub running: bool,
    /// Temperature moved past `temp_threshold` since the last calibration
    pub temp_change: bool,
    /// Drift that sets `temp_change`
    pub temp_threshold: TempThreshold,
    /// Temperature sensor disabled
    pub temp_monitor_off: bool,
}

impl Default for ImageCal {
    /// Reset value 0x82
    fn default() -> Self {
        Self {
            auto_image_cal_on: true,
            start: false,
            running: false,
            temp_change: false,
            temp_threshold: TempThreshold::C10,
            temp_monitor_off: false,
        }
    }
}

impl FromByteArray for ImageCal {
    type Error = Error;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let raw = bytes[0];
        Ok(Self {
            auto_image_cal_on: AUTO_IMAGE_CAL_ON.is_set(raw),
            start: IMAGE_CAL_START.is_set(raw),
            running: IMAGE_CAL_RUNNING.is_set(raw),
            temp_change: TEMP_CHANGE.is_set(raw),
            temp_threshold: TempThreshold::from_bits(TEMP_THRESHOLD.extract(raw))?,
            temp_monitor_off: TEMP_MONITOR_OFF.is_set(raw),
        })
    }
}

impl ToByteArray for ImageCal {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut raw = AUTO_IMAGE_CAL_ON.insert_flag(0, self.auto_image_cal_on);
        raw = IMAGE_CAL_START.insert_flag(raw, self.start);
        raw = TEMP_THRESHOLD.insert(raw, self.temp_threshold.bits())?;
        raw = TEMP_MONITOR_OFF.insert_flag(raw, self.temp_monitor_off);
        Ok([raw])
    }
}
