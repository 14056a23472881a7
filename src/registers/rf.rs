//! RF-related registers
//!
//! This module contains registers related to RF configuration including:
//! - Carrier frequency
//! - Power amplifier selection, level and ramp time
//! - Over-current protection
//! - LNA gain and AGC thresholds
//! - Synthesizer PLL bandwidth

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use super::Field;
use crate::params::{LnaGain, PaRamp, PaSelect, PllBandwidth};
use crate::Error;

/// PaSelect (RegPaConfig bit 7)
pub const PA_SELECT: Field = Field::new(0x09, 7, 1);
/// MaxPower (RegPaConfig bits 6:4)
pub const MAX_POWER: Field = Field::new(0x09, 4, 3);
/// OutputPower (RegPaConfig bits 3:0)
pub const OUTPUT_POWER: Field = Field::new(0x09, 0, 4);
/// PaRamp (RegPaRamp bits 3:0)
pub const PA_RAMP: Field = Field::new(0x0A, 0, 4);
/// OcpOn (RegOcp bit 5)
pub const OCP_ON: Field = Field::new(0x0B, 5, 1);
/// OcpTrim (RegOcp bits 4:0)
pub const OCP_TRIM: Field = Field::new(0x0B, 0, 5);
/// LnaGain (RegLna bits 7:5)
pub const LNA_GAIN: Field = Field::new(0x0C, 5, 3);
/// LnaBoostHf (RegLna bits 1:0)
pub const LNA_BOOST_HF: Field = Field::new(0x0C, 0, 2);
/// PaDac (RegPaDac bits 2:0)
pub const PA_DAC: Field = Field::new(0x4D, 0, 3);
/// AgcReferenceLevel (RegAgcRef bits 5:0)
pub const AGC_REFERENCE_LEVEL: Field = Field::new(0x61, 0, 6);
/// AgcStep1 (RegAgcThresh1 bits 4:0)
pub const AGC_STEP1: Field = Field::new(0x62, 0, 5);
/// AgcStep2 (RegAgcThresh2 bits 7:4)
pub const AGC_STEP2: Field = Field::new(0x63, 4, 4);
/// AgcStep3 (RegAgcThresh2 bits 3:0)
pub const AGC_STEP3: Field = Field::new(0x63, 0, 4);
/// AgcStep4 (RegAgcThresh3 bits 7:4)
pub const AGC_STEP4: Field = Field::new(0x64, 4, 4);
/// AgcStep5 (RegAgcThresh3 bits 3:0)
pub const AGC_STEP5: Field = Field::new(0x64, 0, 4);
/// PllBandwidth (RegPll bits 7:6)
pub const PLL_BANDWIDTH: Field = Field::new(0x70, 6, 2);

const LNA_BOOST_HF_ON: u8 = 0b11;
const PA_DAC_DEFAULT: u8 = 0x04;
const PA_DAC_HIGH_POWER: u8 = 0x07;

/// RF carrier frequency register (addresses: 0x06..=0x08)
///
/// 24-bit synthesizer value, most significant byte first. The carrier is
/// `frf * 32 MHz / 2^19`; the change takes effect once the LSB has been written, which a
/// single burst write guarantees.
#[register(0x06u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frf {
    /// 24-bit FRF value
    pub frf: u32,
}

impl Default for Frf {
    /// Reset value: 434 MHz
    fn default() -> Self {
        Self { frf: 0x6C_8000 }
    }
}

impl FromByteArray for Frf {
    type Error = Infallible;
    type Array = [u8; 3];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            frf: u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]),
        })
    }
}

impl ToByteArray for Frf {
    type Error = Error;
    type Array = [u8; 3];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let [high, msb, mid, lsb] = self.frf.to_be_bytes();
        if high != 0 {
            return Err(Error::InvalidParameter);
        }
        Ok([msb, mid, lsb])
    }
}

/// PA configuration register (address: 0x09)
///
/// # Important Notes
/// - RFO: Pout = Pmax - (15 - output_power), Pmax = 10.8 + 0.6 * max_power dBm
/// - PA_BOOST: Pout = 17 - (15 - output_power) dBm
/// - PA_BOOST with [`PaDac`] high power: Pout = 20 - (15 - output_power) dBm
#[register(0x09u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PaConfig {
    /// Output pin
    pub pa_select: PaSelect,
    /// 0..=7
    pub max_power: u8,
    /// 0..=15
    pub output_power: u8,
}

impl Default for PaConfig {
    /// Reset value 0x4F
    fn default() -> Self {
        Self {
            pa_select: PaSelect::Rfo,
            max_power: 4,
            output_power: 15,
        }
    }
}

impl FromByteArray for PaConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let raw = bytes[0];
        Ok(Self {
            pa_select: if PA_SELECT.is_set(raw) {
                PaSelect::PaBoost
            } else {
                PaSelect::Rfo
            },
            max_power: MAX_POWER.extract(raw),
            output_power: OUTPUT_POWER.extract(raw),
        })
    }
}

impl ToByteArray for PaConfig {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut raw = PA_SELECT.insert_flag(0, self.pa_select == PaSelect::PaBoost);
        raw = MAX_POWER.insert(raw, self.max_power)?;
        raw = OUTPUT_POWER.insert(raw, self.output_power)?;
        Ok([raw])
    }
}

/// PA ramp register (address: 0x0A)
///
/// Rise/fall time of the PA ramp in FSK and LoRa.
#[register(0x0Au8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PaRampConfig {
    /// Ramp time
    pub ramp: PaRamp,
    /// FSK shaping bits 7:4, written back unchanged
    pub retained: u8,
}

impl FromByteArray for PaRampConfig {
    type Error = Error;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            ramp: PaRamp::from_bits(PA_RAMP.extract(bytes[0]))?,
            retained: bytes[0] & !PA_RAMP.mask(),
        })
    }
}

impl ToByteArray for PaRampConfig {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([PA_RAMP.insert(self.retained & !PA_RAMP.mask(), self.ramp.bits())?])
    }
}

/// Over-current protection register (address: 0x0B)
///
/// Imax = 45 + 5 * trim mA for trim <= 15, -30 + 10 * trim mA for trim <= 27, else 240 mA.
#[register(0x0Bu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ocp {
    /// Protection enabled
    pub enabled: bool,
    /// 5-bit trim
    pub trim: u8,
}

impl Default for Ocp {
    /// Reset value 0x2B: on, 100 mA
    fn default() -> Self {
        Self {
            enabled: true,
            trim: 0x0B,
        }
    }
}

impl FromByteArray for Ocp {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            enabled: OCP_ON.is_set(bytes[0]),
            trim: OCP_TRIM.extract(bytes[0]),
        })
    }
}

impl ToByteArray for Ocp {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let raw = OCP_ON.insert_flag(0, self.enabled);
        Ok([OCP_TRIM.insert(raw, self.trim)?])
    }
}

/// LNA register (address: 0x0C)
///
/// # Important Notes
/// - The gain setting is ignored while AGC auto is on
/// - HF boost adds 150% LNA current, for bands above 525 MHz
#[register(0x0Cu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lna {
    /// Gain step
    pub gain: LnaGain,
    /// High-frequency LNA current boost
    pub boost_hf: bool,
    /// LnaBoostLf and reserved bits 4:2, written back unchanged
    pub retained: u8,
}

impl Default for Lna {
    /// Reset value 0x20
    fn default() -> Self {
        Self {
            gain: LnaGain::G1,
            boost_hf: false,
            retained: 0,
        }
    }
}

impl FromByteArray for Lna {
    type Error = Error;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let raw = bytes[0];
        let boost_hf = match LNA_BOOST_HF.extract(raw) {
            0b00 => false,
            LNA_BOOST_HF_ON => true,
            _ => return Err(Error::InvalidParameter),
        };
        Ok(Self {
            gain: LnaGain::from_bits(LNA_GAIN.extract(raw))?,
            boost_hf,
            retained: raw & !(LNA_GAIN.mask() | LNA_BOOST_HF.mask()),
        })
    }
}

impl ToByteArray for Lna {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut raw = self.retained & !(LNA_GAIN.mask() | LNA_BOOST_HF.mask());
        raw = LNA_GAIN.insert(raw, self.gain.bits())?;
        let boost = if self.boost_hf { LNA_BOOST_HF_ON } else { 0 };
        Ok([LNA_BOOST_HF.insert(raw, boost)?])
    }
}

/// PA DAC register (address: 0x4D)
///
/// # Important Notes
/// - High power (+20 dBm on PA_BOOST) requires OCP of at least 120 mA
/// - Duty cycle at +20 dBm must stay at or below 1%
#[register(0x4Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PaDac {
    /// High-power DAC, adds 3 dB on PA_BOOST
    pub high_power: bool,
    /// Reserved bits 7:3, written back unchanged
    pub retained: u8,
}

impl Default for PaDac {
    /// Reset value 0x84
    fn default() -> Self {
        Self {
            high_power: false,
            retained: 0x80,
        }
    }
}

impl FromByteArray for PaDac {
    type Error = Error;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let high_power = match PA_DAC.extract(bytes[0]) {
            PA_DAC_DEFAULT => false,
            PA_DAC_HIGH_POWER => true,
            _ => return Err(Error::InvalidParameter),
        };
        Ok(Self {
            high_power,
            retained: bytes[0] & !PA_DAC.mask(),
        })
    }
}

impl ToByteArray for PaDac {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let dac = if self.high_power {
            PA_DAC_HIGH_POWER
        } else {
            PA_DAC_DEFAULT
        };
        PA_DAC
            .insert(self.retained & !PA_DAC.mask(), dac)
            .map(|raw| [raw])
    }
}

/// AGC reference register (address: 0x61)
///
/// Sets the floor of the AGC thresholds: ReferenceLevel = -174 + NF + 10 log(2 * RxBw) +
/// SNR_min + AgcReferenceLevel dBm.
#[register(0x61u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AgcRef {
    /// 6-bit reference level offset (dB)
    pub level: u8,
    /// Reserved bits 7:6, written back unchanged
    pub retained: u8,
}

impl Default for AgcRef {
    /// Power-on value 0x19
    fn default() -> Self {
        Self {
            level: 0x19,
            retained: 0,
        }
    }
}

impl FromByteArray for AgcRef {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            level: AGC_REFERENCE_LEVEL.extract(bytes[0]),
            retained: bytes[0] & !AGC_REFERENCE_LEVEL.mask(),
        })
    }
}

impl ToByteArray for AgcRef {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let raw = self.retained & !AGC_REFERENCE_LEVEL.mask();
        Ok([AGC_REFERENCE_LEVEL.insert(raw, self.level)?])
    }
}

/// AGC threshold registers (addresses: 0x62..=0x64)
///
/// `steps[n]` is the gain step n+1 threshold above the AGC reference (dB). Step 1 is 5 bits
/// wide, steps 2 to 5 are 4 bits wide.
#[register(0x62u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AgcThresholds {
    /// AgcStep1..AgcStep5
    pub steps: [u8; 5],
    /// Reserved bits 7:5 of RegAgcThresh1, written back unchanged
    pub retained: u8,
}

impl Default for AgcThresholds {
    /// Power-on values 0x0C, 0x4B, 0xCC
    fn default() -> Self {
        Self {
            steps: [0x0C, 0x04, 0x0B, 0x0C, 0x0C],
            retained: 0,
        }
    }
}

impl FromByteArray for AgcThresholds {
    type Error = Infallible;
    type Array = [u8; 3];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let [thresh1, thresh2, thresh3] = bytes;
        Ok(Self {
            steps: [
                AGC_STEP1.extract(thresh1),
                AGC_STEP2.extract(thresh2),
                AGC_STEP3.extract(thresh2),
                AGC_STEP4.extract(thresh3),
                AGC_STEP5.extract(thresh3),
            ],
            retained: thresh1 & !AGC_STEP1.mask(),
        })
    }
}

impl ToByteArray for AgcThresholds {
    type Error = Error;
    type Array = [u8; 3];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let [step1, step2, step3, step4, step5] = self.steps;
        let thresh1 = AGC_STEP1.insert(self.retained & !AGC_STEP1.mask(), step1)?;
        let thresh2 = AGC_STEP3.insert(AGC_STEP2.insert(0, step2)?, step3)?;
        let thresh3 = AGC_STEP5.insert(AGC_STEP4.insert(0, step4)?, step5)?;
        Ok([thresh1, thresh2, thresh3])
    }
}

/// PLL register (address: 0x70)
#[register(0x70u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pll {
    /// Synthesizer loop bandwidth
    pub bandwidth: PllBandwidth,
    /// Reserved bits 5:0, written back unchanged
    pub retained: u8,
}

impl Default for Pll {
    /// Reset value 0xD0: 300 kHz
    fn default() -> Self {
        Self {
            bandwidth: PllBandwidth::Khz300,
            retained: 0x10,
        }
    }
}

impl FromByteArray for Pll {
    type Error = Error;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            bandwidth: PllBandwidth::from_bits(PLL_BANDWIDTH.extract(bytes[0]))?,
            retained: bytes[0] & !PLL_BANDWIDTH.mask(),
        })
    }
}

impl ToByteArray for Pll {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        PLL_BANDWIDTH
            .insert(self.retained & !PLL_BANDWIDTH.mask(), self.bandwidth.bits())
            .map(|raw| [raw])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frf_byte_order() {
        assert_eq!(Frf { frf: 0x6C_8000 }.to_bytes(), Ok([0x6C, 0x80, 0x00]));
        assert_eq!(Frf::from_bytes([0xD9, 0x00, 0x00]), Ok(Frf { frf: 0xD9_0000 }));
        assert_eq!(Frf { frf: 0x0100_0000 }.to_bytes(), Err(Error::InvalidParameter));
    }

    #[test]
    fn pa_config_reset_value() {
        assert_eq!(PaConfig::from_bytes([0x4F]), Ok(PaConfig::default()));
        let boost = PaConfig {
            pa_select: PaSelect::PaBoost,
            max_power: 7,
            output_power: 15,
        };
        assert_eq!(boost.to_bytes(), Ok([0xFF]));
        let bad = PaConfig {
            output_power: 16,
            ..boost
        };
        assert_eq!(bad.to_bytes(), Err(Error::InvalidParameter));
    }

    #[test]
    fn ocp_reset_value() {
        assert_eq!(Ocp::from_bytes([0x2B]), Ok(Ocp::default()));
        assert_eq!(Ocp::default().to_bytes(), Ok([0x2B]));
    }

    #[test]
    fn lna_boost_and_gain() {
        assert_eq!(Lna::from_bytes([0x20]), Ok(Lna::default()));
        let boosted = Lna {
            boost_hf: true,
            ..Lna::default()
        };
        assert_eq!(boosted.to_bytes(), Ok([0x23]));
        assert_eq!(Lna::from_bytes([0x00]), Err(Error::InvalidParameter));
        assert_eq!(Lna::from_bytes([0x21]), Err(Error::InvalidParameter));
    }

    #[test]
    fn pa_dac_modes() {
        assert_eq!(PaDac::from_bytes([0x84]), Ok(PaDac::default()));
        let high = PaDac {
            high_power: true,
            ..PaDac::default()
        };
        assert_eq!(high.to_bytes(), Ok([0x87]));
        assert_eq!(PaDac::from_bytes([0x85]), Err(Error::InvalidParameter));
    }

    #[test]
    fn pa_ramp_keeps_shaping_bits() {
        let ramp = PaRampConfig::from_bytes([0x29]).unwrap();
        assert_eq!(ramp.ramp, PaRamp::Us40);
        let faster = PaRampConfig {
            ramp: PaRamp::Us10,
            ..ramp
        };
        assert_eq!(faster.to_bytes(), Ok([0x2F]));
    }

    #[test]
    fn agc_power_on_values() {
        assert_eq!(AgcRef::from_bytes([0x19]), Ok(AgcRef::default()));
        assert_eq!(
            AgcThresholds::from_bytes([0x0C, 0x4B, 0xCC]),
            Ok(AgcThresholds::default())
        );
        assert_eq!(AgcThresholds::default().to_bytes(), Ok([0x0C, 0x4B, 0xCC]));
    }

    #[test]
    fn agc_step_widths() {
        let wide = AgcThresholds {
            steps: [31, 15, 15, 15, 15],
            retained: 0xA0,
        };
        assert_eq!(wide.to_bytes(), Ok([0xBF, 0xFF, 0xFF]));
        let too_wide = AgcThresholds {
            steps: [0, 16, 0, 0, 0],
            ..wide
        };
        assert_eq!(too_wide.to_bytes(), Err(Error::InvalidParameter));
        let level = AgcRef {
            level: 64,
            retained: 0,
        };
        assert_eq!(level.to_bytes(), Err(Error::InvalidParameter));
    }

    #[test]
    fn pll_keeps_reserved_bits() {
        let pll = Pll::from_bytes([0xD0]).unwrap();
        assert_eq!(pll, Pll::default());
        let narrow = Pll {
            bandwidth: PllBandwidth::Khz75,
            ..pll
        };
        assert_eq!(narrow.to_bytes(), Ok([0x10]));
    }
}
