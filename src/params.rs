//! Modem parameter codec
//!
//! Conversions between human units and raw register bit patterns. Enumerated settings use
//! closed lookup tables; continuous settings use the closed-form formulas of the SX1276
//! datasheet with explicit range checks. Every out-of-domain input is rejected with
//! [`Error::InvalidParameter`]; nothing is clamped and nothing is masked.

use crate::Error;

/// Crystal oscillator frequency (Hz)
pub const FXOSC_HZ: u32 = 32_000_000;

/// Lowest carrier frequency accepted by [`frequency_to_frf`] (Hz)
pub const FREQUENCY_MIN_HZ: u32 = 137_000_000;

/// Highest carrier frequency accepted by [`frequency_to_frf`] (Hz)
pub const FREQUENCY_MAX_HZ: u32 = 1_020_000_000;

/// Frequency synthesizer step, FXOSC / 2^19, rounded up to whole Hz
pub const FREQUENCY_STEP_HZ: u32 = 62;

/// Carrier frequencies above this use the high-frequency RSSI offset (Hz)
pub const RF_MID_BAND_THRESHOLD_HZ: u32 = 525_000_000;

const FRF_SHIFT: u32 = 19;

/// Shortest preamble the modem supports (symbols)
pub const PREAMBLE_MIN: u16 = 6;

/// Symbol timeout bounds for single reception (symbols)
pub const SYMBOL_TIMEOUT_MIN: u16 = 4;
/// Symbol timeout upper bound, the 10-bit register maximum
pub const SYMBOL_TIMEOUT_MAX: u16 = 1023;

/// Over-current protection bounds (mA)
pub const OCP_MIN_MA: u16 = 45;
/// Upper over-current protection bound, reached with any trim above 27
pub const OCP_MAX_MA: u16 = 240;

const RSSI_OFFSET_HF: i16 = -157;
const RSSI_OFFSET_LF: i16 = -164;

/// LoRa signal bandwidth (RegModemConfig1 bits 7:4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bandwidth {
    /// 7.8 kHz
    Khz7_8 = 0,
    /// 10.4 kHz
    Khz10_4 = 1,
    /// 15.6 kHz
    Khz15_6 = 2,
    /// 20.8 kHz
    Khz20_8 = 3,
    /// 31.25 kHz
    Khz31_25 = 4,
    /// 41.7 kHz
    Khz41_7 = 5,
    /// 62.5 kHz
    Khz62_5 = 6,
    /// 125 kHz
    Khz125 = 7,
    /// 250 kHz
    Khz250 = 8,
    /// 500 kHz
    Khz500 = 9,
}

impl Bandwidth {
    /// Every bandwidth, narrowest first
    pub const ALL: [Bandwidth; 10] = [
        Self::Khz7_8,
        Self::Khz10_4,
        Self::Khz15_6,
        Self::Khz20_8,
        Self::Khz31_25,
        Self::Khz41_7,
        Self::Khz62_5,
        Self::Khz125,
        Self::Khz250,
        Self::Khz500,
    ];

    /// Raw register encoding
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decodes the raw register encoding.
    pub fn from_bits(bits: u8) -> Result<Self, Error> {
        Self::ALL
            .get(bits as usize)
            .copied()
            .ok_or(Error::InvalidParameter)
    }

    /// Nominal bandwidth in Hz
    pub const fn hz(self) -> u32 {
        match self {
            Self::Khz7_8 => 7_800,
            Self::Khz10_4 => 10_400,
            Self::Khz15_6 => 15_600,
            Self::Khz20_8 => 20_800,
            Self::Khz31_25 => 31_250,
            Self::Khz41_7 => 41_700,
            Self::Khz62_5 => 62_500,
            Self::Khz125 => 125_000,
            Self::Khz250 => 250_000,
            Self::Khz500 => 500_000,
        }
    }

    /// Looks up the setting whose nominal bandwidth is exactly `hz`.
    pub fn from_hz(hz: u32) -> Result<Self, Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|bw| bw.hz() == hz)
            .ok_or(Error::InvalidParameter)
    }
}

/// LoRa forward error correction rate (RegModemConfig1 bits 3:1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodingRate {
    /// 4/5
    Cr4_5 = 1,
    /// 4/6
    Cr4_6 = 2,
    /// 4/7
    Cr4_7 = 3,
    /// 4/8
    Cr4_8 = 4,
}

impl CodingRate {
    /// Every coding rate, least redundant first
    pub const ALL: [CodingRate; 4] = [Self::Cr4_5, Self::Cr4_6, Self::Cr4_7, Self::Cr4_8];

    /// Raw register encoding
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decodes the raw register encoding.
    pub fn from_bits(bits: u8) -> Result<Self, Error> {
        match bits {
            1 => Ok(Self::Cr4_5),
            2 => Ok(Self::Cr4_6),
            3 => Ok(Self::Cr4_7),
            4 => Ok(Self::Cr4_8),
            _ => Err(Error::InvalidParameter),
        }
    }

    /// Denominator of the rate, 5 to 8
    pub const fn denominator(self) -> u8 {
        self as u8 + 4
    }
}

/// LoRa spreading factor (RegModemConfig2 bits 7:4)
///
/// SF6 is only usable in implicit header mode and needs the dedicated detection settings
/// applied by [`crate::Sx127x::set_spreading_factor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpreadingFactor {
    /// 64 chips per symbol
    Sf6 = 6,
    /// 128 chips per symbol
    Sf7 = 7,
    /// 256 chips per symbol
    Sf8 = 8,
    /// 512 chips per symbol
    Sf9 = 9,
    /// 1024 chips per symbol
    Sf10 = 10,
    /// 2048 chips per symbol
    Sf11 = 11,
    /// 4096 chips per symbol
    Sf12 = 12,
}

impl SpreadingFactor {
    /// Every spreading factor, fastest first
    pub const ALL: [SpreadingFactor; 7] = [
        Self::Sf6,
        Self::Sf7,
        Self::Sf8,
        Self::Sf9,
        Self::Sf10,
        Self::Sf11,
        Self::Sf12,
    ];

    /// Raw register encoding
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decodes the raw register encoding.
    pub fn from_bits(bits: u8) -> Result<Self, Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|sf| sf.bits() == bits)
            .ok_or(Error::InvalidParameter)
    }

    /// Chips per symbol, 2^SF
    pub const fn chips(self) -> u32 {
        1 << (self as u32)
    }
}

/// Power amplifier ramp time (RegPaRamp bits 3:0)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PaRamp {
    /// 3.4 ms
    Ms3_4 = 0,
    /// 2 ms
    Ms2 = 1,
    /// 1 ms
    Ms1 = 2,
    /// 500 μs
    Us500 = 3,
    /// 250 μs
    Us250 = 4,
    /// 125 μs
    Us125 = 5,
    /// 100 μs
    Us100 = 6,
    /// 62 μs
    Us62 = 7,
    /// 50 μs
    Us50 = 8,
    /// 40 μs (reset default)
    Us40 = 9,
    /// 31 μs
    Us31 = 10,
    /// 25 μs
    Us25 = 11,
    /// 20 μs
    Us20 = 12,
    /// 15 μs
    Us15 = 13,
    /// 12 μs
    Us12 = 14,
    /// 10 μs
    Us10 = 15,
}

impl PaRamp {
    /// Every ramp time, slowest first
    pub const ALL: [PaRamp; 16] = [
        Self::Ms3_4,
        Self::Ms2,
        Self::Ms1,
        Self::Us500,
        Self::Us250,
        Self::Us125,
        Self::Us100,
        Self::Us62,
        Self::Us50,
        Self::Us40,
        Self::Us31,
        Self::Us25,
        Self::Us20,
        Self::Us15,
        Self::Us12,
        Self::Us10,
    ];

    /// Raw register encoding
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decodes the raw register encoding.
    pub fn from_bits(bits: u8) -> Result<Self, Error> {
        Self::ALL
            .get(bits as usize)
            .copied()
            .ok_or(Error::InvalidParameter)
    }
}

/// LNA gain step (RegLna bits 7:5), G1 is the highest gain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LnaGain {
    /// Maximum gain
    G1 = 1,
    /// Maximum gain - 6 dB
    G2 = 2,
    /// Maximum gain - 12 dB
    G3 = 3,
    /// Maximum gain - 24 dB
    G4 = 4,
    /// Maximum gain - 36 dB
    G5 = 5,
    /// Maximum gain - 48 dB
    G6 = 6,
}

impl LnaGain {
    /// Every gain step, highest gain first
    pub const ALL: [LnaGain; 6] = [Self::G1, Self::G2, Self::G3, Self::G4, Self::G5, Self::G6];

    /// Raw register encoding
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decodes the raw register encoding.
    pub fn from_bits(bits: u8) -> Result<Self, Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|gain| gain.bits() == bits)
            .ok_or(Error::InvalidParameter)
    }
}

/// Synthesizer PLL bandwidth (RegPll bits 7:6)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PllBandwidth {
    /// 75 kHz
    Khz75 = 0,
    /// 150 kHz
    Khz150 = 1,
    /// 225 kHz
    Khz225 = 2,
    /// 300 kHz (reset default)
    Khz300 = 3,
}

impl PllBandwidth {
    /// Every bandwidth, narrowest first
    pub const ALL: [PllBandwidth; 4] = [Self::Khz75, Self::Khz150, Self::Khz225, Self::Khz300];

    /// Raw register encoding
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decodes the raw register encoding.
    pub fn from_bits(bits: u8) -> Result<Self, Error> {
        Self::ALL
            .get(bits as usize)
            .copied()
            .ok_or(Error::InvalidParameter)
    }

    /// Bandwidth in kHz
    pub const fn khz(self) -> u16 {
        75 * (self as u16 + 1)
    }
}

/// Temperature change that flags a recalibration (RegImageCal bits 2:1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TempThreshold {
    /// 5 °C
    C5 = 0,
    /// 10 °C (reset default)
    C10 = 1,
    /// 15 °C
    C15 = 2,
    /// 20 °C
    C20 = 3,
}

impl TempThreshold {
    /// Every threshold, smallest first
    pub const ALL: [TempThreshold; 4] = [Self::C5, Self::C10, Self::C15, Self::C20];

    /// Raw register encoding
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decodes the raw register encoding.
    pub fn from_bits(bits: u8) -> Result<Self, Error> {
        Self::ALL
            .get(bits as usize)
            .copied()
            .ok_or(Error::InvalidParameter)
    }
}

/// Power amplifier output pin (RegPaConfig bit 7)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PaSelect {
    /// RFO pin, output power limited to +14 dBm
    Rfo = 0,
    /// PA_BOOST pin, output power limited to +20 dBm
    PaBoost = 1,
}

/// Converts a carrier frequency to the 24-bit FRF register value.
///
/// The result is rounded to the nearest synthesizer step, so decoding it with
/// [`frf_to_frequency`] returns a value within one step of `hz`.
///
/// # Errors
/// * [`Error::InvalidParameter`] - `hz` outside 137 MHz..=1020 MHz
pub fn frequency_to_frf(hz: u32) -> Result<u32, Error> {
    if !(FREQUENCY_MIN_HZ..=FREQUENCY_MAX_HZ).contains(&hz) {
        return Err(Error::InvalidParameter);
    }
    let scaled = (hz as u64) << FRF_SHIFT;
    Ok(((scaled + (FXOSC_HZ as u64 / 2)) / FXOSC_HZ as u64) as u32)
}

/// Converts a 24-bit FRF register value to the carrier frequency it selects, in Hz.
pub fn frf_to_frequency(frf: u32) -> u32 {
    let hz = (frf as u64 & 0x00FF_FFFF) * FXOSC_HZ as u64;
    ((hz + (1 << (FRF_SHIFT - 1))) >> FRF_SHIFT) as u32
}

/// Converts an over-current limit to the 5-bit OcpTrim value.
///
/// The limit is rounded down to the nearest representable value: 5 mA steps up to 120 mA,
/// 10 mA steps from 130 mA to 240 mA.
///
/// # Errors
/// * [`Error::InvalidParameter`] - `milliamps` outside 45..=240
pub fn ocp_trim_from_milliamps(milliamps: u16) -> Result<u8, Error> {
    match milliamps {
        OCP_MIN_MA..=120 => Ok(((milliamps - 45) / 5) as u8),
        121..=OCP_MAX_MA => Ok(((milliamps + 30) / 10) as u8),
        _ => Err(Error::InvalidParameter),
    }
}

/// Converts a 5-bit OcpTrim value to the current limit it selects, in mA.
pub fn ocp_milliamps_from_trim(trim: u8) -> u16 {
    let trim = (trim & 0x1F) as u16;
    match trim {
        0..=15 => 45 + 5 * trim,
        16..=27 => 10 * trim - 30,
        _ => OCP_MAX_MA,
    }
}

/// Quantization step of the over-current limit around `milliamps`
pub const fn ocp_step(milliamps: u16) -> u16 {
    if milliamps <= 120 {
        5
    } else {
        10
    }
}

/// PA_BOOST output above OutputPower with the high-power DAC on (dBm)
const HIGH_POWER_OFFSET_DBM: i8 = 5;

/// Raw contents of RegPaConfig plus the PA DAC high-power switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerSetting {
    /// Output pin
    pub pa_select: PaSelect,
    /// Pmax = 10.8 + 0.6 * max_power dBm, 0..=7
    pub max_power: u8,
    /// Output power step, 0..=15
    pub output_power: u8,
    /// High-power DAC on PA_BOOST (RegPaDac = 0x87): Pout = 5 + output_power dBm
    pub high_power: bool,
}

impl PowerSetting {
    /// Selects the register settings producing `dbm` on the given pin.
    ///
    /// - PA_BOOST: 2..=17 dBm, or 18..=20 dBm with the high-power DAC
    /// - RFO: 0..=15 dBm with MaxPower fixed at 7
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - `dbm` not reachable on that pin
    pub fn from_dbm(pa_select: PaSelect, dbm: i8) -> Result<Self, Error> {
        match (pa_select, dbm) {
            (PaSelect::PaBoost, 2..=17) => Ok(Self {
                pa_select,
                max_power: 7,
                output_power: (dbm - 2) as u8,
                high_power: false,
            }),
            (PaSelect::PaBoost, 18..=20) => Ok(Self {
                pa_select,
                max_power: 7,
                output_power: (dbm - HIGH_POWER_OFFSET_DBM) as u8,
                high_power: true,
            }),
            (PaSelect::Rfo, 0..=15) => Ok(Self {
                pa_select,
                max_power: 7,
                output_power: dbm as u8,
                high_power: false,
            }),
            _ => Err(Error::InvalidParameter),
        }
    }

    /// Output power produced by these settings, rounded to whole dBm.
    pub fn dbm(&self) -> i8 {
        match self.pa_select {
            PaSelect::PaBoost if self.high_power => HIGH_POWER_OFFSET_DBM + self.output_power as i8,
            PaSelect::PaBoost => 2 + self.output_power as i8,
            PaSelect::Rfo => {
                // tenths of dBm: Pmax - (15 - OutputPower)
                let pmax = 108 + 6 * self.max_power as i16;
                let tenths = pmax - 10 * (15 - self.output_power as i16);
                (tenths + 5).div_euclid(10) as i8
            }
        }
    }
}

/// Converts a raw RSSI register value to dBm for a carrier at `frequency_hz`.
pub fn rssi_dbm(raw: u8, frequency_hz: u32) -> i16 {
    let offset = if frequency_hz > RF_MID_BAND_THRESHOLD_HZ {
        RSSI_OFFSET_HF
    } else {
        RSSI_OFFSET_LF
    };
    offset + raw as i16
}

/// Converts the raw RegPktSnrValue (two's complement, quarter dB) to whole dB.
pub fn snr_db(raw: u8) -> i8 {
    (raw as i8) / 4
}

/// Sign-extends the 20-bit frequency error indicator.
pub fn fei_from_raw(raw: u32) -> i32 {
    (((raw & 0x000F_FFFF) << 12) as i32) >> 12
}

/// Converts the frequency error indicator to Hz for the given bandwidth.
///
/// Ferr = FreqError * 2^24 / FXOSC * BW / 500 kHz
pub fn fei_hz(fei: i32, bandwidth: Bandwidth) -> i32 {
    let numerator = fei as i64 * (1i64 << 24) * bandwidth.hz() as i64;
    (numerator / (FXOSC_HZ as i64 * 500_000)) as i32
}

/// Symbol duration in microseconds.
pub fn symbol_duration_us(sf: SpreadingFactor, bandwidth: Bandwidth) -> u32 {
    (sf.chips() as u64 * 1_000_000 / bandwidth.hz() as u64) as u32
}

/// True when the datasheet mandates LowDataRateOptimize: symbols longer than 16 ms.
pub fn needs_low_data_rate_optimize(sf: SpreadingFactor, bandwidth: Bandwidth) -> bool {
    symbol_duration_us(sf, bandwidth) > 16_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerated_tables_round_trip() {
        for bw in Bandwidth::ALL {
            assert_eq!(Bandwidth::from_bits(bw.bits()), Ok(bw));
            assert_eq!(Bandwidth::from_hz(bw.hz()), Ok(bw));
        }
        for cr in CodingRate::ALL {
            assert_eq!(CodingRate::from_bits(cr.bits()), Ok(cr));
        }
        for sf in SpreadingFactor::ALL {
            assert_eq!(SpreadingFactor::from_bits(sf.bits()), Ok(sf));
        }
        for ramp in PaRamp::ALL {
            assert_eq!(PaRamp::from_bits(ramp.bits()), Ok(ramp));
        }
        for gain in LnaGain::ALL {
            assert_eq!(LnaGain::from_bits(gain.bits()), Ok(gain));
        }
        for pll in PllBandwidth::ALL {
            assert_eq!(PllBandwidth::from_bits(pll.bits()), Ok(pll));
        }
        for threshold in TempThreshold::ALL {
            assert_eq!(TempThreshold::from_bits(threshold.bits()), Ok(threshold));
        }
        assert_eq!(PllBandwidth::Khz225.khz(), 225);
    }

    #[test]
    fn enumerated_tables_reject_undefined_patterns() {
        assert_eq!(Bandwidth::from_bits(10), Err(Error::InvalidParameter));
        assert_eq!(Bandwidth::from_hz(100_000), Err(Error::InvalidParameter));
        assert_eq!(CodingRate::from_bits(0), Err(Error::InvalidParameter));
        assert_eq!(CodingRate::from_bits(5), Err(Error::InvalidParameter));
        assert_eq!(SpreadingFactor::from_bits(5), Err(Error::InvalidParameter));
        assert_eq!(SpreadingFactor::from_bits(13), Err(Error::InvalidParameter));
        assert_eq!(PaRamp::from_bits(16), Err(Error::InvalidParameter));
        assert_eq!(LnaGain::from_bits(0), Err(Error::InvalidParameter));
        assert_eq!(LnaGain::from_bits(7), Err(Error::InvalidParameter));
        assert_eq!(PllBandwidth::from_bits(4), Err(Error::InvalidParameter));
    }

    #[test]
    fn frequency_known_values() {
        // Datasheet reset value 0x6C8000 selects 434 MHz
        assert_eq!(frequency_to_frf(434_000_000), Ok(0x6C_8000));
        assert_eq!(frf_to_frequency(0x6C_8000), 434_000_000);
        assert_eq!(frequency_to_frf(868_000_000), Ok(0xD9_0000));
        assert_eq!(frequency_to_frf(915_000_000), Ok(0xE4_C000));
    }

    #[test]
    fn frequency_out_of_range() {
        assert_eq!(frequency_to_frf(136_999_999), Err(Error::InvalidParameter));
        assert_eq!(frequency_to_frf(1_020_000_001), Err(Error::InvalidParameter));
        assert!(frequency_to_frf(FREQUENCY_MIN_HZ).is_ok());
        assert!(frequency_to_frf(FREQUENCY_MAX_HZ).is_ok());
    }

    #[test]
    fn ocp_known_values() {
        assert_eq!(ocp_trim_from_milliamps(100), Ok(11));
        assert_eq!(ocp_milliamps_from_trim(11), 100);
        assert_eq!(ocp_trim_from_milliamps(240), Ok(27));
        assert_eq!(ocp_milliamps_from_trim(0x1F), 240);
        assert_eq!(ocp_trim_from_milliamps(44), Err(Error::InvalidParameter));
        assert_eq!(ocp_trim_from_milliamps(241), Err(Error::InvalidParameter));
    }

    #[test]
    fn power_round_trip() {
        for dbm in 2..=17 {
            let setting = PowerSetting::from_dbm(PaSelect::PaBoost, dbm).unwrap();
            assert_eq!(setting.dbm(), dbm);
        }
        for dbm in 18..=20 {
            let high = PowerSetting::from_dbm(PaSelect::PaBoost, dbm).unwrap();
            assert!(high.high_power);
            assert_eq!(high.output_power, (dbm - 5) as u8);
            assert_eq!(high.dbm(), dbm);
        }
        for dbm in 0..=15 {
            assert_eq!(PowerSetting::from_dbm(PaSelect::Rfo, dbm).unwrap().dbm(), dbm);
        }
    }

    #[test]
    fn power_out_of_range() {
        for dbm in [1, 21] {
            assert_eq!(
                PowerSetting::from_dbm(PaSelect::PaBoost, dbm),
                Err(Error::InvalidParameter)
            );
        }
        assert_eq!(PowerSetting::from_dbm(PaSelect::Rfo, -1), Err(Error::InvalidParameter));
        assert_eq!(PowerSetting::from_dbm(PaSelect::Rfo, 16), Err(Error::InvalidParameter));
    }

    #[test]
    fn high_power_decode_follows_output_power() {
        let setting = PowerSetting {
            pa_select: PaSelect::PaBoost,
            max_power: 7,
            output_power: 13,
            high_power: true,
        };
        assert_eq!(setting.dbm(), 18);
        let low = PowerSetting {
            output_power: 0,
            ..setting
        };
        assert_eq!(low.dbm(), 5);
    }

    #[test]
    fn fei_sign_extension() {
        assert_eq!(fei_from_raw(0x0_0001), 1);
        assert_eq!(fei_from_raw(0xF_FFFF), -1);
        assert_eq!(fei_from_raw(0x8_0000), -524_288);
    }

    #[test]
    fn low_data_rate_threshold() {
        assert!(needs_low_data_rate_optimize(SpreadingFactor::Sf12, Bandwidth::Khz125));
        assert!(needs_low_data_rate_optimize(SpreadingFactor::Sf11, Bandwidth::Khz125));
        assert!(!needs_low_data_rate_optimize(SpreadingFactor::Sf10, Bandwidth::Khz125));
    }

    #[test]
    fn snr_and_rssi() {
        assert_eq!(snr_db(0x28), 10);
        assert_eq!(snr_db(0xEC), -5);
        assert_eq!(rssi_dbm(100, 868_000_000), -57);
        assert_eq!(rssi_dbm(100, 433_000_000), -64);
    }
}
