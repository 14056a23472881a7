//! Operating mode state machine
//!
//! RegOpMode packs the modem family (LongRangeMode, bit 7) and the operating mode (bits 2:0)
//! into one register shared with unrelated settings. The family bit can only change while the
//! chip sleeps, and two of the eight mode codes only exist in the LoRa register set.
//!
//! | Mode          | LoRa | FSK/OOK |
//! |---------------|------|---------|
//! | Sleep         | 0    | 0       |
//! | Standby       | 1    | 1       |
//! | FsTx          | 2    | 2       |
//! | Tx            | 3    | 3       |
//! | FsRx          | 4    | 4       |
//! | RxContinuous  | 5    | 5       |
//! | RxSingle      | 6    | -       |
//! | Cad           | 7    | -       |

use crate::Error;

/// Worst-case time for a mode request to take effect (μs).
///
/// The chip does not confirm mode changes; callers that need the new mode to be active poll
/// [`crate::Sx127x::get_mode`] or wait this long. Sleep to Standby is the slowest transition.
pub const MODE_READY_DELAY_US: u32 = 250;

/// Operating mode of the transceiver (RegOpMode bits 2:0)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    /// Lowest power, FIFO not accessible
    Sleep = 0,
    /// Crystal oscillator running, configuration mode
    Standby = 1,
    /// Frequency synthesizer locked to the TX frequency
    FsTx = 2,
    /// Transmit the FIFO contents, then fall back to Standby
    Tx = 3,
    /// Frequency synthesizer locked to the RX frequency
    FsRx = 4,
    /// Receive until told otherwise
    RxContinuous = 5,
    /// Receive one packet or time out, then fall back to Standby (LoRa only)
    RxSingle = 6,
    /// Channel activity detection (LoRa only)
    Cad = 7,
}

impl OperatingMode {
    /// Raw RegOpMode encoding
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// True if the mode exists in the given modem family's register set.
    pub const fn is_valid_for(self, family: ModemFamily) -> bool {
        match family {
            ModemFamily::LoRa => true,
            ModemFamily::FskOok => !matches!(self, Self::RxSingle | Self::Cad),
        }
    }

    /// Decodes raw mode bits as interpreted by `family`.
    pub fn from_bits(bits: u8, family: ModemFamily) -> Result<Self, Error> {
        let mode = match bits {
            0 => Self::Sleep,
            1 => Self::Standby,
            2 => Self::FsTx,
            3 => Self::Tx,
            4 => Self::FsRx,
            5 => Self::RxContinuous,
            6 => Self::RxSingle,
            7 => Self::Cad,
            _ => return Err(Error::InvalidParameter),
        };
        if mode.is_valid_for(family) {
            Ok(mode)
        } else {
            Err(Error::InvalidParameter)
        }
    }
}

/// Modem family selected by RegOpMode bit 7
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModemFamily {
    /// FSK/OOK packet engine
    FskOok,
    /// LoRa modem
    LoRa,
}

/// An operating mode within a modem family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mode {
    /// Register set the mode belongs to
    pub family: ModemFamily,
    /// Operating mode
    pub operating: OperatingMode,
}

impl Mode {
    /// LoRa sleep, the only state in which the modem family can be changed
    pub const SLEEP: Self = Self::lora(OperatingMode::Sleep);
    /// LoRa standby
    pub const STANDBY: Self = Self::lora(OperatingMode::Standby);
    /// LoRa frequency synthesis, TX
    pub const FSTX: Self = Self::lora(OperatingMode::FsTx);
    /// LoRa transmit
    pub const TX: Self = Self::lora(OperatingMode::Tx);
    /// LoRa frequency synthesis, RX
    pub const FSRX: Self = Self::lora(OperatingMode::FsRx);
    /// LoRa continuous receive
    pub const RXCONT: Self = Self::lora(OperatingMode::RxContinuous);
    /// LoRa single receive
    pub const RXSINGLE: Self = Self::lora(OperatingMode::RxSingle);
    /// LoRa channel activity detection
    pub const CAD: Self = Self::lora(OperatingMode::Cad);
    /// FSK sleep, used to leave the LoRa modem
    pub const FSK_SLEEP: Self = Self::fsk(OperatingMode::Sleep);
    /// FSK standby, where [`crate::Sx127x::calibrate_image`] runs
    pub const FSK_STANDBY: Self = Self::fsk(OperatingMode::Standby);

    /// A LoRa-family mode
    pub const fn lora(operating: OperatingMode) -> Self {
        Self {
            family: ModemFamily::LoRa,
            operating,
        }
    }

    /// An FSK/OOK-family mode
    pub const fn fsk(operating: OperatingMode) -> Self {
        Self {
            family: ModemFamily::FskOok,
            operating,
        }
    }

    /// Checks whether the chip can go from `self` to `target`.
    ///
    /// # Errors
    /// * [`Error::InvalidModeTransition`] - `target` does not exist in its family, or the
    ///   family changes outside of Sleep
    pub fn validate_transition(self, target: Mode) -> Result<(), Error> {
        if !target.operating.is_valid_for(target.family) {
            return Err(Error::InvalidModeTransition);
        }
        if target.family != self.family
            && (self.operating != OperatingMode::Sleep || target.operating != OperatingMode::Sleep)
        {
            return Err(Error::InvalidModeTransition);
        }
        Ok(())
    }

    /// True for modes that end with an interrupt the dispatcher must observe
    pub const fn is_armed_operation(self) -> bool {
        matches!(
            self.operating,
            OperatingMode::Tx
                | OperatingMode::RxContinuous
                | OperatingMode::RxSingle
                | OperatingMode::Cad
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleep_to_standby() {
        assert_eq!(Mode::SLEEP.validate_transition(Mode::STANDBY), Ok(()));
    }

    #[test]
    fn family_switch_requires_sleep() {
        assert_eq!(Mode::SLEEP.validate_transition(Mode::FSK_SLEEP), Ok(()));
        assert_eq!(Mode::FSK_SLEEP.validate_transition(Mode::SLEEP), Ok(()));
        assert_eq!(
            Mode::STANDBY.validate_transition(Mode::FSK_STANDBY),
            Err(Error::InvalidModeTransition)
        );
        assert_eq!(
            Mode::SLEEP.validate_transition(Mode::FSK_STANDBY),
            Err(Error::InvalidModeTransition)
        );
        assert_eq!(
            Mode::STANDBY.validate_transition(Mode::FSK_SLEEP),
            Err(Error::InvalidModeTransition)
        );
    }

    #[test]
    fn lora_only_modes() {
        let fsk_standby = Mode::FSK_STANDBY;
        assert_eq!(
            fsk_standby.validate_transition(Mode::fsk(OperatingMode::Cad)),
            Err(Error::InvalidModeTransition)
        );
        assert_eq!(
            fsk_standby.validate_transition(Mode::fsk(OperatingMode::RxSingle)),
            Err(Error::InvalidModeTransition)
        );
        assert_eq!(
            fsk_standby.validate_transition(Mode::fsk(OperatingMode::RxContinuous)),
            Ok(())
        );
    }

    #[test]
    fn decode_respects_family() {
        assert_eq!(
            OperatingMode::from_bits(7, ModemFamily::LoRa),
            Ok(OperatingMode::Cad)
        );
        assert_eq!(
            OperatingMode::from_bits(7, ModemFamily::FskOok),
            Err(Error::InvalidParameter)
        );
        assert_eq!(OperatingMode::from_bits(8, ModemFamily::LoRa), Err(Error::InvalidParameter));
    }
}
