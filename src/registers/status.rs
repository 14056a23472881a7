//! Status and statistics registers
//!
//! This module contains registers reporting modem state:
//! - Interrupt flags and their mask
//! - Modem status and hop channel
//! - Packet SNR/RSSI, current RSSI and frequency error
//! - Header and packet counters

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use super::Field;
use crate::irq::IrqFlags;

/// RxCodingRate (RegModemStat bits 7:5)
pub const RX_CODING_RATE: Field = Field::new(0x18, 5, 3);
/// ModemClear (RegModemStat bit 4)
pub const MODEM_CLEAR: Field = Field::new(0x18, 4, 1);
/// HeaderInfoValid (RegModemStat bit 3)
pub const HEADER_INFO_VALID: Field = Field::new(0x18, 3, 1);
/// RxOngoing (RegModemStat bit 2)
pub const RX_ONGOING: Field = Field::new(0x18, 2, 1);
/// SignalSynchronized (RegModemStat bit 1)
pub const SIGNAL_SYNCHRONIZED: Field = Field::new(0x18, 1, 1);
/// SignalDetected (RegModemStat bit 0)
pub const SIGNAL_DETECTED: Field = Field::new(0x18, 0, 1);
/// PllTimeout (RegHopChannel bit 7)
pub const PLL_TIMEOUT: Field = Field::new(0x1C, 7, 1);
/// CrcOnPayload (RegHopChannel bit 6)
pub const CRC_ON_PAYLOAD: Field = Field::new(0x1C, 6, 1);
/// FhssPresentChannel (RegHopChannel bits 5:0)
pub const FHSS_PRESENT_CHANNEL: Field = Field::new(0x1C, 0, 6);

/// IRQ flags register (address: 0x12)
///
/// Writing a 1 to a flag clears it; zeros leave flags untouched.
#[register(0x12u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct IrqStatus {
    /// Raised flags on read, flags to clear on write
    pub flags: IrqFlags,
}

impl FromByteArray for IrqStatus {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: IrqFlags::from_bits_retain(bytes[0]),
        })
    }
}

impl ToByteArray for IrqStatus {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.flags.bits()])
    }
}

/// IRQ flags mask register (address: 0x11)
///
/// A set bit disables the matching interrupt: the flag is neither raised nor signaled.
#[register(0x11u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct IrqMask {
    /// Masked interrupts
    pub masked: IrqFlags,
}

impl FromByteArray for IrqMask {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            masked: IrqFlags::from_bits_retain(bytes[0]),
        })
    }
}

impl ToByteArray for IrqMask {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.masked.bits()])
    }
}

/// Modem status register (address: 0x18)
#[register(0x18u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModemStatus {
    /// Coding rate of the last header received
    pub rx_coding_rate: u8,
    /// Modem clear
    pub modem_clear: bool,
    /// Header info valid
    pub header_info_valid: bool,
    /// RX on-going
    pub rx_ongoing: bool,
    /// Signal synchronized
    pub signal_synchronized: bool,
    /// Signal detected
    pub signal_detected: bool,
}

impl FromByteArray for ModemStatus {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let raw = bytes[0];
        Ok(Self {
            rx_coding_rate: RX_CODING_RATE.extract(raw),
            modem_clear: MODEM_CLEAR.is_set(raw),
            header_info_valid: HEADER_INFO_VALID.is_set(raw),
            rx_ongoing: RX_ONGOING.is_set(raw),
            signal_synchronized: SIGNAL_SYNCHRONIZED.is_set(raw),
            signal_detected: SIGNAL_DETECTED.is_set(raw),
        })
    }
}

/// FHSS hop channel register (address: 0x1C)
#[register(0x1Cu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HopChannel {
    /// PLL failed to lock during the last TX or RX
    pub pll_timeout: bool,
    /// The last header received announced a payload CRC
    pub crc_on_payload: bool,
    /// Current frequency hopping channel
    pub channel: u8,
}

impl FromByteArray for HopChannel {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let raw = bytes[0];
        Ok(Self {
            pll_timeout: PLL_TIMEOUT.is_set(raw),
            crc_on_payload: CRC_ON_PAYLOAD.is_set(raw),
            channel: FHSS_PRESENT_CHANNEL.extract(raw),
        })
    }
}

/// Frequency error indicator registers (addresses: 0x28..=0x2A)
///
/// 20-bit two's complement value, bits 19:16 in the first register.
#[register(0x28u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrequencyError {
    /// Sign-extended FEI value
    pub value: i32,
}

impl FromByteArray for FrequencyError {
    type Error = Infallible;
    type Array = [u8; 3];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let raw = u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]);
        Ok(Self {
            value: crate::params::fei_from_raw(raw),
        })
    }
}

value_register!(
    /// Valid headers received since the last transition to RX (addresses: 0x14..=0x15)
    RxHeaderCount,
    0x14u8,
    u16
);

value_register!(
    /// Valid packets received since the last transition to RX (addresses: 0x16..=0x17)
    RxPacketCount,
    0x16u8,
    u16
);

value_register!(
    /// SNR of the last packet, two's complement in quarter dB (address: 0x19)
    PacketSnr,
    0x19u8,
    u8
);

value_register!(
    /// RSSI of the last packet, before offset (address: 0x1A)
    PacketRssi,
    0x1Au8,
    u8
);

value_register!(
    /// Current RSSI, before offset (address: 0x1B)
    Rssi,
    0x1Bu8,
    u8
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn irq_status_keeps_every_bit() {
        let status = IrqStatus::from_bytes([0x60]).unwrap();
        assert_eq!(status.flags, IrqFlags::RX_DONE | IrqFlags::PAYLOAD_CRC_ERROR);
        assert_eq!(status.to_bytes().unwrap(), [0x60]);
    }

    #[test]
    fn modem_status_bits() {
        let status = ModemStatus::from_bytes([0x2B]).unwrap();
        assert_eq!(status.rx_coding_rate, 1);
        assert!(!status.modem_clear);
        assert!(status.header_info_valid);
        assert!(!status.rx_ongoing);
        assert!(status.signal_synchronized);
        assert!(status.signal_detected);
    }

    #[test]
    fn hop_channel_bits() {
        let hop = HopChannel::from_bytes([0x45]).unwrap();
        assert!(!hop.pll_timeout);
        assert!(hop.crc_on_payload);
        assert_eq!(hop.channel, 5);
    }

    #[test]
    fn frequency_error_negative() {
        let fei = FrequencyError::from_bytes([0x0F, 0xFF, 0xF6]).unwrap();
        assert_eq!(fei.value, -10);
    }
}
