//! Radio configuration applied by [`crate::Sx127x::init`]

use crate::params::{Bandwidth, CodingRate, PaSelect, SpreadingFactor};

/// Complete LoRa modem configuration.
///
/// The defaults match the common 434 MHz evaluation setup: 125 kHz, SF7, CR 4/5, 17 dBm on
/// PA_BOOST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Carrier frequency (Hz)
    pub frequency_hz: u32,
    /// Signal bandwidth
    pub bandwidth: Bandwidth,
    /// Error coding rate
    pub coding_rate: CodingRate,
    /// Spreading factor
    pub spreading_factor: SpreadingFactor,
    /// Preamble length (symbols)
    pub preamble_length: u16,
    /// PA output pin
    pub pa_select: PaSelect,
    /// Output power (dBm)
    pub output_power_dbm: i8,
    /// Over-current limit (mA), `None` disables the protection
    pub ocp_milliamps: Option<u16>,
    /// LoRa sync word
    pub sync_word: u8,
    /// Payload CRC generation and check
    pub rx_crc: bool,
    /// Implicit header mode
    pub implicit_header: bool,
    /// Longest payload accepted in reception and by [`crate::Sx127x::write_payload`]
    pub max_payload_length: u8,
    /// FIFO TX base address
    pub fifo_tx_base: u8,
    /// FIFO RX base address
    pub fifo_rx_base: u8,
    /// LNA high-frequency current boost
    pub lna_boost_hf: bool,
    /// LNA gain controlled by the AGC loop
    pub agc_auto: bool,
    /// Low-frequency register page
    pub low_frequency_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frequency_hz: 434_000_000,
            bandwidth: Bandwidth::Khz125,
            coding_rate: CodingRate::Cr4_5,
            spreading_factor: SpreadingFactor::Sf7,
            preamble_length: 8,
            pa_select: PaSelect::PaBoost,
            output_power_dbm: 17,
            ocp_milliamps: Some(100),
            sync_word: 0x12,
            rx_crc: true,
            implicit_header: false,
            max_payload_length: 255,
            fifo_tx_base: 0,
            fifo_rx_base: 0,
            lna_boost_hf: true,
            agc_auto: true,
            low_frequency_mode: true,
        }
    }
}
