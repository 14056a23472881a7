//! Register definitions for the SX1276 LoRa modem
//! Derived from the SX1276/77/78/79 datasheet, rev. 7
//!
//! Each register is a plain struct implementing [`regiface::ReadableRegister`] and/or
//! [`regiface::WritableRegister`]. Bit-packed registers build their raw byte from the
//! [`Field`] descriptors declared next to them; [`FIELDS`] collects every descriptor so the
//! layout can be checked in one place.

/// Declares a register whose whole content is one unsigned value.
macro_rules! value_register {
    ($(#[$meta:meta])* $name:ident, $address:literal, $ty:ty) => {
        $(#[$meta])*
        #[regiface::register($address)]
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Default,
            regiface::ReadableRegister,
            regiface::WritableRegister,
        )]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub struct $name {
            /// Register content
            pub value: $ty,
        }

        impl regiface::FromByteArray for $name {
            type Error = core::convert::Infallible;
            type Array = [u8; core::mem::size_of::<$ty>()];

            fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
                Ok(Self {
                    value: <$ty>::from_be_bytes(bytes),
                })
            }
        }

        impl regiface::ToByteArray for $name {
            type Error = core::convert::Infallible;
            type Array = [u8; core::mem::size_of::<$ty>()];

            fn to_bytes(self) -> Result<Self::Array, Self::Error> {
                Ok(self.value.to_be_bytes())
            }
        }
    };
}

mod dio;
mod fifo;
mod field;
mod modem;
mod rf;
mod status;
mod system;

pub use dio::*;
pub use fifo::*;
pub use field::Field;
pub use modem::*;
pub use rf::*;
pub use status::*;
pub use system::*;

/// Every bit-packed field the driver touches, by datasheet name.
pub const FIELDS: &[(&str, Field)] = &[
    ("LongRangeMode", LONG_RANGE_MODE),
    ("OpModeRetained", OP_MODE_RETAINED),
    ("LowFrequencyModeOn", LOW_FREQUENCY_MODE_ON),
    ("Mode", MODE),
    ("PaSelect", PA_SELECT),
    ("MaxPower", MAX_POWER),
    ("OutputPower", OUTPUT_POWER),
    ("PaRamp", PA_RAMP),
    ("OcpOn", OCP_ON),
    ("OcpTrim", OCP_TRIM),
    ("LnaGain", LNA_GAIN),
    ("LnaBoostHf", LNA_BOOST_HF),
    ("Bw", BANDWIDTH),
    ("CodingRate", CODING_RATE),
    ("ImplicitHeaderModeOn", IMPLICIT_HEADER_MODE_ON),
    ("SpreadingFactor", SPREADING_FACTOR),
    ("TxContinuousMode", TX_CONTINUOUS_MODE),
    ("RxPayloadCrcOn", RX_PAYLOAD_CRC_ON),
    ("SymbTimeoutMsb", SYMB_TIMEOUT_MSB),
    ("LowDataRateOptimize", LOW_DATA_RATE_OPTIMIZE),
    ("AgcAutoOn", AGC_AUTO_ON),
    ("DetectionOptimize", DETECTION_OPTIMIZE),
    ("InvertIQ", INVERT_IQ),
    ("TcxoInputOn", TCXO_INPUT_ON),
    ("AutoImageCalOn", AUTO_IMAGE_CAL_ON),
    ("ImageCalStart", IMAGE_CAL_START),
    ("ImageCalRunning", IMAGE_CAL_RUNNING),
    ("TempChange", TEMP_CHANGE),
    ("TempThreshold", TEMP_THRESHOLD),
    ("TempMonitorOff", TEMP_MONITOR_OFF),
    ("PaDac", PA_DAC),
    ("AgcReferenceLevel", AGC_REFERENCE_LEVEL),
    ("AgcStep1", AGC_STEP1),
    ("AgcStep2", AGC_STEP2),
    ("AgcStep3", AGC_STEP3),
    ("AgcStep4", AGC_STEP4),
    ("AgcStep5", AGC_STEP5),
    ("PllBandwidth", PLL_BANDWIDTH),
    ("RxCodingRate", RX_CODING_RATE),
    ("ModemClear", MODEM_CLEAR),
    ("HeaderInfoValid", HEADER_INFO_VALID),
    ("RxOngoing", RX_ONGOING),
    ("SignalSynchronized", SIGNAL_SYNCHRONIZED),
    ("SignalDetected", SIGNAL_DETECTED),
    ("PllTimeout", PLL_TIMEOUT),
    ("CrcOnPayload", CRC_ON_PAYLOAD),
    ("FhssPresentChannel", FHSS_PRESENT_CHANNEL),
    ("Dio0Mapping", DIO0_MAPPING),
    ("Dio1Mapping", DIO1_MAPPING),
    ("Dio2Mapping", DIO2_MAPPING),
    ("Dio3Mapping", DIO3_MAPPING),
    ("Dio4Mapping", DIO4_MAPPING),
    ("Dio5Mapping", DIO5_MAPPING),
    ("MapPreambleDetect", MAP_PREAMBLE_DETECT),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_do_not_overlap() {
        for (i, (name, field)) in FIELDS.iter().enumerate() {
            for (other_name, other) in &FIELDS[i + 1..] {
                assert!(
                    !field.overlaps(other),
                    "{name} overlaps {other_name} in register {:#04x}",
                    field.address()
                );
            }
        }
    }

    #[test]
    fn field_names_are_unique() {
        for (i, (name, _)) in FIELDS.iter().enumerate() {
            assert!(FIELDS[i + 1..].iter().all(|(other, _)| other != name));
        }
    }
}
