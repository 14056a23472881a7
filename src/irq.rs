//! Interrupt classification and callback dispatch
//!
//! Each DIO line signals whichever events its RegDioMapping1 slot selects. When a line rises,
//! the driver reads RegIrqFlags, keeps only the flags that line stands for, runs the matching
//! [`Events`] callbacks in [`DISPATCH_ORDER`] and clears exactly those flags.

use bitflags::bitflags;

use crate::registers::{Dio0Function, Dio1Function, Dio2Function, Dio3Function, DioMapping};

bitflags! {
    /// LoRa interrupt flags (RegIrqFlags / RegIrqFlagsMask)
    ///
    /// Flags stay set until cleared by writing a 1 to their position.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct IrqFlags: u8 {
        /// No packet detected within the symbol timeout (RXSINGLE)
        const RX_TIMEOUT = 1 << 7;
        /// Packet reception complete
        const RX_DONE = 1 << 6;
        /// Received packet failed its payload CRC
        const PAYLOAD_CRC_ERROR = 1 << 5;
        /// Valid header received in explicit header mode
        const VALID_HEADER = 1 << 4;
        /// FIFO payload transmission complete
        const TX_DONE = 1 << 3;
        /// Channel activity detection finished
        const CAD_DONE = 1 << 2;
        /// Frequency hopping channel change requested
        const FHSS_CHANGE_CHANNEL = 1 << 1;
        /// Channel activity detected during CAD
        const CAD_DETECTED = 1 << 0;
    }
}

/// A single interrupt event, named after its flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqEvent {
    /// [`IrqFlags::PAYLOAD_CRC_ERROR`]
    PayloadCrcError,
    /// [`IrqFlags::RX_DONE`]
    RxDone,
    /// [`IrqFlags::TX_DONE`]
    TxDone,
    /// [`IrqFlags::CAD_DETECTED`]
    CadDetected,
    /// [`IrqFlags::CAD_DONE`]
    CadDone,
    /// [`IrqFlags::RX_TIMEOUT`]
    RxTimeout,
    /// [`IrqFlags::VALID_HEADER`]
    ValidHeader,
    /// [`IrqFlags::FHSS_CHANGE_CHANNEL`]
    FhssChangeChannel,
}

impl IrqEvent {
    /// Flag raised for the event
    pub const fn flag(self) -> IrqFlags {
        match self {
            Self::PayloadCrcError => IrqFlags::PAYLOAD_CRC_ERROR,
            Self::RxDone => IrqFlags::RX_DONE,
            Self::TxDone => IrqFlags::TX_DONE,
            Self::CadDetected => IrqFlags::CAD_DETECTED,
            Self::CadDone => IrqFlags::CAD_DONE,
            Self::RxTimeout => IrqFlags::RX_TIMEOUT,
            Self::ValidHeader => IrqFlags::VALID_HEADER,
            Self::FhssChangeChannel => IrqFlags::FHSS_CHANGE_CHANNEL,
        }
    }

    fn deliver<E: Events + ?Sized>(self, events: &mut E) {
        match self {
            Self::PayloadCrcError => events.on_payload_crc_error(),
            Self::RxDone => events.on_rx_done(),
            Self::TxDone => events.on_tx_done(),
            Self::CadDetected => events.on_cad_detected(),
            Self::CadDone => events.on_cad_done(),
            Self::RxTimeout => events.on_rx_timeout(),
            Self::ValidHeader => events.on_valid_header(),
            Self::FhssChangeChannel => events.on_fhss_change_channel(),
        }
    }
}

/// Order in which simultaneously raised events reach their callbacks.
///
/// A CRC error is reported before the RxDone of the same packet.
pub const DISPATCH_ORDER: [IrqEvent; 8] = [
    IrqEvent::PayloadCrcError,
    IrqEvent::RxDone,
    IrqEvent::TxDone,
    IrqEvent::CadDetected,
    IrqEvent::CadDone,
    IrqEvent::RxTimeout,
    IrqEvent::ValidHeader,
    IrqEvent::FhssChangeChannel,
];

/// Physical interrupt lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dio {
    /// DIO0
    Dio0,
    /// DIO1
    Dio1,
    /// DIO2
    Dio2,
    /// DIO3
    Dio3,
}

impl Dio {
    /// All lines the dispatcher serves
    pub const ALL: [Dio; 4] = [Self::Dio0, Self::Dio1, Self::Dio2, Self::Dio3];
}

/// Application callbacks, one per interrupt event.
///
/// Every method defaults to doing nothing; implement the ones you care about. Callbacks run on
/// whatever context delivers the interrupt and the flag is only cleared once they return, so
/// keep them short. The bus is not locked while a callback runs, so a callback may use the
/// driver, e.g. to read the payload on RxDone.
pub trait Events {
    /// A packet was received. Check [`crate::Sx127x::read_payload`] before trusting it.
    fn on_rx_done(&mut self) {}
    /// The FIFO contents were transmitted.
    fn on_tx_done(&mut self) {}
    /// Channel activity detection finished.
    fn on_cad_done(&mut self) {}
    /// Channel activity detection saw a LoRa preamble.
    fn on_cad_detected(&mut self) {}
    /// Single reception timed out.
    fn on_rx_timeout(&mut self) {}
    /// A valid header was received.
    fn on_valid_header(&mut self) {}
    /// The received payload failed its CRC. Reported before the matching RxDone.
    fn on_payload_crc_error(&mut self) {}
    /// The frequency hopping period elapsed.
    fn on_fhss_change_channel(&mut self) {}
}

impl Events for () {}

impl DioMapping {
    /// Interrupt flags a line signals under this mapping.
    pub fn flags(&self, line: Dio) -> IrqFlags {
        match line {
            Dio::Dio0 => match self.dio0 {
                Dio0Function::RxDone => IrqFlags::RX_DONE | IrqFlags::PAYLOAD_CRC_ERROR,
                Dio0Function::TxDone => IrqFlags::TX_DONE,
                Dio0Function::CadDone => IrqFlags::CAD_DONE,
            },
            Dio::Dio1 => match self.dio1 {
                Dio1Function::RxTimeout => IrqFlags::RX_TIMEOUT,
                Dio1Function::FhssChangeChannel => IrqFlags::FHSS_CHANGE_CHANNEL,
                Dio1Function::CadDetected => IrqFlags::CAD_DETECTED,
            },
            Dio::Dio2 => match self.dio2 {
                Dio2Function::FhssChangeChannel => IrqFlags::FHSS_CHANGE_CHANNEL,
            },
            Dio::Dio3 => match self.dio3 {
                Dio3Function::CadDone => IrqFlags::CAD_DONE,
                Dio3Function::ValidHeader => IrqFlags::VALID_HEADER,
                Dio3Function::PayloadCrcError => IrqFlags::PAYLOAD_CRC_ERROR,
            },
        }
    }

    /// True if some line signals every flag in `flags`.
    pub fn routes(&self, flags: IrqFlags) -> bool {
        Dio::ALL.iter().any(|line| self.flags(*line).contains(flags))
    }
}

/// Runs the callbacks for `flags` in [`DISPATCH_ORDER`].
pub fn invoke<E: Events + ?Sized>(events: &mut E, flags: IrqFlags) {
    for event in DISPATCH_ORDER {
        if flags.contains(event.flag()) {
            trace!("irq event {}", event);
            event.deliver(events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[derive(Default)]
    struct Recorder(Vec<&'static str>);

    impl Events for Recorder {
        fn on_rx_done(&mut self) {
            self.0.push("rx_done");
        }
        fn on_tx_done(&mut self) {
            self.0.push("tx_done");
        }
        fn on_cad_done(&mut self) {
            self.0.push("cad_done");
        }
        fn on_cad_detected(&mut self) {
            self.0.push("cad_detected");
        }
        fn on_payload_crc_error(&mut self) {
            self.0.push("crc_error");
        }
    }

    #[test]
    fn crc_error_before_rx_done() {
        let mut recorder = Recorder::default();
        invoke(&mut recorder, IrqFlags::RX_DONE | IrqFlags::PAYLOAD_CRC_ERROR);
        assert_eq!(recorder.0, ["crc_error", "rx_done"]);
    }

    #[test]
    fn cad_detected_before_cad_done() {
        let mut recorder = Recorder::default();
        invoke(&mut recorder, IrqFlags::CAD_DONE | IrqFlags::CAD_DETECTED);
        assert_eq!(recorder.0, ["cad_detected", "cad_done"]);
    }

    #[test]
    fn empty_flags_invoke_nothing() {
        let mut recorder = Recorder::default();
        invoke(&mut recorder, IrqFlags::empty());
        assert!(recorder.0.is_empty());
    }

    #[test]
    fn reset_mapping_routes() {
        let mapping = DioMapping::default();
        assert_eq!(
            mapping.flags(Dio::Dio0),
            IrqFlags::RX_DONE | IrqFlags::PAYLOAD_CRC_ERROR
        );
        assert_eq!(mapping.flags(Dio::Dio1), IrqFlags::RX_TIMEOUT);
        assert_eq!(mapping.flags(Dio::Dio2), IrqFlags::FHSS_CHANGE_CHANNEL);
        assert_eq!(mapping.flags(Dio::Dio3), IrqFlags::CAD_DONE);
        assert!(mapping.routes(IrqFlags::RX_DONE));
        assert!(!mapping.routes(IrqFlags::TX_DONE));
    }

    #[test]
    fn tx_mapping_routes_tx_done() {
        let mapping = DioMapping::TX;
        assert_eq!(mapping.flags(Dio::Dio0), IrqFlags::TX_DONE);
        assert!(mapping.routes(IrqFlags::TX_DONE));
    }

    #[test]
    fn completion_routed_off_dio0() {
        let mapping = DioMapping::default();
        assert_ne!(mapping.flags(Dio::Dio0), IrqFlags::CAD_DONE);
        assert!(mapping.routes(IrqFlags::CAD_DONE));
    }
}
