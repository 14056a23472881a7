//! FIFO addressing registers
//!
//! The 256-byte FIFO is shared between transmission and reception. It is read and written
//! through [`FIFO_ADDRESS`] at the position held by [`FifoAddrPtr`], which the chip
//! increments after every access.

/// RegFifo: data port of the FIFO
pub const FIFO_ADDRESS: u8 = 0x00;

/// Size of the FIFO in bytes
pub const FIFO_SIZE: usize = 256;

value_register!(
    /// FIFO SPI pointer register (address: 0x0D)
    ///
    /// Position of the next FIFO access over SPI.
    FifoAddrPtr,
    0x0Du8,
    u8
);

value_register!(
    /// FIFO TX base address register (address: 0x0E)
    ///
    /// Transmission starts reading the FIFO here.
    FifoTxBaseAddr,
    0x0Eu8,
    u8
);

value_register!(
    /// FIFO RX base address register (address: 0x0F)
    ///
    /// Received payloads are written from here on.
    FifoRxBaseAddr,
    0x0Fu8,
    u8
);

value_register!(
    /// Start address of the last packet received (address: 0x10)
    FifoRxCurrentAddr,
    0x10u8,
    u8
);

value_register!(
    /// Number of payload bytes of the last packet received (address: 0x13)
    RxNbBytes,
    0x13u8,
    u8
);

value_register!(
    /// Address of the last byte written by the receiver (address: 0x25)
    FifoRxByteAddr,
    0x25u8,
    u8
);
