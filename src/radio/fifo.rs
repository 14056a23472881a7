//! FIFO addressing and payload transfer
//!
//! Transmission reads the FIFO from the TX base address, reception writes it from the RX base
//! address. With both bases at 0 a received packet overwrites the payload last transmitted,
//! which is fine for half-duplex use.

use embedded_hal::spi::SpiDevice;

use super::Sx127x;
use crate::irq::IrqFlags;
use crate::registers::{
    FifoAddrPtr, FifoRxBaseAddr, FifoRxByteAddr, FifoRxCurrentAddr, FifoTxBaseAddr,
    MaxPayloadLength, ModemConfig1, PayloadLength, RxNbBytes, FIFO_ADDRESS, FIFO_SIZE,
};
use crate::Error;

impl<SPI> Sx127x<SPI>
where
    SPI: SpiDevice,
{
    /// Sets the FIFO base addresses for transmission and reception.
    pub fn set_fifo_base_addresses(&self, tx_base: u8, rx_base: u8) -> Result<(), Error> {
        self.device.lock(|bus| {
            bus.write_register(FifoTxBaseAddr { value: tx_base })?;
            bus.write_register(FifoRxBaseAddr { value: rx_base })
        })
    }

    /// FIFO TX base address.
    pub fn get_fifo_tx_base(&self) -> Result<u8, Error> {
        Ok(self.device.read_register::<FifoTxBaseAddr>()?.value)
    }

    /// FIFO RX base address.
    pub fn get_fifo_rx_base(&self) -> Result<u8, Error> {
        Ok(self.device.read_register::<FifoRxBaseAddr>()?.value)
    }

    /// Current FIFO SPI pointer.
    pub fn get_fifo_ptr(&self) -> Result<u8, Error> {
        Ok(self.device.read_register::<FifoAddrPtr>()?.value)
    }

    /// Start address of the last packet received.
    pub fn get_fifo_rx_current_addr(&self) -> Result<u8, Error> {
        Ok(self.device.read_register::<FifoRxCurrentAddr>()?.value)
    }

    /// Address of the last byte written by the receiver.
    pub fn get_fifo_rx_byte_addr(&self) -> Result<u8, Error> {
        Ok(self.device.read_register::<FifoRxByteAddr>()?.value)
    }

    /// Points the FIFO pointer back at the RX base address.
    pub fn reset_ptr_rx(&self) -> Result<(), Error> {
        self.device.lock(|bus| {
            let base = bus.read_register::<FifoRxBaseAddr>()?.value;
            bus.write_register(FifoAddrPtr { value: base })
        })
    }

    /// Loads `payload` for the next transmission and returns the number of bytes written.
    ///
    /// Sets RegPayloadLength, points the FIFO pointer at the TX base address and writes the
    /// payload in one burst, all under one lock.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - `payload` is empty
    /// * [`Error::PayloadTooLarge`] - longer than RegMaxPayloadLength or the FIFO space above
    ///   the TX base address. Nothing is written.
    pub fn write_payload(&self, payload: &[u8]) -> Result<usize, Error> {
        if payload.is_empty() {
            return Err(Error::InvalidParameter);
        }
        self.device.lock(|bus| {
            let max = bus.read_register::<MaxPayloadLength>()?.value as usize;
            let tx_base = bus.read_register::<FifoTxBaseAddr>()?.value;
            let space = FIFO_SIZE - 1 - tx_base as usize;
            if payload.len() > max || payload.len() > space {
                warn!(
                    "payload of {=usize} bytes exceeds limit {=usize}",
                    payload.len(),
                    max.min(space)
                );
                return Err(Error::PayloadTooLarge);
            }

            bus.write_register(PayloadLength {
                value: payload.len() as u8,
            })?;
            bus.write_register(FifoAddrPtr { value: tx_base })?;
            bus.write_burst(FIFO_ADDRESS, payload)?;
            Ok(payload.len())
        })
    }

    /// Copies the last packet received into `buf` and returns its length.
    ///
    /// # Errors
    /// * [`Error::StaleFlagRead`] - PayloadCrcError is raised: the packet is corrupt
    /// * [`Error::BufferTooSmall`] - `buf` is shorter than the packet
    pub fn read_payload(&self, buf: &mut [u8]) -> Result<usize, Error> {
        if self.irq_flags()?.contains(IrqFlags::PAYLOAD_CRC_ERROR) {
            return Err(Error::StaleFlagRead);
        }
        self.read_payload_nocheck(buf)
    }

    /// Like [`Sx127x::read_payload`], without checking the CRC flag.
    ///
    /// The length comes from RegRxNbBytes in explicit header mode and from RegPayloadLength in
    /// implicit header mode.
    pub fn read_payload_nocheck(&self, buf: &mut [u8]) -> Result<usize, Error> {
        self.device.lock(|bus| {
            let length = usize::from(if bus.read_register::<ModemConfig1>()?.implicit_header {
                bus.read_register::<PayloadLength>()?.value
            } else {
                bus.read_register::<RxNbBytes>()?.value
            });
            let packet = buf.get_mut(..length).ok_or(Error::BufferTooSmall)?;

            let start = bus.read_register::<FifoRxCurrentAddr>()?.value;
            bus.write_register(FifoAddrPtr { value: start })?;
            bus.read_burst(FIFO_ADDRESS, packet)?;
            Ok(length)
        })
    }
}
