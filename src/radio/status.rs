//! Interrupt flags, dispatch and link statistics

use core::convert::Infallible;

use embedded_hal::spi::SpiDevice;
use embedded_hal_async::digital::Wait;

use super::Sx127x;
use crate::irq::{self, Dio, Events, IrqFlags};
use crate::params::{fei_hz, frf_to_frequency, rssi_dbm, snr_db};
use crate::registers::{
    Frf, FrequencyError, HopChannel, IrqMask, IrqStatus, ModemConfig1, ModemStatus, PacketRssi,
    PacketSnr, Rssi, RxHeaderCount, RxPacketCount,
};
use crate::Error;

impl<SPI> Sx127x<SPI>
where
    SPI: SpiDevice,
{
    /// Raised interrupt flags.
    pub fn irq_flags(&self) -> Result<IrqFlags, Error> {
        Ok(self.device.read_register::<IrqStatus>()?.flags)
    }

    /// Clears `flags`; other flags are left raised.
    pub fn clear_irq_flags(&self, flags: IrqFlags) -> Result<(), Error> {
        self.device.write_register(IrqStatus { flags })
    }

    /// Masks interrupts: a masked flag is never raised.
    pub fn set_irq_mask(&self, masked: IrqFlags) -> Result<(), Error> {
        self.device.write_register(IrqMask { masked })
    }

    /// Masked interrupts.
    pub fn get_irq_mask(&self) -> Result<IrqFlags, Error> {
        Ok(self.device.read_register::<IrqMask>()?.masked)
    }

    /// Services one rising edge on `line`.
    ///
    /// Reads RegIrqFlags, keeps the flags `line` signals under the tracked DIO mapping, runs
    /// the matching callbacks in [`irq::DISPATCH_ORDER`] and then clears exactly those flags.
    /// Returns the flags consumed. An edge with nothing to consume runs no callback and writes
    /// nothing.
    ///
    /// The bus is free while callbacks run, so they may use the driver, e.g. call
    /// [`Sx127x::read_payload`] from [`Events::on_rx_done`].
    pub fn handle_interrupt<E>(&self, line: Dio, events: &mut E) -> Result<IrqFlags, Error>
    where
        E: Events + ?Sized,
    {
        let raised = self.irq_flags()?;
        let consumed = raised & self.tracked_dio_mapping().flags(line);
        if consumed.is_empty() {
            trace!("spurious edge on {}", line);
            return Ok(consumed);
        }

        trace!("{} consumed {=u8:#x}", line, consumed.bits());
        irq::invoke(events, consumed);
        self.clear_irq_flags(consumed)?;
        Ok(consumed)
    }

    /// Waits for rising edges on `pin`, wired to `line`, and services each one.
    ///
    /// Runs until the pin or the bus fails.
    ///
    /// # Errors
    /// * [`Error::PinFailure`] - waiting for an edge failed
    /// * [`Error::TransportFailure`] - servicing an edge failed
    pub async fn listen<P, E>(
        &self,
        line: Dio,
        pin: &mut P,
        events: &mut E,
    ) -> Result<Infallible, Error>
    where
        P: Wait,
        E: Events + ?Sized,
    {
        loop {
            pin.wait_for_rising_edge()
                .await
                .map_err(|_| Error::PinFailure)?;
            self.handle_interrupt(line, events)?;
        }
    }

    /// Modem status.
    pub fn modem_status(&self) -> Result<ModemStatus, Error> {
        self.device.read_register()
    }

    /// SNR of the last packet (dB).
    pub fn packet_snr(&self) -> Result<i8, Error> {
        Ok(snr_db(self.device.read_register::<PacketSnr>()?.value))
    }

    /// RSSI of the last packet (dBm).
    ///
    /// Below the noise floor (negative SNR) the SNR is added to the raw RSSI.
    pub fn packet_rssi(&self) -> Result<i16, Error> {
        let (raw, snr, frf) = self.device.lock(|bus| {
            Ok((
                bus.read_register::<PacketRssi>()?.value,
                bus.read_register::<PacketSnr>()?.value,
                bus.read_register::<Frf>()?.frf,
            ))
        })?;
        let rssi = rssi_dbm(raw, frf_to_frequency(frf));
        let snr = snr_db(snr);
        Ok(if snr < 0 { rssi + i16::from(snr) } else { rssi })
    }

    /// Current RSSI (dBm).
    pub fn rssi(&self) -> Result<i16, Error> {
        let raw = self.device.read_register::<Rssi>()?.value;
        Ok(rssi_dbm(raw, self.get_frequency()?))
    }

    /// Valid headers received since entering RX.
    pub fn rx_header_count(&self) -> Result<u16, Error> {
        Ok(self.device.read_register::<RxHeaderCount>()?.value)
    }

    /// Valid packets received since entering RX.
    pub fn rx_packet_count(&self) -> Result<u16, Error> {
        Ok(self.device.read_register::<RxPacketCount>()?.value)
    }

    /// Frequency hopping state.
    pub fn hop_channel(&self) -> Result<HopChannel, Error> {
        self.device.read_register()
    }

    /// Frequency error of the last packet (Hz).
    pub fn frequency_error(&self) -> Result<i32, Error> {
        let (fei, config) = self.device.lock(|bus| {
            Ok((
                bus.read_register::<FrequencyError>()?.value,
                bus.read_register::<ModemConfig1>()?,
            ))
        })?;
        Ok(fei_hz(fei, config.bandwidth))
    }
}
