//! Carrier frequency, power amplifier, LNA, AGC, PLL and oscillator settings
//!
//! Most of these settings should only be changed in Sleep or Standby. The frequency may be
//! changed in FsRx/FsTx for hopping, where it takes effect once the last FRF byte is written.

use embedded_hal::spi::SpiDevice;

use super::Sx127x;
use crate::params::{
    frequency_to_frf, frf_to_frequency, ocp_milliamps_from_trim, ocp_trim_from_milliamps,
    LnaGain, PaRamp, PaSelect, PllBandwidth, PowerSetting,
};
use crate::registers::{
    AgcRef, AgcThresholds, Frf, Lna, ModemConfig3, Ocp, PaConfig, PaDac, PaRampConfig, Pll, Tcxo,
};
use crate::Error;

impl<SPI> Sx127x<SPI>
where
    SPI: SpiDevice,
{
    /// Sets the carrier frequency, rounded to the nearest synthesizer step.
    ///
    /// The three FRF registers are written in one burst.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - `hz` outside 137 MHz..=1020 MHz; nothing is written
    pub fn set_frequency(&self, hz: u32) -> Result<(), Error> {
        let frf = frequency_to_frf(hz)?;
        self.device.write_register(Frf { frf })
    }

    /// Carrier frequency selected by the FRF registers (Hz).
    pub fn get_frequency(&self) -> Result<u32, Error> {
        Ok(frf_to_frequency(self.device.read_register::<Frf>()?.frf))
    }

    /// Sets the output power on the given PA pin.
    ///
    /// Writes RegPaConfig and RegPaDac. 18..=20 dBm on PA_BOOST switches the PA DAC to high
    /// power mode; any other level switches it back.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - `dbm` not reachable on `pa_select`; nothing is written
    pub fn set_output_power(&self, pa_select: PaSelect, dbm: i8) -> Result<(), Error> {
        let setting = PowerSetting::from_dbm(pa_select, dbm)?;
        self.device.lock(|bus| {
            bus.write_register(PaConfig {
                pa_select: setting.pa_select,
                max_power: setting.max_power,
                output_power: setting.output_power,
            })?;
            bus.modify_register(|dac: PaDac| {
                Ok(PaDac {
                    high_power: setting.high_power,
                    ..dac
                })
            })
            .map(|_| ())
        })
    }

    /// Output power currently configured (dBm), rounded to whole dB.
    pub fn get_output_power(&self) -> Result<i8, Error> {
        let (config, dac) = self.device.lock(|bus| {
            Ok((bus.read_register::<PaConfig>()?, bus.read_register::<PaDac>()?))
        })?;
        let setting = PowerSetting {
            pa_select: config.pa_select,
            max_power: config.max_power,
            output_power: config.output_power,
            high_power: dac.high_power,
        };
        Ok(setting.dbm())
    }

    /// Writes RegPaConfig as given.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - `max_power` above 7 or `output_power` above 15
    pub fn set_pa_config(&self, config: PaConfig) -> Result<(), Error> {
        self.device.write_register(config)
    }

    /// Reads RegPaConfig.
    pub fn get_pa_config(&self) -> Result<PaConfig, Error> {
        self.device.read_register()
    }

    /// Sets the PA ramp time.
    pub fn set_pa_ramp(&self, ramp: PaRamp) -> Result<(), Error> {
        self.device
            .modify_register(|config: PaRampConfig| Ok(PaRampConfig { ramp, ..config }))
            .map(|_| ())
    }

    /// PA ramp time.
    pub fn get_pa_ramp(&self) -> Result<PaRamp, Error> {
        Ok(self.device.read_register::<PaRampConfig>()?.ramp)
    }

    /// Enables over-current protection at `milliamps`, or disables it with `None`.
    ///
    /// The limit is rounded down to a representable trim.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - limit outside 45..=240 mA; nothing is written
    pub fn set_ocp(&self, milliamps: Option<u16>) -> Result<(), Error> {
        match milliamps {
            Some(milliamps) => self.device.write_register(Ocp {
                enabled: true,
                trim: ocp_trim_from_milliamps(milliamps)?,
            }),
            None => self
                .device
                .modify_register(|ocp: Ocp| Ok(Ocp { enabled: false, ..ocp }))
                .map(|_| ()),
        }
    }

    /// Over-current limit (mA), `None` when protection is off.
    pub fn get_ocp(&self) -> Result<Option<u16>, Error> {
        let ocp = self.device.read_register::<Ocp>()?;
        Ok(ocp.enabled.then(|| ocp_milliamps_from_trim(ocp.trim)))
    }

    /// Sets the LNA gain step. Only effective while AGC auto is off.
    pub fn set_lna_gain(&self, gain: LnaGain) -> Result<(), Error> {
        self.device
            .modify_register(|lna: Lna| Ok(Lna { gain, ..lna }))
            .map(|_| ())
    }

    /// LNA gain step.
    pub fn get_lna_gain(&self) -> Result<LnaGain, Error> {
        Ok(self.device.read_register::<Lna>()?.gain)
    }

    /// Enables the high-frequency LNA current boost.
    pub fn set_lna_boost_hf(&self, enabled: bool) -> Result<(), Error> {
        self.device
            .modify_register(|lna: Lna| {
                Ok(Lna {
                    boost_hf: enabled,
                    ..lna
                })
            })
            .map(|_| ())
    }

    /// True if the high-frequency LNA boost is on.
    pub fn get_lna_boost_hf(&self) -> Result<bool, Error> {
        Ok(self.device.read_register::<Lna>()?.boost_hf)
    }

    /// Hands LNA gain control to the AGC loop.
    pub fn set_agc_auto(&self, enabled: bool) -> Result<(), Error> {
        self.device
            .modify_register(|config: ModemConfig3| {
                Ok(ModemConfig3 {
                    agc_auto_on: enabled,
                    ..config
                })
            })
            .map(|_| ())
    }

    /// True if the AGC loop sets the LNA gain.
    pub fn get_agc_auto(&self) -> Result<bool, Error> {
        Ok(self.device.read_register::<ModemConfig3>()?.agc_auto_on)
    }

    /// Selects an external TCXO instead of a crystal. Only change in Sleep.
    pub fn set_tcxo(&self, enabled: bool) -> Result<(), Error> {
        self.device
            .modify_register(|tcxo: Tcxo| {
                Ok(Tcxo {
                    tcxo_input_on: enabled,
                    ..tcxo
                })
            })
            .map(|_| ())
    }

    /// True if the TCXO input is selected.
    pub fn get_tcxo(&self) -> Result<bool, Error> {
        Ok(self.device.read_register::<Tcxo>()?.tcxo_input_on)
    }

    /// Sets the AGC reference level offset (dB).
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - `level` above 63; nothing is written
    pub fn set_agc_reference(&self, level: u8) -> Result<(), Error> {
        self.device
            .modify_register(|agc: AgcRef| Ok(AgcRef { level, ..agc }))
            .map(|_| ())
    }

    /// AGC reference level offset (dB).
    pub fn get_agc_reference(&self) -> Result<u8, Error> {
        Ok(self.device.read_register::<AgcRef>()?.level)
    }

    /// Sets the five AGC gain step thresholds (dB), written in one burst.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - step 1 above 31 or another step above 15; nothing is
    ///   written
    pub fn set_agc_thresholds(&self, steps: [u8; 5]) -> Result<(), Error> {
        self.device
            .modify_register(|thresholds: AgcThresholds| {
                Ok(AgcThresholds {
                    steps,
                    ..thresholds
                })
            })
            .map(|_| ())
    }

    /// AGC gain step thresholds (dB).
    pub fn get_agc_thresholds(&self) -> Result<[u8; 5], Error> {
        Ok(self.device.read_register::<AgcThresholds>()?.steps)
    }

    /// Sets the synthesizer PLL bandwidth.
    pub fn set_pll_bandwidth(&self, bandwidth: PllBandwidth) -> Result<(), Error> {
        self.device
            .modify_register(|pll: Pll| Ok(Pll { bandwidth, ..pll }))
            .map(|_| ())
    }

    /// Synthesizer PLL bandwidth.
    pub fn get_pll_bandwidth(&self) -> Result<PllBandwidth, Error> {
        Ok(self.device.read_register::<Pll>()?.bandwidth)
    }
}
