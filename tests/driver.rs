mod common;

use embedded_hal_mock::eh1::delay::{CheckedDelay, Transaction as DelayTransaction};
use embedded_hal_mock::eh1::digital::{Mock as DigitalMock, State, Transaction as GpioTransaction};
use sx127x::params::{frf_to_frequency, FREQUENCY_STEP_HZ};
use sx127x::registers::DioMapping;
use sx127x::{Bandwidth, Config, Error, Mode, SpreadingFactor};

#[test]
fn init_configures_lora_standby() {
    let (radio, chip) = common::radio();
    radio
        .init(&Config {
            frequency_hz: 433_000_000,
            ..Config::default()
        })
        .unwrap();

    assert_eq!(radio.get_mode().unwrap(), Mode::STANDBY);
    assert_eq!(chip.register(common::REG_OP_MODE), 0x89);
    assert_eq!(radio.tracked_dio_mapping(), DioMapping::default());

    // 433 MHz * 2^19 / 32 MHz
    assert_eq!(
        [chip.register(0x06), chip.register(0x07), chip.register(0x08)],
        [0x6C, 0x40, 0x00]
    );
    assert!(radio.get_frequency().unwrap().abs_diff(433_000_000) <= FREQUENCY_STEP_HZ);
    assert_eq!(radio.get_bandwidth().unwrap().hz(), 125_000);
    assert_eq!(radio.get_spreading_factor().unwrap(), SpreadingFactor::Sf7);
    assert!(radio.get_rx_crc().unwrap());
    assert!(!radio.get_low_data_rate_optimize().unwrap());
    assert_eq!(radio.get_preamble_length().unwrap(), 8);
    assert_eq!(radio.get_sync_word().unwrap(), 0x12);
    assert_eq!(radio.get_output_power().unwrap(), 17);
    assert_eq!(radio.get_ocp().unwrap(), Some(100));
}

#[test]
fn init_leaves_fsk_through_sleep() {
    let (radio, chip) = common::radio();
    radio.init(&Config::default()).unwrap();

    let op_mode_writes: Vec<u8> = chip
        .writes()
        .into_iter()
        .filter(|(address, _)| *address == common::REG_OP_MODE)
        .map(|(_, value)| value)
        .collect();
    // FSK sleep, LoRa sleep, ..., LoRa standby
    assert_eq!(op_mode_writes.first(), Some(&0x08));
    assert_eq!(op_mode_writes.get(1), Some(&0x88));
    assert_eq!(op_mode_writes.last(), Some(&0x89));
}

#[test]
fn init_recovers_from_an_active_lora_mode() {
    let (radio, chip) = common::radio();
    // LoRa RX continuous left over from a previous run
    chip.set_register(common::REG_OP_MODE, 0x8D);

    radio.init(&Config::default()).unwrap();
    assert_eq!(radio.get_mode().unwrap(), Mode::STANDBY);
}

#[test]
fn init_derives_low_data_rate_optimize() {
    let (radio, _chip) = common::radio();
    radio
        .init(&Config {
            spreading_factor: SpreadingFactor::Sf12,
            bandwidth: Bandwidth::Khz125,
            ..Config::default()
        })
        .unwrap();
    assert!(radio.get_low_data_rate_optimize().unwrap());
}

#[test]
fn init_rejects_unknown_silicon() {
    let (radio, chip) = common::radio();
    chip.set_register(common::REG_VERSION, 0x22);

    assert_eq!(radio.init(&Config::default()), Err(Error::UnsupportedChip(0x22)));
    assert!(chip.writes().is_empty());
}

#[test]
fn init_rejects_invalid_config() {
    let (radio, _chip) = common::radio();
    assert_eq!(
        radio.init(&Config {
            frequency_hz: 100_000_000,
            ..Config::default()
        }),
        Err(Error::InvalidParameter)
    );
}

#[test]
fn reset_pulses_the_line() {
    let (radio, _chip) = common::radio();
    radio.init(&Config::default()).unwrap();
    radio.set_dio_mapping(DioMapping::TX).unwrap();

    let mut pin = DigitalMock::new(&[
        GpioTransaction::set(State::Low),
        GpioTransaction::set(State::High),
    ]);
    let mut delay = CheckedDelay::new(&[DelayTransaction::delay_ms(10), DelayTransaction::delay_ms(10)]);

    radio.reset(&mut pin, &mut delay).unwrap();
    assert_eq!(radio.tracked_mode(), Mode::FSK_STANDBY);
    assert_eq!(radio.tracked_dio_mapping(), DioMapping::default());

    pin.done();
    delay.done();
}

#[test]
fn bus_failure_is_reported() {
    let (radio, chip) = common::radio();
    radio.init(&Config::default()).unwrap();
    chip.set_failing(true);

    assert_eq!(radio.version(), Err(Error::TransportFailure));
    assert_eq!(radio.set_mode(Mode::SLEEP), Err(Error::TransportFailure));
    assert_eq!(radio.write_payload(b"x"), Err(Error::TransportFailure));
    assert_eq!(radio.tracked_mode(), Mode::STANDBY);

    chip.set_failing(false);
    assert_eq!(radio.version(), Ok(0x12));
}

#[test]
fn link_statistics() {
    let (radio, chip) = common::radio();
    radio.init(&Config::default()).unwrap();

    // -20 quarter dB
    chip.set_register(0x19, 0xEC);
    chip.set_register(0x1A, 60);
    chip.set_register(0x1B, 50);
    assert_eq!(radio.packet_snr().unwrap(), -5);
    assert_eq!(radio.packet_rssi().unwrap(), -164 + 60 - 5);
    assert_eq!(radio.rssi().unwrap(), -164 + 50);

    chip.set_register(0x19, 0x28);
    assert_eq!(radio.packet_snr().unwrap(), 10);
    assert_eq!(radio.packet_rssi().unwrap(), -164 + 60);

    radio.set_frequency(868_000_000).unwrap();
    assert_eq!(radio.rssi().unwrap(), -157 + 50);

    chip.set_register(0x14, 0x01);
    chip.set_register(0x15, 0x02);
    chip.set_register(0x16, 0x00);
    chip.set_register(0x17, 0x07);
    assert_eq!(radio.rx_header_count().unwrap(), 0x0102);
    assert_eq!(radio.rx_packet_count().unwrap(), 7);

    // -256 raw at 125 kHz
    chip.set_register(0x28, 0x0F);
    chip.set_register(0x29, 0xFF);
    chip.set_register(0x2A, 0x00);
    assert_eq!(radio.frequency_error().unwrap(), -33);
}

#[test]
fn modem_and_hop_status() {
    let (radio, chip) = common::radio();

    chip.set_register(0x18, 0x2B);
    let status = radio.modem_status().unwrap();
    assert_eq!(status.rx_coding_rate, 1);
    assert!(!status.modem_clear);
    assert!(status.header_info_valid);
    assert!(!status.rx_ongoing);
    assert!(status.signal_synchronized);
    assert!(status.signal_detected);

    chip.set_register(0x1C, 0x45);
    let hop = radio.hop_channel().unwrap();
    assert!(!hop.pll_timeout);
    assert!(hop.crc_on_payload);
    assert_eq!(hop.channel, 5);
}

#[test]
fn raw_register_access() {
    let (radio, chip) = common::radio();

    radio.device().write_byte(0x39, 0x34).unwrap();
    assert_eq!(chip.register(0x39), 0x34);
    assert_eq!(radio.device().read_byte(0x39), Ok(0x34));
    assert_eq!(radio.get_sync_word().unwrap(), 0x34);

    let mut frf = [0u8; 3];
    radio.device().read_burst(0x06, &mut frf).unwrap();
    assert_eq!(frf, [0x6C, 0x80, 0x00]);
    assert_eq!(
        frf_to_frequency(u32::from_be_bytes([0, frf[0], frf[1], frf[2]])),
        434_000_000
    );
}

#[test]
fn release_returns_the_bus() {
    let (radio, chip) = common::radio();
    radio.init(&Config::default()).unwrap();

    let spi = radio.release();
    assert_eq!(spi.register(common::REG_OP_MODE), chip.register(common::REG_OP_MODE));
}
