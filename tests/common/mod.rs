//! Simulated SX1276 for integration tests
//!
//! Implements the chip side of the SPI protocol over a plain register file: address byte with
//! the write flag in the MSB, address auto-increment, the FIFO port advancing RegFifoAddrPtr
//! and write-1-to-clear RegIrqFlags. Image calibration completes as soon as it is started
//! unless the chip is told to hang. Every written byte is logged, and bus failures can be
//! injected.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::spi::{ErrorKind, ErrorType, Operation, SpiDevice};
use sx127x::{IrqFlags, Sx127x};

pub const REG_FIFO: u8 = 0x00;
pub const REG_OP_MODE: u8 = 0x01;
pub const REG_FIFO_ADDR_PTR: u8 = 0x0D;
pub const REG_FIFO_TX_BASE: u8 = 0x0E;
pub const REG_FIFO_RX_BASE: u8 = 0x0F;
pub const REG_FIFO_RX_CURRENT: u8 = 0x10;
pub const REG_IRQ_FLAGS: u8 = 0x12;
pub const REG_RX_NB_BYTES: u8 = 0x13;
pub const REG_IMAGE_CAL: u8 = 0x3B;
pub const REG_VERSION: u8 = 0x42;

const IMAGE_CAL_START: u8 = 0x40;
const IMAGE_CAL_RUNNING: u8 = 0x20;

/// Power-on register values that the driver touches, LoRa page except RegImageCal
const RESET_VALUES: &[(u8, u8)] = &[
    (0x01, 0x09),
    (0x06, 0x6C),
    (0x07, 0x80),
    (0x08, 0x00),
    (0x09, 0x4F),
    (0x0A, 0x09),
    (0x0B, 0x2B),
    (0x0C, 0x20),
    (0x0E, 0x80),
    (0x1D, 0x72),
    (0x1E, 0x70),
    (0x1F, 0x64),
    (0x21, 0x08),
    (0x22, 0x01),
    (0x23, 0xFF),
    (0x31, 0xC3),
    (0x33, 0x27),
    (0x37, 0x0A),
    (0x39, 0x12),
    (0x3B, 0x82),
    (0x42, 0x12),
    (0x4B, 0x09),
    (0x4D, 0x84),
    (0x61, 0x19),
    (0x62, 0x0C),
    (0x63, 0x4B),
    (0x64, 0xCC),
    (0x70, 0xD0),
];

pub struct ChipState {
    pub registers: [u8; 128],
    pub fifo: [u8; 256],
    /// (address, value) of every byte written, FIFO included
    pub writes: Vec<(u8, u8)>,
    pub fail: bool,
    /// Image calibration never finishes
    pub image_cal_stuck: bool,
}

impl ChipState {
    fn new() -> Self {
        let mut registers = [0; 128];
        for &(address, value) in RESET_VALUES {
            registers[address as usize] = value;
        }
        Self {
            registers,
            fifo: [0; 256],
            writes: Vec::new(),
            fail: false,
            image_cal_stuck: false,
        }
    }

    fn read(&mut self, address: u8) -> u8 {
        if address == REG_FIFO {
            let ptr = self.registers[REG_FIFO_ADDR_PTR as usize];
            self.registers[REG_FIFO_ADDR_PTR as usize] = ptr.wrapping_add(1);
            self.fifo[ptr as usize]
        } else {
            self.registers[address as usize]
        }
    }

    fn write(&mut self, address: u8, value: u8) {
        self.writes.push((address, value));
        match address {
            REG_FIFO => {
                let ptr = self.registers[REG_FIFO_ADDR_PTR as usize];
                self.registers[REG_FIFO_ADDR_PTR as usize] = ptr.wrapping_add(1);
                self.fifo[ptr as usize] = value;
            }
            REG_IRQ_FLAGS => self.registers[address as usize] &= !value,
            REG_IMAGE_CAL => {
                let running = value & IMAGE_CAL_START != 0 && self.image_cal_stuck;
                let status = if running { IMAGE_CAL_RUNNING } else { 0 };
                self.registers[address as usize] =
                    (value & !(IMAGE_CAL_START | IMAGE_CAL_RUNNING)) | status;
            }
            REG_VERSION => {}
            _ => self.registers[address as usize] = value,
        }
    }
}

/// Cloneable handle: the driver owns one clone, the test inspects another.
#[derive(Clone)]
pub struct SimChip(pub Rc<RefCell<ChipState>>);

impl SimChip {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(ChipState::new())))
    }

    pub fn register(&self, address: u8) -> u8 {
        self.0.borrow().registers[address as usize]
    }

    pub fn set_register(&self, address: u8, value: u8) {
        self.0.borrow_mut().registers[address as usize] = value;
    }

    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.0.borrow().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.0.borrow_mut().writes.clear();
    }

    pub fn fifo_writes(&self) -> usize {
        self.0
            .borrow()
            .writes
            .iter()
            .filter(|(address, _)| *address == REG_FIFO)
            .count()
    }

    pub fn set_failing(&self, fail: bool) {
        self.0.borrow_mut().fail = fail;
    }

    pub fn set_image_cal_stuck(&self, stuck: bool) {
        self.0.borrow_mut().image_cal_stuck = stuck;
    }

    /// Values written to RegOpMode, oldest first.
    pub fn op_mode_writes(&self) -> Vec<u8> {
        self.writes()
            .into_iter()
            .filter(|(address, _)| *address == REG_OP_MODE)
            .map(|(_, value)| value)
            .collect()
    }

    pub fn raise(&self, flags: IrqFlags) {
        self.0.borrow_mut().registers[REG_IRQ_FLAGS as usize] |= flags.bits();
    }

    /// Stores `payload` as the modem does on reception and raises RxDone.
    pub fn receive(&self, payload: &[u8]) {
        let mut chip = self.0.borrow_mut();
        let base = chip.registers[REG_FIFO_RX_BASE as usize];
        for (i, byte) in payload.iter().enumerate() {
            chip.fifo[base.wrapping_add(i as u8) as usize] = *byte;
        }
        chip.registers[REG_FIFO_RX_CURRENT as usize] = base;
        chip.registers[REG_RX_NB_BYTES as usize] = payload.len() as u8;
        chip.registers[REG_IRQ_FLAGS as usize] |= IrqFlags::RX_DONE.bits();
    }
}

impl ErrorType for SimChip {
    type Error = ErrorKind;
}

impl SpiDevice for SimChip {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        let mut chip = self.0.borrow_mut();
        if chip.fail {
            return Err(ErrorKind::Other);
        }

        // (address, write) once the header byte has been seen
        let mut access: Option<(u8, bool)> = None;
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    for &byte in bytes.iter() {
                        match access {
                            None => access = Some((byte & 0x7F, byte & 0x80 != 0)),
                            Some((address, true)) => {
                                chip.write(address, byte);
                                if address != REG_FIFO {
                                    access = Some((address + 1, true));
                                }
                            }
                            Some((_, false)) => panic!("data written during a read access"),
                        }
                    }
                }
                Operation::Read(buf) => {
                    let Some((mut address, false)) = access else {
                        panic!("read without a read header");
                    };
                    for byte in buf.iter_mut() {
                        *byte = chip.read(address);
                        if address != REG_FIFO {
                            address += 1;
                        }
                    }
                    access = Some((address, false));
                }
                _ => panic!("unsupported SPI operation"),
            }
        }
        Ok(())
    }
}

/// Driver over a fresh simulated chip, plus a handle to inspect it.
pub fn radio() -> (Sx127x<SimChip>, SimChip) {
    let chip = SimChip::new();
    (Sx127x::new(chip.clone()), chip)
}
