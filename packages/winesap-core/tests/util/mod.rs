//! Shared harnesses for the integration tests.
//!
//! `TestBoard` wires the CPU's pins straight to a flat 64k so CPU-only
//! properties (cycle counts, flags, interrupt sequencing) run without the
//! rest of the machine. The machine helpers build a full `Apple2` with a
//! NOP-sled ROM whose vectors point where a test wants them.

#![allow(dead_code)]

use winesap_core::devices::apple2::Apple2;
use winesap_core::devices::cpu::{Cpu, Pins};
use winesap_core::error::ROM_LEN;

/// Where test programs load by default.
pub const ORIGIN: u16 = 0x8000;
/// Default NMI / IRQ handler addresses in the test ROM.
pub const NMI_HANDLER: u16 = 0x9000;
pub const IRQ_HANDLER: u16 = 0x9100;

/// The CPU wired to a bare 64k of memory.
pub struct TestBoard {
    pub cpu: Cpu,
    pub pins: Pins,
    pub mem: Vec<u8>,
}

impl TestBoard {
    /// Load a program at `origin`, point the reset vector at it, and run
    /// the reset sequence so the next step executes the first instruction.
    pub fn new(program: &[u8], origin: u16) -> TestBoard {
        let mut mem = vec![0u8; 0x10000];
        mem[origin as usize..origin as usize + program.len()].copy_from_slice(program);
        mem[0xFFFA] = (NMI_HANDLER & 0xFF) as u8;
        mem[0xFFFB] = (NMI_HANDLER >> 8) as u8;
        mem[0xFFFC] = (origin & 0xFF) as u8;
        mem[0xFFFD] = (origin >> 8) as u8;
        mem[0xFFFE] = (IRQ_HANDLER & 0xFF) as u8;
        mem[0xFFFF] = (IRQ_HANDLER >> 8) as u8;

        let mut board = TestBoard {
            cpu: Cpu::new(),
            pins: Pins::new(),
            mem,
        };
        board.reset();
        board
    }

    pub fn reset(&mut self) {
        self.pins.rst = true;
        for _ in 0..6 {
            self.cycle();
        }
        self.pins.rst = false;
        for _ in 0..16 {
            self.cycle();
            if self.cpu.at_instruction_boundary() {
                break;
            }
        }
    }

    /// One CPU cycle plus the bus access it asked for.
    pub fn cycle(&mut self) {
        self.cpu.clock(true, &mut self.pins);
        let addr = self.pins.addr as usize;
        if self.pins.we {
            self.mem[addr] = self.pins.dout;
        } else {
            self.pins.din = self.mem[addr];
        }
    }

    /// Run to the next instruction boundary; returns cycles consumed.
    pub fn step(&mut self) -> u32 {
        let start = self.cpu.total_cycles;
        loop {
            self.cycle();
            if self.cpu.at_instruction_boundary() || self.cpu.is_jammed() {
                break;
            }
        }
        (self.cpu.total_cycles - start) as u32
    }

    /// Step `n` instructions.
    pub fn step_n(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Run until the CPU jams, with a cycle budget; returns cycles run.
    pub fn run_to_jam(&mut self, max_cycles: u64) -> u64 {
        let start = self.cpu.total_cycles;
        while !self.cpu.is_jammed() {
            self.cycle();
            assert!(
                self.cpu.total_cycles - start < max_cycles,
                "program never jammed"
            );
        }
        self.cpu.total_cycles - start
    }
}

/// A NOP-sled test ROM with the reset vector pointed at `origin` and the
/// interrupt vectors at the usual test handlers.
pub fn test_rom(origin: u16) -> Vec<u8> {
    let mut rom = vec![0xEAu8; ROM_LEN];
    rom[0x2FFA] = (NMI_HANDLER & 0xFF) as u8;
    rom[0x2FFB] = (NMI_HANDLER >> 8) as u8;
    rom[0x2FFC] = (origin & 0xFF) as u8;
    rom[0x2FFD] = (origin >> 8) as u8;
    rom[0x2FFE] = (IRQ_HANDLER & 0xFF) as u8;
    rom[0x2FFF] = (IRQ_HANDLER >> 8) as u8;
    rom
}

/// A full machine with `program` in RAM at `origin` and reset already run.
pub fn machine_with_program(program: &[u8], origin: u16) -> Apple2 {
    let mut machine = Apple2::new();
    machine.load_ram(program, origin).unwrap();
    machine.load_rom(&test_rom(origin)).unwrap();
    machine.reset();
    machine
}

/// A valid 143,360-byte disk image with a deterministic fill.
pub fn test_disk_image() -> Vec<u8> {
    let mut dsk = vec![0u8; 143_360];
    for (i, b) in dsk.iter_mut().enumerate() {
        *b = ((i >> 3) ^ (i * 31)) as u8;
    }
    dsk
}
