//! The machine: a 6502 wired into 48k of RAM, 12k of ROM, the soft-switch
//! page, a Disk II in slot 6, the keyboard latch, and the video generator.
//!
//! The per-cycle ordering is fixed here and nowhere else: on each 1 MHz
//! cycle the video generator reads RAM on its half of the cycle, then the
//! CPU's pins are honored (read or write, including every soft-switch side
//! effect) before the CPU consumes the data on its next clock. No device
//! ever holds a reference to another; this struct owns them all.

use super::bus::{system_memory_map, BusDevice, Motherboard};
use super::cpu as cpu_module;
use super::cpu::{Cpu, Pins, Registers};
use super::disk::DiskController;
use super::keyboard::Keyboard;
use super::mem::{Ram, Rom};
use super::video::{hires_row_addr, text_cell_addr, SoftSwitches, VideoGen};
use crate::backend::Backend;
use crate::error::{Error, Result};

pub const RAM_SIZE: usize = 48 * 1024;

/// Master clock ticks per CPU cycle (14.318 MHz / ~1.02 MHz).
pub const TICKS_PER_CPU_CYCLE: u64 = 14;

/// CPU cycles per NTSC frame: 65 cycles x 262 lines.
pub const CYCLES_PER_FRAME: u64 = 17_030;

/// Rough paddle timer scale: cycles of $C06x high per position count.
const PADDLE_CYCLES_PER_COUNT: u64 = 11;

/// A struct representing the Apple II as a whole unit
pub struct Apple2 {
    cpu: Cpu,
    pins: Pins,
    /// The 48k of main RAM
    ram: Ram,
    /// The 12k system ROM at $D000
    rom: Rom,
    /// Peripheral ROMs, 256 bytes a slot ($C100-$C7FF); slot 0 unused
    slot_rom: [[u8; 256]; 8],
    disk: DiskController,
    keyboard: Keyboard,
    video: VideoGen,
    switches: SoftSwitches,

    speaker: bool,
    /// Cycle stamps of speaker toggles since the host last drained them
    speaker_clicks: Vec<u64>,
    /// Pushbutton bits, set by the host, read back at $C061-$C063
    gameport: u8,
    /// Paddle positions 0-255 for the four timers
    paddles: [u8; 4],
    paddle_strobe_cycle: u64,

    /// The last value seen on the data bus, for floating-bus reads
    last_bus_value: u8,
    /// Set on any write into the text page
    screen_dirty: bool,

    master_ticks: u64,
    cpu_cycles: u64,
}

impl Motherboard for Apple2 {
    fn read(&mut self, addr: u16) -> u8 {
        let (device, local) = system_memory_map::match_addr(addr);
        let res = match device {
            system_memory_map::Device::Ram => self.ram.read(local, self.last_bus_value),
            system_memory_map::Device::IoPage => self.io_read(local as u8),
            system_memory_map::Device::SlotRom => {
                let slot = ((local >> 8) + 1) as usize;
                self.slot_rom[slot & 0x07][(local & 0xFF) as usize]
            }
            system_memory_map::Device::Expansion => self.last_bus_value,
            system_memory_map::Device::Rom => self.rom.read(local, self.last_bus_value),
        };
        self.last_bus_value = res;
        res
    }

    fn peek(&self, addr: u16) -> Option<u8> {
        let (device, local) = system_memory_map::match_addr(addr);
        match device {
            system_memory_map::Device::Ram => self.ram.peek(local).to_optional(),
            // the I/O page is all side effects; nothing here peeks clean
            system_memory_map::Device::IoPage => None,
            system_memory_map::Device::SlotRom => {
                let slot = ((local >> 8) + 1) as usize;
                Some(self.slot_rom[slot & 0x07][(local & 0xFF) as usize])
            }
            system_memory_map::Device::Expansion => None,
            system_memory_map::Device::Rom => self.rom.peek(local).to_optional(),
        }
    }

    fn write(&mut self, addr: u16, data: u8) {
        let (device, local) = system_memory_map::match_addr(addr);
        match device {
            system_memory_map::Device::Ram => {
                self.ram.write(local, data);
                if (0x0400..0x0800).contains(&addr) {
                    self.screen_dirty = true;
                }
            }
            system_memory_map::Device::IoPage => self.io_write(local as u8, data),
            // writes to peripheral and system ROM fall off the bus
            system_memory_map::Device::SlotRom => {}
            system_memory_map::Device::Expansion => {}
            system_memory_map::Device::Rom => {}
        }
        self.last_bus_value = data;
    }
}

impl std::fmt::Debug for Apple2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Apple2").finish_non_exhaustive()
    }
}

impl Apple2 {
    pub fn new() -> Apple2 {
        Apple2 {
            cpu: Cpu::new(),
            pins: Pins::new(),
            ram: Ram::new(RAM_SIZE),
            rom: Rom::new_blank(),
            slot_rom: [[0u8; 256]; 8],
            disk: DiskController::new(),
            keyboard: Keyboard::new(),
            video: VideoGen::new(),
            switches: SoftSwitches::poweron(),
            speaker: false,
            speaker_clicks: Vec::new(),
            gameport: 0,
            paddles: [128; 4],
            paddle_strobe_cycle: 0,
            last_bus_value: 0,
            screen_dirty: false,
            master_ticks: 0,
            cpu_cycles: 0,
        }
    }

    /// Build a machine on the requested execution backend. Only the
    /// structural interpreter exists in this build.
    pub fn with_backend(backend: Backend) -> Result<Apple2> {
        if !backend.is_available() {
            return Err(Error::BackendUnavailable(backend));
        }
        Ok(Apple2::new())
    }

    // ── loading ──

    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<()> {
        self.rom = Rom::new_from_buf(bytes)?;
        Ok(())
    }

    pub fn load_ram(&mut self, bytes: &[u8], base: u16) -> Result<()> {
        self.ram.load(bytes, base)
    }

    pub fn load_disk(&mut self, bytes: &[u8], drive: usize) -> Result<()> {
        self.disk.load_disk(bytes, drive)
    }

    pub fn load_char_rom(&mut self, bytes: &[u8]) {
        self.video.load_char_rom(bytes);
    }

    /// Install a 256-byte peripheral ROM for a slot (1-7).
    pub fn load_slot_rom(&mut self, slot: usize, bytes: &[u8]) {
        if !(1..8).contains(&slot) || bytes.len() != 256 {
            return;
        }
        self.slot_rom[slot].copy_from_slice(bytes);
    }

    // ── clocking ──

    /// One master (14 MHz) tick. Returns the serial video bit.
    pub fn clock(&mut self) -> bool {
        let phase = self.master_ticks % TICKS_PER_CPU_CYCLE;
        if phase == 0 {
            // video half of the cycle: a read-only RAM fetch at the scan
            // address, never racing the CPU's half
            let addr = self.video.scan_address(&self.switches);
            let data = self.ram.peek(addr).unwrap(self.last_bus_value);
            self.video.begin_cell(data, &self.switches);
        }
        let bit = self.video.tick(&self.switches);
        if phase == 7 {
            // PHI0 high half: the CPU cycle and its bus access
            self.cpu_cycle();
        }
        self.master_ticks += 1;
        bit
    }

    /// One full 1 MHz cycle (14 master ticks).
    pub fn clock_cpu_cycle(&mut self) {
        for _ in 0..TICKS_PER_CPU_CYCLE {
            self.clock();
        }
    }

    fn cpu_cycle(&mut self) {
        self.cpu_cycles += 1;
        self.cpu.clock(true, &mut self.pins);
        let addr = self.pins.addr;
        if self.pins.we {
            let data = self.pins.dout;
            self.write(addr, data);
        } else {
            let data = self.read(addr);
            self.pins.din = data;
        }
    }

    /// Run one instruction and return a monitor-style trace line for it.
    ///
    /// This is for debugging and tests; it costs three peeks up front.
    pub fn dbg_step_cpu(&mut self) -> String {
        let pc = self.cpu.regs.pc;
        let bytes = [
            self.peek(pc).unwrap_or(0),
            self.peek(pc.wrapping_add(1)).unwrap_or(0),
            self.peek(pc.wrapping_add(2)).unwrap_or(0),
        ];
        let info = cpu_module::opcodes::decode(bytes[0]);
        let line = cpu_module::disasm::trace_line(
            &info,
            bytes,
            &self.cpu.regs,
            self.cpu.total_cycles,
        );
        self.step_instruction();
        line
    }

    /// Run the CPU to the next instruction boundary; returns the cycles
    /// consumed. A jammed CPU returns after one cycle.
    pub fn step_instruction(&mut self) -> u32 {
        let start = self.cpu.total_cycles;
        loop {
            self.clock_cpu_cycle();
            if self.cpu.at_instruction_boundary() || self.cpu.is_jammed() {
                break;
            }
        }
        (self.cpu.total_cycles - start) as u32
    }

    /// Run one NTSC frame's worth of CPU cycles.
    pub fn run_frame(&mut self) {
        let target = self.cpu_cycles + CYCLES_PER_FRAME;
        while self.cpu_cycles < target {
            self.clock_cpu_cycle();
        }
    }

    /// Trigger a hardware reset
    ///
    /// This is _not_ the same as power cycling: memory and the disk state
    /// are left alone, the CPU runs its reset sequence and takes the
    /// vector at $FFFC, and the video switches come back up in text mode.
    pub fn reset(&mut self) {
        self.switches = SoftSwitches::poweron();
        self.pins.rst = true;
        for _ in 0..6 {
            self.clock_cpu_cycle();
        }
        self.pins.rst = false;
        for _ in 0..16 {
            self.clock_cpu_cycle();
            if self.cpu.at_instruction_boundary() {
                break;
            }
        }
    }

    // ── the I/O page ──

    fn io_read(&mut self, offset: u8) -> u8 {
        match offset {
            // keyboard data with the strobe in bit 7
            0x00..=0x0F => self.keyboard.k(),
            // any access clears the strobe
            0x10..=0x1F => {
                self.keyboard.clear_strobe();
                self.keyboard.k()
            }
            // cassette output; not modeled
            0x20..=0x2F => 0,
            0x30..=0x3F => {
                self.toggle_speaker();
                0
            }
            // utility strobe
            0x40..=0x4F => 0,
            0x50..=0x5F => {
                self.switches.access(offset & 0x0F);
                0
            }
            0x60..=0x6F => self.gameport_read(offset),
            0x70..=0x7F => {
                // paddle trigger: restart the one-shot timers
                self.paddle_strobe_cycle = self.cpu_cycles;
                0
            }
            // slot device selects, bits 6..4 = slot
            0x80..=0xFF => {
                let slot = (offset >> 4) & 0x07;
                if slot == 6 {
                    self.disk.cumulative_cycles = self.cpu_cycles;
                    self.disk.access(offset & 0x0F)
                } else {
                    0
                }
            }
        }
    }

    fn io_write(&mut self, offset: u8, _data: u8) {
        match offset {
            // the keyboard latch is read-only; stores are harmless
            0x00..=0x0F => {}
            // every other group triggers on access, read or write
            _ => {
                self.io_read(offset);
            }
        }
    }

    fn toggle_speaker(&mut self) {
        self.speaker = !self.speaker;
        self.speaker_clicks.push(self.cpu_cycles);
    }

    fn gameport_read(&mut self, offset: u8) -> u8 {
        match offset {
            // cassette input
            0x60 => 0,
            // pushbuttons 0-2
            0x61..=0x63 => {
                let button = offset - 0x61;
                if self.gameport & (1 << button) != 0 {
                    0x80
                } else {
                    0
                }
            }
            // paddle timers: high until the one-shot runs down
            0x64..=0x67 => {
                let paddle = (offset - 0x64) as usize;
                let elapsed = self.cpu_cycles.saturating_sub(self.paddle_strobe_cycle);
                let limit = u64::from(self.paddles[paddle]) * PADDLE_CYCLES_PER_COUNT;
                if elapsed < limit {
                    0x80
                } else {
                    0
                }
            }
            _ => 0,
        }
    }

    // ── keyboard ──

    /// ISA-level key injection: latch an ASCII byte directly.
    pub fn inject_key(&mut self, ascii: u8) {
        self.keyboard.set_latch(ascii);
    }

    /// Frame-level key injection: shift a PS/2 frame through the decoder.
    pub fn inject_scancode(&mut self, scancode: u8) {
        self.keyboard.feed_frame(scancode);
    }

    pub fn set_buttons(&mut self, bits: u8) {
        self.gameport = bits;
    }

    pub fn set_paddle(&mut self, paddle: usize, pos: u8) {
        if paddle < 4 {
            self.paddles[paddle] = pos;
        }
    }

    // ── screen sampling ──

    /// The 24x40 character codes currently on the text page.
    pub fn read_screen(&self) -> [[u8; 40]; 24] {
        let page2 = self.switches.contains(SoftSwitches::PAGE2);
        let mut screen = [[0u8; 40]; 24];
        for (row, line) in screen.iter_mut().enumerate() {
            for (col, cell) in line.iter_mut().enumerate() {
                let addr = text_cell_addr(page2, row, col);
                *cell = self.ram.peek(addr).unwrap(0);
            }
        }
        screen
    }

    /// The text page as printable strings, one per row.
    pub fn read_text_screen(&self) -> Vec<String> {
        self.read_screen()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&code| {
                        let c = code & 0x3F;
                        let c = if c < 0x20 { c + 0x40 } else { c };
                        c as char
                    })
                    .collect()
            })
            .collect()
    }

    /// The 192x280 monochrome hi-res bitmap, one 0/1 byte per pixel.
    pub fn read_hires_bitmap(&self) -> Vec<[u8; 280]> {
        let page2 = self.switches.contains(SoftSwitches::PAGE2);
        let mut bitmap = Vec::with_capacity(192);
        for row in 0..192 {
            let base = hires_row_addr(page2, row);
            let mut line = [0u8; 280];
            for col in 0..40 {
                let byte = self.ram.peek(base + col as u16).unwrap(0);
                for bit in 0..7 {
                    line[col * 7 + bit] = (byte >> bit) & 0x01;
                }
            }
            bitmap.push(line);
        }
        bitmap
    }

    // ── state taps ──

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn regs(&self) -> &Registers {
        &self.cpu.regs
    }

    pub fn switches(&self) -> SoftSwitches {
        self.switches
    }

    pub fn speaker(&self) -> bool {
        self.speaker
    }

    /// Drain the speaker toggle timestamps collected so far.
    pub fn take_speaker_clicks(&mut self) -> Vec<u64> {
        std::mem::take(&mut self.speaker_clicks)
    }

    pub fn screen_dirty(&self) -> bool {
        self.screen_dirty
    }

    pub fn clear_screen_dirty(&mut self) {
        self.screen_dirty = false;
    }

    pub fn total_cycles(&self) -> u64 {
        self.cpu_cycles
    }

    pub fn disk_track(&self) -> u8 {
        self.disk.track()
    }

    // ── diagnostics ──

    pub fn illegal_opcode_count(&self) -> u64 {
        self.cpu.illegal_opcode_count()
    }

    pub fn disk_resync_count(&self) -> u64 {
        self.disk.resync_count()
    }

    pub fn dropped_frame_count(&self) -> u64 {
        self.keyboard.dropped_frame_count()
    }
}

impl Default for Apple2 {
    fn default() -> Self {
        Apple2::new()
    }
}
