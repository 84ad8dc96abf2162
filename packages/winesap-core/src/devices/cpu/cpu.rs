//! Cycle-stepped emulator for the MOS 6502
//!
//! Each call to [`Cpu::clock`] advances the core by exactly one cycle.
//! The core never reads or writes memory itself: it leaves an address
//! (and optionally a write) on the pins, and consumes whatever the bus
//! put in `din` on the next call. That keeps the memory system free to
//! interleave video fetches, soft-switch side effects and Disk II state
//! changes at the exact cycle they happen on the real machine.

use crate::bytes_to_addr;

use super::alu;
use super::opcodes::{build_table, AddrMode, Access, Mnemonic, OpcodeInfo};
use super::structs::{MicroState, Pins, Registers, Status, POWERON_REGISTERS};

const NMI_VECTOR: u16 = 0xFFFA;
const RESET_VECTOR: u16 = 0xFFFC;
const IRQ_VECTOR: u16 = 0xFFFE;

pub struct Cpu {
    pub regs: Registers,

    // ── pipeline state ──
    state: MicroState,
    opcode: u8,
    info: OpcodeInfo,
    /// The temporary data latch: operand bytes, address low bytes, branch
    /// offsets and RMW operands all pass through here
    t: u8,
    /// Zero-page pointer latch for the indirect modes
    ptr: u8,
    /// The address register: whatever is on the address pins this cycle.
    /// At `OpcodeFetch` this is always the address of the opcode byte.
    ar: u16,
    /// The carry-corrected effective address for indexed modes
    fix_addr: u16,
    page_crossed: bool,
    branch_target: u16,
    vector: u16,

    // ── write latches, copied to the pins at the end of each cycle ──
    we: bool,
    dout: u8,

    // ── interrupt plumbing ──
    /// Synchronized NMI level (true = asserted)
    nmi_level: bool,
    /// Edge memory: set on an NMI falling edge, cleared only when the
    /// NMI vector is taken
    nmi_pending: bool,
    irq_level: bool,
    so_level: bool,
    /// The resolved take-an-interrupt flag, sampled every cycle except
    /// `OpcodeFetch` and `BranchTaken`, consumed at the next fetch
    process_irq: bool,
    /// The current "instruction" is a hardware interrupt sequence: the
    /// padding-byte PC increment is suppressed and B pushes as 0
    in_interrupt: bool,
    /// The current sequence is the reset sequence: stack writes are
    /// suppressed (the pointer still decrements three times)
    in_reset: bool,
    reset_pending: bool,
    jammed: bool,

    /// The decode ROM, built once and never written again
    table: [OpcodeInfo; 256],

    // ── diagnostics ──
    pub total_cycles: u64,
    illegal_count: u64,
}

impl Cpu {
    pub fn new() -> Cpu {
        let table = build_table();
        Cpu {
            regs: POWERON_REGISTERS,
            state: MicroState::OpcodeFetch,
            opcode: 0xEA,
            info: table[0xEA],
            t: 0,
            ptr: 0,
            ar: 0,
            fix_addr: 0,
            page_crossed: false,
            branch_target: 0,
            vector: RESET_VECTOR,
            we: false,
            dout: 0,
            nmi_level: false,
            nmi_pending: false,
            irq_level: false,
            so_level: false,
            process_irq: false,
            in_interrupt: false,
            in_reset: false,
            reset_pending: false,
            jammed: false,
            table,
            total_cycles: 0,
            illegal_count: 0,
        }
    }

    /// Advance the core by one cycle. With `enable` low the core freezes
    /// in place, pins included.
    pub fn clock(&mut self, enable: bool, pins: &mut Pins) {
        if !enable {
            return;
        }
        self.total_cycles += 1;
        self.sync_inputs(pins);

        if pins.rst {
            // hold in place while reset is asserted; the sequence starts
            // when the line drops
            self.reset_pending = true;
            self.jammed = false;
            self.nmi_pending = false;
            self.process_irq = false;
            self.in_interrupt = false;
            self.in_reset = false;
            self.state = MicroState::OpcodeFetch;
            self.we = false;
            self.drive(pins);
            return;
        }
        if self.reset_pending {
            self.reset_pending = false;
            self.in_reset = true;
            self.in_interrupt = true;
            self.opcode = 0x00;
            self.info = self.table[0x00];
            self.state = MicroState::Cycle2;
        }
        if self.jammed {
            self.we = false;
            self.drive(pins);
            return;
        }

        let executed = self.state;
        self.step(pins.din);

        // Interrupts are not sampled during BranchTaken or OpcodeFetch
        // cycles; self-timing software can observe this window.
        if executed != MicroState::OpcodeFetch && executed != MicroState::BranchTaken {
            self.process_irq = self.nmi_pending
                || (self.irq_level && !self.regs.p.contains(Status::IRQ_DISABLE));
        }
        self.drive(pins);
    }

    fn sync_inputs(&mut self, pins: &Pins) {
        let nmi_now = !pins.nmi_n;
        if nmi_now && !self.nmi_level {
            self.nmi_pending = true;
        }
        self.nmi_level = nmi_now;

        self.irq_level = !pins.irq_n;

        // a falling edge on SO sets V immediately, no ALU involved
        let so_now = !pins.so_n;
        if so_now && !self.so_level {
            self.regs.p.insert(Status::OVERFLOW);
        }
        self.so_level = so_now;
    }

    fn drive(&self, pins: &mut Pins) {
        pins.addr = self.ar;
        pins.we = self.we;
        pins.dout = self.dout;
    }

    // ── debug taps ──

    pub fn state(&self) -> MicroState {
        self.state
    }

    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    pub fn is_jammed(&self) -> bool {
        self.jammed
    }

    /// True when the next clock will consume a fresh opcode
    pub fn at_instruction_boundary(&self) -> bool {
        self.state == MicroState::OpcodeFetch && !self.jammed && !self.reset_pending
    }

    pub fn illegal_opcode_count(&self) -> u64 {
        self.illegal_count
    }

    // ── the micro-sequencer ──

    fn step(&mut self, din: u8) {
        use MicroState::*;
        self.we = false;
        match self.state {
            OpcodeFetch => self.opcode_fetch(din),
            Cycle2 => self.cycle2(din),
            Cycle3 => self.cycle3(din),
            PreIndirect => {
                // dummy read at the un-indexed pointer while X is added
                self.ptr = self.t.wrapping_add(self.regs.x);
                self.ar = u16::from(self.ptr);
                self.state = Indirect;
            }
            Indirect => self.indirect(din),
            BranchTaken => self.branch_taken(),
            BranchPage => {
                self.regs.pc = self.branch_target;
                self.finish();
            }
            PreRead => {
                self.ar = self.fix_addr;
                self.state = Read;
            }
            Read => self.read(din),
            Read2 => {
                self.exec_operand(din);
                self.finish();
            }
            Rmw => {
                let result = self.rmw_compute(self.t);
                self.we = true;
                self.dout = result;
                self.state = Write;
            }
            PreWrite => {
                self.ar = self.fix_addr;
                self.we = true;
                self.dout = self.store_value();
                self.state = Write;
            }
            Write => self.finish(),
            Stack1 => self.stack1(din),
            Stack2 => self.stack2(din),
            Stack3 => self.stack3(din),
            Stack4 => self.stack4(din),
            Jump => self.jump(din),
        }
    }

    fn opcode_fetch(&mut self, din: u8) {
        if self.process_irq {
            // hijack the fetch: run a BRK sequence with the PC increment
            // suppressed and B pushed clear
            self.in_interrupt = true;
            self.opcode = 0x00;
            self.info = self.table[0x00];
            self.state = MicroState::Cycle2;
            return;
        }
        self.opcode = din;
        self.info = self.table[din as usize];
        if self.info.mnemonic == Mnemonic::Jam {
            self.jammed = true;
            self.illegal_count += 1;
            log::warn!("CPU jammed on ${:02X} at ${:04X}", din, self.regs.pc);
            return;
        }
        if self.info.illegal {
            self.illegal_count += 1;
            log::debug!(
                "illegal opcode ${:02X} at ${:04X}, running as NOP",
                din,
                self.regs.pc
            );
        }
        self.regs.pc = self.regs.pc.wrapping_add(1);
        self.ar = self.regs.pc;
        self.state = MicroState::Cycle2;
    }

    fn cycle2(&mut self, din: u8) {
        use AddrMode::*;
        use MicroState::*;
        use Mnemonic::*;

        // the control-flow instructions own their own sequences
        match self.info.mnemonic {
            Brk => {
                if !self.in_interrupt {
                    // BRK skips a padding byte; the pushed PC points past it
                    self.regs.pc = self.regs.pc.wrapping_add(1);
                }
                let pch = (self.regs.pc >> 8) as u8;
                self.push(pch);
                self.state = Stack1;
                return;
            }
            Pha => {
                let a = self.regs.a;
                self.push(a);
                self.state = Stack1;
                return;
            }
            Php => {
                // PHP pushes with B set, like BRK
                let p = (self.regs.p | Status::UNUSED | Status::BREAK).bits();
                self.push(p);
                self.state = Stack1;
                return;
            }
            Pla | Plp | Rts | Rti => {
                self.ar = self.stack_addr();
                self.state = Stack1;
                return;
            }
            Jsr => {
                self.t = din;
                self.regs.pc = self.regs.pc.wrapping_add(1);
                // internal cycle touching the stack before the pushes
                self.ar = self.stack_addr();
                self.state = Stack1;
                return;
            }
            _ => {}
        }

        match self.info.mode {
            Imp => {
                self.exec_implied();
                self.finish();
            }
            Acc => {
                self.exec_accumulator();
                self.finish();
            }
            Imm => {
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.exec_operand(din);
                self.finish();
            }
            Rel => {
                self.t = din;
                self.regs.pc = self.regs.pc.wrapping_add(1);
                if self.branch_condition() {
                    // dummy read of the next opcode while the target adds up
                    self.ar = self.regs.pc;
                    self.state = BranchTaken;
                } else {
                    self.finish();
                }
            }
            Zp => {
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.begin_access(u16::from(din));
            }
            ZpX | ZpY => {
                self.t = din;
                self.regs.pc = self.regs.pc.wrapping_add(1);
                // dummy read at the un-indexed address
                self.ar = u16::from(din);
                self.state = Cycle3;
            }
            Abs | AbsX | AbsY | Ind => {
                self.t = din;
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.ar = self.regs.pc;
                self.state = Cycle3;
            }
            IndX => {
                self.t = din;
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.ar = u16::from(din);
                self.state = PreIndirect;
            }
            IndY => {
                self.ptr = din;
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.ar = u16::from(din);
                self.state = Indirect;
            }
        }
    }

    fn cycle3(&mut self, din: u8) {
        use AddrMode::*;
        match self.info.mode {
            ZpX => {
                let ea = u16::from(self.t.wrapping_add(self.regs.x));
                self.begin_access(ea);
            }
            ZpY => {
                let ea = u16::from(self.t.wrapping_add(self.regs.y));
                self.begin_access(ea);
            }
            Abs => {
                self.regs.pc = self.regs.pc.wrapping_add(1);
                let ea = bytes_to_addr!(self.t, din);
                if self.info.mnemonic == Mnemonic::Jmp {
                    self.regs.pc = ea;
                    self.finish();
                } else {
                    self.begin_access(ea);
                }
            }
            AbsX => {
                self.regs.pc = self.regs.pc.wrapping_add(1);
                let x = self.regs.x;
                self.begin_indexed(din, x);
            }
            AbsY => {
                self.regs.pc = self.regs.pc.wrapping_add(1);
                let y = self.regs.y;
                self.begin_indexed(din, y);
            }
            Ind => {
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.fix_addr = bytes_to_addr!(self.t, din);
                self.ar = self.fix_addr;
                self.state = MicroState::Indirect;
            }
            IndX => {
                // din is the high byte of the pointer target
                let ea = bytes_to_addr!(self.t, din);
                self.begin_access(ea);
            }
            IndY => {
                let y = self.regs.y;
                self.begin_indexed(din, y);
            }
            _ => unreachable!("Cycle3 for mode {:?}", self.info.mode),
        }
    }

    fn indirect(&mut self, din: u8) {
        if self.info.mode == AddrMode::Ind {
            // JMP (ind): the high byte comes from the same page as the
            // low byte, even at $xxFF. The bug ships.
            self.t = din;
            let ptr = self.fix_addr;
            self.ar = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF);
            self.state = MicroState::Jump;
        } else {
            // (zp,X) / (zp),Y: low byte of the target, pointer wraps in
            // the zero page
            self.t = din;
            self.ptr = self.ptr.wrapping_add(1);
            self.ar = u16::from(self.ptr);
            self.state = MicroState::Cycle3;
        }
    }

    /// Route a resolved, un-indexed effective address into the right
    /// access sequence.
    fn begin_access(&mut self, ea: u16) {
        self.page_crossed = false;
        match self.info.access {
            Access::Read | Access::Rmw => {
                self.ar = ea;
                self.state = MicroState::Read;
            }
            Access::Write => {
                self.ar = ea;
                self.we = true;
                self.dout = self.store_value();
                self.state = MicroState::Write;
            }
            Access::None => unreachable!("no access class for {:?}", self.info.mnemonic),
        }
    }

    /// Route an indexed effective address. The address presented first is
    /// always the one with the uncorrected high byte, as on the silicon;
    /// whether the corrected cycle is paid depends on the access class.
    fn begin_indexed(&mut self, hi: u8, index: u8) {
        let base = bytes_to_addr!(self.t, hi);
        let sum = u16::from(self.t) + u16::from(index);
        let crossed = sum > 0xFF;
        let wrong = (u16::from(hi) << 8) | (sum & 0x00FF);
        let ea = base.wrapping_add(u16::from(index));
        self.fix_addr = ea;
        self.ar = wrong;
        match self.info.access {
            Access::Read => {
                self.page_crossed = crossed;
                self.state = MicroState::Read;
            }
            Access::Write => self.state = MicroState::PreWrite,
            Access::Rmw => self.state = MicroState::PreRead,
            Access::None => unreachable!(),
        }
    }

    fn read(&mut self, din: u8) {
        match self.info.access {
            Access::Read => {
                if self.page_crossed {
                    // the first read went to the wrong page; pay the
                    // correction cycle and read again
                    self.page_crossed = false;
                    self.ar = self.fix_addr;
                    self.state = MicroState::Read2;
                } else {
                    self.exec_operand(din);
                    self.finish();
                }
            }
            Access::Rmw => {
                self.t = din;
                // the NMOS part writes the unmodified byte back while the
                // ALU works on it
                self.we = true;
                self.dout = din;
                self.state = MicroState::Rmw;
            }
            _ => unreachable!("Read state for {:?}", self.info.access),
        }
    }

    fn branch_taken(&mut self) {
        let offset = self.t as i8;
        let target = self.regs.pc.wrapping_add(offset as u16);
        if target & 0xFF00 == self.regs.pc & 0xFF00 {
            self.regs.pc = target;
            self.finish();
        } else {
            // the 6502 fixes the high byte one cycle late; present the
            // wrong-page address while it does
            self.branch_target = target;
            self.regs.pc = (self.regs.pc & 0xFF00) | (target & 0x00FF);
            self.ar = self.regs.pc;
            self.state = MicroState::BranchPage;
        }
    }

    fn stack1(&mut self, din: u8) {
        use Mnemonic::*;
        match self.info.mnemonic {
            Pha | Php => self.finish(),
            Pla | Plp | Rts | Rti => {
                self.regs.s = self.regs.s.wrapping_add(1);
                self.ar = self.stack_addr();
                self.state = MicroState::Stack2;
            }
            Jsr => {
                let pch = (self.regs.pc >> 8) as u8;
                self.push(pch);
                self.state = MicroState::Stack2;
            }
            Brk => {
                let pcl = (self.regs.pc & 0xFF) as u8;
                self.push(pcl);
                self.state = MicroState::Stack2;
            }
            _ => unreachable!("Stack1 for {:?} (din={:02X})", self.info.mnemonic, din),
        }
    }

    fn stack2(&mut self, din: u8) {
        use Mnemonic::*;
        match self.info.mnemonic {
            Pla => {
                self.regs.a = din;
                let a = self.regs.a;
                alu::set_zn(&mut self.regs.p, a);
                self.finish();
            }
            Plp => {
                self.set_p_from(din);
                self.finish();
            }
            Rts => {
                self.t = din;
                self.regs.s = self.regs.s.wrapping_add(1);
                self.ar = self.stack_addr();
                self.state = MicroState::Stack3;
            }
            Rti => {
                self.set_p_from(din);
                self.regs.s = self.regs.s.wrapping_add(1);
                self.ar = self.stack_addr();
                self.state = MicroState::Stack3;
            }
            Jsr => {
                let pcl = (self.regs.pc & 0xFF) as u8;
                self.push(pcl);
                self.state = MicroState::Stack3;
            }
            Brk => {
                // the vector is decided on the P-push cycle, which is how
                // a late NMI can hijack a BRK
                self.vector = if self.in_reset {
                    RESET_VECTOR
                } else if self.nmi_pending {
                    NMI_VECTOR
                } else {
                    IRQ_VECTOR
                };
                let b = if self.in_interrupt {
                    Status::empty()
                } else {
                    Status::BREAK
                };
                let p = (self.regs.p | Status::UNUSED | b).bits();
                self.push(p);
                self.state = MicroState::Stack3;
            }
            _ => unreachable!("Stack2 for {:?}", self.info.mnemonic),
        }
    }

    fn stack3(&mut self, din: u8) {
        use Mnemonic::*;
        match self.info.mnemonic {
            Rts => {
                self.regs.pc = bytes_to_addr!(self.t, din);
                self.ar = self.regs.pc;
                self.state = MicroState::Jump;
            }
            Rti => {
                self.t = din;
                self.regs.s = self.regs.s.wrapping_add(1);
                self.ar = self.stack_addr();
                self.state = MicroState::Stack4;
            }
            Jsr => {
                // read the high byte of the target
                self.ar = self.regs.pc;
                self.state = MicroState::Jump;
            }
            Brk => {
                self.ar = self.vector;
                self.state = MicroState::Stack4;
            }
            _ => unreachable!("Stack3 for {:?}", self.info.mnemonic),
        }
    }

    fn stack4(&mut self, din: u8) {
        use Mnemonic::*;
        match self.info.mnemonic {
            Rti => {
                self.regs.pc = bytes_to_addr!(self.t, din);
                self.finish();
            }
            Brk => {
                self.t = din;
                if !self.in_reset && self.vector == NMI_VECTOR {
                    // the edge memory clears only here, when the vector
                    // is actually taken
                    self.nmi_pending = false;
                }
                self.regs.p.insert(Status::IRQ_DISABLE);
                if self.in_reset {
                    self.regs.p.remove(Status::DECIMAL);
                }
                self.ar = self.vector.wrapping_add(1);
                self.state = MicroState::Jump;
            }
            _ => unreachable!("Stack4 for {:?}", self.info.mnemonic),
        }
    }

    fn jump(&mut self, din: u8) {
        use Mnemonic::*;
        match self.info.mnemonic {
            Jmp | Jsr => {
                self.regs.pc = bytes_to_addr!(self.t, din);
                self.finish();
            }
            Rts => {
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.finish();
            }
            Brk => {
                self.regs.pc = bytes_to_addr!(self.t, din);
                self.in_interrupt = false;
                self.in_reset = false;
                self.finish();
            }
            _ => unreachable!("Jump for {:?}", self.info.mnemonic),
        }
    }

    /// Last cycle of every instruction: present the next opcode address.
    fn finish(&mut self) {
        self.ar = self.regs.pc;
        self.state = MicroState::OpcodeFetch;
    }

    fn stack_addr(&self) -> u16 {
        0x0100 | u16::from(self.regs.s)
    }

    /// Present a stack push: write (unless resetting) at $0100+S, then
    /// decrement S. The reset sequence keeps the decrements.
    fn push(&mut self, val: u8) {
        self.ar = self.stack_addr();
        if !self.in_reset {
            self.we = true;
            self.dout = val;
        }
        self.regs.s = self.regs.s.wrapping_sub(1);
    }

    /// Stack pulls ignore bit 4 and force bit 5
    fn set_p_from(&mut self, bits: u8) {
        self.regs.p =
            (Status::from_bits_truncate(bits) - Status::BREAK) | Status::UNUSED;
    }

    fn branch_condition(&self) -> bool {
        use Mnemonic::*;
        let p = self.regs.p;
        match self.info.mnemonic {
            Bpl => !p.contains(Status::NEGATIVE),
            Bmi => p.contains(Status::NEGATIVE),
            Bvc => !p.contains(Status::OVERFLOW),
            Bvs => p.contains(Status::OVERFLOW),
            Bcc => !p.contains(Status::CARRY),
            Bcs => p.contains(Status::CARRY),
            Bne => !p.contains(Status::ZERO),
            Beq => p.contains(Status::ZERO),
            _ => unreachable!("branch condition for {:?}", self.info.mnemonic),
        }
    }

    fn exec_implied(&mut self) {
        use Mnemonic::*;
        match self.info.mnemonic {
            Clc => self.regs.p.remove(Status::CARRY),
            Sec => self.regs.p.insert(Status::CARRY),
            Cli => self.regs.p.remove(Status::IRQ_DISABLE),
            Sei => self.regs.p.insert(Status::IRQ_DISABLE),
            Clv => self.regs.p.remove(Status::OVERFLOW),
            Cld => self.regs.p.remove(Status::DECIMAL),
            Sed => self.regs.p.insert(Status::DECIMAL),
            Tax => {
                self.regs.x = self.regs.a;
                alu::set_zn(&mut self.regs.p, self.regs.x);
            }
            Txa => {
                self.regs.a = self.regs.x;
                alu::set_zn(&mut self.regs.p, self.regs.a);
            }
            Tay => {
                self.regs.y = self.regs.a;
                alu::set_zn(&mut self.regs.p, self.regs.y);
            }
            Tya => {
                self.regs.a = self.regs.y;
                alu::set_zn(&mut self.regs.p, self.regs.a);
            }
            Tsx => {
                self.regs.x = self.regs.s;
                alu::set_zn(&mut self.regs.p, self.regs.x);
            }
            Txs => self.regs.s = self.regs.x, // no flags
            Inx => self.regs.x = alu::inc(self.regs.x, &mut self.regs.p),
            Dex => self.regs.x = alu::dec(self.regs.x, &mut self.regs.p),
            Iny => self.regs.y = alu::inc(self.regs.y, &mut self.regs.p),
            Dey => self.regs.y = alu::dec(self.regs.y, &mut self.regs.p),
            Nop => {}
            other => unreachable!("implied exec for {:?}", other),
        }
    }

    fn exec_accumulator(&mut self) {
        use Mnemonic::*;
        let a = self.regs.a;
        self.regs.a = match self.info.mnemonic {
            Asl => alu::asl(a, &mut self.regs.p),
            Lsr => alu::lsr(a, &mut self.regs.p),
            Rol => alu::rol(a, &mut self.regs.p),
            Ror => alu::ror(a, &mut self.regs.p),
            other => unreachable!("accumulator exec for {:?}", other),
        };
    }

    fn exec_operand(&mut self, operand: u8) {
        use Mnemonic::*;
        match self.info.mnemonic {
            Lda => {
                self.regs.a = operand;
                alu::set_zn(&mut self.regs.p, operand);
            }
            Ldx => {
                self.regs.x = operand;
                alu::set_zn(&mut self.regs.p, operand);
            }
            Ldy => {
                self.regs.y = operand;
                alu::set_zn(&mut self.regs.p, operand);
            }
            Adc => self.regs.a = alu::adc(self.regs.a, operand, &mut self.regs.p),
            Sbc => self.regs.a = alu::sbc(self.regs.a, operand, &mut self.regs.p),
            And => self.regs.a = alu::and(self.regs.a, operand, &mut self.regs.p),
            Ora => self.regs.a = alu::ora(self.regs.a, operand, &mut self.regs.p),
            Eor => self.regs.a = alu::eor(self.regs.a, operand, &mut self.regs.p),
            Cmp => alu::cmp(self.regs.a, operand, &mut self.regs.p),
            Cpx => alu::cmp(self.regs.x, operand, &mut self.regs.p),
            Cpy => alu::cmp(self.regs.y, operand, &mut self.regs.p),
            Bit => alu::bit(self.regs.a, operand, &mut self.regs.p),
            Nop => {} // the multi-byte NOPs read and discard
            other => unreachable!("operand exec for {:?}", other),
        }
    }

    fn rmw_compute(&mut self, val: u8) -> u8 {
        use Mnemonic::*;
        match self.info.mnemonic {
            Asl => alu::asl(val, &mut self.regs.p),
            Lsr => alu::lsr(val, &mut self.regs.p),
            Rol => alu::rol(val, &mut self.regs.p),
            Ror => alu::ror(val, &mut self.regs.p),
            Inc => alu::inc(val, &mut self.regs.p),
            Dec => alu::dec(val, &mut self.regs.p),
            other => unreachable!("rmw exec for {:?}", other),
        }
    }

    fn store_value(&self) -> u8 {
        use Mnemonic::*;
        match self.info.mnemonic {
            Sta => self.regs.a,
            Stx => self.regs.x,
            Sty => self.regs.y,
            other => unreachable!("store value for {:?}", other),
        }
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Cpu::new()
    }
}
