//! Instruction formatting for traces and debuggers.
//!
//! One line per instruction in the classic monitor shape:
//!
//! ```text
//! 8000  A9 42     LDA #$42        A:00 X:00 Y:00 P:24 SP:FD CYC:12
//! ```

use std::fmt;

use super::opcodes::{AddrMode, Mnemonic, OpcodeInfo};
use super::structs::Registers;

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // debug names are already the mnemonics, just lowercase-ish
        let name = format!("{:?}", self).to_uppercase();
        f.write_str(&name)
    }
}

/// How many bytes an instruction with this addressing mode occupies.
pub fn instruction_len(mode: AddrMode) -> u16 {
    use AddrMode::*;
    match mode {
        Imp | Acc => 1,
        Imm | Zp | ZpX | ZpY | IndX | IndY | Rel => 2,
        Abs | AbsX | AbsY | Ind => 3,
    }
}

/// Format the operand field for a decoded instruction. `bytes` holds the
/// opcode and up to two operand bytes; `pc` is the instruction address
/// (used to resolve branch targets).
pub fn format_operand(info: &OpcodeInfo, bytes: [u8; 3], pc: u16) -> String {
    use AddrMode::*;
    let lo = bytes[1];
    let word = u16::from_le_bytes([bytes[1], bytes[2]]);
    match info.mode {
        Imp => String::new(),
        Acc => "A".to_string(),
        Imm => format!("#${:02X}", lo),
        Zp => format!("${:02X}", lo),
        ZpX => format!("${:02X},X", lo),
        ZpY => format!("${:02X},Y", lo),
        Abs => format!("${:04X}", word),
        AbsX => format!("${:04X},X", word),
        AbsY => format!("${:04X},Y", word),
        IndX => format!("(${:02X},X)", lo),
        IndY => format!("(${:02X}),Y", lo),
        Ind => format!("(${:04X})", word),
        Rel => {
            let target = pc.wrapping_add(2).wrapping_add(lo as i8 as u16);
            format!("${:04X}", target)
        }
    }
}

/// The raw-bytes column, padded to a fixed width.
fn format_bytes(info: &OpcodeInfo, bytes: [u8; 3]) -> String {
    match instruction_len(info.mode) {
        1 => format!("{:02X}      ", bytes[0]),
        2 => format!("{:02X} {:02X}   ", bytes[0], bytes[1]),
        _ => format!("{:02X} {:02X} {:02X}", bytes[0], bytes[1], bytes[2]),
    }
}

/// One full trace line: address, bytes, disassembly, register file.
pub fn trace_line(info: &OpcodeInfo, bytes: [u8; 3], regs: &Registers, cycles: u64) -> String {
    let mut text = format!("{} {}", info.mnemonic, format_operand(info, bytes, regs.pc));
    if info.illegal {
        text.push_str(" ;illegal");
    }
    format!(
        "{:04X}  {}  {:<14} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
        regs.pc,
        format_bytes(info, bytes),
        text,
        regs.a,
        regs.x,
        regs.y,
        regs.p.bits(),
        regs.s,
        cycles
    )
}
