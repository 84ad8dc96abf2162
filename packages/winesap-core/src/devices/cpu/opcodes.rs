//! The decode ROM: one record per opcode, materialized eagerly as an
//! immutable 256-entry table when the CPU is built.
//!
//! Undocumented opcodes decode to NOP with the addressing mode their bit
//! pattern implies, so instruction lengths stay right even when a program
//! wanders into them. The twelve halt opcodes ($02, $12, ...) decode to
//! JAM and freeze the core until reset.

/// The addressing mode for the CPU
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum AddrMode {
    /// Implicit (operand is a register or nothing at all)
    Imp,
    /// Use the Accumulator
    Acc,
    /// Don't fetch anything and use the operand as data
    Imm,
    /// Zero-Page
    Zp,
    /// Zero-Page Indexed, X register
    ZpX,
    /// Zero-Page Indexed, Y register
    ZpY,
    /// The 16-bit address is included in the operand
    Abs,
    /// Absolute Indexed, plus X register
    AbsX,
    /// Absolute Indexed, plus Y register
    AbsY,
    /// Indexed Indirect (d,x)
    IndX,
    /// Indirect Indexed (d),y
    IndY,
    /// Addressing mode specific to JMP, with the page-wrap bug
    Ind,
    /// Branch to a relative label
    Rel,
}

/// What an instruction does with its effective address, which decides
/// the shape of its micro-sequence.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Access {
    /// No memory operand (implied, accumulator, relative, control flow)
    None,
    /// Reads the operand once; indexed forms pay the page-cross cycle
    Read,
    /// Stores a register; indexed forms always pay the fix-up cycle
    Write,
    /// Read, modify, write; always read/dummy-write/write
    Rmw,
}

/// The CPU opcode mnemonic
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
#[rustfmt::skip]
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
    /// A halt opcode; the sequencer never leaves it
    Jam,
}

/// One entry of the decode ROM.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct OpcodeInfo {
    pub mnemonic: Mnemonic,
    pub mode: AddrMode,
    pub access: Access,
    pub illegal: bool,
}

const fn entry(mnemonic: Mnemonic, mode: AddrMode) -> OpcodeInfo {
    OpcodeInfo {
        mnemonic,
        mode,
        access: access_of(mnemonic, mode),
        illegal: false,
    }
}

/// An undocumented opcode: NOP through the given mode so the length (and
/// the dummy reads) line up with what the bit pattern implies.
const fn illegal(mode: AddrMode) -> OpcodeInfo {
    OpcodeInfo {
        mnemonic: Mnemonic::Nop,
        mode,
        access: access_of(Mnemonic::Nop, mode),
        illegal: true,
    }
}

const fn access_of(mnemonic: Mnemonic, mode: AddrMode) -> Access {
    use AddrMode::*;
    use Mnemonic::*;
    match mode {
        Imp | Acc | Rel | Imm | Ind => Access::None,
        _ => match mnemonic {
            Sta | Stx | Sty => Access::Write,
            Asl | Lsr | Rol | Ror | Inc | Dec => Access::Rmw,
            Jmp | Jsr => Access::None,
            _ => Access::Read,
        },
    }
}

/// Decode a single opcode byte.
#[rustfmt::skip]
pub fn decode(opcode: u8) -> OpcodeInfo {
    use AddrMode::*;
    use Mnemonic::*;
    match opcode {
        0x00 => entry(Brk, Imp),
        0x01 => entry(Ora, IndX),
        0x02 => entry(Jam, Imp),
        0x03 => illegal(IndX),      // SLO (zp,X)
        0x04 => illegal(Zp),        // NOP zp
        0x05 => entry(Ora, Zp),
        0x06 => entry(Asl, Zp),
        0x07 => illegal(Zp),        // SLO zp
        0x08 => entry(Php, Imp),
        0x09 => entry(Ora, Imm),
        0x0A => entry(Asl, Acc),
        0x0B => illegal(Imm),       // ANC #imm
        0x0C => illegal(Abs),       // NOP abs
        0x0D => entry(Ora, Abs),
        0x0E => entry(Asl, Abs),
        0x0F => illegal(Abs),       // SLO abs

        0x10 => entry(Bpl, Rel),
        0x11 => entry(Ora, IndY),
        0x12 => entry(Jam, Imp),
        0x13 => illegal(IndY),      // SLO (zp),Y
        0x14 => illegal(ZpX),       // NOP zp,X
        0x15 => entry(Ora, ZpX),
        0x16 => entry(Asl, ZpX),
        0x17 => illegal(ZpX),       // SLO zp,X
        0x18 => entry(Clc, Imp),
        0x19 => entry(Ora, AbsY),
        0x1A => illegal(Imp),       // NOP
        0x1B => illegal(AbsY),      // SLO abs,Y
        0x1C => illegal(AbsX),      // NOP abs,X
        0x1D => entry(Ora, AbsX),
        0x1E => entry(Asl, AbsX),
        0x1F => illegal(AbsX),      // SLO abs,X

        0x20 => entry(Jsr, Abs),
        0x21 => entry(And, IndX),
        0x22 => entry(Jam, Imp),
        0x23 => illegal(IndX),      // RLA (zp,X)
        0x24 => entry(Bit, Zp),
        0x25 => entry(And, Zp),
        0x26 => entry(Rol, Zp),
        0x27 => illegal(Zp),        // RLA zp
        0x28 => entry(Plp, Imp),
        0x29 => entry(And, Imm),
        0x2A => entry(Rol, Acc),
        0x2B => illegal(Imm),       // ANC #imm
        0x2C => entry(Bit, Abs),
        0x2D => entry(And, Abs),
        0x2E => entry(Rol, Abs),
        0x2F => illegal(Abs),       // RLA abs

        0x30 => entry(Bmi, Rel),
        0x31 => entry(And, IndY),
        0x32 => entry(Jam, Imp),
        0x33 => illegal(IndY),      // RLA (zp),Y
        0x34 => illegal(ZpX),       // NOP zp,X
        0x35 => entry(And, ZpX),
        0x36 => entry(Rol, ZpX),
        0x37 => illegal(ZpX),       // RLA zp,X
        0x38 => entry(Sec, Imp),
        0x39 => entry(And, AbsY),
        0x3A => illegal(Imp),       // NOP
        0x3B => illegal(AbsY),      // RLA abs,Y
        0x3C => illegal(AbsX),      // NOP abs,X
        0x3D => entry(And, AbsX),
        0x3E => entry(Rol, AbsX),
        0x3F => illegal(AbsX),      // RLA abs,X

        0x40 => entry(Rti, Imp),
        0x41 => entry(Eor, IndX),
        0x42 => entry(Jam, Imp),
        0x43 => illegal(IndX),      // SRE (zp,X)
        0x44 => illegal(Zp),        // NOP zp
        0x45 => entry(Eor, Zp),
        0x46 => entry(Lsr, Zp),
        0x47 => illegal(Zp),        // SRE zp
        0x48 => entry(Pha, Imp),
        0x49 => entry(Eor, Imm),
        0x4A => entry(Lsr, Acc),
        0x4B => illegal(Imm),       // ALR #imm
        0x4C => entry(Jmp, Abs),
        0x4D => entry(Eor, Abs),
        0x4E => entry(Lsr, Abs),
        0x4F => illegal(Abs),       // SRE abs

        0x50 => entry(Bvc, Rel),
        0x51 => entry(Eor, IndY),
        0x52 => entry(Jam, Imp),
        0x53 => illegal(IndY),      // SRE (zp),Y
        0x54 => illegal(ZpX),       // NOP zp,X
        0x55 => entry(Eor, ZpX),
        0x56 => entry(Lsr, ZpX),
        0x57 => illegal(ZpX),       // SRE zp,X
        0x58 => entry(Cli, Imp),
        0x59 => entry(Eor, AbsY),
        0x5A => illegal(Imp),       // NOP
        0x5B => illegal(AbsY),      // SRE abs,Y
        0x5C => illegal(AbsX),      // NOP abs,X
        0x5D => entry(Eor, AbsX),
        0x5E => entry(Lsr, AbsX),
        0x5F => illegal(AbsX),      // SRE abs,X

        0x60 => entry(Rts, Imp),
        0x61 => entry(Adc, IndX),
        0x62 => entry(Jam, Imp),
        0x63 => illegal(IndX),      // RRA (zp,X)
        0x64 => illegal(Zp),        // NOP zp
        0x65 => entry(Adc, Zp),
        0x66 => entry(Ror, Zp),
        0x67 => illegal(Zp),        // RRA zp
        0x68 => entry(Pla, Imp),
        0x69 => entry(Adc, Imm),
        0x6A => entry(Ror, Acc),
        0x6B => illegal(Imm),       // ARR #imm
        0x6C => entry(Jmp, Ind),
        0x6D => entry(Adc, Abs),
        0x6E => entry(Ror, Abs),
        0x6F => illegal(Abs),       // RRA abs

        0x70 => entry(Bvs, Rel),
        0x71 => entry(Adc, IndY),
        0x72 => entry(Jam, Imp),
        0x73 => illegal(IndY),      // RRA (zp),Y
        0x74 => illegal(ZpX),       // NOP zp,X
        0x75 => entry(Adc, ZpX),
        0x76 => entry(Ror, ZpX),
        0x77 => illegal(ZpX),       // RRA zp,X
        0x78 => entry(Sei, Imp),
        0x79 => entry(Adc, AbsY),
        0x7A => illegal(Imp),       // NOP
        0x7B => illegal(AbsY),      // RRA abs,Y
        0x7C => illegal(AbsX),      // NOP abs,X
        0x7D => entry(Adc, AbsX),
        0x7E => entry(Ror, AbsX),
        0x7F => illegal(AbsX),      // RRA abs,X

        0x80 => illegal(Imm),       // NOP #imm
        0x81 => entry(Sta, IndX),
        0x82 => illegal(Imm),       // NOP #imm
        0x83 => illegal(IndX),      // SAX (zp,X)
        0x84 => entry(Sty, Zp),
        0x85 => entry(Sta, Zp),
        0x86 => entry(Stx, Zp),
        0x87 => illegal(Zp),        // SAX zp
        0x88 => entry(Dey, Imp),
        0x89 => illegal(Imm),       // NOP #imm
        0x8A => entry(Txa, Imp),
        0x8B => illegal(Imm),       // XAA #imm
        0x8C => entry(Sty, Abs),
        0x8D => entry(Sta, Abs),
        0x8E => entry(Stx, Abs),
        0x8F => illegal(Abs),       // SAX abs

        0x90 => entry(Bcc, Rel),
        0x91 => entry(Sta, IndY),
        0x92 => entry(Jam, Imp),
        0x93 => illegal(IndY),      // SHA (zp),Y
        0x94 => entry(Sty, ZpX),
        0x95 => entry(Sta, ZpX),
        0x96 => entry(Stx, ZpY),
        0x97 => illegal(ZpY),       // SAX zp,Y
        0x98 => entry(Tya, Imp),
        0x99 => entry(Sta, AbsY),
        0x9A => entry(Txs, Imp),
        0x9B => illegal(AbsY),      // TAS abs,Y
        0x9C => illegal(AbsX),      // SHY abs,X
        0x9D => entry(Sta, AbsX),
        0x9E => illegal(AbsY),      // SHX abs,Y
        0x9F => illegal(AbsY),      // SHA abs,Y

        0xA0 => entry(Ldy, Imm),
        0xA1 => entry(Lda, IndX),
        0xA2 => entry(Ldx, Imm),
        0xA3 => illegal(IndX),      // LAX (zp,X)
        0xA4 => entry(Ldy, Zp),
        0xA5 => entry(Lda, Zp),
        0xA6 => entry(Ldx, Zp),
        0xA7 => illegal(Zp),        // LAX zp
        0xA8 => entry(Tay, Imp),
        0xA9 => entry(Lda, Imm),
        0xAA => entry(Tax, Imp),
        0xAB => illegal(Imm),       // LAX #imm
        0xAC => entry(Ldy, Abs),
        0xAD => entry(Lda, Abs),
        0xAE => entry(Ldx, Abs),
        0xAF => illegal(Abs),       // LAX abs

        0xB0 => entry(Bcs, Rel),
        0xB1 => entry(Lda, IndY),
        0xB2 => entry(Jam, Imp),
        0xB3 => illegal(IndY),      // LAX (zp),Y
        0xB4 => entry(Ldy, ZpX),
        0xB5 => entry(Lda, ZpX),
        0xB6 => entry(Ldx, ZpY),
        0xB7 => illegal(ZpY),       // LAX zp,Y
        0xB8 => entry(Clv, Imp),
        0xB9 => entry(Lda, AbsY),
        0xBA => entry(Tsx, Imp),
        0xBB => illegal(AbsY),      // LAS abs,Y
        0xBC => entry(Ldy, AbsX),
        0xBD => entry(Lda, AbsX),
        0xBE => entry(Ldx, AbsY),
        0xBF => illegal(AbsY),      // LAX abs,Y

        0xC0 => entry(Cpy, Imm),
        0xC1 => entry(Cmp, IndX),
        0xC2 => illegal(Imm),       // NOP #imm
        0xC3 => illegal(IndX),      // DCP (zp,X)
        0xC4 => entry(Cpy, Zp),
        0xC5 => entry(Cmp, Zp),
        0xC6 => entry(Dec, Zp),
        0xC7 => illegal(Zp),        // DCP zp
        0xC8 => entry(Iny, Imp),
        0xC9 => entry(Cmp, Imm),
        0xCA => entry(Dex, Imp),
        0xCB => illegal(Imm),       // AXS #imm
        0xCC => entry(Cpy, Abs),
        0xCD => entry(Cmp, Abs),
        0xCE => entry(Dec, Abs),
        0xCF => illegal(Abs),       // DCP abs

        0xD0 => entry(Bne, Rel),
        0xD1 => entry(Cmp, IndY),
        0xD2 => entry(Jam, Imp),
        0xD3 => illegal(IndY),      // DCP (zp),Y
        0xD4 => illegal(ZpX),       // NOP zp,X
        0xD5 => entry(Cmp, ZpX),
        0xD6 => entry(Dec, ZpX),
        0xD7 => illegal(ZpX),       // DCP zp,X
        0xD8 => entry(Cld, Imp),
        0xD9 => entry(Cmp, AbsY),
        0xDA => illegal(Imp),       // NOP
        0xDB => illegal(AbsY),      // DCP abs,Y
        0xDC => illegal(AbsX),      // NOP abs,X
        0xDD => entry(Cmp, AbsX),
        0xDE => entry(Dec, AbsX),
        0xDF => illegal(AbsX),      // DCP abs,X

        0xE0 => entry(Cpx, Imm),
        0xE1 => entry(Sbc, IndX),
        0xE2 => illegal(Imm),       // NOP #imm
        0xE3 => illegal(IndX),      // ISC (zp,X)
        0xE4 => entry(Cpx, Zp),
        0xE5 => entry(Sbc, Zp),
        0xE6 => entry(Inc, Zp),
        0xE7 => illegal(Zp),        // ISC zp
        0xE8 => entry(Inx, Imp),
        0xE9 => entry(Sbc, Imm),
        0xEA => entry(Nop, Imp),
        0xEB => illegal(Imm),       // USBC #imm
        0xEC => entry(Cpx, Abs),
        0xED => entry(Sbc, Abs),
        0xEE => entry(Inc, Abs),
        0xEF => illegal(Abs),       // ISC abs

        0xF0 => entry(Beq, Rel),
        0xF1 => entry(Sbc, IndY),
        0xF2 => entry(Jam, Imp),
        0xF3 => illegal(IndY),      // ISC (zp),Y
        0xF4 => illegal(ZpX),       // NOP zp,X
        0xF5 => entry(Sbc, ZpX),
        0xF6 => entry(Inc, ZpX),
        0xF7 => illegal(ZpX),       // ISC zp,X
        0xF8 => entry(Sed, Imp),
        0xF9 => entry(Sbc, AbsY),
        0xFA => illegal(Imp),       // NOP
        0xFB => illegal(AbsY),      // ISC abs,Y
        0xFC => illegal(AbsX),      // NOP abs,X
        0xFD => entry(Sbc, AbsX),
        0xFE => entry(Inc, AbsX),
        0xFF => illegal(AbsX),      // ISC abs,X
    }
}

/// Build the full decode table.
pub fn build_table() -> [OpcodeInfo; 256] {
    let mut table = [entry(Mnemonic::Nop, AddrMode::Imp); 256];
    let mut opcode = 0usize;
    while opcode < 256 {
        table[opcode] = decode(opcode as u8);
        opcode += 1;
    }
    table
}
