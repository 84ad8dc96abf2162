//! A small two-pass 6502 assembler.
//!
//! Enough to write test programs and demo ROMs as source instead of byte
//! soup: the documented mnemonics, all addressing modes, labels, `.byte`
//! data, and comments. Not a macro assembler and not trying to be.
//!
//! ```
//! use winesap_core::asm::assemble;
//!
//! let program = assemble(
//!     "
//!     start:  lda #$42
//!             sta $0400
//!     spin:   jmp spin
//!     ",
//!     0x8000,
//! )
//! .unwrap();
//! assert_eq!(program[0], 0xA9);
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::devices::cpu::opcodes::{decode, AddrMode, Mnemonic};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsmError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for AsmError {}

fn err(line: usize, message: impl Into<String>) -> AsmError {
    AsmError {
        line,
        message: message.into(),
    }
}

/// A parsed operand, before label resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Operand {
    None,
    Accumulator,
    Immediate(u8),
    /// A direct address or a label; labels always assemble as 16-bit
    Address { value: Value, index: Index },
    IndirectX(Value),
    IndirectY(Value),
    Indirect(Value),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Literal(u16),
    Label(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Index {
    None,
    X,
    Y,
}

#[derive(Debug)]
enum Item {
    Instruction {
        line: usize,
        mnemonic: Mnemonic,
        operand: Operand,
    },
    Bytes(Vec<u8>),
}

/// The opcode for a mnemonic/mode pair, recovered from the decode ROM.
fn opcode_for(mnemonic: Mnemonic, mode: AddrMode) -> Option<u8> {
    (0u16..=255).map(|op| op as u8).find(|&op| {
        let info = decode(op);
        !info.illegal && info.mnemonic == mnemonic && info.mode == mode
    })
}

fn parse_mnemonic(word: &str) -> Option<Mnemonic> {
    use Mnemonic::*;
    let m = match word.to_ascii_uppercase().as_str() {
        "ADC" => Adc, "AND" => And, "ASL" => Asl, "BCC" => Bcc, "BCS" => Bcs,
        "BEQ" => Beq, "BIT" => Bit, "BMI" => Bmi, "BNE" => Bne, "BPL" => Bpl,
        "BRK" => Brk, "BVC" => Bvc, "BVS" => Bvs, "CLC" => Clc, "CLD" => Cld,
        "CLI" => Cli, "CLV" => Clv, "CMP" => Cmp, "CPX" => Cpx, "CPY" => Cpy,
        "DEC" => Dec, "DEX" => Dex, "DEY" => Dey, "EOR" => Eor, "INC" => Inc,
        "INX" => Inx, "INY" => Iny, "JMP" => Jmp, "JSR" => Jsr, "LDA" => Lda,
        "LDX" => Ldx, "LDY" => Ldy, "LSR" => Lsr, "NOP" => Nop, "ORA" => Ora,
        "PHA" => Pha, "PHP" => Php, "PLA" => Pla, "PLP" => Plp, "ROL" => Rol,
        "ROR" => Ror, "RTI" => Rti, "RTS" => Rts, "SBC" => Sbc, "SEC" => Sec,
        "SED" => Sed, "SEI" => Sei, "STA" => Sta, "STX" => Stx, "STY" => Sty,
        "TAX" => Tax, "TAY" => Tay, "TSX" => Tsx, "TXA" => Txa, "TXS" => Txs,
        "TYA" => Tya,
        _ => return None,
    };
    Some(m)
}

fn is_branch(mnemonic: Mnemonic) -> bool {
    use Mnemonic::*;
    matches!(mnemonic, Bcc | Bcs | Beq | Bmi | Bne | Bpl | Bvc | Bvs)
}

fn parse_number(text: &str, line: usize) -> Result<u16, AsmError> {
    let parsed = if let Some(hex) = text.strip_prefix('$') {
        u16::from_str_radix(hex, 16)
    } else if let Some(bin) = text.strip_prefix('%') {
        u16::from_str_radix(bin, 2)
    } else {
        text.parse::<u16>()
    };
    parsed.map_err(|_| err(line, format!("bad number `{}`", text)))
}

fn parse_value(text: &str, line: usize) -> Result<Value, AsmError> {
    let first = text
        .chars()
        .next()
        .ok_or_else(|| err(line, "empty operand"))?;
    if first == '$' || first == '%' || first.is_ascii_digit() {
        Ok(Value::Literal(parse_number(text, line)?))
    } else {
        Ok(Value::Label(text.to_string()))
    }
}

fn parse_operand(text: &str, line: usize) -> Result<Operand, AsmError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Operand::None);
    }
    if text.eq_ignore_ascii_case("a") {
        return Ok(Operand::Accumulator);
    }
    if let Some(imm) = text.strip_prefix('#') {
        let value = parse_number(imm.trim(), line)?;
        if value > 0xFF {
            return Err(err(line, format!("immediate `{}` exceeds a byte", text)));
        }
        return Ok(Operand::Immediate(value as u8));
    }
    if let Some(inner) = text.strip_prefix('(') {
        // ($nn,X) | ($nn),Y | ($nnnn)
        if let Some(body) = inner.strip_suffix("),Y").or_else(|| inner.strip_suffix("),y")) {
            return Ok(Operand::IndirectY(parse_value(body.trim(), line)?));
        }
        if let Some(body) = inner.strip_suffix(",X)").or_else(|| inner.strip_suffix(",x)")) {
            return Ok(Operand::IndirectX(parse_value(body.trim(), line)?));
        }
        if let Some(body) = inner.strip_suffix(')') {
            return Ok(Operand::Indirect(parse_value(body.trim(), line)?));
        }
        return Err(err(line, format!("unclosed indirect operand `{}`", text)));
    }
    // addr | addr,X | addr,Y
    if let Some(body) = text.strip_suffix(",X").or_else(|| text.strip_suffix(",x")) {
        return Ok(Operand::Address {
            value: parse_value(body.trim(), line)?,
            index: Index::X,
        });
    }
    if let Some(body) = text.strip_suffix(",Y").or_else(|| text.strip_suffix(",y")) {
        return Ok(Operand::Address {
            value: parse_value(body.trim(), line)?,
            index: Index::Y,
        });
    }
    Ok(Operand::Address {
        value: parse_value(text, line)?,
        index: Index::None,
    })
}

/// Whether an operand forces the 16-bit form (labels always do).
fn is_wide(value: &Value) -> bool {
    match value {
        Value::Literal(v) => *v > 0xFF,
        Value::Label(_) => true,
    }
}

/// The size in bytes an instruction will occupy.
fn item_size(mnemonic: Mnemonic, operand: &Operand) -> u16 {
    match operand {
        Operand::None | Operand::Accumulator => 1,
        Operand::Immediate(_) => 2,
        Operand::IndirectX(_) | Operand::IndirectY(_) => 2,
        Operand::Indirect(_) => 3,
        Operand::Address { value, .. } => {
            if is_branch(mnemonic) {
                2
            } else if is_wide(value) {
                3
            } else {
                2
            }
        }
    }
}

fn resolve(
    value: &Value,
    labels: &HashMap<String, u16>,
    line: usize,
) -> Result<u16, AsmError> {
    match value {
        Value::Literal(v) => Ok(*v),
        Value::Label(name) => labels
            .get(name)
            .copied()
            .ok_or_else(|| err(line, format!("undefined label `{}`", name))),
    }
}

fn emit(
    out: &mut Vec<u8>,
    mnemonic: Mnemonic,
    mode: AddrMode,
    line: usize,
) -> Result<(), AsmError> {
    match opcode_for(mnemonic, mode) {
        Some(op) => {
            out.push(op);
            Ok(())
        }
        None => Err(err(
            line,
            format!("{:?} does not support {:?} addressing", mnemonic, mode),
        )),
    }
}

/// Assemble a program. `origin` is the address of the first byte, used
/// for label math and branch offsets.
pub fn assemble(source: &str, origin: u16) -> Result<Vec<u8>, AsmError> {
    let mut labels: HashMap<String, u16> = HashMap::new();
    let mut items: Vec<Item> = Vec::new();
    let mut pc = origin;

    // pass 1: parse, size, and collect labels
    for (idx, raw_line) in source.lines().enumerate() {
        let line = idx + 1;
        let mut text = raw_line;
        if let Some(comment) = text.find(';') {
            text = &text[..comment];
        }
        let mut text = text.trim();

        while let Some(colon) = text.find(':') {
            let label = text[..colon].trim();
            if label.is_empty() || label.contains(char::is_whitespace) {
                return Err(err(line, format!("bad label `{}`", label)));
            }
            if labels.insert(label.to_string(), pc).is_some() {
                return Err(err(line, format!("duplicate label `{}`", label)));
            }
            text = text[colon + 1..].trim();
        }
        if text.is_empty() {
            continue;
        }

        if let Some(data) = text
            .strip_prefix(".byte")
            .or_else(|| text.strip_prefix(".BYTE"))
        {
            let mut bytes = Vec::new();
            for chunk in data.split(',') {
                let v = parse_number(chunk.trim(), line)?;
                if v > 0xFF {
                    return Err(err(line, format!("`{}` does not fit a byte", chunk.trim())));
                }
                bytes.push(v as u8);
            }
            pc = pc.wrapping_add(bytes.len() as u16);
            items.push(Item::Bytes(bytes));
            continue;
        }

        let (word, rest) = match text.find(char::is_whitespace) {
            Some(space) => (&text[..space], &text[space..]),
            None => (text, ""),
        };
        let mnemonic = parse_mnemonic(word)
            .ok_or_else(|| err(line, format!("unknown mnemonic `{}`", word)))?;
        let operand = parse_operand(rest, line)?;
        pc = pc.wrapping_add(item_size(mnemonic, &operand));
        items.push(Item::Instruction {
            line,
            mnemonic,
            operand,
        });
    }

    // pass 2: encode
    let mut out = Vec::new();
    for item in &items {
        match item {
            Item::Bytes(bytes) => out.extend_from_slice(bytes),
            Item::Instruction {
                line,
                mnemonic,
                operand,
            } => {
                let line = *line;
                let mnemonic = *mnemonic;
                match operand {
                    Operand::None => {
                        // shifts written bare mean the accumulator
                        let mode = if opcode_for(mnemonic, AddrMode::Imp).is_some() {
                            AddrMode::Imp
                        } else {
                            AddrMode::Acc
                        };
                        emit(&mut out, mnemonic, mode, line)?;
                    }
                    Operand::Accumulator => emit(&mut out, mnemonic, AddrMode::Acc, line)?,
                    Operand::Immediate(value) => {
                        emit(&mut out, mnemonic, AddrMode::Imm, line)?;
                        out.push(*value);
                    }
                    Operand::IndirectX(value) => {
                        let addr = resolve(value, &labels, line)?;
                        emit(&mut out, mnemonic, AddrMode::IndX, line)?;
                        out.push((addr & 0xFF) as u8);
                    }
                    Operand::IndirectY(value) => {
                        let addr = resolve(value, &labels, line)?;
                        emit(&mut out, mnemonic, AddrMode::IndY, line)?;
                        out.push((addr & 0xFF) as u8);
                    }
                    Operand::Indirect(value) => {
                        let addr = resolve(value, &labels, line)?;
                        emit(&mut out, mnemonic, AddrMode::Ind, line)?;
                        out.extend_from_slice(&addr.to_le_bytes());
                    }
                    Operand::Address { value, index } => {
                        let addr = resolve(value, &labels, line)?;
                        if is_branch(mnemonic) {
                            emit(&mut out, mnemonic, AddrMode::Rel, line)?;
                            // offset is relative to the byte after the branch
                            let from = origin.wrapping_add(out.len() as u16).wrapping_add(1);
                            let delta = addr as i32 - from as i32;
                            if !(-128..=127).contains(&delta) {
                                return Err(err(
                                    line,
                                    format!("branch target {} bytes away", delta),
                                ));
                            }
                            out.push(delta as u8);
                            continue;
                        }
                        let wide = is_wide(value);
                        let (narrow_mode, wide_mode) = match index {
                            Index::None => (AddrMode::Zp, AddrMode::Abs),
                            Index::X => (AddrMode::ZpX, AddrMode::AbsX),
                            Index::Y => (AddrMode::ZpY, AddrMode::AbsY),
                        };
                        // a zero-page form may not exist (JMP, JSR)
                        let mode = if !wide && opcode_for(mnemonic, narrow_mode).is_some() {
                            narrow_mode
                        } else {
                            wide_mode
                        };
                        emit(&mut out, mnemonic, mode, line)?;
                        if mode == narrow_mode && !wide {
                            out.push((addr & 0xFF) as u8);
                        } else {
                            out.extend_from_slice(&addr.to_le_bytes());
                        }
                    }
                }
            }
        }
    }
    Ok(out)
}
