//! Semantic matrix: one check per documented operation, beyond the cycle
//! counting. Each case is a tiny program plus the register, flag, and
//! memory state it must leave behind.

mod util;

use util::{TestBoard, ORIGIN};
use winesap_core::devices::cpu::Status;

const C: u8 = 0x01;
const Z: u8 = 0x02;
const I: u8 = 0x04;
const D: u8 = 0x08;
const V: u8 = 0x40;
const N: u8 = 0x80;

struct Case {
    name: &'static str,
    program: &'static [u8],
    steps: usize,
    a: Option<u8>,
    x: Option<u8>,
    y: Option<u8>,
    /// Flags that must be set / must be clear afterwards
    set: u8,
    clear: u8,
    /// A memory cell that must hold a value afterwards
    mem: Option<(u16, u8)>,
}

const NONE: Case = Case {
    name: "",
    program: &[],
    steps: 0,
    a: None,
    x: None,
    y: None,
    set: 0,
    clear: 0,
    mem: None,
};

fn run(case: &Case) {
    let mut board = TestBoard::new(case.program, ORIGIN);
    board.step_n(case.steps);
    if let Some(a) = case.a {
        assert_eq!(board.cpu.regs.a, a, "{}: A", case.name);
    }
    if let Some(x) = case.x {
        assert_eq!(board.cpu.regs.x, x, "{}: X", case.name);
    }
    if let Some(y) = case.y {
        assert_eq!(board.cpu.regs.y, y, "{}: Y", case.name);
    }
    let p = board.cpu.regs.p;
    let set = Status::from_bits_truncate(case.set);
    let clear = Status::from_bits_truncate(case.clear);
    assert!(
        p.contains(set),
        "{}: expected {:?} set in {:?}",
        case.name,
        set,
        p
    );
    assert!(
        (p & clear).is_empty(),
        "{}: expected {:?} clear in {:?}",
        case.name,
        clear,
        p
    );
    if let Some((addr, val)) = case.mem {
        assert_eq!(board.mem[addr as usize], val, "{}: mem[{:04X}]", case.name, addr);
    }
}

fn run_all(cases: &[Case]) {
    for case in cases {
        run(case);
    }
}

#[test]
fn loads_and_stores() {
    run_all(&[
        Case { name: "LDA imm", program: &[0xA9, 0x42], steps: 1, a: Some(0x42), clear: Z | N, ..NONE },
        Case { name: "LDA zero", program: &[0xA9, 0x00], steps: 1, a: Some(0x00), set: Z, clear: N, ..NONE },
        Case { name: "LDA negative", program: &[0xA9, 0x80], steps: 1, a: Some(0x80), set: N, clear: Z, ..NONE },
        Case { name: "LDX imm", program: &[0xA2, 0x7F], steps: 1, x: Some(0x7F), clear: Z | N, ..NONE },
        Case { name: "LDY imm", program: &[0xA0, 0xFF], steps: 1, y: Some(0xFF), set: N, ..NONE },
        Case {
            name: "STA zp / LDA back",
            program: &[0xA9, 0x55, 0x85, 0x40, 0xA9, 0x00, 0xA5, 0x40],
            steps: 4,
            a: Some(0x55),
            mem: Some((0x0040, 0x55)),
            ..NONE
        },
        Case {
            name: "STX abs",
            program: &[0xA2, 0x99, 0x8E, 0x00, 0x20],
            steps: 2,
            mem: Some((0x2000, 0x99)),
            ..NONE
        },
        Case {
            name: "STY zp,X",
            program: &[0xA2, 0x02, 0xA0, 0x77, 0x94, 0x40],
            steps: 3,
            mem: Some((0x0042, 0x77)),
            ..NONE
        },
        Case {
            name: "STA (zp,X)",
            // pointer at $22 -> $1234, X=2, base operand $20
            program: &[0xA9, 0x34, 0x85, 0x22, 0xA9, 0x12, 0x85, 0x23, 0xA2, 0x02, 0xA9, 0xAB, 0x81, 0x20],
            steps: 7,
            mem: Some((0x1234, 0xAB)),
            ..NONE
        },
        Case {
            name: "STA (zp),Y",
            program: &[0xA9, 0x00, 0x85, 0x22, 0xA9, 0x12, 0x85, 0x23, 0xA0, 0x05, 0xA9, 0xCD, 0x91, 0x22],
            steps: 7,
            mem: Some((0x1205, 0xCD)),
            ..NONE
        },
    ]);
}

#[test]
fn arithmetic() {
    run_all(&[
        Case { name: "ADC basic", program: &[0xA9, 0x22, 0x69, 0x11], steps: 2, a: Some(0x33), clear: C | Z | N | V, ..NONE },
        Case { name: "ADC carry out", program: &[0xA9, 0xFF, 0x69, 0x01], steps: 2, a: Some(0x00), set: C | Z, clear: V, ..NONE },
        Case { name: "ADC uses carry in", program: &[0x38, 0xA9, 0x11, 0x69, 0x22], steps: 3, a: Some(0x34), clear: C, ..NONE },
        Case { name: "ADC overflow 7F+01", program: &[0xA9, 0x7F, 0x69, 0x01], steps: 2, a: Some(0x80), set: N | V, clear: C, ..NONE },
        Case { name: "ADC overflow 80+FF", program: &[0xA9, 0x80, 0x69, 0xFF], steps: 2, a: Some(0x7F), set: C | V, clear: N, ..NONE },
        Case { name: "SBC basic", program: &[0x38, 0xA9, 0x40, 0xE9, 0x20], steps: 3, a: Some(0x20), set: C, clear: Z | N | V, ..NONE },
        Case { name: "SBC borrow", program: &[0x18, 0xA9, 0x40, 0xE9, 0x20], steps: 3, a: Some(0x1F), set: C, ..NONE },
        Case { name: "SBC underflow", program: &[0x38, 0xA9, 0x00, 0xE9, 0x01], steps: 3, a: Some(0xFF), set: N, clear: C | V, ..NONE },
        Case { name: "SBC overflow 80-01", program: &[0x38, 0xA9, 0x80, 0xE9, 0x01], steps: 3, a: Some(0x7F), set: C | V, clear: N, ..NONE },
        Case { name: "INC memory", program: &[0xA9, 0x7F, 0x85, 0x40, 0xE6, 0x40], steps: 3, set: N, mem: Some((0x0040, 0x80)), ..NONE },
        Case { name: "DEC to zero", program: &[0xA9, 0x01, 0x85, 0x40, 0xC6, 0x40], steps: 3, set: Z, mem: Some((0x0040, 0x00)), ..NONE },
        Case { name: "INX wraps", program: &[0xA2, 0xFF, 0xE8], steps: 2, x: Some(0x00), set: Z, ..NONE },
        Case { name: "DEY wraps", program: &[0xA0, 0x00, 0x88], steps: 2, y: Some(0xFF), set: N, ..NONE },
    ]);
}

#[test]
fn logic_and_bits() {
    run_all(&[
        Case { name: "AND", program: &[0xA9, 0xF0, 0x29, 0x3C], steps: 2, a: Some(0x30), clear: Z | N, ..NONE },
        Case { name: "ORA", program: &[0xA9, 0x0F, 0x09, 0x80], steps: 2, a: Some(0x8F), set: N, ..NONE },
        Case { name: "EOR self is zero", program: &[0xA9, 0xA5, 0x49, 0xA5], steps: 2, a: Some(0x00), set: Z, ..NONE },
        Case {
            name: "BIT copies bits 7/6",
            program: &[0xA9, 0xC0, 0x85, 0x40, 0xA9, 0x01, 0x24, 0x40],
            steps: 4,
            set: N | V | Z,
            ..NONE
        },
        Case {
            name: "BIT nonzero result",
            program: &[0xA9, 0x01, 0x85, 0x40, 0x24, 0x40],
            steps: 3,
            clear: N | V | Z,
            ..NONE
        },
    ]);
}

#[test]
fn shifts_and_rotates() {
    run_all(&[
        Case { name: "ASL A", program: &[0xA9, 0x81, 0x0A], steps: 2, a: Some(0x02), set: C, clear: N | Z, ..NONE },
        Case { name: "LSR A", program: &[0xA9, 0x01, 0x4A], steps: 2, a: Some(0x00), set: C | Z, clear: N, ..NONE },
        Case { name: "ROL A threads carry", program: &[0x38, 0xA9, 0x40, 0x2A], steps: 3, a: Some(0x81), set: N, clear: C, ..NONE },
        Case { name: "ROR A threads carry", program: &[0x38, 0xA9, 0x02, 0x6A], steps: 3, a: Some(0x81), set: N, clear: C, ..NONE },
        Case {
            name: "ASL memory",
            program: &[0xA9, 0xC0, 0x85, 0x40, 0x06, 0x40],
            steps: 3,
            set: C | N,
            mem: Some((0x0040, 0x80)),
            ..NONE
        },
        Case {
            name: "ROR memory pulls carry in",
            program: &[0x38, 0xA9, 0x00, 0x85, 0x40, 0x66, 0x40],
            steps: 4,
            set: N,
            clear: C,
            mem: Some((0x0040, 0x80)),
            ..NONE
        },
    ]);
}

#[test]
fn compares() {
    run_all(&[
        Case { name: "CMP equal", program: &[0xA9, 0x42, 0xC9, 0x42], steps: 2, set: Z | C, clear: N, ..NONE },
        Case { name: "CMP greater", program: &[0xA9, 0x50, 0xC9, 0x42], steps: 2, set: C, clear: Z, ..NONE },
        Case { name: "CMP less", program: &[0xA9, 0x40, 0xC9, 0x42], steps: 2, set: N, clear: Z | C, ..NONE },
        Case { name: "CPX", program: &[0xA2, 0x10, 0xE0, 0x10], steps: 2, set: Z | C, ..NONE },
        Case { name: "CPY", program: &[0xA0, 0x00, 0xC0, 0x01], steps: 2, set: N, clear: C, ..NONE },
    ]);
}

#[test]
fn flag_instructions() {
    run_all(&[
        Case { name: "SEC", program: &[0x38], steps: 1, set: C, ..NONE },
        Case { name: "CLC", program: &[0x38, 0x18], steps: 2, clear: C, ..NONE },
        Case { name: "SED", program: &[0xF8], steps: 1, set: D, ..NONE },
        Case { name: "CLD", program: &[0xF8, 0xD8], steps: 2, clear: D, ..NONE },
        Case { name: "SEI", program: &[0x78], steps: 1, set: I, ..NONE },
        Case { name: "CLI", program: &[0x78, 0x58], steps: 2, clear: I, ..NONE },
        // V can only be cleared by CLV (or PLP/RTI)
        Case { name: "CLV", program: &[0xA9, 0x7F, 0x69, 0x01, 0xB8], steps: 3, clear: V, ..NONE },
    ]);
}

#[test]
fn transfers() {
    run_all(&[
        Case { name: "TAX", program: &[0xA9, 0x80, 0xAA], steps: 2, x: Some(0x80), set: N, ..NONE },
        Case { name: "TAY", program: &[0xA9, 0x00, 0xA8], steps: 2, y: Some(0x00), set: Z, ..NONE },
        Case { name: "TXA", program: &[0xA2, 0x33, 0x8A], steps: 2, a: Some(0x33), ..NONE },
        Case { name: "TYA", program: &[0xA0, 0x44, 0x98], steps: 2, a: Some(0x44), ..NONE },
        Case { name: "TSX", program: &[0xBA], steps: 1, x: Some(0xFD), set: N, ..NONE },
        // TXS must not touch flags: LDX set Z and TXS leaves it alone
        Case { name: "TXS flagless", program: &[0xA2, 0x00, 0x9A], steps: 2, set: Z, ..NONE },
    ]);
}

#[test]
fn stack_round_trips() {
    run_all(&[
        Case {
            name: "PHA/PLA",
            program: &[0xA9, 0x5A, 0x48, 0xA9, 0x00, 0x68],
            steps: 4,
            a: Some(0x5A),
            clear: Z,
            ..NONE
        },
        Case {
            name: "PHP/PLP round-trips flags",
            program: &[0x38, 0xF8, 0x08, 0x18, 0xD8, 0x28],
            steps: 6,
            set: C | D,
            ..NONE
        },
    ]);
}

#[test]
fn branches_move_where_they_should() {
    // skip over an LDA that would clobber A
    #[rustfmt::skip]
    let program = &[
        0xA9, 0x11,  // LDA #$11
        0xD0, 0x02,  // BNE +2
        0xA9, 0x99,  // LDA #$99 (skipped)
        0xEA,        // NOP
    ];
    let mut board = TestBoard::new(program, ORIGIN);
    board.step_n(3);
    assert_eq!(board.cpu.regs.a, 0x11);
    assert_eq!(board.cpu.regs.pc, ORIGIN + 7);

    // backwards branch loops until Z sets
    #[rustfmt::skip]
    let program = &[
        0xA2, 0x03,  // LDX #$03
        0xCA,        // loop: DEX
        0xD0, 0xFD,  // BNE loop
        0x02,        // halt
    ];
    let mut board = TestBoard::new(program, ORIGIN);
    board.run_to_jam(1000);
    assert_eq!(board.cpu.regs.x, 0);
}

#[test]
fn jsr_rts_nest() {
    #[rustfmt::skip]
    let program = &[
        0x20, 0x08, 0x80,  // JSR sub1
        0xA0, 0x01,        // LDY #$01
        0x02,              // halt
        0xEA, 0xEA,
        0x20, 0x0D, 0x80,  // sub1: JSR sub2
        0xE8,              // INX
        0x60,              // RTS
        0xC8,              // sub2: INY
        0x60,              // RTS
    ];
    let mut board = TestBoard::new(program, 0x8000);
    board.run_to_jam(1000);
    assert_eq!(board.cpu.regs.x, 1, "sub1 ran after sub2 returned");
    assert_eq!(board.cpu.regs.y, 1, "LDY ran after sub1 returned");
    assert_eq!(board.cpu.regs.s, 0xFD, "stack balanced");
}
