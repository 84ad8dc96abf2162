//! Cycle counts for every documented opcode, against the MOS datasheet:
//! base counts per addressing mode, the +1 for index carries on reads,
//! the flat 5/7 for indexed writes and read-modify-writes, and the branch
//! taken / page-cross surcharges.

mod util;

use util::TestBoard;

/// Common preamble: X=4, Y=4, a pointer at $20 -> $1200 and one at
/// $24 -> $1234, A=1 with Z/N clear. Eleven instructions.
#[rustfmt::skip]
const SETUP: &[u8] = &[
    0xA2, 0x04,       // LDX #$04
    0xA0, 0x04,       // LDY #$04
    0xA9, 0x00,       // LDA #$00
    0x85, 0x20,       // STA $20
    0xA9, 0x12,       // LDA #$12
    0x85, 0x21,       // STA $21   ; ($20) -> $1200
    0xA9, 0x34,       // LDA #$34
    0x85, 0x24,       // STA $24
    0xA9, 0x12,       // LDA #$12
    0x85, 0x25,       // STA $25   ; ($24) -> $1234
    0xA9, 0x01,       // LDA #$01  ; Z=0 N=0 (C, V clear from reset)
];
const SETUP_COUNT: usize = 11;

/// Run the standard preamble, then measure the instruction under test.
fn measure(instr: &[u8]) -> u32 {
    let mut program = SETUP.to_vec();
    program.extend_from_slice(instr);
    program.extend_from_slice(&[0xEA, 0xEA, 0xEA]);
    let mut board = TestBoard::new(&program, util::ORIGIN);
    board.step_n(SETUP_COUNT);
    board.step()
}

fn assert_group(opcodes: &[u8], operand: &[u8], expected: u32, what: &str) {
    for &op in opcodes {
        let mut instr = vec![op];
        instr.extend_from_slice(operand);
        assert_eq!(
            measure(&instr),
            expected,
            "{} opcode ${:02X} cycle count",
            what,
            op
        );
    }
}

#[test]
fn immediate_takes_2() {
    assert_group(
        &[0xA9, 0xA2, 0xA0, 0x69, 0xE9, 0x29, 0x09, 0x49, 0xC9, 0xE0, 0xC0],
        &[0x01],
        2,
        "immediate",
    );
}

#[test]
fn implied_and_accumulator_take_2() {
    #[rustfmt::skip]
    let ops = [
        0xEA, 0x18, 0x38, 0x58, 0x78, 0xB8, 0xD8, 0xF8, // NOP, flag ops
        0xAA, 0x8A, 0xA8, 0x98, 0xBA, 0x9A,             // transfers
        0xE8, 0xCA, 0xC8, 0x88,                         // INX DEX INY DEY
        0x0A, 0x4A, 0x2A, 0x6A,                         // shifts on A
    ];
    assert_group(&ops, &[], 2, "implied");
}

#[test]
fn zero_page() {
    // reads and writes: 3
    assert_group(
        &[0xA5, 0xA6, 0xA4, 0x85, 0x86, 0x84, 0x24, 0x65, 0xE5, 0x25, 0x05, 0x45, 0xC5, 0xE4, 0xC4],
        &[0x10],
        3,
        "zp",
    );
    // read-modify-write: 5
    assert_group(&[0x06, 0x46, 0x26, 0x66, 0xE6, 0xC6], &[0x10], 5, "zp rmw");
}

#[test]
fn zero_page_indexed() {
    assert_group(
        &[0xB5, 0xB4, 0x95, 0x94, 0x75, 0xF5, 0x35, 0x15, 0x55, 0xD5],
        &[0x10],
        4,
        "zp,X",
    );
    assert_group(&[0x16, 0x56, 0x36, 0x76, 0xF6, 0xD6], &[0x10], 6, "zp,X rmw");
    // the two zp,Y forms
    assert_group(&[0xB6, 0x96], &[0x10], 4, "zp,Y");
}

#[test]
fn absolute() {
    assert_group(
        &[0xAD, 0xAE, 0xAC, 0x8D, 0x8E, 0x8C, 0x2C, 0x6D, 0xED, 0x2D, 0x0D, 0x4D, 0xCD, 0xEC, 0xCC],
        &[0x34, 0x12],
        4,
        "abs",
    );
    assert_group(
        &[0x0E, 0x4E, 0x2E, 0x6E, 0xEE, 0xCE],
        &[0x34, 0x12],
        6,
        "abs rmw",
    );
}

#[test]
fn absolute_indexed_reads() {
    // X=4 against $1200: no carry into the high byte, 4 cycles
    assert_group(
        &[0xBD, 0xBC, 0x7D, 0xFD, 0x3D, 0x1D, 0x5D, 0xDD],
        &[0x00, 0x12],
        4,
        "abs,X read",
    );
    assert_group(
        &[0xB9, 0xBE, 0x79, 0xF9, 0x39, 0x19, 0x59, 0xD9],
        &[0x00, 0x12],
        4,
        "abs,Y read",
    );
    // $12FF + 4 carries: one more cycle
    assert_group(&[0xBD, 0xBC], &[0xFF, 0x12], 5, "abs,X page cross");
    assert_group(&[0xB9, 0xBE], &[0xFF, 0x12], 5, "abs,Y page cross");
}

#[test]
fn absolute_indexed_writes_and_rmw() {
    // stores never take the shortcut: always 5
    assert_group(&[0x9D], &[0x00, 0x12], 5, "STA abs,X");
    assert_group(&[0x99], &[0x00, 0x12], 5, "STA abs,Y");
    // and RMW is always 7, carry or not
    assert_group(
        &[0x1E, 0x5E, 0x3E, 0x7E, 0xFE, 0xDE],
        &[0x00, 0x12],
        7,
        "abs,X rmw",
    );
    assert_group(&[0xFE], &[0xFF, 0x12], 7, "abs,X rmw with carry");
}

#[test]
fn indexed_indirect() {
    // ($20,X) with X=4 resolves through $24 -> $1234: 6 cycles
    assert_group(
        &[0xA1, 0x81, 0x61, 0xE1, 0x21, 0x01, 0x41, 0xC1],
        &[0x20],
        6,
        "(zp,X)",
    );
}

#[test]
fn indirect_indexed() {
    // ($20),Y = $1200+4: no cross, 5 cycles for reads
    assert_group(
        &[0xB1, 0x71, 0xF1, 0x31, 0x11, 0x51, 0xD1],
        &[0x20],
        5,
        "(zp),Y read",
    );
    // stores always pay the fix-up: 6
    assert_group(&[0x91], &[0x20], 6, "STA (zp),Y");
}

#[test]
fn indirect_indexed_page_cross() {
    // repoint ($20) at $12FF so Y=4 carries
    let mut program = SETUP.to_vec();
    program.extend_from_slice(&[0xA9, 0xFF, 0x85, 0x20]); // LDA #$FF / STA $20
    program.extend_from_slice(&[0xB1, 0x20, 0xEA, 0xEA]); // LDA ($20),Y
    let mut board = TestBoard::new(&program, util::ORIGIN);
    board.step_n(SETUP_COUNT + 2);
    assert_eq!(board.step(), 6, "(zp),Y read across a page");
}

#[test]
fn jumps_and_subroutines() {
    assert_group(&[0x4C], &[0x00, 0x90], 3, "JMP abs");
    // JMP ($0024) via the pointer at $24 -> $1234
    assert_group(&[0x6C], &[0x24, 0x00], 5, "JMP ind");
    assert_group(&[0x20], &[0x00, 0x90], 6, "JSR");
}

#[test]
fn rts_takes_6() {
    // JSR to a subroutine that is just RTS
    #[rustfmt::skip]
    let program = &[
        0x20, 0x10, 0x80,  // $8000: JSR $8010
        0x02,              // $8003: (halt)
        0xEA, 0xEA, 0xEA, 0xEA, 0xEA, 0xEA,
        0xEA, 0xEA, 0xEA, 0xEA, 0xEA, 0xEA,
        0x60,              // $8010: RTS
    ];
    let mut board = TestBoard::new(program, 0x8000);
    assert_eq!(board.step(), 6, "JSR");
    assert_eq!(board.step(), 6, "RTS");
    assert_eq!(board.cpu.regs.pc, 0x8003, "RTS lands past the JSR");
}

#[test]
fn stack_pushes_and_pulls() {
    assert_group(&[0x48, 0x08], &[], 3, "PHA/PHP");
    assert_group(&[0x68, 0x28], &[], 4, "PLA/PLP");
}

#[test]
fn brk_takes_7() {
    assert_group(&[0x00], &[], 7, "BRK");
}

#[test]
fn rti_takes_6() {
    // push a fake return frame, then RTI through it
    #[rustfmt::skip]
    let program = &[
        0xA9, 0x90,  // LDA #$90
        0x48,        // PHA          ; PCH
        0xA9, 0x00,  // LDA #$00
        0x48,        // PHA          ; PCL
        0xA9, 0x04,  // LDA #$04
        0x48,        // PHA          ; P (I only)
        0x40,        // RTI
    ];
    let mut board = TestBoard::new(program, util::ORIGIN);
    board.step_n(6);
    assert_eq!(board.step(), 6, "RTI");
    assert_eq!(board.cpu.regs.pc, 0x9000);
}

#[test]
fn branch_surcharges() {
    // condition false: 2 cycles (Z=0 after the preamble, so BEQ falls
    // through)
    assert_group(&[0xF0, 0x30, 0xB0, 0x70], &[0x02], 2, "branch not taken");
    // condition true, same page: 3
    assert_group(&[0xD0, 0x10, 0x90, 0x50], &[0x02], 3, "branch taken");
}

#[test]
fn branch_page_cross_takes_4() {
    // place the branch so its target sits on the next page
    let mut program = SETUP.to_vec();
    program.extend_from_slice(&[0xD0, 0x7F]); // BNE +$7F
    program.extend_from_slice(&[0xEA; 0x90]);
    // origin $80C0: branch at $80D6, next pc $80D8, target $8157
    let mut board = TestBoard::new(&program, 0x80C0);
    board.step_n(SETUP_COUNT);
    assert_eq!(board.step(), 4, "taken branch across a page");
    assert_eq!(board.cpu.regs.pc, 0x80D8 + 0x7F);
}

#[test]
fn illegal_nops_consume_their_operands() {
    // $80 is a 2-byte NOP, $0C a 3-byte one; they must advance PC past
    // the operand and count as plain reads
    let mut board = TestBoard::new(&[0x80, 0x55, 0xEA], util::ORIGIN);
    board.step();
    assert_eq!(board.cpu.regs.pc, util::ORIGIN + 2);

    let mut board = TestBoard::new(&[0x0C, 0x34, 0x12, 0xEA], util::ORIGIN);
    assert_eq!(board.step(), 4);
    assert_eq!(board.cpu.regs.pc, util::ORIGIN + 3);
    assert_eq!(board.cpu.illegal_opcode_count(), 1);
}
