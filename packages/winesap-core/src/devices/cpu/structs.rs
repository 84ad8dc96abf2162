bitflags! {
    /// The P register. Bit 5 is hardwired high; bit 4 only exists on the
    /// copies pushed to the stack, where it marks the push as coming from
    /// BRK/PHP rather than a hardware interrupt.
    pub struct Status: u8 {
        const CARRY = 0x01;
        const ZERO = 0x02;
        const IRQ_DISABLE = 0x04;
        const DECIMAL = 0x08;
        const BREAK = 0x10;
        const UNUSED = 0x20;
        const OVERFLOW = 0x40;
        const NEGATIVE = 0x80;
    }
}

/// The programmer-visible register file.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct Registers {
    /// The Accumulator register
    pub a: u8,

    /// X index register
    pub x: u8,

    /// Y index register
    pub y: u8,

    /// The stack pointer
    ///
    /// # Note
    ///
    /// This register is a pointer to a location in memory on the first page
    /// ($01XX) of memory. The 6502 uses a bottom-up stack, so the 'first'
    /// location on the stack is `$01FF` and the 'last' is `$0100`.
    pub s: u8,

    /// The program counter
    pub pc: u16,

    /// The program status register.
    pub p: Status,
}

pub const POWERON_REGISTERS: Registers = Registers {
    a: 0,
    x: 0,
    y: 0,
    // the reset sequence performs three suppressed stack pushes, leaving
    // this at $FD by the time the reset vector is loaded
    s: 0x00,
    pc: 0,
    p: Status::from_bits_truncate(0x24),
};

/// The CPU's connection to the outside world.
///
/// The core never touches memory itself: each call to `clock` consumes
/// `din` (the byte the bus read for the address presented on the previous
/// cycle) and leaves a new `addr`/`we`/`dout` for the bus to honor before
/// the next call. The interrupt lines are active-low, as on the DIP-40.
#[derive(Debug, Copy, Clone)]
pub struct Pins {
    /// Data in: the result of the read the bus performed last cycle
    pub din: u8,
    /// Non-maskable interrupt, active low, edge sensitive
    pub nmi_n: bool,
    /// Maskable interrupt request, active low, level sensitive
    pub irq_n: bool,
    /// Set-overflow, active low, edge sensitive
    pub so_n: bool,
    /// Reset, active high in this model
    pub rst: bool,

    /// Address out
    pub addr: u16,
    /// Write enable: when set, the bus should write `dout` to `addr`
    /// instead of reading
    pub we: bool,
    /// Data out, valid when `we` is set
    pub dout: u8,
}

impl Pins {
    pub fn new() -> Pins {
        Pins {
            din: 0,
            nmi_n: true,
            irq_n: true,
            so_n: true,
            rst: false,
            addr: 0,
            we: false,
            dout: 0,
        }
    }
}

impl Default for Pins {
    fn default() -> Self {
        Pins::new()
    }
}

/// One state of the micro-sequencer. Every documented instruction is a
/// walk through a handful of these, one per clock; the walk lengths are
/// what make the cycle counts come out right.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum MicroState {
    /// Consuming the opcode byte; AR == PC
    OpcodeFetch,
    /// Consuming the byte after the opcode (operand, pointer, or dummy)
    Cycle2,
    /// Consuming the high byte of an address and resolving the effective
    /// address (with index add and page-cross detection where applicable)
    Cycle3,
    /// Dummy read at the un-indexed zero-page pointer for (zp,X)
    PreIndirect,
    /// Reading the low byte of a pointer target
    Indirect,
    /// Dummy cycle after a taken branch
    BranchTaken,
    /// Extra dummy cycle when a taken branch crosses a page
    BranchPage,
    /// Dummy read before a read-modify-write at an indexed address
    PreRead,
    /// Consuming the operand byte (or latching it, for RMW)
    Read,
    /// Second read after an index carry into the address high byte
    Read2,
    /// The modify half of read-modify-write; the unmodified byte is being
    /// written back while the ALU works, as on the NMOS part
    Rmw,
    /// Dummy read before a write at an indexed address
    PreWrite,
    /// Letting a write complete
    Write,
    Stack1,
    Stack2,
    Stack3,
    Stack4,
    /// Loading PC with a computed target (JMP/JSR/RTS/vectors)
    Jump,
}
