pub mod alu;
mod cpu;
pub mod disasm;
pub mod opcodes;
mod structs;

pub use cpu::Cpu;
pub use structs::{MicroState, Pins, Registers, Status};

#[macro_export]
macro_rules! bytes_to_addr {
    ($fst: expr, $snd: expr) => {{
        (u16::from($snd) << 8) | u16::from($fst)
    }};
}
