use thiserror::Error;

/// An opcode that maps to none of the instruction categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
#[error("unrecognized opcode {opcode:#06X}")]
pub struct DecodeFault {
    pub opcode: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum StackFault {
    #[error("stack underflow: return with an empty call stack")]
    Underflow,
    #[error("stack overflow: more than {depth} nested calls")]
    Overflow { depth: usize },
}

/// A machine fault. Any of these halts the engine until it is reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum Fault {
    #[error(transparent)]
    Decode(#[from] DecodeFault),
    #[error("access of {len} byte(s) at {addr:#06X} runs past the end of memory")]
    Memory { addr: usize, len: usize },
    #[error(transparent)]
    Stack(#[from] StackFault),
}

/// Misuse of the engine by the host, as opposed to a fault raised by the
/// running program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("key {0:#X} is not on the 16-key keypad")]
    InvalidKey(u8),
    #[error("no instruction is waiting for a key")]
    NotAwaitingKey,
    #[error("program of {len} bytes does not fit at {start:#05X} (room for {max})")]
    ProgramTooLarge { len: usize, start: u16, max: usize },
    #[error("invalid engine config: {0}")]
    InvalidConfig(&'static str),
}
