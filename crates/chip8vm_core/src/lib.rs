//! A deterministic CHIP-8 virtual machine core.
//!
//! The crate is split along the fetch/decode/execute pipeline:
//! [`State`] owns the machine, [`decode`] turns an opcode into an
//! [`Instruction`], [`dispatch::execute`] applies it and reports a
//! [`PcAction`], and [`Engine`] ties them together one step at a time.
//! Loading ROM files, drawing the framebuffer and pacing the clock are
//! left to the host.

pub mod config;
pub mod disasm;
pub mod dispatch;
pub mod display;
pub mod engine;
pub mod error;
pub mod instruction;
pub mod keypad;
pub mod state;

pub use config::EngineConfig;
pub use disasm::{disassemble, disassemble_program, Line};
pub use dispatch::PcAction;
pub use display::Framebuffer;
pub use engine::{Engine, EngineStatus, StepResult};
pub use error::{DecodeFault, Fault, HostError, StackFault};
pub use instruction::{decode, Category, Instruction};
pub use keypad::{KeyInput, Keypad};
pub use state::State;

/// Logical screen width in pixels.
pub const SCREEN_WIDTH: usize = 64;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 32;

/// Size of the backing store. Only the low 4 KiB are used by programs.
pub const MEMORY_SIZE: usize = 0x10000;
/// End (exclusive) of the architecturally addressable program region.
pub const PROGRAM_REGION_END: usize = 0x1000;
/// Default load address of program bytes.
pub const PROGRAM_START: u16 = 0x200;
/// Default load address of the built-in font.
pub const FONT_ADDRESS: u16 = 0x050;

pub const NUM_REGS: usize = 16;
/// VF doubles as the carry/borrow/collision flag.
pub const FLAG_REGISTER: u8 = 0xF;
pub const STACK_SIZE: usize = 16;
pub const NUM_KEYS: usize = 16;

/// Bytes per font glyph.
pub const FONT_GLYPH_SIZE: u16 = 5;
pub const FONTSET_SIZE: usize = 80;
pub const FONTSET: [u8; FONTSET_SIZE] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
