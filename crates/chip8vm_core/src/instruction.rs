use std::fmt;

use crate::error::DecodeFault;

/// The closed set of instruction kinds.
///
/// Both execution and disassembly match on this enum, so adding a kind
/// is a compile error everywhere it is not handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// 00E0 - CLS
    ClearScreen,
    /// 00EE - RET
    Return,
    /// 0nnn - SYS addr, ignored
    Sys,
    /// 1nnn - JP addr
    Jump,
    /// 2nnn - CALL addr
    Call,
    /// 3xkk - SE Vx, byte
    SkipEqImm,
    /// 4xkk - SNE Vx, byte
    SkipNeImm,
    /// 5xy0 - SE Vx, Vy
    SkipEqReg,
    /// 6xkk - LD Vx, byte
    LoadImm,
    /// 7xkk - ADD Vx, byte
    AddImm,
    /// 8xy0 - LD Vx, Vy
    LoadReg,
    /// 8xy1 - OR Vx, Vy
    Or,
    /// 8xy2 - AND Vx, Vy
    And,
    /// 8xy3 - XOR Vx, Vy
    Xor,
    /// 8xy4 - ADD Vx, Vy
    AddReg,
    /// 8xy5 - SUB Vx, Vy
    SubReg,
    /// 8xy6 - SHR Vx
    ShiftRight,
    /// 8xy7 - SUBN Vx, Vy
    SubReverse,
    /// 8xyE - SHL Vx
    ShiftLeft,
    /// 9xy0 - SNE Vx, Vy
    SkipNeReg,
    /// Annn - LD I, addr
    LoadIndex,
    /// Bnnn - JP V0, addr
    JumpOffset,
    /// Cxkk - RND Vx, byte
    RandomMask,
    /// Dxyn - DRW Vx, Vy, nibble
    Draw,
    /// Ex9E - SKP Vx
    SkipKeyPressed,
    /// ExA1 - SKNP Vx
    SkipKeyNotPressed,
    /// Fx07 - LD Vx, DT
    LoadDelay,
    /// Fx0A - LD Vx, K
    WaitKey,
    /// Fx15 - LD DT, Vx
    SetDelay,
    /// Fx18 - LD ST, Vx
    SetSound,
    /// Fx1E - ADD I, Vx
    AddIndex,
    /// Fx29 - LD F, Vx
    LoadFont,
    /// Fx33 - LD B, Vx
    StoreBcd,
    /// Fx55 - LD [I], Vx
    StoreRegisters,
    /// Fx65 - LD Vx, [I]
    LoadRegisters,
}

/// A decoded opcode. Operand fields are extracted for every category;
/// which of them are meaningful depends on `category`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub opcode: u16,
    pub category: Category,
    /// 12-bit address, bits 11..0
    pub nnn: u16,
    /// low nibble, bits 3..0
    pub n: u8,
    /// register index, bits 11..8
    pub x: u8,
    /// register index, bits 7..4
    pub y: u8,
    /// immediate byte, bits 7..0
    pub kk: u8,
}

impl Instruction {
    #[inline]
    pub fn high_nibble(&self) -> u8 {
        (self.opcode >> 12) as u8
    }
}

/// Decode a raw big-endian opcode.
///
/// Every one of the 65536 words either maps to exactly one [`Category`] or
/// is rejected with a [`DecodeFault`].
pub fn decode(opcode: u16) -> Result<Instruction, DecodeFault> {
    let digit1 = ((opcode & 0xF000) >> 12) as u8;
    let x = ((opcode & 0x0F00) >> 8) as u8;
    let y = ((opcode & 0x00F0) >> 4) as u8;
    let n = (opcode & 0x000F) as u8;

    use Category::*;
    let category = match (digit1, x, y, n) {
        (0x0, 0x0, 0xE, 0x0) => ClearScreen,
        (0x0, 0x0, 0xE, 0xE) => Return,
        (0x0, _, _, _) => Sys,
        (0x1, _, _, _) => Jump,
        (0x2, _, _, _) => Call,
        (0x3, _, _, _) => SkipEqImm,
        (0x4, _, _, _) => SkipNeImm,
        (0x5, _, _, 0x0) => SkipEqReg,
        (0x6, _, _, _) => LoadImm,
        (0x7, _, _, _) => AddImm,
        (0x8, _, _, 0x0) => LoadReg,
        (0x8, _, _, 0x1) => Or,
        (0x8, _, _, 0x2) => And,
        (0x8, _, _, 0x3) => Xor,
        (0x8, _, _, 0x4) => AddReg,
        (0x8, _, _, 0x5) => SubReg,
        (0x8, _, _, 0x6) => ShiftRight,
        (0x8, _, _, 0x7) => SubReverse,
        (0x8, _, _, 0xE) => ShiftLeft,
        (0x9, _, _, 0x0) => SkipNeReg,
        (0xA, _, _, _) => LoadIndex,
        (0xB, _, _, _) => JumpOffset,
        (0xC, _, _, _) => RandomMask,
        (0xD, _, _, _) => Draw,
        (0xE, _, 0x9, 0xE) => SkipKeyPressed,
        (0xE, _, 0xA, 0x1) => SkipKeyNotPressed,
        (0xF, _, 0x0, 0x7) => LoadDelay,
        (0xF, _, 0x0, 0xA) => WaitKey,
        (0xF, _, 0x1, 0x5) => SetDelay,
        (0xF, _, 0x1, 0x8) => SetSound,
        (0xF, _, 0x1, 0xE) => AddIndex,
        (0xF, _, 0x2, 0x9) => LoadFont,
        (0xF, _, 0x3, 0x3) => StoreBcd,
        (0xF, _, 0x5, 0x5) => StoreRegisters,
        (0xF, _, 0x6, 0x5) => LoadRegisters,
        _ => return Err(DecodeFault { opcode }),
    };

    Ok(Instruction {
        opcode,
        category,
        nnn: opcode & 0x0FFF,
        n,
        x,
        y,
        kk: (opcode & 0x00FF) as u8,
    })
}

/// Assembly text: `$`-prefixed hex for addresses and immediates, `V0`..`VF`
/// for registers.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { nnn, n, x, y, kk, .. } = *self;
        match self.category {
            Category::ClearScreen => write!(f, "CLS"),
            Category::Return => write!(f, "RET"),
            Category::Sys => write!(f, "SYS ${nnn:03X}"),
            Category::Jump => write!(f, "JP ${nnn:03X}"),
            Category::Call => write!(f, "CALL ${nnn:03X}"),
            Category::SkipEqImm => write!(f, "SE V{x:X}, ${kk:02X}"),
            Category::SkipNeImm => write!(f, "SNE V{x:X}, ${kk:02X}"),
            Category::SkipEqReg => write!(f, "SE V{x:X}, V{y:X}"),
            Category::LoadImm => write!(f, "LD V{x:X}, ${kk:02X}"),
            Category::AddImm => write!(f, "ADD V{x:X}, ${kk:02X}"),
            Category::LoadReg => write!(f, "LD V{x:X}, V{y:X}"),
            Category::Or => write!(f, "OR V{x:X}, V{y:X}"),
            Category::And => write!(f, "AND V{x:X}, V{y:X}"),
            Category::Xor => write!(f, "XOR V{x:X}, V{y:X}"),
            Category::AddReg => write!(f, "ADD V{x:X}, V{y:X}"),
            Category::SubReg => write!(f, "SUB V{x:X}, V{y:X}"),
            Category::ShiftRight => write!(f, "SHR V{x:X}"),
            Category::SubReverse => write!(f, "SUBN V{x:X}, V{y:X}"),
            Category::ShiftLeft => write!(f, "SHL V{x:X}"),
            Category::SkipNeReg => write!(f, "SNE V{x:X}, V{y:X}"),
            Category::LoadIndex => write!(f, "LD I, ${nnn:03X}"),
            Category::JumpOffset => write!(f, "JP V0, ${nnn:03X}"),
            Category::RandomMask => write!(f, "RND V{x:X}, ${kk:02X}"),
            Category::Draw => write!(f, "DRW V{x:X}, V{y:X}, ${n:X}"),
            Category::SkipKeyPressed => write!(f, "SKP V{x:X}"),
            Category::SkipKeyNotPressed => write!(f, "SKNP V{x:X}"),
            Category::LoadDelay => write!(f, "LD V{x:X}, DT"),
            Category::WaitKey => write!(f, "LD V{x:X}, K"),
            Category::SetDelay => write!(f, "LD DT, V{x:X}"),
            Category::SetSound => write!(f, "LD ST, V{x:X}"),
            Category::AddIndex => write!(f, "ADD I, V{x:X}"),
            Category::LoadFont => write!(f, "LD F, V{x:X}"),
            Category::StoreBcd => write!(f, "LD B, V{x:X}"),
            Category::StoreRegisters => write!(f, "LD [I], V{x:X}"),
            Category::LoadRegisters => write!(f, "LD V{x:X}, [I]"),
        }
    }
}
