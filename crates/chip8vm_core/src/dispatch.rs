//! Instruction semantics.
//!
//! [`execute`] mutates [`State`] for one decoded instruction and tells the
//! engine what to do with the program counter. Handlers never touch PC
//! themselves, and any fault is detected before the first write.

use rand::Rng;

use crate::error::Fault;
use crate::instruction::{Category, Instruction};
use crate::keypad::KeyInput;
use crate::state::State;
use crate::{FONT_GLYPH_SIZE, NUM_REGS};

/// How the engine moves PC after an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PcAction {
    /// PC += 2
    Advance,
    /// PC += 4
    SkipNext,
    /// PC = address
    Jump(u16),
    /// PC stays put until a key is supplied for `register`.
    AwaitKey { register: u8 },
}

#[inline]
fn skip_if(condition: bool) -> PcAction {
    if condition {
        PcAction::SkipNext
    } else {
        PcAction::Advance
    }
}

pub fn execute<K, R>(
    instr: &Instruction,
    state: &mut State,
    keys: &K,
    rng: &mut R,
) -> Result<PcAction, Fault>
where
    K: KeyInput + ?Sized,
    R: Rng,
{
    let Instruction { nnn, n, x, y, kk, .. } = *instr;
    let vx = state.v(x);
    let vy = state.v(y);

    match instr.category {
        Category::ClearScreen => state.screen_mut().clear(),
        Category::Return => return Ok(PcAction::Jump(state.pop()?)),
        Category::Sys => {}
        Category::Jump => return Ok(PcAction::Jump(nnn)),
        Category::Call => {
            // return address is the instruction after the CALL
            state.push(state.pc().wrapping_add(2))?;
            return Ok(PcAction::Jump(nnn));
        }
        Category::SkipEqImm => return Ok(skip_if(vx == kk)),
        Category::SkipNeImm => return Ok(skip_if(vx != kk)),
        Category::SkipEqReg => return Ok(skip_if(vx == vy)),
        Category::LoadImm => state.set_v(x, kk),
        Category::AddImm => state.set_v(x, vx.wrapping_add(kk)),
        Category::LoadReg => state.set_v(x, vy),
        Category::Or => state.set_v(x, vx | vy),
        Category::And => state.set_v(x, vx & vy),
        Category::Xor => state.set_v(x, vx ^ vy),
        Category::AddReg => {
            let (sum, carry) = vx.overflowing_add(vy);
            state.set_v(x, sum);
            state.set_flag(carry);
        }
        Category::SubReg => {
            state.set_v(x, vx.wrapping_sub(vy));
            state.set_flag(vx >= vy);
        }
        Category::ShiftRight => {
            state.set_v(x, vx >> 1);
            state.set_flag(vx & 0x01 != 0);
        }
        Category::SubReverse => {
            state.set_v(x, vy.wrapping_sub(vx));
            state.set_flag(vy >= vx);
        }
        Category::ShiftLeft => {
            state.set_v(x, vx << 1);
            state.set_flag(vx & 0x80 != 0);
        }
        Category::SkipNeReg => return Ok(skip_if(vx != vy)),
        Category::LoadIndex => state.set_index(nnn),
        Category::JumpOffset => {
            return Ok(PcAction::Jump(nnn + u16::from(state.v(0))));
        }
        Category::RandomMask => state.set_v(x, rng.gen::<u8>() & kk),
        Category::Draw => draw_sprite(state, vx, vy, n)?,
        Category::SkipKeyPressed => return Ok(skip_if(keys.is_pressed(vx))),
        Category::SkipKeyNotPressed => return Ok(skip_if(!keys.is_pressed(vx))),
        Category::LoadDelay => state.set_v(x, state.delay_timer()),
        Category::WaitKey => return Ok(PcAction::AwaitKey { register: x }),
        Category::SetDelay => state.set_delay_timer(vx),
        Category::SetSound => state.set_sound_timer(vx),
        Category::AddIndex => state.set_index(state.index().wrapping_add(u16::from(vx))),
        Category::LoadFont => {
            let glyph = u16::from(vx & 0x0F) * FONT_GLYPH_SIZE;
            state.set_index(state.font_address() + glyph);
        }
        Category::StoreBcd => {
            state.write(state.index(), &[vx / 100, (vx / 10) % 10, vx % 10])?;
        }
        Category::StoreRegisters => {
            let regs = *state.registers();
            state.write(state.index(), &regs[..=usize::from(x)])?;
        }
        Category::LoadRegisters => {
            let count = usize::from(x) + 1;
            let mut buf = [0u8; NUM_REGS];
            buf[..count].copy_from_slice(state.read(state.index(), count)?);
            for (reg, &value) in (0u8..).zip(&buf[..count]) {
                state.set_v(reg, value);
            }
        }
    }

    Ok(PcAction::Advance)
}

/// DXYN: XOR `n` rows from memory[I..] at (vx, vy); VF reports whether any
/// lit pixel was erased anywhere in the sprite.
fn draw_sprite(state: &mut State, vx: u8, vy: u8, n: u8) -> Result<(), Fault> {
    let height = usize::from(n);
    let mut rows = [0u8; 15];
    rows[..height].copy_from_slice(state.read(state.index(), height)?);

    let collision = state
        .screen_mut()
        .draw_sprite(usize::from(vx), usize::from(vy), &rows[..height]);
    state.set_flag(collision);
    Ok(())
}
