use std::ops::Range;

use crate::config::check_layout;
use crate::display::Framebuffer;
use crate::error::{Fault, HostError, StackFault};
use crate::{
    FLAG_REGISTER, FONTSET, MEMORY_SIZE, NUM_REGS, PROGRAM_REGION_END, STACK_SIZE,
};

/// All mutable machine state of one virtual machine.
///
/// Accessors keep the invariants: register indices are masked to a nibble,
/// memory accesses are bounds-checked before anything is written, and the
/// stack never goes below empty or above [`STACK_SIZE`].
#[derive(Clone, Debug)]
pub struct State {
    memory: Box<[u8]>,
    /// V registers
    v_reg: [u8; NUM_REGS],
    /// I register
    i_reg: u16,
    /// program counter
    pc: u16,
    stack: [u16; STACK_SIZE],
    /// number of live stack entries
    stack_pointer: usize,
    screen: Framebuffer,
    delay_timer: u8,
    sound_timer: u8,
    program_start: u16,
    font_address: u16,
}

impl State {
    /// Power-on state for the given layout. Fails when the font table does
    /// not fit below `program_start` or the start lies outside the program
    /// region.
    pub fn new(program_start: u16, font_address: u16) -> Result<Self, HostError> {
        check_layout(program_start, font_address)?;
        Ok(Self::with_layout(program_start, font_address))
    }

    /// Caller guarantees the layout passed [`check_layout`].
    pub(crate) fn with_layout(program_start: u16, font_address: u16) -> Self {
        let mut state = Self {
            memory: vec![0; MEMORY_SIZE].into_boxed_slice(),
            v_reg: [0; NUM_REGS],
            i_reg: 0,
            pc: program_start,
            stack: [0; STACK_SIZE],
            stack_pointer: 0,
            screen: Framebuffer::default(),
            delay_timer: 0,
            sound_timer: 0,
            program_start,
            font_address,
        };
        state.reset();
        state
    }

    /// Back to power-on: memory cleared except for the font, registers
    /// zeroed, PC at the program start, stack empty.
    pub fn reset(&mut self) {
        self.memory.fill(0);
        let font = usize::from(self.font_address);
        self.memory[font..font + FONTSET.len()].copy_from_slice(&FONTSET);
        self.v_reg = [0; NUM_REGS];
        self.i_reg = 0;
        self.pc = self.program_start;
        self.stack = [0; STACK_SIZE];
        self.stack_pointer = 0;
        self.screen.clear();
        self.delay_timer = 0;
        self.sound_timer = 0;
    }

    /// Copy raw program bytes to the program start address.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), HostError> {
        let start = usize::from(self.program_start);
        let max = PROGRAM_REGION_END.saturating_sub(start);
        if program.len() > max {
            return Err(HostError::ProgramTooLarge {
                len: program.len(),
                start: self.program_start,
                max,
            });
        }
        self.memory[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }

    fn span(addr: u16, len: usize) -> Result<Range<usize>, Fault> {
        let start = usize::from(addr);
        let end = start + len;
        if end > MEMORY_SIZE {
            return Err(Fault::Memory { addr: start, len });
        }
        Ok(start..end)
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn read(&self, addr: u16, len: usize) -> Result<&[u8], Fault> {
        Ok(&self.memory[Self::span(addr, len)?])
    }

    /// Big-endian 16-bit word at `addr`.
    pub fn read_word(&self, addr: u16) -> Result<u16, Fault> {
        let bytes = self.read(addr, 2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Writes all of `bytes` or nothing.
    pub fn write(&mut self, addr: u16, bytes: &[u8]) -> Result<(), Fault> {
        let range = Self::span(addr, bytes.len())?;
        self.memory[range].copy_from_slice(bytes);
        Ok(())
    }

    #[inline]
    pub fn v(&self, reg: u8) -> u8 {
        self.v_reg[usize::from(reg & 0x0F)]
    }

    #[inline]
    pub fn set_v(&mut self, reg: u8, value: u8) {
        self.v_reg[usize::from(reg & 0x0F)] = value;
    }

    /// Overwrite VF with 1 or 0.
    #[inline]
    pub fn set_flag(&mut self, set: bool) {
        self.set_v(FLAG_REGISTER, u8::from(set));
    }

    pub fn registers(&self) -> &[u8; NUM_REGS] {
        &self.v_reg
    }

    #[inline]
    pub fn index(&self) -> u16 {
        self.i_reg
    }

    #[inline]
    pub fn set_index(&mut self, value: u16) {
        self.i_reg = value;
    }

    #[inline]
    pub fn pc(&self) -> u16 {
        self.pc
    }

    #[inline]
    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    pub fn push(&mut self, addr: u16) -> Result<(), Fault> {
        if self.stack_pointer >= STACK_SIZE {
            return Err(StackFault::Overflow { depth: STACK_SIZE }.into());
        }
        self.stack[self.stack_pointer] = addr;
        self.stack_pointer += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Fault> {
        if self.stack_pointer == 0 {
            return Err(StackFault::Underflow.into());
        }
        self.stack_pointer -= 1;
        Ok(self.stack[self.stack_pointer])
    }

    pub fn stack_pointer(&self) -> usize {
        self.stack_pointer
    }

    /// Live return addresses, oldest first.
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.stack_pointer]
    }

    pub fn screen(&self) -> &Framebuffer {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Framebuffer {
        &mut self.screen
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn set_delay_timer(&mut self, value: u8) {
        self.delay_timer = value;
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn set_sound_timer(&mut self, value: u8) {
        self.sound_timer = value;
    }

    /// Decrement both timers by one, stopping at zero.
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    pub fn program_start(&self) -> u16 {
        self.program_start
    }

    pub fn font_address(&self) -> u16 {
        self.font_address
    }
}
