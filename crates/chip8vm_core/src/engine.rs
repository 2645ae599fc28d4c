use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::EngineConfig;
use crate::dispatch::{self, PcAction};
use crate::display::Framebuffer;
use crate::error::{Fault, HostError};
use crate::instruction::decode;
use crate::keypad::Keypad;
use crate::state::State;
use crate::NUM_KEYS;

/// Where the engine is in its fetch/execute cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineStatus {
    /// Ready for the next [`Engine::step`].
    Fetching,
    /// Held only while a step is inside the dispatcher; [`Engine::status`]
    /// never reports it between calls.
    Executing,
    /// An `LD Vx, K` is pending; resumed by [`Engine::supply_key`].
    HaltedOnKey { register: u8 },
    /// Terminal until [`Engine::reset`].
    HaltedOnFault(Fault),
}

/// Outcome of one [`Engine::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepResult {
    Continue,
    AwaitingKey,
    Fault(Fault),
}

/// One virtual machine instance.
///
/// The engine never sleeps or keeps time: the host calls [`step`](Self::step)
/// at its instruction rate and [`tick_timers`](Self::tick_timers) at 60 Hz.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    state: State,
    keypad: Keypad,
    rng: StdRng,
    status: EngineStatus,
    /// instructions executed since the last reset
    cycles: u64,
}

impl Default for Engine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, HostError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Create an engine and load `program` at the configured start address.
    pub fn with_program(config: EngineConfig, program: &[u8]) -> Result<Self, HostError> {
        let mut engine = Self::new(config)?;
        engine.load_program(program)?;
        Ok(engine)
    }

    fn build(config: EngineConfig) -> Self {
        let state = State::with_layout(config.program_start, config.font_address);
        let rng = Self::make_rng(&config);
        Self {
            config,
            state,
            keypad: Keypad::default(),
            rng,
            status: EngineStatus::Fetching,
            cycles: 0,
        }
    }

    fn make_rng(config: &EngineConfig) -> StdRng {
        match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Return to power-on state. The program has to be loaded again.
    pub fn reset(&mut self) {
        self.state.reset();
        self.keypad.release_all();
        self.rng = Self::make_rng(&self.config);
        self.status = EngineStatus::Fetching;
        self.cycles = 0;
        log::info!("engine reset, pc={:#05X}", self.state.pc());
    }

    pub fn load_program(&mut self, program: &[u8]) -> Result<(), HostError> {
        self.state.load_program(program)?;
        log::info!(
            "loaded {} program bytes at {:#05X}",
            program.len(),
            self.config.program_start
        );
        Ok(())
    }

    /// Run one fetch/decode/execute cycle.
    ///
    /// While halted this does nothing and repeats the halting result.
    pub fn step(&mut self) -> StepResult {
        match self.status {
            EngineStatus::HaltedOnFault(fault) => return StepResult::Fault(fault),
            EngineStatus::HaltedOnKey { .. } => return StepResult::AwaitingKey,
            EngineStatus::Fetching | EngineStatus::Executing => {}
        }

        let pc = self.state.pc();
        match self.cycle(pc) {
            Ok(action) => self.apply(action),
            Err(fault) => {
                log::warn!("halting on fault at {:#05X}: {}", pc, fault);
                self.status = EngineStatus::HaltedOnFault(fault);
                StepResult::Fault(fault)
            }
        }
    }

    fn cycle(&mut self, pc: u16) -> Result<PcAction, Fault> {
        self.status = EngineStatus::Fetching;
        let opcode = self.state.read_word(pc)?;
        let instruction = decode(opcode)?;
        log::trace!("{:03X}: {:04X}  {}", pc, opcode, instruction);

        self.status = EngineStatus::Executing;
        let action = dispatch::execute(&instruction, &mut self.state, &self.keypad, &mut self.rng)?;
        self.cycles += 1;
        Ok(action)
    }

    fn apply(&mut self, action: PcAction) -> StepResult {
        let pc = self.state.pc();
        match action {
            PcAction::Advance => self.state.set_pc(pc.wrapping_add(2)),
            PcAction::SkipNext => self.state.set_pc(pc.wrapping_add(4)),
            PcAction::Jump(addr) => self.state.set_pc(addr),
            PcAction::AwaitKey { register } => {
                log::debug!("waiting for a key into V{:X}", register);
                self.status = EngineStatus::HaltedOnKey { register };
                return StepResult::AwaitingKey;
            }
        }
        self.status = EngineStatus::Fetching;
        StepResult::Continue
    }

    /// Decrement the delay and sound timers. Call at 60 Hz.
    pub fn tick_timers(&mut self) {
        self.state.tick_timers();
    }

    /// Resolve a pending `LD Vx, K`: store `key` in Vx and move past the
    /// instruction.
    pub fn supply_key(&mut self, key: u8) -> Result<(), HostError> {
        if usize::from(key) >= NUM_KEYS {
            return Err(HostError::InvalidKey(key));
        }
        let EngineStatus::HaltedOnKey { register } = self.status else {
            return Err(HostError::NotAwaitingKey);
        };
        self.state.set_v(register, key);
        self.state.set_pc(self.state.pc().wrapping_add(2));
        self.status = EngineStatus::Fetching;
        log::debug!("key {:X} resolved wait into V{:X}", key, register);
        Ok(())
    }

    /// Report a key press or release. A press also resolves a pending
    /// key wait.
    pub fn set_key(&mut self, key: u8, pressed: bool) -> Result<(), HostError> {
        self.keypad.set(key, pressed)?;
        if pressed && matches!(self.status, EngineStatus::HaltedOnKey { .. }) {
            self.supply_key(key)?;
        }
        Ok(())
    }

    pub fn display(&self) -> &Framebuffer {
        self.state.screen()
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn status(&self) -> EngineStatus {
        self.status
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pc(&self) -> u16 {
        self.state.pc()
    }

    pub fn register(&self, reg: u8) -> u8 {
        self.state.v(reg)
    }

    pub fn index(&self) -> u16 {
        self.state.index()
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer()
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer()
    }

    /// Whether a host beeper should be sounding.
    pub fn is_sound_active(&self) -> bool {
        self.state.sound_timer() > 0
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}

#[cfg(test)]
mod tests;
