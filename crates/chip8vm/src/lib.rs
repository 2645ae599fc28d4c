use anyhow::{bail, Context, Result};
use chip8vm_core::{disassemble_program, Engine, EngineConfig, Line, StepResult};

pub enum Command {
    Run(RunOptions),
    Disasm,
}

/// Options for the headless runner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    /// Upper bound on executed instructions.
    pub steps: u64,
    /// Instructions per 60 Hz frame; the timers tick once per frame.
    pub instructions_per_frame: u32,
    pub seed: Option<u64>,
    /// Print the framebuffer when the run ends.
    pub dump: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            steps: 10_000,
            instructions_per_frame: 11,
            seed: None,
            dump: false,
        }
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = value.with_context(|| format!("missing value for {}", flag))?;
    value
        .parse()
        .with_context(|| format!("invalid value '{}' for {}", value, flag))
}

/// Parse the flags that follow `run <rom>`.
pub fn parse_run_options(args: impl IntoIterator<Item = String>) -> Result<RunOptions> {
    let mut options = RunOptions::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--steps" => options.steps = parse_value("--steps", args.next())?,
            "--ipf" => options.instructions_per_frame = parse_value("--ipf", args.next())?,
            "--seed" => options.seed = Some(parse_value("--seed", args.next())?),
            "--dump" => options.dump = true,
            other => bail!("unknown option '{}'", other),
        }
    }
    if options.instructions_per_frame == 0 {
        bail!("--ipf must be at least 1");
    }
    Ok(options)
}

/// Load `rom` and drive the engine until the step budget runs out or the
/// program waits for a key. A fault ends the run with an error.
pub fn run_program(rom: &[u8], options: &RunOptions) -> Result<Engine> {
    let config = EngineConfig::builder().rng_seed(options.seed).build();
    let mut engine = Engine::with_program(config, rom).context("failed to load program")?;
    let ipf = u64::from(options.instructions_per_frame);

    for step in 0..options.steps {
        if step > 0 && step % ipf == 0 {
            engine.tick_timers();
        }
        match engine.step() {
            StepResult::Continue => {}
            StepResult::AwaitingKey => {
                log::info!(
                    "program waits for a key after {} instructions, stopping",
                    engine.cycles()
                );
                break;
            }
            StepResult::Fault(fault) => {
                bail!("engine halted at {:#05X}: {}", engine.pc(), fault);
            }
        }
    }

    log::info!(
        "ran {} instructions, pc={:#05X}",
        engine.cycles(),
        engine.pc()
    );
    Ok(engine)
}

pub fn disassemble_rom(rom: &[u8]) -> Vec<Line> {
    disassemble_program(rom, EngineConfig::default().program_start)
}
