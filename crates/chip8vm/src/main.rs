use anyhow::{Context, Result};
use chip8vm::Command;

const USAGE: &str = "usage:\n  \
    chip8vm run <rom> [--steps N] [--ipf N] [--seed N] [--dump]\n  \
    chip8vm disasm <rom>";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_default();
    let Some(rom_path) = args.next() else {
        eprintln!("{}", USAGE);
        std::process::exit(1);
    };

    let command = match command.as_str() {
        "run" => Command::Run(chip8vm::parse_run_options(args)?),
        "disasm" | "disassemble" => Command::Disasm,
        other => {
            eprintln!("Unknown command '{}'.\n{}", other, USAGE);
            std::process::exit(1);
        }
    };

    log::info!("Loading ROM path: '{}'", rom_path);
    let rom = std::fs::read(&rom_path)
        .with_context(|| format!("failed to read ROM file '{}'", rom_path))?;

    match command {
        Command::Run(options) => {
            let engine = chip8vm::run_program(&rom, &options)?;
            if options.dump {
                print!("{}", engine.display().render_text('#', '.'));
            }
        }
        Command::Disasm => {
            for line in chip8vm::disassemble_rom(&rom) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}
