use super::*;
use crate::error::{DecodeFault, StackFault};
use crate::STACK_SIZE;

fn program(opcodes: &[u16]) -> Vec<u8> {
    opcodes.iter().flat_map(|op| op.to_be_bytes()).collect()
}

fn engine_with(opcodes: &[u16]) -> Engine {
    let config = EngineConfig::builder().rng_seed(Some(1)).build();
    Engine::with_program(config, &program(opcodes)).unwrap()
}

#[test]
fn add_program_runs_then_spins_on_jump() {
    let mut engine = engine_with(&[0x00E0, 0x6005, 0x6105, 0x8014, 0x1208]);
    for _ in 0..4 {
        assert_eq!(engine.step(), StepResult::Continue);
    }
    assert_eq!(engine.register(0), 10);
    assert_eq!(engine.register(0xF), 0);
    assert_eq!(engine.pc(), 0x208);

    for _ in 0..10 {
        assert_eq!(engine.step(), StepResult::Continue);
        assert_eq!(engine.pc(), 0x208);
    }
    assert_eq!(engine.register(0), 10);
    assert_eq!(engine.cycles(), 14);
}

#[test]
fn add_program_jumping_to_start_keeps_looping() {
    // Same program but the final jump goes back to 0x200.
    let mut engine = engine_with(&[0x00E0, 0x6005, 0x6105, 0x8014, 0x1200]);
    for _ in 0..4 {
        engine.step();
    }
    assert_eq!(engine.register(0), 10);
    assert_eq!(engine.register(0xF), 0);
    assert_eq!(engine.step(), StepResult::Continue);
    assert_eq!(engine.pc(), 0x200);
}

#[test]
fn skip_moves_pc_by_four() {
    let mut engine = engine_with(&[0x3000, 0x6001, 0x6102]);
    engine.step();
    assert_eq!(engine.pc(), 0x204);
    engine.step();
    assert_eq!(engine.register(0), 0);
    assert_eq!(engine.register(1), 2);
}

#[test]
fn sixteen_nested_calls_fit_and_the_seventeenth_faults() {
    // Each subroutine at 0x200 + 2k calls the next word.
    let calls: Vec<u16> = (0..=STACK_SIZE as u16)
        .map(|k| 0x2000 | (0x202 + 2 * k))
        .collect();
    let mut engine = engine_with(&calls);
    for depth in 1..=STACK_SIZE {
        assert_eq!(engine.step(), StepResult::Continue);
        assert_eq!(engine.state().stack_pointer(), depth);
    }
    let pc_before = engine.pc();
    let fault = Fault::Stack(StackFault::Overflow { depth: STACK_SIZE });
    assert_eq!(engine.step(), StepResult::Fault(fault));
    assert_eq!(engine.status(), EngineStatus::HaltedOnFault(fault));
    assert_eq!(engine.pc(), pc_before);
    assert_eq!(engine.state().stack_pointer(), STACK_SIZE);
}

#[test]
fn returns_unwind_in_reverse_call_order() {
    // 200: CALL 208 / 202: LD V0,1 / 204: JP 204
    // 208: CALL 20E / 20A: LD V1,1 / 20C: RET
    // 20E: RET
    let mut engine = engine_with(&[
        0x2208, 0x6001, 0x1204, 0x0000, 0x220E, 0x6101, 0x00EE, 0x00EE,
    ]);
    engine.step();
    engine.step();
    assert_eq!(engine.state().stack(), &[0x202, 0x20A]);

    engine.step();
    assert_eq!(engine.pc(), 0x20A);
    engine.step();
    engine.step();
    assert_eq!(engine.pc(), 0x202);
    engine.step();
    assert_eq!(engine.register(0), 1);
    assert_eq!(engine.register(1), 1);
    assert_eq!(engine.state().stack_pointer(), 0);
}

#[test]
fn status_between_steps_is_never_executing() {
    let mut engine = engine_with(&[0x6001, 0xF00A, 0xFFFF]);
    assert_eq!(engine.status(), EngineStatus::Fetching);
    assert_eq!(engine.step(), StepResult::Continue);
    assert_eq!(engine.status(), EngineStatus::Fetching);
    assert_eq!(engine.step(), StepResult::AwaitingKey);
    assert_eq!(engine.status(), EngineStatus::HaltedOnKey { register: 0 });
    engine.supply_key(3).unwrap();
    assert_eq!(engine.status(), EngineStatus::Fetching);
    assert!(matches!(engine.step(), StepResult::Fault(_)));
    assert!(matches!(engine.status(), EngineStatus::HaltedOnFault(_)));
}

#[test]
fn undecodable_opcode_halts_until_reset() {
    let mut engine = engine_with(&[0x6001, 0xFFFF, 0x6002]);
    assert_eq!(engine.step(), StepResult::Continue);

    let fault = Fault::Decode(DecodeFault { opcode: 0xFFFF });
    assert_eq!(engine.step(), StepResult::Fault(fault));
    assert_eq!(engine.pc(), 0x202);

    // stays halted without executing anything
    assert_eq!(engine.step(), StepResult::Fault(fault));
    assert_eq!(engine.register(0), 1);
    assert_eq!(engine.cycles(), 1);

    engine.reset();
    assert_eq!(engine.status(), EngineStatus::Fetching);
    assert_eq!(engine.pc(), 0x200);
    assert_eq!(engine.register(0), 0);
    assert_eq!(engine.cycles(), 0);
}

#[test]
fn fetch_straddling_end_of_memory_is_a_memory_fault() {
    // JP V0, $201 leaves PC odd; the zero words that follow are SYS no-ops,
    // so PC walks up to 0xFFFF where the low opcode byte is out of range.
    let mut engine = engine_with(&[0xB201]);
    let mut result = StepResult::Continue;
    for _ in 0..0x8000 {
        result = engine.step();
        if result != StepResult::Continue {
            break;
        }
    }
    let fault = Fault::Memory {
        addr: 0xFFFF,
        len: 2,
    };
    assert_eq!(result, StepResult::Fault(fault));
    assert_eq!(engine.pc(), 0xFFFF);
    assert_eq!(engine.status(), EngineStatus::HaltedOnFault(fault));
}

#[test]
fn wait_key_blocks_until_supplied() {
    let mut engine = engine_with(&[0xF30A, 0x6101]);
    assert_eq!(engine.step(), StepResult::AwaitingKey);
    assert_eq!(engine.status(), EngineStatus::HaltedOnKey { register: 3 });
    assert_eq!(engine.pc(), 0x200);

    // stepping while halted neither advances nor executes
    assert_eq!(engine.step(), StepResult::AwaitingKey);
    assert_eq!(engine.pc(), 0x200);
    assert_eq!(engine.register(1), 0);

    assert_eq!(engine.supply_key(0x10), Err(HostError::InvalidKey(0x10)));
    engine.supply_key(0xB).unwrap();
    assert_eq!(engine.register(3), 0xB);
    assert_eq!(engine.pc(), 0x202);
    assert_eq!(engine.status(), EngineStatus::Fetching);

    assert_eq!(engine.step(), StepResult::Continue);
    assert_eq!(engine.register(1), 1);
}

#[test]
fn supplying_a_key_without_a_wait_is_rejected() {
    let mut engine = engine_with(&[0x6101]);
    assert_eq!(engine.supply_key(1), Err(HostError::NotAwaitingKey));
}

#[test]
fn key_press_resolves_wait() {
    let mut engine = engine_with(&[0xF00A, 0xE09E]);
    engine.step();
    engine.set_key(0x5, true).unwrap();
    assert_eq!(engine.register(0), 0x5);
    assert_eq!(engine.pc(), 0x202);

    // key is still held, so SKP V0 skips
    engine.step();
    assert_eq!(engine.pc(), 0x206);
}

#[test]
fn timers_only_move_on_tick() {
    let mut engine = engine_with(&[0x6003, 0xF015, 0xF018, 0x1206]);
    for _ in 0..4 {
        engine.step();
    }
    assert_eq!(engine.delay_timer(), 3);
    assert!(engine.is_sound_active());

    for _ in 0..5 {
        engine.tick_timers();
    }
    assert_eq!(engine.delay_timer(), 0);
    assert_eq!(engine.sound_timer(), 0);
    assert!(!engine.is_sound_active());
}

#[test]
fn draws_font_glyph_through_the_engine() {
    // LD V0,0 / LD F,V0 / DRW V1,V1,5
    let mut engine = engine_with(&[0x6000, 0xF029, 0xD115]);
    for _ in 0..3 {
        engine.step();
    }
    // glyph "0" is a 4x5 box with 14 lit pixels
    assert_eq!(engine.display().lit_count(), 14);
    assert!(engine.display().pixel(0, 0));
    assert!(!engine.display().pixel(1, 1));
    assert_eq!(engine.register(0xF), 0);
}

#[test]
fn seeded_engines_agree_on_random_values() {
    let mut a = engine_with(&[0xC0FF, 0xC1FF]);
    let mut b = engine_with(&[0xC0FF, 0xC1FF]);
    for _ in 0..2 {
        a.step();
        b.step();
    }
    assert_eq!(a.register(0), b.register(0));
    assert_eq!(a.register(1), b.register(1));
}

#[test]
fn rejects_invalid_config_and_oversized_programs() {
    let bad = EngineConfig::builder().program_start(0x201).build();
    assert!(matches!(Engine::new(bad), Err(HostError::InvalidConfig(_))));

    let huge = vec![0u8; 0x1000];
    assert!(matches!(
        Engine::with_program(EngineConfig::default(), &huge),
        Err(HostError::ProgramTooLarge { .. })
    ));
}

#[test]
fn engine_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<Engine>();
}
