use intcode::virtual_machine::errors::VMError;
use intcode::virtual_machine::program::Program;
use intcode::virtual_machine::vm::{ExecState, Limits, VM, run_to_halt};

/// Adds `[noun]` and `[verb]` into address 0, then multiplies by `[19]`.
const GRAVITY: &str = "1,0,0,0,2,0,19,0,99,0,0,0,0,0,0,0,0,0,0,10";

fn program(source: &str) -> Program {
    source.parse().expect("invalid program text")
}

fn run_with(noun: i64, verb: i64) -> i64 {
    let mut vm = VM::new(&program(GRAVITY));
    vm.poke(1, noun);
    vm.poke(2, verb);
    assert_eq!(vm.run().unwrap(), ExecState::Halted);
    vm.peek(0)
}

#[test]
fn patched_noun_and_verb() {
    // Noun 1 and verb 2 point at the patched words themselves.
    assert_eq!(run_with(1, 2), (1 + 2) * 10);
    assert_eq!(run_with(19, 19), 200);
}

#[test]
fn search_for_target_output() {
    let found = (0..20)
        .flat_map(|noun| (0..20).map(move |verb| (noun, verb)))
        .find(|&(noun, verb)| run_with(noun, verb) == 290);
    assert_eq!(found, Some((2, 19)));
}

#[test]
fn program_text_round_trips_through_display() {
    let program = program(GRAVITY);
    assert_eq!(program.to_string(), GRAVITY);
}

#[test]
fn run_to_halt_with_all_inputs() {
    let echo = program("3,0,4,0,3,0,4,0,99");
    assert_eq!(
        run_to_halt(&echo, &[5, 6], Limits::default()).unwrap(),
        [5, 6]
    );
    assert_eq!(
        run_to_halt(&echo, &[5], Limits::default()).unwrap_err(),
        VMError::UnexpectedSuspend { offset: 4 }
    );
}

#[test]
fn malformed_program_text() {
    assert_eq!(
        "1,0,x,99".parse::<Program>().unwrap_err(),
        VMError::ParseError {
            token: "x".to_string(),
            index: 2,
        }
    );
    assert_eq!("  \n".parse::<Program>().unwrap_err(), VMError::EmptyProgram);
}
