use intcode::pipeline::{Chain, Ring, Topology, max_signal};
use intcode::virtual_machine::program::Program;

const LINEAR: &str = "3,15,3,16,1002,16,10,16,1,16,15,15,4,15,99,0,0";
const FEEDBACK: &str = "3,26,1001,26,-4,26,3,27,1002,27,2,27,1,27,26,\
                        27,4,27,1001,28,-1,28,1005,28,6,99,0,0,5";

fn program(source: &str) -> Program {
    source.parse().expect("invalid program text")
}

#[test]
fn linear_chain_maximum() {
    let best = max_signal(&program(LINEAR), 0..=4, Topology::Chain).unwrap();
    assert_eq!(best.signal, 43210);
    assert_eq!(best.phases, [4, 3, 2, 1, 0]);
}

#[test]
fn feedback_ring_maximum() {
    let best = max_signal(&program(FEEDBACK), 5..=9, Topology::Ring).unwrap();
    assert_eq!(best.signal, 139629729);
    assert_eq!(best.phases, [9, 8, 7, 6, 5]);
}

#[test]
fn fixed_settings_match_search() {
    assert_eq!(
        Chain::new()
            .run(&program(LINEAR), &[4, 3, 2, 1, 0], 0)
            .unwrap(),
        43210
    );
    assert_eq!(
        Ring::new()
            .run(&program(FEEDBACK), &[9, 8, 7, 6, 5], 0)
            .unwrap(),
        139629729
    );
}

#[test]
fn ring_programs_are_not_reusable_as_chains() {
    // A feedback stage waits for a second signal the chain never sends.
    assert!(
        Chain::new()
            .run(&program(FEEDBACK), &[9, 8, 7, 6, 5], 0)
            .is_err()
    );
}
