#![cfg(feature = "heavy")]
use forward_viterbi::{Hmm, Log2Viterbi};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_log_hmm(rng: &mut StdRng, n_states: usize, n_obs: usize) -> Hmm {
    let mut table = |len: usize| (0..len).map(|_| rng.gen_range(0.01f64..1.0)).collect::<Vec<_>>();
    let start = table(n_states);
    let transition = table(n_states * n_states);
    let emission = table(n_states * n_obs);
    Hmm::new(n_states, n_obs, start, transition, emission)
        .unwrap()
        .to_log2()
}

#[test]
fn heavy_stress_log2_long_sequence() {
    let mut rng = StdRng::seed_from_u64(123);
    let hmm = random_log_hmm(&mut rng, 16, 8);
    let obs: Vec<usize> = (0..200_000).map(|_| rng.gen_range(0..8)).collect();
    let mut engine = Log2Viterbi::new();
    let res = engine.decode(&hmm, &obs).unwrap();
    assert_eq!(res.n(), obs.len());
    assert!(res.prob.is_finite() && res.total.is_finite());
    assert!(res.prob <= res.total);
    assert!(engine.arena().capacity() >= 16 * (obs.len() + 1));
}
