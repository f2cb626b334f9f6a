//! Example: decoding the classic weather HMMs.
//!
//! Run with:
//! `cargo run --example weather`
//! or, to see the decode spans:
//! `RUST_LOG=trace cargo run --example weather --features tracing`

use forward_viterbi::{Hmm, LinearViterbi, Log2Viterbi, ViterbiResult};

const STATES: [&str; 3] = ["sunny", "cloudy", "rainy"];
const OBSERVABLES: [&str; 4] = ["dry", "dryish", "damp", "soggy"];

fn print_observations(obs: &[usize]) {
    println!("Observed sequence:");
    for (i, &o) in obs.iter().enumerate() {
        println!("\t{i:3}. {}", OBSERVABLES[o]);
    }
}

fn check(label: &str, res: &ViterbiResult, expected: f64) -> bool {
    print!("{}", res.display_with(&STATES));
    let err = res.prob - expected;
    if err.abs() > 1e-3 {
        println!("{label}: FAILED: expected probability of viterbi path to be {expected} (err: {err})");
        false
    } else {
        println!("{label}: PASSED");
        true
    }
}

fn main() {
    #[cfg(feature = "tracing")]
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Rows are source states, columns destination states.
    let hmm = Hmm::from_rows(
        vec![0.63, 0.17, 0.20],
        &[
            vec![0.5, 0.25, 0.25],
            vec![0.375, 0.125, 0.375],
            vec![0.125, 0.675, 0.375],
        ],
        &[
            vec![0.60, 0.20, 0.15, 0.05],
            vec![0.25, 0.25, 0.25, 0.25],
            vec![0.05, 0.10, 0.35, 0.50],
        ],
    )
    .expect("weather model tables are well formed");

    let obs = [0, 2, 3, 0, 2, 3];
    let expected = 2.5754047e-5;
    print_observations(&obs);

    let mut ok = true;
    let res = LinearViterbi::new()
        .decode(&hmm, &obs)
        .expect("observations are in range");
    ok &= check("linear", &res, expected);

    let res = Log2Viterbi::new()
        .decode(&hmm.to_log2(), &obs)
        .expect("observations are in range")
        .exp2();
    ok &= check("log2", &res, expected);

    if !ok {
        std::process::exit(1);
    }
}
