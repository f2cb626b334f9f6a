//! Forward-Viterbi decoding for dense hidden Markov models.
//!
//! Given an observation sequence and an HMM's start, transition and emission
//! tables, a decode returns:
//! - the single most likely hidden-state sequence (Viterbi path) and its
//!   probability, and
//! - the total probability of the observations over *all* paths (the forward
//!   sum).
//!
//! Both quantities come out of one dynamic-programming pass. The best paths
//! are kept in a [`TrellisArena`](arena::TrellisArena) of backward-linked
//! nodes that share common prefixes, and copied out into an owned
//! [`ViterbiResult`] at the end.
//!
//! ## Two probability domains
//! - [`LinearViterbi`] works in plain probabilities. Simple, but products
//!   underflow on long sequences.
//! - [`Log2Viterbi`] works in base-2 log probabilities and sums with
//!   [`log2_add`](utils::log2_add). Results stay in log2 units until
//!   [`ViterbiResult::exp2`].
//!
//! ## Quick start
//! ```
//! use forward_viterbi::{Hmm, LinearViterbi};
//!
//! // states: rainy, sunny; observations: walk, shop, clean
//! let hmm = Hmm::from_rows(
//!     vec![0.6, 0.4],
//!     &[vec![0.7, 0.3], vec![0.4, 0.6]],
//!     &[vec![0.1, 0.4, 0.5], vec![0.6, 0.3, 0.1]],
//! )
//! .unwrap();
//!
//! let mut engine = LinearViterbi::new();
//! let res = engine.decode(&hmm, &[0, 1, 2]).unwrap();
//! assert_eq!(res.sequence, vec![1, 0, 0]);
//! assert!((res.prob - 0.01344).abs() < 1e-9);
//! ```
//!
//! Engines keep their scratch buffers between decodes. They are not shared
//! between threads; with the `parallel` feature, `engine::decode_batch`
//! gives each rayon worker its own engine.

pub mod arena;
pub mod builder;
pub mod engine;
pub mod error;
pub mod hmm;
pub mod result;
pub mod storage;
pub mod traits;
pub mod utils;

pub use crate::builder::EngineBuilder;
pub use crate::engine::{forward_viterbi, forward_viterbi_log2, LinearViterbi, Log2Viterbi, ViterbiEngine};
pub use crate::error::{DecodeError, ModelError};
pub use crate::hmm::Hmm;
pub use crate::result::ViterbiResult;
pub use crate::traits::{Linear, Log2, ProbDomain};
