//! Forward-Viterbi engine.
//!
//! One pass over the observations computes, for every state and time step:
//! - the forward probability (mass of *all* paths ending there), and
//! - the Viterbi probability (mass of the single best path ending there),
//!
//! while the best paths themselves are recorded in a [`TrellisArena`]. The
//! engine is generic over the [`ProbDomain`]; [`LinearViterbi`] and
//! [`Log2Viterbi`] are the two instantiations.
//!
//! Scratch state (two per-state work arrays and the arena) is owned by the
//! engine and reused across decodes, so repeated decodes of similar size do
//! not allocate beyond the result itself. `decode` takes `&mut self`; use one
//! engine per thread.

use crate::arena::{NodeId, TrellisArena};
use crate::error::DecodeResult;
use crate::hmm::Hmm;
use crate::result::ViterbiResult;
use crate::storage::{request_storage, Growth};
use crate::traits::{Linear, Log2, ProbDomain};
use std::marker::PhantomData;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Running record for one state at the current time step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct WorkState {
    total: f64,
    best_prob: f64,
    best_path: NodeId,
}

/// Forward-Viterbi decoder over probabilities represented by `D`.
pub struct ViterbiEngine<D: ProbDomain> {
    arena: TrellisArena,
    last: Vec<WorkState>,
    next: Vec<WorkState>,
    _domain: PhantomData<fn() -> D>,
}

/// Decoder for tables of plain probabilities.
pub type LinearViterbi = ViterbiEngine<Linear>;

/// Decoder for tables of base-2 log probabilities.
pub type Log2Viterbi = ViterbiEngine<Log2>;

impl<D: ProbDomain> Default for ViterbiEngine<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: ProbDomain> ViterbiEngine<D> {
    /// Engine with empty scratch state; it grows on first use.
    pub fn new() -> Self {
        Self {
            arena: TrellisArena::new(),
            last: Vec::new(),
            next: Vec::new(),
            _domain: PhantomData,
        }
    }

    /// Engine whose scratch state already fits `n_states` states over
    /// `n_seq` observations.
    pub fn with_capacity(n_states: usize, n_seq: usize) -> Self {
        let mut engine = Self::new();
        engine.prepare(n_states, n_seq);
        engine
    }

    /// Arena holding the trellis of the most recent decode.
    pub fn arena(&self) -> &TrellisArena {
        &self.arena
    }

    /// Current capacity of the per-state work arrays.
    pub fn work_capacity(&self) -> usize {
        self.last.capacity().min(self.next.capacity())
    }

    /// Decode `obs`, checking it against the model first.
    pub fn decode(&mut self, hmm: &Hmm, obs: &[usize]) -> DecodeResult<ViterbiResult> {
        hmm.check_observations(obs)?;
        Ok(self.decode_unchecked(hmm, obs))
    }

    /// Decode `obs` without validating it.
    ///
    /// # Panics
    /// Panics if `obs` is empty or contains a symbol outside the model's
    /// alphabet.
    pub fn decode_unchecked(&mut self, hmm: &Hmm, obs: &[usize]) -> ViterbiResult {
        assert!(!obs.is_empty(), "observation sequence must be non-empty");
        let n_states = hmm.n_states();

        #[cfg(feature = "tracing")]
        let span = tracing::info_span!(
            "viterbi_decode",
            domain = D::NAME,
            n_states,
            n_seq = obs.len()
        );
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        self.prepare(n_states, obs.len());
        self.initialize(hmm, obs[0]);
        for (_t, &symbol) in obs.iter().enumerate().skip(1) {
            #[cfg(feature = "tracing")]
            let span = tracing::trace_span!("forward_step", t = _t, symbol);
            #[cfg(feature = "tracing")]
            let _enter = span.enter();
            self.step(hmm, symbol);
            std::mem::swap(&mut self.last, &mut self.next);
        }
        let result = self.terminate();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            nodes = self.arena.len(),
            prob = result.prob,
            total = result.total,
            "decode finished"
        );
        result
    }

    /// Decode several sequences in order, reusing this engine's scratch state.
    pub fn decode_many<S>(&mut self, hmm: &Hmm, sequences: &[S]) -> Vec<DecodeResult<ViterbiResult>>
    where
        S: AsRef<[usize]>,
    {
        sequences
            .iter()
            .map(|obs| self.decode(hmm, obs.as_ref()))
            .collect()
    }

    /// Size scratch storage for a run and drop the previous trellis.
    fn prepare(&mut self, n_states: usize, n_seq: usize) {
        self.arena.reset();
        self.arena.reserve(n_states * (n_seq + 1));
        request_storage(&mut self.last, n_states, Growth::Discard, D::NAME);
        request_storage(&mut self.next, n_states, Growth::Discard, D::NAME);
        self.last.clear();
        self.next.clear();
    }

    /// Time step 0: every state starts its own path.
    fn initialize(&mut self, hmm: &Hmm, symbol: usize) {
        for s in 0..hmm.n_states() {
            let p = D::extend(hmm.start(s), hmm.emission(s, symbol));
            let node = self.arena.push(s, None);
            self.last.push(WorkState {
                total: p,
                best_prob: p,
                best_path: node,
            });
        }
    }

    /// Fill `next` from `last` for one observation.
    ///
    /// Forward sums fold from `D::zero()` over sources in ascending order. The
    /// best source is seeded with source 0 and replaced only by a strictly
    /// greater candidate, so ties go to the lowest source index and every
    /// destination gets a path even when all candidates are impossible.
    fn step(&mut self, hmm: &Hmm, symbol: usize) {
        let Self {
            arena, last, next, ..
        } = self;
        next.clear();
        for dst in 0..hmm.n_states() {
            let emit = hmm.emission(dst, symbol);
            let mut total = D::zero();
            let mut best_src = 0;
            let mut best = D::zero();
            for (src, prev) in last.iter().enumerate() {
                let p = D::extend(hmm.transition(src, dst), emit);
                total = D::combine(total, D::extend(prev.total, p));
                let cand = D::extend(prev.best_prob, p);
                if src == 0 || cand > best {
                    best = cand;
                    best_src = src;
                }
            }
            let node = arena.push(dst, Some(last[best_src].best_path));
            next.push(WorkState {
                total,
                best_prob: best,
                best_path: node,
            });
        }
    }

    /// Pick the best final state and sum all final forward probabilities.
    fn terminate(&self) -> ViterbiResult {
        let mut total = D::zero();
        let mut best = 0;
        // Ascending scan with strict `>`: ties go to the lowest state index.
        for (s, state) in self.last.iter().enumerate() {
            total = D::combine(total, state.total);
            if state.best_prob > self.last[best].best_prob {
                best = s;
            }
        }
        let winner = &self.last[best];
        ViterbiResult::from_path(&self.arena, winner.best_path, total, winner.best_prob)
    }
}

/// One-shot linear-domain decode with a throwaway engine.
pub fn forward_viterbi(hmm: &Hmm, obs: &[usize]) -> DecodeResult<ViterbiResult> {
    LinearViterbi::new().decode(hmm, obs)
}

/// One-shot log2-domain decode with a throwaway engine.
///
/// `hmm` must hold base-2 log probabilities (see [`Hmm::to_log2`]).
pub fn forward_viterbi_log2(hmm: &Hmm, obs: &[usize]) -> DecodeResult<ViterbiResult> {
    Log2Viterbi::new().decode(hmm, obs)
}

/// Decode many sequences in parallel, one engine per worker thread.
///
/// Results come back in input order.
#[cfg(feature = "parallel")]
pub fn decode_batch<D, S>(hmm: &Hmm, sequences: &[S]) -> Vec<DecodeResult<ViterbiResult>>
where
    D: ProbDomain,
    S: AsRef<[usize]> + Sync,
{
    #[cfg(feature = "tracing")]
    let span = tracing::info_span!("decode_batch", domain = D::NAME, count = sequences.len());
    #[cfg(feature = "tracing")]
    let _enter = span.enter();

    sequences
        .par_iter()
        .map_init(ViterbiEngine::<D>::new, |engine, obs| {
            engine.decode(hmm, obs.as_ref())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;

    fn rainy_sunny() -> Hmm {
        Hmm::from_rows(
            vec![0.6, 0.4],
            &[vec![0.7, 0.3], vec![0.4, 0.6]],
            &[vec![0.1, 0.4, 0.5], vec![0.6, 0.3, 0.1]],
        )
        .unwrap()
    }

    #[test]
    fn two_state_weather_linear() {
        let hmm = rainy_sunny();
        let res = LinearViterbi::new().decode(&hmm, &[0, 1, 2]).unwrap();
        assert!((res.prob - 0.01344).abs() < 1e-9, "prob = {}", res.prob);
        assert_eq!(res.sequence, vec![1, 0, 0]);
        assert!((res.total - 0.033612).abs() < 1e-9, "total = {}", res.total);
    }

    #[test]
    fn two_state_weather_log2() {
        let hmm = rainy_sunny().to_log2();
        let res = Log2Viterbi::new().decode(&hmm, &[0, 1, 2]).unwrap().exp2();
        assert!((res.prob - 0.01344).abs() < 1e-9, "prob = {}", res.prob);
        assert!((res.total - 0.033612).abs() < 1e-9, "total = {}", res.total);
        assert_eq!(res.sequence, vec![1, 0, 0]);
    }

    #[test]
    fn arena_holds_one_node_per_state_per_step() {
        let hmm = rainy_sunny();
        let mut engine = LinearViterbi::new();
        engine.decode(&hmm, &[0, 1, 2, 2, 1]).unwrap();
        assert_eq!(engine.arena().len(), 2 * 5);
        assert!(engine.arena().capacity() >= 2 * 6);
        assert!(engine.work_capacity() >= 2);
    }

    #[test]
    fn scratch_is_reused_between_decodes() {
        let hmm = rainy_sunny();
        let mut engine = LinearViterbi::with_capacity(2, 16);
        let cap = engine.arena().capacity();
        let a = engine.decode(&hmm, &[2, 2, 0, 1]).unwrap();
        let b = engine.decode(&hmm, &[2, 2, 0, 1]).unwrap();
        assert_eq!(a, b);
        assert_eq!(engine.arena().capacity(), cap);
    }

    #[test]
    fn single_observation_is_argmax_of_start_times_emission() {
        let hmm = rainy_sunny();
        // walk: 0.6*0.1 = 0.06 vs 0.4*0.6 = 0.24
        let res = forward_viterbi(&hmm, &[0]).unwrap();
        assert_eq!(res.sequence, vec![1]);
        assert!((res.prob - 0.24).abs() < 1e-12);
        assert!((res.total - 0.30).abs() < 1e-12);
    }

    #[test]
    fn rejects_invalid_observations() {
        let hmm = rainy_sunny();
        let mut engine = LinearViterbi::new();
        assert_eq!(engine.decode(&hmm, &[]), Err(DecodeError::EmptySequence));
        assert!(matches!(
            engine.decode(&hmm, &[0, 9]),
            Err(DecodeError::ObservationOutOfRange { index: 1, value: 9, .. })
        ));
    }

    #[test]
    #[should_panic(expected = "non-empty")]
    fn unchecked_decode_panics_on_empty_input() {
        let hmm = rainy_sunny();
        LinearViterbi::new().decode_unchecked(&hmm, &[]);
    }

    #[test]
    fn impossible_destinations_still_get_a_path() {
        let hmm = Hmm::from_rows(
            vec![1.0, 0.0],
            &[vec![1.0, 0.0], vec![0.0, 1.0]],
            &[vec![1.0, 0.0], vec![1.0, 0.0]],
        )
        .unwrap();
        let res = forward_viterbi(&hmm, &[1, 1, 1]).unwrap();
        assert_eq!(res.n(), 3);
        assert_eq!(res.prob, 0.0);
        assert_eq!(res.total, 0.0);
        assert_eq!(res.sequence, vec![0, 0, 0]);
    }

    #[test]
    fn decode_many_matches_individual_decodes() {
        let hmm = rainy_sunny();
        let seqs = vec![vec![0, 1, 2], vec![2], vec![1, 1, 0, 2]];
        let mut engine = LinearViterbi::new();
        let batch = engine.decode_many(&hmm, &seqs);
        for (obs, got) in seqs.iter().zip(batch) {
            assert_eq!(got.unwrap(), forward_viterbi(&hmm, obs).unwrap());
        }
    }
}
