use crate::engine::ViterbiEngine;
use crate::hmm::Hmm;
use crate::traits::ProbDomain;

/// Pre-sizes the scratch state of a [`ViterbiEngine`].
///
/// Without hints the engine starts empty and grows on first decode.
#[derive(Clone, Debug, Default)]
pub struct EngineBuilder {
    n_states: Option<usize>,
    max_seq_len: Option<usize>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_states(mut self, n_states: usize) -> Self {
        self.n_states = Some(n_states);
        self
    }
    /// Take the state count from a model.
    pub fn for_model(self, hmm: &Hmm) -> Self {
        self.with_states(hmm.n_states())
    }
    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = Some(max_seq_len);
        self
    }
    pub fn build<D: ProbDomain>(self) -> ViterbiEngine<D> {
        match (self.n_states, self.max_seq_len) {
            (Some(n), Some(t)) => ViterbiEngine::with_capacity(n, t),
            (Some(n), None) => ViterbiEngine::with_capacity(n, 1),
            _ => ViterbiEngine::new(),
        }
    }
}
