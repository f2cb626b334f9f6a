//! Dense hidden Markov model tables.
//!
//! All tables are stored flat and row-major:
//! - `start[s]`
//! - `transition[src * n_states + dst]`: rows are *source* states, columns are
//!   destination states,
//! - `emission[state * n_obs + obs]`.
//!
//! The tables hold values in whatever [`ProbDomain`] the caller decodes with:
//! plain probabilities for [`LinearViterbi`](crate::LinearViterbi), base-2 logs
//! for [`Log2Viterbi`](crate::Log2Viterbi). [`Hmm::to_log2`] converts the
//! former into the latter. Rows are not required to sum to one.

use crate::error::{DecodeError, DecodeResult, ModelError, ModelResult};
use crate::traits::{Log2, ProbDomain};

/// Hidden Markov model with a dense transition matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Hmm {
    n_states: usize,
    n_obs: usize,
    start: Vec<f64>,
    transition: Vec<f64>,
    emission: Vec<f64>,
}

fn check_len(table: &'static str, expected: usize, actual: usize) -> ModelResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ModelError::ShapeMismatch {
            table,
            expected,
            actual,
        })
    }
}

fn flatten_rows(table: &'static str, rows: &[Vec<f64>], width: usize) -> ModelResult<Vec<f64>> {
    let mut flat = Vec::with_capacity(rows.len() * width);
    for (row, values) in rows.iter().enumerate() {
        if values.len() != width {
            return Err(ModelError::RaggedRow {
                table,
                row,
                expected: width,
                actual: values.len(),
            });
        }
        flat.extend_from_slice(values);
    }
    Ok(flat)
}

impl Hmm {
    /// Build a model from flat tables.
    ///
    /// `n_obs` is the size of the observable alphabet and fixes the stride of
    /// the emission table.
    pub fn new(
        n_states: usize,
        n_obs: usize,
        start: Vec<f64>,
        transition: Vec<f64>,
        emission: Vec<f64>,
    ) -> ModelResult<Self> {
        if n_states == 0 {
            return Err(ModelError::NoStates);
        }
        if n_obs == 0 {
            return Err(ModelError::NoObservables);
        }
        check_len("start", n_states, start.len())?;
        check_len("transition", n_states * n_states, transition.len())?;
        check_len("emission", n_states * n_obs, emission.len())?;
        Ok(Self {
            n_states,
            n_obs,
            start,
            transition,
            emission,
        })
    }

    /// Build a model from nested rows: `transition[src][dst]`,
    /// `emission[state][obs]`.
    pub fn from_rows(
        start: Vec<f64>,
        transition: &[Vec<f64>],
        emission: &[Vec<f64>],
    ) -> ModelResult<Self> {
        let n_states = start.len();
        if n_states == 0 {
            return Err(ModelError::NoStates);
        }
        check_len("transition", n_states, transition.len())?;
        check_len("emission", n_states, emission.len())?;
        let n_obs = emission[0].len();
        let transition = flatten_rows("transition", transition, n_states)?;
        let emission = flatten_rows("emission", emission, n_obs)?;
        Self::new(n_states, n_obs, start, transition, emission)
    }

    /// Number of hidden states.
    #[inline]
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// Size of the observable alphabet.
    #[inline]
    pub fn n_obs(&self) -> usize {
        self.n_obs
    }

    #[inline]
    pub fn start(&self, state: usize) -> f64 {
        self.start[state]
    }

    #[inline]
    pub fn transition(&self, src: usize, dst: usize) -> f64 {
        self.transition[src * self.n_states + dst]
    }

    #[inline]
    pub fn emission(&self, state: usize, obs: usize) -> f64 {
        self.emission[state * self.n_obs + obs]
    }

    pub fn start_table(&self) -> &[f64] {
        &self.start
    }

    pub fn transition_table(&self) -> &[f64] {
        &self.transition
    }

    pub fn emission_table(&self) -> &[f64] {
        &self.emission
    }

    /// Apply `f` to every table entry, keeping the shape.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            n_states: self.n_states,
            n_obs: self.n_obs,
            start: self.start.iter().map(|&p| f(p)).collect(),
            transition: self.transition.iter().map(|&p| f(p)).collect(),
            emission: self.emission.iter().map(|&p| f(p)).collect(),
        }
    }

    /// Convert a model of plain probabilities into base-2 log probabilities.
    pub fn to_log2(&self) -> Self {
        self.map_values(Log2::from_prob)
    }

    /// Check that `obs` is non-empty and every symbol is in the alphabet.
    pub fn check_observations(&self, obs: &[usize]) -> DecodeResult<()> {
        if obs.is_empty() {
            return Err(DecodeError::EmptySequence);
        }
        match obs.iter().position(|&o| o >= self.n_obs) {
            Some(index) => Err(DecodeError::ObservationOutOfRange {
                index,
                value: obs[index],
                n_obs: self.n_obs,
            }),
            None => Ok(()),
        }
    }
}
