//! Decoded results and the trellis-to-sequence extractor.

use crate::arena::{NodeId, TrellisArena};
use std::fmt;

/// Outcome of one decode.
///
/// `total` and `prob` are in the units of the engine that produced the result:
/// plain probabilities for [`LinearViterbi`](crate::LinearViterbi), base-2 logs
/// for [`Log2Viterbi`](crate::Log2Viterbi) (see [`ViterbiResult::exp2`]).
#[derive(Clone, Debug, PartialEq)]
pub struct ViterbiResult {
    /// Probability of the observations given the model, summed over all paths.
    pub total: f64,
    /// Probability of the most likely state sequence.
    pub prob: f64,
    /// Most likely state sequence, in chronological order.
    pub sequence: Vec<usize>,
}

impl ViterbiResult {
    /// Copy the path ending at `tail` out of the arena.
    ///
    /// The chain is walked twice: once to size the output exactly, once to fill
    /// it from the back so that the earliest state lands at index 0.
    pub fn from_path(arena: &TrellisArena, tail: NodeId, total: f64, prob: f64) -> Self {
        let mut remaining = arena.chain_len(tail);
        let mut sequence = vec![0; remaining];
        for state in arena.walk(tail) {
            remaining -= 1;
            sequence[remaining] = state;
        }
        debug_assert_eq!(remaining, 0);
        Self {
            total,
            prob,
            sequence,
        }
    }

    /// Length of the decoded sequence.
    #[inline]
    pub fn n(&self) -> usize {
        self.sequence.len()
    }

    /// Convert `total` and `prob` from base-2 logs into probabilities.
    pub fn exp2(mut self) -> Self {
        self.total = self.total.exp2();
        self.prob = self.prob.exp2();
        self
    }

    /// `(total, prob, sequence)`.
    pub fn into_parts(self) -> (f64, f64, Vec<usize>) {
        (self.total, self.prob, self.sequence)
    }

    /// Render the sequence using caller-supplied state names.
    pub fn display_with<'a>(&'a self, names: &'a [&'a str]) -> NamedResult<'a> {
        NamedResult {
            result: self,
            names,
        }
    }
}

impl fmt::Display for ViterbiResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "total {} prob {} :", self.total, self.prob)?;
        for s in &self.sequence {
            write!(f, " {s}")?;
        }
        Ok(())
    }
}

/// Multi-line rendering returned by [`ViterbiResult::display_with`].
pub struct NamedResult<'a> {
    result: &'a ViterbiResult,
    names: &'a [&'a str],
}

impl fmt::Display for NamedResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Viterbi Result:")?;
        writeln!(f, "\tTotal: {}", self.result.total)?;
        writeln!(f, "\t Prob: {}", self.result.prob)?;
        for (i, &s) in self.result.sequence.iter().enumerate() {
            match self.names.get(s) {
                Some(name) => writeln!(f, "\t{i:3}. {name}")?,
                None => writeln!(f, "\t{i:3}. <state {s}>")?,
            }
        }
        Ok(())
    }
}
