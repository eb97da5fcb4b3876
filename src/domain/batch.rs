//! Ordered batch results.

use std::ops::Index;

use crate::domain::outcome::RequestOutcome;

/// One outcome per dispatched request, ordered by request index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    outcomes: Vec<RequestOutcome>,
}

impl BatchResult {
    /// Build from outcomes in any order. They are sorted by index.
    pub fn from_outcomes(mut outcomes: Vec<RequestOutcome>) -> Self {
        outcomes.sort_by_key(|o| o.index);
        Self { outcomes }
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RequestOutcome> {
        self.outcomes.iter()
    }

    pub fn outcomes(&self) -> &[RequestOutcome] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<RequestOutcome> {
        self.outcomes
    }
}

impl Index<usize> for BatchResult {
    type Output = RequestOutcome;

    fn index(&self, index: usize) -> &Self::Output {
        &self.outcomes[index]
    }
}

impl<'a> IntoIterator for &'a BatchResult {
    type Item = &'a RequestOutcome;
    type IntoIter = std::slice::Iter<'a, RequestOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}
