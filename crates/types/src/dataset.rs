//! Labels, samples and datasets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sequence::Sequence;

// =============================================================================
// Label
// =============================================================================

/// Binary trade label, serialized as `0` (sell) or `1` (buy).
///
/// `Sell` covers both falling and flat/small-up outcomes: only a forward
/// return strictly above the threshold is a `Buy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Label {
    Sell = 0,
    Buy = 1,
}

impl Label {
    /// Both labels, in class-index order.
    pub const ALL: [Label; 2] = [Label::Sell, Label::Buy];

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// The other class.
    #[inline]
    pub fn opposite(self) -> Label {
        match self {
            Label::Sell => Label::Buy,
            Label::Buy => Label::Sell,
        }
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> u8 {
        label.as_u8()
    }
}

impl TryFrom<u8> for Label {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Label::Sell),
            1 => Ok(Label::Buy),
            other => Err(format!("label must be 0 or 1, got {other}")),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Sell => write!(f, "sell"),
            Label::Buy => write!(f, "buy"),
        }
    }
}

// =============================================================================
// Sample
// =============================================================================

/// One labeled training example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub sequence: Sequence,
    pub label: Label,
    /// Curriculum difficulty, set by the curriculum filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<f64>,
    /// True for samples generated by minority oversampling.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
}

impl Sample {
    pub fn new(sequence: Sequence, label: Label) -> Self {
        Self {
            sequence,
            label,
            difficulty: None,
            synthetic: false,
        }
    }

    /// Mark this sample as synthetically generated.
    pub fn into_synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// Per-class sample counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassCounts {
    pub sell: usize,
    pub buy: usize,
}

impl ClassCounts {
    #[inline]
    pub fn get(&self, label: Label) -> usize {
        match label {
            Label::Sell => self.sell,
            Label::Buy => self.buy,
        }
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.sell + self.buy
    }

    /// The class with fewer samples (`Buy` on ties).
    pub fn minority(&self) -> Label {
        if self.sell < self.buy {
            Label::Sell
        } else {
            Label::Buy
        }
    }

    /// True when either class has no samples.
    #[inline]
    pub fn has_empty_class(&self) -> bool {
        self.sell == 0 || self.buy == 0
    }
}

/// Ordered collection of samples.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn class_counts(&self) -> ClassCounts {
        self.samples
            .iter()
            .fold(ClassCounts::default(), |mut counts, s| {
                match s.label {
                    Label::Sell => counts.sell += 1,
                    Label::Buy => counts.buy += 1,
                }
                counts
            })
    }

    pub fn labels(&self) -> Vec<Label> {
        self.samples.iter().map(|s| s.label).collect()
    }

    pub fn sequences(&self) -> impl Iterator<Item = &Sequence> {
        self.samples.iter().map(|s| &s.sequence)
    }

    /// Split by position into `(head, tail)` without shuffling.
    ///
    /// `fraction` of the samples (floored, clamped to `[0, 1]`) go to the head,
    /// so a chronologically ordered dataset yields a leakage-free
    /// train/validation split.
    pub fn chronological_split(&self, fraction: f64) -> (Dataset, Dataset) {
        let cut = ((self.len() as f64) * fraction.clamp(0.0, 1.0)).floor() as usize;
        let (head, tail) = self.samples.split_at(cut.min(self.len()));
        (Dataset::new(head.to_vec()), Dataset::new(tail.to_vec()))
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl FromIterator<Sample> for Dataset {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Dataset::new(iter.into_iter().collect())
    }
}

// =============================================================================
// Tests
// =============================================================================
