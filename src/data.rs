//! Observed data and independent variables.
//!
//! A [`Series`] is a 1-D array of observations that may carry an integer index
//! label per position. Labelled series are [`Alignable`]: a shorter observed
//! series can be fitted against a longer independent-variable axis by
//! intersecting their labels. Unlabelled series are purely positional and must
//! match in length.

use std::collections::HashMap;

use ndarray::Array1;
use tracing::debug;

use crate::error::{ModelFitError, Result};

/// Values with optional per-position index labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    values: Array1<f64>,
    index: Option<Vec<i64>>,
}

impl Series {
    /// Positional series without labels.
    pub fn new(values: Array1<f64>) -> Self {
        Self {
            values,
            index: None,
        }
    }

    /// Labelled series. `index` must have one label per value.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelfit_rs::Series;
    /// use ndarray::array;
    ///
    /// let s = Series::indexed(array![1.0, 2.0], vec![10, 20]).unwrap();
    /// assert_eq!(s.index(), Some(&[10, 20][..]));
    /// assert!(Series::indexed(array![1.0], vec![1, 2]).is_err());
    /// ```
    pub fn indexed(values: Array1<f64>, index: Vec<i64>) -> Result<Self> {
        if values.len() != index.len() {
            return Err(ModelFitError::ShapeMismatch(format!(
                "{} values but {} index labels",
                values.len(),
                index.len()
            )));
        }
        Ok(Self {
            values,
            index: Some(index),
        })
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn index(&self) -> Option<&[i64]> {
        self.index.as_deref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Array1<f64> {
        self.values
    }

    /// Values at the given positions, in order.
    pub(crate) fn take(&self, positions: &[usize]) -> Array1<f64> {
        positions.iter().map(|&p| self.values[p]).collect()
    }
}

impl From<Array1<f64>> for Series {
    fn from(values: Array1<f64>) -> Self {
        Series::new(values)
    }
}

impl From<&Array1<f64>> for Series {
    fn from(values: &Array1<f64>) -> Self {
        Series::new(values.clone())
    }
}

impl From<Vec<f64>> for Series {
    fn from(values: Vec<f64>) -> Self {
        Series::new(Array1::from(values))
    }
}

/// Something whose positions carry index labels that can be matched against
/// another labelled sequence.
pub trait Alignable {
    /// Labels, or `None` for purely positional data.
    fn index_labels(&self) -> Option<&[i64]>;

    /// Position pairs `(self_pos, other_pos)` whose labels agree, in the order
    /// of `self`. Empty if either side has no labels. The first occurrence of
    /// a repeated label wins.
    fn intersect_indices(&self, other: &dyn Alignable) -> Vec<(usize, usize)> {
        match (self.index_labels(), other.index_labels()) {
            (Some(mine), Some(theirs)) => intersect_indices(mine, theirs),
            _ => Vec::new(),
        }
    }
}

impl Alignable for Series {
    fn index_labels(&self) -> Option<&[i64]> {
        self.index()
    }
}

/// Position-wise intersection of two label sequences, in the order of `a`.
///
/// # Examples
///
/// ```
/// use modelfit_rs::data::intersect_indices;
///
/// assert_eq!(intersect_indices(&[3, 1, 7], &[1, 2, 3]), vec![(0, 2), (1, 0)]);
/// ```
pub fn intersect_indices(a: &[i64], b: &[i64]) -> Vec<(usize, usize)> {
    let mut lookup = HashMap::with_capacity(b.len());
    for (pos, label) in b.iter().enumerate() {
        lookup.entry(*label).or_insert(pos);
    }
    let mut seen = HashMap::with_capacity(a.len());
    a.iter()
        .enumerate()
        .filter(|(_, label)| seen.insert(**label, ()).is_none())
        .filter_map(|(pos, label)| lookup.get(label).map(|&other| (pos, other)))
        .collect()
}

/// Independent-variable arrays keyed by argument name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndependentVars {
    vars: Vec<(String, Array1<f64>)>,
}

impl IndependentVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`IndependentVars::insert`].
    pub fn with(mut self, name: &str, values: Array1<f64>) -> Self {
        self.insert(name, values);
        self
    }

    /// Bind `name`, replacing an earlier binding.
    pub fn insert(&mut self, name: &str, values: Array1<f64>) {
        match self.vars.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = values,
            None => self.vars.push((name.to_string(), values)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Array1<f64>> {
        self.vars.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> Vec<&str> {
        self.vars.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Array1<f64>)> {
        self.vars.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Observed data and companion arrays brought onto common positions.
#[derive(Debug, Clone)]
pub(crate) struct Aligned {
    pub data: Array1<f64>,
    pub companions: Vec<Array1<f64>>,
}

/// Bring `data` and its named companions (independent variables, weights)
/// onto one set of positions.
///
/// When data is labelled, every companion labelled differently is matched by
/// label, and only labels present everywhere are kept, in data order.
/// Unlabelled companions, or any companion of unlabelled data, must match the
/// data length exactly.
pub(crate) fn align(data: &Series, companions: &[(&str, &Series)]) -> Result<Aligned> {
    let n = data.len();
    let differently_labelled: Vec<usize> = match data.index_labels() {
        Some(labels) => companions
            .iter()
            .enumerate()
            .filter(|(_, (_, s))| s.index_labels().map_or(false, |l| l != labels))
            .map(|(i, _)| i)
            .collect(),
        None => Vec::new(),
    };

    let check_len = |name: &str, series: &Series| {
        if series.len() != n {
            return Err(ModelFitError::ShapeMismatch(format!(
                "'{}' has {} values but data has {}",
                name,
                series.len(),
                n
            )));
        }
        Ok(())
    };

    if differently_labelled.is_empty() {
        for (name, series) in companions {
            check_len(name, series)?;
        }
        return Ok(Aligned {
            data: data.values().clone(),
            companions: companions.iter().map(|(_, s)| s.values().clone()).collect(),
        });
    }

    // data position -> position in each differently labelled companion
    let mut matches: Vec<HashMap<usize, usize>> = Vec::with_capacity(differently_labelled.len());
    for &i in &differently_labelled {
        let (_, series) = companions[i];
        matches.push(data.intersect_indices(series).into_iter().collect());
    }

    let kept: Vec<usize> = {
        let mut seen = std::collections::HashSet::new();
        let labels = data.index_labels().unwrap_or(&[]);
        (0..n)
            .filter(|&p| seen.insert(labels[p]))
            .filter(|p| matches.iter().all(|m| m.contains_key(p)))
            .collect()
    };
    if kept.is_empty() && n > 0 {
        return Err(ModelFitError::ShapeMismatch(
            "data shares no index labels with the independent variables".to_string(),
        ));
    }

    let mut aligned = Vec::with_capacity(companions.len());
    for (i, (name, series)) in companions.iter().enumerate() {
        let values = match differently_labelled.iter().position(|&d| d == i) {
            Some(m) => {
                let positions: Vec<usize> = kept.iter().map(|p| matches[m][p]).collect();
                series.take(&positions)
            }
            None => {
                check_len(name, series)?;
                series.take(&kept)
            }
        };
        aligned.push(values);
    }

    debug!(
        observations = n,
        kept = kept.len(),
        "aligned data with independent variables by index"
    );
    Ok(Aligned {
        data: data.take(&kept),
        companions: aligned,
    })
}
