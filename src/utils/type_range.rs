use std::ops::RangeInclusive;

use crate::Error;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CoeffType {
    Value(usize),
    Span,
}

/// A range of bond types written as `n`, `*`, `n*`, `*n` or `m*n`.
///
/// ```rust
/// use jbond::utils::TypeRange;
///
/// let range = TypeRange::parse("2*").unwrap();
/// assert_eq!(range.bounds(4).unwrap(), 2..=4);
/// assert!(range.contains(3));
/// assert!(!range.contains(1));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TypeRange {
    begin: CoeffType,
    end: CoeffType,
}
impl TypeRange {
    pub fn new(min: Option<usize>, max: Option<usize>) -> Self {
        let begin = match min {
            Some(b) => CoeffType::Value(b),
            None => CoeffType::Span,
        };
        let end = match max {
            Some(e) => CoeffType::Value(e),
            None => CoeffType::Span,
        };
        Self { begin, end }
    }
    pub fn parse(text: &str) -> Result<Self, Error> {
        let number = |s: &str| -> Result<Option<usize>, Error> {
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<usize>()
                .map(Some)
                .map_err(|_| Error::config(None, format!("Invalid bond type '{}'", text)))
        };
        match text.split_once('*') {
            None => {
                let t = number(text)?;
                if t.is_none() {
                    return Err(Error::config(None, "Empty bond type"));
                }
                Ok(Self::new(t, t))
            }
            Some((lo, hi)) => Ok(Self::new(number(lo)?, number(hi)?)),
        }
    }
    pub fn contains(&self, idx: usize) -> bool {
        if let CoeffType::Value(begin) = self.begin {
            if begin > idx {
                return false;
            }
        }
        if let CoeffType::Value(end) = self.end {
            if end < idx {
                return false;
            }
        }
        true
    }
    pub fn max(&self) -> Option<usize> {
        match self.end {
            CoeffType::Value(x) => Some(x),
            CoeffType::Span => None,
        }
    }
    pub fn min(&self) -> Option<usize> {
        match self.begin {
            CoeffType::Value(x) => Some(x),
            CoeffType::Span => None,
        }
    }
    /// Resolve the range against `1..=num_types`
    pub fn bounds(&self, num_types: usize) -> Result<RangeInclusive<usize>, Error> {
        let lo = self.min().unwrap_or(1);
        let hi = self.max().unwrap_or(num_types);
        if lo < 1 || hi > num_types || lo > hi {
            return Err(Error::config(
                None,
                format!(
                    "Bond types {}..={} outside of 1..={}",
                    lo, hi, num_types
                ),
            ));
        }
        Ok(lo..=hi)
    }
}
