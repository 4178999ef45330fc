//! Metadata entries and endpoints.

use crate::error::{Error, Result};
use crate::index::types::{Range, TextPosition};
use serde::{Deserialize, Serialize};

/// A text range with an attached value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MetadataRecord<T>")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Metadata<T> {
    #[serde(flatten)]
    range: Range,
    /// The attached value
    pub value: T,
}

/// Wire form of a metadata entry: `{ "begin": .., "end": .., "value": .. }`
#[derive(Deserialize)]
struct MetadataRecord<T> {
    begin: TextPosition,
    end: TextPosition,
    value: T,
}

impl<T> TryFrom<MetadataRecord<T>> for Metadata<T> {
    type Error = Error;

    fn try_from(record: MetadataRecord<T>) -> Result<Self> {
        Self::new(record.begin, record.end, record.value)
    }
}

impl<T> Metadata<T> {
    /// Attach `value` to `[begin, end)`; fails if `begin >= end`.
    pub fn new(begin: TextPosition, end: TextPosition, value: T) -> Result<Self> {
        Ok(Self {
            range: Range::new(begin, end)?,
            value,
        })
    }

    #[inline]
    pub fn begin(&self) -> TextPosition {
        self.range.begin()
    }

    #[inline]
    pub fn end(&self) -> TextPosition {
        self.range.end()
    }

    #[inline]
    pub fn range(&self) -> Range {
        self.range
    }
}

/// One inclusive end of an entry's range, pointing back at the entry by id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub point: TextPosition,
    /// Index of the entry in the owning tree
    pub entry: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_range() {
        let meta = Metadata::new(2, 5, "x").unwrap();
        assert_eq!(meta.begin(), 2);
        assert_eq!(meta.end(), 5);
        assert_eq!(meta.value, "x");

        assert_eq!(
            Metadata::new(5, 5, "x").err(),
            Some(Error::InvalidRange { begin: 5, end: 5 })
        );
    }

    #[test]
    fn test_json_shape() {
        let metas: Vec<Metadata<u32>> =
            serde_json::from_str(r#"[{"begin": 0, "end": 4, "value": 7}]"#).unwrap();
        assert_eq!(metas[0].range(), Range::new(0, 4).unwrap());
        assert_eq!(metas[0].value, 7);

        let json = serde_json::to_value(&metas[0]).unwrap();
        assert_eq!(json, serde_json::json!({"begin": 0, "end": 4, "value": 7}));

        let bad = serde_json::from_str::<Metadata<u32>>(r#"{"begin": 4, "end": 1, "value": 7}"#);
        assert!(bad.is_err());
    }
}
