//! Running spatial/temporal extent of a collection.

use chrono::{DateTime, Utc};

use crate::bbox::BoundingBox;

/// Extent accumulated over every item of a conversion run.
///
/// Only ever widens: the bbox grows to the union of all included boxes and
/// the interval grows to cover all included instants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionExtent {
    pub bbox: Option<BoundingBox>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl CollectionExtent {
    pub fn new(
        bbox: Option<BoundingBox>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        Self { bbox, start, end }
    }

    /// Widen the extent to cover an item's bbox and timestamp.
    pub fn include(self, bbox: &BoundingBox, datetime: DateTime<Utc>) -> Self {
        self.include_bbox(bbox).include_datetime(datetime)
    }

    pub fn include_bbox(mut self, bbox: &BoundingBox) -> Self {
        self.bbox = Some(match self.bbox {
            Some(current) => current.union(bbox),
            None => *bbox,
        });
        self
    }

    pub fn include_datetime(mut self, datetime: DateTime<Utc>) -> Self {
        if self.start.map_or(true, |start| datetime < start) {
            self.start = Some(datetime);
        }
        if self.end.map_or(true, |end| datetime > end) {
            self.end = Some(datetime);
        }
        self
    }

    /// True when no item has been included yet.
    pub fn is_empty(&self) -> bool {
        self.bbox.is_none() && self.start.is_none() && self.end.is_none()
    }
}
