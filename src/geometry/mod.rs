//! Geometric primitives for page-relative layout.
//!
//! All coordinates are fractions of the page: `top` and `height` of the page
//! height, `left` and `width` of the page width. The analysis service emits
//! them in `[0, 1]`; nothing here re-normalizes them.

use serde::{Deserialize, Serialize};

/// A normalized rectangle on a page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundingBox {
    /// Distance of the top edge from the top of the page
    pub top: f64,
    /// Distance of the left edge from the left of the page
    pub left: f64,
    /// Width of the rectangle
    pub width: f64,
    /// Height of the rectangle
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockview::geometry::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(0.1, 0.2, 0.3, 0.05);
    /// assert_eq!(bbox.top, 0.1);
    /// assert_eq!(bbox.left, 0.2);
    /// ```
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Get the right edge.
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Get the bottom edge.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whether every field lies in `[0, 1]`.
    pub fn is_normalized(&self) -> bool {
        [self.top, self.left, self.width, self.height]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }

    /// Reading-order key: vertical position first, horizontal position as a
    /// weighted tie-break within the same row band.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockview::geometry::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(0.5, 0.2, 0.1, 0.1);
    /// assert!((bbox.reading_order_key(0.05) - 0.51).abs() < 1e-12);
    /// ```
    pub fn reading_order_key(&self, weight: f64) -> f64 {
        self.top + weight * self.left
    }

    /// Extend a left-to-right run of words with the next word.
    ///
    /// The width runs from this box's left edge to the right edge of `next`,
    /// while top and height take the maximum of the two. Not a rectangle union.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockview::geometry::BoundingBox;
    ///
    /// let hello = BoundingBox::new(0.10, 0.10, 0.05, 0.02);
    /// let world = BoundingBox::new(0.10, 0.16, 0.05, 0.02);
    /// let run = hello.extend_run(&world);
    ///
    /// assert_eq!(run.left, 0.10);
    /// assert!((run.width - 0.11).abs() < 1e-12);
    /// ```
    pub fn extend_run(&self, next: &BoundingBox) -> BoundingBox {
        BoundingBox {
            top: self.top.max(next.top),
            left: self.left.min(next.left),
            width: next.left - self.left + next.width,
            height: self.height.max(next.height),
        }
    }
}

/// Block geometry as emitted by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Geometry {
    /// Axis-aligned bounding box of the block
    pub bounding_box: BoundingBox,
}
