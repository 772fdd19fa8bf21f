//! Redaction boxes per page.
//!
//! Redactions are kept as page → id → box, both levels in insertion order.
//! The wire form is a flat list of [`RedactionDto`]; ids are assigned when a
//! box enters the set and are never sent.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::geometry::BoundingBox;
use crate::graph::BlockGraph;
use crate::search::{exclusion_patterns, match_words, ExclusionItem, HighlightBox};

/// A redaction as exchanged with storage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionDto {
    /// 1-based page number
    pub page: u32,
    /// Top edge
    pub top: f64,
    /// Left edge
    pub left: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl RedactionDto {
    /// The redacted rectangle.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.top, self.left, self.width, self.height)
    }
}

/// Redaction boxes of a document, grouped by page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RedactionSet {
    pages: IndexMap<u32, IndexMap<Uuid, BoundingBox>>,
}

impl RedactionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from stored redactions, assigning fresh ids.
    pub fn from_dtos(dtos: &[RedactionDto]) -> Self {
        let mut set = Self::new();
        for dto in dtos {
            set.add(dto.page, dto.bounding_box());
        }
        set
    }

    /// Flatten into the wire form, pages and boxes in insertion order.
    pub fn to_dtos(&self) -> Vec<RedactionDto> {
        self.pages
            .iter()
            .flat_map(|(&page, boxes)| {
                boxes.values().map(move |b| RedactionDto {
                    page,
                    top: b.top,
                    left: b.left,
                    width: b.width,
                    height: b.height,
                })
            })
            .collect()
    }

    /// Add one box and return its id.
    pub fn add(&mut self, page: u32, bbox: BoundingBox) -> Uuid {
        let id = Uuid::new_v4();
        self.pages.entry(page).or_default().insert(id, bbox);
        id
    }

    /// Add several boxes to a page.
    pub fn add_page<I>(&mut self, page: u32, boxes: I) -> Vec<Uuid>
    where
        I: IntoIterator<Item = BoundingBox>,
    {
        boxes.into_iter().map(|b| self.add(page, b)).collect()
    }

    /// Add the rectangles of search highlights to a page.
    pub fn add_highlights(&mut self, page: u32, highlights: &[HighlightBox]) -> Vec<Uuid> {
        self.add_page(page, highlights.iter().map(HighlightBox::bounding_box))
    }

    /// Remove one box. Returns it if it existed.
    pub fn remove(&mut self, page: u32, id: &Uuid) -> Option<BoundingBox> {
        let boxes = self.pages.get_mut(&page)?;
        let removed = boxes.shift_remove(id);
        if boxes.is_empty() {
            self.pages.shift_remove(&page);
        }
        removed
    }

    /// Remove every box on a page. Returns how many were removed.
    pub fn clear_page(&mut self, page: u32) -> usize {
        self.pages.shift_remove(&page).map_or(0, |boxes| boxes.len())
    }

    /// Boxes of one page with their ids.
    pub fn page(&self, page: u32) -> impl Iterator<Item = (&Uuid, &BoundingBox)> {
        self.pages.get(&page).into_iter().flat_map(|boxes| boxes.iter())
    }

    /// Pages holding at least one box.
    pub fn pages(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.keys().copied()
    }

    /// Whether any page has a box.
    pub fn has_redactions(&self) -> bool {
        self.pages.values().any(|boxes| !boxes.is_empty())
    }

    /// Total number of boxes.
    pub fn len(&self) -> usize {
        self.pages.values().map(IndexMap::len).sum()
    }

    /// Whether the set has no boxes.
    pub fn is_empty(&self) -> bool {
        !self.has_redactions()
    }

    /// Redact every occurrence of an exclusion list's items.
    ///
    /// All items are compiled before anything is added, so an invalid
    /// expression leaves the set untouched. Returns the number of boxes added.
    pub fn apply_exclusion_list(&mut self, graph: &BlockGraph<'_>, items: &[ExclusionItem]) -> Result<usize> {
        let patterns = exclusion_patterns(items)?;
        if patterns.is_empty() {
            return Ok(0);
        }

        let mut added = 0;
        for page in graph.pages() {
            let highlights = match_words(graph, page, &patterns);
            added += self.add_highlights(page, &highlights).len();
        }

        log::debug!(
            "Exclusion list of {} item(s) added {} redaction(s) to '{}'",
            items.len(),
            added,
            graph.document().id
        );
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(page: u32, top: f64) -> RedactionDto {
        RedactionDto {
            page,
            top,
            left: 0.1,
            width: 0.2,
            height: 0.03,
        }
    }

    #[test]
    fn test_dto_conversion_keeps_order() {
        let dtos = vec![dto(2, 0.1), dto(1, 0.2), dto(2, 0.3)];
        let set = RedactionSet::from_dtos(&dtos);

        assert_eq!(set.len(), 3);
        assert_eq!(set.pages().collect::<Vec<_>>(), [2, 1]);
        assert_eq!(set.to_dtos(), vec![dto(2, 0.1), dto(2, 0.3), dto(1, 0.2)]);
    }

    #[test]
    fn test_add_remove() {
        let mut set = RedactionSet::new();
        assert!(!set.has_redactions());

        let id = set.add(1, BoundingBox::new(0.1, 0.1, 0.1, 0.1));
        assert_ne!(set.add(1, BoundingBox::default()), id);
        assert_eq!(set.page(1).count(), 2);

        assert!(set.remove(1, &id).is_some());
        assert!(set.remove(1, &id).is_none());
        assert_eq!(set.clear_page(1), 1);
        assert!(set.is_empty());
        assert_eq!(set.pages().count(), 0);
    }

    #[test]
    fn test_dto_wire_shape() {
        let json = serde_json::to_value(dto(3, 0.5)).unwrap();
        assert_eq!(json["page"], 3);
        assert_eq!(json["top"], 0.5);
        assert!(json.get("Top").is_none());
    }
}
