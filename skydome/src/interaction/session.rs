use std::collections::VecDeque;

use glam::DVec3;

use crate::annotation::AnnotationId;
use crate::catalog::StarId;

const RECENT_HITS_CAPACITY: usize = 2;

/// The last two annotation hits. Two consecutive hits on the same
/// annotation form the delete gesture; there is no timing involved.
#[derive(Debug, Default, Clone)]
pub struct RecentHits {
    hits: VecDeque<AnnotationId>,
}

impl RecentHits {
    /// Records a hit. Returns the annotation to delete when this hit
    /// completes the double-hit gesture.
    pub fn push(&mut self, id: AnnotationId) -> Option<AnnotationId> {
        self.hits.push_back(id);
        if self.hits.len() > RECENT_HITS_CAPACITY {
            self.hits.pop_front();
        }

        if self.hits.len() == RECENT_HITS_CAPACITY && self.hits[0] == self.hits[1] {
            self.hits.clear();
            return Some(id);
        }
        None
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn clear(&mut self) {
        self.hits.clear();
    }
}

/// A new link the chaining rule asks for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: DVec3,
    pub end: DVec3,
}

/// State of one drawing session. Exists only while annotating.
///
/// Chaining rule: every star click after the first produces a segment from
/// the previous click to this one, so N clicks give N-1 connected segments.
#[derive(Debug, Default, Clone)]
pub struct InteractionSession {
    click_positions: Vec<DVec3>,
    clicked_stars: Vec<StarId>,
    last_anchor: Option<DVec3>,
    recent_hits: RecentHits,
}

impl InteractionSession {
    /// Records a star click at a sky-local position and returns the segment
    /// to draw, if any. Clicking the anchor star again draws nothing.
    pub fn record_star_click(&mut self, star: StarId, position: DVec3) -> Option<Segment> {
        self.click_positions.push(position);
        self.clicked_stars.push(star);

        let previous = self.last_anchor.replace(position)?;
        if previous == position {
            return None;
        }
        Some(Segment {
            start: previous,
            end: position,
        })
    }

    pub fn record_annotation_hit(&mut self, id: AnnotationId) -> Option<AnnotationId> {
        self.recent_hits.push(id)
    }

    pub fn click_positions(&self) -> &[DVec3] {
        &self.click_positions
    }

    pub fn clicked_stars(&self) -> &[StarId] {
        &self.clicked_stars
    }

    pub fn last_anchor(&self) -> Option<DVec3> {
        self.last_anchor
    }

    pub fn recent_hits(&self) -> &RecentHits {
        &self.recent_hits
    }

    pub fn distinct_star_count(&self) -> usize {
        let mut stars = self.clicked_stars.clone();
        stars.sort_unstable();
        stars.dedup();
        stars.len()
    }

    /// Mean of every recorded click position.
    pub fn centroid(&self) -> Option<DVec3> {
        if self.click_positions.is_empty() {
            return None;
        }
        let sum: DVec3 = self.click_positions.iter().copied().sum();
        Some(sum / self.click_positions.len() as f64)
    }
}
