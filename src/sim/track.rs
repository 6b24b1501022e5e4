use glam::Vec2;

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentId(pub usize);

/// Which edge a lateral track offset is measured from
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum TrackSide {
    Left,
    Right,
}

/// A piece of the track surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub id: SegmentId,
    pub width: f32,
    /// Neighbouring segment on the left (a border or a barrier run-off), if any
    pub left_side: Option<SegmentId>,
    pub right_side: Option<SegmentId>,
}

/// Position relative to a track segment
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackPos {
    pub seg: SegmentId,
    /// Distance along the segment from its start
    pub to_start: f32,
    /// Distance from the right edge, positive towards the left
    pub to_right: f32,
    /// Distance from the left edge, positive towards the right
    pub to_left: f32,
    /// Distance from the centerline, positive towards the left
    pub to_middle: f32,
}

/// Track geometry queries needed by the simulation core
pub trait Track {
    fn segment(&self, id: SegmentId) -> &Segment;

    /// World XY of a track position, its lateral offset taken from `side`
    fn local_to_global(&self, pos: &TrackPos, side: TrackSide) -> Vec2;

    /// Track position of a world XY point, relative to the main surface
    fn global_to_local(&self, point: Vec2) -> TrackPos;

    /// Surface height at a track position
    fn height(&self, pos: &TrackPos) -> f32;

    /// Heading of the track edge at a track position
    fn side_tangent_angle(&self, pos: &TrackPos) -> f32;
}

/// A straight, flat track along +X with its centerline on Y = 0.
///
/// Segment 0 is the racing surface, the optional side segments sit outside it
/// on each side.
#[derive(Clone, Debug)]
pub struct StraightTrack {
    segments: Vec<Segment>,
    heading: f32,
    elevation: f32,
}

impl StraightTrack {
    pub const MAIN: SegmentId = SegmentId(0);

    #[must_use]
    pub fn new(width: f32) -> Self {
        Self {
            segments: vec![Segment {
                id: Self::MAIN,
                width,
                left_side: None,
                right_side: None,
            }],
            heading: 0.0,
            elevation: 0.0,
        }
    }

    /// Adds a side segment of `width` on both sides of the outermost ones
    #[must_use]
    pub fn with_sides(mut self, width: f32) -> Self {
        for side in [TrackSide::Left, TrackSide::Right] {
            let mut outer = Self::MAIN;
            while let Some(next) = self.side_of(outer, side) {
                outer = next;
            }

            let id = SegmentId(self.segments.len());
            self.segments.push(Segment {
                id,
                width,
                left_side: None,
                right_side: None,
            });

            let outer = &mut self.segments[outer.0];
            match side {
                TrackSide::Left => outer.left_side = Some(id),
                TrackSide::Right => outer.right_side = Some(id),
            }
        }
        self
    }

    #[must_use]
    pub const fn with_elevation(mut self, elevation: f32) -> Self {
        self.elevation = elevation;
        self
    }

    fn side_of(&self, id: SegmentId, side: TrackSide) -> Option<SegmentId> {
        let seg = &self.segments[id.0];
        match side {
            TrackSide::Left => seg.left_side,
            TrackSide::Right => seg.right_side,
        }
    }

    /// Y of the right and left edges of a segment
    fn edges(&self, id: SegmentId) -> (f32, f32) {
        let main_half = self.segments[Self::MAIN.0].width / 2.0;
        if id == Self::MAIN {
            return (-main_half, main_half);
        }

        for side in [TrackSide::Left, TrackSide::Right] {
            let mut inner_edge = main_half;
            let mut cur = Self::MAIN;
            while let Some(next) = self.side_of(cur, side) {
                let width = self.segments[next.0].width;
                if next == id {
                    return match side {
                        TrackSide::Left => (inner_edge, inner_edge + width),
                        TrackSide::Right => (-inner_edge - width, -inner_edge),
                    };
                }
                inner_edge += width;
                cur = next;
            }
        }

        (-main_half, main_half)
    }
}

impl Track for StraightTrack {
    fn segment(&self, id: SegmentId) -> &Segment {
        &self.segments[id.0]
    }

    fn local_to_global(&self, pos: &TrackPos, side: TrackSide) -> Vec2 {
        let (right_edge, left_edge) = self.edges(pos.seg);
        let y = match side {
            TrackSide::Left => left_edge - pos.to_left,
            TrackSide::Right => right_edge + pos.to_right,
        };
        Vec2::new(pos.to_start, y)
    }

    fn global_to_local(&self, point: Vec2) -> TrackPos {
        let width = self.segments[Self::MAIN.0].width;
        let to_right = point.y + width / 2.0;
        TrackPos {
            seg: Self::MAIN,
            to_start: point.x,
            to_right,
            to_left: width - to_right,
            to_middle: point.y,
        }
    }

    fn height(&self, _pos: &TrackPos) -> f32 {
        self.elevation
    }

    fn side_tangent_angle(&self, _pos: &TrackPos) -> f32 {
        self.heading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn side_segments_are_linked_outwards() {
        let track = StraightTrack::new(10.0).with_sides(2.0).with_sides(5.0);
        let main = track.segment(StraightTrack::MAIN);
        let left = main.left_side.unwrap();
        let far_left = track.segment(left).left_side.unwrap();
        assert!(track.segment(far_left).left_side.is_none());

        let pos = TrackPos {
            seg: far_left,
            to_left: -3.0,
            ..Default::default()
        };
        let p = track.local_to_global(&pos, TrackSide::Left);
        assert_abs_diff_eq!(p.y, 5.0 + 2.0 + 5.0 + 3.0);

        let right = main.right_side.unwrap();
        let far_right = track.segment(right).right_side.unwrap();
        let pos = TrackPos {
            seg: far_right,
            to_right: -3.0,
            to_start: 12.0,
            ..Default::default()
        };
        let p = track.local_to_global(&pos, TrackSide::Right);
        assert_abs_diff_eq!(p.x, 12.0);
        assert_abs_diff_eq!(p.y, -15.0);
    }

    #[test]
    fn global_to_local_measures_from_right_edge() {
        let track = StraightTrack::new(10.0);
        let pos = track.global_to_local(Vec2::new(40.0, 2.0));
        assert_abs_diff_eq!(pos.to_start, 40.0);
        assert_abs_diff_eq!(pos.to_right, 7.0);
        assert_abs_diff_eq!(pos.to_left, 3.0);
        assert_abs_diff_eq!(pos.to_middle, 2.0);
    }
}
