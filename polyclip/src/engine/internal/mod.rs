//! Arena backed state of one scanline sweep.
//!
//! Every linked structure (vertex rings, the active edge list, output point rings) is stored in a
//! `Vec` and linked by index, all arenas are dropped together when the sweep finishes.
mod horizontal;
mod output;
mod sweep;
mod winding;

use super::{BooleanOptions, BooleanResult, ClipType, FillRule, PathType};
use crate::{
    core::math::{get_dx, round_saturating},
    error::{ClipError, Phase, ReserveExt},
    geometry::{PathExt, Point64},
};
use std::collections::BinaryHeap;

pub(crate) const OPEN_START: u8 = 1;
pub(crate) const OPEN_END: u8 = 2;
pub(crate) const LOCAL_MAX: u8 = 4;
pub(crate) const LOCAL_MIN: u8 = 8;

/// Input vertex, linked into a ring per input path.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Vertex {
    pub pt: Point64,
    pub next: usize,
    pub prev: usize,
    pub flags: u8,
}

/// Vertex where both incident edges head up the sweep (toward smaller y).
#[derive(Debug, Clone, Copy)]
pub(crate) struct LocalMinima {
    pub vertex: usize,
    pub polytype: PathType,
    pub is_open: bool,
}

/// Marks two adjacent hot edges whose output was merged while they still overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JoinWith {
    None,
    Left,
    Right,
}

/// Edge on the active edge list (AEL).
#[derive(Debug, Clone)]
pub(crate) struct Active {
    pub bot: Point64,
    pub top: Point64,
    /// X at the current scanline.
    pub curr_x: i64,
    pub dx: f64,
    /// +1 when the bound follows vertex `next` links, -1 when it follows `prev` links.
    pub wind_dx: i32,
    /// Winding count of the edge's own path type.
    pub wind_cnt: i32,
    /// Winding count of the other path type.
    pub wind_cnt2: i32,
    pub outrec: Option<usize>,
    pub prev_in_ael: Option<usize>,
    pub next_in_ael: Option<usize>,
    pub vertex_top: usize,
    pub local_min: usize,
    pub is_left_bound: bool,
    pub join_with: JoinWith,
}

/// Output point, linked into a ring per output record.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OutPt {
    pub pt: Point64,
    pub next: usize,
    pub prev: usize,
    pub outrec: usize,
    pub horz: Option<usize>,
}

/// Output record (one output path under construction).
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct OutRec {
    pub owner: Option<usize>,
    pub front_edge: Option<usize>,
    pub back_edge: Option<usize>,
    pub pts: Option<usize>,
    pub is_open: bool,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct IntersectNode {
    pub pt: Point64,
    pub edge1: usize,
    pub edge2: usize,
}

/// Horizontal run of output points, candidate for joining with overlapping runs.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HorzSegment {
    pub left_op: usize,
    pub right_op: Option<usize>,
    pub left_to_right: bool,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct HorzJoin {
    pub op1: usize,
    pub op2: usize,
}

/// State of one boolean operation.
///
/// The sweep moves from the largest y toward the smallest, "bottom" and "top" of an edge refer to
/// sweep order (bottom is reached first).
pub(crate) struct SweepEngine {
    clip_type: ClipType,
    fill_rule: FillRule,
    preserve_collinear: bool,
    reverse_solution: bool,
    vertices: Vec<Vertex>,
    minima: Vec<LocalMinima>,
    current_locmin: usize,
    actives: Vec<Active>,
    ael_head: Option<usize>,
    scanlines: BinaryHeap<i64>,
    horz_stack: Vec<usize>,
    intersect_nodes: Vec<IntersectNode>,
    horz_segs: Vec<HorzSegment>,
    horz_joins: Vec<HorzJoin>,
    outpts: Vec<OutPt>,
    outrecs: Vec<OutRec>,
    bot_y: i64,
    has_open_paths: bool,
    succeeded: bool,
}

impl SweepEngine {
    pub fn new(clip_type: ClipType, fill_rule: FillRule, options: BooleanOptions) -> Self {
        Self {
            clip_type,
            fill_rule,
            preserve_collinear: options.preserve_collinear,
            reverse_solution: options.reverse_solution,
            vertices: Vec::new(),
            minima: Vec::new(),
            current_locmin: 0,
            actives: Vec::new(),
            ael_head: None,
            scanlines: BinaryHeap::new(),
            horz_stack: Vec::new(),
            intersect_nodes: Vec::new(),
            horz_segs: Vec::new(),
            horz_joins: Vec::new(),
            outpts: Vec::new(),
            outrecs: Vec::new(),
            bot_y: 0,
            has_open_paths: false,
            succeeded: true,
        }
    }

    /// Add paths as vertex rings and record their local minima.
    ///
    /// Closed paths with fewer than 3 distinct points and open paths with fewer than 2 are
    /// skipped.
    pub fn add_paths(
        &mut self,
        paths: &[Vec<Point64>],
        polytype: PathType,
        is_open: bool,
    ) -> Result<(), ClipError> {
        let total: usize = paths.iter().map(|p| p.len()).sum();
        self.vertices.try_reserve(total).or_exhausted("vertices")?;
        self.minima
            .try_reserve(total / 2 + paths.len())
            .or_exhausted("local minima")?;
        for path in paths {
            self.add_path(path, polytype, is_open);
        }
        Ok(())
    }

    fn add_path(&mut self, path: &[Point64], polytype: PathType, is_open: bool) {
        let pts = path.strip_duplicates(!is_open);
        let cnt = pts.len();
        if cnt < 2 || (!is_open && cnt < 3) {
            return;
        }

        let v0 = self.vertices.len();
        for (i, &pt) in pts.iter().enumerate() {
            self.vertices.push(Vertex {
                pt,
                next: v0 + (i + 1) % cnt,
                prev: v0 + (i + cnt - 1) % cnt,
                flags: 0,
            });
        }

        let y0 = self.vertices[v0].pt.y;
        let mut going_up;
        if is_open {
            self.has_open_paths = true;
            let mut curr = self.vertices[v0].next;
            while curr != v0 && self.vertices[curr].pt.y == y0 {
                curr = self.vertices[curr].next;
            }
            going_up = self.vertices[curr].pt.y <= y0;
            if going_up {
                self.vertices[v0].flags = OPEN_START;
                self.add_loc_min(v0, polytype, true);
            } else {
                self.vertices[v0].flags = OPEN_START | LOCAL_MAX;
            }
        } else {
            let mut prev = self.vertices[v0].prev;
            while prev != v0 && self.vertices[prev].pt.y == y0 {
                prev = self.vertices[prev].prev;
            }
            if prev == v0 {
                // completely flat closed path
                return;
            }
            going_up = self.vertices[prev].pt.y > y0;
        }

        let going_up0 = going_up;
        let mut prev = v0;
        let mut curr = self.vertices[v0].next;
        while curr != v0 {
            let (cy, py) = (self.vertices[curr].pt.y, self.vertices[prev].pt.y);
            if cy > py && going_up {
                self.vertices[prev].flags |= LOCAL_MAX;
                going_up = false;
            } else if cy < py && !going_up {
                going_up = true;
                self.add_loc_min(prev, polytype, is_open);
            }
            prev = curr;
            curr = self.vertices[curr].next;
        }

        if is_open {
            self.vertices[prev].flags |= OPEN_END;
            if going_up {
                self.vertices[prev].flags |= LOCAL_MAX;
            } else {
                self.add_loc_min(prev, polytype, is_open);
            }
        } else if going_up != going_up0 {
            if going_up0 {
                self.add_loc_min(prev, polytype, false);
            } else {
                self.vertices[prev].flags |= LOCAL_MAX;
            }
        }
    }

    fn add_loc_min(&mut self, vertex: usize, polytype: PathType, is_open: bool) {
        if self.vertices[vertex].flags & LOCAL_MIN != 0 {
            return;
        }
        self.vertices[vertex].flags |= LOCAL_MIN;
        self.minima.push(LocalMinima {
            vertex,
            polytype,
            is_open,
        });
    }

    fn reset(&mut self) -> Result<(), ClipError> {
        let vertices = &self.vertices;
        self.minima.sort_by(|a, b| {
            let pa = vertices[a.vertex].pt;
            let pb = vertices[b.vertex].pt;
            pb.y.cmp(&pa.y).then(pa.x.cmp(&pb.x))
        });

        self.scanlines
            .try_reserve(self.minima.len())
            .or_exhausted("scanline queue")?;
        for lm in self.minima.iter().rev() {
            self.scanlines.push(self.vertices[lm.vertex].pt.y);
        }

        self.actives
            .try_reserve(self.minima.len() * 2)
            .or_exhausted("active edges")?;
        self.outpts
            .try_reserve(self.vertices.len())
            .or_exhausted("output points")?;
        self.current_locmin = 0;
        self.ael_head = None;
        Ok(())
    }

    /// Run the sweep and assemble the output paths.
    pub fn execute(mut self) -> Result<BooleanResult, ClipError> {
        self.reset()?;
        if !self.succeeded {
            return Err(ClipError::invariant(Phase::Initialization));
        }
        log::debug!(
            "sweep start: {} vertices, {} local minima, {:?} {:?}",
            self.vertices.len(),
            self.minima.len(),
            self.clip_type,
            self.fill_rule
        );

        self.sweep()?;
        if !self.succeeded {
            log::debug!("sweep aborted: diverged state");
            return Err(ClipError::invariant(Phase::Sweep));
        }

        let result = self.build_paths()?;
        if !self.succeeded {
            return Err(ClipError::invariant(Phase::Assembly));
        }
        log::debug!(
            "sweep done: {} output records, {} closed, {} open",
            self.outrecs.len(),
            result.closed.len(),
            result.open.len()
        );
        Ok(result)
    }

    fn sweep(&mut self) -> Result<(), ClipError> {
        let Some(mut y) = self.pop_scanline() else {
            return Ok(());
        };

        let mut beam_count = 0usize;
        while self.succeeded {
            self.reserve_for_beam()?;
            self.insert_local_minima_into_ael(y);
            while let Some(e) = self.horz_stack.pop() {
                self.do_horizontal(e);
            }
            if !self.horz_segs.is_empty() {
                self.convert_horz_segs_to_joins();
                self.horz_segs.clear();
            }
            self.bot_y = y;
            match self.pop_scanline() {
                Some(top_y) => y = top_y,
                None => break,
            }
            log::trace!("scanbeam {} -> {}", self.bot_y, y);
            self.do_intersections(y)?;
            self.do_top_of_scanbeam(y);
            while let Some(e) = self.horz_stack.pop() {
                self.do_horizontal(e);
            }
            beam_count += 1;
        }

        if self.succeeded {
            self.process_horz_joins();
        }
        log::debug!(
            "sweep processed {} scanbeams, {} horizontal joins",
            beam_count,
            self.horz_joins.len()
        );
        Ok(())
    }

    /// Every active edge adds a bounded number of output points and records per scanbeam, reserve
    /// for that up front so growth failures surface as errors.
    fn reserve_for_beam(&mut self) -> Result<(), ClipError> {
        let n = self.actives.len();
        self.outpts
            .try_reserve(4 * n + 16)
            .or_exhausted("output points")?;
        self.outrecs
            .try_reserve(n + 4)
            .or_exhausted("output records")?;
        self.horz_segs
            .try_reserve(n + 4)
            .or_exhausted("horizontal segments")?;
        self.horz_stack
            .try_reserve(n + 4)
            .or_exhausted("horizontal stack")?;
        Ok(())
    }

    // scanline queue and local minima

    #[inline]
    fn insert_scanline(&mut self, y: i64) {
        self.scanlines.push(y);
    }

    fn pop_scanline(&mut self) -> Option<i64> {
        let y = self.scanlines.pop()?;
        while self.scanlines.peek() == Some(&y) {
            self.scanlines.pop();
        }
        Some(y)
    }

    fn pop_local_minima(&mut self, y: i64) -> Option<usize> {
        let lm = self.minima.get(self.current_locmin)?;
        if self.vertices[lm.vertex].pt.y != y {
            return None;
        }
        self.current_locmin += 1;
        Some(self.current_locmin - 1)
    }

    // edge queries

    #[inline]
    fn is_open(&self, e: usize) -> bool {
        self.minima[self.actives[e].local_min].is_open
    }

    #[inline]
    fn polytype(&self, e: usize) -> PathType {
        self.minima[self.actives[e].local_min].polytype
    }

    #[inline]
    fn is_same_polytype(&self, e1: usize, e2: usize) -> bool {
        self.polytype(e1) == self.polytype(e2)
    }

    #[inline]
    fn is_hot(&self, e: usize) -> bool {
        self.actives[e].outrec.is_some()
    }

    #[inline]
    fn is_horizontal(&self, e: usize) -> bool {
        self.actives[e].top.y == self.actives[e].bot.y
    }

    #[inline]
    fn is_heading_right_horz(&self, e: usize) -> bool {
        self.actives[e].dx == -f64::MAX
    }

    #[inline]
    fn is_heading_left_horz(&self, e: usize) -> bool {
        self.actives[e].dx == f64::MAX
    }

    #[inline]
    fn is_maxima(&self, e: usize) -> bool {
        self.vertices[self.actives[e].vertex_top].flags & LOCAL_MAX != 0
    }

    #[inline]
    fn is_open_end_vertex(&self, v: usize) -> bool {
        self.vertices[v].flags & (OPEN_START | OPEN_END) != 0
    }

    #[inline]
    fn is_open_end(&self, e: usize) -> bool {
        self.is_open_end_vertex(self.actives[e].vertex_top)
    }

    #[inline]
    fn is_joined(&self, e: usize) -> bool {
        self.actives[e].join_with != JoinWith::None
    }

    #[inline]
    fn is_front(&self, e: usize) -> bool {
        match self.actives[e].outrec {
            Some(or) => self.outrecs[or].front_edge == Some(e),
            None => false,
        }
    }

    /// Next vertex along the edge's bound.
    #[inline]
    fn next_vertex(&self, e: usize) -> usize {
        let ae = &self.actives[e];
        if ae.wind_dx > 0 {
            self.vertices[ae.vertex_top].next
        } else {
            self.vertices[ae.vertex_top].prev
        }
    }

    /// Second vertex below the edge's top along its bound (first vertex of the alternate bound).
    #[inline]
    fn prev_prev_vertex(&self, e: usize) -> usize {
        let ae = &self.actives[e];
        if ae.wind_dx > 0 {
            self.vertices[self.vertices[ae.vertex_top].prev].prev
        } else {
            self.vertices[self.vertices[ae.vertex_top].next].next
        }
    }

    #[inline]
    fn set_dx(&mut self, e: usize) {
        let ae = &mut self.actives[e];
        ae.dx = get_dx(ae.bot, ae.top);
    }

    /// X position of the edge at scanline `current_y`.
    fn top_x(&self, e: usize, current_y: i64) -> i64 {
        let ae = &self.actives[e];
        if current_y == ae.top.y || ae.top.x == ae.bot.x {
            ae.top.x
        } else if current_y == ae.bot.y {
            ae.bot.x
        } else {
            ae.bot.x + round_saturating(ae.dx * (current_y - ae.bot.y) as f64)
        }
    }

    // output record queries

    /// Follows owner links past records that were merged away.
    fn get_real_outrec(&self, mut outrec: Option<usize>) -> Option<usize> {
        while let Some(or) = outrec {
            if self.outrecs[or].pts.is_some() {
                break;
            }
            outrec = self.outrecs[or].owner;
        }
        outrec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SweepEngine {
        SweepEngine::new(ClipType::Union, FillRule::NonZero, BooleanOptions::new())
    }

    fn pts(coords: &[(i64, i64)]) -> Vec<Point64> {
        coords.iter().map(|&(x, y)| Point64::new(x, y)).collect()
    }

    #[test]
    fn degenerate_paths_are_skipped() {
        let mut e = engine();
        e.add_paths(
            &[
                pts(&[(0, 0), (5, 5)]),
                pts(&[(0, 0), (0, 0), (0, 0)]),
                pts(&[(0, 0), (5, 0), (9, 0)]),
            ],
            PathType::Subject,
            false,
        )
        .unwrap();
        assert!(e.minima.is_empty());
    }

    #[test]
    fn local_minima_of_square() {
        let mut e = engine();
        e.add_paths(
            &[pts(&[(0, 0), (10, 0), (10, 10), (0, 10)])],
            PathType::Subject,
            false,
        )
        .unwrap();
        assert_eq!(e.vertices.len(), 4);
        assert_eq!(e.minima.len(), 1);
        // minima sit at the largest y (start of the sweep)
        assert_eq!(e.vertices[e.minima[0].vertex].pt.y, 10);
        let maxima = e.vertices.iter().filter(|v| v.flags & LOCAL_MAX != 0).count();
        assert_eq!(maxima, 1);
    }

    #[test]
    fn open_path_end_flags() {
        let mut e = engine();
        e.add_paths(&[pts(&[(-5, 5), (15, 5)])], PathType::Subject, true)
            .unwrap();
        assert!(e.has_open_paths);
        assert_eq!(e.minima.len(), 1);
        assert_eq!(e.vertices[0].flags & OPEN_START, OPEN_START);
        assert_eq!(e.vertices[1].flags & (OPEN_END | LOCAL_MAX), OPEN_END | LOCAL_MAX);
    }

    #[test]
    fn scanlines_pop_descending_without_duplicates() {
        let mut e = engine();
        for y in [3, 9, 3, 1, 9] {
            e.insert_scanline(y);
        }
        assert_eq!(e.pop_scanline(), Some(9));
        assert_eq!(e.pop_scanline(), Some(3));
        assert_eq!(e.pop_scanline(), Some(1));
        assert_eq!(e.pop_scanline(), None);
    }
}
