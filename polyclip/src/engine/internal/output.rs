use super::{JoinWith, OutPt, OutRec, SweepEngine};
use crate::{
    core::math::{
        area_triangle, cross_product, dot_product, get_segment_intersect_pt,
        perpendic_dist_from_line_sqrd, pts_really_close, segments_intersect,
    },
    engine::BooleanResult,
    error::{ClipError, ReserveExt},
    geometry::{Path64, Point64},
};

impl SweepEngine {
    pub(super) fn new_outrec(&mut self) -> usize {
        self.outrecs.push(OutRec::default());
        self.outrecs.len() - 1
    }

    /// New single point ring owned by `outrec`.
    pub(super) fn new_out_pt(&mut self, pt: Point64, outrec: usize) -> usize {
        let idx = self.outpts.len();
        self.outpts.push(OutPt {
            pt,
            next: idx,
            prev: idx,
            outrec,
            horz: None,
        });
        idx
    }

    #[inline]
    pub(super) fn set_sides(&mut self, outrec: usize, start_edge: usize, end_edge: usize) {
        self.outrecs[outrec].front_edge = Some(start_edge);
        self.outrecs[outrec].back_edge = Some(end_edge);
    }

    fn get_prev_hot_edge(&self, e: usize) -> Option<usize> {
        let mut prev = self.actives[e].prev_in_ael;
        while let Some(p) = prev {
            if !self.is_open(p) && self.is_hot(p) {
                return Some(p);
            }
            prev = self.actives[p].prev_in_ael;
        }
        None
    }

    /// Starts a new output record at a local minimum of the solution.
    ///
    /// Output orientation is set by which edge becomes the front (ascending) edge, independent of
    /// the winding direction of the input paths.
    pub(super) fn add_local_min_poly(
        &mut self,
        e1: usize,
        e2: usize,
        pt: Point64,
        is_new: bool,
    ) -> usize {
        let outrec = self.new_outrec();
        self.actives[e1].outrec = Some(outrec);
        self.actives[e2].outrec = Some(outrec);

        if self.is_open(e1) {
            self.outrecs[outrec].owner = None;
            self.outrecs[outrec].is_open = true;
            if self.actives[e1].wind_dx > 0 {
                self.set_sides(outrec, e1, e2);
            } else {
                self.set_sides(outrec, e2, e1);
            }
        } else if let Some(prev_hot) = self.get_prev_hot_edge(e1) {
            let prev_or = self.actives[prev_hot].outrec;
            self.outrecs[outrec].owner = prev_or;
            let ascending = prev_or.and_then(|o| self.outrecs[o].front_edge) == Some(prev_hot);
            if ascending == is_new {
                self.set_sides(outrec, e2, e1);
            } else {
                self.set_sides(outrec, e1, e2);
            }
        } else {
            self.outrecs[outrec].owner = None;
            if is_new {
                self.set_sides(outrec, e1, e2);
            } else {
                self.set_sides(outrec, e2, e1);
            }
        }

        let op = self.new_out_pt(pt, outrec);
        self.outrecs[outrec].pts = Some(op);
        op
    }

    /// Closes or joins output where two hot bounds meet at a maximum.
    pub(super) fn add_local_max_poly(&mut self, e1: usize, e2: usize, pt: Point64) -> Option<usize> {
        if self.is_joined(e1) {
            self.split(e1, pt);
        }
        if self.is_joined(e2) {
            self.split(e2, pt);
        }

        if self.is_front(e1) == self.is_front(e2) {
            if self.is_open_end(e1) {
                let or = self.actives[e1].outrec?;
                self.swap_front_back_sides(or);
            } else if self.is_open_end(e2) {
                let or = self.actives[e2].outrec?;
                self.swap_front_back_sides(or);
            } else {
                log::debug!("local maximum with both edges on the same side");
                self.succeeded = false;
                return None;
            }
        }

        let mut result = self.add_out_pt(e1, pt);
        let (or1, or2) = (self.actives[e1].outrec?, self.actives[e2].outrec?);
        if or1 == or2 {
            self.outrecs[or1].pts = Some(result);
            self.uncouple_outrec(e1);
            if let Some(pts) = self.outrecs[or1].pts {
                result = pts;
            }
            if let Some(owner) = self.outrecs[or1].owner {
                if self.outrecs[owner].front_edge.is_none() {
                    self.outrecs[or1].owner = self.get_real_outrec(Some(owner));
                }
            }
        } else if self.is_open(e1) {
            if self.actives[e1].wind_dx < 0 {
                self.join_outrec_paths(e1, e2);
            } else {
                self.join_outrec_paths(e2, e1);
            }
        } else if or1 < or2 {
            self.join_outrec_paths(e1, e2);
        } else {
            self.join_outrec_paths(e2, e1);
        }
        Some(result)
    }

    fn uncouple_outrec(&mut self, e: usize) {
        let Some(or) = self.actives[e].outrec else {
            return;
        };
        if let Some(f) = self.outrecs[or].front_edge {
            self.actives[f].outrec = None;
        }
        if let Some(b) = self.outrecs[or].back_edge {
            self.actives[b].outrec = None;
        }
        self.outrecs[or].front_edge = None;
        self.outrecs[or].back_edge = None;
    }

    fn swap_front_back_sides(&mut self, outrec: usize) {
        let rec = &mut self.outrecs[outrec];
        std::mem::swap(&mut rec.front_edge, &mut rec.back_edge);
        if let Some(pts) = rec.pts {
            rec.pts = Some(self.outpts[pts].next);
        }
    }

    /// Appends the output of `e2` onto the output of `e1`, leaving `e2`'s record empty.
    fn join_outrec_paths(&mut self, e1: usize, e2: usize) {
        let (Some(or1), Some(or2)) = (self.actives[e1].outrec, self.actives[e2].outrec) else {
            return;
        };
        let (Some(p1_st), Some(p2_st)) = (self.outrecs[or1].pts, self.outrecs[or2].pts) else {
            return;
        };
        let p1_end = self.outpts[p1_st].next;
        let p2_end = self.outpts[p2_st].next;

        if self.is_front(e1) {
            self.outpts[p2_end].prev = p1_st;
            self.outpts[p1_st].next = p2_end;
            self.outpts[p2_st].next = p1_end;
            self.outpts[p1_end].prev = p2_st;
            self.outrecs[or1].pts = Some(p2_st);
            self.outrecs[or1].front_edge = self.outrecs[or2].front_edge;
            if let Some(f) = self.outrecs[or1].front_edge {
                self.actives[f].outrec = Some(or1);
            }
        } else {
            self.outpts[p1_end].prev = p2_st;
            self.outpts[p2_st].next = p1_end;
            self.outpts[p1_st].next = p2_end;
            self.outpts[p2_end].prev = p1_st;
            self.outrecs[or1].back_edge = self.outrecs[or2].back_edge;
            if let Some(b) = self.outrecs[or1].back_edge {
                self.actives[b].outrec = Some(or1);
            }
        }

        self.outrecs[or2].front_edge = None;
        self.outrecs[or2].back_edge = None;
        self.outrecs[or2].pts = None;

        if self.is_open_end(e1) {
            self.outrecs[or2].pts = self.outrecs[or1].pts;
            self.outrecs[or1].pts = None;
        } else {
            self.set_owner(or2, or1);
        }

        self.actives[e1].outrec = None;
        self.actives[e2].outrec = None;
    }

    fn set_owner(&mut self, outrec: usize, new_owner: usize) {
        while let Some(o) = self.outrecs[new_owner].owner {
            if self.outrecs[o].pts.is_some() {
                break;
            }
            self.outrecs[new_owner].owner = self.outrecs[o].owner;
        }

        // avoid an owner cycle
        let mut tmp = Some(new_owner);
        while let Some(t) = tmp {
            if t == outrec {
                break;
            }
            tmp = self.outrecs[t].owner;
        }
        if tmp.is_some() {
            self.outrecs[new_owner].owner = self.outrecs[outrec].owner;
        }
        self.outrecs[outrec].owner = Some(new_owner);
    }

    /// Adds `pt` to the front or back of the edge's output ring (no-op for a repeated point).
    pub(super) fn add_out_pt(&mut self, e: usize, pt: Point64) -> usize {
        let Some(outrec) = self.actives[e].outrec else {
            // callers only add to hot edges
            self.succeeded = false;
            return 0;
        };
        let Some(op_front) = self.outrecs[outrec].pts else {
            self.succeeded = false;
            return 0;
        };
        let to_front = self.is_front(e);
        let op_back = self.outpts[op_front].next;

        if to_front {
            if pt == self.outpts[op_front].pt {
                return op_front;
            }
        } else if pt == self.outpts[op_back].pt {
            return op_back;
        }

        let new_op = self.new_out_pt(pt, outrec);
        self.outpts[op_back].prev = new_op;
        self.outpts[new_op].prev = op_front;
        self.outpts[new_op].next = op_back;
        self.outpts[op_front].next = new_op;
        if to_front {
            self.outrecs[outrec].pts = Some(new_op);
        }
        new_op
    }

    pub(super) fn start_open_path(&mut self, e: usize, pt: Point64) -> usize {
        let outrec = self.new_outrec();
        self.outrecs[outrec].is_open = true;
        if self.actives[e].wind_dx > 0 {
            self.outrecs[outrec].front_edge = Some(e);
            self.outrecs[outrec].back_edge = None;
        } else {
            self.outrecs[outrec].front_edge = None;
            self.outrecs[outrec].back_edge = Some(e);
        }
        self.actives[e].outrec = Some(outrec);
        let op = self.new_out_pt(pt, outrec);
        self.outrecs[outrec].pts = Some(op);
        op
    }

    pub(super) fn swap_outrecs(&mut self, e1: usize, e2: usize) {
        let or1 = self.actives[e1].outrec;
        let or2 = self.actives[e2].outrec;
        if or1 == or2 {
            if let Some(o) = or1 {
                let rec = &mut self.outrecs[o];
                std::mem::swap(&mut rec.front_edge, &mut rec.back_edge);
            }
            return;
        }
        if let Some(o) = or1 {
            if self.outrecs[o].front_edge == Some(e1) {
                self.outrecs[o].front_edge = Some(e2);
            } else {
                self.outrecs[o].back_edge = Some(e2);
            }
        }
        if let Some(o) = or2 {
            if self.outrecs[o].front_edge == Some(e2) {
                self.outrecs[o].front_edge = Some(e1);
            } else {
                self.outrecs[o].back_edge = Some(e1);
            }
        }
        self.actives[e1].outrec = or2;
        self.actives[e2].outrec = or1;
    }

    /// Separates a joined pair at `curr_pt`, restarting output from there.
    pub(super) fn split(&mut self, e: usize, curr_pt: Point64) {
        if self.actives[e].join_with == JoinWith::Right {
            self.actives[e].join_with = JoinWith::None;
            if let Some(n) = self.actives[e].next_in_ael {
                self.actives[n].join_with = JoinWith::None;
                self.add_local_min_poly(e, n, curr_pt, true);
            }
        } else {
            self.actives[e].join_with = JoinWith::None;
            if let Some(p) = self.actives[e].prev_in_ael {
                self.actives[p].join_with = JoinWith::None;
                self.add_local_min_poly(p, e, curr_pt, true);
            }
        }
    }

    /// Joins the output of `e` with its left neighbor when both are hot and coincident at `pt`.
    pub(super) fn check_join_left(&mut self, e: usize, pt: Point64, check_curr_x: bool) {
        let Some(prev) = self.actives[e].prev_in_ael else {
            return;
        };
        if !self.is_hot(e)
            || !self.is_hot(prev)
            || self.is_horizontal(e)
            || self.is_horizontal(prev)
            || self.is_open(e)
            || self.is_open(prev)
        {
            return;
        }
        let (ae, ap) = (&self.actives[e], &self.actives[prev]);
        // avoid trivial joins
        if (pt.y < ae.top.y + 2 || pt.y < ap.top.y + 2) && (ae.bot.y > pt.y || ap.bot.y > pt.y) {
            return;
        }
        if check_curr_x {
            if perpendic_dist_from_line_sqrd(pt, ap.bot, ap.top) > 0.25 {
                return;
            }
        } else if ae.curr_x != ap.curr_x {
            return;
        }
        if cross_product(ae.top, pt, ap.top) != 0 {
            return;
        }

        let (Some(or_e), Some(or_p)) = (ae.outrec, ap.outrec) else {
            return;
        };
        if or_e == or_p {
            self.add_local_max_poly(prev, e, pt);
        } else if or_e < or_p {
            self.join_outrec_paths(e, prev);
        } else {
            self.join_outrec_paths(prev, e);
        }
        self.actives[prev].join_with = JoinWith::Right;
        self.actives[e].join_with = JoinWith::Left;
    }

    /// Joins the output of `e` with its right neighbor when both are hot and coincident at `pt`.
    pub(super) fn check_join_right(&mut self, e: usize, pt: Point64, check_curr_x: bool) {
        let Some(next) = self.actives[e].next_in_ael else {
            return;
        };
        if !self.is_hot(e)
            || !self.is_hot(next)
            || self.is_horizontal(e)
            || self.is_horizontal(next)
            || self.is_open(e)
            || self.is_open(next)
        {
            return;
        }
        let (ae, an) = (&self.actives[e], &self.actives[next]);
        // avoid trivial joins
        if (pt.y < ae.top.y + 2 || pt.y < an.top.y + 2) && (ae.bot.y > pt.y || an.bot.y > pt.y) {
            return;
        }
        if check_curr_x {
            if perpendic_dist_from_line_sqrd(pt, an.bot, an.top) > 0.25 {
                return;
            }
        } else if ae.curr_x != an.curr_x {
            return;
        }
        if cross_product(ae.top, pt, an.top) != 0 {
            return;
        }

        let (Some(or_e), Some(or_n)) = (ae.outrec, an.outrec) else {
            return;
        };
        if or_e == or_n {
            self.add_local_max_poly(e, next, pt);
        } else if or_e < or_n {
            self.join_outrec_paths(e, next);
        } else {
            self.join_outrec_paths(next, e);
        }
        self.actives[e].join_with = JoinWith::Right;
        self.actives[next].join_with = JoinWith::Left;
    }

    // assembly

    /// Converts finished output records into paths.
    pub(super) fn build_paths(&mut self) -> Result<BooleanResult, ClipError> {
        let mut closed = Vec::new();
        let mut open = Vec::new();
        closed
            .try_reserve(self.outrecs.len())
            .or_exhausted("closed solution")?;

        // cleaning can split records, appending to `outrecs`
        let mut i = 0;
        while i < self.outrecs.len() {
            let Some(pts) = self.outrecs[i].pts else {
                i += 1;
                continue;
            };
            if self.outrecs[i].is_open {
                if let Some(path) = self.build_path(pts, self.reverse_solution, true)? {
                    open.try_reserve(1).or_exhausted("open solution")?;
                    open.push(path);
                }
            } else {
                self.clean_collinear(i);
                if let Some(pts) = self.outrecs[i].pts {
                    if let Some(path) = self.build_path(pts, self.reverse_solution, false)? {
                        closed.try_reserve(1).or_exhausted("closed solution")?;
                        closed.push(path);
                    }
                }
            }
            i += 1;
        }

        Ok(BooleanResult::new(closed, open))
    }

    fn build_path(
        &self,
        op: usize,
        reverse: bool,
        is_open: bool,
    ) -> Result<Option<Path64>, ClipError> {
        let ops = &self.outpts;
        if ops[op].next == op || (!is_open && ops[op].next == ops[op].prev) {
            return Ok(None);
        }

        let (start, mut op2) = if reverse {
            (op, ops[op].prev)
        } else {
            let start = ops[op].next;
            (start, ops[start].next)
        };
        let mut last_pt = ops[start].pt;
        let mut path = Path64::new();
        path.try_reserve(4).or_exhausted("output path")?;
        path.push(last_pt);

        while op2 != start {
            if ops[op2].pt != last_pt {
                last_pt = ops[op2].pt;
                path.try_reserve(1).or_exhausted("output path")?;
                path.push(last_pt);
            }
            op2 = if reverse { ops[op2].prev } else { ops[op2].next };
        }

        if is_open {
            return Ok((path.len() >= 2).then_some(path));
        }
        if path.len() < 3 || (path.len() == 3 && self.is_very_small_triangle(op2)) {
            return Ok(None);
        }
        Ok(Some(path))
    }

    fn is_very_small_triangle(&self, op: usize) -> bool {
        let ops = &self.outpts;
        let (next, prev) = (ops[op].next, ops[op].prev);
        ops[next].next == prev
            && (pts_really_close(ops[prev].pt, ops[next].pt)
                || pts_really_close(ops[op].pt, ops[next].pt)
                || pts_really_close(ops[op].pt, ops[prev].pt))
    }

    fn is_valid_closed_path(&self, op: Option<usize>) -> bool {
        match op {
            Some(op) => {
                let o = &self.outpts[op];
                o.next != op && o.next != o.prev && !self.is_very_small_triangle(op)
            }
            None => false,
        }
    }

    /// Unlinks `op` from its ring, returns the point that followed it.
    fn dispose_out_pt(&mut self, op: usize) -> usize {
        let OutPt { next, prev, .. } = self.outpts[op];
        self.outpts[prev].next = next;
        self.outpts[next].prev = prev;
        next
    }

    /// Removes duplicate points, 180 degree spikes, and (unless preserved) collinear points.
    fn clean_collinear(&mut self, outrec: usize) {
        let Some(outrec) = self.get_real_outrec(Some(outrec)) else {
            return;
        };
        if self.outrecs[outrec].is_open {
            return;
        }
        if !self.is_valid_closed_path(self.outrecs[outrec].pts) {
            self.outrecs[outrec].pts = None;
            return;
        }
        let Some(mut start_op) = self.outrecs[outrec].pts else {
            return;
        };

        let mut op2 = start_op;
        loop {
            let OutPt { pt, next, prev, .. } = self.outpts[op2];
            let (prev_pt, next_pt) = (self.outpts[prev].pt, self.outpts[next].pt);
            if cross_product(prev_pt, pt, next_pt) == 0
                && (pt == prev_pt
                    || pt == next_pt
                    || !self.preserve_collinear
                    || dot_product(prev_pt, pt, next_pt) < 0)
            {
                if Some(op2) == self.outrecs[outrec].pts {
                    self.outrecs[outrec].pts = Some(prev);
                }
                op2 = self.dispose_out_pt(op2);
                if !self.is_valid_closed_path(Some(op2)) {
                    self.outrecs[outrec].pts = None;
                    return;
                }
                start_op = op2;
                continue;
            }
            op2 = next;
            if op2 == start_op {
                break;
            }
        }

        self.fix_self_intersects(outrec);
    }

    fn fix_self_intersects(&mut self, outrec: usize) {
        let Some(mut op2) = self.outrecs[outrec].pts else {
            return;
        };
        loop {
            let OutPt { pt, next, prev, .. } = self.outpts[op2];
            let next_next = self.outpts[next].next;
            // triangles can't self intersect
            if prev == next_next {
                break;
            }
            if segments_intersect(
                self.outpts[prev].pt,
                pt,
                self.outpts[next].pt,
                self.outpts[next_next].pt,
                false,
            ) {
                let Some(pts) = self.outrecs[outrec].pts else {
                    break;
                };
                if op2 == pts || next == pts {
                    self.outrecs[outrec].pts = Some(self.outpts[pts].prev);
                }
                self.do_split_op(outrec, op2);
                match self.outrecs[outrec].pts {
                    Some(p) => op2 = p,
                    None => break,
                }
                continue;
            }
            op2 = next;
            if Some(op2) == self.outrecs[outrec].pts {
                break;
            }
        }
    }

    /// Shoelace area of an output ring.
    fn area_out_pts(&self, op: usize) -> f64 {
        let mut area = 0.0;
        let mut op2 = op;
        loop {
            let prev = self.outpts[self.outpts[op2].prev].pt;
            let pt = self.outpts[op2].pt;
            area += (prev.y as f64 + pt.y as f64) * (prev.x as f64 - pt.x as f64);
            op2 = self.outpts[op2].next;
            if op2 == op {
                break;
            }
        }
        area * 0.5
    }

    /// Removes the self intersection between `split_op.prev -> split_op` and
    /// `split_op.next -> split_op.next.next`, keeping the cut off triangle as a new record when it
    /// is significant.
    fn do_split_op(&mut self, outrec: usize, split_op: usize) {
        let prev_op = self.outpts[split_op].prev;
        let split_next = self.outpts[split_op].next;
        let next_next_op = self.outpts[split_next].next;
        self.outrecs[outrec].pts = Some(prev_op);

        let ip = get_segment_intersect_pt(
            self.outpts[prev_op].pt,
            self.outpts[split_op].pt,
            self.outpts[split_next].pt,
            self.outpts[next_next_op].pt,
        )
        .unwrap_or(self.outpts[split_op].pt);

        let area1 = self.area_out_pts(prev_op);
        let abs_area1 = area1.abs();
        if abs_area1 < 2.0 {
            self.outrecs[outrec].pts = None;
            return;
        }

        let area2 = area_triangle(ip, self.outpts[split_op].pt, self.outpts[split_next].pt);
        let abs_area2 = area2.abs();

        // unlink split_op and split_op.next, inserting the intersection point
        if ip == self.outpts[prev_op].pt || ip == self.outpts[next_next_op].pt {
            self.outpts[next_next_op].prev = prev_op;
            self.outpts[prev_op].next = next_next_op;
        } else {
            let owner = self.outpts[prev_op].outrec;
            let new_op2 = self.new_out_pt(ip, owner);
            self.outpts[new_op2].prev = prev_op;
            self.outpts[new_op2].next = next_next_op;
            self.outpts[next_next_op].prev = new_op2;
            self.outpts[prev_op].next = new_op2;
        }

        // area1 is the whole path before splitting, area2 the cut off triangle, same signs mean
        // the triangle is larger or there are further intersections
        if abs_area2 >= 1.0 && (abs_area2 > abs_area1 || (area2 > 0.0) == (area1 > 0.0)) {
            let new_or = self.new_outrec();
            self.outrecs[new_or].owner = self.outrecs[outrec].owner;
            self.outpts[split_op].outrec = new_or;
            self.outpts[split_next].outrec = new_or;
            let new_op = self.new_out_pt(ip, new_or);
            self.outpts[new_op].prev = split_next;
            self.outpts[new_op].next = split_op;
            self.outrecs[new_or].pts = Some(new_op);
            self.outpts[split_op].prev = new_op;
            self.outpts[split_next].next = new_op;
        }
    }
}
