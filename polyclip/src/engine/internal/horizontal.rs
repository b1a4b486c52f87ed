use super::{HorzJoin, HorzSegment, OutPt, SweepEngine, LOCAL_MAX, OPEN_END};
use crate::geometry::Point64;

impl SweepEngine {
    /// Top vertex of the run of horizontals starting at `e` if that run ends at a local maximum.
    fn get_curr_y_maxima_vertex(&self, e: usize, is_open: bool) -> Option<usize> {
        let ae = &self.actives[e];
        let stop_flags = if is_open { OPEN_END | LOCAL_MAX } else { 0 };
        let mut result = ae.vertex_top;
        loop {
            let v = &self.vertices[result];
            let next = if ae.wind_dx > 0 { v.next } else { v.prev };
            if self.vertices[next].pt.y != v.pt.y || v.flags & stop_flags != 0 {
                break;
            }
            result = next;
        }
        (self.vertices[result].flags & LOCAL_MAX != 0).then_some(result)
    }

    /// Extends a horizontal edge over following horizontal vertices.
    ///
    /// 180 degree spikes are always removed, collinear continuations only when
    /// `preserve_collinear` is false.
    pub(super) fn trim_horz(&mut self, e: usize, preserve_collinear: bool) {
        let mut was_trimmed = false;
        let mut pt = self.vertices[self.next_vertex(e)].pt;
        while pt.y == self.actives[e].top.y {
            let ae = &self.actives[e];
            if preserve_collinear && ((pt.x < ae.top.x) != (ae.bot.x < ae.top.x)) {
                break;
            }
            let next = self.next_vertex(e);
            self.actives[e].vertex_top = next;
            self.actives[e].top = pt;
            was_trimmed = true;
            if self.is_maxima(e) {
                break;
            }
            pt = self.vertices[self.next_vertex(e)].pt;
        }
        if was_trimmed {
            self.set_dx(e);
        }
    }

    /// Returns `(left_to_right, horz_left, horz_right)` for the horizontal's current segment.
    fn reset_horz_direction(&self, horz: usize, vertex_max: Option<usize>) -> (bool, i64, i64) {
        let h = &self.actives[horz];
        if h.bot.x == h.top.x {
            // zero length, direction is toward its maxima pair
            let mut e = h.next_in_ael;
            while let Some(i) = e {
                if Some(self.actives[i].vertex_top) == vertex_max {
                    break;
                }
                e = self.actives[i].next_in_ael;
            }
            (e.is_some(), h.curr_x, h.curr_x)
        } else if h.curr_x < h.top.x {
            (true, h.curr_x, h.top.x)
        } else {
            (false, h.top.x, h.curr_x)
        }
    }

    fn add_trial_horz_join(&mut self, op: usize) {
        let outrec = self.outpts[op].outrec;
        if self.outrecs[outrec].is_open {
            return;
        }
        self.horz_segs.push(HorzSegment {
            left_op: op,
            right_op: None,
            left_to_right: true,
        });
    }

    /// Most recently added point on the hot edge's side of its output ring.
    fn get_last_op(&self, hot_edge: usize) -> Option<usize> {
        let outrec = self.actives[hot_edge].outrec?;
        let pts = self.outrecs[outrec].pts?;
        if self.outrecs[outrec].front_edge == Some(hot_edge) {
            Some(pts)
        } else {
            Some(self.outpts[pts].next)
        }
    }

    /// Processes a horizontal edge (and any horizontals following it in its bound), intersecting
    /// it with every edge it passes over.
    ///
    /// A horizontal is processed left to right or right to left depending on its direction.
    /// Edges it meets are swapped past it, unless the horizontal ends at a local maximum where
    /// the pair is closed.
    pub(super) fn do_horizontal(&mut self, horz: usize) {
        let horz_is_open = self.is_open(horz);
        let y = self.actives[horz].bot.y;
        let vertex_max = self.get_curr_y_maxima_vertex(horz, horz_is_open);

        let (mut left_to_right, mut horz_left, mut horz_right) =
            self.reset_horz_direction(horz, vertex_max);

        if self.is_hot(horz) {
            let op = self.add_out_pt(horz, Point64::new(self.actives[horz].curr_x, y));
            self.add_trial_horz_join(op);
        }
        let mut curr_horz_outrec = self.actives[horz].outrec;

        loop {
            let mut e = if left_to_right {
                self.actives[horz].next_in_ael
            } else {
                self.actives[horz].prev_in_ael
            };

            while let Some(ei) = e {
                if Some(self.actives[ei].vertex_top) == vertex_max {
                    // reached the maxima pair
                    if self.is_hot(horz) && self.is_joined(ei) {
                        let top = self.actives[ei].top;
                        self.split(ei, top);
                    }
                    if self.is_hot(horz) {
                        while Some(self.actives[horz].vertex_top) != vertex_max {
                            let top = self.actives[horz].top;
                            self.add_out_pt(horz, top);
                            self.update_edge_into_ael(horz);
                        }
                        let top = self.actives[horz].top;
                        if left_to_right {
                            self.add_local_max_poly(horz, ei, top);
                        } else {
                            self.add_local_max_poly(ei, horz, top);
                        }
                    }
                    self.delete_from_ael(ei);
                    self.delete_from_ael(horz);
                    return;
                }

                // unless heading for a maximum, stop at the end of the horizontal
                if vertex_max != Some(self.actives[horz].vertex_top) || self.is_open_end(horz) {
                    let e_x = self.actives[ei].curr_x;
                    if (left_to_right && e_x > horz_right) || (!left_to_right && e_x < horz_left) {
                        break;
                    }

                    if e_x == self.actives[horz].top.x && !self.is_horizontal(ei) {
                        let pt = self.vertices[self.next_vertex(horz)].pt;
                        let e_top_x = self.top_x(ei, pt.y);
                        if self.is_open(ei) && !self.is_same_polytype(ei, horz) && !self.is_hot(ei)
                        {
                            if (left_to_right && e_top_x > pt.x)
                                || (!left_to_right && e_top_x < pt.x)
                            {
                                break;
                            }
                        } else if (left_to_right && e_top_x >= pt.x)
                            || (!left_to_right && e_top_x <= pt.x)
                        {
                            // e continues on the far side of the horizontal's out slope
                            break;
                        }
                    }
                }

                let pt = Point64::new(self.actives[ei].curr_x, y);
                if left_to_right {
                    self.intersect_edges(horz, ei, pt);
                    self.swap_positions_in_ael(horz, ei);
                    self.check_join_left(ei, pt, false);
                    self.actives[horz].curr_x = self.actives[ei].curr_x;
                    e = self.actives[horz].next_in_ael;
                } else {
                    self.intersect_edges(ei, horz, pt);
                    self.swap_positions_in_ael(ei, horz);
                    self.check_join_right(ei, pt, false);
                    self.actives[horz].curr_x = self.actives[ei].curr_x;
                    e = self.actives[horz].prev_in_ael;
                }

                let horz_outrec = self.actives[horz].outrec;
                if horz_outrec.is_some() && horz_outrec != curr_horz_outrec {
                    curr_horz_outrec = horz_outrec;
                    if let Some(op) = self.get_last_op(horz) {
                        self.add_trial_horz_join(op);
                    }
                }
            }

            if horz_is_open && self.is_open_end(horz) {
                if let Some(or) = self.actives[horz].outrec {
                    let top = self.actives[horz].top;
                    self.add_out_pt(horz, top);
                    if self.is_front(horz) {
                        self.outrecs[or].front_edge = None;
                    } else {
                        self.outrecs[or].back_edge = None;
                    }
                    self.actives[horz].outrec = None;
                }
                self.delete_from_ael(horz);
                return;
            }
            if self.vertices[self.next_vertex(horz)].pt.y != self.actives[horz].top.y {
                break;
            }

            // more horizontals in this bound
            if self.is_hot(horz) {
                let top = self.actives[horz].top;
                self.add_out_pt(horz, top);
            }
            self.update_edge_into_ael(horz);
            (left_to_right, horz_left, horz_right) = self.reset_horz_direction(horz, vertex_max);
        }

        if self.is_hot(horz) {
            let top = self.actives[horz].top;
            let op = self.add_out_pt(horz, top);
            self.add_trial_horz_join(op);
        }
        // end of an intermediate horizontal
        self.update_edge_into_ael(horz);
    }

    // horizontal joins

    fn set_horz_seg_heading_forward(&mut self, seg: usize, op_p: usize, op_n: usize) -> bool {
        let (px, nx) = (self.outpts[op_p].pt.x, self.outpts[op_n].pt.x);
        if px == nx {
            return false;
        }
        let hs = &mut self.horz_segs[seg];
        if px < nx {
            hs.left_op = op_p;
            hs.right_op = Some(op_n);
            hs.left_to_right = true;
        } else {
            hs.left_op = op_n;
            hs.right_op = Some(op_p);
            hs.left_to_right = false;
        }
        true
    }

    /// Widens a trial segment to the full horizontal run of its output ring.
    fn update_horz_segment(&mut self, seg: usize) -> bool {
        let op = self.horz_segs[seg].left_op;
        let Some(outrec) = self.get_real_outrec(Some(self.outpts[op].outrec)) else {
            self.horz_segs[seg].right_op = None;
            return false;
        };
        let curr_y = self.outpts[op].pt.y;
        let (mut op_p, mut op_n) = (op, op);
        let ops = &self.outpts;

        match (self.outrecs[outrec].front_edge, self.outrecs[outrec].pts) {
            (Some(_), Some(op_a)) => {
                // still being built, don't walk past the open ends of the ring
                let op_z = ops[op_a].next;
                while op_p != op_z && ops[ops[op_p].prev].pt.y == curr_y {
                    op_p = ops[op_p].prev;
                }
                while op_n != op_a && ops[ops[op_n].next].pt.y == curr_y {
                    op_n = ops[op_n].next;
                }
            }
            _ => {
                while ops[op_p].prev != op_n && ops[ops[op_p].prev].pt.y == curr_y {
                    op_p = ops[op_p].prev;
                }
                while ops[op_n].next != op_p && ops[ops[op_n].next].pt.y == curr_y {
                    op_n = ops[op_n].next;
                }
            }
        }

        let result = self.set_horz_seg_heading_forward(seg, op_p, op_n)
            && self.outpts[self.horz_segs[seg].left_op].horz.is_none();
        if result {
            let left_op = self.horz_segs[seg].left_op;
            self.outpts[left_op].horz = Some(seg);
        } else {
            self.horz_segs[seg].right_op = None;
        }
        result
    }

    /// Copy of `op` linked after (or before) it in the same ring.
    fn duplicate_op(&mut self, op: usize, insert_after: bool) -> usize {
        let OutPt { pt, outrec, .. } = self.outpts[op];
        let result = self.new_out_pt(pt, outrec);
        if insert_after {
            let next = self.outpts[op].next;
            self.outpts[result].next = next;
            self.outpts[next].prev = result;
            self.outpts[result].prev = op;
            self.outpts[op].next = result;
        } else {
            let prev = self.outpts[op].prev;
            self.outpts[result].prev = prev;
            self.outpts[prev].next = result;
            self.outpts[result].next = op;
            self.outpts[op].prev = result;
        }
        result
    }

    /// Pairs up overlapping horizontal runs heading in opposite directions, these are later
    /// joined (or split) once the sweep completes.
    pub(super) fn convert_horz_segs_to_joins(&mut self) {
        let mut valid = 0;
        for seg in 0..self.horz_segs.len() {
            if self.update_horz_segment(seg) {
                valid += 1;
            }
        }
        if valid < 2 {
            return;
        }

        let ops = &self.outpts;
        self.horz_segs
            .sort_by(|a, b| match (a.right_op.is_some(), b.right_op.is_some()) {
                (true, true) => ops[a.left_op].pt.x.cmp(&ops[b.left_op].pt.x),
                (a_valid, b_valid) => b_valid.cmp(&a_valid),
            });

        for i in 0..valid - 1 {
            for j in i + 1..valid {
                let (hs1, hs2) = (self.horz_segs[i], self.horz_segs[j]);
                let (Some(r1), Some(r2)) = (hs1.right_op, hs2.right_op) else {
                    continue;
                };
                let ops = &self.outpts;
                if ops[hs2.left_op].pt.x >= ops[r1].pt.x
                    || hs2.left_to_right == hs1.left_to_right
                    || ops[r2].pt.x <= ops[hs1.left_op].pt.x
                {
                    continue;
                }

                let curr_y = ops[hs1.left_op].pt.y;
                let (mut l1, mut l2) = (hs1.left_op, hs2.left_op);
                let join = if hs1.left_to_right {
                    while ops[ops[l1].next].pt.y == curr_y && ops[ops[l1].next].pt.x <= ops[l2].pt.x
                    {
                        l1 = ops[l1].next;
                    }
                    while ops[ops[l2].prev].pt.y == curr_y && ops[ops[l2].prev].pt.x <= ops[l1].pt.x
                    {
                        l2 = ops[l2].prev;
                    }
                    HorzJoin {
                        op1: self.duplicate_op(l1, true),
                        op2: self.duplicate_op(l2, false),
                    }
                } else {
                    while ops[ops[l1].prev].pt.y == curr_y && ops[ops[l1].prev].pt.x <= ops[l2].pt.x
                    {
                        l1 = ops[l1].prev;
                    }
                    while ops[ops[l2].next].pt.y == curr_y && ops[ops[l2].next].pt.x <= ops[l1].pt.x
                    {
                        l2 = ops[l2].next;
                    }
                    HorzJoin {
                        op1: self.duplicate_op(l2, true),
                        op2: self.duplicate_op(l1, false),
                    }
                };
                self.horz_segs[i].left_op = l1;
                self.horz_segs[j].left_op = l2;
                self.horz_joins.push(join);
            }
        }
    }

    fn fix_outrec_pts(&mut self, outrec: usize) {
        let Some(start) = self.outrecs[outrec].pts else {
            return;
        };
        let mut op = start;
        loop {
            self.outpts[op].outrec = outrec;
            op = self.outpts[op].next;
            if op == start {
                break;
            }
        }
    }

    /// Relinks output rings at every recorded horizontal join.
    ///
    /// Joining two points of the same ring splits it into two records, otherwise the second ring
    /// is merged into the first.
    pub(super) fn process_horz_joins(&mut self) {
        for k in 0..self.horz_joins.len() {
            let HorzJoin { op1, op2 } = self.horz_joins[k];
            let or1 = self.get_real_outrec(Some(self.outpts[op1].outrec));
            let or2 = self.get_real_outrec(Some(self.outpts[op2].outrec));
            let (Some(or1), Some(or2)) = (or1, or2) else {
                continue;
            };

            let op1b = self.outpts[op1].next;
            let op2b = self.outpts[op2].prev;
            self.outpts[op1].next = op2;
            self.outpts[op2].prev = op1;
            self.outpts[op1b].prev = op2b;
            self.outpts[op2b].next = op1b;

            if or1 == or2 {
                let new_or = self.new_outrec();
                self.outrecs[new_or].pts = Some(op1b);
                self.fix_outrec_pts(new_or);

                // the first record's start point may have moved into the new record
                if let Some(pts) = self.outrecs[or1].pts {
                    if self.outpts[pts].outrec == new_or {
                        self.outrecs[or1].pts = Some(op1);
                        self.outpts[op1].outrec = or1;
                    }
                }
                self.outrecs[new_or].owner = Some(or1);
            } else {
                self.outrecs[or2].pts = None;
                self.outrecs[or2].owner = Some(or1);
            }
        }
    }
}
