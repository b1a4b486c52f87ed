use super::{Active, IntersectNode, JoinWith, SweepEngine, OPEN_END, OPEN_START};
use crate::{
    core::math::{cross_product, get_closest_point_on_segment, get_segment_intersect_pt},
    engine::{ClipType, FillRule, PathType},
    error::{ClipError, ReserveExt},
    geometry::Point64,
};

impl SweepEngine {
    fn new_bound(&mut self, local_min: usize, wind_dx: i32) -> usize {
        let vertex = self.minima[local_min].vertex;
        let bot = self.vertices[vertex].pt;
        let vertex_top = if wind_dx < 0 {
            self.vertices[vertex].prev
        } else {
            self.vertices[vertex].next
        };
        self.actives.push(Active {
            bot,
            top: self.vertices[vertex_top].pt,
            curr_x: bot.x,
            dx: 0.0,
            wind_dx,
            wind_cnt: 0,
            wind_cnt2: 0,
            outrec: None,
            prev_in_ael: None,
            next_in_ael: None,
            vertex_top,
            local_min,
            is_left_bound: false,
            join_with: JoinWith::None,
        });
        let e = self.actives.len() - 1;
        self.set_dx(e);
        e
    }

    /// Creates the two bounds of every local minimum at `bot_y` and inserts them into the AEL.
    pub(super) fn insert_local_minima_into_ael(&mut self, bot_y: i64) {
        while let Some(lm) = self.pop_local_minima(bot_y) {
            let flags = self.vertices[self.minima[lm].vertex].flags;

            // the left bound descends through `prev` links, the right bound ascends
            let mut left_bound = if flags & OPEN_START != 0 {
                None
            } else {
                Some(self.new_bound(lm, -1))
            };
            let mut right_bound = if flags & OPEN_END != 0 {
                None
            } else {
                Some(self.new_bound(lm, 1))
            };

            match (left_bound, right_bound) {
                (Some(lb), Some(rb)) => {
                    let swap = if self.is_horizontal(lb) {
                        self.is_heading_right_horz(lb)
                    } else if self.is_horizontal(rb) {
                        self.is_heading_left_horz(rb)
                    } else {
                        self.actives[lb].dx < self.actives[rb].dx
                    };
                    if swap {
                        std::mem::swap(&mut left_bound, &mut right_bound);
                    }
                }
                (None, _) => {
                    left_bound = right_bound.take();
                }
                _ => {}
            }

            let Some(lb) = left_bound else {
                continue;
            };

            self.actives[lb].is_left_bound = true;
            self.insert_left_edge(lb);

            let contributing = if self.is_open(lb) {
                self.set_wind_count_for_open_path_edge(lb);
                self.is_contributing_open(lb)
            } else {
                self.set_wind_count_for_closed_path_edge(lb);
                self.is_contributing_closed(lb)
            };

            if let Some(rb) = right_bound {
                self.actives[rb].is_left_bound = false;
                self.actives[rb].wind_cnt = self.actives[lb].wind_cnt;
                self.actives[rb].wind_cnt2 = self.actives[lb].wind_cnt2;
                self.insert_right_edge(lb, rb);

                if contributing {
                    let bot = self.actives[lb].bot;
                    self.add_local_min_poly(lb, rb, bot, true);
                    if !self.is_horizontal(lb) {
                        self.check_join_left(lb, bot, false);
                    }
                }

                while let Some(next) = self.actives[rb].next_in_ael {
                    if !self.is_valid_ael_order(next, rb) {
                        break;
                    }
                    let bot = self.actives[rb].bot;
                    self.intersect_edges(rb, next, bot);
                    self.swap_positions_in_ael(rb, next);
                }

                if self.is_horizontal(rb) {
                    self.horz_stack.push(rb);
                } else {
                    let bot = self.actives[rb].bot;
                    self.check_join_right(rb, bot, false);
                    self.insert_scanline(self.actives[rb].top.y);
                }
            } else if contributing {
                let bot = self.actives[lb].bot;
                self.start_open_path(lb, bot);
            }

            if self.is_horizontal(lb) {
                self.horz_stack.push(lb);
            } else {
                self.insert_scanline(self.actives[lb].top.y);
            }
        }
    }

    /// Returns true if `newcomer` belongs to the right of `resident` in the AEL.
    fn is_valid_ael_order(&self, resident: usize, newcomer: usize) -> bool {
        let (r, n) = (&self.actives[resident], &self.actives[newcomer]);
        if n.curr_x != r.curr_x {
            return n.curr_x > r.curr_x;
        }

        // turning direction resident.top, newcomer.bot, newcomer.top
        let d = cross_product(r.top, n.bot, n.top);
        if d != 0 {
            return d < 0;
        }

        // collinear edges, place starting bounds by the direction they are about to turn
        if !self.is_maxima(resident) && r.top.y > n.top.y {
            let next_pt = self.vertices[self.next_vertex(resident)].pt;
            return cross_product(n.bot, r.top, next_pt) <= 0;
        }
        if !self.is_maxima(newcomer) && n.top.y > r.top.y {
            let next_pt = self.vertices[self.next_vertex(newcomer)].pt;
            return cross_product(n.bot, n.top, next_pt) >= 0;
        }

        let y = n.bot.y;
        let newcomer_is_left = n.is_left_bound;
        let resident_min_y = self.vertices[self.minima[r.local_min].vertex].pt.y;
        if r.bot.y != y || resident_min_y != y {
            return newcomer_is_left;
        }
        // resident was also just inserted
        if r.is_left_bound != newcomer_is_left {
            return newcomer_is_left;
        }
        let r_pp = self.vertices[self.prev_prev_vertex(resident)].pt;
        if cross_product(r_pp, r.bot, r.top) == 0 {
            return true;
        }
        // compare turning direction of the alternate bounds
        let n_pp = self.vertices[self.prev_prev_vertex(newcomer)].pt;
        (cross_product(r_pp, n.bot, n_pp) > 0) == newcomer_is_left
    }

    fn insert_left_edge(&mut self, e: usize) {
        let Some(head) = self.ael_head else {
            self.actives[e].prev_in_ael = None;
            self.actives[e].next_in_ael = None;
            self.ael_head = Some(e);
            return;
        };

        if !self.is_valid_ael_order(head, e) {
            self.actives[e].prev_in_ael = None;
            self.actives[e].next_in_ael = Some(head);
            self.actives[head].prev_in_ael = Some(e);
            self.ael_head = Some(e);
            return;
        }

        let mut e2 = head;
        while let Some(next) = self.actives[e2].next_in_ael {
            if !self.is_valid_ael_order(next, e) {
                break;
            }
            e2 = next;
        }
        // don't separate joined edges
        if self.actives[e2].join_with == JoinWith::Right {
            if let Some(next) = self.actives[e2].next_in_ael {
                e2 = next;
            }
        }
        let next = self.actives[e2].next_in_ael;
        self.actives[e].next_in_ael = next;
        if let Some(n) = next {
            self.actives[n].prev_in_ael = Some(e);
        }
        self.actives[e].prev_in_ael = Some(e2);
        self.actives[e2].next_in_ael = Some(e);
    }

    fn insert_right_edge(&mut self, e: usize, e2: usize) {
        let next = self.actives[e].next_in_ael;
        self.actives[e2].next_in_ael = next;
        if let Some(n) = next {
            self.actives[n].prev_in_ael = Some(e2);
        }
        self.actives[e2].prev_in_ael = Some(e);
        self.actives[e].next_in_ael = Some(e2);
    }

    pub(super) fn delete_from_ael(&mut self, e: usize) {
        let prev = self.actives[e].prev_in_ael;
        let next = self.actives[e].next_in_ael;
        if prev.is_none() && next.is_none() && self.ael_head != Some(e) {
            // already deleted
            return;
        }
        match prev {
            Some(p) => self.actives[p].next_in_ael = next,
            None => self.ael_head = next,
        }
        if let Some(n) = next {
            self.actives[n].prev_in_ael = prev;
        }
        self.actives[e].prev_in_ael = None;
        self.actives[e].next_in_ael = None;
    }

    /// Swaps adjacent edges, `e1` must be immediately left of `e2`.
    pub(super) fn swap_positions_in_ael(&mut self, e1: usize, e2: usize) {
        let next = self.actives[e2].next_in_ael;
        if let Some(n) = next {
            self.actives[n].prev_in_ael = Some(e1);
        }
        let prev = self.actives[e1].prev_in_ael;
        if let Some(p) = prev {
            self.actives[p].next_in_ael = Some(e2);
        }
        self.actives[e2].prev_in_ael = prev;
        self.actives[e2].next_in_ael = Some(e1);
        self.actives[e1].prev_in_ael = Some(e2);
        self.actives[e1].next_in_ael = next;
        if prev.is_none() {
            self.ael_head = Some(e2);
        }
    }

    /// Advances an edge to the next segment of its bound.
    pub(super) fn update_edge_into_ael(&mut self, e: usize) {
        let vertex_top = self.next_vertex(e);
        {
            let ae = &mut self.actives[e];
            ae.bot = ae.top;
            ae.vertex_top = vertex_top;
            ae.top = self.vertices[vertex_top].pt;
            ae.curr_x = ae.bot.x;
        }
        self.set_dx(e);

        if self.is_joined(e) {
            let bot = self.actives[e].bot;
            self.split(e, bot);
        }

        if self.is_horizontal(e) {
            if !self.is_open(e) {
                self.trim_horz(e, self.preserve_collinear);
            }
            return;
        }

        self.insert_scanline(self.actives[e].top.y);
        let bot = self.actives[e].bot;
        self.check_join_left(e, bot, false);
        self.check_join_right(e, bot, true);
    }

    /// Other bound sharing `e`'s local minimum, searched among edges at the same bottom point.
    fn find_edge_with_matching_loc_min(&self, e: usize) -> Option<usize> {
        let lm = self.actives[e].local_min;
        let bot = self.actives[e].bot;

        let mut result = self.actives[e].next_in_ael;
        while let Some(r) = result {
            if self.actives[r].local_min == lm {
                return Some(r);
            }
            if !self.is_horizontal(r) && bot != self.actives[r].bot {
                break;
            }
            result = self.actives[r].next_in_ael;
        }

        let mut result = self.actives[e].prev_in_ael;
        while let Some(r) = result {
            if self.actives[r].local_min == lm {
                return Some(r);
            }
            if !self.is_horizontal(r) && bot != self.actives[r].bot {
                return None;
            }
            result = self.actives[r].prev_in_ael;
        }
        None
    }

    /// Updates winding counts of two crossing edges at `pt` and emits output as contribution
    /// changes. Returns the output point added, if any.
    pub(super) fn intersect_edges(&mut self, e1: usize, e2: usize, pt: Point64) -> Option<usize> {
        if self.has_open_paths && (self.is_open(e1) || self.is_open(e2)) {
            return self.intersect_open_edge(e1, e2, pt);
        }

        // closed paths from here on
        if self.is_joined(e1) {
            self.split(e1, pt);
        }
        if self.is_joined(e2) {
            self.split(e2, pt);
        }

        let even_odd = self.fill_rule == FillRule::EvenOdd;
        if self.is_same_polytype(e1, e2) {
            if even_odd {
                let w1 = self.actives[e1].wind_cnt;
                self.actives[e1].wind_cnt = self.actives[e2].wind_cnt;
                self.actives[e2].wind_cnt = w1;
            } else {
                let (dx1, dx2) = (self.actives[e1].wind_dx, self.actives[e2].wind_dx);
                let a1 = &mut self.actives[e1].wind_cnt;
                *a1 = if *a1 + dx2 == 0 { -*a1 } else { *a1 + dx2 };
                let a2 = &mut self.actives[e2].wind_cnt;
                *a2 = if *a2 - dx1 == 0 { -*a2 } else { *a2 - dx1 };
            }
        } else if even_odd {
            let flip = |w: i32| if w == 0 { 1 } else { 0 };
            self.actives[e1].wind_cnt2 = flip(self.actives[e1].wind_cnt2);
            self.actives[e2].wind_cnt2 = flip(self.actives[e2].wind_cnt2);
        } else {
            let (dx1, dx2) = (self.actives[e1].wind_dx, self.actives[e2].wind_dx);
            self.actives[e1].wind_cnt2 += dx2;
            self.actives[e2].wind_cnt2 -= dx1;
        }

        let (old_e1_windcnt, old_e2_windcnt) = self.oriented_counts(
            self.actives[e1].wind_cnt,
            self.actives[e2].wind_cnt,
        );
        let e1_in_01 = old_e1_windcnt == 0 || old_e1_windcnt == 1;
        let e2_in_01 = old_e2_windcnt == 0 || old_e2_windcnt == 1;
        let (e1_hot, e2_hot) = (self.is_hot(e1), self.is_hot(e2));

        if (!e1_hot && !e1_in_01) || (!e2_hot && !e2_in_01) {
            return None;
        }

        if e1_hot && e2_hot {
            if !e1_in_01
                || !e2_in_01
                || (!self.is_same_polytype(e1, e2) && self.clip_type != ClipType::Xor)
            {
                self.add_local_max_poly(e1, e2, pt)
            } else if self.is_front(e1) || self.actives[e1].outrec == self.actives[e2].outrec {
                // split polygons that only touch at a common vertex
                let result = self.add_local_max_poly(e1, e2, pt);
                self.add_local_min_poly(e1, e2, pt, false);
                result
            } else {
                let result = self.add_out_pt(e1, pt);
                self.add_out_pt(e2, pt);
                self.swap_outrecs(e1, e2);
                Some(result)
            }
        } else if e1_hot {
            let result = self.add_out_pt(e1, pt);
            self.swap_outrecs(e1, e2);
            Some(result)
        } else if e2_hot {
            let result = self.add_out_pt(e2, pt);
            self.swap_outrecs(e1, e2);
            Some(result)
        } else {
            let (e1_wc2, e2_wc2) = self.oriented_counts(
                self.actives[e1].wind_cnt2,
                self.actives[e2].wind_cnt2,
            );

            if !self.is_same_polytype(e1, e2) {
                return Some(self.add_local_min_poly(e1, e2, pt, false));
            }
            if old_e1_windcnt != 1 || old_e2_windcnt != 1 {
                return None;
            }
            let start = match self.clip_type {
                ClipType::Union => e1_wc2 <= 0 && e2_wc2 <= 0,
                ClipType::Difference => match self.polytype(e1) {
                    PathType::Clip => e1_wc2 > 0 && e2_wc2 > 0,
                    PathType::Subject => e1_wc2 <= 0 && e2_wc2 <= 0,
                },
                ClipType::Xor => true,
                ClipType::Intersection => e1_wc2 > 0 && e2_wc2 > 0,
            };
            if start {
                Some(self.add_local_min_poly(e1, e2, pt, false))
            } else {
                None
            }
        }
    }

    /// Winding counts as seen by the fill rule (absolute for EvenOdd/NonZero, negated for
    /// Negative).
    fn oriented_counts(&self, w1: i32, w2: i32) -> (i32, i32) {
        match self.fill_rule {
            FillRule::EvenOdd | FillRule::NonZero => (w1.abs(), w2.abs()),
            FillRule::Positive => (w1, w2),
            FillRule::Negative => (-w1, -w2),
        }
    }

    /// Open edge crossing a closed edge toggles the open edge's contribution.
    fn intersect_open_edge(&mut self, e1: usize, e2: usize, pt: Point64) -> Option<usize> {
        if self.is_open(e1) && self.is_open(e2) {
            return None;
        }
        let (edge_o, edge_c) = if self.is_open(e1) { (e1, e2) } else { (e2, e1) };
        if self.is_joined(edge_c) {
            self.split(edge_c, pt);
        }

        let wc = self.actives[edge_c].wind_cnt;
        if wc.abs() != 1 {
            return None;
        }
        match self.clip_type {
            ClipType::Union => {
                if !self.is_hot(edge_c) {
                    return None;
                }
            }
            _ => {
                if self.polytype(edge_c) == PathType::Subject {
                    return None;
                }
            }
        }
        match self.fill_rule {
            FillRule::Positive if wc != 1 => return None,
            FillRule::Negative if wc != -1 => return None,
            _ => {}
        }

        if let Some(or) = self.actives[edge_o].outrec {
            let result = self.add_out_pt(edge_o, pt);
            if self.is_front(edge_o) {
                self.outrecs[or].front_edge = None;
            } else {
                self.outrecs[or].back_edge = None;
            }
            self.actives[edge_o].outrec = None;
            return Some(result);
        }

        // horizontal edges can pass under open paths at a local minimum
        let lm_vertex = self.minima[self.actives[edge_o].local_min].vertex;
        if pt == self.vertices[lm_vertex].pt && !self.is_open_end_vertex(lm_vertex) {
            if let Some(e3) = self.find_edge_with_matching_loc_min(edge_o) {
                if let Some(or3) = self.actives[e3].outrec {
                    self.actives[edge_o].outrec = Some(or3);
                    if self.actives[edge_o].wind_dx > 0 {
                        self.set_sides(or3, edge_o, e3);
                    } else {
                        self.set_sides(or3, e3, edge_o);
                    }
                    return self.outrecs[or3].pts;
                }
            }
        }

        Some(self.start_open_path(edge_o, pt))
    }

    // top of scanbeam

    pub(super) fn do_top_of_scanbeam(&mut self, y: i64) {
        let mut e = self.ael_head;
        while let Some(i) = e {
            // never horizontal here
            if self.actives[i].top.y == y {
                self.actives[i].curr_x = self.actives[i].top.x;
                if self.is_maxima(i) {
                    e = self.do_maxima(i);
                    continue;
                }
                // intermediate vertex
                if self.is_hot(i) {
                    let top = self.actives[i].top;
                    self.add_out_pt(i, top);
                }
                self.update_edge_into_ael(i);
                if self.is_horizontal(i) {
                    self.horz_stack.push(i);
                }
            } else {
                self.actives[i].curr_x = self.top_x(i, y);
            }
            e = self.actives[i].next_in_ael;
        }
    }

    fn get_maxima_pair(&self, e: usize) -> Option<usize> {
        let vertex_top = self.actives[e].vertex_top;
        let mut e2 = self.actives[e].next_in_ael;
        while let Some(i) = e2 {
            if self.actives[i].vertex_top == vertex_top {
                return Some(i);
            }
            e2 = self.actives[i].next_in_ael;
        }
        None
    }

    /// Closes the bound pair meeting at the top of `e`, returns the edge to continue from.
    fn do_maxima(&mut self, e: usize) -> Option<usize> {
        let prev_e = self.actives[e].prev_in_ael;
        let mut next_e = self.actives[e].next_in_ael;
        let top = self.actives[e].top;

        if self.is_open_end(e) {
            if self.is_hot(e) {
                self.add_out_pt(e, top);
            }
            if !self.is_horizontal(e) {
                if let Some(or) = self.actives[e].outrec {
                    if self.is_front(e) {
                        self.outrecs[or].front_edge = None;
                    } else {
                        self.outrecs[or].back_edge = None;
                    }
                    self.actives[e].outrec = None;
                }
                self.delete_from_ael(e);
            }
            return next_e;
        }

        // a horizontal maxima pair is handled by the horizontal pass
        let Some(max_pair) = self.get_maxima_pair(e) else {
            return next_e;
        };

        if self.is_joined(e) {
            self.split(e, top);
        }
        if self.is_joined(max_pair) {
            let pair_top = self.actives[max_pair].top;
            self.split(max_pair, pair_top);
        }

        // process any edges between the maxima pair
        while let Some(n) = next_e {
            if n == max_pair {
                break;
            }
            self.intersect_edges(e, n, top);
            self.swap_positions_in_ael(e, n);
            next_e = self.actives[e].next_in_ael;
        }

        if self.is_hot(e) {
            self.add_local_max_poly(e, max_pair, top);
        }
        self.delete_from_ael(e);
        self.delete_from_ael(max_pair);

        match prev_e {
            Some(p) => self.actives[p].next_in_ael,
            None => self.ael_head,
        }
    }

    // intersections within a scanbeam

    pub(super) fn do_intersections(&mut self, top_y: i64) -> Result<(), ClipError> {
        if self.build_intersect_list(top_y)? {
            self.outpts
                .try_reserve(self.intersect_nodes.len() * 4)
                .or_exhausted("output points")?;
            self.process_intersect_list();
            self.intersect_nodes.clear();
        }
        Ok(())
    }

    /// Finds every pair of edges that swap order between the bottom and top of the scanbeam.
    ///
    /// Edges are sorted by x at the top of the beam with an insertion sort, every swap of two
    /// neighbors is an intersection, so only adjacent edges are ever intersected.
    fn build_intersect_list(&mut self, top_y: i64) -> Result<bool, ClipError> {
        let Some(head) = self.ael_head else {
            return Ok(false);
        };
        if self.actives[head].next_in_ael.is_none() {
            return Ok(false);
        }

        let mut sel: Vec<usize> = Vec::new();
        let mut e = Some(head);
        while let Some(i) = e {
            sel.try_reserve(1).or_exhausted("sorted edge list")?;
            sel.push(i);
            self.actives[i].curr_x = if self.actives[i].join_with == JoinWith::Left {
                match self.actives[i].prev_in_ael {
                    Some(p) => self.actives[p].curr_x,
                    None => self.top_x(i, top_y),
                }
            } else {
                self.top_x(i, top_y)
            };
            e = self.actives[i].next_in_ael;
        }

        for j in 1..sel.len() {
            let key = sel[j];
            let key_x = self.actives[key].curr_x;
            let mut k = j;
            while k > 0 && self.actives[sel[k - 1]].curr_x > key_x {
                self.add_new_intersect_node(sel[k - 1], key, top_y)?;
                sel[k] = sel[k - 1];
                k -= 1;
            }
            sel[k] = key;
        }

        Ok(!self.intersect_nodes.is_empty())
    }

    fn add_new_intersect_node(
        &mut self,
        e1: usize,
        e2: usize,
        top_y: i64,
    ) -> Result<(), ClipError> {
        let (a1, a2) = (&self.actives[e1], &self.actives[e2]);
        let mut ip = get_segment_intersect_pt(a1.bot, a1.top, a2.bot, a2.top)
            .unwrap_or(Point64::new(a1.curr_x, top_y));

        // rounding can place the point just outside the scanbeam
        if ip.y > self.bot_y || ip.y < top_y {
            let abs_dx1 = a1.dx.abs();
            let abs_dx2 = a2.dx.abs();
            if abs_dx1 > 100.0 && abs_dx2 > 100.0 {
                ip = if abs_dx1 > abs_dx2 {
                    get_closest_point_on_segment(ip, a1.bot, a1.top)
                } else {
                    get_closest_point_on_segment(ip, a2.bot, a2.top)
                };
            } else if abs_dx1 > 100.0 {
                ip = get_closest_point_on_segment(ip, a1.bot, a1.top);
            } else if abs_dx2 > 100.0 {
                ip = get_closest_point_on_segment(ip, a2.bot, a2.top);
            } else {
                ip.y = if ip.y < top_y { top_y } else { self.bot_y };
                ip.x = if abs_dx1 < abs_dx2 {
                    self.top_x(e1, ip.y)
                } else {
                    self.top_x(e2, ip.y)
                };
            }
        }

        self.intersect_nodes
            .try_reserve(1)
            .or_exhausted("intersect nodes")?;
        self.intersect_nodes.push(IntersectNode {
            pt: ip,
            edge1: e1,
            edge2: e2,
        });
        Ok(())
    }

    #[inline]
    fn edges_adjacent_in_ael(&self, node: &IntersectNode) -> bool {
        self.actives[node.edge1].next_in_ael == Some(node.edge2)
            || self.actives[node.edge1].prev_in_ael == Some(node.edge2)
    }

    fn process_intersect_list(&mut self) {
        // bottom up (largest y first), then left to right
        self.intersect_nodes
            .sort_by(|a, b| b.pt.y.cmp(&a.pt.y).then(a.pt.x.cmp(&b.pt.x)));

        for i in 0..self.intersect_nodes.len() {
            if !self.edges_adjacent_in_ael(&self.intersect_nodes[i]) {
                let found = (i + 1..self.intersect_nodes.len())
                    .find(|&j| self.edges_adjacent_in_ael(&self.intersect_nodes[j]));
                match found {
                    Some(j) => self.intersect_nodes.swap(i, j),
                    None => {
                        log::debug!("no adjacent intersect node left in scanbeam");
                        self.succeeded = false;
                        return;
                    }
                }
            }

            let IntersectNode { pt, edge1, edge2 } = self.intersect_nodes[i];
            self.intersect_edges(edge1, edge2, pt);
            self.swap_positions_in_ael(edge1, edge2);
            self.actives[edge1].curr_x = pt.x;
            self.actives[edge2].curr_x = pt.x;
            self.check_join_left(edge2, pt, true);
            self.check_join_right(edge1, pt, true);
        }
    }
}
