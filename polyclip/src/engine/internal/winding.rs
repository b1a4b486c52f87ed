use super::SweepEngine;
use crate::engine::{ClipType, FillRule, PathType};

impl SweepEngine {
    /// Sets the winding counts of a closed path edge just inserted into the AEL.
    ///
    /// `wind_cnt` is the larger of the winding counts of the two regions the edge separates
    /// (adjacent regions always differ by one), `wind_cnt2` is the winding count of the other
    /// path type at the edge.
    pub(super) fn set_wind_count_for_closed_path_edge(&mut self, e: usize) {
        let pt = self.polytype(e);
        let mut e2 = self.actives[e].prev_in_ael;
        while let Some(i) = e2 {
            if self.polytype(i) == pt && !self.is_open(i) {
                break;
            }
            e2 = self.actives[i].prev_in_ael;
        }

        let wind_dx = self.actives[e].wind_dx;
        let mut next = match e2 {
            None => {
                self.actives[e].wind_cnt = wind_dx;
                self.ael_head
            }
            Some(i) if self.fill_rule == FillRule::EvenOdd => {
                self.actives[e].wind_cnt = wind_dx;
                self.actives[e].wind_cnt2 = self.actives[i].wind_cnt2;
                self.actives[i].next_in_ael
            }
            Some(i) => {
                let (wc2, wdx2) = (self.actives[i].wind_cnt, self.actives[i].wind_dx);
                let wind_cnt = if wc2 * wdx2 < 0 {
                    // outside the region bounded by e2
                    if wc2.abs() > 1 {
                        if wdx2 * wind_dx < 0 {
                            wc2
                        } else {
                            wc2 + wind_dx
                        }
                    } else if self.is_open(e) {
                        1
                    } else {
                        wind_dx
                    }
                } else if wdx2 * wind_dx < 0 {
                    // inside e2, reversing direction
                    wc2
                } else {
                    wc2 + wind_dx
                };
                self.actives[e].wind_cnt = wind_cnt;
                self.actives[e].wind_cnt2 = self.actives[i].wind_cnt2;
                self.actives[i].next_in_ael
            }
        };

        // wind_cnt2 from the other path type's edges between e2 and e
        while let Some(i) = next {
            if i == e {
                break;
            }
            if self.polytype(i) != pt && !self.is_open(i) {
                if self.fill_rule == FillRule::EvenOdd {
                    let w = &mut self.actives[e].wind_cnt2;
                    *w = if *w == 0 { 1 } else { 0 };
                } else {
                    self.actives[e].wind_cnt2 += self.actives[i].wind_dx;
                }
            }
            next = self.actives[i].next_in_ael;
        }
    }

    /// Open edges carry the winding counts of the closed regions they start in.
    pub(super) fn set_wind_count_for_open_path_edge(&mut self, e: usize) {
        let mut e2 = self.ael_head;
        if self.fill_rule == FillRule::EvenOdd {
            let (mut cnt1, mut cnt2) = (0, 0);
            while let Some(i) = e2 {
                if i == e {
                    break;
                }
                if self.polytype(i) == PathType::Clip {
                    cnt2 += 1;
                } else if !self.is_open(i) {
                    cnt1 += 1;
                }
                e2 = self.actives[i].next_in_ael;
            }
            self.actives[e].wind_cnt = cnt1 % 2;
            self.actives[e].wind_cnt2 = cnt2 % 2;
        } else {
            while let Some(i) = e2 {
                if i == e {
                    break;
                }
                if self.polytype(i) == PathType::Clip {
                    self.actives[e].wind_cnt2 += self.actives[i].wind_dx;
                } else if !self.is_open(i) {
                    self.actives[e].wind_cnt += self.actives[i].wind_dx;
                }
                e2 = self.actives[i].next_in_ael;
            }
        }
    }

    /// Returns true if the closed edge bounds the solution region.
    pub(super) fn is_contributing_closed(&self, e: usize) -> bool {
        let ae = &self.actives[e];
        match self.fill_rule {
            FillRule::EvenOdd => {}
            FillRule::NonZero => {
                if ae.wind_cnt.abs() != 1 {
                    return false;
                }
            }
            FillRule::Positive => {
                if ae.wind_cnt != 1 {
                    return false;
                }
            }
            FillRule::Negative => {
                if ae.wind_cnt != -1 {
                    return false;
                }
            }
        }

        let outside_other = || match self.fill_rule {
            FillRule::Positive => ae.wind_cnt2 <= 0,
            FillRule::Negative => ae.wind_cnt2 >= 0,
            _ => ae.wind_cnt2 == 0,
        };

        match self.clip_type {
            ClipType::Intersection => !outside_other(),
            ClipType::Union => outside_other(),
            ClipType::Difference => {
                let result = outside_other();
                if self.polytype(e) == PathType::Subject {
                    result
                } else {
                    !result
                }
            }
            ClipType::Xor => true,
        }
    }

    /// Returns true if the open edge currently lies where open output is retained.
    pub(super) fn is_contributing_open(&self, e: usize) -> bool {
        let ae = &self.actives[e];
        let (is_in_subj, is_in_clip) = match self.fill_rule {
            FillRule::Positive => (ae.wind_cnt > 0, ae.wind_cnt2 > 0),
            FillRule::Negative => (ae.wind_cnt < 0, ae.wind_cnt2 < 0),
            _ => (ae.wind_cnt != 0, ae.wind_cnt2 != 0),
        };

        match self.clip_type {
            ClipType::Intersection => is_in_clip,
            ClipType::Union => !is_in_subj && !is_in_clip,
            _ => !is_in_clip,
        }
    }
}
