//! The beachline: an ordered sequence of parabolic arcs, indexed for
//! point location by a self-balancing binary search tree.
//!
//! Arcs are kept in two structures at once: a doubly linked list through
//! `prev`/`next` giving the left-to-right beachline order Voronoi edges
//! are threaded between, and a red-black tree through `left`/`right`/
//! `parent`/`color` giving `O(log n)` point location. The tree has no
//! explicit keys; which arc sits above a given `x` is decided by
//! comparing `x` against the breakpoints on either side of the node
//! currently being visited, recomputed from the sweep-line position on
//! every lookup. A missing child or neighbour is represented as `None`
//! rather than a sentinel node; its color reads as black.

use crate::diagram::{CellIndex, HalfEdgeIndex};
use crate::event::Event;
use crate::parabola::Parabola;
use crate::typedvector::{TypedIndex, TypedVec};
use crate::vector2::Site;
use crate::EPSILON;
use std::cell::RefCell;
use std::rc::Weak;

pub type ArcIndex = TypedIndex<Arc>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

/// One parabolic arc of the beachline, generated by a single site.
pub struct Arc {
    pub focus: Site,
    pub left_half_edge: Option<HalfEdgeIndex>,
    pub right_half_edge: Option<HalfEdgeIndex>,
    pub cell: Option<CellIndex>,
    pending_circle: Weak<RefCell<Event>>,

    color: Color,
    parent: Option<ArcIndex>,
    left: Option<ArcIndex>,
    right: Option<ArcIndex>,
    pub prev: Option<ArcIndex>,
    pub next: Option<ArcIndex>,
}

impl Arc {
    pub fn new(site: Site) -> Self {
        Arc {
            focus: site,
            left_half_edge: None,
            right_half_edge: None,
            cell: None,
            pending_circle: Weak::new(),
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
            prev: None,
            next: None,
        }
    }
}

/// The ordered set of active arcs, backed by a CLRS red-black tree over
/// an arena of `Arc`s so that tree links are plain indices rather than
/// owning pointers.
#[derive(Default)]
pub struct Beachline {
    arcs: TypedVec<Arc>,
    root: Option<ArcIndex>,
    sweep_y: f64,
}

impl Beachline {
    pub fn new() -> Self {
        Beachline {
            arcs: TypedVec::new(),
            root: None,
            sweep_y: f64::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn update_sweepline_y(&mut self, y: f64) {
        self.sweep_y = y;
    }

    fn get(&self, arc: ArcIndex) -> &Arc {
        self.arcs.get(arc).expect("invalid arc index")
    }

    fn get_mut(&mut self, arc: ArcIndex) -> &mut Arc {
        self.arcs.get_mut(arc).expect("invalid arc index")
    }

    pub fn focus(&self, arc: ArcIndex) -> Site {
        self.get(arc).focus
    }

    pub fn prev(&self, arc: ArcIndex) -> Option<ArcIndex> {
        self.get(arc).prev
    }

    pub fn next(&self, arc: ArcIndex) -> Option<ArcIndex> {
        self.get(arc).next
    }

    pub fn left_half_edge(&self, arc: ArcIndex) -> Option<HalfEdgeIndex> {
        self.get(arc).left_half_edge
    }

    pub fn set_left_half_edge(&mut self, arc: ArcIndex, half_edge: HalfEdgeIndex) {
        self.get_mut(arc).left_half_edge = Some(half_edge);
    }

    pub fn right_half_edge(&self, arc: ArcIndex) -> Option<HalfEdgeIndex> {
        self.get(arc).right_half_edge
    }

    pub fn set_right_half_edge(&mut self, arc: ArcIndex, half_edge: HalfEdgeIndex) {
        self.get_mut(arc).right_half_edge = Some(half_edge);
    }

    pub fn cell(&self, arc: ArcIndex) -> Option<CellIndex> {
        self.get(arc).cell
    }

    pub fn set_cell(&mut self, arc: ArcIndex, cell: CellIndex) {
        self.get_mut(arc).cell = Some(cell);
    }

    pub fn pending_circle(&self, arc: ArcIndex) -> Option<Weak<RefCell<Event>>> {
        let handle = &self.get(arc).pending_circle;
        if handle.strong_count() > 0 {
            Some(handle.clone())
        } else {
            None
        }
    }

    pub fn set_pending_circle(&mut self, arc: ArcIndex, handle: Weak<RefCell<Event>>) {
        self.get_mut(arc).pending_circle = handle;
    }

    pub fn clear_pending_circle(&mut self, arc: ArcIndex) {
        self.get_mut(arc).pending_circle = Weak::new();
    }

    /// The `x` interval over which `arc` is the topmost arc at the
    /// current sweep-line position, bounded by its breakpoints with its
    /// left and right neighbours (or infinite, at either end of the
    /// beachline).
    pub fn bounds(&self, arc: ArcIndex) -> (f64, f64) {
        let node = self.get(arc);
        let mid = Parabola::new(node.focus.point(), self.sweep_y);

        let left_bound = match node.prev {
            None => f64::NEG_INFINITY,
            Some(p) => {
                let left = Parabola::new(self.get(p).focus.point(), self.sweep_y);
                left.intersection_x(&mid).unwrap_or(f64::NEG_INFINITY)
            }
        };
        let right_bound = match node.next {
            None => f64::INFINITY,
            Some(n) => {
                let right = Parabola::new(self.get(n).focus.point(), self.sweep_y);
                mid.intersection_x(&right).unwrap_or(f64::INFINITY)
            }
        };
        (left_bound, right_bound)
    }

    fn new_arc(&mut self, site: Site) -> ArcIndex {
        self.arcs.insert(Arc::new(site))
    }

    /// Inserts the very first arc of the beachline.
    pub fn insert_root_arc(&mut self, site: Site) -> ArcIndex {
        let arc = self.new_arc(site);
        self.get_mut(arc).color = Color::Black;
        self.root = Some(arc);
        arc
    }

    /// Appends a new arc at the right end of the beachline, for the
    /// degenerate case where the first row of sites share a `y` and so
    /// never triggers the usual above-arc search.
    pub fn handle_collinear_initial_insert(&mut self, site: Site) -> ArcIndex {
        let max = self
            .maximum()
            .expect("collinear insertion requires a non-empty beachline");
        let arc = self.new_arc(site);
        self.insert_successor(max, arc);
        arc
    }

    /// Finds the arc currently above `site` and splits it, inserting a
    /// new arc for `site`. Returns the new arc and whether it landed
    /// exactly on an existing breakpoint (in which case no split
    /// happened and the caller must not create a new pair of edges for a
    /// vanishing arc).
    pub fn insert_arc_for_point(&mut self, site: Site) -> (ArcIndex, bool) {
        let mut current = self.root.expect("beachline must be non-empty");
        loop {
            let (left, right) = self.bounds(current);
            let x = site.x();
            if x < left - EPSILON {
                current = self
                    .get(current)
                    .left
                    .expect("a finite left bound implies a left child");
            } else if x > right + EPSILON {
                current = self
                    .get(current)
                    .right
                    .expect("a finite right bound implies a right child");
            } else if (x - left).abs() < EPSILON && left.is_finite() {
                let predecessor = self
                    .get(current)
                    .prev
                    .expect("a finite left bound implies a predecessor arc");
                let mid = self.new_arc(site);
                self.insert_successor(predecessor, mid);
                return (mid, true);
            } else if (x - right).abs() < EPSILON && right.is_finite() {
                let mid = self.new_arc(site);
                self.insert_successor(current, mid);
                return (mid, true);
            } else {
                let focus = self.get(current).focus;
                let mid = self.new_arc(site);
                self.insert_successor(current, mid);
                let right_copy = self.new_arc(focus);
                self.insert_successor(mid, right_copy);
                return (mid, false);
            }
        }
    }

    /// Inserts `s` as the beachline successor of `p`, fixing up both the
    /// linked-list order and the tree structure.
    fn insert_successor(&mut self, p: ArcIndex, s: ArcIndex) {
        let p_next = self.get(p).next;
        self.get_mut(s).prev = Some(p);
        self.get_mut(s).next = p_next;
        self.get_mut(p).next = Some(s);
        if let Some(n) = p_next {
            self.get_mut(n).prev = Some(s);
        }

        if self.get(p).right.is_none() {
            self.add_as_right_child(p, s);
        } else {
            let mut successor = self.get(p).right.unwrap();
            while let Some(l) = self.get(successor).left {
                successor = l;
            }
            self.add_as_left_child(successor, s);
        }
    }

    fn add_as_left_child(&mut self, parent: ArcIndex, child: ArcIndex) {
        self.get_mut(parent).left = Some(child);
        self.get_mut(child).parent = Some(parent);
        self.get_mut(child).color = Color::Red;
        self.insert_fixup(child);
    }

    fn add_as_right_child(&mut self, parent: ArcIndex, child: ArcIndex) {
        self.get_mut(parent).right = Some(child);
        self.get_mut(child).parent = Some(parent);
        self.get_mut(child).color = Color::Red;
        self.insert_fixup(child);
    }

    /// Removes `arc` from both the linked-list order and the tree. The
    /// arena slot is never freed: indices into it stay valid for the
    /// lifetime of the beachline, and an unlinked `Arc` is simply
    /// unreachable from `root`.
    pub fn delete_arc(&mut self, arc: ArcIndex) {
        let prev = self.get(arc).prev;
        let next = self.get(arc).next;
        if let Some(p) = prev {
            self.get_mut(p).next = next;
        }
        if let Some(n) = next {
            self.get_mut(n).prev = prev;
        }
        self.delete(arc);
    }

    pub fn minimum(&self) -> Option<ArcIndex> {
        let mut node = self.root?;
        while let Some(l) = self.get(node).left {
            node = l;
        }
        Some(node)
    }

    pub fn maximum(&self) -> Option<ArcIndex> {
        let mut node = self.root?;
        while let Some(r) = self.get(node).right {
            node = r;
        }
        Some(node)
    }

    fn tree_minimum(&self, mut node: ArcIndex) -> ArcIndex {
        while let Some(l) = self.get(node).left {
            node = l;
        }
        node
    }

    fn color(&self, node: Option<ArcIndex>) -> Color {
        match node {
            None => Color::Black,
            Some(n) => self.get(n).color,
        }
    }

    fn set_color(&mut self, node: Option<ArcIndex>, color: Color) {
        if let Some(n) = node {
            self.get_mut(n).color = color;
        }
    }

    fn left_rotate(&mut self, x: ArcIndex) {
        let y = self.get(x).right.expect("left_rotate requires a right child");
        let y_left = self.get(y).left;
        self.get_mut(x).right = y_left;
        if let Some(yl) = y_left {
            self.get_mut(yl).parent = Some(x);
        }
        let x_parent = self.get(x).parent;
        self.get_mut(y).parent = x_parent;
        match x_parent {
            None => self.root = Some(y),
            Some(p) => {
                if self.get(p).left == Some(x) {
                    self.get_mut(p).left = Some(y);
                } else {
                    self.get_mut(p).right = Some(y);
                }
            }
        }
        self.get_mut(y).left = Some(x);
        self.get_mut(x).parent = Some(y);
    }

    fn right_rotate(&mut self, x: ArcIndex) {
        let y = self.get(x).left.expect("right_rotate requires a left child");
        let y_right = self.get(y).right;
        self.get_mut(x).left = y_right;
        if let Some(yr) = y_right {
            self.get_mut(yr).parent = Some(x);
        }
        let x_parent = self.get(x).parent;
        self.get_mut(y).parent = x_parent;
        match x_parent {
            None => self.root = Some(y),
            Some(p) => {
                if self.get(p).left == Some(x) {
                    self.get_mut(p).left = Some(y);
                } else {
                    self.get_mut(p).right = Some(y);
                }
            }
        }
        self.get_mut(y).right = Some(x);
        self.get_mut(x).parent = Some(y);
    }

    fn transplant(&mut self, u: ArcIndex, v: Option<ArcIndex>) {
        let u_parent = self.get(u).parent;
        match u_parent {
            None => self.root = v,
            Some(p) => {
                if self.get(p).left == Some(u) {
                    self.get_mut(p).left = v;
                } else {
                    self.get_mut(p).right = v;
                }
            }
        }
        if let Some(v) = v {
            self.get_mut(v).parent = u_parent;
        }
    }

    fn insert_fixup(&mut self, mut z: ArcIndex) {
        while let Some(zp) = self.get(z).parent {
            if self.color(Some(zp)) == Color::Black {
                break;
            }
            let zpp = self
                .get(zp)
                .parent
                .expect("a red node always has a black parent with a parent of its own");
            if Some(zp) == self.get(zpp).left {
                let y = self.get(zpp).right;
                if self.color(y) == Color::Red {
                    self.set_color(Some(zp), Color::Black);
                    self.set_color(y, Color::Black);
                    self.set_color(Some(zpp), Color::Red);
                    z = zpp;
                } else {
                    if Some(z) == self.get(zp).right {
                        z = zp;
                        self.left_rotate(z);
                    }
                    let zp2 = self.get(z).parent.unwrap();
                    let zpp2 = self.get(zp2).parent.unwrap();
                    self.set_color(Some(zp2), Color::Black);
                    self.set_color(Some(zpp2), Color::Red);
                    self.right_rotate(zpp2);
                }
            } else {
                let y = self.get(zpp).left;
                if self.color(y) == Color::Red {
                    self.set_color(Some(zp), Color::Black);
                    self.set_color(y, Color::Black);
                    self.set_color(Some(zpp), Color::Red);
                    z = zpp;
                } else {
                    if Some(z) == self.get(zp).left {
                        z = zp;
                        self.right_rotate(z);
                    }
                    let zp2 = self.get(z).parent.unwrap();
                    let zpp2 = self.get(zp2).parent.unwrap();
                    self.set_color(Some(zp2), Color::Black);
                    self.set_color(Some(zpp2), Color::Red);
                    self.left_rotate(zpp2);
                }
            }
        }
        if let Some(r) = self.root {
            self.set_color(Some(r), Color::Black);
        }
    }

    fn delete(&mut self, z: ArcIndex) {
        let mut y = z;
        let mut y_original_color = self.color(Some(y));
        let x: Option<ArcIndex>;
        let x_parent: Option<ArcIndex>;

        if self.get(z).left.is_none() {
            x = self.get(z).right;
            x_parent = self.get(z).parent;
            self.transplant(z, x);
        } else if self.get(z).right.is_none() {
            x = self.get(z).left;
            x_parent = self.get(z).parent;
            self.transplant(z, x);
        } else {
            y = self.tree_minimum(self.get(z).right.unwrap());
            y_original_color = self.color(Some(y));
            x = self.get(y).right;

            if self.get(y).parent == Some(z) {
                x_parent = Some(y);
            } else {
                x_parent = self.get(y).parent;
                self.transplant(y, x);
                let z_right = self.get(z).right;
                self.get_mut(y).right = z_right;
                if let Some(zr) = z_right {
                    self.get_mut(zr).parent = Some(y);
                }
            }

            self.transplant(z, Some(y));
            let z_left = self.get(z).left;
            self.get_mut(y).left = z_left;
            if let Some(zl) = z_left {
                self.get_mut(zl).parent = Some(y);
            }
            self.set_color(Some(y), self.color(Some(z)));
        }

        if y_original_color == Color::Black {
            self.delete_fixup(x, x_parent);
        }
    }

    fn delete_fixup(&mut self, mut x: Option<ArcIndex>, mut x_parent: Option<ArcIndex>) {
        while x != self.root && self.color(x) == Color::Black {
            let Some(parent) = x_parent else { break };
            if x == self.get(parent).left {
                let mut w = self.get(parent).right;
                if self.color(w) == Color::Red {
                    self.set_color(w, Color::Black);
                    self.set_color(Some(parent), Color::Red);
                    self.left_rotate(parent);
                    w = self.get(parent).right;
                }
                let w_node = w.expect("black height invariant guarantees a non-nil sibling here");
                if self.color(self.get(w_node).left) == Color::Black
                    && self.color(self.get(w_node).right) == Color::Black
                {
                    self.set_color(w, Color::Red);
                    x = Some(parent);
                    x_parent = self.get(parent).parent;
                } else {
                    if self.color(self.get(w_node).right) == Color::Black {
                        self.set_color(self.get(w_node).left, Color::Black);
                        self.set_color(w, Color::Red);
                        self.right_rotate(w_node);
                        w = self.get(parent).right;
                    }
                    let w_node = w.unwrap();
                    self.set_color(w, self.color(Some(parent)));
                    self.set_color(Some(parent), Color::Black);
                    self.set_color(self.get(w_node).right, Color::Black);
                    self.left_rotate(parent);
                    x = self.root;
                    x_parent = None;
                }
            } else {
                let mut w = self.get(parent).left;
                if self.color(w) == Color::Red {
                    self.set_color(w, Color::Black);
                    self.set_color(Some(parent), Color::Red);
                    self.right_rotate(parent);
                    w = self.get(parent).left;
                }
                let w_node = w.expect("black height invariant guarantees a non-nil sibling here");
                if self.color(self.get(w_node).right) == Color::Black
                    && self.color(self.get(w_node).left) == Color::Black
                {
                    self.set_color(w, Color::Red);
                    x = Some(parent);
                    x_parent = self.get(parent).parent;
                } else {
                    if self.color(self.get(w_node).left) == Color::Black {
                        self.set_color(self.get(w_node).right, Color::Black);
                        self.set_color(w, Color::Red);
                        self.left_rotate(w_node);
                        w = self.get(parent).left;
                    }
                    let w_node = w.unwrap();
                    self.set_color(w, self.color(Some(parent)));
                    self.set_color(Some(parent), Color::Black);
                    self.set_color(self.get(w_node).left, Color::Black);
                    self.right_rotate(parent);
                    x = self.root;
                    x_parent = None;
                }
            }
        }
        self.set_color(x, Color::Black);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(x: f64, y: f64) -> Site {
        Site::new(x, y)
    }

    #[test]
    fn single_arc_spans_whole_line() {
        let mut beachline = Beachline::new();
        beachline.update_sweepline_y(-1.0);
        let arc = beachline.insert_root_arc(site(0.0, 0.0));
        let (l, r) = beachline.bounds(arc);
        assert_eq!(l, f64::NEG_INFINITY);
        assert_eq!(r, f64::INFINITY);
    }

    #[test]
    fn inserting_above_an_arc_splits_it_in_three() {
        let mut beachline = Beachline::new();
        beachline.update_sweepline_y(0.0);
        let first = beachline.insert_root_arc(site(0.0, -5.0));
        beachline.update_sweepline_y(-1.0);
        let (mid, was_breakpoint) = beachline.insert_arc_for_point(site(0.0, -10.0));
        assert!(!was_breakpoint);

        // left copy, new arc, right copy: three arcs now chained in order.
        let left_copy = beachline.prev(mid).unwrap();
        let right_copy = beachline.next(mid).unwrap();
        assert_eq!(beachline.focus(left_copy), site(0.0, -5.0));
        assert_eq!(beachline.focus(right_copy), site(0.0, -5.0));
        assert_eq!(beachline.focus(mid), site(0.0, -10.0));
        assert_eq!(beachline.minimum().unwrap(), left_copy);
        assert_eq!(beachline.maximum().unwrap(), right_copy);
        assert_ne!(first, mid);
    }

    #[test]
    fn delete_arc_keeps_neighbours_linked() {
        let mut beachline = Beachline::new();
        beachline.update_sweepline_y(0.0);
        beachline.insert_root_arc(site(0.0, -5.0));
        beachline.update_sweepline_y(-1.0);
        let (mid, _) = beachline.insert_arc_for_point(site(0.0, -10.0));
        let left_copy = beachline.prev(mid).unwrap();
        let right_copy = beachline.next(mid).unwrap();

        beachline.delete_arc(mid);
        assert_eq!(beachline.next(left_copy), Some(right_copy));
        assert_eq!(beachline.prev(right_copy), Some(left_copy));
    }

    #[test]
    fn many_insertions_keep_beachline_order_consistent() {
        let mut beachline = Beachline::new();
        beachline.update_sweepline_y(0.0);
        beachline.insert_root_arc(site(0.0, -100.0));
        for i in 1..200 {
            beachline.update_sweepline_y(-1.0 - i as f64 * 0.01);
            let x = ((i * 37) % 200) as f64 - 100.0;
            beachline.insert_arc_for_point(site(x, -100.0 - i as f64));
        }

        let mut node = beachline.minimum();
        let mut last_left_bound = f64::NEG_INFINITY;
        let mut count = 0;
        while let Some(n) = node {
            let (left, _right) = beachline.bounds(n);
            assert!(left >= last_left_bound - EPSILON);
            last_left_bound = left;
            node = beachline.next(n);
            count += 1;
        }
        assert!(count >= 200);
    }
}
