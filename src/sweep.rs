//! The sweep driver: consumes site and circle events, mutates the
//! beachline, and emits half edges into the diagram. `terminate` turns
//! the unbounded combinatorial result into a closed, clipped DCEL.

use crate::beachline::{ArcIndex, Beachline};
use crate::circle::Circle;
use crate::diagram::{CellIndex, Diagram, HalfEdgeIndex};
use crate::event::{EventKind, EventQueue};
use crate::liang_barsky;
use crate::line_segment::LineSegment;
use crate::rectangle::Rectangle;
use crate::vector2::{Site, Vector2};
use crate::CONTAINER_PADDING;
use std::collections::HashSet;

/// Runs Fortune's algorithm over `sites`, writing the result into
/// `diagram` and clipping every cell to `clip`. `max_steps` caps the
/// number of events processed in one call (`-1` for unbounded);
/// returns `true` iff the queue was drained and the termination pass
/// ran.
pub fn compute(sites: &HashSet<Site>, diagram: &mut Diagram, clip: Rectangle, max_steps: i64) -> bool {
    diagram.clear();
    let mut sweep = Sweep::new(diagram, clip);
    sweep.run(sites, max_steps)
}

struct Sweep<'a> {
    diagram: &'a mut Diagram,
    clip: Rectangle,
    container: Rectangle,
    beachline: Beachline,
    queue: EventQueue,
    sweep_y: f64,
    first_site_y: Option<f64>,
    step_count: i64,
}

impl<'a> Sweep<'a> {
    fn new(diagram: &'a mut Diagram, clip: Rectangle) -> Self {
        Sweep {
            diagram,
            container: clip,
            clip,
            beachline: Beachline::new(),
            queue: EventQueue::new(),
            sweep_y: 0.0,
            first_site_y: None,
            step_count: 0,
        }
    }

    fn run(&mut self, sites: &HashSet<Site>, max_steps: i64) -> bool {
        let filtered: Vec<Site> = sites
            .iter()
            .copied()
            .filter(|site| self.clip.contains(site.point()))
            .collect();

        log::debug!(
            "starting sweep with {} of {} sites inside the clip rectangle",
            filtered.len(),
            sites.len()
        );

        if filtered.is_empty() {
            return true;
        }

        for site in filtered {
            self.queue.push_site_event(site);
        }

        while !self.queue.is_empty() && self.step_count != max_steps {
            self.step();
        }

        if self.queue.is_empty() {
            self.terminate();
            log::debug!(
                "sweep finished after {} events, {} cells",
                self.step_count,
                self.diagram.cell_count()
            );
            true
        } else {
            false
        }
    }

    fn step(&mut self) {
        let Some(event) = self.queue.pop_min() else {
            return;
        };
        self.step_count += 1;
        match event.kind {
            EventKind::Site { site } => self.process_site_event(site),
            EventKind::Circle { arc, circle, .. } => self.process_circle_event(arc, circle),
        }
    }

    fn connect(&mut self, prev: HalfEdgeIndex, next: HalfEdgeIndex) {
        self.diagram.link(prev, next);
    }

    fn get_box_intersection(&self, from: Vector2, to: Vector2) -> Vector2 {
        let origin = (from + to) * 0.5;
        let direction = (to - from).get_orthogonal();
        self.container.get_intersection(origin, direction).0
    }

    // -- site events --------------------------------------------------

    fn process_site_event(&mut self, site: Site) {
        self.sweep_y = site.y();
        self.beachline.update_sweepline_y(self.sweep_y);

        if self.beachline.is_empty() {
            self.process_first_site(site);
        } else if self.first_site_y == Some(self.sweep_y) {
            self.process_collinear_site(site);
        } else {
            self.process_general_site(site);
        }
    }

    fn process_first_site(&mut self, site: Site) {
        let root = self.beachline.insert_root_arc(site);
        self.first_site_y = Some(site.y());
        self.container = self.clip.padded(CONTAINER_PADDING);
        self.container
            .expand_to_contain_point(site.point(), CONTAINER_PADDING);
        let cell = self.diagram.create_cell(site);
        self.beachline.set_cell(root, cell);
    }

    /// The degenerate case where every site seen so far shares the same
    /// `y`: the beachline never forms a real parabola, so the new arc is
    /// just appended and its edge with its predecessor is anchored on a
    /// synthetic point far above the sites, to be rerouted by `terminate`.
    fn process_collinear_site(&mut self, site: Site) {
        self.container
            .expand_to_contain_point(site.point(), CONTAINER_PADDING);
        let arc = self.beachline.handle_collinear_initial_insert(site);
        let cell = self.diagram.create_cell(site);
        self.beachline.set_cell(arc, cell);

        let prev = self
            .beachline
            .prev(arc)
            .expect("a collinear insertion always has a predecessor");
        let prev_cell = self
            .beachline
            .cell(prev)
            .expect("predecessor arc already has a cell");
        let midpoint_x = (self.beachline.focus(prev).x() + site.x()) / 2.0;
        let anchor = Vector2::new(midpoint_x, -1.0e6);

        let (prev_rhe, arc_lhe) = self.diagram.add_edge(prev_cell, cell);
        self.diagram.set_destination(prev_rhe, anchor);
        self.diagram.set_origin(arc_lhe, anchor);
        self.beachline.set_right_half_edge(prev, prev_rhe);
        self.beachline.set_left_half_edge(arc, arc_lhe);
    }

    fn process_general_site(&mut self, site: Site) {
        let (new_arc, is_breakpoint_case) = self.beachline.insert_arc_for_point(site);
        self.container
            .expand_to_contain_point(site.point(), CONTAINER_PADDING);
        let new_cell = self.diagram.create_cell(site);
        self.beachline.set_cell(new_arc, new_cell);

        let prev_arc = self
            .beachline
            .prev(new_arc)
            .expect("a split always has a left neighbor");
        let next_arc = self
            .beachline
            .next(new_arc)
            .expect("a split always has a right neighbor");

        self.remove_circle_event(prev_arc);
        self.create_circle_event(prev_arc);
        self.create_circle_event(next_arc);

        if is_breakpoint_case {
            self.wire_breakpoint_split(new_arc, new_cell, prev_arc, next_arc, site);
        } else {
            self.wire_standard_split(new_arc, new_cell, prev_arc, next_arc);
        }
    }

    /// The new site landed exactly on an existing breakpoint: `prev`,
    /// `new` and `next` share a vertex at the circumcenter of their
    /// foci, and four half edges meet there instead of the usual two.
    fn wire_breakpoint_split(
        &mut self,
        new_arc: ArcIndex,
        new_cell: CellIndex,
        prev_arc: ArcIndex,
        next_arc: ArcIndex,
        site: Site,
    ) {
        let prev_focus = self.beachline.focus(prev_arc).point();
        let next_focus = self.beachline.focus(next_arc).point();
        let vertex = Circle::from_three_points(prev_focus, site.point(), next_focus)
            .expect("breakpoint-coincident foci are never collinear")
            .center;

        let prev_rhe = self
            .beachline
            .right_half_edge(prev_arc)
            .expect("predecessor arc already traces a right edge");
        self.diagram.set_origin(prev_rhe, vertex);
        let next_lhe = self
            .beachline
            .left_half_edge(next_arc)
            .expect("successor arc already traces a left edge");
        self.diagram.set_destination(next_lhe, vertex);

        let prev_cell = self
            .beachline
            .cell(prev_arc)
            .expect("predecessor arc has a cell");
        let next_cell = self
            .beachline
            .cell(next_arc)
            .expect("successor arc has a cell");

        let (lhe, l_twin) = self.diagram.add_edge(new_cell, prev_cell);
        self.diagram.set_origin(lhe, vertex);
        self.diagram.set_destination(l_twin, vertex);
        self.beachline.set_left_half_edge(new_arc, lhe);

        let (rhe, r_twin) = self.diagram.add_edge(new_cell, next_cell);
        self.diagram.set_destination(rhe, vertex);
        self.diagram.set_origin(r_twin, vertex);
        self.beachline.set_right_half_edge(new_arc, rhe);

        self.connect(prev_rhe, lhe);
        self.connect(rhe, next_lhe);

        self.beachline.set_right_half_edge(prev_arc, l_twin);
        self.beachline.set_left_half_edge(next_arc, r_twin);
    }

    /// The ordinary case: the new arc sits between two copies of the
    /// split arc's focus, which (still) share a cell.
    fn wire_standard_split(
        &mut self,
        new_arc: ArcIndex,
        new_cell: CellIndex,
        prev_arc: ArcIndex,
        next_arc: ArcIndex,
    ) {
        let prev_cell = self
            .beachline
            .cell(prev_arc)
            .expect("predecessor arc has a cell");
        let old_prev_rhe = self.beachline.right_half_edge(prev_arc);

        self.beachline.set_cell(next_arc, prev_cell);
        if let Some(edge) = old_prev_rhe {
            self.beachline.set_right_half_edge(next_arc, edge);
        }

        let (new_prev_rhe, new_mid_lhe) = self.diagram.add_edge(prev_cell, new_cell);
        self.beachline.set_right_half_edge(prev_arc, new_prev_rhe);
        self.beachline.set_left_half_edge(new_arc, new_mid_lhe);
        self.beachline.set_right_half_edge(new_arc, new_mid_lhe);
        self.beachline.set_left_half_edge(next_arc, new_prev_rhe);
    }

    // -- circle events --------------------------------------------------

    fn process_circle_event(&mut self, arc: ArcIndex, circle: Circle) {
        self.sweep_y = circle.bottom_point().y;
        self.beachline.update_sweepline_y(self.sweep_y);

        let left = self.beachline.prev(arc);
        let right = self.beachline.next(arc);

        self.beachline.delete_arc(arc);
        if let Some(l) = left {
            self.remove_circle_event(l);
        }
        if let Some(r) = right {
            self.remove_circle_event(r);
        }

        if let (Some(left), Some(right)) = (left, right) {
            self.create_vertex(circle.center, arc, left, right);
            self.create_circle_event(left);
            self.create_circle_event(right);
        }
    }

    /// Both neighbors of a collapsing arc always exist: `check_circle_event`
    /// refuses to schedule an event for a triple missing either side.
    fn create_vertex(&mut self, vertex: Vector2, arc: ArcIndex, prev_arc: ArcIndex, next_arc: ArcIndex) {
        self.container.expand_to_contain_point(vertex, CONTAINER_PADDING);
        self.diagram.add_vertex(vertex);

        let arc_lhe = self
            .beachline
            .left_half_edge(arc)
            .expect("a collapsing arc traces a left edge");
        let arc_rhe = self
            .beachline
            .right_half_edge(arc)
            .expect("a collapsing arc traces a right edge");
        self.diagram.set_destination(arc_lhe, vertex);
        self.diagram.set_origin(arc_rhe, vertex);

        let p_rhe = self
            .beachline
            .right_half_edge(prev_arc)
            .expect("left neighbor traces a right edge");
        self.diagram.set_origin(p_rhe, vertex);
        let p_rhe_twin = self.diagram.twin(p_rhe).expect("right edge has a twin");
        self.diagram.set_destination(p_rhe_twin, vertex);

        let n_lhe = self
            .beachline
            .left_half_edge(next_arc)
            .expect("right neighbor traces a left edge");
        self.diagram.set_destination(n_lhe, vertex);
        let n_lhe_twin = self.diagram.twin(n_lhe).expect("left edge has a twin");
        self.diagram.set_origin(n_lhe_twin, vertex);

        self.connect(p_rhe_twin, n_lhe_twin);

        let p_cell = self.beachline.cell(prev_arc).expect("left neighbor has a cell");
        let n_cell = self.beachline.cell(next_arc).expect("right neighbor has a cell");
        let (new_prhe, new_nlhe) = self.diagram.add_edge(p_cell, n_cell);
        self.diagram.set_destination(new_prhe, vertex);
        self.diagram.set_origin(new_nlhe, vertex);
        self.connect(new_prhe, p_rhe);
        self.connect(n_lhe, new_nlhe);
        self.beachline.set_right_half_edge(prev_arc, new_prhe);
        self.beachline.set_left_half_edge(next_arc, new_nlhe);
    }

    fn create_circle_event(&mut self, arc: ArcIndex) {
        let Some(left) = self.beachline.prev(arc) else {
            return;
        };
        let Some(right) = self.beachline.next(arc) else {
            return;
        };
        if let Some(circle) = self.check_circle_event(left, arc, right) {
            let handle = self.queue.push_circle_event(arc, circle);
            self.beachline.set_pending_circle(arc, handle);
        }
    }

    fn remove_circle_event(&mut self, arc: ArcIndex) {
        if let Some(handle) = self.beachline.pending_circle(arc) {
            self.queue.remove(&handle);
            self.beachline.clear_pending_circle(arc);
        }
    }

    /// The circumcircle of `left`, `mid`, `right`'s foci, if one exists
    /// and actually represents a shrinking triple whose event has not
    /// already passed.
    fn check_circle_event(&self, left: ArcIndex, mid: ArcIndex, right: ArcIndex) -> Option<Circle> {
        let a = self.beachline.focus(left).point();
        let b = self.beachline.focus(mid).point();
        let c = self.beachline.focus(right).point();
        let circle = Circle::from_three_points(a, b, c)?;

        let determinant = (b.x * c.y + a.x * b.y + a.y * c.x) - (a.y * b.x + b.y * c.x + a.x * c.y);
        let event_y = circle.center.y + circle.radius;
        if event_y >= self.sweep_y && determinant > 0.0 {
            Some(circle)
        } else {
            None
        }
    }

    // -- termination ------------------------------------------------------

    fn terminate(&mut self) {
        let mut current = self.beachline.minimum();
        while let Some(arc) = current {
            self.bound_incomplete_arc(arc);
            current = self.beachline.next(arc);
        }

        self.close_shared_first_row_cell();

        for cell in self.diagram.cells().collect::<Vec<_>>() {
            let needs_completion = match self.diagram.cell(cell).outer_component {
                None => false,
                Some(he) => {
                    let edge = self.diagram.half_edge(he);
                    edge.prev.is_none() || edge.next.is_none()
                }
            };
            if needs_completion {
                self.complete_incomplete_cell(cell);
            }
            self.clip_cell(cell);
        }
    }

    /// Closes the two dangling edges of a cell whose arc survived on
    /// both ends of the beachline (the two-sites-total and first-row
    /// degeneracies both end this way).
    fn close_shared_first_row_cell(&mut self) {
        let (Some(min_arc), Some(max_arc)) = (self.beachline.minimum(), self.beachline.maximum())
        else {
            return;
        };
        if min_arc == max_arc {
            return;
        }
        if self.beachline.cell(min_arc) != self.beachline.cell(max_arc) {
            return;
        }
        let (Some(prev), Some(next_arc)) =
            (self.beachline.prev(max_arc), self.beachline.next(min_arc))
        else {
            return;
        };

        let prev_focus = self.beachline.focus(prev).point();
        let max_focus = self.beachline.focus(max_arc).point();
        let min_focus = self.beachline.focus(min_arc).point();
        let next_focus = self.beachline.focus(next_arc).point();
        let end = self.get_box_intersection(prev_focus, max_focus);
        let start = self.get_box_intersection(min_focus, next_focus);

        let max_lhe = self
            .beachline
            .left_half_edge(max_arc)
            .expect("surviving arc traces a left edge");
        let min_rhe = self
            .beachline
            .right_half_edge(min_arc)
            .expect("surviving arc traces a right edge");
        self.diagram.set_destination(max_lhe, end);
        self.diagram.set_origin(min_rhe, start);

        let cell = self.beachline.cell(max_arc).expect("surviving arc has a cell");
        let (head, tail) = self.half_edges_chain(cell, self.container, end, start);
        self.connect(max_lhe, head);
        self.connect(tail, min_rhe);
    }

    fn bound_incomplete_arc(&mut self, arc: ArcIndex) {
        let focus = self.beachline.focus(arc).point();
        let mut start_point = None;
        let mut end_point = None;

        if let Some(prev) = self.beachline.prev(arc) {
            let prev_focus = self.beachline.focus(prev).point();
            let point = self.get_box_intersection(prev_focus, focus);
            let prev_rhe = self
                .beachline
                .right_half_edge(prev)
                .expect("left neighbor traces a right edge");
            self.diagram.set_origin(prev_rhe, point);
            start_point = Some(point);
        }
        if let Some(next) = self.beachline.next(arc) {
            let next_focus = self.beachline.focus(next).point();
            let point = self.get_box_intersection(focus, next_focus);
            let next_lhe = self
                .beachline
                .left_half_edge(next)
                .expect("right neighbor traces a left edge");
            self.diagram.set_destination(next_lhe, point);
            end_point = Some(point);
        }

        if let (Some(start), Some(end)) = (start_point, end_point) {
            let cell = self.beachline.cell(arc).expect("arc has a cell");
            let (head, tail) = self.half_edges_chain(cell, self.container, start, end);
            let arc_lhe = self
                .beachline
                .left_half_edge(arc)
                .expect("arc traces a left edge");
            let arc_rhe = self
                .beachline
                .right_half_edge(arc)
                .expect("arc traces a right edge");
            self.connect(arc_lhe, head);
            self.connect(tail, arc_rhe);
        }
    }

    fn complete_incomplete_cell(&mut self, cell: CellIndex) {
        let Some(outer) = self.diagram.cell(cell).outer_component else {
            return;
        };

        let mut first = outer;
        while let Some(p) = self.diagram.half_edge(first).prev {
            first = p;
        }
        let mut last = outer;
        while let Some(n) = self.diagram.half_edge(last).next {
            last = n;
        }

        if let Some(result) = liang_barsky::clip(self.half_edge_segment(last), &self.container) {
            self.diagram.set_destination(last, result.segment.b);
        }
        if let Some(result) = liang_barsky::clip(self.half_edge_segment(first), &self.container) {
            self.diagram.set_origin(first, result.segment.a);
        }

        let start = self
            .diagram
            .half_edge(last)
            .destination
            .expect("clipped edge has a destination");
        let end = self
            .diagram
            .half_edge(first)
            .origin
            .expect("clipped edge has an origin");
        let (head, tail) = self.half_edges_chain(cell, self.container, start, end);
        self.connect(last, head);
        self.connect(tail, first);
    }

    /// Clips `cell`'s boundary to the user's clipping rectangle, closing
    /// whichever gaps the clip introduces with a polyline of fresh half
    /// edges along the rectangle. Cells with no boundary at all (a
    /// single surviving site) are given the rectangle's four corners.
    fn clip_cell(&mut self, cell: CellIndex) {
        let Some(outer) = self.diagram.cell(cell).outer_component else {
            self.clip_cell_with_no_boundary(cell);
            return;
        };

        let mut edges: Vec<(HalfEdgeIndex, bool, bool)> = Vec::new();
        let mut first_out: Option<usize> = None;
        let mut he = outer;
        loop {
            let segment = self.half_edge_segment(he);
            if let Some(result) = liang_barsky::clip(segment, &self.clip) {
                if result.origin_clipped || result.destination_clipped {
                    if result.destination_clipped && first_out.is_none() {
                        first_out = Some(edges.len());
                    }
                    if result.destination_clipped {
                        self.diagram.set_destination(he, result.segment.b);
                    }
                    if result.origin_clipped {
                        self.diagram.set_origin(he, result.segment.a);
                    }
                    edges.push((he, result.origin_clipped, result.destination_clipped));
                }
            }
            he = self
                .diagram
                .half_edge(he)
                .next
                .expect("cell boundary is a complete cycle after bounding");
            if he == outer {
                break;
            }
        }

        let Some(first_out) = first_out else {
            return;
        };
        let mut i = first_out;
        while i < edges.len() + first_out {
            let cur = edges[i % edges.len()];
            let next = edges[(i + 1) % edges.len()];
            let cur_destination = self
                .diagram
                .half_edge(cur.0)
                .destination
                .expect("clipped edge has a destination");
            let next_origin = self
                .diagram
                .half_edge(next.0)
                .origin
                .expect("clipped edge has an origin");
            let (head, tail) = self.half_edges_chain(cell, self.clip, cur_destination, next_origin);
            self.connect(cur.0, head);
            self.connect(tail, next.0);
            if next.2 {
                i += 1;
            } else {
                i += 2;
            }
        }
    }

    fn clip_cell_with_no_boundary(&mut self, cell: CellIndex) {
        let corners = [
            self.clip.top_left(),
            self.clip.bottom_left(),
            self.clip.bottom_right(),
            self.clip.top_right(),
        ];
        let mut edges = Vec::with_capacity(corners.len());
        for i in 0..corners.len() {
            let he = self.diagram.create_half_edge(cell);
            self.diagram.set_origin(he, corners[(i + corners.len() - 1) % corners.len()]);
            self.diagram.set_destination(he, corners[i]);
            edges.push(he);
        }
        for i in 0..edges.len() {
            self.connect(edges[i], edges[(i + 1) % edges.len()]);
        }
        self.diagram.set_cell_outer_component(cell, edges[0]);
    }

    fn half_edge_segment(&self, he: HalfEdgeIndex) -> LineSegment {
        let edge = self.diagram.half_edge(he);
        LineSegment::new(
            edge.origin.expect("segment requires an origin"),
            edge.destination.expect("segment requires a destination"),
        )
    }

    fn half_edges_chain(
        &mut self,
        cell: CellIndex,
        rect: Rectangle,
        start: Vector2,
        end: Vector2,
    ) -> (HalfEdgeIndex, HalfEdgeIndex) {
        let points = rect.get_rect_polyline_for_ccw(start, end);
        let head = self.diagram.create_half_edge(cell);
        self.diagram.set_origin(head, start);
        let mut current = head;
        for point in points {
            self.diagram.set_destination(current, point);
            let next = self.diagram.create_half_edge(cell);
            self.diagram.set_origin(next, point);
            self.connect(current, next);
            current = next;
        }
        self.diagram.set_destination(current, end);
        (head, current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(x: f64, y: f64) -> Site {
        Site::new(x, y)
    }

    #[test]
    fn empty_input_yields_empty_diagram() {
        let mut diagram = Diagram::new();
        let clip = Rectangle::from_bounds(0.0, 0.0, 100.0, 100.0);
        let result = compute(&HashSet::new(), &mut diagram, clip, -1);
        assert!(result);
        assert_eq!(diagram.cell_count(), 0);
        assert!(diagram.vertices().is_empty());
    }

    #[test]
    fn single_site_cell_is_the_clip_rectangle() {
        let mut diagram = Diagram::new();
        let clip = Rectangle::from_bounds(0.0, 0.0, 100.0, 100.0);
        let mut sites = HashSet::new();
        sites.insert(site(50.0, 50.0));

        let result = compute(&sites, &mut diagram, clip, -1);
        assert!(result);
        assert_eq!(diagram.cell_count(), 1);

        let cell = diagram.cells().next().unwrap();
        let hull = diagram.hull_vertices_ccw(cell);
        assert_eq!(hull.len(), 4);
        for corner in [
            Vector2::new(0.0, 0.0),
            Vector2::new(0.0, 100.0),
            Vector2::new(100.0, 100.0),
            Vector2::new(100.0, 0.0),
        ] {
            assert!(hull.iter().any(|v| (*v - corner).magnitude() < 1e-6));
        }
    }

    #[test]
    fn two_sites_split_along_perpendicular_bisector() {
        let mut diagram = Diagram::new();
        let clip = Rectangle::from_bounds(0.0, 0.0, 100.0, 100.0);
        let mut sites = HashSet::new();
        sites.insert(site(25.0, 50.0));
        sites.insert(site(75.0, 50.0));

        let result = compute(&sites, &mut diagram, clip, -1);
        assert!(result);
        assert_eq!(diagram.cell_count(), 2);

        for cell in diagram.cells().collect::<Vec<_>>() {
            let hull = diagram.hull_vertices_ccw(cell);
            assert!(hull.iter().all(|v| v.x >= 0.0 && v.x <= 100.0));
            for v in &hull {
                let on_bisector = (v.x - 50.0).abs() < 1e-6;
                let on_left_or_right_edge = (v.x - 0.0).abs() < 1e-6 || (v.x - 100.0).abs() < 1e-6;
                let on_top_or_bottom_edge = (v.y - 0.0).abs() < 1e-6 || (v.y - 100.0).abs() < 1e-6;
                assert!(
                    on_bisector || on_left_or_right_edge || on_top_or_bottom_edge,
                    "hull vertex {:?} lies off the rectangle boundary and off the bisector",
                    v
                );
            }
        }
    }

    #[test]
    fn three_equilateral_sites_meet_at_one_vertex() {
        let mut diagram = Diagram::new();
        let clip = Rectangle::from_bounds(0.0, 0.0, 100.0, 100.0);
        let mut sites = HashSet::new();
        sites.insert(site(50.0, 10.0));
        sites.insert(site(30.0, 45.0));
        sites.insert(site(70.0, 45.0));

        let result = compute(&sites, &mut diagram, clip, -1);
        assert!(result);
        assert_eq!(diagram.cell_count(), 3);
        assert_eq!(diagram.vertices().len(), 1);
    }

    #[test]
    fn collinear_row_produces_four_cells() {
        let mut diagram = Diagram::new();
        let clip = Rectangle::from_bounds(0.0, 0.0, 100.0, 100.0);
        let mut sites = HashSet::new();
        sites.insert(site(20.0, 10.0));
        sites.insert(site(40.0, 10.0));
        sites.insert(site(60.0, 10.0));
        sites.insert(site(80.0, 10.0));

        let result = compute(&sites, &mut diagram, clip, -1);
        assert!(result);
        assert_eq!(diagram.cell_count(), 4);
    }

    #[test]
    fn four_site_square_meets_at_center() {
        let mut diagram = Diagram::new();
        let clip = Rectangle::from_bounds(0.0, 0.0, 100.0, 100.0);
        let mut sites = HashSet::new();
        sites.insert(site(20.0, 20.0));
        sites.insert(site(80.0, 20.0));
        sites.insert(site(80.0, 80.0));
        sites.insert(site(20.0, 80.0));

        let result = compute(&sites, &mut diagram, clip, -1);
        assert!(result);
        assert_eq!(diagram.cell_count(), 4);
        assert_eq!(diagram.vertices().len(), 1);
    }

    #[test]
    fn max_steps_of_zero_never_drains_a_nonempty_queue() {
        let mut diagram = Diagram::new();
        let clip = Rectangle::from_bounds(0.0, 0.0, 100.0, 100.0);
        let mut sites = HashSet::new();
        sites.insert(site(50.0, 50.0));
        sites.insert(site(10.0, 10.0));

        let result = compute(&sites, &mut diagram, clip, 0);
        assert!(!result);
    }
}
