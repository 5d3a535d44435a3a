//! The sweep's event queue: a min-heap over `(y, x)` with insertion order
//! as a tiebreaker, supporting lazy removal of invalidated circle events.

use crate::beachline::ArcIndex;
use crate::circle::Circle;
use crate::vector2::{Site, Vector2};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone)]
pub enum EventKind {
    Site { site: Site },
    Circle {
        point: Vector2,
        arc: ArcIndex,
        circle: Circle,
    },
}

/// A site or circle event. `heap_index` is kept current by the queue on
/// every swap, so a `Weak` handle into an arc's `pending_circle` stays
/// valid for removal no matter how the heap has since been reshuffled.
#[derive(Debug)]
pub struct Event {
    pub y: f64,
    pub x: f64,
    seq: u64,
    heap_index: usize,
    pub kind: EventKind,
}

impl Event {
    pub fn point(&self) -> Vector2 {
        match &self.kind {
            EventKind::Site { site } => site.point(),
            EventKind::Circle { point, .. } => *point,
        }
    }

    fn key(&self) -> (f64, f64, u64) {
        (self.y, self.x, self.seq)
    }
}

/// A binary min-heap of `Rc<RefCell<Event>>`. Handed-out `Weak` references
/// let an arc remember "my circle event" without the queue needing to
/// search for it by value; `remove` upgrades the handle, reads its current
/// slot, and restores the heap invariant in `O(log n)`.
pub struct EventQueue {
    heap: Vec<Rc<RefCell<Event>>>,
    next_seq: u64,
}

fn parent(index: usize) -> usize {
    (index + 1) / 2 - 1
}

fn left_child(index: usize) -> usize {
    2 * (index + 1) - 1
}

fn right_child(index: usize) -> usize {
    2 * (index + 1)
}

impl EventQueue {
    pub fn new() -> Self {
        EventQueue {
            heap: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    fn push(&mut self, y: f64, x: f64, kind: EventKind) -> Weak<RefCell<Event>> {
        let index = self.heap.len();
        let event = Rc::new(RefCell::new(Event {
            y,
            x,
            seq: self.next_seq,
            heap_index: index,
            kind,
        }));
        self.next_seq += 1;
        let handle = Rc::downgrade(&event);
        self.heap.push(event);
        self.sift_up(index);
        handle
    }

    pub fn push_site_event(&mut self, site: Site) -> Weak<RefCell<Event>> {
        self.push(site.y(), site.x(), EventKind::Site { site })
    }

    pub fn push_circle_event(
        &mut self,
        arc: ArcIndex,
        circle: Circle,
    ) -> Weak<RefCell<Event>> {
        let point = circle.bottom_point();
        self.push(point.y, point.x, EventKind::Circle { point, arc, circle })
    }

    /// Removes and returns the event with the smallest `(y, x)`, breaking
    /// ties by insertion order.
    pub fn pop_min(&mut self) -> Option<Event> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let popped = self.heap.pop().unwrap();
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        match Rc::try_unwrap(popped) {
            Ok(cell) => Some(cell.into_inner()),
            Err(_) => panic!("event still has outstanding references on pop"),
        }
    }

    /// Invalidates the event `handle` points at, if it is still live. A
    /// `None` upgrade means the event already fired or was removed; this
    /// is the no-op lazy-invalidation path arcs rely on.
    pub fn remove(&mut self, handle: &Weak<RefCell<Event>>) {
        let Some(event) = handle.upgrade() else {
            return;
        };
        let index = event.borrow().heap_index;
        let last = self.heap.len() - 1;
        self.swap(index, last);
        self.heap.pop();
        if index < self.heap.len() {
            self.update(index);
        }
    }

    fn update(&mut self, index: usize) {
        if index > 0 && self.heap[parent(index)].borrow().key() > self.heap[index].borrow().key()
        {
            self.sift_up(index);
        } else {
            self.sift_down(index);
        }
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0
            && self.heap[parent(index)].borrow().key() > self.heap[index].borrow().key()
        {
            self.swap(index, parent(index));
            index = parent(index);
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        loop {
            let mut smallest = index;
            let left = left_child(index);
            let right = right_child(index);

            if left < self.heap.len()
                && self.heap[left].borrow().key() < self.heap[smallest].borrow().key()
            {
                smallest = left;
            }
            if right < self.heap.len()
                && self.heap[right].borrow().key() < self.heap[smallest].borrow().key()
            {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.swap(index, smallest);
            index = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.heap[a].borrow_mut().heap_index = a;
        self.heap[b].borrow_mut().heap_index = b;
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        EventQueue::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typedvector::TypedVec;

    fn dummy_arc_index() -> ArcIndex {
        let mut arcs: TypedVec<crate::beachline::Arc> = TypedVec::new();
        arcs.insert(crate::beachline::Arc::new(Site::new(0.0, 0.0)))
    }

    #[test]
    fn pops_in_ascending_y_order() {
        let mut queue = EventQueue::new();
        queue.push_site_event(Site::new(0.0, 2.0));
        queue.push_site_event(Site::new(0.0, 0.5));
        queue.push_site_event(Site::new(0.0, 1.0));

        assert_eq!(queue.pop_min().unwrap().y, 0.5);
        assert_eq!(queue.pop_min().unwrap().y, 1.0);
        assert_eq!(queue.pop_min().unwrap().y, 2.0);
        assert!(queue.pop_min().is_none());
    }

    #[test]
    fn ties_break_by_insertion_order() {
        let mut queue = EventQueue::new();
        queue.push_site_event(Site::new(1.0, 5.0));
        queue.push_site_event(Site::new(2.0, 5.0));
        assert_eq!(queue.pop_min().unwrap().x, 1.0);
        assert_eq!(queue.pop_min().unwrap().x, 2.0);
    }

    #[test]
    fn removed_event_never_fires() {
        let mut queue = EventQueue::new();
        let handle = queue.push_circle_event(
            dummy_arc_index(),
            Circle {
                center: Vector2::new(0.0, 0.0),
                radius: 1.0,
            },
        );
        queue.push_site_event(Site::new(5.0, 5.0));
        queue.remove(&handle);
        let remaining = queue.pop_min().unwrap();
        assert!(matches!(remaining.kind, EventKind::Site { .. }));
        assert!(queue.pop_min().is_none());
    }
}
