//! Solid separation between two overlapping bodies.
//!
//! The separation axis is chosen from the bodies' positions *before* the last
//! integration: if they were apart vertically, the contact is vertical (a
//! landing or a head bump); if they were apart horizontally, it is horizontal
//! (walking into a wall). Bodies that already overlapped before the step fall
//! back to the axis of least penetration.
//!
//! Choosing the axis from history rather than penetration depth keeps a body
//! walking across two adjacent platforms from snagging on the seam between
//! them.

use crate::body::{Body, Touching};

/// Axis along which a contact is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Left/right contact
    Horizontal,
    /// Top/bottom contact
    Vertical,
}

/// Overlap below this depth on the previous step counts as resting contact.
const SLOP: f32 = 1e-3;

/// Picks the separation axis for an overlapping pair.
#[must_use]
pub fn contact_axis(a: &Body, b: &Body) -> Axis {
    let (prev_a, prev_b) = (a.prev_aabb(), b.prev_aabb());
    let was_apart_y =
        prev_a.bottom() - SLOP <= prev_b.top() || prev_b.bottom() - SLOP <= prev_a.top();
    if was_apart_y {
        return Axis::Vertical;
    }
    let was_apart_x =
        prev_a.right() - SLOP <= prev_b.left() || prev_b.right() - SLOP <= prev_a.left();
    if was_apart_x {
        return Axis::Horizontal;
    }

    let (now_a, now_b) = (a.aabb(), b.aabb());
    let pen_x = (now_a.right() - now_b.left()).min(now_b.right() - now_a.left());
    let pen_y = (now_a.bottom() - now_b.top()).min(now_b.bottom() - now_a.top());
    if pen_y <= pen_x {
        Axis::Vertical
    } else {
        Axis::Horizontal
    }
}

/// Separates `a` and `b` if they overlap.
///
/// Returns `true` when the bodies were in contact. Two immovable bodies are
/// never separated and never report contact.
pub fn separate(a: &mut Body, b: &mut Body) -> bool {
    if a.immovable && b.immovable {
        return false;
    }
    if !a.aabb().overlaps(&b.aabb()) {
        return false;
    }

    match contact_axis(a, b) {
        Axis::Vertical => separate_y(a, b),
        Axis::Horizontal => separate_x(a, b),
    }
    true
}

/// Share of the overlap each body absorbs.
fn shares(a: &Body, b: &Body) -> (f32, f32) {
    match (a.immovable, b.immovable) {
        (false, true) => (1.0, 0.0),
        (true, false) => (0.0, 1.0),
        _ => (0.5, 0.5),
    }
}

fn separate_y(a: &mut Body, b: &mut Body) {
    let (share_a, share_b) = shares(a, b);
    let a_above = a.aabb().center().y < b.aabb().center().y;

    if a_above {
        let overlap = a.aabb().bottom() - b.aabb().top();
        a.position.y -= overlap * share_a;
        b.position.y += overlap * share_b;
        a.touching |= Touching::DOWN;
        b.touching |= Touching::UP;
    } else {
        let overlap = b.aabb().bottom() - a.aabb().top();
        a.position.y += overlap * share_a;
        b.position.y -= overlap * share_b;
        a.touching |= Touching::UP;
        b.touching |= Touching::DOWN;
    }

    let closing = a.velocity.y - b.velocity.y;
    if (a_above && closing > 0.0) || (!a_above && closing < 0.0) {
        settle(&mut a.velocity.y, &mut b.velocity.y, share_a, share_b);
    }
}

fn separate_x(a: &mut Body, b: &mut Body) {
    let (share_a, share_b) = shares(a, b);
    let a_left = a.aabb().center().x < b.aabb().center().x;

    if a_left {
        let overlap = a.aabb().right() - b.aabb().left();
        a.position.x -= overlap * share_a;
        b.position.x += overlap * share_b;
        a.touching |= Touching::RIGHT;
        b.touching |= Touching::LEFT;
    } else {
        let overlap = b.aabb().right() - a.aabb().left();
        a.position.x += overlap * share_a;
        b.position.x -= overlap * share_b;
        a.touching |= Touching::LEFT;
        b.touching |= Touching::RIGHT;
    }

    let closing = a.velocity.x - b.velocity.x;
    if (a_left && closing > 0.0) || (!a_left && closing < 0.0) {
        settle(&mut a.velocity.x, &mut b.velocity.x, share_a, share_b);
    }
}

/// Removes the closing speed along one axis.
///
/// A movable body hitting an immovable one takes on the immovable body's
/// speed, so a body resting on a descending platform rides it down.
fn settle(va: &mut f32, vb: &mut f32, share_a: f32, share_b: f32) {
    if share_b == 0.0 {
        *va = *vb;
    } else if share_a == 0.0 {
        *vb = *va;
    } else {
        let mean = (*va + *vb) * 0.5;
        *va = mean;
        *vb = mean;
    }
}
