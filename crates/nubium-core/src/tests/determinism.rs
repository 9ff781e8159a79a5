//! Determinism verification tests.
//!
//! Two sessions built from the same level and fed the same intents must
//! agree on every body, every frame. This is what makes input replays and
//! scripted runs reproducible.

use glam::Vec2;

use crate::host::Host;
use crate::input::Intents;
use crate::level::ObjectKind;
use crate::session::FrameOutcome;
use crate::tests::helpers::{corridor_level, player, stored_session, walk_to_goal_level, TestSession};

/// A short scripted run: wait, run right, jump, run left, idle.
fn script() -> Vec<Intents> {
    let jump_right = Intents {
        move_left: false,
        move_right: true,
        jump: true,
    };
    let mut frames = Vec::new();
    frames.extend(std::iter::repeat(Intents::NONE).take(10));
    frames.extend(std::iter::repeat(Intents::RIGHT).take(30));
    frames.extend(std::iter::repeat(jump_right).take(3));
    frames.extend(std::iter::repeat(Intents::LEFT).take(20));
    frames.extend(std::iter::repeat(Intents::NONE).take(20));
    frames
}

/// Player position, velocity and outcome after every frame.
fn trace(session: &mut TestSession, frames: &[Intents]) -> Vec<(Vec2, Vec2, FrameOutcome)> {
    frames
        .iter()
        .map(|intents| {
            let outcome = session.frame(*intents).unwrap();
            let handle = player(session);
            let host = session.host();
            (
                host.position(handle).unwrap(),
                host.velocity(handle).unwrap(),
                outcome,
            )
        })
        .collect()
}

#[test]
fn same_inputs_same_trace() {
    let level = corridor_level(&[(ObjectKind::Glue, 300.0), (ObjectKind::Goal, 700.0)]);
    let mut a = stored_session(&level);
    let mut b = stored_session(&level);

    assert_eq!(trace(&mut a, &script()), trace(&mut b, &script()));
}

#[test]
fn same_inputs_same_world() {
    let level = walk_to_goal_level();
    let mut a = stored_session(&level);
    let mut b = stored_session(&level);

    for intents in script() {
        a.frame(intents).unwrap();
        b.frame(intents).unwrap();
        let world_a = serde_json::to_value(a.host().world()).unwrap();
        let world_b = serde_json::to_value(b.host().world()).unwrap();
        assert_eq!(world_a, world_b);
    }
    assert_eq!(a.state(), b.state());
}

#[test]
fn death_cycles_are_identical() {
    let level = corridor_level(&[(ObjectKind::Damage, 100.0), (ObjectKind::Goal, 400.0)]);
    let mut session = stored_session(&level);
    let frames = vec![Intents::RIGHT; 200];

    let full = trace(&mut session, &frames);
    let deaths: Vec<usize> = full
        .iter()
        .enumerate()
        .filter(|(_, (_, _, outcome))| *outcome == FrameOutcome::Died)
        .map(|(frame, _)| frame)
        .collect();

    assert!(deaths.len() >= 2, "expected repeated deaths, got {deaths:?}");
    let period = deaths[1] - deaths[0];
    for pair in deaths.windows(2) {
        assert_eq!(pair[1] - pair[0], period);
    }
    assert_eq!(full[0].0, full[deaths[0] + 1].0);
}
