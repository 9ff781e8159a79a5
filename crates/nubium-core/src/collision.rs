//! Collision resolution: the player against every role bucket.
//!
//! Each frame the player is collided with the buckets in [`RULES`] order.
//! Every member is solid, so the host separates the bodies first; a rule's
//! response then runs for each member actually touched.
//!
//! The order matters: a later response in the same frame may overwrite
//! velocity set by an earlier one, and the terminal contacts (goal, then
//! hazard) come last.

use glam::Vec2;
use tracing::debug;

use crate::classifier::RoleBuckets;
use crate::entity::{EntityHandle, Role};
use crate::host::Host;
use crate::player::PlayerState;
use crate::tuning::PlayerTuning;

/// Contact response, called with the touched bucket member.
pub type Response = fn(&mut Responder<'_>, EntityHandle);

/// One entry of the resolution table.
#[derive(Clone, Copy)]
pub struct Rule {
    /// Bucket collided against
    pub role: Role,
    /// Extra logic on top of solid separation
    pub respond: Option<Response>,
}

/// The resolution table, in evaluation order.
pub const RULES: [Rule; 6] = [
    Rule {
        role: Role::Platform,
        respond: None,
    },
    Rule {
        role: Role::FallingPlatform,
        respond: Some(fall_away),
    },
    Rule {
        role: Role::Glue,
        respond: Some(stick),
    },
    Rule {
        role: Role::Boost,
        respond: Some(arm_boost),
    },
    Rule {
        role: Role::Goal,
        respond: Some(reach_goal),
    },
    Rule {
        role: Role::Hazard,
        respond: Some(kill),
    },
];

/// What the player touched this frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameContacts {
    /// The goal was touched
    pub won: bool,
    /// A hazard was touched
    pub died: bool,
    /// Every contact, in resolution order
    pub touched: Vec<(Role, EntityHandle)>,
}

impl FrameContacts {
    /// Whether any member of `role` was touched.
    #[must_use]
    pub fn touched(&self, role: Role) -> bool {
        self.touched.iter().any(|(r, _)| *r == role)
    }
}

/// Context handed to contact responses.
pub struct Responder<'a> {
    /// The host holding the bodies
    pub host: &'a mut dyn Host,
    /// The player's handle
    pub player: EntityHandle,
    /// The player's ability state
    pub state: &'a mut PlayerState,
    /// Tuning constants
    pub tuning: &'a PlayerTuning,
    /// Contacts gathered so far
    pub contacts: FrameContacts,
}

/// The platform drops away at the tuned descent speed.
fn fall_away(ctx: &mut Responder<'_>, platform: EntityHandle) {
    ctx.host
        .set_velocity(platform, Vec2::new(0.0, ctx.tuning.fall_speed));
}

/// The player stops vertically and the glue escape window opens.
fn stick(ctx: &mut Responder<'_>, _glue: EntityHandle) {
    if let Some(velocity) = ctx.host.velocity(ctx.player) {
        ctx.host
            .set_velocity(ctx.player, Vec2::new(velocity.x, 0.0));
    }
    ctx.state.glue_cooldown = ctx.tuning.glue_cooldown_frames;
}

fn arm_boost(ctx: &mut Responder<'_>, _boost: EntityHandle) {
    ctx.state.jump_boost_armed = true;
}

fn reach_goal(ctx: &mut Responder<'_>, _goal: EntityHandle) {
    ctx.contacts.won = true;
}

fn kill(ctx: &mut Responder<'_>, _hazard: EntityHandle) {
    ctx.contacts.died = true;
}

/// Collides the player with every bucket and runs the responses.
///
/// Returns the contacts; applying the terminal ones is left to the caller.
pub fn resolve(
    buckets: &RoleBuckets,
    host: &mut dyn Host,
    player: EntityHandle,
    state: &mut PlayerState,
    tuning: &PlayerTuning,
) -> FrameContacts {
    let mut ctx = Responder {
        host,
        player,
        state,
        tuning,
        contacts: FrameContacts::default(),
    };

    for rule in &RULES {
        for &member in buckets.members(rule.role) {
            if !ctx.host.collide(player, member) {
                continue;
            }
            ctx.contacts.touched.push((rule.role, member));
            if let Some(respond) = rule.respond {
                respond(&mut ctx, member);
            }
        }
    }

    if ctx.contacts.won || ctx.contacts.died {
        debug!(
            won = ctx.contacts.won,
            died = ctx.contacts.died,
            "terminal contact"
        );
    }
    ctx.contacts
}
