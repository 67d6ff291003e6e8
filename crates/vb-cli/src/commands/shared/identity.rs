use anyhow::Context;
use vb_core::enums::Role;
use vb_core::identity::{Actor, RequestOrigin};
use vb_db::desk::CallContext;

use crate::cli::IdentityFlags;
use crate::commands::shared::parse::parse_enum;

/// The acting account. Every command that touches reservations needs one.
pub fn actor(identity: &IdentityFlags) -> anyhow::Result<Actor> {
    let id = identity
        .actor_id
        .context("this command needs an acting account: pass --actor-id")?;
    let role: Role = parse_enum(&identity.actor_role, "actor role")?;
    Ok(Actor {
        id,
        role,
        display_name: None,
        username: None,
        full_name: identity.actor_name.clone(),
    })
}

/// Actor plus request origin for mutating calls.
pub fn call_context(identity: &IdentityFlags) -> anyhow::Result<CallContext> {
    Ok(CallContext {
        actor: actor(identity)?,
        origin: RequestOrigin {
            ip: identity.origin_ip.clone(),
            agent: Some(
                identity
                    .origin_agent
                    .clone()
                    .unwrap_or_else(|| format!("vbk/{}", env!("CARGO_PKG_VERSION"))),
            ),
        },
    })
}

/// Administrative views are for staff and admins only.
pub fn require_staff(identity: &IdentityFlags, what: &str) -> anyhow::Result<Actor> {
    let actor = actor(identity)?;
    if actor.role == Role::Client {
        anyhow::bail!("{what} is restricted to staff and admin accounts");
    }
    Ok(actor)
}
