//! Member removal workflow
//!
//! Removing a member from a team also unassigns them from the team's event
//! types and deletes their managed copies of those event types. Removing a
//! member from an organization additionally drops their sub-team memberships,
//! their organization profile, and any stale username redirect.
//!
//! Every write happens inside one `MemberRemovalUnit`. A failure at any step
//! drops the unit, discarding the earlier writes.

use slotline_common::{Error, Result};

use crate::domain::entities::RemovedMembership;
use crate::repository::{MemberRemovalUnit, TeamsStore};

/// A single (member, team) removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveMemberInput {
    pub member_id: i64,
    pub team_id: i64,
    pub is_org: bool,
}

/// Remove `member_id` from `team_id` and clean up everything hanging off the membership
pub async fn remove_member(
    store: &dyn TeamsStore,
    input: RemoveMemberInput,
) -> Result<RemovedMembership> {
    let RemoveMemberInput {
        member_id,
        team_id,
        is_org,
    } = input;

    let mut unit = store.begin().await?;

    let membership = unit
        .delete_membership(member_id, team_id)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!(
                "Membership not found for user {} in team {}",
                member_id, team_id
            ))
        })?;

    let hosts = unit.delete_hosts_for_team(member_id, team_id).await?;
    tracing::debug!(member_id, team_id, hosts, "Removed member from team event hosts");

    if is_org {
        leave_organization(&mut *unit, member_id, team_id).await?;
    }

    let managed = unit.delete_managed_event_types(member_id, team_id).await?;
    tracing::debug!(member_id, team_id, managed, "Deleted managed event types");

    unit.commit().await?;

    tracing::info!(
        member_id,
        team_id,
        is_org,
        membership_id = membership.id,
        "Member removed"
    );

    Ok(membership)
}

async fn leave_organization(
    unit: &mut dyn MemberRemovalUnit,
    member_id: i64,
    org_id: i64,
) -> Result<()> {
    tracing::debug!(member_id, org_id, "Removing a member from the organization");

    let user = unit.clear_organization(member_id).await?.ok_or_else(|| {
        Error::NotFound(format!("Could not find user with member id {}", member_id))
    })?;

    let org = unit
        .find_team(org_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Could not find org with team id {}", org_id)))?;

    let sub_team_memberships = unit.delete_sub_team_memberships(user.id, org.id).await?;
    tracing::debug!(
        member_id,
        org_id,
        sub_team_memberships,
        "Deleted sub-team memberships"
    );

    let profile = unit.find_profile(user.id, org.id).await?;

    if let Some(username) = user.has_redirect_for(profile.as_ref()) {
        tracing::debug!(member_id, username, "Cleaning up tempOrgRedirect for user");
        unit.delete_redirects_from(username).await?;
    }

    unit.detach_from_organization(user.id, org.id).await
}
