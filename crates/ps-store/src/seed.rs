//! Demo catalog used by `ps-seed` and the integration tests.
//!
//! Fixed UUIDs so repeated seeding stays idempotent.

use ps_common::{ActionList, AuthenticationAction, DatabaseAction, Effect, Permission};
use uuid::{uuid, Uuid};

pub const ROLE_USER: Uuid = uuid!("9faaf9ba-464e-4c68-a901-630fc4de123b");
pub const ROLE_ADMINISTRATOR: Uuid = uuid!("346a3cce-49d4-4e3c-bade-a16ed44b98bb");
pub const ROLE_AUDITOR: Uuid = uuid!("6f25f789-72f3-41e2-9561-b30ca19aa225");

/// The three demo roles, with no associations.
pub fn demo_roles() -> Vec<(Uuid, &'static str)> {
    vec![
        (ROLE_USER, "User"),
        (ROLE_ADMINISTRATOR, "Administrator"),
        (ROLE_AUDITOR, "Auditor"),
    ]
}

/// Ten demo permissions spanning both action namespaces and both effects.
pub fn demo_permissions() -> Vec<Permission> {
    fn permission(
        id: Uuid,
        name: &str,
        effect: Effect,
        action: ActionList,
        resource: &str,
        description: &str,
    ) -> Permission {
        Permission {
            id,
            name: name.to_string(),
            effect,
            action,
            resource: resource.to_string(),
            description: Some(description.to_string()),
        }
    }

    vec![
        permission(
            uuid!("0d6179fc-bc2f-4a50-bfd8-4ce4d10680f4"),
            "Permission 1",
            Effect::Allow,
            ActionList::Database(vec![DatabaseAction::Read]),
            "Database1",
            "Allows reading from Database1",
        ),
        permission(
            uuid!("43f2ad9b-cafe-4175-ac26-ed7a5f1bf438"),
            "Permission 2",
            Effect::Deny,
            ActionList::Database(vec![DatabaseAction::Write]),
            "Database2",
            "Denies writing to Database2",
        ),
        permission(
            uuid!("f9569347-80fb-454b-aea4-5d07781d7a7f"),
            "Permission 3",
            Effect::Allow,
            ActionList::Database(vec![DatabaseAction::Delete]),
            "Database3",
            "Allows deleting from Database3",
        ),
        permission(
            uuid!("0475606e-62f9-43c1-a5f1-aff50a15f478"),
            "Permission 4",
            Effect::Allow,
            ActionList::Database(vec![DatabaseAction::Update]),
            "Database4",
            "Allows updating Database4",
        ),
        permission(
            uuid!("2186acab-2660-42c2-9d4b-105624e90a75"),
            "Permission 5",
            Effect::Deny,
            ActionList::Authentication(vec![AuthenticationAction::Verify]),
            "AuthSystem",
            "Denies verification in AuthSystem",
        ),
        permission(
            uuid!("ae06ef52-a5cc-4c23-9288-25f2f67ae42f"),
            "Permission 6",
            Effect::Allow,
            ActionList::Authentication(vec![AuthenticationAction::ChangePassword]),
            "AuthSystem",
            "Allows changing password in AuthSystem",
        ),
        permission(
            uuid!("2183ad84-2dae-46a8-a69b-73d040acd6bc"),
            "Permission 7",
            Effect::Deny,
            ActionList::Database(vec![DatabaseAction::Read]),
            "Database5",
            "Denies reading from Database5",
        ),
        permission(
            uuid!("88659aaa-4b2d-47a8-92b3-ae58b0779a4e"),
            "Permission 8",
            Effect::Allow,
            ActionList::Database(vec![DatabaseAction::Write]),
            "Database6",
            "Allows writing to Database6",
        ),
        permission(
            uuid!("ed289381-23a6-4cff-b86d-3e0b423ca6a7"),
            "Permission 9",
            Effect::Deny,
            ActionList::Authentication(vec![AuthenticationAction::ResetPassword]),
            "AuthSystem",
            "Denies password reset in AuthSystem",
        ),
        permission(
            uuid!("55ca6fdf-a91a-4f1d-9a29-4c41096c74a6"),
            "Permission 10",
            Effect::Allow,
            ActionList::Authentication(vec![AuthenticationAction::CreateUser]),
            "AuthSystem",
            "Allows creating users in AuthSystem",
        ),
    ]
}
