//! Display identities for request counterparts.

use serde::Serialize;

use super::{Role, User, UserId};

const MENTOR_AVATAR: &str = "https://placehold.co/500x500.jpg?text=MENTOR";
const MENTEE_AVATAR: &str = "https://placehold.co/500x500.jpg?text=MENTEE";

/// Name, contact, and avatar shown for a counterpart user.
///
/// Placeholders are deterministic per role and id so that a failed lookup
/// renders the same way on every refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayIdentity {
    pub user_id: UserId,
    pub name: String,
    pub contact_label: Option<String>,
    pub avatar_url: String,
    pub resolved: bool,
}

impl DisplayIdentity {
    /// Generic identity used when the counterpart could not be resolved.
    pub fn placeholder(user_id: UserId, role: Role) -> Self {
        Self {
            user_id,
            name: placeholder_name(user_id, role),
            contact_label: None,
            avatar_url: placeholder_avatar(role).to_owned(),
            resolved: false,
        }
    }

    /// Identity built from a resolved user record.
    pub fn from_user(user: &User) -> Self {
        let image_url = user.profile().image_url().trim();
        let avatar_url = if image_url.is_empty() {
            placeholder_avatar(user.role()).to_owned()
        } else {
            image_url.to_owned()
        };
        let name = user.profile().name().trim();
        let name = if name.is_empty() {
            placeholder_name(user.id(), user.role())
        } else {
            name.to_owned()
        };
        Self {
            user_id: user.id(),
            name,
            contact_label: Some(user.email().to_string()),
            avatar_url,
            resolved: true,
        }
    }
}

fn placeholder_name(user_id: UserId, role: Role) -> String {
    match role {
        Role::Mentor => format!("Mentor {user_id}"),
        Role::Mentee => format!("Mentee {user_id}"),
    }
}

fn placeholder_avatar(role: Role) -> &'static str {
    match role {
        Role::Mentor => MENTOR_AVATAR,
        Role::Mentee => MENTEE_AVATAR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MentorProfile, Profile};
    use rstest::rstest;

    #[rstest]
    #[case(Role::Mentor, "Mentor 7", MENTOR_AVATAR)]
    #[case(Role::Mentee, "Mentee 7", MENTEE_AVATAR)]
    fn placeholders_are_role_specific(#[case] role: Role, #[case] name: &str, #[case] avatar: &str) {
        let identity = DisplayIdentity::placeholder(UserId::new(7), role);
        assert_eq!(identity.name, name);
        assert_eq!(identity.avatar_url, avatar);
        assert_eq!(identity.contact_label, None);
        assert!(!identity.resolved);
        assert_eq!(identity, DisplayIdentity::placeholder(UserId::new(7), role));
    }

    #[rstest]
    fn resolved_identity_uses_profile_and_email() {
        let user = User::new(
            UserId::new(3),
            crate::domain::Email::new("linus@example.com").expect("email"),
            Profile::Mentor(MentorProfile {
                name: "Linus".to_owned(),
                bio: String::new(),
                image_url: "/images/mentor/3".to_owned(),
                skills: vec!["C".to_owned()],
            }),
        );

        let identity = DisplayIdentity::from_user(&user);
        assert_eq!(identity.name, "Linus");
        assert_eq!(identity.contact_label.as_deref(), Some("linus@example.com"));
        assert_eq!(identity.avatar_url, "/images/mentor/3");
        assert!(identity.resolved);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_name_falls_back_to_placeholder_name(#[case] name: &str) {
        let user = User::mentor(UserId::new(9), "nine@example.com", name, Vec::new()).expect("user");

        let identity = DisplayIdentity::from_user(&user);
        assert_eq!(identity.name, "Mentor 9");
        assert_eq!(identity.contact_label.as_deref(), Some("nine@example.com"));
        assert!(identity.resolved);
    }

    #[rstest]
    fn blank_image_falls_back_to_placeholder_avatar() {
        let user = User::mentee(UserId::new(2), "ada@example.com", "Ada").expect("user");
        let identity = DisplayIdentity::from_user(&user);
        assert_eq!(identity.avatar_url, MENTEE_AVATAR);
        assert!(identity.resolved);
    }
}
