//! User data model.
//!
//! A user carries exactly one of two profile shapes. The shape is keyed by the
//! user's role, so the role is derived from the profile variant rather than
//! stored alongside it; a mentee can never carry mentor-only skills.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Validation errors returned by [`User::mentor`] and friends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    InvalidEmail,
    SkillsOnMentee,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like local@domain.tld"),
            Self::SkillsOnMentee => write!(f, "mentee profiles must not declare skills"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable numeric user identifier assigned by the remote authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Access the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two mutually exclusive account roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Mentor,
    Mentee,
}

impl Role {
    /// Lower-case wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mentor => "mentor",
            Self::Mentee => "mentee",
        }
    }

    /// The role on the other side of a match request.
    #[must_use]
    pub const fn counterpart(self) -> Self {
        match self {
            Self::Mentor => Self::Mentee,
            Self::Mentee => Self::Mentor,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contact email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only; the remote authority owns real address validation.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(email.into())
    }

    fn from_owned(email: String) -> Result<Self, UserValidationError> {
        if email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Profile shown for mentors, including their advertised skills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentorProfile {
    pub name: String,
    pub bio: String,
    pub image_url: String,
    pub skills: Vec<String>,
}

/// Profile shown for mentees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenteeProfile {
    pub name: String,
    pub bio: String,
    pub image_url: String,
}

/// Role-keyed profile union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Profile {
    Mentor(MentorProfile),
    Mentee(MenteeProfile),
}

impl Profile {
    /// Role implied by the profile shape.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Mentor(_) => Role::Mentor,
            Self::Mentee(_) => Role::Mentee,
        }
    }

    /// Display name; may be blank when the user never filled it in.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Mentor(profile) => profile.name.as_str(),
            Self::Mentee(profile) => profile.name.as_str(),
        }
    }

    /// Free-form biography.
    #[must_use]
    pub fn bio(&self) -> &str {
        match self {
            Self::Mentor(profile) => profile.bio.as_str(),
            Self::Mentee(profile) => profile.bio.as_str(),
        }
    }

    /// Avatar location; may be blank when no image was uploaded.
    #[must_use]
    pub fn image_url(&self) -> &str {
        match self {
            Self::Mentor(profile) => profile.image_url.as_str(),
            Self::Mentee(profile) => profile.image_url.as_str(),
        }
    }
}

/// Registered user as seen by the matching client.
///
/// ## Invariants
/// - `email` has a valid shape.
/// - [`User::role`] always agrees with the profile variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: UserId,
    email: Email,
    profile: Profile,
}

impl User {
    /// Assemble a user from already validated parts.
    #[must_use]
    pub const fn new(id: UserId, email: Email, profile: Profile) -> Self {
        Self { id, email, profile }
    }

    /// Build a mentor from string inputs.
    pub fn mentor(
        id: UserId,
        email: impl Into<String>,
        name: impl Into<String>,
        skills: Vec<String>,
    ) -> Result<Self, UserValidationError> {
        let profile = Profile::Mentor(MentorProfile {
            name: name.into(),
            bio: String::new(),
            image_url: String::new(),
            skills,
        });
        Ok(Self::new(id, Email::new(email)?, profile))
    }

    /// Build a mentee from string inputs.
    pub fn mentee(
        id: UserId,
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let profile = Profile::Mentee(MenteeProfile {
            name: name.into(),
            bio: String::new(),
            image_url: String::new(),
        });
        Ok(Self::new(id, Email::new(email)?, profile))
    }

    /// Stable user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Contact email.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Role derived from the profile shape.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.profile.role()
    }

    /// Role-keyed profile.
    #[must_use]
    pub const fn profile(&self) -> &Profile {
        &self.profile
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileDto {
    name: String,
    #[serde(default)]
    bio: String,
    #[serde(default)]
    image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    skills: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    id: u64,
    email: String,
    role: Role,
    profile: ProfileDto,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User { id, email, profile } = value;
        let role = profile.role();
        let profile = match profile {
            Profile::Mentor(MentorProfile {
                name,
                bio,
                image_url,
                skills,
            }) => ProfileDto {
                name,
                bio,
                image_url,
                skills: Some(skills),
            },
            Profile::Mentee(MenteeProfile {
                name,
                bio,
                image_url,
            }) => ProfileDto {
                name,
                bio,
                image_url,
                skills: None,
            },
        };
        Self {
            id: id.get(),
            email: email.into(),
            role,
            profile,
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        let UserDto {
            id,
            email,
            role,
            profile,
        } = value;
        let ProfileDto {
            name,
            bio,
            image_url,
            skills,
        } = profile;
        let profile = match role {
            Role::Mentor => Profile::Mentor(MentorProfile {
                name,
                bio,
                image_url,
                skills: skills.unwrap_or_default(),
            }),
            Role::Mentee => {
                if skills.as_ref().is_some_and(|skills| !skills.is_empty()) {
                    return Err(UserValidationError::SkillsOnMentee);
                }
                Profile::Mentee(MenteeProfile {
                    name,
                    bio,
                    image_url,
                })
            }
        };
        Ok(User::new(UserId::new(id), Email::new(email)?, profile))
    }
}
