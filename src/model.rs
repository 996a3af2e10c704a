//! User record and its coded fields.
//!
//! `status` and `position` travel as integers on the wire with `-1` meaning
//! "not chosen yet"; here they are enums with an explicit `Unset` variant.
//! `role` stays a comma-joined string on the record and is decoded into a
//! [`RoleSet`] for editing.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned identifier. Kept verbatim, whether the API sends a number or a string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UserId::Number(n) => write!(f, "{n}"),
            UserId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for UserId {
    fn from(n: i64) -> Self {
        UserId::Number(n)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId::Text(s.to_string())
    }
}

/// Integer code outside the domain of a coded field.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} code {code}")]
pub struct CodeError {
    pub kind: &'static str,
    pub code: i64,
}

/// Account status. Wire codes: -1 unset, 0 inactive, 1 active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Status {
    #[default]
    Unset,
    Inactive,
    Active,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Unset, Status::Inactive, Status::Active];

    pub fn code(self) -> i64 {
        match self {
            Status::Unset => -1,
            Status::Inactive => 0,
            Status::Active => 1,
        }
    }

    pub fn is_unset(self) -> bool {
        self == Status::Unset
    }

    /// Label used in the list table.
    pub fn label(self) -> &'static str {
        match self {
            Status::Unset => "-",
            Status::Inactive => "Inactive",
            Status::Active => "Active",
        }
    }

    /// Label used by the form select, where unset reads as a prompt.
    pub fn option_label(self) -> &'static str {
        match self {
            Status::Unset => "Select status",
            other => other.label(),
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, Self::ALL.len() - 1)
    }
}

impl TryFrom<i64> for Status {
    type Error = CodeError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|s| s.code() == code)
            .ok_or(CodeError { kind: "status", code })
    }
}

impl From<Status> for i64 {
    fn from(s: Status) -> Self {
        s.code()
    }
}

/// Job position. Wire codes: -1 unset, 0 Auditor, 1 Administrator, 2 Developer, 3 Manager.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Position {
    #[default]
    Unset,
    Auditor,
    Administrator,
    Developer,
    Manager,
}

impl Position {
    pub const ALL: [Position; 5] = [
        Position::Unset,
        Position::Auditor,
        Position::Administrator,
        Position::Developer,
        Position::Manager,
    ];

    pub fn code(self) -> i64 {
        match self {
            Position::Unset => -1,
            Position::Auditor => 0,
            Position::Administrator => 1,
            Position::Developer => 2,
            Position::Manager => 3,
        }
    }

    pub fn is_unset(self) -> bool {
        self == Position::Unset
    }

    pub fn label(self) -> &'static str {
        match self {
            Position::Unset => "-",
            Position::Auditor => "Auditor",
            Position::Administrator => "Administrator",
            Position::Developer => "Developer",
            Position::Manager => "Manager",
        }
    }

    pub fn option_label(self) -> &'static str {
        match self {
            Position::Unset => "Select position",
            other => other.label(),
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, Self::ALL.len() - 1)
    }
}

impl TryFrom<i64> for Position {
    type Error = CodeError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|p| p.code() == code)
            .ok_or(CodeError { kind: "position", code })
    }
}

impl From<Position> for i64 {
    fn from(p: Position) -> Self {
        p.code()
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, step: usize) -> T {
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    all[(idx + step) % all.len()]
}

/// Any JSON value a backend might put in a coded field.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCode {
    Int(i64),
    Text(String),
    #[allow(dead_code)]
    Other(serde::de::IgnoredAny),
}

/// Decode a coded field of a fetched record. Null, unknown or malformed
/// codes become `Unset` so one bad row cannot sink the whole collection.
fn lenient_code<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64, Error = CodeError> + Default,
{
    let code = match Option::<RawCode>::deserialize(de)? {
        None => return Ok(T::default()),
        Some(RawCode::Int(n)) => Some(n),
        Some(RawCode::Text(s)) => s.trim().parse().ok(),
        Some(RawCode::Other(_)) => None,
    };
    match code.map(T::try_from) {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => {
            tracing::warn!("{e}; treating as unset");
            Ok(T::default())
        }
        None => {
            tracing::warn!("malformed code; treating as unset");
            Ok(T::default())
        }
    }
}

/// A role name that can appear in the comma-joined `role` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Administrator,
    Support,
    Assistant,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Administrator, Role::Support, Role::Assistant];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Administrator => "Administrator",
            Role::Support => "Support",
            Role::Assistant => "Assistant",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown role `{s}`"))
    }
}

/// Ordered, duplicate-free selection of roles. Order is the order of selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleSet(Vec<Role>);

impl RoleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the comma-joined wire form. Blank pieces are ignored, unknown names dropped.
    pub fn decode(joined: &str) -> Self {
        let mut set = Self::new();
        for piece in joined.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match piece.parse::<Role>() {
                Ok(role) if !set.contains(role) => set.0.push(role),
                Ok(_) => {}
                Err(e) => tracing::warn!(role = piece, "dropping role: {e}"),
            }
        }
        set
    }

    /// Encode back to the comma-joined wire form. The empty set encodes to "".
    pub fn encode(&self) -> String {
        self.0.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(",")
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// Deselect `role` if selected, otherwise append it.
    pub fn toggle(&mut self, role: Role) {
        if let Some(idx) = self.0.iter().position(|r| *r == role) {
            self.0.remove(idx);
        } else {
            self.0.push(role);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = Self::new();
        for role in iter {
            if !set.contains(role) {
                set.0.push(role);
            }
        }
        set
    }
}

/// A user record as exchanged with the API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub telephone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_code")]
    pub status: Status,
    #[serde(default)]
    pub role: String,
    #[serde(default, deserialize_with = "lenient_code")]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl User {
    /// Blank template for the create form: empty strings and unset codes.
    pub fn blank() -> Self {
        Self {
            published: Some(false),
            ..Self::default()
        }
    }

    /// Every string-valued field, including a textual id. Coded fields are skipped.
    pub fn string_fields(&self) -> impl Iterator<Item = &str> {
        let id = match &self.id {
            Some(UserId::Text(s)) => Some(s.as_str()),
            _ => None,
        };
        id.into_iter().chain([
            self.firstname.as_str(),
            self.name.as_str(),
            self.telephone.as_str(),
            self.email.as_str(),
            self.role.as_str(),
        ])
    }

    pub fn roles(&self) -> RoleSet {
        RoleSet::decode(&self.role)
    }
}

/// Create payload: a [`User`] without its id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub firstname: String,
    pub name: String,
    pub telephone: String,
    pub email: String,
    pub status: Status,
    pub role: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl From<&User> for NewUser {
    fn from(u: &User) -> Self {
        Self {
            firstname: u.firstname.clone(),
            name: u.name.clone(),
            telephone: u.telephone.clone(),
            email: u.email.clone(),
            status: u.status,
            role: u.role.clone(),
            position: u.position,
            published: u.published,
        }
    }
}

impl NewUser {
    /// The record the server would hold once it assigns `id`.
    pub fn into_user(self, id: UserId) -> User {
        User {
            id: Some(id),
            firstname: self.firstname,
            name: self.name,
            telephone: self.telephone,
            email: self.email,
            status: self.status,
            role: self.role,
            position: self.position,
            published: self.published,
        }
    }
}

/// Strip everything but ASCII digits (telephone input filter).
pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}
