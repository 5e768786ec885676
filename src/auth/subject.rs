//! Subject issuance: the handoff point between authentication and whatever
//! session or token layer sits downstream.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::types::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    User,
}

/// Identity assertion returned after a successful register or login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Subject {
    kind: SubjectKind,
    #[schema(value_type = String, format = Uuid)]
    id: UserId,
}

impl Subject {
    #[must_use]
    pub const fn user(id: UserId) -> Self {
        Self {
            kind: SubjectKind::User,
            id,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> SubjectKind {
        self.kind
    }

    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }
}

pub trait SubjectIssuer: Send + Sync {
    fn issue(&self, id: UserId) -> Subject;
}

/// Maps a verified user id straight to a `user` subject.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserSubjectIssuer;

impl SubjectIssuer for UserSubjectIssuer {
    fn issue(&self, id: UserId) -> Subject {
        Subject::user(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use uuid::Uuid;

    #[test]
    fn issues_user_subject() {
        let id = UserId::new();
        let subject = UserSubjectIssuer.issue(id);
        assert_eq!(subject.kind(), SubjectKind::User);
        assert_eq!(subject.id(), id);
    }

    #[test]
    fn subject_json_shape() -> Result<()> {
        let subject = Subject::user(UserId::from(Uuid::nil()));
        let value = serde_json::to_value(subject)?;
        assert_eq!(
            value,
            serde_json::json!({
                "kind": "user",
                "id": "00000000-0000-0000-0000-000000000000"
            })
        );
        let decoded: Subject = serde_json::from_value(value)?;
        assert_eq!(decoded, subject);
        Ok(())
    }
}
