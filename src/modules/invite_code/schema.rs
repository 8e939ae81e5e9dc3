use serde::{Deserialize, Serialize};

use crate::modules::user::schema::UserEntity;

/// Lifecycle of an invite code, carried as a small integer on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum InviteCodeStatus {
    Unused,
    Used,
    Expired,
}

impl TryFrom<u8> for InviteCodeStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(InviteCodeStatus::Unused),
            1 => Ok(InviteCodeStatus::Used),
            2 => Ok(InviteCodeStatus::Expired),
            other => Err(format!("unknown invite code status {other}")),
        }
    }
}

impl From<InviteCodeStatus> for u8 {
    fn from(status: InviteCodeStatus) -> Self {
        match status {
            InviteCodeStatus::Unused => 0,
            InviteCodeStatus::Used => 1,
            InviteCodeStatus::Expired => 2,
        }
    }
}

impl std::fmt::Display for InviteCodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            InviteCodeStatus::Unused => "unused",
            InviteCodeStatus::Used => "used",
            InviteCodeStatus::Expired => "expired",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InviteCodeEntity {
    pub id: u64,
    pub code: String,
    pub status: InviteCodeStatus,
    #[serde(default)]
    pub created_by: u64,
    #[serde(default)]
    pub used_by: Option<u64>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub used_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub creator: Option<UserEntity>,
    #[serde(default)]
    pub user: Option<UserEntity>,
}

impl InviteCodeEntity {
    pub fn is_available(&self) -> bool {
        self.status == InviteCodeStatus::Unused
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteCodeStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub unused: u64,
    #[serde(default)]
    pub used: u64,
    #[serde(default)]
    pub expired: u64,
}

impl InviteCodeStats {
    /// Counts the codes of one listing, for servers without a stats endpoint.
    pub fn tally<'a>(codes: impl IntoIterator<Item = &'a InviteCodeEntity>) -> Self {
        codes.into_iter().fold(InviteCodeStats::default(), |mut stats, code| {
            stats.total += 1;
            match code.status {
                InviteCodeStatus::Unused => stats.unused += 1,
                InviteCodeStatus::Used => stats.used += 1,
                InviteCodeStatus::Expired => stats.expired += 1,
            }
            stats
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_integers() {
        for (raw, status) in [
            (0, InviteCodeStatus::Unused),
            (1, InviteCodeStatus::Used),
            (2, InviteCodeStatus::Expired),
        ] {
            assert_eq!(serde_json::from_value::<InviteCodeStatus>(json!(raw)).unwrap(), status);
            assert_eq!(serde_json::to_value(status).unwrap(), json!(raw));
        }
        assert!(serde_json::from_value::<InviteCodeStatus>(json!(3)).is_err());
        assert!(serde_json::from_value::<InviteCodeStatus>(json!("used")).is_err());
    }

    #[test]
    fn test_invite_code_decodes_backend_row() {
        let code: InviteCodeEntity = serde_json::from_value(json!({
            "id": 3,
            "code": "K9X2-PLQ7",
            "created_by": 1,
            "used_by": null,
            "created_at": "2025-03-01T08:00:00Z",
            "used_at": null,
            "status": 0,
        }))
        .unwrap();
        assert!(code.is_available());
        assert_eq!(code.used_by, None);
        assert!(code.created_at.is_some());
    }

    #[test]
    fn test_tally() {
        let codes: Vec<InviteCodeEntity> = [0, 1, 1, 2]
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let raw = json!({"id": i, "code": format!("c{i}"), "status": s});
                serde_json::from_value(raw).unwrap()
            })
            .collect();
        assert_eq!(
            InviteCodeStats::tally(&codes),
            InviteCodeStats { total: 4, unused: 1, used: 2, expired: 1 }
        );
    }
}
