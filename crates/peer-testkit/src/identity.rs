//! A small membership model: MSP-qualified ed25519 keys with member/admin roles

use peer_acl::{
    AclError, AclResult, Identity, IdentityError, MembershipManager, Principal,
    PrincipalClassification,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Wire form of an identity: MSP name plus raw public key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedIdentity {
    /// Owning MSP
    pub msp_id: String,
    /// ed25519 public key bytes
    pub id_bytes: Vec<u8>,
}

impl SerializedIdentity {
    /// bincode encoding
    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("identity serialization cannot fail")
    }

    /// Decode bincode bytes
    pub fn from_bytes(raw: &[u8]) -> Result<Self, IdentityError> {
        bincode::deserialize(raw).map_err(|e| IdentityError::Decode(e.to_string()))
    }
}

/// Role of an identity within its MSP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MspRole {
    /// Any member
    Member,
    /// Administrator; also counts as a member
    Admin,
}

/// Role principal: "any `role` of `msp_id`"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePrincipal {
    /// Required MSP
    pub msp_id: String,
    /// Required role
    pub role: MspRole,
}

impl RolePrincipal {
    /// Principal for any member of `msp_id`
    pub fn member(msp_id: &str) -> Principal {
        Self::principal(msp_id, MspRole::Member)
    }

    /// Principal for admins of `msp_id`
    pub fn admin(msp_id: &str) -> Principal {
        Self::principal(msp_id, MspRole::Admin)
    }

    fn principal(msp_id: &str, role: MspRole) -> Principal {
        let encoded = bincode::serialize(&RolePrincipal {
            msp_id: msp_id.to_string(),
            role,
        })
        .expect("principal serialization cannot fail");
        Principal::new(PrincipalClassification::Role, encoded)
    }
}

/// Identity produced by [`TestMembershipManager`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestIdentity {
    /// Decoded wire form
    pub serialized: SerializedIdentity,
    /// Role held in its MSP
    pub role: MspRole,
}

impl Identity for TestIdentity {
    fn satisfies_principal(&self, principal: &Principal) -> AclResult {
        match principal.classification {
            PrincipalClassification::Role => {
                let wanted: RolePrincipal =
                    bincode::deserialize(&principal.principal).map_err(|e| {
                        AclError::principal_not_satisfied(format!("bad role principal: {e}"))
                    })?;
                if wanted.msp_id != self.serialized.msp_id {
                    return Err(AclError::principal_not_satisfied(format!(
                        "identity belongs to {}, not {}",
                        self.serialized.msp_id, wanted.msp_id
                    )));
                }
                match (wanted.role, self.role) {
                    (MspRole::Member, _) | (MspRole::Admin, MspRole::Admin) => Ok(()),
                    (MspRole::Admin, MspRole::Member) => Err(AclError::principal_not_satisfied(
                        format!("identity is not an admin of {}", wanted.msp_id),
                    )),
                }
            }
            PrincipalClassification::Identity => {
                if principal.principal == self.serialized.to_bytes() {
                    Ok(())
                } else {
                    Err(AclError::principal_not_satisfied("identity mismatch"))
                }
            }
            other => Err(AclError::principal_not_satisfied(format!(
                "unsupported principal classification {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct MspInfo {
    admins: HashSet<Vec<u8>>,
}

/// Membership manager over a fixed set of MSPs
#[derive(Debug, Clone, Default)]
pub struct TestMembershipManager {
    msps: HashMap<String, MspInfo>,
}

impl TestMembershipManager {
    /// Manager that knows no MSPs
    pub fn new() -> Self {
        Self::default()
    }

    /// Trust `msp_id`
    pub fn with_msp(mut self, msp_id: &str) -> Self {
        self.msps.entry(msp_id.to_string()).or_default();
        self
    }

    /// Mark the key in `identity` as an admin of its MSP
    pub fn with_admin(mut self, identity: &SerializedIdentity) -> Self {
        self.msps
            .entry(identity.msp_id.clone())
            .or_default()
            .admins
            .insert(identity.id_bytes.clone());
        self
    }
}

impl MembershipManager for TestMembershipManager {
    fn deserialize_identity(&self, raw: &[u8]) -> Result<Box<dyn Identity>, IdentityError> {
        let serialized = SerializedIdentity::from_bytes(raw)?;
        let msp = self
            .msps
            .get(&serialized.msp_id)
            .ok_or_else(|| IdentityError::UnknownMsp(serialized.msp_id.clone()))?;
        if serialized.id_bytes.len() != 32 {
            return Err(IdentityError::Invalid(format!(
                "expected 32 key bytes, got {}",
                serialized.id_bytes.len()
            )));
        }

        let role = if msp.admins.contains(&serialized.id_bytes) {
            MspRole::Admin
        } else {
            MspRole::Member
        };
        Ok(Box::new(TestIdentity { serialized, role }))
    }
}
