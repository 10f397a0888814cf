//! Principal satisfaction through a channel's membership manager

use assert_matches::assert_matches;
use peer_acl::{
    AccessControl, AccessControlSupport, AclError, Identity, IdentityError, MembershipManager,
    Principal, PrincipalClassification,
};
use peer_testkit::*;
use proptest::prelude::*;
use std::sync::Arc;

fn support(store: Arc<ChannelConfigStore>) -> AccessControlSupport {
    AccessControlSupport::new(
        Arc::new(ScriptedVerifier::accept_all()),
        Arc::new(RecordingEvaluator::accept_all()),
        store,
    )
}

fn org1_channel(admin: Option<&TestSigner>) -> Arc<ChannelConfigStore> {
    let mut msp = TestMembershipManager::new().with_msp("Org1MSP");
    if let Some(admin) = admin {
        msp = msp.with_admin(&admin.identity());
    }
    let store = Arc::new(ChannelConfigStore::new());
    store.set_channel("mychannel", TestChannelResources::new(1).with_msp(msp));
    store
}

proptest! {
    #[test]
    fn unknown_channel_fails_for_any_input(
        raw in proptest::collection::vec(any::<u8>(), 0..64),
        principal_bytes in proptest::collection::vec(any::<u8>(), 0..32),
    ) {
        let support = support(org1_channel(None));
        let principal = Principal::new(PrincipalClassification::Role, principal_bytes);

        let result = support.satisfies_principal(&channel("elsewhere"), &raw, &principal);

        prop_assert!(
            matches!(
                &result,
                Err(AclError::ChannelNotFound { operation: "satisfies_principal", channel })
                    if channel.as_str() == "elsewhere"
            ),
            "unexpected result {:?}",
            result
        );
    }
}

#[test]
fn test_unknown_channel_message() {
    let err = support(Arc::new(ChannelConfigStore::new()))
        .satisfies_principal(&channel("ghost"), b"raw", &RolePrincipal::member("Org1MSP"))
        .unwrap_err();
    assert!(err.to_string().contains("channel ghost doesn't exist"));
}

#[test]
fn test_missing_membership_manager() {
    let store = Arc::new(ChannelConfigStore::new());
    store.set_channel("mychannel", TestChannelResources::new(1));
    let signer = TestSigner::from_seed(1, "Org1MSP");

    let err = support(store)
        .satisfies_principal(
            &channel("mychannel"),
            &signer.identity_bytes(),
            &RolePrincipal::member("Org1MSP"),
        )
        .unwrap_err();
    assert_matches!(err, AclError::MembershipManagerMissing { .. });
    assert!(err.to_string().contains("could not find MSP manager for channel mychannel"));
}

#[test]
fn test_garbage_identity_is_malformed() {
    let result = support(org1_channel(None)).satisfies_principal(
        &channel("mychannel"),
        &[0xff, 0x01],
        &RolePrincipal::member("Org1MSP"),
    );
    assert_matches!(
        result,
        Err(AclError::MalformedIdentity { source: IdentityError::Decode(_), .. })
    );
}

#[test]
fn test_unknown_msp_is_malformed_with_cause() {
    let stranger = TestSigner::from_seed(4, "Org9MSP");
    let err = support(org1_channel(None))
        .satisfies_principal(
            &channel("mychannel"),
            &stranger.identity_bytes(),
            &RolePrincipal::member("Org9MSP"),
        )
        .unwrap_err();

    assert_matches!(
        &err,
        AclError::MalformedIdentity { source: IdentityError::UnknownMsp(msp), .. } if msp == "Org9MSP"
    );
    assert!(err.to_string().contains("failed deserializing identity"));
}

#[test]
fn test_member_satisfies_member_principal() {
    let member = TestSigner::from_seed(1, "Org1MSP");
    let result = support(org1_channel(None)).satisfies_principal(
        &channel("mychannel"),
        &member.identity_bytes(),
        &RolePrincipal::member("Org1MSP"),
    );
    assert_eq!(result, Ok(()));
}

#[test]
fn test_identity_verdict_is_returned_unchanged() {
    let admin = TestSigner::from_seed(1, "Org1MSP");
    let member = TestSigner::from_seed(2, "Org1MSP");
    let store = org1_channel(Some(&admin));
    let support = support(store);
    let principals = [
        RolePrincipal::member("Org1MSP"),
        RolePrincipal::admin("Org1MSP"),
        RolePrincipal::member("Org2MSP"),
        Principal::new(PrincipalClassification::Identity, admin.identity_bytes()),
        Principal::new(PrincipalClassification::OrganizationUnit, b"ou".to_vec()),
    ];

    let msp = TestMembershipManager::new()
        .with_msp("Org1MSP")
        .with_admin(&admin.identity());
    for signer in [&admin, &member] {
        let identity = msp.deserialize_identity(&signer.identity_bytes()).unwrap();
        for principal in &principals {
            let expected = identity.satisfies_principal(principal);
            let actual = support.satisfies_principal(
                &channel("mychannel"),
                &signer.identity_bytes(),
                principal,
            );
            assert_eq!(actual, expected);
        }
    }
}

#[test]
fn test_non_admin_fails_admin_principal() {
    let member = TestSigner::from_seed(2, "Org1MSP");
    let result = support(org1_channel(None)).satisfies_principal(
        &channel("mychannel"),
        &member.identity_bytes(),
        &RolePrincipal::admin("Org1MSP"),
    );
    assert_matches!(result, Err(AclError::PrincipalNotSatisfied { .. }));
}

#[test]
fn test_membership_changes_are_seen_immediately() {
    let signer = TestSigner::from_seed(5, "Org2MSP");
    let store = Arc::new(ChannelConfigStore::new());
    store.set_channel(
        "mychannel",
        TestChannelResources::new(1).with_msp(TestMembershipManager::new().with_msp("Org1MSP")),
    );
    let support = support(store.clone());
    let principal = RolePrincipal::member("Org2MSP");

    assert!(support
        .satisfies_principal(&channel("mychannel"), &signer.identity_bytes(), &principal)
        .is_err());

    store.set_channel(
        "mychannel",
        TestChannelResources::new(2).with_msp(
            TestMembershipManager::new()
                .with_msp("Org1MSP")
                .with_msp("Org2MSP"),
        ),
    );
    assert_eq!(
        support.satisfies_principal(&channel("mychannel"), &signer.identity_bytes(), &principal),
        Ok(())
    );
}
