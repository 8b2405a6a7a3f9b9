mod common;

use authz::privilege::names;
use authz::{
    AccessControlEntry, AccessControlList, AccessControlManager, AclOperation, AuthzEngine,
    AuthzError, AuthzSettings, Principal, Privilege, RepositoryError,
};
use common::{chain, entries, entry, RecordingRepository};
use content::{GroupPrincipal, UsernamePrincipal};

const NONE: &[&str] = &[];

#[test]
fn test_grant_seeds_admin_then_adds_entry() {
    let repository = chain();
    let engine = AuthzEngine::new(&repository);

    assert!(engine.grant_named("/a", "user1", &[names::READ]).unwrap());
    assert_eq!(
        entries(&repository, "/a"),
        vec![entry("admin", &[names::ALL]), entry("user1", &[names::READ])]
    );
}

#[test]
fn test_grant_is_idempotent() {
    let repository = chain();
    let engine = AuthzEngine::new(&repository);

    assert!(engine.grant_named("/a", "user1", &[names::READ, names::WRITE]).unwrap());
    assert!(!engine.grant_named("/a", "user1", &[names::READ, names::WRITE]).unwrap());
    assert!(!engine.grant_named("/a", "user1", &[names::WRITE]).unwrap());
    assert_eq!(
        entries(&repository, "/a"),
        vec![
            entry("admin", &[names::ALL]),
            entry("user1", &[names::READ, names::WRITE])
        ]
    );
}

#[test]
fn test_grant_unions_with_existing_privileges() {
    let repository = chain();
    let engine = AuthzEngine::new(&repository);

    engine.grant_named("/a", "user1", &[names::READ]).unwrap();
    assert!(engine.grant_named("/a", "user1", &[names::READ, names::WRITE]).unwrap());
    assert_eq!(
        entries(&repository, "/a")[1],
        entry("user1", &[names::READ, names::WRITE])
    );
}

#[test]
fn test_grant_with_no_privileges_is_a_no_op() {
    let repository = RecordingRepository::new(chain());
    let engine = AuthzEngine::new(&repository);

    assert!(!engine.grant_named("/a", "user1", NONE).unwrap());
    assert!(!engine.grant("/a", "user1", &[]).unwrap());
    assert!(repository.writes().is_empty());
    assert!(repository.inner.policy("/a").unwrap().is_none());
}

#[test]
fn test_grant_reports_change_when_only_admin_is_seeded() {
    let repository = chain();
    let engine = AuthzEngine::new(&repository);

    assert!(engine.grant_named("/a", "admin", &[names::ALL]).unwrap());
    assert_eq!(entries(&repository, "/a"), vec![entry("admin", &[names::ALL])]);
    assert!(!engine.grant_named("/a", "admin", &[names::ALL]).unwrap());
}

#[test]
fn test_grant_normalizes_principal_representations() {
    let repository = chain();
    let engine = AuthzEngine::new(&repository);

    engine
        .grant_named("/a", &UsernamePrincipal::new("analysts"), &[names::READ])
        .unwrap();
    engine
        .grant_named("/a", &GroupPrincipal::new("analysts"), &[names::WRITE])
        .unwrap();
    assert!(!engine
        .grant_named("/a", &Principal::new("analysts"), &[names::READ])
        .unwrap());

    assert_eq!(
        entries(&repository, "/a"),
        vec![
            entry("admin", &[names::ALL]),
            entry("analysts", &[names::READ, names::WRITE])
        ]
    );
}

#[test]
fn test_grant_uses_configured_admin() {
    let repository = chain();
    let settings = AuthzSettings {
        admin_principal: "dladmin".to_string(),
        ..AuthzSettings::default()
    };
    let engine = AuthzEngine::with_settings(&repository, settings);

    engine.grant_named("/a", "user1", &[names::READ]).unwrap();
    assert_eq!(entries(&repository, "/a")[0], entry("dladmin", &[names::ALL]));
}

#[test]
fn test_grant_with_unknown_privilege_fails_without_mutation() {
    let repository = chain();
    let engine = AuthzEngine::new(&repository);

    let err = engine
        .grant_named("/a", "user1", &[names::READ, "tba:bogus"])
        .unwrap_err();
    assert!(matches!(err, AuthzError::UnknownPrivilege(name) if name == "tba:bogus"));
    assert!(repository.policy("/a").unwrap().is_none());
}

#[test]
fn test_grant_with_unknown_admin_privilege_fails() {
    let repository = chain();
    let settings = AuthzSettings {
        all_privilege: "tba:everything".to_string(),
        ..AuthzSettings::default()
    };
    let engine = AuthzEngine::with_settings(&repository, settings);

    let err = engine.grant_named("/a", "user1", &[names::READ]).unwrap_err();
    assert!(matches!(err, AuthzError::UnknownPrivilege(name) if name == "tba:everything"));
}

#[test]
fn test_grant_without_policy_candidate_is_a_repository_error() {
    let repository = RecordingRepository::new(chain()).without_policies();
    let engine = AuthzEngine::new(&repository);

    match engine.grant_named("/a", "user1", &[names::READ]).unwrap_err() {
        AuthzError::RepositoryAccess {
            path,
            operation,
            privileges,
            source,
        } => {
            assert_eq!(path.as_deref(), Some("/a"));
            assert_eq!(operation, AclOperation::Grant);
            assert_eq!(privileges, vec![names::READ.to_string()]);
            assert!(matches!(source, RepositoryError::NoPolicyCandidate(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_grant_on_missing_node_is_a_repository_error() {
    let repository = chain();
    let engine = AuthzEngine::new(&repository);

    let err = engine.grant_named("/nope", "user1", &[names::READ]).unwrap_err();
    assert!(matches!(
        err,
        AuthzError::RepositoryAccess {
            source: RepositoryError::NodeNotFound(_),
            ..
        }
    ));
}

#[test]
fn test_revoke_removes_only_requested_privileges() {
    let repository = chain();
    let engine = AuthzEngine::new(&repository);

    engine
        .grant_named("/a", "user1", &[names::READ, names::WRITE])
        .unwrap();
    assert!(engine.revoke_named("/a", "user1", &[names::READ]).unwrap());
    assert_eq!(
        entries(&repository, "/a"),
        vec![entry("admin", &[names::ALL]), entry("user1", &[names::WRITE])]
    );
}

#[test]
fn test_revoke_of_full_set_removes_entry() {
    let repository = chain();
    let engine = AuthzEngine::new(&repository);

    engine
        .grant_named("/a", "user1", &[names::READ, names::WRITE])
        .unwrap();
    assert!(engine
        .revoke_named("/a", "user1", &[names::WRITE, names::READ])
        .unwrap());
    assert_eq!(entries(&repository, "/a"), vec![entry("admin", &[names::ALL])]);
}

#[test]
fn test_revoke_does_not_decompose_aggregates() {
    let repository = chain();
    let engine = AuthzEngine::new(&repository);

    engine.grant_named("/a", "user1", &[names::WRITE]).unwrap();
    assert!(!engine
        .revoke_named("/a", "user1", &[names::ADD_CHILD_NODES])
        .unwrap());
    assert_eq!(entries(&repository, "/a")[1], entry("user1", &[names::WRITE]));
}

#[test]
fn test_revoke_without_policy_returns_false() {
    let repository = RecordingRepository::new(chain());
    let engine = AuthzEngine::new(&repository);

    assert!(!engine.revoke_named("/a", "user1", &[names::READ]).unwrap());
    assert!(repository.writes().is_empty());
}

#[test]
fn test_revoke_for_absent_principal_does_not_write() {
    let repository = RecordingRepository::new(chain());
    let engine = AuthzEngine::new(&repository);

    engine.grant_named("/a", "user1", &[names::READ]).unwrap();
    assert!(!engine.revoke_named("/a", "user2", &[names::READ]).unwrap());
    assert!(!engine.revoke_named("/a", "user1", &[names::WRITE]).unwrap());
    assert_eq!(repository.writes(), vec!["/a".to_string()]);
}

#[test]
fn test_revoke_with_no_privileges_is_a_no_op() {
    let repository = chain();
    let engine = AuthzEngine::new(&repository);

    engine.grant_named("/a", "user1", &[names::READ]).unwrap();
    assert!(!engine.revoke_named("/a", "user1", NONE).unwrap());
    assert!(!engine.revoke("/a", "user1", &[]).unwrap());
    assert_eq!(entries(&repository, "/a")[1], entry("user1", &[names::READ]));
}

#[test]
fn test_revoke_collapses_duplicate_entries() {
    let repository = chain();
    let read = Privilege::new(names::READ);
    let write = Privilege::new(names::WRITE);
    let legacy = AccessControlList::from_entries(vec![
        AccessControlEntry::new(Principal::new("user1"), vec![read.clone(), write.clone()]),
        AccessControlEntry::new(Principal::new("user1"), vec![read.clone()]),
    ]);
    repository.set_policy("/a", &legacy).unwrap();

    let engine = AuthzEngine::new(&repository);
    assert!(engine
        .revoke_named("/a", &UsernamePrincipal::new("user1"), &[names::READ])
        .unwrap());
    assert_eq!(entries(&repository, "/a"), vec![entry("user1", &[names::WRITE])]);
}

#[test]
fn test_clear_reports_whether_a_policy_existed() {
    let repository = chain();
    let engine = AuthzEngine::new(&repository);

    assert!(!engine.clear("/a").unwrap());

    engine.grant_named("/a", "user1", &[names::READ]).unwrap();
    assert!(engine.clear("/a").unwrap());
    assert!(repository.policy("/a").unwrap().is_none());
    assert!(!engine.clear("/a").unwrap());
}

#[test]
fn test_clear_then_grant_reseeds_admin() {
    let repository = chain();
    let engine = AuthzEngine::new(&repository);

    engine.grant_named("/a", "user1", &[names::READ]).unwrap();
    engine.clear("/a").unwrap();
    assert!(engine.grant_named("/a", "user1", &[names::READ]).unwrap());
    assert_eq!(
        entries(&repository, "/a"),
        vec![entry("admin", &[names::ALL]), entry("user1", &[names::READ])]
    );
}

#[test]
fn test_repository_write_failure_is_wrapped() {
    let repository = RecordingRepository::new(chain()).failing_on("/a");
    let engine = AuthzEngine::new(&repository);

    let err = engine.grant_named("/a", "user1", &[names::READ]).unwrap_err();
    assert!(err.to_string().starts_with("Failed to grant privilege(s)"));
    assert!(matches!(
        err,
        AuthzError::RepositoryAccess {
            source: RepositoryError::Storage(_),
            ..
        }
    ));
}

#[test]
fn test_consistency_is_not_enforced_by_default() {
    let repository = chain();
    let frozen = AccessControlList::from_entries(vec![AccessControlEntry::new(
        Principal::new("user1"),
        vec![Privilege::new(names::READ)],
    )]);
    repository.set_policy("/a", &frozen).unwrap();

    let engine = AuthzEngine::new(&repository);
    assert!(engine.grant_named("/a", "user2", &[names::READ]).unwrap());
    assert!(engine
        .validate_not_frozen(&repository.policy("/a").unwrap().unwrap())
        .is_err());
}

#[test]
fn test_enforced_consistency_rejects_frozen_grant() {
    let repository = chain();
    let frozen = AccessControlList::from_entries(vec![AccessControlEntry::new(
        Principal::new("user1"),
        vec![Privilege::new(names::READ)],
    )]);
    repository.set_policy("/a", &frozen).unwrap();

    let settings = AuthzSettings {
        enforce_consistency: true,
        ..AuthzSettings::default()
    };
    let engine = AuthzEngine::with_settings(&repository, settings);

    let err = engine.grant_named("/a", "user2", &[names::READ]).unwrap_err();
    assert!(matches!(err, AuthzError::FrozenAcl { .. }));
    assert_eq!(repository.policy("/a").unwrap().unwrap(), frozen);
}

#[test]
fn test_enforced_consistency_accepts_seeded_acl() {
    let repository = chain();
    let settings = AuthzSettings {
        enforce_consistency: true,
        ..AuthzSettings::default()
    };
    let engine = AuthzEngine::with_settings(&repository, settings);

    assert!(engine.grant_named("/a", "user1", &[names::READ]).unwrap());
}

#[test]
fn test_enforced_consistency_rejects_revoking_last_administrator() {
    let repository = chain();
    let settings = AuthzSettings {
        enforce_consistency: true,
        ..AuthzSettings::default()
    };
    let engine = AuthzEngine::with_settings(&repository, settings);

    engine.grant_named("/a", "user1", &[names::READ]).unwrap();
    let err = engine.revoke_named("/a", "admin", &[names::ALL]).unwrap_err();
    assert!(matches!(err, AuthzError::FrozenAcl { principals } if principals == vec!["user1"]));
    assert_eq!(entries(&repository, "/a")[0], entry("admin", &[names::ALL]));
}
