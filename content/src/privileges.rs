//! Standard privilege catalogue
//!
//! Mirrors the JCR privilege hierarchy: `jcr:write` aggregates the four
//! node-modification privileges and `jcr:all` aggregates everything.

use authz::privilege::names;
use authz::Privilege;

/// The standard simple and aggregate privileges, constituents before aggregates
pub fn standard_privileges() -> Vec<Privilege> {
    let read = Privilege::new(names::READ);
    let write = Privilege::aggregate(
        names::WRITE,
        vec![
            Privilege::new(names::MODIFY_PROPERTIES),
            Privilege::new(names::ADD_CHILD_NODES),
            Privilege::new(names::REMOVE_NODE),
            Privilege::new(names::REMOVE_CHILD_NODES),
        ],
    );
    let management = [
        names::READ_ACCESS_CONTROL,
        names::MODIFY_ACCESS_CONTROL,
        names::LOCK_MANAGEMENT,
        names::VERSION_MANAGEMENT,
        names::NODE_TYPE_MANAGEMENT,
        names::RETENTION_MANAGEMENT,
        names::LIFECYCLE_MANAGEMENT,
    ]
    .into_iter()
    .map(Privilege::new)
    .collect::<Vec<_>>();

    let mut all_constituents = vec![read.clone(), write.clone()];
    all_constituents.extend(management.iter().cloned());
    let all = Privilege::aggregate(names::ALL, all_constituents);

    let mut privileges = vec![read];
    privileges.extend(write.aggregate_privileges().iter().cloned());
    privileges.push(write);
    privileges.extend(management);
    privileges.push(all);
    privileges
}
