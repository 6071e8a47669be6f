//! Role grant, admin option and revocation tests

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{SHORT_TTL, test_table};
    use crate::common::{TestEngine, assert_not_enough_privileges};
    use rbac_engine::RoleSet;
    use rbac_engine::core::models::{AccessType, GrantScope};
    use std::thread;

    #[test]
    fn test_create_role() {
        let engine = TestEngine::new();
        engine.create_users(&["A"]);
        engine.create_roles(&["R1"]);

        assert_not_enough_privileges(engine.select("A", &[]), "SELECT ON test.table");

        engine.grant(AccessType::Select, &test_table(), &["R1"]);
        assert_not_enough_privileges(engine.select("A", &[]), "SELECT ON test.table");

        engine.grant_roles(&["R1"], &["A"], false);
        assert!(engine.select("A", &[]).is_ok());

        engine
            .access
            .revoke_roles(&engine.admin, &RoleSet::list(["R1"]), &["A"], false)
            .unwrap();
        assert_not_enough_privileges(engine.select("A", &[]), "SELECT ON test.table");
    }

    #[test]
    fn test_grant_role_to_role() {
        let engine = TestEngine::new();
        engine.create_users(&["A"]);
        engine.create_roles(&["R1", "R2"]);

        engine.grant_roles(&["R1"], &["A"], false);
        engine.grant_roles(&["R2"], &["R1"], false);
        engine.grant(AccessType::Select, &test_table(), &["R2"]);

        assert!(engine.select("A", &[]).is_ok());
    }

    #[test]
    fn test_sub_role_change_reaches_ancestor_after_ttl() {
        let engine = TestEngine::with_short_ttl();
        engine.create_users(&["A"]);
        engine.create_roles(&["R1", "R2"]);
        engine.grant_roles(&["R1"], &["A"], false);
        engine.grant_roles(&["R2"], &["R1"], false);

        // R1 is now cached with an empty R2 underneath.
        assert!(engine.select("A", &[]).is_err());

        engine.grant(AccessType::Select, &test_table(), &["R2"]);
        assert!(engine.select("A", &[]).is_err());

        thread::sleep(SHORT_TTL + SHORT_TTL / 2);
        assert!(engine.select("A", &[]).is_ok());
    }

    #[test]
    fn test_combine_privileges() {
        let engine = TestEngine::new();
        engine.create_users(&["A"]);
        engine.create_roles(&["R1", "R2"]);

        engine.grant_roles(&["R1"], &["A"], false);
        engine.grant(
            AccessType::Select,
            &GrantScope::columns("test", "table", ["x"]),
            &["R1"],
        );
        assert_not_enough_privileges(engine.select("A", &[]), "SELECT ON test.table");
        assert!(engine.select("A", &["x"]).is_ok());
        assert_not_enough_privileges(engine.select("A", &["x", "y"]), "SELECT(x, y) ON test.table");

        engine.grant(
            AccessType::Select,
            &GrantScope::columns("test", "table", ["y"]),
            &["R2"],
        );
        engine.grant_roles(&["R2"], &["A"], false);
        assert!(engine.select("A", &["x", "y"]).is_ok());
    }

    #[test]
    fn test_admin_option() {
        let engine = TestEngine::new();
        engine.create_users(&["A", "B"]);
        engine.create_roles(&["R1"]);

        engine.grant(AccessType::Select, &test_table(), &["R1"]);
        assert!(engine.select("B", &[]).is_err());

        engine.grant_roles(&["R1"], &["A"], false);
        let a = engine.login("A");
        assert_not_enough_privileges(
            engine.access.grant_roles(&a, &["R1"], &["B"], false),
            "Role R1 is granted, but without ADMIN option",
        );
        assert!(engine.select("B", &[]).is_err());

        engine.grant_roles(&["R1"], &["A"], true);
        let a = engine.login("A");
        engine.access.grant_roles(&a, &["R1"], &["B"], false).unwrap();
        assert!(engine.select("B", &[]).is_ok());
    }

    #[test]
    fn test_revoke_requires_admin_option() {
        let engine = TestEngine::new();
        engine.create_users(&["A", "B"]);
        engine.create_roles(&["R1", "R2"]);
        let revoke = |roles: RoleSet| {
            let a = engine.login("A");
            engine.access.revoke_roles(&a, &roles, &["B"], false)
        };

        engine.grant_roles(&["R1"], &["B"], false);
        assert_eq!(engine.show_grants_for("B"), vec!["GRANT R1 TO B"]);

        assert_not_enough_privileges(
            revoke(RoleSet::list(["R1"])),
            "necessary to have the role R1 granted",
        );
        assert_eq!(engine.show_grants_for("B"), vec!["GRANT R1 TO B"]);

        engine.grant_roles(&["R1"], &["A"], false);
        assert_not_enough_privileges(
            revoke(RoleSet::list(["R1"])),
            "granted, but without ADMIN option",
        );
        assert_eq!(engine.show_grants_for("B"), vec!["GRANT R1 TO B"]);

        engine.grant_roles(&["R1"], &["A"], true);
        revoke(RoleSet::list(["R1"])).unwrap();
        assert!(engine.show_grants_for("B").is_empty());

        engine.grant_roles(&["R1"], &["B"], false);
        assert_eq!(engine.show_grants_for("B"), vec!["GRANT R1 TO B"]);
        revoke(RoleSet::All).unwrap();
        assert!(engine.show_grants_for("B").is_empty());

        engine.grant_roles(&["R1", "R2"], &["B"], false);
        assert_eq!(engine.show_grants_for("B"), vec!["GRANT R1, R2 TO B"]);
        assert_not_enough_privileges(
            revoke(RoleSet::All),
            "necessary to have the role R2 granted",
        );
        assert_eq!(engine.show_grants_for("B"), vec!["GRANT R1, R2 TO B"]);
        revoke(RoleSet::AllExcept(vec!["R2".to_string()])).unwrap();
        assert_eq!(engine.show_grants_for("B"), vec!["GRANT R2 TO B"]);
        engine.grant_roles(&["R2"], &["A"], true);
        revoke(RoleSet::All).unwrap();
        assert!(engine.show_grants_for("B").is_empty());

        engine.grant_roles(&["R1", "R2"], &["B"], false);
        assert_eq!(engine.show_grants_for("B"), vec!["GRANT R1, R2 TO B"]);
        revoke(RoleSet::All).unwrap();
        assert!(engine.show_grants_for("B").is_empty());
    }

    #[test]
    fn test_role_admin_privilege_administers_every_role() {
        let engine = TestEngine::new();
        engine.create_users(&["A", "B"]);
        engine.create_roles(&["R1"]);
        engine.grant(AccessType::RoleAdmin, &GrantScope::Global, &["A"]);

        let a = engine.login("A");
        engine.access.grant_roles(&a, &["R1"], &["B"], true).unwrap();
        assert_eq!(
            engine.show_grants_for("B"),
            vec!["GRANT R1 TO B WITH ADMIN OPTION"]
        );
    }

    #[test]
    fn test_cycles_are_refused() {
        let engine = TestEngine::new();
        engine.create_roles(&["R1", "R2", "R3"]);
        engine.grant_roles(&["R1"], &["R2"], false);
        engine.grant_roles(&["R2"], &["R3"], false);

        let err = engine
            .access
            .grant_roles(&engine.admin, &["R3"], &["R1"], false)
            .unwrap_err();
        assert!(err.to_string().contains("cycle"), "{}", err);
        assert!(engine.show_grants_for("R1").is_empty());
    }

    #[test]
    fn test_multi_grantee_cycle_grants_nothing() {
        let engine = TestEngine::new();
        engine.create_roles(&["R1", "R2", "R3"]);
        engine.grant_roles(&["R3"], &["R1"], false);

        let err = engine
            .access
            .grant_roles(&engine.admin, &["R1"], &["R2", "R3"], false)
            .unwrap_err();
        assert!(err.to_string().contains("cycle"), "{}", err);
        assert!(engine.show_grants_for("R2").is_empty());
        assert!(engine.show_grants_for("R3").is_empty());
    }

    #[test]
    fn test_user_and_role_with_the_same_name() {
        let engine = TestEngine::new();
        engine.create_users(&["A"]);
        engine.create_roles(&["A"]);

        // Grantee names resolve to the user first.
        engine.grant(AccessType::Select, &test_table(), &["A"]);
        assert!(engine.select("A", &[]).is_ok());

        engine.grant_roles(&["A"], &["A"], false);
        assert_eq!(
            engine.show_grants_for("A"),
            vec!["GRANT SELECT ON test.table TO A", "GRANT A TO A"]
        );
    }

    #[test]
    fn test_dropped_role_loses_its_grants() {
        let engine = TestEngine::new();
        engine.create_users(&["A"]);
        engine.create_roles(&["R1"]);
        engine.grant(AccessType::Select, &test_table(), &["R1"]);
        engine.grant_roles(&["R1"], &["A"], false);
        assert!(engine.select("A", &[]).is_ok());

        assert!(engine.access.drop_role(&engine.admin, "R1", false).unwrap());
        assert!(engine.select("A", &[]).is_err());
        assert!(engine.show_grants_for("A").is_empty());

        // A role of the same name is a new role.
        engine.create_roles(&["R1"]);
        assert!(engine.select("A", &[]).is_err());
        assert!(!engine.access.drop_role(&engine.admin, "R2", true).unwrap());
    }
}
