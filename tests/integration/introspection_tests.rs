//! SHOW statements, system tables and storage reporting

#[cfg(test)]
mod tests {
    use crate::common::{TestEngine, assert_not_enough_privileges};
    use rbac_engine::core::introspection::{GrantRow, RoleGrantRow};
    use rbac_engine::core::models::{AccessType, GrantScope};
    use rbac_engine::core::session::{CurrentRoleRow, EnabledRoleRow};
    use tempfile::TempDir;

    /// Users A, B and roles R1, R2 with a mix of grants and one partial revoke
    fn populate(engine: &TestEngine) {
        engine.create_users(&["A", "B"]);
        engine.create_roles(&["R1", "R2"]);
        engine.grant_roles(&["R1"], &["A"], false);
        engine.grant_roles(&["R2"], &["B"], true);
        engine.grant(
            AccessType::Select,
            &GrantScope::table("test", "table"),
            &["A", "R2"],
        );
        engine
            .access
            .grant_privileges(&engine.admin, &[AccessType::Create], &GrantScope::Global, &["B"], true)
            .unwrap();
        engine
            .access
            .revoke_privileges(
                &engine.admin,
                &[AccessType::Select],
                &GrantScope::columns("test", "table", ["x"]),
                &["R2"],
            )
            .unwrap();
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_show_statements() {
        let engine = TestEngine::new();
        populate(&engine);
        let access = &engine.access;
        let admin = &engine.admin;

        assert_eq!(access.show_roles(admin).unwrap(), names(&["R1", "R2"]));
        assert_eq!(
            access.show_create_role(admin, Some(names(&["R1"]).as_slice())).unwrap(),
            vec!["CREATE ROLE R1"]
        );
        assert_eq!(
            access.show_create_role(admin, Some(names(&["R1", "R2"]).as_slice())).unwrap(),
            vec!["CREATE ROLE R1", "CREATE ROLE R2"]
        );
        assert_eq!(
            access.show_create_role(admin, None).unwrap(),
            vec!["CREATE ROLE R1", "CREATE ROLE R2"]
        );

        assert_eq!(
            engine.show_grants_for("A"),
            vec!["GRANT SELECT ON test.table TO A", "GRANT R1 TO A"]
        );
        assert_eq!(
            engine.show_grants_for("B"),
            vec![
                "GRANT CREATE ON *.* TO B WITH GRANT OPTION",
                "GRANT R2 TO B WITH ADMIN OPTION",
            ]
        );
        assert!(engine.show_grants_for("R1").is_empty());
        assert_eq!(
            engine.show_grants_for("R2"),
            vec![
                "GRANT SELECT ON test.table TO R2",
                "REVOKE SELECT(x) ON test.table FROM R2",
            ]
        );
    }

    #[test]
    fn test_own_view() {
        let engine = TestEngine::new();
        populate(&engine);
        let access = &engine.access;
        let a = engine.login("A");
        let b = engine.login("B");

        assert_eq!(
            access.show_grants(&a, None).unwrap(),
            vec!["GRANT SELECT ON test.table TO A", "GRANT R1 TO A"]
        );
        assert!(access.show_grants(&a, Some("R1")).unwrap().is_empty());
        assert_not_enough_privileges(access.show_grants(&a, Some("R2")), "SHOW ROLES");
        assert_eq!(
            access.show_grants(&b, None).unwrap(),
            vec![
                "GRANT CREATE ON *.* TO B WITH GRANT OPTION",
                "GRANT R2 TO B WITH ADMIN OPTION",
            ]
        );

        let current = |role_name: &str, with_admin_option| CurrentRoleRow {
            role_name: role_name.to_string(),
            with_admin_option,
            is_default: true,
        };
        let enabled = |role_name: &str, with_admin_option| EnabledRoleRow {
            role_name: role_name.to_string(),
            with_admin_option,
            is_current: true,
            is_default: true,
        };
        assert_eq!(access.show_current_roles(&a).unwrap(), vec![current("R1", false)]);
        assert_eq!(access.show_current_roles(&b).unwrap(), vec![current("R2", true)]);
        assert_eq!(access.show_enabled_roles(&a).unwrap(), vec![enabled("R1", false)]);
        assert_eq!(access.show_enabled_roles(&b).unwrap(), vec![enabled("R2", true)]);
        assert_eq!(access.system_current_roles(&b).unwrap(), vec![current("R2", true)]);
        assert_eq!(access.system_enabled_roles(&a).unwrap(), vec![enabled("R1", false)]);
    }

    #[test]
    fn test_show_access() {
        let engine = TestEngine::new();
        populate(&engine);

        let statements = engine.access.show_access(&engine.admin).unwrap().join("\n");
        assert!(statements.contains("CREATE ROLE R1\nCREATE ROLE R2\n"), "{}", statements);
        assert!(statements.contains("GRANT R1 TO A\n"), "{}", statements);
        assert!(statements.contains("GRANT R2 TO B WITH ADMIN OPTION"), "{}", statements);

        let a = engine.login("A");
        assert_not_enough_privileges(engine.access.show_access(&a), "SHOW USERS");
    }

    #[test]
    fn test_system_grants() {
        let engine = TestEngine::new();
        populate(&engine);

        let row = |user: Option<&str>,
                   role: Option<&str>,
                   access_type: &str,
                   target: Option<(&str, &str)>,
                   column: Option<&str>,
                   is_partial_revoke: bool,
                   grant_option: bool| GrantRow {
            user_name: user.map(str::to_string),
            role_name: role.map(str::to_string),
            access_type: access_type.to_string(),
            database: target.map(|(database, _)| database.to_string()),
            table: target.map(|(_, table)| table.to_string()),
            column: column.map(str::to_string),
            is_partial_revoke,
            grant_option,
        };

        let mut rows: Vec<GrantRow> = engine
            .access
            .system_grants(&engine.admin)
            .unwrap()
            .into_iter()
            .filter(|row| {
                matches!(row.user_name.as_deref(), Some("A") | Some("B"))
                    || matches!(row.role_name.as_deref(), Some("R1") | Some("R2"))
            })
            .collect();
        rows.sort_by(|a, b| {
            (&a.user_name, &a.role_name, &a.column).cmp(&(&b.user_name, &b.role_name, &b.column))
        });

        let table = Some(("test", "table"));
        assert_eq!(
            rows,
            vec![
                row(None, Some("R2"), "SELECT", table, None, false, false),
                row(None, Some("R2"), "SELECT", table, Some("x"), true, false),
                row(Some("A"), None, "SELECT", table, None, false, false),
                row(Some("B"), None, "CREATE", None, None, false, true),
            ]
        );
    }

    #[test]
    fn test_system_role_grants() {
        let engine = TestEngine::new();
        populate(&engine);

        let rows = engine.access.system_role_grants(&engine.admin).unwrap();
        assert_eq!(
            rows,
            vec![
                RoleGrantRow {
                    user_name: Some("A".to_string()),
                    role_name: None,
                    granted_role_name: "R1".to_string(),
                    granted_role_is_default: true,
                    with_admin_option: false,
                },
                RoleGrantRow {
                    user_name: Some("B".to_string()),
                    role_name: None,
                    granted_role_name: "R2".to_string(),
                    granted_role_is_default: true,
                    with_admin_option: true,
                },
            ]
        );
    }

    #[test]
    fn test_system_tables_filter_what_a_user_cannot_see() {
        let engine = TestEngine::new();
        populate(&engine);
        let a = engine.login("A");

        let users: Vec<String> = engine
            .access
            .system_users(&a)
            .unwrap()
            .into_iter()
            .map(|row| row.name)
            .collect();
        assert_eq!(users, names(&["A"]));

        let owners: Vec<(Option<String>, Option<String>)> = engine
            .access
            .system_grants(&a)
            .unwrap()
            .into_iter()
            .map(|row| (row.user_name, row.role_name))
            .collect();
        assert_eq!(owners, vec![(Some("A".to_string()), None)]);

        engine.grant(AccessType::ShowRoles, &GrantScope::Global, &["A"]);
        let a = engine.login("A");
        let roles: Vec<String> = engine
            .access
            .system_roles(&a)
            .unwrap()
            .into_iter()
            .map(|row| row.name)
            .collect();
        assert_eq!(roles, names(&["R1", "R2"]));
    }

    #[test]
    fn test_storage_is_reported() {
        let memory = TestEngine::new();
        memory.create_roles(&["R1"]);
        let rows = memory.access.system_roles(&memory.admin).unwrap();
        assert_eq!(rows[0].storage, "memory");

        let dir = TempDir::new().unwrap();
        let engine = TestEngine::persisted(dir.path());
        populate(&engine);

        let rows: Vec<(String, String)> = engine
            .access
            .system_roles(&engine.admin)
            .unwrap()
            .into_iter()
            .map(|row| (row.name, row.storage))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("R1".to_string(), "local directory".to_string()),
                ("R2".to_string(), "local directory".to_string()),
            ]
        );
    }

    #[test]
    fn test_persisted_state_survives_restart() {
        let dir = TempDir::new().unwrap();
        {
            let engine = TestEngine::persisted(dir.path());
            populate(&engine);
        }

        let engine = TestEngine::persisted(dir.path());
        assert_eq!(
            engine.show_grants_for("R2"),
            vec![
                "GRANT SELECT ON test.table TO R2",
                "REVOKE SELECT(x) ON test.table FROM R2",
            ]
        );
        assert_eq!(
            engine.show_grants_for("B"),
            vec![
                "GRANT CREATE ON *.* TO B WITH GRANT OPTION",
                "GRANT R2 TO B WITH ADMIN OPTION",
            ]
        );
        let users = engine.access.show_users(&engine.admin).unwrap();
        assert_eq!(users, names(&["A", "B", "default"]));
    }
}
