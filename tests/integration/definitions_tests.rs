//! Declarative definitions applied to a running engine

#[cfg(test)]
mod tests {
    use crate::common::TestEngine;
    use rbac_engine::AccessDefinitions;
    use rbac_engine::core::models::{AccessType, GrantScope};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const EXAMPLE: &str = include_str!("../../config/definitions.yaml.example");

    #[test]
    fn test_example_definitions_apply() {
        let engine = TestEngine::new();
        let definitions = AccessDefinitions::from_yaml(EXAMPLE).unwrap();
        let report = definitions.apply(&engine.access).unwrap();

        assert_eq!(report.users, 2);
        assert_eq!(report.roles, 2);
        assert_eq!(report.default_roles, 1);

        let alice = engine.login("alice");
        assert!(engine
            .access
            .has_privilege(&alice, AccessType::Insert, &GrantScope::table("test", "other"))
            .unwrap());
        assert!(engine
            .access
            .has_privilege(&alice, AccessType::Select, &GrantScope::table("test", "table"))
            .unwrap());
        assert_eq!(
            engine.access.enabled_roles_of(&alice).unwrap(),
            vec!["reader".to_string(), "writer".to_string()]
        );

        assert_eq!(
            engine.show_grants_for("bob"),
            vec![
                "GRANT SELECT(x, y) ON test.table TO bob WITH GRANT OPTION",
                "GRANT reader TO bob",
            ]
        );
    }

    #[tokio::test]
    async fn test_definitions_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "users: [A]\nroles: [R1]\nrole_grants:\n  - roles: [R1]\n    to: [A]").unwrap();

        let definitions = AccessDefinitions::from_file(file.path()).await.unwrap();
        let engine = TestEngine::new();
        definitions.apply(&engine.access).unwrap();
        definitions.apply(&engine.access).unwrap();

        assert_eq!(engine.show_grants_for("A"), vec!["GRANT R1 TO A"]);
    }

    #[test]
    fn test_failed_definitions_keep_earlier_steps() {
        let engine = TestEngine::new();
        let definitions = AccessDefinitions::from_yaml(
            "users: [A]\nrole_grants:\n  - roles: [missing]\n    to: [A]\n",
        )
        .unwrap();

        assert!(definitions.apply(&engine.access).is_err());
        assert!(engine.access.store().find_any("A").is_some());
    }
}
