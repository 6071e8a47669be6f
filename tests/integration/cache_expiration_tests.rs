//! Role cache expiration observed through the engine

#[cfg(test)]
mod tests {
    use crate::common::TestEngine;
    use crate::common::fixtures::SHORT_TTL;
    use rbac_engine::core::models::{AccessType, GrantScope};
    use std::thread;

    fn wait_for_expiry() {
        thread::sleep(SHORT_TTL + SHORT_TTL / 2);
    }

    fn select_on(table: &str) -> GrantScope {
        GrantScope::table("default", table)
    }

    fn can_select(engine: &TestEngine, user: &str, table: &str) -> bool {
        let session = engine.login(user);
        engine
            .access
            .has_privilege(&session, AccessType::Select, &select_on(table))
            .unwrap()
    }

    #[test]
    fn test_role_expiration() {
        let engine = TestEngine::with_short_ttl();
        engine.create_users(&["ure"]);
        engine.create_roles(&["rre"]);
        engine.grant_roles(&["rre"], &["ure"], false);

        assert!(!can_select(&engine, "ure", "tre"));
        engine.grant(AccessType::Select, &select_on("tre"), &["rre"]);
        assert!(can_select(&engine, "ure", "tre"));

        wait_for_expiry();

        engine.grant(AccessType::Select, &select_on("tre1"), &["rre"]);
        assert!(can_select(&engine, "ure", "tre1"));
        assert!(can_select(&engine, "ure", "tre"));
    }

    #[test]
    fn test_two_roles_expiration() {
        let engine = TestEngine::with_short_ttl();
        engine.create_users(&["ure"]);
        engine.create_roles(&["rre", "rre_second"]);
        engine.grant_roles(&["rre"], &["ure"], false);

        assert!(!can_select(&engine, "ure", "tre"));
        engine.grant(AccessType::Select, &select_on("tre"), &["rre"]);
        assert!(can_select(&engine, "ure", "tre"));
        assert_eq!(engine.access.cache().len(), 1);

        wait_for_expiry();

        // Touching any role sweeps every expired entry.
        engine.grant(AccessType::Select, &select_on("tre1"), &["rre_second"]);
        assert!(engine.access.cache().is_empty());

        engine.grant(AccessType::Select, &select_on("tre1"), &["rre"]);
        assert!(can_select(&engine, "ure", "tre1"));
    }

    #[test]
    fn test_unmutated_role_is_rebuilt_after_expiry() {
        let engine = TestEngine::with_short_ttl();
        engine.create_users(&["ure"]);
        engine.create_roles(&["rre"]);
        engine.grant_roles(&["rre"], &["ure"], false);
        engine.grant(AccessType::Select, &select_on("tre"), &["rre"]);

        assert!(can_select(&engine, "ure", "tre"));
        assert!(can_select(&engine, "ure", "tre"));
        let warm = engine.access.cache().stats();
        assert_eq!(warm.recomputations, 1);
        assert!(warm.hits >= 1);

        wait_for_expiry();
        assert!(can_select(&engine, "ure", "tre"));
        assert_eq!(engine.access.cache().stats().recomputations, 2);
    }
}
