//! Concurrent statements against one engine

#[cfg(test)]
mod tests {
    use crate::common::TestEngine;
    use crate::common::fixtures::test_table;
    use rbac_engine::core::models::AccessType;
    use std::sync::{Arc, Barrier};
    use std::thread;

    const THREADS: usize = 8;

    #[test]
    fn test_concurrent_checks_share_one_resolution() {
        let engine = Arc::new(TestEngine::new());
        engine.create_users(&["A"]);
        engine.create_roles(&["R1", "R2"]);
        engine.grant_roles(&["R2"], &["R1"], false);
        engine.grant(AccessType::Select, &test_table(), &["R2"]);
        engine.grant_roles(&["R1"], &["A"], false);

        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let engine = Arc::clone(&engine);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    engine.select("A", &[]).is_ok()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(engine.access.cache().stats().recomputations, 1);
    }

    #[test]
    fn test_grants_from_many_threads_all_land() {
        let engine = Arc::new(TestEngine::new());
        let users: Vec<String> = (0..THREADS).map(|i| format!("user_{}", i)).collect();
        for user in &users {
            engine.access.create_user(&engine.admin, user, false).unwrap();
        }
        engine.create_roles(&["R1"]);
        engine.grant(AccessType::Select, &test_table(), &["R1"]);

        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = users
            .iter()
            .cloned()
            .map(|user| {
                let engine = Arc::clone(&engine);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    engine
                        .access
                        .grant_roles(&engine.admin, &["R1"], &[user.as_str()], false)
                        .unwrap();
                    engine.select(&user, &[]).is_ok()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        for user in &users {
            assert_eq!(engine.show_grants_for(user), vec![format!("GRANT R1 TO {}", user)]);
        }
    }

    #[test]
    fn test_revoke_is_visible_after_it_returns() {
        let engine = Arc::new(TestEngine::new());
        engine.create_users(&["A"]);
        engine.grant(AccessType::Select, &test_table(), &["A"]);

        let readers: Vec<_> = (0..THREADS)
            .map(|_| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || {
                    for _ in 0..100 {
                        let _ = engine.select("A", &[]);
                    }
                })
            })
            .collect();

        engine
            .access
            .revoke_privileges(&engine.admin, &[AccessType::Select], &test_table(), &["A"])
            .unwrap();
        assert!(engine.select("A", &[]).is_err());

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
