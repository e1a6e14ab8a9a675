use feedback_desk::db::Database;
use feedback_desk::models::*;
use feedback_desk::storage::{NoopPersistence, PersistenceService};
use speculate2::speculate;

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "set_value" {
        it "stores a value under its key" {
            db.set_value("greeting", "hello").expect("Failed to set");

            assert_eq!(db.get_value("greeting").expect("Query failed"), Some("hello".to_string()));
        }

        it "overwrites an existing key" {
            db.set_value("greeting", "hello").expect("Failed to set");
            db.set_value("greeting", "bonjour").expect("Failed to set");

            assert_eq!(
                db.get_value("greeting").expect("Query failed"),
                Some("bonjour".to_string())
            );
            assert_eq!(db.keys_with_prefix("greet").expect("Query failed").len(), 1);
        }
    }

    describe "get_value" {
        it "returns None for a missing key" {
            assert!(db.get_value("missing").expect("Query failed").is_none());
        }
    }

    describe "keys_with_prefix" {
        it "returns only matching keys" {
            db.set_value("feedback:a", "{}").expect("Failed to set");
            db.set_value("feedback:b", "{}").expect("Failed to set");
            db.set_value("settings:theme", "dark").expect("Failed to set");

            let keys = db.keys_with_prefix(FEEDBACK_KEY_PREFIX).expect("Query failed");
            assert_eq!(keys, vec!["feedback:a".to_string(), "feedback:b".to_string()]);
        }

        it "treats LIKE wildcards literally" {
            db.set_value("feedback:a", "{}").expect("Failed to set");
            db.set_value("feedbackXa", "{}").expect("Failed to set");

            assert!(db.keys_with_prefix("feedback_").expect("Query failed").is_empty());
            assert!(db.keys_with_prefix("feedback%").expect("Query failed").is_empty());
        }
    }

    describe "persistence service" {
        it "reports success and stores the value" {
            let ok = tokio_test::block_on(db.set("feedback:1", r#"{"rating":5}"#, false));

            assert!(ok);
            assert_eq!(
                db.get_value("feedback:1").expect("Query failed"),
                Some(r#"{"rating":5}"#.to_string())
            );
        }

        it "stores the same value when verbose" {
            let ok = tokio_test::block_on(db.set("feedback:2", "plain text", true));

            assert!(ok);
            assert_eq!(
                db.get_value("feedback:2").expect("Query failed"),
                Some("plain text".to_string())
            );
        }

        it "reports failure when the schema is missing" {
            let bare = Database::open_memory().expect("Failed to create database");

            assert!(!tokio_test::block_on(bare.set("feedback:3", "{}", false)));
        }

        it "round-trips a feedback record" {
            let record = FeedbackRecord::new(4, "Nice staff", "Thanks for the kind words!");
            let value = serde_json::to_string(&record).expect("serialize");

            assert!(tokio_test::block_on(db.set(&record.storage_key(), &value, false)));

            let stored = db
                .get_value(&record.storage_key())
                .expect("Query failed")
                .expect("stored");
            let decoded: FeedbackRecord = serde_json::from_str(&stored).expect("deserialize");
            assert_eq!(decoded.id, record.id);
            assert_eq!(decoded.review, "Nice staff");
        }
    }

    describe "noop persistence" {
        it "accepts writes without storing anything" {
            assert!(tokio_test::block_on(NoopPersistence.set("feedback:x", "{}", true)));
            assert!(db.get_value("feedback:x").expect("Query failed").is_none());
        }
    }

    describe "on-disk database" {
        it "keeps values across reopen" {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("nested").join("feedback.db");

            {
                let disk = Database::open(path.clone()).expect("Failed to open");
                disk.migrate().expect("Failed to migrate");
                disk.set_value("feedback:persisted", "yes").expect("Failed to set");
            }

            let reopened = Database::open(path).expect("Failed to reopen");
            reopened.migrate().expect("Failed to migrate again");
            assert_eq!(
                reopened.get_value("feedback:persisted").expect("Query failed"),
                Some("yes".to_string())
            );
        }
    }
}
