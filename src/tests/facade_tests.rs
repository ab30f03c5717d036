#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::super::helpers::DenyingStore;
    use crate::errors::StoreError;
    use crate::facade::{DbUtil, QUIZZES_COLLECTION, USERS_COLLECTION};
    use crate::models::{NewUser, WriteAck};
    use crate::store::{DocumentStore, Fields, MemoryStore, Value};

    fn facade() -> (DbUtil, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (DbUtil::new(store.clone()), store)
    }

    fn full_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: Some("Chan Tai Man".to_string()),
            role: Some("student".to_string()),
            version: Some("1.2".to_string()),
            programme: Some("BSc Computing".to_string()),
            grad_year: Some(2027),
            stamps: Some(vec!["library".to_string(), "atrium".to_string()]),
        }
    }

    #[tokio::test]
    async fn test_save_then_get_returns_saved_fields() {
        let (db, _) = facade();
        let ack = db.save_user(full_user("tm.chan@connect.polyu.hk")).await.unwrap();
        assert_eq!(ack, WriteAck::ok());

        let user = db.get_user("tm.chan@connect.polyu.hk").await.unwrap().unwrap();
        assert_eq!(user.id, "tm.chan@connect.polyu.hk");
        assert_eq!(user.email.as_deref(), Some("tm.chan@connect.polyu.hk"));
        assert_eq!(user.name.as_deref(), Some("Chan Tai Man"));
        assert_eq!(user.role.as_deref(), Some("student"));
        assert_eq!(user.version.as_deref(), Some("1.2"));
        assert_eq!(user.programme.as_deref(), Some("BSc Computing"));
        assert_eq!(user.grad_year, Some(2027));
        assert_eq!(user.stamps, vec!["library", "atrium"]);
        assert!(user.created_at.is_some());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[tokio::test]
    async fn test_save_substitutes_defaults_for_omitted_fields() {
        let (db, store) = facade();
        db.save_user(NewUser::new("minimal@polyu.edu.hk")).await.unwrap();

        let user = db.get_user("minimal@polyu.edu.hk").await.unwrap().unwrap();
        assert_eq!(user.name, None);
        assert_eq!(user.role, None);
        assert_eq!(user.programme, None);
        assert_eq!(user.grad_year, None);
        assert!(user.stamps.is_empty());

        // Defaults are written explicitly, not left absent
        let doc = store.get(USERS_COLLECTION, "minimal@polyu.edu.hk").await.unwrap().unwrap();
        assert_eq!(doc.fields["programme"], Value::Null);
        assert_eq!(doc.fields["stamps"], Value::Array(vec![]));
    }

    #[tokio::test]
    async fn test_save_merges_into_existing_document() {
        let (db, store) = facade();
        let mut extra = Fields::new();
        extra.insert("nickname".to_string(), Value::from("TM"));
        store
            .set_merge(USERS_COLLECTION, "tm@polyu.edu.hk", extra)
            .await
            .unwrap();

        db.save_user(NewUser::new("tm@polyu.edu.hk")).await.unwrap();

        let doc = store.get(USERS_COLLECTION, "tm@polyu.edu.hk").await.unwrap().unwrap();
        assert_eq!(doc.fields["nickname"], Value::from("TM"));
        assert_eq!(doc.fields["email"], Value::from("tm@polyu.edu.hk"));
    }

    #[tokio::test]
    async fn test_repeated_save_overwrites_created_at() {
        let (db, _) = facade();
        db.save_user(NewUser::new("again@polyu.edu.hk")).await.unwrap();
        let first = db.get_user("again@polyu.edu.hk").await.unwrap().unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;
        db.save_user(NewUser::new("again@polyu.edu.hk")).await.unwrap();
        let second = db.get_user("again@polyu.edu.hk").await.unwrap().unwrap();

        assert!(second.created_at > first.created_at);
    }

    #[tokio::test]
    async fn test_save_rejects_unusable_email_key() {
        let (db, store) = facade();
        let result = db.save_user(NewUser::new("")).await;
        assert!(matches!(result, Err(StoreError::InvalidKey { .. })));

        let result = db.save_user(NewUser::new("a/b@polyu.edu.hk")).await;
        assert!(matches!(result, Err(StoreError::InvalidKey { .. })));
        assert_eq!(store.count(USERS_COLLECTION).await, 0);
    }

    #[tokio::test]
    async fn test_update_stamps_replaces_only_stamps() {
        let (db, _) = facade();
        db.save_user(full_user("s@polyu.edu.hk")).await.unwrap();
        let before = db.get_user("s@polyu.edu.hk").await.unwrap().unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;
        let stamps = vec!["pool".to_string(), "canteen".to_string(), "library".to_string()];
        db.update_stamps("s@polyu.edu.hk", stamps.clone()).await.unwrap();

        let after = db.get_user("s@polyu.edu.hk").await.unwrap().unwrap();
        assert_eq!(after.stamps, stamps);
        assert_eq!(after.name, before.name);
        assert_eq!(after.role, before.role);
        assert_eq!(after.programme, before.programme);
        assert_eq!(after.grad_year, before.grad_year);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
    }

    #[tokio::test]
    async fn test_update_stamps_on_missing_user_fails() {
        let (db, store) = facade();
        let result = db.update_stamps("ghost@polyu.edu.hk", vec!["x".to_string()]).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
        assert_eq!(store.count(USERS_COLLECTION).await, 0);
    }

    #[tokio::test]
    async fn test_get_unknown_user_is_none_not_error() {
        let (db, _) = facade();
        let user = tokio_test::assert_ok!(db.get_user("never@polyu.edu.hk").await);
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_log_quiz_answer_appends_one_document() {
        let (db, store) = facade();
        db.log_quiz_answer("q@polyu.edu.hk", "core-a-3", true).await.unwrap();

        let attempts = store.list(QUIZZES_COLLECTION).await.unwrap();
        assert_eq!(attempts.len(), 1);
        let fields = &attempts[0].fields;
        assert_eq!(fields["email"], Value::from("q@polyu.edu.hk"));
        assert_eq!(fields["locationId"], Value::from("core-a-3"));
        assert_eq!(fields["correct"], Value::Boolean(true));
        assert!(matches!(fields["timestamp"], Value::Timestamp(_)));

        // No user document is touched or required
        assert_eq!(store.count(USERS_COLLECTION).await, 0);
    }

    #[tokio::test]
    async fn test_repeated_answers_are_separate_documents() {
        let (db, store) = facade();
        db.log_quiz_answer("q@polyu.edu.hk", "core-a-3", false).await.unwrap();
        db.log_quiz_answer("q@polyu.edu.hk", "core-a-3", false).await.unwrap();
        assert_eq!(store.count(QUIZZES_COLLECTION).await, 2);
    }

    #[tokio::test]
    async fn test_get_all_users_includes_keys() {
        let (db, _) = facade();
        db.save_user(NewUser::new("a@polyu.edu.hk")).await.unwrap();
        db.save_user(NewUser::new("b@polyu.edu.hk")).await.unwrap();

        let mut ids: Vec<String> = db
            .get_all_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["a@polyu.edu.hk", "b@polyu.edu.hk"]);
    }

    #[tokio::test]
    async fn test_malformed_document_is_a_failure() {
        let (db, store) = facade();
        let mut fields = Fields::new();
        fields.insert("stamps".to_string(), Value::from("not-a-list"));
        store.set_merge(USERS_COLLECTION, "bad@polyu.edu.hk", fields).await.unwrap();

        let result = db.get_user("bad@polyu.edu.hk").await;
        assert!(matches!(result, Err(StoreError::Decode { .. })));
        assert!(db.get_stats().await.is_err());
    }

    #[tokio::test]
    async fn test_store_failures_propagate_unchanged() {
        let db = DbUtil::new(Arc::new(DenyingStore));

        let err = tokio_test::assert_err!(db.save_user(NewUser::new("x@polyu.edu.hk")).await);
        assert!(matches!(err, StoreError::Remote { status: 403, .. }));
        assert!(matches!(
            db.get_user("x@polyu.edu.hk").await,
            Err(StoreError::Remote { status: 403, .. })
        ));
        assert!(db.log_quiz_answer("x@polyu.edu.hk", "l", true).await.is_err());
        assert!(db.update_stamps("x@polyu.edu.hk", vec![]).await.is_err());
        assert!(db.get_stats().await.is_err());
    }
}
