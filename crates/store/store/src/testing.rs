use crate::error::StoreError;
use crate::rule::RuleId;
use crate::store::RuleStore;

/// Run the full rule store conformance test suite.
///
/// Call this from your backend's test module with a fresh, empty store.
///
/// # Errors
///
/// Returns an error if a store operation fails unexpectedly.
pub async fn run_store_conformance_tests(store: &dyn RuleStore) -> Result<(), StoreError> {
    test_empty_list(store).await?;
    test_insert_and_list(store).await?;
    test_insert_duplicate(store).await?;
    test_delete(store).await?;
    test_delete_many(store).await?;
    test_ids_not_reused(store).await?;
    test_replace(store).await?;
    test_replace_duplicate_rolls_back(store).await?;
    test_replace_with_deleted_text(store).await?;
    Ok(())
}

async fn clear(store: &dyn RuleStore) -> Result<(), StoreError> {
    let ids: Vec<RuleId> = store.list_all().await?.iter().map(|r| r.id).collect();
    store.delete_many(&ids).await?;
    Ok(())
}

async fn texts(store: &dyn RuleStore) -> Result<Vec<String>, StoreError> {
    Ok(store
        .list_all()
        .await?
        .into_iter()
        .map(|r| r.text)
        .collect())
}

async fn test_empty_list(store: &dyn RuleStore) -> Result<(), StoreError> {
    let rules = store.list_all().await?;
    assert!(rules.is_empty(), "fresh store should be empty");
    Ok(())
}

async fn test_insert_and_list(store: &dyn RuleStore) -> Result<(), StoreError> {
    let first = store.insert_unique("age > 30").await?;
    let second = store.insert_unique("salary > 50000").await?;
    assert!(second > first, "ids should increase");

    let rules = store.list_all().await?;
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].id, first);
    assert_eq!(rules[0].text, "age > 30");
    assert_eq!(rules[1].id, second);
    assert_eq!(rules[1].text, "salary > 50000");

    clear(store).await
}

async fn test_insert_duplicate(store: &dyn RuleStore) -> Result<(), StoreError> {
    store.insert_unique("status = 'active'").await?;
    let err = store
        .insert_unique("status = 'active'")
        .await
        .expect_err("duplicate insert should fail");
    assert!(err.is_duplicate(), "expected duplicate error, got {err:?}");

    // Text is compared exactly.
    store.insert_unique("status = 'Active'").await?;
    assert_eq!(store.list_all().await?.len(), 2);

    clear(store).await
}

async fn test_delete(store: &dyn RuleStore) -> Result<(), StoreError> {
    let id = store.insert_unique("to-delete = 1").await?;
    assert!(store.delete(id).await?, "delete should report existing rule");
    assert!(store.list_all().await?.is_empty());
    assert!(
        !store.delete(id).await?,
        "delete on missing rule should return false"
    );

    // The text can be stored again once deleted.
    store.insert_unique("to-delete = 1").await?;
    clear(store).await
}

async fn test_delete_many(store: &dyn RuleStore) -> Result<(), StoreError> {
    let a = store.insert_unique("a = 1").await?;
    let b = store.insert_unique("b = 2").await?;
    let c = store.insert_unique("c = 3").await?;

    let removed = store.delete_many(&[a, c, RuleId(i64::MAX)]).await?;
    assert_eq!(removed, 2, "missing ids should be ignored");

    let rules = store.list_all().await?;
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].id, b);

    assert_eq!(store.delete_many(&[]).await?, 0);
    clear(store).await
}

async fn test_ids_not_reused(store: &dyn RuleStore) -> Result<(), StoreError> {
    let first = store.insert_unique("reuse = 1").await?;
    store.delete(first).await?;
    let second = store.insert_unique("reuse = 1").await?;
    assert!(second > first, "ids should not be reused after delete");
    clear(store).await
}

async fn test_replace(store: &dyn RuleStore) -> Result<(), StoreError> {
    let a = store.insert_unique("a = 1").await?;
    let b = store.insert_unique("b = 2").await?;
    let keep = store.insert_unique("keep = 1").await?;

    let combined = store.replace(&[a, b], "(a = 1) AND (b = 2)").await?;
    assert!(combined > keep);

    let rules = store.list_all().await?;
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].id, keep);
    assert_eq!(rules[1].text, "(a = 1) AND (b = 2)");

    // Replacing with no ids is a plain insert.
    store.replace(&[], "c = 3").await?;
    assert_eq!(store.list_all().await?.len(), 3);

    clear(store).await
}

async fn test_replace_duplicate_rolls_back(store: &dyn RuleStore) -> Result<(), StoreError> {
    let a = store.insert_unique("a = 1").await?;
    store.insert_unique("(a = 1) OR (b = 2)").await?;

    let err = store
        .replace(&[a], "(a = 1) OR (b = 2)")
        .await
        .expect_err("duplicate replace should fail");
    assert!(err.is_duplicate(), "expected duplicate error, got {err:?}");
    assert_eq!(
        texts(store).await?,
        ["a = 1", "(a = 1) OR (b = 2)"],
        "nothing should be deleted when the insert fails"
    );

    clear(store).await
}

async fn test_replace_with_deleted_text(store: &dyn RuleStore) -> Result<(), StoreError> {
    let a = store.insert_unique("same = 1").await?;
    let new_id = store.replace(&[a], "same = 1").await?;
    assert_ne!(new_id, a);
    assert_eq!(texts(store).await?, ["same = 1"]);
    clear(store).await
}
