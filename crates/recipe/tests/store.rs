use std::time::Duration;

use bitebuddy_recipe::RecipeStore;
use bitebuddy_shared::Error;
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_add_and_list() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    let store = RecipeStore::new(pool);

    let teriyaki = helpers::meal("52772", "Teriyaki Chicken Casserole", &["chicken", "garlic"]);
    let arrabiata = helpers::meal("52771", "Spicy Arrabiata Penne", &["penne rigate"]);

    let saved = store.add("john", teriyaki.clone()).await?;
    assert_eq!(saved.meal, teriyaki);
    assert_eq!(saved.user_id, "john");
    assert_eq!(saved.id.len(), 26);

    store.add("john", arrabiata.clone()).await?;
    store.add("albert", arrabiata.clone()).await?;

    let recipes = store.list("john").await?;
    let meals = recipes.into_iter().map(|r| r.meal).collect::<Vec<_>>();
    assert_eq!(meals, vec![teriyaki, arrabiata]);

    assert_eq!(store.list("albert").await?.len(), 1);
    assert!(store.list("nobody").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_add_rejects_duplicate_meal() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    let store = RecipeStore::new(pool);

    let meal = helpers::meal("52772", "Teriyaki Chicken Casserole", &["chicken"]);
    store.add("john", meal.clone()).await?;

    let err = store.add("john", meal).await.unwrap_err();
    assert!(matches!(err, Error::AlreadySaved));
    assert_eq!(err.to_string(), "Recipe is already saved");
    assert_eq!(store.list("john").await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_remove_is_scoped_to_owner() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    let store = RecipeStore::new(pool);

    let saved = store
        .add("john", helpers::meal("52772", "Teriyaki", &["chicken"]))
        .await?;

    let err = store.remove("albert", &saved.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(store.list("john").await?.len(), 1);

    store.remove("john", &saved.id).await?;
    assert!(store.list("john").await?.is_empty());

    let err = store.remove("john", &saved.id).await.unwrap_err();
    assert_eq!(err.to_string(), format!("recipe {} not found", saved.id));

    Ok(())
}

#[tokio::test]
async fn test_remove_many() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    let store = RecipeStore::new(pool);

    let a = store.add("john", helpers::meal("1", "A", &[])).await?;
    let b = store.add("john", helpers::meal("2", "B", &[])).await?;
    let c = store.add("john", helpers::meal("3", "C", &[])).await?;
    let other = store.add("albert", helpers::meal("1", "A", &[])).await?;

    let removed = store
        .remove_many(
            "john",
            &[a.id.to_owned(), c.id.to_owned(), other.id.to_owned()],
        )
        .await?;

    assert_eq!(removed, 2);
    assert_eq!(store.list("john").await?, vec![b]);
    assert_eq!(store.list("albert").await?, vec![other]);
    assert_eq!(store.remove_many("john", &[]).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_subscription_round_trip() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    let store = RecipeStore::new(pool);
    let mut subscription = store.subscribe("john");

    assert_eq!(subscription.next().await?, Some(vec![]));

    let meal = helpers::meal("52772", "Teriyaki Chicken Casserole", &["chicken", "garlic"]);
    store.add("albert", helpers::meal("1", "Other", &[])).await?;
    let saved = store.add("john", meal.clone()).await?;

    let snapshot = subscription.next().await?.unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].meal, meal);

    store.remove("john", &saved.id).await?;
    assert_eq!(subscription.next().await?, Some(vec![]));

    let pending = tokio::time::timeout(Duration::from_millis(50), subscription.next()).await;
    assert!(pending.is_err());

    Ok(())
}

#[tokio::test]
async fn test_subscription_stream() -> anyhow::Result<()> {
    use futures::StreamExt;

    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    let store = RecipeStore::new(pool);
    store.add("john", helpers::meal("1", "A", &[])).await?;

    let mut stream = Box::pin(store.subscribe("john").into_stream());
    assert_eq!(stream.next().await.transpose()?.map(|r| r.len()), Some(1));

    store.add("john", helpers::meal("2", "B", &[])).await?;
    assert_eq!(stream.next().await.transpose()?.map(|r| r.len()), Some(2));

    Ok(())
}

#[tokio::test]
async fn test_subscription_ends_when_store_dropped() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    let store = RecipeStore::new(pool);
    let mut subscription = store.subscribe("john");

    assert_eq!(subscription.next().await?, Some(vec![]));

    drop(store);
    let next = tokio::time::timeout(Duration::from_millis(500), subscription.next()).await?;
    assert_eq!(next?, None);

    Ok(())
}

#[tokio::test]
async fn test_lagging_subscription_resyncs() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    let store = RecipeStore::with_feed_capacity(pool, 1);
    let mut subscription = store.subscribe("john");

    assert_eq!(subscription.next().await?, Some(vec![]));

    for (id, name) in [("1", "Soup"), ("2", "Stew"), ("3", "Salad")] {
        store.add("john", helpers::meal(id, name, &[])).await?;
    }

    let snapshot = subscription.next().await?.unwrap();
    let ids = snapshot.iter().map(|r| r.meal.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["1", "2", "3"]);

    Ok(())
}
