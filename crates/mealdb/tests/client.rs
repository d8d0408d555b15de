use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use bitebuddy_mealdb::{MealApi, MealDbClient, RecipeQuery};
use bitebuddy_shared::Error;
use serde_json::{Value, json};

type Hits = Arc<Mutex<Vec<String>>>;

fn meal(id: &str, name: &str) -> Value {
    json!({ "idMeal": id, "strMeal": name, "strMealThumb": format!("{id}.jpg") })
}

async fn search(
    State(hits): State<Hits>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let name = params.get("s").cloned().unwrap_or_default();
    hits.lock().unwrap().push(format!("search:{name}"));

    match name.as_str() {
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
        "arrabiata" => (
            StatusCode::OK,
            Json(json!({ "meals": [meal("52771", "Spicy Arrabiata Penne")] })),
        ),
        _ => (StatusCode::OK, Json(json!({ "meals": null }))),
    }
}

async fn filter(
    State(hits): State<Hits>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let ingredient = params.get("i").cloned().unwrap_or_default();
    hits.lock().unwrap().push(format!("filter:{ingredient}"));

    let meals = match ingredient.as_str() {
        "tomato" => json!([meal("1", "Tomato Soup"), meal("2", "Shakshuka")]),
        "tomatoes" => json!([meal("2", "Shakshuka"), meal("3", "Stuffed Tomatoes")]),
        _ => Value::Null,
    };

    Json(json!({ "meals": meals }))
}

async fn lookup(
    State(hits): State<Hits>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let id = params.get("i").cloned().unwrap_or_default();
    hits.lock().unwrap().push(format!("lookup:{id}"));

    if id != "52772" {
        return Json(json!({ "meals": null }));
    }

    Json(json!({ "meals": [{
        "idMeal": "52772",
        "strMeal": "Teriyaki Chicken Casserole",
        "strMealThumb": "52772.jpg",
        "strInstructions": "Preheat oven to 350",
        "strIngredient1": "soy sauce",
        "strIngredient2": "chicken",
        "strIngredient3": "",
        "strMeasure1": "3/4 cup",
        "strMeasure2": "2 lb",
        "strMeasure3": ""
    }] }))
}

async fn random(State(hits): State<Hits>) -> impl IntoResponse {
    hits.lock().unwrap().push("random".to_owned());

    Json(json!({ "meals": [meal("52900", "Random Pie")] }))
}

async fn spawn_upstream() -> anyhow::Result<(String, Hits)> {
    let hits = Hits::default();
    let app = Router::new()
        .route("/search.php", get(search))
        .route("/filter.php", get(filter))
        .route("/lookup.php", get(lookup))
        .route("/random.php", get(random))
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((format!("http://{addr}"), hits))
}

fn hits_of(hits: &Hits) -> Vec<String> {
    hits.lock().unwrap().clone()
}

#[tokio::test]
async fn test_search_by_name_and_cache() -> anyhow::Result<()> {
    let (base_url, hits) = spawn_upstream().await?;
    let query = RecipeQuery::new(MealDbClient::new(base_url, Duration::from_secs(5))?);

    let meals = query.search_by_name("Arrabiata").await;
    assert_eq!(meals.len(), 1);
    assert_eq!(meals[0].id, "52771");
    assert_eq!(meals[0].thumbnail_url, "52771.jpg");

    query.search_by_name("arrabiata").await;
    assert_eq!(hits_of(&hits), vec!["search:arrabiata"]);

    Ok(())
}

#[tokio::test]
async fn test_search_by_name_degrades_on_error() -> anyhow::Result<()> {
    let (base_url, _) = spawn_upstream().await?;
    let client = MealDbClient::new(base_url, Duration::from_secs(5))?;

    assert!(matches!(client.search("boom").await, Err(Error::Upstream(_))));

    let query = RecipeQuery::new(client);
    assert!(query.search_by_name("boom").await.is_empty());
    assert!(query.search_by_name("nothing here").await.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_search_by_ingredient_unions_forms() -> anyhow::Result<()> {
    let (base_url, hits) = spawn_upstream().await?;
    let query = RecipeQuery::new(MealDbClient::new(base_url, Duration::from_secs(5))?);

    let meals = query.search_by_ingredient("Tomato").await;
    let ids = meals.iter().map(|m| m.id.as_str()).collect::<Vec<_>>();

    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(hits_of(&hits), vec!["filter:tomato", "filter:tomatoes"]);

    Ok(())
}

#[tokio::test]
async fn test_lookup_by_id() -> anyhow::Result<()> {
    let (base_url, _) = spawn_upstream().await?;
    let query = RecipeQuery::new(MealDbClient::new(base_url, Duration::from_secs(5))?);

    let meal = query.lookup_by_id("52772").await?;
    assert_eq!(meal.name, "Teriyaki Chicken Casserole");
    assert_eq!(meal.ingredient_names().collect::<Vec<_>>(), vec!["soy sauce", "chicken"]);
    assert_eq!(meal.measures[1].as_deref(), Some("2 lb"));

    assert!(matches!(
        query.lookup_by_id("0").await,
        Err(Error::NotFound(_))
    ));

    Ok(())
}

#[tokio::test]
async fn test_random_hits_upstream_every_time() -> anyhow::Result<()> {
    let (base_url, hits) = spawn_upstream().await?;
    let query = RecipeQuery::new(MealDbClient::new(base_url, Duration::from_secs(5))?);

    assert_eq!(query.random().await?.map(|m| m.id), Some("52900".to_owned()));
    query.random().await?;

    assert_eq!(hits_of(&hits), vec!["random", "random"]);

    Ok(())
}
