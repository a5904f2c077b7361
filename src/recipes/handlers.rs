use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::state::AppState;
use crate::users::jwt::AuthUser;

use super::dto::{price_in_range, CreateRecipeRequest, RecipeResponse, UpdateRecipeRequest};
use super::repo::{self, NewRecipe, RecipeChanges};

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipe/recipe", get(list_recipes).post(create_recipe))
        .route(
            "/recipe/recipe/:id",
            get(get_recipe)
                .patch(update_recipe)
                .put(update_recipe)
                .delete(delete_recipe),
        )
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<RecipeResponse>>, (StatusCode, String)> {
    let recipes = repo::list_by_user(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(recipes.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), (StatusCode, String)> {
    if payload.title.trim().is_empty() {
        warn!(user_id = %user_id, "blank recipe title");
        return Err((StatusCode::BAD_REQUEST, "Title must not be blank".into()));
    }
    if !price_in_range(&payload.price) {
        warn!(user_id = %user_id, price = %payload.price, "price out of range");
        return Err((
            StatusCode::BAD_REQUEST,
            "Price must have at most 5 digits and 2 decimal places".into(),
        ));
    }

    let recipe = repo::create(
        &state.db,
        user_id,
        NewRecipe {
            title: payload.title,
            description: payload.description,
            time_minutes: payload.time_minutes,
            price: payload.price,
            link: payload.link,
        },
    )
    .await
    .map_err(internal)?;

    info!(user_id = %user_id, recipe_id = recipe.id, "recipe created");
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<RecipeResponse>, (StatusCode, String)> {
    let recipe = repo::get_for_user(&state.db, user_id, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Recipe not found".to_string()))?;
    Ok(Json(recipe.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRecipeRequest>,
) -> Result<Json<RecipeResponse>, (StatusCode, String)> {
    if let Some(title) = payload.title.as_deref() {
        if title.trim().is_empty() {
            warn!(user_id = %user_id, "blank recipe title");
            return Err((StatusCode::BAD_REQUEST, "Title must not be blank".into()));
        }
    }
    if let Some(price) = &payload.price {
        if !price_in_range(price) {
            warn!(user_id = %user_id, price = %price, "price out of range");
            return Err((
                StatusCode::BAD_REQUEST,
                "Price must have at most 5 digits and 2 decimal places".into(),
            ));
        }
    }

    let recipe = repo::update_for_user(
        &state.db,
        user_id,
        id,
        RecipeChanges {
            title: payload.title,
            description: payload.description,
            time_minutes: payload.time_minutes,
            price: payload.price,
            link: payload.link,
        },
    )
    .await
    .map_err(internal)?
    .ok_or((StatusCode::NOT_FOUND, "Recipe not found".to_string()))?;

    info!(user_id = %user_id, recipe_id = recipe.id, "recipe updated");
    Ok(Json(recipe.into()))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    let deleted = repo::delete_for_user(&state.db, user_id, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err((StatusCode::NOT_FOUND, "Recipe not found".to_string()));
    }
    info!(user_id = %user_id, recipe_id = id, "recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    tracing::error!(error = %e, "internal error");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
