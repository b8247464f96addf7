use axum::Json;
use axum::extract::{DefaultBodyLimit, State};
use recetario_common::storage::ImageStore;
use sea_orm::*;
use tracing::instrument;

use crate::entity::recipe;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminUser;
use crate::extractors::multipart::AppMultipart;
use crate::extractors::path::AppPath;
use crate::models::recipe::*;
use crate::state::AppState;
use crate::utils::filename::{file_name_from_url, image_file_name, image_url};

/// Room left for the text fields and multipart framing around the image.
const FORM_OVERHEAD: u64 = 1024 * 1024;

pub fn recipe_body_limit(max_image_size: u64) -> DefaultBodyLimit {
    let limit = max_image_size.saturating_add(FORM_OVERHEAD);
    DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX))
}

#[utoipa::path(
    get,
    path = "/recetas",
    tag = "Recetas",
    operation_id = "listRecipes",
    summary = "List all recipes",
    description = "Returns every stored recipe ordered by ID. No authentication required.",
    responses(
        (status = 200, description = "All recipes", body = Vec<RecipeResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecipeResponse>>, AppError> {
    let recipes = recipe::Entity::find()
        .order_by_asc(recipe::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(recipes.into_iter().map(RecipeResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/recetas",
    tag = "Recetas",
    operation_id = "createRecipe",
    summary = "Create a recipe",
    description = "Creates a recipe from a multipart form with `titulo`, `ingredientes` and `pasos` \
        text fields and an optional `imagen` file. The image is stored as `<titulo>_<id>.<ext>` \
        under the static prefix. If the image cannot be written no recipe is created.",
    request_body(content_type = "multipart/form-data", description = "Recipe fields with optional image"),
    responses(
        (status = 200, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (CREDENTIALS_MISSING, INVALID_CREDENTIALS)", body = ErrorBody),
    ),
    security(("basic" = [])),
)]
#[instrument(skip(state, admin, form), fields(title = %form.title, username = %admin.username))]
pub async fn create_recipe(
    admin: AdminUser,
    State(state): State<AppState>,
    AppMultipart(form): AppMultipart<RecipeForm>,
) -> Result<Json<RecipeResponse>, AppError> {
    validate_recipe_form(&form)?;
    let image = uploaded_image(form.image);
    check_image_size(image.as_ref().map(|f| f.contents.len()), &*state.images)?;

    let txn = state.db.begin().await?;

    let new_recipe = recipe::ActiveModel {
        title: Set(form.title.trim().to_string()),
        ingredients: Set(form.ingredients),
        steps: Set(form.steps),
        image: Set(None),
        ..Default::default()
    };
    let model = new_recipe.insert(&txn).await?;

    let Some(upload) = image else {
        txn.commit().await?;
        return Ok(Json(model.into()));
    };

    let file_name = image_file_name(
        &model.title,
        model.id,
        upload.metadata.file_name.as_deref(),
        upload.metadata.content_type.as_deref(),
    );
    // Dropping `txn` on failure rolls the insert back.
    state.images.put(&file_name, &upload.contents).await?;

    let url = image_url(&state.config.storage.url_prefix, &file_name);
    let saved = async {
        let mut active: recipe::ActiveModel = model.into();
        active.image = Set(Some(url));
        let model = active.update(&txn).await?;
        txn.commit().await?;
        Ok::<_, DbErr>(model)
    }
    .await;

    match saved {
        Ok(model) => Ok(Json(model.into())),
        Err(e) => {
            discard_image(&*state.images, &file_name).await;
            Err(e.into())
        }
    }
}

#[utoipa::path(
    put,
    path = "/recetas/{id}",
    tag = "Recetas",
    operation_id = "updateRecipe",
    summary = "Update a recipe",
    description = "Overwrites `titulo`, `ingredientes` and `pasos`. When an `imagen` file is \
        supplied it replaces the current image; otherwise the current image is kept.",
    params(("id" = i32, Path, description = "Recipe ID")),
    request_body(content_type = "multipart/form-data", description = "Recipe fields with optional image"),
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (CREDENTIALS_MISSING, INVALID_CREDENTIALS)", body = ErrorBody),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("basic" = [])),
)]
#[instrument(skip(state, admin, form), fields(title = %form.title, username = %admin.username))]
pub async fn update_recipe(
    admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppMultipart(form): AppMultipart<RecipeForm>,
) -> Result<Json<RecipeResponse>, AppError> {
    validate_recipe_form(&form)?;
    let image = uploaded_image(form.image);
    check_image_size(image.as_ref().map(|f| f.contents.len()), &*state.images)?;

    let prefix = &state.config.storage.url_prefix;
    let title = form.title.trim().to_string();

    let existing = find_recipe(&state.db, id).await?;
    let previous_file = existing
        .image
        .as_deref()
        .and_then(|url| file_name_from_url(prefix, url))
        .map(str::to_string);

    let mut active: recipe::ActiveModel = existing.into();
    active.ingredients = Set(form.ingredients);
    active.steps = Set(form.steps);

    let mut written: Option<String> = None;
    if let Some(upload) = image {
        let file_name = image_file_name(
            &title,
            id,
            upload.metadata.file_name.as_deref(),
            upload.metadata.content_type.as_deref(),
        );
        state.images.put(&file_name, &upload.contents).await?;
        active.image = Set(Some(image_url(prefix, &file_name)));
        written = Some(file_name);
    }
    active.title = Set(title);

    // The UPDATE is the transaction's first statement, so SQLite takes the
    // write lock before anything is read.
    let saved = async {
        let txn = state.db.begin().await?;
        let model = active.update(&txn).await?;
        txn.commit().await?;
        Ok::<_, DbErr>(model)
    }
    .await;

    // A written file that shares its name with the previous image has already
    // replaced it on disk, so only differently-named files are cleaned up.
    let replaced = written.as_deref() != previous_file.as_deref();
    match saved {
        Ok(model) => {
            if replaced
                && written.is_some()
                && let Some(old) = previous_file
            {
                discard_image(&*state.images, &old).await;
            }
            Ok(Json(model.into()))
        }
        Err(e) => {
            if replaced && let Some(new) = written {
                discard_image(&*state.images, &new).await;
            }
            // `RecordNotUpdated`: the row was deleted after it was looked up.
            Err(match e {
                DbErr::RecordNotUpdated => recipe_not_found(),
                e => e.into(),
            })
        }
    }
}

#[utoipa::path(
    delete,
    path = "/recetas/{id}",
    tag = "Recetas",
    operation_id = "deleteRecipe",
    summary = "Delete a recipe",
    description = "Permanently deletes a recipe, then removes its image file if it has one.",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe deleted", body = DeleteRecipeResponse),
        (status = 400, description = "Malformed ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (CREDENTIALS_MISSING, INVALID_CREDENTIALS)", body = ErrorBody),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("basic" = [])),
)]
#[instrument(skip(state, admin), fields(username = %admin.username))]
pub async fn delete_recipe(
    admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<DeleteRecipeResponse>, AppError> {
    let existing = find_recipe(&state.db, id).await?;

    let result = recipe::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(recipe_not_found());
    }

    if let Some(file_name) = existing
        .image
        .as_deref()
        .and_then(|url| file_name_from_url(&state.config.storage.url_prefix, url))
    {
        discard_image(&*state.images, file_name).await;
    }

    Ok(Json(DeleteRecipeResponse::new(id)))
}

async fn find_recipe<C: ConnectionTrait>(db: &C, id: i32) -> Result<recipe::Model, AppError> {
    recipe::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(recipe_not_found)
}

fn recipe_not_found() -> AppError {
    AppError::NotFound("Receta no encontrada".into())
}

/// Reject oversized uploads before touching the database.
fn check_image_size(len: Option<usize>, images: &dyn ImageStore) -> Result<(), AppError> {
    match len {
        Some(len) if len as u64 > images.max_size() => Err(AppError::Validation(format!(
            "La imagen supera el tamaño máximo de {} bytes",
            images.max_size()
        ))),
        _ => Ok(()),
    }
}

/// Best effort.
async fn discard_image(images: &dyn ImageStore, file_name: &str) {
    if let Err(e) = images.delete(file_name).await {
        tracing::warn!(file_name, error = %e, "Failed to remove image file");
    }
}
