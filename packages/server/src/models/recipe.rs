use axum::body::Bytes;
use axum_typed_multipart::{FieldData, TryFromMultipart};
use serde::{Deserialize, Serialize};

use crate::entity::recipe;
use crate::error::AppError;

/// Multipart form accepted by create and update.
#[derive(TryFromMultipart)]
pub struct RecipeForm {
    #[form_data(field_name = "titulo")]
    pub title: String,
    #[form_data(field_name = "ingredientes")]
    pub ingredients: String,
    #[form_data(field_name = "pasos")]
    pub steps: String,
    #[form_data(field_name = "imagen", limit = "unlimited")]
    pub image: Option<FieldData<Bytes>>,
}

/// A recipe as returned by the API.
#[derive(Serialize, Deserialize, Debug, PartialEq, utoipa::ToSchema)]
pub struct RecipeResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[serde(rename = "titulo")]
    #[schema(example = "Tarta")]
    pub title: String,
    #[serde(rename = "ingredientes")]
    #[schema(example = "harina,huevo")]
    pub ingredients: String,
    #[serde(rename = "pasos")]
    #[schema(example = "mezclar y hornear")]
    pub steps: String,
    /// URL path of the image, or `null` when the recipe has none.
    #[serde(rename = "imagen")]
    #[schema(example = "/static/Tarta_1.png")]
    pub image: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, utoipa::ToSchema)]
pub struct DeleteRecipeResponse {
    #[serde(rename = "mensaje")]
    #[schema(example = "Receta con ID 1 eliminada correctamente")]
    pub message: String,
}

impl DeleteRecipeResponse {
    pub fn new(id: i32) -> Self {
        Self {
            message: format!("Receta con ID {id} eliminada correctamente"),
        }
    }
}

impl From<recipe::Model> for RecipeResponse {
    fn from(m: recipe::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            ingredients: m.ingredients,
            steps: m.steps,
            image: m.image,
        }
    }
}

/// Validate a trimmed title (1-256 Unicode characters).
pub fn validate_title(title: &str) -> Result<(), AppError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 256 {
        return Err(AppError::Validation(
            "El título debe tener entre 1 y 256 caracteres".into(),
        ));
    }
    Ok(())
}

pub fn validate_recipe_form(form: &RecipeForm) -> Result<(), AppError> {
    validate_title(&form.title)
}

/// The uploaded image, if any. Browsers submit a nameless, empty file part
/// when no file was chosen; that part counts as absent.
pub fn uploaded_image(field: Option<FieldData<Bytes>>) -> Option<FieldData<Bytes>> {
    field.filter(|f| {
        let unnamed = f.metadata.file_name.as_deref().is_none_or(str::is_empty);
        !(unnamed && f.contents.is_empty())
    })
}
