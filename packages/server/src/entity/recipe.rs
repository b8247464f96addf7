use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recetas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_name = "titulo")]
    pub title: String,

    #[sea_orm(column_name = "ingredientes", column_type = "Text")]
    pub ingredients: String,

    #[sea_orm(column_name = "pasos", column_type = "Text")]
    pub steps: String,

    /// URL path of the image under the static prefix, e.g. `/static/Tarta_1.png`.
    #[sea_orm(column_name = "imagen")]
    pub image: Option<String>,
}

impl ActiveModelBehavior for ActiveModel {}
