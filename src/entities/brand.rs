use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entities::image::ImageSet;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "brands")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub variant: Variant,
    pub images: ImageSet,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    enum_name = "variant_enum",
    db_type = "String(StringLen::N(255))",
    rs_type = "String"
)]
pub enum Variant {
    #[default]
    #[sea_orm(string_value = "Local")]
    Local,
    #[sea_orm(string_value = "International")]
    International,
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Local" => Ok(Self::Local),
            "International" => Ok(Self::International),
            _ => Err(format!("Invalid brand variant: {}", s)),
        }
    }
}
