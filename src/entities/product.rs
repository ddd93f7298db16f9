use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

use crate::entities::brand::Entity as Brand;
use crate::entities::image::ImageSet;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub brand_id: Uuid,
    pub kind: ProductKind,
    pub price: f64,
    /// Stock on hand. The legacy store kept a list of lot quantities but only
    /// ever read and wrote the first element, so this is an explicit scalar now.
    pub stock: i32,
    pub images: ImageSet,
    pub wishlist: Wishlist,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Brand",
        from = "Column::BrandId",
        to = "crate::entities::brand::Column::Id"
    )]
    Brand,
}

impl Related<Brand> for Entity {
    fn to() -> RelationDef {
        Relation::Brand.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    enum_name = "product_kind_enum",
    db_type = "String(StringLen::N(255))",
    rs_type = "String"
)]
pub enum ProductKind {
    #[sea_orm(string_value = "Door Accessories")]
    #[serde(rename = "Door Accessories")]
    DoorAccessories,
    #[sea_orm(string_value = "Machinery Equipment")]
    #[serde(rename = "Machinery Equipment")]
    MachineryEquipment,
    #[sea_orm(string_value = "Hand Tools")]
    #[serde(rename = "Hand Tools")]
    HandTools,
    #[sea_orm(string_value = "Safety and Security")]
    #[serde(rename = "Safety and Security")]
    SafetyAndSecurity,
    #[sea_orm(string_value = "Power Tools")]
    #[serde(rename = "Power Tools")]
    PowerTools,
    #[sea_orm(string_value = "Painting")]
    Painting,
    #[sea_orm(string_value = "Electrical")]
    Electrical,
    #[sea_orm(string_value = "Lighting")]
    Lighting,
    #[sea_orm(string_value = "Building Materials")]
    #[serde(rename = "Building Materials")]
    BuildingMaterials,
}

impl std::str::FromStr for ProductKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Door Accessories" => Ok(Self::DoorAccessories),
            "Machinery Equipment" => Ok(Self::MachineryEquipment),
            "Hand Tools" => Ok(Self::HandTools),
            "Safety and Security" => Ok(Self::SafetyAndSecurity),
            "Power Tools" => Ok(Self::PowerTools),
            "Painting" => Ok(Self::Painting),
            "Electrical" => Ok(Self::Electrical),
            "Lighting" => Ok(Self::Lighting),
            "Building Materials" => Ok(Self::BuildingMaterials),
            _ => Err(format!("Invalid product type: {}", s)),
        }
    }
}

/// Users who saved the product, one entry per user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct WishlistEntry {
    pub user: Uuid,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Wishlist(pub Vec<WishlistEntry>);

impl Wishlist {
    pub fn contains(&self, user: Uuid) -> bool {
        self.0.iter().any(|entry| entry.user == user)
    }
}
