use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use crate::entities::user::Entity as User;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: Status,
    pub date_ordered: DateTimeUtc,
    pub payment: Option<Payment>,
    pub shipping: Option<ShippingInfo>,
    pub order_items: OrderItems,
    pub items_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
    pub delivered_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "User",
        from = "Column::UserId",
        to = "crate::entities::user::Column::Id"
    )]
    User,
}

impl Related<User> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    enum_name = "status_enum",
    db_type = "String(StringLen::N(255))",
    rs_type = "String"
)]
pub enum Status {
    #[default]
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Completed")]
    Completed,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

impl Status {
    /// Completed and Cancelled are terminal, Pending is the only state
    /// transitions start from.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Completed" => Ok(Self::Completed),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        };
        write!(f, "{}", name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Payment {
    pub method: PaymentMethod,
    pub card: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "Card Payment")]
    CardPayment,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, Validate)]
pub struct ShippingInfo {
    #[validate(length(min = 1, message = "address1 is required"))]
    pub address1: String,
    #[validate(length(min = 1, message = "address2 is required"))]
    pub address2: String,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "zip is required"))]
    pub zip: String,
    #[validate(length(min = 1, message = "country is required"))]
    pub country: String,
}

/// Denormalized snapshot of a product's display data at order time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct OrderItem {
    pub product_name: String,
    pub brand_id: Uuid,
    pub product_kind: String,
    pub quantity: i32,
    pub images: Vec<String>,
    pub price: f64,
    pub product_id: Uuid,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct OrderItems(pub Vec<OrderItem>);

impl OrderItems {
    pub fn references(&self, product_id: Uuid) -> bool {
        self.0.iter().any(|item| item.product_id == product_id)
    }
}
