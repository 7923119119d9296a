//! Tailor account payloads and dashboard types

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Tailor (shop) registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TailorRegister {
    #[validate(length(min = 1, max = 200))]
    pub shop_name: String,
    #[validate(length(min = 1, max = 200))]
    pub owner_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub address: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TailorLogin {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Dashboard statistics for one tailor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub total_orders: i64,
    pub active_orders: i64,
    pub completed_orders: i64,
    pub total_revenue: f64,
    pub rating: f64,
}
