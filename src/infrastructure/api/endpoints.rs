//! REST paths of the Verda backend consumed by the client core.

pub const TRIPS: &str = "/api/trips";
pub const PROFILE: &str = "/api/users/profile";
pub const GOAL: &str = "/api/users/goal";
pub const VEHICLE: &str = "/api/users/vehicle";
pub const QUEST_CLAIM: &str = "/api/quests/claim";
pub const PRODUCT_EXCHANGE: &str = "/api/products/exchange";
pub const USER_ME: &str = "/api/users/me";
pub const HEALTH: &str = "/api/health";
