pub mod auth;
pub mod inventory;
pub mod opnames;
pub mod products;
pub mod warehouses;
