pub mod auth;
pub mod catalog_service;
pub mod movement_service;
pub mod opname_service;

pub use auth::AuthService;
pub use catalog_service::CatalogService;
pub use movement_service::MovementService;
pub use opname_service::OpnameService;
