pub mod catalog_repo;
pub mod movement_repo;
pub mod opname_repo;
pub mod stock_repo;
pub mod user_repo;

pub use catalog_repo::CatalogRepository;
pub use movement_repo::MovementRepository;
pub use opname_repo::OpnameRepository;
pub use stock_repo::StockRepository;
pub use user_repo::UserRepository;
