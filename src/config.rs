// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{CatalogRepository, MovementRepository, OpnameRepository, StockRepository, UserRepository},
    services::{AuthService, CatalogService, MovementService, OpnameService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub movement_service: MovementService,
    pub opname_service: OpnameService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, jwt_secret))
    }

    /// Monta o gráfico de dependências a partir de uma pool já criada
    /// (também usado pelos testes de integração).
    pub fn from_pool(db_pool: PgPool, jwt_secret: String) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let stock_repo = StockRepository::new(db_pool.clone());
        let movement_repo = MovementRepository::new(db_pool.clone());
        let opname_repo = OpnameRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret);
        let catalog_service = CatalogService::new(catalog_repo.clone());
        let movement_service = MovementService::new(
            stock_repo.clone(),
            movement_repo,
            catalog_repo.clone(),
            db_pool.clone(),
        );
        let opname_service = OpnameService::new(
            opname_repo,
            stock_repo,
            catalog_repo,
            movement_service.clone(),
            db_pool.clone(),
        );

        Self {
            db_pool,
            auth_service,
            catalog_service,
            movement_service,
            opname_service,
        }
    }
}
