// src/db/catalog_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{Product, Warehouse},
};

// Repositório do catálogo: produtos e armazéns. Operações simples de uma
// tabela só; as leituras de existência também são usadas pelos serviços de
// movimentação/opname antes de qualquer mutação de saldo.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Produtos
    // ---

    pub async fn create_product(
        &self,
        name: &str,
        sku: &str,
        price: Decimal,
    ) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, sku, price) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(name)
        .bind(sku)
        .bind(price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::DuplicateEntry("products_sku_key".into());
                }
            }
            e.into()
        })
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let products =
            sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(products)
    }

    pub async fn find_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    // Atualização parcial via COALESCE: campo nulo mantém o valor atual.
    pub async fn update_product(
        &self,
        id: Uuid,
        name: Option<&str>,
        sku: Option<&str>,
        price: Option<Decimal>,
    ) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                sku = COALESCE($3, sku),
                price = COALESCE($4, price),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(sku)
        .bind(price)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::DuplicateEntry("products_sku_key".into());
                }
            }
            e.into()
        })
    }

    pub async fn delete_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>("DELETE FROM products WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::ResourceInUse;
                    }
                }
                e.into()
            })
    }

    /// Checagem barata de existência, usável dentro de uma transação.
    pub async fn product_exists<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
                .bind(id)
                .fetch_one(executor)
                .await?;
        Ok(exists.0)
    }

    // ---
    // Armazéns
    // ---

    pub async fn create_warehouse(
        &self,
        name: &str,
        location: Option<&str>,
    ) -> Result<Warehouse, AppError> {
        let warehouse = sqlx::query_as::<_, Warehouse>(
            "INSERT INTO warehouses (name, location) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(location)
        .fetch_one(&self.pool)
        .await?;
        Ok(warehouse)
    }

    pub async fn list_warehouses(&self) -> Result<Vec<Warehouse>, AppError> {
        let warehouses =
            sqlx::query_as::<_, Warehouse>("SELECT * FROM warehouses ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(warehouses)
    }

    pub async fn find_warehouse(&self, id: Uuid) -> Result<Option<Warehouse>, AppError> {
        let warehouse =
            sqlx::query_as::<_, Warehouse>("SELECT * FROM warehouses WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(warehouse)
    }

    pub async fn update_warehouse(
        &self,
        id: Uuid,
        name: Option<&str>,
        location: Option<&str>,
    ) -> Result<Option<Warehouse>, AppError> {
        let warehouse = sqlx::query_as::<_, Warehouse>(
            r#"
            UPDATE warehouses SET
                name = COALESCE($2, name),
                location = COALESCE($3, location)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(location)
        .fetch_optional(&self.pool)
        .await?;
        Ok(warehouse)
    }

    pub async fn delete_warehouse(&self, id: Uuid) -> Result<Option<Warehouse>, AppError> {
        sqlx::query_as::<_, Warehouse>("DELETE FROM warehouses WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::ResourceInUse;
                    }
                }
                e.into()
            })
    }

    pub async fn warehouse_exists<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM warehouses WHERE id = $1)")
                .bind(id)
                .fetch_one(executor)
                .await?;
        Ok(exists.0)
    }
}
