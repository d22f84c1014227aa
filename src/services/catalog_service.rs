// src/services/catalog_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::catalog::{Product, Warehouse},
};

// Regras de negócio (finas) do catálogo. O serviço traduz "não achei" em
// erros específicos; o resto é repasse para o repositório.
#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: CatalogRepository,
}

impl CatalogService {
    pub fn new(catalog_repo: CatalogRepository) -> Self {
        Self { catalog_repo }
    }

    // --- Produtos ---

    pub async fn create_product(
        &self,
        name: &str,
        sku: &str,
        price: Decimal,
    ) -> Result<Product, AppError> {
        self.catalog_repo.create_product(name, sku, price).await
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        self.catalog_repo.list_products().await
    }

    pub async fn get_product(&self, id: Uuid) -> Result<Product, AppError> {
        self.catalog_repo
            .find_product(id)
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    pub async fn update_product(
        &self,
        id: Uuid,
        name: Option<&str>,
        sku: Option<&str>,
        price: Option<Decimal>,
    ) -> Result<Product, AppError> {
        self.catalog_repo
            .update_product(id, name, sku, price)
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    pub async fn delete_product(&self, id: Uuid) -> Result<Product, AppError> {
        self.catalog_repo
            .delete_product(id)
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    // --- Armazéns ---

    pub async fn create_warehouse(
        &self,
        name: &str,
        location: Option<&str>,
    ) -> Result<Warehouse, AppError> {
        self.catalog_repo.create_warehouse(name, location).await
    }

    pub async fn list_warehouses(&self) -> Result<Vec<Warehouse>, AppError> {
        self.catalog_repo.list_warehouses().await
    }

    pub async fn get_warehouse(&self, id: Uuid) -> Result<Warehouse, AppError> {
        self.catalog_repo
            .find_warehouse(id)
            .await?
            .ok_or(AppError::WarehouseNotFound)
    }

    pub async fn update_warehouse(
        &self,
        id: Uuid,
        name: Option<&str>,
        location: Option<&str>,
    ) -> Result<Warehouse, AppError> {
        self.catalog_repo
            .update_warehouse(id, name, location)
            .await?
            .ok_or(AppError::WarehouseNotFound)
    }

    pub async fn delete_warehouse(&self, id: Uuid) -> Result<Warehouse, AppError> {
        self.catalog_repo
            .delete_warehouse(id)
            .await?
            .ok_or(AppError::WarehouseNotFound)
    }
}
