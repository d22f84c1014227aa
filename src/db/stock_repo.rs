// src/db/stock_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{Stock, StockByProduct, StockByWarehouse},
};

// Repositório de saldos ('stocks'). A sequência lock -> checagem -> upsert é
// orquestrada pelo MovementService, sempre dentro de uma única transação.
#[derive(Clone)]
pub struct StockRepository {
    pool: PgPool,
}

impl StockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        warehouse_id: Uuid,
    ) -> Result<Option<Stock>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stock = sqlx::query_as::<_, Stock>(
            "SELECT * FROM stocks WHERE product_id = $1 AND warehouse_id = $2",
        )
        .bind(product_id)
        .bind(warehouse_id)
        .fetch_optional(executor)
        .await?;
        Ok(stock)
    }

    /// Trava a linha de saldo pelo resto da transação. Duas movimentações
    /// concorrentes sobre o mesmo par (produto, armazém) se serializam aqui.
    pub async fn get_for_update<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        warehouse_id: Uuid,
    ) -> Result<Option<Stock>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stock = sqlx::query_as::<_, Stock>(
            "SELECT * FROM stocks WHERE product_id = $1 AND warehouse_id = $2 FOR UPDATE",
        )
        .bind(product_id)
        .bind(warehouse_id)
        .fetch_optional(executor)
        .await?;
        Ok(stock)
    }

    /// Aplica um delta assinado ao saldo. Cria a linha se não existir
    /// (com GREATEST(delta, 0)) e, no UPDATE, só aplica se o resultado não
    /// ficar negativo — nenhum registro retornado significa saldo
    /// insuficiente, e o chamador decide o erro.
    pub async fn apply_delta<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        warehouse_id: Uuid,
        delta: i64,
    ) -> Result<Option<Stock>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stock = sqlx::query_as::<_, Stock>(
            r#"
            INSERT INTO stocks (product_id, warehouse_id, quantity)
            VALUES ($1, $2, GREATEST($3, 0))
            ON CONFLICT (product_id, warehouse_id) DO UPDATE SET
                quantity = stocks.quantity + $3,
                updated_at = NOW()
            WHERE stocks.quantity + $3 >= 0
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(warehouse_id)
        .bind(delta)
        .fetch_optional(executor)
        .await?;
        Ok(stock)
    }

    pub async fn list_by_warehouse(
        &self,
        warehouse_id: Uuid,
    ) -> Result<Vec<StockByWarehouse>, AppError> {
        let stocks = sqlx::query_as::<_, StockByWarehouse>(
            r#"
            SELECT s.id, s.product_id, p.name AS product_name, s.quantity, s.updated_at
            FROM stocks s
            JOIN products p ON p.id = s.product_id
            WHERE s.warehouse_id = $1
            ORDER BY p.name ASC
            "#,
        )
        .bind(warehouse_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(stocks)
    }

    pub async fn list_by_product(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<StockByProduct>, AppError> {
        let stocks = sqlx::query_as::<_, StockByProduct>(
            r#"
            SELECT s.id, s.warehouse_id, w.name AS warehouse_name, s.quantity, s.updated_at
            FROM stocks s
            JOIN warehouses w ON w.id = s.warehouse_id
            WHERE s.product_id = $1
            ORDER BY w.name ASC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(stocks)
    }
}
