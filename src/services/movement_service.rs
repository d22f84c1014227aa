// src/services/movement_service.rs

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::Paginated},
    db::{CatalogRepository, MovementRepository, StockRepository},
    models::inventory::{
        NewStockMovement, StockByProduct, StockByWarehouse, StockMovement, StockMovementFilters,
    },
};

// O processador de movimentações: valida as regras estruturais do tipo,
// aplica os deltas de saldo e registra a linha do livro-razão, tudo como
// uma única unidade atômica. Saldo e livro nunca divergem.
#[derive(Clone)]
pub struct MovementService {
    stock_repo: StockRepository,
    movement_repo: MovementRepository,
    catalog_repo: CatalogRepository,
    pool: PgPool,
}

impl MovementService {
    pub fn new(
        stock_repo: StockRepository,
        movement_repo: MovementRepository,
        catalog_repo: CatalogRepository,
        pool: PgPool,
    ) -> Self {
        Self { stock_repo, movement_repo, catalog_repo, pool }
    }

    /// Aplica uma movimentação completa: checagens de existência, deltas de
    /// saldo e o registro no livro-razão dentro de uma transação própria.
    pub async fn apply(&self, request: NewStockMovement) -> Result<StockMovement, AppError> {
        // Toda a validação estrutural acontece antes de abrir transação.
        request
            .movement_type
            .validate_route(request.from_warehouse_id, request.to_warehouse_id)?;
        if request.quantity <= 0 {
            return Err(AppError::InvalidMovementType(
                "A quantidade deve ser maior que zero.".into(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        if !self.catalog_repo.product_exists(&mut *tx, request.product_id).await? {
            return Err(AppError::ProductNotFound);
        }
        for warehouse_id in [request.from_warehouse_id, request.to_warehouse_id]
            .into_iter()
            .flatten()
        {
            if !self.catalog_repo.warehouse_exists(&mut *tx, warehouse_id).await? {
                return Err(AppError::WarehouseNotFound);
            }
        }

        let movement = self.apply_in_tx(&mut tx, &request).await?;

        tx.commit().await?;

        tracing::info!(
            movement_id = %movement.id,
            product_id = %movement.product_id,
            "movimentação {:?} de {} aplicada",
            movement.movement_type,
            movement.quantity,
        );

        Ok(movement)
    }

    /// Núcleo do processamento, na transação do chamador. É por aqui que o
    /// OpnameService emite os ajustes do inventário físico, para que todas
    /// as movimentações geradas e a transição de status sejam um único
    /// commit. Pressupõe rota e quantidade já validadas.
    pub(crate) async fn apply_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        request: &NewStockMovement,
    ) -> Result<StockMovement, AppError> {
        let mut deltas = request.movement_type.balance_deltas(
            request.from_warehouse_id,
            request.to_warehouse_id,
            request.quantity,
        );
        // Locks sempre em ordem crescente de armazém, qualquer que seja o
        // sentido da movimentação.
        deltas.sort_by_key(|(warehouse_id, _)| *warehouse_id);

        for (warehouse_id, delta) in deltas {
            // Trava a linha de saldo: a checagem de "tem estoque?" e a
            // escrita acontecem sob o mesmo lock, nunca sobre leitura velha.
            let current = self
                .stock_repo
                .get_for_update(&mut **tx, request.product_id, warehouse_id)
                .await?
                .map(|s| s.quantity)
                .unwrap_or(0);

            if current + delta < 0 {
                return Err(AppError::InsufficientStock {
                    available: current,
                    requested: -delta,
                });
            }

            let applied = self
                .stock_repo
                .apply_delta(&mut **tx, request.product_id, warehouse_id, delta)
                .await?;

            // O upsert só devolve a linha se o resultado não ficar negativo.
            if applied.is_none() {
                return Err(AppError::InsufficientStock {
                    available: current,
                    requested: -delta,
                });
            }
        }

        self.movement_repo.insert(&mut **tx, request).await
    }

    pub async fn get_movement(&self, id: Uuid) -> Result<StockMovement, AppError> {
        self.movement_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::MovementNotFound)
    }

    pub async fn list_movements(
        &self,
        filters: &StockMovementFilters,
        page: i64,
        limit: i64,
    ) -> Result<Paginated<StockMovement>, AppError> {
        let (movements, total) = self.movement_repo.list(filters, page, limit).await?;
        Ok(Paginated::new(movements, page, limit, total))
    }

    pub async fn balances_by_product(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<StockByProduct>, AppError> {
        if !self.catalog_repo.product_exists(&self.pool, product_id).await? {
            return Err(AppError::ProductNotFound);
        }
        self.stock_repo.list_by_product(product_id).await
    }

    pub async fn balances_by_warehouse(
        &self,
        warehouse_id: Uuid,
    ) -> Result<Vec<StockByWarehouse>, AppError> {
        if !self.catalog_repo.warehouse_exists(&self.pool, warehouse_id).await? {
            return Err(AppError::WarehouseNotFound);
        }
        self.stock_repo.list_by_warehouse(warehouse_id).await
    }
}
