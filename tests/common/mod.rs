// tests/common/mod.rs
//
// Infraestrutura compartilhada dos testes de integração. Os testes exigem um
// Postgres real: quando DATABASE_URL não está definida, cada teste encerra
// cedo sem falhar, para que `cargo test` continue útil sem banco.

#![allow(dead_code)]

use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use estoque_api::{
    AppState,
    models::{
        auth::User,
        catalog::{Product, Warehouse},
        inventory::{NewStockMovement, StockMovementType},
    },
};

pub struct TestContext {
    pub state: AppState,
    pub user: User,
    pub product: Product,
    pub warehouse_a: Warehouse,
    pub warehouse_b: Warehouse,
}

/// Sobe a aplicação contra o banco de DATABASE_URL e semeia um usuário, um
/// produto e dois armazéns, todos com nomes únicos para que os testes possam
/// rodar em paralelo no mesmo banco.
pub async fn setup() -> Option<TestContext> {
    dotenvy::dotenv().ok();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL não definida; teste de integração ignorado.");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Falha ao conectar ao banco de testes");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Falha ao rodar as migrações no banco de testes");

    let state = AppState::from_pool(pool, "segredo-de-teste".to_string());

    let suffix = Uuid::new_v4().simple().to_string();
    let token = state
        .auth_service
        .register_user(
            "Usuário de Teste",
            &format!("teste-{suffix}@exemplo.com"),
            "senha123",
        )
        .await
        .expect("Falha ao registrar o usuário de teste");
    let user = state
        .auth_service
        .validate_token(&token)
        .await
        .expect("Token recém-emitido deveria ser válido");

    let product = new_product(&state, &format!("Produto {suffix}")).await;

    let warehouse_a = new_warehouse(&state, &format!("Armazém A {suffix}")).await;
    let warehouse_b = new_warehouse(&state, &format!("Armazém B {suffix}")).await;

    Some(TestContext {
        state,
        user,
        product,
        warehouse_a,
        warehouse_b,
    })
}

pub async fn new_product(state: &AppState, name: &str) -> Product {
    state
        .catalog_service
        .create_product(
            name,
            &format!("SKU-{}", Uuid::new_v4().simple()),
            rust_decimal::Decimal::new(1990, 2),
        )
        .await
        .expect("Falha ao criar o produto de teste")
}

pub async fn new_warehouse(state: &AppState, name: &str) -> Warehouse {
    state
        .catalog_service
        .create_warehouse(name, None)
        .await
        .expect("Falha ao criar o armazém de teste")
}

/// Monta uma movimentação com os campos opcionais zerados.
pub fn movement(
    product_id: Uuid,
    movement_type: StockMovementType,
    quantity: i64,
    from_warehouse_id: Option<Uuid>,
    to_warehouse_id: Option<Uuid>,
    created_by: Uuid,
) -> NewStockMovement {
    NewStockMovement {
        product_id,
        movement_type,
        quantity,
        from_warehouse_id,
        to_warehouse_id,
        reference_id: None,
        notes: None,
        created_by: Some(created_by),
    }
}

impl TestContext {
    /// Saldo atual do produto semeado no armazém dado (0 quando não há linha).
    pub async fn balance(&self, warehouse_id: Uuid) -> i64 {
        self.state
            .movement_service
            .balances_by_product(self.product.id)
            .await
            .expect("Falha ao consultar saldos")
            .into_iter()
            .find(|row| row.warehouse_id == warehouse_id)
            .map(|row| row.quantity)
            .unwrap_or(0)
    }
}
