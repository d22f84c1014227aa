// src/lib.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, patch, post},
};

// Declaração dos nossos módulos
pub mod common;
pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use crate::config::AppState;
use crate::middleware::auth::auth_guard;

/// Monta o router completo da API. Separado do `main` para que os testes
/// de integração possam subir a mesma aplicação.
pub fn build_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let product_routes = Router::new()
        .route(
            "/",
            post(handlers::products::create_product).get(handlers::products::list_products),
        )
        .route(
            "/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let warehouse_routes = Router::new()
        .route(
            "/",
            post(handlers::warehouses::create_warehouse).get(handlers::warehouses::list_warehouses),
        )
        .route(
            "/{id}",
            get(handlers::warehouses::get_warehouse)
                .put(handlers::warehouses::update_warehouse)
                .delete(handlers::warehouses::delete_warehouse),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let inventory_routes = Router::new()
        .route(
            "/movements",
            post(handlers::inventory::create_movement).get(handlers::inventory::list_movements),
        )
        .route("/movements/{id}", get(handlers::inventory::get_movement))
        .route(
            "/balances/product/{id}",
            get(handlers::inventory::balances_by_product),
        )
        .route(
            "/balances/warehouse/{id}",
            get(handlers::inventory::balances_by_warehouse),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let opname_routes = Router::new()
        .route(
            "/",
            post(handlers::opnames::create_opname).get(handlers::opnames::list_opnames),
        )
        .route("/{id}", get(handlers::opnames::get_opname))
        .route("/{id}/status", patch(handlers::opnames::set_opname_status))
        .route("/{id}/process", post(handlers::opnames::process_opname))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/products", product_routes)
        .nest("/api/warehouses", warehouse_routes)
        .nest("/api/inventory", inventory_routes)
        .nest("/api/stock-opnames", opname_routes)
        .with_state(app_state)
}
