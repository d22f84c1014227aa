// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- Autenticação ---
    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    // --- Catálogo ---
    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Armazém não encontrado")]
    WarehouseNotFound,

    #[error("Registro possui vínculos e não pode ser removido")]
    ResourceInUse,

    // --- Livro-razão / saldo ---
    #[error("Movimentação não encontrada")]
    MovementNotFound,

    #[error("Movimentação inválida: {0}")]
    InvalidMovementType(String),

    #[error("Estoque insuficiente (disponível: {available}, solicitado: {requested})")]
    InsufficientStock { available: i64, requested: i64 },

    // --- Stock opname ---
    #[error("Stock opname não encontrado")]
    OpnameNotFound,

    #[error("Transição de estado inválida: {0}")]
    InvalidState(String),

    #[error("Não foi possível gerar um número de referência único")]
    ReferenceNumberCollision,

    // Violação de chave única que nenhum repositório traduziu para algo
    // mais específico.
    #[error("Registro duplicado (restrição: {0})")]
    DuplicateEntry(String),

    // Contenção/timeout do banco. Seguro repetir a requisição.
    #[error("Conflito transitório no banco de dados")]
    Transient,

    #[error("Erro de banco de dados")]
    DatabaseError(sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// Classifica os erros do sqlx antes de cair no caso genérico:
// SQLSTATEs de contenção viram `Transient` (o chamador pode repetir) e
// violações de unicidade viram `DuplicateEntry`.
impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if let Some(code) = db_err.code() {
                // 40001 = serialization_failure, 40P01 = deadlock_detected,
                // 55P03 = lock_not_available
                if code == "40001" || code == "40P01" || code == "55P03" {
                    return AppError::Transient;
                }
            }
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("desconhecida").to_string();
                return AppError::DuplicateEntry(constraint);
            }
        }
        AppError::DatabaseError(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error_message) = match &self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "code": "VALIDATION_ERROR",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::EmailAlreadyExists => (
                StatusCode::CONFLICT,
                "DUPLICATE_ENTRY",
                "Este e-mail já está em uso.".to_string(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "E-mail ou senha inválidos.".to_string(),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::UserNotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Usuário não encontrado.".to_string(),
            ),
            AppError::ProductNotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Produto não encontrado.".to_string(),
            ),
            AppError::WarehouseNotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Armazém não encontrado.".to_string(),
            ),
            AppError::MovementNotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Movimentação não encontrada.".to_string(),
            ),
            AppError::OpnameNotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Stock opname não encontrado.".to_string(),
            ),
            AppError::ResourceInUse => (
                StatusCode::CONFLICT,
                "RESOURCE_IN_USE",
                "Registro possui vínculos e não pode ser removido.".to_string(),
            ),
            AppError::InvalidMovementType(msg) => (
                StatusCode::BAD_REQUEST,
                "INVALID_MOVEMENT_TYPE",
                msg.clone(),
            ),
            AppError::InsufficientStock { available, requested } => (
                StatusCode::CONFLICT,
                "INSUFFICIENT_STOCK",
                format!(
                    "Estoque insuficiente: disponível {available}, solicitado {requested}."
                ),
            ),
            AppError::InvalidState(msg) => {
                (StatusCode::CONFLICT, "INVALID_STATE", msg.clone())
            }
            AppError::ReferenceNumberCollision => (
                StatusCode::CONFLICT,
                "DUPLICATE_ENTRY",
                "Não foi possível gerar um número de referência único. Tente novamente.".to_string(),
            ),
            AppError::DuplicateEntry(_) => (
                StatusCode::CONFLICT,
                "DUPLICATE_ENTRY",
                "Registro duplicado.".to_string(),
            ),
            AppError::Transient => (
                StatusCode::SERVICE_UNAVAILABLE,
                "TRANSIENT",
                "Conflito temporário ao acessar o banco de dados. Tente novamente.".to_string(),
            ),

            // Todos os outros viram 500. O `tracing` loga a mensagem
            // detalhada que o `thiserror` nos deu.
            e => {
                tracing::error!("Erro Interno do Servidor: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message, "code": code }));
        (status, body).into_response()
    }
}
