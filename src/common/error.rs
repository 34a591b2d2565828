use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Erros do backend. Cada variante vira um status HTTP em `status()`.
#[derive(Debug, Error)]
pub enum AppError {
    // A consulta ao banco falhou (conexão, timeout, SQL). Sem retry.
    #[error("Banco de dados indisponível: {0}")]
    StorageUnavailable(#[from] sqlx::Error),

    #[error("Item de coleta inexistente")]
    UnknownItem,

    #[error("Filtro de itens inválido: {0}")]
    InvalidItemFilter(String),

    #[error("Ponto de coleta não encontrado")]
    PointNotFound,

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UnknownItem | AppError::InvalidItemFilter(_) => StatusCode::BAD_REQUEST,
            AppError::PointNotFound => StatusCode::NOT_FOUND,
            AppError::StorageUnavailable(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    // Mensagem pública, sem detalhes internos. "pt" é o padrão.
    fn public_message(&self, lang: &str) -> &'static str {
        let english = lang == "en";
        match self {
            AppError::UnknownItem if english => "One or more items do not exist.",
            AppError::UnknownItem => "Um ou mais itens de coleta não existem.",
            AppError::InvalidItemFilter(_) if english => {
                "The 'items' filter must be a comma-separated list of ids."
            }
            AppError::InvalidItemFilter(_) => {
                "O filtro 'items' deve ser uma lista de ids separados por vírgula."
            }
            AppError::PointNotFound if english => "Collection point not found.",
            AppError::PointNotFound => "Ponto de coleta não encontrado.",
            _ if english => "An unexpected error occurred.",
            _ => "Ocorreu um erro inesperado.",
        }
    }

    /// Converte para a resposta HTTP no idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status();
        if status.is_server_error() {
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            tracing::error!("Erro Interno do Servidor: {}", self);
        }
        ApiError {
            status,
            message: self.public_message(&locale.0).to_string(),
        }
    }
}

// Erro já traduzido, pronto para virar resposta.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

// Sem `Locale` disponível (ex.: fora de um handler), responde em português.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}
