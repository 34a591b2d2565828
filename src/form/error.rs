use thiserror::Error;

// Falhas do lado do formulário. Todas são "folha": sem retry, sem sucesso parcial.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error("Consulta de localidades falhou: {0}")]
    UpstreamLookupFailed(String),

    #[error("Falha ao cadastrar o ponto de coleta: {0}")]
    SubmissionFailed(String),

    #[error("Localização indisponível: {0}")]
    GeolocationUnavailable(String),

    // O backend respondeu 5xx ao listar os itens
    #[error("Catálogo de itens indisponível: {0}")]
    StorageUnavailable(String),

    #[error("A sessão do formulário já foi encerrada")]
    SessionClosed,
}
