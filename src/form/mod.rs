//! Formulário de cadastro de ponto de coleta.
//!
//! O estado da tela vive em [`FormState`] e só muda por [`Message`]s. A
//! [`FormSession`] é o loop que aplica as mensagens e executa os efeitos
//! (geolocalização, catálogo de itens, UFs/cidades do IBGE, cadastro).

pub mod api;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod http;
pub mod localities;
pub mod session;
pub mod state;

pub use config::ClientConfig;
pub use error::ClientError;
pub use session::{FormHandle, FormSession, Services};
pub use state::{Command, Field, FormState, Message, Notice, PointCreationRequest, Position, UNSET};
