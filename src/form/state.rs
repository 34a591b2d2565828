// src/form/state.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    form::error::ClientError,
    models::{item::ItemView, point::NewPoint},
};

/// Valor do `<select>` que significa "nada escolhido" (UF e cidade).
pub const UNSET: &str = "0";

/// O corpo enviado ao `POST /points`. Mesmo contrato que o backend recebe.
pub type PointCreationRequest = NewPoint;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

// Campos de texto livre do formulário
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Whatsapp,
}

#[derive(Debug, Error)]
#[error("Campo desconhecido: {0}")]
pub struct UnknownField(pub String);

// Mesmo nome do atributo `name` do input
impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Field::Name),
            "email" => Ok(Field::Email),
            "whatsapp" => Ok(Field::Whatsapp),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
}

/// Estado de uma fonte de dados assíncrona.
#[derive(Debug, Clone, PartialEq)]
pub enum Remote<T> {
    Idle,
    Pending,
    Resolved(T),
    Failed(ClientError),
}

impl<T> Remote<T> {
    pub fn resolved(&self) -> Option<&T> {
        match self {
            Remote::Resolved(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Remote::Pending)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Idle,
    InFlight,
    Succeeded,
    Failed(ClientError),
}

// Avisos para o usuário (o `alert` da tela)
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    PointCreated,
    SubmissionFailed(ClientError),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::PointCreated => write!(f, "Ponto de coleta criado"),
            Notice::SubmissionFailed(err) => write!(f, "{err}"),
        }
    }
}

/// Tudo que pode acontecer com o formulário: respostas de fetch e ações do usuário.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    PositionResolved(Result<Position, ClientError>),
    ItemsLoaded(Result<Vec<ItemView>, ClientError>),
    UfsLoaded(Result<Vec<String>, ClientError>),
    CitiesLoaded {
        request: u64,
        result: Result<Vec<String>, ClientError>,
    },
    FieldChanged {
        field: Field,
        value: String,
    },
    // Valor cru do select; UNSET limpa a seleção
    UfSelected(String),
    CitySelected(String),
    ItemToggled(i32),
    MapClicked(Position),
    Submit,
    SubmitFinished(Result<(), ClientError>),
}

/// Efeitos pedidos pelo reducer. Quem executa é a sessão.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Locate,
    FetchItems,
    FetchUfs,
    FetchCities { request: u64, uf: String },
    CreatePoint(PointCreationRequest),
    Notify(Notice),
    NavigateHome,
}

fn selection(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() || value == UNSET {
        None
    } else {
        Some(value.to_string())
    }
}

/// Estado completo da tela de cadastro.
///
/// Só muda via [`FormState::apply`]. A cidade escolhida só vale enquanto a UF
/// que a originou continua selecionada.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    data: FormData,
    items: Remote<Vec<ItemView>>,
    ufs: Remote<Vec<String>>,
    cities: Remote<Vec<String>>,
    initial_position: Remote<Position>,
    selected_uf: Option<String>,
    selected_city: Option<String>,
    selected_position: Position,
    selected_items: Vec<i32>,
    submission: Submission,
    // Token do último pedido de cidades; respostas antigas são descartadas
    city_request: u64,
    fallback_position: Position,
}

impl FormState {
    pub fn new(fallback_position: Position) -> Self {
        Self {
            data: FormData::default(),
            items: Remote::Pending,
            ufs: Remote::Pending,
            cities: Remote::Idle,
            initial_position: Remote::Pending,
            selected_uf: None,
            selected_city: None,
            selected_position: Position::default(),
            selected_items: Vec::new(),
            submission: Submission::Idle,
            city_request: 0,
            fallback_position,
        }
    }

    /// Os três fetches independentes da montagem da tela.
    pub fn mount(&self) -> Vec<Command> {
        vec![Command::Locate, Command::FetchItems, Command::FetchUfs]
    }

    pub fn apply(&mut self, message: Message) -> Vec<Command> {
        match message {
            Message::PositionResolved(Ok(position)) => {
                self.initial_position = Remote::Resolved(position);
                Vec::new()
            }
            Message::PositionResolved(Err(err)) => {
                tracing::warn!("Geolocalização falhou, usando posição padrão: {}", err);
                self.initial_position = Remote::Failed(err);
                Vec::new()
            }
            Message::ItemsLoaded(result) => {
                self.items = settle("itens", result);
                Vec::new()
            }
            Message::UfsLoaded(result) => {
                self.ufs = settle("UFs", result);
                Vec::new()
            }
            Message::CitiesLoaded { request, result } => {
                if request != self.city_request {
                    tracing::debug!(
                        request,
                        latest = self.city_request,
                        "Resposta de cidades obsoleta descartada"
                    );
                    return Vec::new();
                }
                self.cities = settle("cidades", result);
                Vec::new()
            }
            Message::FieldChanged { field, value } => {
                match field {
                    Field::Name => self.data.name = value,
                    Field::Email => self.data.email = value,
                    Field::Whatsapp => self.data.whatsapp = value,
                }
                Vec::new()
            }
            Message::UfSelected(raw) => self.select_uf(selection(&raw)),
            Message::CitySelected(raw) => {
                if self.selected_uf.is_some() {
                    self.selected_city = selection(&raw);
                }
                Vec::new()
            }
            Message::ItemToggled(id) => {
                self.toggle_item(id);
                Vec::new()
            }
            Message::MapClicked(position) => {
                self.selected_position = position;
                Vec::new()
            }
            Message::Submit => {
                self.submission = Submission::InFlight;
                vec![Command::CreatePoint(self.creation_request())]
            }
            Message::SubmitFinished(Ok(())) => {
                self.submission = Submission::Succeeded;
                vec![Command::Notify(Notice::PointCreated), Command::NavigateHome]
            }
            Message::SubmitFinished(Err(err)) => {
                tracing::error!("Cadastro do ponto falhou: {}", err);
                self.submission = Submission::Failed(err.clone());
                vec![Command::Notify(Notice::SubmissionFailed(err))]
            }
        }
    }

    fn select_uf(&mut self, uf: Option<String>) -> Vec<Command> {
        if uf == self.selected_uf {
            return Vec::new();
        }

        // Nova UF: cidade e lista anteriores deixam de valer
        self.selected_uf = uf.clone();
        self.selected_city = None;
        self.city_request += 1;

        match uf {
            Some(uf) => {
                self.cities = Remote::Pending;
                vec![Command::FetchCities {
                    request: self.city_request,
                    uf,
                }]
            }
            None => {
                self.cities = Remote::Idle;
                Vec::new()
            }
        }
    }

    fn toggle_item(&mut self, id: i32) {
        if let Some(index) = self.selected_items.iter().position(|&item| item == id) {
            self.selected_items.remove(index);
        } else {
            self.selected_items.push(id);
        }
    }

    /// Snapshot achatado do formulário, no formato do `POST /points`.
    pub fn creation_request(&self) -> PointCreationRequest {
        PointCreationRequest {
            name: self.data.name.clone(),
            email: self.data.email.clone(),
            whatsapp: self.data.whatsapp.clone(),
            uf: self.selected_uf.clone().unwrap_or_else(|| UNSET.to_string()),
            city: self.selected_city.clone().unwrap_or_else(|| UNSET.to_string()),
            latitude: self.selected_position.latitude,
            longitude: self.selected_position.longitude,
            items: self.selected_items.clone(),
        }
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    /// Itens para os chips. Vazio enquanto carrega ou se o catálogo falhou.
    pub fn items(&self) -> &[ItemView] {
        self.items.resolved().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn ufs(&self) -> &[String] {
        self.ufs.resolved().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn cities(&self) -> &[String] {
        self.cities.resolved().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn items_status(&self) -> &Remote<Vec<ItemView>> {
        &self.items
    }

    pub fn ufs_status(&self) -> &Remote<Vec<String>> {
        &self.ufs
    }

    pub fn cities_status(&self) -> &Remote<Vec<String>> {
        &self.cities
    }

    pub fn position_status(&self) -> &Remote<Position> {
        &self.initial_position
    }

    /// Centro inicial do mapa.
    pub fn map_center(&self) -> Position {
        self.initial_position
            .resolved()
            .copied()
            .unwrap_or(self.fallback_position)
    }

    pub fn selected_uf(&self) -> Option<&str> {
        self.selected_uf.as_deref()
    }

    pub fn selected_city(&self) -> Option<&str> {
        self.selected_city.as_deref()
    }

    pub fn selected_position(&self) -> Position {
        self.selected_position
    }

    pub fn selected_items(&self) -> &[i32] {
        &self.selected_items
    }

    pub fn is_selected(&self, id: i32) -> bool {
        self.selected_items.contains(&id)
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }
}

fn settle<T>(what: &str, result: Result<T, ClientError>) -> Remote<T> {
    match result {
        Ok(value) => Remote::Resolved(value),
        Err(err) => {
            tracing::warn!("Falha ao carregar {}: {}", what, err);
            Remote::Failed(err)
        }
    }
}
