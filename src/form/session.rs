// src/form/session.rs

use std::{ops::ControlFlow, sync::Arc};

use tokio::sync::{mpsc, watch};

use crate::form::{
    api::{BackendClient, PointsApi},
    config::ClientConfig,
    error::ClientError,
    geolocation::{ConfiguredGeolocator, Geolocator},
    http,
    localities::{IbgeClient, LocalityLookup},
    state::{Command, Field, FormState, Message, Notice, Position},
};

/// Os colaboradores externos do formulário.
#[derive(Clone)]
pub struct Services {
    pub geolocator: Arc<dyn Geolocator>,
    pub api: Arc<dyn PointsApi>,
    pub localities: Arc<dyn LocalityLookup>,
}

impl Services {
    /// Clientes reais (backend + IBGE) compartilhando um `reqwest::Client`.
    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        let http = http::build_client(config.timeout)?;
        Ok(Self {
            geolocator: Arc::new(ConfiguredGeolocator(config.device_position)),
            api: Arc::new(BackendClient::new(http.clone(), &config.api_url)),
            localities: Arc::new(IbgeClient::new(http, &config.states_url)),
        })
    }
}

/// Dono do `FormState`. Aplica uma mensagem por vez e executa os comandos
/// resultantes em tasks que devolvem o resultado como nova mensagem.
pub struct FormSession {
    state: FormState,
    services: Services,
    inbox: mpsc::UnboundedReceiver<Message>,
    // Fraco: a sessão sozinha não mantém o canal aberto
    outbox: mpsc::WeakUnboundedSender<Message>,
    notices: mpsc::UnboundedSender<Notice>,
    snapshots: watch::Sender<FormState>,
}

/// Lado da interface: envia ações do usuário e lê snapshots do estado.
#[derive(Clone)]
pub struct FormHandle {
    messages: mpsc::UnboundedSender<Message>,
    snapshots: watch::Receiver<FormState>,
}

impl FormSession {
    pub fn new(
        services: Services,
        fallback_position: Position,
    ) -> (Self, FormHandle, mpsc::UnboundedReceiver<Notice>) {
        let state = FormState::new(fallback_position);
        let (tx, inbox) = mpsc::unbounded_channel();
        let (notices, notice_rx) = mpsc::unbounded_channel();
        let (snapshots, snapshot_rx) = watch::channel(state.clone());

        let session = Self {
            state,
            services,
            inbox,
            outbox: tx.downgrade(),
            notices,
            snapshots,
        };
        let handle = FormHandle {
            messages: tx,
            snapshots: snapshot_rx,
        };
        (session, handle, notice_rx)
    }

    /// Roda até o usuário voltar para a home (cadastro ok) ou até todos os
    /// handles sumirem sem nenhuma requisição em andamento.
    pub async fn run(mut self) -> FormState {
        let mount = self.state.mount();
        tracing::debug!("Montando formulário de cadastro");

        if self.execute(mount).is_continue() {
            while let Some(message) = self.inbox.recv().await {
                let commands = self.state.apply(message);
                self.snapshots.send_replace(self.state.clone());
                if self.execute(commands).is_break() {
                    break;
                }
            }
        }

        self.state
    }

    fn execute(&self, commands: Vec<Command>) -> ControlFlow<()> {
        for command in commands {
            match command {
                Command::Notify(notice) => {
                    tracing::info!(%notice, "Aviso ao usuário");
                    // Ninguém ouvindo avisos não é erro
                    let _ = self.notices.send(notice);
                }
                Command::NavigateHome => {
                    tracing::info!("Voltando para a tela inicial");
                    return ControlFlow::Break(());
                }
                effect => self.spawn(effect),
            }
        }
        ControlFlow::Continue(())
    }

    fn spawn(&self, effect: Command) {
        let Some(outbox) = self.outbox.upgrade() else {
            tracing::debug!("Sessão sem handles, efeito ignorado");
            return;
        };
        let services = self.services.clone();
        tokio::spawn(async move {
            if let Some(message) = perform(&services, effect).await {
                // A sessão pode já ter terminado
                let _ = outbox.send(message);
            }
        });
    }
}

async fn perform(services: &Services, effect: Command) -> Option<Message> {
    let message = match effect {
        Command::Locate => Message::PositionResolved(services.geolocator.current_position().await),
        Command::FetchItems => Message::ItemsLoaded(services.api.list_items().await),
        Command::FetchUfs => Message::UfsLoaded(services.localities.states().await),
        Command::FetchCities { request, uf } => Message::CitiesLoaded {
            request,
            result: services.localities.cities(&uf).await,
        },
        Command::CreatePoint(request) => {
            Message::SubmitFinished(services.api.create_point(&request).await)
        }
        Command::Notify(_) | Command::NavigateHome => return None,
    };
    Some(message)
}

impl FormHandle {
    fn send(&self, message: Message) -> Result<(), ClientError> {
        self.messages
            .send(message)
            .map_err(|_| ClientError::SessionClosed)
    }

    pub fn set_field(&self, field: Field, value: impl Into<String>) -> Result<(), ClientError> {
        self.send(Message::FieldChanged {
            field,
            value: value.into(),
        })
    }

    pub fn select_uf(&self, uf: impl Into<String>) -> Result<(), ClientError> {
        self.send(Message::UfSelected(uf.into()))
    }

    pub fn select_city(&self, city: impl Into<String>) -> Result<(), ClientError> {
        self.send(Message::CitySelected(city.into()))
    }

    pub fn toggle_item(&self, id: i32) -> Result<(), ClientError> {
        self.send(Message::ItemToggled(id))
    }

    pub fn click_map(&self, position: Position) -> Result<(), ClientError> {
        self.send(Message::MapClicked(position))
    }

    pub fn submit(&self) -> Result<(), ClientError> {
        self.send(Message::Submit)
    }

    /// Cópia do estado após a última mensagem aplicada.
    pub fn snapshot(&self) -> FormState {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.snapshots.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        form::state::{PointCreationRequest, Remote, Submission},
        models::item::ItemView,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    struct FakeGeo(Result<Position, ClientError>);

    #[async_trait]
    impl Geolocator for FakeGeo {
        async fn current_position(&self) -> Result<Position, ClientError> {
            self.0.clone()
        }
    }

    struct FakeApi {
        items: Result<Vec<ItemView>, ClientError>,
        reject: bool,
        submitted: Mutex<Vec<PointCreationRequest>>,
    }

    #[async_trait]
    impl PointsApi for FakeApi {
        async fn list_items(&self) -> Result<Vec<ItemView>, ClientError> {
            self.items.clone()
        }

        async fn create_point(&self, request: &PointCreationRequest) -> Result<(), ClientError> {
            self.submitted.lock().unwrap().push(request.clone());
            if self.reject {
                Err(ClientError::SubmissionFailed("HTTP 500".into()))
            } else {
                Ok(())
            }
        }
    }

    struct FakeLocalities {
        states: Result<Vec<String>, ClientError>,
        city_calls: Mutex<Vec<String>>,
        // Segura a resposta de SP até ser liberada
        sp_gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl LocalityLookup for FakeLocalities {
        async fn states(&self) -> Result<Vec<String>, ClientError> {
            self.states.clone()
        }

        async fn cities(&self, uf: &str) -> Result<Vec<String>, ClientError> {
            self.city_calls.lock().unwrap().push(uf.to_string());
            if uf == "SP" {
                if let Some(gate) = &self.sp_gate {
                    gate.notified().await;
                }
            }
            Ok(vec![format!("Capital de {uf}")])
        }
    }

    fn item(id: i32) -> ItemView {
        ItemView {
            id,
            title: format!("Item {id}"),
            image_url: format!("http://img.test/uploads/{id}.svg"),
        }
    }

    fn localities(sp_gate: Option<Arc<Notify>>) -> Arc<FakeLocalities> {
        Arc::new(FakeLocalities {
            states: Ok(vec!["SP".into(), "RJ".into()]),
            city_calls: Mutex::new(Vec::new()),
            sp_gate,
        })
    }

    fn api(reject: bool) -> Arc<FakeApi> {
        Arc::new(FakeApi {
            items: Ok(vec![item(3), item(7)]),
            reject,
            submitted: Mutex::new(Vec::new()),
        })
    }

    fn services(api: Arc<FakeApi>, localities: Arc<FakeLocalities>) -> Services {
        Services {
            geolocator: Arc::new(FakeGeo(Ok(Position::new(-23.5, -46.6)))),
            api,
            localities,
        }
    }

    #[tokio::test]
    async fn mount_sources_fail_independently() {
        let services = Services {
            geolocator: Arc::new(FakeGeo(Err(ClientError::GeolocationUnavailable("negado".into())))),
            api: api(false),
            localities: Arc::new(FakeLocalities {
                states: Err(ClientError::UpstreamLookupFailed("HTTP 503".into())),
                city_calls: Mutex::new(Vec::new()),
                sp_gate: None,
            }),
        };
        let (session, handle, _notices) = FormSession::new(services, Position::new(-15.8, -47.9));
        let running = tokio::spawn(session.run());

        let mut updates = handle.subscribe();
        updates
            .wait_for(|s| {
                !s.items_status().is_pending()
                    && !s.ufs_status().is_pending()
                    && !s.position_status().is_pending()
            })
            .await
            .unwrap();
        drop(updates);
        drop(handle);

        let state = running.await.unwrap();
        assert_eq!(state.items().len(), 2);
        assert!(state.ufs().is_empty());
        assert!(matches!(state.ufs_status(), Remote::Failed(_)));
        assert_eq!(state.map_center(), Position::new(-15.8, -47.9));
    }

    #[tokio::test]
    async fn stale_city_response_never_overwrites_newer_uf() {
        let gate = Arc::new(Notify::new());
        let localities = localities(Some(gate.clone()));
        let (session, handle, _notices) =
            FormSession::new(services(api(false), localities.clone()), Position::default());
        let running = tokio::spawn(session.run());

        handle.select_uf("SP").unwrap();
        handle.select_uf("RJ").unwrap();

        let mut updates = handle.subscribe();
        updates
            .wait_for(|s| s.cities() == ["Capital de RJ".to_string()])
            .await
            .unwrap();
        drop(updates);

        // Só agora a resposta de SP chega
        gate.notify_one();
        drop(handle);

        let state = running.await.unwrap();
        assert_eq!(state.selected_uf(), Some("RJ"));
        assert_eq!(state.cities(), &["Capital de RJ".to_string()]);
        assert_eq!(*localities.city_calls.lock().unwrap(), vec!["SP", "RJ"]);
    }

    #[tokio::test]
    async fn sentinel_and_repeated_uf_do_not_fetch() {
        let localities = localities(None);
        let (session, handle, _notices) =
            FormSession::new(services(api(false), localities.clone()), Position::default());
        let running = tokio::spawn(session.run());

        handle.select_uf("0").unwrap();
        handle.select_uf("SP").unwrap();
        handle.select_uf("SP").unwrap();
        drop(handle);

        let state = running.await.unwrap();
        assert_eq!(state.selected_uf(), Some("SP"));
        assert_eq!(*localities.city_calls.lock().unwrap(), vec!["SP"]);
    }

    #[tokio::test]
    async fn successful_submit_notifies_and_ends_session() {
        let api = api(false);
        let (session, handle, mut notices) =
            FormSession::new(services(api.clone(), localities(None)), Position::default());
        let running = tokio::spawn(session.run());

        handle.set_field(Field::Name, "Acme").unwrap();
        handle.set_field(Field::Email, "a@b.com").unwrap();
        handle.set_field(Field::Whatsapp, "123").unwrap();
        handle.select_uf("SP").unwrap();
        handle.select_city("São Paulo").unwrap();
        handle.click_map(Position::new(-23.5, -46.6)).unwrap();
        handle.toggle_item(3).unwrap();
        handle.toggle_item(7).unwrap();
        handle.submit().unwrap();

        // Termina mesmo com o handle vivo: navegou para a home
        let state = running.await.unwrap();

        assert_eq!(state.submission(), &Submission::Succeeded);
        assert_eq!(notices.recv().await, Some(Notice::PointCreated));
        assert!(handle.toggle_item(1).is_err());

        let submitted = api.submitted.lock().unwrap();
        assert_eq!(
            *submitted,
            vec![PointCreationRequest {
                name: "Acme".into(),
                email: "a@b.com".into(),
                whatsapp: "123".into(),
                uf: "SP".into(),
                city: "São Paulo".into(),
                latitude: -23.5,
                longitude: -46.6,
                items: vec![3, 7],
            }]
        );
    }

    #[tokio::test]
    async fn failed_submit_is_surfaced_and_form_stays_open() {
        let (session, handle, mut notices) =
            FormSession::new(services(api(true), localities(None)), Position::default());
        let running = tokio::spawn(session.run());

        handle.submit().unwrap();
        let notice = notices.recv().await.unwrap();
        assert_eq!(
            notice,
            Notice::SubmissionFailed(ClientError::SubmissionFailed("HTTP 500".into()))
        );

        // Ainda aceita edições depois da falha
        handle.toggle_item(3).unwrap();
        drop(handle);

        let state = running.await.unwrap();
        assert!(matches!(state.submission(), Submission::Failed(_)));
        assert_eq!(state.selected_items(), &[3]);
    }
}
