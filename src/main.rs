//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use ecoleta::{
    config::{AppState, Settings},
    create_app, db,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG sobrescreve o filtro padrão
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ecoleta=info,tower_http=info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let settings = Settings::from_env()?;

    // A pool é aberta aqui e fechada no fim; ninguém a acessa globalmente.
    let db_pool = db::connect(&settings).await.inspect_err(|e| {
        tracing::error!("🔥 Falha ao conectar ao banco de dados: {:?}", e);
    })?;

    let app_state = AppState::new(db_pool.clone(), &settings);
    let app = create_app(app_state, &settings);

    // Inicia o servidor
    let listener = TcpListener::bind(settings.bind_addr()).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    tracing::info!("🖼️  Imagens servidas em {}/uploads", settings.app_base_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_pool.close().await;
    tracing::info!("Pool do banco fechada, até logo!");
    Ok(())
}

// Ctrl-C ou SIGTERM (docker stop / kubernetes)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Falha ao instalar handler de Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Falha ao instalar handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Sinal de desligamento recebido");
}
