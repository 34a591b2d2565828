//! Formulário de cadastro no terminal.
//!
//! Lê comandos da entrada padrão, um por linha:
//! `name|email|whatsapp <texto>`, `uf <sigla|0>`, `city <nome|0>`,
//! `item <id>`, `map <lat> <lon>`, `show`, `submit`, `quit`.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use ecoleta::form::{ClientConfig, Field, FormHandle, FormSession, FormState, Position, Services};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ecoleta=warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = ClientConfig::from_env()?;
    let services = Services::from_config(&config)?;
    let (session, handle, mut notices) = FormSession::new(services, config.fallback_position);

    let mut running = tokio::spawn(session.run());
    tokio::spawn(async move {
        while let Some(notice) = notices.recv().await {
            println!(">> {notice}");
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            finished = &mut running => {
                let state = finished?;
                print_state(&state);
                return Ok(());
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match dispatch(&handle, line.trim()) {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => println!("!! {e}"),
                }
            }
        }
    }

    drop(handle);
    let state = running.await?;
    print_state(&state);
    Ok(())
}

// Ok(false) encerra o loop de leitura
fn dispatch(handle: &FormHandle, line: &str) -> anyhow::Result<bool> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "" => {}
        "name" | "email" | "whatsapp" => handle.set_field(command.parse::<Field>()?, rest)?,
        "uf" => handle.select_uf(rest)?,
        "city" => handle.select_city(rest)?,
        "item" => handle.toggle_item(rest.parse()?)?,
        "map" => {
            let (lat, lon) = rest
                .split_once(' ')
                .ok_or_else(|| anyhow::anyhow!("uso: map <lat> <lon>"))?;
            handle.click_map(Position::new(lat.trim().parse()?, lon.trim().parse()?))?;
        }
        "show" => print_state(&handle.snapshot()),
        "submit" => handle.submit()?,
        "quit" => return Ok(false),
        other => anyhow::bail!("comando desconhecido: {other}"),
    }
    Ok(true)
}

fn print_state(state: &FormState) {
    let center = state.map_center();
    let position = state.selected_position();
    println!("centro do mapa: ({}, {})", center.latitude, center.longitude);
    println!("UFs: {}", state.ufs().join(" "));
    println!(
        "UF: {}  cidade: {}",
        state.selected_uf().unwrap_or("-"),
        state.selected_city().unwrap_or("-")
    );
    println!("cidades: {}", state.cities().len());
    for item in state.items() {
        let mark = if state.is_selected(item.id) { "x" } else { " " };
        println!("[{mark}] {} {}", item.id, item.title);
    }
    println!("marcador: ({}, {})", position.latitude, position.longitude);
    println!("envio: {:?}", state.submission());
}
