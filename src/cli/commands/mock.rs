use clap::Subcommand;

use crate::cli::OutputFormat;
use crate::mock::{server, MockStore};

#[derive(Subcommand)]
pub enum MockCommands {
    #[command(about = "Serve fixture categories over the backend's HTTP contract")]
    Serve {
        #[arg(long, help = "Port to listen on (defaults to BAKANES_MOCK_PORT or 4000)")]
        port: Option<u16>,
    },
}

pub async fn handle(cmd: MockCommands, _output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        MockCommands::Serve { port } => {
            let config = crate::config::config();
            let port = port.unwrap_or(config.mock.port);
            println!(
                "Mock backend on http://localhost:{}{} (login: {})",
                port,
                server::PROXY_PREFIX,
                config.mock.username
            );
            server::serve(MockStore::with_fixtures(), port).await
        }
    }
}
