use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::core::app::{App, Session};
use crate::core::config::AppConfig;
use crate::export::{CommandClipboard, CopyOutcome, DirectorySink, NoClipboard};
use crate::form::{Action, Tab};
use crate::payload::Security;
use crate::render::QrRenderer;
use crate::utils::network::{resolve_bind_addr, resolve_port};
use crate::utils::qrcode::render_terminal;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a QR code for a web address
    Url {
        /// The address; https:// is assumed when no scheme is given
        url: String,

        #[command(flatten)]
        style: StyleArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate a QR code that joins a WiFi network
    Wifi {
        /// Network name
        #[arg(long, default_value = "")]
        ssid: String,

        /// Network password (ignored for open networks)
        #[arg(long, default_value = "")]
        password: String,

        /// WPA, WEP or "no password"
        #[arg(long, default_value = "WPA")]
        security: Security,

        #[command(flatten)]
        style: StyleArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Run the web generator
    Serve {
        /// Port to listen on (will find next available port if this one is in use)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address or host name to bind
        #[arg(long)]
        host: Option<String>,

        /// Disable QR code display
        #[arg(long)]
        no_qr: bool,

        /// Open web browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Generate example configuration file
    InitConfig,
}

#[derive(Args, Debug)]
struct StyleArgs {
    /// Module color as #RRGGBB
    #[arg(long)]
    fg: Option<String>,

    /// Background color as #RRGGBB
    #[arg(long)]
    bg: Option<String>,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Directory to save the PNG into
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Do not save a PNG file
    #[arg(long)]
    no_save: bool,

    /// Copy the PNG to the system clipboard
    #[arg(long)]
    copy: bool,

    /// Draw the QR code in the terminal
    #[arg(long)]
    print: bool,
}

impl StyleArgs {
    fn actions(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(fg) = &self.fg {
            actions.push(Action::EditForeground(fg.clone()));
        }
        if let Some(bg) = &self.bg {
            actions.push(Action::EditBackground(bg.clone()));
        }
        actions
    }
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        if let Command::InitConfig = self.command {
            let path = AppConfig::save_example()?;
            println!("Generated example configuration file: {}", path.display());
            return Ok(());
        }

        let mut config = AppConfig::load().unwrap_or_else(|e| {
            info!("Using default configuration ({})", e);
            AppConfig::default()
        });

        match &self.command {
            Command::Url { url, style, output } => {
                let mut actions = vec![Action::SelectTab(Tab::Url), Action::EditUrl(url.clone())];
                actions.extend(style.actions());
                generate(&config, actions, output).await
            }
            Command::Wifi {
                ssid,
                password,
                security,
                style,
                output,
            } => {
                let mut actions = vec![
                    Action::SelectTab(Tab::Wifi),
                    Action::EditSsid(ssid.clone()),
                    Action::SelectSecurity(*security),
                    Action::EditPassword(password.clone()),
                ];
                actions.extend(style.actions());
                generate(&config, actions, output).await
            }
            Command::Serve {
                port,
                host,
                no_qr,
                open,
            } => {
                if let Some(port) = port {
                    config.server.port = *port;
                }
                if let Some(host) = host {
                    config.server.host = host.clone();
                }
                if *no_qr {
                    config.server.qr_code = false;
                }
                if *open {
                    config.server.open_browser = true;
                }

                let port = resolve_port(config.server.port);
                let addr = resolve_bind_addr(&config.server.host, port).await?;
                App::new(addr, config).run().await
            }
            Command::InitConfig => Ok(()),
        }
    }
}

/// Drive a generator session through the form actions, then export.
async fn generate(config: &AppConfig, actions: Vec<Action>, output: &OutputArgs) -> Result<()> {
    let mut session = Session::new(QrRenderer::from(&config.render), config);
    for action in actions {
        session.dispatch(action);
    }
    session.dispatch(Action::Submit);

    let Some(payload) = session.state().payload().cloned() else {
        for error in session.state().errors().iter() {
            eprintln!("{}: {}", error.field, error.message);
        }
        bail!("Invalid input, no QR code generated");
    };

    println!("Payload: {}", payload.data());

    if let Some(e) = session.render_error() {
        bail!("Failed to render QR code: {}", e);
    }

    if output.print {
        println!("{}", render_terminal(payload.data(), config.render.error_correction)?);
    }

    if !output.no_save {
        let directory = match output.out.clone().or_else(|| config.export.directory.clone()) {
            Some(directory) => directory,
            None => std::env::current_dir()?,
        };
        let path = session.request_download(&DirectorySink::new(directory))?;
        println!("Saved {}", path.display());
    }

    if output.copy {
        let outcome = match CommandClipboard::detect() {
            Some(clipboard) => session.request_copy(&clipboard).await,
            None => session.request_copy(&NoClipboard).await,
        };
        match outcome {
            CopyOutcome::Copied => println!("{}", session.copy_label()),
            CopyOutcome::Failed(reason) => bail!("Failed to copy QR code: {}", reason),
        }
    }

    Ok(())
}
