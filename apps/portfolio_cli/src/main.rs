use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use contact::{ContactField, ContactForm, EmailJsRelay, MessageRelay, SubmissionOutcome};
use navigator::{NavigationState, Navigator, StackedLayout, Viewport};
use shared::{
    domain::SectionId,
    notification::{Notification, Notifier, Severity},
};
use tracing_subscriber::EnvFilter;
use url::Url;

mod config;

use config::{load_settings, DEFAULT_CONFIG_PATH};

const PAGE_URL: &str = "https://portfolio.local/";

#[derive(Parser, Debug)]
#[command(about = "Drive the portfolio navigation and contact pipeline headlessly")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit the contact form through the configured relay.
    Send {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Report the active section for each scroll offset on a stacked page.
    Scroll {
        #[arg(long, default_value_t = 900.0)]
        section_height: f64,
        #[arg(value_delimiter = ',', required = true)]
        offsets: Vec<f64>,
    },
    /// Click a navigation link and report where the page lands.
    Navigate {
        target: SectionId,
        #[arg(long, default_value_t = 900.0)]
        section_height: f64,
        /// Height of the expanded mobile menu; collapses on click.
        #[arg(long)]
        menu_height: Option<f64>,
    },
}

/// Prints toasts to stdout.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let marker = match notification.severity {
            Severity::Default => "ok",
            Severity::Destructive => "!!",
        };
        println!(
            "[{marker}] {}: {}",
            notification.title, notification.description
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    match args.command {
        Command::Send {
            name,
            email,
            message,
        } => send(&args.config, name, email, message).await,
        Command::Scroll {
            section_height,
            offsets,
        } => {
            for (offset, state) in offsets.iter().zip(scroll(section_height, &offsets)?) {
                println!(
                    "offset={offset} active={} scrolled={}",
                    state.active_section, state.scrolled
                );
            }
            Ok(())
        }
        Command::Navigate {
            target,
            section_height,
            menu_height,
        } => {
            let landing = navigate(target, section_height, menu_height).await?;
            println!(
                "location={} scroll_commands={:?} active={}",
                landing.location, landing.scroll_commands, landing.active_section
            );
            Ok(())
        }
    }
}

async fn send(config: &Path, name: String, email: String, message: String) -> Result<()> {
    let settings = load_settings(config);
    tracing::debug!(?settings, "loaded settings");

    let relay = EmailJsRelay::new(settings.relay_endpoint_url()?, settings.relay.clone());
    let outcome = submit_contact(
        Arc::new(relay),
        Arc::new(ConsoleNotifier),
        &settings.recipient_address,
        [
            (ContactField::Name, name),
            (ContactField::Email, email),
            (ContactField::Message, message),
        ],
    )
    .await;

    match outcome {
        Some(SubmissionOutcome::DispatchSucceeded) => Ok(()),
        Some(outcome) => bail!("contact message not sent: {outcome:?}"),
        None => bail!("a submission is already in flight"),
    }
}

async fn submit_contact(
    relay: Arc<dyn MessageRelay>,
    notifier: Arc<dyn Notifier>,
    recipient_address: &str,
    fields: [(ContactField, String); 3],
) -> Option<SubmissionOutcome> {
    let form = ContactForm::new(relay, notifier, recipient_address);
    for (field, value) in fields {
        form.set_field(field, value);
    }
    form.submit().await
}

fn page(section_height: f64) -> Result<Arc<StackedLayout>> {
    let location = Url::parse(PAGE_URL).context("page url")?;
    Ok(Arc::new(StackedLayout::uniform(location, section_height)))
}

fn scroll(section_height: f64, offsets: &[f64]) -> Result<Vec<NavigationState>> {
    let layout = page(section_height)?;
    let navigator = Navigator::new(Arc::clone(&layout));

    Ok(offsets
        .iter()
        .map(|&offset| {
            layout.scroll_by_user(offset);
            navigator.on_scroll();
            navigator.state()
        })
        .collect())
}

#[derive(Debug)]
struct Landing {
    location: Url,
    scroll_commands: Vec<f64>,
    active_section: SectionId,
}

async fn navigate(
    target: SectionId,
    section_height: f64,
    menu_height: Option<f64>,
) -> Result<Landing> {
    let layout = page(section_height)?;
    let navigator = Navigator::new(Arc::clone(&layout));

    if let Some(menu_height) = menu_height {
        navigator.toggle_menu();
        layout.set_leading_inset(menu_height);
    }

    let pending_scroll = navigator.on_navigate(target);
    // the closed menu no longer pushes content down
    layout.set_leading_inset(0.0);
    pending_scroll.await.context("deferred scroll task")?;

    navigator.on_scroll();
    Ok(Landing {
        location: layout.location(),
        scroll_commands: layout.scroll_commands(),
        active_section: navigator.state().active_section,
    })
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
