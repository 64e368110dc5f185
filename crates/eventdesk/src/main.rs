//! eventdesk CLI entry point.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use eventdesk::cache::MemoryCache;
use eventdesk::cli::categories::CategoriesAction;
use eventdesk::cli::events::{CreateArgs, EventsAction, UpdateArgs};
use eventdesk::cli::{Cli, Commands, OutputFormat};
use eventdesk::output::json::{EventDetail, ListedEvent};
use eventdesk::output::{format_output, pretty};
use eventdesk::storage::{seed_demo_data, InMemoryStore};
use eventdesk::views::{ManageCategoriesView, ManageEventsView};
use eventdesk::{mutations, AppState, Config};
use eventdesk_client::StoreClient;
use eventdesk_core::category::DeletionVerdict;
use eventdesk_core::event::{CategoryKind, FlyerUpload};
use eventdesk_core::storage::DateRange;
use eventdesk_core::view::{
    Action, CapabilityCheck, CreateWizard, LoadState, Notice, ResourceKind, StaticCapabilities,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventdesk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let state = build_state(&cli, &config).await?;

    match cli.command {
        Commands::Events(events_cmd) => {
            run_events(&state, events_cmd.action, cli.format, cli.quiet).await
        }
        Commands::Committees(cmd) => {
            run_categories(&state, CategoryKind::Meeting, cmd.action, cli.format, cli.quiet).await
        }
        Commands::Categories(cmd) => {
            run_categories(&state, CategoryKind::Event, cmd.action, cli.format, cli.quiet).await
        }
        Commands::Sidebar { month, search } => {
            let mut view = events_view(&state, month).await?;
            view.set_search(search);
            let sidebar = view.sidebar();
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&sidebar, cli.format)),
                OutputFormat::Pretty => println!("{}", pretty::format_sidebar(&sidebar)),
            }
            Ok(())
        }
        Commands::Memberships {
            participant_id,
            committees,
        } => {
            mutations::set_participant_meeting_categories(&state, participant_id, &committees)
                .await?;
            if !cli.quiet {
                println!(
                    "Participant {} now belongs to {} committee(s)",
                    participant_id,
                    committees.len()
                );
            }
            Ok(())
        }
    }
}

/// Builds the application state for the hosted store, or a seeded in-memory one.
async fn build_state(cli: &Cli, config: &Config) -> Result<AppState> {
    let cache = Arc::new(MemoryCache::new(config.cache_max_entries));
    let state = if cli.in_memory {
        let store = Arc::new(InMemoryStore::new());
        seed_demo_data(&store, Local::now().date_naive()).await?;
        tracing::info!("Using seeded in-memory store");
        AppState::new(store, cache, config.freshness())
    } else {
        let (Some(url), Some(api_key)) = (&config.store_url, &config.store_api_key) else {
            bail!("STORE_URL and STORE_API_KEY must be set (or pass --in-memory)");
        };
        let client = StoreClient::new(url, api_key.clone(), config.flyer_bucket.clone())
            .context("invalid STORE_URL")?;
        tracing::info!(url = %url, "Using hosted store");
        AppState::new(Arc::new(client), cache, config.freshness())
    };

    let capabilities = StaticCapabilities::parse(&config.capabilities).map_err(anyhow::Error::msg)?;
    Ok(state
        .with_capabilities(Arc::new(capabilities))
        .with_actor(config.actor.clone()))
}

fn ensure_allowed(state: &AppState, action: Action, resource: ResourceKind) -> Result<()> {
    if !state.capabilities.can(action, resource) {
        bail!("Not allowed to {:?} {:?}", action, resource);
    }
    Ok(())
}

/// Prints a success notice, or turns an error notice into an error.
fn report(notice: Option<Notice>, format: OutputFormat, quiet: bool) -> Result<()> {
    let Some(notice) = notice else {
        return Ok(());
    };
    if notice.is_error() {
        bail!(notice.message);
    }
    match format {
        OutputFormat::Json => println!("{}", format_output(&notice, format)),
        OutputFormat::Pretty if !quiet => println!("{}", notice.message),
        OutputFormat::Pretty => {}
    }
    Ok(())
}

async fn events_view(state: &AppState, month: Option<DateRange>) -> Result<ManageEventsView> {
    let period = month.unwrap_or_else(|| DateRange::month_of(Local::now().date_naive()));
    let mut view = ManageEventsView::new(state.clone(), period);
    view.refresh().await;
    if let LoadState::Failed(message) = view.load_state() {
        bail!("Failed to load events: {}", message);
    }
    Ok(view)
}

fn content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

async fn run_events(
    state: &AppState,
    action: EventsAction,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match action {
        EventsAction::List { month, search } => {
            let mut view = events_view(state, month).await?;
            view.set_search(search);
            let events: Vec<_> = view
                .visible_events()
                .into_iter()
                .map(|e| (e, view.organizer_name(e)))
                .collect();
            match format {
                OutputFormat::Json => {
                    let listed: Vec<ListedEvent> = events
                        .into_iter()
                        .map(|(event, organizer)| ListedEvent { event, organizer })
                        .collect();
                    println!("{}", format_output(&listed, format));
                }
                OutputFormat::Pretty => println!("{}", pretty::format_events(&events)),
            }
        }
        EventsAction::Show { id } => {
            let view = events_view(state, None).await?;
            let event = view
                .event(id)
                .with_context(|| format!("Event {} not found", id))?;
            let organizer = view.organizer_name(event);
            let participants = view.participants_of(event);
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    format_output(
                        &EventDetail {
                            event,
                            organizer,
                            participants: &participants,
                        },
                        format
                    )
                ),
                OutputFormat::Pretty => println!(
                    "{}",
                    pretty::format_event_detail(event, &organizer, &participants)
                ),
            }
        }
        EventsAction::Create(args) => {
            ensure_allowed(state, Action::Create, ResourceKind::Events)?;
            create_events(state, args, format).await?;
        }
        EventsAction::Update(args) => {
            ensure_allowed(state, Action::Update, ResourceKind::Events)?;
            update_event(state, args, format, quiet).await?;
        }
        EventsAction::Delete { id } => {
            ensure_allowed(state, Action::Delete, ResourceKind::Events)?;
            let mut view = events_view(state, None).await?;
            view.delete_event(id).await;
            report(view.take_notice(), format, quiet)?;
        }
        EventsAction::Cancel { id, restore } => {
            ensure_allowed(state, Action::Update, ResourceKind::Events)?;
            mutations::set_event_cancelled(state, id, !restore).await?;
            let message = if restore { "Event restored" } else { "Event cancelled" };
            report(Some(Notice::success(message)), format, quiet)?;
        }
        EventsAction::Notify { id } => {
            let mut view = events_view(state, None).await?;
            view.notify(id).await;
            report(view.take_notice(), format, quiet)?;
        }
    }
    Ok(())
}

async fn create_events(state: &AppState, args: CreateArgs, format: OutputFormat) -> Result<()> {
    let mut wizard = CreateWizard::new(args.draft());
    match args.until {
        Some(until) => {
            wizard
                .schedule
                .add_range(args.date, until, args.start, args.end)?;
        }
        None => wizard.schedule.add(args.date, args.start, args.end)?,
    }
    wizard.participants = args.participants.into_participants();
    if let Some(path) = &args.flyer {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read flyer {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "flyer".to_string());
        wizard.flyer = Some(FlyerUpload::new(file_name, content_type(path), bytes));
    }

    let mut submission = wizard.finish()?;
    if let Some(flyer) = &submission.flyer {
        mutations::attach_flyer(state, &mut submission.draft, flyer).await;
    }
    let events = mutations::create_complex_event(
        state,
        &submission.draft,
        &submission.schedules,
        &submission.participants,
    )
    .await?;

    match format {
        OutputFormat::Json => println!("{}", format_output(&events, format)),
        OutputFormat::Pretty => {
            let organizer = format!("{} organizer(s)", submission.participants.organizer_ids.len());
            let listed: Vec<_> = events.iter().map(|e| (e, organizer.clone())).collect();
            println!("Created:\n{}", pretty::format_events(&listed));
        }
    }
    Ok(())
}

async fn update_event(
    state: &AppState,
    args: UpdateArgs,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let id: Uuid = args.id;
    let mut view = events_view(state, None).await?;
    let form = view
        .open_edit(id)
        .with_context(|| format!("Event {} not found", id))?;
    form.draft = args.apply(form.draft.clone());
    if !args.participants.is_empty() {
        form.participants = args.participants.clone().into_participants();
    }

    view.submit_edit().await;
    report(view.take_notice(), format, quiet)?;
    if let (OutputFormat::Pretty, false, Some(event)) = (format, quiet, view.event(id)) {
        println!("{}", pretty::format_event(event, &view.organizer_name(event)));
    }
    Ok(())
}

async fn run_categories(
    state: &AppState,
    kind: CategoryKind,
    action: CategoriesAction,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let resource = match kind {
        CategoryKind::Meeting => ResourceKind::MeetingCategories,
        CategoryKind::Event => ResourceKind::EventCategories,
    };
    let title = match kind {
        CategoryKind::Meeting => "Committees",
        CategoryKind::Event => "Categories",
    };
    let mut view = ManageCategoriesView::new(state.clone(), kind);
    view.refresh().await;
    if let LoadState::Failed(message) = view.load_state() {
        bail!("Failed to load {}: {}", title.to_lowercase(), message);
    }

    match action {
        CategoriesAction::List { search } => {
            view.set_search(search);
            let rows = view.rows();
            match format {
                OutputFormat::Json => println!("{}", format_output(&rows, format)),
                OutputFormat::Pretty => println!("{}", pretty::format_category_rows(title, &rows)),
            }
        }
        CategoriesAction::Create { name } => {
            ensure_allowed(state, Action::Create, resource)?;
            view.open_create();
            view.submit(&name).await;
            report(view.take_notice(), format, quiet)?;
        }
        CategoriesAction::Rename { id, name } => {
            ensure_allowed(state, Action::Update, resource)?;
            view.open_edit(id);
            view.submit(&name).await;
            report(view.take_notice(), format, quiet)?;
        }
        CategoriesAction::Delete { id, yes } => {
            ensure_allowed(state, Action::Delete, resource)?;
            match view.request_delete(id) {
                DeletionVerdict::Blocked { .. } => report(view.take_notice(), format, quiet)?,
                DeletionVerdict::AllowedWithWarning { .. } if !yes => {
                    let warning = view.pending_warning().unwrap_or_default();
                    bail!("{}. Re-run with --yes to delete.", warning);
                }
                DeletionVerdict::Allowed | DeletionVerdict::AllowedWithWarning { .. } => {
                    view.confirm_delete().await;
                    report(view.take_notice(), format, quiet)?;
                }
            }
        }
    }
    Ok(())
}
