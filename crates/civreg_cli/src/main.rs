//! `civreg` - command-line front end for the registration record store.
//!
//! # Responsibility
//! - Load configuration, start logging and open the configured backend.
//! - Dispatch each command to the core `RegistryService`.

mod cli;

use anyhow::{bail, Context, Result};
use civreg_core::{
    init_logging, open_storage, BirthRecord, Certify, Config, DeathRecord, ExportOptions,
    ExportRow, KeyValueStore, MemoryStorage, Record, RecordId, RecordKind, RecordStore,
    RegistryService, SearchQuery, StorageBackend,
};
use clap::Parser;
use cli::{Cli, Command, RecordRef, SettingsCommand};
use log::info;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

type Service = RegistryService<Box<dyn KeyValueStore>>;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_from(cli.config.clone())?;

    if config.logging.enabled {
        // Logging is best effort; the registry stays usable without it.
        if let Err(err) = init_logging(&config.logging.level, &config.log_dir()) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let mut service = open_service(&config)?;
    run(&mut service, &config, cli.command)
}

fn open_service(config: &Config) -> Result<Service> {
    let storage: Box<dyn KeyValueStore> = match config.storage.backend {
        StorageBackend::Sqlite => {
            let path = config.storage_path();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create storage directory {}", parent.display())
                })?;
            }
            Box::new(
                open_storage(&path)
                    .with_context(|| format!("failed to open storage {}", path.display()))?,
            )
        }
        StorageBackend::Memory => Box::new(MemoryStorage::new()),
    };

    let store = RecordStore::with_policy(storage, config.storage.on_malformed);
    let options = ExportOptions {
        date_format: config.export.date_format.clone(),
    };
    Ok(RegistryService::with_export_options(store, options))
}

fn run(service: &mut Service, config: &Config, command: Command) -> Result<()> {
    info!("event=cli_command module=cli status=start command={}", command_name(&command));
    match command {
        Command::Register { kind, fields } => match kind {
            RecordKind::Birth => register::<BirthRecord>(service, &fields),
            RecordKind::Death => register::<DeathRecord>(service, &fields),
        },
        Command::List { kind, search } => {
            let query = search.map(SearchQuery::new);
            match kind {
                RecordKind::Birth => list::<BirthRecord>(service, query.as_ref()),
                RecordKind::Death => list::<DeathRecord>(service, query.as_ref()),
            }
        }
        Command::Show(record) => match record.kind {
            RecordKind::Birth => show::<BirthRecord>(service, &record),
            RecordKind::Death => show::<DeathRecord>(service, &record),
        },
        Command::Edit { record, patch } => match record.kind {
            RecordKind::Birth => edit::<BirthRecord>(service, &record, &patch),
            RecordKind::Death => edit::<DeathRecord>(service, &record, &patch),
        },
        Command::Remove(record) => {
            let id = RecordId::from(record.id.as_str());
            let removed = match record.kind {
                RecordKind::Birth => service.remove::<BirthRecord>(&id)?,
                RecordKind::Death => service.remove::<DeathRecord>(&id)?,
            };
            if !removed {
                bail!("no {} record with id {id}", record.kind);
            }
            println!("removed {} record {id}", record.kind);
            Ok(())
        }
        Command::Search { query, limit } => {
            for record in service.search_profiles(&SearchQuery::new(query), limit)? {
                println!("{:<6} {:<38} {}", record.kind(), record.id(), record.full_name());
            }
            Ok(())
        }
        Command::Stats { date } => print_json(&service.dashboard(date)?),
        Command::Activity { date, limit } => print_json(&service.activity(date, limit)?),
        Command::Notifications { limit } => {
            for notification in service.notifications(limit)? {
                println!("{}", notification.message);
            }
            Ok(())
        }
        Command::Export {
            kind,
            search,
            out_dir,
        } => {
            let query = search.map(SearchQuery::new);
            let dir = out_dir.unwrap_or_else(|| config.export_dir());
            match kind {
                RecordKind::Birth => export::<BirthRecord>(service, query.as_ref(), &dir),
                RecordKind::Death => export::<DeathRecord>(service, query.as_ref(), &dir),
            }
        }
        Command::Certificate(record) => match record.kind {
            RecordKind::Birth => certificate::<BirthRecord>(service, &record),
            RecordKind::Death => certificate::<DeathRecord>(service, &record),
        },
        Command::Settings(SettingsCommand::Show) => print_json(&service.settings()?),
        Command::Settings(SettingsCommand::Reset) => print_json(&service.reset_settings()?),
    }
}

fn register<R>(service: &mut Service, fields_path: &Path) -> Result<()>
where
    R: Record,
    R::Fields: DeserializeOwned,
{
    let fields: R::Fields = read_json(fields_path)?;
    let record = service.register::<R>(fields)?;
    println!("registered {} record {}", R::KIND, record.id());
    Ok(())
}

fn list<R: Record>(service: &Service, query: Option<&SearchQuery>) -> Result<()> {
    for record in service.listing::<R>(query)? {
        println!(
            "{:<38} {:<10} {}",
            record.id(),
            record.registration_date().format("%Y-%m-%d"),
            record.full_name()
        );
    }
    Ok(())
}

fn show<R: Record>(service: &Service, record: &RecordRef) -> Result<()> {
    print_json(&service.find::<R>(&RecordId::from(record.id.as_str()))?)
}

fn edit<R>(service: &mut Service, record: &RecordRef, patch_path: &Path) -> Result<()>
where
    R: Record,
    R::Patch: DeserializeOwned,
{
    let patch: R::Patch = read_json(patch_path)?;
    let updated = service.edit::<R>(&RecordId::from(record.id.as_str()), patch)?;
    print_json(&updated)
}

fn export<R: ExportRow>(service: &Service, query: Option<&SearchQuery>, dir: &Path) -> Result<()> {
    let path = service.export::<R>(query, dir)?;
    println!("exported {} records to {}", R::KIND, path.display());
    Ok(())
}

fn certificate<R: Certify>(service: &Service, record: &RecordRef) -> Result<()> {
    print!(
        "{}",
        service.certificate::<R>(&RecordId::from(record.id.as_str()))?
    );
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Register { .. } => "register",
        Command::List { .. } => "list",
        Command::Show(_) => "show",
        Command::Edit { .. } => "edit",
        Command::Remove(_) => "remove",
        Command::Search { .. } => "search",
        Command::Stats { .. } => "stats",
        Command::Activity { .. } => "activity",
        Command::Notifications { .. } => "notifications",
        Command::Export { .. } => "export",
        Command::Certificate(_) => "certificate",
        Command::Settings(_) => "settings",
    }
}
