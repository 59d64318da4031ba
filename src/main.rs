use clap::Parser;
use innkeeper::application::engine::BookingEngine;
use innkeeper::domain::ports::{Clock, FixedClock, SystemClock};
use innkeeper::error::{BookingError, Result as EngineResult};
use innkeeper::infrastructure::in_memory::{
    InMemoryBookingStore, InMemoryLogStore, InMemoryPaymentStore, InMemoryRoomStore,
};
#[cfg(feature = "storage-rocksdb")]
use innkeeper::infrastructure::rocksdb::RocksDbStore;
use innkeeper::interfaces::csv::catalog_reader::CatalogReader;
use innkeeper::interfaces::csv::command_reader::{Command, CommandKind, CommandReader};
use innkeeper::interfaces::csv::ledger_writer::LedgerWriter;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input booking commands CSV file
    commands: PathBuf,

    /// Room catalog CSV file
    #[arg(long)]
    rooms: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Pin "today" for date validation (defaults to the system date)
    #[arg(long)]
    today: Option<chrono::NaiveDate>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let clock: Box<dyn Clock> = match cli.today {
        Some(date) => Box::new(FixedClock(date)),
        None => Box::new(SystemClock),
    };

    let engine = match cli.db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(db_path) => {
            // Use persistent storage (RocksDB); one store backs every port.
            let store = RocksDbStore::open(db_path).into_diagnostic()?;
            BookingEngine::new(
                Box::new(store.clone()),
                Box::new(store.clone()),
                Box::new(store.clone()),
                Box::new(store),
                clock,
            )
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            return Err(miette::miette!(
                "this build has no persistent storage; rebuild with --features storage-rocksdb"
            ));
        }
        None => BookingEngine::new(
            Box::new(InMemoryRoomStore::new()),
            Box::new(InMemoryBookingStore::new()),
            Box::new(InMemoryPaymentStore::new()),
            Box::new(InMemoryLogStore::new()),
            clock,
        ),
    };

    // Seed the room catalog.
    let file = File::open(&cli.rooms).into_diagnostic()?;
    let (room_types, rooms) = CatalogReader::new(file).catalog().into_diagnostic()?;
    for room_type in room_types {
        engine.register_room_type(room_type).await.into_diagnostic()?;
    }
    for room in rooms {
        engine.register_room(room).await.into_diagnostic()?;
    }

    // Process commands; per-row failures are reported and skipped.
    let file = File::open(&cli.commands).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for command in reader.commands() {
        match command {
            Ok(command) => {
                if let Err(e) = dispatch(&engine, command).await {
                    eprintln!("Error processing command: {e}");
                }
            }
            Err(e) => {
                eprintln!("Error reading command: {e}");
            }
        }
    }

    // Output the final booking ledger.
    let bookings = engine.into_ledger().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = LedgerWriter::new(stdout.lock());
    writer.write_bookings(&bookings).into_diagnostic()?;

    Ok(())
}

async fn dispatch(engine: &BookingEngine, command: Command) -> EngineResult<()> {
    match command.action {
        CommandKind::Book => {
            engine
                .create_booking(
                    require(command.customer, "customer")?,
                    require(command.room, "room")?,
                    require(command.check_in, "check_in")?,
                    require(command.check_out, "check_out")?,
                    command.notes,
                )
                .await?;
        }
        CommandKind::Confirm => {
            engine.confirm(require(command.booking, "booking")?).await?;
        }
        CommandKind::Cancel => {
            engine.cancel(require(command.booking, "booking")?).await?;
        }
        CommandKind::Checkin => {
            engine
                .check_in(
                    require(command.booking, "booking")?,
                    require(command.staff, "staff")?,
                    command.notes,
                )
                .await?;
        }
        CommandKind::Checkout => {
            engine
                .check_out(
                    require(command.booking, "booking")?,
                    require(command.staff, "staff")?,
                    command.notes,
                )
                .await?;
        }
        CommandKind::Pay => {
            engine
                .record_payment(
                    require(command.booking, "booking")?,
                    require(command.amount, "amount")?,
                    require(command.method, "method")?,
                )
                .await?;
        }
        CommandKind::Refund => {
            engine
                .refund_payment(require(command.payment, "payment")?)
                .await?;
        }
    }
    Ok(())
}

fn require<T>(field: Option<T>, name: &'static str) -> EngineResult<T> {
    field.ok_or(BookingError::MissingField(name))
}
