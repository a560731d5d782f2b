//! DataStates CLI
//!
//! Loads and exercises the adapter the way a benchmark driver would: every
//! worker thread owns its own adapter, all sharing the process-wide store.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use dstates_bench::adapter::{OperationType, ADAPTER_NAME};
use dstates_bench::{
    Config, DataStatesDb, DbError, Field, Operation, Outcome, Properties, Result, Status,
    StoreRegistry, VersionedStore,
};
use tracing_subscriber::{fmt, EnvFilter};

const TABLE: &str = "usertable";

/// DataStates benchmark CLI
#[derive(Parser, Debug)]
#[command(name = "dstates-cli")]
#[command(about = "Drive the DataStates adapter with a YCSB-style workload")]
#[command(version)]
struct Args {
    /// Workload property files, applied in order
    #[arg(short = 'P', long = "props", global = true)]
    property_files: Vec<PathBuf>,

    /// Property overrides (key=value), applied after the files
    #[arg(short = 'p', long = "prop", global = true)]
    overrides: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Insert records
    Load {
        /// Number of records to insert
        #[arg(short, long, default_value = "1000")]
        records: usize,

        /// Worker threads
        #[arg(short, long, default_value = "1")]
        threads: usize,

        /// Bytes per field value
        #[arg(long, default_value = "100")]
        field_length: usize,
    },

    /// Run a read/update mix over loaded records
    Run {
        /// Number of records previously loaded
        #[arg(short, long, default_value = "1000")]
        records: usize,

        /// Total operations across all workers
        #[arg(short, long, default_value = "1000")]
        operations: usize,

        /// Worker threads
        #[arg(short, long, default_value = "1")]
        threads: usize,

        /// Bytes per updated field value
        #[arg(long, default_value = "100")]
        field_length: usize,

        /// Fraction of operations that are reads
        #[arg(long, default_value = "0.5")]
        read_proportion: f64,
    },

    /// Read one record
    Read {
        /// The key to read
        key: String,

        /// Only read these fields
        #[arg(short, long = "field")]
        fields: Vec<String>,
    },

    /// Delete one record
    Delete {
        /// The key to delete
        key: String,
    },
}

/// Per-type counts of OK and NOT_FOUND results
type Tally = HashMap<OperationType, (u64, u64)>;

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,dstates_bench=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut props = Properties::new();
    for path in &args.property_files {
        props.load_file(path)?;
    }
    for pair in &args.overrides {
        props.set_pair(pair)?;
    }

    let config = Config::from_properties(&props)?;
    tracing::info!("{} adapter v{}", ADAPTER_NAME, dstates_bench::VERSION);
    tracing::info!("Store path: {}", config.db_path.display());

    let registry = StoreRegistry::global();

    match args.command {
        Commands::Load {
            records,
            threads,
            field_length,
        } => {
            let started = Instant::now();
            let tally = run_workers(&registry, &config, threads, |db, worker| {
                load_worker(db, worker, threads, records, field_length)
            })?;
            report("load", &tally, started);
        }
        Commands::Run {
            records,
            operations,
            threads,
            field_length,
            read_proportion,
        } => {
            if records == 0 {
                return Err(DbError::Config("run needs at least one record".to_string()));
            }
            let started = Instant::now();
            let mix = RunMix {
                records,
                operations,
                threads,
                field_length,
                read_proportion,
            };
            let tally = run_workers(&registry, &config, threads, |db, worker| {
                run_worker(db, worker, &mix)
            })?;
            report("run", &tally, started);
        }
        Commands::Read { key, fields } => {
            let db = DataStatesDb::init(Arc::clone(&registry), &config)?;
            let operation = Operation::Read {
                table: TABLE.to_string(),
                key: key.into_bytes(),
                fields: (!fields.is_empty())
                    .then(|| fields.into_iter().map(String::into_bytes).collect()),
            };
            match db.execute(&operation)? {
                Outcome::Row(row) => {
                    for field in row {
                        println!(
                            "{}={}",
                            String::from_utf8_lossy(&field.name),
                            String::from_utf8_lossy(&field.value)
                        );
                    }
                }
                _ => println!("(not found)"),
            }
            db.cleanup()?;
        }
        Commands::Delete { key } => {
            let db = DataStatesDb::init(Arc::clone(&registry), &config)?;
            db.delete(TABLE, key.as_bytes())?;
            println!("OK");
            db.cleanup()?;
        }
    }

    Ok(())
}

// =============================================================================
// Workers
// =============================================================================

/// Run `work` on `threads` scoped workers, each with its own adapter
fn run_workers<F>(
    registry: &Arc<StoreRegistry<VersionedStore>>,
    config: &Config,
    threads: usize,
    work: F,
) -> Result<Tally>
where
    F: Fn(&DataStatesDb, usize) -> Result<Tally> + Sync,
{
    let threads = threads.max(1);
    let work = &work;

    let results = crossbeam::thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|worker| {
                s.spawn(move |_| -> Result<Tally> {
                    let db = DataStatesDb::init(Arc::clone(registry), config)?;
                    let tally = work(&db, worker);
                    db.cleanup()?;
                    tally
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(DbError::Lifecycle("worker panicked".to_string())))
            })
            .collect::<Vec<_>>()
    })
    .map_err(|_| DbError::Lifecycle("worker scope panicked".to_string()))?;

    let mut total = Tally::new();
    for result in results {
        for (op, (ok, not_found)) in result? {
            let entry = total.entry(op).or_default();
            entry.0 += ok;
            entry.1 += not_found;
        }
    }
    Ok(total)
}

fn load_worker(
    db: &DataStatesDb,
    worker: usize,
    threads: usize,
    records: usize,
    field_length: usize,
) -> Result<Tally> {
    let mut tally = Tally::new();

    for record in (worker..records).step_by(threads.max(1)) {
        let values = (0..db.field_count())
            .map(|i| Field::new(field_name(i), field_value(record + i, field_length)))
            .collect();
        let operation = Operation::Insert {
            table: TABLE.to_string(),
            key: record_key(record),
            values,
        };
        count(&mut tally, &operation, db.execute(&operation)?);
    }

    Ok(tally)
}

struct RunMix {
    records: usize,
    operations: usize,
    threads: usize,
    field_length: usize,
    read_proportion: f64,
}

fn run_worker(db: &DataStatesDb, worker: usize, mix: &RunMix) -> Result<Tally> {
    let mut tally = Tally::new();
    let read_threshold = (mix.read_proportion.clamp(0.0, 1.0) * 1000.0) as usize;

    for n in (worker..mix.operations).step_by(mix.threads.max(1)) {
        let record = scatter(n) % mix.records;
        let operation = if scatter(n + 1) % 1000 < read_threshold {
            Operation::Read {
                table: TABLE.to_string(),
                key: record_key(record),
                fields: None,
            }
        } else {
            let field = n % db.field_count();
            Operation::Update {
                table: TABLE.to_string(),
                key: record_key(record),
                values: vec![Field::new(field_name(field), field_value(n, mix.field_length))],
            }
        };
        count(&mut tally, &operation, db.execute(&operation)?);
    }

    Ok(tally)
}

fn count(tally: &mut Tally, operation: &Operation, outcome: Outcome) {
    let entry = tally.entry(operation.operation_type()).or_default();
    match outcome.status() {
        Status::Ok => entry.0 += 1,
        Status::NotFound => entry.1 += 1,
    }
}

fn report(phase: &str, tally: &Tally, started: Instant) {
    let elapsed = started.elapsed();
    let total: u64 = tally.values().map(|(ok, nf)| ok + nf).sum();
    let throughput = total as f64 / elapsed.as_secs_f64().max(f64::EPSILON);

    tracing::info!(
        "[{}] {} operations in {:.3}s ({:.0} ops/sec)",
        phase,
        total,
        elapsed.as_secs_f64(),
        throughput
    );
    for (op, (ok, not_found)) in tally {
        tracing::info!("[{}] {}: ok={} not_found={}", phase, op.name(), ok, not_found);
    }
}

// =============================================================================
// Record Generation
// =============================================================================

fn record_key(record: usize) -> Vec<u8> {
    format!("user{}", record).into_bytes()
}

fn field_name(index: usize) -> String {
    format!("field{}", index)
}

fn field_value(seed: usize, len: usize) -> Vec<u8> {
    (0..len).map(|i| b'a' + ((seed + i) % 26) as u8).collect()
}

/// Spread sequential indexes across the key space (Knuth multiplicative hash)
fn scatter(n: usize) -> usize {
    (n as u64).wrapping_mul(2_654_435_761) as usize >> 4
}
