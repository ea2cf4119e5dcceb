use anyhow::Context;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use member_js::dom;
use member_js::Heap;
use member_js::HeapLimits;
use member_js::MemberId;
use member_js::MemberTable;
use member_js::Path;
use member_js::ResolveError;
use member_js::TableLimits;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(author, version, about = "Inspect member tables and apply member paths to snapshots")]
struct Cli {
  /// Emit tracing spans (JSON) on stderr.
  #[arg(long, global = true)]
  trace: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Validate a member table.
  Check(CheckArgs),
  /// Print every member's resolved path and declared type.
  Paths(PathsArgs),
  /// Print the path of a member name, optionally qualified by a parent path.
  Resolve(ResolveArgs),
  /// Look a member up on a JSON object snapshot.
  Apply(ApplyArgs),
}

#[derive(Args)]
struct TableArgs {
  /// Maximum number of table entries.
  #[arg(long)]
  max_entries: Option<usize>,

  /// Maximum number of segments in a resolved path.
  #[arg(long)]
  max_path_depth: Option<usize>,
}

impl TableArgs {
  fn limits(&self) -> TableLimits {
    let defaults = TableLimits::default();
    TableLimits {
      max_entries: self.max_entries.unwrap_or(defaults.max_entries),
      max_path_depth: self.max_path_depth.unwrap_or(defaults.max_path_depth),
    }
  }
}

#[derive(Args)]
struct CheckArgs {
  /// Table file (`{"members": [...]}`).
  table: PathBuf,

  #[command(flatten)]
  limits: TableArgs,
}

#[derive(Args)]
struct PathsArgs {
  /// Table file. Uses the built-in DOM table when omitted.
  table: Option<PathBuf>,

  /// Only list members exposed by this interface.
  #[arg(long)]
  interface: Option<String>,

  /// Emit JSON rows.
  #[arg(long)]
  json: bool,

  #[command(flatten)]
  limits: TableArgs,
}

#[derive(Args)]
struct ResolveArgs {
  /// Member name.
  name: String,

  /// Qualifying parent path, e.g. `document.body`.
  #[arg(long)]
  parent: Option<String>,
}

#[derive(Args)]
struct ApplyArgs {
  /// Member id from the table, or a dotted path with `--path`.
  member: String,

  /// JSON snapshot of the target object.
  #[arg(long)]
  snapshot: PathBuf,

  /// Table file. Uses the built-in DOM table when omitted.
  #[arg(long)]
  table: Option<PathBuf>,

  /// Treat MEMBER as a raw dotted path instead of a table id.
  #[arg(long)]
  path: bool,

  /// Emit the path, declared type and value as JSON.
  #[arg(long)]
  json: bool,

  /// Maximum number of objects loaded from the snapshot.
  #[arg(long)]
  max_objects: Option<usize>,

  #[command(flatten)]
  limits: TableArgs,
}

#[derive(Serialize)]
struct ApplyOutput {
  path: String,
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  declared_type: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  class: Option<String>,
  value: serde_json::Value,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.trace);
  let result = match cli.command {
    Commands::Check(args) => run_check(args),
    Commands::Paths(args) => run_paths(args),
    Commands::Resolve(args) => run_resolve(args),
    Commands::Apply(args) => run_apply(args),
  };
  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("error: {err:#}");
      ExitCode::FAILURE
    }
  }
}

fn init_tracing(enabled: bool) {
  if !enabled {
    return;
  }
  let _ = tracing_subscriber::fmt()
    .with_span_events(FmtSpan::CLOSE)
    .with_max_level(Level::TRACE)
    .with_writer(std::io::stderr)
    .json()
    .with_ansi(false)
    .try_init();
}

fn load_table(path: Option<&PathBuf>, limits: TableLimits) -> anyhow::Result<MemberTable> {
  match path {
    None => Ok(dom::table().clone()),
    Some(path) => {
      let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
      debug!(path = %path.display(), "loading member table");
      MemberTable::from_json(&text, limits).with_context(|| format!("invalid table {}", path.display()))
    }
  }
}

fn run_check(args: CheckArgs) -> anyhow::Result<()> {
  let table = load_table(Some(&args.table), args.limits.limits())?;
  println!("{} members", table.len());
  Ok(())
}

fn run_paths(args: PathsArgs) -> anyhow::Result<()> {
  let table = load_table(args.table.as_ref(), args.limits.limits())?;
  let rows: Vec<_> = table
    .to_rows()
    .into_iter()
    .filter(|row| match &args.interface {
      Some(interface) => row.interface.as_deref() == Some(interface.as_str()),
      None => true,
    })
    .collect();
  if args.json {
    println!("{}", serde_json::to_string_pretty(&rows)?);
  } else {
    for row in rows {
      println!("{}\t{}", row.path, row.declared_type);
    }
  }
  Ok(())
}

fn run_resolve(args: ResolveArgs) -> anyhow::Result<()> {
  let name = MemberId::parse(&args.name)?;
  let parent = args.parent.as_deref().map(Path::parse).transpose()?;
  println!("{}", member_js::resolve(name, parent.as_ref()));
  Ok(())
}

fn run_apply(args: ApplyArgs) -> anyhow::Result<()> {
  let text = fs::read_to_string(&args.snapshot)
    .with_context(|| format!("failed to read {}", args.snapshot.display()))?;
  let snapshot: serde_json::Value =
    serde_json::from_str(&text).with_context(|| format!("invalid snapshot {}", args.snapshot.display()))?;

  let mut limits = HeapLimits::default();
  if let Some(max_objects) = args.max_objects {
    limits.max_objects = max_objects;
  }
  let mut heap = Heap::new(limits);
  let root = heap.load_json(&snapshot)?;
  debug!(objects = heap.object_count(), "snapshot loaded");

  let (path, declared_type, value) = if args.path {
    let path = Path::parse(&args.member)?;
    let value = member_js::apply(&heap, &path, root)?;
    (path, None, value)
  } else {
    let table = load_table(args.table.as_ref(), args.limits.limits())?;
    let entry = table
      .get(&args.member)
      .ok_or_else(|| ResolveError::UnknownMember(args.member.clone()))?;
    let value = member_js::apply(&heap, entry.path(), root)?;
    (entry.path().clone(), Some(entry.declared_type().to_string()), value)
  };

  if args.json {
    let output = ApplyOutput {
      path: path.to_string(),
      declared_type,
      class: heap.class_of(value).map(str::to_string),
      value: heap.to_json(value),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
  } else {
    println!("{}", heap.to_json(value));
  }
  Ok(())
}
