use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use pdbex_core::{PdbexError, PdbexResult, TypeDatabase};
use pdbex_utils::{LogFormat, LogLevel, info, init_logging, init_logging_with_level, warn};

/// Reconstructs C type declarations from Windows PDB symbol files.
#[derive(Parser, Debug)]
#[command(name = "pdbex")]
#[command(version)]
#[command(about = "Reconstructs C type declarations from Windows PDB symbol files", long_about = None)]
struct Cli
{
    /// Type name to dump (with or without a leading underscore), or `*` for all
    symbol: Option<String>,
    /// Path to the PDB file
    pdb: Option<PathBuf>,
    /// Write output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Emit every type the symbol embeds by value before the symbol itself
    #[arg(short = 'a', long = "inline-all", default_value_t = false)]
    inline_all: bool,
    /// List all type names
    #[arg(short, long, default_value_t = false)]
    list: bool,
    /// List type names containing TEXT (case-insensitive)
    #[arg(short, long, value_name = "TEXT")]
    search: Option<String>,
    /// Log level (error, warn, info, debug, trace); overrides RUST_LOG
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,
}

/// What to write once the PDB is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode
{
    Search(String),
    List,
    DumpAll,
    Dump(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Invocation
{
    pdb: PathBuf,
    mode: Mode,
    inline: bool,
    output: Option<PathBuf>,
}

impl Cli
{
    /// Settle positionals into a concrete request.
    ///
    /// A lone positional naming an existing `.pdb` file is taken as the PDB
    /// and implies listing. Returns `None` when no PDB was given at all.
    fn into_invocation(self) -> Option<Invocation>
    {
        let mut symbol = self.symbol;
        let mut list = self.list;

        let pdb = match self.pdb {
            Some(pdb) => pdb,
            None => {
                let lone = symbol.take().filter(|candidate| {
                    candidate.to_lowercase().ends_with(".pdb") && Path::new(candidate).exists()
                })?;
                list = true;
                PathBuf::from(lone)
            }
        };

        let mode = match (self.search, symbol) {
            (Some(query), _) => Mode::Search(query),
            (None, None) => Mode::List,
            (None, Some(_)) if list => Mode::List,
            (None, Some(symbol)) if symbol == "*" => Mode::DumpAll,
            (None, Some(symbol)) => Mode::Dump(symbol),
        };

        Some(Invocation {
            pdb,
            mode,
            inline: self.inline_all,
            output: self.output,
        })
    }
}

fn main() -> ExitCode
{
    let cli = Cli::parse();

    // Logs go to stderr; stdout is reserved for declarations
    let logging = match cli.log_level {
        Some(level) => init_logging_with_level(level, LogFormat::from_env()),
        None => init_logging(),
    };
    let _guard = match logging {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let Some(invocation) = cli.into_invocation() else {
        let _ = Cli::command().print_help();
        return ExitCode::FAILURE;
    };

    match run(&invocation) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ PdbexError::FileNotFound(_)) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(invocation: &Invocation) -> PdbexResult<()>
{
    if !invocation.pdb.exists() {
        return Err(PdbexError::FileNotFound(invocation.pdb.clone()));
    }

    eprintln!("Loading {}...", invocation.pdb.display());
    let database = TypeDatabase::open(&invocation.pdb)?;
    eprintln!("{}", database.counts());

    let mut out: Box<dyn Write> = match &invocation.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let source_name = invocation
        .pdb
        .file_name()
        .map_or_else(|| invocation.pdb.display().to_string(), |name| name.to_string_lossy().into_owned());
    write_output(&database, invocation, &source_name, &mut out)?;
    out.flush()?;

    if let Some(path) = &invocation.output {
        eprintln!("-> {}", path.display());
    }
    Ok(())
}

/// Write the requested listing or declarations to `out`.
fn write_output(database: &TypeDatabase, invocation: &Invocation, source_name: &str, out: &mut dyn Write) -> io::Result<()>
{
    let catalog = database.catalog();
    match &invocation.mode {
        Mode::Search(query) => {
            for name in catalog.search(query) {
                writeln!(out, "{name}")?;
            }
            return Ok(());
        }
        Mode::List => {
            for name in catalog.list_all() {
                writeln!(out, "{name}")?;
            }
            return Ok(());
        }
        Mode::DumpAll | Mode::Dump(_) => {}
    }

    writeln!(out, "/*\n * PDB: {source_name}\n */\n")?;

    let mut session = database.session();
    match &invocation.mode {
        Mode::DumpAll => {
            for declaration in session.dump_all() {
                writeln!(out, "{declaration}")?;
            }
        }
        Mode::Dump(symbol) => {
            let outcome = session.dump_by_name(symbol, invocation.inline);
            if !outcome.is_found() {
                info!(symbol = symbol.as_str(), "symbol not found");
            }
            writeln!(out, "{outcome}")?;
        }
        Mode::Search(_) | Mode::List => {}
    }

    let diagnostics = session.diagnostics();
    if !diagnostics.is_empty() {
        warn!(count = diagnostics.len(), "emitted placeholders for unresolvable types");
    }
    Ok(())
}

#[cfg(test)]
mod tests
{
    use std::ffi::OsStr;

    use pdbex_core::records::{AggregateRecord, EnumRecord, Field, TypeRecord};
    use pdbex_core::store::TypeStore;
    use pdbex_core::TypeIndex;

    use super::*;

    fn database() -> TypeDatabase
    {
        TypeDatabase::from_store(TypeStore::from_records([
            (
                TypeIndex::new(0x1000),
                TypeRecord::field_list(vec![Field::enumerate("Low", 0), Field::enumerate("High", 1)]),
            ),
            (
                TypeIndex::new(0x1001),
                TypeRecord::Enum(EnumRecord::new("_PRIORITY", Some(TypeIndex::new(0x74)), Some(TypeIndex::new(0x1000)))),
            ),
            (
                TypeIndex::new(0x1002),
                TypeRecord::field_list(vec![Field::member("Priority", TypeIndex::new(0x1001), 0)]),
            ),
            (
                TypeIndex::new(0x1003),
                TypeRecord::Structure(AggregateRecord::new("_TASK", 4, Some(TypeIndex::new(0x1002)))),
            ),
        ]))
    }

    fn invocation(mode: Mode, inline: bool) -> Invocation
    {
        Invocation {
            pdb: PathBuf::from("kernel.pdb"),
            mode,
            inline,
            output: None,
        }
    }

    fn render(invocation: &Invocation) -> String
    {
        let mut out = Vec::new();
        write_output(&database(), invocation, "kernel.pdb", &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_symbol_and_pdb()
    {
        let cli = Cli::try_parse_from(["pdbex", "_EPROCESS", "ntkrnlmp.pdb", "-a", "-o", "out.h"]).unwrap();
        let invocation = cli.into_invocation().unwrap();

        assert_eq!(invocation.pdb, PathBuf::from("ntkrnlmp.pdb"));
        assert_eq!(invocation.mode, Mode::Dump("_EPROCESS".to_string()));
        assert!(invocation.inline);
        assert_eq!(invocation.output, Some(PathBuf::from("out.h")));
    }

    #[test]
    fn test_parse_star_dumps_all()
    {
        let cli = Cli::try_parse_from(["pdbex", "*", "ntdll.pdb"]).unwrap();
        assert_eq!(cli.into_invocation().unwrap().mode, Mode::DumpAll);
    }

    #[test]
    fn test_search_takes_precedence()
    {
        let cli = Cli::try_parse_from(["pdbex", "-l", "-s", "list", "_PEB", "ntdll.pdb"]).unwrap();
        assert_eq!(cli.into_invocation().unwrap().mode, Mode::Search("list".to_string()));
    }

    #[test]
    fn test_list_flag_ignores_symbol()
    {
        let cli = Cli::try_parse_from(["pdbex", "--list", "_PEB", "ntdll.pdb"]).unwrap();
        assert_eq!(cli.into_invocation().unwrap().mode, Mode::List);
    }

    #[test]
    fn test_lone_existing_pdb_lists()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ntdll.pdb");
        File::create(&path).unwrap();

        let cli = Cli::try_parse_from([OsStr::new("pdbex"), path.as_os_str()]).unwrap();
        let invocation = cli.into_invocation().unwrap();
        assert_eq!(invocation.pdb, path);
        assert_eq!(invocation.mode, Mode::List);
    }

    #[test]
    fn test_missing_pdb_shows_usage()
    {
        let cli = Cli::try_parse_from(["pdbex", "/nonexistent/ntdll.pdb"]).unwrap();
        assert!(cli.into_invocation().is_none());

        let cli = Cli::try_parse_from(["pdbex"]).unwrap();
        assert!(cli.into_invocation().is_none());
    }

    #[test]
    fn test_log_level_parsing()
    {
        let cli = Cli::try_parse_from(["pdbex", "--log-level", "debug", "_PEB", "ntdll.pdb"]).unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Debug));

        assert!(Cli::try_parse_from(["pdbex", "--log-level", "loud", "_PEB", "ntdll.pdb"]).is_err());
    }

    #[test]
    fn test_list_output_is_sorted()
    {
        assert_eq!(render(&invocation(Mode::List, false)), "_PRIORITY\n_TASK\n");
    }

    #[test]
    fn test_search_output()
    {
        assert_eq!(render(&invocation(Mode::Search("task".to_string()), false)), "_TASK\n");
    }

    #[test]
    fn test_dump_has_header()
    {
        let text = render(&invocation(Mode::Dump("TASK".to_string()), false));
        assert!(text.starts_with("/*\n * PDB: kernel.pdb\n */\n\ntypedef struct _TASK\n"));
        assert!(!text.contains("typedef enum"));
    }

    #[test]
    fn test_inline_dump_emits_dependencies()
    {
        let text = render(&invocation(Mode::Dump("_TASK".to_string()), true));
        let priority = text.find("typedef enum _PRIORITY").unwrap();
        let task = text.find("typedef struct _TASK").unwrap();
        assert!(priority < task);
    }

    #[test]
    fn test_dump_missing_symbol()
    {
        let text = render(&invocation(Mode::Dump("_MISSING".to_string()), false));
        assert!(text.contains("/* '_MISSING' not found */"));
    }

    #[test]
    fn test_dump_all()
    {
        let text = render(&invocation(Mode::DumpAll, false));
        assert_eq!(text.matches("typedef").count(), 2);
    }

    #[test]
    fn test_run_missing_file()
    {
        let invocation = Invocation {
            pdb: PathBuf::from("/nonexistent/ntdll.pdb"),
            mode: Mode::List,
            inline: false,
            output: None,
        };
        let err = run(&invocation).unwrap_err();
        assert_eq!(err.to_string(), "'/nonexistent/ntdll.pdb' not found");
    }
}
