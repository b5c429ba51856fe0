use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use datgen::engine::{self, Format};
use datgen::grid::load_grid;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

struct Args {
    input: PathBuf,
    format: Format,
    out_dir: PathBuf,
    dump_json: bool,
}

fn usage() -> String {
    "usage: datgen <input.xls[x]> <format 1-6> [--out DIR] [--dump-json]".to_string()
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut input = None;
    let mut format = None;
    let mut out_dir = PathBuf::from(".");
    let mut dump_json = false;

    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--out" => {
                let dir = it.next().with_context(|| usage())?;
                out_dir = PathBuf::from(dir);
            }
            "--dump-json" => dump_json = true,
            "-h" | "--help" => bail!(usage()),
            _ if input.is_none() => input = Some(PathBuf::from(arg)),
            _ if format.is_none() => {
                let id: u8 = arg
                    .parse()
                    .with_context(|| format!("format must be a number 1-6, got {arg:?}"))?;
                format = Some(Format::from_id(id)?);
            }
            _ => bail!("unexpected argument {arg:?}\n{}", usage()),
        }
    }

    Ok(Args {
        input: input.with_context(|| usage())?,
        format: format.with_context(|| usage())?,
        out_dir,
        dump_json,
    })
}

fn run() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;

    let grid = load_grid(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    info!(rows = grid.row_count(), input = %args.input.display(), "workbook loaded");

    let conversion = engine::convert(&grid, args.format)?;

    if args.dump_json {
        println!("{}", serde_json::to_string_pretty(&conversion.document)?);
    }

    let path = engine::write_output(&conversion, &args.out_dir)?;
    info!(output = %path.display(), "wrote DAT file");
    println!("{}", path.display());
    Ok(())
}


fn main() -> ExitCode {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
