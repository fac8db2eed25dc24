// SPDX-License-Identifier: MPL-2.0
use iced_deck::app::{self, paths, Flags};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
IcedDeck - minimal audio/video player

USAGE:
  iced_deck [OPTIONS] [SOURCE]

ARGS:
  <SOURCE>              .mp4/.mp3 file path or URL to play on startup

OPTIONS:
  --lang <ID>           UI language (e.g. en-US, fr)
  --config-dir <DIR>    Directory holding settings.toml
  --verbose             Debug logging (RUST_LOG takes precedence)
  -h, --help            Print this help
";

struct Args {
    lang: Option<String>,
    config_dir: Option<String>,
    verbose: bool,
    source: Option<String>,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let parsed = Args {
        lang: args.opt_value_from_str("--lang")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
        verbose: args.contains("--verbose"),
        source: args.opt_free_from_str()?,
    };

    let rest = args.finish();
    if !rest.is_empty() {
        eprintln!("Warning: ignoring extra arguments: {rest:?}");
    }

    Ok(parsed)
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "iced_deck=debug"
    } else {
        "iced_deck=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> iced::Result {
    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("Error: {err}\n\n{HELP}");
            std::process::exit(2);
        }
    };

    init_logging(args.verbose);
    paths::init_cli_overrides(args.config_dir);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting IcedDeck");

    app::run(Flags {
        lang: args.lang,
        source: args.source,
    })
}
