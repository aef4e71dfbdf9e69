use clap::{Parser, ValueEnum};
use std::io::Read;
use tracing_subscriber::EnvFilter;
use asht::{decode, encode, generate, pformat, Dialect, PrettyOptions, TaggedMap};

#[derive(Clone, Copy, ValueEnum)]
enum InputFormat {
    Json,
    Yaml,
}

#[derive(Clone, Copy, ValueEnum)]
enum Emit {
    /// Source text in the selected dialect
    Code,
    /// The normalized tagged map, as JSON
    Tagged,
    /// The debug form of the decoded tree
    Pretty,
}

#[derive(Parser)]
#[command(name = "asht")]
#[command(about = "Render a tagged-map shell syntax tree as bash, xonsh or fish")]
#[command(version)]
struct Cli {
    /// Target shell dialect (bash, xonsh, fish)
    #[arg(short = 'd', long = "dialect", default_value = "bash")]
    dialect: Dialect,

    /// Format of the input tree
    #[arg(short = 'i', long = "input", value_enum, default_value_t = InputFormat::Json)]
    input: InputFormat,

    /// What to print
    #[arg(short = 'e', long = "emit", value_enum, default_value_t = Emit::Code)]
    emit: Emit,

    /// Spaces per nesting level in tagged and pretty output
    #[arg(long = "indent", default_value_t = 1)]
    indent: usize,

    /// Tagged map file to read (stdin when omitted)
    #[arg()]
    file: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("ASHT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let source = if let Some(ref file) = cli.file {
        match std::fs::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error: Cannot read tree file: {}: {}", file, e);
                std::process::exit(1);
            }
        }
    } else {
        let mut buf = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
            eprintln!("Error: Cannot read stdin: {}", e);
            std::process::exit(1);
        }
        buf
    };

    match run(&cli, &source) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli, source: &str) -> Result<String, Box<dyn std::error::Error>> {
    let map: TaggedMap = match cli.input {
        InputFormat::Json => serde_json::from_str(source)?,
        InputFormat::Yaml => serde_yaml::from_str(source)?,
    };
    let options = PrettyOptions {
        indent: " ".repeat(cli.indent),
    };

    let output = match cli.emit {
        Emit::Code => generate(cli.dialect, &map)?,
        Emit::Tagged => {
            let tree = decode(&map)?;
            format!("{}\n", pformat(&encode(&tree), &options)?)
        }
        Emit::Pretty => {
            let tree = decode(&map)?;
            format!("{}\n", pformat(&tree, &options)?)
        }
    };
    Ok(output)
}
