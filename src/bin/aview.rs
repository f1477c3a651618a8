use std::{io::Write, path::PathBuf, fs::read_to_string};

use anyhow::{Result, Context, anyhow, bail};
use clap::Parser as ClapParser;
use aview::{ViewConfig, ViewEngine, ViewWarning, Pointer,
            util::split_assignment};


#[derive(clap::Parser, Debug)]
/// Render a view template to stdout.
struct Args {
    /// Path of the template file, relative to the root directory
    #[clap(required(true))]
    file: String,

    /// Only render the content of the block of this name
    #[clap(long, default_value = "")]
    section: String,

    /// JSON file holding an object; its fields are bound to the view,
    /// nested objects as `{{outer.inner}}`
    #[clap(long)]
    data: Option<PathBuf>,

    /// Set a variable, `name=value` (repeatable)
    #[clap(long)]
    set: Vec<String>,

    /// Show the block of this name (repeatable)
    #[clap(long)]
    show: Vec<String>,

    /// Map partial paths starting with alias to real, `alias=real`
    /// (repeatable)
    #[clap(long)]
    pointer: Vec<String>,

    /// Template root directory (default: AVIEW_ROOT env var, or the
    /// current directory)
    #[clap(long)]
    root: Option<PathBuf>,

    /// JSON config file to use instead of the AVIEW_* env vars
    #[clap(long)]
    config: Option<PathBuf>,

    /// Leave unset variables and hidden blocks in the output as tags
    #[clap(long)]
    passive: bool,

    /// Print template warnings to stderr
    #[clap(long)]
    warnings: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ViewConfig::from_json_file(path)?,
        None => ViewConfig::from_env()?,
    };
    if let Some(root) = args.root {
        config.root = root;
    }
    config.warnings = args.warnings;

    let engine = ViewEngine::from_config(config);
    for pointer in &args.pointer {
        engine.add_pointer(Pointer::parse(pointer)?);
    }

    let mut view = engine.load(&args.file, &args.section);
    if let Some(w) = view.warnings().iter().find(
        |w| matches!(w, ViewWarning::MissingFile { .. } | ViewWarning::ReadFailed { .. }))
    {
        bail!("{w}")
    }

    if let Some(path) = &args.data {
        let s = read_to_string(path).with_context(
            || anyhow!("reading data file {path:?}"))?;
        let value: serde_json::Value = serde_json::from_str(&s).with_context(
            || anyhow!("parsing data file {path:?}"))?;
        view.bind_serialize(&value, "").with_context(
            || anyhow!("binding data file {path:?}"))?;
    }
    for assignment in &args.set {
        let (name, value) = split_assignment("--set", assignment)?;
        view.set(name, value);
    }
    for block in &args.show {
        view.show(block);
    }

    let out = view.render_with(!args.passive);
    let mut outp = std::io::stdout().lock();
    outp.write_all(out.as_bytes())?;
    outp.flush()?;
    Ok(())
}
