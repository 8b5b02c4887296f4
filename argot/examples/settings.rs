use std::path::PathBuf;

use argot::parsers::{file_path, first_non_empty, folder_path, value, values};
use argot::{Bindings, Failures, ParsedArguments, Parser};

#[derive(Debug)]
struct Settings {
    port: u16,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    verbose: bool,
}

fn main() -> Result<(), argot::Error> {
    env_logger::init();

    let args = ParsedArguments::from_env();
    args.log_warnings();

    let mut settings = Settings {
        port: 8080,
        output: None,
        config: None,
        verbose: false,
    };

    Bindings::new()
        .required_with_message("port", value::<u16>(), "--port expects a number", |x| {
            settings.port = x
        })
        .optional("output", folder_path(), |x| settings.output = Some(x))
        .optional("config", file_path(), |x| settings.config = Some(x))
        .flag("verbose", None, |x| settings.verbose = x)
        .apply(&args)?;

    let name = args
        .try_get("name", first_non_empty().map(str::to_uppercase))
        .unwrap_or_default();

    let ids: Vec<_> = args
        .try_get("ids", values::<u32>(Failures::Keep))
        .map(|x| x.collect())
        .unwrap_or_default();

    println!("{settings:?} name={name:?} ids={ids:?}");

    Ok(())
}
