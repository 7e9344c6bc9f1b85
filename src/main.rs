use clap::{
    crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, ArgMatches,
    Command,
};
use std::path::PathBuf;
use temelie::api;

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("generate")
                .about("Writes the homelab GitOps tree to a destination directory")
                .arg(
                    Arg::new("destination")
                        .help("The directory the tree will be created in")
                        .required(true),
                )
                .arg(
                    Arg::new("force")
                        .help("Replace an existing destination tree")
                        .long("force")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("yes")
                        .help("Skip the confirmation prompt")
                        .short('y')
                        .long("yes")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("config")
                        .help("Site settings file (toml)")
                        .short('c')
                        .long("config"),
                )
                .arg(
                    Arg::new("git-init")
                        .help("Initialize the destination as a git repository")
                        .long("git-init")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("preview")
                .about("Prints the tree generate would write, without writing it")
                .arg(
                    Arg::new("destination")
                        .help("Destination directory shown as the tree root")
                        .default_value("homelab-gitops"),
                )
                .arg(
                    Arg::new("config")
                        .help("Site settings file (toml)")
                        .short('c')
                        .long("config"),
                ),
        )
        .subcommand(
            Command::new("verify")
                .about("Checks an emitted tree for structural violations")
                .arg(
                    Arg::new("path")
                        .help("Root of the tree to verify")
                        .required(true),
                ),
        )
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("generate", args)) => handle_generate(args)?,
        Some(("preview", args)) => handle_preview(args)?,
        Some(("verify", args)) => handle_verify(args)?,
        _ => unreachable!(),
    }

    Ok(())
}

fn init_logging(is_verbose: bool) {
    let default_filter = if is_verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn handle_generate(args: &ArgMatches) -> miette::Result<()> {
    let destination = args
        .get_one::<String>("destination")
        .expect("destination required");

    let options = api::GenerateOptions {
        force: args.get_flag("force"),
        assume_yes: args.get_flag("yes"),
        config: args.get_one::<String>("config").map(PathBuf::from),
        git_init: args.get_flag("git-init"),
    };

    api::generate(destination, &options)?;

    Ok(())
}

fn handle_preview(args: &ArgMatches) -> miette::Result<()> {
    let destination = args
        .get_one::<String>("destination")
        .expect("destination has a default");

    let config = args.get_one::<String>("config").map(PathBuf::from);

    api::preview(destination, config.as_deref())?;

    Ok(())
}

fn handle_verify(args: &ArgMatches) -> miette::Result<()> {
    let path = args.get_one::<String>("path").expect("path required");

    api::verify(path)?;

    Ok(())
}
