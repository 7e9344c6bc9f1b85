use crate::{
    config::{self, SiteConfig},
    preview::preview_as_tree,
    prompt, render, repo, transactions, verify,
};
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum TemelieError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Render(#[from] render::RenderError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Prompt(#[from] prompt::PromptError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Repo(#[from] repo::RepoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Verify(#[from] verify::VerifyError),
}

#[derive(Debug, Default)]
pub struct GenerateOptions {
    /// Replace an existing destination tree.
    pub force: bool,
    /// Skip the confirmation prompt after the preview.
    pub assume_yes: bool,
    /// Optional site settings file; defaults reproduce the reference tree.
    pub config: Option<PathBuf>,
    /// Initialize the destination as a git repository after a successful run.
    pub git_init: bool,
}

/// Renders the homelab tree, previews it, and writes it to `destination`.
///
/// Every directory and file creation is registered on a rollback
/// transaction; a failure partway through leaves no half-written output.
///
/// # Errors
///
/// Returns a [`TemelieError`] if:
///
/// - The site settings file cannot be read or parsed.
/// - The destination exists and `force` is off.
/// - A directory or file cannot be created or written to.
/// - Tera fails to render a manifest template.
/// - `git_init` is requested and the repository cannot be created.
pub fn generate(destination: &str, options: &GenerateOptions) -> Result<(), TemelieError> {
    let config = SiteConfig::load(options.config.as_deref())?;

    let destination_path = PathBuf::from(destination);

    if !options.force && destination_path.exists() {
        return Err(render::RenderError::DestinationExists {
            path: destination_path,
        }
        .into());
    }

    let vfs = render::build_vfs(&config)?;

    log::debug!("staged {} entries", vfs.entries.len());

    preview_as_tree(&vfs, &destination_path);

    if !options.assume_yes && !prompt::confirm_apply()? {
        println!("{} nothing written", "aborted".yellow());

        return Ok(());
    }

    render::clear_destination(&destination_path, options.force)?;

    let mut trx = transactions::Transaction::new();

    render::apply_vfs(&vfs, &destination_path, &mut trx)?;

    let _committed = trx.commit();

    if options.git_init {
        repo::init_and_commit(&destination_path)?;
    }

    Ok(())
}

/// Prints the tree `generate` would write, without touching the filesystem.
///
/// # Errors
///
/// Returns a [`TemelieError`] if the site settings file cannot be read or a
/// manifest template fails to render.
pub fn preview(destination: &str, config_path: Option<&Path>) -> Result<(), TemelieError> {
    let config = SiteConfig::load(config_path)?;

    let vfs = render::build_vfs(&config)?;

    preview_as_tree(&vfs, Path::new(destination));

    Ok(())
}

/// Checks an emitted tree for dangling kustomization resources, duplicate
/// Ingress hosts and reference cycles.
///
/// # Errors
///
/// Returns a [`TemelieError`] if the tree cannot be read or any structural
/// violation is found.
pub fn verify(root: &str) -> Result<(), TemelieError> {
    verify::verify_tree(Path::new(root))?;

    Ok(())
}
