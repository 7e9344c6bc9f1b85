use crate::{
    catalog::{blueprint, DirTemplate},
    config::SiteConfig,
    errors::{FileOperation, IoError},
    transactions::{Active, RollbackOperation, Transaction},
    vfs::VirtualFS,
};
use colored::Colorize;
use miette::Diagnostic;
use std::path::Path;
use tera::{Context, Tera};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum RenderError {
    #[error("I/O error within render domain")]
    #[diagnostic(code(temelie::render::io))]
    Io(#[from] IoError),

    #[error("Error occurred attempting to render template for '{file}'")]
    #[diagnostic(code(temelie::render::template))]
    Template {
        file: String,
        #[source]
        source: tera::Error,
    },

    #[error("Destination '{path}' already exists")]
    #[diagnostic(
        code(temelie::render::destination_exists),
        help("Pass --force to replace the existing tree")
    )]
    DestinationExists { path: std::path::PathBuf },
}

/// Builds the base tera context from the site settings. Per-app values are
/// layered on top per directory.
fn site_context(config: &SiteConfig) -> Context {
    let mut ctx = Context::new();

    ctx.insert("domain", &config.domain);
    ctx.insert("namespace", &config.namespace);
    ctx.insert("acme_email", &config.acme_email);
    ctx.insert("traefik_version", &config.traefik_chart_version);
    ctx.insert("nfs_server", &config.nfs.server);
    ctx.insert("nfs_path", &config.nfs.path);
    ctx.insert("nfs_capacity", &config.nfs.capacity);
    ctx.insert("smb_source", &config.smb.source);
    ctx.insert("smb_capacity", &config.smb.capacity);
    ctx.insert("smb_username", &config.smb.username);
    ctx.insert("smb_password", &config.smb.password);

    ctx
}

fn dir_context(base: &Context, dir: &DirTemplate) -> Context {
    let mut ctx = base.clone();

    if let Some(app) = &dir.app {
        ctx.insert("app", app.name);
        ctx.insert("image", app.image);
        ctx.insert("port", &app.port);
    }

    ctx
}

/// Renders the whole blueprint against `config` into a [`VirtualFS`],
/// without touching the filesystem.
pub fn build_vfs(config: &SiteConfig) -> Result<VirtualFS, RenderError> {
    let mut tera = Tera::default();
    let base_ctx = site_context(config);

    let mut vfs = VirtualFS::new();

    for dir in blueprint() {
        let dir_path = Path::new(&dir.path);

        if !dir.path.is_empty() {
            vfs.push_dir(dir_path.to_path_buf());
        }

        let ctx = dir_context(&base_ctx, &dir);

        for file in &dir.files {
            let rendered =
                tera.render_str(file.body, &ctx)
                    .map_err(|error| RenderError::Template {
                        file: dir_path.join(file.name).display().to_string(),
                        source: error,
                    })?;

            vfs.push_file(dir_path.join(file.name), rendered);
        }
    }

    Ok(vfs)
}

/// Removes a pre-existing destination tree, or refuses when `force` is off.
pub fn clear_destination(destination: &Path, force: bool) -> Result<(), RenderError> {
    if !destination.exists() {
        return Ok(());
    }

    if !force {
        return Err(RenderError::DestinationExists {
            path: destination.to_path_buf(),
        });
    }

    log::debug!("clearing prior output at {}", destination.display());

    std::fs::remove_dir_all(destination)
        .map_err(|error| IoError::new(FileOperation::Rmdir, destination.to_path_buf(), error))?;

    Ok(())
}

/// Applies the staged entries under `destination_root`, registering each
/// mutation on the transaction.
pub fn apply_vfs(
    vfs: &VirtualFS,
    destination_root: &Path,
    trx: &mut Transaction<Active>,
) -> Result<(), RenderError> {
    create_directory(trx, destination_root)?;

    for entry in &vfs.entries {
        let final_path = destination_root.join(&entry.path);

        if entry.is_file {
            let contents = entry.content.clone().unwrap_or_default();

            write_file(trx, &final_path, contents)?;
        } else {
            create_directory(trx, &final_path)?;
        }
    }

    Ok(())
}

fn create_directory(trx: &mut Transaction<Active>, path: &Path) -> Result<(), RenderError> {
    std::fs::create_dir_all(path)
        .map_err(|error| IoError::new(FileOperation::Mkdir, path.into(), error))?;

    trx.add_operation(RollbackOperation::RemoveDir(path.to_path_buf()));

    Ok(())
}

fn write_file(
    trx: &mut Transaction<Active>,
    path: &Path,
    contents: String,
) -> Result<(), RenderError> {
    std::fs::write(path, contents)
        .map_err(|error| IoError::new(FileOperation::Write, path.into(), error))?;

    println!("{} {}", "create".green(), path.display());

    trx.add_operation(RollbackOperation::RemoveFile(path.to_path_buf()));

    Ok(())
}
