use crate::{
    errors::{FileOperation, IoError},
    utils::resolve_reference,
};
use colored::Colorize;
use miette::Diagnostic;
use serde::Deserialize;
use indexmap::{map::Entry, IndexMap};
use std::{
    fmt,
    path::{Path, PathBuf},
};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error, Diagnostic)]
pub enum VerifyError {
    #[error("I/O error within verify domain")]
    #[diagnostic(code(temelie::verify::io))]
    Io(#[from] IoError),

    #[error("Unable to parse yaml file at '{path}': {source}")]
    #[diagnostic(code(temelie::verify::parse_yaml), help("Review yaml file"))]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Tree verification failed with {count} violation(s)")]
    #[diagnostic(
        code(temelie::verify::violations),
        help("Each violation is listed above")
    )]
    Violations { count: usize },
}

/// The slice of a `kustomization.yaml` the checks care about.
#[derive(Debug, Deserialize)]
struct Kustomization {
    #[serde(default)]
    resources: Vec<String>,
}

/// A single structural problem found in the tree.
#[derive(Debug)]
pub enum Violation {
    MissingResource {
        kustomization: PathBuf,
        resource: String,
    },
    DirectoryWithoutKustomization {
        kustomization: PathBuf,
        resource: String,
    },
    DuplicateHost {
        host: String,
        first: PathBuf,
        second: PathBuf,
    },
    ReferenceCycle {
        report: String,
    },
}
impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingResource {
                kustomization,
                resource,
            } => write!(
                f,
                "{} lists '{}' which does not exist",
                kustomization.display(),
                resource
            ),
            Violation::DirectoryWithoutKustomization {
                kustomization,
                resource,
            } => write!(
                f,
                "{} references directory '{}' which has no kustomization.yaml",
                kustomization.display(),
                resource
            ),
            Violation::DuplicateHost {
                host,
                first,
                second,
            } => write!(
                f,
                "host '{}' is claimed by both {} and {}",
                host,
                first.display(),
                second.display()
            ),
            Violation::ReferenceCycle { report } => {
                write!(f, "kustomization references form a cycle: {}", report)
            }
        }
    }
}

lazy_static::lazy_static! {
    static ref INGRESS_KIND_REGEX: regex::Regex =
        regex::Regex::new(r"(?m)^kind:\s*Ingress\s*$").expect("a valid regex pattern");
    static ref INGRESS_HOST_REGEX: regex::Regex =
        regex::Regex::new(r"(?m)^\s*-\s*host:\s*(\S+)").expect("a valid regex pattern");
}

fn read_file(path: &Path) -> Result<String, VerifyError> {
    std::fs::read_to_string(path)
        .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error).into())
}

/// Walks an emitted tree and collects every structural violation:
/// kustomizations pointing at missing resources, directory references
/// without their own kustomization, duplicate Ingress hosts and reference
/// cycles between kustomization directories.
pub fn collect_violations(root: &Path) -> Result<Vec<Violation>, VerifyError> {
    let mut violations = Vec::new();

    // node = kustomization directory (relative), edge = directory reference
    let mut kustomization_dirs: Vec<String> = Vec::new();
    let mut reference_edges: Vec<(String, String)> = Vec::new();

    // insertion-ordered so duplicate reports are deterministic
    let mut hosts_seen: IndexMap<String, PathBuf> = IndexMap::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(error) => {
                let path = error.path().unwrap_or_else(|| Path::new(""));

                Err(IoError::new(
                    FileOperation::Read,
                    path.to_path_buf(),
                    error.into(),
                ))?
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let full_path = entry.path();
        let relative = full_path.strip_prefix(root).unwrap_or(full_path);

        if entry.file_name() == std::ffi::OsStr::new("kustomization.yaml") {
            let dir = relative.parent().unwrap_or_else(|| Path::new(""));

            let content = read_file(full_path)?;
            let parsed: Kustomization =
                serde_yaml::from_str(&content).map_err(|error| VerifyError::ParseYaml {
                    path: full_path.to_path_buf(),
                    source: error,
                })?;

            kustomization_dirs.push(dir.display().to_string());

            for resource in &parsed.resources {
                let resolved = resolve_reference(dir, resource);
                let on_disk = root.join(&resolved);

                if on_disk.is_file() {
                    continue;
                }

                if on_disk.is_dir() {
                    if on_disk.join("kustomization.yaml").is_file() {
                        reference_edges
                            .push((dir.display().to_string(), resolved.display().to_string()));
                    } else {
                        violations.push(Violation::DirectoryWithoutKustomization {
                            kustomization: relative.to_path_buf(),
                            resource: resource.clone(),
                        });
                    }
                } else {
                    violations.push(Violation::MissingResource {
                        kustomization: relative.to_path_buf(),
                        resource: resource.clone(),
                    });
                }
            }
        }

        if full_path.extension().map(|ext| ext == "yaml").unwrap_or(false) {
            let content = read_file(full_path)?;

            if INGRESS_KIND_REGEX.is_match(&content) {
                for capture in INGRESS_HOST_REGEX.captures_iter(&content) {
                    let host = capture[1].to_string();

                    match hosts_seen.entry(host) {
                        Entry::Occupied(entry) => violations.push(Violation::DuplicateHost {
                            host: entry.key().clone(),
                            first: entry.get().clone(),
                            second: relative.to_path_buf(),
                        }),
                        Entry::Vacant(entry) => {
                            entry.insert(relative.to_path_buf());
                        }
                    }
                }
            }
        }
    }

    let graph = ordine::Graph {
        nodes: kustomization_dirs,
        edges: reference_edges,
    };
    if let Err(error) = ordine::sort_graph(&graph) {
        violations.push(Violation::ReferenceCycle {
            report: error.to_string(),
        });
    }

    Ok(violations)
}

/// Verifies an emitted tree, printing every violation before failing.
pub fn verify_tree(root: &Path) -> Result<(), VerifyError> {
    let violations = collect_violations(root)?;

    if violations.is_empty() {
        println!("{} {}", "ok".green(), root.display());

        return Ok(());
    }

    for violation in &violations {
        eprintln!("{} {}", "violation".red(), violation);
    }

    Err(VerifyError::Violations {
        count: violations.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, path: &str, content: &str) {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    #[test]
    fn freshly_generated_tree_is_clean() {
        let scratch = tempfile::tempdir().unwrap();
        let destination = scratch.path().join("homelab-gitops");

        let vfs = crate::render::build_vfs(&crate::config::SiteConfig::default()).unwrap();
        let mut trx = crate::transactions::Transaction::new();
        crate::render::apply_vfs(&vfs, &destination, &mut trx).unwrap();
        let _committed = trx.commit();

        let violations = collect_violations(&destination).unwrap();

        assert!(violations.is_empty(), "unexpected: {:?}", violations);
    }

    #[test]
    fn dangling_resource_is_reported() {
        let scratch = tempfile::tempdir().unwrap();
        let root = scratch.path();

        write(
            root,
            "apps/sonarr/kustomization.yaml",
            "resources:\n  - deployment.yaml\n",
        );

        let violations = collect_violations(root).unwrap();

        assert!(matches!(
            violations.as_slice(),
            [Violation::MissingResource { resource, .. }] if resource == "deployment.yaml"
        ));
    }

    #[test]
    fn directory_reference_needs_its_own_kustomization() {
        let scratch = tempfile::tempdir().unwrap();
        let root = scratch.path();

        write(
            root,
            "clusters/kustomization.yaml",
            "resources:\n  - ../apps\n",
        );
        write(root, "apps/deployment.yaml", "kind: Deployment\n");

        let violations = collect_violations(root).unwrap();

        assert!(matches!(
            violations.as_slice(),
            [Violation::DirectoryWithoutKustomization { .. }]
        ));
    }

    #[test]
    fn duplicate_hosts_are_reported() {
        let scratch = tempfile::tempdir().unwrap();
        let root = scratch.path();

        let ingress = "kind: Ingress\nspec:\n  rules:\n    - host: sonarr.hont.ro\n";
        write(root, "a/ingress.yaml", ingress);
        write(root, "b/ingress.yaml", ingress);

        let violations = collect_violations(root).unwrap();

        assert!(matches!(
            violations.as_slice(),
            [Violation::DuplicateHost { host, .. }] if host == "sonarr.hont.ro"
        ));
    }

    #[test]
    fn mutual_directory_references_are_a_cycle() {
        let scratch = tempfile::tempdir().unwrap();
        let root = scratch.path();

        write(root, "a/kustomization.yaml", "resources:\n  - ../b\n");
        write(root, "b/kustomization.yaml", "resources:\n  - ../a\n");

        let violations = collect_violations(root).unwrap();

        assert!(violations
            .iter()
            .any(|violation| matches!(violation, Violation::ReferenceCycle { .. })));
    }
}
