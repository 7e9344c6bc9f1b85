use git2::{IndexAddOption, Repository, Signature};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum RepoError {
    #[error("unable to initialize git repository at '{path}': {source}")]
    #[diagnostic(code(temelie::repo::git_init))]
    GitInit {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("unable to commit emitted tree at '{path}': {source}")]
    #[diagnostic(
        code(temelie::repo::git_commit),
        help("The tree was written; commit it manually")
    )]
    GitCommit {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },
}

/// Turns a freshly emitted destination into a git repository with the whole
/// tree in an initial commit; FluxCD reconciles against git, not a bare
/// directory.
pub fn init_and_commit(destination: &Path) -> Result<(), RepoError> {
    let repository =
        Repository::init(destination).map_err(|error| RepoError::GitInit {
            path: destination.to_path_buf(),
            source: error,
        })?;

    let commit = |repository: &Repository| -> Result<(), git2::Error> {
        let mut index = repository.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = repository.find_tree(tree_id)?;

        let signature = Signature::now("temelie", "temelie@localhost")?;

        repository.commit(
            Some("HEAD"),
            &signature,
            &signature,
            "Scaffold homelab GitOps tree",
            &tree,
            &[],
        )?;

        Ok(())
    };

    commit(&repository).map_err(|error| RepoError::GitCommit {
        path: destination.to_path_buf(),
        source: error,
    })?;

    log::debug!("initial commit created at {}", destination.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emitted_tree_gets_an_initial_commit() {
        let scratch = tempfile::tempdir().unwrap();
        let destination = scratch.path().join("homelab-gitops");
        std::fs::create_dir_all(&destination).unwrap();
        std::fs::write(destination.join("README.md"), "# Homelab\n").unwrap();

        init_and_commit(&destination).unwrap();

        let repository = Repository::open(&destination).unwrap();
        let head = repository.head().unwrap().peel_to_commit().unwrap();

        assert_eq!(head.message(), Some("Scaffold homelab GitOps tree"));
        assert_eq!(head.parent_count(), 0);
    }
}
