use std::{fs, marker::PhantomData, path::PathBuf};

/// Filesystem mutations that can be undone when a run is abandoned.
pub enum RollbackOperation {
    RemoveFile(PathBuf),
    RemoveDir(PathBuf),
}

/// Transaction still collecting operations.
pub struct Active;
/// Transaction resolved successfully; nothing to undo.
pub struct Committed;
/// Transaction abandoned; rollback happens on drop.
pub struct Canceled;

pub trait TransactionState {
    const SHOULD_ROLLBACK: bool;
}
impl TransactionState for Active {
    const SHOULD_ROLLBACK: bool = true;
}
impl TransactionState for Committed {
    const SHOULD_ROLLBACK: bool = false;
}
impl TransactionState for Canceled {
    const SHOULD_ROLLBACK: bool = true;
}

/// Tracks every directory and file created while applying a tree so a failed
/// or declined run leaves no half-written output behind.
///
/// A `Transaction<Active>` records a [`RollbackOperation`] per mutation.
/// [`commit`](Transaction::commit) discards them; dropping the transaction
/// while still `Active` (an early return through `?`) or after
/// [`cancel`](Transaction::cancel) undoes them in reverse order.
pub struct Transaction<State: TransactionState> {
    rollback_operations: Vec<RollbackOperation>,
    state: PhantomData<State>,
}
impl Transaction<Active> {
    pub fn new() -> Self {
        Transaction {
            rollback_operations: vec![],
            state: PhantomData,
        }
    }

    pub fn add_operation(&mut self, operation: RollbackOperation) {
        self.rollback_operations.push(operation);
    }

    /// Finalizes the transaction; the created tree is kept.
    pub fn commit(mut self) -> Transaction<Committed> {
        self.rollback_operations.clear();

        Transaction {
            rollback_operations: vec![],
            state: PhantomData,
        }
    }

    /// Abandons the transaction; everything recorded is removed on drop.
    pub fn cancel(mut self) -> Transaction<Canceled> {
        let rollback_operations = std::mem::take(&mut self.rollback_operations);

        Transaction {
            rollback_operations,
            state: PhantomData,
        }
    }
}
impl Default for Transaction<Active> {
    fn default() -> Self {
        Self::new()
    }
}
impl<S: TransactionState> Drop for Transaction<S> {
    fn drop(&mut self) {
        if S::SHOULD_ROLLBACK && !self.rollback_operations.is_empty() {
            log::debug!("rolling back {} operations", self.rollback_operations.len());
            while let Some(operation) = self.rollback_operations.pop() {
                match operation {
                    RollbackOperation::RemoveDir(path) => {
                        log::debug!("removing dir: {}", path.display());
                        let _ = fs::remove_dir_all(&path);
                    }
                    RollbackOperation::RemoveFile(path) => {
                        log::debug!("removing file: {}", path.display());
                        let _ = fs::remove_file(&path);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropping_an_active_transaction_rolls_back() {
        let scratch = tempfile::tempdir().unwrap();
        let file = scratch.path().join("deployment.yaml");
        fs::write(&file, "kind: Deployment\n").unwrap();

        {
            let mut trx = Transaction::<Active>::new();
            trx.add_operation(RollbackOperation::RemoveFile(file.clone()));
        }

        assert!(!file.exists());
    }

    #[test]
    fn committed_transaction_keeps_the_tree() {
        let scratch = tempfile::tempdir().unwrap();
        let file = scratch.path().join("service.yaml");
        fs::write(&file, "kind: Service\n").unwrap();

        let mut trx = Transaction::<Active>::new();
        trx.add_operation(RollbackOperation::RemoveFile(file.clone()));
        let _committed = trx.commit();

        assert!(file.exists());
    }

    #[test]
    fn canceled_transaction_removes_directories() {
        let scratch = tempfile::tempdir().unwrap();
        let dir = scratch.path().join("apps");
        fs::create_dir_all(&dir).unwrap();

        let mut trx = Transaction::<Active>::new();
        trx.add_operation(RollbackOperation::RemoveDir(dir.clone()));
        drop(trx.cancel());

        assert!(!dir.exists());
    }
}
