use projtrack_core::{
    EntityId, ImportError, ImportOutcome, ImportReconciler, ImportStatus, ImportStore,
    Importable, RepoError, RepoResult, SubProject, Task, TaskStatus,
};
use std::cell::{Cell, RefCell};

/// In-memory store that records every call made by the reconciler.
struct RecordingStore<T> {
    rows: RefCell<Vec<T>>,
    get_all_calls: Cell<usize>,
    import_calls: RefCell<Vec<Vec<T>>>,
    forced_outcome: Option<ImportOutcome>,
    fail_reads: bool,
}

impl<T: Clone> RecordingStore<T> {
    fn with_rows(rows: Vec<T>) -> Self {
        Self {
            rows: RefCell::new(rows),
            get_all_calls: Cell::new(0),
            import_calls: RefCell::new(Vec::new()),
            forced_outcome: None,
            fail_reads: false,
        }
    }

    fn import_calls(&self) -> Vec<Vec<T>> {
        self.import_calls.borrow().clone()
    }
}

impl ImportStore<SubProject> for RecordingStore<SubProject> {
    fn get_all(&self) -> RepoResult<Vec<SubProject>> {
        self.get_all_calls.set(self.get_all_calls.get() + 1);
        if self.fail_reads {
            return Err(RepoError::InvalidData("read failed".to_string()));
        }
        Ok(self.rows.borrow().clone())
    }

    fn import(&self, entities: &[SubProject]) -> RepoResult<ImportOutcome> {
        self.import_calls.borrow_mut().push(entities.to_vec());
        if let Some(outcome) = &self.forced_outcome {
            return Ok(outcome.clone());
        }
        let mut rows = self.rows.borrow_mut();
        for entity in entities {
            let mut stored = entity.clone();
            stored.id = rows.len() as EntityId + 1;
            rows.push(stored);
        }
        Ok(ImportOutcome::imported(entities.len()))
    }
}

impl ImportStore<Task> for RecordingStore<Task> {
    fn get_all(&self) -> RepoResult<Vec<Task>> {
        self.get_all_calls.set(self.get_all_calls.get() + 1);
        Ok(self.rows.borrow().clone())
    }

    fn import(&self, entities: &[Task]) -> RepoResult<ImportOutcome> {
        self.import_calls.borrow_mut().push(entities.to_vec());
        Ok(ImportOutcome::imported(entities.len()))
    }
}

fn stored_sub_project(id: EntityId, code: &str, name: &str) -> SubProject {
    let mut sub_project = SubProject::new(1, code, name);
    sub_project.id = id;
    sub_project.created_at = 1_700_000_000_000 + id;
    sub_project
}

fn existing_ten() -> Vec<SubProject> {
    (1..=10)
        .map(|id| stored_sub_project(id, &format!("SP-{id}"), &format!("Sub project {id}")))
        .collect()
}

#[test]
fn missing_batch_is_invalid_argument_without_store_calls() {
    let store = RecordingStore::with_rows(existing_ten());
    let reconciler = ImportReconciler::<SubProject, _>::new(&store);

    let err = reconciler.import(None).unwrap_err();

    assert!(matches!(err, ImportError::InvalidArgument("batch")));
    assert_eq!(store.get_all_calls.get(), 0);
    assert!(store.import_calls().is_empty());
}

#[test]
fn empty_batch_is_bad_request_without_store_calls() {
    let store = RecordingStore::with_rows(existing_ten());
    let reconciler = ImportReconciler::<SubProject, _>::new(&store);

    let outcome = reconciler.import(Some(&[][..])).unwrap();

    assert_eq!(outcome.status, ImportStatus::BadRequest);
    assert_eq!(outcome.message, "list to import should be filled");
    assert_eq!(outcome.count, 0);
    assert_eq!(store.get_all_calls.get(), 0);
    assert!(store.import_calls().is_empty());
}

#[test]
fn new_codes_are_imported_in_one_bulk_call() {
    let existing: Vec<SubProject> = existing_ten().into_iter().take(5).collect();
    let store = RecordingStore::with_rows(existing);
    let batch = vec![
        SubProject::new(1, "NEW-1", "First"),
        SubProject::new(1, "NEW-2", "Second"),
        SubProject::new(1, "NEW-3", "Third"),
    ];

    let outcome = ImportReconciler::<SubProject, _>::new(&store)
        .import(Some(batch.as_slice()))
        .unwrap();

    assert_eq!(outcome, ImportOutcome::imported(3));
    assert_eq!(outcome.message, "imported");
    assert_eq!(store.get_all_calls.get(), 1);
    assert_eq!(store.import_calls(), vec![batch]);
}

#[test]
fn batch_identical_to_stored_rows_is_already_imported() {
    let store = RecordingStore::with_rows(existing_ten());
    let batch = vec![
        SubProject::new(1, "SP-2", "Sub project 2"),
        SubProject::new(1, "SP-7", "Sub project 7"),
    ];

    let outcome = ImportReconciler::<SubProject, _>::new(&store)
        .import(Some(batch.as_slice()))
        .unwrap();

    assert_eq!(outcome.status, ImportStatus::Ok);
    assert_eq!(outcome.message, "already imported");
    assert_eq!(outcome.count, 0);
    assert!(store.import_calls().is_empty());
}

#[test]
fn conflicting_codes_reject_whole_batch_and_list_ids_in_stored_order() {
    let store = RecordingStore::with_rows(existing_ten());
    let batch = vec![
        SubProject::new(1, "SP-5", "Renamed five"),
        SubProject::new(1, "NEW-1", "Fresh"),
        SubProject::new(1, "SP-1", "Renamed one"),
        SubProject::new(1, "NEW-2", "Fresh too"),
        SubProject::new(1, "SP-3", "Renamed three"),
    ];

    let outcome = ImportReconciler::<SubProject, _>::new(&store)
        .import(Some(batch.as_slice()))
        .unwrap();

    assert_eq!(outcome.status, ImportStatus::Conflict);
    assert!(outcome.message.ends_with("CONFLICTS:1,3,5"));
    assert_eq!(outcome.count, 0);
    assert!(store.import_calls().is_empty());
}

#[test]
fn duplicates_are_dropped_before_writing_new_rows() {
    let store = RecordingStore::with_rows(existing_ten());
    let batch = vec![
        SubProject::new(1, "SP-4", "Sub project 4"),
        SubProject::new(1, "NEW-1", "Fresh"),
        SubProject::new(1, "NEW-1", "Fresh"),
    ];

    let outcome = ImportReconciler::<SubProject, _>::new(&store)
        .import(Some(batch.as_slice()))
        .unwrap();

    assert_eq!(outcome, ImportOutcome::imported(1));
    let calls = store.import_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], vec![SubProject::new(1, "NEW-1", "Fresh")]);
}

#[test]
fn same_code_twice_with_different_fields_is_bad_request_without_write() {
    let store = RecordingStore::with_rows(Vec::new());
    let batch = vec![
        SubProject::new(1, "SP-1", "One"),
        SubProject::new(1, "SP-1", "Uno"),
    ];

    let outcome = ImportReconciler::<SubProject, _>::new(&store)
        .import(Some(batch.as_slice()))
        .unwrap();

    assert_eq!(outcome.status, ImportStatus::BadRequest);
    assert_eq!(
        outcome.message,
        "code `SP-1` appears more than once with different fields"
    );
    assert!(store.import_calls().is_empty());
}

#[test]
fn store_refusal_becomes_invariant_violation_with_store_message() {
    let mut store = RecordingStore::with_rows(Vec::new());
    store.forced_outcome = Some(ImportOutcome::bad_request("FOREIGN KEY constraint failed"));
    let batch = vec![SubProject::new(9, "SP-1", "Orphan")];

    let err = ImportReconciler::<SubProject, _>::new(&store)
        .import(Some(batch.as_slice()))
        .unwrap_err();

    match err {
        ImportError::InvariantViolation(message) => {
            assert_eq!(message, "FOREIGN KEY constraint failed")
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.import_calls().len(), 1);
}

#[test]
fn read_failure_propagates_as_repo_error() {
    let mut store = RecordingStore::<SubProject>::with_rows(Vec::new());
    store.fail_reads = true;
    let batch = vec![SubProject::new(1, "SP-1", "One")];

    let err = ImportReconciler::<SubProject, _>::new(&store)
        .import(Some(batch.as_slice()))
        .unwrap_err();

    assert!(matches!(err, ImportError::Repo(RepoError::InvalidData(_))));
    assert!(store.import_calls().is_empty());
}

#[test]
fn second_import_of_same_batch_is_already_imported() {
    let store = RecordingStore::with_rows(existing_ten());
    let reconciler = ImportReconciler::<SubProject, _>::new(&store);
    let batch = vec![
        SubProject::new(1, "NEW-1", "Fresh"),
        SubProject::new(1, "NEW-2", "Fresh too"),
    ];

    let first = reconciler.import(Some(batch.as_slice())).unwrap();
    let second = reconciler.import(Some(batch.as_slice())).unwrap();

    assert_eq!(first, ImportOutcome::imported(2));
    assert_eq!(second, ImportOutcome::already_imported());
    assert_eq!(store.import_calls().len(), 1);
}

#[test]
fn custom_comparator_decides_what_counts_as_duplicate() {
    let store = RecordingStore::with_rows(existing_ten());
    let code_only = |left: &SubProject, right: &SubProject| left.code() == right.code();
    let reconciler = ImportReconciler::with_comparator(&store, code_only);
    let batch = vec![SubProject::new(1, "SP-1", "Renamed one")];

    let outcome = reconciler.import(Some(batch.as_slice())).unwrap();

    assert_eq!(outcome, ImportOutcome::already_imported());
}

#[test]
fn task_status_difference_is_a_conflict() {
    let mut stored = Task::new(4, "T-1", "Write migration");
    stored.id = 17;
    let store = RecordingStore::with_rows(vec![stored]);
    let mut incoming = Task::new(4, "T-1", "Write migration");
    incoming.status = TaskStatus::Done;

    let outcome = ImportReconciler::<Task, _>::new(&store)
        .import(Some(std::slice::from_ref(&incoming)))
        .unwrap();

    assert_eq!(outcome.status, ImportStatus::Conflict);
    assert!(outcome.message.ends_with("CONFLICTS:17"));
    assert!(store.import_calls().is_empty());
}
