use notekeep_core::db::{open_db_in_memory, shared};
use notekeep_core::{
    Content, ErrorKind, InMemoryNoteRepository, InMemoryUserStore, Note, NoteId, NoteRepository,
    NotesService, NotesServiceError, RepoError, RepoResult, SqliteNoteRepository,
    SqliteUserRepository, Title, UpdateNote, User, UserId, UserLookup, UserResult,
    UserStoreError,
};
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

const ROB: UserId = Uuid::from_u128(1);
const ANNA: UserId = Uuid::from_u128(2);

fn fixture_notes() -> Vec<Note> {
    vec![
        note(1, "robs 1st note", "robs 1st note content", ROB),
        note(2, "robs 2nd note", "robs 2nd note content", ROB),
        note(3, "annas 1st note", "annas 1st note content", ANNA),
        note(4, "annas 2nd note", "annas 2nd note content", ANNA),
    ]
}

fn fixture_users() -> Vec<User> {
    vec![
        User::with_id(ROB, "rob", "rob@example.com"),
        User::with_id(ANNA, "anna", "anna@example.com"),
    ]
}

fn note(id: u128, title: &str, content: &str, user_id: UserId) -> Note {
    Note::with_id(
        Uuid::from_u128(id),
        Title::new(title),
        Content::new(content),
        user_id,
    )
}

fn setup() -> NotesService<InMemoryNoteRepository, InMemoryUserStore> {
    NotesService::new(
        InMemoryNoteRepository::with_notes(fixture_notes()).unwrap(),
        InMemoryUserStore::new(fixture_users()).unwrap(),
    )
}

fn sorted(mut notes: Vec<Note>) -> Vec<Note> {
    notes.sort_by_key(|note| note.id);
    notes
}

/// Counts calls and forwards to an in-memory repository.
#[derive(Default)]
struct SpyNoteRepository {
    inner: InMemoryNoteRepository,
    creates: AtomicUsize,
    updates: AtomicUsize,
}

impl NoteRepository for SpyNoteRepository {
    fn create(&self, note: &Note) -> RepoResult<()> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(note)
    }

    fn get_by_id(&self, id: NoteId) -> RepoResult<Note> {
        self.inner.get_by_id(id)
    }

    fn get_by_user_id(&self, user_id: UserId) -> RepoResult<Vec<Note>> {
        self.inner.get_by_user_id(user_id)
    }

    fn update(&self, note: &Note) -> RepoResult<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update(note)
    }

    fn delete(&self, id: NoteId) -> RepoResult<()> {
        self.inner.delete(id)
    }
}

/// Fails every call with a persistence error.
struct FailingNoteRepository;

impl NoteRepository for FailingNoteRepository {
    fn create(&self, _note: &Note) -> RepoResult<()> {
        Err(RepoError::InvalidData("DBError".to_string()))
    }

    fn get_by_id(&self, _id: NoteId) -> RepoResult<Note> {
        Err(RepoError::InvalidData("DBError".to_string()))
    }

    fn get_by_user_id(&self, _user_id: UserId) -> RepoResult<Vec<Note>> {
        Err(RepoError::InvalidData("DBError".to_string()))
    }

    fn update(&self, _note: &Note) -> RepoResult<()> {
        Err(RepoError::InvalidData("DBError".to_string()))
    }

    fn delete(&self, _id: NoteId) -> RepoResult<()> {
        Err(RepoError::InvalidData("DBError".to_string()))
    }
}

/// Fails every lookup as if the user store were unusable.
struct FailingUserLookup;

impl UserLookup for FailingUserLookup {
    fn query_by_id(&self, _user_id: UserId) -> UserResult<Option<User>> {
        Err(UserStoreError::LockPoisoned)
    }
}

#[test]
fn create_then_query_returns_equal_note() {
    let service = setup();
    let created = service
        .create(UpdateNote::new(
            Title::new("new note title"),
            Content::new("new note content"),
            ROB,
        ))
        .unwrap();

    assert!(!created.id.is_nil());
    assert_eq!(created.title.as_str(), "new note title");
    assert_eq!(created.content.as_str(), "new note content");
    assert_eq!(created.user_id, ROB);
    assert_eq!(service.query_by_id(created.id).unwrap(), created);
}

#[test]
fn create_generates_distinct_ids() {
    let service = setup();
    let first = service.create(UpdateNote::new(Title::new("a"), Content::default(), ROB));
    let second = service.create(UpdateNote::new(Title::new("a"), Content::default(), ROB));
    assert_ne!(first.unwrap().id, second.unwrap().id);
}

#[test]
fn create_with_unknown_owner_is_rejected_without_persistence() {
    let spy = Arc::new(SpyNoteRepository::default());
    let service = NotesService::new(Arc::clone(&spy), InMemoryUserStore::new(fixture_users()).unwrap());
    let stranger = Uuid::new_v4();

    let err = service
        .create(UpdateNote::new(Title::new(""), Content::new(""), stranger))
        .unwrap_err();

    assert!(matches!(err, NotesServiceError::InvalidOwner(id) if id == stranger));
    assert_eq!(err.kind(), ErrorKind::InvalidOwner);
    assert_eq!(spy.creates.load(Ordering::SeqCst), 0);
    assert!(spy.inner.is_empty().unwrap());
}

#[test]
fn create_wraps_repository_failure() {
    let service = NotesService::new(FailingNoteRepository, InMemoryUserStore::new(fixture_users()).unwrap());
    let err = service
        .create(UpdateNote::new(Title::new("t"), Content::new("c"), ROB))
        .unwrap_err();

    assert!(matches!(err, NotesServiceError::CreateFailed { .. }));
    assert_eq!(err.kind(), ErrorKind::Persistence);
    assert!(err.to_string().starts_with("create: ["));
    assert!(err.source().is_some());
}

#[test]
fn create_surfaces_user_lookup_failure_without_persistence() {
    let spy = Arc::new(SpyNoteRepository::default());
    let service = NotesService::new(Arc::clone(&spy), FailingUserLookup);

    let err = service
        .create(UpdateNote::new(Title::new("t"), Content::new("c"), ROB))
        .unwrap_err();

    assert!(matches!(
        err,
        NotesServiceError::UserLookup {
            user_id,
            source: UserStoreError::LockPoisoned,
        } if user_id == ROB
    ));
    assert_eq!(err.kind(), ErrorKind::Persistence);
    assert_eq!(
        err.to_string(),
        format!("user lookup [{ROB}]: user store lock poisoned")
    );
    assert!(err.source().is_some());
    assert_eq!(spy.creates.load(Ordering::SeqCst), 0);
    assert!(spy.inner.is_empty().unwrap());
}

#[test]
fn update_applies_only_set_fields() {
    struct Case {
        name: &'static str,
        patch: UpdateNote,
        want: Note,
    }

    let current = fixture_notes()[0].clone();
    let cases = [
        Case {
            name: "new title and explicitly empty content update both",
            patch: UpdateNote::new(Title::new("new title"), Content::new(""), ROB),
            want: Note::with_id(current.id, Title::new("new title"), Content::new(""), ROB),
        },
        Case {
            name: "new title and unset content update only the title",
            patch: UpdateNote::new(Title::new("new title"), Content::default(), ROB),
            want: Note::with_id(
                current.id,
                Title::new("new title"),
                Content::new("robs 1st note content"),
                ROB,
            ),
        },
        Case {
            name: "explicitly empty title and new content update both, owner kept",
            patch: UpdateNote::new(Title::new(""), Content::new("new content"), ANNA),
            want: Note::with_id(current.id, Title::new(""), Content::new("new content"), ROB),
        },
        Case {
            name: "unset title and content change nothing",
            patch: UpdateNote::new(Title::default(), Content::default(), ANNA),
            want: current.clone(),
        },
    ];

    for case in cases {
        let service = setup();
        let got = service.update(current.clone(), case.patch).unwrap();
        assert_eq!(got, case.want, "{}", case.name);
        assert_eq!(service.query_by_id(current.id).unwrap(), case.want, "{}", case.name);
    }
}

#[test]
fn noop_update_still_persists_current_once() {
    let spy = Arc::new(SpyNoteRepository {
        inner: InMemoryNoteRepository::with_notes(fixture_notes()).unwrap(),
        ..SpyNoteRepository::default()
    });
    let service = NotesService::new(Arc::clone(&spy), InMemoryUserStore::new(fixture_users()).unwrap());
    let current = fixture_notes()[1].clone();

    let got = service.update(current.clone(), UpdateNote::default()).unwrap();

    assert_eq!(got, current);
    assert_eq!(spy.updates.load(Ordering::SeqCst), 1);
    assert_eq!(spy.get_by_id(current.id).unwrap(), current);
}

#[test]
fn update_of_missing_note_fails_with_not_found_kind() {
    let service = setup();
    let ghost = note(42, "ghost", "ghost", ROB);
    let err = service
        .update(ghost, UpdateNote::new(Title::new("t"), Content::default(), ROB))
        .unwrap_err();

    assert!(matches!(
        err,
        NotesServiceError::UpdateFailed {
            source: RepoError::NotFound(_),
            ..
        }
    ));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().starts_with("update: "));
}

#[test]
fn delete_then_query_is_not_found() {
    let service = setup();
    let id = Uuid::from_u128(1);

    service.delete(id).unwrap();

    let err = service.query_by_id(id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains(&format!("getNoteByID: [{id}]")));
}

#[test]
fn delete_of_missing_note_is_wrapped() {
    let service = setup();
    let id = Uuid::nil();
    let err = service.delete(id).unwrap_err();

    assert_eq!(err.to_string(), format!("delete: [{id}]"));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn query_by_id_returns_seeded_notes() {
    let service = setup();
    for want in [fixture_notes()[0].clone(), fixture_notes()[2].clone()] {
        assert_eq!(service.query_by_id(want.id).unwrap(), want);
    }
}

#[test]
fn get_notes_by_user_id_returns_owned_notes_in_any_order() {
    let service = setup();
    assert_eq!(
        sorted(service.get_notes_by_user_id(ROB).unwrap()),
        fixture_notes()[..2].to_vec()
    );
    assert_eq!(
        sorted(service.get_notes_by_user_id(ANNA).unwrap()),
        fixture_notes()[2..].to_vec()
    );
}

#[test]
fn get_notes_by_unknown_user_is_user_scoped_not_found() {
    let service = setup();
    let stranger = Uuid::new_v4();
    let err = service.get_notes_by_user_id(stranger).unwrap_err();

    assert!(matches!(err, NotesServiceError::UnknownUser(id) if id == stranger));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err
        .to_string()
        .contains(&format!("getNoteByUserID: [{stranger}]")));
}

#[test]
fn get_notes_by_known_user_without_notes_is_empty() {
    let lonely = User::new("carl", "carl@example.com");
    let mut users = fixture_users();
    users.push(lonely.clone());
    let service = NotesService::new(
        InMemoryNoteRepository::with_notes(fixture_notes()).unwrap(),
        InMemoryUserStore::new(users).unwrap(),
    );

    assert!(service.get_notes_by_user_id(lonely.id).unwrap().is_empty());
}

#[test]
fn get_notes_by_user_id_forwards_repository_error() {
    let service = NotesService::new(FailingNoteRepository, InMemoryUserStore::new(fixture_users()).unwrap());
    let err = service.get_notes_by_user_id(ROB).unwrap_err();

    assert_eq!(
        err.to_string(),
        format!("getNoteByUserID: [{ROB}]: invalid persisted note data: DBError")
    );
    assert_eq!(err.kind(), ErrorKind::Persistence);
}

#[test]
fn get_notes_by_user_id_surfaces_user_lookup_failure() {
    let service = NotesService::new(
        InMemoryNoteRepository::with_notes(fixture_notes()).unwrap(),
        FailingUserLookup,
    );
    let err = service.get_notes_by_user_id(ANNA).unwrap_err();

    assert!(matches!(err, NotesServiceError::UserLookup { user_id, .. } if user_id == ANNA));
    assert_eq!(err.kind(), ErrorKind::Persistence);
    assert_eq!(
        err.to_string(),
        format!("user lookup [{ANNA}]: user store lock poisoned")
    );
}

#[test]
fn service_runs_against_sqlite_backend() {
    let conn = shared(open_db_in_memory().unwrap());
    let users = SqliteUserRepository::try_new(Arc::clone(&conn)).unwrap();
    for user in fixture_users() {
        users.create_user(&user).unwrap();
    }
    let notes = SqliteNoteRepository::try_new(conn).unwrap();
    let service = NotesService::new(notes, users);

    let created = service
        .create(UpdateNote::new(Title::new("title"), Content::default(), ANNA))
        .unwrap();
    assert_eq!(service.query_by_id(created.id).unwrap(), created);

    let updated = service
        .update(
            created.clone(),
            UpdateNote::new(Title::default(), Content::new("body"), ROB),
        )
        .unwrap();
    assert_eq!(updated.title.as_str(), "title");
    assert_eq!(updated.user_id, ANNA);
    assert_eq!(service.get_notes_by_user_id(ANNA).unwrap(), vec![updated]);

    let err = service
        .create(UpdateNote::new(Title::new("t"), Content::new("c"), Uuid::new_v4()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOwner);

    service.delete(created.id).unwrap();
    assert!(service.get_notes_by_user_id(ANNA).unwrap().is_empty());
}

#[test]
fn service_accepts_boxed_trait_objects() {
    let notes: Box<dyn NoteRepository> =
        Box::new(InMemoryNoteRepository::with_notes(fixture_notes()).unwrap());
    let service = NotesService::new(notes, InMemoryUserStore::new(fixture_users()).unwrap());
    assert_eq!(service.get_notes_by_user_id(ROB).unwrap().len(), 2);
}
