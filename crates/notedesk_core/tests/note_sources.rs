use notedesk_core::db::{open_db, open_db_in_memory};
use notedesk_core::{
    MemoryNoteSource, NoteDraft, NoteSource, SourceError, SqliteNoteSource,
};

fn draft(user_id: i64, title: &str) -> NoteDraft {
    NoteDraft {
        id: None,
        user_id,
        title: title.to_string(),
        content: format!("<p>{title}</p>"),
    }
}

fn each_source(check: impl Fn(&dyn NoteSource)) {
    let memory = MemoryNoteSource::empty();
    check(&memory);

    let sqlite = SqliteNoteSource::new(open_db_in_memory().unwrap());
    check(&sqlite);
}

#[test]
fn create_then_list_filters_by_owner() {
    each_source(|source| {
        source.create_note(&draft(2, "alice one"), 10).unwrap();
        source.create_note(&draft(3, "bob one"), 20).unwrap();
        source.create_note(&draft(2, "alice two"), 30).unwrap();

        let for_alice = source.notes_for_user(2).unwrap();
        assert_eq!(for_alice.len(), 2);
        assert!(for_alice.iter().all(|note| note.user_id == 2));

        let titles: Vec<&str> = for_alice.iter().map(|note| note.title.as_str()).collect();
        assert_eq!(titles, vec!["alice one", "alice two"]);
    });
}

#[test]
fn create_allocates_distinct_ids_and_writes_the_stamp() {
    each_source(|source| {
        let first = source.create_note(&draft(2, "first"), 100).unwrap();
        let second = source.create_note(&draft(2, "second"), 200).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.last_modified, 100);
        assert_eq!(second.last_modified, 200);
    });
}

#[test]
fn update_fully_replaces_the_record() {
    each_source(|source| {
        let created = source.create_note(&draft(2, "before"), 10).unwrap();

        let replacement = NoteDraft {
            id: Some(created.id),
            user_id: 2,
            title: "after".to_string(),
            content: "<h1>after</h1>".to_string(),
        };
        let updated = source.update_note(created.id, &replacement, 20).unwrap();
        assert_eq!(updated.title, "after");
        assert_eq!(updated.content, "<h1>after</h1>");
        assert_eq!(updated.last_modified, 20);

        let listed = source.notes_for_user(2).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], updated);
    });
}

#[test]
fn update_of_unknown_id_returns_not_found() {
    each_source(|source| {
        let err = source
            .update_note(999, &draft(2, "ghost"), 10)
            .unwrap_err();
        assert!(matches!(err, SourceError::NoteNotFound(999)));
        assert!(source.notes_for_user(2).unwrap().is_empty());
    });
}

#[test]
fn sqlite_notes_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    let created = {
        let source = SqliteNoteSource::new(open_db(&path).unwrap());
        source.create_note(&draft(2, "durable"), 42).unwrap()
    };

    let reopened = SqliteNoteSource::new(open_db(&path).unwrap());
    let notes = reopened.notes_for_user(2).unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id, created.id);
    assert_eq!(notes[0].title, "durable");
    assert_eq!(notes[0].last_modified, 42);
}
