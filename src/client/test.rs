use super::*;
use chrono::{Duration, Utc};
use std::cell::{Cell, RefCell};

/// An in-memory stand-in for the server that counts how often the full list is fetched.
#[derive(Default)]
struct FakeApi {
    rows: RefCell<Vec<Contact>>,
    next_id: Cell<i64>,
    lists: Cell<usize>,
    down: Cell<bool>,
}

impl FakeApi {
    fn check_up(&self) -> Result<(), ApiError> {
        if self.down.get() {
            Err(ApiError::new(None, "connection refused"))
        } else {
            Ok(())
        }
    }

    fn newest_first(&self) -> Vec<Contact> {
        let mut rows = self.rows.borrow().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }
}

impl ContactApi for FakeApi {
    async fn health(&self) -> Result<(), ApiError> {
        self.check_up()
    }

    async fn list(&self) -> Result<Vec<Contact>, ApiError> {
        self.check_up()?;
        self.lists.set(self.lists.get() + 1);
        Ok(self.newest_first())
    }

    async fn search(&self, query: &str) -> Result<Vec<Contact>, ApiError> {
        self.check_up()?;
        Ok(self
            .newest_first()
            .into_iter()
            .filter(|c| c.name.contains(query) || c.email.contains(query) || c.phone.contains(query))
            .collect())
    }

    async fn create(&self, form: &ContactForm) -> Result<Contact, ApiError> {
        self.check_up()?;
        if self.rows.borrow().iter().any(|c| c.email == form.email) {
            return Err(ApiError::new(Some(409), "Email already exists"));
        }

        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let at = Utc::now() + Duration::seconds(id);
        let contact = Contact {
            id,
            name: form.name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            age: form.age.trim().parse().unwrap_or_default(),
            created_at: at,
            updated_at: at,
        };
        self.rows.borrow_mut().push(contact.clone());
        Ok(contact)
    }

    async fn update(&self, id: i64, form: &ContactForm) -> Result<Contact, ApiError> {
        self.check_up()?;
        let mut rows = self.rows.borrow_mut();
        let row = rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ApiError::new(Some(404), "Contact not found"))?;
        row.name = form.name.clone();
        row.email = form.email.clone();
        row.phone = form.phone.clone();
        row.age = form.age.trim().parse().unwrap_or_default();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.check_up()?;
        let mut rows = self.rows.borrow_mut();
        let before = rows.len();
        rows.retain(|c| c.id != id);
        if rows.len() == before {
            Err(ApiError::new(Some(404), "Contact not found"))
        } else {
            Ok(())
        }
    }
}

fn form(name: &str, email: &str) -> ContactForm {
    ContactForm::new(name, email, "555-0000", "30")
}

#[actix_rt::test]
async fn every_write_reloads_everything() {
    let mut state = SyncState::new(FakeApi::default());
    state.connect().await.expect("fake is up");
    assert_eq!(state.api().lists.get(), 1);

    state.submit(None, &form("Ann", "ann@x.com")).await.expect("create ann");
    assert_eq!(state.api().lists.get(), 2);
    state.submit(None, &form("Bob", "bob@x.com")).await.expect("create bob");
    assert_eq!(state.api().lists.get(), 3);

    let names: Vec<_> = state.contacts().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Bob", "Ann"]);
    assert_eq!(state.filtered(), state.contacts());

    let ann = state.contacts()[1].id;
    state.submit(Some(ann), &form("Ann B", "ann@x.com")).await.expect("edit ann");
    assert_eq!(state.api().lists.get(), 4);
    assert!(state.contacts().iter().any(|c| c.name == "Ann B"));
    assert_eq!(
        state.notice().map(|n| n.message.as_str()),
        Some("Contact updated successfully!")
    );

    state.delete(ann).await.expect("delete ann");
    assert_eq!(state.api().lists.get(), 5);
    assert_eq!(state.contacts().len(), 1);
}

#[actix_rt::test]
async fn invalid_forms_are_never_sent() {
    let mut state = SyncState::new(FakeApi::default());
    state.reload().await.expect("fake is up");

    match state.submit(None, &ContactForm::new("", "nope", "x", "")).await {
        Err(SubmitError::Invalid(errors)) => assert_eq!(errors.0.len(), 4),
        other => panic!("expected local validation to fail, got {:?}", other),
    }
    assert!(state.api().rows.borrow().is_empty());
    assert_eq!(state.api().lists.get(), 1);
}

#[actix_rt::test]
async fn search_replaces_only_the_filtered_view() {
    let mut state = SyncState::new(FakeApi::default());
    state.submit(None, &form("Ann", "ann@x.com")).await.expect("ann");
    state.submit(None, &form("Bob", "bob@y.org")).await.expect("bob");

    state.search("  y.org ").await.expect("search");
    assert_eq!(state.search_term(), Some("y.org"));
    assert_eq!(state.filtered().len(), 1);
    assert_eq!(state.contacts().len(), 2);

    state.clear_search();
    assert_eq!(state.search_term(), None);
    assert_eq!(state.filtered(), state.contacts());

    state.search("Ann").await.expect("search");
    state.search("   ").await.expect("blank search clears");
    assert_eq!(state.search_term(), None);
    assert_eq!(state.filtered().len(), 2);
}

#[actix_rt::test]
async fn failures_become_error_notices() {
    let mut state = SyncState::new(FakeApi::default());
    state.submit(None, &form("Ann", "ann@x.com")).await.expect("ann");
    let lists = state.api().lists.get();

    // a rejected write leaves the cache alone and doesn't reload
    match state.submit(None, &form("Ann again", "ann@x.com")).await {
        Err(SubmitError::Api(e)) => assert_eq!(e.status, Some(409)),
        other => panic!("expected a conflict, got {:?}", other),
    }
    assert_eq!(state.api().lists.get(), lists);
    let notice = state.take_notice().expect("conflict should be surfaced");
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.message, "Email already exists");
    assert_eq!(state.notice(), None);

    let err = state.delete(999).await.expect_err("no such contact");
    assert_eq!(err.message, "Contact not found");
    assert_eq!(state.notice().map(|n| n.kind), Some(NoticeKind::Error));

    state.api().down.set(true);
    let err = state.connect().await.expect_err("server is down");
    assert!(err.message.starts_with("Cannot connect to server"));
    assert_eq!(state.contacts().len(), 1, "the last good copy is kept");
}
