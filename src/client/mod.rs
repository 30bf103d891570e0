//! The client side of the contacts API.
//!
//! [`SyncState`] holds a disposable copy of the record set and never patches it in place: every
//! successful write is followed by a full reload through [`ContactApi::list`]. The server stays
//! the only source of truth.
use crate::Contact;
use std::fmt;

pub mod form;
pub use form::{validate_form, ContactForm, FormErrors};

#[cfg(feature = "client")]
mod http;
#[cfg(feature = "client")]
pub use http::HttpContactApi;

#[cfg(test)]
mod test;

#[derive(Debug, Clone, PartialEq)]
/// Something the server (or the network between us) refused to do.
pub struct ApiError {
    /// The HTTP status, if we got as far as receiving one.
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({})", self.message, status),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ApiError {}

/// The operations a client needs from the contacts API, one request each.
#[allow(async_fn_in_trait)]
pub trait ContactApi {
    async fn health(&self) -> Result<(), ApiError>;
    async fn list(&self) -> Result<Vec<Contact>, ApiError>;
    async fn search(&self, query: &str) -> Result<Vec<Contact>, ApiError>;
    async fn create(&self, form: &ContactForm) -> Result<Contact, ApiError>;
    async fn update(&self, id: i64, form: &ContactForm) -> Result<Contact, ApiError>;
    async fn delete(&self, id: i64) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A short-lived message for the user about the last thing they did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// The form didn't pass local checks, so nothing was sent.
    Invalid(FormErrors),
    Api(ApiError),
}

impl From<ApiError> for SubmitError {
    fn from(e: ApiError) -> Self {
        SubmitError::Api(e)
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubmitError::Invalid(errors) => write!(f, "Please fix the form: {}", errors),
            SubmitError::Api(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for SubmitError {}

/// The client's view of the contacts: everything, and what's currently shown.
///
/// All operations take `&mut self`, so a caller can only have one request in flight at a time.
pub struct SyncState<A> {
    api: A,
    contacts: Vec<Contact>,
    filtered: Vec<Contact>,
    search_term: Option<String>,
    notice: Option<Notice>,
}

impl<A: ContactApi> SyncState<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            contacts: Vec::new(),
            filtered: Vec::new(),
            search_term: None,
            notice: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Every contact as of the last reload.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// What's on screen: the search results, or every contact when there's no search.
    pub fn filtered(&self) -> &[Contact] {
        &self.filtered
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Hands over the pending notice, leaving none behind.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    fn fail(&mut self, e: ApiError) -> ApiError {
        log::warn!("{}", e);
        self.notice = Some(Notice::error(e.message.clone()));
        e
    }

    /// Checks that the server is up, then loads everything.
    pub async fn connect(&mut self) -> Result<(), ApiError> {
        if let Err(e) = self.api.health().await {
            log::debug!("health check failed: {}", e);
            return Err(self.fail(ApiError::new(
                e.status,
                "Cannot connect to server. Please check if the server is running.",
            )));
        }
        self.reload().await
    }

    /// Replaces both views with a fresh copy of every contact, dropping any search.
    pub async fn reload(&mut self) -> Result<(), ApiError> {
        match self.api.list().await {
            Ok(contacts) => {
                self.filtered = contacts.clone();
                self.contacts = contacts;
                self.search_term = None;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Shows only what the server matches for `query`. A blank query shows everything again.
    pub async fn search(&mut self, query: &str) -> Result<(), ApiError> {
        let query = query.trim();
        if query.is_empty() {
            self.clear_search();
            return Ok(());
        }

        match self.api.search(query).await {
            Ok(found) => {
                self.filtered = found;
                self.search_term = Some(query.to_string());
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub fn clear_search(&mut self) {
        self.filtered = self.contacts.clone();
        self.search_term = None;
    }

    /// Creates a contact, or updates contact `editing` when it's set, then reloads everything.
    /// Forms that fail local checks are never sent.
    pub async fn submit(
        &mut self,
        editing: Option<i64>,
        form: &ContactForm,
    ) -> Result<(), SubmitError> {
        if let Err(errors) = validate_form(form) {
            return Err(SubmitError::Invalid(errors));
        }

        let sent = match editing {
            Some(id) => self
                .api
                .update(id, form)
                .await
                .map(|_| "Contact updated successfully!"),
            None => self
                .api
                .create(form)
                .await
                .map(|_| "Contact created successfully!"),
        };
        let done = sent.map_err(|e| self.fail(e))?;

        self.reload().await?;
        self.notice = Some(Notice::success(done));
        Ok(())
    }

    /// Deletes contact `id`, then reloads everything.
    pub async fn delete(&mut self, id: i64) -> Result<(), ApiError> {
        if let Err(e) = self.api.delete(id).await {
            return Err(self.fail(e));
        }

        self.reload().await?;
        self.notice = Some(Notice::success("Contact deleted successfully!"));
        Ok(())
    }
}
