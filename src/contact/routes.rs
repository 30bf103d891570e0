use super::{store::ContactStore, ContactInput};
use crate::{Envelope, ServiceError};
use actix_web::{delete, get, post, put, web, HttpResponse};
use log::*;

#[get("/contacts")]
/// Every contact, newest first, with a count.
pub async fn list_contacts(store: web::Data<ContactStore>) -> Result<HttpResponse, ServiceError> {
    debug!("servicing list_contacts request");

    let contacts = store
        .list()
        .await
        .map_err(|e| e.context("Failed to fetch contacts"))?;
    trace!("listed {} contacts", contacts.len());

    Ok(HttpResponse::Ok().json(Envelope::list(contacts)))
}

#[get("/contacts/{id}")]
pub async fn get_contact(
    id: web::Path<i64>,
    store: web::Data<ContactStore>,
) -> Result<HttpResponse, ServiceError> {
    debug!("servicing get_contact request");

    let contact = store
        .get(id.into_inner())
        .await
        .map_err(|e| e.context("Failed to fetch contact"))?;

    Ok(HttpResponse::Ok().json(Envelope::ok(contact)))
}

#[post("/contacts/create")]
pub async fn create_contact(
    input: web::Json<ContactInput>,
    store: web::Data<ContactStore>,
) -> Result<HttpResponse, ServiceError> {
    debug!("servicing create_contact request");

    let contact = store
        .create(&input)
        .await
        .map_err(|e| e.context("Failed to create contact"))?;
    info!("created contact {} <{}>", contact.id, contact.email);

    Ok(HttpResponse::Created()
        .json(Envelope::ok(contact).with_message("Contact created successfully")))
}

#[put("/contacts/edit/{id}")]
pub async fn edit_contact(
    id: web::Path<i64>,
    input: web::Json<ContactInput>,
    store: web::Data<ContactStore>,
) -> Result<HttpResponse, ServiceError> {
    debug!("servicing edit_contact request");

    let contact = store
        .update(id.into_inner(), &input)
        .await
        .map_err(|e| e.context("Failed to update contact"))?;
    info!("updated contact {}", contact.id);

    Ok(HttpResponse::Ok().json(Envelope::ok(contact).with_message("Contact updated successfully")))
}

#[delete("/contacts/{id}")]
pub async fn delete_contact(
    id: web::Path<i64>,
    store: web::Data<ContactStore>,
) -> Result<HttpResponse, ServiceError> {
    debug!("servicing delete_contact request");

    let id = id.into_inner();
    store
        .delete(id)
        .await
        .map_err(|e| e.context("Failed to delete contact"))?;
    info!("deleted contact {}", id);

    Ok(HttpResponse::Ok().json(Envelope::<()>::done("Contact deleted successfully")))
}

#[get("/contacts/search/{query}")]
/// Contacts whose name, email or phone contains the (percent-decoded) query. The query is echoed
/// back alongside the results.
pub async fn search_contacts(
    query: web::Path<String>,
    store: web::Data<ContactStore>,
) -> Result<HttpResponse, ServiceError> {
    debug!("servicing search_contacts request");

    let query = query.into_inner();
    let contacts = store
        .search(&query)
        .await
        .map_err(|e| e.context("Failed to search contacts"))?;
    trace!("{:?} matched {} contacts", query, contacts.len());

    Ok(HttpResponse::Ok().json(Envelope::list(contacts).with_query(query)))
}
