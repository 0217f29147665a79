//! Handler bodies shared by every entity's endpoints.

use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::data::{EntityData, Identity, Record};
use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::middleware::paging::PageState;
use crate::resp::problem::Problem;
use crate::screen::{ListScreen, PageView};

/// Runs the entity's list screen for one request.
pub async fn list<D: EntityData>(
    gateway: &Gateway<D>,
    query: Option<&str>,
    filters: &[(&str, Option<&str>)],
    paging: PageState,
) -> Result<Json<PageView<Record<D>>>, Problem> {
    let mut screen = ListScreen::for_gateway(gateway.clone(), paging.page_length).await;

    for (key, value) in filters {
        if let Some(value) = value {
            screen.set_filter(key, value.trim());
        }
    }
    if let Some(query) = query {
        screen.set_query(query);
    }
    screen.go_to_page(paging.page);

    let view = screen.view();
    if let Some(message) = &view.error {
        return Err(Problem::new_untyped(Status::BadGateway, message));
    }
    Ok(Json(view))
}

pub async fn get<D: EntityData>(gateway: &Gateway<D>, id: &str) -> Result<Json<Record<D>>, Problem> {
    let id: Identity = id.parse()?;
    match gateway.get_by_id(id).await? {
        Some(record) => Ok(Json(record)),
        None => Err(GatewayError::NotFound { kind: D::KIND, id }.into()),
    }
}

pub async fn create<D: EntityData>(
    gateway: &Gateway<D>,
    data: Json<D>,
) -> Result<status::Created<Json<Record<D>>>, Problem> {
    let record = gateway.create(data.into_inner()).await?;
    let location = format!("/api/v1/{}/{}", D::KIND.plural(), record.id);
    Ok(status::Created::new(location).body(Json(record)))
}

pub async fn update<D: EntityData>(
    gateway: &Gateway<D>,
    id: &str,
    patch: Json<D::Patch>,
) -> Result<Json<Record<D>>, Problem> {
    Ok(Json(gateway.update(id, patch.into_inner()).await?))
}

pub async fn delete<D: EntityData>(
    gateway: &Gateway<D>,
    id: &str,
) -> Result<Json<Record<D>>, Problem> {
    Ok(Json(gateway.delete(id).await?))
}
