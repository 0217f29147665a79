use std::io::Cursor;

use rocket::http::hyper::header::CONTENT_LANGUAGE;
use rocket::http::ContentType;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::{response, Request, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};
use utoipa::ToSchema;

use crate::error::GatewayError;

/// Implements [RFC7807](https://tools.ietf.org/html/rfc7807).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Problem {
    #[serde(skip)]
    pub status: Status,
    pub type_uri: String,
    pub title: String,

    pub detail: Option<String>,
    pub instance_uri: Option<String>,

    #[schema(value_type = Object)]
    pub body: Map<String, Value>,
}

impl Default for Problem {
    fn default() -> Self {
        Problem {
            status: Status::InternalServerError,
            type_uri: "about:blank".to_string(),
            title: "Problem".to_string(),
            detail: None,
            instance_uri: None,
            body: Map::new(),
        }
    }
}

impl Problem {
    pub fn new_untyped(status: Status, title: impl ToString) -> Problem {
        Problem {
            status,
            type_uri: "about:blank".to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn detail(&mut self, value: impl ToString) -> &mut Problem {
        self.detail = Some(value.to_string());
        self
    }

    pub fn instance_uri(&mut self, value: String) -> &mut Problem {
        self.instance_uri = Some(value);
        self
    }

    pub fn insert_json_value(&mut self, key: impl ToString, value: Value) -> &mut Problem {
        self.body.insert(key.to_string(), value);
        self
    }

    pub fn insert_str(&mut self, key: impl ToString, value: impl ToString) -> &mut Problem {
        self.body
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }
}

impl Display for Problem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.title)
    }
}

impl std::error::Error for Problem {}

impl<'r> Responder<'r, 'static> for Problem {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let mut body = self.body.clone();

        // Following are required by rfc7807
        body.insert(String::from("type"), serde_json::Value::from(self.type_uri));
        body.insert(String::from("title"), serde_json::Value::from(self.title));

        // Optional parameters as specified by rfc7807
        if let Some(detail) = self.detail {
            body.insert(String::from("detail"), serde_json::Value::from(detail));
        }
        body.insert(
            String::from("status"),
            serde_json::Value::from(self.status.code),
        );
        if let Some(instance) = self.instance_uri {
            body.insert(String::from("instance"), serde_json::Value::from(instance));
        }

        let body_string = serde_json::Value::Object(body).to_string();

        Response::build()
            .status(self.status)
            .header(ContentType::new("application", "problem+json"))
            .raw_header(CONTENT_LANGUAGE.as_str(), "en")
            .sized_body(body_string.len(), Cursor::new(body_string))
            .ok()
    }
}

pub mod problems {
    use crate::resp::problem::Problem;
    use rocket::http::Status;

    #[inline]
    pub fn parse_problem() -> Problem {
        Problem::new_untyped(
            Status::BadRequest,
            "There was a problem parsing part of the request.",
        )
    }

    #[inline]
    pub fn not_found_problem() -> Problem {
        Problem::new_untyped(Status::NotFound, "Resource doesn't exist.")
    }
}

impl From<GatewayError> for Problem {
    fn from(e: GatewayError) -> Self {
        match &e {
            GatewayError::NotFound { kind, id } => {
                Problem::new_untyped(Status::NotFound, e.to_string())
                    .insert_str("entity", kind.noun())
                    .insert_json_value("id", Value::from(id.0))
                    .clone()
            }
            GatewayError::InvalidIdentity(raw) => {
                Problem::new_untyped(Status::BadRequest, "Invalid identity.")
                    .insert_str("id", raw)
                    .detail(&e)
                    .clone()
            }
            GatewayError::Validation { kind, field } => {
                Problem::new_untyped(Status::BadRequest, e.to_string())
                    .insert_str("entity", kind.noun())
                    .insert_str("field", field)
                    .clone()
            }
            GatewayError::InvalidReference { kind, field, value } => {
                Problem::new_untyped(Status::BadRequest, "Invalid reference.")
                    .insert_str("entity", kind.noun())
                    .insert_str("field", field)
                    .insert_str("value", value)
                    .detail(&e)
                    .clone()
            }
            GatewayError::Exhausted { kind } => {
                Problem::new_untyped(Status::Conflict, e.to_string())
                    .insert_str("entity", kind.noun())
                    .clone()
            }
            GatewayError::Remote { message } => {
                Problem::new_untyped(Status::BadGateway, message)
            }
            GatewayError::Decode { kind, .. } => {
                Problem::new_untyped(Status::BadGateway, "Record store returned malformed data.")
                    .insert_str("entity", kind.noun())
                    .detail(&e)
                    .clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{EntityKind, Identity};

    #[test]
    fn gateway_errors_map_to_statuses() {
        let not_found = Problem::from(GatewayError::NotFound {
            kind: EntityKind::Course,
            id: Identity(4),
        });
        assert_eq!(not_found.status, Status::NotFound);
        assert_eq!(not_found.title, "Course not found");
        assert_eq!(not_found.body["id"], Value::from(4));

        let invalid = Problem::from(GatewayError::Validation {
            kind: EntityKind::Student,
            field: "dob",
        });
        assert_eq!(invalid.status, Status::BadRequest);
        assert_eq!(invalid.title, "dob is required");

        let reference = Problem::from(GatewayError::InvalidReference {
            kind: EntityKind::Teacher,
            field: "departmentId",
            value: "SCI".to_string(),
        });
        assert_eq!(reference.status, Status::BadRequest);
        assert_eq!(reference.body["field"], Value::from("departmentId"));
        assert_eq!(reference.body["value"], Value::from("SCI"));

        let exhausted = Problem::from(GatewayError::Exhausted {
            kind: EntityKind::Activity,
        });
        assert_eq!(exhausted.status, Status::Conflict);

        let remote = Problem::from(GatewayError::Remote {
            message: "Failed to load teachers".to_string(),
        });
        assert_eq!(remote.status, Status::BadGateway);
        assert_eq!(remote.title, "Failed to load teachers");
    }
}
