use std::convert::Infallible;

use rocket::request::{FromRequest, Outcome};
use rocket::Request;

use crate::config::Config;
use crate::list::window::DEFAULT_PAGE_SIZE;

/// Requested page of a list endpoint. Pages count from 1.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PageState {
    pub page_length: usize,
    pub page: usize,
}

impl Default for PageState {
    fn default() -> Self {
        PageState {
            page_length: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

fn query_number(request: &Request<'_>, long: &str, short: &str) -> Option<usize> {
    request
        .query_value::<usize>(long)
        .and_then(|it| it.ok())
        .or_else(|| request.query_value::<usize>(short).and_then(|it| it.ok()))
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for PageState {
    type Error = Infallible;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let default_length = request
            .rocket()
            .state::<Config>()
            .map(|it| it.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let length = query_number(request, "len", "l")
            .filter(|it| *it > 0)
            .unwrap_or(default_length);
        let page = query_number(request, "page", "p").unwrap_or(1).max(1);

        Outcome::Success(PageState {
            page_length: length,
            page,
        })
    }
}
