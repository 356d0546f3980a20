//! Page sections: fetch through `ApiClient`, then render into the document.
//!
//! Each section fails in isolation. A failed fetch is logged and returned,
//! and its container keeps whatever it showed before.

use tracing::{error, info};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::render::{render, Document, Row, LIST_ITEM_CLASS};
use crate::transport::Transport;
use crate::types::User;

pub const USERS_CONTAINER: &str = "users";
pub const BIRTHDAYS_CONTAINER: &str = "birthdays";
pub const USER_CONTAINER: &str = "getUser";

/// Container ids a host page must provide.
pub const PAGE_CONTAINERS: [&str; 3] = [USERS_CONTAINER, BIRTHDAYS_CONTAINER, USER_CONTAINER];

pub fn user_line(user: &User) -> Row {
    Row::new(format!("Id: {} email: {}", user.id, user.email)).with_class(LIST_ITEM_CLASS)
}

pub fn birthday_line(user: &User) -> Row {
    let born = user.born_date.map(|d| d.to_string()).unwrap_or_default();
    Row::new(format!("Id: {} email: {} birthday: {born}", user.id, user.email))
        .with_class(LIST_ITEM_CLASS)
}

pub fn field_line(field: &(&'static str, String)) -> Row {
    Row::new(format!("{}: {}", field.0, field.1))
}

/// Fetch all users into `users`. Returns the number of rows rendered.
pub fn load_users<T: Transport, D: Document>(
    client: &ApiClient<T>,
    document: &mut D,
) -> Result<usize, ApiError> {
    section(USERS_CONTAINER, || {
        let users = client.list_users()?;
        render(document, USERS_CONTAINER, &users, user_line)?;
        Ok(users.len())
    })
}

/// Fetch users with upcoming birthdays into `birthdays`.
pub fn load_birthdays<T: Transport, D: Document>(
    client: &ApiClient<T>,
    document: &mut D,
) -> Result<usize, ApiError> {
    section(BIRTHDAYS_CONTAINER, || {
        let users = client.birthday_users()?;
        render(document, BIRTHDAYS_CONTAINER, &users, birthday_line)?;
        Ok(users.len())
    })
}

/// Fetch one user and dump its fields into `getUser`.
pub fn load_user<T: Transport, D: Document>(
    client: &ApiClient<T>,
    document: &mut D,
    id: i64,
) -> Result<usize, ApiError> {
    section(USER_CONTAINER, || {
        let fields = client.get_user(id)?.fields();
        render(document, USER_CONTAINER, &fields, field_line)?;
        Ok(fields.len())
    })
}

/// Outcome of each page section after `load_page`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub users: Result<usize, ApiError>,
    pub birthdays: Result<usize, ApiError>,
    pub user: Result<usize, ApiError>,
}

impl PageReport {
    pub fn all_ok(&self) -> bool {
        self.users.is_ok() && self.birthdays.is_ok() && self.user.is_ok()
    }
}

/// Run the three page-load sections. None of them blocks the others.
pub fn load_page<T: Transport, D: Document>(
    client: &ApiClient<T>,
    document: &mut D,
    user_id: i64,
) -> PageReport {
    PageReport {
        users: load_users(client, document),
        birthdays: load_birthdays(client, document),
        user: load_user(client, document, user_id),
    }
}

fn section(
    container: &str,
    run: impl FnOnce() -> Result<usize, ApiError>,
) -> Result<usize, ApiError> {
    match run() {
        Ok(rows) => {
            info!(container, rows, "section loaded");
            Ok(rows)
        }
        Err(e) => {
            error!(container, error = %e, "section failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpRequest, HttpResponse};
    use crate::render::MemoryDocument;
    use crate::transport::TransportError;
    use crate::types::AuthToken;

    type Handler = fn(&HttpRequest) -> Result<HttpResponse, TransportError>;

    fn client(handler: Handler) -> ApiClient<Handler> {
        ApiClient::new("http://localhost:8000", AuthToken::new("abc"), handler)
    }

    fn page() -> MemoryDocument {
        MemoryDocument::with_containers(&PAGE_CONTAINERS)
    }

    fn api(req: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let path = req.url.trim_start_matches("http://localhost:8000");
        Ok(match path {
            "/api/users" => HttpResponse::new(200, "OK", r#"[{"id":1,"email":"a@x.com"}]"#),
            "/api/users/birthdays/" => HttpResponse::new(
                200,
                "OK",
                r#"[{"id":3,"email":"c@x.com","born_date":"1991-01-02"}]"#,
            ),
            "/api/users/2" => HttpResponse::new(
                200,
                "OK",
                r#"{"id":2,"email":"b@x.com","username":"bobbyb"}"#,
            ),
            _ => HttpResponse::new(404, "Not Found", r#"{"detail":"Not Found"}"#),
        })
    }

    #[test]
    fn users_scenario_renders_id_and_email() {
        let mut doc = page();
        assert_eq!(load_users(&client(api), &mut doc), Ok(1));
        assert_eq!(doc.texts(USERS_CONTAINER), vec!["Id: 1 email: a@x.com"]);
    }

    #[test]
    fn birthdays_include_birth_date() {
        let mut doc = page();
        load_birthdays(&client(api), &mut doc).unwrap();
        assert_eq!(
            doc.texts(BIRTHDAYS_CONTAINER),
            vec!["Id: 3 email: c@x.com birthday: 1991-01-02"]
        );
    }

    #[test]
    fn single_user_dumps_fields() {
        let mut doc = page();
        assert_eq!(load_user(&client(api), &mut doc, 2), Ok(3));
        assert_eq!(
            doc.texts(USER_CONTAINER),
            vec!["id: 2", "username: bobbyb", "email: b@x.com"]
        );
    }

    #[test]
    fn not_found_leaves_container_unchanged() {
        let mut doc = page();
        let err = load_user(&client(api), &mut doc, 7).unwrap_err();
        assert_eq!(err, ApiError::HttpStatus(404, "Not Found".to_string()));
        assert!(doc.texts(USER_CONTAINER).is_empty());
    }

    #[test]
    fn failed_refresh_keeps_previous_rows() {
        let mut doc = page();
        load_users(&client(api), &mut doc).unwrap();

        let offline = client(|_| Err(TransportError("connection refused".to_string())));
        assert!(matches!(load_users(&offline, &mut doc), Err(ApiError::Network(_))));
        assert_eq!(doc.texts(USERS_CONTAINER), vec!["Id: 1 email: a@x.com"]);
    }

    #[test]
    fn sections_fail_in_isolation() {
        let mut doc = MemoryDocument::with_containers(&[USERS_CONTAINER, USER_CONTAINER]);
        let report = load_page(&client(api), &mut doc, 2);

        assert_eq!(report.users, Ok(1));
        assert_eq!(
            report.birthdays,
            Err(ApiError::MissingElement(BIRTHDAYS_CONTAINER.to_string()))
        );
        assert_eq!(report.user, Ok(3));
        assert!(!report.all_ok());
    }

    #[test]
    fn birthday_line_without_date_leaves_it_blank() {
        let user: User = serde_json::from_str(r#"{"id":5,"email":"e@x.com"}"#).unwrap();
        assert_eq!(user_line(&user).text, "Id: 5 email: e@x.com");
        assert_eq!(birthday_line(&user).text, "Id: 5 email: e@x.com birthday: ");
    }
}
