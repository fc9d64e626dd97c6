use actix_web::error::{
    ErrorBadRequest, ErrorConflict, ErrorForbidden, ErrorInternalServerError, ErrorNotFound,
};
use actix_web::{Error, HttpResponse};
use serde_derive::Serialize;

/// Response envelope shared by every endpoint. Single objects travel in
/// `item`, collections in `list`, and errors carry the same shape inside the
/// HTTP error body so clients parse one format everywhere.
#[derive(Serialize)]
pub struct JsonResponse<T> {
    pub(crate) status: String,
    pub(crate) message: String,
    pub(crate) code: u32,
    pub(crate) id: Option<String>,
    pub(crate) item: Option<T>,
    pub(crate) list: Option<Vec<T>>,
}

pub struct JsonResponseBuilder<T>
where
    T: serde::Serialize,
{
    id: Option<String>,
    item: Option<T>,
    list: Option<Vec<T>>,
}

impl<T> JsonResponseBuilder<T>
where
    T: serde::Serialize,
{
    fn new() -> Self {
        Self {
            id: None,
            item: None,
            list: None,
        }
    }

    pub fn set_id(mut self, id: impl ToString) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn set_item(mut self, item: T) -> Self {
        self.item = Some(item);
        self
    }

    pub fn set_list(mut self, list: Vec<T>) -> Self {
        self.list = Some(list);
        self
    }

    fn into_response(self, status: &str, code: u32, message: String) -> JsonResponse<T> {
        JsonResponse {
            status: status.to_string(),
            message,
            code,
            id: self.id,
            item: self.item,
            list: self.list,
        }
    }

    pub fn ok(self, msg: impl ToString) -> HttpResponse {
        HttpResponse::Ok().json(self.into_response("OK", 200, msg.to_string()))
    }

    fn error_body(self, code: u32, msg: String) -> String {
        let fallback = format!(r#"{{"status":"Error","message":{:?},"code":{}}}"#, msg, code);
        serde_json::to_string(&self.into_response("Error", code, msg)).unwrap_or(fallback)
    }

    pub fn bad_request(self, msg: impl ToString) -> Error {
        ErrorBadRequest(self.error_body(400, msg.to_string()))
    }

    /// Validation failures surface as a 400 carrying the validator's output.
    pub fn form_error(self, msg: impl ToString) -> Error {
        ErrorBadRequest(self.error_body(400, msg.to_string()))
    }

    pub fn forbidden(self, msg: impl ToString) -> Error {
        ErrorForbidden(self.error_body(403, msg.to_string()))
    }

    pub fn not_found(self, msg: impl ToString) -> Error {
        ErrorNotFound(self.error_body(404, msg.to_string()))
    }

    pub fn conflict(self, msg: impl ToString) -> Error {
        ErrorConflict(self.error_body(409, msg.to_string()))
    }

    pub fn internal_server_error(self, msg: impl ToString) -> Error {
        let msg = msg.to_string();
        let msg = if msg.trim().is_empty() {
            String::from("Internal Server Error")
        } else {
            msg
        };
        ErrorInternalServerError(self.error_body(500, msg))
    }
}

impl<T> JsonResponse<T>
where
    T: serde::Serialize,
{
    pub fn build() -> JsonResponseBuilder<T> {
        JsonResponseBuilder::new()
    }
}

// Shorthands for handlers that do not carry a payload. Pinning the payload
// type here lets call sites skip the turbofish.
impl JsonResponse<serde_json::Value> {
    pub fn bad_request(msg: impl ToString) -> Error {
        Self::build().bad_request(msg)
    }

    pub fn forbidden(msg: impl ToString) -> Error {
        Self::build().forbidden(msg)
    }

    pub fn not_found(msg: impl ToString) -> Error {
        Self::build().not_found(msg)
    }

    pub fn conflict(msg: impl ToString) -> Error {
        Self::build().conflict(msg)
    }

    pub fn internal_server_error(msg: impl ToString) -> Error {
        Self::build().internal_server_error(msg)
    }
}
