use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::AppState;

/// Header the journaling client sends with the logged-in student's id.
pub const STUDENT_ID_HEADER: &str = "x-student-id";

/// Identity of the student making the request. Identity is asserted by the
/// client session; verifying it is the job of whatever fronts this service.
#[derive(Debug, Clone)]
pub struct StudentContext {
    pub student_id: String,
}

pub async fn require_student(mut req: Request, next: Next) -> Result<Response, AppError> {
    let student_id = req
        .headers()
        .get(STUDENT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(AppError::Unauthorized)?
        .to_string();

    req.extensions_mut().insert(StudentContext { student_id });
    Ok(next.run(req).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    state.admin_gate.authorize(req.headers())?;
    Ok(next.run(req).await)
}
