use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::error::AppError;

/// Decides whether a request may use the admin routes. Authentication proper
/// lives outside this service; the gate is the seam where it plugs in.
pub trait AdminGate: Send + Sync {
    fn authorize(&self, headers: &HeaderMap) -> Result<(), AppError>;
}

/// Accepts `Authorization: Bearer <token>` matching a configured token.
/// Without a configured token every request is refused.
#[derive(Debug, Clone)]
pub struct TokenGate {
    token: Option<String>,
}

impl TokenGate {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

impl AdminGate for TokenGate {
    fn authorize(&self, headers: &HeaderMap) -> Result<(), AppError> {
        let expected = self.token.as_deref().ok_or(AppError::Forbidden)?;

        let presented = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        if !constant_time_eq(presented.as_bytes(), expected.as_bytes()) {
            tracing::warn!("admin request with wrong token");
            return Err(AppError::Forbidden);
        }
        Ok(())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
