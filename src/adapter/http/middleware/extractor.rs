use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

use crate::application::app_error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> AppResult<Self> {
        match parts.extensions.get::<AuthUser>().cloned() {
            Some(user) => Ok(user),
            None => Err(AppError::Unauthorized),
        }
    }
}

/// Best known address of the caller: the first `X-Forwarded-For` hop, then
/// the peer socket address, then nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientAddr(pub Option<String>);

impl<S> FromRequestParts<S> for ClientAddr
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> AppResult<Self> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        if forwarded.is_some() {
            return Ok(ClientAddr(forwarded));
        }

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());
        Ok(ClientAddr(peer))
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::extract::{ConnectInfo, FromRequestParts};
    use axum::http::Request;

    use super::ClientAddr;

    async fn client_addr(forwarded: Option<&str>, peer: Option<&str>) -> ClientAddr {
        let mut builder = Request::builder().uri("/");
        if let Some(forwarded) = forwarded {
            builder = builder.header("x-forwarded-for", forwarded);
        }
        let mut request = builder.body(()).unwrap();
        if let Some(peer) = peer {
            let addr: SocketAddr = peer.parse().unwrap();
            request.extensions_mut().insert(ConnectInfo(addr));
        }
        let (mut parts, _) = request.into_parts();
        ClientAddr::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn first_forwarded_hop_wins() {
        let addr = client_addr(Some("203.0.113.7, 10.0.0.1"), Some("127.0.0.1:4000")).await;

        assert_eq!(addr, ClientAddr(Some("203.0.113.7".to_string())));
    }

    #[tokio::test]
    async fn falls_back_to_peer_address() {
        let addr = client_addr(None, Some("192.168.1.20:52000")).await;

        assert_eq!(addr, ClientAddr(Some("192.168.1.20".to_string())));
    }

    #[tokio::test]
    async fn blank_forwarded_header_is_ignored() {
        let addr = client_addr(Some("  "), Some("192.168.1.20:52000")).await;

        assert_eq!(addr, ClientAddr(Some("192.168.1.20".to_string())));
    }

    #[tokio::test]
    async fn unknown_without_either_source() {
        assert_eq!(client_addr(None, None).await, ClientAddr(None));
    }
}
