//! Request builders and response parsers for the four user API operations.
//!
//! # Design
//! `ProfileClient` holds only a `Gateway` and carries no mutable state
//! between calls. Each operation has a `build_*` method producing an
//! `HttpRequest`, a `parse_*` method consuming an `HttpResponse`, and a thin
//! executing wrapper that runs both around a caller-supplied `Transport`.
//! Token handling is the caller's business; this layer only refuses to send
//! an authenticated request with an empty token.

use crate::error::ApiError;
use crate::gateway::{Gateway, DEFAULT_ERROR_MESSAGE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody, Transport};
use crate::types::{AvatarFile, Credentials, LoginResult, UpdateResult, UpdateUser, UploadResult, User};

/// A fixed API route with its method and the message used when an error
/// response has none.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: &'static str,
    pub fallback_message: &'static str,
}

pub const LOGIN: Endpoint = Endpoint {
    method: HttpMethod::Post,
    path: "/auth/login",
    fallback_message: DEFAULT_ERROR_MESSAGE,
};

pub const CURRENT_USER: Endpoint = Endpoint {
    method: HttpMethod::Get,
    path: "/users/token",
    fallback_message: DEFAULT_ERROR_MESSAGE,
};

pub const UPDATE_USER: Endpoint = Endpoint {
    method: HttpMethod::Put,
    path: "/users",
    fallback_message: DEFAULT_ERROR_MESSAGE,
};

pub const UPLOAD_AVATAR: Endpoint = Endpoint {
    method: HttpMethod::Post,
    path: "/users/avatar",
    fallback_message: "Avatar upload failed",
};

/// Multipart field name the avatar endpoint reads.
pub const AVATAR_FIELD: &str = "avatar";

#[derive(Debug, Clone)]
pub struct ProfileClient {
    gateway: Gateway,
}

impl ProfileClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            gateway: Gateway::new(base_url),
        }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn build_login(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.gateway.build_json(LOGIN.method, LOGIN.path, credentials, None)
    }

    pub fn build_current_user(&self, token: &str) -> Result<HttpRequest, ApiError> {
        let token = require_token(token)?;
        Ok(self.gateway.build(CURRENT_USER.method, CURRENT_USER.path, None, Some(token)))
    }

    pub fn build_update_profile(&self, fields: &UpdateUser, token: &str) -> Result<HttpRequest, ApiError> {
        let token = require_token(token)?;
        self.gateway
            .build_json(UPDATE_USER.method, UPDATE_USER.path, fields, Some(token))
    }

    pub fn build_upload_avatar(&self, file: &AvatarFile, token: &str) -> Result<HttpRequest, ApiError> {
        let token = require_token(token)?;
        let form = MultipartForm::new().file(AVATAR_FIELD, &file.file_name, &file.content_type, file.bytes.clone());
        Ok(self.gateway.build(
            UPLOAD_AVATAR.method,
            UPLOAD_AVATAR.path,
            Some(RequestBody::Multipart(form)),
            Some(token),
        ))
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<LoginResult, ApiError> {
        self.gateway.parse(response, LOGIN.fallback_message)
    }

    pub fn parse_current_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        self.gateway.parse(response, CURRENT_USER.fallback_message)
    }

    pub fn parse_update_profile(&self, response: HttpResponse) -> Result<UpdateResult, ApiError> {
        self.gateway.parse(response, UPDATE_USER.fallback_message)
    }

    pub fn parse_upload_avatar(&self, response: HttpResponse) -> Result<UploadResult, ApiError> {
        self.gateway.parse(response, UPLOAD_AVATAR.fallback_message)
    }

    pub fn login(&self, transport: &dyn Transport, credentials: &Credentials) -> Result<LoginResult, ApiError> {
        let request = self.build_login(credentials)?;
        self.gateway.send(transport, &request, LOGIN.fallback_message)
    }

    pub fn current_user(&self, transport: &dyn Transport, token: &str) -> Result<User, ApiError> {
        let request = self.build_current_user(token)?;
        self.gateway.send(transport, &request, CURRENT_USER.fallback_message)
    }

    pub fn update_profile(
        &self,
        transport: &dyn Transport,
        fields: &UpdateUser,
        token: &str,
    ) -> Result<UpdateResult, ApiError> {
        let request = self.build_update_profile(fields, token)?;
        self.gateway.send(transport, &request, UPDATE_USER.fallback_message)
    }

    pub fn upload_avatar(
        &self,
        transport: &dyn Transport,
        file: &AvatarFile,
        token: &str,
    ) -> Result<UploadResult, ApiError> {
        let request = self.build_upload_avatar(file, token)?;
        self.gateway.send(transport, &request, UPLOAD_AVATAR.fallback_message)
    }
}

fn require_token(token: &str) -> Result<&str, ApiError> {
    if token.is_empty() {
        return Err(ApiError::MissingToken);
    }
    Ok(token)
}
