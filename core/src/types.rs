//! Domain DTOs for the user API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Unknown fields sent by the server are ignored, and nothing is validated
//! beyond what serde needs to build the struct.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Login form payload. Built per attempt and never persisted.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// A user as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Profile fields the client is allowed to write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateUser {
    pub username: String,
    pub email: String,
}

/// Response to `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResult {
    #[serde(default)]
    pub message: Option<String>,
    pub token: String,
    pub data: User,
}

/// Response to `PUT /users`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateResult {
    #[serde(default)]
    pub message: Option<String>,
    pub data: User,
}

/// Response to `POST /users/avatar`. The endpoint returns upload metadata,
/// not a user projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadResult {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// A file selected for avatar upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
