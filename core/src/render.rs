//! Rendering port and the display projection of a user.

use crate::types::User;

/// Image shown when the user has not uploaded an avatar.
pub const DEFAULT_AVATAR: &str = "default-avatar.png";

/// Receives the current user, or `None` once the session is gone.
pub trait Renderer {
    fn render(&mut self, user: Option<&User>);
}

/// What a display layer shows for a user: the profile text, the avatar
/// image source, and the values pre-filled into the editable profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub username: String,
    pub email: String,
    pub avatar_src: String,
    pub form_username: String,
    pub form_email: String,
}

impl ProfileView {
    pub fn from_user(user: &User, upload_url: &str) -> Self {
        let avatar_src = match user.avatar.as_deref() {
            Some(avatar) if !avatar.is_empty() => {
                format!("{}/{}", upload_url.trim_end_matches('/'), avatar)
            }
            _ => DEFAULT_AVATAR.to_string(),
        };
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            avatar_src,
            form_username: user.username.clone(),
            form_email: user.email.clone(),
        }
    }
}
