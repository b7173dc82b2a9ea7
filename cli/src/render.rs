//! Terminal display of the current user.

use std::io::Write;

use profile_core::{ProfileView, Renderer, User};

pub struct TerminalRenderer<W> {
    out: W,
    upload_url: String,
}

impl TerminalRenderer<std::io::Stdout> {
    pub fn stdout(upload_url: &str) -> Self {
        Self::new(std::io::stdout(), upload_url)
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, upload_url: &str) -> Self {
        Self {
            out,
            upload_url: upload_url.to_string(),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_user(&mut self, user: Option<&User>) -> std::io::Result<()> {
        let Some(user) = user else {
            return writeln!(self.out, "Not logged in.");
        };
        let view = ProfileView::from_user(user, &self.upload_url);
        writeln!(self.out, "username: {}", view.username)?;
        writeln!(self.out, "email:    {}", view.email)?;
        writeln!(self.out, "avatar:   {}", view.avatar_src)
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, user: Option<&User>) {
        if let Err(err) = self.write_user(user) {
            tracing::warn!(error = %err, "failed to write profile");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_profile_with_resolved_avatar() {
        let mut renderer = TerminalRenderer::new(Vec::new(), "http://localhost:3000/uploads");
        renderer.render(Some(&User {
            username: "bob".to_string(),
            email: "bob@x.com".to_string(),
            avatar: Some("f.png".to_string()),
        }));
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(
            text,
            "username: bob\nemail:    bob@x.com\navatar:   http://localhost:3000/uploads/f.png\n"
        );
    }

    #[test]
    fn renders_default_avatar_and_logged_out() {
        let mut renderer = TerminalRenderer::new(Vec::new(), "http://x");
        renderer.render(Some(&User {
            username: "bob".to_string(),
            email: "bob@x.com".to_string(),
            avatar: None,
        }));
        renderer.render(None);
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(text.contains("avatar:   default-avatar.png\n"));
        assert!(text.ends_with("Not logged in.\n"));
    }
}
