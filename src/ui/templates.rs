//! HTML templates embedded in the binary

use minijinja::Environment;
use rust_embed::RustEmbed;
use serde::Serialize;

use crate::auth::{Identity, User};
use crate::error::Result;

use super::nav::{nav_links, NavLink};

#[derive(RustEmbed)]
#[folder = "templates/"]
struct TemplateAssets;

/// Template environment; `.html` templates are auto-escaped
#[derive(Debug, Clone)]
pub struct Templates {
    env: Environment<'static>,
}

/// Values every page receives, merged with the page's own context
#[derive(Serialize)]
struct PageContext<'a, T: Serialize> {
    nav: Vec<NavLink>,
    current_user: Option<&'a User>,
    #[serde(flatten)]
    page: T,
}

impl Templates {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_loader(|name| {
            Ok(TemplateAssets::get(name)
                .map(|file| String::from_utf8_lossy(&file.data).into_owned()))
        });
        Self { env }
    }

    /// Names of every embedded template
    pub fn names() -> Vec<String> {
        TemplateAssets::iter().map(|name| name.into_owned()).collect()
    }

    /// Render a page for the given requester
    pub fn render<T: Serialize>(&self, name: &str, identity: &Identity, page: T) -> Result<String> {
        let template = self.env.get_template(name)?;
        let html = template.render(PageContext {
            nav: nav_links(identity),
            current_user: identity.user(),
            page,
        })?;
        Ok(html)
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use minijinja::context;

    fn client() -> Identity {
        Identity::Authenticated(User {
            id: 1,
            email: "c@x.com".to_string(),
            first_name: "Clara".to_string(),
            last_name: "Client".to_string(),
            role: Some(Role::Client),
            date_joined: chrono::Utc::now(),
            last_login: None,
        })
    }

    #[test]
    fn test_every_template_compiles() {
        let templates = Templates::new();
        let names = Templates::names();
        assert!(names.iter().any(|n| n == "base.html"));
        for name in names {
            templates
                .env
                .get_template(&name)
                .unwrap_or_else(|e| panic!("{} failed to load: {}", name, e));
        }
    }

    #[test]
    fn test_home_shows_nav_for_identity() {
        let templates = Templates::new();
        let anonymous = templates
            .render("home.html", &Identity::Anonymous, context! {})
            .unwrap();
        assert!(anonymous.contains("href=\"/join/\""));
        assert!(!anonymous.contains("Logout"));

        let signed_in = templates.render("home.html", &client(), context! {}).unwrap();
        assert!(signed_in.contains("Post Job"));
        assert!(signed_in.contains("Logout"));
        assert!(signed_in.contains("Clara"));
    }

    #[test]
    fn test_output_is_escaped() {
        let templates = Templates::new();
        let html = templates
            .render(
                "jobs/available_jobs.html",
                &Identity::Anonymous,
                context! { jobs => vec![context! { id => 1, title => "<script>x</script>", description => "d", budget => 5 }] },
            )
            .unwrap();
        assert!(!html.contains("<script>x</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
