//! HTML pages. Templates live in `apps/web/templates/`.

use askama::Template;
use axum::response::Html;

use crate::errors::AppError;
use crate::session::{Flash, SessionData};

/// Shared page furniture: who is signed in and any pending flash message.
#[derive(Debug, Clone, Default)]
pub struct PageChrome {
    pub user_name: Option<String>,
    pub flash: Option<Flash>,
}

impl PageChrome {
    pub fn new(session: Option<&SessionData>, flash: Option<Flash>) -> Self {
        Self {
            user_name: session.map(|s| s.full_name.clone()),
            flash,
        }
    }
}

pub fn render<T: Template>(page: &T) -> Result<Html<String>, AppError> {
    Ok(Html(page.render()?))
}

#[derive(Template)]
#[template(path = "landing.html")]
pub struct LandingPage {
    pub chrome: PageChrome,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub chrome: PageChrome,
    pub full_name: String,
    pub email: String,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub chrome: PageChrome,
    pub email: String,
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfilePage {
    pub chrome: PageChrome,
    pub full_name: String,
    pub email: String,
    pub member_since: String,
    pub career: Option<String>,
    pub suggestion_count: usize,
}

#[derive(Template)]
#[template(path = "get_started.html")]
pub struct GetStartedPage {
    pub chrome: PageChrome,
    pub profile: String,
    pub interests: String,
    pub has_options: bool,
}

pub struct CareerCard {
    pub name: String,
    pub description: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "choose_career.html")]
pub struct ChooseCareerPage {
    pub chrome: PageChrome,
    pub careers: Vec<CareerCard>,
    pub has_roadmap: bool,
}

pub struct RenderedStep {
    pub step: String,
    pub details_html: String,
}

pub struct ResourceLink {
    pub text: String,
    /// Set only for http(s) URLs.
    pub href: Option<String>,
}

impl ResourceLink {
    pub fn new(text: &str) -> Self {
        let text = text.trim();
        let href = (text.starts_with("https://") || text.starts_with("http://"))
            .then(|| text.to_string());
        Self {
            text: text.to_string(),
            href,
        }
    }
}

#[derive(Template)]
#[template(path = "career_details.html")]
pub struct CareerDetailsPage {
    pub chrome: PageChrome,
    pub career: String,
    pub summary_html: String,
    pub steps: Vec<RenderedStep>,
    pub links: Vec<ResourceLink>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub chrome: PageChrome,
    pub status: u16,
    pub message: String,
}
