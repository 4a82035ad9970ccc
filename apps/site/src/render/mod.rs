// Presentation: the résumé page as a pure function of the profile and the
// notices produced by the last submission. Holds no state between requests.

pub mod handlers;
pub mod html;

use crate::feedback::pipeline::SubmissionOutcome;
use crate::models::profile::Profile;
use html::{escape, link, list, safe_href, section};

pub const SUCCESS_MESSAGE: &str = "Thank you for reaching out! I will get back to you shortly.";
pub const STORE_FAILURE_MESSAGE: &str = "We couldn't submit your message";
pub const RETRY_MESSAGE: &str = "Please try again later.";

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;max-width:52rem;margin:2rem auto;padding:0 1rem;line-height:1.5}\
.hero{display:flex;gap:1.5rem;align-items:center}.hero img{width:230px;border-radius:50%}\
.links{display:flex;gap:1rem;list-style:none;padding:0}\
.notice{padding:.6rem .9rem;border-radius:.4rem;margin:.4rem 0}\
.success{background:#e6f4ea}.warning{background:#fff4e5}.error{background:#fdecea}.info{background:#e8f0fe}\
form label{display:block;margin-top:.8rem}form input,form textarea{width:100%;padding:.4rem}\
form small{color:#666}form button{margin-top:1rem;width:100%;padding:.6rem}";

/// A message shown above the contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
    Info(String),
}

impl Notice {
    fn css_class(&self) -> &'static str {
        match self {
            Notice::Success(_) => "success",
            Notice::Warning(_) => "warning",
            Notice::Error(_) => "error",
            Notice::Info(_) => "info",
        }
    }

    fn text(&self) -> &str {
        match self {
            Notice::Success(t) | Notice::Warning(t) | Notice::Error(t) | Notice::Info(t) => t.as_str(),
        }
    }
}

/// What the visitor sees after a submission attempt.
pub fn notices_for(outcome: &SubmissionOutcome) -> Vec<Notice> {
    match outcome {
        SubmissionOutcome::Succeeded(_) => vec![Notice::Success(SUCCESS_MESSAGE.to_string())],
        SubmissionOutcome::Invalid(errors) => {
            errors.iter().cloned().map(Notice::Warning).collect()
        }
        SubmissionOutcome::StoreFailed(detail) => vec![
            Notice::Error(STORE_FAILURE_MESSAGE.to_string()),
            Notice::Error(format!("Error details: {detail}")),
            Notice::Info(RETRY_MESSAGE.to_string()),
        ],
    }
}

/// Renders the full page. The contact form is always rendered empty.
pub fn render_page(profile: &Profile, notices: &[Notice]) -> String {
    let body = [
        render_hero(profile),
        render_social_links(profile),
        render_experience(profile),
        render_skills(profile),
        render_work_history(profile),
        render_projects(profile),
        render_contact(notices),
    ]
    .concat();

    format!(
        concat!(
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">",
            "<title>{title}</title><style>{style}</style></head><body>{body}</body></html>"
        ),
        title = escape(&profile.page_title),
        style = STYLE,
        body = body,
    )
}

fn render_hero(profile: &Profile) -> String {
    let photo = profile
        .photo_url
        .as_deref()
        .map(|url| {
            format!(
                r#"<img src="{}" alt="{}">"#,
                safe_href(url),
                escape(&profile.name)
            )
        })
        .unwrap_or_default();
    let resume = profile
        .resume_url
        .as_deref()
        .map(|url| format!(r#"<p><a href="{}" download>Download Resume</a></p>"#, safe_href(url)))
        .unwrap_or_default();

    format!(
        concat!(
            r#"<header class="hero">{photo}<div><h1>{name}</h1><hr><p>{description}</p>"#,
            r#"{resume}<p>Email: <a href="mailto:{email}">{email}</a></p></div></header>"#
        ),
        photo = photo,
        name = escape(&profile.name),
        description = escape(profile.description.trim()),
        resume = resume,
        email = escape(&profile.email),
    )
}

fn render_social_links(profile: &Profile) -> String {
    if profile.social_links.is_empty() {
        return String::new();
    }
    let items: String = profile
        .social_links
        .iter()
        .map(|l| format!("<li>{}</li>", link(&l.label, &l.url)))
        .collect();
    format!(r#"<nav><ul class="links">{items}</ul></nav>"#)
}

fn render_experience(profile: &Profile) -> String {
    if profile.experience.is_empty() {
        return String::new();
    }
    section(
        "experience",
        "Experience",
        &list(profile.experience.iter().map(|e| escape(e))),
    )
}

fn render_skills(profile: &Profile) -> String {
    if profile.skills.is_empty() {
        return String::new();
    }
    let items = profile.skills.iter().map(|s| {
        format!(
            "<strong>{}</strong>: {}",
            escape(&s.category),
            escape(&s.detail)
        )
    });
    section("skills", "Skills", &list(items))
}

fn render_work_history(profile: &Profile) -> String {
    if profile.jobs.is_empty() {
        return String::new();
    }
    let jobs: String = profile
        .jobs
        .iter()
        .map(|job| {
            format!(
                r#"<article class="job"><h3>{} | {}</h3><p>{}</p>{}</article>"#,
                escape(&job.title),
                escape(&job.organization),
                escape(&job.period),
                list(job.highlights.iter().map(|h| escape(h)))
            )
        })
        .collect();
    section("work-history", "Work History", &jobs)
}

fn render_projects(profile: &Profile) -> String {
    if profile.projects.is_empty() {
        return String::new();
    }
    section(
        "projects",
        "Projects & Accomplishments",
        &list(profile.projects.iter().map(|p| link(&p.label, &p.url))),
    )
}

fn render_contact(notices: &[Notice]) -> String {
    let notices: String = notices
        .iter()
        .map(|n| {
            format!(
                r#"<div class="notice {}" role="status">{}</div>"#,
                n.css_class(),
                escape(n.text())
            )
        })
        .collect();

    let form = concat!(
        r#"<form method="post" action="/feedback">"#,
        r#"<label for="name">Name *</label>"#,
        r#"<input id="name" name="name" type="text" placeholder="Enter your full name" required>"#,
        r#"<small>Please enter your full name (minimum 2 characters)</small>"#,
        r#"<label for="email">Email *</label>"#,
        r#"<input id="email" name="email" type="text" placeholder="your.email@example.com" required>"#,
        r#"<small>Enter a valid email address</small>"#,
        r#"<label for="message">Message *</label>"#,
        r#"<textarea id="message" name="message" rows="7" placeholder="Please share your thoughts..." required></textarea>"#,
        r#"<small>Minimum 10 characters</small>"#,
        r#"<button type="submit">Submit</button></form>"#
    );

    section("contact", "Contact Me", &format!("{notices}{form}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::feedback::FeedbackRecord;

    fn profile() -> Profile {
        Profile::from_toml(
            r#"
            page_title = "Digital CV | Sam <Dev>"
            name = "Sam Rivers"
            description = "Backend engineer."
            email = "sam@example.com"
            resume_url = "https://example.com/sam.pdf"
            experience = ["Five years of Rust"]

            [[social_links]]
            label = "GitHub"
            url = "https://github.com/sam"

            [[skills]]
            category = "Languages"
            detail = "Rust, Go"

            [[jobs]]
            title = "Engineer"
            organization = "Acme"
            period = "2020 - 2024"
            highlights = ["Built the billing pipeline"]

            [[projects]]
            label = "Tracer"
            url = "javascript:alert(1)"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_page_contains_every_section() {
        let html = render_page(&profile(), &[]);
        assert!(html.contains("<h1>Sam Rivers</h1>"));
        assert!(html.contains("Backend engineer."));
        assert!(html.contains(r#"href="https://github.com/sam""#));
        assert!(html.contains("Five years of Rust"));
        assert!(html.contains("<strong>Languages</strong>: Rust, Go"));
        assert!(html.contains("Engineer | Acme"));
        assert!(html.contains("Built the billing pipeline"));
        assert!(html.contains(r#"href="https://example.com/sam.pdf" download"#));
        assert!(html.contains(r#"action="/feedback""#));
    }

    #[test]
    fn test_page_escapes_profile_text() {
        let html = render_page(&profile(), &[]);
        assert!(html.contains("<title>Digital CV | Sam &lt;Dev&gt;</title>"));
    }

    #[test]
    fn test_unsafe_project_link_is_neutralized() {
        let html = render_page(&profile(), &[]);
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let mut p = profile();
        p.jobs.clear();
        p.projects.clear();
        let html = render_page(&p, &[]);
        assert!(!html.contains("Work History"));
        assert!(!html.contains("Projects &amp; Accomplishments"));
        assert!(html.contains("Contact Me"));
    }

    #[test]
    fn test_form_is_rendered_empty() {
        let html = render_page(&profile(), &notices_for(&SubmissionOutcome::Invalid(vec![])));
        assert!(!html.contains("value="));
        assert!(html.contains("></textarea>"));
    }

    #[test]
    fn test_notices_for_success() {
        let record = FeedbackRecord {
            timestamp: "2024-01-01 00:00:00".to_string(),
            name: "Jo".to_string(),
            email: "jo@example.com".to_string(),
            message: "0123456789".to_string(),
        };
        assert_eq!(
            notices_for(&SubmissionOutcome::Succeeded(record)),
            vec![Notice::Success(SUCCESS_MESSAGE.to_string())]
        );
    }

    #[test]
    fn test_notices_for_validation_errors_keep_order() {
        let notices = notices_for(&SubmissionOutcome::Invalid(vec![
            "first".to_string(),
            "second".to_string(),
        ]));
        assert_eq!(
            notices,
            vec![
                Notice::Warning("first".to_string()),
                Notice::Warning("second".to_string())
            ]
        );
    }

    #[test]
    fn test_notices_for_store_failure_include_detail_and_retry() {
        let notices = notices_for(&SubmissionOutcome::StoreFailed("timed out".to_string()));
        assert_eq!(notices.len(), 3);
        assert_eq!(notices[1], Notice::Error("Error details: timed out".to_string()));
        assert_eq!(notices[2], Notice::Info(RETRY_MESSAGE.to_string()));
    }

    #[test]
    fn test_notices_are_escaped_in_page() {
        let html = render_page(&profile(), &[Notice::Error("<b>boom</b>".to_string())]);
        assert!(html.contains(r#"<div class="notice error" role="status">&lt;b&gt;boom&lt;/b&gt;</div>"#));
    }
}
