use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Editorial article shown on the blog pages.
#[derive(Debug, Clone, Serialize)]
pub struct BlogPost {
    pub slug: &'static str,
    pub title: &'static str,
    pub excerpt: &'static str,
    pub body: &'static str,
    pub published_on: NaiveDate,
}

/// List-view projection without the body.
#[derive(Debug, Clone, Serialize)]
pub struct BlogPostSummary {
    pub slug: &'static str,
    pub title: &'static str,
    pub excerpt: &'static str,
    pub published_on: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamMember {
    pub name: &'static str,
    pub role: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgencyService {
    pub key: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
}

/// Read-only editorial content served to the blog, team, and services pages.
pub struct ContentLibrary {
    posts: Vec<BlogPost>,
    team: Vec<TeamMember>,
    services: Vec<AgencyService>,
}

impl ContentLibrary {
    pub fn standard() -> Self {
        Self {
            posts: standard_posts(),
            team: standard_team(),
            services: standard_services(),
        }
    }

    pub fn post_summaries(&self) -> Vec<BlogPostSummary> {
        self.posts
            .iter()
            .map(|post| BlogPostSummary {
                slug: post.slug,
                title: post.title,
                excerpt: post.excerpt,
                published_on: post.published_on,
            })
            .collect()
    }

    pub fn post_by_slug(&self, slug: &str) -> Option<&BlogPost> {
        self.posts.iter().find(|post| post.slug == slug)
    }

    pub fn team(&self) -> &[TeamMember] {
        &self.team
    }

    pub fn services(&self) -> &[AgencyService] {
        &self.services
    }
}

/// Collection/detail fetches for the content pages; no write surface.
pub fn content_router(library: Arc<ContentLibrary>) -> Router {
    Router::new()
        .route("/api/blog", get(blog_index_handler))
        .route("/api/blog/:slug", get(blog_post_handler))
        .route("/api/team", get(team_handler))
        .route("/api/services", get(services_handler))
        .with_state(library)
}

async fn blog_index_handler(State(library): State<Arc<ContentLibrary>>) -> Response {
    (StatusCode::OK, Json(library.post_summaries())).into_response()
}

async fn blog_post_handler(
    State(library): State<Arc<ContentLibrary>>,
    Path(slug): Path<String>,
) -> Response {
    match library.post_by_slug(&slug) {
        Some(post) => (StatusCode::OK, Json(post.clone())).into_response(),
        None => {
            let payload = json!({ "error": format!("no article with slug '{slug}'") });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}

async fn team_handler(State(library): State<Arc<ContentLibrary>>) -> Response {
    (StatusCode::OK, Json(library.team().to_vec())).into_response()
}

async fn services_handler(State(library): State<Arc<ContentLibrary>>) -> Response {
    (StatusCode::OK, Json(library.services().to_vec())).into_response()
}

fn standard_posts() -> Vec<BlogPost> {
    vec![
        BlogPost {
            slug: "how-to-choose-a-district",
            title: "How to choose a district before you choose an apartment",
            excerpt: "Commute, schools, and resale value matter more than the floor plan.",
            body: "Start from the daily commute and work backwards: a great floor plan \
                   in the wrong district gets resold within three years. We compare the \
                   Central, Riverside, and Northern districts on transit, schools, and \
                   five-year price dynamics.",
            published_on: date(2025, 3, 14),
        },
        BlogPost {
            slug: "mortgage-rates-2025",
            title: "What the 2025 rate cycle means for your mortgage",
            excerpt: "Why waiting for a lower rate often costs more than buying now.",
            body: "A one-point rate drop saves less than most buyers expect once price \
                   growth is factored in. We walk through the amortization math with \
                   three realistic scenarios from our calculator.",
            published_on: date(2025, 5, 2),
        },
        BlogPost {
            slug: "new-building-acceptance-checklist",
            title: "Accepting a new-building apartment: a 40-point checklist",
            excerpt: "What to verify before signing the acceptance act.",
            body: "From window seals to stair rail fixings: the defects our inspectors \
                   find most often in commissioned towers, and how to document them so \
                   the developer fixes them on their budget, not yours.",
            published_on: date(2025, 6, 20),
        },
    ]
}

fn standard_team() -> Vec<TeamMember> {
    vec![
        TeamMember {
            name: "Elena Morozova",
            role: "Head of Residential Sales",
            phone: "+7 900 111-20-30",
            email: "e.morozova@agency.example",
        },
        TeamMember {
            name: "Dmitry Volkov",
            role: "New-Building Specialist",
            phone: "+7 900 111-20-31",
            email: "d.volkov@agency.example",
        },
        TeamMember {
            name: "Olga Ivanova",
            role: "Mortgage Consultant",
            phone: "+7 900 111-20-32",
            email: "o.ivanova@agency.example",
        },
    ]
}

fn standard_services() -> Vec<AgencyService> {
    vec![
        AgencyService {
            key: "apartment-selection",
            title: "Apartment selection",
            summary: "Shortlist of verified listings matched to your criteria.",
        },
        AgencyService {
            key: "mortgage-consulting",
            title: "Mortgage consulting",
            summary: "Bank selection and application support with rate comparison.",
        },
        AgencyService {
            key: "sale-support",
            title: "Sale support",
            summary: "Valuation, staging, and deal escort through registration.",
        },
        AgencyService {
            key: "new-building-acceptance",
            title: "New-building acceptance",
            summary: "Technical inspection before you sign the acceptance act.",
        },
    ]
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blog_summaries_omit_the_body() {
        let library = ContentLibrary::standard();
        let summaries = library.post_summaries();
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].slug, "how-to-choose-a-district");
    }

    #[test]
    fn detail_lookup_is_by_slug() {
        let library = ContentLibrary::standard();
        assert!(library.post_by_slug("mortgage-rates-2025").is_some());
        assert!(library.post_by_slug("missing-article").is_none());
    }

    #[test]
    fn required_service_keys_are_seeded() {
        let library = ContentLibrary::standard();
        assert!(library
            .services()
            .iter()
            .any(|service| service.key == "mortgage-consulting"));
    }
}
