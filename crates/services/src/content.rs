//! # Content Service
//!
//! CRUD orchestration for the admin dashboard: posts, projects,
//! experience entries, comment moderation, and the singleton
//! profile/settings records. Thin by design; the interesting decisions
//! live in the repository's transaction boundaries.

use chrono::Utc;
use domains::error::{AppError, Result};
use domains::models::{
    BlogPost, Comment, Experience, Profile, Project, SiteSettings, PROFILE_ID, SETTINGS_ID,
};
use domains::traits::{ContentRepo, PageCache};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Input for creating a blog post.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub body: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update for a blog post. Absent fields are left untouched;
/// `tags`, when present, replaces the whole collection atomically.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub body: Option<String>,
    pub excerpt: Option<String>,
    pub published: Option<bool>,
    pub tags: Option<Vec<String>>,
}

/// Input for creating or updating a project.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInput {
    pub id: Option<Uuid>,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Input for creating or updating an experience entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ExperienceInput {
    pub id: Option<Uuid>,
    pub company: String,
    pub role: String,
    #[serde(default)]
    pub summary: String,
    pub started_at: chrono::DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<chrono::DateTime<Utc>>,
    #[serde(default)]
    pub sort_order: i64,
}

/// Input for updating the singleton profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInput {
    pub name: String,
    pub headline: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
}

/// Input for updating the singleton site settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsInput {
    pub title: String,
    #[serde(default)]
    pub tagline: Option<String>,
    pub comments_enabled: bool,
}

pub struct ContentService {
    repo: Arc<dyn ContentRepo>,
    cache: Arc<dyn PageCache>,
}

impl ContentService {
    pub fn new(repo: Arc<dyn ContentRepo>, cache: Arc<dyn PageCache>) -> Self {
        Self { repo, cache }
    }

    // ── Posts ────────────────────────────────────────────────────────────

    pub async fn create_post(&self, input: NewPost) -> Result<BlogPost> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("post title must not be empty".into()));
        }
        let slug = match input.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => validate_slug(s)?,
            None => slugify(title),
        };
        if self.repo.get_post_by_slug(&slug).await?.is_some() {
            return Err(AppError::Validation(format!("slug '{slug}' is already in use")));
        }

        let now = Utc::now();
        let post = BlogPost {
            id: Uuid::new_v4(),
            slug,
            title: title.to_string(),
            body: input.body,
            excerpt: input.excerpt,
            published: input.published,
            tags: normalize_tags(input.tags),
            created_at: now,
            updated_at: now,
        };
        self.repo.create_post(post.clone()).await?;
        self.invalidate_post_pages(&post.slug);
        Ok(post)
    }

    pub async fn update_post(&self, id: Uuid, patch: PostPatch) -> Result<BlogPost> {
        let mut post = self
            .repo
            .get_post(id)
            .await?
            .ok_or_else(|| AppError::not_found("post", id))?;
        let old_slug = post.slug.clone();

        if let Some(title) = patch.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(AppError::Validation("post title must not be empty".into()));
            }
            post.title = title;
        }
        if let Some(slug) = patch.slug {
            post.slug = validate_slug(slug.trim())?;
        }
        if let Some(body) = patch.body {
            post.body = body;
        }
        if let Some(excerpt) = patch.excerpt {
            post.excerpt = Some(excerpt);
        }
        if let Some(published) = patch.published {
            post.published = published;
        }
        if let Some(tags) = patch.tags {
            post.tags = normalize_tags(tags);
        }
        post.updated_at = Utc::now();

        // Entity and tag rows are replaced together in one transaction.
        self.repo.update_post(post.clone()).await?;
        self.invalidate_post_pages(&old_slug);
        if post.slug != old_slug {
            self.invalidate_post_pages(&post.slug);
        }
        Ok(post)
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<()> {
        let post = self
            .repo
            .get_post(id)
            .await?
            .ok_or_else(|| AppError::not_found("post", id))?;
        self.repo.delete_post(id).await?;
        self.invalidate_post_pages(&post.slug);
        Ok(())
    }

    pub async fn list_posts(&self, include_unpublished: bool) -> Result<Vec<BlogPost>> {
        self.repo.list_posts(include_unpublished).await
    }

    /// Public read path: unpublished posts are indistinguishable from
    /// absent ones.
    pub async fn published_post_by_slug(&self, slug: &str) -> Result<BlogPost> {
        let post = self
            .repo
            .get_post_by_slug(slug)
            .await?
            .filter(|p| p.published)
            .ok_or_else(|| AppError::not_found("post", slug))?;
        Ok(post)
    }

    // ── Comments (moderation) ────────────────────────────────────────────

    pub async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        self.repo.list_comments(post_id).await
    }

    pub async fn remove_comment(&self, id: Uuid) -> Result<()> {
        self.repo.delete_comment(id).await
    }

    // ── Projects ─────────────────────────────────────────────────────────

    pub async fn save_project(&self, input: ProjectInput) -> Result<Project> {
        if input.title.trim().is_empty() {
            return Err(AppError::Validation("project title must not be empty".into()));
        }
        let project = Project {
            id: input.id.unwrap_or_else(Uuid::new_v4),
            title: input.title.trim().to_string(),
            description: input.description,
            url: input.url,
            image_url: input.image_url,
            featured: input.featured,
            tags: normalize_tags(input.tags),
            created_at: Utc::now(),
        };
        self.repo.upsert_project(project.clone()).await?;
        self.cache.invalidate("/projects");
        Ok(project)
    }

    pub async fn delete_project(&self, id: Uuid) -> Result<()> {
        self.repo.delete_project(id).await?;
        self.cache.invalidate("/projects");
        Ok(())
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.repo.list_projects().await
    }

    // ── Experience ───────────────────────────────────────────────────────

    pub async fn save_experience(&self, input: ExperienceInput) -> Result<Experience> {
        if input.company.trim().is_empty() || input.role.trim().is_empty() {
            return Err(AppError::Validation(
                "experience entries need a company and a role".into(),
            ));
        }
        let entry = Experience {
            id: input.id.unwrap_or_else(Uuid::new_v4),
            company: input.company.trim().to_string(),
            role: input.role.trim().to_string(),
            summary: input.summary,
            started_at: input.started_at,
            ended_at: input.ended_at,
            sort_order: input.sort_order,
        };
        self.repo.upsert_experience(entry.clone()).await?;
        self.cache.invalidate("/experience");
        Ok(entry)
    }

    pub async fn delete_experience(&self, id: Uuid) -> Result<()> {
        self.repo.delete_experience(id).await?;
        self.cache.invalidate("/experience");
        Ok(())
    }

    pub async fn list_experience(&self) -> Result<Vec<Experience>> {
        self.repo.list_experience().await
    }

    // ── Singletons ───────────────────────────────────────────────────────

    pub async fn profile(&self) -> Result<Profile> {
        self.repo
            .get_profile()
            .await?
            .ok_or_else(|| AppError::not_found("profile", PROFILE_ID))
    }

    /// Updates always target the fixed singleton id, never a caller-chosen
    /// one.
    pub async fn update_profile(&self, input: ProfileInput) -> Result<Profile> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation("profile name must not be empty".into()));
        }
        let profile = Profile {
            id: PROFILE_ID.to_string(),
            name: input.name.trim().to_string(),
            headline: input.headline,
            bio: input.bio,
            location: input.location,
            avatar_url: input.avatar_url,
            github_url: input.github_url,
            linkedin_url: input.linkedin_url,
            updated_at: Utc::now(),
        };
        self.repo.upsert_profile(profile.clone()).await?;
        self.cache.invalidate("/");
        Ok(profile)
    }

    pub async fn settings(&self) -> Result<SiteSettings> {
        self.repo
            .get_settings()
            .await?
            .ok_or_else(|| AppError::not_found("settings", SETTINGS_ID))
    }

    pub async fn update_settings(&self, input: SettingsInput) -> Result<SiteSettings> {
        let settings = SiteSettings {
            id: SETTINGS_ID.to_string(),
            title: input.title,
            tagline: input.tagline,
            comments_enabled: input.comments_enabled,
            updated_at: Utc::now(),
        };
        self.repo.upsert_settings(settings.clone()).await?;
        self.cache.invalidate("/");
        Ok(settings)
    }

    fn invalidate_post_pages(&self, slug: &str) {
        self.cache.invalidate("/posts");
        self.cache.invalidate(&format!("/posts/{slug}"));
    }
}

/// Lowercases, trims, and deduplicates tags while preserving order.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Derives a URL slug from a title: lowercase alphanumerics, runs of
/// anything else collapsed to single dashes.
fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut prev_dash = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn validate_slug(slug: &str) -> Result<String> {
    if slug.is_empty()
        || !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(AppError::Validation(
            "slug may only contain lowercase letters, digits, and dashes".into(),
        ));
    }
    Ok(slug.to_string())
}
