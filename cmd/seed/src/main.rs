//! # Seed Tool
//!
//! Idempotent bootstrap for a fresh deployment: creates the initial
//! admin user and the singleton profile/settings rows, and optionally a
//! batch of demo content. Safe to run repeatedly; existing rows are
//! left alone.

use anyhow::{bail, Context};
use chrono::Utc;
use domains::models::{BlogPost, Profile, SiteSettings, PROFILE_ID, SETTINGS_ID};
use domains::traits::{ContentRepo, UserRepo};
use fake::faker::lorem::en::{Paragraphs, Sentence, Words};
use fake::Fake;
use storage_adapters::SqliteRepo;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let settings = configs::Settings::load()?;
    let repo = SqliteRepo::connect(&settings.database_url).await?;

    seed_admin(&repo).await?;
    seed_singletons(&repo).await?;

    if std::env::var("ATELIER_SEED_DEMO").is_ok() {
        seed_demo_posts(&repo).await?;
    }

    tracing::info!("seeding complete");
    Ok(())
}

/// Creates the admin account from `ATELIER_ADMIN_EMAIL` /
/// `ATELIER_ADMIN_PASSWORD` unless one already exists.
async fn seed_admin(repo: &SqliteRepo) -> anyhow::Result<()> {
    let email = std::env::var("ATELIER_ADMIN_EMAIL")
        .context("ATELIER_ADMIN_EMAIL must be set to seed the admin user")?;
    let password = std::env::var("ATELIER_ADMIN_PASSWORD")
        .context("ATELIER_ADMIN_PASSWORD must be set to seed the admin user")?;
    if password.len() < auth_adapters::MIN_PASSWORD_LEN {
        bail!(
            "admin password must be at least {} characters",
            auth_adapters::MIN_PASSWORD_LEN
        );
    }

    if repo.find_user_by_email(&email).await?.is_some() {
        tracing::info!(%email, "admin user already present, skipping");
        return Ok(());
    }

    let user = domains::models::AdminUser {
        id: Uuid::new_v4(),
        email: email.clone(),
        password_hash: auth_adapters::hash_password(&password)?,
        created_at: Utc::now(),
    };
    repo.create_user(user).await?;
    tracing::info!(%email, "admin user created");
    Ok(())
}

/// Ensures the singleton profile and settings rows exist.
async fn seed_singletons(repo: &SqliteRepo) -> anyhow::Result<()> {
    if repo.get_profile().await?.is_none() {
        repo.upsert_profile(Profile {
            id: PROFILE_ID.to_string(),
            name: "Your Name".to_string(),
            headline: "Software Engineer".to_string(),
            bio: String::new(),
            location: None,
            avatar_url: None,
            github_url: None,
            linkedin_url: None,
            updated_at: Utc::now(),
        })
        .await?;
        tracing::info!("profile row initialized");
    }

    if repo.get_settings().await?.is_none() {
        repo.upsert_settings(SiteSettings {
            id: SETTINGS_ID.to_string(),
            title: "Atelier".to_string(),
            tagline: None,
            comments_enabled: true,
            updated_at: Utc::now(),
        })
        .await?;
        tracing::info!("settings row initialized");
    }
    Ok(())
}

/// Generates a handful of published demo posts for local development.
async fn seed_demo_posts(repo: &SqliteRepo) -> anyhow::Result<()> {
    for n in 1..=5 {
        let title: String = Sentence(3..7).fake();
        let paragraphs: Vec<String> = Paragraphs(2..4).fake();
        let tags: Vec<String> = Words(2..4).fake();
        let now = Utc::now();

        repo.create_post(BlogPost {
            id: Uuid::new_v4(),
            slug: format!("demo-post-{n}"),
            title: title.trim_end_matches('.').to_string(),
            body: paragraphs.join("\n\n"),
            excerpt: None,
            published: true,
            tags,
            created_at: now,
            updated_at: now,
        })
        .await?;
    }
    tracing::info!("demo posts created");
    Ok(())
}
