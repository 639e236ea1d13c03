//! # SQLite Repository
//!
//! Implements the data mapping between the SQLite relational model and
//! the `domains` models. Entities that own a tag collection replace it
//! wholesale inside one transaction, so a concurrent reader sees either
//! the old set or the new set, never the gap between delete and recreate.

use async_trait::async_trait;
use domains::error::{AppError, Result};
use domains::models::{
    AdminUser, BlogPost, Comment, Experience, Profile, Project, SiteSettings,
};
use domains::traits::{ContentRepo, UserRepo};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS admin_users (
    id            TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS posts (
    id         TEXT PRIMARY KEY,
    slug       TEXT NOT NULL UNIQUE,
    title      TEXT NOT NULL,
    body       TEXT NOT NULL,
    excerpt    TEXT,
    published  INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS post_tags (
    post_id  TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    tag      TEXT NOT NULL,
    position INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS comments (
    id         TEXT PRIMARY KEY,
    post_id    TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    body       TEXT NOT NULL,
    author_key TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS projects (
    id          TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    url         TEXT,
    image_url   TEXT,
    featured    INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS project_tags (
    project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    tag        TEXT NOT NULL,
    position   INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS experience (
    id         TEXT PRIMARY KEY,
    company    TEXT NOT NULL,
    role       TEXT NOT NULL,
    summary    TEXT NOT NULL,
    started_at TEXT NOT NULL,
    ended_at   TEXT,
    sort_order INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS profiles (
    id           TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    headline     TEXT NOT NULL,
    bio          TEXT NOT NULL,
    location     TEXT,
    avatar_url   TEXT,
    github_url   TEXT,
    linkedin_url TEXT,
    updated_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS site_settings (
    id               TEXT PRIMARY KEY,
    title            TEXT NOT NULL,
    tagline          TEXT,
    comments_enabled INTEGER NOT NULL DEFAULT 1,
    updated_at       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_comments_post ON comments(post_id);
CREATE INDEX IF NOT EXISTS idx_post_tags_post ON post_tags(post_id);
CREATE INDEX IF NOT EXISTS idx_project_tags_project ON project_tags(project_id);
"#;

pub struct SqliteRepo {
    pool: SqlitePool,
}

fn db_err(err: sqlx::Error) -> AppError {
    AppError::Internal(format!("database error: {err}"))
}

fn parse_uuid(text: String) -> Uuid {
    Uuid::parse_str(&text).unwrap_or_default()
}

impl SqliteRepo {
    /// Connects and applies the schema. In-memory URLs are pinned to one
    /// connection: every pooled connection would otherwise get its own
    /// empty database.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(db_err)?
            .create_if_missing(true)
            .foreign_keys(true);
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(db_err)?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await.map_err(db_err)?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn load_tags(&self, table: &str, fk: &str, id: Uuid) -> Result<Vec<String>> {
        let rows = sqlx::query(&format!(
            "SELECT tag FROM {table} WHERE {fk} = ? ORDER BY position ASC"
        ))
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(|row| row.get("tag")).collect())
    }

    fn post_from_row(row: &SqliteRow, tags: Vec<String>) -> BlogPost {
        BlogPost {
            id: parse_uuid(row.get("id")),
            slug: row.get("slug"),
            title: row.get("title"),
            body: row.get("body"),
            excerpt: row.get("excerpt"),
            published: row.get("published"),
            tags,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    async fn post_with_tags(&self, row: Option<SqliteRow>) -> Result<Option<BlogPost>> {
        match row {
            Some(row) => {
                let id = parse_uuid(row.get("id"));
                let tags = self.load_tags("post_tags", "post_id", id).await?;
                Ok(Some(Self::post_from_row(&row, tags)))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ContentRepo for SqliteRepo {
    async fn create_post(&self, post: BlogPost) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        sqlx::query(
            "INSERT INTO posts (id, slug, title, body, excerpt, published, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(post.id.to_string())
        .bind(&post.slug)
        .bind(&post.title)
        .bind(&post.body)
        .bind(&post.excerpt)
        .bind(post.published)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        for (position, tag) in post.tags.iter().enumerate() {
            sqlx::query("INSERT INTO post_tags (post_id, tag, position) VALUES (?, ?, ?)")
                .bind(post.id.to_string())
                .bind(tag)
                .bind(position as i64)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }
        tx.commit().await.map_err(db_err)
    }

    /// Updates the row and replaces the whole tag set in one transaction.
    async fn update_post(&self, post: BlogPost) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let updated = sqlx::query(
            "UPDATE posts SET slug = ?, title = ?, body = ?, excerpt = ?, published = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&post.slug)
        .bind(&post.title)
        .bind(&post.body)
        .bind(&post.excerpt)
        .bind(post.published)
        .bind(post.updated_at)
        .bind(post.id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;
        if updated.rows_affected() == 0 {
            return Err(AppError::not_found("post", post.id));
        }

        sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
            .bind(post.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        for (position, tag) in post.tags.iter().enumerate() {
            sqlx::query("INSERT INTO post_tags (post_id, tag, position) VALUES (?, ?, ?)")
                .bind(post.id.to_string())
                .bind(tag)
                .bind(position as i64)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }
        tx.commit().await.map_err(db_err)
    }

    async fn delete_post(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("post", id));
        }
        Ok(())
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<BlogPost>> {
        let row = sqlx::query("SELECT * FROM posts WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        self.post_with_tags(row).await
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        let row = sqlx::query("SELECT * FROM posts WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        self.post_with_tags(row).await
    }

    async fn list_posts(&self, include_unpublished: bool) -> Result<Vec<BlogPost>> {
        let sql = if include_unpublished {
            "SELECT * FROM posts ORDER BY created_at DESC"
        } else {
            "SELECT * FROM posts WHERE published = 1 ORDER BY created_at DESC"
        };
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        let mut posts = Vec::with_capacity(rows.len());
        for row in rows {
            let id = parse_uuid(row.get("id"));
            let tags = self.load_tags("post_tags", "post_id", id).await?;
            posts.push(Self::post_from_row(&row, tags));
        }
        Ok(posts)
    }

    async fn find_published_post(&self, id: Uuid) -> Result<Option<BlogPost>> {
        let row = sqlx::query("SELECT * FROM posts WHERE id = ? AND published = 1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        self.post_with_tags(row).await
    }

    async fn create_comment(&self, comment: Comment) -> Result<()> {
        sqlx::query(
            "INSERT INTO comments (id, post_id, body, author_key, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(comment.id.to_string())
        .bind(comment.post_id.to_string())
        .bind(&comment.body)
        .bind(&comment.author_key)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            "SELECT * FROM comments WHERE post_id = ? ORDER BY created_at ASC",
        )
        .bind(post_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| Comment {
                id: parse_uuid(row.get("id")),
                post_id: parse_uuid(row.get("post_id")),
                body: row.get("body"),
                author_key: row.get("author_key"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    async fn delete_comment(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("comment", id));
        }
        Ok(())
    }

    async fn count_comments(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM comments")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.get("n"))
    }

    async fn upsert_project(&self, project: Project) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        sqlx::query(
            "INSERT INTO projects (id, title, description, url, image_url, featured, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 title = excluded.title,
                 description = excluded.description,
                 url = excluded.url,
                 image_url = excluded.image_url,
                 featured = excluded.featured",
        )
        .bind(project.id.to_string())
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.url)
        .bind(&project.image_url)
        .bind(project.featured)
        .bind(project.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        sqlx::query("DELETE FROM project_tags WHERE project_id = ?")
            .bind(project.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        for (position, tag) in project.tags.iter().enumerate() {
            sqlx::query("INSERT INTO project_tags (project_id, tag, position) VALUES (?, ?, ?)")
                .bind(project.id.to_string())
                .bind(tag)
                .bind(position as i64)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }
        tx.commit().await.map_err(db_err)
    }

    async fn delete_project(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("project", id));
        }
        Ok(())
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        let rows = sqlx::query(
            "SELECT * FROM projects ORDER BY featured DESC, created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut projects = Vec::with_capacity(rows.len());
        for row in rows {
            let id = parse_uuid(row.get("id"));
            let tags = self.load_tags("project_tags", "project_id", id).await?;
            projects.push(Project {
                id,
                title: row.get("title"),
                description: row.get("description"),
                url: row.get("url"),
                image_url: row.get("image_url"),
                featured: row.get("featured"),
                tags,
                created_at: row.get("created_at"),
            });
        }
        Ok(projects)
    }

    async fn upsert_experience(&self, entry: Experience) -> Result<()> {
        sqlx::query(
            "INSERT INTO experience (id, company, role, summary, started_at, ended_at, sort_order)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 company = excluded.company,
                 role = excluded.role,
                 summary = excluded.summary,
                 started_at = excluded.started_at,
                 ended_at = excluded.ended_at,
                 sort_order = excluded.sort_order",
        )
        .bind(entry.id.to_string())
        .bind(&entry.company)
        .bind(&entry.role)
        .bind(&entry.summary)
        .bind(entry.started_at)
        .bind(entry.ended_at)
        .bind(entry.sort_order)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn delete_experience(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM experience WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("experience entry", id));
        }
        Ok(())
    }

    async fn list_experience(&self) -> Result<Vec<Experience>> {
        let rows = sqlx::query(
            "SELECT * FROM experience ORDER BY sort_order ASC, started_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| Experience {
                id: parse_uuid(row.get("id")),
                company: row.get("company"),
                role: row.get("role"),
                summary: row.get("summary"),
                started_at: row.get("started_at"),
                ended_at: row.get("ended_at"),
                sort_order: row.get("sort_order"),
            })
            .collect())
    }

    async fn get_profile(&self) -> Result<Option<Profile>> {
        let row = sqlx::query("SELECT * FROM profiles WHERE id = ?")
            .bind(domains::models::PROFILE_ID)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(row.map(|row| Profile {
            id: row.get("id"),
            name: row.get("name"),
            headline: row.get("headline"),
            bio: row.get("bio"),
            location: row.get("location"),
            avatar_url: row.get("avatar_url"),
            github_url: row.get("github_url"),
            linkedin_url: row.get("linkedin_url"),
            updated_at: row.get("updated_at"),
        }))
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<()> {
        sqlx::query(
            "INSERT INTO profiles (id, name, headline, bio, location, avatar_url, github_url, linkedin_url, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 headline = excluded.headline,
                 bio = excluded.bio,
                 location = excluded.location,
                 avatar_url = excluded.avatar_url,
                 github_url = excluded.github_url,
                 linkedin_url = excluded.linkedin_url,
                 updated_at = excluded.updated_at",
        )
        .bind(&profile.id)
        .bind(&profile.name)
        .bind(&profile.headline)
        .bind(&profile.bio)
        .bind(&profile.location)
        .bind(&profile.avatar_url)
        .bind(&profile.github_url)
        .bind(&profile.linkedin_url)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get_settings(&self) -> Result<Option<SiteSettings>> {
        let row = sqlx::query("SELECT * FROM site_settings WHERE id = ?")
            .bind(domains::models::SETTINGS_ID)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(row.map(|row| SiteSettings {
            id: row.get("id"),
            title: row.get("title"),
            tagline: row.get("tagline"),
            comments_enabled: row.get("comments_enabled"),
            updated_at: row.get("updated_at"),
        }))
    }

    async fn upsert_settings(&self, settings: SiteSettings) -> Result<()> {
        sqlx::query(
            "INSERT INTO site_settings (id, title, tagline, comments_enabled, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 title = excluded.title,
                 tagline = excluded.tagline,
                 comments_enabled = excluded.comments_enabled,
                 updated_at = excluded.updated_at",
        )
        .bind(&settings.id)
        .bind(&settings.title)
        .bind(&settings.tagline)
        .bind(settings.comments_enabled)
        .bind(settings.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl UserRepo for SqliteRepo {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AdminUser>> {
        let row = sqlx::query("SELECT * FROM admin_users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(row.map(|row| AdminUser {
            id: parse_uuid(row.get("id")),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            created_at: row.get("created_at"),
        }))
    }

    async fn create_user(&self, user: AdminUser) -> Result<()> {
        sqlx::query(
            "INSERT INTO admin_users (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<()> {
        let result = sqlx::query("UPDATE admin_users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("user", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::models::{PROFILE_ID, SETTINGS_ID};

    async fn repo() -> SqliteRepo {
        SqliteRepo::connect("sqlite::memory:").await.unwrap()
    }

    fn sample_post(published: bool) -> BlogPost {
        let now = Utc::now();
        BlogPost {
            id: Uuid::new_v4(),
            slug: format!("post-{}", Uuid::new_v4()),
            title: "A Post".to_string(),
            body: "body".to_string(),
            excerpt: None,
            published,
            tags: vec!["rust".to_string(), "axum".to_string()],
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn post_round_trip_keeps_tags_in_order() {
        let repo = repo().await;
        let post = sample_post(true);
        repo.create_post(post.clone()).await.unwrap();

        let loaded = repo.get_post(post.id).await.unwrap().unwrap();
        assert_eq!(loaded.slug, post.slug);
        assert_eq!(loaded.tags, vec!["rust", "axum"]);
    }

    #[tokio::test]
    async fn update_replaces_tag_set_wholesale() {
        let repo = repo().await;
        let mut post = sample_post(true);
        repo.create_post(post.clone()).await.unwrap();

        post.tags = vec!["sqlite".to_string()];
        post.updated_at = Utc::now();
        repo.update_post(post.clone()).await.unwrap();

        let loaded = repo.get_post(post.id).await.unwrap().unwrap();
        assert_eq!(loaded.tags, vec!["sqlite"]);
    }

    #[tokio::test]
    async fn find_published_post_hides_drafts() {
        let repo = repo().await;
        let draft = sample_post(false);
        repo.create_post(draft.clone()).await.unwrap();

        assert!(repo.find_published_post(draft.id).await.unwrap().is_none());
        assert!(repo.get_post(draft.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn comments_are_counted_and_deleted() {
        let repo = repo().await;
        let post = sample_post(true);
        repo.create_post(post.clone()).await.unwrap();

        let comment = Comment {
            id: Uuid::new_v4(),
            post_id: post.id,
            body: "hi".to_string(),
            author_key: "86ff02d6a1ae04bc".to_string(),
            created_at: Utc::now(),
        };
        repo.create_comment(comment.clone()).await.unwrap();
        assert_eq!(repo.count_comments().await.unwrap(), 1);

        repo.delete_comment(comment.id).await.unwrap();
        assert_eq!(repo.count_comments().await.unwrap(), 0);
        assert!(matches!(
            repo.delete_comment(comment.id).await.unwrap_err(),
            AppError::NotFound(_, _)
        ));
    }

    #[tokio::test]
    async fn singleton_upsert_never_grows_past_one_row() {
        let repo = repo().await;
        for title in ["First", "Second"] {
            repo.upsert_settings(SiteSettings {
                id: SETTINGS_ID.to_string(),
                title: title.to_string(),
                tagline: None,
                comments_enabled: true,
                updated_at: Utc::now(),
            })
            .await
            .unwrap();
        }

        let settings = repo.get_settings().await.unwrap().unwrap();
        assert_eq!(settings.title, "Second");

        let row = sqlx::query("SELECT COUNT(*) AS n FROM site_settings")
            .fetch_one(repo.pool())
            .await
            .unwrap();
        let n: i64 = row.get("n");
        assert_eq!(n, 1);
    }

    #[tokio::test]
    async fn profile_updates_target_the_fixed_id() {
        let repo = repo().await;
        repo.upsert_profile(Profile {
            id: PROFILE_ID.to_string(),
            name: "Ada".to_string(),
            headline: "Engineer".to_string(),
            bio: String::new(),
            location: None,
            avatar_url: None,
            github_url: None,
            linkedin_url: None,
            updated_at: Utc::now(),
        })
        .await
        .unwrap();

        let profile = repo.get_profile().await.unwrap().unwrap();
        assert_eq!(profile.id, PROFILE_ID);
        assert_eq!(profile.name, "Ada");
    }

    #[tokio::test]
    async fn user_lookup_and_password_rotation() {
        let repo = repo().await;
        let user = AdminUser {
            id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            password_hash: "$argon2id$old".to_string(),
            created_at: Utc::now(),
        };
        repo.create_user(user.clone()).await.unwrap();

        let found = repo.find_user_by_email("admin@example.com").await.unwrap();
        assert_eq!(found.unwrap().id, user.id);
        assert!(repo.find_user_by_email("ghost@example.com").await.unwrap().is_none());

        repo.update_password_hash(user.id, "$argon2id$new").await.unwrap();
        let rotated = repo.find_user_by_email("admin@example.com").await.unwrap().unwrap();
        assert_eq!(rotated.password_hash, "$argon2id$new");
    }
}
