mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::models::*;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

/// An author together with the stored password material, for login checks.
/// Never serialized; stays inside the auth layer.
pub struct AuthorCredentials {
    pub author: Author,
    pub password_hash: String,
    pub salt: String,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "gazette")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("gazette.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Author operations
    // ============================================================

    pub fn create_author(
        &self,
        username: &str,
        password_hash: &str,
        salt: &str,
    ) -> Result<Author> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO authors (id, username, password_hash, salt, created_at)
             VALUES (?, ?, ?, ?, ?)",
            (
                id.to_string(),
                username,
                password_hash,
                salt,
                now.to_rfc3339(),
            ),
        )?;

        Ok(Author {
            id,
            username: username.to_string(),
            created_at: now,
        })
    }

    pub fn get_author(&self, id: Uuid) -> Result<Option<Author>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt =
            conn.prepare("SELECT id, username, created_at FROM authors WHERE id = ?")?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Author {
                id: parse_uuid(row.get::<_, String>(0)?),
                username: row.get(1)?,
                created_at: parse_datetime(row.get::<_, String>(2)?),
            }))
        } else {
            Ok(None)
        }
    }

    pub fn username_exists(&self, username: &str) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM authors WHERE username = ?",
            [username],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn get_author_credentials(&self, username: &str) -> Result<Option<AuthorCredentials>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, username, created_at, password_hash, salt
             FROM authors WHERE username = ?",
        )?;

        let mut rows = stmt.query([username])?;
        if let Some(row) = rows.next()? {
            Ok(Some(AuthorCredentials {
                author: Author {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    username: row.get(1)?,
                    created_at: parse_datetime(row.get::<_, String>(2)?),
                },
                password_hash: row.get(3)?,
                salt: row.get(4)?,
            }))
        } else {
            Ok(None)
        }
    }

    // ============================================================
    // Session operations
    // ============================================================

    pub fn create_session(&self, author_id: Uuid) -> Result<Session> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let token = Uuid::new_v4().simple().to_string();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO sessions (token, author_id, created_at) VALUES (?, ?, ?)",
            (&token, author_id.to_string(), now.to_rfc3339()),
        )?;

        Ok(Session {
            token,
            author_id,
            created_at: now,
        })
    }

    pub fn get_session_author(&self, token: &str) -> Result<Option<Uuid>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare("SELECT author_id FROM sessions WHERE token = ?")?;

        let mut rows = stmt.query([token])?;
        if let Some(row) = rows.next()? {
            Ok(Some(parse_uuid(row.get::<_, String>(0)?)))
        } else {
            Ok(None)
        }
    }

    pub fn delete_session(&self, token: &str) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM sessions WHERE token = ?", [token])?;
        Ok(rows > 0)
    }

    // ============================================================
    // News operations
    // ============================================================

    pub fn create_news(&self, input: CreateNewsInput) -> Result<NewsItem> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let date = input.date.unwrap_or_else(Utc::now);

        conn.execute(
            "INSERT INTO news (id, title, text, date) VALUES (?, ?, ?, ?)",
            (id.to_string(), &input.title, &input.text, date.to_rfc3339()),
        )?;

        Ok(NewsItem {
            id,
            title: input.title,
            text: input.text,
            date,
        })
    }

    pub fn get_news(&self, id: Uuid) -> Result<Option<NewsItem>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare("SELECT id, title, text, date FROM news WHERE id = ?")?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(NewsItem {
                id: parse_uuid(row.get::<_, String>(0)?),
                title: row.get(1)?,
                text: row.get(2)?,
                date: parse_datetime(row.get::<_, String>(3)?),
            }))
        } else {
            Ok(None)
        }
    }

    /// Home listing: newest first, truncated to one page.
    pub fn list_news(&self, limit: usize) -> Result<Vec<NewsItem>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, title, text, date FROM news ORDER BY date DESC LIMIT ?",
        )?;

        let items = stmt
            .query_map([limit as i64], |row| {
                Ok(NewsItem {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    title: row.get(1)?,
                    text: row.get(2)?,
                    date: parse_datetime(row.get::<_, String>(3)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    // ============================================================
    // Comment operations
    // ============================================================

    pub fn create_comment(&self, news_id: Uuid, author_id: Uuid, text: &str) -> Result<Comment> {
        self.create_comment_at(news_id, author_id, text, Utc::now())
    }

    pub fn create_comment_at(
        &self,
        news_id: Uuid,
        author_id: Uuid,
        text: &str,
        created: DateTime<Utc>,
    ) -> Result<Comment> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();

        conn.execute(
            "INSERT INTO comments (id, news_id, author_id, text, created)
             VALUES (?, ?, ?, ?, ?)",
            (
                id.to_string(),
                news_id.to_string(),
                author_id.to_string(),
                text,
                created.to_rfc3339(),
            ),
        )?;

        Ok(Comment {
            id,
            news_id,
            author_id,
            text: text.to_string(),
            created,
        })
    }

    pub fn get_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, news_id, author_id, text, created FROM comments WHERE id = ?",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Comment {
                id: parse_uuid(row.get::<_, String>(0)?),
                news_id: parse_uuid(row.get::<_, String>(1)?),
                author_id: parse_uuid(row.get::<_, String>(2)?),
                text: row.get(3)?,
                created: parse_datetime(row.get::<_, String>(4)?),
            }))
        } else {
            Ok(None)
        }
    }

    /// Comments under one news item, oldest first. Rowid breaks timestamp
    /// ties, keeping insertion order stable.
    pub fn get_comments_for_news(&self, news_id: Uuid) -> Result<Vec<Comment>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, news_id, author_id, text, created
             FROM comments WHERE news_id = ? ORDER BY created ASC, rowid ASC",
        )?;

        let comments = stmt
            .query_map([news_id.to_string()], |row| {
                Ok(Comment {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    news_id: parse_uuid(row.get::<_, String>(1)?),
                    author_id: parse_uuid(row.get::<_, String>(2)?),
                    text: row.get(3)?,
                    created: parse_datetime(row.get::<_, String>(4)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(comments)
    }

    pub fn update_comment(&self, id: Uuid, text: &str) -> Result<Option<Comment>> {
        let Some(existing) = self.get_comment(id)? else {
            return Ok(None);
        };

        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "UPDATE comments SET text = ? WHERE id = ?",
            (text, id.to_string()),
        )?;

        Ok(Some(Comment {
            text: text.to_string(),
            ..existing
        }))
    }

    pub fn delete_comment(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM comments WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    pub fn count_comments(&self) -> Result<i64> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let count = conn.query_row("SELECT COUNT(*) FROM comments", [], |row| row.get(0))?;
        Ok(count)
    }

    // ============================================================
    // Note operations
    // ============================================================

    pub fn create_note(
        &self,
        author_id: Uuid,
        title: &str,
        text: &str,
        slug: &str,
    ) -> Result<Note> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO notes (id, author_id, title, text, slug, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            (
                id.to_string(),
                author_id.to_string(),
                title,
                text,
                slug,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ),
        )?;

        Ok(Note {
            id,
            author_id,
            title: title.to_string(),
            text: text.to_string(),
            slug: slug.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn get_note_by_slug(&self, slug: &str) -> Result<Option<Note>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, author_id, title, text, slug, created_at, updated_at
             FROM notes WHERE slug = ?",
        )?;

        let mut rows = stmt.query([slug])?;
        if let Some(row) = rows.next()? {
            Ok(Some(note_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn slug_exists(&self, slug: &str) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM notes WHERE slug = ?",
            [slug],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// An author's own notes, in insertion order.
    pub fn get_notes_by_author(&self, author_id: Uuid) -> Result<Vec<Note>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, author_id, title, text, slug, created_at, updated_at
             FROM notes WHERE author_id = ? ORDER BY rowid",
        )?;

        let notes = stmt
            .query_map([author_id.to_string()], |row| note_from_row(row))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    pub fn update_note(
        &self,
        id: Uuid,
        title: &str,
        text: &str,
        slug: &str,
    ) -> Result<Option<Note>> {
        let Some(existing) = self.get_note(id)? else {
            return Ok(None);
        };

        let conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();
        conn.execute(
            "UPDATE notes SET title = ?, text = ?, slug = ?, updated_at = ? WHERE id = ?",
            (title, text, slug, now.to_rfc3339(), id.to_string()),
        )?;

        Ok(Some(Note {
            title: title.to_string(),
            text: text.to_string(),
            slug: slug.to_string(),
            updated_at: now,
            ..existing
        }))
    }

    pub fn get_note(&self, id: Uuid) -> Result<Option<Note>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, author_id, title, text, slug, created_at, updated_at
             FROM notes WHERE id = ?",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(note_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn delete_note(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM notes WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    pub fn count_notes(&self) -> Result<i64> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let count = conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn note_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: parse_uuid(row.get::<_, String>(0)?),
        author_id: parse_uuid(row.get::<_, String>(1)?),
        title: row.get(2)?,
        text: row.get(3)?,
        slug: row.get(4)?,
        created_at: parse_datetime(row.get::<_, String>(5)?),
        updated_at: parse_datetime(row.get::<_, String>(6)?),
    })
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
