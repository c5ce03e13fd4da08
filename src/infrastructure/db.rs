use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY NOT NULL,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        fullname TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS authentications (
        token TEXT PRIMARY KEY NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS albums (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        year INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS songs (
        id TEXT PRIMARY KEY NOT NULL,
        album_id TEXT REFERENCES albums(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        year INTEGER NOT NULL,
        genre TEXT NOT NULL,
        performer TEXT NOT NULL,
        duration INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS playlists (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        owner TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS playlist_songs (
        id TEXT PRIMARY KEY NOT NULL,
        playlist_id TEXT NOT NULL REFERENCES playlists(id) ON DELETE CASCADE,
        song_id TEXT NOT NULL REFERENCES songs(id) ON DELETE CASCADE,
        added_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS playlist_song_activities (
        id TEXT PRIMARY KEY NOT NULL,
        playlist_id TEXT NOT NULL REFERENCES playlists(id) ON DELETE CASCADE,
        song_id TEXT NOT NULL REFERENCES songs(id) ON DELETE CASCADE,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        action TEXT NOT NULL,
        time TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS collaborations (
        id TEXT PRIMARY KEY NOT NULL,
        playlist_id TEXT NOT NULL REFERENCES playlists(id) ON DELETE CASCADE,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        UNIQUE (playlist_id, user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_album_likes (
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        album_id TEXT NOT NULL REFERENCES albums(id) ON DELETE CASCADE,
        UNIQUE (user_id, album_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS queues (
        name TEXT PRIMARY KEY NOT NULL,
        durable BOOLEAN NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS queue_messages (
        id TEXT PRIMARY KEY NOT NULL,
        queue TEXT NOT NULL REFERENCES queues(name) ON DELETE CASCADE,
        payload BLOB NOT NULL,
        status TEXT NOT NULL DEFAULT 'ready',
        attempts INTEGER NOT NULL DEFAULT 0,
        enqueued_at TEXT NOT NULL,
        claimed_at TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_queue_messages_ready ON queue_messages (queue, status, enqueued_at)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_playlist_songs_link ON playlist_songs (playlist_id, song_id)",
    "CREATE INDEX IF NOT EXISTS idx_activities_playlist ON playlist_song_activities (playlist_id)",
];

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    db.execute(Statement::from_string(
        backend,
        "PRAGMA foreign_keys = ON".to_owned(),
    ))
    .await?;

    for sql in SCHEMA {
        db.execute(Statement::from_string(backend, sql.to_string()))
            .await?;
    }

    tracing::debug!("Schema ready ({} statements)", SCHEMA.len());
    Ok(())
}
