use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;

pub type Db = Surreal<Any>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: env::var("SCHEDULE_DB_URL")
                .unwrap_or_else(|_| "memory".to_string()),
            namespace: env::var("SCHEDULE_DB_NAMESPACE")
                .unwrap_or_else(|_| "showcase".to_string()),
            database: env::var("SCHEDULE_DB_DATABASE")
                .unwrap_or_else(|_| "schedule".to_string()),
            username: env::var("SCHEDULE_DB_USERNAME").ok(),
            password: env::var("SCHEDULE_DB_PASSWORD").ok(),
        }
    }
}

pub async fn create_connection(config: DatabaseConfig) -> Result<Db> {
    let db = surrealdb::engine::any::connect(config.url).await?;

    // Sign in if credentials are provided
    if let (Some(username), Some(password)) = (config.username, config.password) {
        db.signin(Root {
            username: &username,
            password: &password,
        })
        .await?;
    }

    // Use the specified namespace and database
    db.use_ns(config.namespace).use_db(config.database).await?;

    Ok(db)
}

pub async fn ensure_schema(db: &Db) -> Result<()> {
    let schema_queries = vec![
        // Schedule table. Date and time-of-day fields are stored as their
        // ISO-8601 string forms so they round-trip through serde unchanged
        // and compare with plain string equality.
        "DEFINE TABLE schedule SCHEMAFULL;
         DEFINE FIELD schedule_id ON TABLE schedule TYPE string;
         DEFINE FIELD venue_id ON TABLE schedule TYPE string;
         DEFINE FIELD date ON TABLE schedule TYPE string;
         DEFINE FIELD start_time ON TABLE schedule TYPE string;
         DEFINE FIELD duration_minutes ON TABLE schedule TYPE number;
         DEFINE FIELD title ON TABLE schedule TYPE option<string>;
         DEFINE FIELD speakers ON TABLE schedule TYPE array<string> DEFAULT [];
         DEFINE FIELD track ON TABLE schedule TYPE option<string>;
         DEFINE FIELD created_at ON TABLE schedule VALUE time::now();",

        // Indexes for the lookup shapes the resource exposes
        "DEFINE INDEX schedule_schedule_id ON TABLE schedule COLUMNS schedule_id UNIQUE;
         DEFINE INDEX schedule_venue_id ON TABLE schedule COLUMNS venue_id;
         DEFINE INDEX schedule_date ON TABLE schedule COLUMNS date;",
    ];

    for query in schema_queries {
        db.query(query).await?;
    }

    Ok(())
}
