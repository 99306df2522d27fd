//! Scaffold a guidebook project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Sample topics, relative to the content directory.
const SAMPLE_TOPICS: &[(&str, &str)] = &[
    ("databases/sql-interview-questions.md", SQL_TOPIC),
    ("databases/nosql-interview-questions.md", NOSQL_TOPIC),
    (
        "security/security-monitoring-interview-questions.md",
        SECURITY_TOPIC,
    ),
];

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing guidebook...");

    let base = config_path.parent().unwrap_or_else(|| Path::new(""));
    let content_dir = base.join("content");

    // Check if content already exists
    if content_dir.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            content_dir.display()
        );
        return Ok(());
    }

    write_file(config_path, DEFAULT_CONFIG, yes)?;

    for (relative, body) in SAMPLE_TOPICS {
        let path = content_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        write_file(&path, body, yes)?;
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'guidebook serve' to browse the sample topics.");

    Ok(())
}

fn write_file(path: &Path, content: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        tracing::debug!("Keeping existing {}", path.display());
        return Ok(());
    }

    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());
    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Guidebook configuration

[site]
title = "Interview Guides"
# Base URL (for deployment)
base_url = "/"
# One subdirectory per category
content_dir = "content"
output = "dist"

[catalog]
# Fail on any malformed document instead of skipping it
strict = false
related_limit = 4

[catalog.weights]
same_category = 10
shared_tag = 5
same_difficulty = 2

[categories.databases]
title = "Databases"
description = "Relational and non-relational data stores."
order = 1

[categories.security]
title = "Security"
order = 2

[server]
host = "127.0.0.1"
port = 7777
"#;

const SQL_TOPIC: &str = r#"---
title: SQL Interview Questions
description: Joins, indexes and transactions.
difficulty: intermediate
estimatedReadTime: 8
tags: [sql, databases, performance]
lastUpdated: 2024-01-15
---

# SQL Interview Questions

## What is the difference between INNER and LEFT JOIN?

An inner join keeps rows with a match on both sides. A left join keeps every
row from the left table and fills missing columns with `NULL`.

## When does an index not help?

When the query reads most of the table, or the predicate wraps the indexed
column in a function.

```sql
SELECT * FROM users WHERE lower(email) = 'a@example.com';
```
"#;

const NOSQL_TOPIC: &str = r#"---
title: NoSQL Interview Questions
description: Document, key-value and wide-column stores.
difficulty: intermediate
tags: [nosql, databases, performance]
---

# NoSQL Interview Questions

## What does eventual consistency mean?

Replicas may disagree for a while after a write, but converge once writes stop.

## How do you model one-to-many relations in a document store?

Embed the children when they are read together with the parent and bounded in
number; reference them otherwise.
"#;

const SECURITY_TOPIC: &str = r#"---
title: Security Monitoring Interview Questions
difficulty: senior
tags: [security, monitoring]
---

# Security Monitoring Interview Questions

## What should a SIEM alert on first?

Authentication anomalies, privilege changes and outbound traffic to unknown
hosts.
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use guidebook_catalog::{load_all, CatalogOptions};

    #[tokio::test]
    async fn scaffolds_a_loadable_site() {
        let temp = tempfile::tempdir().unwrap();
        let config = temp.path().join("guidebook.toml");

        run(&config, false).await.unwrap();

        assert!(config.exists());
        let parsed = crate::config::load(&config).unwrap();
        assert_eq!(parsed.server.port, 7777);

        let catalog = load_all(
            &temp.path().join("content"),
            &CatalogOptions {
                strict: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(catalog.len(), 3);

        let sql = catalog
            .resolve("databases", "sql-interview-questions")
            .unwrap();
        let related = catalog.related(sql, 4);
        assert_eq!(related[0].topic.slug, "nosql-interview-questions");
    }

    #[tokio::test]
    async fn keeps_existing_content_without_yes() {
        let temp = tempfile::tempdir().unwrap();
        let config = temp.path().join("guidebook.toml");
        fs::create_dir_all(temp.path().join("content")).unwrap();

        run(&config, false).await.unwrap();

        assert!(!config.exists());
    }
}
