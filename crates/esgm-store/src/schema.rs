//! Schema and reference data.
//!
//! `key_issue.criteria` is optional; when NULL the standard's criteria
//! apply. Deleting a project cascades to its answers, its evaluation, and
//! the evaluation's pillar scores.

use rusqlite::{Connection, params};
use serde_json::{Value, json};

use crate::Result;

/// DDL applied by [`apply`]. Every statement is `IF NOT EXISTS`.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    email         TEXT    NOT NULL UNIQUE COLLATE NOCASE,
    password_hash TEXT    NOT NULL,
    first_name    TEXT    NOT NULL,
    last_name     TEXT    NOT NULL,
    created_at    TEXT    NOT NULL,
    updated_at    TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS msci_standard (
    standard_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL UNIQUE,
    criteria    TEXT    NOT NULL DEFAULT '{}',
    benchmark   TEXT    NOT NULL DEFAULT '{}'
);

CREATE TABLE IF NOT EXISTS key_issue (
    issue_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL,
    pillar      TEXT    NOT NULL CHECK (pillar IN ('E', 'S', 'G')),
    description TEXT,
    msci_weight REAL    NOT NULL DEFAULT 1.0,
    standard_id INTEGER NOT NULL REFERENCES msci_standard(standard_id) ON DELETE CASCADE,
    criteria    TEXT
);

CREATE TABLE IF NOT EXISTS projects (
    project_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id        INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    project_name   TEXT    NOT NULL,
    industry       TEXT    NOT NULL,
    annual_revenue REAL,
    description    TEXT,
    status         TEXT    NOT NULL DEFAULT 'PENDING'
                   CHECK (status IN ('PENDING', 'PROCESSING', 'COMPLETED', 'FAILED')),
    submitted_at   TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_projects_user ON projects(user_id, submitted_at);

CREATE TABLE IF NOT EXISTS project_data (
    data_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL REFERENCES projects(project_id) ON DELETE CASCADE,
    issue_id   INTEGER NOT NULL REFERENCES key_issue(issue_id),
    value      TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_project_data_project ON project_data(project_id);

CREATE TABLE IF NOT EXISTS evaluations (
    evaluation_id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id    INTEGER NOT NULL UNIQUE REFERENCES projects(project_id) ON DELETE CASCADE,
    overall_score REAL    NOT NULL,
    status        TEXT    NOT NULL CHECK (status IN ('PENDING', 'PASSED', 'FAILED')),
    evaluated_at  TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS pillar_scores (
    score_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    evaluation_id INTEGER NOT NULL REFERENCES evaluations(evaluation_id) ON DELETE CASCADE,
    pillar_type   TEXT    NOT NULL CHECK (pillar_type IN ('E', 'S', 'G')),
    score         REAL    NOT NULL,
    weight        REAL    NOT NULL,
    pass_status   INTEGER NOT NULL,
    key_count     INTEGER NOT NULL,
    total_weight  REAL    NOT NULL,
    weighted_sum  REAL    NOT NULL,
    standard_id   INTEGER NOT NULL REFERENCES msci_standard(standard_id)
);

CREATE INDEX IF NOT EXISTS idx_pillar_scores_evaluation ON pillar_scores(evaluation_id);
"#;

/// Name of the seeded standard.
pub const SEED_STANDARD: &str = "MSCI ESG 2024";

/// A seeded key issue: pillar, name, description, weight, criteria.
type SeedIssue = (&'static str, &'static str, &'static str, f64, SeedCriteria);

#[derive(Clone, Copy)]
enum SeedCriteria {
    Numeric(&'static str),
    Options(&'static [&'static str]),
    Text,
}

impl SeedCriteria {
    fn to_json(self) -> Value {
        match self {
            SeedCriteria::Numeric(unit) => json!({ "type": "numeric", "unit": unit }),
            SeedCriteria::Options(options) => json!({ "options": options }),
            SeedCriteria::Text => json!({ "type": "text" }),
        }
    }
}

const PROGRESS: &[&str] = &[
    "Systematic program in place",
    "Partial program",
    "Under study",
    "No action",
];
const FOOTPRINT: &[&str] = &[
    "Comprehensive program",
    "Partial program",
    "In development",
    "No program",
];
const RECYCLING: &[&str] = &[
    "Over 80% recycled",
    "60-80% recycled",
    "40-60% recycled",
    "Under 40% recycled",
    "No recycling",
];
const BIODIVERSITY: &[&str] = &[
    "Dedicated conservation program",
    "Supports external conservation programs",
    "Under study",
    "No dedicated program",
];
const RENEWABLES: &[&str] = &[
    "Solar",
    "Wind",
    "Hydro",
    "Biomass",
    "No renewable energy",
];
const SAFETY: &[&str] = &[
    "ISO 45001 certified",
    "Dedicated safety management system",
    "Legal compliance only",
    "No dedicated system",
];
const COMMUNITY: &[&str] = &[
    "Regular programs",
    "Occasional programs",
    "Supports external organizations",
    "No dedicated program",
];
const DIVERSITY: &[&str] = &[
    "Clear policy and targets",
    "Policy without specific targets",
    "In development",
    "No dedicated policy",
];
const REPORTING: &[&str] = &[
    "Regular reporting",
    "Reporting as required by law",
    "Partial reporting",
    "No dedicated reporting",
];
const ETHICS: &[&str] = &[
    "Policy and training",
    "Policy without training",
    "In development",
    "Legal compliance only",
];
const RISK: &[&str] = &[
    "Comprehensive risk framework",
    "Basic risk framework",
    "In development",
    "No dedicated framework",
];
const DISCLOSURE: &[&str] = &[
    "Transparent disclosure",
    "Disclosure as required by law",
    "Partial disclosure",
    "No dedicated disclosure",
];

/// The questions of the submission form, in form order.
pub(crate) const SEED_ISSUES: &[SeedIssue] = &[
    ("E", "Carbon emissions", "Scope 1+2 emissions in tCO2e", 2.0, SeedCriteria::Numeric("tCO2e")),
    (
        "E",
        "Climate change vulnerability",
        "Readiness for climate-related risks",
        1.5,
        SeedCriteria::Options(PROGRESS),
    ),
    (
        "E",
        "Carbon footprint management",
        "Programs assessing and reducing the carbon footprint",
        1.5,
        SeedCriteria::Options(FOOTPRINT),
    ),
    (
        "E",
        "Water usage",
        "Water consumed in cubic meters per year",
        1.0,
        SeedCriteria::Numeric("m3/year"),
    ),
    (
        "E",
        "Waste management and recycling",
        "Share of waste recycled",
        1.0,
        SeedCriteria::Options(RECYCLING),
    ),
    (
        "E",
        "Biodiversity conservation",
        "Programs protecting biodiversity",
        1.0,
        SeedCriteria::Options(BIODIVERSITY),
    ),
    (
        "E",
        "Renewable energy program (primary)",
        "Main renewable energy source",
        1.0,
        SeedCriteria::Options(RENEWABLES),
    ),
    (
        "E",
        "Renewable energy program (secondary)",
        "Secondary renewable energy source",
        0.5,
        SeedCriteria::Options(RENEWABLES),
    ),
    (
        "E",
        "Renewable energy share",
        "Percentage of energy from renewable sources",
        1.5,
        SeedCriteria::Numeric("%"),
    ),
    (
        "E",
        "Environmental investment",
        "Spending on environmental programs in baht",
        1.0,
        SeedCriteria::Numeric("THB"),
    ),
    (
        "S",
        "Health and safety",
        "Workplace injury rate",
        1.5,
        SeedCriteria::Numeric("injuries per 200,000 hours"),
    ),
    (
        "S",
        "Risk management capability",
        "Ability to manage operational safety risks",
        1.0,
        SeedCriteria::Options(SAFETY),
    ),
    (
        "S",
        "Human capital development",
        "Share of employees in development programs",
        1.0,
        SeedCriteria::Numeric("%"),
    ),
    (
        "S",
        "Workplace safety standards",
        "Safety standards applied at work sites",
        1.5,
        SeedCriteria::Options(SAFETY),
    ),
    (
        "S",
        "Community safety and quality of life",
        "Programs supporting surrounding communities",
        1.0,
        SeedCriteria::Options(COMMUNITY),
    ),
    (
        "S",
        "Diversity and inclusion",
        "Diversity and inclusion policy",
        1.0,
        SeedCriteria::Options(DIVERSITY),
    ),
    ("S", "Public safety management", "How public safety is managed", 0.5, SeedCriteria::Text),
    (
        "S",
        "Community and social investment",
        "Spending on community programs in baht",
        1.0,
        SeedCriteria::Numeric("THB"),
    ),
    (
        "G",
        "Board independence",
        "Percentage of independent directors",
        2.0,
        SeedCriteria::Numeric("%"),
    ),
    (
        "G",
        "Transparency reporting practices",
        "How results are reported to stakeholders",
        1.0,
        SeedCriteria::Options(REPORTING),
    ),
    (
        "G",
        "Governance quality",
        "Ethics and compliance policies",
        1.5,
        SeedCriteria::Options(ETHICS),
    ),
    (
        "G",
        "Risk management framework",
        "Enterprise risk management framework",
        1.5,
        SeedCriteria::Options(RISK),
    ),
    (
        "G",
        "Transparent disclosure practices",
        "Disclosure of material information",
        1.0,
        SeedCriteria::Options(DISCLOSURE),
    ),
];

/// Create the tables and seed the standard and key issues.
///
/// Key issues are inserted only when `key_issue` is empty, so edited or
/// added questions survive restarts.
pub fn apply(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT OR IGNORE INTO msci_standard (name, criteria, benchmark) VALUES (?1, ?2, ?3)",
        params![
            SEED_STANDARD,
            json!({ "scale": { "min": 0, "max": 100 } }),
            json!({ "pass_threshold": 50 }),
        ],
    )?;
    let standard_id: i64 = tx.query_row(
        "SELECT standard_id FROM msci_standard WHERE name = ?1",
        params![SEED_STANDARD],
        |row| row.get(0),
    )?;

    let existing: i64 = tx.query_row("SELECT COUNT(*) FROM key_issue", [], |row| row.get(0))?;
    if existing == 0 {
        let mut stmt = tx.prepare(
            "INSERT INTO key_issue (name, pillar, description, msci_weight, standard_id, criteria)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for (pillar, name, description, weight, criteria) in SEED_ISSUES {
            stmt.execute(params![
                name,
                pillar,
                description,
                weight,
                standard_id,
                criteria.to_json()
            ])?;
        }
        drop(stmt);
        tracing::info!(count = SEED_ISSUES.len(), "Seeded key issues");
    }
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_pillar_counts() {
        let count = |p: &str| SEED_ISSUES.iter().filter(|i| i.0 == p).count();
        assert_eq!(SEED_ISSUES.len(), 23);
        assert_eq!(count("E"), 10);
        assert_eq!(count("S"), 8);
        assert_eq!(count("G"), 5);
    }

    #[test]
    fn test_apply_twice_keeps_one_seed() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        apply(&mut conn).unwrap();
        apply(&mut conn).unwrap();
        let standards: i64 = conn
            .query_row("SELECT COUNT(*) FROM msci_standard", [], |r| r.get(0))
            .unwrap();
        let issues: i64 = conn
            .query_row("SELECT COUNT(*) FROM key_issue", [], |r| r.get(0))
            .unwrap();
        assert_eq!(standards, 1);
        assert_eq!(issues, 23);
    }
}
