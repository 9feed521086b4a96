//! Aggregation engine: read-side computations over responses, users and
//! locations for a target date
//!
//! SQL only fetches; ordering and the responder set difference are plain
//! functions so the contract stays deterministic regardless of what a query
//! planner would do with ties or anti-joins. An empty day is a valid empty
//! result.

use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::TrackerResult;
use crate::models::{CalendarEntry, LocationCount, RosterEntry, UserProfile};

/// Aggregation repository
#[derive(Clone)]
pub struct SummaryRepository {
    pool: PgPool,
}

impl SummaryRepository {
    /// Create a new summary repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Head count per location for one date, active users only, descending
    /// by count with ties broken by location name ascending
    pub async fn summary_by_location(&self, date: NaiveDate) -> TrackerResult<Vec<LocationCount>> {
        let rows = sqlx::query(
            r#"
            SELECT l.name, l.emoji, l.color, COUNT(*) as count
            FROM responses r
            JOIN locations l ON r.location_id = l.id
            JOIN users u ON r.user_id = u.id
            WHERE r.date = $1 AND u.is_active = TRUE
            GROUP BY l.name, l.emoji, l.color
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        let counts = rows
            .into_iter()
            .map(|row| LocationCount {
                name: row.get("name"),
                emoji: row.get("emoji"),
                color: row.get("color"),
                count: row.get("count"),
            })
            .collect();

        Ok(rank_location_counts(counts))
    }

    /// Who is where on one date, active users only, ordered by location
    /// name then user name
    pub async fn detailed_roster(&self, date: NaiveDate) -> TrackerResult<Vec<RosterEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT u.name as user_name, l.name as location_name, l.emoji, l.color
            FROM responses r
            JOIN users u ON r.user_id = u.id
            JOIN locations l ON r.location_id = l.id
            WHERE r.date = $1 AND u.is_active = TRUE
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        let roster = rows
            .into_iter()
            .map(|row| RosterEntry {
                user_name: row.get("user_name"),
                location_name: row.get("location_name"),
                emoji: row.get("emoji"),
                color: row.get("color"),
            })
            .collect();

        Ok(order_roster(roster))
    }

    /// Active users with no response for the date, sorted by name.
    /// Computed as a set difference over the fetched rows, not as an SQL
    /// anti-join.
    pub async fn non_responders(&self, date: NaiveDate) -> TrackerResult<Vec<UserProfile>> {
        let active = sqlx::query(
            r#"
            SELECT id, email, name, is_admin, is_active, created_at
            FROM users
            WHERE is_active = TRUE
            "#,
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|row| UserProfile {
            id: row.get("id"),
            email: row.get("email"),
            name: row.get("name"),
            is_admin: row.get("is_admin"),
            is_active: row.get("is_active"),
            created_at: row.get("created_at"),
        })
        .collect();

        let responders: HashSet<Uuid> = sqlx::query("SELECT user_id FROM responses WHERE date = $1")
            .bind(date)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|row| row.get("user_id"))
            .collect();

        Ok(missing_responders(active, &responders))
    }

    /// One user's calendar window with location details, ordered by date
    pub async fn user_calendar(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> TrackerResult<Vec<CalendarEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT r.date, l.name as location_name, l.emoji, l.color
            FROM responses r
            JOIN locations l ON r.location_id = l.id
            WHERE r.user_id = $1 AND r.date BETWEEN $2 AND $3
            ORDER BY r.date
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| CalendarEntry {
                date: row.get("date"),
                location_name: row.get("location_name"),
                emoji: row.get("emoji"),
                color: row.get("color"),
            })
            .collect())
    }
}

/// Descending by count, ties broken by location name ascending
fn rank_location_counts(mut counts: Vec<LocationCount>) -> Vec<LocationCount> {
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    counts
}

/// Location name, then user name
fn order_roster(mut roster: Vec<RosterEntry>) -> Vec<RosterEntry> {
    roster.sort_by(|a, b| {
        a.location_name
            .cmp(&b.location_name)
            .then_with(|| a.user_name.cmp(&b.user_name))
    });
    roster
}

/// Active users minus responders, sorted by name
fn missing_responders(active: Vec<UserProfile>, responders: &HashSet<Uuid>) -> Vec<UserProfile> {
    let mut missing: Vec<UserProfile> = active
        .into_iter()
        .filter(|user| !responders.contains(&user.id))
        .collect();
    missing.sort_by(|a, b| a.name.cmp(&b.name));
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn count(name: &str, n: i64) -> LocationCount {
        LocationCount {
            name: name.to_string(),
            emoji: "🏢".to_string(),
            color: "#4CAF50".to_string(),
            count: n,
        }
    }

    fn profile(name: &str) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            email: format!("{}@company.com", name),
            name: name.to_string(),
            is_admin: false,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn equal_counts_order_alphabetically() {
        let ranked = rank_location_counts(vec![count("B", 1), count("A", 1)]);
        let names: Vec<&str> = ranked.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn larger_counts_come_first() {
        let ranked = rank_location_counts(vec![count("A", 1), count("B", 3), count("C", 2)]);
        let names: Vec<&str> = ranked.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["B", "C", "A"]);
    }

    #[test]
    fn roster_orders_by_location_then_user() {
        let entry = |user: &str, loc: &str| RosterEntry {
            user_name: user.to_string(),
            location_name: loc.to_string(),
            emoji: String::new(),
            color: String::new(),
        };
        let ordered = order_roster(vec![
            entry("carol", "Work From Home"),
            entry("bob", "HSR Office"),
            entry("alice", "Work From Home"),
        ]);
        let pairs: Vec<(&str, &str)> = ordered
            .iter()
            .map(|e| (e.location_name.as_str(), e.user_name.as_str()))
            .collect();
        assert_eq!(
            pairs,
            [
                ("HSR Office", "bob"),
                ("Work From Home", "alice"),
                ("Work From Home", "carol"),
            ]
        );
    }

    #[test]
    fn missing_is_active_minus_responders() {
        let alice = profile("alice");
        let bob = profile("bob");
        let dave = profile("dave");

        let responders: HashSet<Uuid> = [alice.id].into_iter().collect();
        let missing = missing_responders(vec![alice.clone(), bob.clone(), dave.clone()], &responders);

        let names: Vec<&str> = missing.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["bob", "dave"]);
        assert!(missing.iter().all(|u| !responders.contains(&u.id)));
    }

    #[test]
    fn missing_union_responders_covers_active_users() {
        let users: Vec<UserProfile> = ["dave", "alice", "bob"].iter().map(|n| profile(n)).collect();
        let responders: HashSet<Uuid> = [users[0].id, users[2].id].into_iter().collect();

        let missing = missing_responders(users.clone(), &responders);

        let covered: HashSet<Uuid> = missing
            .iter()
            .map(|u| u.id)
            .chain(responders.iter().copied())
            .collect();
        assert_eq!(covered.len(), users.len());
        assert!(users.iter().all(|u| covered.contains(&u.id)));
    }

    #[test]
    fn everyone_responded_yields_empty_missing() {
        let users = vec![profile("alice"), profile("bob")];
        let responders: HashSet<Uuid> = users.iter().map(|u| u.id).collect();
        assert!(missing_responders(users, &responders).is_empty());
    }

    #[test]
    fn responder_unknown_to_the_directory_is_ignored() {
        // A deactivated user's historical response must not disturb the scan.
        let users = vec![profile("alice")];
        let responders: HashSet<Uuid> = [Uuid::new_v4()].into_iter().collect();
        let missing = missing_responders(users, &responders);
        assert_eq!(missing.len(), 1);
    }
}
