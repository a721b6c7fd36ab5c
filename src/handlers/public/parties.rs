use axum::{
    extract::{Path, Query},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::models::{Party, PartyMemberWithProfile};
use crate::database::DatabaseManager;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct PartiesQuery {
    #[serde(default)]
    pub include_members: bool,
}

/// Party row joined with leader display fields and the rank gate
#[derive(Debug, FromRow)]
struct PartyListRow {
    id: i64,
    name: String,
    description: Option<String>,
    leader_id: Option<Uuid>,
    category: Option<String>,
    min_rank_id: Option<i32>,
    created_at: DateTime<Utc>,
    leader_name: Option<String>,
    leader_avatar: Option<String>,
    rank_name: Option<String>,
    rank_min_xp: Option<i64>,
}

impl PartyListRow {
    fn as_json(&self) -> Value {
        let leader = self.leader_id.map(|_| {
            json!({
                "display_name": self.leader_name,
                "avatar_url": self.leader_avatar,
            })
        });
        let min_rank = self.min_rank_id.map(|_| {
            json!({
                "name": self.rank_name,
                "min_xp": self.rank_min_xp,
            })
        });

        json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "leader_id": self.leader_id,
            "category": self.category,
            "min_rank_id": self.min_rank_id,
            "created_at": self.created_at,
            "leader": leader,
            "min_rank": min_rank,
        })
    }
}

/// GET /parties - all parties, newest first; `?include_members=true`
/// additionally returns members grouped by party id
pub async fn list(Query(query): Query<PartiesQuery>) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let parties = sqlx::query_as::<_, PartyListRow>(
        r#"
        SELECT p.id, p.name, p.description, p.leader_id, p.category,
               p.min_rank_id, p.created_at,
               l.display_name AS leader_name, l.avatar_url AS leader_avatar,
               r.name AS rank_name, r.min_xp AS rank_min_xp
        FROM parties p
        LEFT JOIN profiles l ON l.id = p.leader_id
        LEFT JOIN ranks r ON r.id = p.min_rank_id
        ORDER BY p.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(ApiError::db("Failed to fetch parties"))?;

    let mut result = Map::new();
    result.insert(
        "parties".into(),
        Value::Array(parties.iter().map(PartyListRow::as_json).collect()),
    );

    if query.include_members && !parties.is_empty() {
        let ids: Vec<i64> = parties.iter().map(|p| p.id).collect();
        let members = members_of(pool, &ids).await?;

        // group members by party_id
        let mut grouped: Map<String, Value> = Map::new();
        for member in &members {
            let entry = grouped
                .entry(member.party_id.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(list) = entry {
                list.push(member.as_json());
            }
        }
        result.insert("members".into(), Value::Object(grouped));
    }

    Ok(Json(Value::Object(result)))
}

/// GET /parties/:id - one party with its member list
pub async fn get(Path(party_id): Path<i64>) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let party = sqlx::query_as::<_, Party>("SELECT * FROM parties WHERE id = $1")
        .bind(party_id)
        .fetch_optional(pool)
        .await
        .map_err(ApiError::db("Failed to fetch party"))?
        .ok_or_else(|| ApiError::not_found("Party not found"))?;

    let members = members_of(pool, &[party_id]).await?;

    Ok(Json(json!({
        "party": party,
        "members": members.iter().map(PartyMemberWithProfile::as_json).collect::<Vec<_>>(),
    })))
}

/// GET /parties/:id/members
pub async fn members(Path(party_id): Path<i64>) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let members = members_of(pool, &[party_id]).await?;

    Ok(Json(json!({
        "members": members.iter().map(PartyMemberWithProfile::as_json).collect::<Vec<_>>(),
    })))
}

pub(crate) async fn members_of(
    pool: &PgPool,
    party_ids: &[i64],
) -> Result<Vec<PartyMemberWithProfile>, ApiError> {
    sqlx::query_as::<_, PartyMemberWithProfile>(
        r#"
        SELECT m.id, m.party_id, m.user_id, m.role, m.joined_at,
               p.display_name, p.avatar_url
        FROM party_members m
        LEFT JOIN profiles p ON p.id = m.user_id
        WHERE m.party_id = ANY($1)
        ORDER BY m.joined_at ASC
        "#,
    )
    .bind(party_ids)
    .fetch_all(pool)
    .await
    .map_err(ApiError::db("Failed to fetch members"))
}
