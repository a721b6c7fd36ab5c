use axum::{
    extract::Path,
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{Party, PartyMember, PartyMemberWithProfile};
use crate::database::{is_unique_violation, DatabaseManager};
use crate::error::ApiError;
use crate::handlers::public::parties::members_of;
use crate::middleware::AuthUser;
use crate::services::{access, profiles};

#[derive(Debug, Deserialize)]
pub struct CreateParty {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Rank gate; accepts a number or a numeric string
    pub min_rank_id: Option<Value>,
}

/// POST /api/parties - create a party; the creator becomes leader and
/// their membership row is written in the same transaction
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateParty>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let pool = DatabaseManager::pool().await?;
    let profile = profiles::resolve(pool, &auth).await?;

    let name = body
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::bad_request("Name is required"))?;

    let min_rank_id = parse_rank_ref(body.min_rank_id.as_ref())?;
    if let Some(rank_id) = min_rank_id {
        let exists = sqlx::query_scalar::<_, i32>("SELECT id FROM ranks WHERE id = $1")
            .bind(rank_id)
            .fetch_optional(pool)
            .await
            .map_err(ApiError::db("Failed to validate min_rank_id"))?;

        if exists.is_none() {
            return Err(ApiError::bad_request(
                "min_rank_id does not reference a valid rank",
            ));
        }
    }

    // Party and leader membership land together or not at all
    let mut tx = pool
        .begin()
        .await
        .map_err(ApiError::db("Failed to create party"))?;

    let party = sqlx::query_as::<_, Party>(
        r#"
        INSERT INTO parties (name, description, leader_id, category, min_rank_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(body.description.as_deref())
    .bind(profile.id)
    .bind(body.category.as_deref())
    .bind(min_rank_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(ApiError::db("Failed to create party"))?;

    sqlx::query("INSERT INTO party_members (party_id, user_id, role) VALUES ($1, $2, 'leader')")
        .bind(party.id)
        .bind(profile.id)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::db("Failed to create party"))?;

    tx.commit()
        .await
        .map_err(ApiError::db("Failed to create party"))?;

    Ok((StatusCode::CREATED, Json(json!({ "party": party }))))
}

#[derive(Debug, Deserialize)]
pub struct PartyUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// PATCH /api/parties/:id - edit party metadata; leader/admin only
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(party_id): Path<i64>,
    Json(body): Json<PartyUpdate>,
) -> Result<Json<Value>, ApiError> {
    if body.name.is_none() && body.description.is_none() {
        return Err(ApiError::bad_request("No updates provided"));
    }

    let pool = DatabaseManager::pool().await?;
    let profile = profiles::resolve(pool, &auth).await?;
    let party = fetch_party(pool, party_id).await?;

    access::require_manage(pool, &profile, party.leader_id).await?;

    let updated = sqlx::query_as::<_, Party>(
        r#"
        UPDATE parties
        SET name = COALESCE($2, name),
            description = COALESCE($3, description)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(party.id)
    .bind(body.name.as_deref())
    .bind(body.description.as_deref())
    .fetch_one(pool)
    .await
    .map_err(ApiError::db("Failed to update party"))?;

    Ok(Json(json!({ "party": updated })))
}

/// DELETE /api/parties/:id - leader/admin only
pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    Path(party_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let profile = profiles::resolve(pool, &auth).await?;
    let party = fetch_party(pool, party_id).await?;

    access::require_manage(pool, &profile, party.leader_id).await?;

    sqlx::query("DELETE FROM parties WHERE id = $1")
        .bind(party.id)
        .execute(pool)
        .await
        .map_err(ApiError::db("Failed to delete party"))?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/parties/:id/members - join a party
pub async fn join(
    Extension(auth): Extension<AuthUser>,
    Path(party_id): Path<i64>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let pool = DatabaseManager::pool().await?;
    let profile = profiles::resolve(pool, &auth).await?;
    let party = fetch_party(pool, party_id).await?;

    // The unique index on (party_id, user_id) is the duplicate check
    let inserted = sqlx::query_as::<_, PartyMember>(
        "INSERT INTO party_members (party_id, user_id, role) VALUES ($1, $2, 'member') RETURNING *",
    )
    .bind(party.id)
    .bind(profile.id)
    .fetch_one(pool)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            ApiError::conflict("Already a member")
        } else {
            ApiError::db("Failed to join party")(err)
        }
    })?;

    // Re-read with display fields so the client can render the new member
    let members = members_of(pool, &[party.id]).await?;
    let member = members
        .iter()
        .find(|m| m.id == inserted.id)
        .map(PartyMemberWithProfile::as_json)
        .unwrap_or_else(|| json!(inserted));

    Ok((StatusCode::CREATED, Json(json!({ "member": member }))))
}

/// DELETE /api/parties/:id/members/:member_id - leave or remove.
/// Permitted for the member themself, the party leader, or an admin.
pub async fn remove_member(
    Extension(auth): Extension<AuthUser>,
    Path((party_id, member_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let profile = profiles::resolve(pool, &auth).await?;

    let member = sqlx::query_as::<_, PartyMember>("SELECT * FROM party_members WHERE id = $1")
        .bind(member_id)
        .fetch_optional(pool)
        .await
        .map_err(ApiError::db("Failed to fetch member"))?
        .ok_or_else(|| ApiError::not_found("Member not found"))?;

    let party = fetch_party(pool, party_id).await?;

    let is_self = member.user_id == profile.id;
    if !is_self && !access::can_manage(pool, &profile, party.leader_id).await? {
        return Err(ApiError::forbidden("Forbidden"));
    }

    sqlx::query("DELETE FROM party_members WHERE id = $1")
        .bind(member.id)
        .execute(pool)
        .await
        .map_err(ApiError::db("Failed to remove member"))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_party(pool: &sqlx::PgPool, party_id: i64) -> Result<Party, ApiError> {
    sqlx::query_as::<_, Party>("SELECT * FROM parties WHERE id = $1")
        .bind(party_id)
        .fetch_optional(pool)
        .await
        .map_err(ApiError::db("Failed to fetch party"))?
        .ok_or_else(|| ApiError::not_found("Party not found"))
}

/// The rank gate arrives as JSON from loosely-typed clients: absent,
/// null, empty string, number, or numeric string.
fn parse_rank_ref(value: Option<&Value>) -> Result<Option<i32>, ApiError> {
    let invalid = || ApiError::bad_request("Invalid min_rank_id");

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim().parse::<i32>().map(Some).map_err(|_| invalid()),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Some)
            .ok_or_else(invalid),
        Some(_) => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_ref_absent_forms_are_none() {
        assert_eq!(parse_rank_ref(None).unwrap(), None);
        assert_eq!(parse_rank_ref(Some(&Value::Null)).unwrap(), None);
        assert_eq!(parse_rank_ref(Some(&json!(""))).unwrap(), None);
    }

    #[test]
    fn rank_ref_accepts_number_and_numeric_string() {
        assert_eq!(parse_rank_ref(Some(&json!(3))).unwrap(), Some(3));
        assert_eq!(parse_rank_ref(Some(&json!("7"))).unwrap(), Some(7));
    }

    #[test]
    fn rank_ref_rejects_garbage() {
        assert!(parse_rank_ref(Some(&json!("soon"))).is_err());
        assert!(parse_rank_ref(Some(&json!(1.5))).is_err());
        assert!(parse_rank_ref(Some(&json!([1]))).is_err());
    }
}
