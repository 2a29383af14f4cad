//! Resources: user://me, users://list, partners://list

use crate::context::AppContext;
use crate::types::{McpResult, ReadResourceResult};

use super::fetch_failed;
use super::templates::{PARTNERS_LIST, USERS_LIST, USER_ME};

pub async fn read_current_user(ctx: &AppContext) -> McpResult<ReadResourceResult> {
    let user = ctx
        .api()
        .fetch_current_user()
        .await
        .map_err(|e| fetch_failed("user", e))?;
    Ok(ReadResourceResult::json(USER_ME, &user))
}

pub async fn read_users(ctx: &AppContext) -> McpResult<ReadResourceResult> {
    let users = ctx
        .api()
        .list_users()
        .await
        .map_err(|e| fetch_failed("users", e))?;
    Ok(ReadResourceResult::json(USERS_LIST, &users))
}

pub async fn read_partners(ctx: &AppContext) -> McpResult<ReadResourceResult> {
    let partners = ctx
        .api()
        .list_partners()
        .await
        .map_err(|e| fetch_failed("partners", e))?;
    Ok(ReadResourceResult::json(PARTNERS_LIST, &partners))
}
