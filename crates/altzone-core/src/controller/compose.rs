// ── Add-query form ──

use chrono::Utc;
use tracing::info;

use altzone_api::ApiClient;
use altzone_api::types::NewQuery;

use crate::convert::query_from_created;
use crate::error::CoreError;
use crate::model::{Query, QueryDraft};
use crate::session::Session;

/// Post a new query owned by the signed-in user.
///
/// The session stamps ownership (`user_email`, `user_name`, `user_image`);
/// the creation time is now and the counter starts at zero.
pub async fn submit_query(
    api: &ApiClient,
    session: &Session,
    draft: &QueryDraft,
) -> Result<Query, CoreError> {
    let user = session.require_user("add a query")?;
    draft.validate()?;

    let body = NewQuery {
        query_title: draft.query_title.clone(),
        product_name: draft.product_name.clone(),
        product_brand: draft.product_brand.clone(),
        product_image: draft.product_image.clone(),
        boycotting_reason: draft.boycotting_reason.clone(),
        user_email: user.email.clone(),
        user_name: user.display_name.clone(),
        user_image: user.photo_url.clone(),
        current_date: Utc::now(),
        recommendation_count: 0,
    };

    let created = api.create_query(&body).await?;
    let query = query_from_created(created, &body);
    info!(query = %query.id, "query created");
    Ok(query)
}
