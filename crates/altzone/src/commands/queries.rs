//! Query command handlers.

use std::fmt::Write as _;

use serde::Serialize;
use tabled::Tabled;

use altzone_core::{
    EntityId, Layout, Query, QueryCollection, QueryDetail, QueryDraft, QuerySource,
    Recommendation, submit_query,
};

use crate::cli::{GlobalOpts, ListArgs, QueriesArgs, QueriesCommand, QueryFields};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct QueryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Brand")]
    brand: String,
    #[tabled(rename = "Query")]
    title: String,
    #[tabled(rename = "Asked By")]
    owner: String,
    #[tabled(rename = "Recs")]
    recommendations: u32,
    #[tabled(rename = "Posted")]
    posted: String,
}

impl From<&Query> for QueryRow {
    fn from(q: &Query) -> Self {
        Self {
            id: q.id.to_string(),
            product: q.product_name.clone(),
            brand: q.product_brand.clone(),
            title: util::truncate(&q.query_title, 40),
            owner: q.user_name.clone().unwrap_or_else(|| q.user_email.clone()),
            recommendations: q.recommendation_count,
            posted: util::short_date(&q.current_date),
        }
    }
}

#[derive(Tabled)]
pub(super) struct RecommendationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Recommended")]
    product: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "By")]
    recommender: String,
    #[tabled(rename = "Date")]
    date: String,
}

impl From<&Recommendation> for RecommendationRow {
    fn from(r: &Recommendation) -> Self {
        Self {
            id: r.id.to_string(),
            product: r.recommended_product_name.clone(),
            title: util::truncate(&r.recommendation_title, 40),
            recommender: r.recommender_display().to_owned(),
            date: util::short_date(&r.current_date),
        }
    }
}

/// JSON / YAML shape of `queries show`.
#[derive(Serialize)]
struct DetailView<'a> {
    query: &'a Query,
    recommendations: &'a [Recommendation],
}

fn detail_text(view: &DetailView<'_>) -> String {
    let q = view.query;
    let mut out = String::new();
    let _ = writeln!(out, "{}", q.query_title);
    let _ = writeln!(out);
    let _ = writeln!(out, "  Product:  {} ({})", q.product_name, q.product_brand);
    let _ = writeln!(out, "  Reason:   {}", q.boycotting_reason);
    if !q.product_image.is_empty() {
        let _ = writeln!(out, "  Image:    {}", q.product_image);
    }
    let _ = writeln!(
        out,
        "  Asked by: {}",
        q.user_name.as_deref().unwrap_or(&q.user_email)
    );
    let _ = writeln!(out, "  Posted:   {}", util::short_date(&q.current_date));
    let _ = writeln!(out, "  ID:       {}", q.id);
    let _ = writeln!(out);

    if view.recommendations.is_empty() {
        let _ = write!(out, "No recommendations yet.");
    } else {
        let _ = writeln!(out, "Recommendations ({}):", q.recommendation_count);
        let rows: Vec<RecommendationRow> = view
            .recommendations
            .iter()
            .map(RecommendationRow::from)
            .collect();
        let _ = write!(
            out,
            "{}",
            tabled::Table::new(rows).with(tabled::settings::Style::rounded())
        );
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: QueriesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        QueriesCommand::List(list) => {
            let collection =
                QueryCollection::new(ctx.api.clone(), ctx.session.clone(), QuerySource::All);
            list_page(collection, &list, ctx, global).await
        }

        QueriesCommand::Recent => {
            let collection =
                QueryCollection::new(ctx.api.clone(), ctx.session.clone(), QuerySource::Recent);
            // The home screen always shows one three-column page.
            let list = ListArgs {
                search: None,
                layout: Some(Layout::ThreeColumns),
                page: 1,
            };
            list_page(collection, &list, ctx, global).await
        }

        QueriesCommand::Mine(list) => {
            let collection = QueryCollection::owned(ctx.api.clone(), ctx.session.clone())?;
            list_page(collection, &list, ctx, global).await
        }

        QueriesCommand::Show { id } => show(ctx, EntityId::new(id), global).await,

        QueriesCommand::Add(fields) => {
            let draft = QueryDraft {
                query_title: util::field_or_prompt(fields.title, "Query title")?,
                product_name: util::field_or_prompt(fields.product, "Product name")?,
                product_brand: util::field_or_prompt(fields.brand, "Product brand")?,
                product_image: util::field_or_prompt(fields.image, "Product image URL")?,
                boycotting_reason: util::field_or_prompt(fields.reason, "Why boycott it?")?,
            };

            let spinner = output::spinner("Posting query…", global.quiet);
            let created = submit_query(&ctx.api, &ctx.session, &draft).await;
            spinner.finish_and_clear();
            let query = created?;

            let out = output::render_single(
                &global.output,
                &query,
                |q| format!("Query posted: {}", q.id),
                |q| q.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        QueriesCommand::Edit { id, fields } => edit(ctx, EntityId::new(id), fields, global).await,

        QueriesCommand::Delete { id } => delete(ctx, EntityId::new(id), global).await,
    }
}

async fn list_page(
    mut collection: QueryCollection,
    list: &ListArgs,
    ctx: &Context,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let spinner = output::spinner("Loading queries…", global.quiet);
    collection.load().await;
    spinner.finish_and_clear();
    util::ensure_loaded(collection.load_state())?;

    collection.set_layout(list.layout.unwrap_or(ctx.layout));
    if let Some(ref search) = list.search {
        collection.set_search(search.as_str());
    }
    collection.go_to_page(list.page);

    let page = collection.page();
    let out = output::render_list(
        &global.output,
        &page.items,
        |q| QueryRow::from(*q),
        |q| q.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    output::print_page_footer(
        &global.output,
        page.page_number,
        page.total_pages,
        page.filtered_count,
        global.quiet,
    );
    output::print_notices(&collection.take_notices(), &global.color, global.quiet);
    Ok(())
}

async fn show(ctx: &Context, id: EntityId, global: &GlobalOpts) -> Result<(), CliError> {
    let mut detail = QueryDetail::new(ctx.api.clone(), ctx.session.clone(), id);

    let spinner = output::spinner("Loading query…", global.quiet);
    let loaded = detail.load().await;
    spinner.finish_and_clear();
    let notices = detail.take_notices();
    util::finish(loaded, &notices, global)?;

    let Some(query) = detail.query() else {
        return Err(CliError::NotFound {
            resource_type: "query".into(),
            identifier: detail.query_id().to_string(),
            list_command: "queries list".into(),
        });
    };
    let view = DetailView {
        query,
        recommendations: detail.recommendations(),
    };
    let out = output::render_single(&global.output, &view, detail_text, |v| {
        v.recommendations
            .iter()
            .map(|r| r.id.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn edit(
    ctx: &Context,
    id: EntityId,
    fields: QueryFields,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if fields.title.is_none()
        && fields.product.is_none()
        && fields.brand.is_none()
        && fields.image.is_none()
        && fields.reason.is_none()
    {
        return Err(CliError::Validation {
            field: "edit".into(),
            reason: "nothing to change; pass at least one of --title, --product, --brand, \
                     --image, --reason"
                .into(),
        });
    }

    let mut collection = QueryCollection::owned(ctx.api.clone(), ctx.session.clone())?;
    collection.load().await;
    util::ensure_loaded(collection.load_state())?;

    collection.request_edit(&id)?;
    if let Some(buffer) = collection.edit_buffer_mut() {
        apply_fields(buffer, fields);
    }

    let spinner = output::spinner("Saving changes…", global.quiet);
    let result = collection.submit_edit().await;
    spinner.finish_and_clear();
    let notices = collection.take_notices();
    util::finish(result, &notices, global)?;

    if let Some(query) = collection.get(&id) {
        let out = output::render_single(
            &global.output,
            query,
            |q| format!("{} ({})", q.product_name, q.product_brand),
            |q| q.id.to_string(),
        )?;
        output::print_output(&out, global.quiet);
    }
    Ok(())
}

fn apply_fields(buffer: &mut QueryDraft, fields: QueryFields) {
    if let Some(title) = fields.title {
        buffer.query_title = title;
    }
    if let Some(product) = fields.product {
        buffer.product_name = product;
    }
    if let Some(brand) = fields.brand {
        buffer.product_brand = brand;
    }
    if let Some(image) = fields.image {
        buffer.product_image = image;
    }
    if let Some(reason) = fields.reason {
        buffer.boycotting_reason = reason;
    }
}

async fn delete(ctx: &Context, id: EntityId, global: &GlobalOpts) -> Result<(), CliError> {
    let mut collection = QueryCollection::owned(ctx.api.clone(), ctx.session.clone())?;
    collection.load().await;
    util::ensure_loaded(collection.load_state())?;

    if !collection.request_delete(&id)? {
        output::print_notices(&collection.take_notices(), &global.color, global.quiet);
        return Ok(());
    }
    let label = collection
        .get(&id)
        .map_or_else(|| id.to_string(), |q| q.product_name.clone());
    if !util::confirm(&format!("Delete your query about '{label}'?"), global.yes)? {
        collection.cancel_prompt();
        if !global.quiet {
            eprintln!("Nothing deleted");
        }
        return Ok(());
    }

    let result = collection.confirm_delete().await;
    let notices = collection.take_notices();
    util::finish(result, &notices, global)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn query() -> Query {
        Query {
            id: EntityId::new("q1"),
            query_title: "Need a phone without spyware".into(),
            product_name: "Phone X".into(),
            product_brand: "Acme".into(),
            product_image: String::new(),
            boycotting_reason: "privacy".into(),
            user_email: "a@example.com".into(),
            user_name: None,
            user_image: None,
            current_date: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().unwrap_or_default(),
            recommendation_count: 0,
        }
    }

    #[test]
    fn row_falls_back_to_owner_email() {
        let row = QueryRow::from(&query());
        assert_eq!(row.owner, "a@example.com");
        assert_eq!(row.posted, "2024-03-01");
    }

    #[test]
    fn detail_without_recommendations_says_so() {
        let q = query();
        let text = detail_text(&DetailView {
            query: &q,
            recommendations: &[],
        });
        assert!(text.starts_with("Need a phone without spyware"));
        assert!(text.contains("Phone X (Acme)"));
        assert!(text.ends_with("No recommendations yet."));
    }

    #[test]
    fn only_given_fields_are_applied() {
        let mut buffer = QueryDraft::from(&query());
        apply_fields(
            &mut buffer,
            QueryFields {
                title: None,
                product: None,
                brand: Some("Other".into()),
                image: None,
                reason: None,
            },
        );
        assert_eq!(buffer.product_brand, "Other");
        assert_eq!(buffer.product_name, "Phone X");
    }
}
