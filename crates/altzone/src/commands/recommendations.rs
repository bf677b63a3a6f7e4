//! Recommendation command handlers: recommending, and the two per-user lists.

use tabled::Tabled;

use altzone_core::{
    AddOutcome, DeleteOutcome, EntityId, MyRecommendations, QueryDetail, Recommendation,
    RecommendationsForMe,
};

use crate::cli::{GlobalOpts, RecommendArgs, RecommendationsArgs, RecommendationsCommand};
use crate::error::CliError;
use crate::output;

use super::queries::RecommendationRow;
use super::{Context, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReceivedRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Your Query")]
    query: String,
    #[tabled(rename = "Instead Of")]
    product: String,
    #[tabled(rename = "Try")]
    recommended: String,
    #[tabled(rename = "By")]
    recommender: String,
    #[tabled(rename = "Date")]
    date: String,
}

impl ReceivedRow {
    fn new(r: &Recommendation, view: &RecommendationsForMe) -> Self {
        // Prefer the live query title over the copy stored on the record.
        let query = view
            .query_for(r)
            .map_or_else(|| r.query_title.clone(), |q| q.query_title.clone());
        Self {
            id: r.id.to_string(),
            query: util::truncate(&query, 32),
            product: r.product_name.clone(),
            recommended: r.recommended_product_name.clone(),
            recommender: r.recommender_display().to_owned(),
            date: util::short_date(&r.current_date),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

/// `altzone recommend <query-id>`: add a recommendation to a query.
pub async fn recommend(
    ctx: &Context,
    args: RecommendArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut detail = QueryDetail::new(
        ctx.api.clone(),
        ctx.session.clone(),
        EntityId::new(args.query_id),
    );

    let spinner = output::spinner("Loading query…", global.quiet);
    let loaded = detail.load().await;
    spinner.finish_and_clear();
    let notices = detail.take_notices();
    util::finish(loaded, &notices, global)?;

    {
        let draft = detail.draft_mut();
        draft.recommendation_title = util::field_or_prompt(args.title, "Recommendation title")?;
        draft.recommended_product_name =
            util::field_or_prompt(args.product, "Recommended product")?;
        draft.recommended_product_image =
            util::field_or_prompt(args.image, "Product image URL")?;
        draft.recommendation_reason = util::field_or_prompt(args.reason, "Why this one?")?;
    }

    let spinner = output::spinner("Posting recommendation…", global.quiet);
    let mut added = detail.add_recommendation().await;
    if matches!(added, Ok(AddOutcome::CountDirty)) {
        // One replay before exiting; the ledger dies with the process.
        if detail.reconcile_counters().await != 0 {
            added = Ok(AddOutcome::Counted);
        }
    }
    spinner.finish_and_clear();

    let notices = detail.take_notices();
    let outcome = util::finish(added, &notices, global)?;
    if outcome == AddOutcome::Counted && detail.ledger().is_empty() && !global.quiet {
        if let Some(query) = detail.query() {
            eprintln!(
                "'{}' now has {} recommendation(s)",
                query.product_name, query.recommendation_count
            );
        }
    }

    if let Some(created) = detail.recommendations().last() {
        let out = output::render_single(
            &global.output,
            created,
            |r| format!("Recommended {} ({})", r.recommended_product_name, r.id),
            |r| r.id.to_string(),
        )?;
        output::print_output(&out, global.quiet);
    }
    Ok(())
}

pub async fn handle(
    ctx: &Context,
    args: RecommendationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RecommendationsCommand::Mine { page } => {
            let mut mine = MyRecommendations::new(ctx.api.clone(), ctx.session.clone())?;
            let spinner = output::spinner("Loading recommendations…", global.quiet);
            mine.load().await;
            spinner.finish_and_clear();
            util::ensure_loaded(mine.load_state())?;

            mine.go_to_page(page);
            let page = mine.page();
            let out = output::render_list(
                &global.output,
                &page.items,
                |r| RecommendationRow::from(*r),
                |r| r.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            output::print_page_footer(
                &global.output,
                page.page_number,
                page.total_pages,
                page.filtered_count,
                global.quiet,
            );
            output::print_notices(&mine.take_notices(), &global.color, global.quiet);
            Ok(())
        }

        RecommendationsCommand::Delete { id } => {
            let id = EntityId::new(id);
            let mut mine = MyRecommendations::new(ctx.api.clone(), ctx.session.clone())?;
            mine.load().await;
            util::ensure_loaded(mine.load_state())?;

            if !mine.request_delete(&id)? {
                output::print_notices(&mine.take_notices(), &global.color, global.quiet);
                return Ok(());
            }
            let label = mine
                .items()
                .iter()
                .find(|r| r.id == id)
                .map_or_else(|| id.to_string(), |r| r.recommended_product_name.clone());
            if !util::confirm(&format!("Delete your recommendation of '{label}'?"), global.yes)? {
                mine.cancel_prompt();
                if !global.quiet {
                    eprintln!("Nothing deleted");
                }
                return Ok(());
            }

            let mut deleted = mine.confirm_delete().await;
            if matches!(deleted, Ok(DeleteOutcome::CountDirty))
                && mine.reconcile_counters().await == 0
            {
                deleted = Ok(DeleteOutcome::Counted);
            }
            let notices = mine.take_notices();
            util::finish(deleted, &notices, global)?;
            Ok(())
        }

        RecommendationsCommand::ForMe => {
            let mut received = RecommendationsForMe::new(ctx.api.clone(), &ctx.session)?;
            let spinner = output::spinner("Loading recommendations…", global.quiet);
            received.load().await;
            spinner.finish_and_clear();
            util::ensure_loaded(received.load_state())?;

            let out = output::render_list(
                &global.output,
                received.recommendations(),
                |r| ReceivedRow::new(r, &received),
                |r| r.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            output::print_notices(&received.take_notices(), &global.color, global.quiet);
            Ok(())
        }
    }
}
