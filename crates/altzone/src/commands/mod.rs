//! Command dispatch: bridges CLI args -> core controllers -> output formatting.

pub mod config_cmd;
pub mod queries;
pub mod recommendations;
pub mod session;
pub mod theme;
pub mod util;

use altzone_core::{ApiClient, EntityId, Layout, Navigation, Route, Session, guard};

use crate::cli::{Command, GlobalOpts, QueriesCommand, RecommendationsCommand};
use crate::error::CliError;

/// What a server-bound handler works with.
pub struct Context {
    pub api: ApiClient,
    pub session: Session,
    /// Default list layout from the config file.
    pub layout: Layout,
}

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(route) = route_for(&cmd) {
        if let Navigation::RedirectToLogin { from } = guard(route, &ctx.session) {
            return Err(CliError::LoginRequired {
                action: format!("open {from}"),
            });
        }
    }

    match cmd {
        Command::Queries(args) => queries::handle(ctx, args, global).await,
        Command::Recommend(args) => recommendations::recommend(ctx, args, global).await,
        Command::Recommendations(args) => recommendations::handle(ctx, args, global).await,
        // Handled before a client is built
        Command::Theme(_) | Command::Session(_) | Command::Config(_) | Command::Completions(_) => {
            Ok(())
        }
    }
}

/// The screen a command stands in for, so the same guard protects both.
fn route_for(cmd: &Command) -> Option<Route> {
    let route = match cmd {
        Command::Queries(args) => match &args.command {
            QueriesCommand::List(_) => Route::Queries,
            QueriesCommand::Recent => Route::Home,
            QueriesCommand::Show { id } => Route::ViewDetail(EntityId::new(id.as_str())),
            QueriesCommand::Add(_) => Route::AddQuery,
            QueriesCommand::Mine(_) | QueriesCommand::Edit { .. } | QueriesCommand::Delete { .. } => {
                Route::MyQueries
            }
        },
        Command::Recommend(args) => Route::ViewDetail(EntityId::new(args.query_id.as_str())),
        Command::Recommendations(args) => match args.command {
            RecommendationsCommand::Mine { .. } | RecommendationsCommand::Delete { .. } => {
                Route::MyRecommendations
            }
            RecommendationsCommand::ForMe => Route::RecommendationsForMe,
        },
        Command::Theme(_) | Command::Session(_) | Command::Config(_) | Command::Completions(_) => {
            return None;
        }
    };
    Some(route)
}
