//! Theme preference handlers. Purely local, no server round-trip.

use altzone_config::{ThemePreference, load_theme, save_theme};

use crate::cli::{GlobalOpts, ThemeArgs, ThemeCommand};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ThemeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let theme = match args.command {
        ThemeCommand::Show => load_theme(),
        ThemeCommand::Toggle => {
            let next = load_theme().toggled();
            save_theme(next)?;
            next
        }
        ThemeCommand::Set { theme } => {
            save_theme(theme)?;
            theme
        }
    };

    let out = output::render_single(
        &global.output,
        &theme,
        ThemePreference::to_string,
        ThemePreference::to_string,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
