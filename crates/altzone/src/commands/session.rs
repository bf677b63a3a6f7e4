//! Session handlers: who is signed in, and recording or clearing that.
//!
//! Sign-in itself happens at the identity provider; these commands only
//! keep the active profile's copy of the result.

use std::collections::hash_map::Entry;
use std::sync::Arc;

use altzone_config::{Config, Profile, ProfileIdentity, store_token};
use altzone_core::{Session, SessionUser};

use crate::cli::{GlobalOpts, SessionArgs, SessionCommand};
use crate::config;
use crate::error::CliError;
use crate::output;

fn detail(user: Option<&SessionUser>) -> String {
    match user {
        Some(user) if user.display_name.is_some() => {
            format!("Signed in as {} <{}>", user.name(), user.email)
        }
        Some(user) => format!("Signed in as {}", user.email),
        None => "Not signed in".into(),
    }
}

fn session_for(profile_name: &str, cfg: &Config) -> Session {
    cfg.profiles.get(profile_name).map_or_else(Session::anonymous, |profile| {
        Session::new(Arc::new(ProfileIdentity::new(profile_name, profile)))
    })
}

pub fn handle(args: SessionArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);

    match args.command {
        SessionCommand::Whoami => {
            let user = session_for(&profile_name, &cfg).user();
            let out = output::render_single(&global.output, &user, |u| detail(u.as_ref()), |u| {
                u.as_ref().map(|u| u.email.clone()).unwrap_or_default()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SessionCommand::SignIn {
            email,
            name,
            photo,
            save_token,
        } => {
            let email = email.trim().to_owned();
            if email.is_empty() {
                return Err(CliError::Validation {
                    field: "email".into(),
                    reason: "cannot be empty".into(),
                });
            }
            let user = SessionUser {
                email,
                display_name: name,
                photo_url: photo,
            };

            let profile = match cfg.profiles.entry(profile_name.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let api_url = global.api_url.clone().ok_or_else(|| CliError::NoConfig {
                        path: config::config_path().display().to_string(),
                    })?;
                    entry.insert(Profile {
                        api_url,
                        ..Profile::default()
                    })
                }
            };
            profile.set_session_user(Some(&user));

            if save_token {
                let token = global.token.as_deref().ok_or_else(|| CliError::Validation {
                    field: "token".into(),
                    reason: "--save-token needs --token or ALTZONE_TOKEN".into(),
                })?;
                if let Err(e) = store_token(&profile_name, token) {
                    tracing::warn!(error = %e, "keyring unavailable, saving token in config");
                    profile.token = Some(token.to_owned());
                }
            }

            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("{} (profile '{profile_name}')", detail(Some(&user)));
            }
            Ok(())
        }

        SessionCommand::SignOut => {
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(config::unknown_profile(&profile_name, &cfg));
            }
            let session = session_for(&profile_name, &cfg);
            if !session.is_signed_in() {
                if !global.quiet {
                    eprintln!("Not signed in");
                }
                return Ok(());
            }
            session.sign_out()?;
            if !global.quiet {
                eprintln!("Signed out of profile '{profile_name}'");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whoami_text() {
        assert_eq!(detail(None), "Not signed in");
        assert_eq!(
            detail(Some(&SessionUser::new("me@example.com"))),
            "Signed in as me@example.com"
        );
        let named = SessionUser {
            display_name: Some("Me".into()),
            ..SessionUser::new("me@example.com")
        };
        assert_eq!(detail(Some(&named)), "Signed in as Me <me@example.com>");
    }
}
