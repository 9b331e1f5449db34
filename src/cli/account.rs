//! Account menus: log in, sign up, change password, delete account

use std::io::{BufRead, Write};

use crate::error::{PlannerError, PlannerResult};
use crate::services::AuthService;
use crate::storage::PlannerStore;

use super::{Console, MenuContext, SessionEnd};

/// Ask for credentials; returns the username on success
pub fn login<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &dyn PlannerStore,
) -> PlannerResult<Option<String>> {
    let auth = AuthService::new(store);

    let Some(username) = console.ask("Enter username: ")? else {
        return Ok(None);
    };
    match auth.user_exists(&username) {
        Ok(true) => {}
        Ok(false) => {
            console.say("Invalid username.")?;
            return Ok(None);
        }
        Err(e) => {
            console.say(&format!("Error: {}", e))?;
            return Ok(None);
        }
    }

    let Some(password) = console.ask_password("Enter password: ")? else {
        return Ok(None);
    };
    match auth.login(&username, &password) {
        Ok(()) => {
            console.say(&format!("Login successful. Welcome back, {}!", username))?;
            Ok(Some(username))
        }
        Err(PlannerError::InvalidCredentials) => {
            console.say("Invalid password.")?;
            Ok(None)
        }
        Err(e) => {
            console.say(&format!("Error: {}", e))?;
            Ok(None)
        }
    }
}

/// Sign up and log straight in; returns the new username
pub fn create_account<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &dyn PlannerStore,
) -> PlannerResult<Option<String>> {
    let auth = AuthService::new(store);

    let Some(username) = console.ask("Enter username: ")? else {
        return Ok(None);
    };
    if username.is_empty() {
        console.say("Username cannot be empty.")?;
        return Ok(None);
    }
    if auth.user_exists(&username)? {
        console.say("Username already exists.")?;
        return Ok(None);
    }

    let Some(password) = console.ask_password("Enter password: ")? else {
        return Ok(None);
    };
    if password.is_empty() {
        console.say("Password cannot be empty.")?;
        return Ok(None);
    }

    match auth.create_account(&username, &password) {
        Ok(()) => {
            console.say(&format!("Account created and logged in as {}.", username))?;
            Ok(Some(username))
        }
        Err(e) => {
            console.say(&format!("Error: {}", e))?;
            Ok(None)
        }
    }
}

/// Account settings submenu; `Some` when the session should end
pub fn account_menu<R: BufRead, W: Write>(
    ctx: &mut MenuContext<'_, R, W>,
) -> PlannerResult<Option<SessionEnd>> {
    loop {
        ctx.console.menu(
            "Account Settings",
            &["Change Password", "Logout & Save", "Delete Account"],
            "Back to Settings",
        )?;
        let Some(choice) = ctx.console.ask("Choose an option: ")? else {
            return Ok(None);
        };

        match choice.as_str() {
            "1" => change_password(ctx)?,
            "2" => {
                super::flush(ctx.console, ctx.store, ctx.session)?;
                let message = format!("Logged out. Goodbye, {}!", ctx.session.username());
                ctx.console.say(&message)?;
                return Ok(Some(SessionEnd::Logout));
            }
            "3" => {
                if delete_account(ctx)? {
                    ctx.console.say("Account deleted. Exiting.")?;
                    return Ok(Some(SessionEnd::Exit));
                }
            }
            "0" => return Ok(None),
            _ => ctx.console.say("Invalid choice.")?,
        }
    }
}

fn change_password<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(old) = ctx.console.ask_password("Enter your old password: ")? else {
        return Ok(());
    };
    if old.is_empty() {
        return ctx.console.say("Old password cannot be empty.");
    }
    let Some(new) = ctx.console.ask_password("Enter your new password: ")? else {
        return Ok(());
    };
    if new.is_empty() {
        return ctx.console.say("New password cannot be empty.");
    }

    let result = AuthService::new(ctx.store).reset_password(ctx.session.username(), &old, &new);
    match result {
        Ok(()) => ctx.console.say("Password changed successfully!"),
        Err(PlannerError::InvalidCredentials) => ctx.console.say("Invalid old password."),
        Err(e) => ctx.console.say(&format!("Error: {}", e)),
    }
}

/// Returns whether the account was deleted
fn delete_account<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<bool> {
    let Some(password) = ctx
        .console
        .ask_password("Enter your password to confirm deletion: ")?
    else {
        return Ok(false);
    };
    if password.is_empty() {
        ctx.console.say("Password cannot be empty. Account not deleted.")?;
        return Ok(false);
    }

    let auth = AuthService::new(ctx.store);
    let username = ctx.session.username().to_string();
    if auth.login(&username, &password).is_err() {
        ctx.console.say("Invalid password. Account not deleted.")?;
        return Ok(false);
    }
    if !ctx.console.confirm("This removes all your events for good. Continue?")? {
        ctx.console.say("Account not deleted.")?;
        return Ok(false);
    }

    match auth.delete_account(&username) {
        Ok(()) => {
            ctx.session.discard_changes();
            ctx.console.say("Account deleted successfully!")?;
            Ok(true)
        }
        Err(e) => {
            ctx.console.say(&format!("Error: {}", e))?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VoicePreference;
    use crate::session::Session;
    use crate::storage::MemoryStore;
    use crate::voice::{Narrator, SilentEngine};
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(
            Cursor::new(input.as_bytes().to_vec()),
            Narrator::new(Vec::new(), Box::new(SilentEngine)),
        )
    }

    #[test]
    fn test_create_then_login() {
        let store = MemoryStore::new();
        let mut c = console("bob\nsecret\nbob\nsecret\nbob\nwrong\nnobody\n");

        assert_eq!(create_account(&mut c, &store).unwrap().as_deref(), Some("bob"));
        assert_eq!(login(&mut c, &store).unwrap().as_deref(), Some("bob"));
        assert_eq!(login(&mut c, &store).unwrap(), None);
        assert_eq!(login(&mut c, &store).unwrap(), None);

        let out = String::from_utf8(c.into_output()).unwrap();
        assert!(out.contains("Login successful. Welcome back, bob!"));
        assert!(out.contains("Invalid password."));
        assert!(out.contains("Invalid username."));
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let store = MemoryStore::new();
        AuthService::new(&store).create_account("bob", "pw").unwrap();

        let mut c = console("bob\n");
        assert_eq!(create_account(&mut c, &store).unwrap(), None);
        let out = String::from_utf8(c.into_output()).unwrap();
        assert!(out.contains("Username already exists."));
    }

    #[test]
    fn test_delete_account_requires_password() {
        let mut session = Session::with_events("alice", Vec::new(), VoicePreference::default());
        let out = super::super::test_support::run_menu(&mut session, "3\nwrong\n0\n", |ctx| {
            account_menu(ctx).map(|_| ())
        });
        assert!(out.contains("Invalid password. Account not deleted."));
    }
}
