//! Dispatcher schema and handler chain builders

use std::fmt::Write as _;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, Message};

use super::types::{CallbackContext, HandlerDeps, HandlerError};
use crate::bot::Command;
use crate::routes::send_main_menu;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// # Arguments
/// * `deps` - Handler dependencies (callback router, admin id)
///
/// # Returns
/// The complete handler tree for the bot
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        .branch(command_handler(deps_commands))
        .branch(callback_handler(deps_callback))
}

fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("🎯 Received command: {:?} from chat {}", cmd, msg.chat.id);

                match cmd {
                    Command::Start => send_main_menu(&bot, msg.chat.id).await?,
                    Command::Routes => {
                        let is_admin = msg.from.as_ref().is_some_and(|u| deps.is_admin(u.id));
                        if !is_admin {
                            bot.send_message(msg.chat.id, "Admins only").await?;
                            return Ok(());
                        }
                        bot.send_message(msg.chat.id, routes_report(&deps)).await?;
                    }
                }
                Ok(())
            }
        },
    ))
}

/// Callback queries go through the router first; anything it does not
/// claim falls through to [`handle_unrouted_callback`].
///
/// Handler failures are returned to the dispatcher's error handler as-is.
fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            // The query itself moves into the router; keep what the fallback needs
            let callback_id = q.id.clone();
            let data = q.data.clone();
            let user_id = q.from.id;
            let ctx = CallbackContext::from_query(bot.clone(), &q, &deps);

            if deps.router.route(q, ctx).await? {
                return Ok(());
            }
            handle_unrouted_callback(&bot, callback_id, data.as_deref(), user_id).await
        }
    })
}

/// Fallback for callback queries no route claimed: stop the button's
/// spinner and tell the user the button is stale.
pub async fn handle_unrouted_callback(
    bot: &Bot,
    callback_id: CallbackQueryId,
    data: Option<&str>,
    user_id: UserId,
) -> Result<(), HandlerError> {
    log::info!("Unrouted callback '{}' from user {}", data.unwrap_or("<none>"), user_id);
    bot.answer_callback_query(callback_id)
        .text("This button is no longer active")
        .await?;
    Ok(())
}

/// Route table, dispatch stats and conflicts as a plain-text report
pub fn routes_report(deps: &HandlerDeps) -> String {
    let router = &deps.router;
    let mut report = format!("Callback routes ({}):\n", router.len());
    for line in router.list_routes() {
        let _ = writeln!(report, "{}", line);
    }

    let _ = writeln!(report, "\nStats: {}", router.get_stats());

    let conflicts = router.validate_all_patterns();
    if conflicts.is_empty() {
        report.push_str("No pattern conflicts");
    } else {
        let _ = writeln!(report, "Conflicts ({}):", conflicts.len());
        for conflict in &conflicts {
            let _ = writeln!(report, "• {}", conflict);
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::build_router;
    use std::sync::Arc;

    #[test]
    fn test_routes_report_lists_table_and_conflicts() {
        let deps = HandlerDeps::new(Arc::new(build_router().unwrap()), 1);
        let report = routes_report(&deps);

        assert!(report.starts_with(&format!("Callback routes ({}):", deps.router.len())));
        assert!(report.contains(r"^project_details_\d{1,18}$"));
        assert!(report.contains("Stats: total=0 handled=0 unhandled=0 errored=0"));
        assert!(report.contains("'project_details_42' matched by 2 routes"));
    }

    #[test]
    fn test_admin_check_requires_configured_admin() {
        let router = Arc::new(build_router().unwrap());
        assert!(HandlerDeps::new(Arc::clone(&router), 7).is_admin(UserId(7)));
        assert!(!HandlerDeps::new(Arc::clone(&router), 7).is_admin(UserId(8)));
        assert!(!HandlerDeps::new(router, 0).is_admin(UserId(0)));
    }
}
