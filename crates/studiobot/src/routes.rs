//! The studio's callback route table
//!
//! Every inline button the bot sends is handled through [`StudioRouter`].
//! Priorities are assigned here, in one place, so overlapping patterns (the
//! `project_` catch-all vs. the specific project screens) resolve the same
//! way no matter which feature registered first.

use studiocore::callback_data;
use studiocore::{CallbackRouter, HandlerResult, RouterResult};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::handlers::CallbackContext;

/// Router type used by the bot
pub type StudioRouter = CallbackRouter<CallbackQuery, CallbackContext>;

/// Route priorities. Lower is tried first.
pub mod priority {
    /// Silent buttons (pagination labels)
    pub const SYSTEM: i32 = 0;
    /// Exact screens and id-specific project routes
    pub const SPECIFIC: i32 = 10;
    pub const PROJECT_REVISIONS: i32 = 20;
    pub const PROJECT_LIST: i32 = 30;
    pub const ADMIN: i32 = 40;
    pub const SECTION: i32 = 50;
    /// Anything else starting with `project_`
    pub const PROJECT_CATCH_ALL: i32 = 70;
}

/// Top-level sections reachable from the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Hosting,
    Finance,
}

impl Section {
    fn title(self) -> &'static str {
        match self {
            Section::Hosting => "🖥 Hosting & billing",
            Section::Finance => "💰 Finance",
        }
    }
}

/// Builds the route table and logs it together with any pattern conflicts.
///
/// # Errors
/// Fails if a pattern does not compile; startup must abort in that case.
pub fn build_router() -> RouterResult<StudioRouter> {
    let mut router = StudioRouter::new();

    router.register("^noop$", priority::SYSTEM, "pagination label", answer_silently)?;
    router.register("^(main_menu|back_to_main)$", priority::SPECIFIC, "main menu", show_main_menu)?;
    router.register("^help$", priority::SPECIFIC, "help", show_help)?;
    // Ids are capped at 18 digits so every matched id fits an i64; longer
    // ones fall through to the catch-all
    router.register(
        r"^project_details_\d{1,18}$",
        priority::SPECIFIC,
        "project card by id",
        show_project_details,
    )?;
    router.register(
        r"^project_revisions_\d{1,18}$",
        priority::PROJECT_REVISIONS,
        "project revisions",
        show_project_revisions,
    )?;
    router.register(
        r"^(project_list|projects_page_\d+)$",
        priority::PROJECT_LIST,
        "project list",
        show_project_list,
    )?;
    router.register("^admin_", priority::ADMIN, "admin panel (admin only)", show_admin_panel)?;
    router.register("^hosting_", priority::SECTION, "hosting & billing", |q, ctx| {
        show_section(q, ctx, Section::Hosting)
    })?;
    router.register("^finance_", priority::SECTION, "finance", |q, ctx| {
        show_section(q, ctx, Section::Finance)
    })?;
    router.register(
        "^project_",
        priority::PROJECT_CATCH_ALL,
        "other project actions",
        project_action_unavailable,
    )?;

    router.log_summary();
    Ok(router)
}

/// Inline button whose callback data goes through the 64-byte check
fn button<I, P>(text: &str, parts: I) -> RouterResult<InlineKeyboardButton>
where
    I: IntoIterator<Item = P>,
    P: std::fmt::Display,
{
    Ok(InlineKeyboardButton::callback(text, callback_data::build(parts)?))
}

/// Numeric id at the end of `data` after `prefix` (`project_details_42` -> 42)
pub fn trailing_id(data: &str, prefix: &str) -> Option<i64> {
    data.strip_prefix(prefix)?.parse().ok()
}

pub fn main_menu_keyboard() -> RouterResult<InlineKeyboardMarkup> {
    Ok(InlineKeyboardMarkup::new(vec![
        vec![button("📁 Projects", ["project", "list"])?],
        vec![
            button("🖥 Hosting", ["hosting", "list"])?,
            button("💰 Finance", ["finance", "stats"])?,
        ],
        vec![button("🛠 Admin", ["admin", "panel"])?, button("❓ Help", ["help"])?],
    ]))
}

fn back_keyboard() -> RouterResult<InlineKeyboardMarkup> {
    Ok(InlineKeyboardMarkup::new(vec![vec![button(
        "⬅️ Main menu",
        ["back", "to", "main"],
    )?]]))
}

pub fn project_keyboard(project_id: i64) -> RouterResult<InlineKeyboardMarkup> {
    let id = project_id.to_string();
    Ok(InlineKeyboardMarkup::new(vec![
        vec![
            button("📝 Revisions", ["project", "revisions", id.as_str()])?,
            button("📎 Files", ["project", "files", id.as_str()])?,
        ],
        vec![button("⬅️ Projects", ["project", "list"])?],
    ]))
}

pub fn project_list_keyboard(page: u32) -> RouterResult<InlineKeyboardMarkup> {
    let mut nav = Vec::new();
    if page > 1 {
        let prev = (page - 1).to_string();
        nav.push(button("«", ["projects", "page", prev.as_str()])?);
    }
    nav.push(InlineKeyboardButton::callback(page.to_string(), "noop"));
    let next = (page + 1).to_string();
    nav.push(button("»", ["projects", "page", next.as_str()])?);

    Ok(InlineKeyboardMarkup::new(vec![
        nav,
        vec![button("⬅️ Main menu", ["back", "to", "main"])?],
    ]))
}

/// Sends the main menu as a new message (used by /start)
pub async fn send_main_menu(bot: &Bot, chat_id: ChatId) -> HandlerResult {
    bot.send_message(chat_id, "Studio menu").reply_markup(main_menu_keyboard()?).await?;
    Ok(())
}

/// Answers the query and replaces the message the button was attached to.
/// Falls back to a new private message when the original is inaccessible.
async fn show_screen(
    q: &CallbackQuery,
    ctx: &CallbackContext,
    text: String,
    keyboard: InlineKeyboardMarkup,
) -> HandlerResult {
    ctx.bot.answer_callback_query(q.id.clone()).await?;

    match (ctx.chat_id, ctx.message_id) {
        (Some(chat_id), Some(message_id)) => {
            ctx.bot
                .edit_message_text(chat_id, message_id, text)
                .reply_markup(keyboard)
                .await?;
        }
        _ => {
            ctx.bot.send_message(q.from.id, text).reply_markup(keyboard).await?;
        }
    }
    Ok(())
}

fn data(q: &CallbackQuery) -> &str {
    q.data.as_deref().unwrap_or_default()
}

async fn answer_silently(q: CallbackQuery, ctx: CallbackContext) -> HandlerResult {
    ctx.bot.answer_callback_query(q.id.clone()).await?;
    Ok(())
}

async fn show_main_menu(q: CallbackQuery, ctx: CallbackContext) -> HandlerResult {
    show_screen(&q, &ctx, "Studio menu".to_string(), main_menu_keyboard()?).await
}

async fn show_help(q: CallbackQuery, ctx: CallbackContext) -> HandlerResult {
    let text = "Projects: cards, revisions and files.\n\
                Hosting: servers and renewals.\n\
                Finance: income and expenses.";
    show_screen(&q, &ctx, text.to_string(), back_keyboard()?).await
}

async fn show_project_details(q: CallbackQuery, ctx: CallbackContext) -> HandlerResult {
    let Some(project_id) = trailing_id(data(&q), "project_details_") else {
        return Err(format!("malformed project id in '{}'", data(&q)).into());
    };
    show_screen(
        &q,
        &ctx,
        format!("📁 Project #{}", project_id),
        project_keyboard(project_id)?,
    )
    .await
}

async fn show_project_revisions(q: CallbackQuery, ctx: CallbackContext) -> HandlerResult {
    let Some(project_id) = trailing_id(data(&q), "project_revisions_") else {
        return Err(format!("malformed project id in '{}'", data(&q)).into());
    };
    let id = project_id.to_string();
    let keyboard = InlineKeyboardMarkup::new(vec![vec![button(
        "⬅️ Project",
        ["project", "details", id.as_str()],
    )?]]);
    show_screen(&q, &ctx, format!("📝 Revisions of project #{}", project_id), keyboard).await
}

async fn show_project_list(q: CallbackQuery, ctx: CallbackContext) -> HandlerResult {
    let page = trailing_id(data(&q), "projects_page_")
        .and_then(|p| u32::try_from(p).ok())
        .filter(|p| *p > 0)
        .unwrap_or(1);
    show_screen(&q, &ctx, format!("📁 Projects, page {}", page), project_list_keyboard(page)?).await
}

async fn show_admin_panel(q: CallbackQuery, ctx: CallbackContext) -> HandlerResult {
    if !ctx.is_admin {
        log::warn!("User {} pressed admin button '{}'", q.from.id, data(&q));
        ctx.bot
            .answer_callback_query(q.id.clone())
            .text("Admins only")
            .show_alert(true)
            .await?;
        return Ok(());
    }

    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![
            button("👥 Users", ["admin", "users"])?,
            button("📣 Broadcast", ["admin", "broadcast"])?,
        ],
        vec![button("⬅️ Main menu", ["back", "to", "main"])?],
    ]);
    show_screen(&q, &ctx, "🛠 Admin panel".to_string(), keyboard).await
}

async fn show_section(q: CallbackQuery, ctx: CallbackContext, section: Section) -> HandlerResult {
    show_screen(&q, &ctx, section.title().to_string(), back_keyboard()?).await
}

async fn project_action_unavailable(q: CallbackQuery, ctx: CallbackContext) -> HandlerResult {
    log::info!("Project action '{}' has no dedicated screen", data(&q));
    ctx.bot
        .answer_callback_query(q.id.clone())
        .text("This project action is not available yet")
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    fn callback_data_of(keyboard: &InlineKeyboardMarkup) -> Vec<String> {
        keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|b| match &b.kind {
                InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_trailing_id() {
        assert_eq!(trailing_id("project_details_42", "project_details_"), Some(42));
        assert_eq!(trailing_id("project_details_", "project_details_"), None);
        assert_eq!(trailing_id("project_details_x", "project_details_"), None);
        assert_eq!(trailing_id("hosting_pay_3", "project_details_"), None);
    }

    #[test]
    fn test_longest_routed_id_parses() {
        let router = build_router().unwrap();
        let data = format!("project_details_{}", "9".repeat(18));

        assert_eq!(router.resolve(&data).map(|r| r.priority()), Some(priority::SPECIFIC));
        assert_eq!(trailing_id(&data, "project_details_"), Some(999_999_999_999_999_999));
    }

    #[test]
    fn test_project_keyboard_data() {
        let keyboard = project_keyboard(42).unwrap();
        assert_eq!(
            callback_data_of(&keyboard),
            vec!["project_revisions_42", "project_files_42", "project_list"]
        );
    }

    #[test]
    fn test_first_page_has_no_prev_button() {
        let keyboard = project_list_keyboard(1).unwrap();
        assert_eq!(
            callback_data_of(&keyboard),
            vec!["noop", "projects_page_2", "back_to_main"]
        );

        let keyboard = project_list_keyboard(3).unwrap();
        assert_eq!(callback_data_of(&keyboard)[0], "projects_page_2");
    }

    #[test]
    fn test_every_menu_button_is_routed() {
        let router = build_router().unwrap();
        let keyboards = [
            main_menu_keyboard().unwrap(),
            back_keyboard().unwrap(),
            project_keyboard(7).unwrap(),
            project_list_keyboard(2).unwrap(),
        ];

        for keyboard in &keyboards {
            for data in callback_data_of(keyboard) {
                assert!(router.resolve(&data).is_some(), "button '{}' has no route", data);
            }
        }
    }
}
