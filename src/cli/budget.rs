//! Budget menus

use std::io::{BufRead, Write};

use crate::display::{format_budget, format_budget_overview, format_budget_summary, format_task_budgets};
use crate::error::PlannerResult;
use crate::models::Budget;
use crate::services::{ArchiveFilter, BudgetService, EventService, TaskService};

use super::{pick_event, pick_task, MenuContext};

pub fn budget_menu<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    loop {
        ctx.console.menu(
            "Budget Manager",
            &[
                "Set or Edit Event Budget",
                "View All Event Budgets",
                "Assign Budget to Task",
                "View Task Budgets Only",
                "View Event Budget Summary",
            ],
            "Back to Main Menu",
        )?;
        let Some(choice) = ctx.console.ask("Choose an option: ")? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => set_event_budget(ctx)?,
            "2" => overview(ctx)?,
            "3" => set_task_budget(ctx)?,
            "4" => task_budgets(ctx)?,
            "5" => summary(ctx)?,
            "0" => return Ok(()),
            _ => ctx.console.say("Invalid choice.")?,
        }
        if ctx.console.is_closed() {
            return Ok(());
        }
    }
}

/// Ask for an amount; blank clears, anything unparseable is refused
fn ask_budget<R: BufRead, W: Write>(
    ctx: &mut MenuContext<'_, R, W>,
    current: &Budget,
) -> PlannerResult<Option<Budget>> {
    let prompt = format!(
        "Budget amount (current: {}, blank to clear): ",
        format_budget(current, ctx.symbol())
    );
    let Some(input) = ctx.console.ask(&prompt)? else {
        return Ok(None);
    };
    match Budget::from_input(&input) {
        Ok(budget) => Ok(Some(budget)),
        Err(e) => {
            ctx.console.say(&format!("Error: {}", e))?;
            Ok(None)
        }
    }
}

fn set_event_budget<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(id) = pick_event(ctx, ArchiveFilter::Active)? else {
        return Ok(());
    };
    let current = ctx
        .session
        .event(id)
        .map(|e| e.budget.clone())
        .unwrap_or_default();
    let Some(budget) = ask_budget(ctx, &current)? else {
        return Ok(());
    };
    let message = format!("Event budget set to {}.", format_budget(&budget, ctx.symbol()));
    let result = EventService::new(ctx.session).set_budget(id, budget);
    ctx.report(result, &message)?;
    Ok(())
}

fn set_task_budget<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(event_id) = pick_event(ctx, ArchiveFilter::Active)? else {
        return Ok(());
    };
    let Some(task_id) = pick_task(ctx, event_id, false)? else {
        return Ok(());
    };
    let current = ctx
        .session
        .event(event_id)
        .and_then(|e| e.task(task_id))
        .map(|t| t.budget.clone())
        .unwrap_or_default();
    let Some(budget) = ask_budget(ctx, &current)? else {
        return Ok(());
    };
    let message = format!("Task budget set to {}.", format_budget(&budget, ctx.symbol()));
    let result = TaskService::new(ctx.session).set_budget(event_id, task_id, budget);
    ctx.report(result, &message)?;
    Ok(())
}

fn overview<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let include_archived = ctx.console.confirm("Include archived events?")?;
    let overview = BudgetService::new(ctx.session).overview(include_archived);
    let block = format_budget_overview(&overview, &ctx.settings.currency_symbol);
    ctx.console.say_block(&block)
}

fn task_budgets<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(event_id) = pick_event(ctx, ArchiveFilter::All)? else {
        return Ok(());
    };
    let service = BudgetService::new(ctx.session);
    let block = match (service.task_budgets(event_id), ctx.session.event(event_id)) {
        (Ok(lines), Some(event)) => {
            format_task_budgets(&event.name, &lines, &ctx.settings.currency_symbol)
        }
        (Err(e), _) => format!("Error: {}", e),
        (Ok(_), None) => "Event not found.".to_string(),
    };
    ctx.console.say_block(&block)
}

fn summary<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(event_id) = pick_event(ctx, ArchiveFilter::All)? else {
        return Ok(());
    };
    let block = match BudgetService::new(ctx.session).event_summary(event_id) {
        Ok(summary) => format_budget_summary(&summary, &ctx.settings.currency_symbol),
        Err(e) => format!("Error: {}", e),
    };
    ctx.console.say_block(&block)
}
