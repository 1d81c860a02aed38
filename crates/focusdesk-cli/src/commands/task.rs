//! Task list commands.
//!
//! Tasks are the input to the statistics tracker: completing or
//! un-completing one routes the corresponding stats event so counters,
//! streaks and achievements stay consistent with the list.

use std::error::Error;

use clap::{Subcommand, ValueEnum};
use focusdesk_core::{StatsTracker, TaskPriority, TaskRecord};

use super::{context, print_json};

#[derive(Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    High,
    Medium,
    Low,
}

impl PriorityArg {
    fn priority(self) -> TaskPriority {
        match self {
            PriorityArg::High => TaskPriority::High,
            PriorityArg::Medium => TaskPriority::Medium,
            PriorityArg::Low => TaskPriority::Low,
        }
    }
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the top of the list
    Add {
        title: String,
        #[arg(long, value_enum, default_value = "medium")]
        priority: PriorityArg,
    },
    /// List tasks
    List {
        #[arg(long)]
        json: bool,
    },
    /// Mark a task completed (by id or unique id prefix)
    Done { id: String },
    /// Mark a completed task incomplete again
    Undone { id: String },
    /// Delete a task
    Remove { id: String },
}

fn find_index(tasks: &[TaskRecord], id: &str) -> Result<usize, Box<dyn Error>> {
    let matches: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.id.starts_with(id))
        .map(|(i, _)| i)
        .collect();
    match matches.as_slice() {
        [index] => Ok(*index),
        [] => Err(format!("no task matches id '{id}'").into()),
        _ => Err(format!("id '{id}' is ambiguous").into()),
    }
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn Error>> {
    let ctx = context()?;

    match action {
        TaskAction::Add { title, priority } => {
            let mut tasks = ctx.repo.tasks();
            let task = TaskRecord::new(
                title,
                priority.priority(),
                ctx.clock.now_ms(),
                tasks.len() as u32,
            );
            // Newest first, matching the display order.
            tasks.insert(0, task.clone());
            ctx.repo.save_tasks(&tasks)?;
            print_json(&task)?;
        }
        TaskAction::List { json } => {
            let tasks = ctx.repo.tasks();
            if json {
                print_json(&tasks)?;
            } else {
                for task in &tasks {
                    let mark = if task.completed { "x" } else { " " };
                    println!("[{mark}] {}  {}", &task.id[..8.min(task.id.len())], task.title);
                }
            }
        }
        TaskAction::Done { id } => {
            let mut tasks = ctx.repo.tasks();
            let index = find_index(&tasks, &id)?;
            if !tasks[index].completed {
                tasks[index].completed = true;
                ctx.repo.save_tasks(&tasks)?;
                let mut stats = StatsTracker::new(ctx.repo.clone(), ctx.clock.clone());
                stats.on_task_completed();
            }
            print_json(&tasks[index])?;
        }
        TaskAction::Undone { id } => {
            let mut tasks = ctx.repo.tasks();
            let index = find_index(&tasks, &id)?;
            if tasks[index].completed {
                tasks[index].completed = false;
                ctx.repo.save_tasks(&tasks)?;
                let mut stats = StatsTracker::new(ctx.repo.clone(), ctx.clock.clone());
                stats.on_task_uncompleted();
            }
            print_json(&tasks[index])?;
        }
        TaskAction::Remove { id } => {
            let mut tasks = ctx.repo.tasks();
            let index = find_index(&tasks, &id)?;
            let removed = tasks.remove(index);
            ctx.repo.save_tasks(&tasks)?;
            println!("removed '{}'", removed.title);
        }
    }

    Ok(())
}
