use chrono::Local;
use leptos::prelude::*;

use crate::models::Task;
use crate::stats::TaskStats;

/// Summary cards over the tasks currently listed
#[component]
pub fn TaskStatistics(#[prop(into)] tasks: Signal<Vec<Task>>) -> impl IntoView {
    let stats = Memo::new(move |_| tasks.with(|t| TaskStats::compute(t, Local::now().naive_local())));

    let card = move |label: &'static str, class: &'static str, value: fn(&TaskStats) -> usize| {
        view! {
            <div class=format!("stat-card {}", class)>
                <span class="stat-value">{move || value(&stats.get())}</span>
                <span class="stat-label">{label}</span>
            </div>
        }
    };

    view! {
        <section class="task-stats">
            <div class="stat-grid">
                {card("Total", "stat-total", |s| s.total)}
                {card("Completed", "stat-completed", |s| s.completed)}
                {card("Pending", "stat-pending", |s| s.pending)}
                {card("Due Today", "stat-due", |s| s.due_today)}
            </div>
            <div class="progress">
                <div class="progress-label">
                    <span>"Completion"</span>
                    <span>{move || format!("{}%", stats.get().completion_percent)}</span>
                </div>
                <div class="progress-track">
                    <div
                        class="progress-fill"
                        style=move || format!("width: {}%", stats.get().completion_percent)
                    ></div>
                </div>
            </div>
            <Show when=move || { stats.get().overdue > 0 }>
                <p class="stat-warning">{move || format!("{} overdue", stats.get().overdue)}</p>
            </Show>
            <Show when=move || { stats.get().high_priority_pending > 0 }>
                <p class="stat-note">
                    {move || format!("{} high-priority pending", stats.get().high_priority_pending)}
                </p>
            </Show>
        </section>
    }
}
