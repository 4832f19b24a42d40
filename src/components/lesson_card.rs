//! Card component for lesson list entries.

use leptos::prelude::*;

use crate::net::types::Lesson;

/// A lesson in a catalog or dashboard grid.
#[component]
pub fn LessonCard(lesson: Lesson) -> impl IntoView {
    let title = lesson.title;
    let description = lesson.description.unwrap_or_default();
    let premium = lesson.premium;

    view! {
        <div class="lesson-card">
            <div class="lesson-card__header">
                <span class="lesson-card__title">{title}</span>
                <Show when=move || premium>
                    <span class="lesson-card__badge">"Premium"</span>
                </Show>
            </div>
            <p class="lesson-card__description">{description}</p>
        </div>
    }
}
