//! Author dashboard: the signed-in user's lessons with create and publish
//! actions. Reached only through the authenticated guard.

use leptos::prelude::*;

use crate::components::lesson_card::LessonCard;
use crate::net::gateway::Gateway;
use crate::net::types::{Lesson, NewLesson};
use crate::state::session::SessionStore;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let gateway = expect_context::<Gateway>();

    let author_email = Memo::new(move |_| {
        session
            .state()
            .with(|s| s.principal.as_ref().map(|p| p.email.clone()).unwrap_or_default())
    });

    // The lesson list re-fetches when the author changes.
    let lessons = LocalResource::new(move || {
        crate::net::api::fetch_lessons_by_author(gateway, author_email.get())
    });

    let show_create = RwSignal::new(false);
    let new_title = RwSignal::new(String::new());
    let new_description = RwSignal::new(String::new());
    let new_premium = RwSignal::new(false);

    let on_create = move |_| {
        show_create.set(true);
        new_title.set(String::new());
        new_description.set(String::new());
        new_premium.set(false);
    };

    let on_cancel = Callback::new(move |()| show_create.set(false));

    view! {
        <div class="dashboard-page">
            <header class="dashboard-page__header">
                <h1>"My lessons"</h1>
                <button class="btn btn--primary" on:click=on_create>
                    "+ New Lesson"
                </button>
            </header>

            <div class="dashboard-page__grid">
                <Suspense fallback=move || view! { <p>"Loading your lessons..."</p> }>
                    {move || {
                        lessons
                            .get()
                            .map(|fetched| match fetched {
                                Some(list) if !list.is_empty() => {
                                    view! {
                                        <div class="dashboard-page__cards">
                                            {list
                                                .into_iter()
                                                .map(|lesson| view! { <LessonCard lesson=lesson/> })
                                                .collect::<Vec<_>>()}
                                        </div>
                                    }
                                        .into_any()
                                }
                                Some(_) => {
                                    view! {
                                        <p class="dashboard-page__empty">
                                            "You haven't published anything yet."
                                        </p>
                                    }
                                        .into_any()
                                }
                                None => {
                                    view! {
                                        <p class="dashboard-page__error">
                                            "Couldn't load your lessons."
                                        </p>
                                    }
                                        .into_any()
                                }
                            })
                    }}
                </Suspense>
            </div>

            <Show when=move || show_create.get()>
                <CreateLessonDialog
                    title=new_title
                    description=new_description
                    premium=new_premium
                    on_cancel=on_cancel
                    lessons=lessons
                />
            </Show>
        </div>
    }
}

/// Modal dialog for publishing a new lesson.
#[component]
fn CreateLessonDialog(
    title: RwSignal<String>,
    description: RwSignal<String>,
    premium: RwSignal<bool>,
    on_cancel: Callback<()>,
    lessons: LocalResource<Option<Vec<Lesson>>>,
) -> impl IntoView {
    let gateway = expect_context::<Gateway>();
    let error = RwSignal::new(None::<String>);

    let submit = Callback::new(move |()| {
        let lesson_title = title.get().trim().to_owned();
        if lesson_title.is_empty() {
            return;
        }
        let lesson = NewLesson {
            title: lesson_title,
            description: Some(description.get()).filter(|d| !d.trim().is_empty()),
            premium: premium.get(),
        };

        #[cfg(feature = "csr")]
        {
            let lessons = lessons.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::create_lesson(gateway, lesson).await {
                    Ok(_) => {
                        lessons.refetch();
                        on_cancel.run(());
                    }
                    Err(err) => error.set(Some(err.to_string())),
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (gateway, lesson, &lessons);
        }
    });

    view! {
        <div class="dialog-backdrop" on:click=move |_| on_cancel.run(())>
            <div class="dialog" on:click=move |ev| ev.stop_propagation()>
                <h2>"New Lesson"</h2>
                <label class="dialog__label">
                    "Title"
                    <input
                        class="dialog__input"
                        type="text"
                        prop:value=move || title.get()
                        on:input=move |ev| title.set(event_target_value(&ev))
                        on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                            if ev.key() == "Enter" {
                                ev.prevent_default();
                                submit.run(());
                            }
                        }
                    />
                </label>
                <label class="dialog__label">
                    "Description"
                    <textarea
                        class="dialog__input"
                        prop:value=move || description.get()
                        on:input=move |ev| description.set(event_target_value(&ev))
                    ></textarea>
                </label>
                <label class="dialog__checkbox">
                    <input
                        type="checkbox"
                        prop:checked=move || premium.get()
                        on:change=move |ev| premium.set(event_target_checked(&ev))
                    />
                    "Premium lesson"
                </label>
                {move || error.get().map(|message| view! { <p class="dialog__error">{message}</p> })}
                <div class="dialog__actions">
                    <button class="btn" on:click=move |_| on_cancel.run(())>
                        "Cancel"
                    </button>
                    <button class="btn btn--primary" on:click=move |_| submit.run(())>
                        "Publish"
                    </button>
                </div>
            </div>
        </div>
    }
}
